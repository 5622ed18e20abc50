use std::fmt;

use serde::Serialize;

use crate::attrs::Attributes;
use crate::escape::escape;
use crate::url::UrlResolver;

/// An HTML fragment that is already safe to embed.
///
/// Builders escape their inputs before constructing one; the only way to
/// carry unescaped text in is the explicit [`Html::raw`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Html(String);

impl Html {
    /// Wraps markup the caller vouches for.
    pub fn raw(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    /// Escapes plain text into a fragment.
    pub fn text(text: &str) -> Self {
        Self(escape(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Html {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of an ordered or unordered listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    /// Plain text item, escaped on render.
    Text(String),
    /// A nested listing spliced in without a wrapping `<li>`.
    Nested(Vec<ListItem>),
    /// An item whose label is trusted markup, carrying a nested listing.
    Labelled {
        label: String,
        items: Vec<ListItem>,
    },
}

/// Wraps content in a tag, padding the body with newlines.
pub fn tag(name: &str, content: &Html, attrs: &Attributes) -> Html {
    Html::raw(format!("<{name}{}>\n{content}\n</{name}>\n", attrs.to_html()))
}

/// Wraps multiple fragments in a tag, joined by newlines.
pub fn tag_join(name: &str, parts: &[Html], attrs: &Attributes) -> Html {
    let body = parts
        .iter()
        .map(Html::as_str)
        .collect::<Vec<_>>()
        .join("\n");
    tag(name, &Html::raw(body), attrs)
}

/// `<meta>` tag; explicit attributes override the name/content defaults.
pub fn meta(name: &str, content: &str, attrs: &Attributes) -> Html {
    let mut merged = Attributes::new();
    merged.set("name", name);
    merged.set("content", content);
    merged.merge(attrs);
    Html::raw(format!("<meta{}>\n", merged.to_html()))
}

/// Ordered list of items.
pub fn ol(list: &[ListItem], attrs: &Attributes) -> Html {
    listing("ol", list, attrs)
}

/// Unordered list of items.
pub fn ul(list: &[ListItem], attrs: &Attributes) -> Html {
    listing("ul", list, attrs)
}

/// Description list; terms and descriptions are escaped.
pub fn dl(list: &[(String, Vec<String>)], attrs: &Attributes) -> Html {
    let mut html = format!("<dl{}>", attrs.to_html());
    for (term, descriptions) in list {
        html.push_str(&format!("<dt>{}</dt>", escape(term)));
        for description in descriptions {
            html.push_str(&format!("<dd>{}</dd>", escape(description)));
        }
    }
    html.push_str("</dl>");
    Html::raw(html)
}

fn listing(kind: &str, list: &[ListItem], attrs: &Attributes) -> Html {
    if list.is_empty() {
        return Html::default();
    }

    let mut body = String::new();
    for item in list {
        body.push_str(&listing_element(kind, item));
    }

    Html::raw(format!("<{kind}{}>{body}</{kind}>", attrs.to_html()))
}

fn listing_element(kind: &str, item: &ListItem) -> String {
    match item {
        ListItem::Text(text) => format!("<li>{}</li>", escape(text)),
        ListItem::Nested(items) => listing(kind, items, &Attributes::new()).into_string(),
        ListItem::Labelled { label, items } => {
            format!("<li>{}{}</li>", label, listing(kind, items, &Attributes::new()))
        }
    }
}

/// Obfuscates a string into a mix of decimal entities, hex entities, and
/// literal characters to hinder address harvesting. The variant cycles with
/// character position, so output is deterministic.
pub fn obfuscate(value: &str) -> String {
    let mut safe = String::new();
    for (idx, ch) in value.chars().enumerate() {
        if !ch.is_ascii() {
            safe.push(ch);
            continue;
        }
        match idx % 3 {
            0 => safe.push_str(&format!("&#{};", ch as u32)),
            1 => safe.push_str(&format!("&#x{:x};", ch as u32)),
            _ => safe.push(ch),
        }
    }
    safe
}

/// Obfuscated e-mail address with any remaining literal `@` entity-encoded.
pub fn email_address(email: &str) -> String {
    obfuscate(email).replace('@', "&#64;")
}

/// Builders for markup that needs URL resolution.
pub struct HtmlBuilder<'a> {
    urls: &'a dyn UrlResolver,
}

impl<'a> HtmlBuilder<'a> {
    pub fn new(urls: &'a dyn UrlResolver) -> Self {
        Self { urls }
    }

    /// `<script>` tag loading a JavaScript asset.
    pub fn script(&self, url: &str, attrs: &Attributes, secure: Option<bool>) -> Html {
        let mut attrs = attrs.clone();
        attrs.set("src", self.urls.asset_url(url, secure));
        Html::raw(format!("<script{}></script>\n", attrs.to_html()))
    }

    /// Stylesheet `<link>` tag; media/type/rel default when unset.
    pub fn style(&self, url: &str, attrs: &Attributes, secure: Option<bool>) -> Html {
        let mut attrs = attrs.clone();
        for (name, value) in [("media", "all"), ("type", "text/css"), ("rel", "stylesheet")] {
            if !attrs.contains(name) {
                attrs.set(name, value);
            }
        }
        attrs.set("href", self.urls.asset_url(url, secure));
        Html::raw(format!("<link{}>\n", attrs.to_html()))
    }

    /// `<img>` element for an asset path.
    pub fn image(&self, url: &str, alt: Option<&str>, attrs: &Attributes, secure: Option<bool>) -> Html {
        let mut attrs = attrs.clone();
        attrs.set_opt("alt", alt.map(str::to_string));
        Html::raw(format!(
            "<img src=\"{}\"{}>",
            escape(&self.urls.asset_url(url, secure)),
            attrs.to_html()
        ))
    }

    /// Favicon `<link>`; rel/type default when unset.
    pub fn favicon(&self, url: &str, attrs: &Attributes, secure: Option<bool>) -> Html {
        let mut attrs = attrs.clone();
        for (name, value) in [("rel", "shortcut icon"), ("type", "image/x-icon")] {
            if !attrs.contains(name) {
                attrs.set(name, value);
            }
        }
        attrs.set("href", self.urls.asset_url(url, secure));
        Html::raw(format!("<link{}>\n", attrs.to_html()))
    }

    /// Anchor to a resolved path; the title falls back to the URL itself.
    pub fn link(&self, url: &str, title: Option<&str>, attrs: &Attributes, secure: Option<bool>) -> Html {
        let url = self.urls.to_path(url, &[], secure);
        let title = title.unwrap_or(&url);
        Html::raw(format!(
            "<a href=\"{}\"{}>{}</a>",
            escape(&url),
            attrs.to_html(),
            escape(title)
        ))
    }

    /// HTTPS anchor.
    pub fn secure_link(&self, url: &str, title: Option<&str>, attrs: &Attributes) -> Html {
        self.link(url, title, attrs, Some(true))
    }

    /// Anchor to an asset URL.
    pub fn link_asset(&self, url: &str, title: Option<&str>, attrs: &Attributes, secure: Option<bool>) -> Html {
        let url = self.urls.asset_url(url, secure);
        self.link(&url, Some(title.unwrap_or(&url)), attrs, secure)
    }

    /// HTTPS anchor to an asset URL.
    pub fn link_secure_asset(&self, url: &str, title: Option<&str>, attrs: &Attributes) -> Html {
        self.link_asset(url, title, attrs, Some(true))
    }

    /// Anchor to a named route.
    pub fn link_route(&self, name: &str, title: Option<&str>, params: &[String], attrs: &Attributes) -> Html {
        self.link(&self.urls.to_route(name, params), title, attrs, None)
    }

    /// Anchor to a controller action.
    pub fn link_action(&self, action: &str, title: Option<&str>, params: &[String], attrs: &Attributes) -> Html {
        self.link(&self.urls.to_action(action, params), title, attrs, None)
    }

    /// Obfuscated `mailto:` anchor.
    pub fn mailto(&self, email: &str, title: Option<&str>, attrs: &Attributes) -> Html {
        let address = email_address(email);
        let href = format!("{}{}", obfuscate("mailto:"), address);
        let body = match title {
            Some(title) => escape(title),
            None => address.clone(),
        };
        Html::raw(format!("<a href=\"{}\"{}>{}</a>", href, attrs.to_html(), body))
    }
}
