//! Markup construction for individual form controls.

use std::collections::BTreeSet;

use formation_html::{Attributes, Html, escape};
use serde_json::Value;
use time::format_description::well_known::Rfc3339;

use crate::config::OptionEntry;
use crate::schema::humanize;
use crate::sources::CsrfTokenProvider;
use crate::value::{FieldValue, ValueContext, formats, json_display};

/// Input kinds that never echo a resolved value back into the markup.
const SKIP_VALUE_KINDS: [&str; 4] = ["file", "password", "checkbox", "radio"];

/// Builds individual form elements, tracking emitted label names so inputs
/// can derive their `id` attributes.
///
/// One builder lives for exactly one render pass; the label set is never
/// shared across passes.
pub struct ElementBuilder<'a> {
    values: ValueContext<'a>,
    labels: BTreeSet<String>,
}

impl<'a> ElementBuilder<'a> {
    pub fn new(values: ValueContext<'a>) -> Self {
        Self {
            values,
            labels: BTreeSet::new(),
        }
    }

    /// Builder without value sources; elements keep their explicit values.
    pub fn detached() -> Self {
        Self::new(ValueContext::detached())
    }

    /// Read access to the resolution context.
    pub fn values(&self) -> &ValueContext<'a> {
        &self.values
    }

    /// `<label for=..>`. The name is recorded so a later element with the
    /// same name picks it up as its id; empty or missing text falls back to
    /// a humanized field name.
    pub fn label(&mut self, name: &str, text: Option<&str>, attrs: &Attributes) -> Html {
        self.labels.insert(name.to_string());

        let text = match text.filter(|text| !text.is_empty()) {
            Some(text) => text.to_string(),
            None => humanize(name),
        };

        Html::raw(format!(
            "<label for=\"{}\"{}>{}</label>",
            escape(name),
            attrs.to_html(),
            escape(&text)
        ))
    }

    /// Generic `<input>`; `kind` passes through verbatim.
    ///
    /// The value is pulled through the resolution chain except for the
    /// skip-value kinds (file, password, checkbox, radio), which never echo
    /// resolved state.
    pub fn input(
        &mut self,
        kind: &str,
        name: Option<&str>,
        value: Option<FieldValue>,
        mut attrs: Attributes,
    ) -> Html {
        if let Some(name) = name
            && !attrs.contains("name")
        {
            attrs.set("name", name);
        }

        let id = self.id_attribute(name, &attrs);

        let value = if SKIP_VALUE_KINDS.contains(&kind) {
            value
        } else {
            self.values.resolve(name, value.as_ref())
        };

        attrs.set("type", kind);
        attrs.set_opt("value", value.map(|value| value.to_display_string()));
        attrs.set_opt("id", id);

        Html::raw(format!("<input{}>", attrs.to_html()))
    }

    pub fn text(&mut self, name: &str, value: Option<FieldValue>, attrs: Attributes) -> Html {
        self.input("text", Some(name), value, attrs)
    }

    /// Password input; the value is always left empty.
    pub fn password(&mut self, name: &str, attrs: Attributes) -> Html {
        self.input("password", Some(name), Some(FieldValue::empty()), attrs)
    }

    pub fn hidden(&mut self, name: &str, value: Option<FieldValue>, attrs: Attributes) -> Html {
        self.input("hidden", Some(name), value, attrs)
    }

    pub fn email(&mut self, name: &str, value: Option<FieldValue>, attrs: Attributes) -> Html {
        self.input("email", Some(name), value, attrs)
    }

    pub fn tel(&mut self, name: &str, value: Option<FieldValue>, attrs: Attributes) -> Html {
        self.input("tel", Some(name), value, attrs)
    }

    pub fn number(&mut self, name: &str, value: Option<FieldValue>, attrs: Attributes) -> Html {
        self.input("number", Some(name), value, attrs)
    }

    /// Date input; temporal values format as `YYYY-MM-DD`.
    pub fn date(&mut self, name: &str, value: Option<FieldValue>, attrs: Attributes) -> Html {
        self.input("date", Some(name), value.map(format_date), attrs)
    }

    /// Datetime input; temporal values format as RFC 3339.
    pub fn datetime(&mut self, name: &str, value: Option<FieldValue>, attrs: Attributes) -> Html {
        self.input("datetime", Some(name), value.map(format_datetime), attrs)
    }

    /// Local datetime input; temporal values format as `YYYY-MM-DDTHH:mm`.
    pub fn datetime_local(
        &mut self,
        name: &str,
        value: Option<FieldValue>,
        attrs: Attributes,
    ) -> Html {
        self.input(
            "datetime-local",
            Some(name),
            value.map(format_datetime_local),
            attrs,
        )
    }

    pub fn time(&mut self, name: &str, value: Option<FieldValue>, attrs: Attributes) -> Html {
        self.input("time", Some(name), value, attrs)
    }

    pub fn url(&mut self, name: &str, value: Option<FieldValue>, attrs: Attributes) -> Html {
        self.input("url", Some(name), value, attrs)
    }

    /// File input; never carries a value.
    pub fn file(&mut self, name: &str, attrs: Attributes) -> Html {
        self.input("file", Some(name), None, attrs)
    }

    pub fn color(&mut self, name: &str, value: Option<FieldValue>, attrs: Attributes) -> Html {
        self.input("color", Some(name), value, attrs)
    }

    /// Image input; the caller resolves `src` (usually an asset URL).
    pub fn image_input(&mut self, src: &str, name: Option<&str>, mut attrs: Attributes) -> Html {
        attrs.set("src", src);
        self.input("image", name, None, attrs)
    }

    /// `<textarea>`; a `size="COLSxROWS"` shorthand overrides the discrete
    /// cols/rows attributes, which otherwise default to 50×10.
    pub fn textarea(&mut self, name: &str, value: Option<FieldValue>, mut attrs: Attributes) -> Html {
        if !attrs.contains("name") {
            attrs.set("name", name);
        }

        set_textarea_size(&mut attrs);

        let id = self.id_attribute(Some(name), &attrs);
        attrs.set_opt("id", id);

        let value = self
            .values
            .resolve(Some(name), value.as_ref())
            .map(|value| value.to_display_string())
            .unwrap_or_default();

        attrs.remove("size");

        Html::raw(format!(
            "<textarea{}>{}</textarea>",
            attrs.to_html(),
            escape(&value)
        ))
    }

    /// `<select>` with option groups, an optional placeholder option, and
    /// multi-select membership. Selection goes through the value chain and
    /// compares as strings.
    pub fn select(
        &mut self,
        name: &str,
        options: &[OptionEntry],
        selected: Option<FieldValue>,
        mut attrs: Attributes,
    ) -> Html {
        let selection = Selection::from(self.values.resolve(Some(name), selected.as_ref()));

        let id = self.id_attribute(Some(name), &attrs);
        attrs.set_opt("id", id);
        if !attrs.contains("name") {
            attrs.set("name", name);
        }

        let mut body = String::new();
        if let Some(placeholder) = attrs.get("placeholder").map(str::to_string) {
            attrs.remove("placeholder");
            body.push_str(placeholder_option(&placeholder, &selection).as_str());
        }
        for entry in options {
            body.push_str(select_entry(entry, &selection).as_str());
        }

        Html::raw(format!("<select{}>{}</select>", attrs.to_html(), body))
    }

    /// Select of consecutive integers, label equal to value.
    pub fn select_range(
        &mut self,
        name: &str,
        begin: i64,
        end: i64,
        selected: Option<FieldValue>,
        attrs: Attributes,
    ) -> Html {
        let options: Vec<OptionEntry> = (begin..=end)
            .map(|number| OptionEntry::Item {
                value: number.to_string(),
                label: number.to_string(),
            })
            .collect();
        self.select(name, &options, selected, attrs)
    }

    pub fn select_year(
        &mut self,
        name: &str,
        begin: i64,
        end: i64,
        selected: Option<FieldValue>,
        attrs: Attributes,
    ) -> Html {
        self.select_range(name, begin, end, selected, attrs)
    }

    /// Month select, values 1–12 with English month names.
    pub fn select_month(
        &mut self,
        name: &str,
        selected: Option<FieldValue>,
        attrs: Attributes,
    ) -> Html {
        let options: Vec<OptionEntry> = (1..=12u8)
            .map(|number| OptionEntry::Item {
                value: number.to_string(),
                label: time::Month::try_from(number)
                    .expect("month ordinal in range")
                    .to_string(),
            })
            .collect();
        self.select(name, &options, selected, attrs)
    }

    /// Checkbox; the element value defaults to `1`.
    pub fn checkbox(
        &mut self,
        name: &str,
        value: Option<&str>,
        checked: Option<bool>,
        attrs: Attributes,
    ) -> Html {
        let value = value.unwrap_or("1").to_string();
        self.checkable("checkbox", name, &value, checked, attrs)
    }

    /// Radio button; the element value defaults to the field name.
    pub fn radio(
        &mut self,
        name: &str,
        value: Option<&str>,
        checked: Option<bool>,
        attrs: Attributes,
    ) -> Html {
        let value = value.unwrap_or(name).to_string();
        self.checkable("radio", name, &value, checked, attrs)
    }

    fn checkable(
        &mut self,
        kind: &str,
        name: &str,
        value: &str,
        checked: Option<bool>,
        mut attrs: Attributes,
    ) -> Html {
        let checked = match kind {
            "checkbox" => self.values.checkbox_checked(name, value, checked),
            "radio" => self.values.radio_checked(name, value, checked),
            _ => self
                .values
                .resolve(Some(name), None)
                .is_some_and(|resolved| resolved.to_display_string() == value),
        };

        if checked {
            attrs.set("checked", "checked");
        }

        self.input(kind, Some(name), Some(FieldValue::text(value)), attrs)
    }

    /// `<button>`; the body is trusted markup per the raw-label convention.
    pub fn button(&mut self, body: &Html, mut attrs: Attributes) -> Html {
        if !attrs.contains("type") {
            attrs.set("type", "button");
        }
        Html::raw(format!("<button{}>{}</button>", attrs.to_html(), body))
    }

    /// Unnamed submit input.
    pub fn submit(&mut self, value: Option<&str>, attrs: Attributes) -> Html {
        self.input("submit", None, value.map(FieldValue::text), attrs)
    }

    /// Unnamed reset input.
    pub fn reset(&mut self, value: &str, attrs: Attributes) -> Html {
        self.input("reset", None, Some(FieldValue::text(value)), attrs)
    }

    /// Hidden CSRF token field.
    pub fn token(&mut self, csrf: &dyn CsrfTokenProvider, attrs: Attributes) -> Html {
        self.hidden("_token", Some(FieldValue::text(csrf.current_token())), attrs)
    }

    /// Explicit id attribute wins, then a previously emitted label with the
    /// same name, otherwise no id.
    fn id_attribute(&self, name: Option<&str>, attrs: &Attributes) -> Option<String> {
        if attrs.contains("id") {
            return attrs.get("id").map(str::to_string);
        }
        let name = name?;
        self.labels.contains(name).then(|| name.to_string())
    }
}

enum Selection {
    None,
    One(String),
    Many(Vec<String>),
}

impl Selection {
    fn from(resolved: Option<FieldValue>) -> Self {
        match resolved {
            None | Some(FieldValue::Json(Value::Null)) => Selection::None,
            Some(FieldValue::Json(Value::Array(items))) => {
                Selection::Many(items.iter().map(json_display).collect())
            }
            Some(value) => Selection::One(value.to_display_string()),
        }
    }

    fn contains(&self, value: &str) -> bool {
        match self {
            Selection::None => false,
            Selection::One(selected) => selected == value,
            Selection::Many(selected) => selected.iter().any(|entry| entry == value),
        }
    }
}

fn select_entry(entry: &OptionEntry, selection: &Selection) -> Html {
    match entry {
        OptionEntry::Item { value, label } => select_option(value, label, selection),
        OptionEntry::Group { label, items } => {
            let mut body = String::new();
            for item in items {
                body.push_str(select_option(&item.value, &item.label, selection).as_str());
            }
            Html::raw(format!(
                "<optgroup label=\"{}\">{}</optgroup>",
                escape(label),
                body
            ))
        }
    }
}

fn select_option(value: &str, label: &str, selection: &Selection) -> Html {
    let mut attrs = Attributes::new();
    attrs.set("value", value);
    attrs.set_opt(
        "selected",
        selection.contains(value).then(|| "selected".to_string()),
    );
    Html::raw(format!("<option{}>{}</option>", attrs.to_html(), escape(label)))
}

/// Placeholder option with an empty value, selected only while nothing else
/// resolves.
fn placeholder_option(display: &str, selection: &Selection) -> Html {
    let selected = match selection {
        Selection::None => true,
        Selection::One(selected) => selected.is_empty(),
        Selection::Many(selected) => selected.iter().any(String::is_empty),
    };

    let mut attrs = Attributes::new();
    attrs.set_opt("selected", selected.then(|| "selected".to_string()));
    attrs.set("value", "");
    Html::raw(format!(
        "<option{}>{}</option>",
        attrs.to_html(),
        escape(display)
    ))
}

fn set_textarea_size(attrs: &mut Attributes) {
    let size = attrs.get("size").map(str::to_string);
    let Some(size) = size else {
        if !attrs.contains("cols") {
            attrs.set("cols", "50");
        }
        if !attrs.contains("rows") {
            attrs.set("rows", "10");
        }
        return;
    };

    let mut segments = size.split('x');
    if let Some(cols) = segments.next() {
        attrs.set("cols", cols);
    }
    if let Some(rows) = segments.next() {
        attrs.set("rows", rows);
    }
}

fn format_date(value: FieldValue) -> FieldValue {
    match value {
        FieldValue::Date(date) => {
            FieldValue::text(date.format(formats::DATE).expect("const format description"))
        }
        FieldValue::DateTime(moment) => FieldValue::text(
            moment
                .date()
                .format(formats::DATE)
                .expect("const format description"),
        ),
        other => other,
    }
}

fn format_datetime(value: FieldValue) -> FieldValue {
    match value {
        FieldValue::Date(date) => FieldValue::text(
            date.midnight()
                .assume_utc()
                .format(&Rfc3339)
                .expect("const format description"),
        ),
        FieldValue::DateTime(moment) => {
            FieldValue::text(moment.format(&Rfc3339).expect("const format description"))
        }
        other => other,
    }
}

fn format_datetime_local(value: FieldValue) -> FieldValue {
    match value {
        FieldValue::Date(date) => FieldValue::text(
            date.midnight()
                .format(formats::DATETIME_LOCAL)
                .expect("const format description"),
        ),
        FieldValue::DateTime(moment) => FieldValue::text(
            moment
                .format(formats::DATETIME_LOCAL)
                .expect("const format description"),
        ),
        other => other,
    }
}
