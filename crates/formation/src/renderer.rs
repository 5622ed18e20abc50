//! The `Formation` renderer: field-set management, entity binding, and
//! horizontal-layout markup generation.

use formation_html::{Attributes, Html, UrlResolver, escape, tag, tag_join};
use tracing::debug;

use crate::config::{FieldKind, RawField};
use crate::elements::ElementBuilder;
use crate::error::ConfigError;
use crate::registry::OptionProviderRegistry;
use crate::schema::{FieldDescriptor, normalize};
use crate::sources::{CsrfTokenProvider, CurrentUser, FormEntity, OldInputSource};
use crate::value::{FieldValue, ValueContext, formats};

const LABEL_LAYOUT_CLASS: &str = "col-sm-2";
const FIELD_LAYOUT_CLASS: &str = "col-sm-10";

/// Capabilities a [`Formation`] borrows from the host for one request.
#[derive(Clone, Copy)]
pub struct FormContext<'a> {
    pub old_input: Option<&'a dyn OldInputSource>,
    pub current_user: Option<&'a dyn CurrentUser>,
    pub urls: &'a dyn UrlResolver,
    pub csrf: &'a dyn CsrfTokenProvider,
    pub options: &'a OptionProviderRegistry,
}

/// Options for the opening `<form>` tag.
///
/// The structured fields here are the reserved form options; only `attrs`
/// reaches the tag's attribute list.
#[derive(Debug, Clone, Default)]
pub struct FormOptions {
    pub method: Option<String>,
    pub url: Option<String>,
    pub route: Option<String>,
    pub action: Option<String>,
    pub params: Vec<String>,
    pub files: bool,
    pub attrs: Attributes,
}

/// Builds a whole form body from normalized field descriptors.
///
/// One instance is configured and rendered within a single request; nothing
/// is shared across render passes.
pub struct Formation<'a> {
    ctx: FormContext<'a>,
    entity: Option<&'a dyn FormEntity>,
    fields: Vec<FieldDescriptor>,
}

impl<'a> Formation<'a> {
    pub fn new(ctx: FormContext<'a>) -> Self {
        Self {
            ctx,
            entity: None,
            fields: Vec::new(),
        }
    }

    /// Normalizes the raw declarations and materializes select options, so
    /// configuration failures surface before any markup is produced.
    pub fn set_fields(&mut self, raw_fields: Vec<RawField>) -> Result<(), ConfigError> {
        let mut fields = normalize(raw_fields)?;
        for field in &mut fields {
            self.materialize_options(field)?;
        }
        self.fields = fields;
        Ok(())
    }

    /// Binds a data entity: adopts its editable-field declarations, then
    /// overwrites field defaults with the entity's non-empty attribute
    /// values. Entities without declarations leave the field set empty.
    pub fn bind(&mut self, entity: &'a dyn FormEntity) -> Result<(), ConfigError> {
        self.entity = Some(entity);
        self.set_fields(entity.editable_fields())?;
        self.apply_entity_values(entity);
        Ok(())
    }

    /// The normalized field set, in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Renders every visible field as a `form-group` row: label, control,
    /// and layout wrappers, concatenated in field order.
    pub fn render(&self) -> Html {
        let mut elements = ElementBuilder::new(self.value_context());
        let mut rendered = String::new();

        for field in &self.fields {
            if !self.visible_to_current_user(field) {
                debug!(field = %field.name, "skipping field for missing role");
                continue;
            }
            rendered.push_str(self.render_field(field, &mut elements).as_str());
        }

        Html::raw(rendered)
    }

    /// Cancel link back to the previous request plus a Save submit button.
    pub fn render_submit(&self) -> Html {
        Html::raw(format!(
            concat!(
                "<div class=\"form-group\">\n",
                "<div class=\"col-sm-10 col-sm-offset-2\">\n",
                "<a href=\"{}\" class=\"btn btn-default pull-right\">Cancel</a>\n",
                "<button type=\"submit\" class=\"btn btn-success text-right\">Save</button>\n",
                "</div>\n",
                "</div>\n",
            ),
            escape(&self.ctx.urls.previous_url())
        ))
    }

    /// Opening `<form>` tag. Non-GET methods render as POST with the real
    /// method spoofed through a hidden `_method` field, and get the CSRF
    /// token appended.
    pub fn open(&self, options: FormOptions) -> Html {
        let method = options
            .method
            .as_deref()
            .unwrap_or("POST")
            .to_uppercase();

        let mut attrs = Attributes::new();
        attrs.set("method", if method == "GET" { "GET" } else { "POST" });
        attrs.set("action", self.form_action(&options));
        attrs.set("accept-charset", "UTF-8");
        if options.files {
            attrs.set("enctype", "multipart/form-data");
        }
        attrs.merge(&options.attrs);

        Html::raw(format!(
            "<form{}>{}",
            attrs.to_html(),
            self.form_appendage(&method)
        ))
    }

    /// Closing `</form>` tag.
    pub fn close(&self) -> Html {
        Html::raw("</form>")
    }

    fn value_context(&self) -> ValueContext<'a> {
        ValueContext::new(self.ctx.old_input, self.entity)
    }

    fn materialize_options(&self, field: &mut FieldDescriptor) -> Result<(), ConfigError> {
        if field.kind != FieldKind::Select || field.options.is_some() {
            return Ok(());
        }

        if let Some(reference) = &field.options_action {
            field.options = Some(self.ctx.options.action_options(reference)?);
        } else if let Some(entity) = &field.options_entity {
            field.options = Some(self.ctx.options.entity_options(entity)?);
        }

        Ok(())
    }

    fn apply_entity_values(&mut self, entity: &dyn FormEntity) {
        for field in &mut self.fields {
            if let Some(value) = entity.attribute(&field.name)
                && !value.is_empty()
            {
                field.value = value;
            }
        }
    }

    fn visible_to_current_user(&self, field: &FieldDescriptor) -> bool {
        let Some(roles) = &field.roles else {
            return true;
        };
        match self.ctx.current_user {
            Some(user) => user.has_any_role(roles),
            None => false,
        }
    }

    fn render_field(&self, field: &FieldDescriptor, elements: &mut ElementBuilder<'_>) -> Html {
        let mut label_attrs = Attributes::new();
        label_attrs.set("class", format!("{LABEL_LAYOUT_CLASS} control-label"));
        let label = elements.label(&field.name, Some(&field.display_name), &label_attrs);

        let mut attrs = Attributes::new();
        attrs.set("class", "form-control");
        if !field.placeholder.is_empty() {
            attrs.set("placeholder", field.placeholder.clone());
        }

        let control = match &field.kind {
            FieldKind::Date => self.render_date_field(field, attrs, elements),
            FieldKind::Select => {
                let options = field.options.as_deref().unwrap_or_default();
                elements.select(&field.name, options, Some(field.value.clone()), attrs)
            }
            FieldKind::Textarea => {
                elements.textarea(&field.name, Some(field.value.clone()), attrs)
            }
            kind => elements.input(
                kind.as_str(),
                Some(&field.name),
                Some(field.value.clone()),
                attrs,
            ),
        };

        let mut wrapper_attrs = Attributes::new();
        wrapper_attrs.set("class", FIELD_LAYOUT_CLASS);
        let field_wrapper = tag("div", &control, &wrapper_attrs);

        let mut group_attrs = Attributes::new();
        group_attrs.set("class", "form-group");
        tag_join("div", &[label, field_wrapper], &group_attrs)
    }

    /// Date fields render as text inputs carrying date-picker data
    /// attributes; a temporal default travels in `data-default-date`, not
    /// the input value.
    fn render_date_field(
        &self,
        field: &FieldDescriptor,
        mut attrs: Attributes,
        elements: &mut ElementBuilder<'_>,
    ) -> Html {
        let class = attrs.get("class").map(str::to_string).unwrap_or_default();
        attrs.set("class", format!("{class} js-datepicker"));
        attrs.set("data-date-format", "DD/MMM/YYYY");

        let default_date = match &field.value {
            FieldValue::Date(date) => Some(
                date.format(formats::PICKER_DATE)
                    .expect("const format description"),
            ),
            FieldValue::DateTime(moment) => Some(
                moment
                    .date()
                    .format(formats::PICKER_DATE)
                    .expect("const format description"),
            ),
            FieldValue::Json(_) => None,
        };
        attrs.set_opt("data-default-date", default_date);

        elements.input("text", Some(&field.name), Some(FieldValue::empty()), attrs)
    }

    fn form_appendage(&self, method: &str) -> String {
        let mut elements = ElementBuilder::new(self.value_context());
        let mut appendage = String::new();

        if matches!(method, "DELETE" | "PATCH" | "PUT") {
            appendage.push_str(
                elements
                    .hidden("_method", Some(FieldValue::text(method)), Attributes::new())
                    .as_str(),
            );
        }

        if method != "GET" {
            appendage.push_str(elements.token(self.ctx.csrf, Attributes::new()).as_str());
        }

        appendage
    }

    fn form_action(&self, options: &FormOptions) -> String {
        if let Some(url) = &options.url {
            return self.ctx.urls.to_path(url, &options.params, None);
        }
        if let Some(route) = &options.route {
            return self.ctx.urls.to_route(route, &options.params);
        }
        if let Some(action) = &options.action {
            return self.ctx.urls.to_action(action, &options.params);
        }
        self.ctx.urls.current_url()
    }
}
