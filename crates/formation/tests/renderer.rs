use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Value, json};
use time::macros::date;

use formation::{
    ConfigError, CsrfTokenProvider, CurrentUser, FieldValue, FormContext, FormEntity, FormOptions,
    Formation, OldInputSource, OptionProviderRegistry, RawField, UrlResolver, options_from_pairs,
};

struct StaticUrls;

impl UrlResolver for StaticUrls {
    fn to_path(&self, path: &str, _params: &[String], _secure: Option<bool>) -> String {
        format!("https://app.test/{}", path.trim_start_matches('/'))
    }

    fn to_route(&self, name: &str, _params: &[String]) -> String {
        format!("https://app.test/routes/{name}")
    }

    fn to_action(&self, action: &str, _params: &[String]) -> String {
        format!("https://app.test/actions/{action}")
    }

    fn asset_url(&self, path: &str, _secure: Option<bool>) -> String {
        format!("https://cdn.test/{}", path.trim_start_matches('/'))
    }

    fn current_url(&self) -> String {
        "https://app.test/current".to_string()
    }

    fn previous_url(&self) -> String {
        "https://app.test/previous".to_string()
    }
}

struct StaticToken;

impl CsrfTokenProvider for StaticToken {
    fn current_token(&self) -> String {
        "tok-123".to_string()
    }
}

struct RoleUser(bool);

impl CurrentUser for RoleUser {
    fn has_any_role(&self, _roles: &BTreeSet<String>) -> bool {
        self.0
    }
}

struct OldInput(BTreeMap<String, Value>);

impl OldInputSource for OldInput {
    fn value(&self, key: &str) -> Option<Value> {
        self.0.get(key).cloned()
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

struct Project {
    attributes: BTreeMap<String, FieldValue>,
}

impl Project {
    fn new(attributes: &[(&str, FieldValue)]) -> Self {
        Self {
            attributes: attributes
                .iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect(),
        }
    }
}

impl FormEntity for Project {
    fn attribute(&self, key: &str) -> Option<FieldValue> {
        self.attributes.get(key).cloned()
    }

    fn editable_fields(&self) -> Vec<RawField> {
        serde_json::from_value(json!([
            { "name": "first_name", "display_name": "Your first name" },
            "last_name",
            { "name": "starts_on", "type": "date" }
        ]))
        .expect("editable fields")
    }
}

struct Bare;

impl FormEntity for Bare {
    fn attribute(&self, _key: &str) -> Option<FieldValue> {
        None
    }
}

fn context<'a>(
    registry: &'a OptionProviderRegistry,
    user: Option<&'a dyn CurrentUser>,
    old_input: Option<&'a dyn OldInputSource>,
) -> FormContext<'a> {
    FormContext {
        old_input,
        current_user: user,
        urls: &StaticUrls,
        csrf: &StaticToken,
        options: registry,
    }
}

fn raw_fields(value: Value) -> Vec<RawField> {
    serde_json::from_value(value).expect("raw fields")
}

#[test]
fn render_wraps_each_field_in_the_horizontal_layout() {
    let registry = OptionProviderRegistry::new();
    let mut form = Formation::new(context(&registry, None, None));
    form.set_fields(raw_fields(json!(["email"]))).expect("fields");

    let html = form.render();
    assert!(html.as_str().contains("<div class=\"form-group\">"));
    assert!(html.as_str().contains("<div class=\"col-sm-10\">"));
    assert!(html
        .as_str()
        .contains("<label for=\"email\" class=\"col-sm-2 control-label\">Email</label>"));
    assert!(html.as_str().contains(
        "<input class=\"form-control\" name=\"email\" type=\"text\" value=\"\" id=\"email\">"
    ));
}

#[test]
fn placeholders_reach_the_rendered_input() {
    let registry = OptionProviderRegistry::new();
    let mut form = Formation::new(context(&registry, None, None));
    form.set_fields(raw_fields(json!([
        { "name": "first_name", "placeholder": "Your first name" }
    ])))
    .expect("fields");

    assert!(form
        .render()
        .as_str()
        .contains("placeholder=\"Your first name\""));
}

#[test]
fn role_restricted_fields_are_skipped_without_the_role() {
    let registry = OptionProviderRegistry::new();
    let fields = json!([
        "email",
        { "name": "internal_reference", "roles": ["admin"] }
    ]);

    let denied = RoleUser(false);
    let mut form = Formation::new(context(&registry, Some(&denied), None));
    form.set_fields(raw_fields(fields.clone())).expect("fields");
    let html = form.render();
    assert!(!html.as_str().contains("internal_reference"));
    assert!(html.as_str().contains("email"));

    let granted = RoleUser(true);
    let mut form = Formation::new(context(&registry, Some(&granted), None));
    form.set_fields(raw_fields(fields)).expect("fields");
    assert!(form.render().as_str().contains("internal_reference"));
}

#[test]
fn role_restricted_fields_are_skipped_without_a_user() {
    let registry = OptionProviderRegistry::new();
    let mut form = Formation::new(context(&registry, None, None));
    form.set_fields(raw_fields(json!([
        { "name": "internal_reference", "roles": ["admin"] }
    ])))
    .expect("fields");

    assert!(form.render().is_empty());
}

#[test]
fn binding_adopts_editable_fields_and_non_empty_values() {
    let registry = OptionProviderRegistry::new();
    let project = Project::new(&[
        ("first_name", FieldValue::text("Jane")),
        ("last_name", FieldValue::text("")),
    ]);

    let mut form = Formation::new(context(&registry, None, None));
    form.bind(&project).expect("bind");

    let fields = form.fields();
    assert_eq!(fields.len(), 3);
    assert_eq!(fields[0].value, FieldValue::text("Jane"));
    assert_eq!(fields[0].display_name, "Your first name");
    assert_eq!(fields[1].value, FieldValue::empty());

    assert!(form.render().as_str().contains("value=\"Jane\""));
}

#[test]
fn binding_an_entity_without_declarations_is_a_no_op() {
    let registry = OptionProviderRegistry::new();
    let mut form = Formation::new(context(&registry, None, None));
    form.bind(&Bare).expect("bind");

    assert!(form.fields().is_empty());
    assert!(form.render().is_empty());
}

#[test]
fn date_fields_carry_picker_attributes_and_a_formatted_default() {
    let registry = OptionProviderRegistry::new();
    let project = Project::new(&[("starts_on", FieldValue::Date(date!(2024 - 01 - 15)))]);

    let mut form = Formation::new(context(&registry, None, None));
    form.bind(&project).expect("bind");

    let html = form.render();
    assert!(html.as_str().contains("js-datepicker"));
    assert!(html.as_str().contains("data-date-format=\"DD/MMM/YYYY\""));
    assert!(html.as_str().contains("data-default-date=\"15/Jan/2024\""));
}

#[test]
fn date_fields_without_a_temporal_value_omit_the_default() {
    let registry = OptionProviderRegistry::new();
    let mut form = Formation::new(context(&registry, None, None));
    form.set_fields(raw_fields(json!([{ "name": "starts_on", "type": "date" }])))
        .expect("fields");

    assert!(!form.render().as_str().contains("data-default-date"));
}

#[test]
fn select_fields_render_their_literal_options() {
    let registry = OptionProviderRegistry::new();
    let mut form = Formation::new(context(&registry, None, None));
    form.set_fields(raw_fields(json!([
        {
            "name": "project_status_id",
            "type": "select",
            "value": "2",
            "options": [
                { "value": "1", "label": "Upcoming" },
                { "value": "2", "label": "Wireframing" }
            ]
        }
    ])))
    .expect("fields");

    let html = form.render();
    assert!(html.as_str().contains("<option value=\"1\">Upcoming</option>"));
    assert!(html
        .as_str()
        .contains("<option value=\"2\" selected=\"selected\">Wireframing</option>"));
}

#[test]
fn select_options_resolve_through_the_action_registry() {
    let mut registry = OptionProviderRegistry::new();
    registry.register_action("ProjectStatuses@all_as_list", || {
        options_from_pairs([("1", "Upcoming"), ("2", "Wireframing")])
    });

    let mut form = Formation::new(context(&registry, None, None));
    form.set_fields(raw_fields(json!([
        {
            "name": "project_status_id",
            "type": "select",
            "options_action": "ProjectStatuses@all_as_list"
        }
    ])))
    .expect("fields");

    assert!(form.render().as_str().contains("Wireframing"));
}

#[test]
fn entity_option_records_reduce_to_id_name_pairs() {
    let mut registry = OptionProviderRegistry::new();
    registry.register_entity("ProjectStatuses", || {
        vec![
            json!({ "id": 1, "name": "Upcoming" }),
            json!({ "id": 2, "name": "Done" }),
        ]
    });

    let mut form = Formation::new(context(&registry, None, None));
    form.set_fields(raw_fields(json!([
        {
            "name": "project_status_id",
            "type": "select",
            "options_entity": "ProjectStatuses"
        }
    ])))
    .expect("fields");

    let html = form.render();
    assert!(html.as_str().contains("<option value=\"1\">Upcoming</option>"));
    assert!(html.as_str().contains("<option value=\"2\">Done</option>"));
}

#[test]
fn unregistered_option_providers_fail_field_construction() {
    let registry = OptionProviderRegistry::new();
    let mut form = Formation::new(context(&registry, None, None));

    let error = form
        .set_fields(raw_fields(json!([
            {
                "name": "project_status_id",
                "type": "select",
                "options_action": "Missing@provider"
            }
        ])))
        .expect_err("unregistered provider");
    assert!(matches!(error, ConfigError::UnregisteredProvider { .. }));
}

#[test]
fn malformed_action_references_fail_field_construction() {
    let registry = OptionProviderRegistry::new();
    let mut form = Formation::new(context(&registry, None, None));

    let error = form
        .set_fields(raw_fields(json!([
            {
                "name": "project_status_id",
                "type": "select",
                "options_action": "not-a-reference"
            }
        ])))
        .expect_err("malformed reference");
    assert!(matches!(error, ConfigError::InvalidActionReference { .. }));
}

#[test]
fn unknown_kinds_render_literally_typed_inputs() {
    let registry = OptionProviderRegistry::new();
    let mut form = Formation::new(context(&registry, None, None));
    form.set_fields(raw_fields(json!([{ "name": "volume", "type": "range" }])))
        .expect("fields");

    assert!(form
        .render()
        .as_str()
        .contains("<input class=\"form-control\" name=\"volume\" type=\"range\""));
}

#[test]
fn old_input_repopulates_rendered_fields() {
    let registry = OptionProviderRegistry::new();
    let old = OldInput(
        [("first_name".to_string(), json!("Replayed"))]
            .into_iter()
            .collect(),
    );

    let mut form = Formation::new(context(&registry, None, Some(&old)));
    form.set_fields(raw_fields(json!(["first_name"]))).expect("fields");

    assert!(form.render().as_str().contains("value=\"Replayed\""));
}

#[test]
fn render_submit_links_back_to_the_previous_request() {
    let registry = OptionProviderRegistry::new();
    let form = Formation::new(context(&registry, None, None));

    let html = form.render_submit();
    assert!(html.as_str().contains(
        "<a href=\"https://app.test/previous\" class=\"btn btn-default pull-right\">Cancel</a>"
    ));
    assert!(html.as_str().contains(
        "<button type=\"submit\" class=\"btn btn-success text-right\">Save</button>"
    ));
}

#[test]
fn open_spoofs_non_get_methods_and_appends_the_token() {
    let registry = OptionProviderRegistry::new();
    let form = Formation::new(context(&registry, None, None));

    let html = form.open(FormOptions {
        method: Some("put".to_string()),
        url: Some("projects/1".to_string()),
        ..FormOptions::default()
    });

    assert!(html.as_str().starts_with(
        "<form method=\"POST\" action=\"https://app.test/projects/1\" accept-charset=\"UTF-8\">"
    ));
    assert!(html
        .as_str()
        .contains("<input name=\"_method\" type=\"hidden\" value=\"PUT\">"));
    assert!(html
        .as_str()
        .contains("<input name=\"_token\" type=\"hidden\" value=\"tok-123\">"));
}

#[test]
fn open_with_get_omits_spoofing_and_the_token() {
    let registry = OptionProviderRegistry::new();
    let form = Formation::new(context(&registry, None, None));

    let html = form.open(FormOptions {
        method: Some("GET".to_string()),
        ..FormOptions::default()
    });

    assert!(html.as_str().contains("method=\"GET\""));
    assert!(html.as_str().contains("action=\"https://app.test/current\""));
    assert!(!html.as_str().contains("_method"));
    assert!(!html.as_str().contains("_token"));
}

#[test]
fn open_marks_file_forms_as_multipart() {
    let registry = OptionProviderRegistry::new();
    let form = Formation::new(context(&registry, None, None));

    let html = form.open(FormOptions {
        files: true,
        ..FormOptions::default()
    });
    assert!(html.as_str().contains("enctype=\"multipart/form-data\""));
    assert_eq!(form.close().as_str(), "</form>");
}
