use std::borrow::Cow;
use std::collections::BTreeSet;

use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Form control kinds the builder knows about.
///
/// Unknown kind strings are preserved in [`FieldKind::Other`] and render a
/// literally-typed `<input>`; validating them is the caller's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    Text,
    Date,
    Select,
    Checkbox,
    Radio,
    Hidden,
    Email,
    Number,
    Password,
    File,
    Textarea,
    Tel,
    Url,
    Time,
    Datetime,
    DatetimeLocal,
    Color,
    Other(String),
}

impl FieldKind {
    /// The literal `type` string carried into markup.
    pub fn as_str(&self) -> &str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Date => "date",
            FieldKind::Select => "select",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Radio => "radio",
            FieldKind::Hidden => "hidden",
            FieldKind::Email => "email",
            FieldKind::Number => "number",
            FieldKind::Password => "password",
            FieldKind::File => "file",
            FieldKind::Textarea => "textarea",
            FieldKind::Tel => "tel",
            FieldKind::Url => "url",
            FieldKind::Time => "time",
            FieldKind::Datetime => "datetime",
            FieldKind::DatetimeLocal => "datetime-local",
            FieldKind::Color => "color",
            FieldKind::Other(kind) => kind,
        }
    }
}

impl Default for FieldKind {
    fn default() -> Self {
        FieldKind::Text
    }
}

impl From<String> for FieldKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "text" => FieldKind::Text,
            "date" => FieldKind::Date,
            "select" => FieldKind::Select,
            "checkbox" => FieldKind::Checkbox,
            "radio" => FieldKind::Radio,
            "hidden" => FieldKind::Hidden,
            "email" => FieldKind::Email,
            "number" => FieldKind::Number,
            "password" => FieldKind::Password,
            "file" => FieldKind::File,
            "textarea" => FieldKind::Textarea,
            "tel" => FieldKind::Tel,
            "url" => FieldKind::Url,
            "time" => FieldKind::Time,
            "datetime" => FieldKind::Datetime,
            "datetime-local" => FieldKind::DatetimeLocal,
            "color" => FieldKind::Color,
            _ => FieldKind::Other(kind),
        }
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.as_str().to_string()
    }
}

impl JsonSchema for FieldKind {
    fn schema_name() -> Cow<'static, str> {
        Cow::Borrowed("FieldKind")
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        String::json_schema(generator)
    }
}

/// Raw field declaration: a bare name shorthand or a full config map.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RawField {
    Name(String),
    Config(FieldConfig),
}

/// Declarative field configuration prior to normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FieldConfig {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FieldKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<OptionEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options_entity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<BTreeSet<String>>,
}

/// One entry of a select option list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum OptionEntry {
    /// Plain `<option>`.
    Item { value: String, label: String },
    /// `<optgroup>` with nested options.
    Group { label: String, items: Vec<SelectItem> },
}

/// A single option inside an option group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SelectItem {
    pub value: String,
    pub label: String,
}

/// Builds a flat option list from value/label pairs.
pub fn options_from_pairs<V, L>(pairs: impl IntoIterator<Item = (V, L)>) -> Vec<OptionEntry>
where
    V: Into<String>,
    L: Into<String>,
{
    pairs
        .into_iter()
        .map(|(value, label)| OptionEntry::Item {
            value: value.into(),
            label: label.into(),
        })
        .collect()
}
