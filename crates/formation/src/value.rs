use serde_json::Value;
use time::{Date, OffsetDateTime};

use crate::sources::{FormEntity, OldInputSource};

/// Fixed format descriptions used by the temporal element builders.
pub(crate) mod formats {
    use time::format_description::BorrowedFormatItem;
    use time::macros::format_description;

    pub const DATE: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
    pub const DATETIME_LOCAL: &[BorrowedFormatItem<'_>] =
        format_description!("[year]-[month]-[day]T[hour]:[minute]");
    pub const PICKER_DATE: &[BorrowedFormatItem<'_>] =
        format_description!("[day]/[month repr:short]/[year]");
}

/// A configured or resolved field value.
///
/// Most values travel as JSON; the temporal variants keep their type so the
/// date inputs can apply their fixed formats.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Json(Value),
    Date(Date),
    DateTime(OffsetDateTime),
}

impl FieldValue {
    /// Empty string value, the normalization default.
    pub fn empty() -> Self {
        FieldValue::Json(Value::String(String::new()))
    }

    pub fn text(text: impl Into<String>) -> Self {
        FieldValue::Json(Value::String(text.into()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Json(Value::Null))
    }

    /// Emptiness follows submitted-form conventions: `null`, `""`, `"0"`,
    /// `0`, `false`, and empty containers all count as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Json(value) => json_is_empty(value),
            FieldValue::Date(_) | FieldValue::DateTime(_) => false,
        }
    }

    pub(crate) fn is_truthy(&self) -> bool {
        !self.is_empty()
    }

    /// String form used for attribute output and selection comparison.
    pub fn to_display_string(&self) -> String {
        match self {
            FieldValue::Json(value) => json_display(value),
            FieldValue::Date(date) => date
                .format(formats::DATE)
                .expect("const format description"),
            FieldValue::DateTime(moment) => moment
                .format(&time::format_description::well_known::Rfc3339)
                .expect("const format description"),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::Json(value)
    }
}

pub(crate) fn json_display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(num) => num.to_string(),
        other => other.to_string(),
    }
}

fn json_is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(num) => num.as_f64().is_some_and(|n| n == 0.0),
        Value::String(text) => text.is_empty() || text == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Canonicalizes array-style field names for lookups: `foo[bar]` becomes
/// `foo.bar` and `foo[]` becomes `foo`, while literal dots turn into
/// underscores first.
pub fn transform_key(key: &str) -> String {
    key.replace('.', "_")
        .replace("[]", "")
        .replace('[', ".")
        .replace(']', "")
}

/// Value-resolution context over the optional old-input and entity sources.
///
/// Precedence for named fields: replayed old input, then the explicit value,
/// then the bound entity. Unnamed fields always keep their explicit value.
#[derive(Clone, Copy, Default)]
pub struct ValueContext<'a> {
    old_input: Option<&'a dyn OldInputSource>,
    entity: Option<&'a dyn FormEntity>,
}

impl<'a> ValueContext<'a> {
    pub fn new(
        old_input: Option<&'a dyn OldInputSource>,
        entity: Option<&'a dyn FormEntity>,
    ) -> Self {
        Self { old_input, entity }
    }

    /// Context without any sources; resolution only sees explicit values.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Replayed value for a field, if input was flashed and the key survived.
    pub fn old(&self, name: &str) -> Option<Value> {
        self.old_input
            .and_then(|source| source.value(&transform_key(name)))
            .filter(|value| !value.is_null())
    }

    /// Resolves the effective value for a field.
    pub fn resolve(&self, name: Option<&str>, explicit: Option<&FieldValue>) -> Option<FieldValue> {
        let Some(name) = name else {
            return explicit.cloned();
        };

        if let Some(old) = self.old(name) {
            return Some(FieldValue::Json(old));
        }

        if let Some(value) = explicit.filter(|value| !value.is_null()) {
            return Some(value.clone());
        }

        self.entity_value(name)
    }

    /// Checked state for a checkbox.
    ///
    /// Flashed input that is non-empty overall but missing this key means
    /// the form was submitted with the box off. When neither old input nor
    /// the entity knows the field, the caller-supplied default applies.
    pub fn checkbox_checked(&self, name: &str, value: &str, checked: Option<bool>) -> bool {
        if let Some(old_input) = self.old_input
            && !old_input.is_empty()
            && self.old(name).is_none()
        {
            return false;
        }

        if self.missing_old_and_entity(name) {
            return checked.unwrap_or(false);
        }

        let explicit = checked.map(|flag| FieldValue::Json(Value::Bool(flag)));
        let Some(posted) = self.resolve(Some(name), explicit.as_ref()) else {
            return false;
        };

        match posted {
            FieldValue::Json(Value::Array(items)) => items.iter().any(|item| match item {
                Value::Object(record) => {
                    record.get("id").map(json_display).as_deref() == Some(value)
                }
                other => json_display(other) == value,
            }),
            other => other.is_truthy(),
        }
    }

    /// Checked state for a radio button: default when both sources miss,
    /// otherwise a string comparison against the candidate value.
    pub fn radio_checked(&self, name: &str, value: &str, checked: Option<bool>) -> bool {
        if self.missing_old_and_entity(name) {
            return checked.unwrap_or(false);
        }

        self.resolve(Some(name), None)
            .is_some_and(|resolved| resolved.to_display_string() == value)
    }

    fn entity_value(&self, name: &str) -> Option<FieldValue> {
        self.entity
            .and_then(|entity| entity.form_value(&transform_key(name)))
    }

    fn missing_old_and_entity(&self, name: &str) -> bool {
        self.old(name).is_none() && self.entity_value(name).is_none()
    }
}
