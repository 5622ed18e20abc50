//! Field normalization: raw declarations into canonical descriptors.

use std::collections::BTreeSet;

use crate::config::{FieldConfig, FieldKind, OptionEntry, RawField};
use crate::error::ConfigError;
use crate::value::FieldValue;

/// Normalized field record consumed by the renderer.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    pub display_name: String,
    pub value: FieldValue,
    pub placeholder: String,
    pub options: Option<Vec<OptionEntry>>,
    pub options_action: Option<String>,
    pub options_entity: Option<String>,
    pub roles: Option<BTreeSet<String>>,
}

impl FieldDescriptor {
    fn from_name(name: String) -> Self {
        let display_name = derive_display_name(&name);
        Self {
            name,
            kind: FieldKind::Text,
            display_name,
            value: FieldValue::empty(),
            placeholder: String::new(),
            options: None,
            options_action: None,
            options_entity: None,
            roles: None,
        }
    }
}

/// Normalizes raw declarations in order.
///
/// Bare strings become text fields with a derived label; map entries get
/// their defaults filled in, and entries without a name are skipped. A
/// select without any option source fails construction.
pub fn normalize(raw_fields: Vec<RawField>) -> Result<Vec<FieldDescriptor>, ConfigError> {
    let mut fields = Vec::new();
    for raw in raw_fields {
        match raw {
            RawField::Name(name) => fields.push(FieldDescriptor::from_name(name)),
            RawField::Config(config) => {
                if config.name.is_empty() {
                    continue;
                }
                fields.push(normalize_config(config)?);
            }
        }
    }
    Ok(fields)
}

fn normalize_config(config: FieldConfig) -> Result<FieldDescriptor, ConfigError> {
    let kind = config.kind.unwrap_or_default();
    let options = config.options.filter(|options| !options.is_empty());

    if kind == FieldKind::Select
        && options.is_none()
        && config.options_action.is_none()
        && config.options_entity.is_none()
    {
        return Err(ConfigError::MissingOptionSource { name: config.name });
    }

    let display_name = config
        .display_name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| derive_display_name(&config.name));

    let value = if config.value.is_null() {
        FieldValue::empty()
    } else {
        FieldValue::Json(config.value)
    };

    Ok(FieldDescriptor {
        name: config.name,
        kind,
        display_name,
        value,
        placeholder: config.placeholder.unwrap_or_default(),
        options,
        options_action: config.options_action,
        options_entity: config.options_entity,
        roles: config.roles,
    })
}

/// Derives a display label from a snake_case field name: words reversed and
/// title-cased, per the legacy labelling convention.
fn derive_display_name(name: &str) -> String {
    let mut words: Vec<&str> = name.split('_').filter(|word| !word.is_empty()).collect();
    words.reverse();
    words
        .iter()
        .map(|word| title_case_word(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Plain humanization used by label fallbacks: underscores to spaces, each
/// word title-cased, order preserved.
pub(crate) fn humanize(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
