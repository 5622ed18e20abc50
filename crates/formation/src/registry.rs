use std::collections::BTreeMap;

use serde_json::Value;

use crate::config::OptionEntry;
use crate::error::ConfigError;
use crate::value::json_display;

type ActionProvider = Box<dyn Fn() -> Vec<OptionEntry>>;
type EntityProvider = Box<dyn Fn() -> Vec<Value>>;

/// Registry mapping option-source references to concrete providers.
///
/// Action references use the `Provider@method` form and yield ready option
/// lists; entity references yield raw records that reduce to id→name
/// options. Registration happens at application setup, resolution before a
/// form starts rendering. Unregistered references are configuration errors.
#[derive(Default)]
pub struct OptionProviderRegistry {
    actions: BTreeMap<String, ActionProvider>,
    entities: BTreeMap<String, EntityProvider>,
}

impl OptionProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the provider behind a `Provider@method` action reference.
    pub fn register_action(
        &mut self,
        reference: impl Into<String>,
        provider: impl Fn() -> Vec<OptionEntry> + 'static,
    ) {
        self.actions.insert(reference.into(), Box::new(provider));
    }

    /// Registers the record source behind an entity reference.
    pub fn register_entity(
        &mut self,
        name: impl Into<String>,
        provider: impl Fn() -> Vec<Value> + 'static,
    ) {
        self.entities.insert(name.into(), Box::new(provider));
    }

    /// Resolves an action reference into its option list.
    pub fn action_options(&self, reference: &str) -> Result<Vec<OptionEntry>, ConfigError> {
        let well_formed = reference
            .split_once('@')
            .is_some_and(|(class, method)| !class.is_empty() && !method.is_empty());
        if !well_formed {
            return Err(ConfigError::InvalidActionReference {
                reference: reference.to_string(),
            });
        }

        let provider = self
            .actions
            .get(reference)
            .ok_or_else(|| ConfigError::UnregisteredProvider {
                key: reference.to_string(),
            })?;
        Ok(provider())
    }

    /// Resolves an entity reference, reducing its records to id→name options.
    pub fn entity_options(&self, entity: &str) -> Result<Vec<OptionEntry>, ConfigError> {
        let provider = self
            .entities
            .get(entity)
            .ok_or_else(|| ConfigError::UnregisteredProvider {
                key: entity.to_string(),
            })?;

        Ok(provider().iter().filter_map(record_option).collect())
    }
}

fn record_option(record: &Value) -> Option<OptionEntry> {
    let id = record.get("id")?;
    let name = record.get("name")?;
    Some(OptionEntry::Item {
        value: json_display(id),
        label: json_display(name),
    })
}
