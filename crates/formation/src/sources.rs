use std::collections::BTreeSet;

use serde_json::Value;

use crate::config::RawField;
use crate::value::FieldValue;

/// Submitted form input replayed after a failed validation round-trip.
pub trait OldInputSource {
    /// Replayed value by transformed key.
    fn value(&self, key: &str) -> Option<Value>;

    /// True when the key survived the round-trip.
    fn contains(&self, key: &str) -> bool {
        self.value(key).is_some()
    }

    /// True when no input was flashed at all.
    fn is_empty(&self) -> bool;
}

/// Read side of the data entity a form can be bound to.
pub trait FormEntity {
    /// Current attribute value by transformed key.
    fn attribute(&self, key: &str) -> Option<FieldValue>;

    /// Override hook for entities that present form values differently from
    /// their stored attributes; preferred over raw attribute access.
    fn form_value(&self, key: &str) -> Option<FieldValue> {
        self.attribute(key)
    }

    /// Declarative editable-field config adopted when binding the entity to
    /// a form. Entities without one contribute no fields.
    fn editable_fields(&self) -> Vec<RawField> {
        Vec::new()
    }
}

/// Role lookup for the authenticated user, driving field visibility.
pub trait CurrentUser {
    fn has_any_role(&self, roles: &BTreeSet<String>) -> bool;
}

/// Issues the CSRF token embedded in non-GET forms.
pub trait CsrfTokenProvider {
    fn current_token(&self) -> String;
}
