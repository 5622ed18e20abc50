use crate::escape::escape;

/// Ordered set of HTML attributes.
///
/// Entries keep insertion order; re-setting an existing name updates its
/// value in place. A named entry holding `None` is suppressed entirely
/// during serialization, and a bare entry serializes with its value standing
/// in for the name (`required="required"`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<AttrEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrEntry {
    Named { name: String, value: Option<String> },
    Bare { value: String },
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a named attribute.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.insert(name.into(), Some(value.into()));
    }

    /// Sets a named attribute that renders only when the value is present.
    pub fn set_opt(&mut self, name: impl Into<String>, value: Option<String>) {
        self.insert(name.into(), value);
    }

    /// Adds a bare boolean-style attribute.
    pub fn flag(&mut self, value: impl Into<String>) {
        self.entries.push(AttrEntry::Bare {
            value: value.into(),
        });
    }

    /// Value of a named attribute, when present and non-suppressed.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.iter().find_map(|entry| match entry {
            AttrEntry::Named { name: key, value } if key == name => value.as_deref(),
            _ => None,
        })
    }

    /// True when a named entry exists, suppressed or not.
    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| matches!(entry, AttrEntry::Named { name: key, .. } if key == name))
    }

    /// Removes a named entry and returns its value, if it carried one.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self
            .entries
            .iter()
            .position(|entry| matches!(entry, AttrEntry::Named { name: key, .. } if key == name))?;
        match self.entries.remove(index) {
            AttrEntry::Named { value, .. } => value,
            AttrEntry::Bare { .. } => None,
        }
    }

    /// Merges another attribute set into this one; named entries replace in
    /// place, bare entries append.
    pub fn merge(&mut self, other: &Attributes) {
        for entry in &other.entries {
            match entry {
                AttrEntry::Named { name, value } => self.insert(name.clone(), value.clone()),
                AttrEntry::Bare { value } => self.entries.push(AttrEntry::Bare {
                    value: value.clone(),
                }),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes to a space-prefixed attribute string, or an empty string
    /// when nothing renders. Values are escaped for attribute context.
    pub fn to_html(&self) -> String {
        let mut parts = Vec::new();
        for entry in &self.entries {
            match entry {
                AttrEntry::Named {
                    name,
                    value: Some(value),
                } => parts.push(format!("{}=\"{}\"", name, escape(value))),
                AttrEntry::Named { value: None, .. } => {}
                AttrEntry::Bare { value } => {
                    parts.push(format!("{}=\"{}\"", value, escape(value)));
                }
            }
        }
        if parts.is_empty() {
            String::new()
        } else {
            format!(" {}", parts.join(" "))
        }
    }

    fn insert(&mut self, name: String, value: Option<String>) {
        let position = self
            .entries
            .iter()
            .position(|entry| matches!(entry, AttrEntry::Named { name: key, .. } if *key == name));
        match position {
            Some(index) => {
                if let AttrEntry::Named { value: slot, .. } = &mut self.entries[index] {
                    *slot = value;
                }
            }
            None => self.entries.push(AttrEntry::Named { name, value }),
        }
    }
}
