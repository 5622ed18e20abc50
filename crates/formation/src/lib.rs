#![allow(missing_docs)]

//! Declarative HTML form construction with submitted-input replay.
//!
//! Field declarations normalize into canonical descriptors, values resolve
//! through old input, explicit defaults, and a bound entity, and the
//! [`Formation`] renderer composes element markup with horizontal-layout
//! wrappers. Generic HTML helpers live in the `formation-html` crate.

pub mod config;
pub mod elements;
pub mod error;
pub mod registry;
pub mod renderer;
pub mod schema;
pub mod sources;
pub mod value;

pub use formation_html::{Attributes, Html, UrlResolver};

pub use config::{
    FieldConfig, FieldKind, OptionEntry, RawField, SelectItem, options_from_pairs,
};
pub use elements::ElementBuilder;
pub use error::ConfigError;
pub use registry::OptionProviderRegistry;
pub use renderer::{FormContext, FormOptions, Formation};
pub use schema::{FieldDescriptor, normalize};
pub use sources::{CsrfTokenProvider, CurrentUser, FormEntity, OldInputSource};
pub use value::{FieldValue, ValueContext, transform_key};
