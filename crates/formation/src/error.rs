use thiserror::Error;

/// Configuration failures surfaced while constructing form fields.
///
/// These are fatal to the field being built and are reported before any
/// markup is produced; lookup misses during value resolution are normal
/// fall-through, not errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A select field declared neither literal options nor a source reference.
    #[error("select field '{name}' needs `options`, `options_action`, or `options_entity`")]
    MissingOptionSource { name: String },

    /// An action reference did not match the `Provider@method` form.
    #[error("invalid options action reference '{reference}'")]
    InvalidActionReference { reference: String },

    /// An action or entity reference named a provider that was never registered.
    #[error("no option provider registered for '{key}'")]
    UnregisteredProvider { key: String },
}
