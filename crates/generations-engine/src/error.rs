//! Error types for the headless simulator binary.
//!
//! [`EngineError`] is the top-level error type that wraps every failure
//! mode during startup.

/// Top-level error for the simulator binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: generations_core::config::ConfigError,
    },

    /// The event catalog could not be loaded.
    #[error("catalog error: {source}")]
    Catalog {
        /// The underlying catalog error.
        #[from]
        source: generations_core::catalog::CatalogError,
    },
}
