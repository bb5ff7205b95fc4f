//! Error types for the dry-run engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps every failure
//! mode during startup and the match run.

/// Top-level error for the engine binary.
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
        source: ringside_core::ConfigError,
    },

    /// A controller failed to start or its thread panicked.
    #[error("controller error: {source}")]
    Controller {
        /// The underlying controller error.
        #[from]
        source: ringside_core::ControllerError,
    },

    /// The blocking driver task could not be joined.
    #[error("driver error: {message}")]
    Driver {
        /// Description of the driver failure.
        message: String,
    },
}
