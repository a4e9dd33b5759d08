//! Error types for the engine binary.

/// Top-level startup error.
///
/// Each variant wraps one subsystem's error so `main` can propagate with
/// `?`. Errors after startup are logged and never stop the tick loop.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: citysim_core::config::ConfigError,
    },

    /// The snapshot on disk could not be restored.
    #[error("snapshot error: {source}")]
    Persistence {
        /// The underlying persistence error.
        #[from]
        source: citysim_core::persistence::PersistenceError,
    },

    /// The language-model oracle is misconfigured.
    #[error("oracle error: {source}")]
    Oracle {
        /// The underlying oracle error.
        #[from]
        source: citysim_oracle::LlmError,
    },

    /// The boundary API failed to start.
    #[error("observer error: {source}")]
    Observer {
        /// The underlying server error.
        #[from]
        source: citysim_observer::ServerError,
    },
}
