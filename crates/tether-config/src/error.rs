use thiserror::Error;

/// Configuration bridge errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The bridge was accessed before `initialize_configuration`.
    ///
    /// This is a precondition violation: callers are contractually required
    /// to have awaited initialization first. It is fatal to the caller's
    /// current operation and is never retried.
    #[error("configuration accessed before initialization")]
    NotInitialized,

    /// An initialization or change payload had the wrong shape.
    #[error("invalid configuration payload: {0}")]
    InvalidData(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
