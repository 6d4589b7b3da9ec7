use thiserror::Error;

/// Virtual resource backing errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// No entry is registered for the resource.
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// A deliberately-unimplemented capability was invoked.
    ///
    /// The backing serves lazily computed read-only content; mutation is
    /// signaled distinctly rather than silently ignored.
    #[error("unsupported operation: {operation}")]
    Unsupported {
        /// The operation that is not implemented.
        operation: &'static str,
    },

    /// A content provider failed to produce its content.
    #[error("content provider failed: {0}")]
    Provider(String),
}

/// Convenience result type for backing operations.
pub type FsResult<T> = Result<T, FsError>;
