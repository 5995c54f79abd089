pub mod documents;
pub mod notify;
pub mod payment;

/// Error taxonomy shared by every service in the engine. The HTTP layer maps
/// each variant to a status code; callers can rely on the distinction when
/// deciding whether a retry is safe.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Malformed or missing input. Never retried automatically.
    #[error("validation failed: {0}")]
    Validation(String),
    /// A referenced entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// Inventory race lost or duplicate in-flight payment. Re-read state
    /// before retrying.
    #[error("conflict: {0}")]
    Conflict(String),
    /// The payment gateway was unreachable or answered non-success. Safe to
    /// retry with backoff. The message carries the raw upstream body for
    /// operator diagnosis; it is never parsed as structured data.
    #[error("upstream gateway error: {0}")]
    Upstream(String),
    /// Unexpected failure. The enclosing transaction was rolled back.
    #[error("internal error: {0}")]
    Internal(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
