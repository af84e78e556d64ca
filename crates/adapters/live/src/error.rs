//! Live adapter error types.

/// Errors raised while constructing the live adapter.
#[derive(Debug, thiserror::Error)]
pub enum LiveError {
    /// Commands are dispatched onto a tokio task; there must be a runtime.
    #[error("the live location manager must be created inside a tokio runtime")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}
