use thiserror::Error;

/// Failure reported by a [`RemoteHierarchy`](crate::RemoteHierarchy) call.
///
/// Every variant renders a message that can be shown to the user as-is.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    /// The backend answered but rejected the request (denied access, missing
    /// path, bad credentials).
    #[error("{message}")]
    Backend { status: Option<u16>, message: String },

    /// The backend could not be reached or the exchange was interrupted.
    #[error("connection failed: {0}")]
    Transport(String),

    /// The backend answered with a body that does not follow the contract.
    #[error("unexpected response: {0}")]
    Protocol(String),

    /// The operation cannot be expressed for the given scope.
    #[error("{0}")]
    Unsupported(String),
}

impl RemoteError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self::Backend {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Whether the failure came from the transport rather than the backend.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
