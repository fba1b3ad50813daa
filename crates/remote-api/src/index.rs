use serde::{Deserialize, Serialize};

/// Lifecycle of the backend's background index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexState {
    #[default]
    Idle,
    Indexing,
    Ready,
    Error,
}

impl IndexState {
    /// Parse the status string used on the wire. Unknown values map to `None`.
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "idle" => Some(Self::Idle),
            "indexing" | "started" => Some(Self::Indexing),
            "ready" => Some(Self::Ready),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Error)
    }
}

/// Snapshot of an index job.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IndexJob {
    pub state: IndexState,
    pub processed: u64,
    pub errors: u64,
    pub elapsed_secs: Option<f64>,
}

impl IndexJob {
    #[must_use]
    pub fn new(state: IndexState, processed: u64) -> Self {
        Self {
            state,
            processed,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn indexing(processed: u64) -> Self {
        Self::new(IndexState::Indexing, processed)
    }

    #[must_use]
    pub fn ready(processed: u64) -> Self {
        Self::new(IndexState::Ready, processed)
    }
}
