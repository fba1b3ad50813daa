use std::time::Duration;

use sharetree_remote_api::{DEFAULT_RESULT_LIMIT, IndexState};

/// Timings and switches for a [`Browser`](super::Browser).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserOptions {
    pub search_limit: usize,
    /// Debounce while the index is building or ready.
    pub debounce_indexed: Duration,
    /// Debounce when searches walk the share live.
    pub debounce_live: Duration,
    pub poll_interval: Duration,
    /// How long a navigated-to node stays marked active.
    pub highlight: Duration,
    /// How long the ready badge stays visible.
    pub ready_fade: Duration,
    pub auto_index: bool,
    pub expand_first: bool,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            search_limit: DEFAULT_RESULT_LIMIT,
            debounce_indexed: Duration::from_millis(50),
            debounce_live: Duration::from_millis(300),
            poll_interval: Duration::from_millis(500),
            highlight: Duration::from_secs(2),
            ready_fade: Duration::from_secs(4),
            auto_index: true,
            expand_first: true,
        }
    }
}

impl BrowserOptions {
    pub fn debounce_for(&self, index: IndexState) -> Duration {
        match index {
            IndexState::Indexing | IndexState::Ready => self.debounce_indexed,
            IndexState::Idle | IndexState::Error => self.debounce_live,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debounce_shortens_once_an_index_exists() {
        let options = BrowserOptions::default();
        assert_eq!(options.debounce_for(IndexState::Ready), Duration::from_millis(50));
        assert_eq!(options.debounce_for(IndexState::Indexing), Duration::from_millis(50));
        assert_eq!(options.debounce_for(IndexState::Idle), Duration::from_millis(300));
        assert_eq!(options.debounce_for(IndexState::Error), Duration::from_millis(300));
    }
}
