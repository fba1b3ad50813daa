//! Client-side view of the backend's background index.
//!
//! The coordinator owns the `idle -> indexing -> ready | error` machine and
//! the token of the polling task. Status reports are only accepted while
//! indexing and only from the current job, so a late poll can never move the
//! machine backwards or skip the indexing state.

use std::time::Duration;

use sharetree_remote_api::{IndexJob, IndexState};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Presentation of the index state for the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexBadge {
    pub state: IndexState,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct IndexCoordinator {
    job: IndexJob,
    generation: u64,
    poller: Option<CancellationToken>,
    ready_at: Option<Instant>,
}

impl IndexCoordinator {
    pub fn state(&self) -> IndexState {
        self.job.state
    }

    pub fn processed(&self) -> u64 {
        self.job.processed
    }

    pub fn job(&self) -> IndexJob {
        self.job
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_some()
    }

    /// `idle -> indexing`. Returns the job generation and the token that stops
    /// its polling task.
    pub fn start(&mut self) -> Option<(u64, CancellationToken)> {
        if self.job.state != IndexState::Idle {
            return None;
        }
        Some(self.begin_job())
    }

    /// Throw away the current index and begin again with a zero count.
    pub fn restart(&mut self) -> (u64, CancellationToken) {
        self.begin_job()
    }

    fn begin_job(&mut self) -> (u64, CancellationToken) {
        self.stop_polling();
        self.generation = self.generation.wrapping_add(1);
        self.job = IndexJob::indexing(0);
        self.ready_at = None;
        let token = CancellationToken::new();
        self.poller = Some(token.clone());
        (self.generation, token)
    }

    /// Any state back to idle; used when a new connection starts.
    pub fn reset(&mut self) {
        self.stop_polling();
        self.generation = self.generation.wrapping_add(1);
        self.job = IndexJob::default();
        self.ready_at = None;
    }

    /// Merge a status report. Returns `true` once the job reached a terminal
    /// state and polling should end.
    pub fn apply_status(&mut self, generation: u64, status: IndexJob, now: Instant) -> bool {
        if !self.is_current(generation) || self.job.state != IndexState::Indexing {
            return false;
        }
        self.job.processed = status.processed;
        self.job.errors = status.errors;
        self.job.elapsed_secs = status.elapsed_secs;
        match status.state {
            IndexState::Ready => {
                self.job.state = IndexState::Ready;
                self.ready_at = Some(now);
            }
            IndexState::Error => self.job.state = IndexState::Error,
            IndexState::Idle | IndexState::Indexing => return false,
        }
        self.stop_polling();
        true
    }

    /// The job could not be started.
    pub fn fail(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) || self.job.state != IndexState::Indexing {
            return false;
        }
        self.job.state = IndexState::Error;
        self.stop_polling();
        true
    }

    fn stop_polling(&mut self) {
        if let Some(token) = self.poller.take() {
            token.cancel();
        }
    }

    /// Header badge, if one should be shown at `now`. The ready badge fades
    /// after `ready_fade` while the state itself stays ready.
    pub fn badge(&self, now: Instant, ready_fade: Duration) -> Option<IndexBadge> {
        let text = match self.job.state {
            IndexState::Idle => return None,
            IndexState::Indexing => {
                format!("Indexing... {} files", group_thousands(self.job.processed))
            }
            IndexState::Ready => {
                let shown_until = self.ready_at? + ready_fade;
                if now >= shown_until {
                    return None;
                }
                let mut text = format!("{} files indexed", group_thousands(self.job.processed));
                if self.job.errors > 0 {
                    text.push_str(&format!(", {} skipped", group_thousands(self.job.errors)));
                }
                text
            }
            IndexState::Error => "Index error".to_string(),
        };
        Some(IndexBadge {
            state: self.job.state,
            text,
        })
    }
}

/// `1234567` -> `1,234,567`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
