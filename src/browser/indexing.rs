use log::{debug, info, warn};
use sharetree_remote_api::Scope;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::Browser;

impl Browser {
    /// Start building the backend index for the current connection and poll
    /// it until it settles. A no-op without an indexable connection or when a
    /// job was already started.
    pub fn start_indexing(&self) -> bool {
        let (scope, generation, token) = {
            let mut state = self.state_mut();
            let Some(scope) = state.session.index_scope() else {
                return false;
            };
            let Some((generation, token)) = state.index.start() else {
                return false;
            };
            (scope, generation, token)
        };
        self.spawn_index_job(scope, generation, token, false);
        true
    }

    /// Drop the backend index and build it again from zero.
    pub fn clear_index(&self) -> bool {
        let (scope, generation, token) = {
            let mut state = self.state_mut();
            let Some(scope) = state.session.index_scope() else {
                return false;
            };
            let (generation, token) = state.index.restart();
            (scope, generation, token)
        };
        self.spawn_index_job(scope, generation, token, true);
        true
    }

    fn spawn_index_job(
        &self,
        scope: Scope,
        generation: u64,
        token: CancellationToken,
        clear: bool,
    ) {
        let browser = self.clone();
        tokio::task::spawn_local(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => debug!("index job {generation} stopped"),
                _ = browser.run_index_job(&scope, generation, clear) => {}
            }
        });
    }

    async fn run_index_job(&self, scope: &Scope, generation: u64, clear: bool) {
        if clear && let Err(err) = self.remote.clear_index(scope).await {
            warn!("clearing the index failed: {err}");
        }

        match self.remote.start_index(scope).await {
            Ok(ack) => {
                info!("indexing started");
                if self
                    .state_mut()
                    .index
                    .apply_status(generation, ack, Instant::now())
                {
                    return;
                }
            }
            Err(err) => {
                warn!("starting the index failed: {err}");
                self.state_mut().index.fail(generation);
                return;
            }
        }

        loop {
            tokio::time::sleep(self.options.poll_interval).await;
            match self.remote.index_status().await {
                Ok(status) => {
                    let mut state = self.state_mut();
                    if !state.index.is_current(generation) {
                        return;
                    }
                    if state.index.apply_status(generation, status, Instant::now()) {
                        info!(
                            "index {:?}: {} files, {} skipped",
                            state.index.state(),
                            status.processed,
                            status.errors
                        );
                        return;
                    }
                }
                Err(err) => debug!("index status poll failed: {err}"),
            }
        }
    }
}
