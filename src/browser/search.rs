use log::debug;
use sharetree_remote_api::{EntryKind, KindFilter, MatchScope, RemoteError, SearchHit};
use tokio_util::sync::CancellationToken;

use super::{Browser, NavigationOutcome};
use crate::search::SearchFilters;
use crate::tree::TreePath;

impl Browser {
    /// React to a change of the search text.
    ///
    /// Supersedes any pending search. Empty text restores the tree; without
    /// an indexable connection the loaded tree is filtered locally; otherwise
    /// a remote search runs after the debounce delay.
    pub fn set_query(&self, text: &str) {
        let (generation, token) = {
            let mut state = self.state_mut();
            let generation = state.search.supersede(text);
            if state.search.trimmed().is_empty() {
                state.search.show_tree();
                return;
            }
            if state.session.index_scope().is_none() {
                let matches = state.tree.filter_loaded(state.search.trimmed());
                state.search.show_local(matches);
                return;
            }
            match state.search.arm(generation) {
                Some(token) => (generation, token),
                None => return,
            }
        };
        let browser = self.clone();
        tokio::task::spawn_local(async move {
            browser.run_search(generation, token).await;
        });
    }

    async fn run_search(&self, generation: u64, token: CancellationToken) {
        let delay = self.options.debounce_for(self.state().index.state());
        tokio::select! {
            biased;
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }

        let (scope, query) = {
            let mut state = self.state_mut();
            if !state.search.show_loading(generation) {
                return;
            }
            let Some(scope) = state.session.index_scope() else {
                state.search.show_tree();
                return;
            };
            (scope, state.search.build_query(self.options.search_limit))
        };

        debug!("searching {:?} ({})", query.text, query.scope.label());
        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!("search {:?} superseded", query.text);
                return;
            }
            outcome = self.remote.search(&scope, &query) => outcome,
        };
        if let Err(err) = &outcome {
            debug!("search {:?} failed: {err}", query.text);
        }
        self.state_mut().search.apply(generation, query, outcome);
    }

    /// Clear the query and show the tree again, cancelling anything pending.
    pub fn clear_query(&self) {
        let mut state = self.state_mut();
        state.search.supersede("");
        state.search.show_tree();
    }

    /// Run the current query again, e.g. after a failure.
    pub fn retry_search(&self) {
        let text = self.state().search.text().to_string();
        self.set_query(&text);
    }

    pub fn set_match_scope(&self, scope: MatchScope) {
        self.update_filters(|filters| filters.scope = scope);
    }

    pub fn set_kind_filter(&self, kind: KindFilter) {
        self.update_filters(|filters| filters.kind = kind);
    }

    pub fn cycle_kind_filter(&self) {
        self.update_filters(|filters| filters.kind = filters.kind.cycle());
    }

    pub fn toggle_exact(&self) {
        self.update_filters(|filters| filters.exact = !filters.exact);
    }

    fn update_filters(&self, update: impl FnOnce(&mut SearchFilters)) {
        let text = {
            let mut state = self.state_mut();
            update(state.search.filters_mut());
            state.search.text().to_string()
        };
        if !text.trim().is_empty() {
            self.set_query(&text);
        }
    }

    /// Open the hit at `index` of the current results. A leaf opens in the
    /// preview and the results stay; a container is revealed in the tree.
    pub async fn open_result(
        &self,
        index: usize,
    ) -> Result<Option<NavigationOutcome>, RemoteError> {
        let Some((hit, root)) = self.result_at(index) else {
            return Ok(None);
        };
        match hit.kind {
            EntryKind::Leaf => {
                let path = TreePath::from_relative(root, &hit.path);
                self.open_file(&path).await;
                Ok(Some(NavigationOutcome::Opened(path)))
            }
            EntryKind::Container => {
                self.clear_query();
                self.expand_to_path(&hit.path, false).await.map(Some)
            }
        }
    }

    /// Leave the results and reveal the hit at `index` in the tree, opening
    /// it when it is a leaf.
    pub async fn locate_result(
        &self,
        index: usize,
    ) -> Result<Option<NavigationOutcome>, RemoteError> {
        let Some((hit, _)) = self.result_at(index) else {
            return Ok(None);
        };
        self.clear_query();
        let open_leaf = hit.kind == EntryKind::Leaf;
        self.expand_to_path(&hit.path, open_leaf).await.map(Some)
    }

    fn result_at(&self, index: usize) -> Option<(SearchHit, String)> {
        let state = self.state();
        let hit = state.search.results()?.hits.get(index)?.clone();
        let root = state.tree.first_root()?;
        Some((hit, root.collection().to_string()))
    }
}
