//! Query state for the search box: text, filters, the generation that guards
//! against stale responses, and what the left pane should show.

use sharetree_remote_api::{
    KindFilter, MatchScope, RemoteError, SearchHit, SearchQuery, SearchResponse, SearchSource,
};
use tokio_util::sync::CancellationToken;

use crate::tree::LocalMatches;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub scope: MatchScope,
    pub kind: KindFilter,
    pub exact: bool,
}

/// A completed remote search.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub query: SearchQuery,
    pub hits: Vec<SearchHit>,
    pub source: SearchSource,
    pub truncated: bool,
}

impl ResultsView {
    pub fn summary(&self) -> String {
        let count = self.hits.len();
        let noun = if count == 1 && !self.truncated { "result" } else { "results" };
        let plus = if self.truncated { "+" } else { "" };
        let mut summary = format!("{count}{plus} {noun} ({})", self.source.label());
        if self.truncated {
            summary.push_str(", refine your search to see more");
        }
        summary
    }
}

/// What the left pane shows.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchView {
    Tree,
    /// Loaded nodes filtered by name; used when the connection cannot search.
    LocalFilter(LocalMatches),
    Loading {
        query: String,
    },
    Results(ResultsView),
    /// The latest search failed; it can be retried.
    Failed {
        query: String,
        message: String,
    },
}

#[derive(Debug)]
pub struct SearchState {
    text: String,
    filters: SearchFilters,
    generation: u64,
    cancel: Option<CancellationToken>,
    view: SearchView,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            text: String::new(),
            filters: SearchFilters::default(),
            generation: 0,
            cancel: None,
            view: SearchView::Tree,
        }
    }
}

impl SearchState {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    pub fn filters(&self) -> SearchFilters {
        self.filters
    }

    pub(crate) fn filters_mut(&mut self) -> &mut SearchFilters {
        &mut self.filters
    }

    pub fn view(&self) -> &SearchView {
        &self.view
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Whether a debounce timer or request is outstanding.
    pub fn is_pending(&self) -> bool {
        self.cancel.is_some()
    }

    pub fn results(&self) -> Option<&ResultsView> {
        match &self.view {
            SearchView::Results(results) => Some(results),
            _ => None,
        }
    }

    /// Cancel whatever is outstanding and start a new generation for `text`.
    pub fn supersede(&mut self, text: &str) -> u64 {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
        self.generation = self.generation.wrapping_add(1);
        self.text = text.to_string();
        self.generation
    }

    /// Token for the work of `generation`; cancelled by the next supersede.
    pub fn arm(&mut self, generation: u64) -> Option<CancellationToken> {
        if !self.is_current(generation) {
            return None;
        }
        let token = CancellationToken::new();
        self.cancel = Some(token.clone());
        Some(token)
    }

    pub fn build_query(&self, limit: usize) -> SearchQuery {
        SearchQuery::new(self.trimmed())
            .with_scope(self.filters.scope)
            .with_kind(self.filters.kind)
            .with_exact(self.filters.exact)
            .with_limit(limit)
    }

    pub fn show_tree(&mut self) {
        self.view = SearchView::Tree;
    }

    pub fn show_local(&mut self, matches: LocalMatches) {
        self.view = SearchView::LocalFilter(matches);
    }

    pub fn show_loading(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.view = SearchView::Loading {
            query: self.trimmed().to_string(),
        };
        true
    }

    /// Apply the outcome of `generation`. Anything but the latest generation
    /// is discarded.
    pub fn apply(
        &mut self,
        generation: u64,
        query: SearchQuery,
        outcome: Result<SearchResponse, RemoteError>,
    ) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.cancel = None;
        self.view = match outcome {
            Ok(response) => SearchView::Results(ResultsView {
                query,
                hits: response.hits,
                source: response.source,
                truncated: response.truncated,
            }),
            Err(error) => SearchView::Failed {
                query: query.text,
                message: error.to_string(),
            },
        };
        true
    }

    /// Drop everything query related, keeping the filters.
    pub fn reset(&mut self) {
        self.supersede("");
        self.view = SearchView::Tree;
    }
}

#[cfg(test)]
mod tests {
    use sharetree_remote_api::EntryKind;

    use super::*;

    fn response(names: &[&str]) -> SearchResponse {
        SearchResponse {
            hits: names
                .iter()
                .map(|name| SearchHit {
                    path: (*name).to_string(),
                    name: (*name).to_string(),
                    kind: EntryKind::Leaf,
                    size: Some(1),
                })
                .collect(),
            source: SearchSource::Indexed,
            truncated: false,
        }
    }

    #[test]
    fn superseding_cancels_the_outstanding_token() {
        let mut state = SearchState::default();
        let first = state.supersede("inv");
        let token = state.arm(first).unwrap();
        assert!(state.is_pending());

        let second = state.supersede("invo");
        assert!(token.is_cancelled());
        assert!(!state.is_current(first));
        assert!(state.is_current(second));
        assert!(state.arm(first).is_none());
    }

    #[test]
    fn stale_outcomes_are_discarded() {
        let mut state = SearchState::default();
        let first = state.supersede("a");
        let second = state.supersede("ab");
        assert!(state.show_loading(second));

        assert!(!state.apply(first, SearchQuery::new("a"), Ok(response(&["a.txt"]))));
        assert!(matches!(state.view(), SearchView::Loading { .. }));

        assert!(state.apply(second, SearchQuery::new("ab"), Ok(response(&["ab.txt"]))));
        assert_eq!(state.results().unwrap().hits[0].name, "ab.txt");
        assert!(!state.is_pending());
    }

    #[test]
    fn failures_are_kept_for_retry() {
        let mut state = SearchState::default();
        let generation = state.supersede("inv");
        state.apply(
            generation,
            SearchQuery::new("inv"),
            Err(RemoteError::Transport("reset".into())),
        );
        assert_eq!(
            state.view(),
            &SearchView::Failed {
                query: "inv".into(),
                message: "connection failed: reset".into()
            }
        );
    }

    #[test]
    fn queries_carry_the_current_filters() {
        let mut state = SearchState::default();
        state.supersede("  report ");
        state.filters_mut().scope = MatchScope::Path;
        state.filters_mut().kind = KindFilter::Leaf;
        state.filters_mut().exact = true;
        let query = state.build_query(25);
        assert_eq!(query.text, "report");
        assert_eq!(query.scope, MatchScope::Path);
        assert_eq!(query.kind, KindFilter::Leaf);
        assert!(query.exact);
        assert_eq!(query.limit, 25);
    }

    #[test]
    fn summaries_mention_source_and_truncation() {
        let view = ResultsView {
            query: SearchQuery::new("a"),
            hits: response(&["a"]).hits,
            source: SearchSource::Live,
            truncated: false,
        };
        assert_eq!(view.summary(), "1 result (live)");

        let truncated = ResultsView {
            truncated: true,
            source: SearchSource::Indexed,
            ..view
        };
        assert_eq!(
            truncated.summary(),
            "1+ results (indexed), refine your search to see more"
        );
    }
}
