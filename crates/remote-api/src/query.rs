use serde::{Deserialize, Serialize};

use crate::types::EntryKind;

/// Default number of hits requested per query.
pub const DEFAULT_RESULT_LIMIT: usize = 500;

/// Which field of an entry a query is compared against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchScope {
    #[default]
    Name,
    Path,
}

impl MatchScope {
    #[must_use]
    pub fn as_param(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Path => "path",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Path => "Path",
        }
    }
}

/// Restricts hits to one entry kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    #[default]
    Any,
    Container,
    Leaf,
}

impl KindFilter {
    #[must_use]
    pub fn as_param(self) -> &'static str {
        match self {
            Self::Any => "all",
            Self::Container => "dir",
            Self::Leaf => "file",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Any => "All",
            Self::Container => "Folders",
            Self::Leaf => "Files",
        }
    }

    /// Next filter in the `Any -> Leaf -> Container` cycle.
    #[must_use]
    pub fn cycle(self) -> Self {
        match self {
            Self::Any => Self::Leaf,
            Self::Leaf => Self::Container,
            Self::Container => Self::Any,
        }
    }

    #[must_use]
    pub fn admits(self, kind: EntryKind) -> bool {
        match self {
            Self::Any => true,
            Self::Container => kind == EntryKind::Container,
            Self::Leaf => kind == EntryKind::Leaf,
        }
    }
}

/// A search request. Immutable once issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub scope: MatchScope,
    pub kind: KindFilter,
    pub exact: bool,
    pub limit: usize,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            scope: MatchScope::default(),
            kind: KindFilter::default(),
            exact: false,
            limit: DEFAULT_RESULT_LIMIT,
        }
    }

    #[must_use]
    pub fn with_scope(mut self, scope: MatchScope) -> Self {
        self.scope = scope;
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: KindFilter) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_exact(mut self, exact: bool) -> Self {
        self.exact = exact;
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Lower-cased whitespace separated terms; all of them must match.
    #[must_use]
    pub fn terms(&self) -> Vec<String> {
        self.text
            .split_whitespace()
            .map(|term| term.to_lowercase())
            .collect()
    }

    /// Evaluate the query against one catalog entry.
    ///
    /// `path` is relative to the scope root and uses `/` separators.
    #[must_use]
    pub fn matches(&self, name: &str, path: &str, kind: EntryKind) -> bool {
        if !self.kind.admits(kind) {
            return false;
        }
        let terms = self.terms();
        if terms.is_empty() {
            return false;
        }
        let haystack = match self.scope {
            MatchScope::Name => name.to_lowercase(),
            MatchScope::Path => path.to_lowercase(),
        };
        if self.exact {
            haystack == self.text.trim().to_lowercase()
        } else {
            terms.iter().all(|term| haystack.contains(term.as_str()))
        }
    }
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Path relative to the scope root, `/` separated.
    pub path: String,
    pub name: String,
    pub kind: EntryKind,
    pub size: Option<u64>,
}

impl SearchHit {
    /// Parent portion of [`path`](Self::path), empty at the root.
    #[must_use]
    pub fn parent(&self) -> &str {
        self.path
            .rsplit_once('/')
            .map(|(parent, _)| parent)
            .unwrap_or("")
    }
}

/// Which backend served a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSource {
    Indexed,
    Live,
}

impl SearchSource {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Indexed => "indexed",
            Self::Live => "live",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResponse {
    pub hits: Vec<SearchHit>,
    pub source: SearchSource,
    /// The backend stopped at the limit; more hits exist.
    pub truncated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_scope_with_leaf_filter_skips_containers() {
        let query = SearchQuery::new("inv").with_kind(KindFilter::Leaf);
        assert!(query.matches("invoice.txt", "invoice.txt", EntryKind::Leaf));
        assert!(!query.matches("Invoices", "Invoices", EntryKind::Container));
        assert!(query.matches("invalid.log", "archive/invalid.log", EntryKind::Leaf));
    }

    #[test]
    fn terms_are_anded_case_insensitively() {
        let query = SearchQuery::new("Q3 Report");
        assert!(query.matches("report-q3.pdf", "report-q3.pdf", EntryKind::Leaf));
        assert!(!query.matches("report-q4.pdf", "report-q4.pdf", EntryKind::Leaf));
    }

    #[test]
    fn path_scope_looks_at_parents() {
        let query = SearchQuery::new("archive").with_scope(MatchScope::Path);
        assert!(query.matches("invalid.log", "archive/invalid.log", EntryKind::Leaf));
        let by_name = SearchQuery::new("archive");
        assert!(!by_name.matches("invalid.log", "archive/invalid.log", EntryKind::Leaf));
    }

    #[test]
    fn exact_compares_the_whole_field() {
        let query = SearchQuery::new("Invoice.txt").with_exact(true);
        assert!(query.matches("invoice.txt", "2024/invoice.txt", EntryKind::Leaf));
        assert!(!query.matches("old invoice.txt", "old invoice.txt", EntryKind::Leaf));
        assert!(!query.matches("invoice.txt.bak", "invoice.txt.bak", EntryKind::Leaf));

        let by_path = SearchQuery::new("2024/invoice.txt")
            .with_scope(MatchScope::Path)
            .with_exact(true);
        assert!(by_path.matches("invoice.txt", "2024/invoice.txt", EntryKind::Leaf));
        assert!(!by_path.matches("invoice.txt", "invoice.txt", EntryKind::Leaf));
    }

    #[test]
    fn blank_queries_match_nothing() {
        let query = SearchQuery::new("   ");
        assert!(!query.matches("anything", "anything", EntryKind::Leaf));
    }

    #[test]
    fn kind_filter_cycles_through_every_variant() {
        let start = KindFilter::Any;
        assert_eq!(start.cycle().cycle().cycle(), start);
        assert_eq!(start.cycle(), KindFilter::Leaf);
    }

    #[test]
    fn hit_parent_is_empty_at_root() {
        let hit = SearchHit {
            path: "report.pdf".into(),
            name: "report.pdf".into(),
            kind: EntryKind::Leaf,
            size: Some(1),
        };
        assert_eq!(hit.parent(), "");
        let nested = SearchHit {
            path: "Docs/2024/report.pdf".into(),
            ..hit
        };
        assert_eq!(nested.parent(), "Docs/2024");
    }
}
