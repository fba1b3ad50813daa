//! In-process [`RemoteHierarchy`] backed by a static catalog.
//!
//! Used to drive the browser without a backend: every call is recorded, can
//! be delayed on the tokio clock, and can be made to fail on demand.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::hierarchy::{RemoteHierarchy, RemoteResult};
use crate::index::{IndexJob, IndexState};
use crate::query::{SearchHit, SearchQuery, SearchResponse, SearchSource};
use crate::types::{
    Collection, ConnectionContext, EntryDescriptor, EntryKind, FetchedFile, Scope,
};

/// Remote operations, used as keys for latency and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListCollections,
    ListChildren,
    FetchFile,
    Search,
    StartIndex,
    IndexStatus,
    ClearIndex,
}

/// A recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListCollections,
    ListChildren { collection: String, path: String },
    FetchFile { collection: String, path: String },
    Search { text: String },
    StartIndex,
    IndexStatus,
    ClearIndex,
}

#[derive(Debug, Clone)]
struct MemoryEntry {
    path: String,
    kind: EntryKind,
    size: u64,
    content_type: String,
    bytes: Vec<u8>,
}

impl MemoryEntry {
    fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    fn parent(&self) -> &str {
        self.path
            .rsplit_once('/')
            .map(|(parent, _)| parent)
            .unwrap_or("")
    }
}

#[derive(Debug)]
struct MemoryCollection {
    collection: Collection,
    entries: Vec<MemoryEntry>,
}

#[derive(Debug, Default)]
struct MemoryState {
    collections: Vec<MemoryCollection>,
    latency: HashMap<Operation, Duration>,
    search_latency: HashMap<String, Duration>,
    failures: HashMap<Operation, VecDeque<RemoteError>>,
    denied: HashMap<String, String>,
    index: IndexJob,
    index_script: VecDeque<RemoteResult<IndexJob>>,
    calls: Vec<Call>,
}

/// In-memory share catalog.
///
/// Entries are addressed as `collection/relative/path`; missing parent
/// containers are created on insertion.
#[derive(Debug, Default)]
pub struct MemoryHierarchy {
    state: RefCell<MemoryState>,
}

impl MemoryHierarchy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_collection(self, collection: Collection) -> Self {
        self.state.borrow_mut().collections.push(MemoryCollection {
            collection,
            entries: Vec::new(),
        });
        self
    }

    #[must_use]
    pub fn with_container(self, path: &str) -> Self {
        self.insert(path, EntryKind::Container, 0, "", Vec::new());
        self
    }

    #[must_use]
    pub fn with_leaf(self, path: &str, size: u64) -> Self {
        self.insert(
            path,
            EntryKind::Leaf,
            size,
            "application/octet-stream",
            Vec::new(),
        );
        self
    }

    #[must_use]
    pub fn with_file(self, path: &str, content_type: &str, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        self.insert(path, EntryKind::Leaf, bytes.len() as u64, content_type, bytes);
        self
    }

    fn insert(&self, path: &str, kind: EntryKind, size: u64, content_type: &str, bytes: Vec<u8>) {
        let mut state = self.state.borrow_mut();
        let Some((collection_name, relative)) = path.split_once('/') else {
            return;
        };
        let position = state
            .collections
            .iter()
            .position(|entry| entry.collection.name == collection_name);
        let index = match position {
            Some(index) => index,
            None => {
                state.collections.push(MemoryCollection {
                    collection: Collection::new(collection_name),
                    entries: Vec::new(),
                });
                state.collections.len() - 1
            }
        };
        let collection = &mut state.collections[index];

        let mut prefix = String::new();
        let segments: Vec<&str> = relative.split('/').filter(|s| !s.is_empty()).collect();
        for (depth, segment) in segments.iter().enumerate() {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);
            if collection.entries.iter().any(|entry| entry.path == prefix) {
                continue;
            }
            let last = depth + 1 == segments.len();
            collection.entries.push(MemoryEntry {
                path: prefix.clone(),
                kind: if last { kind } else { EntryKind::Container },
                size: if last { size } else { 0 },
                content_type: if last { content_type.to_string() } else { String::new() },
                bytes: if last { bytes.clone() } else { Vec::new() },
            });
        }
    }

    /// Delay every call of `operation` by `latency` on the tokio clock.
    pub fn set_latency(&self, operation: Operation, latency: Duration) {
        self.state.borrow_mut().latency.insert(operation, latency);
    }

    /// Delay searches for exactly `text`, overriding the operation latency.
    pub fn set_search_latency(&self, text: &str, latency: Duration) {
        self.state
            .borrow_mut()
            .search_latency
            .insert(text.to_string(), latency);
    }

    /// Fail the next call of `operation` with `error`.
    pub fn fail_next(&self, operation: Operation, error: RemoteError) {
        self.state
            .borrow_mut()
            .failures
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    /// Reject every listing or fetch of `path` (relative, `/` separated).
    pub fn deny(&self, path: &str, message: &str) {
        self.state
            .borrow_mut()
            .denied
            .insert(path.to_string(), message.to_string());
    }

    /// Queue responses for upcoming `index_status` calls. Once the queue is
    /// drained a running job reports ready with the catalog size.
    pub fn script_index_statuses(&self, statuses: impl IntoIterator<Item = RemoteResult<IndexJob>>) {
        self.state.borrow_mut().index_script.extend(statuses);
    }

    #[must_use]
    pub fn index_job(&self) -> IndexJob {
        self.state.borrow().index
    }

    /// Force the simulated index into `job`.
    pub fn set_index_job(&self, job: IndexJob) {
        self.state.borrow_mut().index = job;
    }

    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    /// Number of recorded calls of `operation`.
    #[must_use]
    pub fn count(&self, operation: Operation) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Record the call and take any injected failure and latency for it.
    fn begin(&self, call: Call, latency_key: Option<&str>) -> (Option<RemoteError>, Duration) {
        let mut state = self.state.borrow_mut();
        let operation = call.operation();
        state.calls.push(call);
        let failure = state
            .failures
            .get_mut(&operation)
            .and_then(VecDeque::pop_front);
        let latency = latency_key
            .and_then(|key| state.search_latency.get(key).copied())
            .or_else(|| state.latency.get(&operation).copied())
            .unwrap_or_default();
        (failure, latency)
    }

    async fn enter(&self, call: Call, latency_key: Option<&str>) -> RemoteResult<()> {
        let (failure, latency) = self.begin(call, latency_key);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn collection_index(&self, scope: &Scope) -> RemoteResult<usize> {
        let state = self.state.borrow();
        state
            .collections
            .iter()
            .position(|entry| match scope {
                Scope::Location(location) => {
                    entry.collection.location.as_deref() == Some(location.as_str())
                }
                Scope::Share { share, .. } => &entry.collection.name == share,
            })
            .ok_or_else(|| RemoteError::with_status(404, "share not found"))
    }

    fn collection_name(&self, scope: &Scope) -> String {
        match scope {
            Scope::Share { share, .. } => share.clone(),
            Scope::Location(location) => self
                .collection_index(scope)
                .map(|index| self.state.borrow().collections[index].collection.name.clone())
                .unwrap_or_else(|_| location.clone()),
        }
    }

    fn check_denied(&self, path: &str) -> RemoteResult<()> {
        match self.state.borrow().denied.get(path) {
            Some(message) => Err(RemoteError::with_status(403, message.clone())),
            None => Ok(()),
        }
    }

    fn catalog_size(&self) -> u64 {
        self.state
            .borrow()
            .collections
            .iter()
            .map(|entry| entry.entries.len() as u64)
            .sum()
    }
}

impl Call {
    #[must_use]
    pub fn operation(&self) -> Operation {
        match self {
            Self::ListCollections => Operation::ListCollections,
            Self::ListChildren { .. } => Operation::ListChildren,
            Self::FetchFile { .. } => Operation::FetchFile,
            Self::Search { .. } => Operation::Search,
            Self::StartIndex => Operation::StartIndex,
            Self::IndexStatus => Operation::IndexStatus,
            Self::ClearIndex => Operation::ClearIndex,
        }
    }
}

#[async_trait(?Send)]
impl RemoteHierarchy for MemoryHierarchy {
    async fn list_collections(
        &self,
        context: &ConnectionContext,
    ) -> RemoteResult<Vec<Collection>> {
        self.enter(Call::ListCollections, None).await?;
        let state = self.state.borrow();
        let collections = state.collections.iter().map(|entry| entry.collection.clone());
        match context {
            ConnectionContext::Host { .. } => Ok(collections.collect()),
            ConnectionContext::Location(location) => {
                let matching: Vec<Collection> = collections
                    .filter(|collection| collection.location.as_deref() == Some(location.as_str()))
                    .collect();
                if matching.is_empty() {
                    Err(RemoteError::with_status(404, format!("{location} is not reachable")))
                } else {
                    Ok(matching)
                }
            }
        }
    }

    async fn list_children(
        &self,
        scope: &Scope,
        path: &str,
    ) -> RemoteResult<Vec<EntryDescriptor>> {
        let call = Call::ListChildren {
            collection: self.collection_name(scope),
            path: path.to_string(),
        };
        self.enter(call, None).await?;
        self.check_denied(path)?;
        let index = self.collection_index(scope)?;
        let state = self.state.borrow();
        let collection = &state.collections[index];
        if !path.is_empty()
            && !collection
                .entries
                .iter()
                .any(|entry| entry.path == path && entry.kind.is_container())
        {
            return Err(RemoteError::with_status(404, format!("{path}: no such folder")));
        }
        Ok(collection
            .entries
            .iter()
            .filter(|entry| entry.parent() == path)
            .map(|entry| EntryDescriptor {
                name: entry.name().to_string(),
                kind: entry.kind,
                size: (!entry.kind.is_container()).then_some(entry.size),
            })
            .collect())
    }

    async fn fetch_file(&self, scope: &Scope, path: &str) -> RemoteResult<FetchedFile> {
        let call = Call::FetchFile {
            collection: self.collection_name(scope),
            path: path.to_string(),
        };
        self.enter(call, None).await?;
        self.check_denied(path)?;
        let index = self.collection_index(scope)?;
        let state = self.state.borrow();
        state.collections[index]
            .entries
            .iter()
            .find(|entry| entry.path == path && !entry.kind.is_container())
            .map(|entry| FetchedFile {
                content_type: entry.content_type.clone(),
                bytes: entry.bytes.clone(),
            })
            .ok_or_else(|| RemoteError::with_status(404, format!("{path}: no such file")))
    }

    async fn search(&self, scope: &Scope, query: &SearchQuery) -> RemoteResult<SearchResponse> {
        let call = Call::Search {
            text: query.text.clone(),
        };
        self.enter(call, Some(query.text.as_str())).await?;
        let index = self.collection_index(scope)?;
        let state = self.state.borrow();
        let source = if state.index.state == IndexState::Ready {
            SearchSource::Indexed
        } else {
            SearchSource::Live
        };
        let hits: Vec<SearchHit> = state.collections[index]
            .entries
            .iter()
            .filter(|entry| query.matches(entry.name(), &entry.path, entry.kind))
            .take(query.limit)
            .map(|entry| SearchHit {
                path: entry.path.clone(),
                name: entry.name().to_string(),
                kind: entry.kind,
                size: (!entry.kind.is_container()).then_some(entry.size),
            })
            .collect();
        let truncated = hits.len() >= query.limit;
        Ok(SearchResponse {
            hits,
            source,
            truncated,
        })
    }

    async fn start_index(&self, scope: &Scope) -> RemoteResult<IndexJob> {
        self.enter(Call::StartIndex, None).await?;
        self.collection_index(scope)?;
        let mut state = self.state.borrow_mut();
        if state.index.state != IndexState::Indexing {
            state.index = IndexJob::indexing(0);
        }
        Ok(state.index)
    }

    async fn index_status(&self) -> RemoteResult<IndexJob> {
        self.enter(Call::IndexStatus, None).await?;
        let scripted = self.state.borrow_mut().index_script.pop_front();
        match scripted {
            Some(Ok(job)) => {
                self.state.borrow_mut().index = job;
                Ok(job)
            }
            Some(Err(error)) => Err(error),
            None => {
                let size = self.catalog_size();
                let mut state = self.state.borrow_mut();
                if state.index.state == IndexState::Indexing {
                    state.index = IndexJob::ready(size);
                }
                Ok(state.index)
            }
        }
    }

    async fn clear_index(&self, scope: &Scope) -> RemoteResult<()> {
        self.enter(Call::ClearIndex, None).await?;
        self.collection_index(scope)?;
        self.state.borrow_mut().index = IndexJob::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::KindFilter;

    const LOCATION: &str = r"\\fs01\Shared";

    fn catalog() -> MemoryHierarchy {
        MemoryHierarchy::new()
            .with_collection(Collection::located("Shared", LOCATION))
            .with_leaf("Shared/invoice.txt", 10)
            .with_container("Shared/Invoices")
            .with_leaf("Shared/archive/invalid.log", 20)
            .with_file("Shared/Docs/notes.txt", "text/plain", "hello")
    }

    fn scope() -> Scope {
        Scope::Location(LOCATION.into())
    }

    #[tokio::test]
    async fn listings_return_direct_children_only() {
        let remote = catalog();
        let root = remote.list_children(&scope(), "").await.unwrap();
        let names: Vec<_> = root.iter().map(|entry| entry.name.as_str()).collect();
        assert_eq!(names, ["invoice.txt", "Invoices", "archive", "Docs"]);

        let docs = remote.list_children(&scope(), "Docs").await.unwrap();
        assert_eq!(docs, vec![EntryDescriptor::leaf("notes.txt", 5)]);
        assert_eq!(
            remote.calls()[1],
            Call::ListChildren {
                collection: "Shared".into(),
                path: "Docs".into()
            }
        );
    }

    #[tokio::test]
    async fn missing_and_denied_paths_fail() {
        let remote = catalog();
        remote.deny("archive", "Access denied");
        let denied = remote.list_children(&scope(), "archive").await.unwrap_err();
        assert_eq!(denied.to_string(), "Access denied");
        assert!(remote.list_children(&scope(), "nope").await.is_err());
    }

    #[tokio::test]
    async fn search_applies_the_query_and_limit() {
        let remote = catalog();
        let query = SearchQuery::new("inv").with_kind(KindFilter::Leaf);
        let response = remote.search(&scope(), &query).await.unwrap();
        let paths: Vec<_> = response.hits.iter().map(|hit| hit.path.as_str()).collect();
        assert_eq!(paths, ["invoice.txt", "archive/invalid.log"]);
        assert_eq!(response.source, SearchSource::Live);
        assert!(!response.truncated);

        let limited = remote
            .search(&scope(), &SearchQuery::new("inv").with_limit(1))
            .await
            .unwrap();
        assert_eq!(limited.hits.len(), 1);
        assert!(limited.truncated);
    }

    #[tokio::test]
    async fn index_lifecycle_reports_ready_after_start() {
        let remote = catalog();
        let ack = remote.start_index(&scope()).await.unwrap();
        assert_eq!(ack.state, IndexState::Indexing);
        let status = remote.index_status().await.unwrap();
        assert_eq!(status.state, IndexState::Ready);

        let response = remote.search(&scope(), &SearchQuery::new("notes")).await.unwrap();
        assert_eq!(response.source, SearchSource::Indexed);

        remote.clear_index(&scope()).await.unwrap();
        assert_eq!(remote.index_job().state, IndexState::Idle);
    }

    #[tokio::test]
    async fn injected_failures_are_consumed_once() {
        let remote = catalog();
        remote.fail_next(Operation::FetchFile, RemoteError::Transport("reset".into()));
        assert!(remote.fetch_file(&scope(), "Docs/notes.txt").await.is_err());
        let file = remote.fetch_file(&scope(), "Docs/notes.txt").await.unwrap();
        assert_eq!(file.bytes, b"hello");
        assert_eq!(remote.count(Operation::FetchFile), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn latency_runs_on_the_tokio_clock() {
        let remote = catalog();
        remote.set_latency(Operation::ListChildren, Duration::from_secs(5));
        let started = tokio::time::Instant::now();
        remote.list_children(&scope(), "").await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(5));
    }
}
