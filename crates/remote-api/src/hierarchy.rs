use async_trait::async_trait;

use crate::error::RemoteError;
use crate::index::IndexJob;
use crate::query::{SearchQuery, SearchResponse};
use crate::types::{Collection, ConnectionContext, EntryDescriptor, FetchedFile, Scope};

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Request/response contract with the backend that fronts a file share.
///
/// Implementations are stateless from the caller's point of view and never
/// retry. Dropping a returned future abandons the request. Paths are relative
/// to the scope root, `/` separated, and empty for the root itself.
#[async_trait(?Send)]
pub trait RemoteHierarchy {
    /// Enumerate the top-level collections reachable through `context`.
    async fn list_collections(&self, context: &ConnectionContext)
    -> RemoteResult<Vec<Collection>>;

    /// List the immediate children of `path`.
    async fn list_children(&self, scope: &Scope, path: &str)
    -> RemoteResult<Vec<EntryDescriptor>>;

    async fn fetch_file(&self, scope: &Scope, path: &str) -> RemoteResult<FetchedFile>;

    async fn search(&self, scope: &Scope, query: &SearchQuery) -> RemoteResult<SearchResponse>;

    /// Ask the backend to (re)build its index; returns the acknowledgment.
    async fn start_index(&self, scope: &Scope) -> RemoteResult<IndexJob>;

    async fn index_status(&self) -> RemoteResult<IndexJob>;

    /// Drop the cached index for `scope`.
    async fn clear_index(&self, scope: &Scope) -> RemoteResult<()>;
}
