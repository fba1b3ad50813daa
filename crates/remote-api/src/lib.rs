//! Contract between the share browser and the backend that fronts a remote
//! file share.
//!
//! [`RemoteHierarchy`] is the seam: [`HttpHierarchy`] talks to the real
//! backend, and with the `memory` feature [`memory::MemoryHierarchy`] serves a
//! static catalog for tests and demos.

pub mod error;
pub mod hierarchy;
pub mod http;
pub mod index;
#[cfg(feature = "memory")]
pub mod memory;
pub mod query;
pub mod types;

pub use error::RemoteError;
pub use hierarchy::{RemoteHierarchy, RemoteResult};
pub use http::HttpHierarchy;
pub use index::{IndexJob, IndexState};
pub use query::{
    DEFAULT_RESULT_LIMIT, KindFilter, MatchScope, SearchHit, SearchQuery, SearchResponse,
    SearchSource,
};
pub use types::{
    Collection, ConnectionContext, Credentials, EntryDescriptor, EntryKind, FetchedFile, Scope,
};
