//! JSON bodies exchanged with the share backend.

use serde::Deserialize;

use crate::index::{IndexJob, IndexState};
use crate::query::{SearchHit, SearchResponse, SearchSource};
use crate::types::{Collection, EntryDescriptor, EntryKind};

#[derive(Debug, Deserialize)]
pub(super) struct SharesBody {
    pub(super) shares: Vec<WireShare>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireShare {
    name: String,
    #[serde(default)]
    unc: Option<String>,
    #[serde(default)]
    comments: Option<String>,
}

impl From<WireShare> for Collection {
    fn from(share: WireShare) -> Self {
        Self {
            name: share.name,
            location: share.unc.filter(|unc| !unc.is_empty()),
            comment: share.comments.filter(|comment| !comment.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ListBody {
    pub(super) files: Vec<WireEntry>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireEntry {
    name: String,
    #[serde(rename = "isDirectory")]
    is_directory: bool,
    #[serde(default)]
    size: Option<u64>,
}

impl From<WireEntry> for EntryDescriptor {
    fn from(entry: WireEntry) -> Self {
        let kind = EntryKind::from_is_container(entry.is_directory);
        Self {
            name: entry.name,
            kind,
            size: if kind.is_container() { None } else { entry.size },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchBody {
    results: Vec<WireHit>,
    #[serde(default)]
    truncated: bool,
    #[serde(default)]
    source: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireHit {
    name: String,
    path: String,
    #[serde(rename = "isDirectory")]
    is_directory: bool,
    #[serde(default)]
    size: Option<u64>,
}

impl From<SearchBody> for SearchResponse {
    fn from(body: SearchBody) -> Self {
        let source = match body.source.as_deref() {
            Some("index") => SearchSource::Indexed,
            _ => SearchSource::Live,
        };
        let hits = body
            .results
            .into_iter()
            .map(|hit| {
                let kind = EntryKind::from_is_container(hit.is_directory);
                SearchHit {
                    path: hit.path.replace('\\', "/"),
                    name: hit.name,
                    kind,
                    size: if kind.is_container() { None } else { hit.size },
                }
            })
            .collect();
        Self {
            hits,
            source,
            truncated: body.truncated,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct IndexBody {
    status: String,
    #[serde(default)]
    indexed: u64,
    #[serde(default)]
    errors: u64,
    #[serde(default)]
    elapsed: Option<f64>,
}

impl TryFrom<IndexBody> for IndexJob {
    type Error = String;

    fn try_from(body: IndexBody) -> Result<Self, Self::Error> {
        let state = IndexState::from_wire(&body.status)
            .ok_or_else(|| format!("unknown index status `{}`", body.status))?;
        Ok(Self {
            state,
            processed: body.indexed,
            errors: body.errors,
            elapsed_secs: body.elapsed,
        })
    }
}
