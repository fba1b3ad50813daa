//! [`RemoteHierarchy`] over the share backend's JSON HTTP API.

mod wire;

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::RemoteError;
use crate::hierarchy::{RemoteHierarchy, RemoteResult};
use crate::index::IndexJob;
use crate::query::{SearchQuery, SearchResponse};
use crate::types::{Collection, ConnectionContext, EntryDescriptor, FetchedFile, Scope};

use wire::{IndexBody, ListBody, SearchBody, SharesBody};

type Params = Vec<(&'static str, String)>;

/// HTTP client for the share backend.
#[derive(Debug, Clone)]
pub struct HttpHierarchy {
    client: Client,
    base_url: String,
}

impl HttpHierarchy {
    /// Build a client rooted at `base_url` (for example `http://127.0.0.1:5000`).
    ///
    /// `timeout` bounds each request end to end; `None` leaves requests unbounded.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> RemoteResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| RemoteError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn get(&self, path: &str, params: &Params) -> RequestBuilder {
        self.client.get(self.endpoint(path)).query(params)
    }

    fn post(&self, path: &str, params: &Params) -> RequestBuilder {
        self.client.post(self.endpoint(path)).query(params)
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> RemoteResult<T> {
        let response = request.send().await.map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport)?;
        decode_json(status, &body)
    }
}

fn transport(err: reqwest::Error) -> RemoteError {
    RemoteError::Transport(err.to_string())
}

/// Decode a JSON body, turning non-success statuses and `{"error": ..}`
/// payloads into [`RemoteError::Backend`].
fn decode_json<T: DeserializeOwned>(status: u16, body: &[u8]) -> RemoteResult<T> {
    if !(200..300).contains(&status) {
        return Err(error_from_body(status, body));
    }
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|err| RemoteError::Protocol(err.to_string()))?;
    if let Some(message) = value.get("error").and_then(serde_json::Value::as_str) {
        return Err(RemoteError::with_status(status, message));
    }
    serde_json::from_value(value).map_err(|err| RemoteError::Protocol(err.to_string()))
}

fn error_from_body(status: u16, body: &[u8]) -> RemoteError {
    let message = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("error")?.as_str().map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {status}"));
    RemoteError::with_status(status, message)
}

fn context_params(context: &ConnectionContext) -> Params {
    match context {
        ConnectionContext::Location(location) => vec![("unc", location.clone())],
        ConnectionContext::Host { host, credentials } => vec![
            ("host", host.clone()),
            ("user", credentials.user.clone()),
            ("pass", credentials.password.clone()),
        ],
    }
}

fn scope_params(scope: &Scope) -> Params {
    match scope {
        Scope::Location(location) => vec![("unc", location.clone())],
        Scope::Share {
            host,
            credentials,
            share,
        } => vec![
            ("host", host.clone()),
            ("share", share.clone()),
            ("user", credentials.user.clone()),
            ("pass", credentials.password.clone()),
        ],
    }
}

fn require_location<'a>(scope: &'a Scope, operation: &str) -> RemoteResult<&'a str> {
    scope.location().ok_or_else(|| {
        RemoteError::Unsupported(format!("{operation} requires a resolved share location"))
    })
}

fn search_params(location: &str, query: &SearchQuery) -> Params {
    let mut params = vec![
        ("unc", location.to_string()),
        ("q", query.text.trim().to_string()),
        ("match", query.scope.as_param().to_string()),
        ("type", query.kind.as_param().to_string()),
        ("limit", query.limit.to_string()),
    ];
    if query.exact {
        params.push(("exact", "1".to_string()));
    }
    params
}

#[async_trait(?Send)]
impl RemoteHierarchy for HttpHierarchy {
    async fn list_collections(
        &self,
        context: &ConnectionContext,
    ) -> RemoteResult<Vec<Collection>> {
        debug!("listing collections for {}", context.label());
        let body: SharesBody = self
            .json(self.get("/api/shares", &context_params(context)))
            .await?;
        Ok(body.shares.into_iter().map(Collection::from).collect())
    }

    async fn list_children(
        &self,
        scope: &Scope,
        path: &str,
    ) -> RemoteResult<Vec<EntryDescriptor>> {
        let mut params = scope_params(scope);
        params.push(("path", path.to_string()));
        let body: ListBody = self.json(self.get("/api/list", &params)).await?;
        Ok(body.files.into_iter().map(EntryDescriptor::from).collect())
    }

    async fn fetch_file(&self, scope: &Scope, path: &str) -> RemoteResult<FetchedFile> {
        let mut params = scope_params(scope);
        params.push(("path", path.to_string()));
        let response = self
            .get("/api/file", &params)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response.bytes().await.map_err(transport)?;
        if !(200..300).contains(&status) {
            return Err(error_from_body(status, &bytes));
        }
        Ok(FetchedFile {
            content_type,
            bytes: bytes.to_vec(),
        })
    }

    async fn search(&self, scope: &Scope, query: &SearchQuery) -> RemoteResult<SearchResponse> {
        let location = require_location(scope, "search")?;
        let body: SearchBody = self
            .json(self.get("/api/search", &search_params(location, query)))
            .await?;
        Ok(SearchResponse::from(body))
    }

    async fn start_index(&self, scope: &Scope) -> RemoteResult<IndexJob> {
        let location = require_location(scope, "indexing")?;
        let body: IndexBody = self
            .json(self.post("/api/index", &vec![("unc", location.to_string())]))
            .await?;
        IndexJob::try_from(body).map_err(RemoteError::Protocol)
    }

    async fn index_status(&self) -> RemoteResult<IndexJob> {
        let body: IndexBody = self.json(self.get("/api/index/status", &Vec::new())).await?;
        IndexJob::try_from(body).map_err(RemoteError::Protocol)
    }

    async fn clear_index(&self, scope: &Scope) -> RemoteResult<()> {
        let location = require_location(scope, "clearing the index")?;
        let _: serde_json::Value = self
            .json(self.post("/api/index/clear", &vec![("unc", location.to_string())]))
            .await?;
        Ok(())
    }
}
