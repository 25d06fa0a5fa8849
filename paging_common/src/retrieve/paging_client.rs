//! # Paging Repository Client
//!
//! Typed access to the paging server's `/api/paging` routes.
//!
//! Every request carries the `x-api-key` header. Calls are not retried; a
//! non-2xx answer comes back as [`ClientError::Status`].

use reqwest::{header::HeaderValue, Method, Url};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::models::{ApiMessage, DeleteRequest, PagingDraft, PagingEntry, PagingLogEntry, SearchRequest};

/// Header carrying the shared API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Request timeout for every call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors surfaced by [`PagingClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("cannot build HTTP client: {0}")]
    Build(reqwest::Error),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest_middleware::Error),
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response body: {0}")]
    Decode(#[from] reqwest::Error),
    #[error("invalid API key header value")]
    InvalidKey,
}

impl ClientError {
    /// HTTP status of a rejected call, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// # Paging Client
///
/// Thin wrapper over a shared `reqwest` client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PagingClient {
    inner: ClientWithMiddleware,
    base_url: Url,
    api_key: HeaderValue,
}

impl PagingClient {
    /// Creates a client for the server at `base_url` (e.g. `http://localhost:3000`).
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let api_key = HeaderValue::from_str(api_key).map_err(|_| ClientError::InvalidKey)?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("paging-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            inner: ClientBuilder::new(client).build(),
            base_url,
            api_key,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /api/paging`: the whole table.
    pub async fn get_pagings(&self) -> Result<Vec<PagingEntry>, ClientError> {
        let req = self.request(Method::GET, "api/paging")?;
        self.send(req).await
    }

    /// `POST /api/paging`; returns the stored entry with its new id.
    pub async fn add_paging(&self, draft: &PagingDraft) -> Result<PagingEntry, ClientError> {
        let req = self.request(Method::POST, "api/paging")?.json(draft);
        self.send(req).await
    }

    /// `PUT /api/paging`; `draft.id` selects the row.
    pub async fn update_paging(&self, draft: &PagingDraft) -> Result<ApiMessage, ClientError> {
        let req = self.request(Method::PUT, "api/paging")?.json(draft);
        self.send(req).await
    }

    /// `DELETE /api/paging`.
    pub async fn delete_paging(&self, id: i32) -> Result<ApiMessage, ClientError> {
        let req = self.request(Method::DELETE, "api/paging")?.json(&DeleteRequest { id });
        self.send(req).await
    }

    /// `GET /api/paging/{id}`.
    pub async fn get_paging(&self, id: i32) -> Result<PagingEntry, ClientError> {
        let req = self.request(Method::GET, &format!("api/paging/{id}"))?;
        self.send(req).await
    }

    /// `POST /api/paging/search`: entries whose passenger list contains `name`.
    pub async fn search_pagings(&self, name: &str) -> Result<Vec<PagingEntry>, ClientError> {
        let body = SearchRequest { name: name.to_owned() };
        let req = self.request(Method::POST, "api/paging/search")?.json(&body);
        self.send(req).await
    }

    /// `GET /api/logs`: the audit trail, newest first.
    pub async fn get_logs(&self) -> Result<Vec<PagingLogEntry>, ClientError> {
        let req = self.request(Method::GET, "api/logs")?;
        self.send(req).await
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.base_url.join(path)?;
        Ok(self
            .inner
            .request(method, url)
            .header(API_KEY_HEADER, self.api_key.clone()))
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let response = req.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "Paging API response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}
