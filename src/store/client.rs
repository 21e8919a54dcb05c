// SPDX-FileCopyrightText: 2026 Mindgrove contributors
// SPDX-License-Identifier: MIT

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::model::{MapId, OwnerId};

use super::wire::{CreateMapRequest, MapRecord, MapSummary, UpdateMapRequest};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The remote persistence API, as seen by the editor.
///
/// Update is a full-document replace (last-write-wins): the adapter performs
/// no merging and no conflict detection.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list(&self, owner_id: &OwnerId) -> Result<Vec<MapSummary>, StoreError>;
    async fn fetch(&self, map_id: &MapId) -> Result<MapRecord, StoreError>;
    async fn create(&self, request: &CreateMapRequest) -> Result<MapRecord, StoreError>;
    async fn update(
        &self,
        map_id: &MapId,
        request: &UpdateMapRequest,
    ) -> Result<MapRecord, StoreError>;
    async fn delete(&self, map_id: &MapId) -> Result<(), StoreError>;
}

/// HTTP client for the persistence API.
pub struct HttpStore {
    client: Client,
    base_url: String,
}

impl HttpStore {
    pub fn new(base_url: impl Into<String>) -> Result<Self, StoreError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(StoreError::from)?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self { client, base_url })
    }

    fn maps_url(&self) -> String {
        format!("{}/mindmaps", self.base_url)
    }

    fn map_url(&self, map_id: &MapId) -> String {
        format!("{}/mindmaps/{}", self.base_url, map_id)
    }
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn list(&self, owner_id: &OwnerId) -> Result<Vec<MapSummary>, StoreError> {
        debug!(owner = %owner_id, "listing mind maps");
        let response = self
            .client
            .get(self.maps_url())
            .query(&[("ownerId", owner_id.as_str())])
            .send()
            .await?;
        decode_body(check_status(response).await?).await
    }

    async fn fetch(&self, map_id: &MapId) -> Result<MapRecord, StoreError> {
        debug!(map = %map_id, "fetching mind map");
        let response = self.client.get(self.map_url(map_id)).send().await?;
        decode_body(check_status(response).await?).await
    }

    async fn create(&self, request: &CreateMapRequest) -> Result<MapRecord, StoreError> {
        debug!(owner = %request.owner_id, "creating mind map");
        let response = self
            .client
            .post(self.maps_url())
            .json(request)
            .send()
            .await?;
        decode_body(check_status(response).await?).await
    }

    async fn update(
        &self,
        map_id: &MapId,
        request: &UpdateMapRequest,
    ) -> Result<MapRecord, StoreError> {
        debug!(map = %map_id, nodes = request.nodes.len(), "saving mind map");
        let response = self
            .client
            .put(self.map_url(map_id))
            .json(request)
            .send()
            .await?;
        decode_body(check_status(response).await?).await
    }

    async fn delete(&self, map_id: &MapId) -> Result<(), StoreError> {
        debug!(map = %map_id, "deleting mind map");
        let response = self.client.delete(self.map_url(map_id)).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    #[derive(Deserialize)]
    struct ErrorBody {
        error: String,
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_owned(),
    };

    if status == StatusCode::NOT_FOUND {
        return Err(StoreError::NotFound { message });
    }
    Err(StoreError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn decode_body<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    response.json::<T>().await.map_err(|source| {
        StoreError::Decode {
            message: source.to_string(),
        }
    })
}

/// Persistence failures. A failed save never mutates in-memory state; it is
/// reported so the user can retry.
#[derive(Debug)]
pub enum StoreError {
    /// Request never completed within the deadline. Always retryable.
    Timeout,
    /// Transport-level failure (connect, TLS, client build).
    Http { source: reqwest::Error },
    NotFound { message: String },
    Api { status: u16, message: String },
    Decode { message: String },
}

impl StoreError {
    /// Whether retrying the same request may succeed without user action.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::Http { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            Self::NotFound { .. } | Self::Decode { .. } => false,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout
        } else {
            Self::Http { source }
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("request timed out"),
            Self::Http { source } => write!(f, "http error: {source}"),
            Self::NotFound { message } => write!(f, "not found: {message}"),
            Self::Api { status, message } => write!(f, "server error {status}: {message}"),
            Self::Decode { message } => write!(f, "malformed response: {message}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http { source } => Some(source),
            _ => None,
        }
    }
}
