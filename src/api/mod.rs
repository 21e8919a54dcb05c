// SPDX-FileCopyrightText: 2026 Mindgrove contributors
// SPDX-License-Identifier: MIT

//! The persistence REST API.
//!
//! Serves the five document endpoints over an in-memory repository: list by
//! owner, fetch, create, full-replace update, delete. Payload validation
//! reuses the wire decoder, so a document the API accepts is always one the
//! editor can hydrate.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::info;

use crate::model::MapId;
use crate::store::wire::{CreateMapRequest, MapRecord, MapSummary, UpdateMapRequest};
use crate::store::{decode_map, wire};

const DEFAULT_MAP_NAME: &str = "Untitled map";

#[derive(Debug, Clone)]
struct StoredMap {
    owner_id: String,
    record: MapRecord,
}

/// Shared server state: one lock around the whole repository. Handlers are
/// short and never await while holding it.
#[derive(Debug, Default)]
pub struct ApiState {
    maps: Mutex<BTreeMap<String, StoredMap>>,
}

pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/mindmaps", get(list_maps).post(create_map))
        .route(
            "/mindmaps/{id}",
            get(get_map).put(update_map).delete(delete_map),
        )
        .with_state(state)
}

/// Serves the API on an already-bound listener until the task is dropped.
pub async fn serve(
    listener: tokio::net::TcpListener,
    state: Arc<ApiState>,
) -> std::io::Result<()> {
    info!(addr = %listener.local_addr()?, "persistence API listening");
    axum::serve(listener, router(state)).await
}

struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: "mind map not found".to_owned(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// A body that fails to parse or deserialize is the caller's mistake, not a
/// routing failure: always 400 with the deserializer's message.
fn reject_body(rejection: JsonRejection) -> ApiError {
    ApiError::bad_request(rejection.body_text())
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(rename = "ownerId")]
    owner_id: Option<String>,
}

fn summary_of(record: &MapRecord) -> MapSummary {
    MapSummary {
        id: record.id.clone(),
        name: record.name.clone(),
        description: record.description.clone(),
        thumbnail: None,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

/// Rejects documents the editor could not hydrate (unknown kinds, bad ids,
/// dangling edges, root violations) before they are stored.
fn validate_document(
    name: &str,
    request_nodes: &[wire::WireNode],
    request_edges: &[wire::WireEdge],
) -> Result<(), ApiError> {
    let probe_id = MapId::fresh();
    decode_map(probe_id, name, None, request_nodes, request_edges)
        .map(|_| ())
        .map_err(|err| ApiError::bad_request(err.to_string()))
}

async fn list_maps(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<MapSummary>>, ApiError> {
    let owner_id = match query.owner_id.as_deref() {
        Some(owner_id) if !owner_id.is_empty() => owner_id.to_owned(),
        _ => return Err(ApiError::bad_request("missing ownerId")),
    };

    let maps = state.maps.lock().await;
    let mut summaries = maps
        .values()
        .filter(|stored| stored.owner_id == owner_id)
        .map(|stored| summary_of(&stored.record))
        .collect::<Vec<_>>();
    summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    Ok(Json(summaries))
}

async fn create_map(
    State(state): State<Arc<ApiState>>,
    request: Result<Json<CreateMapRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MapRecord>), ApiError> {
    let Json(request) = request.map_err(reject_body)?;
    if request.owner_id.is_empty() {
        return Err(ApiError::bad_request("missing ownerId"));
    }
    let name = match request.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => DEFAULT_MAP_NAME.to_owned(),
    };
    validate_document(&name, &request.nodes, &request.edges)?;

    let now = Utc::now();
    let record = MapRecord {
        id: MapId::fresh().into_string(),
        name,
        description: request.description.clone(),
        nodes: request.nodes,
        edges: request.edges,
        created_at: now,
        updated_at: now,
    };

    let mut maps = state.maps.lock().await;
    maps.insert(
        record.id.clone(),
        StoredMap {
            owner_id: request.owner_id,
            record: record.clone(),
        },
    );
    info!(map = %record.id, "created mind map");
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_map(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<MapRecord>, ApiError> {
    let maps = state.maps.lock().await;
    maps.get(&id)
        .map(|stored| Json(stored.record.clone()))
        .ok_or_else(ApiError::not_found)
}

async fn update_map(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    request: Result<Json<UpdateMapRequest>, JsonRejection>,
) -> Result<Json<MapRecord>, ApiError> {
    let Json(request) = request.map_err(reject_body)?;
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("name must not be empty"));
    }
    validate_document(name, &request.nodes, &request.edges)?;

    let mut maps = state.maps.lock().await;
    let stored = maps.get_mut(&id).ok_or_else(ApiError::not_found)?;

    // Full replace, last write wins.
    stored.record.name = name.to_owned();
    stored.record.description = request.description;
    stored.record.nodes = request.nodes;
    stored.record.edges = request.edges;
    stored.record.updated_at = Utc::now();

    info!(map = %id, "updated mind map");
    Ok(Json(stored.record.clone()))
}

async fn delete_map(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut maps = state.maps.lock().await;
    if maps.remove(&id).is_none() {
        return Err(ApiError::not_found());
    }
    info!(map = %id, "deleted mind map");
    Ok(Json(json!({ "message": "mind map deleted" })))
}
