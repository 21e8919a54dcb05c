// SPDX-FileCopyrightText: 2026 Mindgrove contributors
// SPDX-License-Identifier: MIT

//! Persistence adapter.
//!
//! `wire` defines the JSON representation shared with the REST API; `client`
//! is the HTTP implementation of [`RemoteStore`]. Saving is explicit and a
//! full-document replace; nothing here ever mutates a document on failure.

pub mod client;
pub mod wire;

pub use client::{HttpStore, RemoteStore, StoreError};
pub use wire::{
    decode_map, decode_record, encode_edges, encode_nodes, CreateMapRequest, MapRecord,
    MapSummary, UpdateMapRequest, WireEdge, WireEdgeStyle, WireError, WireNode, WireNodeData,
    WirePosition,
};
