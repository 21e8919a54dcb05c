// SPDX-FileCopyrightText: 2026 Mindgrove contributors
// SPDX-License-Identifier: MIT

//! Core document model.
//!
//! A [`MindMap`] owns typed nodes and directed edges; node payloads are a sum
//! type keyed by [`NodeKind`].

pub mod document;
pub mod edge;
pub(crate) mod fixtures;
pub mod ids;
pub mod node;

pub use document::{IntegrityError, MindMap};
pub use edge::{Edge, EdgeStyle};
pub use ids::{EdgeId, Id, IdError, MapId, NodeId, OwnerId};
pub use node::{MediaRef, Node, NodeKind, NodePayload, Position};
