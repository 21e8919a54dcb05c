// SPDX-FileCopyrightText: 2026 Mindgrove contributors
// SPDX-License-Identifier: MIT

//! Mindgrove: terminal mind-map/flowchart editor with cloud persistence.
//!
//! The crate is split along the editing pipeline: `model` holds the document,
//! `ops` mutates it, `layout` assigns positions, `store` talks to the remote
//! persistence API (which `api` implements), and `tui` binds keys to all of it.

pub mod api;
pub mod layout;
pub mod model;
pub mod ops;
pub mod store;
pub mod tui;
