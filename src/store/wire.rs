// SPDX-FileCopyrightText: 2026 Mindgrove contributors
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    Edge, EdgeId, IdError, IntegrityError, MapId, MediaRef, MindMap, Node, NodeId, NodeKind,
    NodePayload, Position,
};

/// Node as it travels over the wire. The `type`/`data` split mirrors the
/// stored document format; `data` is a flat bag whose populated fields depend
/// on the node kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub position: WirePosition,
    pub data: WireNodeData,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WirePosition {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireNodeData {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub is_root: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub animated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<WireEdgeStyle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEdgeStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

/// List entry: metadata only, no node/edge bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSummary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full document as stored remotely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub nodes: Vec<WireNode>,
    pub edges: Vec<WireEdge>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMapRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub nodes: Vec<WireNode>,
    pub edges: Vec<WireEdge>,
    pub owner_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMapRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub nodes: Vec<WireNode>,
    pub edges: Vec<WireEdge>,
}

impl UpdateMapRequest {
    /// Snapshot of a document for a full-replace save.
    pub fn from_map(map: &MindMap) -> Self {
        Self {
            name: map.name().to_owned(),
            description: map.description().map(ToOwned::to_owned),
            nodes: encode_nodes(map),
            edges: encode_edges(map),
        }
    }
}

impl CreateMapRequest {
    pub fn from_map(map: &MindMap, owner_id: &crate::model::OwnerId) -> Self {
        Self {
            name: Some(map.name().to_owned()),
            description: map.description().map(ToOwned::to_owned),
            nodes: encode_nodes(map),
            edges: encode_edges(map),
            owner_id: owner_id.as_str().to_owned(),
        }
    }
}

// Text nodes travel as `custom`, the type name the canvas renderer registers
// for them. `text` is accepted on the way in.
const TEXT_NODE_TYPE: &str = "custom";

fn encode_kind(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Text => TEXT_NODE_TYPE,
        other => other.as_str(),
    }
}

fn decode_kind(value: &str) -> Option<NodeKind> {
    match value {
        TEXT_NODE_TYPE | "text" => Some(NodeKind::Text),
        "image" => Some(NodeKind::Image),
        "code" => Some(NodeKind::Code),
        "audio" => Some(NodeKind::Audio),
        "video" => Some(NodeKind::Video),
        _ => None,
    }
}

pub fn encode_nodes(map: &MindMap) -> Vec<WireNode> {
    map.nodes()
        .iter()
        .map(|(node_id, node)| {
            let mut data = WireNodeData {
                label: node.label().to_owned(),
                color: node.color().map(ToOwned::to_owned),
                is_root: node.is_root(),
                ..WireNodeData::default()
            };
            match node.payload() {
                NodePayload::Text => {}
                NodePayload::Image { media } => {
                    data.image_url = media.as_ref().map(|m| m.as_str().to_owned());
                }
                NodePayload::Audio { media } => {
                    data.audio_url = media.as_ref().map(|m| m.as_str().to_owned());
                }
                NodePayload::Video { media } => {
                    data.video_url = media.as_ref().map(|m| m.as_str().to_owned());
                }
                NodePayload::Code { source, language } => {
                    data.code = Some(source.clone());
                    data.language = Some(language.clone());
                }
            }

            WireNode {
                id: node_id.as_str().to_owned(),
                node_type: encode_kind(node.kind()).to_owned(),
                position: WirePosition {
                    x: node.position().x,
                    y: node.position().y,
                },
                data,
            }
        })
        .collect()
}

pub fn encode_edges(map: &MindMap) -> Vec<WireEdge> {
    map.edges()
        .iter()
        .map(|(edge_id, edge)| {
            let style = edge.style();
            let wire_style = (style.stroke().is_some() || style.stroke_width().is_some()).then(
                || WireEdgeStyle {
                    stroke: style.stroke().map(ToOwned::to_owned),
                    stroke_width: style.stroke_width(),
                },
            );
            WireEdge {
                id: edge_id.as_str().to_owned(),
                source: edge.source_id().as_str().to_owned(),
                target: edge.target_id().as_str().to_owned(),
                animated: style.animated(),
                style: wire_style,
            }
        })
        .collect()
}

/// Decodes wire nodes/edges into a validated document.
pub fn decode_map(
    map_id: MapId,
    name: &str,
    description: Option<&str>,
    wire_nodes: &[WireNode],
    wire_edges: &[WireEdge],
) -> Result<MindMap, WireError> {
    let mut nodes = BTreeMap::new();
    for wire_node in wire_nodes {
        let node_id =
            NodeId::new(wire_node.id.clone()).map_err(|source| WireError::InvalidId {
                field: "node.id",
                value: wire_node.id.clone(),
                source,
            })?;
        let kind = decode_kind(&wire_node.node_type).ok_or_else(|| WireError::UnknownNodeKind {
            value: wire_node.node_type.clone(),
        })?;

        let data = &wire_node.data;
        let payload = match kind {
            NodeKind::Text => NodePayload::Text,
            NodeKind::Image => NodePayload::Image {
                media: data.image_url.clone().map(MediaRef::parse),
            },
            NodeKind::Audio => NodePayload::Audio {
                media: data.audio_url.clone().map(MediaRef::parse),
            },
            NodeKind::Video => NodePayload::Video {
                media: data.video_url.clone().map(MediaRef::parse),
            },
            NodeKind::Code => NodePayload::Code {
                source: data.code.clone().unwrap_or_default(),
                language: data
                    .language
                    .clone()
                    .unwrap_or_else(|| "javascript".to_owned()),
            },
        };

        let mut node = if data.is_root {
            Node::root(data.label.clone())
        } else {
            Node::new(data.label.clone(), kind)
        };
        node.set_color(data.color.clone());
        node.set_position(Position::new(wire_node.position.x, wire_node.position.y));
        node.set_payload(payload);
        nodes.insert(node_id, node);
    }

    let mut edges = BTreeMap::new();
    for wire_edge in wire_edges {
        let edge_id = EdgeId::new(wire_edge.id.clone()).map_err(|source| WireError::InvalidId {
            field: "edge.id",
            value: wire_edge.id.clone(),
            source,
        })?;
        let source_id =
            NodeId::new(wire_edge.source.clone()).map_err(|source| WireError::InvalidId {
                field: "edge.source",
                value: wire_edge.source.clone(),
                source,
            })?;
        let target_id =
            NodeId::new(wire_edge.target.clone()).map_err(|source| WireError::InvalidId {
                field: "edge.target",
                value: wire_edge.target.clone(),
                source,
            })?;

        let mut edge = Edge::new(source_id, target_id);
        edge.style_mut().set_animated(wire_edge.animated);
        if let Some(style) = &wire_edge.style {
            edge.style_mut().set_stroke(style.stroke.clone());
            edge.style_mut().set_stroke_width(style.stroke_width);
        }
        edges.insert(edge_id, edge);
    }

    MindMap::from_parts(
        map_id,
        name,
        description.map(ToOwned::to_owned),
        nodes,
        edges,
    )
    .map_err(WireError::Integrity)
}

/// Decodes a fetched record into a document.
pub fn decode_record(record: &MapRecord) -> Result<MindMap, WireError> {
    let map_id = MapId::new(record.id.clone()).map_err(|source| WireError::InvalidId {
        field: "id",
        value: record.id.clone(),
        source,
    })?;
    decode_map(
        map_id,
        &record.name,
        record.description.as_deref(),
        &record.nodes,
        &record.edges,
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum WireError {
    InvalidId {
        field: &'static str,
        value: String,
        source: IdError,
    },
    UnknownNodeKind {
        value: String,
    },
    Integrity(IntegrityError),
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId {
                field,
                value,
                source,
            } => write!(f, "invalid {field} '{value}': {source}"),
            Self::UnknownNodeKind { value } => write!(f, "unknown node type '{value}'"),
            Self::Integrity(source) => write!(f, "invalid document: {source}"),
        }
    }
}

impl std::error::Error for WireError {}
