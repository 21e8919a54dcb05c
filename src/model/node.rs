// SPDX-FileCopyrightText: 2026 Mindgrove contributors
// SPDX-License-Identifier: MIT

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// The kind of a node. Determines which payload variant it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Text,
    Image,
    Code,
    Audio,
    Video,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Code => "code",
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }

    pub const ALL: [NodeKind; 5] = [
        NodeKind::Text,
        NodeKind::Image,
        NodeKind::Code,
        NodeKind::Audio,
        NodeKind::Video,
    ];
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A media reference carried by image/audio/video nodes.
///
/// Either a plain URL or an embedded `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaRef {
    Url(String),
    DataUri(String),
}

impl MediaRef {
    /// Classifies a raw reference string by its scheme.
    pub fn parse(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.starts_with("data:") {
            Self::DataUri(value)
        } else {
            Self::Url(value)
        }
    }

    /// Embeds raw bytes as a base64 data URI.
    pub fn embed(mime: &str, bytes: &[u8]) -> Self {
        Self::DataUri(format!("data:{mime};base64,{}", BASE64.encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Url(value) | Self::DataUri(value) => value,
        }
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, Self::DataUri(_))
    }
}

/// Kind-specific node payload.
///
/// A tagged union keyed by [`NodeKind`]; each variant carries only its own
/// fields. Text nodes carry nothing beyond the label/color on the node itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodePayload {
    Text,
    Image { media: Option<MediaRef> },
    Code { source: String, language: String },
    Audio { media: Option<MediaRef> },
    Video { media: Option<MediaRef> },
}

impl NodePayload {
    /// The empty payload for a freshly created node of the given kind.
    pub fn default_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Text => Self::Text,
            NodeKind::Image => Self::Image { media: None },
            NodeKind::Code => Self::Code {
                source: String::new(),
                language: "javascript".to_owned(),
            },
            NodeKind::Audio => Self::Audio { media: None },
            NodeKind::Video => Self::Video { media: None },
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Text => NodeKind::Text,
            Self::Image { .. } => NodeKind::Image,
            Self::Code { .. } => NodeKind::Code,
            Self::Audio { .. } => NodeKind::Audio,
            Self::Video { .. } => NodeKind::Video,
        }
    }
}

/// A canvas position in floating-point canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A single node of the document graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    label: String,
    color: Option<String>,
    position: Position,
    is_root: bool,
    payload: NodePayload,
}

impl Node {
    pub fn new(label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            label: label.into(),
            color: None,
            position: Position::default(),
            is_root: false,
            payload: NodePayload::default_for(kind),
        }
    }

    /// The document root. Created once at document genesis; never deleted.
    pub fn root(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: None,
            position: Position::default(),
            is_root: true,
            payload: NodePayload::Text,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn set_color<T: Into<String>>(&mut self, color: Option<T>) {
        self.color = color.map(Into::into);
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }

    pub fn kind(&self) -> NodeKind {
        self.payload.kind()
    }

    pub fn payload(&self) -> &NodePayload {
        &self.payload
    }

    pub fn set_payload(&mut self, payload: NodePayload) {
        self.payload = payload;
    }
}

#[cfg(test)]
mod tests {
    use super::{MediaRef, Node, NodeKind, NodePayload, Position};

    #[test]
    fn media_ref_classifies_by_scheme() {
        let url = MediaRef::parse("https://example.test/cat.png");
        assert_eq!(url, MediaRef::Url("https://example.test/cat.png".to_owned()));
        assert!(!url.is_embedded());

        let data = MediaRef::parse("data:image/png;base64,AAAA");
        assert!(data.is_embedded());
    }

    #[test]
    fn media_ref_embed_produces_data_uri() {
        let media = MediaRef::embed("image/png", b"\x89PNG");
        assert!(media.as_str().starts_with("data:image/png;base64,"));
        assert!(media.is_embedded());
    }

    #[test]
    fn payload_kind_round_trips_through_default() {
        for kind in NodeKind::ALL {
            assert_eq!(NodePayload::default_for(kind).kind(), kind);
        }
    }

    #[test]
    fn node_can_be_constructed_and_updated() {
        let mut node = Node::new("Idea", NodeKind::Text);
        assert_eq!(node.label(), "Idea");
        assert_eq!(node.kind(), NodeKind::Text);
        assert!(!node.is_root());
        assert_eq!(node.color(), None);

        node.set_label("Better idea");
        node.set_color(Some("#3b82f6"));
        node.set_position(Position::new(250.0, -12.5));

        assert_eq!(node.label(), "Better idea");
        assert_eq!(node.color(), Some("#3b82f6"));
        assert_eq!(node.position(), Position::new(250.0, -12.5));
    }

    #[test]
    fn root_node_is_text_and_flagged() {
        let root = Node::root("Central topic");
        assert!(root.is_root());
        assert_eq!(root.kind(), NodeKind::Text);
    }
}
