// SPDX-FileCopyrightText: 2026 Mindgrove contributors
// SPDX-License-Identifier: MIT

use super::ids::NodeId;

/// Cosmetic edge styling. Never interpreted by traversal or layout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EdgeStyle {
    stroke: Option<String>,
    stroke_width: Option<f64>,
    animated: bool,
}

impl EdgeStyle {
    pub fn stroke(&self) -> Option<&str> {
        self.stroke.as_deref()
    }

    pub fn set_stroke<T: Into<String>>(&mut self, stroke: Option<T>) {
        self.stroke = stroke.map(Into::into);
    }

    pub fn stroke_width(&self) -> Option<f64> {
        self.stroke_width
    }

    pub fn set_stroke_width(&mut self, stroke_width: Option<f64>) {
        self.stroke_width = stroke_width;
    }

    pub fn animated(&self) -> bool {
        self.animated
    }

    pub fn set_animated(&mut self, animated: bool) {
        self.animated = animated;
    }
}

/// A directed edge (source → target).
///
/// Direction matters for subtree traversal; self-loops and parallel edges
/// are permitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    source_id: NodeId,
    target_id: NodeId,
    style: EdgeStyle,
}

impl Edge {
    pub fn new(source_id: NodeId, target_id: NodeId) -> Self {
        Self {
            source_id,
            target_id,
            style: EdgeStyle::default(),
        }
    }

    pub fn source_id(&self) -> &NodeId {
        &self.source_id
    }

    pub fn target_id(&self) -> &NodeId {
        &self.target_id
    }

    pub fn style(&self) -> &EdgeStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut EdgeStyle {
        &mut self.style
    }
}
