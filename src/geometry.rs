//! Element geometry mocks.
//!
//! A headless DOM has no layout engine, so bounding boxes are a mocked
//! platform facility: tests install page-coordinate rects per element, and
//! the harness tracks a scroll offset to derive viewport-relative rects.
//! Elements with no installed rect report all zeros.

use std::collections::HashMap;

use crate::dom::NodeId;

/// Axis-aligned box in integer CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    pub const ZERO: Self = Self {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct GeometryState {
    rects: HashMap<NodeId, Rect>,
    pub(crate) scroll_x: i64,
    pub(crate) scroll_y: i64,
}

impl GeometryState {
    pub(crate) fn set_rect(&mut self, node_id: NodeId, rect: Rect) {
        self.rects.insert(node_id, rect);
    }

    /// Rect in page coordinates (scroll-independent).
    pub(crate) fn page_rect(&self, node_id: NodeId) -> Rect {
        self.rects.get(&node_id).copied().unwrap_or(Rect::ZERO)
    }

    /// Rect in viewport coordinates, the getBoundingClientRect contract.
    pub(crate) fn client_rect(&self, node_id: NodeId) -> Rect {
        let page = self.page_rect(node_id);
        Rect {
            x: page.x - self.scroll_x,
            y: page.y - self.scroll_y,
            ..page
        }
    }
}
