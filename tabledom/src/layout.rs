use std::collections::HashMap;

use crate::document::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub const fn right(&self) -> u16 {
        self.x + self.width
    }

    pub const fn bottom(&self) -> u16 {
        self.y + self.height
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Move the rectangle by a screen offset.
    pub fn offset(self, dx: u16, dy: u16) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..self
        }
    }

    /// Smallest rectangle covering both.
    pub fn union(self, other: Rect) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }
}

/// Screen rectangles of painted elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutResult {
    rects: HashMap<NodeId, Rect>,
}

impl LayoutResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: NodeId, rect: Rect) {
        self.rects.insert(node, rect);
    }

    /// Grow the recorded rectangle of `node` to cover `rect`.
    pub fn extend(&mut self, node: NodeId, rect: Rect) {
        let merged = match self.rects.get(&node) {
            Some(existing) => existing.union(rect),
            None => rect,
        };
        self.rects.insert(node, merged);
    }

    pub fn get(&self, node: NodeId) -> Option<Rect> {
        self.rects.get(&node).copied()
    }

    /// Shift every rectangle, for when painted lines land below other content.
    pub fn offset(&self, dx: u16, dy: u16) -> Self {
        Self {
            rects: self
                .rects
                .iter()
                .map(|(node, rect)| (*node, rect.offset(dx, dy)))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}
