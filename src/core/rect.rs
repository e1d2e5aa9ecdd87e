//! Axis-Aligned Rectangles
//!
//! Fixed-point AABBs in screen space (origin top-left, +Y down).
//! Edge setters move the rectangle; they never resize it.

use serde::{Serialize, Deserialize};

use super::fixed::{Fixed, FIXED_SCALE};
use super::vec2::FixedVec2;

/// Axis-aligned rectangle with a top-left origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: Fixed,
    /// Top edge
    pub y: Fixed,
    /// Width (non-negative)
    pub w: Fixed,
    /// Height (non-negative)
    pub h: Fixed,
}

impl Rect {
    /// Create from fixed-point origin and size.
    #[inline]
    pub const fn new(x: Fixed, y: Fixed, w: Fixed, h: Fixed) -> Self {
        Self { x, y, w, h }
    }

    /// Create from whole-pixel origin and size.
    #[inline]
    pub const fn from_ints(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            x: x << FIXED_SCALE,
            y: y << FIXED_SCALE,
            w: w << FIXED_SCALE,
            h: h << FIXED_SCALE,
        }
    }

    /// Rectangle of `size` whose top-left corner is `pos`.
    #[inline]
    pub fn at_topleft(pos: FixedVec2, size: FixedVec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    /// Left edge.
    #[inline]
    pub fn left(&self) -> Fixed {
        self.x
    }

    /// Right edge, saturating at the top of the fixed range.
    #[inline]
    pub fn right(&self) -> Fixed {
        self.x.saturating_add(self.w)
    }

    /// Top edge.
    #[inline]
    pub fn top(&self) -> Fixed {
        self.y
    }

    /// Bottom edge, saturating at the top of the fixed range.
    #[inline]
    pub fn bottom(&self) -> Fixed {
        self.y.saturating_add(self.h)
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> FixedVec2 {
        FixedVec2::new(self.x.saturating_add(self.w >> 1), self.y.saturating_add(self.h >> 1))
    }

    /// Midpoint of the left edge.
    #[inline]
    pub fn mid_left(&self) -> FixedVec2 {
        FixedVec2::new(self.left(), self.center().y)
    }

    /// Midpoint of the right edge.
    #[inline]
    pub fn mid_right(&self) -> FixedVec2 {
        FixedVec2::new(self.right(), self.center().y)
    }

    /// Midpoint of the top edge.
    #[inline]
    pub fn mid_top(&self) -> FixedVec2 {
        FixedVec2::new(self.center().x, self.top())
    }

    /// Midpoint of the bottom edge.
    #[inline]
    pub fn mid_bottom(&self) -> FixedVec2 {
        FixedVec2::new(self.center().x, self.bottom())
    }

    /// Move so the left edge sits at `value`.
    #[inline]
    pub fn set_left(&mut self, value: Fixed) {
        self.x = value;
    }

    /// Move so the right edge sits at `value`.
    #[inline]
    pub fn set_right(&mut self, value: Fixed) {
        self.x = value.saturating_sub(self.w);
    }

    /// Move so the top edge sits at `value`.
    #[inline]
    pub fn set_top(&mut self, value: Fixed) {
        self.y = value;
    }

    /// Move so the bottom edge sits at `value`.
    #[inline]
    pub fn set_bottom(&mut self, value: Fixed) {
        self.y = value.saturating_sub(self.h);
    }

    /// Move so that the center lands on `center`.
    #[inline]
    pub fn set_center(&mut self, center: FixedVec2) {
        self.x = center.x - (self.w >> 1);
        self.y = center.y - (self.h >> 1);
    }

    /// Copy of this rectangle re-centered on `center`.
    #[inline]
    pub fn with_center(mut self, center: FixedVec2) -> Self {
        self.set_center(center);
        self
    }

    /// Rectangle of `size` whose left-edge midpoint is `anchor`.
    pub fn with_mid_left(anchor: FixedVec2, size: FixedVec2) -> Self {
        Self::new(anchor.x, anchor.y - (size.y >> 1), size.x, size.y)
    }

    /// Rectangle of `size` whose right-edge midpoint is `anchor`.
    pub fn with_mid_right(anchor: FixedVec2, size: FixedVec2) -> Self {
        Self::new(anchor.x - size.x, anchor.y - (size.y >> 1), size.x, size.y)
    }

    /// Rectangle of `size` whose top-edge midpoint is `anchor`.
    pub fn with_mid_top(anchor: FixedVec2, size: FixedVec2) -> Self {
        Self::new(anchor.x - (size.x >> 1), anchor.y, size.x, size.y)
    }

    /// Rectangle of `size` whose bottom-edge midpoint is `anchor`.
    pub fn with_mid_bottom(anchor: FixedVec2, size: FixedVec2) -> Self {
        Self::new(anchor.x - (size.x >> 1), anchor.y - size.y, size.x, size.y)
    }

    /// Grow (or shrink, with negative deltas) around the same center.
    ///
    /// Sizes never go below zero.
    pub fn inflate(&self, dw: Fixed, dh: Fixed) -> Self {
        let w = (self.w + dw).max(0);
        let h = (self.h + dh).max(0);
        Self::new(self.x - ((w - self.w) >> 1), self.y - ((h - self.h) >> 1), w, h)
    }

    /// Strict overlap test: rectangles that only share an edge do not collide.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}
