// Copyright 2025 the Dragdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned boxes used for hit testing and sort placement.
//!
//! All predicates are inclusive and deliberately loose; callers resolve ties by scan order.

use dragdrop_surface::{NodeId, Surface};
use kurbo::{Point, Rect, Size};

/// A measured element box in page coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Bounds {
    rect: Rect,
}

impl Bounds {
    /// Wrap an existing rectangle.
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }

    /// Measure `node` from its live offset and size.
    pub fn measure(surface: &dyn Surface, node: NodeId) -> Self {
        let mut bounds = Self::default();
        bounds.reset(surface, node);
        bounds
    }

    /// Recompute from `node`'s live offset and size.
    pub fn reset(&mut self, surface: &dyn Surface, node: NodeId) {
        let origin = surface.offset(node);
        self.rect = Rect::from_origin_size(origin, surface.size(node));
    }

    /// Top edge.
    pub fn top(&self) -> f64 {
        self.rect.y0
    }

    /// Left edge.
    pub fn left(&self) -> f64 {
        self.rect.x0
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.rect.x1
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.rect.y1
    }

    /// The underlying rectangle.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// True iff `p` lies within `[left, right] × [top, bottom]`.
    ///
    /// Unlike [`Rect::contains`] the far edges are inclusive.
    pub fn point_intersect(&self, p: Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// True iff `p` is north-west of the bottom-right corner: a candidate predecessor.
    pub fn nw_of_br(&self, p: Point) -> bool {
        p.x <= self.right() && p.y <= self.bottom()
    }

    /// True iff `p` is south-east of the top-left corner: a candidate successor.
    pub fn se_of_tl(&self, p: Point) -> bool {
        p.x >= self.left() && p.y >= self.top()
    }
}

impl From<Rect> for Bounds {
    fn from(rect: Rect) -> Self {
        Self::new(rect)
    }
}

/// Clamp a box origin so a box of `extent` stays inside `limits`.
///
/// The minimum wins when the box is larger than the limits.
pub fn clamp_origin(limits: Rect, pos: Point, extent: Size) -> Point {
    Point::new(
        limits.x0.max((limits.x1 - extent.width).min(pos.x)),
        limits.y0.max((limits.y1 - extent.height).min(pos.y)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use dragdrop_surface::{BoxSurface, ElementSpec};

    fn b(x0: f64, y0: f64, x1: f64, y1: f64) -> Bounds {
        Bounds::new(Rect::new(x0, y0, x1, y1))
    }

    #[test]
    fn point_intersect_is_inclusive() {
        let r = b(10.0, 10.0, 110.0, 60.0);
        assert!(r.point_intersect(Point::new(10.0, 10.0)));
        assert!(r.point_intersect(Point::new(110.0, 60.0)));
        assert!(r.point_intersect(Point::new(50.0, 30.0)));
        assert!(!r.point_intersect(Point::new(5.0, 5.0)));
        assert!(!r.point_intersect(Point::new(110.5, 30.0)));
    }

    #[test]
    fn sort_predicates() {
        let r = b(20.0, 0.0, 30.0, 10.0);
        assert!(r.nw_of_br(Point::new(5.0, 5.0)));
        assert!(r.nw_of_br(Point::new(30.0, 10.0)));
        assert!(!r.nw_of_br(Point::new(31.0, 5.0)));
        assert!(r.se_of_tl(Point::new(20.0, 0.0)));
        assert!(!r.se_of_tl(Point::new(5.0, 5.0)));
        // Both hold anywhere inside the box.
        let inside = Point::new(25.0, 5.0);
        assert!(r.nw_of_br(inside) && r.se_of_tl(inside));
    }

    #[test]
    fn measure_uses_offset_and_size() {
        let mut s = BoxSurface::default();
        let n = s.insert(
            None,
            ElementSpec::new("div", Size::new(100.0, 50.0)).at(Point::new(10.0, 10.0)),
        );
        let m = Bounds::measure(&s, n);
        assert_eq!((m.left(), m.top(), m.right(), m.bottom()), (10.0, 10.0, 110.0, 60.0));
    }

    #[test]
    fn clamp_to_manual_box() {
        let limits = Rect::new(0.0, 0.0, 100.0, 50.0);
        let extent = Size::new(20.0, 10.0);
        assert_eq!(
            clamp_origin(limits, Point::new(150.0, 5.0), extent),
            Point::new(80.0, 5.0)
        );
        assert_eq!(
            clamp_origin(limits, Point::new(-30.0, -30.0), extent),
            Point::new(0.0, 0.0)
        );
        assert_eq!(
            clamp_origin(limits, Point::new(40.0, 45.0), extent),
            Point::new(40.0, 40.0)
        );
    }

    #[test]
    fn oversized_box_pins_to_minimum() {
        let limits = Rect::new(0.0, 0.0, 10.0, 10.0);
        let p = clamp_origin(limits, Point::new(3.0, 3.0), Size::new(50.0, 50.0));
        assert_eq!(p, Point::ZERO);
    }
}
