// Copyright 2025 the Dragdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounding constraints applied to a floating proxy while it follows the pointer.

use alloc::string::{String, ToString};
use core::str::FromStr;

use dragdrop_surface::{NodeId, Surface};
use kurbo::{Point, Rect, Size};

use crate::geometry::clamp_origin;

/// Closed interval on one axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Span {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl Span {
    /// Create a span.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Where a proxy may travel.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum BoundingBox {
    /// No constraint.
    #[default]
    Unbounded,
    /// Inside the element's offset parent: `[0, parent width] × [0, parent height]`.
    OffsetParent,
    /// Inside the viewport: `[0, viewport width] × [0, viewport height]`.
    WindowSize,
    /// Explicit limits.
    Manual {
        /// Horizontal limits.
        x: Span,
        /// Vertical limits.
        y: Span,
    },
}

impl BoundingBox {
    /// Shorthand for [`BoundingBox::Manual`].
    pub const fn manual(x: Span, y: Span) -> Self {
        Self::Manual { x, y }
    }

    /// The rectangle a proxy of `element` must stay within, if any.
    ///
    /// An element without an offset parent is bounded by the viewport.
    pub fn limits(&self, surface: &dyn Surface, element: NodeId) -> Option<Rect> {
        match *self {
            Self::Unbounded => None,
            Self::OffsetParent => {
                let extent = surface
                    .offset_parent(element)
                    .map(|parent| surface.size(parent))
                    .unwrap_or_else(|| surface.viewport());
                Some(Rect::from_origin_size(Point::ZERO, extent))
            }
            Self::WindowSize => Some(Rect::from_origin_size(Point::ZERO, surface.viewport())),
            Self::Manual { x, y } => Some(Rect::new(x.min, y.min, x.max, y.max)),
        }
    }

    /// Clamp a proposed proxy origin.
    pub fn clamp(&self, surface: &dyn Surface, element: NodeId, pos: Point, extent: Size) -> Point {
        match self.limits(surface, element) {
            Some(limits) => clamp_origin(limits, pos, extent),
            None => pos,
        }
    }
}

/// Error returned when a bounding box name is not recognized.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown bounding box `{0}` (expected `offsetParent`, `windowSize` or `none`)")]
pub struct BoundingBoxError(String);

impl FromStr for BoundingBox {
    type Err = BoundingBoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "none" => Ok(Self::Unbounded),
            "offsetParent" => Ok(Self::OffsetParent),
            "windowSize" => Ok(Self::WindowSize),
            other => Err(BoundingBoxError(other.to_string())),
        }
    }
}
