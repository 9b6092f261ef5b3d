// Copyright 2025 the Dragdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the surface: node identifiers, markers, styles, and element specs.

use alloc::string::String;
use kurbo::{Point, Size};

/// Identifier for an element on a [`Surface`](crate::Surface).
///
/// A small, copyable handle consisting of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Stale `NodeId`s never alias a different live node because the generation must match.
/// Use [`BoxSurface::is_alive`](crate::BoxSurface::is_alive) to check liveness.
///
/// Adapters over a foreign element model (for example a browser DOM) keep their own
/// `NodeId` ↔ element mapping and mint ids with [`NodeId::from_raw`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Build an identifier from a raw slot and generation.
    pub const fn from_raw(slot: u32, generation: u32) -> Self {
        Self(slot, generation)
    }

    /// The raw `(slot, generation)` pair.
    pub const fn into_raw(self) -> (u32, u32) {
        (self.0, self.1)
    }
}

bitflags::bitflags! {
    /// Class-like visual markers toggled by the interaction layer.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Markers: u8 {
        /// Node is a floating drag proxy.
        const DRAG        = 0b0000_0001;
        /// Node is a drop zone currently hosting a dragged item.
        const DROP        = 0b0000_0010;
        /// Node is a placeholder docked inside a drop zone.
        const PLACEHOLDER = 0b0000_0100;
    }
}

/// How a node is positioned relative to its parent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Positioning {
    /// Participates in the parent's flow.
    #[default]
    Static,
    /// Taken out of flow and placed at [`Style::origin`] relative to the offset parent.
    Absolute,
}

/// Inline style properties the interaction layer writes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Style {
    /// Positioning scheme.
    pub positioning: Positioning,
    /// Left/top offset, only meaningful for [`Positioning::Absolute`].
    pub origin: Point,
    /// Opacity in `0.0..=1.0`.
    pub opacity: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            positioning: Positioning::Static,
            origin: Point::ZERO,
            opacity: 1.0,
        }
    }
}

impl Style {
    /// A fully opaque, in-flow style.
    pub const STATIC: Self = Self {
        positioning: Positioning::Static,
        origin: Point::ZERO,
        opacity: 1.0,
    };

    /// An absolutely positioned style at `origin`, keeping `opacity`.
    pub fn absolute(origin: Point, opacity: f64) -> Self {
        Self {
            positioning: Positioning::Absolute,
            origin,
            opacity,
        }
    }

    /// Returns true for [`Positioning::Absolute`].
    pub fn is_absolute(&self) -> bool {
        self.positioning == Positioning::Absolute
    }
}

/// How a container places its in-flow children.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Flow {
    /// Children sit at their own [`ElementSpec::origin`].
    #[default]
    Free,
    /// Children are laid out left to right in document order.
    Row,
    /// Children are laid out top to bottom in document order.
    Column,
}

/// Static description of an element in a [`BoxSurface`](crate::BoxSurface).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementSpec {
    /// Tag name matched by [`Selector`](crate::Selector).
    pub tag: String,
    /// Border-box size.
    pub size: Size,
    /// Origin relative to the parent when the parent uses [`Flow::Free`] (or page origin for roots).
    pub origin: Point,
    /// Placement policy for this element's children.
    pub flow: Flow,
}

impl ElementSpec {
    /// An element with a tag and size, at the origin.
    pub fn new(tag: &str, size: Size) -> Self {
        Self {
            tag: tag.into(),
            size,
            ..Default::default()
        }
    }

    /// Builder: set the origin.
    pub fn at(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Builder: set the child flow.
    pub fn flow(mut self, flow: Flow) -> Self {
        self.flow = flow;
        self
    }
}
