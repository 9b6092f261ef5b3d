// Copyright 2025 the Dragdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dragdrop Surface: the element adapter contract and a Kurbo-native in-memory surface.
//!
//! The drag and drop core never touches a concrete element model.
//! Everything it needs from the host (querying children, measuring boxes, cloning and moving
//! nodes, toggling visual markers, writing inline position styles) goes through [`Surface`].
//!
//! ## API overview
//!
//! - [`Surface`]: object-safe adapter trait over [`NodeId`] handles.
//! - [`BoxSurface`]: a generational element tree implementing [`Surface`], for tests, demos,
//!   and hosts that keep their own retained tree.
//! - [`ElementSpec`] / [`Flow`]: static element description and child placement policy.
//! - [`Markers`]: class-like flags (`DRAG`, `DROP`, `PLACEHOLDER`).
//! - [`Style`] / [`Positioning`]: inline position and opacity.
//! - [`Selector`]: which descendants count as items, parsed from strings like `"> li"`.
//!
//! ## Not a layout engine
//!
//! [`BoxSurface`] stacks in-flow children of row/column containers in document order so that
//! reordering moves boxes, and places absolutely positioned nodes at their inline origin.
//! Sizes are never derived from content.
//!
//! ## Minimal usage
//!
//! ```
//! use dragdrop_surface::{BoxSurface, ElementSpec, Flow, Surface};
//! use kurbo::{Point, Size};
//!
//! let mut surface = BoxSurface::default();
//! let list = surface.insert(
//!     None,
//!     ElementSpec::new("ul", Size::new(200.0, 20.0))
//!         .at(Point::new(10.0, 10.0))
//!         .flow(Flow::Row),
//! );
//! let a = surface.insert(Some(list), ElementSpec::new("li", Size::new(50.0, 20.0)));
//! let b = surface.insert(Some(list), ElementSpec::new("li", Size::new(50.0, 20.0)));
//!
//! assert_eq!(surface.offset(b), Point::new(60.0, 10.0));
//! surface.insert_before(b, a);
//! assert_eq!(surface.offset(b), Point::new(10.0, 10.0));
//! assert_eq!(surface.query(list, &"> li".parse().unwrap()), vec![b, a]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod selector;
mod surface;
mod tree;
mod types;

pub use selector::{Selector, SelectorError};
pub use surface::Surface;
pub use tree::BoxSurface;
pub use types::{ElementSpec, Flow, Markers, NodeId, Positioning, Style};
