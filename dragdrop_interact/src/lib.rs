// Copyright 2025 the Dragdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dragdrop Interact: pointer-driven drag, drop, and sort coordination.
//!
//! This crate is the interaction core. It tracks a dragged item's session, hit-tests it
//! against drop zones, constrains its motion, and reorders items within sortable lists.
//! It never touches a concrete element model: everything goes through a
//! [`Surface`](dragdrop_surface::Surface) held by a [`DragContext`].
//!
//! ## Actors
//!
//! - [`Draggable`]: one bound element. Emits `beforedrag`, `dragstart`, `drag`, `dragend`,
//!   and `unbind`.
//! - [`Group`]: a set of draggables whose `dragstart` / `dragend` are re-broadcast. Zones
//!   find dragged items through groups.
//! - [`Droppable`]: a zone. Emits `dragover`, `dragout`, `dropstart`, and `dropend`; its
//!   receive/surrender/drop behavior can be replaced with [`DropHooks`].
//! - [`Sortable`]: a list riding on a droppable that moves the item's placeholder while it
//!   hovers.
//!
//! Every actor is a cheap, clonable handle around shared single-threaded state. Handles
//! between actors are strong in one direction only (item → its groups and container);
//! every subscription closure holds a weak handle.
//!
//! ## Pointer input
//!
//! The host feeds raw events into the context's [`PointerSource`], either pre-normalized
//! ([`PointerSource::press`], [`PointerSource::move_to`], [`PointerSource::release`]) or
//! by name ([`PointerSource::dispatch_raw`]). Whether the host speaks mouse or touch is
//! decided once in [`PointerConfig`].
//!
//! ## Minimal example
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//!
//! use dragdrop_interact::{
//!     DragContext, DraggableOptions, DroppableOptions, Group, PointerConfig, Sortable,
//!     SortableOptions, SurfaceRef,
//! };
//! use dragdrop_surface::{BoxSurface, ElementSpec, Flow};
//! use kurbo::{Point, Size};
//!
//! let boxes = Rc::new(RefCell::new(BoxSurface::default()));
//! let (list, items) = {
//!     let mut s = boxes.borrow_mut();
//!     let list = s.insert(None, ElementSpec::new("ul", Size::new(120.0, 10.0)).flow(Flow::Row));
//!     let items: Vec<_> = (0..3)
//!         .map(|_| s.insert(Some(list), ElementSpec::new("li", Size::new(10.0, 10.0))))
//!         .collect();
//!     (list, items)
//! };
//! let surface: SurfaceRef = boxes.clone();
//! let ctx = DragContext::new(surface, PointerConfig::detect(false));
//!
//! let group = Group::new(&ctx);
//! let last = group.add(DraggableOptions::new(items[2])).unwrap();
//! let _list = Sortable::new(
//!     &ctx,
//!     SortableOptions::new(list).droppable_options(DroppableOptions::default().group(&group)),
//! )
//! .unwrap();
//!
//! let pointer = ctx.pointer();
//! pointer.press(items[2], Point::new(25.0, 5.0));
//! for _ in 0..4 {
//!     pointer.move_to(Point::new(5.0, 5.0));
//! }
//! pointer.release(Point::new(5.0, 5.0));
//!
//! assert_eq!(boxes.borrow().children(list), &[items[2], items[0], items[1]]);
//! assert!(!last.is_dragging());
//! ```
//!
//! This crate is `no_std` and uses `alloc`. Lifecycle transitions are logged at `debug`
//! level and per-frame activity at `trace` level through the `log` facade.

#![no_std]

extern crate alloc;

pub mod bounding;
pub mod context;
pub mod draggable;
pub mod droppable;
pub mod events;
pub mod geometry;
pub mod group;
pub mod pointer;
pub mod sortable;

#[cfg(test)]
mod testing;

pub use bounding::{BoundingBox, BoundingBoxError, Span};
pub use context::{BindingId, BindingIds, DragContext, SurfaceRef};
pub use draggable::{Draggable, DraggableOptions, PROXY_OPACITY, Proxy};
pub use droppable::{DropHook, DropHooks, Droppable, DroppableOptions};
pub use events::{
    DragEvent, DragEventKind, DropEvent, DropEventKind, GroupEvent, GroupEventKind,
};
pub use geometry::{Bounds, clamp_origin};
pub use group::Group;
pub use pointer::{
    Button, EventNames, InputScheme, InputSchemeError, PointerConfig, PointerEvent,
    PointerPhase, PointerSource,
};
pub use sortable::{DroppableSource, SortItem, Sortable, SortableOptions};
