// Copyright 2025 the Dragdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures for unit tests.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use dragdrop_surface::{BoxSurface, ElementSpec, NodeId};
use kurbo::Point;

use crate::context::{DragContext, SurfaceRef};
use crate::draggable::Draggable;
use crate::droppable::Droppable;
use crate::events::{DragEventKind, DropEventKind};
use crate::pointer::PointerConfig;

/// A [`BoxSurface`] wired into a mouse-driven context.
pub(crate) struct Stage {
    pub(crate) surface: Rc<RefCell<BoxSurface>>,
    pub(crate) ctx: DragContext,
}

impl Stage {
    pub(crate) fn new() -> Self {
        let surface = Rc::new(RefCell::new(BoxSurface::default()));
        let shared: SurfaceRef = surface.clone();
        Self {
            surface,
            ctx: DragContext::new(shared, PointerConfig::default()),
        }
    }

    pub(crate) fn add(&self, parent: Option<NodeId>, spec: ElementSpec) -> NodeId {
        self.surface.borrow_mut().insert(parent, spec)
    }

    pub(crate) fn look<R>(&self, f: impl FnOnce(&BoxSurface) -> R) -> R {
        f(&self.surface.borrow())
    }

    pub(crate) fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.surface.borrow().children(node).to_vec()
    }

    pub(crate) fn press(&self, target: NodeId, x: f64, y: f64) -> bool {
        self.ctx.pointer().press(target, Point::new(x, y))
    }

    pub(crate) fn move_to(&self, x: f64, y: f64) -> bool {
        self.ctx.pointer().move_to(Point::new(x, y))
    }

    pub(crate) fn release(&self, x: f64, y: f64) -> bool {
        self.ctx.pointer().release(Point::new(x, y))
    }
}

/// Event names in the order they fired.
pub(crate) type Journal = Rc<RefCell<Vec<&'static str>>>;

pub(crate) fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

pub(crate) fn record_drag(draggable: &Draggable, journal: &Journal) {
    for kind in DragEventKind::ALL {
        let journal = journal.clone();
        draggable.bind(kind, move |ev| journal.borrow_mut().push(ev.kind.name()));
    }
}

pub(crate) fn record_drop(droppable: &Droppable, journal: &Journal) {
    let kinds = [
        DropEventKind::DragOver,
        DropEventKind::DragOut,
        DropEventKind::DropStart,
        DropEventKind::DropEnd,
    ];
    for kind in kinds {
        let journal = journal.clone();
        droppable.bind(kind, move |ev| journal.borrow_mut().push(ev.kind.name()));
    }
}
