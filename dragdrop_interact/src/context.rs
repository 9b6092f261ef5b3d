// Copyright 2025 the Dragdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared collaborators: the element surface, the pointer stream, and binding ids.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use dragdrop_surface::{NodeId, Surface};

use crate::draggable::{Draggable, DraggableInner};
use crate::pointer::{PointerConfig, PointerSource};

/// Shared, single-threaded handle to the host's element adapter.
pub type SurfaceRef = Rc<RefCell<dyn Surface>>;

/// Identity of a [`Draggable`] binding.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct BindingId(u64);

impl BindingId {
    /// The raw id value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for BindingId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic generator for [`BindingId`]s.
///
/// Ids strictly increase and are never handed out twice by one generator.
/// There is no reset: a fresh generator starts at `1` again, so ids are only
/// comparable within one [`DragContext`].
#[derive(Debug)]
pub struct BindingIds {
    next: Cell<u64>,
}

impl Default for BindingIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl BindingIds {
    /// A generator whose first id is `1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// A generator whose first id is `first`.
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: Cell::new(first),
        }
    }

    /// Hand out the next id.
    pub fn next_id(&self) -> BindingId {
        let id = self.next.get();
        self.next.set(id.saturating_add(1));
        BindingId(id)
    }

    /// The id the next call to [`BindingIds::next_id`] returns.
    pub fn peek(&self) -> BindingId {
        BindingId(self.next.get())
    }
}

/// Everything a binding needs from its environment.
///
/// Cloning yields another handle to the same context.
#[derive(Clone)]
pub struct DragContext {
    inner: Rc<ContextInner>,
}

struct ContextInner {
    surface: SurfaceRef,
    pointer: PointerSource,
    ids: BindingIds,
    bindings: RefCell<Vec<Weak<DraggableInner>>>,
}

impl core::fmt::Debug for DragContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DragContext")
            .field("pointer", &self.inner.pointer.config())
            .field("next_id", &self.inner.ids.peek())
            .field("bindings", &self.inner.bindings.borrow().len())
            .finish_non_exhaustive()
    }
}

impl DragContext {
    /// Create a context over `surface` with a fresh pointer stream and id generator.
    pub fn new(surface: SurfaceRef, config: PointerConfig) -> Self {
        Self::with_ids(surface, PointerSource::new(config), BindingIds::new())
    }

    /// Create a context with explicit collaborators.
    pub fn with_ids(surface: SurfaceRef, pointer: PointerSource, ids: BindingIds) -> Self {
        Self {
            inner: Rc::new(ContextInner {
                surface,
                pointer,
                ids,
                bindings: RefCell::new(Vec::new()),
            }),
        }
    }

    /// The element adapter.
    pub fn surface(&self) -> &SurfaceRef {
        &self.inner.surface
    }

    /// The pointer stream.
    pub fn pointer(&self) -> &PointerSource {
        &self.inner.pointer
    }

    /// The id generator.
    pub fn ids(&self) -> &BindingIds {
        &self.inner.ids
    }

    /// The live binding for `element`, if any.
    pub fn binding_for(&self, element: NodeId) -> Option<Draggable> {
        self.inner
            .bindings
            .borrow()
            .iter()
            .filter_map(Draggable::upgrade)
            .find(|d| d.element() == element && !d.is_destroyed())
    }

    /// All live bindings, in creation order.
    pub fn bindings(&self) -> Vec<Draggable> {
        self.inner
            .bindings
            .borrow()
            .iter()
            .filter_map(Draggable::upgrade)
            .filter(|d| !d.is_destroyed())
            .collect()
    }

    /// Returns true if both handles refer to the same context.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&dyn Surface) -> R) -> R {
        f(&*self.inner.surface.borrow())
    }

    pub(crate) fn write<R>(&self, f: impl FnOnce(&mut dyn Surface) -> R) -> R {
        f(&mut *self.inner.surface.borrow_mut())
    }

    pub(crate) fn register(&self, draggable: &Draggable) {
        let mut bindings = self.inner.bindings.borrow_mut();
        bindings.retain(|w| w.strong_count() > 0);
        bindings.push(draggable.downgrade());
    }

    pub(crate) fn unregister(&self, draggable: &Draggable) {
        let target = draggable.downgrade();
        self.inner
            .bindings
            .borrow_mut()
            .retain(|w| w.strong_count() > 0 && !Weak::ptr_eq(w, &target));
    }
}
