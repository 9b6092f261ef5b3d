// Copyright 2025 the Dragdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Droppable: a zone that hit-tests dragged items and takes them in.
//!
//! A droppable listens on one or more [`Group`]s. When a member starts dragging, the zone
//! measures itself and watches that member's motion frames:
//!
//! - pointer inside and the item not attached here: *drag over* (activate, `receive`, emit
//!   [`DropEventKind::DragOver`]);
//! - pointer outside and the item attached here: *drag out* (`surrender`, deactivate, emit
//!   [`DropEventKind::DragOut`]);
//! - otherwise nothing.
//!
//! When the member stops dragging the zone emits [`DropEventKind::DropStart`], stops watching,
//! runs `drop` if the item is attached here, and emits [`DropEventKind::DropEnd`].
//!
//! The three hooks default to [`Draggable::attach`], [`Draggable::detach`], and
//! [`Draggable::commit`]; see [`DropHooks`] to replace them.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;

use dragdrop_relay::{HandlerId, Relay};
use dragdrop_surface::{Markers, NodeId};
use log::{debug, trace};

use crate::context::DragContext;
use crate::draggable::{Draggable, DraggableInner};
use crate::events::{DragEvent, DragEventKind, DropEvent, DropEventKind, GroupEvent, GroupEventKind};
use crate::geometry::Bounds;
use crate::group::Group;
use crate::pointer::PointerEvent;

/// A replacement for one of a droppable's default behaviors.
pub type DropHook = Rc<dyn Fn(&DropEvent)>;

/// Strategy functions for the three drop transitions. Unset hooks use the defaults.
#[derive(Clone, Default)]
pub struct DropHooks {
    receive: Option<DropHook>,
    surrender: Option<DropHook>,
    drop: Option<DropHook>,
}

impl core::fmt::Debug for DropHooks {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DropHooks")
            .field("receive", &self.receive.is_some())
            .field("surrender", &self.surrender.is_some())
            .field("drop", &self.drop.is_some())
            .finish()
    }
}

impl DropHooks {
    /// Replace `receive` (default: attach the item here).
    pub fn receive(mut self, hook: impl Fn(&DropEvent) + 'static) -> Self {
        self.receive = Some(Rc::new(hook));
        self
    }

    /// Replace `surrender` (default: detach the item).
    pub fn surrender(mut self, hook: impl Fn(&DropEvent) + 'static) -> Self {
        self.surrender = Some(Rc::new(hook));
        self
    }

    /// Replace `drop` (default: commit the item).
    pub fn on_drop(mut self, hook: impl Fn(&DropEvent) + 'static) -> Self {
        self.drop = Some(Rc::new(hook));
        self
    }
}

/// Construction options for a [`Droppable`].
#[derive(Clone, Debug, Default)]
pub struct DroppableOptions {
    /// The zone element. Required.
    pub element: Option<NodeId>,
    /// Groups whose members this zone accepts.
    pub groups: Vec<Group>,
    /// Transition hooks.
    pub hooks: DropHooks,
}

impl DroppableOptions {
    /// Options for a zone on `element` with no groups and default hooks.
    pub fn new(element: NodeId) -> Self {
        Self {
            element: Some(element),
            ..Self::default()
        }
    }

    /// Builder: listen on `group`.
    pub fn group(mut self, group: &Group) -> Self {
        self.groups.push(group.clone());
        self
    }

    /// Builder: set the hooks.
    pub fn hooks(mut self, hooks: DropHooks) -> Self {
        self.hooks = hooks;
        self
    }
}

/// Handle to a drop zone.
///
/// Cloning yields another handle to the same zone.
#[derive(Clone)]
pub struct Droppable {
    inner: Rc<DroppableInner>,
}

struct DroppableInner {
    ctx: DragContext,
    element: NodeId,
    hooks: DropHooks,
    relay: Relay<DropEventKind, DropEvent>,
    state: RefCell<DropState>,
}

#[derive(Default)]
struct DropState {
    target: Bounds,
    active: bool,
    destroyed: bool,
    groups: Vec<GroupLink>,
    watched: Vec<Watch>,
}

struct GroupLink {
    group: Group,
    on_start: HandlerId,
    on_end: HandlerId,
}

/// A draggable whose motion frames this zone is hit-testing.
struct Watch {
    draggable: Weak<DraggableInner>,
    on_drag: HandlerId,
    on_unbind: HandlerId,
}

impl Watch {
    fn release(self) {
        if let Some(d) = Draggable::upgrade(&self.draggable) {
            d.unbind(DragEventKind::Drag, self.on_drag);
            d.unbind(DragEventKind::Unbind, self.on_unbind);
        }
    }
}

impl core::fmt::Debug for Droppable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Droppable")
            .field("element", &self.inner.element)
            .field("target", &state.target)
            .field("active", &state.active)
            .field("groups", &state.groups.len())
            .field("watched", &state.watched.len())
            .finish_non_exhaustive()
    }
}

impl Droppable {
    /// Create a zone on `options.element`. Returns `None` without an element.
    pub fn new(ctx: &DragContext, options: DroppableOptions) -> Option<Self> {
        let element = options.element?;
        let droppable = Self {
            inner: Rc::new(DroppableInner {
                ctx: ctx.clone(),
                element,
                hooks: options.hooks,
                relay: Relay::new(),
                state: RefCell::new(DropState::default()),
            }),
        };
        for group in &options.groups {
            droppable.bind_group(group);
        }
        debug!("droppable on {element:?}");
        Some(droppable)
    }

    /// The zone element.
    pub fn element(&self) -> NodeId {
        self.inner.element
    }

    /// The cached hit-test rectangle.
    pub fn target(&self) -> Bounds {
        self.inner.state.borrow().target
    }

    /// Whether the zone is marked as the current drop target.
    pub fn is_active(&self) -> bool {
        self.inner.state.borrow().active
    }

    /// Whether [`Droppable::destroy`] has run.
    pub fn is_destroyed(&self) -> bool {
        self.inner.state.borrow().destroyed
    }

    /// Groups this zone listens on.
    pub fn groups(&self) -> Vec<Group> {
        self.inner
            .state
            .borrow()
            .groups
            .iter()
            .map(|l| l.group.clone())
            .collect()
    }

    /// Returns true if the zone is hit-testing `draggable`'s motion.
    pub fn is_watching(&self, draggable: &Draggable) -> bool {
        let target = draggable.downgrade();
        self.inner
            .state
            .borrow()
            .watched
            .iter()
            .any(|w| Weak::ptr_eq(&w.draggable, &target))
    }

    /// Listen on `group`. No-op if already bound.
    pub fn bind_group(&self, group: &Group) {
        if self.is_destroyed() || self.inner.state.borrow().groups.iter().any(|l| l.group.ptr_eq(group)) {
            return;
        }
        let weak = Rc::downgrade(&self.inner);
        let on_start = group.bind(GroupEventKind::DragStart, move |ev| {
            if let Some(inner) = weak.upgrade() {
                Self { inner }.on_group_start(ev);
            }
        });
        let weak = Rc::downgrade(&self.inner);
        let on_end = group.bind(GroupEventKind::DragEnd, move |ev| {
            if let Some(inner) = weak.upgrade() {
                Self { inner }.on_group_end(ev);
            }
        });
        self.inner.state.borrow_mut().groups.push(GroupLink {
            group: group.clone(),
            on_start,
            on_end,
        });
    }

    /// Stop listening on `group`. Returns false if it was not bound.
    ///
    /// Items the zone can no longer reach through another bound group stop being watched;
    /// one that sits in the zone mid-drag is let go first.
    pub fn unbind_group(&self, group: &Group) -> bool {
        let link = {
            let mut state = self.inner.state.borrow_mut();
            state
                .groups
                .iter()
                .position(|l| l.group.ptr_eq(group))
                .map(|pos| state.groups.remove(pos))
        };
        match link {
            Some(link) => {
                link.group.unbind(GroupEventKind::DragStart, link.on_start);
                link.group.unbind(GroupEventKind::DragEnd, link.on_end);
                let watched: Vec<Draggable> = self
                    .inner
                    .state
                    .borrow()
                    .watched
                    .iter()
                    .filter_map(|w| Draggable::upgrade(&w.draggable))
                    .collect();
                for draggable in &watched {
                    self.forget(draggable);
                }
                true
            }
            None => false,
        }
    }

    /// Release every subscription and clear the active marker. Idempotent.
    pub fn destroy(&self) {
        let (groups, watched) = {
            let mut state = self.inner.state.borrow_mut();
            if state.destroyed {
                return;
            }
            state.destroyed = true;
            (
                core::mem::take(&mut state.groups),
                core::mem::take(&mut state.watched),
            )
        };
        for link in groups {
            link.group.unbind(GroupEventKind::DragStart, link.on_start);
            link.group.unbind(GroupEventKind::DragEnd, link.on_end);
        }
        for watch in watched {
            watch.release();
        }
        self.deactivate();
        self.inner.relay.clear();
        debug!("destroyed droppable on {:?}", self.inner.element);
    }

    /// Re-measure the hit-test rectangle from the element's live geometry.
    pub fn reset_bounds(&self) {
        let element = self.inner.element;
        let target = self.inner.ctx.read(|s| Bounds::measure(s, element));
        self.inner.state.borrow_mut().target = target;
    }

    /// Mark the zone as the current drop target.
    pub fn activate(&self) {
        self.inner.state.borrow_mut().active = true;
        let element = self.inner.element;
        self.inner.ctx.write(|s| s.add_marker(element, Markers::DROP));
    }

    /// Clear the drop-target marker.
    pub fn deactivate(&self) {
        self.inner.state.borrow_mut().active = false;
        let element = self.inner.element;
        self.inner.ctx.write(|s| s.remove_marker(element, Markers::DROP));
    }

    /// Take `draggable` in: activate, run `receive`, emit [`DropEventKind::DragOver`].
    pub fn drag_over(&self, draggable: &Draggable, pointer: Option<&PointerEvent>) {
        debug!("draggable {} over {:?}", draggable.id(), self.inner.element);
        self.activate();
        let event = self.event(DropEventKind::DragOver, draggable, pointer);
        match &self.inner.hooks.receive {
            Some(hook) => hook(&event),
            None => draggable.attach(self),
        }
        self.inner.relay.trigger(DropEventKind::DragOver, &event);
    }

    /// Let `draggable` go: run `surrender`, deactivate, emit [`DropEventKind::DragOut`].
    pub fn drag_out(&self, draggable: &Draggable, pointer: Option<&PointerEvent>) {
        debug!("draggable {} out of {:?}", draggable.id(), self.inner.element);
        let event = self.event(DropEventKind::DragOut, draggable, pointer);
        match &self.inner.hooks.surrender {
            Some(hook) => hook(&event),
            None => draggable.detach(),
        }
        self.deactivate();
        self.inner.relay.trigger(DropEventKind::DragOut, &event);
    }

    /// Subscribe to the zone's events.
    pub fn bind(&self, kind: DropEventKind, handler: impl Fn(&DropEvent) + 'static) -> HandlerId {
        self.inner.relay.bind(kind, handler)
    }

    /// Remove a subscription made with [`Droppable::bind`].
    pub fn unbind(&self, kind: DropEventKind, id: HandlerId) -> bool {
        self.inner.relay.unbind(kind, id)
    }

    /// The event relay.
    pub fn relay(&self) -> &Relay<DropEventKind, DropEvent> {
        &self.inner.relay
    }

    /// Returns true if both handles refer to the same zone.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // --- group and frame handling ---

    fn on_group_start(&self, ev: &GroupEvent) {
        let draggable = &ev.draggable;
        self.reset_bounds();
        if draggable.is_attached_to(self) {
            self.activate();
        }
        if self.is_watching(draggable) {
            return;
        }
        let weak = Rc::downgrade(&self.inner);
        let on_drag = draggable.bind(DragEventKind::Drag, move |ev| {
            if let Some(inner) = weak.upgrade() {
                Self { inner }.on_frame(ev);
            }
        });
        let weak = Rc::downgrade(&self.inner);
        let on_unbind = draggable.bind(DragEventKind::Unbind, move |ev| {
            if let Some(inner) = weak.upgrade() {
                Self { inner }.forget(&ev.draggable);
            }
        });
        self.inner.state.borrow_mut().watched.push(Watch {
            draggable: draggable.downgrade(),
            on_drag,
            on_unbind,
        });
        trace!("droppable on {:?} watching draggable {}", self.inner.element, draggable.id());
    }

    fn on_frame(&self, ev: &DragEvent) {
        let Some(pointer) = ev.pointer.as_ref() else {
            return;
        };
        let hit = self.target().point_intersect(pointer.client);
        let attached = ev.draggable.is_attached_to(self);
        trace!(
            "droppable on {:?} frame at {:?}: hit={hit} attached={attached}",
            self.inner.element, pointer.client
        );
        if hit && !attached {
            self.drag_over(&ev.draggable, Some(pointer));
        } else if !hit && attached {
            self.drag_out(&ev.draggable, Some(pointer));
        }
    }

    fn on_group_end(&self, ev: &GroupEvent) {
        let draggable = &ev.draggable;
        let Some(watch) = self.take_watch(draggable) else {
            return;
        };
        let pointer = ev.pointer.as_ref();
        let start = self.event(DropEventKind::DropStart, draggable, pointer);
        self.inner.relay.trigger(DropEventKind::DropStart, &start);

        watch.release();
        let end = self.event(DropEventKind::DropEnd, draggable, pointer);
        if draggable.is_attached_to(self) {
            debug!("draggable {} dropped on {:?}", draggable.id(), self.inner.element);
            match &self.inner.hooks.drop {
                Some(hook) => hook(&end),
                None => draggable.commit(),
            }
            self.deactivate();
        }
        self.inner.relay.trigger(DropEventKind::DropEnd, &end);
    }

    /// Stop watching `draggable` unless a bound group still holds it.
    fn forget(&self, draggable: &Draggable) {
        let reachable = self
            .inner
            .state
            .borrow()
            .groups
            .iter()
            .any(|l| l.group.contains(draggable));
        if reachable {
            return;
        }
        let Some(watch) = self.take_watch(draggable) else {
            return;
        };
        watch.release();
        if draggable.is_attached_to(self) {
            self.drag_out(draggable, None);
        }
        trace!("droppable on {:?} forgot draggable {}", self.inner.element, draggable.id());
    }

    fn take_watch(&self, draggable: &Draggable) -> Option<Watch> {
        let target = draggable.downgrade();
        let mut state = self.inner.state.borrow_mut();
        state.watched.retain(|w| w.draggable.strong_count() > 0);
        let pos = state
            .watched
            .iter()
            .position(|w| Weak::ptr_eq(&w.draggable, &target))?;
        Some(state.watched.remove(pos))
    }

    fn event(&self, kind: DropEventKind, draggable: &Draggable, pointer: Option<&PointerEvent>) -> DropEvent {
        DropEvent {
            kind,
            pointer: pointer.cloned(),
            draggable: draggable.clone(),
            droppable: self.clone(),
        }
    }
}
