// Copyright 2025 the Dragdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draggable: one bound element's drag session, proxy, and placeholder.
//!
//! ## States
//!
//! A draggable is either idle or dragging. A primary press inside the anchor starts a
//! session; motion frames move the floating proxy (if any); release ends the session.
//!
//! While dragging, the element is represented by exactly one of:
//! - a floating *proxy* (a translucent absolute clone following the pointer), when it is not
//!   attached to a container;
//! - a static *placeholder* inside the container it is attached to.
//!
//! [`Draggable::attach`], [`Draggable::detach`], and [`Draggable::commit`] move between the two
//! and are normally driven by a [`Droppable`].
//!
//! ## Minimal example
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//!
//! use dragdrop_interact::{DragContext, Draggable, DraggableOptions, PointerConfig, SurfaceRef};
//! use dragdrop_surface::{BoxSurface, ElementSpec, Surface};
//! use kurbo::{Point, Size};
//!
//! let boxes = Rc::new(RefCell::new(BoxSurface::default()));
//! let root = boxes.borrow_mut().insert(None, ElementSpec::new("div", Size::new(400.0, 300.0)));
//! let card = boxes.borrow_mut().insert(
//!     Some(root),
//!     ElementSpec::new("div", Size::new(40.0, 20.0)).at(Point::new(50.0, 50.0)),
//! );
//! let surface: SurfaceRef = boxes.clone();
//! let ctx = DragContext::new(surface, PointerConfig::default());
//!
//! let drag = Draggable::new(&ctx, DraggableOptions::new(card)).unwrap();
//! ctx.pointer().press(card, Point::new(60.0, 60.0));
//! ctx.pointer().move_to(Point::new(70.0, 65.0));
//!
//! let proxy = drag.proxy().unwrap();
//! assert_eq!(boxes.borrow().offset(proxy.node), Point::new(60.0, 55.0));
//!
//! ctx.pointer().release(Point::new(70.0, 65.0));
//! assert!(drag.proxy().is_none());
//! ```

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;

use dragdrop_relay::{Handler, HandlerId, Relay};
use dragdrop_surface::{Markers, NodeId, Style};
use kurbo::Point;
use log::{debug, trace};

use crate::bounding::BoundingBox;
use crate::context::{BindingId, DragContext};
use crate::droppable::Droppable;
use crate::events::{DragEvent, DragEventKind};
use crate::group::Group;
use crate::pointer::{Button, PointerEvent, PointerPhase, PointerSource};

/// Opacity of a floating proxy.
pub const PROXY_OPACITY: f64 = 0.5;

/// Construction options for a [`Draggable`].
#[derive(Clone, Default)]
pub struct DraggableOptions {
    /// The element to bind. Required.
    pub element: Option<NodeId>,
    /// Where presses must land; defaults to the element.
    pub anchor: Option<NodeId>,
    /// Constraint on proxy motion.
    pub bounding_box: BoundingBox,
    /// Groups to join.
    pub groups: Vec<Group>,
    /// Handlers bound before any event can fire.
    pub events: Vec<(DragEventKind, Handler<DragEvent>)>,
}

impl core::fmt::Debug for DraggableOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DraggableOptions")
            .field("element", &self.element)
            .field("anchor", &self.anchor)
            .field("bounding_box", &self.bounding_box)
            .field("groups", &self.groups.len())
            .field("events", &self.events.len())
            .finish()
    }
}

impl DraggableOptions {
    /// Options binding `element` with defaults for everything else.
    pub fn new(element: NodeId) -> Self {
        Self {
            element: Some(element),
            ..Self::default()
        }
    }

    /// Builder: restrict presses to `anchor` (and its subtree).
    pub fn anchor(mut self, anchor: NodeId) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Builder: constrain proxy motion.
    pub fn bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = bounding_box;
        self
    }

    /// Builder: join `group` on construction.
    pub fn group(mut self, group: &Group) -> Self {
        self.groups.push(group.clone());
        self
    }

    /// Builder: bind a handler on construction.
    pub fn on(mut self, kind: DragEventKind, handler: impl Fn(&DragEvent) + 'static) -> Self {
        self.events.push((kind, Rc::new(handler)));
        self
    }
}

/// A floating proxy and the position it started from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Proxy {
    /// The proxy element.
    pub node: NodeId,
    /// Position relative to its offset parent when the proxy was created.
    pub start: Point,
}

/// Handle to a bound element.
///
/// Cloning yields another handle to the same binding. Dropping the last handle releases the
/// binding's pointer listeners and any proxy or placeholder it owns.
#[derive(Clone)]
pub struct Draggable {
    inner: Rc<DraggableInner>,
}

pub(crate) struct DraggableInner {
    id: BindingId,
    ctx: DragContext,
    element: NodeId,
    anchor: NodeId,
    bounding_box: BoundingBox,
    relay: Relay<DragEventKind, DragEvent>,
    state: RefCell<DragState>,
}

#[derive(Default)]
struct DragState {
    dragging: bool,
    destroyed: bool,
    groups: Vec<Group>,
    container: Option<Droppable>,
    proxy: Option<Proxy>,
    placeholder: Option<NodeId>,
    pointer_origin: Point,
    listeners: Listeners,
}

#[derive(Copy, Clone, Default)]
struct Listeners {
    press: Option<HandlerId>,
    motion: Option<HandlerId>,
    release: Option<HandlerId>,
}

impl Listeners {
    fn unbind(self, pointer: &PointerSource) {
        let all = [
            (PointerPhase::Start, self.press),
            (PointerPhase::Move, self.motion),
            (PointerPhase::End, self.release),
        ];
        for (phase, id) in all {
            if let Some(id) = id {
                pointer.unbind(phase, id);
            }
        }
    }
}

impl Drop for DraggableInner {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if state.destroyed {
            return;
        }
        state.listeners.unbind(self.ctx.pointer());
        if let Ok(mut surface) = self.ctx.surface().try_borrow_mut() {
            if let Some(proxy) = state.proxy.take() {
                surface.remove(proxy.node);
            }
            if let Some(placeholder) = state.placeholder.take() {
                surface.remove(placeholder);
            }
            if state.dragging {
                surface.set_selection_enabled(true);
            }
        }
    }
}

impl core::fmt::Debug for Draggable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Draggable")
            .field("id", &self.inner.id)
            .field("element", &self.inner.element)
            .field("dragging", &state.dragging)
            .field("attached", &state.container.is_some())
            .field("proxy", &state.proxy)
            .field("placeholder", &state.placeholder)
            .finish_non_exhaustive()
    }
}

impl Draggable {
    /// Bind `options.element`.
    ///
    /// Returns `None` without an element. If the element already has a live binding in
    /// `ctx`, that binding is returned unchanged and the rest of `options` is ignored.
    pub fn new(ctx: &DragContext, options: DraggableOptions) -> Option<Self> {
        let element = options.element?;
        if let Some(existing) = ctx.binding_for(element) {
            debug!("element {element:?} already bound as {}", existing.id());
            return Some(existing);
        }
        let DraggableOptions {
            anchor,
            bounding_box,
            groups,
            events,
            ..
        } = options;
        let draggable = Self {
            inner: Rc::new(DraggableInner {
                id: ctx.ids().next_id(),
                ctx: ctx.clone(),
                element,
                anchor: anchor.unwrap_or(element),
                bounding_box,
                relay: Relay::new(),
                state: RefCell::new(DragState::default()),
            }),
        };
        for (kind, handler) in events {
            draggable.inner.relay.bind_shared(kind, handler);
        }
        let weak = draggable.downgrade();
        let press = ctx.pointer().bind(PointerPhase::Start, move |ev| {
            if let Some(d) = Self::upgrade(&weak) {
                d.on_press(ev);
            }
        });
        draggable.inner.state.borrow_mut().listeners.press = Some(press);
        ctx.register(&draggable);
        for group in &groups {
            group.adopt(&draggable);
        }
        debug!("bound draggable {} to {element:?}", draggable.id());
        Some(draggable)
    }

    /// Binding id, unique within the context.
    pub fn id(&self) -> BindingId {
        self.inner.id
    }

    /// The bound element.
    pub fn element(&self) -> NodeId {
        self.inner.element
    }

    /// Where presses must land.
    pub fn anchor(&self) -> NodeId {
        self.inner.anchor
    }

    /// Constraint on proxy motion.
    pub fn bounding_box(&self) -> BoundingBox {
        self.inner.bounding_box
    }

    /// The context this binding lives in.
    pub fn context(&self) -> &DragContext {
        &self.inner.ctx
    }

    /// Whether a drag session is in progress.
    pub fn is_dragging(&self) -> bool {
        self.inner.state.borrow().dragging
    }

    /// Whether [`Draggable::destroy`] has run.
    pub fn is_destroyed(&self) -> bool {
        self.inner.state.borrow().destroyed
    }

    /// The container this item is attached to.
    pub fn container(&self) -> Option<Droppable> {
        self.inner.state.borrow().container.clone()
    }

    /// Returns true if attached to `droppable`.
    pub fn is_attached_to(&self, droppable: &Droppable) -> bool {
        self.inner
            .state
            .borrow()
            .container
            .as_ref()
            .is_some_and(|c| c.ptr_eq(droppable))
    }

    /// The floating proxy, if any.
    pub fn proxy(&self) -> Option<Proxy> {
        self.inner.state.borrow().proxy
    }

    /// The placeholder, if any.
    pub fn placeholder(&self) -> Option<NodeId> {
        self.inner.state.borrow().placeholder
    }

    /// Groups this item belongs to.
    pub fn groups(&self) -> Vec<Group> {
        self.inner.state.borrow().groups.clone()
    }

    /// Subscribe to one of this item's events.
    pub fn bind(&self, kind: DragEventKind, handler: impl Fn(&DragEvent) + 'static) -> HandlerId {
        self.inner.relay.bind(kind, handler)
    }

    /// Remove a subscription made with [`Draggable::bind`].
    pub fn unbind(&self, kind: DragEventKind, id: HandlerId) -> bool {
        self.inner.relay.unbind(kind, id)
    }

    /// The event relay.
    pub fn relay(&self) -> &Relay<DragEventKind, DragEvent> {
        &self.inner.relay
    }

    /// Returns true if both handles refer to the same binding.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Create the floating proxy: a translucent clone of the element, inserted before it and
    /// switched to absolute positioning at its own position.
    ///
    /// Replaces any existing proxy.
    pub fn proxy_start(&self) {
        self.ditch_proxy();
        let element = self.inner.element;
        let proxy = self.inner.ctx.write(|s| {
            let node = s.clone_node(element)?;
            s.remove_marker(node, Markers::PLACEHOLDER);
            s.add_marker(node, Markers::DRAG);
            s.set_style(
                node,
                Style {
                    opacity: PROXY_OPACITY,
                    ..s.style(node)
                },
            );
            s.insert_before(node, element);
            let start = s.position(node);
            s.set_style(node, Style::absolute(start, PROXY_OPACITY));
            Some(Proxy { node, start })
        });
        self.inner.state.borrow_mut().proxy = proxy;
    }

    /// Remove the floating proxy, if any.
    pub fn ditch_proxy(&self) {
        let proxy = self.inner.state.borrow_mut().proxy.take();
        if let Some(proxy) = proxy {
            self.inner.ctx.write(|s| s.remove(proxy.node));
        }
    }

    /// Lock the item into `container`.
    ///
    /// Removes the proxy and places the placeholder inside the container: before the element
    /// when the element already lives there, appended otherwise. A placeholder already inside
    /// the container stays where it is.
    pub fn attach(&self, container: &Droppable) {
        self.ditch_proxy();
        let element = self.inner.element;
        let zone = container.element();
        let existing = self.inner.state.borrow().placeholder;
        let placeholder = self.inner.ctx.write(|s| {
            let placeholder = match existing {
                Some(p) => p,
                None => {
                    let p = s.clone_node(element)?;
                    s.remove_marker(p, Markers::DRAG);
                    s.add_marker(p, Markers::PLACEHOLDER);
                    s.set_style(p, Style::STATIC);
                    p
                }
            };
            if !s.contains(zone, placeholder) {
                if s.contains(zone, element) {
                    s.insert_before(placeholder, element);
                } else {
                    s.append(zone, placeholder);
                }
            }
            Some(placeholder)
        });
        let Some(placeholder) = placeholder else {
            return;
        };
        {
            let mut state = self.inner.state.borrow_mut();
            state.placeholder = Some(placeholder);
            state.container = Some(container.clone());
        }
        debug!("draggable {} attached to {zone:?}", self.id());
    }

    /// Release the item from its container.
    ///
    /// Discards the placeholder and, while dragging, re-establishes a floating proxy.
    pub fn detach(&self) {
        let (placeholder, dragging) = {
            let mut state = self.inner.state.borrow_mut();
            state.container = None;
            (state.placeholder.take(), state.dragging)
        };
        if let Some(placeholder) = placeholder {
            self.inner.ctx.write(|s| s.remove(placeholder));
        }
        if dragging {
            self.proxy_start();
        }
        debug!("draggable {} detached", self.id());
    }

    /// Move the element to the placeholder's position and drop the placeholder.
    ///
    /// No-op without a placeholder.
    pub fn commit(&self) {
        let placeholder = {
            let mut state = self.inner.state.borrow_mut();
            let placeholder = state.placeholder.take();
            if placeholder.is_some() {
                state.container = None;
            }
            placeholder
        };
        let Some(placeholder) = placeholder else {
            return;
        };
        let element = self.inner.element;
        self.inner.ctx.write(|s| {
            s.set_style(element, Style::STATIC);
            s.insert_before(element, placeholder);
            s.remove(placeholder);
        });
        debug!("draggable {} committed", self.id());
    }

    /// Tear the binding down.
    ///
    /// A running session is ended first, exactly as a release would end it, so groups and
    /// zones see its [`DragEventKind::DragEnd`]. Then removes pointer listeners, proxy and
    /// placeholder, leaves every group (each emits [`DragEventKind::Unbind`]), clears all
    /// subscriptions, and forgets the binding in the context. Idempotent.
    pub fn destroy(&self) {
        if self.is_destroyed() {
            return;
        }
        self.finish(None);
        let (listeners, placeholder, groups) = {
            let mut state = self.inner.state.borrow_mut();
            if state.destroyed {
                return;
            }
            state.destroyed = true;
            state.dragging = false;
            state.container = None;
            (
                core::mem::take(&mut state.listeners),
                state.placeholder.take(),
                core::mem::take(&mut state.groups),
            )
        };
        listeners.unbind(self.inner.ctx.pointer());
        self.ditch_proxy();
        if let Some(placeholder) = placeholder {
            self.inner.ctx.write(|s| s.remove(placeholder));
        }
        for group in groups {
            group.remove(self);
        }
        self.inner.relay.clear();
        self.inner.ctx.unregister(self);
        debug!("destroyed draggable {}", self.id());
    }

    /// The element that moves while sorting: the placeholder if any, else the element.
    pub fn snap_element(&self) -> NodeId {
        self.inner
            .state
            .borrow()
            .placeholder
            .unwrap_or(self.inner.element)
    }

    /// Index of the snap element in `list`.
    pub fn position_in(&self, list: &[NodeId]) -> Option<usize> {
        let snap = self.snap_element();
        list.iter().position(|n| *n == snap)
    }

    /// Move the snap element directly before `node`.
    pub fn move_before(&self, node: NodeId) {
        let snap = self.snap_element();
        self.inner.ctx.write(|s| s.insert_before(snap, node));
    }

    /// Move the snap element directly after `node`.
    pub fn move_after(&self, node: NodeId) {
        let snap = self.snap_element();
        self.inner.ctx.write(|s| s.insert_after(snap, node));
    }

    // --- pointer handling ---

    fn on_press(&self, ev: &PointerEvent) {
        if ev.button != Button::Primary || ev.is_default_prevented() {
            return;
        }
        let Some(target) = ev.target else {
            return;
        };
        {
            let state = self.inner.state.borrow();
            if state.dragging || state.destroyed {
                return;
            }
        }
        let anchor = self.inner.anchor;
        if !self.inner.ctx.read(|s| s.contains(anchor, target)) || self.yields_to_nested(target) {
            return;
        }

        self.emit(DragEventKind::BeforeDrag, Some(ev), None);
        if self.is_destroyed() {
            return;
        }
        let attached = {
            let mut state = self.inner.state.borrow_mut();
            state.dragging = true;
            state.pointer_origin = ev.client;
            state.container.is_some()
        };
        if !attached {
            self.proxy_start();
        }

        let pointer = self.inner.ctx.pointer();
        let weak = self.downgrade();
        let motion = pointer.bind(PointerPhase::Move, move |ev| {
            if let Some(d) = Self::upgrade(&weak) {
                d.on_move(ev);
            }
        });
        let weak = self.downgrade();
        let release = pointer.bind(PointerPhase::End, move |ev| {
            if let Some(d) = Self::upgrade(&weak) {
                d.on_release(ev);
            }
        });
        {
            let mut state = self.inner.state.borrow_mut();
            state.listeners.motion = Some(motion);
            state.listeners.release = Some(release);
        }
        self.inner.ctx.write(|s| {
            s.focus_body();
            s.set_selection_enabled(false);
        });

        debug!("draggable {} drag start at {:?}", self.id(), ev.client);
        self.emit(DragEventKind::DragStart, Some(ev), None);
        ev.prevent_default();
    }

    fn on_move(&self, ev: &PointerEvent) {
        let (proxy, origin) = {
            let state = self.inner.state.borrow();
            if !state.dragging {
                return;
            }
            (state.proxy, state.pointer_origin)
        };
        if let Some(proxy) = proxy {
            let element = self.inner.element;
            let proposed = proxy.start + (ev.client - origin);
            let pos = self.inner.ctx.read(|s| {
                self.inner
                    .bounding_box
                    .clamp(s, element, proposed, s.size(proxy.node))
            });
            self.inner
                .ctx
                .write(|s| s.set_style(proxy.node, Style::absolute(pos, PROXY_OPACITY)));
            trace!("draggable {} proxy at {pos:?}", self.id());
        }
        self.emit(DragEventKind::Drag, Some(ev), None);
        ev.prevent_default();
    }

    fn on_release(&self, ev: &PointerEvent) {
        if self.finish(Some(ev)) {
            ev.prevent_default();
        }
    }

    /// End the running session. Returns false when there is none.
    fn finish(&self, pointer: Option<&PointerEvent>) -> bool {
        let listeners = {
            let mut state = self.inner.state.borrow_mut();
            if !state.dragging {
                return false;
            }
            state.dragging = false;
            Listeners {
                press: None,
                motion: state.listeners.motion.take(),
                release: state.listeners.release.take(),
            }
        };
        listeners.unbind(self.inner.ctx.pointer());
        self.inner.ctx.write(|s| s.set_selection_enabled(true));

        debug!("draggable {} drag end at {:?}", self.id(), pointer.map(|p| p.client));
        self.emit(DragEventKind::DragEnd, pointer, None);
        // Revert anything that was not committed.
        self.ditch_proxy();
        true
    }

    /// Returns true if another live binding nested inside this one's anchor also claims
    /// `target`. The innermost binding takes the press.
    fn yields_to_nested(&self, target: NodeId) -> bool {
        let anchor = self.inner.anchor;
        let nested: Vec<NodeId> = self
            .inner
            .ctx
            .bindings()
            .iter()
            .filter(|d| !d.ptr_eq(self))
            .map(Self::anchor)
            .filter(|a| *a != anchor)
            .collect();
        self.inner.ctx.read(|s| {
            nested
                .iter()
                .any(|&a| s.contains(anchor, a) && s.contains(a, target))
        })
    }

    // --- crate internals ---

    pub(crate) fn emit(&self, kind: DragEventKind, pointer: Option<&PointerEvent>, group: Option<&Group>) {
        let event = DragEvent {
            kind,
            pointer: pointer.cloned(),
            draggable: self.clone(),
            group: group.cloned(),
        };
        self.inner.relay.trigger(kind, &event);
    }

    pub(crate) fn join(&self, group: &Group) {
        let mut state = self.inner.state.borrow_mut();
        if !state.groups.iter().any(|g| g.ptr_eq(group)) {
            state.groups.push(group.clone());
        }
    }

    pub(crate) fn leave(&self, group: &Group) {
        self.inner
            .state
            .borrow_mut()
            .groups
            .retain(|g| !g.ptr_eq(group));
    }

    pub(crate) fn downgrade(&self) -> Weak<DraggableInner> {
        Rc::downgrade(&self.inner)
    }

    pub(crate) fn upgrade(weak: &Weak<DraggableInner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounding::Span;
    use crate::droppable::DroppableOptions;
    use crate::testing::{Stage, journal, record_drag, record_drop};
    use alloc::vec;
    use dragdrop_surface::{ElementSpec, Positioning, Surface};
    use kurbo::Size;

    fn card(stage: &Stage) -> (NodeId, NodeId) {
        let root = stage.add(None, ElementSpec::new("div", Size::new(400.0, 300.0)));
        let card = stage.add(
            Some(root),
            ElementSpec::new("div", Size::new(40.0, 20.0)).at(Point::new(50.0, 50.0)),
        );
        (root, card)
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let stage = Stage::new();
        let (root, first) = card(&stage);
        let second = stage.add(Some(root), ElementSpec::new("div", Size::new(10.0, 10.0)));
        let a = Draggable::new(&stage.ctx, DraggableOptions::new(first)).unwrap();
        let b = Draggable::new(&stage.ctx, DraggableOptions::new(second)).unwrap();
        assert!(a.id() < b.id());
        b.destroy();
        let third = stage.add(Some(root), ElementSpec::new("div", Size::new(10.0, 10.0)));
        let c = Draggable::new(&stage.ctx, DraggableOptions::new(third)).unwrap();
        assert!(b.id() < c.id(), "ids are never reused");
    }

    #[test]
    fn binding_without_element_is_refused() {
        let stage = Stage::new();
        assert!(Draggable::new(&stage.ctx, DraggableOptions::default()).is_none());
    }

    #[test]
    fn rebinding_returns_the_live_binding() {
        let stage = Stage::new();
        let (_, card) = card(&stage);
        let a = Draggable::new(&stage.ctx, DraggableOptions::new(card)).unwrap();
        let b = Draggable::new(
            &stage.ctx,
            DraggableOptions::new(card).bounding_box(BoundingBox::WindowSize),
        )
        .unwrap();
        assert!(a.ptr_eq(&b));
        assert_eq!(b.bounding_box(), BoundingBox::Unbounded);
        assert_eq!(stage.ctx.bindings().len(), 1);
        assert_eq!(stage.ctx.pointer().listener_count(PointerPhase::Start), 1);

        a.destroy();
        let c = Draggable::new(&stage.ctx, DraggableOptions::new(card)).unwrap();
        assert!(!c.ptr_eq(&a));
    }

    #[test]
    fn free_drag_session() {
        let stage = Stage::new();
        let (root, card) = card(&stage);
        let drag = Draggable::new(&stage.ctx, DraggableOptions::new(card)).unwrap();
        let log = journal();
        record_drag(&drag, &log);

        assert!(stage.press(card, 60.0, 60.0));
        assert!(drag.is_dragging());
        assert_eq!(*log.borrow(), ["beforedrag", "dragstart"]);
        let proxy = drag.proxy().unwrap();
        assert_eq!(proxy.start, Point::new(50.0, 50.0));
        stage.look(|s| {
            assert_eq!(s.children(root), &[proxy.node, card]);
            assert!(s.markers(proxy.node).contains(Markers::DRAG));
            assert_eq!(s.style(proxy.node).positioning, Positioning::Absolute);
            assert_eq!(s.style(proxy.node).opacity, PROXY_OPACITY);
            assert!(s.body_focused());
            assert!(!s.selection_enabled());
        });

        assert!(stage.move_to(70.0, 65.0));
        assert_eq!(
            stage.look(|s| s.offset(proxy.node)),
            Point::new(60.0, 55.0)
        );
        assert!(stage.release(70.0, 65.0));
        assert!(!drag.is_dragging());
        assert!(drag.proxy().is_none());
        assert_eq!(*log.borrow(), ["beforedrag", "dragstart", "drag", "dragend"]);
        stage.look(|s| {
            assert!(!s.is_alive(proxy.node));
            assert_eq!(s.children(root), &[card]);
            assert!(s.selection_enabled());
            // An uncommitted drag leaves the element where it was.
            assert_eq!(s.offset(card), Point::new(50.0, 50.0));
        });
        let pointer = stage.ctx.pointer();
        assert_eq!(pointer.listener_count(PointerPhase::Move), 0);
        assert_eq!(pointer.listener_count(PointerPhase::End), 0);

        // Motion after release is ignored.
        stage.move_to(0.0, 0.0);
        assert_eq!(log.borrow().len(), 4);
    }

    #[test]
    fn manual_bounding_box_clamps_the_proxy() {
        let stage = Stage::new();
        let root = stage.add(None, ElementSpec::new("div", Size::new(400.0, 300.0)));
        let card = stage.add(Some(root), ElementSpec::new("div", Size::new(20.0, 10.0)));
        let bounds = BoundingBox::manual(Span::new(0.0, 100.0), Span::new(0.0, 50.0));
        let drag =
            Draggable::new(&stage.ctx, DraggableOptions::new(card).bounding_box(bounds)).unwrap();

        stage.press(card, 0.0, 0.0);
        let proxy = drag.proxy().unwrap().node;
        stage.move_to(150.0, 5.0);
        assert_eq!(stage.look(|s| s.style(proxy).origin), Point::new(80.0, 5.0));
        stage.move_to(-30.0, -30.0);
        assert_eq!(stage.look(|s| s.style(proxy).origin), Point::new(0.0, 0.0));
        stage.release(-30.0, -30.0);
    }

    #[test]
    fn offset_parent_bounds_the_proxy() {
        let stage = Stage::new();
        let root = stage.add(None, ElementSpec::new("div", Size::new(200.0, 100.0)));
        let card = stage.add(Some(root), ElementSpec::new("div", Size::new(20.0, 10.0)));
        let drag = Draggable::new(
            &stage.ctx,
            DraggableOptions::new(card).bounding_box(BoundingBox::OffsetParent),
        )
        .unwrap();

        stage.press(card, 0.0, 0.0);
        let proxy = drag.proxy().unwrap().node;
        stage.move_to(500.0, 40.0);
        assert_eq!(stage.look(|s| s.style(proxy).origin), Point::new(180.0, 40.0));
        stage.move_to(-10.0, 500.0);
        assert_eq!(stage.look(|s| s.style(proxy).origin), Point::new(0.0, 90.0));
        stage.release(-10.0, 500.0);
    }

    #[test]
    fn window_size_bounds_the_proxy() {
        let stage = Stage::new();
        stage.surface.borrow_mut().set_viewport(Size::new(300.0, 200.0));
        let root = stage.add(None, ElementSpec::new("div", Size::new(400.0, 300.0)));
        let card = stage.add(Some(root), ElementSpec::new("div", Size::new(20.0, 10.0)));
        let drag = Draggable::new(
            &stage.ctx,
            DraggableOptions::new(card).bounding_box(BoundingBox::WindowSize),
        )
        .unwrap();

        stage.press(card, 0.0, 0.0);
        let proxy = drag.proxy().unwrap().node;
        // The parent is larger than the viewport; the viewport wins.
        stage.move_to(350.0, 250.0);
        assert_eq!(stage.look(|s| s.style(proxy).origin), Point::new(280.0, 190.0));
        stage.move_to(-40.0, 20.0);
        assert_eq!(stage.look(|s| s.style(proxy).origin), Point::new(0.0, 20.0));
        stage.release(-40.0, 20.0);
    }

    #[test]
    fn non_primary_buttons_do_not_start() {
        let stage = Stage::new();
        let (_, card) = card(&stage);
        let drag = Draggable::new(&stage.ctx, DraggableOptions::new(card)).unwrap();
        let log = journal();
        record_drag(&drag, &log);
        let pointer = stage.ctx.pointer();
        assert!(!pointer.press_with(card, Point::new(60.0, 60.0), Button::Secondary));
        assert!(!pointer.press_with(card, Point::new(60.0, 60.0), Button::Auxiliary));
        assert!(!drag.is_dragging());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn presses_must_land_in_the_anchor() {
        let stage = Stage::new();
        let (_, card) = card(&stage);
        let handle = stage.add(Some(card), ElementSpec::new("span", Size::new(5.0, 5.0)));
        let drag = Draggable::new(&stage.ctx, DraggableOptions::new(card).anchor(handle)).unwrap();
        assert_eq!(drag.anchor(), handle);

        assert!(!stage.press(card, 60.0, 60.0));
        assert!(!drag.is_dragging());
        assert!(stage.press(handle, 51.0, 51.0));
        assert!(drag.is_dragging());
        stage.release(51.0, 51.0);
    }

    #[test]
    fn nested_bindings_start_the_innermost() {
        for inner_first in [false, true] {
            let stage = Stage::new();
            let (_, outer) = card(&stage);
            let inner = stage.add(Some(outer), ElementSpec::new("span", Size::new(10.0, 10.0)));
            let (a, b) = if inner_first {
                let b = Draggable::new(&stage.ctx, DraggableOptions::new(inner)).unwrap();
                let a = Draggable::new(&stage.ctx, DraggableOptions::new(outer)).unwrap();
                (a, b)
            } else {
                let a = Draggable::new(&stage.ctx, DraggableOptions::new(outer)).unwrap();
                let b = Draggable::new(&stage.ctx, DraggableOptions::new(inner)).unwrap();
                (a, b)
            };

            assert!(stage.press(inner, 55.0, 55.0));
            assert!(b.is_dragging());
            assert!(!a.is_dragging());
            stage.release(55.0, 55.0);

            // Outside the inner element the outer binding still starts.
            assert!(stage.press(outer, 85.0, 65.0));
            assert!(a.is_dragging());
            assert!(!b.is_dragging());
            stage.release(85.0, 65.0);

            // A destroyed inner binding no longer shadows the outer one.
            b.destroy();
            assert!(stage.press(inner, 55.0, 55.0));
            assert!(a.is_dragging());
            stage.release(55.0, 55.0);
        }
    }

    #[test]
    fn prevented_press_is_left_alone() {
        let stage = Stage::new();
        let (_, card) = card(&stage);
        let drag = Draggable::new(&stage.ctx, DraggableOptions::new(card)).unwrap();
        let ev = PointerEvent::new(PointerPhase::Start, Point::new(60.0, 60.0)).with_target(card);
        ev.prevent_default();
        stage.ctx.pointer().dispatch(&ev);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn options_events_are_bound_up_front() {
        let stage = Stage::new();
        let (_, card) = card(&stage);
        let seen = journal();
        let s = seen.clone();
        let drag = Draggable::new(
            &stage.ctx,
            DraggableOptions::new(card).on(DragEventKind::DragStart, move |ev| {
                assert_eq!(ev.point(), Some(Point::new(55.0, 55.0)));
                s.borrow_mut().push("started");
            }),
        )
        .unwrap();
        stage.press(card, 55.0, 55.0);
        assert_eq!(*seen.borrow(), ["started"]);
        assert_eq!(drag.relay().handler_count(DragEventKind::DragStart), 1);
        stage.release(55.0, 55.0);
    }

    #[test]
    fn detach_outside_a_session_makes_no_proxy() {
        let stage = Stage::new();
        let (_, card) = card(&stage);
        let drag = Draggable::new(&stage.ctx, DraggableOptions::new(card)).unwrap();
        drag.detach();
        assert!(drag.proxy().is_none());
        assert!(drag.container().is_none());
        // Commit without a placeholder changes nothing.
        let before = stage.look(|s| (s.parent(card), s.offset(card)));
        drag.commit();
        assert_eq!(stage.look(|s| (s.parent(card), s.offset(card))), before);
    }

    #[test]
    fn snap_element_and_moves() {
        let stage = Stage::new();
        let list = stage.add(None, ElementSpec::new("ul", Size::new(90.0, 10.0)));
        let items: Vec<NodeId> = (0..3)
            .map(|_| stage.add(Some(list), ElementSpec::new("li", Size::new(10.0, 10.0))))
            .collect();
        let drag = Draggable::new(&stage.ctx, DraggableOptions::new(items[2])).unwrap();
        assert_eq!(drag.snap_element(), items[2]);
        assert_eq!(drag.position_in(&items), Some(2));
        drag.move_before(items[0]);
        assert_eq!(stage.children(list), vec![items[2], items[0], items[1]]);
        drag.move_after(items[1]);
        assert_eq!(stage.children(list), items);
        assert_eq!(drag.position_in(&[]), None);
    }

    #[test]
    fn destroy_mid_drag_tears_everything_down() {
        let stage = Stage::new();
        let (root, card) = card(&stage);
        let drag = Draggable::new(&stage.ctx, DraggableOptions::new(card)).unwrap();
        let group = Group::new(&stage.ctx);
        group.adopt(&drag);
        let log = journal();
        record_drag(&drag, &log);

        stage.press(card, 60.0, 60.0);
        let proxy = drag.proxy().unwrap().node;
        drag.destroy();
        assert!(drag.is_destroyed());
        assert!(!drag.is_dragging());
        assert!(drag.groups().is_empty());
        assert!(group.is_empty());
        assert_eq!(*log.borrow(), ["beforedrag", "dragstart", "dragend", "unbind"]);
        assert_eq!(drag.relay().handler_count(DragEventKind::Drag), 0);
        stage.look(|s| {
            assert!(!s.is_alive(proxy));
            assert_eq!(s.children(root), &[card]);
            assert!(s.selection_enabled());
        });
        let pointer = stage.ctx.pointer();
        for phase in [PointerPhase::Start, PointerPhase::Move, PointerPhase::End] {
            assert_eq!(pointer.listener_count(phase), 0);
        }
        assert!(stage.ctx.binding_for(card).is_none());

        // Idempotent.
        drag.destroy();
        assert!(!stage.press(card, 60.0, 60.0));
    }

    #[test]
    fn destroy_mid_drag_winds_down_the_zone() {
        let stage = Stage::new();
        let (root, card) = card(&stage);
        let zone = stage.add(
            Some(root),
            ElementSpec::new("div", Size::new(100.0, 100.0)).at(Point::new(200.0, 0.0)),
        );
        let group = Group::new(&stage.ctx);
        let drag = group.add(DraggableOptions::new(card)).unwrap();
        let drop = Droppable::new(&stage.ctx, DroppableOptions::new(zone).group(&group)).unwrap();
        let log = journal();
        record_drop(&drop, &log);

        stage.press(card, 60.0, 60.0);
        stage.move_to(250.0, 50.0);
        assert!(drag.is_attached_to(&drop));
        assert!(drop.is_active());

        drag.destroy();
        assert_eq!(*log.borrow(), ["dragover", "dropstart", "dropend"]);
        assert!(!drop.is_active());
        assert!(!drop.is_watching(&drag));
        assert!(drag.container().is_none());
        assert!(drag.placeholder().is_none());
        stage.look(|s| {
            assert!(!s.markers(zone).contains(Markers::DROP));
            assert_eq!(s.parent(card), Some(zone));
            assert_eq!(s.children(zone), &[card]);
        });
        assert_eq!(stage.ctx.pointer().listener_count(PointerPhase::End), 0);
    }

    #[test]
    fn dropping_the_last_handle_releases_listeners() {
        let stage = Stage::new();
        let (_, card) = card(&stage);
        let drag = Draggable::new(&stage.ctx, DraggableOptions::new(card)).unwrap();
        assert_eq!(stage.ctx.pointer().listener_count(PointerPhase::Start), 1);
        drop(drag);
        assert_eq!(stage.ctx.pointer().listener_count(PointerPhase::Start), 0);
        assert!(stage.ctx.binding_for(card).is_none());
    }
}
