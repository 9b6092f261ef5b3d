// Copyright 2025 the Dragdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sortable: reorder an item among a container's children while it hovers the container.
//!
//! A sortable rides on a [`Droppable`]. Once an item is dragged over the zone, every motion
//! frame resolves an insertion point with a linear scan over the measured items:
//!
//! 1. find the item's snap element (its placeholder, usually) in the item list;
//! 2. scanning backward from the previous item, the first item whose bottom-right corner is
//!    south-east of the pointer takes the snap element in front of it;
//! 3. otherwise, scanning forward from the next item, the first item whose top-left corner is
//!    north-west of the pointer takes the snap element behind it;
//! 4. otherwise nothing moves.
//!
//! Every move re-measures the items, so repeated frames at one pointer position settle.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;

use dragdrop_relay::HandlerId;
use dragdrop_surface::{Markers, NodeId, Selector};
use kurbo::Point;
use log::{debug, trace};

use crate::context::DragContext;
use crate::draggable::{Draggable, DraggableInner};
use crate::droppable::{Droppable, DroppableOptions};
use crate::events::{DragEvent, DragEventKind, DropEvent, DropEventKind};
use crate::geometry::Bounds;

/// Where a sortable's zone comes from.
#[derive(Clone, Debug)]
pub enum DroppableSource {
    /// Reuse an existing zone.
    Existing(Droppable),
    /// Create a zone; a missing element defaults to the sortable's element.
    Options(DroppableOptions),
}

/// Construction options for a [`Sortable`].
#[derive(Clone, Debug, Default)]
pub struct SortableOptions {
    /// The list element. Required.
    pub element: Option<NodeId>,
    /// Which descendants are items.
    pub items: Selector,
    /// The zone that drives sorting. Without one the sortable only reorders on request.
    pub droppable: Option<DroppableSource>,
}

impl SortableOptions {
    /// Options for `element` with direct children as items and no zone.
    pub fn new(element: NodeId) -> Self {
        Self {
            element: Some(element),
            ..Self::default()
        }
    }

    /// Builder: choose the items.
    pub fn items(mut self, items: Selector) -> Self {
        self.items = items;
        self
    }

    /// Builder: drive sorting from an existing zone.
    pub fn droppable(mut self, droppable: &Droppable) -> Self {
        self.droppable = Some(DroppableSource::Existing(droppable.clone()));
        self
    }

    /// Builder: create the zone from options.
    pub fn droppable_options(mut self, options: DroppableOptions) -> Self {
        self.droppable = Some(DroppableSource::Options(options));
        self
    }
}

/// A measured item.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SortItem {
    /// The item element.
    pub node: NodeId,
    /// Its box at the last refresh.
    pub bounds: Bounds,
}

/// Handle to a sortable list.
///
/// Cloning yields another handle to the same list.
#[derive(Clone)]
pub struct Sortable {
    inner: Rc<SortableInner>,
}

struct SortableInner {
    ctx: DragContext,
    element: NodeId,
    selector: Selector,
    droppable: Option<Droppable>,
    owns_droppable: bool,
    subscriptions: Vec<(DropEventKind, HandlerId)>,
    state: RefCell<SortState>,
}

#[derive(Default)]
struct SortState {
    items: Vec<SortItem>,
    watched: Vec<(Weak<DraggableInner>, HandlerId)>,
    destroyed: bool,
}

impl core::fmt::Debug for Sortable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Sortable")
            .field("element", &self.inner.element)
            .field("selector", &self.inner.selector)
            .field("droppable", &self.inner.droppable)
            .field("items", &state.items.len())
            .field("watched", &state.watched.len())
            .finish_non_exhaustive()
    }
}

impl Sortable {
    /// Create a sortable on `options.element`. Returns `None` without an element, or when the
    /// zone options cannot produce a zone.
    pub fn new(ctx: &DragContext, options: SortableOptions) -> Option<Self> {
        let element = options.element?;
        let (droppable, owns_droppable) = match options.droppable {
            Some(DroppableSource::Existing(d)) => (Some(d), false),
            Some(DroppableSource::Options(mut o)) => {
                o.element.get_or_insert(element);
                (Some(Droppable::new(ctx, o)?), true)
            }
            None => (None, false),
        };
        let inner = Rc::new_cyclic(|weak: &Weak<SortableInner>| {
            let mut subscriptions = Vec::new();
            if let Some(d) = &droppable {
                let w = weak.clone();
                subscriptions.push((
                    DropEventKind::DragOver,
                    d.bind(DropEventKind::DragOver, move |ev| {
                        if let Some(inner) = w.upgrade() {
                            Self { inner }.sort_start(ev);
                        }
                    }),
                ));
                for kind in [DropEventKind::DragOut, DropEventKind::DropEnd] {
                    let w = weak.clone();
                    subscriptions.push((
                        kind,
                        d.bind(kind, move |ev| {
                            if let Some(inner) = w.upgrade() {
                                Self { inner }.sort_stop(ev);
                            }
                        }),
                    ));
                }
            }
            SortableInner {
                ctx: ctx.clone(),
                element,
                selector: options.items,
                droppable,
                owns_droppable,
                subscriptions,
                state: RefCell::new(SortState::default()),
            }
        });
        debug!("sortable on {element:?}");
        Some(Self { inner })
    }

    /// The list element.
    pub fn element(&self) -> NodeId {
        self.inner.element
    }

    /// The item selector.
    pub fn selector(&self) -> &Selector {
        &self.inner.selector
    }

    /// The zone driving this list, if any.
    pub fn droppable(&self) -> Option<&Droppable> {
        self.inner.droppable.as_ref()
    }

    /// Items as of the last [`Sortable::refresh`].
    pub fn items(&self) -> Vec<SortItem> {
        self.inner.state.borrow().items.clone()
    }

    /// Re-query and re-measure the items. Floating proxies are never items.
    pub fn refresh(&self) {
        let root = self.inner.element;
        let selector = &self.inner.selector;
        let items: Vec<SortItem> = self.inner.ctx.read(|s| {
            s.query(root, selector)
                .into_iter()
                .filter(|n| !s.markers(*n).contains(Markers::DRAG))
                .map(|node| SortItem {
                    node,
                    bounds: Bounds::measure(s, node),
                })
                .collect()
        });
        self.inner.state.borrow_mut().items = items;
    }

    /// Run one sort step for `draggable` at `point`.
    ///
    /// Returns true if the snap element moved. A snap element that is not among the items
    /// leaves the list unchanged; the dragged element itself is never a reference.
    pub fn reorder(&self, draggable: &Draggable, point: Point) -> bool {
        let element = draggable.element();
        let snap = draggable.snap_element();
        let (before, after) = {
            let state = self.inner.state.borrow();
            let items = &state.items;
            let Some(cur) = items.iter().position(|i| i.node == snap) else {
                return false;
            };
            let before = items[..cur]
                .iter()
                .rev()
                .filter(|i| i.node != element)
                .find(|i| i.bounds.nw_of_br(point))
                .map(|i| i.node);
            let after = match before {
                Some(_) => None,
                None => items[cur + 1..]
                    .iter()
                    .filter(|i| i.node != element)
                    .find(|i| i.bounds.se_of_tl(point))
                    .map(|i| i.node),
            };
            (before, after)
        };
        if let Some(node) = before {
            draggable.move_before(node);
        } else if let Some(node) = after {
            draggable.move_after(node);
        } else {
            return false;
        }
        trace!("sortable on {:?} moved {snap:?} at {point:?}", self.inner.element);
        self.refresh();
        true
    }

    /// Release every subscription; a zone created from options is destroyed too. Idempotent.
    pub fn destroy(&self) {
        let watched = {
            let mut state = self.inner.state.borrow_mut();
            if state.destroyed {
                return;
            }
            state.destroyed = true;
            state.items.clear();
            core::mem::take(&mut state.watched)
        };
        for (weak, id) in watched {
            if let Some(d) = Draggable::upgrade(&weak) {
                d.unbind(DragEventKind::Drag, id);
            }
        }
        if let Some(d) = &self.inner.droppable {
            for &(kind, id) in &self.inner.subscriptions {
                d.unbind(kind, id);
            }
            if self.inner.owns_droppable {
                d.destroy();
            }
        }
        debug!("destroyed sortable on {:?}", self.inner.element);
    }

    /// Returns true if both handles refer to the same list.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn sort_start(&self, ev: &DropEvent) {
        if self.inner.state.borrow().destroyed {
            return;
        }
        self.refresh();
        let draggable = &ev.draggable;
        let target = draggable.downgrade();
        if self
            .inner
            .state
            .borrow()
            .watched
            .iter()
            .any(|(w, _)| Weak::ptr_eq(w, &target))
        {
            return;
        }
        let weak = Rc::downgrade(&self.inner);
        let id = draggable.bind(DragEventKind::Drag, move |ev: &DragEvent| {
            let (Some(inner), Some(point)) = (weak.upgrade(), ev.point()) else {
                return;
            };
            Self { inner }.reorder(&ev.draggable, point);
        });
        self.inner.state.borrow_mut().watched.push((target, id));
        debug!("sortable on {:?} sorting draggable {}", self.inner.element, draggable.id());
    }

    fn sort_stop(&self, ev: &DropEvent) {
        let target = ev.draggable.downgrade();
        let id = {
            let mut state = self.inner.state.borrow_mut();
            state.watched.retain(|(w, _)| w.strong_count() > 0);
            let Some(pos) = state.watched.iter().position(|(w, _)| Weak::ptr_eq(w, &target)) else {
                return;
            };
            state.watched.remove(pos).1
        };
        ev.draggable.unbind(DragEventKind::Drag, id);
        debug!("sortable on {:?} stopped sorting draggable {}", self.inner.element, ev.draggable.id());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draggable::DraggableOptions;
    use crate::group::Group;
    use crate::testing::Stage;
    use alloc::vec;
    use dragdrop_surface::{ElementSpec, Flow};
    use kurbo::Size;

    /// A row list at the origin holding `A`, `B`, `C`, then the item, each 10×10.
    fn row(stage: &Stage) -> (NodeId, Vec<NodeId>, NodeId) {
        let list = stage.add(
            None,
            ElementSpec::new("ul", Size::new(100.0, 10.0)).flow(Flow::Row),
        );
        let abc: Vec<NodeId> = (0..3)
            .map(|_| stage.add(Some(list), ElementSpec::new("li", Size::new(10.0, 10.0))))
            .collect();
        let item = stage.add(Some(list), ElementSpec::new("li", Size::new(10.0, 10.0)));
        (list, abc, item)
    }

    #[test]
    fn requires_an_element() {
        let stage = Stage::new();
        assert!(Sortable::new(&stage.ctx, SortableOptions::default()).is_none());
        let (list, _, _) = row(&stage);
        let sortable = Sortable::new(&stage.ctx, SortableOptions::new(list)).unwrap();
        assert_eq!(sortable.selector(), &Selector::Children);
        assert!(sortable.droppable().is_none());
    }

    #[test]
    fn refresh_measures_selected_items() {
        let stage = Stage::new();
        let (list, abc, item) = row(&stage);
        let other = stage.add(Some(list), ElementSpec::new("span", Size::new(5.0, 10.0)));
        let sortable = Sortable::new(
            &stage.ctx,
            SortableOptions::new(list).items("> li".parse().unwrap()),
        )
        .unwrap();
        assert!(sortable.items().is_empty());
        sortable.refresh();
        let nodes: Vec<NodeId> = sortable.items().iter().map(|i| i.node).collect();
        assert_eq!(nodes, vec![abc[0], abc[1], abc[2], item]);
        assert!(!nodes.contains(&other));
        assert_eq!(sortable.items()[1].bounds.left(), 10.0);
        assert_eq!(sortable.items()[3].bounds.right(), 40.0);
    }

    #[test]
    fn reorder_scans_backward_then_forward() {
        let stage = Stage::new();
        let (list, abc, item) = row(&stage);
        let drag = Draggable::new(&stage.ctx, DraggableOptions::new(abc[1])).unwrap();
        let sortable = Sortable::new(&stage.ctx, SortableOptions::new(list)).unwrap();
        sortable.refresh();

        // Nearest predecessor first: A is [0,10], pointer at its right edge.
        assert!(sortable.reorder(&drag, Point::new(5.0, 5.0)));
        assert_eq!(stage.children(list), vec![abc[1], abc[0], abc[2], item]);

        // Nothing before it now, and A [10,20] is the nearest successor.
        assert!(sortable.reorder(&drag, Point::new(25.0, 5.0)));
        assert_eq!(stage.children(list), vec![abc[0], abc[1], abc[2], item]);
        assert!(sortable.reorder(&drag, Point::new(25.0, 5.0)));
        assert_eq!(stage.children(list), vec![abc[0], abc[2], abc[1], item]);

        // Settled: B sits under the pointer and no neighbor qualifies.
        assert!(!sortable.reorder(&drag, Point::new(25.0, 5.0)));
        assert_eq!(stage.children(list), vec![abc[0], abc[2], abc[1], item]);
    }

    #[test]
    fn unknown_snap_element_is_ignored() {
        let stage = Stage::new();
        let (list, _abc, _item) = row(&stage);
        let outside = stage.add(None, ElementSpec::new("li", Size::new(10.0, 10.0)));
        let drag = Draggable::new(&stage.ctx, DraggableOptions::new(outside)).unwrap();
        let sortable = Sortable::new(&stage.ctx, SortableOptions::new(list)).unwrap();
        sortable.refresh();
        let before = stage.children(list);
        assert!(!sortable.reorder(&drag, Point::new(5.0, 5.0)));
        assert_eq!(stage.children(list), before);
    }

    #[test]
    fn dragging_to_the_front_settles_before_a() {
        let stage = Stage::new();
        let (list, abc, item) = row(&stage);
        let group = Group::new(&stage.ctx);
        let drag = group.add(DraggableOptions::new(item)).unwrap();
        let sortable = Sortable::new(
            &stage.ctx,
            SortableOptions::new(list)
                .items("> li".parse().unwrap())
                .droppable_options(DroppableOptions::default().group(&group)),
        )
        .unwrap();
        let zone = sortable.droppable().unwrap().clone();
        assert_eq!(zone.element(), list);

        stage.press(item, 35.0, 5.0);
        // The first frame takes the item in; sorting starts with the next one.
        stage.move_to(5.0, 5.0);
        assert!(drag.is_attached_to(&zone));
        let placeholder = drag.placeholder().unwrap();
        assert_eq!(
            stage.children(list),
            vec![abc[0], abc[1], abc[2], placeholder, item]
        );
        for _ in 0..4 {
            stage.move_to(5.0, 5.0);
        }
        assert_eq!(
            stage.children(list),
            vec![placeholder, abc[0], abc[1], abc[2], item]
        );
        stage.release(5.0, 5.0);
        assert_eq!(stage.children(list), vec![item, abc[0], abc[1], abc[2]]);
        assert_eq!(drag.relay().handler_count(DragEventKind::Drag), 0);
    }

    #[test]
    fn drag_out_stops_sorting() {
        let stage = Stage::new();
        let (list, abc, item) = row(&stage);
        let group = Group::new(&stage.ctx);
        let drag = group.add(DraggableOptions::new(item)).unwrap();
        let zone = Droppable::new(&stage.ctx, DroppableOptions::new(list).group(&group)).unwrap();
        let _sortable =
            Sortable::new(&stage.ctx, SortableOptions::new(list).droppable(&zone)).unwrap();

        stage.press(item, 35.0, 5.0);
        stage.move_to(5.0, 5.0);
        // Zone frame plus sort frame.
        assert_eq!(drag.relay().handler_count(DragEventKind::Drag), 2);
        stage.move_to(200.0, 200.0);
        assert_eq!(drag.relay().handler_count(DragEventKind::Drag), 1);
        stage.release(200.0, 200.0);
        assert_eq!(stage.children(list), vec![abc[0], abc[1], abc[2], item]);
    }

    #[test]
    fn destroy_releases_the_zone_it_owns() {
        let stage = Stage::new();
        let (list, _abc, item) = row(&stage);
        let group = Group::new(&stage.ctx);
        let drag = group.add(DraggableOptions::new(item)).unwrap();
        let sortable = Sortable::new(
            &stage.ctx,
            SortableOptions::new(list).droppable_options(DroppableOptions::default().group(&group)),
        )
        .unwrap();
        let zone = sortable.droppable().unwrap().clone();
        stage.press(item, 35.0, 5.0);
        stage.move_to(5.0, 5.0);
        sortable.destroy();
        assert!(zone.is_destroyed());
        assert_eq!(drag.relay().handler_count(DragEventKind::Drag), 0);
        assert_eq!(zone.relay().handler_count(DropEventKind::DragOver), 0);
        assert!(sortable.items().is_empty());
        stage.release(5.0, 5.0);
        sortable.destroy();
    }
}
