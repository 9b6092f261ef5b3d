// Copyright 2025 the Dragdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Group: a set of draggables whose drag lifecycle is broadcast to interested zones.
//!
//! Droppables never subscribe to draggables directly at first; they listen on a group and
//! learn about each member when it starts dragging. A group holds its members weakly.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;

use dragdrop_relay::{HandlerId, Relay};
use dragdrop_surface::NodeId;
use log::debug;

use crate::context::DragContext;
use crate::draggable::{Draggable, DraggableInner, DraggableOptions};
use crate::events::{DragEvent, DragEventKind, GroupEvent, GroupEventKind};

/// Handle to a group of draggables.
///
/// Cloning yields another handle to the same group.
#[derive(Clone)]
pub struct Group {
    inner: Rc<GroupInner>,
}

struct GroupInner {
    ctx: DragContext,
    relay: Relay<GroupEventKind, GroupEvent>,
    members: RefCell<Vec<Member>>,
}

/// A member and the exact handlers the group subscribed on it.
struct Member {
    draggable: Weak<DraggableInner>,
    element: NodeId,
    on_start: HandlerId,
    on_end: HandlerId,
}

impl core::fmt::Debug for Group {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let elements: Vec<NodeId> = self
            .inner
            .members
            .borrow()
            .iter()
            .filter(|m| m.draggable.strong_count() > 0)
            .map(|m| m.element)
            .collect();
        f.debug_struct("Group")
            .field("members", &elements)
            .field("relay", &self.inner.relay)
            .finish_non_exhaustive()
    }
}

impl Group {
    /// Create an empty group in `ctx`.
    pub fn new(ctx: &DragContext) -> Self {
        Self {
            inner: Rc::new(GroupInner {
                ctx: ctx.clone(),
                relay: Relay::new(),
                members: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Bind `options.element` and add it to the group.
    ///
    /// Returns `None` without an element. A member already bound to the element is returned
    /// as is; an element bound elsewhere in the context joins with its existing binding.
    pub fn add(&self, options: DraggableOptions) -> Option<Draggable> {
        let element = options.element?;
        if let Some(existing) = self.member_for(element) {
            return Some(existing);
        }
        let draggable = Draggable::new(&self.inner.ctx, options)?;
        self.adopt(&draggable);
        Some(draggable)
    }

    /// Add an existing binding. No-op for members.
    pub fn adopt(&self, draggable: &Draggable) {
        if self.contains(draggable) {
            return;
        }
        let on_start = self.forward(draggable, DragEventKind::DragStart, GroupEventKind::DragStart);
        let on_end = self.forward(draggable, DragEventKind::DragEnd, GroupEventKind::DragEnd);
        {
            let mut members = self.inner.members.borrow_mut();
            members.retain(|m| m.draggable.strong_count() > 0);
            members.push(Member {
                draggable: draggable.downgrade(),
                element: draggable.element(),
                on_start,
                on_end,
            });
        }
        draggable.join(self);
        debug!("group added draggable {}", draggable.id());
    }

    /// Remove a member.
    ///
    /// Unsubscribes the handlers installed when it was added, forgets it, and emits
    /// [`DragEventKind::Unbind`] on it. Returns false for non-members.
    pub fn remove(&self, draggable: &Draggable) -> bool {
        let member = {
            let mut members = self.inner.members.borrow_mut();
            let target = draggable.downgrade();
            members
                .iter()
                .position(|m| Weak::ptr_eq(&m.draggable, &target))
                .map(|pos| members.remove(pos))
        };
        let Some(member) = member else {
            return false;
        };
        draggable.unbind(DragEventKind::DragStart, member.on_start);
        draggable.unbind(DragEventKind::DragEnd, member.on_end);
        draggable.leave(self);
        debug!("group removed draggable {}", draggable.id());
        draggable.emit(DragEventKind::Unbind, None, Some(self));
        true
    }

    /// Live members, in insertion order.
    pub fn members(&self) -> Vec<Draggable> {
        self.inner
            .members
            .borrow()
            .iter()
            .filter_map(|m| Draggable::upgrade(&m.draggable))
            .collect()
    }

    /// Number of live members.
    pub fn len(&self) -> usize {
        self.inner
            .members
            .borrow()
            .iter()
            .filter(|m| m.draggable.strong_count() > 0)
            .count()
    }

    /// Returns true if the group has no live member.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `draggable` is a member.
    pub fn contains(&self, draggable: &Draggable) -> bool {
        let target = draggable.downgrade();
        self.inner
            .members
            .borrow()
            .iter()
            .any(|m| Weak::ptr_eq(&m.draggable, &target))
    }

    /// Subscribe to the group's broadcasts.
    pub fn bind(&self, kind: GroupEventKind, handler: impl Fn(&GroupEvent) + 'static) -> HandlerId {
        self.inner.relay.bind(kind, handler)
    }

    /// Remove a subscription made with [`Group::bind`].
    pub fn unbind(&self, kind: GroupEventKind, id: HandlerId) -> bool {
        self.inner.relay.unbind(kind, id)
    }

    /// The event relay.
    pub fn relay(&self) -> &Relay<GroupEventKind, GroupEvent> {
        &self.inner.relay
    }

    /// The context members are bound in.
    pub fn context(&self) -> &DragContext {
        &self.inner.ctx
    }

    /// Returns true if both handles refer to the same group.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn member_for(&self, element: NodeId) -> Option<Draggable> {
        self.inner
            .members
            .borrow()
            .iter()
            .filter(|m| m.element == element)
            .find_map(|m| Draggable::upgrade(&m.draggable))
    }

    /// Re-emit `from` on `draggable` as `to` on this group.
    fn forward(&self, draggable: &Draggable, from: DragEventKind, to: GroupEventKind) -> HandlerId {
        let weak = Rc::downgrade(&self.inner);
        draggable.bind(from, move |ev: &DragEvent| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let group = Self { inner };
            let event = GroupEvent {
                kind: to,
                pointer: ev.pointer.clone(),
                draggable: ev.draggable.clone(),
                group: group.clone(),
            };
            group.inner.relay.trigger(to, &event);
        })
    }
}
