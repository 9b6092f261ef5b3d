// Copyright 2025 the Dragdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event vocabulary emitted by draggables, groups, and droppables.
//!
//! Each actor owns a [`Relay`](dragdrop_relay::Relay) keyed by one of the `*Kind` enums below.
//! Payloads carry handles to the actors involved; they are cheap to clone.

use kurbo::Point;

use crate::draggable::Draggable;
use crate::droppable::Droppable;
use crate::group::Group;
use crate::pointer::PointerEvent;

/// Events emitted by a [`Draggable`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DragEventKind {
    /// A primary press landed on the anchor; nothing has changed yet.
    BeforeDrag,
    /// The drag session started.
    DragStart,
    /// One motion frame.
    Drag,
    /// The drag session ended.
    DragEnd,
    /// The draggable was removed from a group.
    Unbind,
}

impl DragEventKind {
    /// Every kind, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::BeforeDrag,
        Self::DragStart,
        Self::Drag,
        Self::DragEnd,
        Self::Unbind,
    ];

    /// Lowercase event name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::BeforeDrag => "beforedrag",
            Self::DragStart => "dragstart",
            Self::Drag => "drag",
            Self::DragEnd => "dragend",
            Self::Unbind => "unbind",
        }
    }

    /// Inverse of [`DragEventKind::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

/// Payload of a [`DragEventKind`] event.
#[derive(Clone, Debug)]
pub struct DragEvent {
    /// Which event this is.
    pub kind: DragEventKind,
    /// The pointer event that caused it; `None` for [`DragEventKind::Unbind`].
    pub pointer: Option<PointerEvent>,
    /// The emitting draggable.
    pub draggable: Draggable,
    /// The group involved, for [`DragEventKind::Unbind`].
    pub group: Option<Group>,
}

impl DragEvent {
    /// Client position of the pointer, if any.
    pub fn point(&self) -> Option<Point> {
        self.pointer.as_ref().map(|p| p.client)
    }
}

/// Events re-emitted by a [`Group`] on behalf of its members.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GroupEventKind {
    /// A member started dragging.
    DragStart,
    /// A member stopped dragging.
    DragEnd,
}

impl GroupEventKind {
    /// Lowercase event name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::DragStart => "dragstart",
            Self::DragEnd => "dragend",
        }
    }
}

/// Payload of a [`GroupEventKind`] event.
#[derive(Clone, Debug)]
pub struct GroupEvent {
    /// Which event this is.
    pub kind: GroupEventKind,
    /// The pointer event that caused it.
    pub pointer: Option<PointerEvent>,
    /// The member concerned.
    pub draggable: Draggable,
    /// The re-emitting group.
    pub group: Group,
}

/// Events emitted by a [`Droppable`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DropEventKind {
    /// A dragged item entered the zone and was received.
    DragOver,
    /// A dragged item left the zone and was surrendered.
    DragOut,
    /// A watched drag ended; drop handling follows.
    DropStart,
    /// Drop handling finished.
    DropEnd,
}

impl DropEventKind {
    /// Lowercase event name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::DragOver => "dragover",
            Self::DragOut => "dragout",
            Self::DropStart => "dropstart",
            Self::DropEnd => "dropend",
        }
    }
}

/// Payload of a [`DropEventKind`] event, also handed to [`DropHooks`](crate::DropHooks).
#[derive(Clone, Debug)]
pub struct DropEvent {
    /// Which event this is.
    pub kind: DropEventKind,
    /// The pointer event that caused it.
    pub pointer: Option<PointerEvent>,
    /// The dragged item.
    pub draggable: Draggable,
    /// The emitting zone.
    pub droppable: Droppable,
}

impl DropEvent {
    /// Client position of the pointer, if any.
    pub fn point(&self) -> Option<Point> {
        self.pointer.as_ref().map(|p| p.client)
    }
}
