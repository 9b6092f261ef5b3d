// Copyright 2025 the Dragdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The element adapter contract consumed by the interaction layer.

use alloc::vec::Vec;
use kurbo::{Point, Size};

use crate::selector::Selector;
use crate::types::{Markers, NodeId, Style};

/// Element operations the drag and drop core relies on.
///
/// Implementations wrap whatever element model the host has: a browser DOM, a retained
/// widget tree, or the in-memory [`BoxSurface`](crate::BoxSurface).
///
/// All methods tolerate stale or unknown ids: queries return empty/zero values and
/// mutations are no-ops. The trait is object safe; the interaction layer stores it as
/// `Rc<RefCell<dyn Surface>>`.
pub trait Surface {
    /// Parent of `node`, if attached.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Returns true if `node` is `ancestor` or lives in its subtree.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool;

    /// Elements under `root` (excluding `root`) matching `selector`, in document order.
    fn query(&self, root: NodeId, selector: &Selector) -> Vec<NodeId>;

    /// Page offset of the top-left corner.
    fn offset(&self, node: NodeId) -> Point;

    /// Offset relative to the offset parent.
    fn position(&self, node: NodeId) -> Point;

    /// Border-box size.
    fn size(&self, node: NodeId) -> Size;

    /// The element absolutely positioned descendants are placed against.
    fn offset_parent(&self, node: NodeId) -> Option<NodeId>;

    /// Size of the visible viewport.
    fn viewport(&self) -> Size;

    /// Set `markers` on `node`.
    fn add_marker(&mut self, node: NodeId, markers: Markers);

    /// Clear `markers` on `node`.
    fn remove_marker(&mut self, node: NodeId, markers: Markers);

    /// Current markers of `node`.
    fn markers(&self, node: NodeId) -> Markers;

    /// Deep-clone `node` into a new detached element.
    fn clone_node(&mut self, node: NodeId) -> Option<NodeId>;

    /// Move `node` so it directly precedes `reference` under the same parent.
    fn insert_before(&mut self, node: NodeId, reference: NodeId);

    /// Move `node` so it directly follows `reference` under the same parent.
    fn insert_after(&mut self, node: NodeId, reference: NodeId);

    /// Move `node` to the end of `parent`'s children.
    fn append(&mut self, parent: NodeId, node: NodeId);

    /// Unlink `node` from its parent, keeping it alive.
    fn detach(&mut self, node: NodeId);

    /// Destroy `node` and its subtree.
    fn remove(&mut self, node: NodeId);

    /// Replace the inline style of `node`.
    fn set_style(&mut self, node: NodeId, style: Style);

    /// Inline style of `node`.
    fn style(&self, node: NodeId) -> Style;

    /// Move keyboard focus to the document body.
    fn focus_body(&mut self);

    /// Enable or suppress text selection while a drag is in progress.
    fn set_selection_enabled(&mut self, enabled: bool);
}
