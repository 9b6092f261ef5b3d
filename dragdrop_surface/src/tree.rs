// Copyright 2025 the Dragdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory element tree implementing [`Surface`].

use alloc::vec::Vec;
use kurbo::{Point, Size, Vec2};

use crate::selector::Selector;
use crate::surface::Surface;
use crate::types::{ElementSpec, Flow, Markers, NodeId, Style};

impl Default for BoxSurface {
    fn default() -> Self {
        Self::new(Size::new(1024.0, 768.0))
    }
}

/// A generational tree of boxes with just enough flow to make reordering visible.
///
/// Offsets are derived on demand:
/// - absolutely positioned nodes sit at [`Style::origin`] relative to their parent;
/// - in-flow children of a [`Flow::Row`] / [`Flow::Column`] parent are stacked in document order,
///   skipping absolutely positioned siblings;
/// - in-flow children of a [`Flow::Free`] parent sit at their own [`ElementSpec::origin`].
///
/// This is not a layout engine: sizes are fixed by the caller and never derived from content.
pub struct BoxSurface {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    viewport: Size,
    body_focused: bool,
    selection_enabled: bool,
}

impl core::fmt::Debug for BoxSurface {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("BoxSurface")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("viewport", &self.viewport)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    spec: ElementSpec,
    style: Style,
    markers: Markers,
}

impl Node {
    fn new(generation: u32, spec: ElementSpec) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            spec,
            style: Style::default(),
            markers: Markers::empty(),
        }
    }
}

impl BoxSurface {
    /// Create an empty surface with the given viewport size.
    pub fn new(viewport: Size) -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            viewport,
            body_focused: false,
            selection_enabled: true,
        }
    }

    /// Insert a new element as the last child of `parent` (or as a root if `None`).
    pub fn insert(&mut self, parent: Option<NodeId>, spec: ElementSpec) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, spec));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId slots are 32-bit."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, spec)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId slots are 32-bit."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        if let Some(p) = parent {
            if self.is_alive(p) {
                self.link_last(id, p);
            }
        }
        id
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Children of `id` in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Element description of `id`.
    pub fn spec(&self, id: NodeId) -> Option<&ElementSpec> {
        self.node_opt(id).map(|n| &n.spec)
    }

    /// Resize an element.
    pub fn set_size(&mut self, id: NodeId, size: Size) {
        if let Some(n) = self.node_opt_mut(id) {
            n.spec.size = size;
        }
    }

    /// Change the viewport size.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Whether [`Surface::focus_body`] has been called.
    pub fn body_focused(&self) -> bool {
        self.body_focused
    }

    /// Whether text selection is currently enabled.
    pub fn selection_enabled(&self) -> bool {
        self.selection_enabled
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Returns true if no node is alive.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // --- internals ---

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn link_last(&mut self, id: NodeId, parent: NodeId) {
        if let Some(p) = self.node_opt_mut(parent) {
            p.children.push(id);
        }
        if let Some(n) = self.node_opt_mut(id) {
            n.parent = Some(parent);
        }
    }

    fn link_at(&mut self, id: NodeId, parent: NodeId, index: usize) {
        if let Some(p) = self.node_opt_mut(parent) {
            let index = index.min(p.children.len());
            p.children.insert(index, id);
        }
        if let Some(n) = self.node_opt_mut(id) {
            n.parent = Some(parent);
        }
    }

    fn unlink(&mut self, id: NodeId) {
        let Some(parent) = self.node_opt(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.node_opt_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.node_opt_mut(id) {
            n.parent = None;
        }
    }

    /// Moves `node` next to `reference`; `after` selects the side.
    fn move_beside(&mut self, node: NodeId, reference: NodeId, after: bool) {
        if node == reference || !self.is_alive(node) {
            return;
        }
        // Refuse to create a cycle.
        if self.contains(node, reference) {
            return;
        }
        let Some(parent) = self.parent(reference) else {
            return;
        };
        self.unlink(node);
        let Some(pos) = self.children(parent).iter().position(|c| *c == reference) else {
            return;
        };
        self.link_at(node, parent, if after { pos + 1 } else { pos });
    }

    fn clone_subtree(&mut self, id: NodeId) -> Option<NodeId> {
        let (spec, style, markers, children) = {
            let n = self.node_opt(id)?;
            (n.spec.clone(), n.style, n.markers, n.children.clone())
        };
        let copy = self.insert(None, spec);
        if let Some(n) = self.node_opt_mut(copy) {
            n.style = style;
            n.markers = markers;
        }
        for child in children {
            if let Some(c) = self.clone_subtree(child) {
                self.link_last(c, copy);
            }
        }
        Some(copy)
    }

    fn collect(&self, id: NodeId, selector: &Selector, out: &mut Vec<NodeId>) {
        for &child in self.children(id) {
            if let Some(n) = self.node_opt(child) {
                if selector.matches_tag(&n.spec.tag) {
                    out.push(child);
                }
            }
            if !selector.is_shallow() {
                self.collect(child, selector, out);
            }
        }
    }

    fn in_flow_advance(&self, parent: NodeId, id: NodeId, flow: Flow) -> Vec2 {
        let mut advance = Vec2::ZERO;
        for &sibling in self.children(parent) {
            if sibling == id {
                break;
            }
            let Some(s) = self.node_opt(sibling) else {
                continue;
            };
            if s.style.is_absolute() {
                continue;
            }
            match flow {
                Flow::Row => advance.x += s.spec.size.width,
                Flow::Column => advance.y += s.spec.size.height,
                Flow::Free => {}
            }
        }
        advance
    }
}

impl Surface for BoxSurface {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node_opt(node)?.parent
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.is_alive(ancestor) {
            return false;
        }
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.parent(id);
        }
        false
    }

    fn query(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect(root, selector, &mut out);
        out
    }

    fn offset(&self, node: NodeId) -> Point {
        let Some(n) = self.node_opt(node) else {
            return Point::ZERO;
        };
        let Some(parent) = n.parent else {
            return if n.style.is_absolute() {
                n.style.origin
            } else {
                n.spec.origin
            };
        };
        let base = self.offset(parent);
        if n.style.is_absolute() {
            return base + n.style.origin.to_vec2();
        }
        let flow = self.node_opt(parent).map(|p| p.spec.flow).unwrap_or_default();
        match flow {
            Flow::Free => base + n.spec.origin.to_vec2(),
            Flow::Row | Flow::Column => base + self.in_flow_advance(parent, node, flow),
        }
    }

    fn position(&self, node: NodeId) -> Point {
        let offset = self.offset(node);
        match self.offset_parent(node) {
            Some(p) => (offset - self.offset(p)).to_point(),
            None => offset,
        }
    }

    fn size(&self, node: NodeId) -> Size {
        self.node_opt(node).map(|n| n.spec.size).unwrap_or(Size::ZERO)
    }

    fn offset_parent(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node)
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn add_marker(&mut self, node: NodeId, markers: Markers) {
        if let Some(n) = self.node_opt_mut(node) {
            n.markers.insert(markers);
        }
    }

    fn remove_marker(&mut self, node: NodeId, markers: Markers) {
        if let Some(n) = self.node_opt_mut(node) {
            n.markers.remove(markers);
        }
    }

    fn markers(&self, node: NodeId) -> Markers {
        self.node_opt(node).map(|n| n.markers).unwrap_or_default()
    }

    fn clone_node(&mut self, node: NodeId) -> Option<NodeId> {
        self.clone_subtree(node)
    }

    fn insert_before(&mut self, node: NodeId, reference: NodeId) {
        self.move_beside(node, reference, false);
    }

    fn insert_after(&mut self, node: NodeId, reference: NodeId) {
        self.move_beside(node, reference, true);
    }

    fn append(&mut self, parent: NodeId, node: NodeId) {
        if node == parent || !self.is_alive(parent) || self.contains(node, parent) {
            return;
        }
        self.unlink(node);
        self.link_last(node, parent);
    }

    fn detach(&mut self, node: NodeId) {
        self.unlink(node);
    }

    fn remove(&mut self, node: NodeId) {
        if !self.is_alive(node) {
            return;
        }
        self.unlink(node);
        let children = self.children(node).to_vec();
        for child in children {
            // Children still point at `node`; clear the link before recursing.
            if let Some(c) = self.node_opt_mut(child) {
                c.parent = None;
            }
            self.remove(child);
        }
        self.nodes[node.idx()] = None;
        self.free_list.push(node.idx());
    }

    fn set_style(&mut self, node: NodeId, style: Style) {
        if let Some(n) = self.node_opt_mut(node) {
            n.style = style;
        }
    }

    fn style(&self, node: NodeId) -> Style {
        self.node_opt(node).map(|n| n.style).unwrap_or_default()
    }

    fn focus_body(&mut self) {
        self.body_focused = true;
    }

    fn set_selection_enabled(&mut self, enabled: bool) {
        self.selection_enabled = enabled;
    }
}
