// Copyright 2025 the Dragdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reordering a list by dragging an item over it.
//!
//! Two lists share a group. The last item of the first list is dragged to the front of
//! the second one: it is taken in on the first frame over the list, its placeholder walks
//! to the front on the following frames, and the release commits it there.
//!
//! Run:
//! - `RUST_LOG=dragdrop_interact=debug cargo run -p dragdrop_demos --example sortable_list`

use std::cell::RefCell;
use std::rc::Rc;

use dragdrop_interact::{
    DragContext, DraggableOptions, DropEventKind, Droppable, DroppableOptions, Group,
    PointerConfig, Sortable, SortableOptions, SurfaceRef,
};
use dragdrop_surface::{BoxSurface, ElementSpec, Flow, NodeId};
use kurbo::{Point, Size};

fn column(s: &mut BoxSurface, x: f64, labels: &[&str]) -> (NodeId, Vec<NodeId>) {
    let list = s.insert(
        None,
        ElementSpec::new("ul", Size::new(100.0, 20.0 * labels.len() as f64 + 40.0))
            .at(Point::new(x, 0.0))
            .flow(Flow::Column),
    );
    let items = labels
        .iter()
        .map(|_| s.insert(Some(list), ElementSpec::new("li", Size::new(100.0, 20.0))))
        .collect();
    (list, items)
}

fn main() {
    env_logger::init();

    let boxes = Rc::new(RefCell::new(BoxSurface::default()));
    let labels_left = ["apple", "banana", "cherry"];
    let labels_right = ["xylophone", "yak", "zebra"];
    let ((left, left_items), (right, right_items)) = {
        let mut s = boxes.borrow_mut();
        (
            column(&mut s, 0.0, &labels_left),
            column(&mut s, 200.0, &labels_right),
        )
    };
    let mut names: Vec<(NodeId, &str)> = Vec::new();
    names.extend(left_items.iter().copied().zip(labels_left));
    names.extend(right_items.iter().copied().zip(labels_right));
    let label = |n: NodeId| {
        names
            .iter()
            .find(|(id, _)| *id == n)
            .map(|(_, l)| *l)
            .unwrap_or("(placeholder)")
    };

    let surface: SurfaceRef = boxes.clone();
    let ctx = DragContext::new(surface, PointerConfig::detect(false));
    let group = Group::new(&ctx);
    // Groups hold members weakly; the bindings live as long as this vector.
    let _bindings: Vec<_> = left_items
        .iter()
        .chain(&right_items)
        .filter_map(|&item| group.add(DraggableOptions::new(item)))
        .collect();

    let mut lists = Vec::new();
    for list in [left, right] {
        let zone = Droppable::new(&ctx, DroppableOptions::new(list).group(&group))
            .expect("list is an element");
        zone.bind(DropEventKind::DragOver, move |ev| {
            println!("item {} entered list {list:?}", ev.draggable.id());
        });
        zone.bind(DropEventKind::DragOut, move |ev| {
            println!("item {} left list {list:?}", ev.draggable.id());
        });
        let sortable = Sortable::new(
            &ctx,
            SortableOptions::new(list)
                .items("> li".parse().expect("valid selector"))
                .droppable(&zone),
        )
        .expect("list is an element");
        lists.push(sortable);
    }

    let cherry = left_items[2];
    let pointer = ctx.pointer();
    pointer.press(cherry, Point::new(50.0, 50.0));
    // Leave the first list, cross over, then hold near the top of the second.
    for p in [(150.0, 50.0), (250.0, 50.0), (250.0, 5.0), (250.0, 5.0), (250.0, 5.0), (250.0, 5.0)] {
        pointer.move_to(Point::new(p.0, p.1));
    }
    pointer.release(Point::new(250.0, 5.0));

    let s = boxes.borrow();
    for list in [left, right] {
        let order: Vec<&str> = s.children(list).iter().map(|n| label(*n)).collect();
        println!("{list:?}: {order:?}");
    }
}
