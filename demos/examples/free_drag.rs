// Copyright 2025 the Dragdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Free drag with a bounding box, fed from raw mouse events.
//!
//! A card is dragged across a board. Its translucent proxy follows the pointer but stays
//! inside the board; releasing outside any drop zone leaves the card where it was.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p dragdrop_demos --example free_drag`

use std::cell::RefCell;
use std::rc::Rc;

use dragdrop_interact::{
    BoundingBox, DragContext, DragEventKind, Draggable, DraggableOptions, PointerConfig,
    SurfaceRef,
};
use dragdrop_surface::{BoxSurface, ElementSpec, Surface};
use kurbo::{Point, Size};

fn main() {
    env_logger::init();

    let boxes = Rc::new(RefCell::new(BoxSurface::default()));
    let (board, card) = {
        let mut s = boxes.borrow_mut();
        let board = s.insert(
            None,
            ElementSpec::new("div", Size::new(300.0, 200.0)).at(Point::new(20.0, 20.0)),
        );
        let card = s.insert(
            Some(board),
            ElementSpec::new("div", Size::new(60.0, 40.0)).at(Point::new(10.0, 10.0)),
        );
        (board, card)
    };
    let surface: SurfaceRef = boxes.clone();
    let ctx = DragContext::new(surface, PointerConfig::detect(false));

    let bounds: BoundingBox = "offsetParent".parse().expect("known bounding box");
    let drag = Draggable::new(
        &ctx,
        DraggableOptions::new(card)
            .bounding_box(bounds)
            .on(DragEventKind::DragStart, |ev| {
                println!("drag start at {:?}", ev.point());
            })
            .on(DragEventKind::DragEnd, |ev| {
                println!("drag end at {:?}", ev.point());
            }),
    )
    .expect("card is an element");

    let viewer = boxes.clone();
    drag.bind(DragEventKind::Drag, move |ev| {
        if let Some(proxy) = ev.draggable.proxy() {
            let at = viewer.borrow().position(proxy.node);
            println!("  pointer {:?} -> proxy {:?}", ev.point(), at);
        }
    });

    let pointer = ctx.pointer();
    let names = pointer.config().event_names();
    pointer.dispatch_raw(names.start, Some(card), Point::new(50.0, 50.0), Some(0));
    for (x, y) in [(80.0, 60.0), (200.0, 120.0), (600.0, 400.0), (-100.0, 30.0)] {
        pointer.dispatch_raw(names.motion, None, Point::new(x, y), None);
    }
    pointer.dispatch_raw(names.end, None, Point::new(-100.0, 30.0), Some(0));

    let s = boxes.borrow();
    println!(
        "card stays at {:?} inside board {:?}; {} nodes on the surface",
        s.position(card),
        s.offset(board),
        s.len()
    );
}
