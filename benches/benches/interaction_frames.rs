// Copyright 2025 the Dragdrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::RefCell;
use std::rc::Rc;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use dragdrop_interact::{
    DragContext, Draggable, DraggableOptions, DroppableOptions, Group, PointerConfig, Sortable,
    SortableOptions, SurfaceRef,
};
use dragdrop_relay::Relay;
use dragdrop_surface::{BoxSurface, ElementSpec, Flow, NodeId};
use kurbo::{Point, Size};

const CELL: f64 = 10.0;

struct Scene {
    _boxes: Rc<RefCell<BoxSurface>>,
    ctx: DragContext,
    items: Vec<NodeId>,
    sortable: Sortable,
    dragged: Draggable,
}

/// A row list of `n` cells with the last one bound and a sortable zone over the list.
fn row_scene(n: usize) -> Scene {
    let boxes = Rc::new(RefCell::new(BoxSurface::default()));
    let (list, items) = {
        let mut s = boxes.borrow_mut();
        let list = s.insert(
            None,
            ElementSpec::new("ul", Size::new(CELL * n as f64, CELL)).flow(Flow::Row),
        );
        let items: Vec<NodeId> = (0..n)
            .map(|_| s.insert(Some(list), ElementSpec::new("li", Size::new(CELL, CELL))))
            .collect();
        (list, items)
    };
    let surface: SurfaceRef = boxes.clone();
    let ctx = DragContext::new(surface, PointerConfig::default());
    let group = Group::new(&ctx);
    let dragged = group
        .add(DraggableOptions::new(items[n - 1]))
        .expect("element is set");
    let sortable = Sortable::new(
        &ctx,
        SortableOptions::new(list).droppable_options(DroppableOptions::default().group(&group)),
    )
    .expect("element is set");
    Scene {
        _boxes: boxes,
        ctx,
        items,
        sortable,
        dragged,
    }
}

fn bench_relay(c: &mut Criterion) {
    let mut group = c.benchmark_group("relay");
    for &n in &[1usize, 8, 64] {
        let relay: Relay<u8, u64> = Relay::new();
        let sum = Rc::new(RefCell::new(0_u64));
        for _ in 0..n {
            let sum = sum.clone();
            relay.bind(0, move |v| *sum.borrow_mut() += *v);
        }
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("trigger_n{}", n), |b| {
            b.iter(|| black_box(relay.trigger(0, black_box(&1))));
        });
    }
    group.finish();
}

fn bench_sortable(c: &mut Criterion) {
    let mut group = c.benchmark_group("sortable");
    for &n in &[16usize, 128, 1024] {
        let scene = row_scene(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("refresh_n{}", n), |b| {
            b.iter(|| {
                scene.sortable.refresh();
                black_box(scene.sortable.items().len());
            });
        });
        scene.sortable.refresh();
        // Pointer over the first cell: one step back from the end of the list.
        group.bench_function(format!("reorder_front_n{}", n), |b| {
            b.iter_batched(
                || {
                    scene.dragged.move_after(scene.items[n - 2]);
                    scene.sortable.refresh();
                },
                |()| black_box(scene.sortable.reorder(&scene.dragged, Point::new(1.0, 1.0))),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_drag_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag_session");
    for &n in &[16usize, 128] {
        group.bench_function(format!("press_sweep_release_n{}", n), |b| {
            b.iter_batched(
                || row_scene(n),
                |scene| {
                    let pointer = scene.ctx.pointer();
                    let last = scene.items[n - 1];
                    pointer.press(last, Point::new(CELL * n as f64 - 5.0, 5.0));
                    for i in (0..n).rev() {
                        pointer.move_to(Point::new(CELL * i as f64 + 1.0, 5.0));
                    }
                    pointer.release(Point::new(1.0, 5.0));
                    black_box(scene.dragged.is_dragging());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_relay, bench_sortable, bench_drag_session);
criterion_main!(benches);
