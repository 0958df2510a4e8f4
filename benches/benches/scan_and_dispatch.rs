// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use catalyst::catalyst_dom::NodeId;
use catalyst::{ClassDescriptor, Event, Methods, Runtime};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};

/// A defined `bench-list` holding `rows` rows, each with a bound button.
fn build(rows: usize) -> (Runtime, NodeId, Vec<NodeId>) {
    let mut rt = Runtime::default();
    let class = rt.define_class(ClassDescriptor::new("BenchList")).unwrap();
    rt.define_element("bench-list", class, || {
        Box::new(Methods::new().method("select", |_, _, event| {
            black_box(event.target());
        }))
    })
    .unwrap();
    let list = rt.create_element("bench-list").unwrap();
    let mut buttons = Vec::with_capacity(rows);
    for _ in 0..rows {
        let row = rt.create_element("div").unwrap();
        let button = rt.create_element("button").unwrap();
        rt.dom_mut()
            .set_attribute(button, "data-action", "click:bench-list#select mouseover:bench-list#select")
            .unwrap();
        rt.dom_mut().append_child(row, button).unwrap();
        rt.dom_mut().append_child(list, row).unwrap();
        buttons.push(button);
    }
    (rt, list, buttons)
}

fn bench_connect(c: &mut Criterion) {
    let mut group = c.benchmark_group("connect");
    for &rows in &[10_usize, 100, 1_000] {
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_function(format!("rows_{rows}"), |b| {
            b.iter_batched(
                || build(rows),
                |(mut rt, list, _)| {
                    let doc = rt.document();
                    rt.append_child(doc, list).unwrap();
                    black_box(rt.initialized(list));
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_late_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("late_insert_flush");
    for &rows in &[10_usize, 100, 1_000] {
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_function(format!("rows_{rows}"), |b| {
            b.iter_batched(
                || {
                    let (mut rt, list, _) = build(0);
                    let doc = rt.document();
                    rt.append_child(doc, list).unwrap();
                    for _ in 0..rows {
                        let row = rt.create_element("div").unwrap();
                        let button = rt.create_element("button").unwrap();
                        rt.dom_mut()
                            .set_attribute(button, "data-action", "click:bench-list#select")
                            .unwrap();
                        rt.dom_mut().append_child(row, button).unwrap();
                        rt.dom_mut().append_child(list, row).unwrap();
                    }
                    rt
                },
                |mut rt| black_box(rt.flush()),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    let (mut rt, list, buttons) = build(100);
    let doc = rt.document();
    rt.append_child(doc, list).unwrap();
    let target = buttons[buttons.len() / 2];
    group.bench_function("click_bound", |b| {
        b.iter(|| rt.dispatch_event(black_box(target), Event::new("click")).unwrap());
    });
    group.bench_function("keydown_unbound", |b| {
        b.iter(|| rt.dispatch_event(black_box(target), Event::new("keydown")).unwrap());
    });
    group.finish();
}

criterion_group!(benches, bench_connect, bench_late_insert, bench_dispatch);
criterion_main!(benches);
