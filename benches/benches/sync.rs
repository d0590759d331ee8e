// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::time::Duration;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Size};
use understory_anchor::resolve::resolve;
use understory_anchor::{Step, StepSequencer};
use understory_headless_dom::{ElementSpec, HeadlessDom};

/// A flat page of `n` sections, each tagged `data-step="i"`.
fn gen_page(n: usize) -> HeadlessDom {
    let mut dom = HeadlessDom::new(Size::new(1280.0, 800.0));
    let main = dom.insert(
        None,
        ElementSpec::new("main").bounds(Rect::new(0.0, 0.0, 1280.0, 60.0 * n as f64)),
    );
    for i in 0..n {
        let _ = dom.insert(
            Some(main),
            ElementSpec::new("section")
                .attr("data-step", i.to_string())
                .bounds(Rect::from_origin_size((40.0, 60.0 * i as f64), (600.0, 40.0))),
        );
    }
    dom
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    for &n in &[100usize, 1000] {
        let dom = gen_page(n);
        let last = format!("[data-step=\"{}\"]", n - 1);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("last_of_n{}", n), |b| {
            b.iter(|| black_box(resolve(&dom, &last)));
        });
    }
    group.finish();
}

fn bench_tour(c: &mut Criterion) {
    let mut group = c.benchmark_group("tour");
    let n = 200;
    let steps: Vec<Step> = (0..20)
        .map(|i| Step::new(format!("[data-step=\"{}\"]", i * 10), "", ""))
        .collect();

    group.bench_function("walk_20_steps_with_scrolling", |b| {
        b.iter_batched(
            || (gen_page(n), StepSequencer::with_defaults(steps.clone())),
            |(mut dom, mut tour)| {
                let mut events = tour.open(&mut dom);
                while tour.is_open() {
                    events.extend(dom.advance(Duration::from_millis(450), |dom, h| {
                        tour.handle(dom, h)
                    }));
                    events.extend(tour.next(&mut dom));
                }
                black_box(events.len());
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("scroll_burst_coalescing", |b| {
        b.iter_batched(
            || {
                let mut dom = gen_page(n);
                let mut tour = StepSequencer::with_defaults(steps[..1].to_vec());
                let _ = tour.open(&mut dom);
                let _ = dom.advance(Duration::from_millis(450), |dom, h| tour.handle(dom, h));
                (dom, tour)
            },
            |(mut dom, mut tour)| {
                for y in 0..100 {
                    dom.scroll_window_to(Point::new(0.0, f64::from(y) * 7.0));
                    let _ = dom.pump(|dom, h| tour.handle(dom, h));
                }
                let events = dom.advance(Duration::from_millis(16), |dom, h| tour.handle(dom, h));
                tour.unmount(&mut dom);
                black_box(events.len());
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_tour);
criterion_main!(benches);
