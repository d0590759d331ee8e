// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Size, Vec2};
use understory_anchor::Viewport;
use understory_anchor::config::PlacementConfig;
use understory_anchor::placement::place;

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// Targets scattered over a tall page, each paired with a random scroll offset.
fn gen_cases(count: usize) -> Vec<(Rect, Viewport)> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    let size = Size::new(1280.0, 800.0);
    (0..count)
        .map(|_| {
            let target = Rect::from_origin_size(
                (rng.next_f64() * 1200.0, rng.next_f64() * 6000.0),
                (20.0 + rng.next_f64() * 300.0, 10.0 + rng.next_f64() * 120.0),
            );
            let scroll = Vec2::new(0.0, rng.next_f64() * 5200.0);
            (target, Viewport::new(size, scroll))
        })
        .collect()
}

fn bench_place(c: &mut Criterion) {
    let mut group = c.benchmark_group("place");
    let cfg = PlacementConfig::default();
    for &n in &[64usize, 1024] {
        let cases = gen_cases(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("random_n{}", n), |b| {
            b.iter(|| {
                for (target, viewport) in &cases {
                    black_box(place(*target, *viewport, &cfg));
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_place);
criterion_main!(benches);
