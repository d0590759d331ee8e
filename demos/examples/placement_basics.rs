// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement basics.
//!
//! Place a panel next to targets in each corner of a viewport and print the chosen
//! side and anchor point.
//!
//! Run:
//! - `cargo run -p understory_examples --example placement_basics`

use kurbo::{Rect, Size, Vec2};
use understory_anchor::Viewport;
use understory_anchor::config::PlacementConfig;
use understory_anchor::placement::place;

fn main() {
    let viewport = Viewport::new(Size::new(1024.0, 768.0), Vec2::ZERO);
    let cfg = PlacementConfig::default();

    let targets = [
        ("middle", Rect::from_origin_size((400.0, 300.0), (200.0, 40.0))),
        ("bottom edge", Rect::from_origin_size((400.0, 700.0), (200.0, 40.0))),
        ("right edge", Rect::from_origin_size((850.0, 300.0), (150.0, 40.0))),
        ("left edge", Rect::from_origin_size((20.0, 300.0), (150.0, 40.0))),
        ("bottom-right", Rect::from_origin_size((850.0, 700.0), (150.0, 40.0))),
    ];
    for (name, target) in targets {
        let p = place(target, viewport, &cfg);
        println!("{name:>12}: {:?} at ({}, {})", p.side, p.anchor.x, p.anchor.y);
    }

    // The same target, scrolled: placement works in document coordinates.
    let scrolled = Viewport::new(viewport.size, Vec2::new(0.0, 500.0));
    let target = Rect::from_origin_size((400.0, 1150.0), (200.0, 40.0));
    let p = place(target, scrolled, &cfg);
    println!("scrolled 500: {:?} at ({}, {})", p.side, p.anchor.x, p.anchor.y);
}
