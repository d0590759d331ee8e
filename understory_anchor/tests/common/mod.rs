// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared page fixture for the integration tests.

#![allow(dead_code, reason = "Not every test file uses every helper.")]

use std::time::Duration;

use kurbo::{Rect, Size};
use understory_anchor::host::Overflow;
use understory_anchor::{Step, StepSequencer, TourEvent};
use understory_headless_dom::{ElementId, ElementSpec, HeadlessDom};

pub const HIGHLIGHT: &str = "tour-highlighted";

/// Listeners one bundle registers on [`page`]: four scroll sources, one container, one resize.
pub const BUNDLE_LISTENERS: usize = 6;

/// Settle delay plus slack, long enough for every activation side effect to land.
pub const SETTLE: Duration = Duration::from_millis(500);

pub struct Page {
    pub dom: HeadlessDom,
    pub main: ElementId,
    pub intro: ElementId,
    pub middle: ElementId,
    pub footer: ElementId,
    pub list: ElementId,
    pub row: ElementId,
}

/// A 1024×768 viewport over a 3000 px tall page with one scrollable list.
pub fn page() -> Page {
    let mut dom = HeadlessDom::new(Size::new(1024.0, 768.0));
    let main = dom.insert(
        None,
        ElementSpec::new("main").bounds(Rect::new(0.0, 0.0, 1024.0, 3000.0)),
    );
    let intro = dom.insert(Some(main), target("intro", 100.0, 100.0));
    let middle = dom.insert(Some(main), target("middle", 400.0, 1500.0));
    let footer = dom.insert(Some(main), target("footer", 100.0, 2900.0));
    let list = dom.insert(
        Some(main),
        ElementSpec::new("ul")
            .id("list")
            .bounds(Rect::from_origin_size((600.0, 200.0), (300.0, 300.0)))
            .scrollable(Overflow::Auto, Size::new(300.0, 1200.0)),
    );
    let row = dom.insert(
        Some(list),
        ElementSpec::new("li")
            .id("row")
            .bounds(Rect::from_origin_size((0.0, 900.0), (300.0, 30.0))),
    );
    Page {
        dom,
        main,
        intro,
        middle,
        footer,
        list,
        row,
    }
}

fn target(id: &str, x: f64, y: f64) -> ElementSpec {
    ElementSpec::new("section")
        .id(id)
        .attr("data-tour", id)
        .bounds(Rect::from_origin_size((x, y), (200.0, 40.0)))
}

pub fn steps(locators: &[&str]) -> Vec<Step> {
    locators
        .iter()
        .enumerate()
        .map(|(i, l)| Step::new(*l, format!("Step {}", i + 1), format!("About {l}")))
        .collect()
}

pub fn tour(locators: &[&str]) -> StepSequencer<HeadlessDom> {
    StepSequencer::with_defaults(steps(locators))
}

/// Run the clock forward, feeding every callback to `tour`.
pub fn run(
    dom: &mut HeadlessDom,
    tour: &mut StepSequencer<HeadlessDom>,
    dt: Duration,
) -> Vec<TourEvent> {
    dom.advance(dt, |dom, h| tour.handle(dom, h))
}

/// Deliver queued listener callbacks without moving the clock.
pub fn pump(dom: &mut HeadlessDom, tour: &mut StepSequencer<HeadlessDom>) -> Vec<TourEvent> {
    dom.pump(|dom, h| tour.handle(dom, h))
}

pub fn count(events: &[TourEvent], wanted: &TourEvent) -> usize {
    events.iter().filter(|e| *e == wanted).count()
}

pub fn updates(events: &[TourEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, TourEvent::TargetUpdated { .. }))
        .count()
}

/// Nothing registered with the host.
pub fn assert_quiet(dom: &HeadlessDom) {
    assert_eq!(dom.live_listeners(), 0, "listeners leaked");
    assert_eq!(dom.pending_timers(), 0, "timers leaked");
    assert_eq!(dom.pending_frames(), 0, "frames leaked");
}
