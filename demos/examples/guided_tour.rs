// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Guided tour over the headless host.
//!
//! Walk a three-step tour across a tall page, let the engine scroll each target into
//! view, and print what a shell would render. Set `RUST_LOG=understory_anchor=debug`
//! (or `trace`) to watch the synchronization loop.
//!
//! Run:
//! - `cargo run -p understory_examples --example guided_tour`

use std::time::Duration;

use kurbo::{Point, Rect, Size};
use tracing_subscriber::EnvFilter;
use understory_anchor::host::Overflow;
use understory_anchor::{PanelAnchor, Step, StepSequencer, TourEvent};
use understory_headless_dom::{ElementSpec, HeadlessDom};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut dom = HeadlessDom::new(Size::new(1024.0, 768.0));
    let main = dom.insert(
        None,
        ElementSpec::new("main").bounds(Rect::new(0.0, 0.0, 1024.0, 2400.0)),
    );
    let _ = dom.insert(
        Some(main),
        ElementSpec::new("button")
            .id("new-doc")
            .bounds(Rect::from_origin_size((24.0, 24.0), (120.0, 32.0))),
    );
    let sidebar = dom.insert(
        Some(main),
        ElementSpec::new("nav")
            .bounds(Rect::from_origin_size((760.0, 100.0), (240.0, 400.0)))
            .scrollable(Overflow::Auto, Size::new(240.0, 1600.0)),
    );
    let _ = dom.insert(
        Some(sidebar),
        ElementSpec::new("a")
            .attr("data-tour", "settings")
            .bounds(Rect::from_origin_size((0.0, 1400.0), (240.0, 32.0))),
    );
    let _ = dom.insert(
        Some(main),
        ElementSpec::new("footer")
            .class("status")
            .bounds(Rect::from_origin_size((0.0, 2300.0), (1024.0, 60.0))),
    );

    let mut tour = StepSequencer::with_defaults(vec![
        Step::new("#new-doc", "New document", "Start here."),
        Step::new("[data-tour=settings]", "Settings", "Tucked away in the sidebar."),
        Step::new("footer.status", "Status bar", "Sync state lives down here."),
    ]);

    print_events(tour.open(&mut dom));
    loop {
        print_events(dom.advance(Duration::from_millis(500), |dom, h| tour.handle(dom, h)));
        if let Some(view) = tour.view() {
            println!(
                "  [{}/{}] {}: {} (window scroll y = {})",
                view.index + 1,
                view.len,
                view.step.title,
                view.step.content,
                dom.window_scroll().y,
            );
        }
        let events = tour.next(&mut dom);
        let done = events.contains(&TourEvent::Closed);
        print_events(events);
        if done {
            break;
        }
    }

    // Scrolling after close reaches nobody.
    dom.scroll_window_to(Point::new(0.0, 0.0));
    let late: Vec<TourEvent> = dom.pump(|dom, h| tour.handle(dom, h));
    tracing::info!(
        events = late.len(),
        listeners = dom.live_listeners(),
        timers = dom.pending_timers(),
        "after close"
    );
}

fn print_events(events: Vec<TourEvent>) {
    for event in events {
        match event {
            TourEvent::StepActivated { index } => println!("step {index} activated"),
            TourEvent::TargetUpdated {
                index,
                highlight,
                panel,
            } => {
                let panel = match panel {
                    PanelAnchor::Anchored(p) => {
                        format!("{:?} at ({:.0}, {:.0})", p.side, p.anchor.x, p.anchor.y)
                    }
                    PanelAnchor::Centered => "centered".to_string(),
                };
                println!("step {index}: highlight {highlight:?}, panel {panel}");
            }
            TourEvent::Completed => println!("tour completed"),
            TourEvent::Closed => println!("tour closed"),
        }
    }
}
