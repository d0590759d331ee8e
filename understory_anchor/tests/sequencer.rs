// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Step sequencing over the headless host: transitions, teardown, and events.

mod common;

use common::{
    BUNDLE_LISTENERS, HIGHLIGHT, SETTLE, assert_quiet, count, page, pump, run, steps, tour,
    updates,
};
use kurbo::{Point, Rect, Size};
use understory_anchor::{PanelAnchor, Side, TourEvent, TourState};

#[test]
fn walks_every_step_then_completes_once() {
    let mut p = page();
    let mut t = tour(&["#intro", "#middle", "#footer"]);

    let mut all = t.open(&mut p.dom);
    assert_eq!(all[0], TourEvent::StepActivated { index: 0 });
    all.extend(run(&mut p.dom, &mut t, SETTLE));
    all.extend(t.next(&mut p.dom));
    assert_eq!(t.current_index(), Some(1));
    all.extend(run(&mut p.dom, &mut t, SETTLE));
    all.extend(t.next(&mut p.dom));
    assert_eq!(t.current_index(), Some(2));
    assert!(t.view().unwrap().is_last());

    let last = t.next(&mut p.dom);
    assert_eq!(last, vec![TourEvent::Completed, TourEvent::Closed]);
    all.extend(last);

    assert_eq!(count(&all, &TourEvent::Completed), 1);
    assert_eq!(count(&all, &TourEvent::Closed), 1);
    assert_eq!(t.state(), TourState::Closed);
    assert!(p.dom.elements_with_class(HIGHLIGHT).is_empty());
    assert_quiet(&p.dom);

    // Closed again: nothing more to say.
    assert!(t.close(&mut p.dom).is_empty());
    assert!(t.next(&mut p.dom).is_empty());
}

#[test]
fn previous_on_first_step_registers_nothing() {
    let mut p = page();
    let mut t = tour(&["#intro", "#middle"]);
    let _ = t.open(&mut p.dom);
    let added = p.dom.listeners_added();

    assert!(t.previous(&mut p.dom).is_empty());
    assert_eq!(t.current_index(), Some(0));
    assert_eq!(p.dom.listeners_added(), added);
    assert_eq!(p.dom.live_listeners(), BUNDLE_LISTENERS);
    assert!(p.dom.has_class(p.intro, HIGHLIGHT));

    let _ = t.close(&mut p.dom);
}

#[test]
fn highlight_follows_the_current_step_only() {
    let mut p = page();
    let mut t = tour(&["#intro", "#middle"]);
    let _ = t.open(&mut p.dom);
    assert_eq!(p.dom.elements_with_class(HIGHLIGHT), vec![p.intro]);
    assert_eq!(p.dom.live_listeners(), BUNDLE_LISTENERS);

    let _ = t.next(&mut p.dom);
    assert_eq!(p.dom.elements_with_class(HIGHLIGHT), vec![p.middle]);
    // The old bundle is gone before the new one arms.
    assert_eq!(p.dom.live_listeners(), BUNDLE_LISTENERS);

    let _ = t.previous(&mut p.dom);
    assert_eq!(p.dom.elements_with_class(HIGHLIGHT), vec![p.intro]);

    let _ = t.close(&mut p.dom);
    assert_quiet(&p.dom);
}

#[test]
fn activation_reports_highlight_and_panel() {
    let mut p = page();
    let mut t = tour(&["#intro"]);
    let events = t.open(&mut p.dom);
    let intro = Rect::from_origin_size((100.0, 100.0), (200.0, 40.0));
    assert_eq!(
        events,
        vec![
            TourEvent::StepActivated { index: 0 },
            TourEvent::TargetUpdated {
                index: 0,
                highlight: Some(intro),
                // 100 px of room on the left, plenty on the right.
                panel: PanelAnchor::Anchored(understory_anchor::Placement {
                    side: Side::Right,
                    anchor: Point::new(312.0, 120.0),
                }),
            },
        ]
    );
    let view = t.view().unwrap();
    assert!(view.is_first() && view.is_last());
    assert_eq!(view.step.title, "Step 1");
    let _ = t.close(&mut p.dom);
}

#[test]
fn smooth_scroll_lands_and_panel_follows() {
    let mut p = page();
    let mut t = tour(&["#middle"]);
    let events = t.open(&mut p.dom);
    // Before scrolling, the target is below the fold and the panel is pinned to the edge.
    let TourEvent::TargetUpdated { panel, .. } = events[1] else {
        panic!("expected TargetUpdated, got {:?}", events[1]);
    };
    assert_eq!(panel.placement().unwrap().side, Side::Top);

    let later = run(&mut p.dom, &mut t, SETTLE);
    assert!(updates(&later) >= 1, "landing the scroll should move the panel");
    assert_eq!(p.dom.window_scroll().y, 1136.0);
    let view = t.view().unwrap();
    assert_eq!(
        view.panel.placement().map(|pl| (pl.side, pl.anchor)),
        Some((Side::Bottom, Point::new(500.0, 1552.0)))
    );
    assert_eq!(
        view.highlight,
        Some(Rect::from_origin_size((400.0, 1500.0), (200.0, 40.0)))
    );
    let _ = t.close(&mut p.dom);
}

#[test]
fn resize_flips_the_panel() {
    let mut p = page();
    let mut t = tour(&["#middle"]);
    let _ = t.open(&mut p.dom);
    let _ = run(&mut p.dom, &mut t, SETTLE);

    p.dom.resize(Size::new(700.0, 768.0));
    assert!(pump(&mut p.dom, &mut t).is_empty(), "resize waits for a frame");
    assert_eq!(p.dom.pending_frames(), 1);
    let events = run(&mut p.dom, &mut t, understory_headless_dom::FRAME_INTERVAL);
    assert_eq!(updates(&events), 1);
    assert_eq!(
        t.view().unwrap().panel.placement().map(|pl| (pl.side, pl.anchor)),
        Some((Side::Left, Point::new(388.0, 1520.0)))
    );
    let _ = t.close(&mut p.dom);
}

#[test]
fn missing_target_centers_the_panel_and_registers_nothing() {
    let mut p = page();
    for locator in ["#missing", "main section", ""] {
        let mut t = tour(&[locator]);
        let events = t.open(&mut p.dom);
        assert_eq!(
            events,
            vec![
                TourEvent::StepActivated { index: 0 },
                TourEvent::TargetUpdated {
                    index: 0,
                    highlight: None,
                    panel: PanelAnchor::Centered,
                },
            ],
            "{locator:?}"
        );
        assert!(t.is_open());
        assert_quiet(&p.dom);
        assert!(run(&mut p.dom, &mut t, SETTLE).is_empty());
        let _ = t.close(&mut p.dom);
    }
}

#[test]
fn go_to_clamps_and_ignores_current() {
    let mut p = page();
    let mut t = tour(&["#intro", "#middle", "#footer"]);
    assert!(t.go_to(&mut p.dom, 1).is_empty(), "closed sequencer ignores go_to");

    let _ = t.open(&mut p.dom);
    let events = t.go_to(&mut p.dom, 99);
    assert_eq!(events[0], TourEvent::StepActivated { index: 2 });
    assert_eq!(t.current_index(), Some(2));
    assert!(t.go_to(&mut p.dom, 7).is_empty());
    assert_eq!(p.dom.elements_with_class(HIGHLIGHT), vec![p.footer]);

    let _ = t.go_to(&mut p.dom, 0);
    assert_eq!(p.dom.elements_with_class(HIGHLIGHT), vec![p.intro]);
    let _ = t.close(&mut p.dom);
    assert_quiet(&p.dom);
}

#[test]
fn reopen_restarts_without_closing() {
    let mut p = page();
    let mut t = tour(&["#intro", "#middle", "#footer"]);
    let _ = t.open(&mut p.dom);
    let _ = t.go_to(&mut p.dom, 2);

    let events = t.open(&mut p.dom);
    assert_eq!(events[0], TourEvent::StepActivated { index: 0 });
    assert_eq!(count(&events, &TourEvent::Closed), 0);
    assert_eq!(p.dom.live_listeners(), BUNDLE_LISTENERS);
    assert_eq!(p.dom.elements_with_class(HIGHLIGHT), vec![p.intro]);
    let _ = t.close(&mut p.dom);
}

#[test]
fn empty_sequence_stays_closed() {
    let mut p = page();
    let mut t = tour(&[]);
    assert!(t.open(&mut p.dom).is_empty());
    assert_eq!(t.state(), TourState::Closed);
    assert!(t.view().is_none());
    assert_quiet(&p.dom);
}

#[test]
fn set_open_follows_the_flag() {
    let mut p = page();
    let mut t = tour(&["#intro", "#middle"]);
    assert!(t.set_open(&mut p.dom, false).is_empty());

    let events = t.set_open(&mut p.dom, true);
    assert_eq!(events[0], TourEvent::StepActivated { index: 0 });
    let _ = t.next(&mut p.dom);
    // Already open: the flag does not restart the sequence.
    assert!(t.set_open(&mut p.dom, true).is_empty());
    assert_eq!(t.current_index(), Some(1));

    assert_eq!(t.set_open(&mut p.dom, false), vec![TourEvent::Closed]);
    assert_quiet(&p.dom);
}

#[test]
fn set_steps_restarts_or_closes() {
    let mut p = page();
    let mut t = tour(&["#intro", "#middle"]);
    assert!(t.set_steps(&mut p.dom, steps(&["#footer"])).is_empty());
    assert_eq!(t.steps().len(), 1);

    let _ = t.open(&mut p.dom);
    assert_eq!(p.dom.elements_with_class(HIGHLIGHT), vec![p.footer]);

    let events = t.set_steps(&mut p.dom, steps(&["#intro", "#middle"]));
    assert_eq!(events[0], TourEvent::StepActivated { index: 0 });
    assert_eq!(p.dom.elements_with_class(HIGHLIGHT), vec![p.intro]);

    assert_eq!(t.set_steps(&mut p.dom, Vec::new()), vec![TourEvent::Closed]);
    assert_quiet(&p.dom);
    assert!(p.dom.elements_with_class(HIGHLIGHT).is_empty());
}

#[test]
fn unmount_releases_everything_silently() {
    let mut p = page();
    let mut t = tour(&["#row"]);
    let _ = t.open(&mut p.dom);
    // Mid-flight: settle timer, poll interval, and smooth scroll all pending.
    let _ = run(&mut p.dom, &mut t, std::time::Duration::from_millis(50));
    p.dom.scroll_element_to(p.list, kurbo::Vec2::new(0.0, 10.0));
    let _ = pump(&mut p.dom, &mut t);
    assert_eq!(p.dom.pending_frames(), 1);

    t.unmount(&mut p.dom);
    assert_eq!(t.state(), TourState::Closed);
    assert_quiet(&p.dom);
    assert!(!p.dom.has_class(p.row, HIGHLIGHT));
    assert!(run(&mut p.dom, &mut t, SETTLE).is_empty());
}

#[test]
fn dropping_without_unmount_leaves_the_host_untouched() {
    let mut p = page();
    {
        let mut t = tour(&["#intro"]);
        let _ = t.open(&mut p.dom);
    }
    // Drop has no host access; only an explicit unmount reverts the marker.
    assert!(p.dom.has_class(p.intro, HIGHLIGHT));
    assert_eq!(p.dom.live_listeners(), BUNDLE_LISTENERS);

    let mut t = tour(&["#intro"]);
    let _ = t.open(&mut p.dom);
    t.unmount(&mut p.dom);
    drop(t);
    assert!(!p.dom.has_class(p.intro, HIGHLIGHT));
    assert_eq!(p.dom.live_listeners(), BUNDLE_LISTENERS, "only the leaked bundle remains");
}

#[test]
fn stale_callbacks_after_transition_are_ignored() {
    let mut p = page();
    let mut t = tour(&["#row", "#intro"]);
    let _ = t.open(&mut p.dom);
    p.dom.scroll_element_to(p.list, kurbo::Vec2::new(0.0, 20.0));
    // Queued for the first step's listeners, delivered after the transition.
    assert!(p.dom.queued() > 0);
    let _ = t.next(&mut p.dom);
    assert!(pump(&mut p.dom, &mut t).is_empty());
    assert_eq!(p.dom.pending_frames(), 0);
    let _ = t.close(&mut p.dom);
    assert_quiet(&p.dom);
}

#[test]
fn invalid_config_is_rejected() {
    let config = understory_anchor::EngineConfig {
        poll_interval: std::time::Duration::ZERO,
        ..understory_anchor::EngineConfig::default()
    };
    let err = understory_anchor::StepSequencer::<understory_headless_dom::HeadlessDom>::new(
        steps(&["#intro"]),
        config,
    )
    .unwrap_err();
    assert_eq!(err, understory_anchor::ConfigError::ZeroPollInterval);
}
