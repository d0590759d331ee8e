// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_anchor --heading-base-level=0

//! Understory Anchor: a headless engine for overlays anchored to page elements.
//!
//! Tooltips, popovers, and guided-tour steps all need the same machinery: find the
//! element a panel refers to, decide which side of it the panel goes on, and keep
//! the panel and a highlight rectangle in sync while the page scrolls, resizes, or
//! moves the element. This crate implements that machinery without a DOM; the host
//! toolkit supplies one through the [`host::Document`] and [`host::Scheduler`] traits.
//!
//! ## Layers
//!
//! - [`resolve`]: locator → element → document-space [`kurbo::Rect`], or
//!   [`Resolution::NotFound`](types::Resolution::NotFound).
//! - [`placement`]: a pure, greedy choice of [`Side`](types::Side) and anchor point.
//! - [`sync`]: [`SyncLoop`](sync::SyncLoop) owns every listener, timer, and frame
//!   request for one target as a single [`SubscriptionBundle`](sync::SubscriptionBundle),
//!   coalesces scroll/resize bursts into one measurement per frame, and polls as a
//!   fallback until the target disappears.
//! - [`highlight`]: the emphasis rectangle plus the marker class on the target,
//!   recorded as an [`OwnedMark`](highlight::OwnedMark) that is reverted exactly once.
//! - [`sequencer`]: [`StepSequencer`](sequencer::StepSequencer) walks an ordered list of
//!   steps, tearing down one bundle before starting the next.
//!
//! ## Driving the engine
//!
//! Operations return values rather than calling back into the host. The host forwards
//! fired registrations to [`StepSequencer::handle`](sequencer::StepSequencer::handle)
//! and renders from the returned [`TourEvent`](sequencer::TourEvent)s or from
//! [`StepSequencer::view`](sequencer::StepSequencer::view).
//!
//! ```
//! use kurbo::{Rect, Size, Vec2};
//! use understory_anchor::config::PlacementConfig;
//! use understory_anchor::placement::place;
//! use understory_anchor::types::{Side, Viewport};
//!
//! // A target near the bottom of a 1024×768 viewport flips the panel above it.
//! let viewport = Viewport::new(Size::new(1024.0, 768.0), Vec2::ZERO);
//! let target = Rect::from_origin_size((100.0, 700.0), (200.0, 40.0));
//! let placement = place(target, viewport, &PlacementConfig::default());
//! assert_eq!(placement.side, Side::Top);
//! assert_eq!(placement.anchor.y, 688.0);
//! ```
//!
//! See `understory_headless_dom` for an in-memory host used by the tests and demos.
//!
//! ## Non-goals
//!
//! No collision handling between several overlays, no constraint solving, and no
//! state that outlives the sequencer.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod config;
pub mod highlight;
pub mod host;
pub mod placement;
pub mod resolve;
pub mod sequencer;
pub mod sync;
pub mod types;

pub use config::{ConfigError, EngineConfig, PlacementConfig};
pub use sequencer::{StepSequencer, TourEvent, TourState, TourView};
pub use types::{Measurement, PanelAnchor, Placement, Resolution, Side, Step, Trigger, Viewport};
