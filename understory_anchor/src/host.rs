// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host seams: the live document and the event/timer scheduler.
//!
//! ## Overview
//!
//! The engine never talks to a browser directly. A toolkit implements [`Document`]
//! for element lookup, measurement, and class toggling, and [`Scheduler`] for event
//! listeners, timers, and animation frames. When the host later fires one of those
//! registrations it hands the returned [`Scheduler::Handle`] back to the engine
//! (see [`SyncLoop::handle`](crate::sync::SyncLoop::handle)).
//!
//! ## Contract
//!
//! - [`Document::query_first`] returns the first match in document order. A locator
//!   the host cannot parse is "no match", never an error.
//! - Removing a listener, clearing a timer, or canceling a frame with a handle that
//!   is unknown or already released must be a no-op.
//! - Handles must be unique across listeners, timers, and frames for as long as they
//!   are live.

use alloc::vec::Vec;
use core::time::Duration;
use kurbo::{Rect, Size};

use crate::types::Viewport;

/// How [`Document::scroll_into_view`] should move the page.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ScrollBehavior {
    /// Animate; positions are not final until the animation settles.
    #[default]
    Smooth,
    /// Jump immediately.
    Instant,
}

/// Where an event listener is attached.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EventSource<E> {
    /// The window object.
    Window,
    /// The document object.
    Document,
    /// The root element (`<html>`).
    DocumentElement,
    /// The body element.
    Body,
    /// Any other element, typically a scroll container.
    Element(E),
}

/// Event types the engine listens to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EventKind {
    /// Scrolling of the source or, for capturing listeners, of anything below it.
    Scroll,
    /// Viewport resize.
    Resize,
}

/// Computed overflow style on one axis.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Overflow {
    /// Content spills out; the element does not scroll.
    #[default]
    Visible,
    /// Content is clipped without scrolling.
    Hidden,
    /// Scrolls when content overflows.
    Auto,
    /// Always scrollable.
    Scroll,
}

impl Overflow {
    /// Returns true if this style lets the user scroll the axis.
    pub fn scrolls(self) -> bool {
        matches!(self, Self::Auto | Self::Scroll)
    }
}

/// Scroll container heuristic.
///
/// An element is a scroll container when at least one axis both allows scrolling
/// and has content larger than its client box.
pub fn is_scroll_container(
    overflow_x: Overflow,
    overflow_y: Overflow,
    client: Size,
    content: Size,
) -> bool {
    (overflow_x.scrolls() && content.width > client.width)
        || (overflow_y.scrolls() && content.height > client.height)
}

/// Read and mutate the live document.
pub trait Document {
    /// Element handle. Must stay cheap to copy and comparable across calls.
    type Element: Copy + Eq + core::fmt::Debug;

    /// Returns the first element matching `locator` in document order.
    fn query_first(&self, locator: &str) -> Option<Self::Element>;

    /// Returns true while `element` is connected to the document.
    fn is_attached(&self, element: Self::Element) -> bool;

    /// Bounding box of `element` relative to the viewport (scroll offset excluded).
    fn client_rect(&self, element: Self::Element) -> Rect;

    /// Current viewport size and window scroll offset.
    fn viewport(&self) -> Viewport;

    /// Scroll the page (and any containers) so that `element` becomes visible.
    fn scroll_into_view(&mut self, element: Self::Element, behavior: ScrollBehavior);

    /// Elements that currently pass [`is_scroll_container`].
    fn scroll_containers(&self) -> Vec<Self::Element>;

    /// Add `class` to `element`. Adding a class twice is allowed.
    fn add_class(&mut self, element: Self::Element, class: &str);

    /// Remove `class` from `element`. Removing an absent class is a no-op.
    fn remove_class(&mut self, element: Self::Element, class: &str);
}

/// Register listeners, timers, and animation frames with the host event loop.
pub trait Scheduler: Document {
    /// Opaque identifier for a registration, echoed back when it fires.
    type Handle: Copy + Eq + core::fmt::Debug;

    /// Attach a listener for `kind` on `source`.
    fn add_listener(
        &mut self,
        source: EventSource<Self::Element>,
        kind: EventKind,
        capture: bool,
    ) -> Self::Handle;

    /// Detach a listener.
    fn remove_listener(&mut self, handle: Self::Handle);

    /// Fire once after `delay`.
    fn set_timeout(&mut self, delay: Duration) -> Self::Handle;

    /// Fire every `period` until cleared.
    fn set_interval(&mut self, period: Duration) -> Self::Handle;

    /// Cancel a timeout or interval.
    fn clear_timer(&mut self, handle: Self::Handle);

    /// Fire once before the next paint.
    fn request_frame(&mut self) -> Self::Handle;

    /// Cancel a pending frame callback.
    fn cancel_frame(&mut self, handle: Self::Handle);
}
