// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_headless_dom --heading-base-level=0

//! Understory Headless DOM: an in-memory document and event loop for anchored overlays.
//!
//! [`HeadlessDom`] implements [`Document`] and [`Scheduler`] from `understory_anchor`
//! so the engine can run deterministically without a browser: in tests, benchmarks,
//! replay tools, or toolkits whose scene is not a DOM.
//!
//! - Elements form a tree with generational [`ElementId`]s. Elements can be detached
//!   (still alive, no longer in the document), re-attached, or removed.
//! - Positions are boxes relative to the parent's content origin; scroll containers
//!   shift their descendants.
//! - Locators use a small [`Selector`] language. Unparseable locators match nothing.
//! - Time only moves through [`HeadlessDom::advance`]. Timers, intervals, animation
//!   frames ([`FRAME_INTERVAL`]), and smooth scrolling all run on that clock.
//! - Scroll and resize simulation queues listener callbacks; [`HeadlessDom::pump`]
//!   delivers them.
//!
//! ## Example
//!
//! ```
//! use kurbo::{Rect, Size};
//! use understory_anchor::{StepSequencer, Step, TourEvent};
//! use understory_headless_dom::{ElementSpec, HeadlessDom};
//!
//! let mut dom = HeadlessDom::new(Size::new(1024.0, 768.0));
//! let save = dom.insert(
//!     None,
//!     ElementSpec::new("button")
//!         .id("save")
//!         .bounds(Rect::from_origin_size((100.0, 100.0), (80.0, 30.0))),
//! );
//!
//! let mut tour = StepSequencer::with_defaults(vec![Step::new("#save", "Save", "Saves your work.")]);
//! let events = tour.open(&mut dom);
//! assert_eq!(events[0], TourEvent::StepActivated { index: 0 });
//! assert!(dom.has_class(save, "tour-highlighted"));
//!
//! // Let the settle timer and a few poll ticks run.
//! let _ = dom.advance(std::time::Duration::from_millis(500), |dom, h| tour.handle(dom, h));
//!
//! let _ = tour.close(&mut dom);
//! assert!(!dom.has_class(save, "tour-highlighted"));
//! assert_eq!(dom.live_listeners(), 0);
//! ```

mod clock;
mod element;
mod selector;

pub use clock::{FRAME_INTERVAL, HostHandle};
pub use element::{ElementId, ElementSpec};
pub use selector::{Selector, SelectorError};

use std::time::Duration;

use kurbo::{Point, Rect, Size, Vec2};
use understory_anchor::host::{
    Document, EventKind, EventSource, ScrollBehavior, Scheduler, is_scroll_container,
};
use understory_anchor::types::Viewport;

use crate::clock::{Clock, TimerKind};
use crate::element::ElementData;

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    data: ElementData,
}

#[derive(Copy, Clone, Debug)]
struct SmoothScroll {
    to: Vec2,
    done_at: Duration,
}

/// In-memory document plus manual-clock scheduler. See the [crate docs](crate).
pub struct HeadlessDom {
    nodes: Vec<Option<Node>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    roots: Vec<ElementId>,
    viewport: Size,
    scroll: Vec2,
    smooth_scroll_duration: Duration,
    smooth_scroll: Option<SmoothScroll>,
    clock: Clock,
}

impl core::fmt::Debug for HeadlessDom {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("HeadlessDom")
            .field("elements_alive", &alive)
            .field("roots", &self.roots.len())
            .field("viewport", &self.viewport)
            .field("scroll", &self.scroll)
            .field("now", &self.clock.now())
            .field("listeners", &self.clock.live_listeners())
            .finish_non_exhaustive()
    }
}

impl HeadlessDom {
    /// Create an empty document with a viewport of `viewport`.
    pub fn new(viewport: Size) -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            roots: Vec::new(),
            viewport,
            scroll: Vec2::ZERO,
            smooth_scroll_duration: Duration::from_millis(300),
            smooth_scroll: None,
            clock: Clock::default(),
        }
    }

    /// How long a smooth `scroll_into_view` takes before the page reaches its target.
    pub fn with_smooth_scroll_duration(mut self, duration: Duration) -> Self {
        self.smooth_scroll_duration = duration;
        self
    }

    // --- tree ---

    /// Insert an element as the last child of `parent`, or as a new top-level
    /// element under the body if `None`. A stale `parent` also inserts at top level.
    pub fn insert(&mut self, parent: Option<ElementId>, spec: ElementSpec) -> ElementId {
        let node = Node {
            generation: 0,
            parent: None,
            children: Vec::new(),
            data: spec.into_data(),
        };
        let idx = if let Some(idx) = self.free_list.pop() {
            self.generations[idx] = self.generations[idx].saturating_add(1);
            idx
        } else {
            self.nodes.push(None);
            self.generations.push(1);
            self.nodes.len() - 1
        };
        let generation = self.generations[idx];
        self.nodes[idx] = Some(Node { generation, ..node });
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ElementId stores 32-bit slot indices."
        )]
        let id = ElementId::new(idx as u32, generation);
        self.link(id, parent);
        id
    }

    /// Take `id` (and its subtree) out of the document, keeping it alive.
    pub fn detach(&mut self, id: ElementId) {
        if !self.is_alive(id) {
            return;
        }
        self.unlink(id);
    }

    /// Re-insert a detached element as the last child of `parent` (or top level).
    ///
    /// Moving an element under itself or one of its descendants is refused.
    pub fn append(&mut self, parent: Option<ElementId>, id: ElementId) {
        if !self.is_alive(id) || parent.is_some_and(|p| !self.is_alive(p)) {
            return;
        }
        if let Some(p) = parent
            && (p == id || self.ancestors(p).contains(&id))
        {
            tracing::debug!(?id, parent = ?p, "append refused: would create a cycle");
            return;
        }
        self.unlink(id);
        self.link(id, parent);
    }

    /// Destroy `id` and its subtree. Existing ids for them become stale.
    pub fn remove(&mut self, id: ElementId) {
        if !self.is_alive(id) {
            return;
        }
        self.unlink(id);
        let children = self.node(id).map(|n| n.children.clone()).unwrap_or_default();
        for child in children {
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Move or resize an element. No events fire, as with a layout change.
    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect) {
        if let Some(n) = self.node_mut(id) {
            n.data.bounds = bounds;
        }
    }

    /// Returns true if `id` refers to a live (possibly detached) element.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.node(id).is_some()
    }

    /// Returns true if `id` currently carries `class`.
    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.node(id)
            .is_some_and(|n| n.data.classes.iter().any(|c| c == class))
    }

    /// Elements carrying `class`, in slot order.
    pub fn elements_with_class(&self, class: &str) -> Vec<ElementId> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| {
                let n = n.as_ref()?;
                let idx = u32::try_from(i).ok()?;
                n.data
                    .classes
                    .iter()
                    .any(|c| c == class)
                    .then(|| ElementId::new(idx, n.generation))
            })
            .collect()
    }

    /// Border box of `id` in document coordinates.
    pub fn document_rect(&self, id: ElementId) -> Option<Rect> {
        let node = self.node(id)?;
        let mut rect = node.data.bounds;
        let mut parent = node.parent;
        while let Some(p) = parent {
            let pn = self.node(p)?;
            rect = rect + (pn.data.bounds.origin().to_vec2() - pn.data.scroll);
            parent = pn.parent;
        }
        Some(rect)
    }

    fn node(&self, id: ElementId) -> Option<&Node> {
        self.nodes
            .get(id.idx())?
            .as_ref()
            .filter(|n| n.generation == id.1)
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.idx())?
            .as_mut()
            .filter(|n| n.generation == id.1)
    }

    fn link(&mut self, id: ElementId, parent: Option<ElementId>) {
        let parent = parent.filter(|p| {
            let alive = self.is_alive(*p);
            if !alive {
                tracing::debug!(?id, parent = ?p, "stale parent; linking at top level");
            }
            alive
        });
        match parent {
            Some(p) => {
                if let Some(pn) = self.node_mut(p) {
                    pn.children.push(id);
                }
                if let Some(n) = self.node_mut(id) {
                    n.parent = Some(p);
                }
            }
            None => self.roots.push(id),
        }
    }

    fn unlink(&mut self, id: ElementId) {
        let parent = self.node_mut(id).and_then(|n| n.parent.take());
        match parent {
            Some(p) => {
                if let Some(pn) = self.node_mut(p) {
                    pn.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
    }

    fn ancestors(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut cur = self.node(id).and_then(|n| n.parent);
        while let Some(p) = cur {
            out.push(p);
            cur = self.node(p).and_then(|n| n.parent);
        }
        out
    }

    /// Attached elements in document order (pre-order, roots first to last).
    fn document_order(&self) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(n) = self.node(id) else {
                continue;
            };
            out.push(id);
            stack.extend(n.children.iter().rev().copied());
        }
        out
    }

    fn is_container(&self, id: ElementId) -> bool {
        self.node(id).is_some_and(|n| {
            let d = &n.data;
            is_scroll_container(
                d.overflow_x,
                d.overflow_y,
                d.bounds.size(),
                d.content_size.unwrap_or(d.bounds.size()),
            )
        })
    }

    fn document_size(&self) -> Size {
        let extent = self
            .roots
            .iter()
            .filter_map(|r| self.document_rect(*r))
            .fold(Point::ZERO, |acc, r| Point::new(acc.x.max(r.x1), acc.y.max(r.y1)));
        Size::new(
            extent.x.max(self.viewport.width),
            extent.y.max(self.viewport.height),
        )
    }

    fn clamp_window_scroll(&self, to: Vec2) -> Vec2 {
        let doc = self.document_size();
        Vec2::new(
            to.x.clamp(0.0, doc.width - self.viewport.width),
            to.y.clamp(0.0, doc.height - self.viewport.height),
        )
    }

    // --- simulation ---

    /// Current window scroll offset.
    pub fn window_scroll(&self) -> Vec2 {
        self.scroll
    }

    /// Scroll offset of a container element.
    pub fn element_scroll(&self, id: ElementId) -> Option<Vec2> {
        self.node(id).map(|n| n.data.scroll)
    }

    /// Scroll the window, queueing scroll listeners if the offset changed.
    ///
    /// Cancels any smooth scroll in progress.
    pub fn scroll_window_to(&mut self, to: Point) {
        self.smooth_scroll = None;
        self.set_window_scroll(to.to_vec2());
    }

    fn set_window_scroll(&mut self, to: Vec2) {
        let to = self.clamp_window_scroll(to);
        if to == self.scroll {
            return;
        }
        self.scroll = to;
        self.clock.fire_listeners(|l| {
            l.kind == EventKind::Scroll
                && matches!(l.source, EventSource::Window | EventSource::Document)
        });
    }

    /// Scroll a container, queueing its listeners and capturing ancestors'.
    pub fn scroll_element_to(&mut self, id: ElementId, offset: Vec2) {
        let Some(n) = self.node(id) else {
            return;
        };
        let max = n.data.max_scroll();
        let to = Vec2::new(offset.x.clamp(0.0, max.x), offset.y.clamp(0.0, max.y));
        if to == n.data.scroll {
            return;
        }
        if let Some(n) = self.node_mut(id) {
            n.data.scroll = to;
        }
        if !self.is_attached(id) {
            return;
        }
        let ancestors = self.ancestors(id);
        self.clock.fire_listeners(|l| {
            if l.kind != EventKind::Scroll {
                return false;
            }
            match l.source {
                EventSource::Element(e) if e == id => true,
                EventSource::Element(e) => l.capture && ancestors.contains(&e),
                EventSource::Window
                | EventSource::Document
                | EventSource::DocumentElement
                | EventSource::Body => l.capture,
            }
        });
    }

    /// Resize the viewport, queueing window resize listeners.
    pub fn resize(&mut self, viewport: Size) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.clock.fire_listeners(|l| {
            l.kind == EventKind::Resize && l.source == EventSource::Window
        });
        let clamped = self.clamp_window_scroll(self.scroll);
        self.set_window_scroll(clamped);
    }

    /// Deliver every queued callback (and any they cause) to `deliver`.
    pub fn pump<T, I>(&mut self, mut deliver: impl FnMut(&mut Self, HostHandle) -> I) -> Vec<T>
    where
        I: IntoIterator<Item = T>,
    {
        let mut out = Vec::new();
        while let Some(h) = self.clock.pop_fired() {
            out.extend(deliver(self, h));
        }
        out
    }

    /// Move the clock forward by `dt`, delivering timers, frames, smooth-scroll
    /// completion, and queued callbacks in time order.
    pub fn advance<T, I>(
        &mut self,
        dt: Duration,
        mut deliver: impl FnMut(&mut Self, HostHandle) -> I,
    ) -> Vec<T>
    where
        I: IntoIterator<Item = T>,
    {
        let end = self.clock.now() + dt;
        let mut out = self.pump(&mut deliver);
        loop {
            let scroll_due = self.smooth_scroll.map(|s| s.done_at).filter(|at| *at <= end);
            let timer_due = self.clock.next_due(end);
            let next = match (scroll_due, timer_due) {
                (Some(a), Some(b)) => a.min(b),
                (Some(a), None) | (None, Some(a)) => a,
                (None, None) => break,
            };
            self.clock.set_now(next.max(self.clock.now()));
            if scroll_due == Some(next) {
                if let Some(s) = self.smooth_scroll.take() {
                    tracing::trace!(to = ?s.to, "smooth scroll finished");
                    self.set_window_scroll(s.to);
                }
            } else if let Some(h) = self.clock.pop_due(next) {
                out.extend(deliver(self, h));
            }
            out.extend(self.pump(&mut deliver));
        }
        self.clock.set_now(end);
        out
    }

    // --- introspection ---

    /// Time elapsed on the manual clock.
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Listeners currently registered.
    pub fn live_listeners(&self) -> usize {
        self.clock.live_listeners()
    }

    /// Listeners ever registered.
    pub fn listeners_added(&self) -> usize {
        self.clock.listeners_added()
    }

    /// Pending timeouts and intervals.
    pub fn pending_timers(&self) -> usize {
        self.clock.count_timers(false)
    }

    /// Pending animation-frame callbacks.
    pub fn pending_frames(&self) -> usize {
        self.clock.count_timers(true)
    }

    /// Callbacks queued but not yet delivered.
    pub fn queued(&self) -> usize {
        self.clock.fired_len()
    }

    /// Returns true if `handle` is a live listener.
    pub fn is_listening(&self, handle: HostHandle) -> bool {
        self.clock.is_listening(handle)
    }
}

impl Document for HeadlessDom {
    type Element = ElementId;

    fn query_first(&self, locator: &str) -> Option<ElementId> {
        let selector = match Selector::parse(locator) {
            Ok(s) => s,
            Err(err) => {
                tracing::debug!(locator, %err, "locator rejected");
                return None;
            }
        };
        self.document_order()
            .into_iter()
            .find(|id| self.node(*id).is_some_and(|n| selector.matches(&n.data)))
    }

    fn is_attached(&self, element: ElementId) -> bool {
        if !self.is_alive(element) {
            return false;
        }
        let top = self.ancestors(element).last().copied().unwrap_or(element);
        self.roots.contains(&top)
    }

    fn client_rect(&self, element: ElementId) -> Rect {
        self.document_rect(element)
            .map(|r| r - self.scroll)
            .unwrap_or(Rect::ZERO)
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport, self.scroll)
    }

    fn scroll_into_view(&mut self, element: ElementId, behavior: ScrollBehavior) {
        if !self.is_attached(element) {
            return;
        }
        // Containers first, nearest ancestor outwards; they jump.
        for container in self.ancestors(element) {
            if !self.is_container(container) {
                continue;
            }
            let (Some(el), Some(frame), Some(scroll)) = (
                self.document_rect(element),
                self.document_rect(container),
                self.element_scroll(container),
            ) else {
                continue;
            };
            let delta = Vec2::new(
                nearest_delta(el.x0, el.x1, frame.x0, frame.x1),
                nearest_delta(el.y0, el.y1, frame.y0, frame.y1),
            );
            self.scroll_element_to(container, scroll + delta);
        }
        let Some(el) = self.document_rect(element) else {
            return;
        };
        let vp = self.viewport().rect();
        let to = self.clamp_window_scroll(Vec2::new(
            self.scroll.x + nearest_delta(el.x0, el.x1, vp.x0, vp.x1),
            el.center().y - self.viewport.height / 2.0,
        ));
        match behavior {
            ScrollBehavior::Smooth if !self.smooth_scroll_duration.is_zero() => {
                self.smooth_scroll = Some(SmoothScroll {
                    to,
                    done_at: self.clock.now() + self.smooth_scroll_duration,
                });
            }
            _ => self.set_window_scroll(to),
        }
    }

    fn scroll_containers(&self) -> Vec<ElementId> {
        self.document_order()
            .into_iter()
            .filter(|id| self.is_container(*id))
            .collect()
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(n) = self.node_mut(element)
            && !n.data.classes.iter().any(|c| c == class)
        {
            n.data.classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(n) = self.node_mut(element) {
            n.data.classes.retain(|c| c != class);
        }
    }
}

impl Scheduler for HeadlessDom {
    type Handle = HostHandle;

    fn add_listener(
        &mut self,
        source: EventSource<ElementId>,
        kind: EventKind,
        capture: bool,
    ) -> HostHandle {
        self.clock.add_listener(source, kind, capture)
    }

    fn remove_listener(&mut self, handle: HostHandle) {
        self.clock.remove_listener(handle);
    }

    fn set_timeout(&mut self, delay: Duration) -> HostHandle {
        self.clock.add_timer(delay, TimerKind::Timeout)
    }

    fn set_interval(&mut self, period: Duration) -> HostHandle {
        self.clock.add_timer(period, TimerKind::Interval(period))
    }

    fn clear_timer(&mut self, handle: HostHandle) {
        self.clock.remove_timer(handle, false);
    }

    fn request_frame(&mut self) -> HostHandle {
        self.clock.add_timer(FRAME_INTERVAL, TimerKind::Frame)
    }

    fn cancel_frame(&mut self, handle: HostHandle) {
        self.clock.remove_timer(handle, true);
    }
}

/// Smallest shift that brings `[lo, hi]` inside `[min, max]` (start edge wins if too big).
fn nearest_delta(lo: f64, hi: f64, min: f64, max: f64) -> f64 {
    if lo < min || hi - lo > max - min {
        lo - min
    } else if hi > max {
        hi - max
    } else {
        0.0
    }
}
