// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Synchronization loop: keep a target's measurement fresh while the page moves.
//!
//! ## Lifecycle
//!
//! [`SyncLoop::start`] resolves the locator and returns the initial [`Measurement`].
//! If the target exists it is scrolled into view and a [`SubscriptionBundle`] is armed:
//!
//! - a one-shot settle timer for a corrective measurement once scrolling finishes,
//! - capturing `scroll` listeners on the window, document, root element, body, and
//!   every scroll container the host reports,
//! - a `resize` listener on the window,
//! - a fallback poll interval that cancels itself once the target is detached.
//!
//! Scroll and resize callbacks never measure directly. The first one in a burst
//! requests an animation frame; the rest only add their [`Trigger`] bits. The frame
//! callback measures once.
//!
//! [`SyncLoop::stop`] releases every registration in one pass. It is idempotent and
//! safe on a loop that never found its target.

use alloc::string::String;
use alloc::vec::Vec;

use crate::config::EngineConfig;
use crate::host::{EventKind, EventSource, Scheduler};
use crate::resolve::{measure, resolve};
use crate::types::{Measurement, Resolution, Trigger};

/// One listener owned by a [`SubscriptionBundle`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Registration<E, Hd> {
    /// Where the listener is attached.
    pub source: EventSource<E>,
    /// Event type.
    pub kind: EventKind,
    /// Whether it listens in the capture phase.
    pub capture: bool,
    /// Host handle used to remove it.
    pub handle: Hd,
}

/// Every listener, timer, and frame request held for the current target.
#[derive(Clone, Debug)]
pub struct SubscriptionBundle<E, Hd> {
    listeners: Vec<Registration<E, Hd>>,
    settle: Option<Hd>,
    poll: Option<Hd>,
    frame: Option<Hd>,
    pending: Trigger,
}

impl<E, Hd> Default for SubscriptionBundle<E, Hd> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            settle: None,
            poll: None,
            frame: None,
            pending: Trigger::empty(),
        }
    }
}

impl<E: Copy + Eq, Hd: Copy + Eq> SubscriptionBundle<E, Hd> {
    /// Returns true if nothing is registered with the host.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
            && self.settle.is_none()
            && self.poll.is_none()
            && self.frame.is_none()
    }

    /// Listeners currently registered.
    pub fn listeners(&self) -> &[Registration<E, Hd>] {
        &self.listeners
    }

    /// Returns true while the fallback poll interval is armed.
    pub fn is_polling(&self) -> bool {
        self.poll.is_some()
    }

    /// Returns true while a coalesced frame callback is pending.
    pub fn has_pending_frame(&self) -> bool {
        self.frame.is_some()
    }

    fn listen<H>(&mut self, host: &mut H, source: EventSource<E>, kind: EventKind, capture: bool)
    where
        H: Scheduler<Element = E, Handle = Hd> + ?Sized,
    {
        if self
            .listeners
            .iter()
            .any(|r| r.source == source && r.kind == kind && r.capture == capture)
        {
            return;
        }
        let handle = host.add_listener(source, kind, capture);
        self.listeners.push(Registration {
            source,
            kind,
            capture,
            handle,
        });
    }

    fn listener_kind(&self, handle: Hd) -> Option<EventKind> {
        self.listeners
            .iter()
            .find(|r| r.handle == handle)
            .map(|r| r.kind)
    }

    /// Release everything with the host. Calling it again does nothing.
    pub fn release<H>(&mut self, host: &mut H)
    where
        H: Scheduler<Element = E, Handle = Hd> + ?Sized,
    {
        for r in self.listeners.drain(..) {
            host.remove_listener(r.handle);
        }
        if let Some(h) = self.settle.take() {
            host.clear_timer(h);
        }
        if let Some(h) = self.poll.take() {
            host.clear_timer(h);
        }
        if let Some(h) = self.frame.take() {
            host.cancel_frame(h);
        }
        self.pending = Trigger::empty();
    }
}

/// Keeps one target's [`Resolution`] current. See the [module docs](self).
pub struct SyncLoop<H: Scheduler + ?Sized> {
    locator: String,
    target: Option<H::Element>,
    bundle: SubscriptionBundle<H::Element, H::Handle>,
}

impl<H: Scheduler + ?Sized> core::fmt::Debug for SyncLoop<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SyncLoop")
            .field("locator", &self.locator)
            .field("target", &self.target)
            .field("bundle", &self.bundle)
            .finish()
    }
}

impl<H: Scheduler + ?Sized> SyncLoop<H> {
    /// Resolve `locator`, bring it into view, and arm the subscription bundle.
    ///
    /// When the locator does not resolve, the initial measurement is
    /// [`Resolution::NotFound`] and nothing is registered with the host.
    pub fn start(
        host: &mut H,
        locator: &str,
        config: &EngineConfig,
    ) -> (Self, Measurement<H::Element>) {
        let resolution = resolve(&*host, locator);
        let mut this = Self {
            locator: String::from(locator),
            target: resolution.element(),
            bundle: SubscriptionBundle::default(),
        };
        if let Some(element) = this.target {
            host.scroll_into_view(element, config.scroll_behavior);
            this.bundle.settle = Some(host.set_timeout(config.settle_delay));
            this.arm(host, config);
        }
        tracing::debug!(
            locator,
            found = resolution.is_found(),
            listeners = this.bundle.listeners.len(),
            "sync loop started"
        );
        (
            this,
            Measurement {
                resolution,
                trigger: Trigger::STEP,
            },
        )
    }

    fn arm(&mut self, host: &mut H, config: &EngineConfig) {
        for source in [
            EventSource::Window,
            EventSource::Document,
            EventSource::DocumentElement,
            EventSource::Body,
        ] {
            self.bundle.listen(host, source, EventKind::Scroll, true);
        }
        for container in host.scroll_containers() {
            self.bundle
                .listen(host, EventSource::Element(container), EventKind::Scroll, true);
        }
        self.bundle
            .listen(host, EventSource::Window, EventKind::Resize, false);
        self.bundle.poll = Some(host.set_interval(config.poll_interval));
    }

    /// Feed back a fired registration.
    ///
    /// Returns a measurement when one was taken. Scroll and resize callbacks only
    /// schedule a frame and return `None`. Handles that do not belong to this loop
    /// are ignored.
    pub fn handle(&mut self, host: &mut H, handle: H::Handle) -> Option<Measurement<H::Element>> {
        if self.bundle.frame == Some(handle) {
            self.bundle.frame = None;
            let trigger = core::mem::take(&mut self.bundle.pending);
            return Some(self.remeasure(host, trigger));
        }
        if self.bundle.settle == Some(handle) {
            self.bundle.settle = None;
            return Some(self.remeasure(host, Trigger::SETTLE));
        }
        if self.bundle.poll == Some(handle) {
            return Some(self.remeasure(host, Trigger::POLL));
        }
        let kind = self.bundle.listener_kind(handle)?;
        self.bundle.pending |= match kind {
            EventKind::Scroll => Trigger::SCROLL,
            EventKind::Resize => Trigger::RESIZE,
        };
        if self.bundle.frame.is_none() {
            self.bundle.frame = Some(host.request_frame());
        } else {
            tracing::trace!(?handle, "coalesced into pending frame");
        }
        None
    }

    fn remeasure(&mut self, host: &mut H, trigger: Trigger) -> Measurement<H::Element> {
        let resolution = match self.target {
            Some(element) => measure(&*host, element),
            None => Resolution::NotFound,
        };
        if !resolution.is_found()
            && let Some(poll) = self.bundle.poll.take()
        {
            host.clear_timer(poll);
            tracing::debug!(locator = %self.locator, "target gone; fallback poll canceled");
        }
        tracing::trace!(?trigger, rect = ?resolution.rect(), "measured");
        Measurement {
            resolution,
            trigger,
        }
    }

    /// Release every registration. Idempotent.
    pub fn stop(&mut self, host: &mut H) {
        if !self.bundle.is_empty() {
            tracing::debug!(locator = %self.locator, "sync loop stopped");
        }
        self.bundle.release(host);
    }

    /// Returns true while anything is registered with the host.
    pub fn is_live(&self) -> bool {
        !self.bundle.is_empty()
    }

    /// Locator this loop was started for.
    pub fn locator(&self) -> &str {
        &self.locator
    }

    /// Element captured at start, if the locator resolved.
    pub fn target(&self) -> Option<H::Element> {
        self.target
    }

    /// Current registrations.
    pub fn bundle(&self) -> &SubscriptionBundle<H::Element, H::Handle> {
        &self.bundle
    }
}

impl<H: Scheduler + ?Sized> Drop for SyncLoop<H> {
    fn drop(&mut self) {
        if !self.bundle.is_empty() {
            tracing::warn!(
                locator = %self.locator,
                listeners = self.bundle.listeners.len(),
                "sync loop dropped without stop; host registrations leaked"
            );
        }
    }
}
