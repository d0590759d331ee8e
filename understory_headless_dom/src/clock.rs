// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Manual clock, timer queue, and listener registry.

use std::collections::VecDeque;
use std::time::Duration;

use understory_anchor::host::{EventKind, EventSource};

use crate::element::ElementId;

/// Time between simulated animation frames.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Registration handle handed out by [`HeadlessDom`](crate::HeadlessDom).
///
/// Handles are never reused, so listeners, timers, and frames cannot collide.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct HostHandle(u64);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum TimerKind {
    Timeout,
    Interval(Duration),
    Frame,
}

#[derive(Copy, Clone, Debug)]
struct Timer {
    handle: HostHandle,
    due: Duration,
    kind: TimerKind,
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct Listener {
    pub(crate) handle: HostHandle,
    pub(crate) source: EventSource<ElementId>,
    pub(crate) kind: EventKind,
    pub(crate) capture: bool,
}

#[derive(Debug, Default)]
pub(crate) struct Clock {
    now: Duration,
    next_handle: u64,
    listeners: Vec<Listener>,
    timers: Vec<Timer>,
    fired: VecDeque<HostHandle>,
    listeners_added: usize,
}

impl Clock {
    pub(crate) fn now(&self) -> Duration {
        self.now
    }

    pub(crate) fn set_now(&mut self, now: Duration) {
        debug_assert!(now >= self.now, "clock must not run backwards");
        self.now = now;
    }

    fn alloc(&mut self) -> HostHandle {
        self.next_handle += 1;
        HostHandle(self.next_handle)
    }

    pub(crate) fn add_listener(
        &mut self,
        source: EventSource<ElementId>,
        kind: EventKind,
        capture: bool,
    ) -> HostHandle {
        let handle = self.alloc();
        self.listeners.push(Listener {
            handle,
            source,
            kind,
            capture,
        });
        self.listeners_added += 1;
        handle
    }

    pub(crate) fn remove_listener(&mut self, handle: HostHandle) {
        self.listeners.retain(|l| l.handle != handle);
    }

    pub(crate) fn add_timer(&mut self, delay: Duration, kind: TimerKind) -> HostHandle {
        let handle = self.alloc();
        self.timers.push(Timer {
            handle,
            due: self.now + delay,
            kind,
        });
        handle
    }

    /// Drop a timer or frame of the given kinds. Unknown handles are ignored.
    pub(crate) fn remove_timer(&mut self, handle: HostHandle, frames: bool) {
        self.timers
            .retain(|t| t.handle != handle || (t.kind == TimerKind::Frame) != frames);
    }

    /// Earliest due time at or before `limit`.
    pub(crate) fn next_due(&self, limit: Duration) -> Option<Duration> {
        self.timers
            .iter()
            .map(|t| t.due)
            .filter(|d| *d <= limit)
            .min()
    }

    /// Take the earliest timer due at `at`, rescheduling intervals.
    pub(crate) fn pop_due(&mut self, at: Duration) -> Option<HostHandle> {
        let i = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= at)
            .min_by_key(|(_, t)| (t.due, t.handle))
            .map(|(i, _)| i)?;
        let timer = self.timers[i];
        match timer.kind {
            TimerKind::Interval(period) => {
                self.timers[i].due = timer.due + period.max(Duration::from_nanos(1));
            }
            TimerKind::Timeout | TimerKind::Frame => {
                self.timers.swap_remove(i);
            }
        }
        Some(timer.handle)
    }

    /// Queue every listener accepted by `pred`, in registration order.
    pub(crate) fn fire_listeners(&mut self, mut pred: impl FnMut(&Listener) -> bool) {
        let hits: Vec<HostHandle> = self
            .listeners
            .iter()
            .filter(|l| pred(l))
            .map(|l| l.handle)
            .collect();
        self.fired.extend(hits);
    }

    pub(crate) fn pop_fired(&mut self) -> Option<HostHandle> {
        self.fired.pop_front()
    }

    pub(crate) fn fired_len(&self) -> usize {
        self.fired.len()
    }

    pub(crate) fn live_listeners(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn listeners_added(&self) -> usize {
        self.listeners_added
    }

    pub(crate) fn count_timers(&self, frames: bool) -> usize {
        self.timers
            .iter()
            .filter(|t| (t.kind == TimerKind::Frame) == frames)
            .count()
    }

    pub(crate) fn is_listening(&self, handle: HostHandle) -> bool {
        self.listeners.iter().any(|l| l.handle == handle)
    }
}
