// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Step sequencer: walk an ordered list of steps, one anchored target at a time.
//!
//! ## States
//!
//! A [`StepSequencer`] is either [`TourState::Closed`] or [`TourState::Active`] with an
//! index that is always a valid position in the step list.
//!
//! - [`open`](StepSequencer::open) (re)starts at step 0 from any state.
//! - [`next`](StepSequencer::next) advances; on the last step it emits
//!   [`TourEvent::Completed`] and then closes.
//! - [`previous`](StepSequencer::previous) retreats; it does nothing on step 0.
//! - [`go_to`](StepSequencer::go_to) jumps to a clamped index.
//! - [`close`](StepSequencer::close) and [`unmount`](StepSequencer::unmount) end the
//!   sequence.
//!
//! Every transition runs the same teardown first: the previous [`SyncLoop`] is
//! stopped and the highlight is cleared before anything for the next step is
//! registered. At most one loop is live at a time.
//!
//! ## Events
//!
//! Operations return the [`TourEvent`]s a presentational shell needs, in order.
//! Host callbacks are fed back through [`StepSequencer::handle`].

use alloc::vec;
use alloc::vec::Vec;
use kurbo::Rect;

use crate::config::{ConfigError, EngineConfig};
use crate::highlight::HighlightOverlay;
use crate::host::Scheduler;
use crate::placement::place;
use crate::sync::SyncLoop;
use crate::types::{Measurement, PanelAnchor, Step};

/// Lifecycle state of a [`StepSequencer`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TourState {
    /// Nothing shown, nothing registered.
    Closed,
    /// Showing step `index`.
    Active {
        /// Current step; always `< len`.
        index: usize,
    },
}

/// Notifications for the presentational shell.
#[derive(Clone, Debug, PartialEq)]
pub enum TourEvent {
    /// Step `index` became current.
    StepActivated {
        /// New current step.
        index: usize,
    },
    /// The highlight or panel position for step `index` changed.
    TargetUpdated {
        /// Step the update belongs to.
        index: usize,
        /// Highlight rectangle in document coordinates, if the target resolved.
        highlight: Option<Rect>,
        /// Where to draw the panel.
        panel: PanelAnchor,
    },
    /// The last step was advanced past.
    Completed,
    /// The sequence closed.
    Closed,
}

/// Read-only snapshot of the current step for rendering.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TourView<'a> {
    /// Current step index.
    pub index: usize,
    /// Number of steps.
    pub len: usize,
    /// Current step.
    pub step: &'a Step,
    /// Highlight rectangle in document coordinates.
    pub highlight: Option<Rect>,
    /// Panel position.
    pub panel: PanelAnchor,
}

impl TourView<'_> {
    /// Returns true on the first step.
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    /// Returns true on the last step.
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.len
    }
}

/// Drives a guided sequence over a host. See the [module docs](self).
///
/// ## Teardown
///
/// The sequencer cannot reach the host from `Drop`, so dropping it does not revert
/// anything. Call [`close`](Self::close) or [`unmount`](Self::unmount) before
/// letting it go; otherwise the marker class stays on the target and the host keeps
/// its listeners and timers. A drop with a mark still applied logs a warning.
pub struct StepSequencer<H: Scheduler + ?Sized> {
    steps: Vec<Step>,
    state: TourState,
    config: EngineConfig,
    sync: Option<SyncLoop<H>>,
    overlay: HighlightOverlay<H::Element>,
    panel: PanelAnchor,
}

impl<H: Scheduler + ?Sized> core::fmt::Debug for StepSequencer<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StepSequencer")
            .field("steps", &self.steps.len())
            .field("state", &self.state)
            .field("sync", &self.sync)
            .field("overlay", &self.overlay)
            .field("panel", &self.panel)
            .finish_non_exhaustive()
    }
}

impl<H: Scheduler + ?Sized> StepSequencer<H> {
    /// Create a closed sequencer after validating `config`.
    pub fn new(steps: Vec<Step>, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_valid_config(steps, config))
    }

    /// Create a closed sequencer with [`EngineConfig::default`].
    pub fn with_defaults(steps: Vec<Step>) -> Self {
        Self::with_valid_config(steps, EngineConfig::default())
    }

    fn with_valid_config(steps: Vec<Step>, config: EngineConfig) -> Self {
        Self {
            overlay: HighlightOverlay::new(config.highlight_class.clone()),
            steps,
            state: TourState::Closed,
            config,
            sync: None,
            panel: PanelAnchor::Centered,
        }
    }

    /// Start from step 0, discarding any current progress.
    ///
    /// With no steps the sequencer stays closed.
    pub fn open(&mut self, host: &mut H) -> Vec<TourEvent> {
        if self.steps.is_empty() {
            self.teardown(host);
            self.state = TourState::Closed;
            tracing::debug!("open ignored: no steps");
            return Vec::new();
        }
        self.activate(host, 0)
    }

    /// Advance one step, or complete and close on the last step.
    pub fn next(&mut self, host: &mut H) -> Vec<TourEvent> {
        let TourState::Active { index } = self.state else {
            return Vec::new();
        };
        if index + 1 < self.steps.len() {
            return self.activate(host, index + 1);
        }
        let mut events = vec![TourEvent::Completed];
        events.extend(self.close(host));
        events
    }

    /// Go back one step. Does nothing on the first step or while closed.
    pub fn previous(&mut self, host: &mut H) -> Vec<TourEvent> {
        match self.state {
            TourState::Active { index } if index > 0 => self.activate(host, index - 1),
            _ => Vec::new(),
        }
    }

    /// Jump to `index`, clamped into the step list. Does nothing while closed or
    /// when the clamped index is already current.
    pub fn go_to(&mut self, host: &mut H, index: usize) -> Vec<TourEvent> {
        let TourState::Active { index: current } = self.state else {
            return Vec::new();
        };
        let target = index.min(self.steps.len().saturating_sub(1));
        if target == current {
            return Vec::new();
        }
        self.activate(host, target)
    }

    /// Close and release everything. Does nothing if already closed.
    pub fn close(&mut self, host: &mut H) -> Vec<TourEvent> {
        if self.state == TourState::Closed {
            return Vec::new();
        }
        self.teardown(host);
        self.state = TourState::Closed;
        tracing::debug!("sequence closed");
        vec![TourEvent::Closed]
    }

    /// Follow an external `open` flag.
    pub fn set_open(&mut self, host: &mut H, open: bool) -> Vec<TourEvent> {
        match (open, self.state) {
            (true, TourState::Closed) => self.open(host),
            (false, TourState::Active { .. }) => self.close(host),
            _ => Vec::new(),
        }
    }

    /// Replace the step list. An active sequence restarts at step 0, or closes if
    /// the new list is empty.
    pub fn set_steps(&mut self, host: &mut H, steps: Vec<Step>) -> Vec<TourEvent> {
        self.steps = steps;
        match self.state {
            TourState::Closed => Vec::new(),
            TourState::Active { .. } if self.steps.is_empty() => self.close(host),
            TourState::Active { .. } => self.activate(host, 0),
        }
    }

    /// Release everything without emitting events, for when the owner goes away.
    pub fn unmount(&mut self, host: &mut H) {
        self.teardown(host);
        self.state = TourState::Closed;
    }

    /// Feed back a fired host registration.
    pub fn handle(&mut self, host: &mut H, handle: H::Handle) -> Vec<TourEvent> {
        let TourState::Active { index } = self.state else {
            return Vec::new();
        };
        let Some(measurement) = self.sync.as_mut().and_then(|s| s.handle(host, handle)) else {
            return Vec::new();
        };
        if self.apply(host, &measurement) {
            vec![self.update_event(index)]
        } else {
            Vec::new()
        }
    }

    fn activate(&mut self, host: &mut H, index: usize) -> Vec<TourEvent> {
        self.teardown(host);
        self.state = TourState::Active { index };
        tracing::debug!(index, locator = %self.steps[index].locator, "step activated");
        let (sync, measurement) = SyncLoop::start(host, &self.steps[index].locator, &self.config);
        self.sync = Some(sync);
        let _ = self.apply(host, &measurement);
        vec![
            TourEvent::StepActivated { index },
            self.update_event(index),
        ]
    }

    /// The one teardown path shared by every transition.
    fn teardown(&mut self, host: &mut H) {
        if let Some(mut sync) = self.sync.take() {
            sync.stop(host);
        }
        let _ = self.overlay.clear(host);
        self.panel = PanelAnchor::Centered;
    }

    fn apply(&mut self, host: &mut H, measurement: &Measurement<H::Element>) -> bool {
        let changed = self.overlay.apply(host, &measurement.resolution);
        let panel = match measurement.resolution.rect() {
            Some(rect) => PanelAnchor::Anchored(place(rect, host.viewport(), &self.config.placement)),
            None => PanelAnchor::Centered,
        };
        let moved = panel != self.panel;
        self.panel = panel;
        changed || moved
    }

    fn update_event(&self, index: usize) -> TourEvent {
        TourEvent::TargetUpdated {
            index,
            highlight: self.overlay.rect(),
            panel: self.panel,
        }
    }

    /// Current state.
    pub fn state(&self) -> TourState {
        self.state
    }

    /// Current step index while active.
    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            TourState::Active { index } => Some(index),
            TourState::Closed => None,
        }
    }

    /// Returns true while a step is shown.
    pub fn is_open(&self) -> bool {
        matches!(self.state, TourState::Active { .. })
    }

    /// Snapshot for rendering, or `None` while closed.
    pub fn view(&self) -> Option<TourView<'_>> {
        let index = self.current_index()?;
        Some(TourView {
            index,
            len: self.steps.len(),
            step: self.steps.get(index)?,
            highlight: self.overlay.rect(),
            panel: self.panel,
        })
    }

    /// The step list.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Highlight state.
    pub fn overlay(&self) -> &HighlightOverlay<H::Element> {
        &self.overlay
    }

    /// The live synchronization loop, if any.
    pub fn sync(&self) -> Option<&SyncLoop<H>> {
        self.sync.as_ref()
    }
}

impl<H: Scheduler + ?Sized> Drop for StepSequencer<H> {
    fn drop(&mut self) {
        if let Some(element) = self.overlay.marked() {
            tracing::warn!(
                ?element,
                class = self.overlay.class(),
                "sequencer dropped without unmount; marker class left on element"
            );
        }
    }
}
