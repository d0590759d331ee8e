// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the anchor engine: viewport, placement, steps, and measurement results.
//!
//! All rectangles are Kurbo [`Rect`]s in document coordinates (scroll offset
//! included) unless a function says otherwise. `x0`/`y0` are the left/top edges.

use alloc::string::String;
use kurbo::{Point, Rect, Size, Vec2};

/// The visible part of the document.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Viewport {
    /// Inner size of the window.
    pub size: Size,
    /// Current window scroll offset (document coordinates of the viewport's top-left).
    pub scroll: Vec2,
}

impl Viewport {
    /// Create a viewport of `size` scrolled to `scroll`.
    pub const fn new(size: Size, scroll: Vec2) -> Self {
        Self { size, scroll }
    }

    /// The viewport as a rectangle in document coordinates.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.scroll.to_point(), self.size)
    }

    /// Center of the viewport in document coordinates.
    pub fn center(&self) -> Point {
        self.rect().center()
    }
}

/// Side of the target on which a floating panel is drawn.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Side {
    /// Above the target; the anchor is the panel's bottom-center.
    Top,
    /// Below the target; the anchor is the panel's top-center.
    Bottom,
    /// Left of the target; the anchor is the panel's right-middle.
    Left,
    /// Right of the target; the anchor is the panel's left-middle.
    Right,
}

/// A chosen side plus the anchor point for the panel, in document coordinates.
///
/// Produced by [`place`](crate::placement::place).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    /// Side of the target the panel sits on.
    pub side: Side,
    /// Anchor point. Which edge of the panel it pins depends on [`Side`].
    pub anchor: Point,
}

/// Where a host should draw the floating panel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PanelAnchor {
    /// Next to a resolved target.
    Anchored(Placement),
    /// Centered in the viewport, because the step's target is not available.
    Centered,
}

impl PanelAnchor {
    /// Returns the placement if the panel is anchored to a target.
    pub fn placement(&self) -> Option<Placement> {
        match self {
            Self::Anchored(p) => Some(*p),
            Self::Centered => None,
        }
    }
}

/// One step of a guided sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    /// Locator of the element to emphasize, resolved fresh on every activation.
    pub locator: String,
    /// Short heading shown in the panel.
    pub title: String,
    /// Body text shown in the panel.
    pub content: String,
}

impl Step {
    /// Create a step.
    pub fn new(
        locator: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            locator: locator.into(),
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Outcome of resolving a locator against the live document.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Resolution<E> {
    /// The locator matched an attached element.
    Found {
        /// The first matching element in document order.
        element: E,
        /// Its bounding box in document coordinates.
        rect: Rect,
    },
    /// Nothing matched, or the match is no longer attached.
    NotFound,
}

impl<E: Copy> Resolution<E> {
    /// Returns the element, if resolved.
    pub fn element(&self) -> Option<E> {
        match self {
            Self::Found { element, .. } => Some(*element),
            Self::NotFound => None,
        }
    }

    /// Returns the rectangle, if resolved.
    pub fn rect(&self) -> Option<Rect> {
        match self {
            Self::Found { rect, .. } => Some(*rect),
            Self::NotFound => None,
        }
    }

    /// Returns true if the locator resolved to an attached element.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }
}

bitflags::bitflags! {
    /// Reasons a measurement was taken.
    ///
    /// Several scroll and resize callbacks coalesced into one frame set more than one bit.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Trigger: u8 {
        /// Step activation (the initial measurement).
        const STEP   = 0b0000_0001;
        /// Corrective measurement after the settle delay.
        const SETTLE = 0b0000_0010;
        /// A scroll event on the window, document, or a scroll container.
        const SCROLL = 0b0000_0100;
        /// A window resize.
        const RESIZE = 0b0000_1000;
        /// The fallback poll interval.
        const POLL   = 0b0001_0000;
    }
}

/// A fresh resolution plus why it was taken.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Measurement<E> {
    /// What the locator resolved to at measurement time.
    pub resolution: Resolution<E>,
    /// What caused the measurement.
    pub trigger: Trigger,
}
