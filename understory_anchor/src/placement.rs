// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Panel placement around a target rectangle.
//!
//! ## Algorithm
//!
//! Space is measured between the target and each viewport edge. Starting from
//! [`Side::Bottom`], a single greedy pass picks the first rule that applies:
//!
//! 1. Little room below (`< min_space_below`) and more room above: [`Side::Top`].
//! 2. Little room to the right (`< min_space_side`) and more room to the left: [`Side::Left`].
//! 3. Little room to the left (`< min_space_side`): [`Side::Right`].
//! 4. Otherwise stay on [`Side::Bottom`].
//!
//! The anchor is then clamped into the viewport. Panel extent is not considered, so
//! when the viewport is small in every direction the panel itself may still overflow.
//!
//! ```
//! use kurbo::{Rect, Size, Vec2};
//! use understory_anchor::config::PlacementConfig;
//! use understory_anchor::placement::place;
//! use understory_anchor::types::{Side, Viewport};
//!
//! let viewport = Viewport::new(Size::new(1024.0, 768.0), Vec2::ZERO);
//! let target = Rect::from_origin_size((100.0, 700.0), (200.0, 40.0));
//! let p = place(target, viewport, &PlacementConfig::default());
//! assert_eq!(p.side, Side::Top);
//! ```

use kurbo::{Point, Rect};

use crate::config::PlacementConfig;
use crate::types::{Placement, Side, Viewport};

/// Free space between a target and the viewport edges.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Spaces {
    /// Viewport top to target top.
    pub above: f64,
    /// Target bottom to viewport bottom.
    pub below: f64,
    /// Viewport left to target left.
    pub left: f64,
    /// Target right to viewport right.
    pub right: f64,
}

impl Spaces {
    /// Measure the space around `target` inside `viewport`. Values go negative
    /// when the target extends past an edge.
    pub fn around(target: Rect, viewport: Viewport) -> Self {
        let vp = viewport.rect();
        Self {
            above: target.y0 - vp.y0,
            below: vp.y1 - target.y1,
            left: target.x0 - vp.x0,
            right: vp.x1 - target.x1,
        }
    }
}

/// Choose a side and anchor for a panel next to `target`.
pub fn place(target: Rect, viewport: Viewport, config: &PlacementConfig) -> Placement {
    let space = Spaces::around(target, viewport);
    let side = if space.below < config.min_space_below && space.above > space.below {
        Side::Top
    } else if space.right < config.min_space_side && space.left > space.right {
        Side::Left
    } else if space.left < config.min_space_side {
        Side::Right
    } else {
        Side::Bottom
    };
    Placement {
        side,
        anchor: clamp_into(anchor_for(side, target, config.margin), viewport.rect()),
    }
}

/// Unclamped anchor point for `side`.
pub fn anchor_for(side: Side, target: Rect, margin: f64) -> Point {
    let c = target.center();
    match side {
        Side::Top => Point::new(c.x, target.y0 - margin),
        Side::Bottom => Point::new(c.x, target.y1 + margin),
        Side::Left => Point::new(target.x0 - margin, c.y),
        Side::Right => Point::new(target.x1 + margin, c.y),
    }
}

fn clamp_into(pt: Point, bounds: Rect) -> Point {
    // `max` then `min` so an empty viewport collapses onto its origin instead of panicking.
    Point::new(
        pt.x.max(bounds.x0).min(bounds.x1),
        pt.y.max(bounds.y0).min(bounds.y1),
    )
}
