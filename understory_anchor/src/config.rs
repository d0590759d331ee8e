// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration and validation.

use alloc::string::String;
use core::time::Duration;

use crate::host::ScrollBehavior;

/// Thresholds used by [`place`](crate::placement::place).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlacementConfig {
    /// Gap between the target edge and the panel anchor.
    pub margin: f64,
    /// Below this much room under the target, try flipping to the top.
    pub min_space_below: f64,
    /// Below this much room beside the target, try flipping horizontally.
    pub min_space_side: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            margin: 12.0,
            min_space_below: 200.0,
            min_space_side: 300.0,
        }
    }
}

/// Timing, scrolling, marker, and placement settings for one engine instance.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Wait after scroll-into-view before the corrective measurement.
    pub settle_delay: Duration,
    /// Period of the fallback re-measure.
    pub poll_interval: Duration,
    /// How targets are brought into view on activation.
    pub scroll_behavior: ScrollBehavior,
    /// Class toggled on the current target.
    pub highlight_class: String,
    /// Panel placement thresholds.
    pub placement: PlacementConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(400),
            poll_interval: Duration::from_millis(100),
            scroll_behavior: ScrollBehavior::Smooth,
            highlight_class: String::from("tour-highlighted"),
            placement: PlacementConfig::default(),
        }
    }
}

/// Reasons an [`EngineConfig`] is rejected.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A zero poll interval would fire continuously.
    #[error("poll interval must be non-zero")]
    ZeroPollInterval,
    /// Placement values must be finite and non-negative.
    #[error("placement `{field}` must be finite and non-negative, got {value}")]
    InvalidPlacement {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// The marker class must be a usable class name.
    #[error("highlight class must be a non-empty name without whitespace")]
    InvalidHighlightClass,
}

impl EngineConfig {
    /// Check that the configuration can drive an engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }
        let p = &self.placement;
        for (field, value) in [
            ("margin", p.margin),
            ("min_space_below", p.min_space_below),
            ("min_space_side", p.min_space_side),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidPlacement { field, value });
            }
        }
        if self.highlight_class.is_empty()
            || self.highlight_class.chars().any(char::is_whitespace)
        {
            return Err(ConfigError::InvalidHighlightClass);
        }
        Ok(())
    }
}
