// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render configuration supplied by the host.

use serde::Deserialize;

use crate::Result;

/// Pixel density and accessibility scales of the hosting render view.
///
/// All fields default to `1.0`. Values that are not finite or not positive are
/// replaced by `1.0` when read through [`RenderConfig::sanitized`].
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    /// Logical to device pixel scale.
    #[serde(alias = "dpi")]
    pub density: f32,
    /// Accessibility font size multiplier.
    pub font_size_scale: f32,
    /// Accessibility font weight multiplier.
    pub font_weight_scale: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            density: 1.0,
            font_size_scale: 1.0,
            font_weight_scale: 1.0,
        }
    }
}

impl RenderConfig {
    /// Creates a config with the given density and unit accessibility scales.
    pub fn with_density(density: f32) -> Self {
        Self {
            density,
            ..Self::default()
        }
    }

    /// Parses a host configuration string.
    ///
    /// Unknown keys are ignored; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str::<Self>(json)?.sanitized())
    }

    /// Returns a copy with every non-positive or non-finite factor replaced by `1.0`.
    #[must_use]
    pub fn sanitized(self) -> Self {
        fn positive(value: f32) -> f32 {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                1.0
            }
        }
        Self {
            density: positive(self.density),
            font_size_scale: positive(self.font_size_scale),
            font_weight_scale: positive(self.font_weight_scale),
        }
    }
}
