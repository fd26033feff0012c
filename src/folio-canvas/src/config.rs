// Copyright 2026 The Folio Canvas Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use serde::{Deserialize, Serialize};

use crate::common::{Error, Result};

/// Tunables for placement, zoning and height estimation.
///
/// All distances are in CSS pixels. Every field is optional when decoding
/// from JSON; missing fields take the defaults below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    // Auto-placement
    /// Minimum gap kept between an auto-placed card and its neighbors.
    pub collision_padding: f64,
    /// Random samples tried before falling back to vertical stacking.
    pub max_placement_attempts: usize,

    // Zone partitioning (fractions of container height)
    pub zone_min_fraction: f64,
    pub zone_max_fraction: f64,

    // Height estimation
    /// Gap between cards when estimating a stacked column.
    pub card_spacing: f64,
    /// Padding added above and below the stacked estimate.
    pub vertical_padding: f64,
    /// Padding added under the lowest placed card.
    pub bottom_padding: f64,
    /// Absolute floor for the container height estimate.
    pub min_height: f64,

    /// Seed for auto-placement. `None` seeds from the OS.
    pub random_seed: Option<u64>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            collision_padding: 20.0,
            max_placement_attempts: 100,
            zone_min_fraction: 0.15,
            zone_max_fraction: 0.30,
            card_spacing: 24.0,
            vertical_padding: 32.0,
            bottom_padding: 40.0,
            min_height: 500.0,
            random_seed: None,
        }
    }
}

impl CanvasConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: CanvasConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("collision_padding", self.collision_padding),
            ("card_spacing", self.card_spacing),
            ("vertical_padding", self.vertical_padding),
            ("bottom_padding", self.bottom_padding),
            ("min_height", self.min_height),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid_config(
                    field,
                    format!("must be finite and >= 0, got {value}"),
                ));
            }
        }

        if self.max_placement_attempts == 0 {
            return Err(Error::invalid_config(
                "max_placement_attempts",
                "must be at least 1",
            ));
        }

        for (field, value) in [
            ("zone_min_fraction", self.zone_min_fraction),
            ("zone_max_fraction", self.zone_max_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::invalid_config(
                    field,
                    format!("must be within [0, 1], got {value}"),
                ));
            }
        }
        if self.zone_min_fraction > self.zone_max_fraction {
            return Err(Error::invalid_config(
                "zone_min_fraction",
                format!(
                    "must not exceed zone_max_fraction ({} > {})",
                    self.zone_min_fraction, self.zone_max_fraction
                ),
            ));
        }

        Ok(())
    }
}
