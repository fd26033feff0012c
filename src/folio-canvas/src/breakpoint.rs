// Copyright 2026 The Folio Canvas Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Responsive breakpoints and authored-position lookup.
//!
//! Two scales exist: the seven-tier scale used by the free-form canvas and
//! the three-tier device scale used by the category canvas. Both implement
//! [`BreakpointScale`], so the resolver and the layout session are generic
//! over the scale.

use std::fmt::{Debug, Display};
use std::hash::Hash;

use serde::Serialize;

use crate::card::{CardSpec, PartialPosition};

/// An ordered set of breakpoint tags with inclusive minimum widths.
pub trait BreakpointScale: Copy + Ord + Hash + Debug + Display + Serialize + 'static {
    /// Every tag, smallest first.
    const ALL: &'static [Self];

    /// Minimum container width (inclusive) at which this tag applies.
    fn min_width(self) -> f64;

    /// Key used for this tag in authored position maps.
    fn key(self) -> &'static str;

    fn smallest() -> Self {
        Self::ALL[0]
    }

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|bp| bp.key() == key)
    }
}

/// Breakpoints of the free-form canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Breakpoint {
    #[serde(rename = "xs")]
    Xs,
    #[serde(rename = "sm")]
    Sm,
    #[serde(rename = "md")]
    Md,
    #[serde(rename = "lg")]
    Lg,
    #[serde(rename = "xl")]
    Xl,
    #[serde(rename = "2xl")]
    Xl2,
    #[serde(rename = "3xl")]
    Xl3,
}

impl BreakpointScale for Breakpoint {
    const ALL: &'static [Self] = &[
        Breakpoint::Xs,
        Breakpoint::Sm,
        Breakpoint::Md,
        Breakpoint::Lg,
        Breakpoint::Xl,
        Breakpoint::Xl2,
        Breakpoint::Xl3,
    ];

    fn min_width(self) -> f64 {
        match self {
            Breakpoint::Xs => 0.0,
            Breakpoint::Sm => 640.0,
            Breakpoint::Md => 768.0,
            Breakpoint::Lg => 1024.0,
            Breakpoint::Xl => 1280.0,
            Breakpoint::Xl2 => 1536.0,
            Breakpoint::Xl3 => 1920.0,
        }
    }

    fn key(self) -> &'static str {
        match self {
            Breakpoint::Xs => "xs",
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
            Breakpoint::Xl => "xl",
            Breakpoint::Xl2 => "2xl",
            Breakpoint::Xl3 => "3xl",
        }
    }
}

impl Display for Breakpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Breakpoints of the category canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceTier {
    Mobile,
    Tablet,
    Desktop,
}

impl BreakpointScale for DeviceTier {
    const ALL: &'static [Self] = &[DeviceTier::Mobile, DeviceTier::Tablet, DeviceTier::Desktop];

    fn min_width(self) -> f64 {
        match self {
            DeviceTier::Mobile => 0.0,
            DeviceTier::Tablet => 768.0,
            DeviceTier::Desktop => 1024.0,
        }
    }

    fn key(self) -> &'static str {
        match self {
            DeviceTier::Mobile => "mobile",
            DeviceTier::Tablet => "tablet",
            DeviceTier::Desktop => "desktop",
        }
    }
}

impl Display for DeviceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Largest tag whose minimum width is <= `width`. NaN and negative widths
/// resolve to the smallest tag.
pub fn resolve_breakpoint<B: BreakpointScale>(width: f64) -> B {
    B::ALL
        .iter()
        .rev()
        .copied()
        .find(|bp| width >= bp.min_width())
        .unwrap_or_else(B::smallest)
}

/// Find the authored position that applies to `card` at `breakpoint`.
///
/// Walks from `breakpoint` down to the smallest tag and returns the first
/// entry defining at least one axis. Larger breakpoints are never consulted.
/// An empty [`PartialPosition`] means the card must be auto-placed.
pub fn resolve_position_for_card<B: BreakpointScale>(
    card: &CardSpec,
    breakpoint: B,
) -> PartialPosition {
    B::ALL
        .iter()
        .rev()
        .filter(|&&bp| bp <= breakpoint)
        .filter_map(|bp| card.positions.get(bp.key()))
        .find(|pos| pos.is_defined())
        .copied()
        .unwrap_or_default()
}
