// Copyright 2026 The Folio Canvas Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Layout engine for a responsive canvas of draggable cards.
//!
//! Cards carry optional authored positions per breakpoint, normalized to
//! the travel left after subtracting the card from the container. Cards
//! without one are auto-placed to avoid their neighbors, optionally inside
//! a per-category zone. A [`CardCanvas`] ties this together and reports
//! committed drags as [`PositionChanged`] events.

#![forbid(unsafe_code)]

pub mod breakpoint;
pub mod card;
pub mod common;
pub mod config;
pub mod geometry;
pub mod height;
pub mod placement;
pub mod session;
pub mod zones;

pub use self::breakpoint::{Breakpoint, BreakpointScale, DeviceTier};
pub use self::card::{CardSizeVariant, CardSpec, Category, PartialPosition, cards_from_json};
pub use self::common::{Error, Result};
pub use self::config::CanvasConfig;
pub use self::geometry::{CardFootprint, Position, Rect, Size};
pub use self::placement::{CardPlacement, Placement, place_card};
pub use self::session::{
    CardCanvas, CategoryCanvas, FreeFormCanvas, LayoutMode, PositionChanged, PositionSink,
};
pub use self::zones::{Zone, Zones, compute_zones};
