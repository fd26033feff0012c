// Copyright 2026 The Folio Canvas Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::card::CardSizeVariant;

/// 2D pixel position (top-left corner of a card) or displacement.
#[derive(Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Position {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Position {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

/// Width/height pair in pixels, used for the container.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when both dimensions are finite and strictly positive.
    /// Placement is suppressed for anything else.
    pub fn is_measurable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Pixel dimensions of a card, derived from its size variant.
#[derive(Clone, Debug, PartialEq)]
pub struct CardFootprint {
    pub id: String,
    pub width: f64,
    pub height: f64,
}

/// Look up the footprint for a card. Absent variants use `Medium`.
pub fn footprint_for(id: &str, size: Option<CardSizeVariant>) -> CardFootprint {
    let (width, height) = size.unwrap_or_default().dimensions();
    CardFootprint {
        id: id.to_string(),
        width,
        height,
    }
}

/// Axis-aligned rectangle in container pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn at(position: Position, footprint: &CardFootprint) -> Self {
        Self::new(position.x, position.y, footprint.width, footprint.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Distance a card can travel along one axis before leaving the container.
pub fn max_travel(container: f64, card: f64) -> f64 {
    (container - card).max(0.0)
}

/// Convert a normalized coordinate (fraction of available travel) to pixels.
///
/// `None` and NaN map to 0. The result always lies in
/// `[0, max(0, container - card)]`.
pub fn normalized_to_pixel(normalized: Option<f64>, container: f64, card: f64) -> f64 {
    let Some(n) = normalized.filter(|n| !n.is_nan()) else {
        return 0.0;
    };
    n.clamp(0.0, 1.0) * max_travel(container, card)
}

/// Convert a pixel coordinate to a fraction of available travel in `[0, 1]`.
///
/// Zero travel (card as large as or larger than the container) maps to 0.
pub fn pixel_to_normalized(pixel: f64, container: f64, card: f64) -> f64 {
    let travel = max_travel(container, card);
    if travel == 0.0 || pixel.is_nan() {
        return 0.0;
    }
    (pixel / travel).clamp(0.0, 1.0)
}

/// Padded AABB overlap test.
///
/// Two boxes collide when they are closer than `padding` on both axes, so a
/// gap of exactly `padding` is allowed. The test is symmetric in `a` and `b`.
pub fn boxes_collide(a: &Rect, b: &Rect, padding: f64) -> bool {
    a.x < b.right() + padding
        && a.right() + padding > b.x
        && a.y < b.bottom() + padding
        && a.bottom() + padding > b.y
}
