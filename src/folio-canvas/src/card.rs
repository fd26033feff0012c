// Copyright 2026 The Folio Canvas Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Authored card input.
//!
//! Cards arrive from the content store as loosely-typed JSON. Decoding is
//! deliberately forgiving: an unrecognized size variant or category decodes
//! as absent instead of rejecting the whole card list, and the layout code
//! substitutes its defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::common::Result;
use crate::geometry::{CardFootprint, footprint_for};

/// Size variant selected by the author. Maps to a fixed pixel footprint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardSizeVariant {
    Small,
    #[default]
    Medium,
    Large,
}

impl CardSizeVariant {
    /// `(width, height)` in pixels.
    pub fn dimensions(self) -> (f64, f64) {
        match self {
            CardSizeVariant::Small => (150.0, 165.0),
            CardSizeVariant::Medium => (200.0, 220.0),
            CardSizeVariant::Large => (280.0, 308.0),
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "small" => Some(CardSizeVariant::Small),
            "medium" => Some(CardSizeVariant::Medium),
            "large" => Some(CardSizeVariant::Large),
            _ => None,
        }
    }
}

/// Card categories on the zoned canvas, in zone order (top to bottom).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Frontend,
    Backend,
    Database,
    DevOps,
    Tools,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Frontend,
        Category::Backend,
        Category::Database,
        Category::DevOps,
        Category::Tools,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "frontend" => Some(Category::Frontend),
            "backend" => Some(Category::Backend),
            "database" => Some(Category::Database),
            "devops" => Some(Category::DevOps),
            "tools" => Some(Category::Tools),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// An authored position for one breakpoint. Either axis may be missing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialPosition {
    #[serde(
        rename = "normalizedX",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub x: Option<f64>,
    #[serde(
        rename = "normalizedY",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub y: Option<f64>,
}

impl PartialPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }

    /// True when at least one axis is authored.
    pub fn is_defined(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }
}

/// One card as authored in the content store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CardSpec {
    pub id: String,
    #[serde(
        default,
        deserialize_with = "lenient_size",
        skip_serializing_if = "Option::is_none"
    )]
    pub size: Option<CardSizeVariant>,
    #[serde(
        default,
        deserialize_with = "lenient_category",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<Category>,
    /// Authored positions keyed by breakpoint tag name (`"md"`, `"tablet"`, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub positions: BTreeMap<String, PartialPosition>,
}

impl CardSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, size: CardSizeVariant) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_position(mut self, breakpoint: &str, position: PartialPosition) -> Self {
        self.positions.insert(breakpoint.to_string(), position);
        self
    }

    pub fn footprint(&self) -> CardFootprint {
        footprint_for(&self.id, self.size)
    }
}

/// Decode an ordered card list from JSON.
pub fn cards_from_json(json: &str) -> Result<Vec<CardSpec>> {
    Ok(serde_json::from_str(json)?)
}

fn lenient_size<'de, D>(deserializer: D) -> std::result::Result<Option<CardSizeVariant>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(CardSizeVariant::parse))
}

fn lenient_category<'de, D>(deserializer: D) -> std::result::Result<Option<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Category::parse))
}
