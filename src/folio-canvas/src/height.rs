// Copyright 2026 The Folio Canvas Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::HashMap;

use crate::card::CardSpec;
use crate::config::CanvasConfig;
use crate::placement::CardPlacement;

/// Height to reserve before the container has been measured.
///
/// The larger of: the configured floor, the cards stacked in one column with
/// spacing and vertical padding, and twice the tallest card plus padding.
pub fn estimate_minimum_height(cards: &[CardSpec], config: &CanvasConfig) -> f64 {
    let heights: Vec<f64> = cards.iter().map(|card| card.footprint().height).collect();
    let padding = 2.0 * config.vertical_padding;

    let gaps = heights.len().saturating_sub(1) as f64;
    let stacked = heights.iter().sum::<f64>() + config.card_spacing * gaps + padding;
    let tallest = heights.iter().copied().fold(0.0, f64::max);

    config.min_height.max(stacked).max(2.0 * tallest + padding)
}

/// Height needed to show every placed card, never below the minimum
/// estimate. `None` until at least one card has been placed.
pub fn dynamic_height(
    placements: &[CardPlacement],
    cards: &[CardSpec],
    config: &CanvasConfig,
) -> Option<f64> {
    let by_id: HashMap<&str, &CardSpec> = cards.iter().map(|c| (c.id.as_str(), c)).collect();

    let lowest = placements
        .iter()
        .filter_map(|placement| {
            let card = by_id.get(placement.card_id.as_str())?;
            Some(placement.y + card.footprint().height)
        })
        .reduce(f64::max)?;

    Some((lowest + config.bottom_padding).max(estimate_minimum_height(cards, config)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardSizeVariant;
    use crate::geometry::Position;

    #[test]
    fn test_minimum_height_floor() {
        let config = CanvasConfig::default();
        assert_eq!(estimate_minimum_height(&[], &config), 500.0);
        let one = [CardSpec::new("a").with_size(CardSizeVariant::Small)];
        assert_eq!(estimate_minimum_height(&one, &config), 500.0);
    }

    #[test]
    fn test_minimum_height_stacked() {
        let config = CanvasConfig::default();
        let cards = [
            CardSpec::new("a"),
            CardSpec::new("b").with_size(CardSizeVariant::Large),
            CardSpec::new("c").with_size(CardSizeVariant::Small),
        ];
        // 220 + 308 + 165 + 2 * 24 + 2 * 32
        assert_eq!(estimate_minimum_height(&cards, &config), 805.0);
    }

    #[test]
    fn test_minimum_height_tallest_card() {
        let config = CanvasConfig {
            min_height: 0.0,
            ..CanvasConfig::default()
        };
        let cards = [CardSpec::new("big").with_size(CardSizeVariant::Large)];
        // 2 * 308 + 64 beats the single stacked card (308 + 64)
        assert_eq!(estimate_minimum_height(&cards, &config), 680.0);
    }

    #[test]
    fn test_dynamic_height() {
        let config = CanvasConfig::default();
        let cards = [CardSpec::new("a"), CardSpec::new("b")];
        assert_eq!(dynamic_height(&[], &cards, &config), None);

        let placements = [
            CardPlacement::new("a", Position::new(0.0, 100.0)),
            CardPlacement::new("b", Position::new(300.0, 600.0)),
        ];
        // 600 + 220 + 40
        assert_eq!(dynamic_height(&placements, &cards, &config), Some(860.0));

        let low = [CardPlacement::new("a", Position::new(0.0, 10.0))];
        // 10 + 220 + 40 = 270 is under the 528 stacked estimate
        assert_eq!(dynamic_height(&low, &cards, &config), Some(528.0));
    }

    #[test]
    fn test_dynamic_height_ignores_unknown_cards() {
        let config = CanvasConfig::default();
        let cards = [CardSpec::new("a")];
        let placements = [CardPlacement::new("ghost", Position::new(0.0, 5000.0))];
        assert_eq!(dynamic_height(&placements, &cards, &config), None);
    }
}
