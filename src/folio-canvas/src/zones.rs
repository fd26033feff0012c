// Copyright 2026 The Folio Canvas Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use serde::Serialize;
use smallvec::SmallVec;

use crate::card::{CardSpec, Category};
use crate::config::CanvasConfig;

/// A horizontal band of the container reserved for one category.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Zone {
    pub category: Category,
    pub top: f64,
    pub height: f64,
}

impl Zone {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// One zone per category, in [`Category::ALL`] order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Zones(SmallVec<[Zone; 5]>);

impl Zones {
    pub fn get(&self, category: Category) -> Option<&Zone> {
        self.0.iter().find(|zone| zone.category == category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total_height(&self) -> f64 {
        self.0.iter().map(|zone| zone.height).sum()
    }
}

/// Partition `container_height` into stacked per-category bands.
///
/// Each band is proportional to its category's share of the cards, clamped
/// to `[zone_min_fraction, zone_max_fraction]` of the container. Categories
/// without cards still get the minimum band. If the clamped bands overflow
/// the container they are all scaled down by the same factor. Cards without
/// a category count toward the total but toward no band.
pub fn compute_zones(cards: &[CardSpec], container_height: f64, config: &CanvasConfig) -> Zones {
    let height = if container_height.is_finite() {
        container_height.max(0.0)
    } else {
        0.0
    };

    let mut counts = [0usize; Category::ALL.len()];
    for category in cards.iter().filter_map(|card| card.category) {
        counts[category.index()] += 1;
    }
    let total = cards.len().max(1) as f64;

    let min_height = height * config.zone_min_fraction;
    let max_height = height * config.zone_max_fraction;

    let mut heights: SmallVec<[f64; 5]> = counts
        .iter()
        .map(|&count| (height * count as f64 / total).max(min_height).min(max_height))
        .collect();

    let stacked: f64 = heights.iter().sum();
    if stacked > height && stacked > 0.0 {
        let scale = height / stacked;
        for h in heights.iter_mut() {
            *h *= scale;
        }
    }

    let mut top = 0.0;
    let zones = Category::ALL
        .iter()
        .zip(heights)
        .map(|(&category, height)| {
            let zone = Zone {
                category,
                top,
                height,
            };
            top += height;
            zone
        })
        .collect();

    Zones(zones)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    fn cards_with_counts(counts: &[usize]) -> Vec<CardSpec> {
        let mut cards = Vec::new();
        for (category, &count) in Category::ALL.iter().zip(counts) {
            for i in 0..count {
                cards.push(CardSpec::new(format!("{category:?}-{i}")).with_category(*category));
            }
        }
        cards
    }

    #[test]
    fn test_zones_skewed_population() {
        let cards = cards_with_counts(&[2, 0, 0, 0, 6]);
        let zones = compute_zones(&cards, 600.0, &CanvasConfig::default());

        let heights: Vec<f64> = zones.iter().map(|z| z.height).collect();
        let expected = [150.0, 90.0, 90.0, 90.0, 180.0];
        for (got, want) in heights.iter().zip(expected) {
            assert!(approx_eq!(f64, *got, want, epsilon = 1e-9), "{heights:?}");
        }

        let tops: Vec<f64> = zones.iter().map(|z| z.top).collect();
        let expected_tops = [0.0, 150.0, 240.0, 330.0, 420.0];
        for (got, want) in tops.iter().zip(expected_tops) {
            assert!(approx_eq!(f64, *got, want, epsilon = 1e-9), "{tops:?}");
        }

        assert!(zones.total_height() <= 600.0 + 1e-9);
    }

    #[test]
    fn test_zones_rescale_when_overflowing() {
        // two capped bands plus three floors: 180 + 180 + 3 * 90 = 630 > 600
        let cards = cards_with_counts(&[10, 10, 0, 0, 0]);
        let zones = compute_zones(&cards, 600.0, &CanvasConfig::default());
        assert_eq!(zones.len(), 5);

        let scale = 600.0 / 630.0;
        let expected = [180.0, 180.0, 90.0, 90.0, 90.0];
        let mut top = 0.0;
        for (zone, want) in zones.iter().zip(expected) {
            assert!(approx_eq!(f64, zone.height, want * scale, epsilon = 1e-9));
            assert!(approx_eq!(f64, zone.top, top, epsilon = 1e-9));
            top += want * scale;
        }
        assert!(approx_eq!(f64, zones.total_height(), 600.0, epsilon = 1e-9));
    }

    #[test]
    fn test_zones_even_spread_fits_exactly() {
        let cards = cards_with_counts(&[1, 1, 1, 1, 1]);
        let zones = compute_zones(&cards, 600.0, &CanvasConfig::default());
        for zone in zones.iter() {
            assert!(approx_eq!(f64, zone.height, 120.0, epsilon = 1e-9));
        }
    }

    #[test]
    fn test_zones_empty_card_list() {
        let zones = compute_zones(&[], 1000.0, &CanvasConfig::default());
        assert_eq!(zones.len(), Category::ALL.len());
        for zone in zones.iter() {
            assert!(approx_eq!(f64, zone.height, 150.0, epsilon = 1e-9));
        }
    }

    #[test]
    fn test_zones_degenerate_height() {
        let cards = cards_with_counts(&[3, 1]);
        for height in [0.0, -50.0, f64::NAN] {
            let zones = compute_zones(&cards, height, &CanvasConfig::default());
            assert_eq!(zones.len(), 5);
            assert!(zones.iter().all(|z| z.height == 0.0 && z.top == 0.0));
        }
    }

    #[test]
    fn test_zones_lookup() {
        let cards = cards_with_counts(&[0, 4]);
        let zones = compute_zones(&cards, 1000.0, &CanvasConfig::default());
        let backend = zones.get(Category::Backend).expect("backend zone");
        assert!(approx_eq!(f64, backend.top, 150.0, epsilon = 1e-9));
        assert!(approx_eq!(f64, backend.bottom(), 450.0, epsilon = 1e-9));
    }

    proptest! {
        #[test]
        fn prop_zones_fit_container(
            counts in prop::collection::vec(0usize..20, 5),
            uncategorized in 0usize..10,
            height in 0.0f64..5000.0,
        ) {
            let mut cards = cards_with_counts(&counts);
            for i in 0..uncategorized {
                cards.push(CardSpec::new(format!("loose-{i}")));
            }
            let zones = compute_zones(&cards, height, &CanvasConfig::default());
            prop_assert!(zones.total_height() <= height + 1e-6);
            let mut expected_top = 0.0;
            for zone in zones.iter() {
                prop_assert!((zone.top - expected_top).abs() < 1e-6);
                expected_top += zone.height;
            }
        }
    }
}
