// Copyright 2026 The Folio Canvas Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::{CardFootprint, Position, Rect, Size, boxes_collide, max_travel};
use crate::zones::Zone;

/// The resolved on-screen position of one card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPlacement {
    pub card_id: String,
    pub x: f64,
    pub y: f64,
}

impl CardPlacement {
    pub fn new(card_id: impl Into<String>, position: Position) -> Self {
        Self {
            card_id: card_id.into(),
            x: position.x,
            y: position.y,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// How `place_card` arrived at a position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    /// A random sample that clears every existing box.
    Sampled(Position),
    /// Every sample collided; stacked under the lowest existing box.
    Stacked(Position),
    /// The container has no area yet.
    Degenerate,
}

impl Placement {
    pub fn position(self) -> Position {
        match self {
            Placement::Sampled(pos) | Placement::Stacked(pos) => pos,
            Placement::Degenerate => Position::default(),
        }
    }
}

/// The region a card's top-left corner may occupy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LegalRegion {
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl LegalRegion {
    /// Full container travel, optionally narrowed vertically to `zone`.
    ///
    /// Both zone bounds are clamped into the container travel so the result
    /// is always in bounds; if the card is taller than the zone the range
    /// collapses to the zone top.
    pub fn new(container: Size, footprint: &CardFootprint, zone: Option<&Zone>) -> Self {
        let max_x = max_travel(container.width, footprint.width);
        let travel_y = max_travel(container.height, footprint.height);
        let (min_y, max_y) = match zone {
            None => (0.0, travel_y),
            Some(zone) => {
                let min_y = zone.top.clamp(0.0, travel_y);
                let max_y = (zone.top + zone.height - footprint.height).clamp(0.0, travel_y);
                (min_y, max_y.max(min_y))
            }
        };
        Self {
            max_x,
            min_y,
            max_y,
        }
    }

    fn sample<R: Rng>(&self, rng: &mut R) -> Position {
        Position::new(
            sample_between(rng, 0.0, self.max_x),
            sample_between(rng, self.min_y, self.max_y),
        )
    }
}

fn sample_between<R: Rng>(rng: &mut R, low: f64, high: f64) -> f64 {
    if high <= low {
        low
    } else {
        rng.random_range(low..=high)
    }
}

/// Find a position for `footprint` that avoids every box in `existing`.
///
/// Tries up to `max_attempts` uniform samples inside the legal region
/// (the whole container, or the vertical band of `zone`). When all of them
/// collide the card is stacked at `x = 0` just below the lowest existing
/// box, clamped to the region. A container without area short-circuits to
/// the origin.
pub fn place_card<R: Rng>(
    rng: &mut R,
    container: Size,
    footprint: &CardFootprint,
    existing: &[Rect],
    zone: Option<&Zone>,
    padding: f64,
    max_attempts: usize,
) -> Placement {
    if !container.is_measurable() {
        return Placement::Degenerate;
    }

    let region = LegalRegion::new(container, footprint, zone);

    for attempt in 0..max_attempts {
        let candidate = region.sample(rng);
        let rect = Rect::at(candidate, footprint);
        if !existing.iter().any(|other| boxes_collide(&rect, other, padding)) {
            tracing::trace!(card = %footprint.id, attempt, ?candidate, "sampled placement");
            return Placement::Sampled(candidate);
        }
    }

    let y = existing
        .iter()
        .map(Rect::bottom)
        .reduce(f64::max)
        .map_or(region.min_y, |bottom| bottom + padding)
        .clamp(region.min_y, region.max_y);
    let stacked = Position::new(0.0, y);
    tracing::trace!(
        card = %footprint.id,
        max_attempts,
        ?stacked,
        "placement attempts exhausted, stacking"
    );
    Placement::Stacked(stacked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardSizeVariant, Category};
    use crate::geometry::footprint_for;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn medium(id: &str) -> CardFootprint {
        footprint_for(id, Some(CardSizeVariant::Medium))
    }

    #[test]
    fn test_single_card_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let container = Size::new(1000.0, 600.0);
        for _ in 0..200 {
            let pos = place_card(&mut rng, container, &medium("a"), &[], None, 20.0, 100);
            let Placement::Sampled(pos) = pos else {
                panic!("empty canvas should always sample, got {pos:?}");
            };
            assert!((0.0..=800.0).contains(&pos.x), "x out of range: {pos:?}");
            assert!((0.0..=380.0).contains(&pos.y), "y out of range: {pos:?}");
        }
    }

    #[test]
    fn test_degenerate_container() {
        let mut rng = StdRng::seed_from_u64(1);
        for size in [
            Size::new(0.0, 0.0),
            Size::new(1000.0, 0.0),
            Size::new(-5.0, 600.0),
            Size::new(f64::NAN, 600.0),
        ] {
            let placed = place_card(&mut rng, size, &medium("a"), &[], None, 20.0, 100);
            assert_eq!(placed, Placement::Degenerate);
            assert_eq!(placed.position(), Position::new(0.0, 0.0));
        }
    }

    #[test]
    fn test_fallback_stacks_below_existing() {
        let mut rng = StdRng::seed_from_u64(7);
        let container = Size::new(1000.0, 2000.0);
        // fill the whole width of the top band so nothing fits in it
        let existing = [
            Rect::new(0.0, 0.0, 1000.0, 300.0),
            Rect::new(0.0, 300.0, 1000.0, 200.0),
        ];
        let placed = place_card(&mut rng, container, &medium("a"), &existing, None, 20.0, 0);
        assert_eq!(placed, Placement::Stacked(Position::new(0.0, 520.0)));
    }

    #[test]
    fn test_fallback_clamps_to_legal_max() {
        let mut rng = StdRng::seed_from_u64(7);
        let container = Size::new(400.0, 400.0);
        let existing = [Rect::new(0.0, 0.0, 400.0, 400.0)];
        let placed = place_card(&mut rng, container, &medium("a"), &existing, None, 20.0, 50);
        assert_eq!(placed, Placement::Stacked(Position::new(0.0, 180.0)));
    }

    #[test]
    fn test_fallback_without_existing_uses_zone_top() {
        let mut rng = StdRng::seed_from_u64(7);
        let zone = Zone {
            category: Category::Database,
            top: 300.0,
            height: 250.0,
        };
        let placed = place_card(
            &mut rng,
            Size::new(1000.0, 1000.0),
            &medium("a"),
            &[],
            Some(&zone),
            20.0,
            0,
        );
        assert_eq!(placed, Placement::Stacked(Position::new(0.0, 300.0)));
    }

    #[test]
    fn test_zone_constrains_y() {
        let mut rng = StdRng::seed_from_u64(99);
        let zone = Zone {
            category: Category::Backend,
            top: 200.0,
            height: 300.0,
        };
        for _ in 0..100 {
            let pos = place_card(
                &mut rng,
                Size::new(1200.0, 1000.0),
                &medium("a"),
                &[],
                Some(&zone),
                20.0,
                100,
            )
            .position();
            assert!(pos.y >= 200.0 && pos.y <= 280.0, "y outside zone: {pos:?}");
        }
    }

    #[test]
    fn test_zone_shorter_than_card_collapses_to_top() {
        let zone = Zone {
            category: Category::Tools,
            top: 100.0,
            height: 90.0,
        };
        let region = LegalRegion::new(Size::new(1000.0, 600.0), &medium("a"), Some(&zone));
        assert_eq!(region.min_y, 100.0);
        assert_eq!(region.max_y, 100.0);

        // zone hanging off the bottom of the container is pulled back in
        let zone = Zone {
            category: Category::Tools,
            top: 550.0,
            height: 200.0,
        };
        let region = LegalRegion::new(Size::new(1000.0, 600.0), &medium("a"), Some(&zone));
        assert_eq!(region.min_y, 380.0);
        assert_eq!(region.max_y, 380.0);
    }

    #[test]
    fn test_card_wider_than_container() {
        let mut rng = StdRng::seed_from_u64(3);
        let big = footprint_for("big", Some(CardSizeVariant::Large));
        let pos = place_card(&mut rng, Size::new(200.0, 900.0), &big, &[], None, 20.0, 100)
            .position();
        assert_eq!(pos.x, 0.0);
    }

    #[test]
    fn test_seeded_placement_is_deterministic() {
        let existing = [Rect::new(100.0, 100.0, 200.0, 220.0)];
        let a = place_card(
            &mut StdRng::seed_from_u64(5),
            Size::new(1000.0, 800.0),
            &medium("a"),
            &existing,
            None,
            20.0,
            100,
        );
        let b = place_card(
            &mut StdRng::seed_from_u64(5),
            Size::new(1000.0, 800.0),
            &medium("a"),
            &existing,
            None,
            20.0,
            100,
        );
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_sampled_never_collides(
            seed in any::<u64>(),
            width in 400.0f64..2000.0,
            height in 400.0f64..2000.0,
            obstacles in prop::collection::vec((0.0f64..1.0, 0.0f64..1.0), 0..6),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let container = Size::new(width, height);
            let existing: Vec<Rect> = obstacles
                .iter()
                .map(|&(fx, fy)| Rect::new(fx * (width - 150.0), fy * (height - 165.0), 150.0, 165.0))
                .collect();
            let fp = medium("p");
            match place_card(&mut rng, container, &fp, &existing, None, 20.0, 100) {
                Placement::Sampled(pos) => {
                    let rect = Rect::at(pos, &fp);
                    for other in &existing {
                        prop_assert!(!boxes_collide(&rect, other, 20.0));
                    }
                    prop_assert!(pos.x >= 0.0 && pos.x <= width - fp.width);
                    prop_assert!(pos.y >= 0.0 && pos.y <= height - fp.height);
                }
                Placement::Stacked(pos) => {
                    prop_assert_eq!(pos.x, 0.0);
                    prop_assert!(pos.y >= 0.0 && pos.y <= height - fp.height);
                }
                Placement::Degenerate => prop_assert!(false, "measurable container"),
            }
        }
    }
}
