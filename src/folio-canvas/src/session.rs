// Copyright 2026 The Folio Canvas Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The live layout of one canvas.
//!
//! A [`CardCanvas`] owns the container measurement, the authored card list
//! and the pixel placement of every card. Observation calls
//! (`observe_container`, `observe_viewport`, `set_cards`) derive a pass key
//! from everything that influences layout; when the key changes a placement
//! pass re-resolves every card that is not being dragged, in card order, so
//! each card sees the cards before it as obstacles.
//!
//! Drags are a two-message protocol. `drag_start` freezes one card;
//! `drag_end` commits the clamped delta, converts it to a normalized
//! position and hands a [`PositionChanged`] to every subscribed sink.

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::breakpoint::{
    Breakpoint, BreakpointScale, DeviceTier, resolve_breakpoint, resolve_position_for_card,
};
use crate::card::{CardSpec, PartialPosition};
use crate::config::CanvasConfig;
use crate::geometry::{
    CardFootprint, Position, Rect, Size, max_travel, normalized_to_pixel, pixel_to_normalized,
};
use crate::height::{dynamic_height, estimate_minimum_height};
use crate::placement::{CardPlacement, place_card};
use crate::zones::{Zones, compute_zones};

/// Emitted for every committed position, for the persistence collaborator.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionChanged {
    pub card_id: String,
    pub normalized_x: f64,
    pub normalized_y: f64,
    /// Key of the breakpoint the position was committed for.
    pub breakpoint: String,
    pub pixel_x: f64,
    pub pixel_y: f64,
}

/// Receiver of committed positions. Implemented for any
/// `FnMut(&PositionChanged)`.
pub trait PositionSink {
    fn position_changed(&mut self, event: &PositionChanged);
}

impl<F: FnMut(&PositionChanged)> PositionSink for F {
    fn position_changed(&mut self, event: &PositionChanged) {
        self(event)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayoutMode {
    /// Unpositioned cards may land anywhere in the container.
    FreeForm,
    /// Unpositioned cards are confined to their category's zone.
    Zoned,
}

#[cfg_attr(feature = "debug-derive", derive(Debug))]
struct ActiveDrag {
    card_id: String,
    /// Set when a pass ran while the card was frozen, leaving its placement
    /// derived from an older container.
    stale: bool,
}

/// Free-form canvas on the seven-tier breakpoint scale.
pub type FreeFormCanvas = CardCanvas<Breakpoint>;
/// Zoned canvas on the three-tier device scale.
pub type CategoryCanvas = CardCanvas<DeviceTier>;

pub struct CardCanvas<B: BreakpointScale> {
    config: CanvasConfig,
    mode: LayoutMode,

    cards: Vec<CardSpec>,
    container: Size,
    /// Width used for breakpoint resolution; falls back to the container.
    viewport_width: Option<f64>,

    placements: HashMap<String, Position>,
    zones: Zones,
    drag: Option<ActiveDrag>,
    /// Key of the inputs the current placements were derived from.
    pass_key: Option<u64>,

    rng: StdRng,
    sinks: Vec<Box<dyn PositionSink>>,
    _scale: PhantomData<B>,
}

impl<B: BreakpointScale> CardCanvas<B> {
    pub fn new(config: CanvasConfig, mode: LayoutMode) -> Self {
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            config,
            mode,
            cards: Vec::new(),
            container: Size::default(),
            viewport_width: None,
            placements: HashMap::new(),
            zones: Zones::default(),
            drag: None,
            pass_key: None,
            rng,
            sinks: Vec::new(),
            _scale: PhantomData,
        }
    }

    pub fn free_form(config: CanvasConfig) -> Self {
        Self::new(config, LayoutMode::FreeForm)
    }

    pub fn zoned(config: CanvasConfig) -> Self {
        Self::new(config, LayoutMode::Zoned)
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn cards(&self) -> &[CardSpec] {
        &self.cards
    }

    pub fn container(&self) -> Size {
        self.container
    }

    pub fn breakpoint(&self) -> B {
        resolve_breakpoint(self.viewport_width.unwrap_or(self.container.width))
    }

    /// Zones from the latest pass. Empty on the free-form canvas.
    pub fn zones(&self) -> &Zones {
        &self.zones
    }

    /// Id of the card currently being dragged.
    pub fn dragging(&self) -> Option<&str> {
        self.drag.as_ref().map(|drag| drag.card_id.as_str())
    }

    pub fn placement(&self, card_id: &str) -> Option<Position> {
        self.placements.get(card_id).copied()
    }

    /// Current pixel placements in card order.
    pub fn placements(&self) -> Vec<CardPlacement> {
        self.cards
            .iter()
            .filter_map(|card| {
                let pos = self.placements.get(&card.id)?;
                Some(CardPlacement::new(card.id.clone(), *pos))
            })
            .collect()
    }

    /// Height the container should have: enough for every placed card, or
    /// the pre-measurement estimate when nothing is placed yet.
    pub fn container_height(&self) -> f64 {
        dynamic_height(&self.placements(), &self.cards, &self.config)
            .unwrap_or_else(|| estimate_minimum_height(&self.cards, &self.config))
    }

    pub fn subscribe<S: PositionSink + 'static>(&mut self, sink: S) {
        self.sinks.push(Box::new(sink));
    }

    /// Replace the authored card list. Cards that disappeared lose their
    /// placement, and an in-flight drag of a removed card is dropped.
    pub fn set_cards(&mut self, cards: Vec<CardSpec>) {
        self.cards = cards;
        {
            let ids: HashSet<&str> = self.cards.iter().map(|c| c.id.as_str()).collect();
            self.placements.retain(|id, _| ids.contains(id.as_str()));
            if self
                .drag
                .as_ref()
                .is_some_and(|drag| !ids.contains(drag.card_id.as_str()))
            {
                tracing::debug!("dragged card removed from canvas, dropping drag");
                self.drag = None;
            }
        }
        self.refresh();
    }

    /// Record a new container measurement. Placement is suppressed until
    /// both dimensions are positive.
    pub fn observe_container(&mut self, size: Size) {
        self.container = size;
        self.refresh();
    }

    /// Record the viewport width used to pick the breakpoint.
    pub fn observe_viewport(&mut self, width: f64) {
        self.viewport_width = Some(width);
        self.refresh();
    }

    /// Run a placement pass even if no input changed.
    pub fn recompute(&mut self) {
        if !self.container.is_measurable() {
            return;
        }
        self.run_pass();
        self.pass_key = Some(self.compute_pass_key());
    }

    /// Mark `card_id` as dragging. Returns false, changing nothing, if the
    /// card is not placed or another drag is already active.
    pub fn drag_start(&mut self, card_id: &str) -> bool {
        if let Some(active) = &self.drag {
            tracing::warn!(
                card = card_id,
                active = %active.card_id,
                "drag start ignored, another card is being dragged"
            );
            return false;
        }
        if !self.placements.contains_key(card_id) {
            tracing::warn!(card = card_id, "drag start ignored, card is not placed");
            return false;
        }
        self.drag = Some(ActiveDrag {
            card_id: card_id.to_string(),
            stale: false,
        });
        true
    }

    /// Leave the dragging state without moving the card. If passes ran
    /// during the drag the card is re-derived for the current container.
    pub fn drag_cancel(&mut self, card_id: &str) -> bool {
        if self.dragging() != Some(card_id) {
            return false;
        }
        if self.drag.take().is_some_and(|drag| drag.stale) {
            self.pass_key = None;
            self.refresh();
        }
        true
    }

    /// Commit a drag: move the card by `delta` (measured from drag start),
    /// clamp it into the container, and emit the normalized result.
    ///
    /// Only this card is re-derived; no placement pass runs. Returns `None`
    /// without a matching `drag_start`, and ends the drag without committing
    /// while the container has no area.
    pub fn drag_end(&mut self, card_id: &str, delta: Position) -> Option<PositionChanged> {
        if self.dragging() != Some(card_id) {
            tracing::warn!(card = card_id, "drag end ignored, no matching drag start");
            return None;
        }
        self.drag = None;

        if !self.container.is_measurable() {
            tracing::warn!(
                card = card_id,
                container = ?self.container,
                "drag end ignored, container not measured"
            );
            return None;
        }

        let Some(card) = self.cards.iter().find(|c| c.id == card_id) else {
            tracing::warn!(card = card_id, "drag end ignored, unknown card");
            return None;
        };
        let footprint = card.footprint();
        let Some(origin) = self.placements.get(card_id).copied() else {
            tracing::warn!(card = card_id, "drag end ignored, card is not placed");
            return None;
        };

        let delta = Position::new(finite_or_zero(delta.x), finite_or_zero(delta.y));
        let target = self.clamp_to_container(origin + delta, &footprint);
        let event = self.commit(card_id, target, &footprint);
        self.emit(&event);
        Some(event)
    }

    /// Commit and emit the current position of every placed card, in card
    /// order. Committed positions become the cards' authored positions for
    /// the current breakpoint, so later passes keep them in place.
    pub fn save_all(&mut self) -> Vec<PositionChanged> {
        if !self.container.is_measurable() {
            tracing::warn!(container = ?self.container, "save ignored, container not measured");
            return Vec::new();
        }
        let placed: Vec<(String, Position, CardFootprint)> = self
            .cards
            .iter()
            .filter_map(|card| {
                let pos = self.placements.get(&card.id)?;
                Some((card.id.clone(), *pos, card.footprint()))
            })
            .collect();

        let events: Vec<PositionChanged> = placed
            .into_iter()
            .map(|(id, pos, footprint)| self.commit(&id, pos, &footprint))
            .collect();
        for event in &events {
            self.emit(event);
        }
        events
    }

    fn clamp_to_container(&self, pos: Position, footprint: &CardFootprint) -> Position {
        Position::new(
            pos.x
                .clamp(0.0, max_travel(self.container.width, footprint.width)),
            pos.y
                .clamp(0.0, max_travel(self.container.height, footprint.height)),
        )
    }

    /// Store `pixel` as the card's placement via its normalized form and
    /// record it as the authored position for the current breakpoint.
    fn commit(
        &mut self,
        card_id: &str,
        pixel: Position,
        footprint: &CardFootprint,
    ) -> PositionChanged {
        let Size { width, height } = self.container;
        let normalized_x = pixel_to_normalized(pixel.x, width, footprint.width);
        let normalized_y = pixel_to_normalized(pixel.y, height, footprint.height);
        let committed = Position::new(
            normalized_to_pixel(Some(normalized_x), width, footprint.width),
            normalized_to_pixel(Some(normalized_y), height, footprint.height),
        );
        self.placements.insert(card_id.to_string(), committed);

        let breakpoint = self.breakpoint();
        if let Some(card) = self.cards.iter_mut().find(|c| c.id == card_id) {
            card.positions.insert(
                breakpoint.key().to_string(),
                PartialPosition::new(normalized_x, normalized_y),
            );
        }
        // the committed card already sits where its new authored position
        // resolves to, so the recorded key stays in sync without a pass
        if self.container.is_measurable() && self.pass_key.is_some() {
            self.pass_key = Some(self.compute_pass_key());
        }

        tracing::debug!(
            card = card_id,
            %breakpoint,
            normalized_x,
            normalized_y,
            "committed position"
        );

        PositionChanged {
            card_id: card_id.to_string(),
            normalized_x,
            normalized_y,
            breakpoint: breakpoint.key().to_string(),
            pixel_x: committed.x,
            pixel_y: committed.y,
        }
    }

    fn emit(&mut self, event: &PositionChanged) {
        for sink in self.sinks.iter_mut() {
            sink.position_changed(event);
        }
    }

    fn refresh(&mut self) {
        if !self.container.is_measurable() {
            tracing::trace!(container = ?self.container, "container not measured, skipping pass");
            return;
        }
        let key = self.compute_pass_key();
        if self.pass_key == Some(key) {
            return;
        }
        self.run_pass();
        self.pass_key = Some(key);
    }

    fn compute_pass_key(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.mode.hash(&mut hasher);
        for card in &self.cards {
            card.id.hash(&mut hasher);
            card.size.hash(&mut hasher);
            card.category.hash(&mut hasher);
            for (key, pos) in &card.positions {
                key.hash(&mut hasher);
                pos.x.map(f64::to_bits).hash(&mut hasher);
                pos.y.map(f64::to_bits).hash(&mut hasher);
            }
        }
        self.container.width.to_bits().hash(&mut hasher);
        self.container.height.to_bits().hash(&mut hasher);
        self.breakpoint().hash(&mut hasher);
        hasher.finish()
    }

    fn run_pass(&mut self) {
        let breakpoint = self.breakpoint();
        let container = self.container;
        tracing::debug!(
            cards = self.cards.len(),
            %breakpoint,
            width = container.width,
            height = container.height,
            "running placement pass"
        );

        self.zones = match self.mode {
            LayoutMode::Zoned => compute_zones(&self.cards, container.height, &self.config),
            LayoutMode::FreeForm => Zones::default(),
        };

        let dragging = self.drag.as_ref().map(|drag| drag.card_id.as_str());
        let mut resolved: Vec<Rect> = Vec::with_capacity(self.cards.len());
        let mut next: HashMap<String, Position> = HashMap::with_capacity(self.cards.len());

        for card in &self.cards {
            let footprint = card.footprint();
            let previous = self.placements.get(&card.id).copied();

            if dragging == Some(card.id.as_str()) {
                // frozen at its pre-drag placement, still an obstacle
                if let Some(pos) = previous {
                    resolved.push(Rect::at(pos, &footprint));
                    next.insert(card.id.clone(), pos);
                }
                continue;
            }

            let authored = resolve_position_for_card(card, breakpoint);
            let position = if authored.is_defined() {
                let last = previous.unwrap_or_default();
                let x = match authored.x {
                    Some(_) => normalized_to_pixel(authored.x, container.width, footprint.width),
                    None => last
                        .x
                        .clamp(0.0, max_travel(container.width, footprint.width)),
                };
                let y = match authored.y {
                    Some(_) => normalized_to_pixel(authored.y, container.height, footprint.height),
                    None => last
                        .y
                        .clamp(0.0, max_travel(container.height, footprint.height)),
                };
                Position::new(x, y)
            } else {
                let zone = match self.mode {
                    LayoutMode::Zoned => card.category.and_then(|c| self.zones.get(c)),
                    LayoutMode::FreeForm => None,
                };
                place_card(
                    &mut self.rng,
                    container,
                    &footprint,
                    &resolved,
                    zone,
                    self.config.collision_padding,
                    self.config.max_placement_attempts,
                )
                .position()
            };

            resolved.push(Rect::at(position, &footprint));
            next.insert(card.id.clone(), position);
        }

        self.placements = next;
        if let Some(drag) = self.drag.as_mut() {
            drag.stale = true;
        }
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
