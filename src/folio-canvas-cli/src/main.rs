// Copyright 2026 The Folio Canvas Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use folio_canvas::height::estimate_minimum_height;
use folio_canvas::{
    BreakpointScale, CanvasConfig, CardCanvas, CardPlacement, CardSpec, CategoryCanvas,
    FreeFormCanvas, Size, Zones, cards_from_json, compute_zones,
};

/// Lay out card canvases from the command line.
#[derive(Parser, Debug)]
#[command(name = "folio-canvas", version, about)]
struct Cli {
    /// JSON file holding canvas configuration overrides.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve or auto-place every card and print the placements.
    Place {
        /// Card list JSON; `-` reads stdin.
        #[arg(default_value = "-")]
        cards: PathBuf,
        #[arg(long)]
        width: f64,
        #[arg(long)]
        height: f64,
        /// Viewport width for breakpoint selection (defaults to --width).
        #[arg(long)]
        viewport: Option<f64>,
        #[arg(long, value_enum, default_value_t = CanvasKind::FreeForm)]
        canvas: CanvasKind,
        /// Seed for auto-placement, for reproducible output.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the category zones for a container height.
    Zones {
        #[arg(default_value = "-")]
        cards: PathBuf,
        #[arg(long)]
        height: f64,
    },
    /// Print the container height to reserve before measurement.
    Height {
        #[arg(default_value = "-")]
        cards: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CanvasKind {
    /// Seven breakpoints, no zones.
    FreeForm,
    /// Three device tiers, one zone per category.
    Category,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlaceOutput<B: Serialize> {
    breakpoint: B,
    container_height: f64,
    placements: Vec<CardPlacement>,
    #[serde(skip_serializing_if = "Zones::is_empty")]
    zones: Zones,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HeightOutput {
    minimum_height: f64,
}

fn read_input(path: &PathBuf) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read cards from stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

fn load_cards(path: &PathBuf) -> Result<Vec<CardSpec>> {
    let json = read_input(path)?;
    cards_from_json(&json).with_context(|| format!("invalid card list in {}", path.display()))
}

fn load_config(path: Option<&PathBuf>) -> Result<CanvasConfig> {
    let Some(path) = path else {
        return Ok(CanvasConfig::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    CanvasConfig::from_json(&json).with_context(|| format!("invalid config {}", path.display()))
}

fn layout<B: BreakpointScale>(
    mut canvas: CardCanvas<B>,
    cards: Vec<CardSpec>,
    size: Size,
    viewport: Option<f64>,
) -> PlaceOutput<B> {
    if let Some(width) = viewport {
        canvas.observe_viewport(width);
    }
    canvas.set_cards(cards);
    canvas.observe_container(size);
    PlaceOutput {
        breakpoint: canvas.breakpoint(),
        container_height: canvas.container_height(),
        placements: canvas.placements(),
        zones: canvas.zones().clone(),
    }
}

fn write_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value).context("failed to encode output")?;
    writeln!(out)?;
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::Place {
            cards,
            width,
            height,
            viewport,
            canvas,
            seed,
        } => {
            if let Some(seed) = seed {
                config.random_seed = Some(seed);
            }
            let cards = load_cards(&cards)?;
            let size = Size::new(width, height);
            if !size.is_measurable() {
                tracing::warn!(width, height, "container has no area, nothing will be placed");
            }
            match canvas {
                CanvasKind::FreeForm => {
                    write_json(&layout(FreeFormCanvas::free_form(config), cards, size, viewport))
                }
                CanvasKind::Category => {
                    write_json(&layout(CategoryCanvas::zoned(config), cards, size, viewport))
                }
            }
        }
        Command::Zones { cards, height } => {
            let cards = load_cards(&cards)?;
            write_json(&compute_zones(&cards, height, &config))
        }
        Command::Height { cards } => {
            let cards = load_cards(&cards)?;
            write_json(&HeightOutput {
                minimum_height: estimate_minimum_height(&cards, &config),
            })
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
