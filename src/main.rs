//! `polymask`: load a mask against a headless canvas and print a summary.

use std::sync::{Arc, Mutex, PoisonError};

use clap::Parser;
use serde::Serialize;
use tracing::info;

use polymask::{Dimension, MaskConfig, MaskController, MaskError, MaskHost, MaskPhase, Point, RuntimeConfig};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Mask(#[from] MaskError),
    #[error("failed to encode summary: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "polymask", about = "Polygon mask loader and placement preview")]
struct Cli {
    /// Path to a JSON mask options file.
    #[arg(long, env = "POLYMASK_CONFIG")]
    config: String,

    #[arg(long, default_value_t = 800.0)]
    width: f64,

    #[arg(long, default_value_t = 600.0)]
    height: f64,

    #[arg(long, default_value_t = 1.0)]
    pixel_ratio: f64,

    /// Particles to place when the mask does not spawn its own.
    #[arg(long, default_value_t = 10)]
    count: usize,
}

/// Fixed-size canvas that just records spawned particles.
struct HeadlessHost {
    canvas: Dimension,
    pixel_ratio: f64,
    target: usize,
    particles: Mutex<Vec<Point>>,
}

impl HeadlessHost {
    fn particles(&self) -> Vec<Point> {
        self.particles.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl MaskHost for HeadlessHost {
    fn canvas_size(&self) -> Dimension {
        self.canvas
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn particle_count(&self) -> usize {
        self.particles.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn target_particle_count(&self) -> usize {
        self.target
    }

    fn spawn_particle(&self, position: Point) {
        self.particles.lock().unwrap_or_else(PoisonError::into_inner).push(position);
    }

    fn redraw_all(&self) {}

    fn mask_loaded(&self) {
        info!("mask ready");
    }
}

#[derive(Serialize)]
struct Summary {
    phase: MaskPhase,
    vertices: usize,
    offset: Option<Point>,
    dimension: Option<Dimension>,
    scale: Option<f64>,
    /// Outline extent as `[min, max]`.
    bounds: Option<(Point, Point)>,
    particles: Vec<Point>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let raw = tokio::fs::read_to_string(&cli.config).await?;
    let config = MaskConfig::from_json(&raw)?;

    let host = Arc::new(HeadlessHost {
        canvas: Dimension::new(cli.width, cli.height),
        pixel_ratio: cli.pixel_ratio,
        target: cli.count,
        particles: Mutex::new(Vec::new()),
    });
    let controller = MaskController::with_http(host.clone(), RuntimeConfig::from_env())?;
    controller.init(Some(config)).await?;

    if !controller.particles_initialization() {
        while host.particle_count() < cli.count {
            let Some(position) = controller.particle_position(None)? else {
                break;
            };
            host.spawn_particle(position);
        }
    }

    let loaded = controller.loaded();
    let summary = Summary {
        phase: controller.phase(),
        vertices: loaded.as_ref().map_or(0, |m| m.polygon().len()),
        offset: loaded.as_ref().map(|m| m.offset()),
        dimension: loaded.as_ref().map(|m| m.dimension()),
        scale: loaded.as_ref().map(|m| m.scale()),
        bounds: loaded.as_ref().and_then(|m| m.polygon().bounds()),
        particles: host.particles(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
