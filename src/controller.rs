//! Mask controller: lifecycle, state, and the host-facing query surface.
//!
//! DESIGN
//! ======
//! `MaskController` is a cheap `Clone` handle around shared state, the same
//! shape as an application state handle injected into request handlers. The
//! state itself is an explicit sum type ([`MaskState`]) so every query
//! pattern-matches on "is anything loaded" instead of null-checking fields.
//!
//! The std mutex is only ever held for short synchronous sections. Loads
//! snapshot what they need, release the lock, await the fetch, then re-lock
//! to publish. Every load takes a fresh generation number; a load that
//! finishes after a newer load (or a `stop`) started is discarded, so a slow
//! stale fetch can never overwrite fresher geometry.
//!
//! Resize signals go through a [`Debouncer`]: only the last signal in the
//! quiescence window triggers a forced reload, and it reads the canvas size
//! at fire time.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::Rng;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::{MaskConfig, MaskType, RuntimeConfig};
use crate::debounce::Debouncer;
use crate::draw;
use crate::error::{ErrorCode, MaskError};
use crate::geometry::{Dimension, EdgeHit, Point, Polygon, distances, reflect_velocity};
use crate::host::{Direction, MaskCanvas, MaskHost, Particle};
use crate::loader::fetch::{HttpFetcher, SvgFetch};
use crate::loader::{MaskSource, PathDocument, PathLoader};
use crate::raster::{RasterParams, RasterizedMask, rasterize, sane_ratio};
use crate::sampler::{Sampler, satisfies};

// =============================================================================
// STATE
// =============================================================================

/// Geometry published by one successful load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedMask {
    raster: RasterizedMask,
    document: Arc<PathDocument>,
}

impl LoadedMask {
    /// Canvas-space outline used for containment and bounce.
    #[must_use]
    pub fn polygon(&self) -> &Polygon {
        &self.raster.polygon
    }

    #[must_use]
    pub fn offset(&self) -> Point {
        self.raster.offset
    }

    #[must_use]
    pub fn dimension(&self) -> Dimension {
        self.raster.dimension
    }

    /// Effective scale (configured scale over pixel ratio).
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.raster.scale
    }

    #[must_use]
    pub fn document(&self) -> &Arc<PathDocument> {
        &self.document
    }

    fn sampler(&self) -> Sampler<'_> {
        Sampler::new(&self.raster.polygon, &self.document, self.raster.scale, self.raster.offset)
    }
}

/// Lifecycle state. `Reloading` keeps serving the previous geometry.
#[derive(Debug, Clone, Default)]
pub enum MaskState {
    #[default]
    Unloaded,
    Loading,
    Ready(Arc<LoadedMask>),
    Reloading(Arc<LoadedMask>),
}

impl MaskState {
    fn loaded(&self) -> Option<&Arc<LoadedMask>> {
        match self {
            Self::Ready(mask) | Self::Reloading(mask) => Some(mask),
            Self::Unloaded | Self::Loading => None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> MaskPhase {
        match self {
            Self::Unloaded => MaskPhase::Unloaded,
            Self::Loading => MaskPhase::Loading,
            Self::Ready(_) => MaskPhase::Ready,
            Self::Reloading(_) => MaskPhase::Reloading,
        }
    }
}

/// Data-free view of [`MaskState`] for logging and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskPhase {
    Unloaded,
    Loading,
    Ready,
    Reloading,
}

struct MaskInner {
    config: Option<MaskConfig>,
    state: MaskState,
    cache: Option<Arc<PathDocument>>,
    generation: u64,
}

struct Shared {
    inner: Mutex<MaskInner>,
    host: Arc<dyn MaskHost>,
    loader: PathLoader,
    runtime: RuntimeConfig,
    debouncer: Debouncer,
}

/// Everything a load needs, captured under the lock.
struct LoadTicket {
    generation: u64,
    source: MaskSource,
    cached: Option<Arc<PathDocument>>,
    scale: f64,
    position: Point,
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Owns one polygon mask for one host.
#[derive(Clone)]
pub struct MaskController {
    shared: Arc<Shared>,
}

impl MaskController {
    #[must_use]
    pub fn new(host: Arc<dyn MaskHost>, fetcher: Arc<dyn SvgFetch>, runtime: RuntimeConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(MaskInner { config: None, state: MaskState::Unloaded, cache: None, generation: 0 }),
                host,
                loader: PathLoader::new(fetcher),
                runtime,
                debouncer: Debouncer::new(),
            }),
        }
    }

    /// Controller backed by a real HTTP fetcher.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn with_http(host: Arc<dyn MaskHost>, runtime: RuntimeConfig) -> Result<Self, MaskError> {
        let fetcher = HttpFetcher::new(&runtime)?;
        Ok(Self::new(host, Arc::new(fetcher), runtime))
    }

    fn lock(&self) -> MutexGuard<'_, MaskInner> {
        self.shared.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current config and loaded geometry, cloned out of the lock.
    fn snapshot(&self) -> (Option<MaskConfig>, Option<Arc<LoadedMask>>) {
        let inner = self.lock();
        (inner.config.clone(), inner.state.loaded().cloned())
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Adopt `config` and load the mask if it is enabled.
    ///
    /// A missing config is a silent no-op. A disabled mask stays unloaded.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::InvalidConfig`] for out-of-range options, or any
    /// load error (missing source, fetch failure, malformed geometry).
    pub async fn init(&self, config: Option<MaskConfig>) -> Result<(), MaskError> {
        let Some(config) = config else {
            debug!("no mask configuration; nothing to load");
            return Ok(());
        };
        config.validate()?;
        let enabled = config.enable;
        let mask_type = config.mask_type;
        {
            let mut inner = self.lock();
            if inner.config.as_ref().and_then(MaskConfig::source) != config.source() {
                // New source: the cached document and any in-flight load are stale.
                inner.cache = None;
                inner.generation += 1;
                debug!(generation = inner.generation, "mask source changed; cache cleared");
            }
            inner.config = Some(config);
        }

        if !enabled {
            debug!(?mask_type, "mask disabled; staying unloaded");
            return Ok(());
        }
        self.reload(false).await
    }

    /// Load (or reuse) the configured source and publish new geometry.
    ///
    /// With `force == false` a previously loaded document is reused; the
    /// outline and offset are still recomputed against the current canvas.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::ConfigurationMissing`] before `init`,
    /// [`MaskError::SourceMissing`] when neither `url` nor `data` is set, or
    /// the loader's and rasterizer's errors.
    pub async fn reload(&self, force: bool) -> Result<(), MaskError> {
        let ticket = self.begin_load()?;
        debug!(generation = ticket.generation, force, "mask load started");

        let document = match self.shared.loader.load(&ticket.source, ticket.cached, force).await {
            Ok(document) => document,
            Err(e) => return Err(self.fail_load(ticket.generation, e)),
        };

        let params = RasterParams {
            scale: ticket.scale,
            pixel_ratio: self.shared.host.pixel_ratio(),
            canvas: self.shared.host.canvas_size(),
            position: ticket.position,
        };
        let raster = match rasterize(&document, &params) {
            Ok(raster) => raster,
            Err(e) => return Err(self.fail_load(ticket.generation, e)),
        };

        let points = raster.polygon.len();
        let offset = raster.offset;
        {
            let mut inner = self.lock();
            if inner.generation != ticket.generation {
                warn!(
                    generation = ticket.generation,
                    current = inner.generation,
                    "stale mask load discarded"
                );
                return Ok(());
            }
            inner.cache = Some(document.clone());
            inner.state = MaskState::Ready(Arc::new(LoadedMask { raster, document }));
        }

        info!(points, offset_x = offset.x, offset_y = offset.y, "mask loaded");
        self.shared.host.mask_loaded();
        Ok(())
    }

    fn begin_load(&self) -> Result<LoadTicket, MaskError> {
        let mut inner = self.lock();
        let config = inner.config.as_ref().ok_or(MaskError::ConfigurationMissing)?;
        let source = config.source().ok_or(MaskError::SourceMissing)?;
        let (scale, position) = (config.scale, config.position);

        inner.generation += 1;
        let previous = std::mem::take(&mut inner.state);
        inner.state = match previous {
            MaskState::Ready(mask) | MaskState::Reloading(mask) => MaskState::Reloading(mask),
            MaskState::Unloaded | MaskState::Loading => MaskState::Loading,
        };
        Ok(LoadTicket { generation: inner.generation, source, cached: inner.cache.clone(), scale, position })
    }

    /// Roll the state back after a failed load, unless a newer load owns it.
    fn fail_load(&self, generation: u64, err: MaskError) -> MaskError {
        let mut inner = self.lock();
        if inner.generation == generation {
            let previous = std::mem::take(&mut inner.state);
            inner.state = match previous {
                MaskState::Reloading(mask) | MaskState::Ready(mask) => MaskState::Ready(mask),
                MaskState::Unloaded | MaskState::Loading => MaskState::Unloaded,
            };
        }
        error!(generation, code = err.error_code(), error = %err, "mask load failed");
        err
    }

    /// Signal a canvas resize. Reloads after the debounce window, last signal wins.
    ///
    /// Ignored unless the mask is enabled, constrains something, and has
    /// loaded at least once.
    pub fn resize(&self) {
        let eligible = {
            let inner = self.lock();
            inner.config.as_ref().is_some_and(MaskConfig::needs_plugin) && inner.state.loaded().is_some()
        };
        if !eligible {
            debug!("resize ignored; mask not active");
            return;
        }

        let delay = self.shared.runtime.resize_debounce;
        let controller = self.clone();
        self.shared.debouncer.schedule(delay, async move {
            controller.fire_resize().await;
        });
        debug!(delay_ms = delay.as_millis(), "mask resize scheduled");
    }

    async fn fire_resize(&self) {
        info!("mask resize fired; reloading");
        match self.reload(true).await {
            Ok(()) => self.shared.host.redraw_all(),
            Err(e) => error!(code = e.error_code(), error = %e, "mask reload after resize failed"),
        }
    }

    /// Discard loaded geometry and any pending resize. Idempotent.
    pub fn stop(&self) {
        if self.shared.debouncer.cancel() {
            debug!("pending mask resize cancelled");
        }
        let mut inner = self.lock();
        inner.generation += 1;
        inner.cache = None;
        if !matches!(inner.state, MaskState::Unloaded) {
            info!("mask stopped");
        }
        inner.state = MaskState::Unloaded;
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn phase(&self) -> MaskPhase {
        self.lock().state.phase()
    }

    /// Geometry currently being served, if any.
    #[must_use]
    pub fn loaded(&self) -> Option<Arc<LoadedMask>> {
        self.lock().state.loaded().cloned()
    }

    #[must_use]
    pub fn config(&self) -> Option<MaskConfig> {
        self.lock().config.clone()
    }

    // -------------------------------------------------------------------------
    // Host hooks
    // -------------------------------------------------------------------------

    /// Spawn one particle per outline vertex for per-point inline masks.
    ///
    /// Returns `true` when the spawn was handled here and the host should
    /// skip its own placement.
    pub fn particles_initialization(&self) -> bool {
        let (Some(config), Some(mask)) = self.snapshot() else {
            return false;
        };
        if !config.enable || config.mask_type != MaskType::Inline || !config.inline.arrangement.is_per_point() {
            return false;
        }
        for &point in mask.polygon().points() {
            self.shared.host.spawn_particle(point);
        }
        debug!(count = mask.polygon().len(), "spawned one particle per mask vertex");
        true
    }

    /// Position for a new particle. `None` when the mask is inactive.
    ///
    /// An explicit position wins; otherwise one is sampled.
    ///
    /// # Errors
    ///
    /// Propagates sampling errors such as [`MaskError::PlacementExhausted`].
    pub fn particle_position(&self, explicit: Option<Point>) -> Result<Option<Point>, MaskError> {
        let (Some(config), Some(_)) = self.snapshot() else {
            return Ok(None);
        };
        if !config.enable {
            return Ok(None);
        }
        if let Some(point) = explicit {
            return Ok(Some(point));
        }
        let index = self.shared.host.particle_count();
        self.sample_position_with(index, &mut rand::rng()).map(Some)
    }

    /// Sample a position for particle `index` with the thread RNG.
    ///
    /// # Errors
    ///
    /// See [`Self::sample_position_with`].
    pub fn sample_position(&self, index: usize) -> Result<Point, MaskError> {
        self.sample_position_with(index, &mut rand::rng())
    }

    /// Sample a position for particle `index`.
    ///
    /// Inline masks follow the configured arrangement; other types draw free
    /// points from the canvas until containment holds.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::ConfigurationMissing`] before `init`,
    /// [`MaskError::DataNotLoaded`] before a load completes, or
    /// [`MaskError::PlacementExhausted`] when rejection sampling gives up.
    pub fn sample_position_with<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> Result<Point, MaskError> {
        let (config, mask) = self.snapshot();
        let config = config.ok_or(MaskError::ConfigurationMissing)?;
        let mask = mask.ok_or(MaskError::DataNotLoaded)?;
        let sampler = mask.sampler();

        if config.mask_type == MaskType::Inline {
            let target = self.shared.host.target_particle_count();
            return sampler.arranged(config.inline.arrangement, index, target, rng);
        }
        let bounds = self.shared.host.canvas_size().scaled(1.0 / self.pixel_ratio());
        sampler.free_point(bounds, config.mask_type, self.shared.runtime.max_placement_attempts, rng)
    }

    fn pixel_ratio(&self) -> f64 {
        sane_ratio(self.shared.host.pixel_ratio())
    }

    /// Keep `particle` consistent with the mask. Returns `true` when handled.
    ///
    /// Only the `Top` pass is evaluated. Inside/outside masks reflect off the
    /// first edge within the particle radius, and pull escaped particles back
    /// across the nearest edge. Inline masks leash particles to their spawn
    /// point within `move.radius`.
    pub fn particle_bounce(&self, particle: &mut Particle, direction: Direction) -> bool {
        if direction != Direction::Top {
            return false;
        }
        let (Some(config), Some(mask)) = self.snapshot() else {
            return false;
        };
        if !config.enable {
            return false;
        }

        match config.mask_type {
            MaskType::Inside | MaskType::Outside => contain(mask.polygon(), config.mask_type, particle),
            MaskType::Inline => {
                let leash = config.motion.radius * self.pixel_ratio();
                tether(particle, leash)
            }
            MaskType::None => false,
        }
    }

    /// Whether `point` passes the mask's containment rule.
    ///
    /// Unconstrained masks (missing config, disabled, `none`, `inline`)
    /// accept every point.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::SourceMissing`] when no source is configured, or
    /// [`MaskError::DataNotLoaded`] before a load completes.
    pub fn check_inside(&self, point: Point) -> Result<bool, MaskError> {
        let (config, mask) = self.snapshot();
        let Some(config) = config else {
            return Ok(true);
        };
        if !config.enable || !config.enforces_containment() {
            return Ok(true);
        }
        if config.source().is_none() {
            return Err(MaskError::SourceMissing);
        }
        let mask = mask.ok_or(MaskError::DataNotLoaded)?;
        Ok(satisfies(mask.polygon(), config.mask_type, point))
    }

    /// Whether a click at `point` may spawn a particle.
    #[must_use]
    pub fn click_position_valid(&self, point: Point) -> bool {
        let constrained = self.lock().config.as_ref().is_some_and(|c| c.enable && c.enforces_containment());
        constrained && matches!(self.check_inside(point), Ok(true))
    }

    /// Stroke the outline when drawing is enabled. Returns whether anything
    /// was drawn.
    pub fn draw(&self, canvas: &mut dyn MaskCanvas) -> bool {
        let (Some(config), Some(mask)) = self.snapshot() else {
            return false;
        };
        if !config.draw.enable {
            return false;
        }
        draw::draw_outline(canvas, mask.polygon(), &mask.raster.outlines, mask.offset(), &config.draw.stroke)
    }
}

// =============================================================================
// BOUNCE
// =============================================================================

fn contain(polygon: &Polygon, mask_type: MaskType, particle: &mut Particle) -> bool {
    if let Some(hit) = polygon.edge_within(particle.position, particle.radius) {
        particle.velocity = reflect_velocity(hit.start, hit.end, particle.velocity);
        return true;
    }
    if satisfies(polygon, mask_type, particle.position) {
        return false;
    }
    let Some(hit) = polygon.nearest_edge(particle.position) else {
        return false;
    };

    // Escaped: land one diameter past the edge, on the opposite side.
    let diameter = particle.radius * 2.0;
    let away = distances(particle.position, hit.closest);
    particle.position = if away.distance > 0.0 {
        Point::new(
            hit.closest.x - away.dx / away.distance * diameter,
            hit.closest.y - away.dy / away.distance * diameter,
        )
    } else {
        across_edge(polygon, mask_type, &hit, diameter)
    };
    particle.velocity = Point::new(-particle.velocity.x, -particle.velocity.y);
    true
}

/// Step `diameter` along the edge normal from a particle sitting on the edge,
/// toward whichever side the mask type accepts.
fn across_edge(polygon: &Polygon, mask_type: MaskType, hit: &EdgeHit, diameter: f64) -> Point {
    let edge = distances(hit.end, hit.start);
    if edge.distance <= 0.0 {
        return hit.closest;
    }
    let nx = -edge.dy / edge.distance * diameter;
    let ny = edge.dx / edge.distance * diameter;
    let forward = Point::new(hit.closest.x + nx, hit.closest.y + ny);
    if satisfies(polygon, mask_type, forward) { forward } else { Point::new(hit.closest.x - nx, hit.closest.y - ny) }
}

fn tether(particle: &mut Particle, leash: f64) -> bool {
    let Some(origin) = particle.initial_position else {
        return false;
    };
    if particle.position.distance_to(origin) <= leash {
        return false;
    }
    // The second line reads the updated x.
    particle.velocity.x = particle.velocity.y / 2.0 - particle.velocity.x;
    particle.velocity.y = particle.velocity.x / 2.0 - particle.velocity.y;
    true
}
