//! Polygon mask geometry and collision for a canvas particle engine.
//!
//! A mask loads an outline (raw points, inline path data, or an SVG document
//! fetched over HTTP), flattens it into a canvas-space polygon, and then
//! answers the host's per-particle questions: where may this particle spawn,
//! is this point allowed, and how does a particle bounce off the boundary.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`controller`] | Lifecycle state machine and host-facing hooks |
//! | [`loader`] | Source resolution, SVG fetch and parse, arc lengths |
//! | [`raster`] | Flatten paths into the scaled, centered outline |
//! | [`sampler`] | Placement strategies along or inside the outline |
//! | [`geometry`] | Containment, projection, reflection |
//! | [`debounce`] | Cancellable delayed task for resize handling |
//! | [`host`] | Host capability, particle view and canvas traits |
//! | [`draw`] | Stroke-only outline rendering |
//! | [`config`] | Mask options (serde) and runtime tuning |
//! | [`error`] | Error kinds with stable codes |
//! | [`consts`] | Shared numeric constants |

pub mod config;
pub mod consts;
pub mod controller;
pub mod debounce;
pub mod draw;
pub mod error;
pub mod geometry;
pub mod host;
pub mod loader;
pub mod raster;
pub mod sampler;

pub use config::{MaskConfig, MaskType, RuntimeConfig};
pub use controller::{LoadedMask, MaskController, MaskPhase};
pub use error::{ErrorCode, MaskError};
pub use geometry::{Dimension, Point, Polygon};
pub use host::{Direction, MaskCanvas, MaskHost, Particle};
