//! Shared numeric constants for the mask crate.

// ── Layout ──────────────────────────────────────────────────────

/// Default relative position of the mask center, in percent of the canvas.
pub const DEFAULT_POSITION_PCT: f64 = 50.0;

/// Upper bound for a relative position component, in percent.
pub const MAX_POSITION_PCT: f64 = 100.0;

// ── Motion ──────────────────────────────────────────────────────

/// Default leash radius for inline particles, in CSS pixels.
pub const DEFAULT_MOVE_RADIUS: f64 = 10.0;

// ── Drawing ─────────────────────────────────────────────────────

/// Default outline stroke color.
pub const DEFAULT_STROKE_COLOR: &str = "#ffffff";

/// Default outline stroke width.
pub const DEFAULT_STROKE_WIDTH: f64 = 0.5;

// ── Curves ──────────────────────────────────────────────────────

/// Accuracy passed to arc-length computations on curved segments.
pub const ARCLEN_ACCURACY: f64 = 1e-9;

// ── Runtime defaults ────────────────────────────────────────────

/// Quiescence window before a resize triggers a reload, in milliseconds.
pub const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 250;

/// Cap on rejection-sampling draws before placement gives up.
pub const DEFAULT_MAX_PLACEMENT_ATTEMPTS: usize = 100;

/// Whole-request timeout for SVG downloads, in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Connect timeout for SVG downloads, in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

// ── Outline ─────────────────────────────────────────────────────

/// Fewest vertices a loaded outline may have.
pub const MIN_POLYGON_POINTS: usize = 3;
