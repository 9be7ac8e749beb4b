//! Mask configuration: the host-owned options document plus runtime tuning.
//!
//! DESIGN
//! ======
//! `MaskConfig` mirrors the JSON options block the host engine hands to the
//! mask (camelCase keys, every field optional). It is read-only to this
//! crate. `RuntimeConfig` carries process-level knobs (timeouts, debounce
//! window, sampling cap) parsed from environment variables with defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_PLACEMENT_ATTEMPTS, DEFAULT_MOVE_RADIUS,
    DEFAULT_POSITION_PCT, DEFAULT_RESIZE_DEBOUNCE_MS, DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WIDTH, MAX_POSITION_PCT,
};
use crate::error::MaskError;
use crate::geometry::{Dimension, Point};
use crate::loader::MaskSource;

// =============================================================================
// ENUMS
// =============================================================================

/// Policy governing where particles may live relative to the outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskType {
    /// Mask loaded but imposes no constraint.
    #[default]
    None,
    /// Particles must stay inside the outline.
    Inside,
    /// Particles must stay outside the outline.
    Outside,
    /// Particles are placed along the outline.
    Inline,
}

/// How inline particles are distributed along the outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InlineArrangement {
    #[default]
    OnePerPoint,
    PerPoint,
    RandomPoint,
    RandomLength,
    Equidistant,
}

impl InlineArrangement {
    /// Vertex-index arrangements spawn one particle per outline vertex.
    #[must_use]
    pub fn is_per_point(self) -> bool {
        matches!(self, Self::OnePerPoint | Self::PerPoint)
    }
}

// =============================================================================
// INLINE DATA
// =============================================================================

/// One path string or several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathList {
    One(String),
    Many(Vec<String>),
}

impl PathList {
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(p) => vec![p],
            Self::Many(ps) => ps,
        }
    }
}

/// Inline mask data as it appears in the options document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaskData {
    /// A full SVG document (starts with `<`) or a single path `d` string.
    Text(String),
    /// Several path `d` strings.
    Paths(Vec<String>),
    /// Path string(s) with an explicit document size.
    Sized { path: PathList, size: Dimension },
    /// Pre-computed outline vertices; no parsing happens.
    Points {
        points: Vec<Point>,
        #[serde(default)]
        size: Option<Dimension>,
    },
}

// =============================================================================
// SUB-OPTIONS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveConfig {
    /// Leash radius for inline particles, in CSS pixels.
    pub radius: f64,
}

impl Default for MoveConfig {
    fn default() -> Self {
        Self { radius: DEFAULT_MOVE_RADIUS }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InlineConfig {
    pub arrangement: InlineArrangement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeConfig {
    /// CSS color: `#rgb`, `#rrggbb`, or `rgb(r, g, b)`.
    pub color: String,
    pub width: f64,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self { color: DEFAULT_STROKE_COLOR.to_string(), width: DEFAULT_STROKE_WIDTH }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    pub enable: bool,
    pub stroke: StrokeConfig,
}

// =============================================================================
// MASK CONFIG
// =============================================================================

/// Polygon mask options, deserialized from the host's JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MaskConfig {
    pub enable: bool,
    #[serde(rename = "type")]
    pub mask_type: MaskType,
    /// Absolute URL of an SVG document. Takes precedence over `data`.
    pub url: Option<String>,
    pub data: Option<MaskData>,
    /// Center of the mask in percent of the canvas size.
    pub position: Point,
    /// Scale applied to the source geometry. Must be positive.
    pub scale: f64,
    #[serde(rename = "move")]
    pub motion: MoveConfig,
    pub inline: InlineConfig,
    pub draw: DrawConfig,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            enable: false,
            mask_type: MaskType::None,
            url: None,
            data: None,
            position: Point::new(DEFAULT_POSITION_PCT, DEFAULT_POSITION_PCT),
            scale: 1.0,
            motion: MoveConfig::default(),
            inline: InlineConfig::default(),
            draw: DrawConfig::default(),
        }
    }
}

impl MaskConfig {
    /// Parse and validate a JSON options block.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::InvalidConfig`] if the JSON is malformed or a value
    /// is out of range.
    pub fn from_json(json: &str) -> Result<Self, MaskError> {
        let config: Self = serde_json::from_str(json).map_err(|e| MaskError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), MaskError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(MaskError::InvalidConfig(format!("scale must be positive, got {}", self.scale)));
        }
        for (axis, value) in [("x", self.position.x), ("y", self.position.y)] {
            if !value.is_finite() || !(0.0..=MAX_POSITION_PCT).contains(&value) {
                return Err(MaskError::InvalidConfig(format!("position.{axis} must be within 0..=100, got {value}")));
            }
        }
        if !self.motion.radius.is_finite() || self.motion.radius < 0.0 {
            return Err(MaskError::InvalidConfig(format!(
                "move.radius must be non-negative, got {}",
                self.motion.radius
            )));
        }
        Ok(())
    }

    /// The host only needs the mask when it is enabled and constrains something.
    #[must_use]
    pub fn needs_plugin(&self) -> bool {
        self.enable && self.mask_type != MaskType::None
    }

    /// Whether placement and bounce must honor containment.
    #[must_use]
    pub fn enforces_containment(&self) -> bool {
        matches!(self.mask_type, MaskType::Inside | MaskType::Outside)
    }

    /// Resolve the configured load source. `url` wins over `data`.
    #[must_use]
    pub fn source(&self) -> Option<MaskSource> {
        if let Some(url) = self.url.as_deref().filter(|u| !u.trim().is_empty()) {
            return Some(MaskSource::Url(url.to_string()));
        }
        let source = match self.data.clone()? {
            MaskData::Text(text) => {
                if text.trim_start().starts_with('<') {
                    MaskSource::Document(text)
                } else {
                    MaskSource::Paths { paths: vec![text], size: None }
                }
            }
            MaskData::Paths(paths) => MaskSource::Paths { paths, size: None },
            MaskData::Sized { path, size } => MaskSource::Paths { paths: path.into_vec(), size: Some(size) },
            MaskData::Points { points, size } => MaskSource::Points { points, size },
        };
        Some(source)
    }
}

// =============================================================================
// RUNTIME CONFIG
// =============================================================================

/// Process-level tuning, parsed from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub fetch_timeout: Duration,
    pub connect_timeout: Duration,
    pub resize_debounce: Duration,
    pub max_placement_attempts: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            resize_debounce: Duration::from_millis(DEFAULT_RESIZE_DEBOUNCE_MS),
            max_placement_attempts: DEFAULT_MAX_PLACEMENT_ATTEMPTS,
        }
    }
}

impl RuntimeConfig {
    /// Build runtime tuning from environment variables.
    ///
    /// - `POLYMASK_FETCH_TIMEOUT_SECS`: default 30
    /// - `POLYMASK_CONNECT_TIMEOUT_SECS`: default 10
    /// - `POLYMASK_RESIZE_DEBOUNCE_MS`: default 250
    /// - `POLYMASK_MAX_PLACEMENT_ATTEMPTS`: default 100 (minimum 1)
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(env_parse("POLYMASK_FETCH_TIMEOUT_SECS", DEFAULT_FETCH_TIMEOUT_SECS)),
            connect_timeout: Duration::from_secs(env_parse(
                "POLYMASK_CONNECT_TIMEOUT_SECS",
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )),
            resize_debounce: Duration::from_millis(env_parse(
                "POLYMASK_RESIZE_DEBOUNCE_MS",
                DEFAULT_RESIZE_DEBOUNCE_MS,
            )),
            max_placement_attempts: env_parse("POLYMASK_MAX_PLACEMENT_ATTEMPTS", DEFAULT_MAX_PLACEMENT_ATTEMPTS)
                .max(1),
        }
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
