//! Mask errors and their grepable codes.
//!
//! DESIGN
//! ======
//! One enum for every failure the mask surfaces to its host. Recoverable
//! conditions (disabled mask, type `none`, nothing loaded for an optional
//! query) are not errors: callers get a pass-through result instead.
//! Nothing here is retried automatically; `retryable()` only tells the host
//! whether trying again could help.

// =============================================================================
// ERROR CODES
// =============================================================================

/// Grepable error code and retryable flag for host-side reporting.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by mask loading, sampling, and lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum MaskError {
    /// No mask configuration has been supplied.
    #[error("mask configuration missing")]
    ConfigurationMissing,

    /// The configuration names neither a URL nor inline data.
    #[error("mask source missing: configure a url or inline data")]
    SourceMissing,

    /// A geometry or sampling query ran before any load completed.
    #[error("no polygon data loaded")]
    DataNotLoaded,

    /// The SVG download returned a non-success HTTP status.
    #[error("mask download failed: status {status}")]
    FetchFailed { status: u16 },

    /// The SVG download failed at the transport level.
    #[error("mask download request failed: {0}")]
    FetchRequest(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The SVG document could not be parsed.
    #[error("svg parse failed: {0}")]
    SvgParse(String),

    /// A path `d` attribute could not be parsed.
    #[error("path data invalid: {0}")]
    PathData(String),

    /// A configuration value is out of range.
    #[error("invalid mask config: {0}")]
    InvalidConfig(String),

    /// Rejection sampling never produced a point satisfying the mask.
    #[error("no valid mask position after {attempts} attempts")]
    PlacementExhausted { attempts: usize },
}

impl ErrorCode for MaskError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigurationMissing => "E_CONFIGURATION_MISSING",
            Self::SourceMissing => "E_SOURCE_MISSING",
            Self::DataNotLoaded => "E_DATA_NOT_LOADED",
            Self::FetchFailed { .. } => "E_FETCH_FAILED",
            Self::FetchRequest(_) => "E_FETCH_REQUEST",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::SvgParse(_) => "E_SVG_PARSE",
            Self::PathData(_) => "E_PATH_DATA",
            Self::InvalidConfig(_) => "E_INVALID_CONFIG",
            Self::PlacementExhausted { .. } => "E_PLACEMENT_EXHAUSTED",
        }
    }

    fn retryable(&self) -> bool {
        matches!(
            self,
            Self::FetchRequest(_) | Self::FetchFailed { status: 429 | 500..=599 } | Self::PlacementExhausted { .. }
        )
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
