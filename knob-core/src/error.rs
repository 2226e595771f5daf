//! Error types for Knob

use std::fmt;
use std::num::ParseIntError;

use thiserror::Error;

/// Which half of a feature toggle failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureAction {
    /// Reading the current value
    Get,
    /// Writing a new value
    Set,
}

impl fmt::Display for FeatureAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("get"),
            Self::Set => f.write_str("set"),
        }
    }
}

/// Knob error types
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// I/O error, passed through untouched
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Sysctl content is not a base-10 integer
    #[error("cannot parse sysctl {name} value {value:?}: {source}")]
    Parse {
        /// Sysctl name
        name: String,
        /// Trimmed file content
        value: String,
        /// Underlying parse failure
        source: ParseIntError,
    },

    /// Cache descriptor has fewer than three colon-separated fields
    #[error("invalid cache info {descriptor}")]
    InvalidCacheInfo {
        /// Raw descriptor as given
        descriptor: String,
    },

    /// Fourth cache descriptor field is not a 32-bit integer
    #[error("invalid L3 cache id in {descriptor}: {source}")]
    CacheId {
        /// Raw descriptor as given
        descriptor: String,
        /// Underlying parse failure
        source: ParseIntError,
    },

    /// Kernel feature toggle failed
    #[error("cannot {action} sysctl {feature}: {source}")]
    Feature {
        /// Feature short name
        feature: String,
        /// Attempted action
        action: FeatureAction,
        /// Underlying sysctl error
        source: Box<Error>,
    },

    /// Clock tick calibration failed
    #[error("clock tick calibration failed: {message}")]
    Calibration {
        /// Error message
        message: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Error message
        message: String,
    },
}

impl Error {
    /// Returns true if this error (or the error it wraps) is a missing file
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            Self::Feature { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

/// Result type alias for Knob operations
pub type Result<T> = std::result::Result<T, Error>;
