//! Arena-specific error types.
//!
//! A simulation step itself has no recoverable errors; these cover the places
//! where outside data enters the core (config files, arena and body sizes).
//! Systems log and fall back to defaults instead of panicking.

use std::fmt;

/// Top-level error enum for the flight arena.
#[derive(Debug, Clone, PartialEq)]
pub enum ArenaError {
    /// A body or the arena itself has zero area, which would give a zero
    /// collision mass or an empty wrap range.
    DegenerateBounds { width: f64, height: f64 },

    /// A tunable is outside the range the simulation can handle.
    InvalidConfig {
        /// Name of the config key (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f64,
        /// Human-readable description of the accepted range.
        expected: &'static str,
    },

    /// The config file exists but is not valid TOML for [`crate::config::ArenaConfig`].
    ConfigParse { path: String, message: String },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArenaError::DegenerateBounds { width, height } => write!(
                f,
                "bounds {}×{} have zero area; mass and wrap range must be positive",
                width, height
            ),
            ArenaError::InvalidConfig {
                name,
                value,
                expected,
            } => write!(
                f,
                "config value '{}' = {} is outside accepted range {}",
                name, value, expected
            ),
            ArenaError::ConfigParse { path, message } => {
                write!(f, "failed to parse {}: {}", path, message)
            }
        }
    }
}

impl std::error::Error for ArenaError {}

/// Convenience alias: a `Result` using `ArenaError` as the error type.
pub type ArenaResult<T> = Result<T, ArenaError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless both extents are strictly positive.
pub fn validate_extent(width: f64, height: f64) -> ArenaResult<()> {
    if width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(ArenaError::DegenerateBounds { width, height })
    }
}

/// Returns an error unless `value` is strictly positive.
pub fn validate_positive(name: &'static str, value: f64) -> ArenaResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ArenaError::InvalidConfig {
            name,
            value,
            expected: "(0.0, ∞)",
        })
    }
}

/// Returns an error unless `value` is zero or positive.
pub fn validate_non_negative(name: &'static str, value: f64) -> ArenaResult<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ArenaError::InvalidConfig {
            name,
            value,
            expected: "[0.0, ∞)",
        })
    }
}
