//! Interface configuration, validation, and error types.
//!
//! [`InterfaceConfig`] is shared by every interface created in one
//! registry call. [`validate()`](InterfaceConfig::validate) checks it
//! before the transport is contacted.

use std::error::Error;
use std::fmt;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`InterfaceConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Points must have at least one coordinate.
    ZeroDimensions,
    /// `history_capacity` was `Some(0)`.
    ZeroHistoryCapacity,
    /// `received_capacity` was `Some(0)`.
    ZeroReceivedCapacity,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDimensions => write!(f, "dimensions must be at least 1"),
            Self::ZeroHistoryCapacity => {
                write!(f, "history_capacity must be at least 1 when bounded")
            }
            Self::ZeroReceivedCapacity => {
                write!(f, "received_capacity must be at least 1 when bounded")
            }
        }
    }
}

impl Error for ConfigError {}

// ── InterfaceConfig ────────────────────────────────────────────────

/// Configuration for the interfaces of one coupled run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceConfig {
    /// Coordinates per point. Every push and fetch point must match.
    /// Default: 2.
    pub dimensions: usize,
    /// Maximum number of the interface's own commits retained for
    /// inspection. `None` keeps them all. Default: `None`.
    pub history_capacity: Option<usize>,
    /// Maximum number of distinct peer timesteps retained for fetching.
    /// `None` keeps them until [`forget`](crate::Interface::forget).
    /// Default: `None`.
    pub received_capacity: Option<usize>,
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            dimensions: 2,
            history_capacity: None,
            received_capacity: None,
        }
    }
}

impl InterfaceConfig {
    /// A default configuration for points of `dimensions` coordinates.
    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            dimensions,
            ..Self::default()
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dimensions == 0 {
            return Err(ConfigError::ZeroDimensions);
        }
        if self.history_capacity == Some(0) {
            return Err(ConfigError::ZeroHistoryCapacity);
        }
        if self.received_capacity == Some(0) {
            return Err(ConfigError::ZeroReceivedCapacity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let cfg = InterfaceConfig::default();
        assert_eq!(cfg.dimensions, 2);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn with_dimensions_keeps_other_defaults() {
        let cfg = InterfaceConfig::with_dimensions(3);
        assert_eq!(cfg.dimensions, 3);
        assert_eq!(cfg.history_capacity, None);
    }

    #[test]
    fn zero_dimensions_rejected() {
        let cfg = InterfaceConfig::with_dimensions(0);
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroDimensions));
    }

    #[test]
    fn zero_capacities_rejected() {
        let cfg = InterfaceConfig {
            history_capacity: Some(0),
            ..InterfaceConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroHistoryCapacity));

        let cfg = InterfaceConfig {
            received_capacity: Some(0),
            ..InterfaceConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroReceivedCapacity));
    }
}
