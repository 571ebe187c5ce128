//! Simulation configuration.
//!
//! Configuration is supplied once at construction and validated before any
//! simulated time advances; a malformed config never produces a runnable
//! simulation.

use hourglass::SimTime;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Whether Curse of the Elements is on the target. The Ignite tick
    /// formula double-dips on it multiplicatively.
    pub curse_of_elements: bool,
    /// Default horizon in simulated seconds for [`Simulation::run`].
    ///
    /// [`Simulation::run`]: crate::simulation::Simulation::run
    pub horizon: SimTime,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            curse_of_elements: true,
            horizon: 60.0,
        }
    }
}

impl SimConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// [`SimError::Config`] if the horizon is non-finite or not positive.
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.horizon.is_finite() || self.horizon <= 0.0 {
            return Err(SimError::Config(format!(
                "horizon must be positive and finite, got {}",
                self.horizon
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
        assert!(SimConfig::default().curse_of_elements);
    }

    #[test]
    fn negative_horizon_is_rejected() {
        let config = SimConfig {
            horizon: -5.0,
            ..SimConfig::default()
        };
        assert!(matches!(config.validate(), Err(SimError::Config(_))));
    }

    #[test]
    fn nan_horizon_is_rejected() {
        let config = SimConfig {
            horizon: f64::NAN,
            ..SimConfig::default()
        };
        assert!(matches!(config.validate(), Err(SimError::Config(_))));
    }

    #[test]
    fn serde_roundtrip() {
        let config = SimConfig {
            curse_of_elements: false,
            horizon: 120.0,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: SimConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
