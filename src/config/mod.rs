//! Run parameters shared (read-only) by every component.
//!
//! A [`Parameters`] value is built once per run, validated, and then passed by
//! reference into the floor plan, the selector and the aggregator. Nothing in
//! the crate reads configuration from ambient state.

mod error;

pub use error::ConfigError;

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cross-block satisfaction policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FairnessPolicy {
    /// Every block is solved to its own optimum and nothing else.
    #[default]
    PerBlock,
    /// After per-block solving, re-solve blocks to grant unserved students a
    /// block whenever that leaves every served student served.
    RescueUnserved,
}

/// Which desk pairs are checked against the safety distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ConflictScope {
    /// Every pair of desks, regardless of office.
    #[default]
    Global,
    /// Only desks in the same office; use when coordinates are room-local.
    SameOffice,
}

/// Immutable scheduling parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    /// Minimum centroid separation between simultaneously occupied desks.
    pub safety_distance: f64,
    /// Maximum simultaneous occupants of one office.
    pub office_occupancy_cap: u32,
    /// Maximum simultaneous occupants of one floor.
    pub floor_occupancy_cap: u32,
    pub fairness: FairnessPolicy,
    pub conflict_scope: ConflictScope,
    /// Budget for a single block's solve; `None` means unbounded.
    pub block_timeout: Option<Duration>,
}

impl Parameters {
    pub fn new(safety_distance: f64, office_occupancy_cap: u32, floor_occupancy_cap: u32) -> Self {
        Self {
            safety_distance,
            office_occupancy_cap,
            floor_occupancy_cap,
            ..Self::default()
        }
    }

    pub fn with_fairness(mut self, fairness: FairnessPolicy) -> Self {
        self.fairness = fairness;
        self
    }

    pub fn with_conflict_scope(mut self, scope: ConflictScope) -> Self {
        self.conflict_scope = scope;
        self
    }

    pub fn with_block_timeout(mut self, timeout: Duration) -> Self {
        self.block_timeout = Some(timeout);
        self
    }

    /// Checks every parameter; the first violation is returned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_safety_distance(self.safety_distance)?;
        if self.block_timeout == Some(Duration::ZERO) {
            return Err(ConfigError::ZeroBlockTimeout);
        }
        Ok(())
    }
}

impl Default for Parameters {
    /// No distance separation, unbounded caps, per-block fairness.
    fn default() -> Self {
        Self {
            safety_distance: 0.0,
            office_occupancy_cap: u32::MAX,
            floor_occupancy_cap: u32::MAX,
            fairness: FairnessPolicy::PerBlock,
            conflict_scope: ConflictScope::Global,
            block_timeout: None,
        }
    }
}

pub(crate) fn validate_safety_distance(distance: f64) -> Result<(), ConfigError> {
    if !distance.is_finite() {
        return Err(ConfigError::NonFiniteSafetyDistance(distance));
    }
    if distance < 0.0 {
        return Err(ConfigError::NegativeSafetyDistance(distance));
    }
    Ok(())
}

/// Converts a signed cap read from an input file into a validated `u32`.
pub fn cap_from_i64(name: &'static str, value: i64) -> Result<u32, ConfigError> {
    if value < 0 {
        return Err(ConfigError::NegativeCap { name, value });
    }
    u32::try_from(value).map_err(|_| ConfigError::CapOutOfRange { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_parameters_are_valid() {
        let params = Parameters::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.fairness, FairnessPolicy::PerBlock);
        assert_eq!(params.conflict_scope, ConflictScope::Global);
    }

    #[test]
    fn negative_distance_rejected() {
        let params = Parameters::new(-0.5, 1, 1);
        assert_eq!(
            params.validate(),
            Err(ConfigError::NegativeSafetyDistance(-0.5))
        );
    }

    #[test]
    fn nan_distance_rejected() {
        let params = Parameters::new(f64::NAN, 1, 1);
        assert!(matches!(
            params.validate(),
            Err(ConfigError::NonFiniteSafetyDistance(_))
        ));
    }

    #[test]
    fn zero_timeout_rejected() {
        let params = Parameters::new(1.0, 1, 1).with_block_timeout(Duration::ZERO);
        assert_eq!(params.validate(), Err(ConfigError::ZeroBlockTimeout));
    }

    #[test]
    fn zero_caps_are_valid() {
        assert!(Parameters::new(2.0, 0, 0).validate().is_ok());
    }

    #[test]
    fn cap_conversion() {
        assert_eq!(cap_from_i64("office_occupancy_cap", 4), Ok(4));
        assert_eq!(
            cap_from_i64("floor_occupancy_cap", -1),
            Err(ConfigError::NegativeCap {
                name: "floor_occupancy_cap",
                value: -1
            })
        );
        assert!(matches!(
            cap_from_i64("floor_occupancy_cap", i64::MAX),
            Err(ConfigError::CapOutOfRange { .. })
        ));
    }
}
