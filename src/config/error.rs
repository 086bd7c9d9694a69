use thiserror::Error;

use super::ConflictScope;
use crate::ident::DeskId;

/// Fatal problems with run parameters or desk geometry.
///
/// Detected before any block is solved; a run that hits one produces no
/// partial output.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("safety_distance must be >= 0, got {0}")]
    NegativeSafetyDistance(f64),

    #[error("safety_distance must be a finite number, got {0}")]
    NonFiniteSafetyDistance(f64),

    #[error("{name} must be >= 0, got {value}")]
    NegativeCap { name: &'static str, value: i64 },

    #[error("{name} is too large: {value}")]
    CapOutOfRange { name: &'static str, value: i64 },

    #[error("block timeout must be greater than zero")]
    ZeroBlockTimeout,

    #[error("desk {0} is listed more than once")]
    DuplicateDesk(DeskId),

    #[error("desk {desk} has a non-finite coordinate ({x}, {y})")]
    InvalidCoordinate { desk: DeskId, x: f64, y: f64 },

    #[error(
        "floor plan built for safety_distance {plan_distance} ({plan_scope:?} scope), \
         parameters say {distance} ({scope:?} scope)"
    )]
    FloorPlanMismatch {
        plan_distance: f64,
        plan_scope: ConflictScope,
        distance: f64,
        scope: ConflictScope,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_distance_display() {
        let e = ConfigError::NegativeSafetyDistance(-1.5);
        assert_eq!(e.to_string(), "safety_distance must be >= 0, got -1.5");
    }

    #[test]
    fn negative_cap_names_the_parameter() {
        let e = ConfigError::NegativeCap {
            name: "office_occupancy_cap",
            value: -2,
        };
        assert_eq!(e.to_string(), "office_occupancy_cap must be >= 0, got -2");
    }

    #[test]
    fn floor_plan_mismatch_display() {
        let e = ConfigError::FloorPlanMismatch {
            plan_distance: 2.0,
            plan_scope: ConflictScope::Global,
            distance: 6.0,
            scope: ConflictScope::SameOffice,
        };
        assert_eq!(
            e.to_string(),
            "floor plan built for safety_distance 2 (Global scope), parameters say 6 (SameOffice scope)"
        );
    }

    #[test]
    fn duplicate_desk_display() {
        let e = ConfigError::DuplicateDesk(DeskId::from("12"));
        assert_eq!(e.to_string(), "desk 12 is listed more than once");
    }
}
