//! Desk records and centroid geometry.

use crate::ident::DeskId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Desk centroid in floor-plan units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A physical desk. Immutable once loaded.
///
/// `floor` is supplied by whoever loads the desk table; the engine never
/// derives it from `office`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Desk {
    pub id: DeskId,
    pub office: String,
    pub floor: u32,
    pub position: Point,
}

impl Desk {
    pub fn new(id: impl Into<DeskId>, office: impl Into<String>, floor: u32, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            office: office.into(),
            floor,
            position: Point::new(x, y),
        }
    }

    pub fn distance_to(&self, other: &Desk) -> f64 {
        self.position.distance(&other.position)
    }
}
