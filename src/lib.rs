//! deskplan - safe-distance desk occupancy scheduling
//!
//! Assigns students to desks across discrete time blocks so that no two
//! simultaneously occupied desks are closer than a safety distance and no
//! office or floor exceeds its occupancy cap.
//!
//! Data flows forward through four components:
//!
//! 1. [`floor_plan`] - desk geometry and the conflict graph
//! 2. [`requests`] - student requests regrouped into per-block candidates
//! 3. [`selection`] - per-block maximum conflict-free selection
//! 4. [`schedule`] - parallel per-block solving merged into one schedule
//!
//! File formats, reports and the command line live in `io` and the binary
//! (feature `cli`).

pub mod config;
pub mod floor_plan;
pub mod ident;
#[cfg(feature = "cli")]
pub mod io;
pub mod requests;
pub mod schedule;
pub mod selection;

pub use config::Parameters;
pub use schedule::{DeskPlanner, SchedulePlan};

/// Identifier type used for planning runs.
pub type Id = String;

/// Generates a new unique identifier (UUID v4).
pub fn generate_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}
