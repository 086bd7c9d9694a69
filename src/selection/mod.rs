//! Per-block selection: the conflict-free, capacity-respecting subset of a
//! block's candidates with the most students.
//!
//! The problem is an independent set with group capacities. It is expressed as
//! an explicit [`SelectionModel`] and handed to a [`SelectionSolver`], so the
//! backend can be swapped without touching constraint construction.
//!
//! # Tie-breaking
//!
//! Every backend must return the **lexicographically preferred** maximum:
//! walking variables in preference order (ascending student, then desk), a
//! candidate is selected whenever some maximum selection agreeing with the
//! earlier decisions contains it. Identical inputs therefore give identical
//! selections regardless of backend.

mod branch_bound;
mod error;
#[cfg(feature = "lp")]
mod lp;
mod model;

pub use branch_bound::BranchAndBound;
pub use error::SolveError;
#[cfg(feature = "lp")]
pub use lp::LpSolver;
pub use model::{CapacityGroup, GroupKind, SelectionModel};

use std::time::Instant;

use crate::config::Parameters;
use crate::floor_plan::FloorPlan;
use crate::requests::Candidate;

/// Backend that solves a [`SelectionModel`].
///
/// Implementations must be deterministic and honor the tie-breaking rule
/// described in the module docs. `deadline` is cooperative: once it passes the
/// solver should give up with [`SolveError::TimedOut`].
pub trait SelectionSolver: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Returns the selected variable indices in ascending order.
    fn solve(&self, model: &SelectionModel, deadline: Option<Instant>)
        -> Result<Vec<usize>, SolveError>;
}

impl<S: SelectionSolver + ?Sized> SelectionSolver for &S {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn solve(
        &self,
        model: &SelectionModel,
        deadline: Option<Instant>,
    ) -> Result<Vec<usize>, SolveError> {
        (**self).solve(model, deadline)
    }
}

impl<S: SelectionSolver + ?Sized> SelectionSolver for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn solve(
        &self,
        model: &SelectionModel,
        deadline: Option<Instant>,
    ) -> Result<Vec<usize>, SolveError> {
        (**self).solve(model, deadline)
    }
}

/// Solves one block: builds the model, requires `forced`, and returns the
/// selected candidates in preference order.
///
/// An empty candidate list yields an empty selection.
pub fn select<S>(
    candidates: &[Candidate],
    forced: &[Candidate],
    plan: &FloorPlan,
    params: &Parameters,
    solver: &S,
) -> Result<Vec<Candidate>, SolveError>
where
    S: SelectionSolver + ?Sized,
{
    if candidates.is_empty() && forced.is_empty() {
        return Ok(Vec::new());
    }

    let mut model = SelectionModel::build(candidates, plan, params)?;
    for candidate in forced {
        if !model.require(candidate) {
            return Err(SolveError::Infeasible);
        }
    }

    let deadline = params.block_timeout.map(|timeout| Instant::now() + timeout);
    let selected = solver.solve(&model, deadline)?;
    if !model.is_feasible(&selected) {
        return Err(SolveError::Backend(format!(
            "{} returned an infeasible selection",
            solver.name()
        )));
    }
    Ok(model.decode(&selected))
}
