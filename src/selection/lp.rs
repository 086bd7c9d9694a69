//! Integer-programming backend on top of `good_lp` (pure-Rust `microlp`).
//!
//! The model is solved once for the maximum cardinality `k`. Variables are
//! then fixed one at a time in preference order: `x_v = 1` is kept if a
//! solution with `sum(x) >= k` still exists, otherwise `x_v = 0`. The result is
//! the same lexicographically preferred maximum the branch-and-bound backend
//! returns.

use std::time::Instant;

use good_lp::{
    constraint, microlp, variable, variables, Expression, ResolutionError, Solution,
    SolverModel, Variable,
};

use super::model::SelectionModel;
use super::{SelectionSolver, SolveError};

/// Binary integer program solved with `good_lp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LpSolver;

impl LpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl SelectionSolver for LpSolver {
    fn name(&self) -> &'static str {
        "lp"
    }

    fn solve(
        &self,
        model: &SelectionModel,
        deadline: Option<Instant>,
    ) -> Result<Vec<usize>, SolveError> {
        let started = Instant::now();
        let timed_out = || match deadline {
            Some(deadline) if Instant::now() >= deadline => Err(SolveError::TimedOut {
                elapsed: started.elapsed(),
            }),
            _ => Ok(()),
        };

        if model.is_empty() {
            return Ok(Vec::new());
        }

        let mut fixed: Vec<Option<bool>> = (0..model.len())
            .map(|var| model.is_required(var).then_some(true))
            .collect();

        timed_out()?;
        let values = solve_once(model, &fixed, None)?.ok_or(SolveError::Infeasible)?;
        let target = values.iter().filter(|&&on| on).count();

        for var in 0..model.len() {
            if fixed[var].is_some() {
                continue;
            }
            timed_out()?;
            fixed[var] = Some(true);
            if solve_once(model, &fixed, Some(target))?.is_none() {
                fixed[var] = Some(false);
            }
        }

        Ok(fixed
            .iter()
            .enumerate()
            .filter_map(|(var, &value)| (value == Some(true)).then_some(var))
            .collect())
    }
}

/// Solves the model with some variables fixed; `None` when infeasible.
fn solve_once(
    model: &SelectionModel,
    fixed: &[Option<bool>],
    min_total: Option<usize>,
) -> Result<Option<Vec<bool>>, SolveError> {
    let mut vars = variables!();
    let xs: Vec<Variable> = (0..model.len())
        .map(|_| vars.add(variable().binary()))
        .collect();
    let total: Expression = xs.iter().copied().sum();

    let mut problem = vars.maximise(total.clone()).using(microlp);

    for &(a, b) in model.conflicts() {
        problem = problem.with(constraint::leq(xs[a] + xs[b], 1.0));
    }
    for group in model.groups() {
        let load: Expression = group.members.iter().map(|&var| xs[var]).sum();
        problem = problem.with(constraint::leq(load, f64::from(group.capacity)));
    }
    for (var, value) in fixed.iter().enumerate() {
        if let Some(value) = value {
            problem = problem.with(constraint::eq(xs[var], if *value { 1.0 } else { 0.0 }));
        }
    }
    if let Some(target) = min_total {
        problem = problem.with(constraint::geq(total, target as f64));
    }

    match problem.solve() {
        Ok(solution) => Ok(Some(xs.iter().map(|&x| solution.value(x) > 0.5).collect())),
        Err(ResolutionError::Infeasible) => Ok(None),
        Err(err) => Err(SolveError::Backend(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Parameters;
    use crate::floor_plan::{Desk, FloorPlan};
    use crate::requests::Candidate;
    use crate::selection::BranchAndBound;

    #[test]
    fn agrees_with_branch_and_bound() {
        let params = Parameters::new(5.0, 2, 3);
        let desks = vec![
            Desk::new("1", "101", 1, 0.0, 0.0),
            Desk::new("2", "101", 1, 4.0, 0.0),
            Desk::new("3", "101", 1, 8.0, 0.0),
            Desk::new("4", "102", 1, 30.0, 0.0),
            Desk::new("5", "102", 1, 40.0, 0.0),
        ];
        let plan = FloorPlan::new(desks, &params).unwrap();
        let candidates = vec![
            Candidate::new("amy", "2"),
            Candidate::new("bob", "1"),
            Candidate::new("cat", "3"),
            Candidate::new("dan", "4"),
            Candidate::new("eve", "5"),
            Candidate::new("fay", "5"),
        ];
        let model = SelectionModel::build(&candidates, &plan, &params).unwrap();

        let lp = LpSolver::new().solve(&model, None).unwrap();
        let exact = BranchAndBound::new().solve(&model, None).unwrap();
        assert_eq!(lp, exact);
    }

    #[test]
    fn empty_model() {
        let lp = LpSolver::new().solve(&SelectionModel::default(), None).unwrap();
        assert!(lp.is_empty());
    }
}
