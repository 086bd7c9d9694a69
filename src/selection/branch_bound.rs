//! Exact depth-first branch and bound.
//!
//! Variables are visited in preference order and the "include" branch is
//! explored before "exclude". The incumbent is replaced only by a strictly
//! larger selection, so the first maximum found is the lexicographically
//! preferred one and the result does not depend on anything but the model.
//!
//! # Bound
//!
//! At variable `v` the optimistic completion counts every remaining variable
//! that is still selectable, minus the worst per-kind overflow: for each group
//! kind, the free members in a group beyond its remaining slack can never all
//! be taken. Subtrees whose bound cannot beat the incumbent are skipped.

use std::time::{Duration, Instant};

use super::model::{GroupKind, SelectionModel};
use super::{SelectionSolver, SolveError};

/// Exact solver; the default backend.
#[derive(Debug, Clone, Copy)]
pub struct BranchAndBound {
    check_interval: u64,
}

impl BranchAndBound {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many search nodes are expanded between deadline checks.
    pub fn with_check_interval(mut self, nodes: u64) -> Self {
        self.check_interval = nodes.max(1);
        self
    }
}

impl Default for BranchAndBound {
    fn default() -> Self {
        Self {
            check_interval: 1024,
        }
    }
}

impl SelectionSolver for BranchAndBound {
    fn name(&self) -> &'static str {
        "branch-and-bound"
    }

    fn solve(
        &self,
        model: &SelectionModel,
        deadline: Option<Instant>,
    ) -> Result<Vec<usize>, SolveError> {
        let mut search = Search::new(model, deadline, self.check_interval);
        search.check_deadline()?;
        search.expand(0)?;
        tracing::trace!(
            nodes = search.nodes,
            variables = model.len(),
            "branch and bound finished"
        );
        search.best.ok_or(SolveError::Infeasible)
    }
}

struct Search<'m> {
    model: &'m SelectionModel,
    deadline: Option<Instant>,
    started: Instant,
    check_interval: u64,
    nodes: u64,
    /// Number of chosen variables adjacent to each variable.
    blocked: Vec<u32>,
    /// Chosen members per capacity group.
    load: Vec<u32>,
    chosen: Vec<usize>,
    best: Option<Vec<usize>>,
    free_in_group: Vec<u32>,
}

impl<'m> Search<'m> {
    fn new(model: &'m SelectionModel, deadline: Option<Instant>, check_interval: u64) -> Self {
        Self {
            model,
            deadline,
            started: Instant::now(),
            check_interval,
            nodes: 0,
            blocked: vec![0; model.len()],
            load: vec![0; model.groups().len()],
            chosen: Vec::with_capacity(model.len()),
            best: None,
            free_in_group: vec![0; model.groups().len()],
        }
    }

    fn check_deadline(&self) -> Result<(), SolveError> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(SolveError::TimedOut {
                elapsed: self.elapsed(),
            }),
            _ => Ok(()),
        }
    }

    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn selectable(&self, var: usize) -> bool {
        self.blocked[var] == 0
            && self
                .model
                .groups_of(var)
                .iter()
                .all(|&g| self.load[g] < self.model.groups()[g].capacity)
    }

    fn take(&mut self, var: usize) {
        for &other in self.model.neighbors(var) {
            self.blocked[other] += 1;
        }
        for &g in self.model.groups_of(var) {
            self.load[g] += 1;
        }
        self.chosen.push(var);
    }

    fn release(&mut self, var: usize) {
        for &other in self.model.neighbors(var) {
            self.blocked[other] -= 1;
        }
        for &g in self.model.groups_of(var) {
            self.load[g] -= 1;
        }
        self.chosen.pop();
    }

    fn bound(&mut self, from: usize) -> usize {
        self.free_in_group.iter_mut().for_each(|count| *count = 0);
        let mut free = 0usize;
        for var in from..self.model.len() {
            if self.selectable(var) {
                free += 1;
                for &g in self.model.groups_of(var) {
                    self.free_in_group[g] += 1;
                }
            }
        }

        let (mut office_excess, mut floor_excess) = (0usize, 0usize);
        for (g, group) in self.model.groups().iter().enumerate() {
            let slack = group.capacity.saturating_sub(self.load[g]);
            let excess = self.free_in_group[g].saturating_sub(slack) as usize;
            match group.kind {
                GroupKind::Office => office_excess += excess,
                GroupKind::Floor => floor_excess += excess,
            }
        }

        self.chosen.len() + free - office_excess.max(floor_excess)
    }

    fn expand(&mut self, var: usize) -> Result<(), SolveError> {
        self.nodes += 1;
        if self.nodes % self.check_interval == 0 {
            self.check_deadline()?;
        }

        if var == self.model.len() {
            let improves = self
                .best
                .as_ref()
                .map_or(true, |best| self.chosen.len() > best.len());
            if improves {
                self.best = Some(self.chosen.clone());
            }
            return Ok(());
        }

        if let Some(best_len) = self.best.as_ref().map(Vec::len) {
            if self.bound(var) <= best_len {
                return Ok(());
            }
        }

        if self.selectable(var) {
            self.take(var);
            self.expand(var + 1)?;
            self.release(var);
        }
        if !self.model.is_required(var) {
            self.expand(var + 1)?;
        }
        Ok(())
    }
}
