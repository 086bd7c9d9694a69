//! Run orchestration: parallel per-block solving and the optional rescue pass.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, FairnessPolicy, Parameters};
use crate::floor_plan::{Desk, FloorPlan};
use crate::ident::TimeBlock;
use crate::requests::{Candidate, Request, RequestIndex};
use crate::selection::{self, BranchAndBound, SelectionSolver, SolveError};

use super::{BlockOutcome, PlanError, PlanWarning, SchedulePlan};

/// Turns desks and requests into a [`SchedulePlan`].
///
/// Holds the validated parameters and the selection backend. Blocks never
/// share mutable state, so they are solved concurrently on the rayon pool
/// (or a dedicated pool when [`with_threads`](Self::with_threads) is set) and
/// joined before aggregation.
#[derive(Debug, Clone)]
pub struct DeskPlanner<S = BranchAndBound> {
    params: Parameters,
    solver: S,
    threads: Option<usize>,
}

impl DeskPlanner<BranchAndBound> {
    /// Creates a planner with the exact branch-and-bound backend.
    ///
    /// # Errors
    ///
    /// Returns the first invalid parameter.
    pub fn new(params: Parameters) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            params,
            solver: BranchAndBound::new(),
            threads: None,
        })
    }
}

impl<S: SelectionSolver> DeskPlanner<S> {
    /// Replaces the selection backend.
    pub fn with_solver<T: SelectionSolver>(self, solver: T) -> DeskPlanner<T> {
        DeskPlanner {
            params: self.params,
            solver,
            threads: self.threads,
        }
    }

    /// Solves blocks on a dedicated pool of `threads` workers.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Builds the floor plan from `desks` and plans `requests` on it.
    pub fn plan(&self, desks: Vec<Desk>, requests: &[Request]) -> Result<SchedulePlan, PlanError> {
        let floor_plan = FloorPlan::new(desks, &self.params)?;
        self.plan_on(&floor_plan, requests)
    }

    /// Plans `requests` on an existing floor plan.
    ///
    /// # Errors
    ///
    /// `PlanError::Config` if the floor plan was built with a different safety
    /// distance or conflict scope than this planner's parameters, and
    /// `PlanError::Request` for a request naming an unknown desk.
    pub fn plan_on(
        &self,
        floor_plan: &FloorPlan,
        requests: &[Request],
    ) -> Result<SchedulePlan, PlanError> {
        if floor_plan.safety_distance() != self.params.safety_distance
            || floor_plan.scope() != self.params.conflict_scope
        {
            return Err(ConfigError::FloorPlanMismatch {
                plan_distance: floor_plan.safety_distance(),
                plan_scope: floor_plan.scope(),
                distance: self.params.safety_distance,
                scope: self.params.conflict_scope,
            }
            .into());
        }

        let run_id = crate::generate_id();
        let span = tracing::info_span!("plan", run_id = %run_id);
        let _guard = span.enter();

        let index = RequestIndex::build(requests, floor_plan)?;
        info!(
            desks = floor_plan.len(),
            conflicts = floor_plan.conflict_count(),
            requests = requests.len(),
            students = index.student_count(),
            blocks = index.block_count(),
            solver = self.solver.name(),
            "planning desk schedule"
        );

        let mut outcomes = self.solve_blocks(&index, floor_plan)?;
        let (rescues, rescue_warnings) = match self.params.fairness {
            FairnessPolicy::PerBlock => (Vec::new(), Vec::new()),
            FairnessPolicy::RescueUnserved => self.rescue_unserved(&index, floor_plan, &mut outcomes),
        };

        let plan = SchedulePlan::assemble(run_id, &index, outcomes, rescues, rescue_warnings);
        info!(
            assignments = plan.schedule().len(),
            served = plan.served_count(),
            unserved = plan.students().len() - plan.served_count(),
            warnings = plan.warnings().len(),
            "desk schedule ready"
        );
        Ok(plan)
    }

    fn solve_blocks(
        &self,
        index: &RequestIndex,
        floor_plan: &FloorPlan,
    ) -> Result<BTreeMap<TimeBlock, BlockOutcome>, PlanError> {
        let work: Vec<(&TimeBlock, &[Candidate])> = index.iter().collect();
        let solve_all = || {
            work.par_iter()
                .map(|&(block, candidates)| {
                    (block.clone(), self.solve_block(block, candidates, floor_plan))
                })
                .collect::<BTreeMap<_, _>>()
        };

        match self.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|err| PlanError::ThreadPool(err.to_string()))?;
                Ok(pool.install(solve_all))
            }
            None => Ok(solve_all()),
        }
    }

    fn solve_block(
        &self,
        block: &TimeBlock,
        candidates: &[Candidate],
        floor_plan: &FloorPlan,
    ) -> BlockOutcome {
        let _span = tracing::debug_span!("block", block = %block).entered();
        let started = Instant::now();

        match selection::select(candidates, &[], floor_plan, &self.params, &self.solver) {
            Ok(selected) => {
                debug!(
                    candidates = candidates.len(),
                    selected = selected.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "block solved"
                );
                BlockOutcome::Solved {
                    candidates: candidates.len(),
                    selected,
                }
            }
            Err(error) => {
                warn!(candidates = candidates.len(), %error, "block failed");
                BlockOutcome::Failed {
                    candidates: candidates.len(),
                    error,
                }
            }
        }
    }

    /// Grants unserved students a block where possible without unserving
    /// anyone.
    ///
    /// Students are visited in name order and their blocks in block order. A
    /// block is re-solved with the student's candidate forced in, together
    /// with every selected student for whom this block is the only one
    /// honored. The first feasible re-solve replaces the block's selection.
    /// Re-solves that fail for any reason other than infeasibility are
    /// returned as warnings.
    fn rescue_unserved(
        &self,
        index: &RequestIndex,
        floor_plan: &FloorPlan,
        outcomes: &mut BTreeMap<TimeBlock, BlockOutcome>,
    ) -> (Vec<(String, TimeBlock)>, Vec<PlanWarning>) {
        let mut honored: BTreeMap<String, BTreeSet<TimeBlock>> = BTreeMap::new();
        for (block, outcome) in outcomes.iter() {
            for candidate in outcome.selected() {
                honored
                    .entry(candidate.student.clone())
                    .or_default()
                    .insert(block.clone());
            }
        }

        let mut rescues = Vec::new();
        let mut warnings = Vec::new();
        for (student, requested) in index.students() {
            if honored.get(student).is_some_and(|blocks| !blocks.is_empty()) {
                continue;
            }

            'blocks: for block in requested {
                let Some(outcome) = outcomes.get(block) else {
                    continue;
                };
                if outcome.is_failed() {
                    continue;
                }
                let candidates = index.candidates(block);

                let mut pinned: Vec<Candidate> = Vec::new();
                let mut pinned_students = BTreeSet::new();
                for candidate in outcome.selected() {
                    let sole_block = honored
                        .get(&candidate.student)
                        .is_some_and(|blocks| blocks.len() == 1);
                    if sole_block && pinned_students.insert(candidate.student.as_str()) {
                        pinned.push(candidate.clone());
                    }
                }

                for own in candidates.iter().filter(|c| c.student == student) {
                    let mut forced = pinned.clone();
                    forced.push(own.clone());

                    match selection::select(candidates, &forced, floor_plan, &self.params, &self.solver) {
                        Ok(selected) => {
                            for previous in outcome.selected() {
                                if let Some(blocks) = honored.get_mut(&previous.student) {
                                    blocks.remove(block);
                                }
                            }
                            for granted in &selected {
                                honored
                                    .entry(granted.student.clone())
                                    .or_default()
                                    .insert(block.clone());
                            }
                            warn!(student, block = %block, "re-solved block to serve unserved student");
                            outcomes.insert(
                                block.clone(),
                                BlockOutcome::Solved {
                                    candidates: candidates.len(),
                                    selected,
                                },
                            );
                            rescues.push((student.to_string(), block.clone()));
                            break 'blocks;
                        }
                        Err(SolveError::Infeasible) => {}
                        Err(error) => {
                            warn!(student, block = %block, %error, "rescue attempt failed");
                            warnings.push(PlanWarning::RescueFailed {
                                student: student.to_string(),
                                block: block.clone(),
                                error,
                            });
                        }
                    }
                }
            }
        }
        (rescues, warnings)
    }
}
