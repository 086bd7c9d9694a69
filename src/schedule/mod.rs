//! Schedule aggregation: per-block selections merged into one schedule.
//!
//! [`DeskPlanner`] solves every time block independently (in parallel), then
//! unions the selections into a [`Schedule`] of [`Assignment`] triples and
//! summarizes, per student, which requested blocks were honored.
//!
//! # Examples
//!
//! ```
//! use deskplan::config::Parameters;
//! use deskplan::floor_plan::Desk;
//! use deskplan::requests::Request;
//! use deskplan::schedule::DeskPlanner;
//!
//! let desks = vec![
//!     Desk::new("1", "101", 1, 0.0, 0.0),
//!     Desk::new("2", "101", 1, 3.0, 0.0),
//! ];
//! let requests = vec![
//!     Request::new("amy", "1", ["mon"]),
//!     Request::new("bob", "2", ["mon", "tue"]),
//! ];
//!
//! let planner = DeskPlanner::new(Parameters::new(5.0, 4, 10)).unwrap();
//! let plan = planner.plan(desks, &requests).unwrap();
//!
//! // Desks 1 and 2 are too close to share "mon"; amy wins the tie.
//! assert_eq!(plan.schedule().len(), 2);
//! assert!(plan.student("amy").unwrap().is_served());
//! assert_eq!(plan.unserved().count(), 0);
//! ```

mod assignment;
pub mod errors;
mod outcome;
mod planner;


pub use assignment::Assignment;
pub use errors::PlanError;
pub use outcome::{BlockOutcome, PlanWarning, StudentSummary};
pub use planner::DeskPlanner;

use std::collections::{BTreeMap, BTreeSet};

use crate::floor_plan::FloorPlan;
use crate::ident::{compare_labels, TimeBlock};
use crate::requests::RequestIndex;
use crate::Id;

/// Set of assignments, iterated by block, then desk, then student.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    assignments: BTreeSet<Assignment>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Inserts an assignment; returns false if it was already present.
    pub fn add(&mut self, assignment: Assignment) -> bool {
        self.assignments.insert(assignment)
    }

    pub fn contains(&self, assignment: &Assignment) -> bool {
        self.assignments.contains(assignment)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter()
    }

    /// Assignments within one block.
    pub fn for_block<'a>(&'a self, block: &'a TimeBlock) -> impl Iterator<Item = &'a Assignment> {
        self.assignments
            .iter()
            .filter(move |assignment| &assignment.time_block == block)
    }

    /// Assignments granted to one student.
    pub fn for_student<'a>(&'a self, student: &'a str) -> impl Iterator<Item = &'a Assignment> {
        self.assignments
            .iter()
            .filter(move |assignment| assignment.student == student)
    }

    /// Assignments grouped by student name.
    pub fn by_student(&self) -> BTreeMap<&str, Vec<&Assignment>> {
        let mut grouped: BTreeMap<&str, Vec<&Assignment>> = BTreeMap::new();
        for assignment in &self.assignments {
            grouped
                .entry(assignment.student.as_str())
                .or_default()
                .push(assignment);
        }
        grouped
    }

    /// Assignments grouped by the office of their desk, offices in label
    /// order (numeric-aware, as for desks and blocks).
    ///
    /// Desks missing from `plan` are grouped under an empty office name.
    pub fn by_office<'a>(&'a self, plan: &'a FloorPlan) -> Vec<(&'a str, Vec<&'a Assignment>)> {
        let mut grouped: BTreeMap<&str, Vec<&Assignment>> = BTreeMap::new();
        for assignment in &self.assignments {
            let office = plan
                .desk(&assignment.desk)
                .map(|desk| desk.office.as_str())
                .unwrap_or("");
            grouped.entry(office).or_default().push(assignment);
        }
        let mut offices: Vec<_> = grouped.into_iter().collect();
        offices.sort_by(|(a, _), (b, _)| compare_labels(a, b));
        offices
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a Assignment;
    type IntoIter = std::collections::btree_set::Iter<'a, Assignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.assignments.iter()
    }
}

/// Everything a planning run produces: the schedule, per-block outcomes,
/// per-student summaries and warnings.
#[derive(Debug, Clone)]
pub struct SchedulePlan {
    run_id: Id,
    schedule: Schedule,
    blocks: BTreeMap<TimeBlock, BlockOutcome>,
    students: BTreeMap<String, StudentSummary>,
    rescues: Vec<(String, TimeBlock)>,
    warnings: Vec<PlanWarning>,
}

impl SchedulePlan {
    pub(crate) fn assemble(
        run_id: Id,
        index: &RequestIndex,
        blocks: BTreeMap<TimeBlock, BlockOutcome>,
        rescues: Vec<(String, TimeBlock)>,
        rescue_warnings: Vec<PlanWarning>,
    ) -> Self {
        let mut schedule = Schedule::new();
        let mut warnings = Vec::new();
        for (block, outcome) in &blocks {
            for candidate in outcome.selected() {
                schedule.add(Assignment::from_candidate(candidate, block));
            }
            if let Some(error) = outcome.error() {
                warnings.push(PlanWarning::BlockFailed {
                    block: block.clone(),
                    error: error.clone(),
                });
            }
        }
        warnings.extend(rescue_warnings);

        let students = index
            .students()
            .map(|(name, requested)| {
                let honored = schedule
                    .for_student(name)
                    .map(|assignment| assignment.time_block.clone())
                    .collect();
                let summary = StudentSummary {
                    requested: requested.clone(),
                    honored,
                };
                (name.to_string(), summary)
            })
            .collect();

        Self {
            run_id,
            schedule,
            blocks,
            students,
            rescues,
            warnings,
        }
    }

    /// Unique id of the run that produced this plan (also on its log span).
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn blocks(&self) -> &BTreeMap<TimeBlock, BlockOutcome> {
        &self.blocks
    }

    pub fn block(&self, block: &TimeBlock) -> Option<&BlockOutcome> {
        self.blocks.get(block)
    }

    pub fn students(&self) -> &BTreeMap<String, StudentSummary> {
        &self.students
    }

    pub fn student(&self, name: &str) -> Option<&StudentSummary> {
        self.students.get(name)
    }

    /// Students granted no block at all, in name order.
    pub fn unserved(&self) -> impl Iterator<Item = &str> {
        self.students
            .iter()
            .filter(|(_, summary)| !summary.is_served())
            .map(|(name, _)| name.as_str())
    }

    pub fn served_count(&self) -> usize {
        self.students.values().filter(|s| s.is_served()).count()
    }

    /// `(student, block)` pairs granted by the rescue pass, in the order they
    /// were applied.
    pub fn rescues(&self) -> &[(String, TimeBlock)] {
        &self.rescues
    }

    /// Failed blocks first (block order), then failed rescue attempts.
    pub fn warnings(&self) -> &[PlanWarning] {
        &self.warnings
    }

    /// Blocks whose solve failed.
    pub fn failed_blocks(&self) -> impl Iterator<Item = &TimeBlock> {
        self.blocks
            .iter()
            .filter(|(_, outcome)| outcome.is_failed())
            .map(|(block, _)| block)
    }
}
