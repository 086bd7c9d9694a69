//! Per-block and per-student results of a planning run.

use std::collections::BTreeSet;
use std::fmt;

use crate::ident::TimeBlock;
use crate::requests::Candidate;
use crate::selection::SolveError;

/// Result of solving one time block.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockOutcome {
    Solved {
        candidates: usize,
        selected: Vec<Candidate>,
    },
    /// The solver gave up; the block contributes no assignments.
    Failed { candidates: usize, error: SolveError },
}

impl BlockOutcome {
    /// Candidates granted in this block; empty for a failed block.
    pub fn selected(&self) -> &[Candidate] {
        match self {
            BlockOutcome::Solved { selected, .. } => selected,
            BlockOutcome::Failed { .. } => &[],
        }
    }

    pub fn candidate_count(&self) -> usize {
        match self {
            BlockOutcome::Solved { candidates, .. } | BlockOutcome::Failed { candidates, .. } => {
                *candidates
            }
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, BlockOutcome::Failed { .. })
    }

    pub fn error(&self) -> Option<&SolveError> {
        match self {
            BlockOutcome::Failed { error, .. } => Some(error),
            BlockOutcome::Solved { .. } => None,
        }
    }
}

/// Which of a student's requested blocks were honored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentSummary {
    pub requested: BTreeSet<TimeBlock>,
    pub honored: BTreeSet<TimeBlock>,
}

impl StudentSummary {
    /// A student is unserved when none of their blocks was honored. This is a
    /// normal outcome under scarcity, not an error.
    pub fn is_served(&self) -> bool {
        !self.honored.is_empty()
    }

    /// Requested blocks that were not honored.
    pub fn missed(&self) -> impl Iterator<Item = &TimeBlock> {
        self.requested.difference(&self.honored)
    }
}

/// Non-fatal problem surfaced alongside the schedule.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanWarning {
    BlockFailed { block: TimeBlock, error: SolveError },
    /// A rescue re-solve gave up; the block keeps its earlier selection.
    RescueFailed {
        student: String,
        block: TimeBlock,
        error: SolveError,
    },
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanWarning::BlockFailed { block, error } => {
                write!(f, "block {} could not be scheduled: {}", block, error)
            }
            PlanWarning::RescueFailed {
                student,
                block,
                error,
            } => write!(
                f,
                "could not re-solve block {} for unserved student {}: {}",
                block, student, error
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn failed_block_selects_nothing() {
        let outcome = BlockOutcome::Failed {
            candidates: 4,
            error: SolveError::Infeasible,
        };
        assert!(outcome.selected().is_empty());
        assert_eq!(outcome.candidate_count(), 4);
        assert_eq!(outcome.error(), Some(&SolveError::Infeasible));
    }

    #[test]
    fn missed_blocks() {
        let summary = StudentSummary {
            requested: ["1", "2", "3"].into_iter().map(TimeBlock::from).collect(),
            honored: ["2"].into_iter().map(TimeBlock::from).collect(),
        };
        assert!(summary.is_served());
        let missed: Vec<&str> = summary.missed().map(TimeBlock::as_str).collect();
        assert_eq!(missed, vec!["1", "3"]);
    }

    #[test]
    fn warning_display() {
        let warning = PlanWarning::BlockFailed {
            block: TimeBlock::from("5"),
            error: SolveError::TimedOut {
                elapsed: Duration::from_secs(2),
            },
        };
        assert_eq!(
            warning.to_string(),
            "block 5 could not be scheduled: solver timed out after 2s"
        );
    }
}
