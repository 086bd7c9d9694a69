use std::fmt;

use crate::ident::{DeskId, TimeBlock};
use crate::requests::Candidate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A student granted a desk for one time block.
///
/// Ordered by block, then desk, then student, which is the order a
/// [`Schedule`](super::Schedule) iterates in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Assignment {
    pub time_block: TimeBlock,
    pub desk: DeskId,
    pub student: String,
}

impl Assignment {
    pub fn new(
        student: impl Into<String>,
        desk: impl Into<DeskId>,
        time_block: impl Into<TimeBlock>,
    ) -> Self {
        Self {
            time_block: time_block.into(),
            desk: desk.into(),
            student: student.into(),
        }
    }

    /// The assignment granting `candidate` in `block`.
    pub fn from_candidate(candidate: &Candidate, block: &TimeBlock) -> Self {
        Self {
            time_block: block.clone(),
            desk: candidate.desk.clone(),
            student: candidate.student.clone(),
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at desk {} during block {}",
            self.student, self.desk, self.time_block
        )
    }
}
