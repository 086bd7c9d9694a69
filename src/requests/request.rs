use crate::ident::{DeskId, TimeBlock};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One student's request for one desk over a set of time blocks.
///
/// A student may appear in several requests, even for different desks; each
/// request is treated independently.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Request {
    pub desk: DeskId,
    pub student_name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub available_times: Vec<TimeBlock>,
}

impl Request {
    pub fn new(
        student_name: impl Into<String>,
        desk: impl Into<DeskId>,
        available_times: impl IntoIterator<Item = impl Into<TimeBlock>>,
    ) -> Self {
        Self {
            desk: desk.into(),
            student_name: student_name.into(),
            available_times: available_times.into_iter().map(Into::into).collect(),
        }
    }
}

/// A (student, desk) pair eligible for one block.
///
/// The derived order (student, then desk) is the preference order used to
/// break ties between equally large selections.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Candidate {
    pub student: String,
    pub desk: DeskId,
}

impl Candidate {
    pub fn new(student: impl Into<String>, desk: impl Into<DeskId>) -> Self {
        Self {
            student: student.into(),
            desk: desk.into(),
        }
    }
}
