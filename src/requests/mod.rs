//! Request index: raw student requests regrouped per time block.
//!
//! The universe of time blocks is the union of every request's
//! `available_times`. Each block maps to its candidates in preference order
//! (ascending student, then desk). Repeated `(student, desk, block)` triples
//! collapse to one candidate; the same student asking for different desks
//! yields independent candidates.

mod error;
mod request;

pub use error::RequestError;
pub use request::{Candidate, Request};

use std::collections::{BTreeMap, BTreeSet};

use crate::floor_plan::FloorPlan;
use crate::ident::TimeBlock;

/// Per-block candidate lists plus per-student requested blocks.
#[derive(Debug, Clone, Default)]
pub struct RequestIndex {
    blocks: BTreeMap<TimeBlock, Vec<Candidate>>,
    students: BTreeMap<String, BTreeSet<TimeBlock>>,
}

impl RequestIndex {
    /// Indexes `requests`, checking every desk against `plan`.
    ///
    /// # Errors
    ///
    /// `UnknownDesk` for the first request naming a desk missing from the
    /// plan, `EmptyStudentName` for an anonymous request.
    pub fn build(requests: &[Request], plan: &FloorPlan) -> Result<Self, RequestError> {
        let mut blocks: BTreeMap<TimeBlock, BTreeSet<Candidate>> = BTreeMap::new();
        let mut students: BTreeMap<String, BTreeSet<TimeBlock>> = BTreeMap::new();

        for request in requests {
            if request.student_name.is_empty() {
                return Err(RequestError::EmptyStudentName(request.desk.clone()));
            }
            if !plan.contains(&request.desk) {
                return Err(RequestError::UnknownDesk {
                    student: request.student_name.clone(),
                    desk: request.desk.clone(),
                });
            }

            let requested = students.entry(request.student_name.clone()).or_default();
            for block in &request.available_times {
                requested.insert(block.clone());
                blocks
                    .entry(block.clone())
                    .or_default()
                    .insert(Candidate::new(request.student_name.clone(), request.desk.clone()));
            }
        }

        Ok(Self {
            blocks: blocks
                .into_iter()
                .map(|(block, candidates)| (block, candidates.into_iter().collect()))
                .collect(),
            students,
        })
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn student_count(&self) -> usize {
        self.students.len()
    }

    /// Total candidates over all blocks.
    pub fn candidate_count(&self) -> usize {
        self.blocks.values().map(Vec::len).sum()
    }

    /// Blocks in label order.
    pub fn blocks(&self) -> impl Iterator<Item = &TimeBlock> {
        self.blocks.keys()
    }

    /// Candidates for `block` in preference order; empty for unknown blocks.
    pub fn candidates(&self, block: &TimeBlock) -> &[Candidate] {
        self.blocks.get(block).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `(block, candidates)` pairs in block order.
    pub fn iter(&self) -> impl Iterator<Item = (&TimeBlock, &[Candidate])> {
        self.blocks.iter().map(|(block, c)| (block, c.as_slice()))
    }

    /// Every student with at least one request, including those with no
    /// available blocks, with the blocks they asked for.
    pub fn students(&self) -> impl Iterator<Item = (&str, &BTreeSet<TimeBlock>)> {
        self.students.iter().map(|(name, blocks)| (name.as_str(), blocks))
    }

    pub fn requested_blocks(&self, student: &str) -> Option<&BTreeSet<TimeBlock>> {
        self.students.get(student)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Parameters;
    use crate::floor_plan::Desk;
    use crate::ident::DeskId;

    fn plan() -> FloorPlan {
        let desks = vec![
            Desk::new("1", "101", 1, 0.0, 0.0),
            Desk::new("2", "101", 1, 10.0, 0.0),
            Desk::new("3", "205", 2, 0.0, 10.0),
        ];
        FloorPlan::new(desks, &Parameters::new(1.0, 5, 5)).unwrap()
    }

    fn tb(label: &str) -> TimeBlock {
        TimeBlock::from(label)
    }

    #[test]
    fn candidates_grouped_per_block() {
        let requests = vec![
            Request::new("bo", "2", ["1", "2"]),
            Request::new("al", "1", ["2"]),
        ];
        let index = RequestIndex::build(&requests, &plan()).unwrap();

        assert_eq!(index.block_count(), 2);
        assert_eq!(index.candidates(&tb("1")), &[Candidate::new("bo", "2")]);
        assert_eq!(
            index.candidates(&tb("2")),
            &[Candidate::new("al", "1"), Candidate::new("bo", "2")]
        );
    }

    #[test]
    fn duplicate_triples_collapse() {
        let requests = vec![
            Request::new("al", "1", ["1", "1"]),
            Request::new("al", "1", ["1"]),
        ];
        let index = RequestIndex::build(&requests, &plan()).unwrap();
        assert_eq!(index.candidates(&tb("1")).len(), 1);
        assert_eq!(index.candidate_count(), 1);
    }

    #[test]
    fn same_student_different_desks_kept_independent() {
        let requests = vec![
            Request::new("al", "1", ["1"]),
            Request::new("al", "3", ["1", "2"]),
        ];
        let index = RequestIndex::build(&requests, &plan()).unwrap();
        assert_eq!(
            index.candidates(&tb("1")),
            &[Candidate::new("al", "1"), Candidate::new("al", "3")]
        );
        assert_eq!(index.student_count(), 1);
        assert_eq!(index.requested_blocks("al").unwrap().len(), 2);
    }

    #[test]
    fn student_without_times_is_indexed_but_never_a_candidate() {
        let requests = vec![Request::new("cy", "2", Vec::<TimeBlock>::new())];
        let index = RequestIndex::build(&requests, &plan()).unwrap();
        assert_eq!(index.block_count(), 0);
        assert!(index.requested_blocks("cy").unwrap().is_empty());
    }

    #[test]
    fn unknown_desk_rejects_run() {
        let requests = vec![Request::new("al", "1", ["1"]), Request::new("bo", "42", ["1"])];
        let err = RequestIndex::build(&requests, &plan()).unwrap_err();
        assert_eq!(
            err,
            RequestError::UnknownDesk {
                student: "bo".to_string(),
                desk: DeskId::from("42"),
            }
        );
    }

    #[test]
    fn unknown_block_has_no_candidates() {
        let index = RequestIndex::build(&[], &plan()).unwrap();
        assert!(index.candidates(&tb("9")).is_empty());
    }
}
