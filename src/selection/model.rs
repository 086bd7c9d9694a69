//! Integer-program model of one block's selection problem.
//!
//! One binary variable per candidate; variables are numbered in preference
//! order so that variable `0` is the most preferred candidate. Constraints:
//!
//! - `x_i + x_j <= 1` for every pair of candidates whose desks conflict, and
//!   for every pair naming the same desk
//! - `sum(x_i in office) <= office_occupancy_cap` per office
//! - `sum(x_i on floor) <= floor_occupancy_cap` per floor
//! - `x_i = 1` for required candidates (fairness re-solves only)
//!
//! Objective: maximize `sum(x_i)`.

use std::collections::BTreeMap;

use crate::config::Parameters;
use crate::floor_plan::FloorPlan;
use crate::requests::Candidate;

use super::SolveError;

/// Partition a capacity group belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupKind {
    Office,
    Floor,
}

/// Variables sharing one occupancy cap.
///
/// Groups of the same kind are disjoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityGroup {
    pub kind: GroupKind,
    pub label: String,
    pub capacity: u32,
    pub members: Vec<usize>,
}

/// Constraint/objective description handed to a [`SelectionSolver`](super::SelectionSolver).
#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    candidates: Vec<Candidate>,
    conflicts: Vec<(usize, usize)>,
    adjacency: Vec<Vec<usize>>,
    groups: Vec<CapacityGroup>,
    memberships: Vec<Vec<usize>>,
    required: Vec<bool>,
}

impl SelectionModel {
    /// Builds the model for `candidates` against the floor plan's conflict
    /// graph and the caps in `params`.
    ///
    /// Candidates are sorted into preference order and deduplicated.
    pub fn build(
        candidates: &[Candidate],
        plan: &FloorPlan,
        params: &Parameters,
    ) -> Result<Self, SolveError> {
        let mut candidates = candidates.to_vec();
        candidates.sort();
        candidates.dedup();

        let mut desks = Vec::with_capacity(candidates.len());
        for candidate in &candidates {
            let desk = plan
                .desk(&candidate.desk)
                .ok_or_else(|| SolveError::UnknownDesk(candidate.desk.clone()))?;
            desks.push(desk);
        }

        let n = candidates.len();
        let mut conflicts = Vec::new();
        let mut adjacency = vec![Vec::new(); n];
        for i in 0..n {
            for j in i + 1..n {
                let same_desk = candidates[i].desk == candidates[j].desk;
                if same_desk || plan.conflicts(&candidates[i].desk, &candidates[j].desk) {
                    conflicts.push((i, j));
                    adjacency[i].push(j);
                    adjacency[j].push(i);
                }
            }
        }

        let mut offices: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        let mut floors: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for (var, desk) in desks.iter().enumerate() {
            offices.entry(desk.office.as_str()).or_default().push(var);
            floors.entry(desk.floor).or_default().push(var);
        }

        let mut groups = Vec::with_capacity(offices.len() + floors.len());
        groups.extend(offices.into_iter().map(|(office, members)| CapacityGroup {
            kind: GroupKind::Office,
            label: office.to_string(),
            capacity: params.office_occupancy_cap,
            members,
        }));
        groups.extend(floors.into_iter().map(|(floor, members)| CapacityGroup {
            kind: GroupKind::Floor,
            label: floor.to_string(),
            capacity: params.floor_occupancy_cap,
            members,
        }));

        let mut memberships = vec![Vec::new(); n];
        for (g, group) in groups.iter().enumerate() {
            for &var in &group.members {
                memberships[var].push(g);
            }
        }

        Ok(Self {
            candidates,
            conflicts,
            adjacency,
            groups,
            memberships,
            required: vec![false; n],
        })
    }

    /// Forces `candidate` into every solution. Returns false if it is not a
    /// variable of this model.
    pub fn require(&mut self, candidate: &Candidate) -> bool {
        match self.candidates.binary_search(candidate) {
            Ok(var) => {
                self.required[var] = true;
                true
            }
            Err(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidates in variable (preference) order.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Pairwise exclusions as `(i, j)` with `i < j`.
    pub fn conflicts(&self) -> &[(usize, usize)] {
        &self.conflicts
    }

    pub fn neighbors(&self, var: usize) -> &[usize] {
        &self.adjacency[var]
    }

    pub fn groups(&self) -> &[CapacityGroup] {
        &self.groups
    }

    /// Indices into [`groups`](Self::groups) containing `var`.
    pub fn groups_of(&self, var: usize) -> &[usize] {
        &self.memberships[var]
    }

    pub fn is_required(&self, var: usize) -> bool {
        self.required[var]
    }

    pub fn required(&self) -> impl Iterator<Item = usize> + '_ {
        self.required
            .iter()
            .enumerate()
            .filter_map(|(var, &required)| required.then_some(var))
    }

    /// Checks a solution (sorted variable indices) against every constraint.
    pub fn is_feasible(&self, selected: &[usize]) -> bool {
        let mut chosen = vec![false; self.len()];
        for &var in selected {
            if var >= self.len() || chosen[var] {
                return false;
            }
            chosen[var] = true;
        }
        if self.conflicts.iter().any(|&(i, j)| chosen[i] && chosen[j]) {
            return false;
        }
        let within_caps = self.groups.iter().all(|group| {
            let load = group.members.iter().filter(|&&var| chosen[var]).count();
            load <= group.capacity as usize
        });
        within_caps && self.required().all(|var| chosen[var])
    }

    /// Maps variable indices back to candidates.
    pub fn decode(&self, selected: &[usize]) -> Vec<Candidate> {
        selected.iter().map(|&var| self.candidates[var].clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::floor_plan::Desk;

    fn plan(params: &Parameters) -> FloorPlan {
        let desks = vec![
            Desk::new("1", "101", 1, 0.0, 0.0),
            Desk::new("2", "101", 1, 3.0, 0.0),
            Desk::new("3", "102", 1, 20.0, 0.0),
            Desk::new("4", "201", 2, 40.0, 0.0),
        ];
        FloorPlan::new(desks, params).unwrap()
    }

    #[test]
    fn variables_in_preference_order() {
        let params = Parameters::new(5.0, 10, 10);
        let candidates = vec![Candidate::new("zed", "1"), Candidate::new("amy", "3")];
        let model = SelectionModel::build(&candidates, &plan(&params), &params).unwrap();
        assert_eq!(model.candidates()[0], Candidate::new("amy", "3"));
        assert_eq!(model.candidates()[1], Candidate::new("zed", "1"));
    }

    #[test]
    fn geometric_and_same_desk_conflicts() {
        let params = Parameters::new(5.0, 10, 10);
        let candidates = vec![
            Candidate::new("a", "1"),
            Candidate::new("b", "2"),
            Candidate::new("c", "3"),
            Candidate::new("d", "3"),
        ];
        let model = SelectionModel::build(&candidates, &plan(&params), &params).unwrap();
        // a-b by distance (3 < 5), c-d share desk 3
        assert_eq!(model.conflicts(), &[(0, 1), (2, 3)]);
        assert_eq!(model.neighbors(3), &[2]);
    }

    #[test]
    fn office_and_floor_groups() {
        let params = Parameters::new(0.0, 2, 3);
        let candidates = vec![
            Candidate::new("a", "1"),
            Candidate::new("b", "3"),
            Candidate::new("c", "4"),
        ];
        let model = SelectionModel::build(&candidates, &plan(&params), &params).unwrap();
        let offices: Vec<&str> = model
            .groups()
            .iter()
            .filter(|g| g.kind == GroupKind::Office)
            .map(|g| g.label.as_str())
            .collect();
        assert_eq!(offices, vec!["101", "102", "201"]);
        let floor_one = model
            .groups()
            .iter()
            .find(|g| g.kind == GroupKind::Floor && g.label == "1")
            .unwrap();
        assert_eq!(floor_one.members, vec![0, 1]);
        assert_eq!(floor_one.capacity, 3);
        assert_eq!(model.groups_of(2).len(), 2);
    }

    #[test]
    fn feasibility_check() {
        let params = Parameters::new(5.0, 1, 10);
        let candidates = vec![
            Candidate::new("a", "1"),
            Candidate::new("b", "2"),
            Candidate::new("c", "3"),
        ];
        let mut model = SelectionModel::build(&candidates, &plan(&params), &params).unwrap();
        assert!(model.is_feasible(&[0, 2]));
        assert!(!model.is_feasible(&[0, 1]));
        assert!(model.require(&Candidate::new("b", "2")));
        assert!(!model.is_feasible(&[0, 2]));
        assert!(model.is_feasible(&[1, 2]));
        assert!(!model.require(&Candidate::new("nobody", "1")));
    }

    #[test]
    fn unknown_desk_is_reported() {
        let params = Parameters::default();
        let err = SelectionModel::build(&[Candidate::new("a", "99")], &plan(&params), &params)
            .unwrap_err();
        assert!(matches!(err, SolveError::UnknownDesk(_)));
    }
}
