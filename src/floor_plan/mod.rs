//! Desk geometry and the safety-distance conflict graph.
//!
//! A [`FloorPlan`] owns the desk table of one run and an undirected conflict
//! graph over it. Two desks conflict iff their centroids are **strictly** closer
//! than the safety distance: desks exactly `safety_distance` apart may be
//! occupied together.
//!
//! # Invariants
//!
//! - Edges are symmetric and never connect a desk to itself
//! - The graph is derived once from `(desks, safety_distance, scope)`; a
//!   different distance or desk set means a new `FloorPlan`
//! - With `safety_distance == 0` the graph has no edges, even for desks that
//!   share a centroid
//!
//! Construction compares every pair, which is fine for floor-sized desk tables.

mod desk;

pub use desk::{Desk, Point};

use std::collections::{BTreeMap, HashMap};

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::config::{validate_safety_distance, ConfigError, ConflictScope, Parameters};
use crate::ident::DeskId;

/// Unordered pair of desks closer than the safety distance.
///
/// Stored normalized so that `a < b`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictEdge {
    pub a: DeskId,
    pub b: DeskId,
    pub distance: f64,
}

/// Desk table plus derived conflict relation.
#[derive(Debug, Clone)]
pub struct FloorPlan {
    desks: BTreeMap<DeskId, Desk>,
    graph: UnGraph<DeskId, f64>,
    node_by_id: HashMap<DeskId, NodeIndex>,
    safety_distance: f64,
    scope: ConflictScope,
}

impl FloorPlan {
    /// Loads `desks` and derives the conflict graph for `params`.
    ///
    /// # Errors
    ///
    /// - `NegativeSafetyDistance` / `NonFiniteSafetyDistance` for a bad distance
    /// - `DuplicateDesk` if two records share an id
    /// - `InvalidCoordinate` for NaN or infinite centroids
    pub fn new(desks: Vec<Desk>, params: &Parameters) -> Result<Self, ConfigError> {
        validate_safety_distance(params.safety_distance)?;

        let mut table = BTreeMap::new();
        for desk in desks {
            if !desk.position.is_finite() {
                return Err(ConfigError::InvalidCoordinate {
                    desk: desk.id.clone(),
                    x: desk.position.x,
                    y: desk.position.y,
                });
            }
            if table.contains_key(&desk.id) {
                return Err(ConfigError::DuplicateDesk(desk.id));
            }
            table.insert(desk.id.clone(), desk);
        }

        let mut graph = UnGraph::with_capacity(table.len(), 0);
        let mut node_by_id = HashMap::with_capacity(table.len());
        for id in table.keys() {
            node_by_id.insert(id.clone(), graph.add_node(id.clone()));
        }

        let ordered: Vec<&Desk> = table.values().collect();
        for (i, first) in ordered.iter().enumerate() {
            // j > i: self-pairs are never candidates for an edge
            for second in &ordered[i + 1..] {
                if params.conflict_scope == ConflictScope::SameOffice
                    && first.office != second.office
                {
                    continue;
                }
                let distance = first.distance_to(second);
                if distance < params.safety_distance {
                    graph.add_edge(node_by_id[&first.id], node_by_id[&second.id], distance);
                }
            }
        }

        tracing::debug!(
            desks = table.len(),
            conflicts = graph.edge_count(),
            safety_distance = params.safety_distance,
            "built conflict graph"
        );

        Ok(Self {
            desks: table,
            graph,
            node_by_id,
            safety_distance: params.safety_distance,
            scope: params.conflict_scope,
        })
    }

    pub fn len(&self) -> usize {
        self.desks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.desks.is_empty()
    }

    pub fn safety_distance(&self) -> f64 {
        self.safety_distance
    }

    pub fn scope(&self) -> ConflictScope {
        self.scope
    }

    pub fn desk(&self, id: &DeskId) -> Option<&Desk> {
        self.desks.get(id)
    }

    pub fn contains(&self, id: &DeskId) -> bool {
        self.desks.contains_key(id)
    }

    /// Desks in id order.
    pub fn desks(&self) -> impl Iterator<Item = &Desk> {
        self.desks.values()
    }

    /// Number of conflict edges.
    pub fn conflict_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns true if `a` and `b` are distinct desks closer than the safety
    /// distance. Unknown ids never conflict.
    pub fn conflicts(&self, a: &DeskId, b: &DeskId) -> bool {
        match (self.node_by_id.get(a), self.node_by_id.get(b)) {
            (Some(&na), Some(&nb)) => na != nb && self.graph.find_edge(na, nb).is_some(),
            _ => false,
        }
    }

    /// Desks conflicting with `id`, in id order.
    pub fn neighbors(&self, id: &DeskId) -> Vec<&DeskId> {
        let Some(&node) = self.node_by_id.get(id) else {
            return Vec::new();
        };
        let mut out: Vec<&DeskId> = self.graph.neighbors(node).map(|n| &self.graph[n]).collect();
        out.sort();
        out.dedup();
        out
    }

    /// All conflict edges, normalized and sorted.
    pub fn conflict_edges(&self) -> Vec<ConflictEdge> {
        let mut edges: Vec<ConflictEdge> = self
            .graph
            .edge_references()
            .map(|edge| {
                let (a, b) = (&self.graph[edge.source()], &self.graph[edge.target()]);
                let (a, b) = if a <= b { (a, b) } else { (b, a) };
                ConflictEdge {
                    a: a.clone(),
                    b: b.clone(),
                    distance: *edge.weight(),
                }
            })
            .collect();
        edges.sort_by(|x, y| x.a.cmp(&y.a).then_with(|| x.b.cmp(&y.b)));
        edges
    }
}
