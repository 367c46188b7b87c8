use std::cmp::Ordering;

use octopus_geom::envelopes_intersect;
use octopus_graph::{EdgeId, Graph, NodeId};
use tracing::trace;

use super::{Conflict, ConflictType};
use crate::buffer::{Element, ElementBuffer};

/// Narrows the conflict list to the ones a displacement pass should work on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConflictFilter {
    /// Conflicts needing less than `correction_factor * edge_margin` are dropped.
    pub correction_factor: f64,
    /// Also drop node/edge conflicts where the node neighbours one of the edge's endpoints.
    pub major_misalignment_only: bool,
}

pub struct ConflictFinder<'a> {
    graph: &'a Graph,
    route_margin: f64,
    edge_margin: f64,
}

impl<'a> ConflictFinder<'a> {
    pub fn new(graph: &'a Graph, route_margin: f64, edge_margin: f64) -> Self {
        Self {
            graph,
            route_margin,
            edge_margin,
        }
    }

    /// Node buffers first, then edge buffers, in graph order.
    pub fn buffers(&self) -> Vec<ElementBuffer> {
        let nodes = self
            .graph
            .nodes()
            .map(|n| ElementBuffer::node(self.graph, n.id(), self.edge_margin));
        let edges = self.graph.edges().into_iter().map(|e| {
            ElementBuffer::edge(self.graph, e, self.route_margin, self.edge_margin)
        });
        nodes.chain(edges).collect()
    }

    /// All unsolved conflicts, most urgent first.
    pub fn find(&self, filter: Option<ConflictFilter>) -> Vec<Conflict> {
        let buffers = self.buffers();
        let mut conflicts = Vec::new();
        for (i, a) in buffers.iter().enumerate() {
            let Some(env_a) = a.envelope() else {
                continue;
            };
            for b in &buffers[i + 1..] {
                if is_incident_pair(self.graph, a.element(), b.element()) {
                    continue;
                }
                let Some(env_b) = b.envelope() else {
                    continue;
                };
                if !envelopes_intersect(env_a, env_b) {
                    continue;
                }
                let conflict = Conflict::new(self.graph, a.clone(), b.clone());
                if conflict.is_solved() {
                    continue;
                }
                if let Some(filter) = filter {
                    if !self.keep(&conflict, filter) {
                        trace!(conflict = %conflict.describe(self.graph), "filtered conflict");
                        continue;
                    }
                }
                conflicts.push(conflict);
            }
        }
        conflicts.sort_by(compare_conflicts);
        conflicts
    }

    fn keep(&self, conflict: &Conflict, filter: ConflictFilter) -> bool {
        if f64::from(conflict.best_displace_distance()) < filter.correction_factor * self.edge_margin
        {
            return false;
        }
        if filter.major_misalignment_only && conflict.conflict_type() == ConflictType::NodeEdge {
            let (node, edge) = match conflict.element_pair() {
                (Element::Node(n), Element::Edge(e)) | (Element::Edge(e), Element::Node(n)) => {
                    (n, e)
                }
                _ => return true,
            };
            return !neighbours_endpoint(self.graph, node, edge);
        }
        true
    }
}

/// Incident elements always overlap and are never reported.
fn is_incident_pair(graph: &Graph, a: Element, b: Element) -> bool {
    match (a, b) {
        (Element::Node(_), Element::Node(_)) => false,
        _ => a.is_adjacent(b, graph),
    }
}

fn neighbours_endpoint(graph: &Graph, node: NodeId, edge: EdgeId) -> bool {
    let edge = graph.edge(edge);
    graph.are_adjacent(node, edge.node_a()) || graph.are_adjacent(node, edge.node_b())
}

/// Descending by type rank, displacement distance, move vector length and components;
/// ties resolve by element pair so the order is total.
pub fn compare_conflicts(a: &Conflict, b: &Conflict) -> Ordering {
    let (mva, mvb) = (a.move_vector(), b.move_vector());
    b.conflict_type()
        .rank()
        .cmp(&a.conflict_type().rank())
        .then_with(|| b.best_displace_distance().cmp(&a.best_displace_distance()))
        .then_with(|| mvb.length().total_cmp(&mva.length()))
        .then_with(|| mvb.x().total_cmp(&mva.x()))
        .then_with(|| mvb.y().total_cmp(&mva.y()))
        .then_with(|| a.element_pair().cmp(&b.element_pair()))
}
