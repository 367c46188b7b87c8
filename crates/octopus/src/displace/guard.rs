use indexmap::IndexSet;
use octopus_graph::{Graph, NodeId, OctilinearDirection};
use rustc_hash::FxBuildHasher;

use super::DisplaceResult;

type NodeSet = IndexSet<NodeId, FxBuildHasher>;

/// Bookkeeping for one correction chain: which nodes were already touched, which may move
/// at all, and where the chain moved last.
#[derive(Debug, Clone)]
pub struct AdjustmentGuard {
    traversed: NodeSet,
    moveable: NodeSet,
    last_move_direction: OctilinearDirection,
    last_move_distance: f64,
}

impl AdjustmentGuard {
    /// Only nodes on the same side of the displacement line as `first_node` are moveable.
    pub fn new(graph: &Graph, result: &DisplaceResult, first_node: NodeId) -> Self {
        let axis = result.axis();
        let origin = axis.coordinate(result.displacement_origin());
        let first = axis.coordinate(graph.node(first_node).position());
        let moveable = graph
            .nodes()
            .filter(|n| {
                let c = axis.coordinate(n.position());
                if first < origin { c < origin } else { c > origin }
            })
            .map(|n| n.id())
            .collect();
        Self {
            traversed: NodeSet::default(),
            moveable,
            last_move_direction: result.direction(),
            last_move_distance: result.distance(),
        }
    }

    pub fn visit(&mut self, node: NodeId) {
        self.traversed.insert(node);
    }

    pub fn has_visited(&self, node: NodeId) -> bool {
        self.traversed.contains(&node)
    }

    pub fn traversed(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.traversed.iter().copied()
    }

    pub fn is_moveable(&self, node: NodeId) -> bool {
        self.moveable.contains(&node)
    }

    pub fn is_not_moveable(&self, node: NodeId) -> bool {
        !self.is_moveable(node)
    }

    /// Forgets the traversal so the guard can drive the actual correction.
    pub fn reuse(&mut self) -> &mut Self {
        self.traversed.clear();
        self
    }

    pub fn last_move_direction(&self) -> OctilinearDirection {
        self.last_move_direction
    }

    pub fn last_move_distance(&self) -> f64 {
        self.last_move_distance
    }

    pub fn set_last_move(&mut self, direction: OctilinearDirection, distance: f64) {
        self.last_move_direction = direction;
        self.last_move_distance = distance;
    }
}
