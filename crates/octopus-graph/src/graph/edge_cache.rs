//! Edge snapshot cache used by [`Graph::edges`](super::Graph::edges).

use rustc_hash::FxBuildHasher;

use super::entries::{Edge, EdgeId, Node};

type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

#[derive(Debug, Clone)]
pub(in crate::graph) struct EdgeCache {
    pub(in crate::graph) generation: u64,
    pub(in crate::graph) edges: Vec<EdgeId>,
}

impl EdgeCache {
    /// Union of every live node's adjacency, skipping tombstoned edges.
    pub(in crate::graph) fn build<'a>(
        generation: u64,
        nodes: impl Iterator<Item = &'a Node>,
        arena: &[Edge],
    ) -> Self {
        let mut seen: HashSet<EdgeId> = HashSet::default();
        let mut edges = Vec::new();
        for node in nodes {
            for &e in &node.adjacent {
                if !arena[e.0].deleted && seen.insert(e) {
                    edges.push(e);
                }
            }
        }
        Self { generation, edges }
    }
}
