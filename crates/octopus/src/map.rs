use octopus_geom::Envelope;
use octopus_graph::{Color, EdgeId, Graph, NodeId, Route, SignatureKind};

use crate::conflict::{Conflict, ConflictFilter, ConflictFinder};
use crate::error::Result;
use crate::options::MakeSpaceOptions;

/// A metro-map graph together with the margins and limits used to make space in it.
#[derive(Debug)]
pub struct MetroMap {
    graph: Graph,
    options: MakeSpaceOptions,
}

impl MetroMap {
    pub fn new(options: MakeSpaceOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            graph: Graph::new(options.precision()),
            options,
        })
    }

    pub fn options(&self) -> &MakeSpaceOptions {
        &self.options
    }

    pub fn route_margin(&self) -> f64 {
        self.options.route_margin
    }

    pub fn edge_margin(&self) -> f64 {
        self.options.edge_margin
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn create_node(&mut self, x: f64, y: f64, name: &str, kind: SignatureKind) -> NodeId {
        self.graph.create_node(x, y, Some(name), kind)
    }

    pub fn create_edge(&mut self, a: NodeId, b: NodeId, routes: &[Route]) -> Result<EdgeId> {
        Ok(self.graph.create_edge(a, b, routes)?)
    }

    pub fn create_route(&mut self, line_width: f64, color: Color) -> Route {
        self.graph.create_route(line_width, color)
    }

    /// Every overlapping pair of element buffers, most urgent first.
    pub fn evaluate_conflicts(&self) -> Vec<Conflict> {
        self.finder().find(None)
    }

    pub fn evaluate_conflicts_with(&self, filter: ConflictFilter) -> Vec<Conflict> {
        self.finder().find(Some(filter))
    }

    fn finder(&self) -> ConflictFinder<'_> {
        ConflictFinder::new(&self.graph, self.options.route_margin, self.options.edge_margin)
    }

    pub fn bounding_box(&self) -> Option<Envelope> {
        self.graph.bounding_box()
    }

    /// Width and height of the bounding box, rounded up to whole units.
    pub fn size(&self) -> Option<(f64, f64)> {
        self.bounding_box()
            .map(|b| (b.width().ceil(), b.height().ceil()))
    }

    pub fn count_non_octilinear_edges(&self) -> usize {
        self.graph.non_octilinear_edges().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_rounds_up() {
        let mut map = MetroMap::new(MakeSpaceOptions::default()).unwrap();
        assert_eq!(map.size(), None);
        map.create_node(0.0, 0.0, "a", SignatureKind::RectangleStation);
        map.create_node(10.2, 0.0, "b", SignatureKind::RectangleStation);
        assert_eq!(map.size(), Some((31.0, 20.0)));
    }
}
