//! Margin polygons around graph elements.

use octopus_geom::{Envelope, Point, Polygon};
use octopus_graph::{EdgeId, Graph, NodeId};
use serde::{Deserialize, Serialize};

/// A node or an edge of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Element {
    Node(NodeId),
    Edge(EdgeId),
}

impl Element {
    pub fn as_node(self) -> Option<NodeId> {
        match self {
            Self::Node(id) => Some(id),
            Self::Edge(_) => None,
        }
    }

    pub fn as_edge(self) -> Option<EdgeId> {
        match self {
            Self::Edge(id) => Some(id),
            Self::Node(_) => None,
        }
    }

    /// Geometric center: the node position or the edge midpoint.
    pub fn centroid(self, graph: &Graph) -> Point {
        match self {
            Self::Node(id) => graph.node(id).position(),
            Self::Edge(id) => {
                let edge = graph.edge(id);
                edge.centroid()
                    .unwrap_or_else(|| graph.node(edge.node_a()).position())
            }
        }
    }

    /// Nodes and edges are adjacent when incident; two nodes when connected by an edge;
    /// two edges when they share an endpoint.
    pub fn is_adjacent(self, other: Element, graph: &Graph) -> bool {
        match (self, other) {
            (Self::Node(a), Self::Node(b)) => graph.are_adjacent(a, b),
            (Self::Node(n), Self::Edge(e)) | (Self::Edge(e), Self::Node(n)) => {
                graph.edge(e).is_incident(n)
            }
            (Self::Edge(a), Self::Edge(b)) => {
                let (ea, eb) = (graph.edge(a), graph.edge(b));
                a != b && (ea.is_incident(eb.node_a()) || ea.is_incident(eb.node_b()))
            }
        }
    }

    pub fn label(self, graph: &Graph) -> String {
        match self {
            Self::Node(id) => graph.node(id).label(),
            Self::Edge(id) => {
                let edge = graph.edge(id);
                match edge.name() {
                    Some(name) => name.to_string(),
                    None => format!(
                        "{}-{}",
                        graph.node(edge.node_a()).label(),
                        graph.node(edge.node_b()).label()
                    ),
                }
            }
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Node(id) => write!(f, "{id}"),
            Self::Edge(id) => write!(f, "{id}"),
        }
    }
}

/// Keep-out polygon of one element. Rebuilt from the graph with [`update`](Self::update).
#[derive(Debug, Clone)]
pub struct ElementBuffer {
    element: Element,
    route_margin: f64,
    margin: f64,
    polygon: Polygon,
    envelope: Option<Envelope>,
}

impl ElementBuffer {
    /// Signature hull inflated by `margin`.
    pub fn node(graph: &Graph, id: NodeId, margin: f64) -> Self {
        Self::build(graph, Element::Node(id), 0.0, margin)
    }

    /// Square-capped corridor of half width `(width + 2 * edge_margin) / 2`.
    pub fn edge(graph: &Graph, id: EdgeId, route_margin: f64, edge_margin: f64) -> Self {
        Self::build(graph, Element::Edge(id), route_margin, edge_margin)
    }

    fn build(graph: &Graph, element: Element, route_margin: f64, margin: f64) -> Self {
        let mut buffer = Self {
            element,
            route_margin,
            margin,
            polygon: Polygon::empty(),
            envelope: None,
        };
        buffer.update(graph);
        buffer
    }

    pub fn update(&mut self, graph: &Graph) {
        let precision = graph.precision();
        self.polygon = match self.element {
            Element::Node(id) => {
                let signature = graph.node(id).signature();
                precision.buffer_polygon(signature.geometry(), self.margin)
            }
            Element::Edge(id) => {
                let edge = graph.edge(id);
                let half_width = (edge.width(self.route_margin) + 2.0 * self.margin) / 2.0;
                precision.buffer_line(edge.line_string(), half_width, true)
            }
        };
        self.envelope = self.polygon.envelope();
    }

    pub fn element(&self) -> Element {
        self.element
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn envelope(&self) -> Option<&Envelope> {
        self.envelope.as_ref()
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    pub fn route_margin(&self) -> f64 {
        self.route_margin
    }
}

impl PartialEq for ElementBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element
            && self.route_margin == other.route_margin
            && self.margin == other.margin
    }
}
