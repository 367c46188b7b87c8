//! Node and edge records stored in the [`Graph`](super::Graph) arenas.

use indexmap::IndexSet;
use octopus_geom::{LineString, Point, PrecisionModel, Vector, angle_to_x_axis};
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};

use crate::direction::{AnyDirection, OctilinearDirection};
use crate::error::{Error, Result};
use crate::route::Route;
use crate::signature::NodeSignature;

pub(crate) type EdgeSet = IndexSet<EdgeId, FxBuildHasher>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub(crate) usize);

impl EdgeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) name: Option<String>,
    pub(crate) position: Point,
    pub(crate) signature: NodeSignature,
    pub(crate) adjacent: EdgeSet,
    pub(crate) deleted: bool,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name for diagnostics; falls back to the id.
    pub fn label(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    pub fn signature(&self) -> &NodeSignature {
        &self.signature
    }

    pub fn adjacent_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.adjacent.iter().copied()
    }

    pub fn degree(&self) -> usize {
        self.adjacent.len()
    }

    pub fn is_adjacent(&self, edge: EdgeId) -> bool {
        self.adjacent.contains(&edge)
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub(crate) id: EdgeId,
    pub(crate) name: Option<String>,
    pub(crate) a: NodeId,
    pub(crate) b: NodeId,
    pub(crate) routes: Vec<Route>,
    pub(crate) line: LineString,
    pub(crate) direction: AnyDirection,
    pub(crate) original_direction: OctilinearDirection,
    pub(crate) deleted: bool,
}

impl Edge {
    pub(crate) fn new(
        id: EdgeId,
        (a, pa): (NodeId, Point),
        (b, pb): (NodeId, Point),
        name: Option<String>,
        routes: Vec<Route>,
        precision: &PrecisionModel,
    ) -> Self {
        let mut edge = Self {
            id,
            name,
            a,
            b,
            routes: Vec::new(),
            line: LineString::segment(pa, pb),
            direction: AnyDirection::from_vector(pb - pa, precision),
            original_direction: OctilinearDirection::North,
            deleted: false,
        };
        edge.original_direction = edge.direction.to_octilinear();
        edge.add_routes(routes);
        edge
    }

    pub(crate) fn update_geometry(&mut self, pa: Point, pb: Point, precision: &PrecisionModel) {
        self.line = LineString::segment(pa, pb);
        self.direction = AnyDirection::from_vector(pb - pa, precision);
    }

    pub(crate) fn add_routes(&mut self, routes: impl IntoIterator<Item = Route>) {
        for route in routes {
            if !self.routes.contains(&route) {
                self.routes.push(route);
            }
        }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn node_a(&self) -> NodeId {
        self.a
    }

    pub fn node_b(&self) -> NodeId {
        self.b
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn has_routes(&self) -> bool {
        !self.routes.is_empty()
    }

    pub fn line_string(&self) -> &LineString {
        &self.line
    }

    /// Vector from A to B.
    pub fn vector(&self) -> Vector {
        match (self.line.start(), self.line.end()) {
            (Some(a), Some(b)) => b - a,
            _ => Vector::zero(),
        }
    }

    pub fn length(&self) -> f64 {
        self.line.length()
    }

    pub fn centroid(&self) -> Option<Point> {
        self.line.midpoint()
    }

    /// Counter-clockwise angle against the x axis, see [`angle_to_x_axis`].
    pub fn angle_to_x_axis(&self) -> f64 {
        angle_to_x_axis(&self.line)
    }

    /// Current bearing from A to B.
    pub fn direction(&self) -> AnyDirection {
        self.direction
    }

    /// Octilinear bearing from A to B recorded before the last displacement.
    pub fn original_direction(&self) -> OctilinearDirection {
        self.original_direction
    }

    pub fn is_octilinear(&self) -> bool {
        self.direction.is_octilinear()
    }

    pub fn is_horizontal(&self) -> bool {
        self.direction.as_octilinear().is_some_and(|d| d.is_horizontal())
    }

    pub fn is_vertical(&self) -> bool {
        self.direction.as_octilinear().is_some_and(|d| d.is_vertical())
    }

    pub fn is_diagonal(&self) -> bool {
        self.direction.as_octilinear().is_some_and(|d| d.is_diagonal())
    }

    /// Bundle width: route widths plus `route_margin` between routes beyond the second.
    pub fn width(&self, route_margin: f64) -> f64 {
        let sum: f64 = self.routes.iter().map(|r| r.line_width()).sum();
        sum + route_margin * self.routes.len().saturating_sub(2) as f64
    }

    pub fn is_incident(&self, node: NodeId) -> bool {
        self.a == node || self.b == node
    }

    pub fn other_node(&self, node: NodeId) -> Result<NodeId> {
        if node == self.a {
            Ok(self.b)
        } else if node == self.b {
            Ok(self.a)
        } else {
            Err(Error::NotAnEndpoint {
                edge: self.id,
                node,
            })
        }
    }

    /// Current bearing leaving `node`.
    pub fn direction_from(&self, node: NodeId) -> Result<AnyDirection> {
        if node == self.a {
            Ok(self.direction)
        } else if node == self.b {
            Ok(self.direction.opposite())
        } else {
            Err(Error::NotAnEndpoint {
                edge: self.id,
                node,
            })
        }
    }

    pub fn original_direction_from(&self, node: NodeId) -> Result<OctilinearDirection> {
        if node == self.a {
            Ok(self.original_direction)
        } else if node == self.b {
            Ok(self.original_direction.opposite())
        } else {
            Err(Error::NotAnEndpoint {
                edge: self.id,
                node,
            })
        }
    }

    /// Smallest axis-parallel offset that would make the edge octilinear.
    pub fn misalignment(&self) -> f64 {
        let v = self.vector();
        let (dx, dy) = (v.x.abs(), v.y.abs());
        dx.min(dy).min((dx - dy).abs())
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
}
