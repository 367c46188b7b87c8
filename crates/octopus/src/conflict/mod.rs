//! Overlapping element buffers and how far they have to move apart.

mod finder;

pub use finder::{ConflictFilter, ConflictFinder, compare_conflicts};

use octopus_geom::{
    Point, Polygon, Vector, angle, fold_to_quadrant, longest_parallel_segment, projection, vector,
};
use octopus_graph::{EdgeId, Graph, NodeId, OctilinearDirection};
use serde::{Deserialize, Serialize};

use crate::buffer::{Element, ElementBuffer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictType {
    /// Two nodes joined by a diagonal edge.
    AdjacentNodeNodeDiagonal,
    AdjacentNodeNode,
    NodeNode,
    NodeEdge,
    EdgeEdge,
}

impl ConflictType {
    /// Higher ranks are solved first.
    pub fn rank(self) -> u32 {
        match self {
            Self::AdjacentNodeNodeDiagonal | Self::AdjacentNodeNode | Self::NodeNode => 40,
            Self::NodeEdge | Self::EdgeEdge => 30,
        }
    }

    pub fn classify(graph: &Graph, a: Element, b: Element) -> Self {
        match (a, b) {
            (Element::Node(na), Element::Node(nb)) => match graph.edge_between(na, nb) {
                Some(e) if graph.edge(e).is_diagonal() => Self::AdjacentNodeNodeDiagonal,
                Some(_) => Self::AdjacentNodeNode,
                None => Self::NodeNode,
            },
            (Element::Edge(_), Element::Edge(_)) => Self::EdgeEdge,
            _ => Self::NodeEdge,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn coordinate(self, p: Point) -> f64 {
        match self {
            Self::X => p.x,
            Self::Y => p.y,
        }
    }

    pub fn unit(self) -> Vector {
        match self {
            Self::X => vector(1.0, 0.0),
            Self::Y => vector(0.0, 1.0),
        }
    }

    /// Displacement pushes towards the greater coordinate.
    pub fn direction(self) -> OctilinearDirection {
        match self {
            Self::X => OctilinearDirection::East,
            Self::Y => OctilinearDirection::North,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }
}

/// Longest chord through the overlap, parallel to the line between both elements.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveVector {
    vector: Vector,
    segment: Option<(Point, Point)>,
}

impl MoveVector {
    pub fn zero() -> Self {
        Self {
            vector: Vector::zero(),
            segment: None,
        }
    }

    pub fn from_segment(start: Point, end: Point) -> Self {
        Self {
            vector: end - start,
            segment: Some((start, end)),
        }
    }

    pub fn vector(&self) -> Vector {
        self.vector
    }

    pub fn x(&self) -> f64 {
        self.vector.x
    }

    pub fn y(&self) -> f64 {
        self.vector.y
    }

    pub fn length(&self) -> f64 {
        self.vector.length()
    }

    pub fn segment(&self) -> Option<(Point, Point)> {
        self.segment
    }

    pub fn projection(&self, along: Vector) -> Vector {
        projection(self.vector, along)
    }

    pub fn angle(&self, other: Vector) -> f64 {
        angle(self.vector, other)
    }
}

#[derive(Debug, Clone)]
pub struct Conflict {
    buffer_a: ElementBuffer,
    buffer_b: ElementBuffer,
    conflict_type: ConflictType,
    polygon: Polygon,
    move_vector: MoveVector,
    projection_x: Vector,
    projection_y: Vector,
    axis: Axis,
    origin: Point,
}

impl Conflict {
    pub fn new(graph: &Graph, buffer_a: ElementBuffer, buffer_b: ElementBuffer) -> Self {
        let precision = graph.precision();
        let polygon = precision.intersection(buffer_a.polygon(), buffer_b.polygon());
        let centroid_a = buffer_a.element().centroid(graph);
        let centroid_b = buffer_b.element().centroid(graph);

        let move_vector = longest_parallel_segment(&polygon, centroid_a, centroid_b)
            .map(|(s, e)| MoveVector::from_segment(precision.snap(s), precision.snap(e)))
            .unwrap_or_else(MoveVector::zero);

        let projection_x = precision.snap_vector(move_vector.projection(Axis::X.unit()));
        let projection_y = precision.snap_vector(move_vector.projection(Axis::Y.unit()));
        let alpha_x = fold_to_quadrant(move_vector.angle(Axis::X.unit()));
        let alpha_y = fold_to_quadrant(move_vector.angle(Axis::Y.unit()));

        let mut axis = if alpha_y < alpha_x { Axis::X } else { Axis::Y };
        // An axis-parallel chord projects to nothing on the other axis; push along the chord.
        let best = |axis: Axis| match axis {
            Axis::X => projection_x,
            Axis::Y => projection_y,
        };
        if precision.is_zero(best(axis).length()) && !precision.is_zero(move_vector.length()) {
            axis = axis.other();
        }

        let origin = precision
            .centroid(&polygon)
            .unwrap_or_else(|| centroid_a.lerp(centroid_b, 0.5));
        let conflict_type = ConflictType::classify(graph, buffer_a.element(), buffer_b.element());

        Self {
            buffer_a,
            buffer_b,
            conflict_type,
            polygon,
            move_vector,
            projection_x,
            projection_y,
            axis,
            origin,
        }
    }

    pub fn buffer_a(&self) -> &ElementBuffer {
        &self.buffer_a
    }

    pub fn buffer_b(&self) -> &ElementBuffer {
        &self.buffer_b
    }

    pub fn element_pair(&self) -> (Element, Element) {
        (self.buffer_a.element(), self.buffer_b.element())
    }

    pub fn conflict_type(&self) -> ConflictType {
        self.conflict_type
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn move_vector(&self) -> &MoveVector {
        &self.move_vector
    }

    pub fn best_displace_axis(&self) -> Axis {
        self.axis
    }

    pub fn best_displace_vector(&self) -> Vector {
        match self.axis {
            Axis::X => self.projection_x,
            Axis::Y => self.projection_y,
        }
    }

    pub fn best_displace_direction(&self) -> OctilinearDirection {
        self.axis.direction()
    }

    /// Whole units to push along the best axis.
    pub fn best_displace_distance(&self) -> u32 {
        ceil_units(self.best_displace_vector().length())
    }

    pub fn displace_distance_along_x(&self) -> u32 {
        ceil_units(self.projection_x.length())
    }

    pub fn displace_distance_along_y(&self) -> u32 {
        ceil_units(self.projection_y.length())
    }

    /// Point on the line separating the nodes that move from the ones that stay.
    pub fn displacement_origin(&self) -> Point {
        self.origin
    }

    pub fn is_solved(&self) -> bool {
        self.polygon.is_empty()
    }

    pub fn nodes(&self) -> Vec<NodeId> {
        [self.buffer_a.element(), self.buffer_b.element()]
            .into_iter()
            .filter_map(Element::as_node)
            .collect()
    }

    pub fn edges(&self) -> Vec<EdgeId> {
        [self.buffer_a.element(), self.buffer_b.element()]
            .into_iter()
            .filter_map(Element::as_edge)
            .collect()
    }

    pub fn is_conflict_element(&self, element: Element) -> bool {
        element == self.buffer_a.element() || element == self.buffer_b.element()
    }

    /// True for both conflict elements and anything adjacent to them.
    pub fn is_conflict_related(&self, graph: &Graph, element: Element) -> bool {
        self.is_conflict_element(element)
            || self.buffer_a.element().is_adjacent(element, graph)
            || self.buffer_b.element().is_adjacent(element, graph)
    }

    pub fn describe(&self, graph: &Graph) -> String {
        format!(
            "{:?} {{{}, {}, distance={}, axis={:?}}}",
            self.conflict_type,
            self.buffer_a.element().label(graph),
            self.buffer_b.element().label(graph),
            self.best_displace_distance(),
            self.axis
        )
    }
}

fn ceil_units(length: f64) -> u32 {
    let units = length.abs().ceil();
    if units >= u32::MAX as f64 {
        u32::MAX
    } else {
        units as u32
    }
}
