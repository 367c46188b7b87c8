//! Station symbols attached to nodes.

use octopus_geom::{Point, Polygon, PrecisionModel};
use serde::{Deserialize, Serialize};

use crate::Edge;

/// Route margin used when sizing station symbols.
pub const SIGNATURE_ROUTE_MARGIN: f64 = 5.0;
/// Smallest side length of a rectangle station.
pub const MIN_STATION_SIDE: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureKind {
    RectangleStation,
    SquareStation,
    /// Synthesized corner inserted to keep edges octilinear.
    Bend,
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeSignature {
    kind: SignatureKind,
    geometry: Polygon,
}

impl NodeSignature {
    pub(crate) fn new(kind: SignatureKind, position: Point) -> Self {
        Self {
            kind,
            geometry: Polygon::from_points([position]),
        }
    }

    pub fn kind(&self) -> SignatureKind {
        self.kind
    }

    pub fn geometry(&self) -> &Polygon {
        &self.geometry
    }

    pub fn convex_hull(&self) -> Polygon {
        self.geometry.convex_hull()
    }

    pub fn is_bend(&self) -> bool {
        self.kind == SignatureKind::Bend
    }

    pub(crate) fn recompute<'a>(
        &mut self,
        position: Point,
        adjacent: impl Iterator<Item = &'a Edge> + Clone,
        precision: &PrecisionModel,
    ) {
        self.geometry = match self.kind {
            SignatureKind::RectangleStation => {
                let width = widest(adjacent.clone().filter(|e| !e.is_horizontal()));
                let height = widest(adjacent.filter(|e| !e.is_vertical()));
                precision.snap_polygon(Polygon::rectangle(
                    position,
                    width.max(MIN_STATION_SIDE),
                    height.max(MIN_STATION_SIDE),
                ))
            }
            SignatureKind::SquareStation => {
                let diameter = widest(adjacent);
                precision.buffer_point(position, diameter / 2.0, false)
            }
            SignatureKind::Bend | SignatureKind::Empty => Polygon::from_points([position]),
        };
    }
}

fn widest<'a>(edges: impl Iterator<Item = &'a Edge>) -> f64 {
    edges
        .map(|e| e.width(SIGNATURE_ROUTE_MARGIN))
        .fold(None, |acc: Option<f64>, w| Some(acc.map_or(w, |a| a.max(w))))
        .unwrap_or(SIGNATURE_ROUTE_MARGIN)
}
