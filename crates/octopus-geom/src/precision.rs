use serde::{Deserialize, Serialize};

use crate::polygon::Polygon;
use crate::{CIRCLE_SEGMENTS, LineString, Point, Vector, point, vector};

/// Fixed-decimal precision applied to every coordinate the kernel hands out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct PrecisionModel {
    decimals: u32,
    scale: f64,
}

impl Default for PrecisionModel {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DECIMALS)
    }
}

impl From<u32> for PrecisionModel {
    fn from(decimals: u32) -> Self {
        Self::new(decimals)
    }
}

impl From<PrecisionModel> for u32 {
    fn from(model: PrecisionModel) -> Self {
        model.decimals
    }
}

impl PrecisionModel {
    pub const DEFAULT_DECIMALS: u32 = 6;

    pub fn new(decimals: u32) -> Self {
        let decimals = decimals.min(15);
        Self {
            decimals,
            scale: 10f64.powi(decimals as i32),
        }
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    /// Grid spacing; anything smaller is treated as zero.
    pub fn epsilon(&self) -> f64 {
        1.0 / self.scale
    }

    pub fn make_precise(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let rounded = (value * self.scale).round() / self.scale;
        // Avoid handing out negative zero.
        if rounded == 0.0 { 0.0 } else { rounded }
    }

    pub fn point(&self, x: f64, y: f64) -> Point {
        point(self.make_precise(x), self.make_precise(y))
    }

    pub fn snap(&self, p: Point) -> Point {
        self.point(p.x, p.y)
    }

    pub fn snap_vector(&self, v: Vector) -> Vector {
        vector(self.make_precise(v.x), self.make_precise(v.y))
    }

    pub fn is_zero(&self, value: f64) -> bool {
        value.abs() < self.epsilon()
    }

    /// Rectangle around a straight line. `square_ends` extends each end by the half width.
    ///
    /// A non-positive half width yields a degenerate polygon that reports itself empty.
    pub fn buffer_line(&self, line: &LineString, half_width: f64, square_ends: bool) -> Polygon {
        let points = line.points();
        if half_width <= 0.0 {
            return self.snap_polygon(Polygon::from_points(points.iter().copied()));
        }
        let mut parts = points
            .windows(2)
            .map(|pair| self.buffer_segment(pair[0], pair[1], half_width, square_ends));
        let Some(first) = parts.next() else {
            return match points.first() {
                Some(&p) => self.buffer_point(p, half_width, square_ends),
                None => Polygon::empty(),
            };
        };
        parts.fold(first, |acc, part| self.snap_polygon(acc.union(&part)))
    }

    fn buffer_segment(&self, a: Point, b: Point, half_width: f64, square_ends: bool) -> Polygon {
        let along = b - a;
        let length = along.length();
        if length <= self.epsilon() {
            return self.buffer_point(a, half_width, square_ends);
        }
        let u = along / length;
        let n = vector(-u.y, u.x) * half_width;
        let cap = if square_ends { u * half_width } else { vector(0.0, 0.0) };
        self.snap_polygon(Polygon::from_points([
            a - cap + n,
            b + cap + n,
            b + cap - n,
            a - cap - n,
        ]))
    }

    /// Square (side `2 * radius`) or circle around a single point.
    pub fn buffer_point(&self, p: Point, radius: f64, square: bool) -> Polygon {
        if radius <= 0.0 {
            return Polygon::from_points([self.snap(p)]);
        }
        if square {
            return Polygon::rectangle(self.snap(p), 2.0 * radius, 2.0 * radius).map(|q| self.snap(q));
        }
        let step = std::f64::consts::TAU / CIRCLE_SEGMENTS as f64;
        self.snap_polygon(Polygon::from_points((0..CIRCLE_SEGMENTS).map(|i| {
            let theta = step * i as f64;
            point(p.x + radius * theta.cos(), p.y + radius * theta.sin())
        })))
    }

    /// Convex hull of the polygon with every vertex pushed out by `margin` on both axes.
    pub fn buffer_polygon(&self, polygon: &Polygon, margin: f64) -> Polygon {
        let vertices = polygon.vertices();
        if vertices.is_empty() {
            return Polygon::empty();
        }
        if margin <= 0.0 {
            return polygon.clone();
        }
        let offsets = [
            vector(margin, margin),
            vector(margin, -margin),
            vector(-margin, margin),
            vector(-margin, -margin),
        ];
        let spread = vertices
            .iter()
            .flat_map(|&v| offsets.iter().map(move |&o| v + o));
        self.snap_polygon(Polygon::convex_hull_of(spread))
    }

    /// Overlap region of two polygons. Several disjoint pieces are merged into their hull.
    pub fn intersection(&self, a: &Polygon, b: &Polygon) -> Polygon {
        if a.is_empty() || b.is_empty() {
            return Polygon::empty();
        }
        let mut pieces: Vec<Polygon> = a
            .intersection_pieces(b)
            .into_iter()
            .filter(|piece| piece.area() > self.epsilon())
            .collect();
        let merged = if pieces.len() > 1 {
            Polygon::convex_hull_of(pieces.iter().flat_map(|piece| piece.vertices()))
        } else if let Some(piece) = pieces.pop() {
            piece
        } else {
            return Polygon::empty();
        };
        let snapped = self.snap_polygon(merged);
        if snapped.area() <= self.epsilon() {
            return Polygon::empty();
        }
        snapped
    }

    pub fn centroid(&self, polygon: &Polygon) -> Option<Point> {
        polygon.centroid().map(|c| self.snap(c))
    }

    pub fn snap_polygon(&self, polygon: Polygon) -> Polygon {
        polygon.map(|p| self.snap(p))
    }
}
