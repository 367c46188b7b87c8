use geo::{Area, BooleanOps, BoundingRect, Centroid, ConvexHull};

use crate::{Envelope, Point, point};

/// Ordered sequence of points; graph edges use exactly two.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineString {
    points: Vec<Point>,
}

impl LineString {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn segment(a: Point, b: Point) -> Self {
        Self { points: vec![a, b] }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn start(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).length())
            .sum()
    }

    pub fn midpoint(&self) -> Option<Point> {
        Some(self.start()?.lerp(self.end()?, 0.5))
    }
}

/// Simple polygon without holes, backed by [`geo::Polygon`].
///
/// Degenerate polygons (a point or a line) are allowed and report themselves as empty while
/// still carrying their vertices, so their position survives buffering.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    inner: geo::Polygon<f64>,
}

impl Default for Polygon {
    fn default() -> Self {
        Self::empty()
    }
}

fn to_coord(p: Point) -> geo::Coord<f64> {
    geo::coord! { x: p.x, y: p.y }
}

impl Polygon {
    pub fn empty() -> Self {
        Self {
            inner: geo::Polygon::new(geo::LineString::new(Vec::new()), Vec::new()),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Self {
        let coords: Vec<geo::Coord<f64>> = points.into_iter().map(to_coord).collect();
        Self {
            inner: geo::Polygon::new(geo::LineString::new(coords), Vec::new()),
        }
    }

    /// Axis-aligned rectangle centered on `center`.
    pub fn rectangle(center: Point, width: f64, height: f64) -> Self {
        let (hw, hh) = (width / 2.0, height / 2.0);
        Self::from_points([
            point(center.x - hw, center.y - hh),
            point(center.x + hw, center.y - hh),
            point(center.x + hw, center.y + hh),
            point(center.x - hw, center.y + hh),
        ])
    }

    pub fn convex_hull_of(points: impl IntoIterator<Item = Point>) -> Self {
        let points: Vec<geo::Point<f64>> = points
            .into_iter()
            .map(|p| geo::Point::new(p.x, p.y))
            .collect();
        if points.is_empty() {
            return Self::empty();
        }
        Self {
            inner: geo::MultiPoint::new(points).convex_hull(),
        }
    }

    pub fn from_geo(inner: geo::Polygon<f64>) -> Self {
        Self { inner }
    }

    pub fn as_geo(&self) -> &geo::Polygon<f64> {
        &self.inner
    }

    /// Exterior ring without the closing vertex.
    pub fn vertices(&self) -> Vec<Point> {
        let coords = &self.inner.exterior().0;
        let mut out: Vec<Point> = coords.iter().map(|c| point(c.x, c.y)).collect();
        if out.len() > 1 && out.first() == out.last() {
            out.pop();
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.inner.exterior().0.is_empty() || self.area() <= 0.0
    }

    pub fn area(&self) -> f64 {
        self.inner.unsigned_area()
    }

    pub fn centroid(&self) -> Option<Point> {
        if self.inner.exterior().0.is_empty() {
            return None;
        }
        self.inner.centroid().map(|c| point(c.x(), c.y()))
    }

    pub fn envelope(&self) -> Option<Envelope> {
        self.inner
            .bounding_rect()
            .map(|r| Envelope::new(point(r.min().x, r.min().y), point(r.max().x, r.max().y)))
    }

    pub fn convex_hull(&self) -> Self {
        Self::convex_hull_of(self.vertices())
    }

    pub fn map(&self, f: impl Fn(Point) -> Point) -> Self {
        Self::from_points(self.vertices().into_iter().map(f))
    }

    pub(crate) fn intersection_pieces(&self, other: &Self) -> Vec<Polygon> {
        self.inner
            .intersection(&other.inner)
            .0
            .into_iter()
            .map(Self::from_geo)
            .collect()
    }

    /// Union of two polygons; disconnected results collapse to their hull.
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        let mut pieces = self.inner.union(&other.inner).0;
        if pieces.len() == 1 {
            if let Some(piece) = pieces.pop() {
                return Self::from_geo(piece);
            }
        }
        Self::convex_hull_of(
            pieces
                .iter()
                .flat_map(|p| p.exterior().0.iter().map(|c| point(c.x, c.y))),
        )
    }
}
