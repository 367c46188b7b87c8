#![forbid(unsafe_code)]

//! Planar geometry used by the `octopus` layout engine.
//!
//! Coordinates are plain `f64` pairs with `+y` pointing north. Every value produced by the
//! kernel passes through a [`PrecisionModel`] so results stay reproducible across runs.

mod chord;
mod measure;
mod polygon;
mod precision;

pub use chord::longest_parallel_segment;
pub use measure::{angle, angle_to_x_axis, fold_to_quadrant, projection};
pub use polygon::{LineString, Polygon};
pub use precision::PrecisionModel;

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;
pub type Size = euclid::Size2D<f64, Unit>;
pub type Envelope = euclid::Box2D<f64, Unit>;
pub type Transform = euclid::Transform2D<f64, Unit, Unit>;

/// Number of segments used to approximate a round buffer.
pub const CIRCLE_SEGMENTS: usize = 32;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    euclid::vec2(x, y)
}

/// Smallest box covering every point, or `None` for an empty input.
pub fn envelope_of(points: impl IntoIterator<Item = Point>) -> Option<Envelope> {
    let mut iter = points.into_iter();
    let first = iter.next()?;
    let mut min = first;
    let mut max = first;
    for p in iter {
        min = min.min(p);
        max = max.max(p);
    }
    Some(Envelope::new(min, max))
}

/// Closed-interval overlap test; boxes that merely touch count as intersecting.
pub fn envelopes_intersect(a: &Envelope, b: &Envelope) -> bool {
    a.min.x <= b.max.x && b.min.x <= a.max.x && a.min.y <= b.max.y && b.min.y <= a.max.y
}
