use crate::{Point, Polygon, Vector, vector};

const EPS: f64 = 1e-9;

/// Longest chord of a convex polygon running parallel to `from -> to`, oriented the same way.
///
/// Every vertex is tried as the line's anchor; for a convex polygon the maximum is reached
/// at one of them. Coinciding `from`/`to` fall back to the positive x axis. Returns `None`
/// for degenerate polygons.
pub fn longest_parallel_segment(polygon: &Polygon, from: Point, to: Point) -> Option<(Point, Point)> {
    let vertices = polygon.vertices();
    if vertices.len() < 3 {
        return None;
    }
    let dir = to - from;
    let length = dir.length();
    let u = if length > EPS { dir / length } else { vector(1.0, 0.0) };
    let n = vector(-u.y, u.x);

    let mut best: Option<(f64, Point, Point)> = None;
    for &anchor in &vertices {
        let Some((t0, t1)) = chord_span(&vertices, anchor, u, n) else {
            continue;
        };
        let len = t1 - t0;
        if best.is_none_or(|(best_len, _, _)| len > best_len + EPS) {
            best = Some((len, anchor + u * t0, anchor + u * t1));
        }
    }
    best.filter(|(len, _, _)| *len > EPS).map(|(_, start, end)| (start, end))
}

/// Parameter range `[t0, t1]` along `u` where the line through `anchor` stays inside.
fn chord_span(vertices: &[Point], anchor: Point, u: Vector, n: Vector) -> Option<(f64, f64)> {
    let mut span: Option<(f64, f64)> = None;
    let mut extend = |hit: Point| {
        let t = (hit - anchor).dot(u);
        span = Some(match span {
            Some((lo, hi)) => (lo.min(t), hi.max(t)),
            None => (t, t),
        });
    };
    for (i, &p) in vertices.iter().enumerate() {
        let q = vertices[(i + 1) % vertices.len()];
        let sp = (p - anchor).dot(n);
        let sq = (q - anchor).dot(n);
        let p_on = sp.abs() <= EPS;
        let q_on = sq.abs() <= EPS;
        if p_on {
            extend(p);
        }
        if q_on {
            extend(q);
        }
        if !p_on && !q_on && (sp < 0.0) != (sq < 0.0) {
            extend(p + (q - p) * (sp / (sp - sq)));
        }
    }
    span
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point;

    fn square(size: f64) -> Polygon {
        Polygon::from_points([
            point(0.0, 0.0),
            point(size, 0.0),
            point(size, size),
            point(0.0, size),
        ])
    }

    #[test]
    fn horizontal_chord_spans_the_width() {
        let (s, e) =
            longest_parallel_segment(&square(10.0), point(-5.0, 3.0), point(20.0, 3.0)).unwrap();
        assert!(((e - s).length() - 10.0).abs() < 1e-9);
        assert!(e.x > s.x);
    }

    #[test]
    fn diagonal_chord_spans_the_diagonal() {
        let (s, e) =
            longest_parallel_segment(&square(10.0), point(0.0, 0.0), point(1.0, 1.0)).unwrap();
        assert!(((e - s).length() - 200f64.sqrt()).abs() < 1e-9);
        assert!(e.x > s.x && e.y > s.y);
    }

    #[test]
    fn orientation_follows_the_reference_direction() {
        let (s, e) =
            longest_parallel_segment(&square(4.0), point(0.0, 5.0), point(0.0, -5.0)).unwrap();
        assert!(e.y < s.y);
    }

    #[test]
    fn degenerate_polygon_has_no_chord() {
        let line = Polygon::from_points([point(0.0, 0.0), point(1.0, 0.0)]);
        assert!(longest_parallel_segment(&line, point(0.0, 0.0), point(1.0, 0.0)).is_none());
    }
}
