use crate::{LineString, Vector};

/// Orthogonal projection of `v` onto the direction of `along`. Zero when `along` is zero.
pub fn projection(v: Vector, along: Vector) -> Vector {
    let denom = along.square_length();
    if denom == 0.0 {
        return Vector::zero();
    }
    along * (v.dot(along) / denom)
}

/// Unsigned angle between two vectors in degrees, in `[0, 180]`.
pub fn angle(v: Vector, w: Vector) -> f64 {
    let mut diff = v.y.atan2(v.x) - w.y.atan2(w.x);
    if diff > std::f64::consts::PI {
        diff -= std::f64::consts::TAU;
    } else if diff <= -std::f64::consts::PI {
        diff += std::f64::consts::TAU;
    }
    diff.abs().to_degrees()
}

/// Folds an unsigned angle in `[0, 180]` to the acute angle against the same axis line.
pub fn fold_to_quadrant(degrees: f64) -> f64 {
    if degrees > 90.0 { 180.0 - degrees } else { degrees }
}

/// Counter-clockwise angle of the line (start to end) against the positive x axis, in
/// `[0, 360)`. Degenerate lines report `0`.
pub fn angle_to_x_axis(line: &LineString) -> f64 {
    let (Some(start), Some(end)) = (line.start(), line.end()) else {
        return 0.0;
    };
    let d = end - start;
    if d.x == 0.0 && d.y == 0.0 {
        return 0.0;
    }
    d.y.atan2(d.x).to_degrees().rem_euclid(360.0)
}
