//! Compass directions.
//!
//! Angles are bearings in degrees: north is `0`, east is `90`, growing clockwise. With `+y`
//! pointing north, a bearing relates to the counter-clockwise x-axis angle `θ` as
//! `bearing = 90 - θ`.

use octopus_geom::{PrecisionModel, Vector, vector};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Line orientation shared by a direction and its opposite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Horizontal,
    Vertical,
    /// South-west to north-east.
    Diagonal45,
    /// North-west to south-east.
    Diagonal135,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OctilinearDirection {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl OctilinearDirection {
    pub const ALL: [OctilinearDirection; 8] = [
        OctilinearDirection::North,
        OctilinearDirection::NorthEast,
        OctilinearDirection::East,
        OctilinearDirection::SouthEast,
        OctilinearDirection::South,
        OctilinearDirection::SouthWest,
        OctilinearDirection::West,
        OctilinearDirection::NorthWest,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn from_index(index: usize) -> Self {
        Self::ALL[index % 8]
    }

    pub fn angle(self) -> f64 {
        self.index() as f64 * 45.0
    }

    /// Nearest direction to a bearing. Exact midpoints resolve to the diagonal.
    pub fn from_angle(angle: f64) -> Result<Self> {
        if !angle.is_finite() {
            return Err(Error::InvalidAngle(angle));
        }
        let steps = angle.rem_euclid(360.0) / 45.0;
        let floor = steps.floor();
        let frac = steps - floor;
        let lower = floor as usize;
        let index = if frac < 0.5 {
            lower
        } else if frac > 0.5 {
            lower + 1
        } else if lower % 2 == 1 {
            lower
        } else {
            lower + 1
        };
        Ok(Self::from_index(index))
    }

    /// Nearest direction to a counter-clockwise angle measured from the positive x axis.
    pub fn from_x_axis_angle(angle: f64) -> Result<Self> {
        if !angle.is_finite() {
            return Err(Error::InvalidAngle(angle));
        }
        Self::from_angle(90.0 - angle)
    }

    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 4)
    }

    /// Adds the bearings of both directions.
    pub fn rotate(self, by: OctilinearDirection) -> Self {
        Self::from_index(self.index() + by.index())
    }

    /// Clockwise angle from `self` to `other`, in `[0, 360)`.
    pub fn angle_to(self, other: AnyDirection) -> f64 {
        (other.angle() - self.angle()).rem_euclid(360.0)
    }

    pub fn is_opposite(self, other: OctilinearDirection) -> bool {
        self.opposite() == other
    }

    pub fn alignment(self) -> Alignment {
        match self {
            Self::North | Self::South => Alignment::Vertical,
            Self::East | Self::West => Alignment::Horizontal,
            Self::NorthEast | Self::SouthWest => Alignment::Diagonal45,
            Self::NorthWest | Self::SouthEast => Alignment::Diagonal135,
        }
    }

    pub fn is_horizontal(self) -> bool {
        self.alignment() == Alignment::Horizontal
    }

    pub fn is_vertical(self) -> bool {
        self.alignment() == Alignment::Vertical
    }

    pub fn is_diagonal(self) -> bool {
        matches!(
            self.alignment(),
            Alignment::Diagonal45 | Alignment::Diagonal135
        )
    }

    /// Unit step on the grid, e.g. `(1, 1)` for north-east.
    pub fn vector(self) -> Vector {
        match self {
            Self::North => vector(0.0, 1.0),
            Self::NorthEast => vector(1.0, 1.0),
            Self::East => vector(1.0, 0.0),
            Self::SouthEast => vector(1.0, -1.0),
            Self::South => vector(0.0, -1.0),
            Self::SouthWest => vector(-1.0, -1.0),
            Self::West => vector(-1.0, 0.0),
            Self::NorthWest => vector(-1.0, 1.0),
        }
    }

    /// Same as [`vector`](Self::vector), normalized to length one.
    pub fn unit_vector(self) -> Vector {
        self.vector().normalize()
    }

    pub fn as_any(self) -> AnyDirection {
        AnyDirection { angle: self.angle() }
    }
}

impl std::fmt::Display for OctilinearDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::North => "N",
            Self::NorthEast => "NE",
            Self::East => "E",
            Self::SouthEast => "SE",
            Self::South => "S",
            Self::SouthWest => "SW",
            Self::West => "W",
            Self::NorthWest => "NW",
        };
        f.write_str(s)
    }
}

/// Arbitrary bearing, kept at the graph's precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnyDirection {
    angle: f64,
}

impl AnyDirection {
    pub fn new(angle: f64, precision: &PrecisionModel) -> Result<Self> {
        if !angle.is_finite() {
            return Err(Error::InvalidAngle(angle));
        }
        let mut angle = precision.make_precise(angle.rem_euclid(360.0));
        if angle >= 360.0 {
            angle -= 360.0;
        }
        Ok(Self { angle })
    }

    /// Bearing of a displacement vector; the zero vector points north.
    pub fn from_vector(v: Vector, precision: &PrecisionModel) -> Self {
        if v.x == 0.0 && v.y == 0.0 {
            return Self { angle: 0.0 };
        }
        let raw = v.x.atan2(v.y).to_degrees();
        let mut angle = precision.make_precise(raw.rem_euclid(360.0));
        if angle >= 360.0 {
            angle -= 360.0;
        }
        Self { angle }
    }

    pub fn angle(self) -> f64 {
        self.angle
    }

    pub fn opposite(self) -> Self {
        Self {
            angle: (self.angle + 180.0).rem_euclid(360.0),
        }
    }

    pub fn is_octilinear(self) -> bool {
        (self.angle / 45.0).fract() == 0.0
    }

    /// The exact octilinear direction, if the bearing is a multiple of 45 degrees.
    pub fn as_octilinear(self) -> Option<OctilinearDirection> {
        self.is_octilinear()
            .then(|| OctilinearDirection::from_index((self.angle / 45.0) as usize))
    }

    pub fn to_octilinear(self) -> OctilinearDirection {
        let steps = self.angle / 45.0;
        let floor = steps.floor();
        let frac = steps - floor;
        let lower = floor as usize;
        let index = if frac < 0.5 {
            lower
        } else if frac > 0.5 || lower % 2 == 0 {
            lower + 1
        } else {
            lower
        };
        OctilinearDirection::from_index(index)
    }
}

impl From<OctilinearDirection> for AnyDirection {
    fn from(direction: OctilinearDirection) -> Self {
        direction.as_any()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        for d in OctilinearDirection::ALL {
            assert_eq!(d.opposite().opposite(), d);
            assert_ne!(d.opposite(), d);
            assert!(d.is_opposite(d.opposite()));
        }
    }

    #[test]
    fn from_angle_round_trips_every_direction() {
        for d in OctilinearDirection::ALL {
            assert_eq!(OctilinearDirection::from_angle(d.angle()).unwrap(), d);
            assert_eq!(OctilinearDirection::from_angle(d.angle() + 360.0).unwrap(), d);
        }
    }

    #[test]
    fn x_axis_angles_snap_to_the_nearest_bearing() {
        use OctilinearDirection::*;
        assert_eq!(OctilinearDirection::from_x_axis_angle(22.49).unwrap(), East);
        assert_eq!(OctilinearDirection::from_x_axis_angle(22.51).unwrap(), NorthEast);
        assert_eq!(OctilinearDirection::from_x_axis_angle(22.5).unwrap(), NorthEast);
        assert_eq!(OctilinearDirection::from_x_axis_angle(90.0).unwrap(), North);
        assert_eq!(OctilinearDirection::from_x_axis_angle(-90.0).unwrap(), South);
    }

    #[test]
    fn non_finite_angles_are_rejected() {
        assert!(matches!(
            OctilinearDirection::from_angle(f64::NAN),
            Err(Error::InvalidAngle(_))
        ));
        assert!(OctilinearDirection::from_x_axis_angle(f64::INFINITY).is_err());
    }

    #[test]
    fn rotation_adds_bearings() {
        use OctilinearDirection::*;
        assert_eq!(East.rotate(East), South);
        assert_eq!(NorthWest.rotate(NorthEast), North);
        assert_eq!(West.rotate(North), West);
    }

    #[test]
    fn alignment_is_shared_with_the_opposite() {
        for d in OctilinearDirection::ALL {
            assert_eq!(d.alignment(), d.opposite().alignment());
        }
        assert!(OctilinearDirection::East.is_horizontal());
        assert!(OctilinearDirection::South.is_vertical());
        assert!(OctilinearDirection::SouthWest.is_diagonal());
    }

    #[test]
    fn any_direction_from_vector_uses_bearings() {
        let pm = PrecisionModel::default();
        assert_eq!(AnyDirection::from_vector(vector(0.0, 3.0), &pm).angle(), 0.0);
        assert_eq!(AnyDirection::from_vector(vector(3.0, 0.0), &pm).angle(), 90.0);
        assert_eq!(AnyDirection::from_vector(vector(-2.0, -2.0), &pm).angle(), 225.0);
        let skew = AnyDirection::from_vector(vector(80.0, 30.0), &pm);
        assert!(!skew.is_octilinear());
        assert_eq!(skew.to_octilinear(), OctilinearDirection::East);
        assert_eq!(skew.as_octilinear(), None);
    }

    #[test]
    fn angle_to_measures_clockwise() {
        let pm = PrecisionModel::default();
        let west = AnyDirection::new(270.0, &pm).unwrap();
        assert_eq!(OctilinearDirection::North.angle_to(west), 270.0);
        assert_eq!(OctilinearDirection::West.angle_to(AnyDirection::new(0.0, &pm).unwrap()), 90.0);
    }
}
