//! Distance models and the diagonal blocking rule.

use std::f64::consts::SQRT_2;

use crate::error::MapError;
use crate::geom::{Direction, Point};

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Chebyshev (L∞) distance between two points.
#[inline]
pub fn chebyshev(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}

/// Euclidean (L2) distance between two points.
#[inline]
pub fn euclidean(a: Point, b: Point) -> f64 {
    let dx = f64::from(a.x - b.x);
    let dy = f64::from(a.y - b.y);
    dx.hypot(dy)
}

/// The adjacency and step-cost model of a grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Measurement {
    /// 4-way movement, every step costs 1.
    #[default]
    Manhattan,
    /// 8-way movement, diagonal steps cost the same as cardinal ones.
    Chebyshev,
    /// 8-way movement, diagonal steps cost √2.
    Euclidean,
}

impl Measurement {
    /// Directions considered by this measurement, in visitation order.
    #[inline]
    pub fn directions(self) -> &'static [Direction] {
        match self {
            Measurement::Manhattan => &Direction::CARDINALS,
            Measurement::Chebyshev | Measurement::Euclidean => &Direction::ALL,
        }
    }

    /// Multiplier applied to the destination cell cost for a step in `dir`.
    #[inline]
    pub fn step_multiplier(self, dir: Direction) -> f64 {
        match self {
            Measurement::Euclidean if dir.is_diagonal() => SQRT_2,
            _ => 1.0,
        }
    }

    /// Distance between two points under this measurement, ignoring walls.
    #[inline]
    pub fn distance(self, a: Point, b: Point) -> f64 {
        match self {
            Measurement::Manhattan => f64::from(manhattan(a, b)),
            Measurement::Chebyshev => f64::from(chebyshev(a, b)),
            Measurement::Euclidean => euclidean(a, b),
        }
    }
}

/// How many of the two orthogonal cells shared by a diagonal step must be
/// open for the step to be legal.
///
/// A cell is blocked when it is a wall or masked by an obstacle. With
/// [`Both`](Self::Both) a diagonal step never touches a blocked corner; with
/// [`None`](Self::None) diagonal steps ignore corners entirely.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockingRequirement {
    /// Diagonal steps are always legal.
    None,
    /// At least one shared orthogonal cell must be open.
    One,
    /// Both shared orthogonal cells must be open.
    #[default]
    Both,
}

impl BlockingRequirement {
    /// Number of open orthogonal cells required.
    #[inline]
    pub const fn required_open(self) -> u8 {
        match self {
            BlockingRequirement::None => 0,
            BlockingRequirement::One => 1,
            BlockingRequirement::Both => 2,
        }
    }

    /// Whether a diagonal step with `open` open shared cells is permitted.
    #[inline]
    pub const fn permits(self, open: u8) -> bool {
        open >= self.required_open()
    }
}

impl TryFrom<u8> for BlockingRequirement {
    type Error = MapError;

    fn try_from(v: u8) -> Result<Self, MapError> {
        match v {
            0 => Ok(BlockingRequirement::None),
            1 => Ok(BlockingRequirement::One),
            2 => Ok(BlockingRequirement::Both),
            _ => Err(MapError::InvalidBlockingRequirement(v)),
        }
    }
}

/// Topology settings of a cost field, loadable from configuration files.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FieldConfig {
    pub measurement: Measurement,
    pub blocking: BlockingRequirement,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances() {
        let a = Point::new(0, 0);
        let b = Point::new(3, 4);
        assert_eq!(manhattan(a, b), 7);
        assert_eq!(chebyshev(a, b), 4);
        assert_eq!(euclidean(a, b), 5.0);
        assert_eq!(Measurement::Chebyshev.distance(a, b), 4.0);
    }

    #[test]
    fn manhattan_is_four_way() {
        assert_eq!(Measurement::Manhattan.directions().len(), 4);
        assert_eq!(Measurement::Euclidean.directions().len(), 8);
    }

    #[test]
    fn euclidean_weights_diagonals() {
        assert_eq!(Measurement::Euclidean.step_multiplier(Direction::North), 1.0);
        assert_eq!(Measurement::Euclidean.step_multiplier(Direction::SouthEast), SQRT_2);
        assert_eq!(Measurement::Chebyshev.step_multiplier(Direction::SouthEast), 1.0);
    }

    #[test]
    fn blocking_requirement_from_u8() {
        assert_eq!(BlockingRequirement::try_from(0), Ok(BlockingRequirement::None));
        assert_eq!(BlockingRequirement::try_from(2), Ok(BlockingRequirement::Both));
        assert_eq!(
            BlockingRequirement::try_from(3),
            Err(MapError::InvalidBlockingRequirement(3))
        );
    }

    #[test]
    fn blocking_permits() {
        assert!(BlockingRequirement::None.permits(0));
        assert!(!BlockingRequirement::One.permits(0));
        assert!(BlockingRequirement::One.permits(1));
        assert!(!BlockingRequirement::Both.permits(1));
        assert!(BlockingRequirement::Both.permits(2));
    }
}
