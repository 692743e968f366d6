//! Error type shared by every influence crate.

use crate::geom::{Point, Range};

/// Caller-misuse errors. Reachability failures are never errors: an
/// unreachable cell keeps [`UNREACHABLE`](crate::UNREACHABLE) and path
/// queries return empty or partial paths.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MapError {
    /// A coordinate outside the grid dimensions.
    #[error("point {point} is outside grid {range}")]
    OutOfBounds { point: Point, range: Range },

    /// A goal placed on a permanently impassable cell.
    #[error("cannot place a goal on impassable cell {0}")]
    InvalidGoal(Point),

    /// A goal seed that is not finite or is above zero.
    #[error("goal seed {seed} at {point} must be finite and <= 0")]
    InvalidSeed { point: Point, seed: f64 },

    /// Query against a gradient field that has not been scanned since the
    /// last reset.
    #[error("gradient field has not been scanned")]
    StaleField,

    /// A traversal cost that is zero, negative or NaN.
    #[error("traversal cost {cost} at {point} must be positive")]
    InvalidCost { point: Point, cost: f64 },

    /// A blocking requirement outside 0..=2.
    #[error("blocking requirement {0} is not in 0..=2")]
    InvalidBlockingRequirement(u8),

    /// A flee multiplier that is not finite and positive.
    #[error("flee factor {0} must be finite and positive")]
    InvalidFleeFactor(f64),

    /// A creature side length of zero or beyond the grid's coordinate type.
    #[error("creature size {0} must be at least 1")]
    InvalidCreatureSize(usize),

    /// An ASCII map whose rows differ in width.
    #[error("line {line} has {found} cells, expected {expected}")]
    RaggedGrid {
        line: usize,
        expected: usize,
        found: usize,
    },
}
