//! **influence-core** — Shared types for grid influence maps.
//!
//! Geometry primitives, the row-major [`Grid`] container, distance models and
//! the error type used by `influence-paths` and `influence-tactics`.

pub mod error;
pub mod geom;
pub mod grid;
pub mod measure;
pub mod visibility;

pub use error::MapError;
pub use geom::{Direction, Point, Range};
pub use grid::Grid;
pub use measure::{BlockingRequirement, FieldConfig, Measurement, chebyshev, euclidean, manhattan};
pub use visibility::{Omniscient, Visibility};

/// Gradient value of a cell no goal can reach.
pub const UNREACHABLE: f64 = f64::INFINITY;

/// Smallest finite traversal cost a cell may carry.
pub const MIN_COST: f64 = 1e-3;
