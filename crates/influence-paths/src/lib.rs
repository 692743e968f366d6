//! Weighted flood-fill influence maps ("Dijkstra maps") on 2D grids.
//!
//! A [`CostField`] turns a wall/floor grid into per-cell traversal costs. A
//! [`ScanEngine`] borrows it, holds a [`GoalSet`] and relaxes a gradient field
//! outward from the goals, honouring a per-call [`ObstacleMask`]. Paths are
//! read back by walking downhill on that field.
//!
//! | Query | Field it walks |
//! |---|---|
//! | [`ScanEngine::find_path`] | distance to the nearest goal |
//! | [`ScanEngine::find_flee_path`] | inverted, rescaled distance to the goals |
//! | [`ScanEngine::find_attack_path`] | distance to cells in range of a target |
//!
//! The `_passing` variants let a path cross friendly cells without ending on
//! one, and the `_large` variants plan for square creatures wider than one
//! cell. Scans can be split across frames with [`ScanEngine::partial_scan`].
//! Every tie is broken either by row-major cell order (during scans) or by an
//! injected random stream (during descent), so results are reproducible for a
//! fixed seed.

mod attack;
mod cost;
mod fill;
mod flee;
mod goals;
mod obstacles;
mod path;
mod scan;

pub use cost::{CostField, Step};
pub use goals::GoalSet;
pub use influence_core::{
    BlockingRequirement, FieldConfig, Grid, MapError, Measurement, Point, Range, UNREACHABLE,
};
pub use obstacles::ObstacleMask;
pub use scan::{FieldState, ScanEngine};
