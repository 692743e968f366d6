//! Tactical positioning for area-effect techniques on top of influence maps.
//!
//! [`TacticalEvaluator`] combines a field toward the enemies with a field of
//! movement costs from the user and scores every reachable position and aim
//! for a [`Technique`]. [`BresenhamLos`] supplies a simple line-of-sight
//! check for callers without their own field-of-view module.

pub mod evaluator;
pub mod los;
pub mod technique;

pub use evaluator::{Evaluation, TacticalChoice, TacticalEvaluator};
pub use los::BresenhamLos;
pub use technique::{AreaShape, Technique};
