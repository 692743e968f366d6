use std::collections::BTreeMap;

use influence_core::{MapError, Point};

use crate::cost::CostField;

/// Goal cells and their seed values, kept in row-major order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalSet {
    seeds: BTreeMap<Point, f64>,
}

impl GoalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a goal, or lower the seed of an existing one.
    ///
    /// The cell must lie inside `field` and be passable. Seeds must be
    /// finite and not above zero; a negative seed biases the field toward
    /// this goal over equally distant ones.
    pub fn insert(&mut self, field: &CostField, cell: Point, seed: f64) -> Result<(), MapError> {
        let range = field.range();
        if !range.contains(cell) {
            return Err(MapError::OutOfBounds { point: cell, range });
        }
        if !field.is_passable(cell) {
            return Err(MapError::InvalidGoal(cell));
        }
        if !seed.is_finite() || seed > 0.0 {
            return Err(MapError::InvalidSeed { point: cell, seed });
        }
        self.seeds
            .entry(cell)
            .and_modify(|s| *s = s.min(seed))
            .or_insert(seed);
        Ok(())
    }

    /// Remove a goal. Returns whether it was present.
    pub fn remove(&mut self, cell: Point) -> bool {
        self.seeds.remove(&cell).is_some()
    }

    pub fn clear(&mut self) {
        self.seeds.clear();
    }

    #[inline]
    pub fn contains(&self, cell: Point) -> bool {
        self.seeds.contains_key(&cell)
    }

    /// Seed value of a goal cell.
    pub fn seed(&self, cell: Point) -> Option<f64> {
        self.seeds.get(&cell).copied()
    }

    /// Goals and seeds in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, f64)> + '_ {
        self.seeds.iter().map(|(&p, &s)| (p, s))
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }
}
