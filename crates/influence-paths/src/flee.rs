use influence_core::{Grid, MapError, Point, UNREACHABLE};
use log::debug;
use rand::Rng;

use crate::obstacles::ObstacleMask;
use crate::scan::{ScanEngine, Seeding, creature_side};

impl ScanEngine<'_> {
    /// Build a flee field away from the current goals.
    ///
    /// The goals are treated as threats: after an ordinary scan every
    /// reachable value is multiplied by `-prefer_longer_paths` and the field
    /// is relaxed again from those seeds. Factors above 1 make distant cells
    /// reached by long detours more attractive than nearby dead ends.
    pub fn scan_flee(
        &mut self,
        prefer_longer_paths: f64,
        mask: &ObstacleMask,
    ) -> Result<&Grid<f64>, MapError> {
        self.flee_sized(1, prefer_longer_paths, mask)?;
        Ok(&self.gradient)
    }

    fn flee_sized(
        &mut self,
        side: i32,
        prefer_longer_paths: f64,
        mask: &ObstacleMask,
    ) -> Result<(), MapError> {
        if !prefer_longer_paths.is_finite() || prefer_longer_paths <= 0.0 {
            return Err(MapError::InvalidFleeFactor(prefer_longer_paths));
        }
        self.scan_sized(side, mask)?;
        let range = self.field.range();
        let seeds: Vec<(usize, f64)> = self
            .fill_order()
            .iter()
            .filter_map(|&p| {
                let i = range.index_of(p)?;
                let v = self.gradient.as_slice()[i];
                v.is_finite().then_some((i, v * -prefer_longer_paths))
            })
            .collect();

        self.begin_sized(mask, Seeding::Flee, side)?;
        for &(i, v) in seeds.iter() {
            self.push_seed(i, v);
        }
        let (n, _) = self.relax(None, UNREACHABLE, |_| false);
        self.finish();
        debug!(
            "flee scan: factor {}, size {}, {} cells finalized",
            prefer_longer_paths, side, n
        );
        Ok(())
    }

    /// Build a flee field and walk down it from `start`.
    ///
    /// Unlike [`find_path`](Self::find_path) the walk does not stop on goal
    /// cells; it ends at a local minimum or after `max_length` steps.
    pub fn find_flee_path(
        &mut self,
        start: Point,
        max_length: usize,
        prefer_longer_paths: f64,
        mask: &ObstacleMask,
        rng: &mut impl Rng,
    ) -> Result<Vec<Point>, MapError> {
        self.check_bounds(start)?;
        self.scan_flee(prefer_longer_paths, mask)?;
        self.descend(start, Some(max_length), rng)
    }

    /// [`find_flee_path`](Self::find_flee_path) that may cross
    /// `pass_through` cells but never stops on one.
    pub fn find_flee_path_passing(
        &mut self,
        start: Point,
        max_length: usize,
        prefer_longer_paths: f64,
        mask: &ObstacleMask,
        pass_through: &ObstacleMask,
        rng: &mut impl Rng,
    ) -> Result<Vec<Point>, MapError> {
        self.check_bounds(start)?;
        self.avoid_ending_on(mask, pass_through, |engine, mask| {
            engine.scan_flee(prefer_longer_paths, mask)?;
            engine.descend(start, Some(max_length), &mut *rng)
        })
    }

    /// Flee path for a square creature `size` cells on a side anchored at
    /// its top-left cell `start`.
    pub fn find_flee_path_large(
        &mut self,
        size: usize,
        start: Point,
        max_length: usize,
        prefer_longer_paths: f64,
        mask: &ObstacleMask,
        rng: &mut impl Rng,
    ) -> Result<Vec<Point>, MapError> {
        self.check_bounds(start)?;
        self.flee_sized(creature_side(size)?, prefer_longer_paths, mask)?;
        self.descend(start, Some(max_length), rng)
    }
}
