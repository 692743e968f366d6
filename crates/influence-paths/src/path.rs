use influence_core::{MapError, Point, UNREACHABLE};
use log::trace;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::obstacles::ObstacleMask;
use crate::scan::{FieldState, ScanEngine, Seeding};

impl ScanEngine<'_> {
    /// Scan toward the current goals, then walk down the field from `start`.
    ///
    /// The returned path excludes `start` and holds at most `max_length`
    /// cells. It is empty when `start` is a goal or has no lower neighbor.
    pub fn find_path(
        &mut self,
        start: Point,
        max_length: usize,
        mask: &ObstacleMask,
        rng: &mut impl Rng,
    ) -> Result<Vec<Point>, MapError> {
        self.check_bounds(start)?;
        self.scan(mask)?;
        self.descend(start, Some(max_length), rng)
    }

    /// Like [`find_path`](Self::find_path), but the path may pass through
    /// cells in `pass_through` without ending on one.
    ///
    /// Friendly actors usually go in `pass_through`. When the walk would
    /// stop on one of those cells, that cell is blocked and the path is
    /// planned again.
    pub fn find_path_passing(
        &mut self,
        start: Point,
        max_length: usize,
        mask: &ObstacleMask,
        pass_through: &ObstacleMask,
        rng: &mut impl Rng,
    ) -> Result<Vec<Point>, MapError> {
        self.check_bounds(start)?;
        self.avoid_ending_on(mask, pass_through, |engine, mask| {
            engine.scan(mask)?;
            engine.descend(start, Some(max_length), &mut *rng)
        })
    }

    /// Path for a square creature `size` cells on a side whose top-left
    /// cell is `start`. See [`scan_large`](Self::scan_large).
    pub fn find_path_large(
        &mut self,
        size: usize,
        start: Point,
        max_length: usize,
        mask: &ObstacleMask,
        rng: &mut impl Rng,
    ) -> Result<Vec<Point>, MapError> {
        self.check_bounds(start)?;
        self.scan_large(size, mask)?;
        self.descend(start, Some(max_length), rng)
    }

    /// Walk down the field left by the last scan without rescanning.
    ///
    /// Fails with [`MapError::StaleField`] when nothing has been scanned
    /// since construction or the last [`reset_map`](Self::reset_map).
    pub fn find_path_prescanned(
        &self,
        start: Point,
        rng: &mut impl Rng,
    ) -> Result<Vec<Point>, MapError> {
        if self.state() == FieldState::Empty {
            return Err(MapError::StaleField);
        }
        self.descend(start, None, rng)
    }

    /// Run `plan` until its path no longer ends on a `pass_through` cell,
    /// blocking each such end cell in turn.
    pub(crate) fn avoid_ending_on(
        &mut self,
        mask: &ObstacleMask,
        pass_through: &ObstacleMask,
        mut plan: impl FnMut(&mut Self, &ObstacleMask) -> Result<Vec<Point>, MapError>,
    ) -> Result<Vec<Point>, MapError> {
        let mut mask = mask.clone();
        loop {
            let path = plan(self, &mask)?;
            match path.last() {
                Some(&end) if pass_through.contains(end) && !mask.contains(end) => {
                    trace!("path ends on pass-through cell {}, replanning", end);
                    mask = mask.with(end);
                }
                _ => return Ok(path),
            }
        }
    }

    pub(crate) fn check_bounds(&self, p: Point) -> Result<(), MapError> {
        let range = self.field.range();
        if range.contains(p) {
            Ok(())
        } else {
            Err(MapError::OutOfBounds { point: p, range })
        }
    }

    /// Greedy descent. Each step shuffles the direction order and moves to
    /// the first neighbor with the strictly lowest value, using the blocking
    /// rule and obstacles of the last scan.
    pub(crate) fn descend(
        &self,
        start: Point,
        max_length: Option<usize>,
        rng: &mut impl Rng,
    ) -> Result<Vec<Point>, MapError> {
        let mut here = self.value_at(start)?;
        let mut dirs = self.field.measurement().directions().to_vec();
        let mut path = Vec::new();
        let mut cur = start;

        while max_length.is_none_or(|m| path.len() < m) {
            if self.seeding == Seeding::Goals && self.on_goal(cur) {
                break;
            }
            dirs.shuffle(rng);
            let mut best = None;
            let mut best_value = here;
            for &dir in dirs.iter() {
                if self
                    .field
                    .step_cost(cur, dir, self.scanned_blocking, &self.blocked)
                    .is_none()
                {
                    continue;
                }
                let next = cur.step(dir);
                let v = self.gradient.get(next).copied().unwrap_or(UNREACHABLE);
                if v < best_value {
                    best = Some(next);
                    best_value = v;
                }
            }
            let Some(next) = best else {
                break;
            };
            path.push(next);
            cur = next;
            here = best_value;
        }

        trace!("descent from {} took {} steps", start, path.len());
        Ok(path)
    }
}
