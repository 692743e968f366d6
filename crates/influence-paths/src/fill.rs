use std::collections::HashSet;

use influence_core::{MapError, Point, UNREACHABLE};
use log::debug;

use crate::obstacles::ObstacleMask;
use crate::scan::{ScanEngine, Seeding};

impl ScanEngine<'_> {
    /// Cost-limited fill from `starts`: every cell whose distance to the
    /// nearest start is at most `radius`, in finalization order.
    ///
    /// The fill reuses the engine's gradient field but leaves its goals
    /// alone. Start cells are seeded even when `mask` covers them.
    pub fn flood_fill(
        &mut self,
        radius: f64,
        starts: impl IntoIterator<Item = Point>,
        mask: &ObstacleMask,
    ) -> Result<Vec<(Point, f64)>, MapError> {
        let starts: Vec<Point> = starts.into_iter().collect();
        for &p in starts.iter() {
            self.check_bounds(p)?;
            if !self.field.is_passable(p) {
                return Err(MapError::InvalidGoal(p));
            }
        }
        self.begin(mask, Seeding::Fill)?;
        let range = self.field.range();
        for p in starts {
            if let Some(i) = range.index_of(p) {
                self.push_seed(i, 0.0);
            }
        }
        let (n, _) = self.relax(None, radius, |_| false);
        self.finish();
        debug!("flood fill: radius {}, {} cells", radius, n);
        Ok(self
            .fill_order()
            .iter()
            .map(|&p| (p, self.gradient.get(p).copied().unwrap_or(UNREACHABLE)))
            .collect())
    }

    /// Expand outward from `start` and return the first of `targets` to be
    /// reached, or `None` if none is reachable.
    ///
    /// Targets covered by `mask` can never be reached.
    pub fn find_nearest(
        &mut self,
        start: Point,
        targets: &[Point],
        mask: &ObstacleMask,
    ) -> Result<Option<Point>, MapError> {
        self.check_bounds(start)?;
        for &t in targets {
            self.check_bounds(t)?;
        }
        if targets.is_empty() {
            return Ok(None);
        }
        let wanted: HashSet<Point> = targets.iter().copied().collect();
        self.begin(mask, Seeding::Nearest)?;
        if let Some(i) = self.field.range().index_of(start) {
            self.push_seed(i, 0.0);
        }
        let (_, hit) = self.relax(None, UNREACHABLE, |p| wanted.contains(&p));
        self.finish();
        debug!("nearest from {}: {:?}", start, hit);
        Ok(hit)
    }

    /// Finalized cells whose value is at most `limit`, nearest first.
    pub fn cells_within(&self, limit: f64) -> Vec<Point> {
        self.fill_order()
            .iter()
            .copied()
            .filter(|&p| self.gradient.get(p).is_some_and(|&v| v <= limit))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::CostField;
    use influence_core::Measurement;

    const MAP: &str = "
.......
.......
...#...
.......
.......";

    #[test]
    fn flood_fill_respects_radius() {
        let field = CostField::from_ascii(MAP, '#', Measurement::Manhattan).unwrap();
        let mut e = ScanEngine::new(&field);
        let cells = e
            .flood_fill(1.0, [Point::new(0, 0)], &ObstacleMask::none())
            .unwrap();
        assert_eq!(
            cells,
            vec![
                (Point::new(0, 0), 0.0),
                (Point::new(1, 0), 1.0),
                (Point::new(0, 1), 1.0),
            ]
        );
        assert!(e.goals().is_empty());
    }

    #[test]
    fn flood_fill_from_several_starts() {
        let field = CostField::from_ascii(MAP, '#', Measurement::Chebyshev).unwrap();
        let mut e = ScanEngine::new(&field);
        let cells = e
            .flood_fill(
                1.0,
                [Point::new(0, 0), Point::new(6, 4)],
                &ObstacleMask::none(),
            )
            .unwrap();
        assert_eq!(cells.len(), 8);
        assert!(cells.iter().all(|&(_, v)| v <= 1.0));
    }

    #[test]
    fn flood_fill_rejects_wall_start() {
        let field = CostField::from_ascii(MAP, '#', Measurement::Manhattan).unwrap();
        let mut e = ScanEngine::new(&field);
        assert_eq!(
            e.flood_fill(2.0, [Point::new(3, 2)], &ObstacleMask::none()),
            Err(MapError::InvalidGoal(Point::new(3, 2)))
        );
    }

    #[test]
    fn nearest_prefers_shorter_walk() {
        let field = CostField::from_ascii(MAP, '#', Measurement::Manhattan).unwrap();
        let mut e = ScanEngine::new(&field);
        let targets = [Point::new(6, 2), Point::new(0, 4)];
        let hit = e
            .find_nearest(Point::new(2, 2), &targets, &ObstacleMask::none())
            .unwrap();
        assert_eq!(hit, Some(Point::new(0, 4)));

        let blocked = ObstacleMask::new([Point::new(0, 4)]);
        let hit = e.find_nearest(Point::new(2, 2), &targets, &blocked).unwrap();
        assert_eq!(hit, Some(Point::new(6, 2)));
    }

    #[test]
    fn nearest_none_when_sealed() {
        let field = CostField::from_ascii("..#..", '#', Measurement::Manhattan).unwrap();
        let mut e = ScanEngine::new(&field);
        let hit = e
            .find_nearest(Point::new(0, 0), &[Point::new(4, 0)], &ObstacleMask::none())
            .unwrap();
        assert_eq!(hit, None);
        assert_eq!(e.find_nearest(Point::new(0, 0), &[], &ObstacleMask::none()), Ok(None));
    }

    #[test]
    fn cells_within_limit() {
        let field = CostField::from_ascii(MAP, '#', Measurement::Manhattan).unwrap();
        let mut e = ScanEngine::new(&field);
        e.add_goal(Point::new(0, 0), 0.0).unwrap();
        e.scan(&ObstacleMask::none()).unwrap();
        let near = e.cells_within(2.0);
        assert_eq!(near.len(), 6);
        assert_eq!(near[0], Point::new(0, 0));
    }
}
