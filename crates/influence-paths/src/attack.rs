use influence_core::{MapError, Point, UNREACHABLE, Visibility};
use log::debug;
use rand::Rng;

use crate::obstacles::ObstacleMask;
use crate::scan::{ScanEngine, Seeding};

impl ScanEngine<'_> {
    /// Path toward a firing position for a ranged attack.
    ///
    /// Every cell whose walking distance to a target lies within
    /// `[min_range, max_range]` and from which some target is visible becomes
    /// a zero-valued seed. The field is rescanned from those seeds and `start`
    /// walks down it. The engine's goals are left alone.
    #[allow(clippy::too_many_arguments)]
    pub fn find_attack_path(
        &mut self,
        start: Point,
        max_length: usize,
        min_range: f64,
        max_range: f64,
        targets: &[Point],
        visibility: &impl Visibility,
        mask: &ObstacleMask,
        rng: &mut impl Rng,
    ) -> Result<Vec<Point>, MapError> {
        self.check_bounds(start)?;
        for &t in targets {
            self.check_bounds(t)?;
        }
        if targets.is_empty() {
            return Ok(Vec::new());
        }
        let min_range = min_range.max(0.0);
        let max_range = max_range.max(min_range);

        // Distance from the targets, which may themselves be masked.
        let open = targets.iter().fold(mask.clone(), |m, &t| m.without(t));
        self.begin(&open, Seeding::Attack)?;
        let range = self.field.range();
        for &t in targets {
            if let Some(i) = range.index_of(t) {
                if self.field.is_passable(t) {
                    self.push_seed(i, 0.0);
                }
            }
        }
        self.relax(None, max_range, |_| false);

        let spots: Vec<usize> = self
            .fill_order()
            .iter()
            .filter(|&&p| {
                let v = self.gradient.get(p).copied().unwrap_or(UNREACHABLE);
                v >= min_range && targets.iter().any(|&t| visibility.is_visible(p, t))
            })
            .filter_map(|&p| range.index_of(p))
            .collect();

        self.begin(mask, Seeding::Attack)?;
        for &i in spots.iter() {
            if !self.blocked[i] {
                self.push_seed(i, 0.0);
            }
        }
        self.relax(None, UNREACHABLE, |_| false);
        self.finish();
        debug!(
            "attack path: {} targets, {} firing positions",
            targets.len(),
            spots.len()
        );
        self.descend(start, Some(max_length), rng)
    }
}
