use influence_core::{MapError, Point, Visibility};
use influence_paths::{CostField, ObstacleMask, ScanEngine};
use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::technique::Technique;

/// Where to stand and where to aim.
#[derive(Debug, Clone, PartialEq)]
pub struct TacticalChoice {
    pub position: Point,
    pub aim: Point,
    pub score: f64,
    /// Steps from the user to `position`, excluding the user's cell.
    pub path: Vec<Point>,
}

/// Outcome of [`TacticalEvaluator::evaluate_technique`].
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Position(TacticalChoice),
    /// No reachable position scores above zero; fall back to plain pursuit.
    NoBeneficialPosition,
}

impl Evaluation {
    pub fn choice(&self) -> Option<&TacticalChoice> {
        match self {
            Evaluation::Position(c) => Some(c),
            Evaluation::NoBeneficialPosition => None,
        }
    }
}

/// Picks a position and aim for an area-effect technique.
///
/// Owns two scan engines over the same cost field: one toward the enemies,
/// used to keep candidates connected to them, and one out from the user,
/// bounding how far it can move this turn. Allies block the field toward
/// the enemies but the user may walk through them.
pub struct TacticalEvaluator<'f> {
    field: &'f CostField,
    toward: ScanEngine<'f>,
    reach: ScanEngine<'f>,
}

impl<'f> TacticalEvaluator<'f> {
    pub fn new(field: &'f CostField) -> Self {
        Self {
            field,
            toward: ScanEngine::new(field),
            reach: ScanEngine::new(field),
        }
    }

    /// The field toward the enemies from the last evaluation, for callers
    /// falling back to [`ScanEngine::find_path_prescanned`].
    pub fn toward(&self) -> &ScanEngine<'f> {
        &self.toward
    }

    /// The field of movement costs out from the user.
    pub fn reach(&self) -> &ScanEngine<'f> {
        &self.reach
    }

    /// Find the best cell within `move_length` of `user` from which to use
    /// `technique`.
    ///
    /// Candidates are cells at most `move_length` steps from `user` that are
    /// connected to some enemy and not occupied by an ally. `user` is never
    /// counted as its own ally. For each candidate, every visible aim in
    /// range whose area could hold an enemy is scored as the enemy magnitude
    /// covered and visible from the candidate, minus the ally magnitude
    /// covered, minus the self magnitude when the candidate lies in its own
    /// area and the technique forbids it. The highest score wins; ties go to
    /// the cheaper move, then to an order shuffled with `rng`.
    #[allow(clippy::too_many_arguments)]
    pub fn evaluate_technique(
        &mut self,
        user: Point,
        move_length: usize,
        technique: &Technique,
        enemies: &[Point],
        allies: &[Point],
        visibility: &impl Visibility,
        mask: &ObstacleMask,
        rng: &mut impl Rng,
    ) -> Result<Evaluation, MapError> {
        let range = self.field.range();
        for &p in std::iter::once(&user).chain(enemies).chain(allies) {
            if !range.contains(p) {
                return Err(MapError::OutOfBounds { point: p, range });
            }
        }
        if enemies.is_empty() {
            return Ok(Evaluation::NoBeneficialPosition);
        }

        let allies: Vec<Point> = allies.iter().copied().filter(|&a| a != user).collect();
        let allies_mask = ObstacleMask::new(allies.iter().copied());
        let enemies_mask = ObstacleMask::new(enemies.iter().copied());

        let toward_mask = enemies
            .iter()
            .fold(mask.union(&allies_mask), |m, &e| m.without(e))
            .without(user);
        self.toward.clear_goals();
        for &e in enemies {
            self.toward.add_goal(e, 0.0)?;
        }
        self.toward.scan(&toward_mask)?;

        let reach_mask = mask.union(&enemies_mask).without(user);
        self.reach.clear_goals();
        self.reach.add_goal(user, 0.0)?;
        self.reach.scan(&reach_mask)?;

        let mut candidates: Vec<(Point, f64)> = self
            .reach
            .fill_order()
            .iter()
            .copied()
            .filter(|&c| self.reach.steps_at(c).is_some_and(|n| n <= move_length))
            .filter(|&c| !allies_mask.contains(c))
            .filter(|&c| self.toward.value_at(c).is_ok_and(f64::is_finite))
            .filter_map(|c| self.reach.value_at(c).ok().map(|v| (c, v)))
            .collect();
        candidates.shuffle(rng);
        candidates.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut best: Option<(Point, Point, f64)> = None;
        for &(candidate, _) in candidates.iter() {
            if let Some((aim, score)) =
                self.best_aim(candidate, technique, enemies, &allies, visibility)
            {
                if best.is_none_or(|(_, _, s)| score > s) {
                    best = Some((candidate, aim, score));
                }
            }
        }

        let Some((position, aim, score)) = best.filter(|&(_, _, s)| s > 0.0) else {
            debug!(
                "{}: no beneficial position among {} candidates",
                technique.name,
                candidates.len()
            );
            return Ok(Evaluation::NoBeneficialPosition);
        };

        let path = self.reach.recorded_path(position).unwrap_or_default();
        debug!(
            "{}: move to {} and aim at {}, score {}",
            technique.name, position, aim, score
        );
        Ok(Evaluation::Position(TacticalChoice {
            position,
            aim,
            score,
            path,
        }))
    }

    /// Best aim from `candidate`, first in row-major order among equals.
    fn best_aim(
        &self,
        candidate: Point,
        technique: &Technique,
        enemies: &[Point],
        allies: &[Point],
        visibility: &impl Visibility,
    ) -> Option<(Point, f64)> {
        let mut best: Option<(Point, f64)> = None;
        let aims = self
            .field
            .range()
            .around(candidate, technique.max_range)
            .iter()
            .filter(|&a| self.field.is_passable(a))
            .filter(|&a| technique.can_target(candidate, a))
            .filter(|&a| a == candidate || visibility.is_visible(candidate, a))
            .filter(|&a| enemies.iter().any(|&e| technique.could_cover(candidate, a, e)));

        for aim in aims {
            let mut score = 0.0;
            for (p, magnitude) in technique.area(candidate, aim, self.field, visibility) {
                if enemies.contains(&p) && visibility.is_visible(candidate, p) {
                    score += magnitude;
                }
                if allies.contains(&p) {
                    score -= magnitude;
                }
                if p == candidate && !technique.self_targeting {
                    score -= magnitude;
                }
            }
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((aim, score));
            }
        }
        best
    }
}
