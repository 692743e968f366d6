use std::cmp::Ordering;
use std::collections::BinaryHeap;

use influence_core::{BlockingRequirement, Grid, MapError, Point, Range, UNREACHABLE};
use log::{debug, trace};

use crate::cost::{CostField, Step};
use crate::goals::GoalSet;
use crate::obstacles::ObstacleMask;

/// Lifecycle of the gradient field held by a [`ScanEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldState {
    /// Never scanned, or reset since the last scan.
    #[default]
    Empty,
    /// A budgeted scan stopped with cells left on the frontier.
    Partial,
    /// Every reachable cell is finalized.
    Full,
}

/// What the current gradient field was seeded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Seeding {
    Goals,
    Flee,
    Fill,
    Nearest,
    Attack,
}

// ---------------------------------------------------------------------------
// Frontier
// ---------------------------------------------------------------------------

/// Heap entry. Ordered so that `BinaryHeap` pops the lowest value first and,
/// among equal values, the lowest row-major index.
#[derive(Clone, Copy, Debug)]
struct Frontier {
    value: f64,
    idx: usize,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .value
            .total_cmp(&self.value)
            .then_with(|| other.idx.cmp(&self.idx))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

// ---------------------------------------------------------------------------
// ScanEngine
// ---------------------------------------------------------------------------

/// Validate a creature side length.
pub(crate) fn creature_side(size: usize) -> Result<i32, MapError> {
    i32::try_from(size)
        .ok()
        .filter(|&s| s > 0)
        .ok_or(MapError::InvalidCreatureSize(size))
}

/// Weighted flood fill over a shared [`CostField`].
///
/// The engine owns its goal set, the gradient field and its scratch buffers,
/// which are reused from scan to scan. Use one engine per planning agent; the
/// cost field itself can be shared freely.
pub struct ScanEngine<'f> {
    pub(crate) field: &'f CostField,
    blocking: BlockingRequirement,
    /// Blocking requirement the current field was scanned with.
    pub(crate) scanned_blocking: BlockingRequirement,
    /// Side length of the creature the current field was scanned for.
    pub(crate) footprint: i32,
    pub(crate) goals: GoalSet,
    goals_dirty: bool,
    pub(crate) gradient: Grid<f64>,
    finalized: Vec<bool>,
    /// Row-major bitmap of the obstacle mask used by the last scan.
    pub(crate) blocked: Vec<bool>,
    frontier: BinaryHeap<Frontier>,
    fill: Vec<Point>,
    /// Flat index of the cell each cell was reached from, `usize::MAX` for
    /// seeds and unreached cells.
    parent: Vec<usize>,
    steps: Vec<usize>,
    state: FieldState,
    pub(crate) seeding: Seeding,
    mask: ObstacleMask,
    nbuf: Vec<Step>,
}

impl<'f> ScanEngine<'f> {
    pub fn new(field: &'f CostField) -> Self {
        let range = field.range();
        let len = range.len();
        Self {
            field,
            blocking: field.blocking(),
            scanned_blocking: field.blocking(),
            footprint: 1,
            goals: GoalSet::new(),
            goals_dirty: false,
            gradient: Grid::new(range.width(), range.height(), UNREACHABLE),
            finalized: vec![false; len],
            blocked: vec![false; len],
            frontier: BinaryHeap::new(),
            fill: Vec::new(),
            parent: vec![usize::MAX; len],
            steps: vec![0; len],
            state: FieldState::Empty,
            seeding: Seeding::Goals,
            mask: ObstacleMask::none(),
            nbuf: Vec::with_capacity(8),
        }
    }

    /// The cost field this engine scans.
    #[inline]
    pub fn field(&self) -> &'f CostField {
        self.field
    }

    // -----------------------------------------------------------------------
    // Goals and settings
    // -----------------------------------------------------------------------

    /// Add a goal cell with the given seed (0, or negative to prefer it).
    pub fn add_goal(&mut self, cell: Point, seed: f64) -> Result<(), MapError> {
        self.goals.insert(self.field, cell, seed)?;
        self.goals_dirty = true;
        Ok(())
    }

    /// Remove a goal. Returns whether it was present.
    pub fn remove_goal(&mut self, cell: Point) -> bool {
        let removed = self.goals.remove(cell);
        self.goals_dirty |= removed;
        removed
    }

    pub fn clear_goals(&mut self) {
        if !self.goals.is_empty() {
            self.goals.clear();
            self.goals_dirty = true;
        }
    }

    #[inline]
    pub fn goals(&self) -> &GoalSet {
        &self.goals
    }

    /// Override the cost field's diagonal blocking requirement for this
    /// engine. Takes effect from the next scan.
    pub fn set_blocking_requirement(&mut self, blocking: BlockingRequirement) {
        if self.blocking != blocking {
            self.blocking = blocking;
            self.goals_dirty = true;
        }
    }

    #[inline]
    pub fn blocking_requirement(&self) -> BlockingRequirement {
        self.blocking
    }

    // -----------------------------------------------------------------------
    // Field state
    // -----------------------------------------------------------------------

    /// Clear the gradient field to [`UNREACHABLE`] and drop the fill record
    /// and frontier.
    pub fn reset_map(&mut self) {
        self.gradient.fill(UNREACHABLE);
        self.finalized.fill(false);
        self.blocked.fill(false);
        self.frontier.clear();
        self.fill.clear();
        self.parent.fill(usize::MAX);
        self.steps.fill(0);
        self.mask = ObstacleMask::none();
        self.footprint = 1;
        self.state = FieldState::Empty;
    }

    #[inline]
    pub fn state(&self) -> FieldState {
        self.state
    }

    /// The gradient field of the last scan.
    #[inline]
    pub fn gradient(&self) -> &Grid<f64> {
        &self.gradient
    }

    /// Gradient value at `p`. Cells no scan reached hold [`UNREACHABLE`].
    pub fn value_at(&self, p: Point) -> Result<f64, MapError> {
        self.gradient.at(p).copied()
    }

    /// Cells in the order the last scan finalized them.
    #[inline]
    pub fn fill_order(&self) -> &[Point] {
        &self.fill
    }

    /// Number of cells finalized by the last scan.
    #[inline]
    pub fn mapped_count(&self) -> usize {
        self.fill.len()
    }

    /// Number of moves on the recorded route from the nearest seed to `p`,
    /// or `None` if the last scan did not finalize `p`.
    pub fn steps_at(&self, p: Point) -> Option<usize> {
        let i = self.field.range().index_of(p)?;
        self.finalized[i].then(|| self.steps[i])
    }

    /// The route the last scan found from the nearest seed to `p`, excluding
    /// the seed and ending at `p`. Empty when `p` is itself a seed, `None`
    /// when `p` was not finalized.
    pub fn recorded_path(&self, p: Point) -> Option<Vec<Point>> {
        let range = self.field.range();
        let mut i = range.index_of(p)?;
        if !self.finalized[i] {
            return None;
        }
        let mut path = Vec::with_capacity(self.steps[i]);
        while self.parent[i] != usize::MAX {
            path.push(range.point_at(i));
            i = self.parent[i];
        }
        path.reverse();
        Some(path)
    }

    /// Whether the last scan finalized `p`.
    pub fn is_finalized(&self, p: Point) -> bool {
        self.field
            .range()
            .index_of(p)
            .is_some_and(|i| self.finalized[i])
    }

    // -----------------------------------------------------------------------
    // Scans
    // -----------------------------------------------------------------------

    /// Scan from the current goals until every reachable cell is finalized.
    pub fn scan(&mut self, mask: &ObstacleMask) -> Result<&Grid<f64>, MapError> {
        self.scan_sized(1, mask)?;
        Ok(&self.gradient)
    }

    /// Scan for a square creature `size` cells on a side.
    ///
    /// Each value belongs to the creature's top-left cell: a cell is open
    /// only when the whole square anchored there lies on passable, unmasked
    /// cells. A goal is reached once the square covers it.
    pub fn scan_large(&mut self, size: usize, mask: &ObstacleMask) -> Result<&Grid<f64>, MapError> {
        self.scan_sized(creature_side(size)?, mask)?;
        Ok(&self.gradient)
    }

    pub(crate) fn scan_sized(&mut self, side: i32, mask: &ObstacleMask) -> Result<(), MapError> {
        self.begin_sized(mask, Seeding::Goals, side)?;
        self.seed_goals();
        let (n, _) = self.relax(None, UNREACHABLE, |_| false);
        self.finish();
        debug!(
            "scan: {} goals, {} obstacles, size {}, {} cells finalized",
            self.goals.len(),
            mask.len(),
            side,
            n
        );
        Ok(())
    }

    /// Finalize at most `budget` more cells and return how many were
    /// finalized.
    ///
    /// Continues the previous call when that call was also partial, the
    /// goals and blocking requirement are unchanged, and `mask` equals the
    /// previous mask. Otherwise the field is rebuilt from scratch first.
    pub fn partial_scan(&mut self, budget: usize, mask: &ObstacleMask) -> Result<usize, MapError> {
        let resume = self.state == FieldState::Partial
            && self.seeding == Seeding::Goals
            && self.footprint == 1
            && !self.goals_dirty
            && self.mask == *mask;
        if resume {
            trace!("partial scan: resuming with {} cells mapped", self.fill.len());
        } else {
            trace!("partial scan: starting fresh");
            self.begin(mask, Seeding::Goals)?;
            self.seed_goals();
        }
        let (n, _) = self.relax(Some(budget), UNREACHABLE, |_| false);
        self.finish();
        debug!(
            "partial scan: budget {}, {} cells finalized, state {:?}",
            budget, n, self.state
        );
        Ok(n)
    }

    // -----------------------------------------------------------------------
    // Relaxation internals
    // -----------------------------------------------------------------------

    /// Clear the field and install `mask` for a new scan.
    pub(crate) fn begin(&mut self, mask: &ObstacleMask, seeding: Seeding) -> Result<(), MapError> {
        self.begin_sized(mask, seeding, 1)
    }

    /// Like [`begin`](Self::begin), for a creature `side` cells wide.
    pub(crate) fn begin_sized(
        &mut self,
        mask: &ObstacleMask,
        seeding: Seeding,
        side: i32,
    ) -> Result<(), MapError> {
        let range = self.field.range();
        if let Some(point) = mask.iter().find(|&p| !range.contains(p)) {
            return Err(MapError::OutOfBounds { point, range });
        }
        self.gradient.fill(UNREACHABLE);
        self.finalized.fill(false);
        self.blocked.fill(false);
        self.frontier.clear();
        self.fill.clear();
        self.parent.fill(usize::MAX);
        self.steps.fill(0);
        for p in mask.iter() {
            if let Some(i) = range.index_of(p) {
                self.blocked[i] = true;
            }
        }
        if side > 1 {
            self.block_footprints(range, side);
        }
        if self.mask != *mask {
            self.mask = mask.clone();
        }
        self.scanned_blocking = self.blocking;
        self.footprint = side;
        self.seeding = seeding;
        if seeding == Seeding::Goals {
            self.goals_dirty = false;
        }
        Ok(())
    }

    /// Mark every cell whose `side` square leaves the grid or touches a
    /// wall or masked cell.
    fn block_footprints(&mut self, range: Range, side: i32) {
        let open: Vec<bool> = range
            .iter()
            .zip(self.blocked.iter())
            .map(|(p, &masked)| !masked && self.field.is_passable(p))
            .collect();
        for (i, p) in range.iter().enumerate() {
            let fits = Range::square(p, side)
                .iter()
                .all(|q| range.index_of(q).is_some_and(|j| open[j]));
            if !fits {
                self.blocked[i] = true;
            }
        }
    }

    /// Seed every goal that is not masked. Large creatures seed each
    /// top-left cell whose square covers a goal.
    fn seed_goals(&mut self) {
        let range = self.field.range();
        let side = self.footprint;
        let seeds: Vec<(usize, f64)> = self
            .goals
            .iter()
            .flat_map(|(g, seed)| {
                Range::square(g - Point::new(side - 1, side - 1), side)
                    .iter()
                    .filter_map(move |c| range.index_of(c).map(|i| (i, seed)))
            })
            .collect();
        for (i, seed) in seeds {
            if !self.blocked[i] {
                self.push_seed(i, seed);
            }
        }
    }

    /// Whether the creature anchored at `p` stands on a goal.
    pub(crate) fn on_goal(&self, p: Point) -> bool {
        if self.footprint == 1 {
            return self.goals.contains(p);
        }
        let square = Range::square(p, self.footprint);
        self.goals.iter().any(|(g, _)| square.contains(g))
    }

    /// Seed a single cell by flat index, keeping the lower value.
    pub(crate) fn push_seed(&mut self, idx: usize, value: f64) {
        let g = &mut self.gradient.as_mut_slice()[idx];
        if value < *g {
            *g = value;
            self.parent[idx] = usize::MAX;
            self.steps[idx] = 0;
            self.frontier.push(Frontier { value, idx });
        }
    }

    /// Pop and finalize frontier cells until the frontier is exhausted, the
    /// budget is spent, the next value exceeds `limit`, or `stop` accepts a
    /// finalized cell. Returns the number of cells finalized and the cell
    /// `stop` accepted, if any.
    pub(crate) fn relax(
        &mut self,
        budget: Option<usize>,
        limit: f64,
        mut stop: impl FnMut(Point) -> bool,
    ) -> (usize, Option<Point>) {
        let range = self.field.range();
        let mut nbuf = std::mem::take(&mut self.nbuf);
        let mut done = 0;
        let mut hit = None;

        while budget.is_none_or(|b| done < b) {
            let Some(&top) = self.frontier.peek() else {
                break;
            };
            if self.is_stale(top) {
                self.frontier.pop();
                continue;
            }
            if top.value > limit {
                break;
            }
            self.frontier.pop();

            let ci = top.idx;
            self.finalized[ci] = true;
            let cp = range.point_at(ci);
            self.fill.push(cp);
            done += 1;
            if stop(cp) {
                hit = Some(cp);
                break;
            }

            nbuf.clear();
            self.field
                .expand(cp, self.scanned_blocking, &self.blocked, &mut nbuf);
            for step in nbuf.iter() {
                let Some(ni) = range.index_of(step.to) else {
                    continue;
                };
                if self.finalized[ni] {
                    continue;
                }
                let tentative = top.value + step.cost;
                let g = &mut self.gradient.as_mut_slice()[ni];
                if tentative < *g {
                    *g = tentative;
                    self.parent[ni] = ci;
                    self.steps[ni] = self.steps[ci] + 1;
                    self.frontier.push(Frontier {
                        value: tentative,
                        idx: ni,
                    });
                }
            }
        }

        self.nbuf = nbuf;
        (done, hit)
    }

    #[inline]
    fn is_stale(&self, entry: Frontier) -> bool {
        self.finalized[entry.idx] || entry.value > self.gradient.as_slice()[entry.idx]
    }

    /// Drop stale heap entries and settle the field state.
    pub(crate) fn finish(&mut self) {
        while let Some(&top) = self.frontier.peek() {
            if !self.is_stale(top) {
                break;
            }
            self.frontier.pop();
        }
        self.state = if self.frontier.is_empty() {
            FieldState::Full
        } else {
            FieldState::Partial
        };
    }
}
