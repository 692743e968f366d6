use influence_core::{
    BlockingRequirement, Direction, FieldConfig, Grid, MIN_COST, MapError, Measurement, Point,
    Range,
};

/// One legal move out of a cell, as yielded by [`CostField::neighbors`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub to: Point,
    pub dir: Direction,
    /// Multiplier × destination cost.
    pub cost: f64,
}

/// Per-cell traversal costs plus the movement topology used to walk them.
///
/// Walls carry an infinite cost. A `CostField` is immutable once built and
/// can be shared by reference between any number of scan engines.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostField {
    costs: Grid<f64>,
    measurement: Measurement,
    blocking: BlockingRequirement,
}

impl CostField {
    /// Build a field from a tag grid: cells matching `is_wall` are
    /// impassable, every other cell costs 1.
    pub fn build<T>(grid: &Grid<T>, is_wall: impl Fn(&T) -> bool, measurement: Measurement) -> Self {
        Self {
            costs: grid.map(|_, t| if is_wall(t) { f64::INFINITY } else { 1.0 }),
            measurement,
            blocking: BlockingRequirement::default(),
        }
    }

    /// Build a field with a per-cell cost. An infinite cost marks a wall;
    /// finite costs below [`MIN_COST`] and NaN are rejected.
    pub fn from_costs<T>(
        grid: &Grid<T>,
        cost: impl Fn(Point, &T) -> f64,
        measurement: Measurement,
    ) -> Result<Self, MapError> {
        let costs = grid.map(|p, t| cost(p, t));
        if let Some((point, &c)) = costs
            .iter()
            .find(|&(_, &c)| c.is_nan() || c < MIN_COST)
        {
            return Err(MapError::InvalidCost { point, cost: c });
        }
        Ok(Self {
            costs,
            measurement,
            blocking: BlockingRequirement::default(),
        })
    }

    /// Parse an ASCII map where `wall` marks impassable cells.
    pub fn from_ascii(map: &str, wall: char, measurement: Measurement) -> Result<Self, MapError> {
        let grid = Grid::from_ascii(map)?;
        Ok(Self::build(&grid, |&c| c == wall, measurement))
    }

    /// Apply a [`FieldConfig`] to a tag grid.
    pub fn with_config<T>(grid: &Grid<T>, is_wall: impl Fn(&T) -> bool, config: FieldConfig) -> Self {
        Self::build(grid, is_wall, config.measurement).with_blocking(config.blocking)
    }

    /// Set the default blocking requirement for diagonal moves.
    pub fn with_blocking(mut self, blocking: BlockingRequirement) -> Self {
        self.blocking = blocking;
        self
    }

    #[inline]
    pub fn range(&self) -> Range {
        self.costs.bounds()
    }

    #[inline]
    pub fn measurement(&self) -> Measurement {
        self.measurement
    }

    #[inline]
    pub fn blocking(&self) -> BlockingRequirement {
        self.blocking
    }

    /// Traversal cost of a cell, infinite for walls.
    pub fn cost(&self, p: Point) -> Result<f64, MapError> {
        self.costs.at(p).copied()
    }

    /// Whether `p` is inside the grid and not a wall.
    #[inline]
    pub fn is_passable(&self, p: Point) -> bool {
        self.costs.get(p).is_some_and(|c| c.is_finite())
    }

    /// The raw cost grid.
    pub fn costs(&self) -> &Grid<f64> {
        &self.costs
    }

    /// Collect the legal moves out of `cell` into `buf`, in direction order,
    /// using the field's own blocking requirement and no obstacles.
    pub fn neighbors(&self, cell: Point, buf: &mut Vec<Step>) -> Result<(), MapError> {
        if !self.range().contains(cell) {
            return Err(MapError::OutOfBounds {
                point: cell,
                range: self.range(),
            });
        }
        buf.clear();
        self.expand(cell, self.blocking, &[], buf);
        Ok(())
    }

    /// Append the legal moves out of `cell`. `masked` is a row-major bitmap
    /// of temporarily blocked cells, or empty for none.
    pub(crate) fn expand(
        &self,
        cell: Point,
        blocking: BlockingRequirement,
        masked: &[bool],
        buf: &mut Vec<Step>,
    ) {
        for &dir in self.measurement.directions() {
            if let Some(cost) = self.step_cost(cell, dir, blocking, masked) {
                buf.push(Step {
                    to: cell.step(dir),
                    dir,
                    cost,
                });
            }
        }
    }

    /// Cost of stepping from `cell` in `dir`, or `None` if the move is
    /// illegal.
    pub(crate) fn step_cost(
        &self,
        cell: Point,
        dir: Direction,
        blocking: BlockingRequirement,
        masked: &[bool],
    ) -> Option<f64> {
        let to = cell.step(dir);
        let dest = self.open_cost(to, masked)?;
        if dir.is_diagonal() {
            let (dx, dy) = dir.delta();
            let open = u8::from(self.open_cost(cell.shift(dx, 0), masked).is_some())
                + u8::from(self.open_cost(cell.shift(0, dy), masked).is_some());
            if !blocking.permits(open) {
                return None;
            }
        }
        Some(self.measurement.step_multiplier(dir) * dest)
    }

    fn open_cost(&self, p: Point, masked: &[bool]) -> Option<f64> {
        let i = self.range().index_of(p)?;
        let c = self.costs.as_slice()[i];
        if c.is_infinite() || masked.get(i).copied().unwrap_or(false) {
            return None;
        }
        Some(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(field: &CostField, p: Point) -> Vec<Point> {
        let mut buf = Vec::new();
        field.neighbors(p, &mut buf).unwrap();
        buf.iter().map(|s| s.to).collect()
    }

    #[test]
    fn build_marks_walls_infinite() {
        let field = CostField::from_ascii(
            "
###
#.#
###",
            '#',
            Measurement::Chebyshev,
        )
        .unwrap();
        assert!(field.is_passable(Point::new(1, 1)));
        assert!(!field.is_passable(Point::new(0, 0)));
        assert!(!field.is_passable(Point::new(5, 5)));
        assert_eq!(field.cost(Point::new(0, 1)), Ok(f64::INFINITY));
        assert_eq!(field.cost(Point::new(1, 1)), Ok(1.0));
    }

    #[test]
    fn neighbors_follow_direction_order() {
        let field = CostField::from_ascii("...\n...\n...", '#', Measurement::Chebyshev).unwrap();
        let c = Point::new(1, 1);
        let expected: Vec<Point> = Direction::ALL.iter().map(|&d| c.step(d)).collect();
        assert_eq!(targets(&field, c), expected);
    }

    #[test]
    fn manhattan_has_no_diagonals() {
        let field = CostField::from_ascii("...\n...\n...", '#', Measurement::Manhattan).unwrap();
        assert_eq!(targets(&field, Point::new(1, 1)).len(), 4);
        assert_eq!(targets(&field, Point::new(0, 0)).len(), 2);
    }

    #[test]
    fn euclidean_diagonal_step_costs_more() {
        let field = CostField::from_ascii("..\n..", '#', Measurement::Euclidean)
            .unwrap()
            .with_blocking(BlockingRequirement::None);
        let mut buf = Vec::new();
        field.neighbors(Point::new(0, 0), &mut buf).unwrap();
        let diag = buf.iter().find(|s| s.dir == Direction::SouthEast).unwrap();
        assert_eq!(diag.cost, std::f64::consts::SQRT_2);
        let east = buf.iter().find(|s| s.dir == Direction::East).unwrap();
        assert_eq!(east.cost, 1.0);
    }

    #[test]
    fn blocking_requirement_governs_corner_cuts() {
        // Two walls touching at a corner between (0,0) and (1,1).
        let map = ".#\n#.";
        let strict = CostField::from_ascii(map, '#', Measurement::Chebyshev).unwrap();
        assert!(targets(&strict, Point::new(0, 0)).is_empty());

        let one = strict.clone().with_blocking(BlockingRequirement::One);
        assert!(targets(&one, Point::new(0, 0)).is_empty());

        let loose = strict.with_blocking(BlockingRequirement::None);
        assert_eq!(targets(&loose, Point::new(0, 0)), vec![Point::new(1, 1)]);
    }

    #[test]
    fn single_open_corner_needs_requirement_one() {
        let map = "..\n#.";
        let both = CostField::from_ascii(map, '#', Measurement::Chebyshev).unwrap();
        assert!(!targets(&both, Point::new(0, 0)).contains(&Point::new(1, 1)));
        let one = both.with_blocking(BlockingRequirement::One);
        assert!(targets(&one, Point::new(0, 0)).contains(&Point::new(1, 1)));
    }

    #[test]
    fn from_costs_rejects_non_positive() {
        let grid = Grid::new(3, 1, 1.0);
        let err = CostField::from_costs(
            &grid,
            |p, &c| if p.x == 2 { 0.0 } else { c },
            Measurement::Manhattan,
        )
        .unwrap_err();
        assert_eq!(
            err,
            MapError::InvalidCost {
                point: Point::new(2, 0),
                cost: 0.0
            }
        );
    }

    #[test]
    fn weighted_costs_scale_steps() {
        let grid = Grid::from_fn(3, 1, |p| p.x);
        let field =
            CostField::from_costs(&grid, |_, &x| 1.0 + f64::from(x), Measurement::Manhattan).unwrap();
        let mut buf = Vec::new();
        field.neighbors(Point::new(1, 0), &mut buf).unwrap();
        let costs: Vec<f64> = buf.iter().map(|s| s.cost).collect();
        assert_eq!(costs, vec![3.0, 1.0]);
    }

    #[test]
    fn neighbors_out_of_bounds() {
        let field = CostField::from_ascii("..", '#', Measurement::Manhattan).unwrap();
        let mut buf = Vec::new();
        assert_eq!(
            field.neighbors(Point::new(0, 3), &mut buf),
            Err(MapError::OutOfBounds {
                point: Point::new(0, 3),
                range: Range::sized(2, 1),
            })
        );
    }

    #[test]
    fn masked_cells_are_closed() {
        let field = CostField::from_ascii("...", '#', Measurement::Manhattan).unwrap();
        let mut masked = vec![false; 3];
        masked[2] = true;
        let mut buf = Vec::new();
        field.expand(Point::new(1, 0), field.blocking(), &masked, &mut buf);
        assert_eq!(buf.len(), 1);
        assert_eq!(buf[0].to, Point::new(0, 0));
    }
}
