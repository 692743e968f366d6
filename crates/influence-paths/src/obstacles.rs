use influence_core::Point;

/// Cells blocked for the duration of one scan, such as other actors.
///
/// Built fresh every planning tick. The mask never touches the cost field;
/// an obstacle on a goal cell disables that goal for the scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<Point>", into = "Vec<Point>"))]
pub struct ObstacleMask {
    cells: Vec<Point>,
}

impl ObstacleMask {
    pub fn new(cells: impl IntoIterator<Item = Point>) -> Self {
        let mut cells: Vec<Point> = cells.into_iter().collect();
        cells.sort_unstable();
        cells.dedup();
        Self { cells }
    }

    /// A mask that blocks nothing.
    pub fn none() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.cells.binary_search(&p).is_ok()
    }

    /// Blocked cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells blocked by either mask.
    pub fn union(&self, other: &ObstacleMask) -> Self {
        Self::new(self.iter().chain(other.iter()))
    }

    /// This mask with `cell` blocked too.
    pub fn with(&self, cell: Point) -> Self {
        match self.cells.binary_search(&cell) {
            Ok(_) => self.clone(),
            Err(at) => {
                let mut cells = self.cells.clone();
                cells.insert(at, cell);
                Self { cells }
            }
        }
    }

    /// This mask with `cell` unblocked.
    pub fn without(&self, cell: Point) -> Self {
        Self {
            cells: self.cells.iter().copied().filter(|&p| p != cell).collect(),
        }
    }
}

impl From<Vec<Point>> for ObstacleMask {
    fn from(cells: Vec<Point>) -> Self {
        Self::new(cells)
    }
}

impl From<ObstacleMask> for Vec<Point> {
    fn from(mask: ObstacleMask) -> Self {
        mask.cells
    }
}

impl FromIterator<Point> for ObstacleMask {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedups_and_sorts() {
        let m = ObstacleMask::new([Point::new(1, 1), Point::new(0, 0), Point::new(1, 1)]);
        assert_eq!(m.len(), 2);
        assert_eq!(m.iter().next(), Some(Point::new(0, 0)));
        assert!(m.contains(Point::new(1, 1)));
        assert!(!m.contains(Point::new(1, 0)));
    }

    #[test]
    fn union_and_without() {
        let a: ObstacleMask = [Point::new(0, 0)].into_iter().collect();
        let b = ObstacleMask::new([Point::new(2, 2), Point::new(0, 0)]);
        let u = a.union(&b);
        assert_eq!(u, ObstacleMask::new([Point::new(2, 2), Point::new(0, 0)]));
        assert_eq!(u.with(Point::new(1, 0)).iter().nth(1), Some(Point::new(1, 0)));
        assert_eq!(u.with(Point::new(2, 2)), u);
        let w = u.without(Point::new(0, 0));
        assert!(!w.contains(Point::new(0, 0)));
        assert!(w.contains(Point::new(2, 2)));
        assert!(ObstacleMask::none().is_empty());
    }
}
