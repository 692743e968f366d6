//! A dense, row-major 2D grid.
//!
//! [`Grid<T>`] stores one `T` per cell of a [`Range`] anchored at the origin.
//! Cell `(x, y)` lives at flat index `y * width + x`. Tag grids handed in by
//! a map generator, cost arrays and gradient fields all use this layout.

use crate::error::MapError;
use crate::geom::{Point, Range};

/// A dense 2D grid of `T` values in row-major order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid<T> {
    cells: Vec<T>,
    bounds: Range,
}

impl<T: Clone> Grid<T> {
    /// Create a new grid filled with `value`.
    pub fn new(width: i32, height: i32, value: T) -> Self {
        let bounds = Range::sized(width, height);
        Self {
            cells: vec![value; bounds.len()],
            bounds,
        }
    }

    /// Fill the entire grid with the given value.
    pub fn fill(&mut self, value: T) {
        for c in self.cells.iter_mut() {
            *c = value.clone();
        }
    }
}

impl<T> Grid<T> {
    /// Build a grid by evaluating `f` at every point, row by row.
    pub fn from_fn(width: i32, height: i32, mut f: impl FnMut(Point) -> T) -> Self {
        let bounds = Range::sized(width, height);
        Self {
            cells: bounds.iter().map(&mut f).collect(),
            bounds,
        }
    }

    /// The bounding range of this grid.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Width of the grid.
    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    /// Height of the grid.
    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// Whether the grid contains the given point.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    /// Get the value at a point, or `None` if out of bounds.
    #[inline]
    pub fn get(&self, p: Point) -> Option<&T> {
        self.bounds.index_of(p).map(|i| &self.cells[i])
    }

    /// Get the value at a point, failing with [`MapError::OutOfBounds`].
    pub fn at(&self, p: Point) -> Result<&T, MapError> {
        self.get(p).ok_or(MapError::OutOfBounds {
            point: p,
            range: self.bounds,
        })
    }

    /// Mutable access to the value at a point, or `None` if out of bounds.
    #[inline]
    pub fn get_mut(&mut self, p: Point) -> Option<&mut T> {
        match self.bounds.index_of(p) {
            Some(i) => Some(&mut self.cells[i]),
            None => None,
        }
    }

    /// Set the value at a point.
    pub fn set(&mut self, p: Point, value: T) -> Result<(), MapError> {
        let range = self.bounds;
        let slot = self
            .get_mut(p)
            .ok_or(MapError::OutOfBounds { point: p, range })?;
        *slot = value;
        Ok(())
    }

    /// The raw row-major backing slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    /// Mutable raw row-major backing slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.cells
    }

    /// Iterate over `(Point, &T)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, &T)> + '_ {
        self.bounds.iter().zip(self.cells.iter())
    }

    /// Apply `f` to every cell, producing a grid of the same shape.
    pub fn map<U>(&self, mut f: impl FnMut(Point, &T) -> U) -> Grid<U> {
        Grid {
            cells: self.iter().map(|(p, v)| f(p, v)).collect(),
            bounds: self.bounds,
        }
    }
}

impl Grid<char> {
    /// Parse an ASCII map, one row per line.
    ///
    /// Leading and trailing blank lines are ignored; every remaining line must
    /// have the same number of characters.
    pub fn from_ascii(s: &str) -> Result<Self, MapError> {
        let lines: Vec<&str> = s.trim_matches('\n').lines().map(str::trim_end).collect();
        let width = lines.first().map_or(0, |l| l.chars().count());
        let mut cells = Vec::with_capacity(width * lines.len());
        for (y, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(MapError::RaggedGrid {
                    line: y,
                    expected: width,
                    found,
                });
            }
            cells.extend(line.chars());
        }
        Ok(Self {
            cells,
            bounds: Range::sized(width as i32, lines.len() as i32),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_and_size() {
        let g = Grid::new(10, 5, 0u8);
        assert_eq!(g.width(), 10);
        assert_eq!(g.height(), 5);
        assert_eq!(g.as_slice().len(), 50);
    }

    #[test]
    fn set_and_get() {
        let mut g = Grid::new(4, 4, 0);
        g.set(Point::new(2, 3), 42).unwrap();
        assert_eq!(g.get(Point::new(2, 3)), Some(&42));
        assert_eq!(g.as_slice()[3 * 4 + 2], 42);
        assert_eq!(g.get(Point::new(10, 10)), None);
    }

    #[test]
    fn out_of_bounds_is_an_error() {
        let mut g = Grid::new(3, 3, 'x');
        let err = g.set(Point::new(-1, 0), 'y').unwrap_err();
        assert_eq!(
            err,
            MapError::OutOfBounds {
                point: Point::new(-1, 0),
                range: Range::sized(3, 3),
            }
        );
        assert!(g.at(Point::new(3, 0)).is_err());
    }

    #[test]
    fn from_ascii_is_row_major() {
        let g = Grid::from_ascii(
            "
###
#.#
",
        )
        .unwrap();
        assert_eq!(g.width(), 3);
        assert_eq!(g.height(), 2);
        assert_eq!(g.get(Point::new(1, 1)), Some(&'.'));
        assert_eq!(g.get(Point::new(1, 0)), Some(&'#'));
    }

    #[test]
    fn from_ascii_rejects_ragged_rows() {
        let err = Grid::from_ascii("##\n###").unwrap_err();
        assert_eq!(
            err,
            MapError::RaggedGrid {
                line: 1,
                expected: 2,
                found: 3,
            }
        );
    }

    #[test]
    fn map_preserves_shape() {
        let g = Grid::from_fn(3, 2, |p| p.x + p.y);
        let doubled = g.map(|_, v| v * 2);
        assert_eq!(doubled.get(Point::new(2, 1)), Some(&6));
        assert_eq!(doubled.bounds(), g.bounds());
    }
}
