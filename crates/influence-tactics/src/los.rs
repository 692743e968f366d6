//! Bresenham line of sight over a cost field.

use influence_core::{Point, Visibility};
use influence_paths::CostField;

/// Line of sight that treats walls as opaque and everything else as clear.
///
/// A target is visible when every cell strictly between the two endpoints on
/// the Bresenham line is passable. Endpoints are never checked, so a wall
/// itself can be seen.
#[derive(Debug, Clone, Copy)]
pub struct BresenhamLos<'f> {
    field: &'f CostField,
}

impl<'f> BresenhamLos<'f> {
    pub fn new(field: &'f CostField) -> Self {
        Self { field }
    }
}

impl Visibility for BresenhamLos<'_> {
    fn is_visible(&self, from: Point, to: Point) -> bool {
        let range = self.field.range();
        if !range.contains(from) || !range.contains(to) {
            return false;
        }
        line(from, to)
            .skip(1)
            .take_while(|&p| p != to)
            .all(|p| self.field.is_passable(p))
    }
}

/// Cells on the Bresenham line from `a` to `b`, both ends included.
pub fn line(a: Point, b: Point) -> impl Iterator<Item = Point> {
    let dx = (b.x - a.x).abs();
    let dy = -(b.y - a.y).abs();
    let sx = (b.x - a.x).signum();
    let sy = (b.y - a.y).signum();
    let mut err = dx + dy;
    let mut cur = Some(a);

    std::iter::from_fn(move || {
        let p = cur?;
        cur = if p == b {
            None
        } else {
            let e2 = 2 * err;
            let mut next = p;
            if e2 >= dy {
                err += dy;
                next.x += sx;
            }
            if e2 <= dx {
                err += dx;
                next.y += sy;
            }
            Some(next)
        };
        Some(p)
    })
}
