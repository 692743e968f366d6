use crate::geom::Point;

/// Line-of-sight predicate supplied by a field-of-view module.
///
/// Implemented for every `Fn(Point, Point) -> bool`, so a closure over an
/// existing FOV cache is enough.
pub trait Visibility {
    /// Whether `to` can be seen from `from`.
    fn is_visible(&self, from: Point, to: Point) -> bool;
}

impl<F> Visibility for F
where
    F: Fn(Point, Point) -> bool,
{
    #[inline]
    fn is_visible(&self, from: Point, to: Point) -> bool {
        self(from, to)
    }
}

/// Visibility that sees everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Omniscient;

impl Visibility for Omniscient {
    #[inline]
    fn is_visible(&self, _from: Point, _to: Point) -> bool {
        true
    }
}
