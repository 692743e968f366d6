use influence_core::{Measurement, Point, Visibility, chebyshev, euclidean};
use influence_paths::CostField;

use crate::los::line;

/// The cells an area-effect technique covers around its aim point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AreaShape {
    /// Only the aimed cell.
    Point,
    /// Every cell within `radius` of the aim under `metric` that the aim
    /// point can see.
    Blast { radius: i32, metric: Measurement },
    /// A wedge from the user toward the aim, `span_degrees` wide and
    /// `radius` long, limited to cells the user can see.
    Cone { radius: i32, span_degrees: f64 },
    /// The straight line from the user to the aim, cut short by the first
    /// wall.
    Line,
    /// A line from the user through the aim that always runs `length`
    /// cells, cut short by the first wall.
    Beam { length: i32 },
}

/// An area-effect action scored by the tactical evaluator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Technique {
    pub name: String,
    pub shape: AreaShape,
    pub min_range: i32,
    pub max_range: i32,
    pub range_metric: Measurement,
    /// Effect magnitude applied to every covered cell.
    pub power: f64,
    /// Whether the user may stand inside its own area.
    pub self_targeting: bool,
}

impl Default for Technique {
    fn default() -> Self {
        Self {
            name: String::from("strike"),
            shape: AreaShape::Point,
            min_range: 1,
            max_range: 1,
            range_metric: Measurement::Chebyshev,
            power: 1.0,
            self_targeting: false,
        }
    }
}

impl Technique {
    pub fn new(name: impl Into<String>, shape: AreaShape) -> Self {
        Self {
            name: name.into(),
            shape,
            ..Self::default()
        }
    }

    pub fn with_range(mut self, min_range: i32, max_range: i32) -> Self {
        self.min_range = min_range.max(0);
        self.max_range = max_range.max(self.min_range);
        self
    }

    pub fn with_range_metric(mut self, metric: Measurement) -> Self {
        self.range_metric = metric;
        self
    }

    pub fn with_power(mut self, power: f64) -> Self {
        self.power = power;
        self
    }

    pub fn with_self_targeting(mut self, allowed: bool) -> Self {
        self.self_targeting = allowed;
        self
    }

    /// Whether `aim` is within range of a user standing at `user`.
    pub fn can_target(&self, user: Point, aim: Point) -> bool {
        let d = self.range_metric.distance(user, aim);
        d >= f64::from(self.min_range) && d <= f64::from(self.max_range)
    }

    /// Whether a target at `target` could fall inside the area at all,
    /// ignoring walls and sight.
    pub fn could_cover(&self, user: Point, aim: Point, target: Point) -> bool {
        match self.shape {
            AreaShape::Point => target == aim,
            AreaShape::Blast { radius, metric } => metric.distance(aim, target) <= f64::from(radius),
            AreaShape::Cone { radius, .. } => {
                target != user && euclidean(user, target) <= f64::from(radius)
            }
            AreaShape::Line => target != user && chebyshev(user, target) <= chebyshev(user, aim),
            AreaShape::Beam { length } => target != user && chebyshev(user, target) <= length,
        }
    }

    /// Covered cells and the magnitude applied to each. Walls are never
    /// covered.
    pub fn area(
        &self,
        user: Point,
        aim: Point,
        field: &CostField,
        visibility: &impl Visibility,
    ) -> Vec<(Point, f64)> {
        let range = field.range();
        match self.shape {
            AreaShape::Point => {
                if field.is_passable(aim) {
                    vec![(aim, self.power)]
                } else {
                    Vec::new()
                }
            }
            AreaShape::Blast { radius, metric } => range
                .around(aim, radius)
                .iter()
                .filter(|&p| field.is_passable(p))
                .filter(|&p| metric.distance(aim, p) <= f64::from(radius))
                .filter(|&p| p == aim || visibility.is_visible(aim, p))
                .map(|p| (p, self.power))
                .collect(),
            AreaShape::Cone {
                radius,
                span_degrees,
            } => {
                if aim == user {
                    return Vec::new();
                }
                let bearing = angle(user, aim);
                let half = span_degrees / 2.0;
                range
                    .around(user, radius)
                    .iter()
                    .filter(|&p| p != user && field.is_passable(p))
                    .filter(|&p| euclidean(user, p) <= f64::from(radius))
                    .filter(|&p| angle_between(bearing, angle(user, p)) <= half)
                    .filter(|&p| visibility.is_visible(user, p))
                    .map(|p| (p, self.power))
                    .collect()
            }
            AreaShape::Line => self.ray(user, aim, chebyshev(user, aim), field),
            AreaShape::Beam { length } => self.ray(user, aim, length, field),
        }
    }

    /// `length` cells along the line from `user` toward `aim`, stopping
    /// before the first wall.
    fn ray(&self, user: Point, aim: Point, length: i32, field: &CostField) -> Vec<(Point, f64)> {
        let d = aim - user;
        let n = d.x.abs().max(d.y.abs());
        if n == 0 || length <= 0 {
            return Vec::new();
        }
        let scale = f64::from(length) / f64::from(n);
        let reach = Point::new(
            (f64::from(d.x) * scale).round() as i32,
            (f64::from(d.y) * scale).round() as i32,
        );
        line(user, user + reach)
            .skip(1)
            .take(length as usize)
            .take_while(|&p| field.is_passable(p))
            .map(|p| (p, self.power))
            .collect()
    }
}

/// Bearing from `a` to `b` in degrees.
fn angle(a: Point, b: Point) -> f64 {
    let d = b - a;
    f64::from(d.y).atan2(f64::from(d.x)).to_degrees()
}

/// Smallest absolute difference between two bearings, in [0, 180].
fn angle_between(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}
