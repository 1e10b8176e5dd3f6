/// A closed or open range of `f32` values, used for valid hit distances and
/// for clamping display values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }

    /// Copy of this interval with its upper bound replaced by `max`, used to
    /// shrink the search range as closer hits are found.
    pub fn with_max(&self, max: f32) -> Interval {
        Interval::new(self.min, max)
    }

    /// Strictly positive distances.
    pub const POSITIVE: Interval = Interval {
        min: 0.0,
        max: f32::INFINITY,
    };

    /// The displayable channel range.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };
}
