use crate::attribute::AttributeValue;

/// Trait for types that can be animated by interpolating between values
pub trait Animatable: Clone + PartialEq + 'static {
    /// Linear interpolation between two values
    /// t = 0.0 returns `from`, t = 1.0 returns `to`
    /// t can exceed [0, 1] range for overshoot effects
    fn lerp(from: &Self, to: &Self, t: f64) -> Self;
}

impl Animatable for f64 {
    fn lerp(from: &Self, to: &Self, t: f64) -> Self {
        from + t * (to - from)
    }
}

impl Animatable for AttributeValue {
    /// Only the number moves; unit and wrapper are taken from `from`.
    fn lerp(from: &Self, to: &Self, t: f64) -> Self {
        AttributeValue {
            value: f64::lerp(&from.value, &to.value, t),
            unit: from.unit.clone(),
            wrapper: from.wrapper,
        }
    }
}
