use std::ops::{Add, Mul};

/// Color triple produced by expression evaluation.
///
/// Channels are unbounded reals; saturation to `[-1, 1]` happens at quantization time.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
}

impl Rgb {
    /// Build a triple from three channel values.
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Same value in every channel.
    pub const fn splat(v: f64) -> Self {
        Self { r: v, g: v, b: v }
    }

    /// Apply `f` to each channel.
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            r: f(self.r),
            g: f(self.g),
            b: f(self.b),
        }
    }

    /// Convex combination `w*self + (1-w)*other`, per channel.
    pub fn lerp_toward(self, other: Self, w: f64) -> Self {
        self * w + other * (1.0 - w)
    }

    /// `true` when no channel is NaN or infinite.
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }
}

impl Add for Rgb {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl Mul for Rgb {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b)
    }
}

impl Mul<f64> for Rgb {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.map(|c| c * rhs)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
