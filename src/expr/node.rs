use std::fmt;

use crate::foundation::core::Rgb;

/// A node of a random-art expression tree.
///
/// Every node maps normalized device coordinates `(x, y) ∈ [-1, 1]²` to an [`Rgb`] triple.
/// Each operator uniquely owns its children, so a tree is a strict tree with no sharing.
/// Trees are immutable once built; [`Expr::eval`] takes `&self` and is safe to call from any
/// number of threads at once.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// The same color everywhere. Channels are drawn from `[-1, 1]`.
    Constant(Rgb),
    /// `(x, x, x)`.
    VariableX,
    /// `(y, y, y)`.
    VariableY,
    /// `sin(phase + freq * c)` for each channel `c` of the child.
    Sin {
        /// Phase offset in radians.
        phase: f64,
        /// Frequency multiplier.
        freq: f64,
        /// Input expression.
        child: Box<Expr>,
    },
    /// `1 - 2 / (1 + c²)` for each channel `c` of the child.
    Well {
        /// Input expression.
        child: Box<Expr>,
    },
    /// Child sampled at `(x * scale, y * scale)`, then shaped by `0.5 * (sin(5c) + cos(5c))`.
    FractalNoise {
        /// Coordinate scale applied before evaluating the child.
        scale: f64,
        /// Input expression.
        child: Box<Expr>,
    },
    /// Component-wise product of both children.
    Product {
        /// Left factor.
        left: Box<Expr>,
        /// Right factor.
        right: Box<Expr>,
    },
    /// `weight * left + (1 - weight) * right`.
    Mix {
        /// Blend weight in `[0, 1]`.
        weight: f64,
        /// Expression weighted by `weight`.
        left: Box<Expr>,
        /// Expression weighted by `1 - weight`.
        right: Box<Expr>,
    },
}

impl Expr {
    /// Evaluate the tree at `(x, y)`.
    ///
    /// Total over the reals: `Well`'s denominator is always `>= 1`, and every other operator
    /// is built from `sin`, `cos`, products and sums.
    pub fn eval(&self, x: f64, y: f64) -> Rgb {
        match self {
            Self::Constant(c) => *c,
            Self::VariableX => Rgb::splat(x),
            Self::VariableY => Rgb::splat(y),
            Self::Sin { phase, freq, child } => {
                child.eval(x, y).map(|c| (phase + freq * c).sin())
            }
            Self::Well { child } => child.eval(x, y).map(well),
            Self::FractalNoise { scale, child } => {
                child.eval(x * scale, y * scale).map(smooth_wave)
            }
            Self::Product { left, right } => left.eval(x, y) * right.eval(x, y),
            Self::Mix {
                weight,
                left,
                right,
            } => left.eval(x, y).lerp_toward(right.eval(x, y), *weight),
        }
    }

    /// Longest root-to-leaf path, counted in edges. A leaf has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            Self::Constant(_) | Self::VariableX | Self::VariableY => 0,
            Self::Sin { child, .. } | Self::Well { child } | Self::FractalNoise { child, .. } => {
                1 + child.depth()
            }
            Self::Product { left, right } | Self::Mix { left, right, .. } => {
                1 + left.depth().max(right.depth())
            }
        }
    }

    /// Shortest root-to-leaf path, counted in edges.
    pub fn min_leaf_depth(&self) -> usize {
        match self {
            Self::Constant(_) | Self::VariableX | Self::VariableY => 0,
            Self::Sin { child, .. } | Self::Well { child } | Self::FractalNoise { child, .. } => {
                1 + child.min_leaf_depth()
            }
            Self::Product { left, right } | Self::Mix { left, right, .. } => {
                1 + left.min_leaf_depth().min(right.min_leaf_depth())
            }
        }
    }

    /// Total number of nodes, leaves included.
    pub fn node_count(&self) -> usize {
        match self {
            Self::Constant(_) | Self::VariableX | Self::VariableY => 1,
            Self::Sin { child, .. } | Self::Well { child } | Self::FractalNoise { child, .. } => {
                1 + child.node_count()
            }
            Self::Product { left, right } | Self::Mix { left, right, .. } => {
                1 + left.node_count() + right.node_count()
            }
        }
    }

    /// `true` for nodes without children.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Constant(_) | Self::VariableX | Self::VariableY)
    }
}

fn well(v: f64) -> f64 {
    1.0 - 2.0 / (1.0 + v * v)
}

fn smooth_wave(v: f64) -> f64 {
    0.5 * ((5.0 * v).sin() + (5.0 * v).cos())
}

/// Diagnostic rendering: node name, parameters with two decimals, then children.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(c) => write!(f, "Constant({:.2}, {:.2}, {:.2})", c.r, c.g, c.b),
            Self::VariableX => f.write_str("X"),
            Self::VariableY => f.write_str("Y"),
            Self::Sin { phase, freq, child } => {
                write!(f, "Sin(phase={phase:.2}, freq={freq:.2}, {child})")
            }
            Self::Well { child } => write!(f, "Well({child})"),
            Self::FractalNoise { scale, child } => {
                write!(f, "FractalNoise(scale={scale:.2}, {child})")
            }
            Self::Product { left, right } => write!(f, "Product({left}, {right})"),
            Self::Mix {
                weight,
                left,
                right,
            } => write!(f, "Mix(weight={weight:.2}, {left}, {right})"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expr/node.rs"]
mod tests;
