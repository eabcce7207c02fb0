use std::f64::consts::TAU;

use rand::Rng;

use crate::{expr::node::Expr, foundation::core::Rgb};

/// Probability of stopping early once the minimum depth has been reached.
pub const LEAF_PROBABILITY: f64 = 0.2;

/// Build a random expression tree.
///
/// A leaf is produced when the `max_depth` budget is exhausted, or when `min_depth` has been
/// reached and a Bernoulli([`LEAF_PROBABILITY`]) draw succeeds. Otherwise an operator is
/// chosen uniformly from `Sin`, `Mix`, `Product` and `FractalNoise`, and its children are
/// built with both bounds decremented.
///
/// The generator is only advanced, never reseeded, so the tree is a pure function of the
/// bounds and the generator state on entry.
pub fn build_tree<R: Rng + ?Sized>(min_depth: u32, max_depth: u32, rng: &mut R) -> Expr {
    if max_depth == 0 || (min_depth == 0 && rng.gen_bool(LEAF_PROBABILITY)) {
        return random_leaf(rng);
    }

    let min_depth = min_depth.saturating_sub(1);
    let max_depth = max_depth - 1;
    match rng.gen_range(0..4u8) {
        0 => {
            let phase = rng.gen_range(0.0..TAU);
            let freq = rng.gen_range(0.5..3.5);
            Expr::Sin {
                phase,
                freq,
                child: Box::new(build_tree(min_depth, max_depth, rng)),
            }
        }
        1 => {
            let weight = rng.r#gen::<f64>();
            Expr::Mix {
                weight,
                left: Box::new(build_tree(min_depth, max_depth, rng)),
                right: Box::new(build_tree(min_depth, max_depth, rng)),
            }
        }
        2 => Expr::Product {
            left: Box::new(build_tree(min_depth, max_depth, rng)),
            right: Box::new(build_tree(min_depth, max_depth, rng)),
        },
        _ => {
            let scale = rng.gen_range(0.5..2.5);
            Expr::FractalNoise {
                scale,
                child: Box::new(build_tree(min_depth, max_depth, rng)),
            }
        }
    }
}

fn random_leaf<R: Rng + ?Sized>(rng: &mut R) -> Expr {
    match rng.gen_range(0..3u8) {
        0 => Expr::VariableX,
        1 => Expr::VariableY,
        _ => Expr::Constant(Rgb::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expr/build.rs"]
mod tests;
