//! randart turns a seed string into a procedurally generated image.
//!
//! A seed is hashed to a 32-bit value, which seeds a random generator. The generator builds
//! a random expression tree over `(x, y)`, the tree is evaluated at every pixel in parallel,
//! and a quality gate rebuilds the tree (a bounded number of times) when the result is too
//! flat.
//!
//! # Pipeline overview
//!
//! 1. **Seed**: `&str -> u32` via [`seed_hash`], then `StdRng::seed_from_u64`
//! 2. **Build**: [`build_tree`] draws an [`Expr`] between a minimum and maximum depth
//! 3. **Rasterize**: [`rasterize`] evaluates the tree over row bands on a fresh worker pool
//! 4. **Gate**: [`diversity`] scores the image; [`generate`] retries or accepts
//!
//! Trees are immutable after construction and evaluation is pure, so pixels are computed
//! without locks. The same seed with a freshly seeded generator always yields the same
//! image.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod expr;
mod foundation;
mod render;

pub use expr::build::{LEAF_PROBABILITY, build_tree};
pub use expr::node::Expr;
pub use foundation::core::Rgb;
pub use foundation::error::{RandArtError, RandArtResult};
pub use foundation::math::seed_hash;
pub use render::pipeline::{
    Artwork, GenerateOpts, generate, generate_with_builder, generate_with_opts,
};
pub use render::quality::{GateDecision, diversity, gate};
pub use render::raster::{
    CancelToken, ImageRGBA, available_workers, rasterize, row_bands,
};
