use rand::{SeedableRng, rngs::StdRng};

use crate::{
    expr::{build::build_tree, node::Expr},
    foundation::error::{RandArtError, RandArtResult},
    foundation::math::seed_hash,
    render::quality::{GateDecision, diversity, gate},
    render::raster::{CancelToken, ImageRGBA, rasterize_with_cancel},
};

/// Generation options.
///
/// Defaults reproduce the stock generator: trees between depth 10 and 30, up to three
/// attempts, acceptance above a diversity of 30 and a low-diversity warning at or below 50.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GenerateOpts {
    /// Minimum root-to-leaf depth before early leaves are allowed.
    pub min_depth: u32,
    /// Hard depth budget for every root-to-leaf path.
    pub max_depth: u32,
    /// Upper bound on tree constructions per call.
    pub max_attempts: u32,
    /// An image is accepted once its diversity is strictly above this.
    pub accept_threshold: f64,
    /// The final image is flagged low-diversity when its diversity is at or below this.
    pub warn_threshold: f64,
    /// Raster workers per pass; `None` uses the available hardware parallelism.
    pub threads: Option<usize>,
}

impl Default for GenerateOpts {
    fn default() -> Self {
        Self {
            min_depth: 10,
            max_depth: 30,
            max_attempts: 3,
            accept_threshold: 30.0,
            warn_threshold: 50.0,
            threads: None,
        }
    }
}

impl GenerateOpts {
    /// Reject option combinations the generator cannot honor.
    pub fn validate(&self) -> RandArtResult<()> {
        if self.min_depth > self.max_depth {
            return Err(RandArtError::validation(format!(
                "min_depth ({}) must be <= max_depth ({})",
                self.min_depth, self.max_depth
            )));
        }
        if self.max_attempts == 0 {
            return Err(RandArtError::validation("max_attempts must be >= 1"));
        }
        if self.threads == Some(0) {
            return Err(RandArtError::validation("threads must be >= 1 when set"));
        }
        if !self.accept_threshold.is_finite() || !self.warn_threshold.is_finite() {
            return Err(RandArtError::validation("diversity thresholds must be finite"));
        }
        Ok(())
    }
}

/// The accepted image together with how it was obtained.
#[derive(Clone, Debug)]
pub struct Artwork {
    /// Final RGBA8 pixels, `size`×`size`.
    pub image: ImageRGBA,
    /// Diversity of `image` (see [`diversity`](crate::diversity)).
    pub diversity: f64,
    /// Tree constructions used, `1..=max_attempts`.
    pub attempts: u32,
    /// Set when the final diversity is at or below the warning threshold.
    pub low_diversity: bool,
    /// Diagnostic rendering of the tree that produced `image`.
    pub tree: String,
}

/// Generate a `size`×`size` image for `seed` with default options.
pub fn generate(seed: &str, size: u32) -> RandArtResult<Artwork> {
    generate_with_opts(seed, size, &GenerateOpts::default(), None)
}

/// Generate with explicit options and an optional cancellation token.
pub fn generate_with_opts(
    seed: &str,
    size: u32,
    opts: &GenerateOpts,
    cancel: Option<&CancelToken>,
) -> RandArtResult<Artwork> {
    generate_with_builder(seed, size, opts, cancel, |rng, opts| {
        build_tree(opts.min_depth, opts.max_depth, rng)
    })
}

/// Generate using `build` as the tree source.
///
/// The generator is seeded once from [`seed_hash`](crate::seed_hash) and handed to `build` on
/// every attempt without reseeding. Each attempt rasterizes a fresh tree; the first one whose
/// diversity beats `accept_threshold` wins, otherwise the last attempt is kept.
#[tracing::instrument(skip(opts, cancel, build), fields(hash = seed_hash(seed)))]
pub fn generate_with_builder<F>(
    seed: &str,
    size: u32,
    opts: &GenerateOpts,
    cancel: Option<&CancelToken>,
    mut build: F,
) -> RandArtResult<Artwork>
where
    F: FnMut(&mut StdRng, &GenerateOpts) -> Expr,
{
    if size == 0 {
        return Err(RandArtError::validation("image size must be >= 1"));
    }
    opts.validate()?;

    let mut rng = StdRng::seed_from_u64(u64::from(seed_hash(seed)));
    let mut attempt = 0u32;
    let (image, metric, tree) = loop {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(RandArtError::Cancelled);
        }
        attempt += 1;

        let tree = build(&mut rng, opts);
        tracing::debug!(
            attempt,
            depth = tree.depth(),
            nodes = tree.node_count(),
            "built expression tree"
        );
        tracing::trace!(%tree, "expression tree");

        let image = rasterize_with_cancel(&tree, size, opts.threads, cancel)?;
        let metric = diversity(&image);

        match gate(metric, opts.accept_threshold, attempt, opts.max_attempts) {
            GateDecision::Accept => {
                tracing::info!(attempt, diversity = metric, "image accepted");
                break (image, metric, tree);
            }
            GateDecision::Exhausted => break (image, metric, tree),
            GateDecision::Retry => {
                tracing::debug!(attempt, diversity = metric, "low diversity, rebuilding tree");
            }
        }
    };

    let low_diversity = metric <= opts.warn_threshold;
    if low_diversity {
        tracing::warn!(
            attempts = attempt,
            diversity = metric,
            "generated image still has low diversity"
        );
    }

    Ok(Artwork {
        image,
        diversity: metric,
        attempts: attempt,
        low_diversity,
        tree: tree.to_string(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
