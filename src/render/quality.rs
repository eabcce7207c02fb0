use crate::render::raster::ImageRGBA;

/// Joint standard deviation of the 8-bit R, G and B channels.
///
/// `sqrt(Var(R) + Var(G) + Var(B))` with population variances over all pixels. Alpha is
/// ignored. Used only as a cheap "is this image flat" signal by the quality gate.
pub fn diversity(img: &ImageRGBA) -> f64 {
    let pixels = img.data.len() / 4;
    if pixels == 0 {
        return 0.0;
    }

    let mut sum = [0.0f64; 3];
    let mut sum_sq = [0.0f64; 3];
    for px in img.data.chunks_exact(4) {
        for c in 0..3 {
            let v = f64::from(px[c]);
            sum[c] += v;
            sum_sq[c] += v * v;
        }
    }

    let n = pixels as f64;
    let variance: f64 = (0..3)
        .map(|c| {
            let mean = sum[c] / n;
            (sum_sq[c] / n - mean * mean).max(0.0)
        })
        .sum();
    variance.sqrt()
}

/// Outcome of the quality gate for one raster pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDecision {
    /// Diversity exceeded the acceptance threshold.
    Accept,
    /// Too flat; another attempt is allowed.
    Retry,
    /// Too flat and out of attempts; the image is kept anyway.
    Exhausted,
}

/// Decide what to do with a pass given its diversity and how many attempts have been used.
pub fn gate(metric: f64, accept_threshold: f64, attempt: u32, max_attempts: u32) -> GateDecision {
    if metric > accept_threshold {
        GateDecision::Accept
    } else if attempt >= max_attempts {
        GateDecision::Exhausted
    } else {
        GateDecision::Retry
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/quality.rs"]
mod tests;
