/// 32-bit FNV hasher used to turn seed strings into generator seeds.
///
/// Each byte is folded as `h = (h * PRIME) ^ byte` with wrapping arithmetic.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv32(u32);

impl Fnv32 {
    pub(crate) const OFFSET_BASIS: u32 = 2_166_136_261;
    pub(crate) const PRIME: u32 = 16_777_619;

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h = h.wrapping_mul(Self::PRIME) ^ u32::from(b);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u32 {
        self.0
    }
}

/// Hash a seed string to the 32-bit value the random source is seeded from.
///
/// Stable across runs and platforms; operates on the UTF-8 bytes of `seed`.
pub fn seed_hash(seed: &str) -> u32 {
    let mut h = Fnv32::new_default();
    h.write_bytes(seed.as_bytes());
    h.finish()
}

/// Saturate a channel value into `[-1, 1]` and quantize it to a byte as `round(128 + c*127)`.
///
/// NaN maps to the midpoint.
pub(crate) fn quantize_channel(c: f64) -> u8 {
    let c = if c.is_nan() { 0.0 } else { c.clamp(-1.0, 1.0) };
    (128.0 + c * 127.0).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
