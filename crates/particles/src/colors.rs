//! Palette assignment.

use morphfield_core::{Palette, RandomSource, Srgb};

/// Gives every slot an independent, uniformly chosen palette entry.
pub fn assign(colors: &mut [Srgb], palette: &Palette, rng: &mut dyn RandomSource) {
    let n = palette.len();
    for slot in colors.iter_mut() {
        *slot = palette.get(next_index(rng, n));
    }
}

/// Uniform index in `[0, n)`.
fn next_index(rng: &mut dyn RandomSource, n: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    ((rng.next_unit() * n as f32) as usize).min(n - 1)
}
