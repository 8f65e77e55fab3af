//! Answer-order randomization.

use rand::Rng;
use rand::seq::SliceRandom;

/// Returns `items` in a uniformly random order.
///
/// Uses `rand`'s in-place Fisher–Yates shuffle, so every one of the `n!`
/// orderings is equally likely given a uniform source. The random source is
/// injected so callers can pass a seeded RNG for deterministic runs.
#[must_use]
pub fn shuffled<T, R>(mut items: Vec<T>, rng: &mut R) -> Vec<T>
where
    R: Rng + ?Sized,
{
    items.shuffle(rng);
    items
}
