//! Shuffle algorithm for queue randomization
//!
//! Unbiased Fisher-Yates over slot indices, so callers can follow a
//! particular slot (not just a song id) through the permutation.

use rand::seq::SliceRandom;
use rand::Rng;

/// Random permutation of `0..len`
///
/// `order[new_slot] == old_slot`. Every permutation is equally likely.
pub fn shuffled_order<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    order.shuffle(rng);
    order
}

/// Rearrange `items` according to `order`
///
/// `order` must be a permutation of `0..items.len()`.
pub fn apply_order<T>(items: Vec<T>, order: &[usize]) -> Vec<T> {
    debug_assert_eq!(items.len(), order.len());
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    order.iter().filter_map(|&old| slots[old].take()).collect()
}

/// Shuffle a list of items in place
pub fn shuffle_items<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}
