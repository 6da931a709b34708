//! Index arithmetic for an implicit perfect binary tree laid over an array.
//!
//! Node `i` sits at level `i.trailing_ones()`: even indices are leaves, and a
//! node at level `k` covers `i - (2^k - 1) ..= i + (2^k - 1)`. In-order
//! traversal visits indices in ascending order, so element `i` of a sorted
//! array is also node `i` of the tree. Nodes past the element count still
//! exist as routing nodes and only cache subtree values.

/// Largest power of two `<= n`; `n` must be non-zero.
pub fn highest_power_of_two_at_most(n: usize) -> usize {
    debug_assert!(n > 0);
    1 << (usize::BITS - 1 - n.leading_zeros())
}

/// Level of node `index` (0 for leaves).
pub fn level(index: usize) -> u32 {
    index.trailing_ones()
}

fn half_span(index: usize) -> Option<usize> {
    match level(index) {
        0 => None,
        level => Some(1 << (level - 1)),
    }
}

/// # Returns
/// Left child of node `index`, or `None` for a leaf.
pub fn left_child(index: usize) -> Option<usize> {
    half_span(index).map(|half| index - half)
}

/// # Returns
/// Right child of node `index`, or `None` for a leaf. The child may lie past
/// the element count.
pub fn right_child(index: usize) -> Option<usize> {
    half_span(index).map(|half| index + half)
}

/// Root covering `count` elements.
///
/// # Returns
/// `None` for an empty array.
pub fn root(count: usize) -> Option<usize> {
    (count > 0).then(|| highest_power_of_two_at_most(count) - 1)
}

/// Number of levels in the tree covering `count` elements.
pub fn height(count: usize) -> u32 {
    root(count).map_or(0, |root| level(root) + 1)
}

/// Number of tree slots needed for `count` elements.
///
/// # Returns
/// `2^height - 1`, or 0 for an empty array.
pub fn capacity(count: usize) -> usize {
    match height(count) {
        0 => 0,
        height => (1 << height) - 1,
    }
}
