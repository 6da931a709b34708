//! Boundaries composed from other boundaries.

use super::TextBoundary;
use crate::text::Direction;

/// Leading edges from one boundary, trailing edges from another.
///
/// Typical use: a word-sized trailing edge paired with a grapheme-sized
/// leading edge, so a deletion never leaves half a cluster behind.
#[derive(Clone, Copy, Debug)]
pub struct MixedBoundary<L, T> {
    leading: L,
    trailing: T,
}

impl<L: TextBoundary, T: TextBoundary> MixedBoundary<L, T> {
    /// # Arguments
    /// - `leading`: Answers every leading-edge query.
    /// - `trailing`: Answers every trailing-edge query.
    pub fn new(leading: L, trailing: T) -> Self {
        Self { leading, trailing }
    }
}

impl<L: TextBoundary, T: TextBoundary> TextBoundary for MixedBoundary<L, T> {
    fn leading_boundary_at(&self, position: usize) -> Option<usize> {
        self.leading.leading_boundary_at(position)
    }

    fn trailing_boundary_at(&self, position: usize) -> Option<usize> {
        self.trailing.trailing_boundary_at(position)
    }
}

/// Pushes one edge of an inner boundary strictly past the query position.
///
/// `Forward` makes the trailing edge the first inner boundary strictly after
/// the position; `Backward` makes the leading edge the last inner boundary
/// strictly before it. The other edge passes through unchanged. This is what
/// "move to the next word" needs when the caret already sits on a word edge.
#[derive(Clone, Copy, Debug)]
pub struct PushBoundary<B> {
    inner: B,
    direction: Direction,
}

impl<B: TextBoundary> PushBoundary<B> {
    /// # Arguments
    /// - `inner`: Boundary whose edges are pushed.
    /// - `direction`: Which edge is pushed past the query position.
    pub fn new(inner: B, direction: Direction) -> Self {
        Self { inner, direction }
    }

    /// Shorthand for [`PushBoundary::new`] with [`Direction::Forward`].
    pub fn forward(inner: B) -> Self {
        Self::new(inner, Direction::Forward)
    }

    /// Shorthand for [`PushBoundary::new`] with [`Direction::Backward`].
    pub fn backward(inner: B) -> Self {
        Self::new(inner, Direction::Backward)
    }
}

impl<B: TextBoundary> TextBoundary for PushBoundary<B> {
    fn leading_boundary_at(&self, position: usize) -> Option<usize> {
        if self.direction == Direction::Forward {
            return self.inner.leading_boundary_at(position);
        }
        let mut at = position;
        loop {
            match self.inner.leading_boundary_at(at)? {
                found if found < position => return Some(found),
                _ => at = at.checked_sub(1)?,
            }
        }
    }

    fn trailing_boundary_at(&self, position: usize) -> Option<usize> {
        if self.direction == Direction::Backward {
            return self.inner.trailing_boundary_at(position);
        }
        // Inner boundaries return `None` once `at` reaches the end, which
        // bounds the loop.
        let mut at = position;
        loop {
            match self.inner.trailing_boundary_at(at)? {
                found if found > position => return Some(found),
                _ => at += 1,
            }
        }
    }
}
