//! Virtual gap in the stored offset space.
//!
//! Stored offsets live in an "internal" space shaped like a gap buffer's
//! physical indices: external offsets at or after `start` are stored shifted
//! by `len`. Insertions at the gap consume it and deletions widen it, so
//! repeated edits at one site never touch the stored offsets.

/// Position and width of the virtual gap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OffsetGap {
    /// External offset where the gap sits.
    pub start: usize,
    /// Width of the gap in internal units.
    pub len: usize,
}

impl OffsetGap {
    /// # Arguments
    /// - `start`: External offset where the gap sits.
    /// - `len`: Gap width in internal units.
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Internal end of the gap (first internal offset after it).
    pub const fn end(&self) -> usize {
        self.start + self.len
    }

    /// Map an external offset into storage. Offsets exactly at `start` shift
    /// too: text inserted at the gap lands before them.
    ///
    /// # Returns
    /// `external`, shifted by `len` when at or after the gap.
    pub const fn to_internal(&self, external: usize) -> usize {
        if external >= self.start {
            external + self.len
        } else {
            external
        }
    }

    /// Map a stored offset back out. Offsets swallowed by the gap (their text
    /// was deleted) collapse onto `start`.
    ///
    /// # Returns
    /// The external offset `internal` stands for.
    pub const fn to_external(&self, internal: usize) -> usize {
        if internal >= self.end() {
            internal - self.len
        } else if internal > self.start {
            self.start
        } else {
            internal
        }
    }

    /// Same-width gap relocated to external offset `start`.
    pub const fn moved_to(&self, start: usize) -> Self {
        Self {
            start,
            len: self.len,
        }
    }

    /// Re-encode an internal offset from this gap into `other`.
    ///
    /// # Arguments
    /// - `other`: Gap the offset is stored against afterwards.
    /// - `internal`: Offset stored against `self`.
    ///
    /// # Returns
    /// The same external position, stored against `other`.
    pub const fn reencode(&self, other: &OffsetGap, internal: usize) -> usize {
        other.to_internal(self.to_external(internal))
    }
}
