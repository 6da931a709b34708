//! Offsets, ranges, positions, and selections over UTF-8 text snapshots.
//!
//! Every offset is a byte offset into a `&str`. Helpers in this module keep
//! offsets on scalar-value boundaries so slicing never panics.

use crate::error::TextRangeError;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Half-open range `[start, end)` of byte offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    /// Build a range, rejecting `start > end`.
    ///
    /// # Arguments
    /// - `start`: Inclusive start offset.
    /// - `end`: Exclusive end offset.
    ///
    /// # Returns
    /// The range `[start, end)`.
    ///
    /// # Errors
    /// Returns [`TextRangeError::Inverted`] when `start > end`.
    pub fn new(start: usize, end: usize) -> Result<Self, TextRangeError> {
        if start > end {
            return Err(TextRangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Empty range sitting at `offset`.
    pub const fn collapsed(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Range spanning two offsets given in either order.
    ///
    /// # Returns
    /// `[min(a, b), max(a, b))`.
    pub fn spanning(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// # Returns
    /// Number of bytes covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// # Returns
    /// `true` when the range covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when `offset` lies in `[start, end]` (both edges inclusive).
    pub fn encloses(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// Half-open overlap test; an empty range overlaps ranges strictly around it.
    pub fn overlaps(&self, other: &TextRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// # Returns
    /// The same range as `start..end`, for slicing.
    pub fn as_std(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for TextRange {
    fn from(value: Range<usize>) -> Self {
        Self::spanning(value.start, value.end)
    }
}

/// Which side of an ambiguous offset a caret belongs to.
///
/// At a soft line wrap the same offset is both the end of one visual line
/// (`Upstream`) and the start of the next (`Downstream`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAffinity {
    Upstream,
    #[default]
    Downstream,
}

/// Caret location: offset plus affinity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextPosition {
    pub offset: usize,
    pub affinity: TextAffinity,
}

impl TextPosition {
    /// Caret at `offset` belonging to the unit that starts there.
    pub const fn downstream(offset: usize) -> Self {
        Self {
            offset,
            affinity: TextAffinity::Downstream,
        }
    }

    /// Caret at `offset` belonging to the unit that ends there.
    pub const fn upstream(offset: usize) -> Self {
        Self {
            offset,
            affinity: TextAffinity::Upstream,
        }
    }
}

/// Direction of travel through the text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Backward,
    Forward,
}

/// Selection with a fixed `base` and a moving `extent`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSelection {
    pub base: usize,
    pub extent: usize,
    #[serde(default)]
    pub affinity: TextAffinity,
}

impl TextSelection {
    /// Caret at `offset` with no selected text.
    pub const fn collapsed(offset: usize) -> Self {
        Self {
            base: offset,
            extent: offset,
            affinity: TextAffinity::Downstream,
        }
    }

    /// # Arguments
    /// - `base`: End that stays put while extending.
    /// - `extent`: End that moves; may precede `base`.
    pub const fn new(base: usize, extent: usize) -> Self {
        Self {
            base,
            extent,
            affinity: TextAffinity::Downstream,
        }
    }

    /// # Returns
    /// `true` when nothing is selected.
    pub fn is_collapsed(&self) -> bool {
        self.base == self.extent
    }

    /// Normalized range covered by the selection.
    pub fn range(&self) -> TextRange {
        TextRange::spanning(self.base, self.extent)
    }

    /// # Returns
    /// The moving end as a caret, carrying the selection's affinity.
    pub fn extent_position(&self) -> TextPosition {
        TextPosition {
            offset: self.extent,
            affinity: self.affinity,
        }
    }

    /// Clamp both ends into `text` and onto scalar-value boundaries.
    pub fn clamped(&self, text: &str) -> Self {
        Self {
            base: clamp_to_char_boundary(text, self.base),
            extent: clamp_to_char_boundary(text, self.extent),
            affinity: self.affinity,
        }
    }
}

/// Clamp `offset` into `text`, moving backwards onto a scalar-value boundary.
///
/// # Arguments
/// - `text`: Text the offset indexes into.
/// - `offset`: Any byte offset, possibly out of range.
///
/// # Returns
/// The largest char boundary `<= min(offset, text.len())`.
pub fn clamp_to_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while offset > 0 && !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Offset of the scalar value after the one starting at or containing `offset`.
///
/// # Returns
/// `None` at or past the end of `text`.
pub fn next_char_boundary(text: &str, offset: usize) -> Option<usize> {
    let offset = clamp_to_char_boundary(text, offset);
    let ch = text[offset..].chars().next()?;
    Some(offset + ch.len_utf8())
}

/// Offset of the scalar value strictly before `offset`.
///
/// # Returns
/// `None` at the start of `text`.
pub fn prev_char_boundary(text: &str, offset: usize) -> Option<usize> {
    let bounded = offset.min(text.len());
    let clamped = clamp_to_char_boundary(text, bounded);
    if clamped != bounded {
        // `offset` was inside a scalar value; its start is strictly before it.
        return Some(clamped);
    }
    text[..clamped].char_indices().next_back().map(|(idx, _)| idx)
}
