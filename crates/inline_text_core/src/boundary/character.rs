//! Scalar-value, grapheme-cluster, and word boundaries.

use super::{BoundaryRange, TextBoundary};
use crate::text::{
    clamp_to_char_boundary, next_char_boundary, prev_char_boundary, TextAffinity, TextPosition,
    TextRange,
};
use unicode_segmentation::{GraphemeCursor, UnicodeSegmentation};

/// Every scalar value is its own unit.
///
/// Used for obscured text, where grouping into grapheme clusters would leak
/// information about the hidden characters.
#[derive(Clone, Copy, Debug)]
pub struct CodeUnitBoundary<'a> {
    text: &'a str,
}

impl<'a> CodeUnitBoundary<'a> {
    /// # Arguments
    /// - `text`: Snapshot the boundary answers queries against.
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }
}

impl TextBoundary for CodeUnitBoundary<'_> {
    fn leading_boundary_at(&self, position: usize) -> Option<usize> {
        if position > self.text.len() {
            return None;
        }
        Some(clamp_to_char_boundary(self.text, position))
    }

    fn trailing_boundary_at(&self, position: usize) -> Option<usize> {
        if position >= self.text.len() {
            return None;
        }
        next_char_boundary(self.text, position)
    }

    fn text_boundary_at_position(&self, position: TextPosition) -> BoundaryRange {
        let offset = position.offset;
        if offset > self.text.len() {
            return BoundaryRange::NONE;
        }
        match position.affinity {
            TextAffinity::Downstream => BoundaryRange::new(
                self.leading_boundary_at(offset),
                self.trailing_boundary_at(offset),
            ),
            // The unit ending at the caret: [previous scalar, caret).
            TextAffinity::Upstream => {
                let end = clamp_to_char_boundary(self.text, offset);
                match prev_char_boundary(self.text, end) {
                    Some(start) => BoundaryRange::new(Some(start), Some(end)),
                    None => BoundaryRange::new(Some(0), self.trailing_boundary_at(0)),
                }
            }
        }
    }
}

/// Grapheme segmentation capability.
pub trait GraphemeSource {
    /// Cluster containing `offset`, or `None` when `offset >= text.len()`.
    fn grapheme_range_at(&self, text: &str, offset: usize) -> Option<TextRange>;
}

/// Extended grapheme clusters from `unicode-segmentation`.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnicodeGraphemes;

impl GraphemeSource for UnicodeGraphemes {
    fn grapheme_range_at(&self, text: &str, offset: usize) -> Option<TextRange> {
        if offset >= text.len() {
            return None;
        }
        let offset = clamp_to_char_boundary(text, offset);
        let mut cursor = GraphemeCursor::new(offset, text.len(), true);
        let start = if cursor.is_boundary(text, 0).ok()? {
            offset
        } else {
            cursor.prev_boundary(text, 0).ok()??
        };
        let mut cursor = GraphemeCursor::new(start, text.len(), true);
        let end = cursor.next_boundary(text, 0).ok()??;
        Some(TextRange { start, end })
    }
}

/// User-perceived characters (grapheme clusters).
#[derive(Clone, Copy, Debug)]
pub struct CharacterBoundary<'a, G = UnicodeGraphemes> {
    text: &'a str,
    graphemes: G,
}

impl<'a> CharacterBoundary<'a> {
    /// Grapheme boundaries backed by [`UnicodeGraphemes`].
    ///
    /// # Arguments
    /// - `text`: Snapshot the boundary answers queries against.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            graphemes: UnicodeGraphemes,
        }
    }
}

impl<'a, G: GraphemeSource> CharacterBoundary<'a, G> {
    /// Grapheme boundaries from a custom segmenter.
    ///
    /// # Arguments
    /// - `text`: Snapshot the boundary answers queries against.
    /// - `graphemes`: Segmenter deciding where clusters start and end.
    pub fn with_source(text: &'a str, graphemes: G) -> Self {
        Self { text, graphemes }
    }
}

impl<G: GraphemeSource> TextBoundary for CharacterBoundary<'_, G> {
    fn leading_boundary_at(&self, position: usize) -> Option<usize> {
        let len = self.text.len();
        if position > len {
            return None;
        }
        if position == len {
            return Some(len);
        }
        self.graphemes
            .grapheme_range_at(self.text, position)
            .map(|range| range.start)
    }

    fn trailing_boundary_at(&self, position: usize) -> Option<usize> {
        self.graphemes
            .grapheme_range_at(self.text, position)
            .map(|range| range.end)
    }
}

/// Unicode word-bound segments (words, runs of whitespace, punctuation).
#[derive(Clone, Copy, Debug)]
pub struct WordBoundary<'a> {
    text: &'a str,
}

impl<'a> WordBoundary<'a> {
    /// # Arguments
    /// - `text`: Snapshot the boundary answers queries against.
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    fn segment_at(&self, position: usize) -> Option<TextRange> {
        self.text
            .split_word_bound_indices()
            .map(|(start, segment)| TextRange {
                start,
                end: start + segment.len(),
            })
            .find(|range| range.start <= position && position < range.end)
    }
}

impl TextBoundary for WordBoundary<'_> {
    fn leading_boundary_at(&self, position: usize) -> Option<usize> {
        let len = self.text.len();
        if position > len {
            return None;
        }
        if position == len {
            return Some(len);
        }
        self.segment_at(position).map(|range| range.start)
    }

    fn trailing_boundary_at(&self, position: usize) -> Option<usize> {
        if position >= self.text.len() {
            return None;
        }
        self.segment_at(position).map(|range| range.end)
    }
}
