//! Visual-line boundaries backed by a pluggable line layout.

use super::paragraph::paragraph_range_at;
use super::{BoundaryRange, TextBoundary};
use crate::text::{clamp_to_char_boundary, TextAffinity, TextPosition, TextRange};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Line layout capability.
pub trait LineMetrics {
    /// Content range of the visual line holding `position`, without any
    /// trailing hard line break. A position on a hard break resolves to the
    /// line before it; affinity picks the side of a soft wrap.
    ///
    /// # Returns
    /// `None` when `position` lies past the end of `text`.
    fn line_range_at(&self, text: &str, position: TextPosition) -> Option<TextRange>;

    /// Offset where the visual line holding `position` starts.
    fn line_start(&self, text: &str, position: TextPosition) -> Option<usize> {
        self.line_range_at(text, position).map(|range| range.start)
    }

    /// Offset where the visual line holding `position` ends, before any break.
    fn line_end(&self, text: &str, position: TextPosition) -> Option<usize> {
        self.line_range_at(text, position).map(|range| range.end)
    }
}

/// Layout with no soft wrapping: visual lines are hard lines.
#[derive(Clone, Copy, Debug, Default)]
pub struct HardLineLayout;

impl LineMetrics for HardLineLayout {
    fn line_range_at(&self, text: &str, position: TextPosition) -> Option<TextRange> {
        if position.offset > text.len() {
            return None;
        }
        Some(paragraph_range_at(text, position.offset))
    }
}

/// Fixed-pitch layout that soft-wraps hard lines at a display-width limit.
///
/// Widths come from `unicode-width`; a grapheme cluster is never split across
/// rows and a row always holds at least one cluster. `max_columns == 0`
/// disables wrapping.
#[derive(Clone, Copy, Debug)]
pub struct MonospaceWrapLayout {
    pub max_columns: usize,
}

impl MonospaceWrapLayout {
    /// # Arguments
    /// - `max_columns`: Display columns per row; `0` disables wrapping.
    pub fn new(max_columns: usize) -> Self {
        Self { max_columns }
    }

    /// Visual rows of the hard line `hard`.
    ///
    /// # Arguments
    /// - `text`: The whole document.
    /// - `hard`: Content range of one hard line, without its terminator.
    ///
    /// # Returns
    /// Consecutive rows covering `hard`; a single empty row for an empty line.
    pub fn rows(&self, text: &str, hard: TextRange) -> Vec<TextRange> {
        let mut rows = Vec::new();
        let mut row_start = hard.start;
        let mut width = 0usize;
        for (idx, grapheme) in text[hard.as_std()].grapheme_indices(true) {
            let at = hard.start + idx;
            let grapheme_width = grapheme.width();
            if at > row_start && width + grapheme_width > self.max_columns {
                rows.push(TextRange {
                    start: row_start,
                    end: at,
                });
                row_start = at;
                width = 0;
            }
            width += grapheme_width;
        }
        rows.push(TextRange {
            start: row_start,
            end: hard.end,
        });
        rows
    }
}

impl LineMetrics for MonospaceWrapLayout {
    fn line_range_at(&self, text: &str, position: TextPosition) -> Option<TextRange> {
        if position.offset > text.len() {
            return None;
        }
        let offset = clamp_to_char_boundary(text, position.offset);
        let hard = paragraph_range_at(text, offset);
        if self.max_columns == 0 {
            return Some(hard);
        }
        let rows = self.rows(text, hard);
        let found = match position.affinity {
            TextAffinity::Downstream => rows
                .iter()
                .find(|row| row.start <= offset && offset < row.end)
                .or_else(|| rows.last()),
            TextAffinity::Upstream => rows
                .iter()
                .find(|row| row.start < offset && offset <= row.end)
                .or_else(|| rows.first()),
        };
        found.copied()
    }
}

/// Visual lines as reported by a [`LineMetrics`] layout.
#[derive(Clone, Copy, Debug)]
pub struct LineBoundary<'a, L: ?Sized> {
    text: &'a str,
    layout: &'a L,
}

impl<'a, L: LineMetrics + ?Sized> LineBoundary<'a, L> {
    /// # Arguments
    /// - `text`: Snapshot the boundary answers queries against.
    /// - `layout`: Decides where visual lines break.
    pub fn new(text: &'a str, layout: &'a L) -> Self {
        Self { text, layout }
    }
}

impl<L: LineMetrics + ?Sized> TextBoundary for LineBoundary<'_, L> {
    fn leading_boundary_at(&self, position: usize) -> Option<usize> {
        self.text_boundary_at_position(TextPosition::downstream(position))
            .start
    }

    fn trailing_boundary_at(&self, position: usize) -> Option<usize> {
        self.text_boundary_at_position(TextPosition::downstream(position))
            .end
    }

    fn text_boundary_at(&self, position: usize) -> BoundaryRange {
        self.text_boundary_at_position(TextPosition::downstream(position))
    }

    fn text_boundary_at_position(&self, position: TextPosition) -> BoundaryRange {
        let len = self.text.len();
        if position.offset > len {
            return BoundaryRange::NONE;
        }
        let Some(line) = self.layout.line_range_at(self.text, position) else {
            return BoundaryRange::NONE;
        };
        BoundaryRange::new(Some(line.start), (position.offset < len).then_some(line.end))
    }
}
