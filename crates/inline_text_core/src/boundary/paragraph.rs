//! Paragraph and whole-document boundaries.

use super::TextBoundary;
use crate::text::TextRange;

fn is_line_terminator(byte: u8) -> bool {
    byte == b'\n' || byte == b'\r'
}

/// Content range of the paragraph holding `offset`, excluding its terminator.
///
/// Terminators are LF, CR, and CRLF (one terminator). An offset sitting on a
/// terminator belongs to the paragraph before it, and an offset between the CR
/// and LF of a CRLF pair is treated as sitting on the CR. `offset` is clamped
/// to `text.len()`.
///
/// Linear scan in both directions from `offset`.
///
/// # Arguments
/// - `text`: The whole document.
/// - `offset`: Byte offset to resolve.
///
/// # Returns
/// The paragraph's content range; empty for an empty paragraph.
pub fn paragraph_range_at(text: &str, offset: usize) -> TextRange {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut at = offset.min(len);
    if at > 0 && at < len && bytes[at] == b'\n' && bytes[at - 1] == b'\r' {
        at -= 1;
    }
    let start = bytes[..at]
        .iter()
        .rposition(|&b| is_line_terminator(b))
        .map_or(0, |idx| idx + 1);
    let end = bytes[at..]
        .iter()
        .position(|&b| is_line_terminator(b))
        .map_or(len, |idx| at + idx);
    TextRange { start, end }
}

/// Runs of text between hard line terminators.
#[derive(Clone, Copy, Debug)]
pub struct ParagraphBoundary<'a> {
    text: &'a str,
}

impl<'a> ParagraphBoundary<'a> {
    /// # Arguments
    /// - `text`: Snapshot the boundary answers queries against.
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }
}

impl TextBoundary for ParagraphBoundary<'_> {
    fn leading_boundary_at(&self, position: usize) -> Option<usize> {
        if position > self.text.len() {
            return None;
        }
        Some(paragraph_range_at(self.text, position).start)
    }

    fn trailing_boundary_at(&self, position: usize) -> Option<usize> {
        if position >= self.text.len() {
            return None;
        }
        Some(paragraph_range_at(self.text, position).end)
    }
}

/// The whole document as a single unit.
#[derive(Clone, Copy, Debug)]
pub struct DocumentBoundary<'a> {
    text: &'a str,
}

impl<'a> DocumentBoundary<'a> {
    /// # Arguments
    /// - `text`: Snapshot the boundary answers queries against.
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }
}

impl TextBoundary for DocumentBoundary<'_> {
    fn leading_boundary_at(&self, position: usize) -> Option<usize> {
        (position <= self.text.len()).then_some(0)
    }

    fn trailing_boundary_at(&self, position: usize) -> Option<usize> {
        (position < self.text.len()).then_some(self.text.len())
    }
}
