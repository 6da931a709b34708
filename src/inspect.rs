//! Boundary inspection for the `boundaries` command.

use inline_text_core::boundary::{HardLineLayout, LineMetrics, MonospaceWrapLayout};
use inline_text_core::editing::{boundary_for, EditContext, Granularity};
use inline_text_core::text::clamp_to_char_boundary;
use inline_text_core::{TextBoundary, TextRange};
use serde::Serialize;
use std::fmt;

const GRANULARITIES: [Granularity; 5] = [
    Granularity::Character,
    Granularity::Word,
    Granularity::Line,
    Granularity::Paragraph,
    Granularity::Document,
];

/// Enclosing unit of one granularity at the inspected offset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BoundaryReport {
    pub granularity: Granularity,
    /// `None` when the offset has no enclosing unit of this kind.
    pub range: Option<TextRange>,
    pub slice: Option<String>,
}

impl fmt::Display for BoundaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.granularity {
            Granularity::Character => "character",
            Granularity::Word => "word",
            Granularity::Line => "line",
            Granularity::Paragraph => "paragraph",
            Granularity::Document => "document",
        };
        match (&self.range, &self.slice) {
            (Some(range), Some(slice)) => {
                write!(f, "{:<10} [{}, {}) {:?}", name, range.start, range.end, slice)
            }
            _ => write!(f, "{:<10} none", name),
        }
    }
}

/// Options for [`boundaries_at`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InspectOptions {
    /// Soft-wrap column limit; `None` uses hard line breaks only.
    pub wrap_width: Option<usize>,
    pub obscure_text: bool,
}

/// Report every granularity's unit around `offset`.
///
/// Offsets inside a scalar value are moved back to its start; offsets past
/// the end are kept so the edge rule shows up in the report.
pub fn boundaries_at(text: &str, offset: usize, options: InspectOptions) -> Vec<BoundaryReport> {
    let offset = if offset <= text.len() {
        clamp_to_char_boundary(text, offset)
    } else {
        offset
    };
    let wrapped;
    let layout: &dyn LineMetrics = match options.wrap_width {
        Some(width) => {
            wrapped = MonospaceWrapLayout::new(width);
            &wrapped
        }
        None => &HardLineLayout,
    };
    let context = EditContext::new(layout).obscured(options.obscure_text);

    GRANULARITIES
        .iter()
        .map(|&granularity| {
            let range = boundary_for(text, granularity, &context)
                .text_boundary_at(offset)
                .as_range();
            BoundaryReport {
                granularity,
                range,
                slice: range.map(|range| text[range.as_std()].to_string()),
            }
        })
        .collect()
}
