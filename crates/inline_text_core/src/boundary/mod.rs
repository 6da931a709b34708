//! Text-boundary engine: maps an offset to the enclosing logical unit.
//!
//! A boundary is a pure function of an immutable text snapshot. Concrete
//! boundaries borrow the snapshot and are built fresh for each query; none of
//! them is kept across edits.
//!
//! Edge rule shared by every concrete boundary in this module:
//! - `leading_boundary_at(p)` is `None` when `p > text.len()`;
//! - `trailing_boundary_at(p)` is `None` when `p >= text.len()`.
//!
//! Callers treat `None` as "clamp to the document edge", never as a failure.

mod character;
mod combinator;
mod line;
mod paragraph;


pub use character::{
    CharacterBoundary, CodeUnitBoundary, GraphemeSource, UnicodeGraphemes, WordBoundary,
};
pub use combinator::{MixedBoundary, PushBoundary};
pub use line::{HardLineLayout, LineBoundary, LineMetrics, MonospaceWrapLayout};
pub use paragraph::{paragraph_range_at, DocumentBoundary, ParagraphBoundary};

use crate::text::{TextAffinity, TextPosition, TextRange};

/// Range whose edges may be missing ("no boundary in this direction").
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoundaryRange {
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl BoundaryRange {
    /// No boundary in either direction.
    pub const NONE: Self = Self {
        start: None,
        end: None,
    };

    /// # Arguments
    /// - `start`: Leading edge, `None` past the start of the text.
    /// - `end`: Trailing edge, `None` past the end of the text.
    pub const fn new(start: Option<usize>, end: Option<usize>) -> Self {
        Self { start, end }
    }

    /// Both edges, when both exist and are ordered.
    ///
    /// # Returns
    /// `None` when an edge is missing or `start > end`.
    pub fn as_range(&self) -> Option<TextRange> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start <= end => Some(TextRange { start, end }),
            _ => None,
        }
    }

    /// Fill missing edges with the document edges `0` and `len`.
    ///
    /// # Arguments
    /// - `len`: Byte length of the text the range was computed over.
    ///
    /// # Returns
    /// An ordered range; reversed edges are swapped.
    pub fn clamp_to_document(&self, len: usize) -> TextRange {
        TextRange::spanning(self.start.unwrap_or(0), self.end.unwrap_or(len))
    }

    /// # Returns
    /// `true` when [`BoundaryRange::as_range`] would succeed.
    pub fn is_valid(&self) -> bool {
        self.as_range().is_some()
    }
}

/// Capability shared by every boundary kind.
///
/// Implementors provide either the `leading`/`trailing` pair, the combined
/// [`TextBoundary::text_boundary_at`], or both. The defaults are defined in
/// terms of each other, so overriding neither recurses forever.
pub trait TextBoundary {
    /// Closest boundary at or before `position`.
    ///
    /// # Returns
    /// `None` when `position` lies past the end of the text.
    fn leading_boundary_at(&self, position: usize) -> Option<usize> {
        self.text_boundary_at(position).start
    }

    /// Boundary ending the unit that starts at or contains `position`.
    ///
    /// # Returns
    /// `None` when `position` is at or past the end of the text.
    fn trailing_boundary_at(&self, position: usize) -> Option<usize> {
        self.text_boundary_at(position).end
    }

    /// Enclosing unit of `position`.
    fn text_boundary_at(&self, position: usize) -> BoundaryRange {
        BoundaryRange::new(
            self.leading_boundary_at(position),
            self.trailing_boundary_at(position),
        )
    }

    /// Enclosing unit of a caret; an upstream caret belongs to the unit that
    /// ends at its offset.
    ///
    /// # Arguments
    /// - `position`: Caret offset and affinity.
    fn text_boundary_at_position(&self, position: TextPosition) -> BoundaryRange {
        match position.affinity {
            TextAffinity::Downstream => self.text_boundary_at(position.offset),
            TextAffinity::Upstream => {
                self.text_boundary_at(position.offset.checked_sub(1).unwrap_or(0))
            }
        }
    }
}

impl<B: TextBoundary + ?Sized> TextBoundary for &B {
    fn leading_boundary_at(&self, position: usize) -> Option<usize> {
        (**self).leading_boundary_at(position)
    }

    fn trailing_boundary_at(&self, position: usize) -> Option<usize> {
        (**self).trailing_boundary_at(position)
    }

    fn text_boundary_at(&self, position: usize) -> BoundaryRange {
        (**self).text_boundary_at(position)
    }

    fn text_boundary_at_position(&self, position: TextPosition) -> BoundaryRange {
        (**self).text_boundary_at_position(position)
    }
}

impl<B: TextBoundary + ?Sized> TextBoundary for Box<B> {
    fn leading_boundary_at(&self, position: usize) -> Option<usize> {
        (**self).leading_boundary_at(position)
    }

    fn trailing_boundary_at(&self, position: usize) -> Option<usize> {
        (**self).trailing_boundary_at(position)
    }

    fn text_boundary_at(&self, position: usize) -> BoundaryRange {
        (**self).text_boundary_at(position)
    }

    fn text_boundary_at_position(&self, position: TextPosition) -> BoundaryRange {
        (**self).text_boundary_at_position(position)
    }
}
