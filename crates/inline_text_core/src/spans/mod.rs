//! Span interval manager: tracks replaced ranges of a text buffer.
//!
//! Replacements stay sorted by start in flat arrays; an implicit interval
//! tree over those arrays answers overlap queries. Text edits are absorbed by
//! a virtual offset gap instead of rewriting every stored offset.

mod gap;
mod manager;
pub mod tree;


pub use gap::OffsetGap;
pub use manager::{Replacement, ReplacementId, ReplacementManager, SpanChange, SpanRef};
