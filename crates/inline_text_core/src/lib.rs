//! Core library for inline_text (boundaries, span tracking, editing, config).

/// Text-boundary engine.
pub mod boundary;
/// Gesture and editing configuration.
pub mod config;
/// Shared constants.
pub mod constants;
/// Caret movement and deletion commands.
pub mod editing;
/// Environment helpers shared by config loading and tests.
pub mod env;
/// Error types.
pub mod error;
/// Span interval manager.
pub mod spans;
/// Offsets, ranges, and selections.
pub mod text;

pub use boundary::{BoundaryRange, TextBoundary};
pub use config::GestureConfig;
pub use editing::{apply_command, EditCommand, EditContext, EditOutcome, TextEdit, TextEditingValue};
pub use error::{ConfigError, SpanError, TextRangeError};
pub use spans::{Replacement, ReplacementId, ReplacementManager};
pub use text::{Direction, TextAffinity, TextPosition, TextRange, TextSelection};
