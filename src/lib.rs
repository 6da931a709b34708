//! Root crate facade for inline_text: boundary engine, span tracking, and
//! gesture recognition, plus the scripted replay used by the CLI.

/// Boundary inspection for the CLI.
pub mod inspect;
/// JSON-scripted gesture and span replay.
pub mod replay;

pub use inline_text_core::{
    apply_command, BoundaryRange, ConfigError, Direction, EditCommand, EditContext, EditOutcome,
    GestureConfig, Replacement, ReplacementId, ReplacementManager, SpanError, TextAffinity,
    TextBoundary, TextEdit, TextEditingValue, TextPosition, TextRange, TextRangeError,
    TextSelection,
};
pub use inline_text_gestures::{
    commands_from_events, GestureArenaManager, TapAndDragGestureRecognizer, TapDragEvent,
};
