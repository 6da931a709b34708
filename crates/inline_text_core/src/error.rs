//! Error types for text ranges, span tracking, and configuration.
use crate::spans::ReplacementId;
use thiserror::Error;

/// Errors raised while building a [`crate::text::TextRange`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRangeError {
    #[error("inverted range: start {start} is after end {end}")]
    Inverted { start: usize, end: usize },
}

/// Errors raised by [`crate::spans::ReplacementManager`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanError {
    #[error("invalid replacement range: start {start} is after end {end}")]
    InvalidRange { start: usize, end: usize },

    #[error("unknown replacement {0}")]
    UnknownReplacement(ReplacementId),
}

impl From<TextRangeError> for SpanError {
    fn from(value: TextRangeError) -> Self {
        match value {
            TextRangeError::Inverted { start, end } => Self::InvalidRange { start, end },
        }
    }
}

/// Errors raised while reading configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}
