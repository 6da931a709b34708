//! Gesture and editing configuration loaded from environment variables.

use crate::constants::{
    DOUBLE_TAP_SLOP, DOUBLE_TAP_TIMEOUT, ENV_PREFIX, TAP_DOWN_DEADLINE, TOUCH_SLOP,
};
use crate::env::read_trimmed;
use crate::error::ConfigError;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Runtime thresholds for tap/drag recognition and text editing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GestureConfig {
    pub double_tap_timeout: Duration,
    pub double_tap_slop: f32,
    pub touch_slop: f32,
    pub tap_down_deadline: Duration,
    /// `None` lets a tap series grow without bound.
    pub max_consecutive_tap: Option<u32>,
    pub obscure_text: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            double_tap_timeout: DOUBLE_TAP_TIMEOUT,
            double_tap_slop: DOUBLE_TAP_SLOP,
            touch_slop: TOUCH_SLOP,
            tap_down_deadline: TAP_DOWN_DEADLINE,
            max_consecutive_tap: None,
            obscure_text: false,
        }
    }
}

/// Parse a boolean-like flag value.
///
/// Truthy: `1`, `true`, `yes`, `on`. Falsy: `0`, `false`, `no`, `off`, empty.
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Arguments
/// - `value`: Raw flag text, usually read from the environment.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_key(suffix: &str) -> String {
    format!("{}{}", ENV_PREFIX, suffix)
}

fn parse_var<T: FromStr>(suffix: &str) -> Result<Option<T>, ConfigError> {
    let key = env_key(suffix);
    let Some(raw) = read_trimmed(&key) else {
        return Ok(None);
    };
    raw.parse::<T>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidValue { key, value: raw })
}

fn parse_slop(suffix: &str) -> Result<Option<f32>, ConfigError> {
    match parse_var::<f32>(suffix)? {
        Some(value) if !value.is_finite() || value < 0.0 => Err(ConfigError::InvalidValue {
            key: env_key(suffix),
            value: value.to_string(),
        }),
        other => Ok(other),
    }
}

impl GestureConfig {
    /// Load configuration, rejecting malformed values.
    ///
    /// # Returns
    /// A populated [`GestureConfig`] with defaults for unset variables.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] when a variable is set but cannot
    /// be parsed (or is a negative/non-finite slop).
    pub fn try_from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let obscure_key = env_key("OBSCURE_TEXT");
        let obscure_text = match read_trimmed(&obscure_key) {
            None => defaults.obscure_text,
            Some(raw) => parse_env_flag(&raw).ok_or(ConfigError::InvalidValue {
                key: obscure_key,
                value: raw,
            })?,
        };
        Ok(Self {
            double_tap_timeout: parse_var::<u64>("DOUBLE_TAP_TIMEOUT_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.double_tap_timeout),
            double_tap_slop: parse_slop("DOUBLE_TAP_SLOP")?.unwrap_or(defaults.double_tap_slop),
            touch_slop: parse_slop("TOUCH_SLOP")?.unwrap_or(defaults.touch_slop),
            tap_down_deadline: parse_var::<u64>("TAP_DOWN_DEADLINE_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.tap_down_deadline),
            max_consecutive_tap: match parse_var::<u32>("MAX_CONSECUTIVE_TAP")? {
                Some(0) | None => None,
                Some(max) => Some(max),
            },
            obscure_text,
        })
    }

    /// Load configuration, falling back to defaults when anything is malformed.
    ///
    /// # Returns
    /// The environment configuration, or [`GestureConfig::default`] after a
    /// warning when any variable is invalid.
    pub fn from_env() -> Self {
        Self::try_from_env().unwrap_or_else(|err| {
            warn!("ignoring gesture configuration from environment: {}", err);
            Self::default()
        })
    }

    /// Travel before a touch pointer is considered a drag.
    ///
    /// # Returns
    /// Twice [`GestureConfig::touch_slop`].
    pub fn pan_slop(&self) -> f32 {
        self.touch_slop * 2.0
    }
}
