//! Error type for nag-core.
//!
//! Numeric inputs never fail (they are clamped); the errors here are data
//! integrity problems the caller is expected to surface upstream.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NagError {
    /// An enum field carried a value this crate does not know about.
    #[error("unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    /// Energy profile slot outside 0..=23 / 1..=7.
    #[error("invalid energy slot: hour {hour}, weekday {weekday}")]
    InvalidSlot { hour: u32, weekday: u32 },

    #[error("invalid time: {0}")]
    InvalidTime(String),
}

impl NagError {
    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        Self::UnknownVariant {
            kind,
            value: value.to_string(),
        }
    }
}

pub type Result<T, E = NagError> = std::result::Result<T, E>;
