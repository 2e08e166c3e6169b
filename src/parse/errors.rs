//! Message text for the handful of diagnostics raised at more than one call
//! site. One-off messages are built inline with `format!`; these are the
//! ones worth naming so every call site renders them identically.

use thiserror::Error;

/// A semantic-phase message shared by more than one parse production.
#[derive(Debug, Error)]
pub(crate) enum SemanticMessage {
    /// `alias`/`let`/`chain` binding an already-occupied name.
    #[error("`{0}` is already defined")]
    AlreadyDefined(String),

    /// A name looked up in `constants`/`channels`/`chains` with no binding.
    #[error("undefined name `{0}`")]
    Undefined(String),

    /// A channel operand outside `[CHANNEL_MIN, CHANNEL_MAX]`.
    #[error("channel must be between {min} and {max}")]
    ChannelOutOfRange {
        /// Smallest valid channel, inclusive.
        min: u8,
        /// Largest valid channel, inclusive.
        max: u8,
    },

    /// A negative value reaching a use site that coerces to `u64`.
    #[error("expected a non-negative number, found {0}")]
    ExpectedNonNegative(f64),
}
