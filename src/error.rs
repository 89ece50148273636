//! Error taxonomy for the trading cycle
//!
//! Venue, feature, and sizing failures each have their own type. The
//! execution loop folds them into [`CycleError`], the only error it reacts to.

use crate::features::FeatureError;
use crate::risk::SizingError;
use thiserror::Error;

/// Failures reported by a venue collaborator (market data or execution)
#[derive(Debug, Error)]
pub enum VenueError {
    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    /// Connection, timeout, or other transport failure
    #[error("transport error: {0}")]
    Transport(String),
    /// Venue answered but refused the request
    #[error("rejected by venue ({code}): {message}")]
    Rejected { code: i64, message: String },
    /// Payload could not be decoded
    #[error("decode error: {0}")]
    Decode(String),
    /// Venue returned no data where some was required
    #[error("empty response: {0}")]
    Empty(String),
}

impl From<reqwest::Error> for VenueError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            VenueError::Decode(err.to_string())
        } else {
            VenueError::Transport(err.to_string())
        }
    }
}

/// Kind of cycle failure, used for log fields and metric labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleErrorKind {
    DataUnavailable,
    ComputationUndefined,
    InvalidSize,
    SubmissionFailure,
}

impl CycleErrorKind {
    /// Stable snake_case label
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleErrorKind::DataUnavailable => "data_unavailable",
            CycleErrorKind::ComputationUndefined => "computation_undefined",
            CycleErrorKind::InvalidSize => "invalid_size",
            CycleErrorKind::SubmissionFailure => "submission_failure",
        }
    }
}

/// A failure that aborts the current cycle
///
/// Every variant is recoverable: the loop logs it and backs off.
#[derive(Debug, Error)]
pub enum CycleError {
    /// Market data fetch failed or a required window was empty
    #[error("data unavailable: {0}")]
    DataUnavailable(String),
    /// A feature could not be computed from the available data
    #[error("computation undefined: {0}")]
    ComputationUndefined(#[from] FeatureError),
    /// The sized order was not positive
    #[error("invalid size: {0}")]
    InvalidSize(#[from] SizingError),
    /// The venue rejected or failed to accept the order
    #[error("submission failure: {0}")]
    SubmissionFailure(String),
}

impl CycleError {
    /// Wrap a market data failure
    pub fn data(err: VenueError) -> Self {
        CycleError::DataUnavailable(err.to_string())
    }

    /// Wrap an order submission failure
    pub fn submission(err: VenueError) -> Self {
        CycleError::SubmissionFailure(err.to_string())
    }

    pub fn kind(&self) -> CycleErrorKind {
        match self {
            CycleError::DataUnavailable(_) => CycleErrorKind::DataUnavailable,
            CycleError::ComputationUndefined(_) => CycleErrorKind::ComputationUndefined,
            CycleError::InvalidSize(_) => CycleErrorKind::InvalidSize,
            CycleError::SubmissionFailure(_) => CycleErrorKind::SubmissionFailure,
        }
    }
}

/// Truncate an error message to at most `max_chars` characters
///
/// Venue payloads can be arbitrarily large and may echo request parameters,
/// so only a bounded prefix is ever logged.
pub fn truncate_message(message: &str, max_chars: usize) -> String {
    match message.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &message[..idx]),
        None => message.to_string(),
    }
}
