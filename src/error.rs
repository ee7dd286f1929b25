use thiserror::Error;

/// Failures of a single poll iteration. None of these stop the loop.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("status API unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("unexpected status API response code: {0}")]
    BadStatus(u16),
    #[error("malformed status API response: {0}")]
    Shape(String),
    #[error("status API returned no homeworks")]
    EmptyResult,
    #[error("undocumented homework status in API response: {0}")]
    UnknownStatus(String),
    #[error("homework record has no name")]
    MissingName,
    #[error("failed to deliver Telegram message: {0}")]
    Delivery(String),
}

impl PollError {
    /// Stable name used as the `kind` field in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PollError::Transport(_) => "TransportError",
            PollError::BadStatus(_) => "BadStatusError",
            PollError::Shape(_) => "ShapeError",
            PollError::EmptyResult => "EmptyResultError",
            PollError::UnknownStatus(_) => "UnknownStatusError",
            PollError::MissingName => "MissingNameError",
            PollError::Delivery(_) => "DeliveryError",
        }
    }

    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        PollError::Shape(msg.into())
    }
}
