use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiotApiError {
    #[error("API request failed: {status} - {body}")]
    Status { status: StatusCode, body: String },

    #[error("Network error occurred: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid request parameter {0:?}")]
    InvalidParameter(String),

    #[error("Invalid Riot base URL {0:?}")]
    InvalidBaseUrl(String),
}

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error(transparent)]
    Upstream(#[from] RiotApiError),

    #[error("Player {puuid} not found in match {match_id}")]
    PlayerNotFound { puuid: String, match_id: String },

    #[error("Malformed {record} payload: {reason}")]
    MalformedPayload {
        record: &'static str,
        reason: String,
    },

    #[error("Participant index mismatch: details say {details}, timeline says {timeline}")]
    InconsistentParticipant { details: i64, timeline: i64 },
}

impl SummaryError {
    pub(crate) fn malformed(record: &'static str, reason: impl Into<String>) -> Self {
        SummaryError::MalformedPayload {
            record,
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("LLM request failed: {status} - {body}")]
    Status { status: StatusCode, body: String },

    #[error("LLM network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("LLM response contained no message")]
    EmptyResponse,

    #[error("Could not serialize player summary: {0}")]
    Serialize(#[from] serde_json::Error),
}
