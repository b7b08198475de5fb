//! Wire contract for the chat and feedback endpoints.

use serde::{Deserialize, Serialize};

use crate::feedback::Rating;
use crate::message::QueryId;

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    /// Every prior turn including `message` itself.
    pub history: Vec<String>,
}

/// A successful answer from the chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub response: String,
    pub citations: Vec<String>,
    pub query_id: Option<QueryId>,
}

/// Decoded chat endpoint payload.
///
/// A non-empty `error` field wins over everything else in the payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "ChatReplyPayload")]
pub enum ChatReply {
    Answer(Answer),
    Failure { error: String },
}

#[derive(Deserialize)]
struct ChatReplyPayload {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    citations: Option<Vec<String>>,
    #[serde(default)]
    query_id: Option<QueryId>,
    #[serde(default)]
    error: Option<String>,
}

impl From<ChatReplyPayload> for ChatReply {
    fn from(payload: ChatReplyPayload) -> Self {
        if let Some(error) = payload.error.filter(|error| !error.is_empty()) {
            return Self::Failure { error };
        }

        Self::Answer(Answer {
            response: payload.response.unwrap_or_default(),
            citations: payload.citations.unwrap_or_default(),
            query_id: payload
                .query_id
                .filter(|query_id| !query_id.as_str().is_empty()),
        })
    }
}

/// Body of `POST /api/feedback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackRequest {
    pub query_id: QueryId,
    pub rating: Rating,
    pub comments: String,
}

/// Feedback endpoint payload. A missing `success` flag counts as failure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedbackReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}
