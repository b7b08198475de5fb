use std::fmt;

use serde::{Deserialize, Serialize};

use crate::feedback::FeedbackDraft;

/// Stable identifier for one rendered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u64);

impl MessageId {
    /// Creates a typed message identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// DOM id used by front ends to address the bubble.
    pub fn dom_id(&self) -> String {
        format!("message-{}", self.0)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Client-local token for one in-flight chat dispatch.
///
/// Never sent to the backend; it only pairs a response with the dispatch that
/// produced it so overlapping sends keep the typing indicator consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl RequestId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Opaque backend token correlating a feedback submission with one answer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryId(String);

impl QueryId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Chat speaker role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Bot,
}

/// What a bubble represents, so front ends can style failures apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Greeting,
    Prompt,
    Answer,
    Error,
}

/// One rendered chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub kind: MessageKind,
    pub text: String,
    pub citations: Vec<String>,
    /// Present if and only if the backend issued a query identifier.
    pub feedback: Option<FeedbackDraft>,
}

impl Message {
    pub fn user(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            role: Role::User,
            kind: MessageKind::Prompt,
            text: text.into(),
            citations: Vec::new(),
            feedback: None,
        }
    }

    pub fn greeting(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            role: Role::Bot,
            kind: MessageKind::Greeting,
            text: text.into(),
            citations: Vec::new(),
            feedback: None,
        }
    }

    /// Creates a bot answer; a query identifier attaches a fresh feedback draft.
    pub fn answer(
        id: MessageId,
        text: impl Into<String>,
        citations: Vec<String>,
        query_id: Option<QueryId>,
    ) -> Self {
        Self {
            id,
            role: Role::Bot,
            kind: MessageKind::Answer,
            text: text.into(),
            citations,
            feedback: query_id.map(FeedbackDraft::new),
        }
    }

    pub fn error(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            role: Role::Bot,
            kind: MessageKind::Error,
            text: text.into(),
            citations: Vec::new(),
            feedback: None,
        }
    }

    pub fn query_id(&self) -> Option<&QueryId> {
        self.feedback.as_ref().map(FeedbackDraft::query_id)
    }
}
