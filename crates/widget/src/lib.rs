#![deny(unsafe_code)]

//! Chat widget core for the housing-law assistant.
//!
//! Everything here is platform-neutral: front ends feed UI intents into the
//! [`ChatWidgetController`], dispatch the requests it hands back through a
//! [`Backend`], and redraw from [`WidgetView`].

/// Wire contract for the chat and feedback endpoints.
pub mod api;
pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
/// Per-answer star rating state machine.
pub mod feedback;
pub mod history;
/// Domain entities for rendered messages.
pub mod message;
pub mod render;
pub mod session;
pub mod view;

pub use api::{Answer, ChatReply, ChatRequest, FeedbackReply, FeedbackRequest};
pub use backend::{Backend, HttpBackend};
pub use config::{BotMarkup, WidgetConfig};
pub use controller::{ChatWidgetController, PendingChat, PendingFeedback};
#[cfg(not(target_arch = "wasm32"))]
pub use error::{ConfigError, ConfigResult};
pub use error::{TransportError, TransportResult};
pub use feedback::{
    FeedbackDraft, FeedbackRejection, FeedbackResult, FeedbackState, FeedbackTransition, Rating,
    STAR_COUNT,
};
pub use history::ChatHistory;
pub use message::{Message, MessageId, MessageKind, QueryId, RequestId, Role};
pub use session::ChatSession;
pub use view::{CommentBoxView, FeedbackView, MessageView, StarView, WidgetView};
