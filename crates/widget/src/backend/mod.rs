use futures::future::LocalBoxFuture;

use crate::api::{ChatReply, ChatRequest, FeedbackReply, FeedbackRequest};
use crate::error::TransportResult;

mod http;

pub use http::HttpBackend;

/// Transport seam between the session driver and the chat service.
///
/// Futures are not `Send`: the widget runs on a single-threaded UI loop.
pub trait Backend {
    fn send_chat<'a>(
        &'a self,
        request: &'a ChatRequest,
    ) -> LocalBoxFuture<'a, TransportResult<ChatReply>>;

    fn send_feedback<'a>(
        &'a self,
        request: &'a FeedbackRequest,
    ) -> LocalBoxFuture<'a, TransportResult<FeedbackReply>>;
}
