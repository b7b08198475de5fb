use futures::FutureExt as _;
use futures::future::LocalBoxFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;
use snafu::ResultExt;

use crate::api::{ChatReply, ChatRequest, FeedbackReply, FeedbackRequest};
use crate::config::WidgetConfig;
use crate::error::{DecodeSnafu, RequestSnafu, StatusSnafu, TransportResult};

use super::Backend;

/// JSON-over-HTTP backend for the chat and feedback endpoints.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    chat_url: String,
    feedback_url: String,
}

impl HttpBackend {
    /// `origin` is used when the config does not pin a base URL.
    pub fn new(origin: &str, config: &WidgetConfig) -> Self {
        Self::with_client(reqwest::Client::new(), origin, config)
    }

    pub fn with_client(client: reqwest::Client, origin: &str, config: &WidgetConfig) -> Self {
        Self {
            client,
            chat_url: config.chat_url(origin),
            feedback_url: config.feedback_url(origin),
        }
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    pub fn feedback_url(&self) -> &str {
        &self.feedback_url
    }

    async fn post_json<Req, Resp>(
        &self,
        stage: &'static str,
        url: &str,
        body: &Req,
    ) -> TransportResult<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context(RequestSnafu { stage, url })?;

        let status = response.status();
        if !status.is_success() {
            return StatusSnafu {
                stage,
                url,
                status: status.as_u16(),
            }
            .fail();
        }

        response.json::<Resp>().await.context(DecodeSnafu { stage, url })
    }
}

impl Backend for HttpBackend {
    fn send_chat<'a>(
        &'a self,
        request: &'a ChatRequest,
    ) -> LocalBoxFuture<'a, TransportResult<ChatReply>> {
        self.post_json("post-chat", &self.chat_url, request).boxed_local()
    }

    fn send_feedback<'a>(
        &'a self,
        request: &'a FeedbackRequest,
    ) -> LocalBoxFuture<'a, TransportResult<FeedbackReply>> {
        self.post_json("post-feedback", &self.feedback_url, request).boxed_local()
    }
}
