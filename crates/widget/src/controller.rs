use std::collections::BTreeSet;

use crate::api::{ChatReply, ChatRequest, FeedbackReply, FeedbackRequest};
use crate::config::WidgetConfig;
use crate::error::TransportResult;
use crate::feedback::{FeedbackDraft, FeedbackRejection, FeedbackResult, FeedbackTransition, Rating};
use crate::history::ChatHistory;
use crate::message::{Message, MessageId, RequestId};
use crate::view::{MessageView, WidgetView};

/// A chat dispatch the host must perform, tagged for response correlation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChat {
    pub request_id: RequestId,
    pub request: ChatRequest,
}

/// A feedback submission the host must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFeedback {
    pub message_id: MessageId,
    pub request: FeedbackRequest,
}

/// Owns conversation state and turns UI intents into requests and view updates.
///
/// The controller performs no I/O: `submit` and `begin_feedback` hand back
/// the request to dispatch, `receive_*` accept the outcome.
pub struct ChatWidgetController {
    config: WidgetConfig,
    history: ChatHistory,
    messages: Vec<Message>,
    input: String,
    in_flight: BTreeSet<RequestId>,
    next_message_id: u64,
    next_request_id: u64,
}

impl ChatWidgetController {
    /// Creates a controller showing the configured greeting.
    pub fn new(config: WidgetConfig) -> Self {
        let mut this = Self {
            config,
            history: ChatHistory::new(),
            messages: Vec::new(),
            input: String::new(),
            in_flight: BTreeSet::new(),
            next_message_id: 1,
            next_request_id: 1,
        };

        let greeting_id = this.alloc_message_id();
        let greeting = Message::greeting(greeting_id, this.config.greeting.clone());
        this.push_bot(greeting);
        this
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message(&self, message_id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|message| message.id == message_id)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// True while at least one chat request is awaiting its response.
    pub fn typing(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Submits the current input. Blank input changes nothing and yields no request.
    pub fn submit(&mut self) -> Option<PendingChat> {
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return None;
        }

        let message_id = self.alloc_message_id();
        self.messages.push(Message::user(message_id, text.clone()));
        self.history.append_user(text.clone());
        self.input.clear();

        let request_id = self.alloc_request_id();
        self.in_flight.insert(request_id);

        tracing::info!(
            request_id = request_id.0,
            history_len = self.history.len(),
            "dispatching chat message"
        );

        Some(PendingChat {
            request_id,
            request: ChatRequest {
                message: text,
                history: self.history.snapshot(),
            },
        })
    }

    /// Renders the outcome of one chat dispatch and returns the new bubble's id.
    pub fn receive_chat(
        &mut self,
        request_id: RequestId,
        outcome: TransportResult<ChatReply>,
    ) -> MessageId {
        if !self.in_flight.remove(&request_id) {
            tracing::warn!(request_id = request_id.0, "response for unknown chat request");
        }

        let message_id = self.alloc_message_id();
        match outcome {
            Ok(ChatReply::Answer(answer)) => {
                tracing::debug!(
                    request_id = request_id.0,
                    citations = answer.citations.len(),
                    has_query_id = answer.query_id.is_some(),
                    "chat answer received"
                );
                self.push_bot(Message::answer(
                    message_id,
                    answer.response,
                    answer.citations,
                    answer.query_id,
                ));
            }
            Ok(ChatReply::Failure { error }) => {
                tracing::warn!(request_id = request_id.0, %error, "backend reported chat error");
                // Error bubbles never enter the history.
                self.messages
                    .push(Message::error(message_id, self.config.error_text(&error)));
            }
            Err(error) => {
                tracing::warn!(request_id = request_id.0, %error, "chat request failed");
                let fallback = Message::error(message_id, self.config.fallback_error.clone());
                self.push_bot(fallback);
            }
        }

        message_id
    }

    pub fn hover_star(&mut self, message_id: MessageId, value: u8) -> FeedbackResult<()> {
        let rating = Rating::new(value)?;
        self.apply_feedback(message_id, FeedbackTransition::Hover(rating))
    }

    pub fn leave_stars(&mut self, message_id: MessageId) -> FeedbackResult<()> {
        self.apply_feedback(message_id, FeedbackTransition::Leave)
    }

    pub fn click_star(&mut self, message_id: MessageId, value: u8) -> FeedbackResult<()> {
        let rating = Rating::new(value)?;
        self.apply_feedback(message_id, FeedbackTransition::Click(rating))
    }

    pub fn set_comment(
        &mut self,
        message_id: MessageId,
        comment: impl Into<String>,
    ) -> FeedbackResult<()> {
        self.apply_feedback(message_id, FeedbackTransition::Comment(comment.into()))
    }

    /// Moves a rated feedback block to submitting and returns its request.
    pub fn begin_feedback(&mut self, message_id: MessageId) -> FeedbackResult<PendingFeedback> {
        let draft = self.draft_mut(message_id)?;
        draft.apply(FeedbackTransition::Submit)?;
        let request = draft.submission()?;

        tracing::info!(
            message_id = message_id.0,
            query_id = %request.query_id,
            rating = request.rating.get(),
            "submitting feedback"
        );
        Ok(PendingFeedback {
            message_id,
            request,
        })
    }

    pub fn receive_feedback(
        &mut self,
        message_id: MessageId,
        outcome: TransportResult<FeedbackReply>,
    ) -> FeedbackResult<()> {
        let transition = match outcome {
            Ok(FeedbackReply { success: true, .. }) => FeedbackTransition::Succeed,
            Ok(FeedbackReply { error, .. }) => {
                tracing::warn!(message_id = message_id.0, ?error, "feedback rejected by backend");
                let notice = error
                    .filter(|error| !error.trim().is_empty())
                    .unwrap_or_else(|| self.config.feedback_failed.clone());
                FeedbackTransition::Fail(notice)
            }
            Err(error) => {
                tracing::warn!(message_id = message_id.0, %error, "feedback request failed");
                FeedbackTransition::Fail(self.config.feedback_failed.clone())
            }
        };

        self.apply_feedback(message_id, transition)
    }

    pub fn view(&self) -> WidgetView {
        WidgetView {
            messages: self
                .messages
                .iter()
                .map(|message| MessageView::from_message(message, &self.config))
                .collect(),
            typing: self.typing(),
            input: self.input.clone(),
        }
    }

    pub fn message_view(&self, message_id: MessageId) -> Option<MessageView> {
        self.message(message_id)
            .map(|message| MessageView::from_message(message, &self.config))
    }

    fn push_bot(&mut self, message: Message) {
        if self.history.append_bot(message.text.clone()) {
            tracing::debug!(history_len = self.history.len(), "bot turn recorded");
        }
        self.messages.push(message);
    }

    fn apply_feedback(
        &mut self,
        message_id: MessageId,
        transition: FeedbackTransition,
    ) -> FeedbackResult<()> {
        self.draft_mut(message_id)?.apply(transition)
    }

    fn draft_mut(&mut self, message_id: MessageId) -> FeedbackResult<&mut FeedbackDraft> {
        let message = self
            .messages
            .iter_mut()
            .find(|message| message.id == message_id)
            .ok_or(FeedbackRejection::UnknownMessage { message_id })?;

        message
            .feedback
            .as_mut()
            .ok_or(FeedbackRejection::FeedbackUnavailable { message_id })
    }

    fn alloc_message_id(&mut self) -> MessageId {
        let id = MessageId::new(self.next_message_id);
        self.next_message_id = self.next_message_id.saturating_add(1);
        id
    }

    fn alloc_request_id(&mut self) -> RequestId {
        let id = RequestId::new(self.next_request_id);
        self.next_request_id = self.next_request_id.saturating_add(1);
        id
    }
}
