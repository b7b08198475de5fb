//! Pure view description of the widget.
//!
//! Built from controller state without touching any DOM, then serialized to
//! HTML by front ends that patch the page.

use crate::config::WidgetConfig;
use crate::feedback::{FeedbackDraft, FeedbackState, STAR_COUNT};
use crate::message::{Message, MessageId, MessageKind, Role};
use crate::render::{escape_html, format_bot_text, render_citations};

pub const COMMENT_PLACEHOLDER: &str = "Additional comments (optional)";
pub const SUBMIT_FEEDBACK_LABEL: &str = "Submit Feedback";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetView {
    pub messages: Vec<MessageView>,
    pub typing: bool,
    pub input: String,
}

impl WidgetView {
    pub fn messages_html(&self) -> String {
        self.messages.iter().map(MessageView::to_html).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub id: MessageId,
    pub role: Role,
    pub kind: MessageKind,
    /// Escaped or formatted bubble body, ready for insertion.
    pub body_html: String,
    pub citations_html: String,
    pub feedback: Option<FeedbackView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackView {
    Controls {
        stars: Vec<StarView>,
        comment_box: Option<CommentBoxView>,
        error_notice: Option<String>,
    },
    Confirmed {
        notice: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarView {
    pub rating: u8,
    pub lit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBoxView {
    pub comment: String,
    pub submitting: bool,
}

impl MessageView {
    pub fn from_message(message: &Message, config: &WidgetConfig) -> Self {
        let body_html = match message.role {
            Role::User => escape_html(&message.text),
            Role::Bot => format_bot_text(&message.text, config.bot_markup),
        };

        Self {
            id: message.id,
            role: message.role,
            kind: message.kind,
            body_html,
            citations_html: render_citations(&message.citations, &config.references_heading),
            feedback: message
                .feedback
                .as_ref()
                .map(|draft| FeedbackView::from_draft(draft, config)),
        }
    }

    pub fn to_html(&self) -> String {
        let dom_id = self.id.dom_id();

        if self.role == Role::User {
            return format!(
                r#"<div class="message user-message" id="{dom_id}"><div class="message-content"><p>{}</p></div></div>"#,
                self.body_html
            );
        }

        let classes = if self.kind == MessageKind::Error {
            "message bot-message error-message"
        } else {
            "message bot-message"
        };
        let feedback_html = self
            .feedback
            .as_ref()
            .map(|feedback| feedback.to_html(self.id))
            .unwrap_or_default();

        format!(
            r#"<div class="{classes}" id="{dom_id}"><div class="message-content"><div class="bot-icon"><i class="fas fa-balance-scale"></i></div><div>{}{}{feedback_html}</div></div></div>"#,
            self.body_html, self.citations_html
        )
    }
}

impl FeedbackView {
    pub fn from_draft(draft: &FeedbackDraft, config: &WidgetConfig) -> Self {
        if draft.is_confirmed() {
            return Self::Confirmed {
                notice: config.feedback_thanks.clone(),
            };
        }

        let highlighted = draft.highlighted();
        let stars = (1..=STAR_COUNT)
            .map(|rating| StarView {
                rating,
                lit: rating <= highlighted,
            })
            .collect();
        let comment_box = draft.comment_box_visible().then(|| CommentBoxView {
            comment: draft.comment().to_string(),
            submitting: *draft.state() == FeedbackState::Submitting,
        });

        Self::Controls {
            stars,
            comment_box,
            error_notice: draft.state().error_notice().map(str::to_string),
        }
    }

    pub fn to_html(&self, message_id: MessageId) -> String {
        match self {
            Self::Confirmed { notice } => format!(
                r#"<div class="feedback feedback-confirmed" data-message="{message_id}"><p>{}</p></div>"#,
                escape_html(notice)
            ),
            Self::Controls { comment_box, .. } => {
                let comment_html = comment_box
                    .as_ref()
                    .map(|comment_box| comment_box.to_html(message_id))
                    .unwrap_or_default();

                format!(
                    r#"<div class="feedback" data-message="{message_id}"><div class="stars">{}</div>{comment_html}{}</div>"#,
                    self.stars_html(message_id),
                    self.error_html()
                )
            }
        }
    }

    /// Inner markup of the `.stars` container. Empty once confirmed.
    pub fn stars_html(&self, message_id: MessageId) -> String {
        let Self::Controls { stars, .. } = self else {
            return String::new();
        };

        stars
            .iter()
            .map(|star| {
                let class = if star.lit { "star active" } else { "star" };
                format!(
                    r#"<span class="{class}" data-action="star" data-message="{message_id}" data-rating="{}"><i class="fas fa-star"></i></span>"#,
                    star.rating
                )
            })
            .collect()
    }

    pub fn error_html(&self) -> String {
        match self {
            Self::Controls {
                error_notice: Some(notice),
                ..
            } => format!(r#"<div class="feedback-error">{}</div>"#, escape_html(notice)),
            Self::Controls { .. } | Self::Confirmed { .. } => String::new(),
        }
    }
}

impl CommentBoxView {
    pub fn to_html(&self, message_id: MessageId) -> String {
        let disabled = if self.submitting { " disabled" } else { "" };
        format!(
            r#"<div class="feedback-comment"><textarea data-action="comment" data-message="{message_id}" placeholder="{COMMENT_PLACEHOLDER}">{}</textarea><button type="button" data-action="submit-feedback" data-message="{message_id}"{disabled}>{SUBMIT_FEEDBACK_LABEL}</button></div>"#,
            escape_html(&self.comment)
        )
    }
}
