use std::cell::RefCell;
use std::collections::HashMap;

use lexchat_widget::{ChatWidgetController, FeedbackView, MessageId, MessageView};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

pub const FORM_ID: &str = "chat-form";
pub const INPUT_ID: &str = "user-input";
pub const MESSAGES_ID: &str = "chat-messages";
pub const TYPING_ID: &str = "typing-indicator";

/// Handles to the host page's widget elements plus the last markup written
/// for each message, so redraws only patch bubbles that changed.
pub struct Page {
    document: Document,
    pub form: Element,
    pub input: HtmlInputElement,
    pub messages: Element,
    typing: HtmlElement,
    rendered: RefCell<HashMap<MessageId, String>>,
}

impl Page {
    pub fn locate(document: &Document) -> Result<Self, JsValue> {
        let input = element(document, INPUT_ID)?
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| JsValue::from_str("#user-input is not an <input>"))?;
        let typing = element(document, TYPING_ID)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| JsValue::from_str("#typing-indicator is not an HTML element"))?;

        Ok(Self {
            document: document.clone(),
            form: element(document, FORM_ID)?,
            input,
            messages: element(document, MESSAGES_ID)?,
            typing,
            rendered: RefCell::new(HashMap::new()),
        })
    }

    pub fn input_value(&self) -> String {
        self.input.value()
    }

    /// Patches the page to match the controller's current view.
    pub fn sync(&self, controller: &ChatWidgetController) {
        let view = controller.view();

        let display = if view.typing { "flex" } else { "none" };
        if let Err(error) = self.typing.style().set_property("display", display) {
            log::warn!("failed to toggle typing indicator: {error:?}");
        }

        if self.input.value() != view.input {
            self.input.set_value(&view.input);
        }

        let mut rendered = self.rendered.borrow_mut();
        let mut appended = false;
        for message in &view.messages {
            let html = message.to_html();
            match rendered.get(&message.id) {
                Some(previous) if *previous == html => continue,
                Some(_) => self.patch(message, &html),
                None => {
                    if let Err(error) = self.messages.insert_adjacent_html("beforeend", &html) {
                        log::warn!("failed to append message {}: {error:?}", message.id);
                        continue;
                    }
                    appended = true;
                }
            }
            rendered.insert(message.id, html);
        }

        if appended {
            self.messages.set_scroll_top(self.messages.scroll_height());
        }
    }

    fn patch(&self, message: &MessageView, html: &str) {
        let Some(node) = self.document.get_element_by_id(&message.id.dom_id()) else {
            return;
        };
        let has_comment_box = matches!(node.query_selector(COMMENT_SELECTOR), Ok(Some(_)));

        match plan_patch(message, has_comment_box) {
            BubblePatch::Replace => node.set_outer_html(html),
            BubblePatch::FeedbackControls => {
                let Some(feedback) = &message.feedback else {
                    return;
                };
                if let Err(error) = patch_feedback_controls(&node, message.id, feedback) {
                    log::warn!("failed to patch feedback of {}: {error:?}", message.id);
                }
            }
        }
    }
}

const COMMENT_SELECTOR: &str = r#"textarea[data-action="comment"]"#;
const SUBMIT_SELECTOR: &str = r#"button[data-action="submit-feedback"]"#;

/// How a changed bubble is brought up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubblePatch {
    Replace,
    /// Rewrite stars, notice and button in place; a live textarea keeps
    /// its focus, caret and typed text.
    FeedbackControls,
}

/// Bubble text never changes after insertion, so a changed bubble differs
/// only in its feedback block. The block is patched in place unless the
/// comment box has to appear or the controls give way to the confirmation.
pub fn plan_patch(message: &MessageView, has_comment_box: bool) -> BubblePatch {
    match &message.feedback {
        Some(FeedbackView::Controls { comment_box, .. })
            if comment_box.is_some() == has_comment_box =>
        {
            BubblePatch::FeedbackControls
        }
        _ => BubblePatch::Replace,
    }
}

fn patch_feedback_controls(
    node: &Element,
    message_id: MessageId,
    feedback: &FeedbackView,
) -> Result<(), JsValue> {
    if let Some(stars) = node.query_selector(".stars")? {
        stars.set_inner_html(&feedback.stars_html(message_id));
    }

    if let Some(stale) = node.query_selector(".feedback-error")? {
        stale.remove();
    }
    let error_html = feedback.error_html();
    if !error_html.is_empty() {
        if let Some(block) = node.query_selector(".feedback")? {
            block.insert_adjacent_html("beforeend", &error_html)?;
        }
    }

    let submitting = matches!(
        feedback,
        FeedbackView::Controls {
            comment_box: Some(comment_box),
            ..
        } if comment_box.submitting
    );
    if let Some(button) = node.query_selector(SUBMIT_SELECTOR)? {
        if submitting {
            button.set_attribute("disabled", "")?;
        } else {
            button.remove_attribute("disabled")?;
        }
    }
    Ok(())
}

fn element(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{id} element")))
}

#[cfg(test)]
mod tests {
    use lexchat_widget::{FeedbackTransition, Message, QueryId, Rating, WidgetConfig};

    use super::*;

    fn rated_answer(transitions: &[FeedbackTransition]) -> MessageView {
        let mut message = Message::answer(
            MessageId::new(5),
            "See Art. 22",
            Vec::new(),
            Some(QueryId::new("q-5")),
        );
        let draft = message.feedback.as_mut().unwrap();
        draft
            .apply(FeedbackTransition::Click(Rating::new(3).unwrap()))
            .unwrap();
        for transition in transitions {
            draft.apply(transition.clone()).unwrap();
        }
        MessageView::from_message(&message, &WidgetConfig::default())
    }

    #[test]
    fn typed_comment_keeps_its_textarea() {
        let view = rated_answer(&[FeedbackTransition::Comment("abc".to_string())]);

        assert_eq!(plan_patch(&view, true), BubblePatch::FeedbackControls);
    }

    #[test]
    fn hover_and_failure_keep_the_textarea() {
        let hovered = rated_answer(&[FeedbackTransition::Hover(Rating::new(5).unwrap())]);
        assert_eq!(plan_patch(&hovered, true), BubblePatch::FeedbackControls);

        let failed = rated_answer(&[
            FeedbackTransition::Submit,
            FeedbackTransition::Fail("try again".to_string()),
        ]);
        assert_eq!(plan_patch(&failed, true), BubblePatch::FeedbackControls);
    }

    #[test]
    fn hover_before_rating_patches_only_the_stars() {
        let mut message = Message::answer(
            MessageId::new(6),
            "See Art. 22",
            Vec::new(),
            Some(QueryId::new("q-6")),
        );
        message
            .feedback
            .as_mut()
            .unwrap()
            .apply(FeedbackTransition::Hover(Rating::new(2).unwrap()))
            .unwrap();
        let view = MessageView::from_message(&message, &WidgetConfig::default());

        assert_eq!(plan_patch(&view, false), BubblePatch::FeedbackControls);
    }

    #[test]
    fn first_comment_box_and_confirmation_replace_the_bubble() {
        let revealed = rated_answer(&[]);
        assert_eq!(plan_patch(&revealed, false), BubblePatch::Replace);

        let confirmed = rated_answer(&[FeedbackTransition::Submit, FeedbackTransition::Succeed]);
        assert_eq!(plan_patch(&confirmed, true), BubblePatch::Replace);
    }
}
