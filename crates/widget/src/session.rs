use std::cell::RefCell;
use std::rc::Rc;

use crate::backend::Backend;
use crate::controller::ChatWidgetController;
use crate::feedback::FeedbackResult;
use crate::message::MessageId;

type ChangeHook = Rc<dyn Fn(&ChatWidgetController)>;

/// Drives a controller against a backend on a single-threaded executor.
///
/// The controller is never borrowed across an await, so overlapping sends and
/// UI events may interleave freely while requests are pending.
pub struct ChatSession<B> {
    controller: Rc<RefCell<ChatWidgetController>>,
    backend: Rc<B>,
    on_change: Option<ChangeHook>,
}

impl<B> Clone for ChatSession<B> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            backend: self.backend.clone(),
            on_change: self.on_change.clone(),
        }
    }
}

impl<B: Backend> ChatSession<B> {
    pub fn new(controller: ChatWidgetController, backend: B) -> Self {
        Self {
            controller: Rc::new(RefCell::new(controller)),
            backend: Rc::new(backend),
            on_change: None,
        }
    }

    /// Registers a redraw hook, called after every state change.
    ///
    /// The hook receives a shared borrow; it must not call back into the session.
    pub fn on_change(mut self, hook: impl Fn(&ChatWidgetController) + 'static) -> Self {
        self.on_change = Some(Rc::new(hook));
        self
    }

    pub fn controller(&self) -> &Rc<RefCell<ChatWidgetController>> {
        &self.controller
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Applies a synchronous update and redraws.
    pub fn update<R>(&self, update: impl FnOnce(&mut ChatWidgetController) -> R) -> R {
        let result = update(&mut self.controller.borrow_mut());
        self.notify();
        result
    }

    /// Sends `input` as a chat message. Returns the reply bubble, or `None`
    /// when the input was blank and nothing was dispatched.
    pub async fn send_message(&self, input: &str) -> Option<MessageId> {
        let pending = self.update(|controller| {
            controller.set_input(input);
            controller.submit()
        })?;

        let outcome = self.backend.send_chat(&pending.request).await;
        Some(self.update(|controller| controller.receive_chat(pending.request_id, outcome)))
    }

    pub async fn submit_feedback(&self, message_id: MessageId) -> FeedbackResult<()> {
        let pending = self.update(|controller| controller.begin_feedback(message_id))?;

        let outcome = self.backend.send_feedback(&pending.request).await;
        self.update(|controller| controller.receive_feedback(pending.message_id, outcome))
    }

    fn notify(&self) {
        if let Some(hook) = &self.on_change {
            hook(&self.controller.borrow());
        }
    }
}
