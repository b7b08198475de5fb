//! Browser binding for the LexChat widget.
//!
//! The host page supplies the markup (`#chat-form`, `#user-input`,
//! `#chat-messages`, `#typing-indicator`); `new ChatWidget(config)` wires the
//! listeners and keeps the message list in step with the session.

mod actions;
mod dom;

use std::rc::Rc;

use lexchat_widget::{ChatSession, ChatWidgetController, HttpBackend, WidgetConfig};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, EventTarget, HtmlTextAreaElement, MouseEvent, Node};

use crate::actions::{ActionTarget, DomEventKind, WidgetAction, resolve};
use crate::dom::Page;

/// Initialize WASM module
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("LexChat WASM module initialized");
}

/// Mounts the widget on the current document, same as `new ChatWidget(config)`.
#[wasm_bindgen]
pub fn mount(config: JsValue) -> Result<ChatWidget, JsValue> {
    ChatWidget::new(config)
}

/// A mounted chat widget. Dropping it detaches every listener.
#[wasm_bindgen]
pub struct ChatWidget {
    session: ChatSession<HttpBackend>,
    _listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl ChatWidget {
    /// Mounts the widget on the current document. `config` is an optional
    /// object using the same keys as the JSON config file.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<ChatWidget, JsValue> {
        let config: WidgetConfig = if config.is_undefined() || config.is_null() {
            WidgetConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        let config = config.normalized();

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;
        let origin = window.location().origin()?;

        let page = Rc::new(Page::locate(&document)?);
        let backend = HttpBackend::new(&origin, &config);
        log::info!("mounting chat widget against {}", backend.chat_url());

        let hook_page = Rc::clone(&page);
        let session = ChatSession::new(ChatWidgetController::new(config), backend)
            .on_change(move |controller| hook_page.sync(controller));
        page.sync(&session.controller().borrow());

        let listeners = bind(&page, &session)?;
        Ok(Self {
            session,
            _listeners: listeners,
        })
    }

    /// Sends `text` as if the user had typed it and pressed enter.
    #[wasm_bindgen(js_name = sendMessage)]
    pub fn send_message(&self, text: String) {
        let session = self.session.clone();
        spawn_local(async move {
            session.send_message(&text).await;
        });
    }

    /// Conversation turns sent with each request.
    pub fn history(&self) -> js_sys::Array {
        self.session
            .controller()
            .borrow()
            .history()
            .turns()
            .iter()
            .map(|turn| JsValue::from_str(turn))
            .collect()
    }

    pub fn typing(&self) -> bool {
        self.session.controller().borrow().typing()
    }
}

struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

fn bind(page: &Rc<Page>, session: &ChatSession<HttpBackend>) -> Result<Vec<Listener>, JsValue> {
    let mut listeners = Vec::with_capacity(2 + DomEventKind::ALL.len());

    let submit_page = Rc::clone(page);
    let submit_session = session.clone();
    listeners.push(Listener::attach(&page.form, "submit", move |event| {
        event.prevent_default();
        let text = submit_page.input_value();
        let session = submit_session.clone();
        spawn_local(async move {
            session.send_message(&text).await;
        });
    })?);

    // Mirror the field so redraws never clobber what the user is typing.
    let input_page = Rc::clone(page);
    let input_session = session.clone();
    listeners.push(Listener::attach(&page.input, "input", move |_| {
        input_session
            .controller()
            .borrow_mut()
            .set_input(input_page.input_value());
    })?);

    for kind in DomEventKind::ALL {
        let session = session.clone();
        listeners.push(Listener::attach(
            &page.messages,
            kind.event_name(),
            move |event| {
                if let Some(action) = delegated_action(kind, &event) {
                    dispatch(&session, action);
                }
            },
        )?);
    }

    Ok(listeners)
}

fn delegated_action(kind: DomEventKind, event: &Event) -> Option<WidgetAction> {
    let origin = event.target()?.dyn_into::<Element>().ok()?;
    let element = origin.closest("[data-action]").ok()??;

    let action = element.get_attribute("data-action")?;
    let message = element.get_attribute("data-message");
    let rating = element.get_attribute("data-rating");
    let value = element
        .dyn_ref::<HtmlTextAreaElement>()
        .map(HtmlTextAreaElement::value);
    let pointer_still_inside = kind == DomEventKind::Out
        && event
            .dyn_ref::<MouseEvent>()
            .and_then(MouseEvent::related_target)
            .and_then(|related| related.dyn_into::<Node>().ok())
            .is_some_and(|related| element.contains(Some(&related)));

    resolve(
        kind,
        &ActionTarget {
            action: &action,
            message: message.as_deref(),
            rating: rating.as_deref(),
            value: value.as_deref(),
            pointer_still_inside,
        },
    )
}

fn dispatch(session: &ChatSession<HttpBackend>, action: WidgetAction) {
    let outcome = match action {
        WidgetAction::HoverStar { message_id, rating } => {
            session.update(|controller| controller.hover_star(message_id, rating))
        }
        WidgetAction::LeaveStars { message_id } => {
            session.update(|controller| controller.leave_stars(message_id))
        }
        WidgetAction::ClickStar { message_id, rating } => {
            session.update(|controller| controller.click_star(message_id, rating))
        }
        // No redraw: replacing the textarea would drop its focus.
        WidgetAction::Comment { message_id, text } => session
            .controller()
            .borrow_mut()
            .set_comment(message_id, text),
        WidgetAction::SubmitFeedback { message_id } => {
            let session = session.clone();
            spawn_local(async move {
                if let Err(rejection) = session.submit_feedback(message_id).await {
                    log::debug!("feedback for {message_id} not sent: {rejection:?}");
                }
            });
            Ok(())
        }
    };

    if let Err(rejection) = outcome {
        log::debug!("ignored widget action: {rejection:?}");
    }
}
