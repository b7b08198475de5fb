use lexchat_widget::MessageId;

/// DOM event families the widget listens to on the message list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomEventKind {
    Click,
    Over,
    Out,
    Input,
}

impl DomEventKind {
    pub const ALL: [Self; 4] = [Self::Click, Self::Over, Self::Out, Self::Input];

    pub fn event_name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Over => "mouseover",
            Self::Out => "mouseout",
            Self::Input => "input",
        }
    }
}

/// `data-*` attributes read off the element closest to the event target.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionTarget<'a> {
    pub action: &'a str,
    pub message: Option<&'a str>,
    pub rating: Option<&'a str>,
    pub value: Option<&'a str>,
    /// Set when a `mouseout` only moved onto a descendant of the same control.
    pub pointer_still_inside: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetAction {
    HoverStar { message_id: MessageId, rating: u8 },
    LeaveStars { message_id: MessageId },
    ClickStar { message_id: MessageId, rating: u8 },
    Comment { message_id: MessageId, text: String },
    SubmitFeedback { message_id: MessageId },
}

/// Maps a delegated DOM event to a widget action, if it carries one.
pub fn resolve(kind: DomEventKind, target: &ActionTarget<'_>) -> Option<WidgetAction> {
    let message_id = target
        .message
        .and_then(|raw| raw.parse::<u64>().ok())
        .map(MessageId::new)?;
    let rating = || target.rating.and_then(|raw| raw.parse::<u8>().ok());

    match (target.action, kind) {
        ("star", DomEventKind::Over) => Some(WidgetAction::HoverStar {
            message_id,
            rating: rating()?,
        }),
        ("star", DomEventKind::Out) if !target.pointer_still_inside => {
            Some(WidgetAction::LeaveStars { message_id })
        }
        ("star", DomEventKind::Click) => Some(WidgetAction::ClickStar {
            message_id,
            rating: rating()?,
        }),
        ("comment", DomEventKind::Input) => Some(WidgetAction::Comment {
            message_id,
            text: target.value.unwrap_or_default().to_string(),
        }),
        ("submit-feedback", DomEventKind::Click) => {
            Some(WidgetAction::SubmitFeedback { message_id })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star(rating: &'static str) -> ActionTarget<'static> {
        ActionTarget {
            action: "star",
            message: Some("7"),
            rating: Some(rating),
            value: None,
            pointer_still_inside: false,
        }
    }

    #[test]
    fn star_events_map_to_hover_leave_and_click() {
        let id = MessageId::new(7);

        assert_eq!(
            resolve(DomEventKind::Over, &star("3")),
            Some(WidgetAction::HoverStar {
                message_id: id,
                rating: 3
            })
        );
        assert_eq!(
            resolve(DomEventKind::Out, &star("3")),
            Some(WidgetAction::LeaveStars { message_id: id })
        );
        assert_eq!(
            resolve(DomEventKind::Click, &star("5")),
            Some(WidgetAction::ClickStar {
                message_id: id,
                rating: 5
            })
        );
    }

    #[test]
    fn moving_onto_star_icon_keeps_the_preview() {
        let into_icon = ActionTarget {
            pointer_still_inside: true,
            ..star("4")
        };

        assert_eq!(resolve(DomEventKind::Out, &into_icon), None);
        assert_eq!(
            resolve(DomEventKind::Over, &into_icon),
            Some(WidgetAction::HoverStar {
                message_id: MessageId::new(7),
                rating: 4
            })
        );
    }

    #[test]
    fn malformed_attributes_resolve_to_nothing() {
        assert_eq!(resolve(DomEventKind::Click, &star("five")), None);

        let no_message = ActionTarget {
            message: Some("message-7"),
            ..star("1")
        };
        assert_eq!(resolve(DomEventKind::Click, &no_message), None);
    }

    #[test]
    fn comment_input_carries_textarea_value() {
        let target = ActionTarget {
            action: "comment",
            message: Some("2"),
            rating: None,
            value: Some("needs sources"),
            pointer_still_inside: false,
        };

        assert_eq!(
            resolve(DomEventKind::Input, &target),
            Some(WidgetAction::Comment {
                message_id: MessageId::new(2),
                text: "needs sources".to_string()
            })
        );
        assert_eq!(resolve(DomEventKind::Click, &target), None);
    }

    #[test]
    fn submit_button_only_reacts_to_clicks() {
        let target = ActionTarget {
            action: "submit-feedback",
            message: Some("4"),
            ..ActionTarget::default()
        };

        assert_eq!(
            resolve(DomEventKind::Click, &target),
            Some(WidgetAction::SubmitFeedback {
                message_id: MessageId::new(4)
            })
        );
        assert_eq!(resolve(DomEventKind::Over, &target), None);
    }
}
