/// Round-trip conversation log sent back to the backend on every chat call.
///
/// Turns alternate user, bot, user, bot... by position only; the backend
/// assigns roles from index parity. Bot turns are accepted only while a user
/// turn is awaiting its reply (odd length), which keeps that alternation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatHistory {
    turns: Vec<String>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_user(&mut self, text: impl Into<String>) {
        self.turns.push(text.into());
    }

    /// Appends a bot turn when one is awaited. Returns whether it was appended.
    pub fn append_bot(&mut self, text: impl Into<String>) -> bool {
        if !self.awaiting_reply() {
            return false;
        }

        self.turns.push(text.into());
        true
    }

    pub fn awaiting_reply(&self) -> bool {
        self.turns.len() % 2 == 1
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.turns.clone()
    }

    pub fn turns(&self) -> &[String] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_turn_is_dropped_without_pending_user_turn() {
        let mut history = ChatHistory::new();

        assert!(!history.append_bot("greeting"));
        assert!(history.is_empty());

        history.append_user("question");
        assert!(history.awaiting_reply());
        assert!(history.append_bot("answer"));
        assert!(!history.append_bot("second answer"));

        assert_eq!(history.snapshot(), vec!["question", "answer"]);
    }

    #[test]
    fn consecutive_user_turns_shift_parity() {
        let mut history = ChatHistory::new();
        history.append_user("first");
        history.append_user("second");

        // Even length again, so the late reply to "first" is not recorded.
        assert!(!history.append_bot("reply"));
        assert_eq!(history.turns(), ["first", "second"]);
    }
}
