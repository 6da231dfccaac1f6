//! ChatML transcript builder.
//!
//! Constrained generation works on a single growing prompt. A `Transcript`
//! appends complete turns, or opens a turn whose tail the generator is about
//! to produce and closes it once the answer is known.

use crate::message::{Conversation, Role};

const TURN_START: &str = "<|im_start|>";
const TURN_END: &str = "<|im_end|>";

/// An accumulating ChatML prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    text: String,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a conversation as ChatML.
    ///
    /// User and assistant turns are always kept, system turns only when
    /// `include_system` is set. Messages with empty content are skipped and
    /// trailing whitespace is trimmed.
    pub fn from_conversation(conversation: &Conversation, include_system: bool) -> Self {
        let mut transcript = Self::new();
        for message in &conversation.messages {
            if message.content.is_empty() || (message.role == Role::System && !include_system) {
                continue;
            }
            transcript.push_turn(message.role, &message.content);
        }
        let trimmed = transcript.text.trim_end().len();
        transcript.text.truncate(trimmed);
        transcript
    }

    /// Append a complete turn.
    pub fn push_turn(&mut self, role: Role, content: &str) {
        self.ensure_line_break();
        self.text.push_str(TURN_START);
        self.text.push_str(role.as_str());
        self.text.push('\n');
        self.text.push_str(content);
        self.text.push('\n');
        self.text.push_str(TURN_END);
        self.text.push('\n');
    }

    /// Start a turn whose remainder will be generated. `lead` is the text the
    /// generated answer directly follows.
    pub fn open_turn(&mut self, role: Role, lead: &str) {
        self.ensure_line_break();
        self.text.push_str(TURN_START);
        self.text.push_str(role.as_str());
        self.text.push('\n');
        self.text.push_str(lead);
    }

    /// Record a generated piece and the literal `lead` for the next one,
    /// keeping the turn open.
    pub fn continue_turn(&mut self, generated: &str, lead: &str) {
        self.text.push_str(generated);
        self.text.push_str(lead);
    }

    /// Record the generated `answer` plus a literal `tail`, and close the turn.
    pub fn close_turn(&mut self, answer: &str, tail: &str) {
        self.text.push_str(answer);
        self.text.push_str(tail);
        self.text.push('\n');
        self.text.push_str(TURN_END);
        self.text.push('\n');
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn ensure_line_break(&mut self) {
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
    }
}

/// Render a conversation as a ChatML string.
pub fn to_chatml(conversation: &Conversation, include_system: bool) -> String {
    Transcript::from_conversation(conversation, include_system).text
}

impl std::fmt::Display for Transcript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::PromptMessage;

    #[test]
    fn renders_complete_turns() {
        let mut t = Transcript::new();
        t.push_turn(Role::User, "Hi");
        assert_eq!(t.as_str(), "<|im_start|>user\nHi\n<|im_end|>\n");
    }

    #[test]
    fn open_and_close_turn() {
        let mut t = Transcript::new();
        t.open_turn(Role::User, "Answer: The request is about ");
        assert!(t.as_str().ends_with("user\nAnswer: The request is about "));
        t.close_turn("current weather", ".");
        assert!(t.as_str().ends_with("about current weather.\n<|im_end|>\n"));
    }

    #[test]
    fn conversation_skips_system_unless_requested() {
        let conv = Conversation::from_messages(vec![
            PromptMessage::system("Be terse."),
            PromptMessage::user("What time is it?"),
            PromptMessage::assistant(""),
        ]);

        let without = Transcript::from_conversation(&conv, false);
        assert!(!without.as_str().contains("Be terse."));
        assert_eq!(without.as_str(), "<|im_start|>user\nWhat time is it?\n<|im_end|>");

        let with = Transcript::from_conversation(&conv, true);
        assert!(with.as_str().starts_with("<|im_start|>system\nBe terse."));
    }

    #[test]
    fn chatml_string_matches_transcript() {
        let conv = Conversation::from_messages(vec![PromptMessage::user("hi  \n")]);
        assert_eq!(to_chatml(&conv, true), "<|im_start|>user\nhi  \n\n<|im_end|>");
    }

    #[test]
    fn turn_after_trimmed_prefix_starts_on_new_line() {
        let conv = Conversation::from_messages(vec![PromptMessage::user("hello")]);
        let mut t = Transcript::from_conversation(&conv, true);
        t.push_turn(Role::Assistant, "ok");
        assert!(t.as_str().contains("<|im_end|>\n<|im_start|>assistant"));
    }
}
