//! Terminal-backed collaborators.
//!
//! [`TerminalChooser`] shows a numbered menu on stderr and reads the answer
//! from stdin. [`TerminalGenerator`] puts the user in the generator's seat,
//! which lets the screening dialogue and the structured assembler run
//! without a model server.

use async_trait::async_trait;
use std::io::{BufRead, Write};
use toolwise_core::chooser::{ChoiceRequest, Chooser};
use toolwise_core::error::{ChooserError, InferenceError};
use toolwise_core::inference::ConstrainedGenerator;
use toolwise_core::transcript::Transcript;

const CANCEL_WORDS: &[&str] = &["q", "quit", "cancel", ".cancel", ".exit"];

/// How a typed answer maps onto a menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAnswer {
    Chosen(String),
    Cancelled,
    Invalid,
}

/// Interpret `input` against `options`: empty takes the default, a number
/// is a 1-based position, otherwise the text must match an option exactly.
pub fn parse_menu_answer(input: &str, options: &[String], default: Option<&str>) -> MenuAnswer {
    let input = input.trim();
    if input.is_empty() {
        return match default {
            Some(d) if options.iter().any(|o| o == d) => MenuAnswer::Chosen(d.to_string()),
            _ => MenuAnswer::Invalid,
        };
    }
    if CANCEL_WORDS.contains(&input.to_lowercase().as_str()) {
        return MenuAnswer::Cancelled;
    }
    if let Ok(position) = input.parse::<usize>() {
        return match position.checked_sub(1).and_then(|i| options.get(i)) {
            Some(option) => MenuAnswer::Chosen(option.clone()),
            None => MenuAnswer::Invalid,
        };
    }
    match options.iter().find(|o| o.as_str() == input) {
        Some(option) => MenuAnswer::Chosen(option.clone()),
        None => MenuAnswer::Invalid,
    }
}

/// Read one line; `None` on end of input.
fn read_line() -> std::io::Result<Option<String>> {
    let mut line = String::new();
    let read = std::io::stdin().lock().read_line(&mut line)?;
    Ok((read > 0).then_some(line))
}

fn print_menu(options: &[String], labels: &[String], default: Option<&str>) -> std::io::Result<()> {
    let mut err = std::io::stderr().lock();
    for (i, option) in options.iter().enumerate() {
        let label = labels.get(i).unwrap_or(option);
        let marker = if Some(option.as_str()) == default { " (default)" } else { "" };
        writeln!(err, "  {}. {label}{marker}", i + 1)?;
    }
    Ok(())
}

/// Numbered menu on the terminal.
pub struct TerminalChooser;

impl Chooser for TerminalChooser {
    fn choose(&self, request: &ChoiceRequest) -> Result<Option<String>, ChooserError> {
        if request.options.is_empty() {
            return Err(ChooserError::NoOptions);
        }
        eprintln!("\n{}", request.title);
        print_menu(&request.options, &request.descriptions, Some(request.default.as_str()))?;

        loop {
            eprint!("{} ", request.prompt);
            std::io::stderr().flush()?;
            let Some(line) = read_line()? else {
                return Ok(None);
            };
            match parse_menu_answer(&line, &request.options, Some(request.default.as_str())) {
                MenuAnswer::Chosen(option) => return Ok(Some(option)),
                MenuAnswer::Cancelled => return Ok(None),
                MenuAnswer::Invalid => eprintln!("Please enter a number between 1 and {}.", request.options.len()),
            }
        }
    }
}

/// The last user turn of a transcript, which holds the pending question.
pub fn pending_question(transcript: &Transcript) -> &str {
    const USER_TURN: &str = "<|im_start|>user\n";
    let text = transcript.as_str();
    let Some(start) = text.rfind(USER_TURN) else {
        return "";
    };
    let turn = &text[start + USER_TURN.len()..];
    turn.split("<|im_end|>").next().unwrap_or(turn).trim_end()
}

/// The user answers in place of a model.
pub struct TerminalGenerator;

#[async_trait]
impl ConstrainedGenerator for TerminalGenerator {
    fn name(&self) -> &str {
        "terminal"
    }

    async fn choose_one(&self, transcript: &Transcript, options: &[String]) -> Result<String, InferenceError> {
        let question = pending_question(transcript).to_string();
        let options = options.to_vec();
        tokio::task::spawn_blocking(move || -> Result<String, InferenceError> {
            eprintln!("\n{question}");
            print_menu(&options, &options, None).map_err(io_failure)?;
            loop {
                eprint!("> ");
                std::io::stderr().flush().map_err(io_failure)?;
                let line = read_line()
                    .map_err(io_failure)?
                    .ok_or_else(|| InferenceError::Unavailable("stdin closed".into()))?;
                match parse_menu_answer(&line, &options, None) {
                    MenuAnswer::Chosen(option) => return Ok(option),
                    MenuAnswer::Cancelled => {
                        return Err(InferenceError::Unavailable("answer cancelled".into()));
                    }
                    MenuAnswer::Invalid => eprintln!("Please pick one of the listed options."),
                }
            }
        })
        .await
        .map_err(|e| InferenceError::Backend(e.to_string()))?
    }

    async fn generate_free_text(&self, transcript: &Transcript, stop_marker: &str) -> Result<String, InferenceError> {
        let question = pending_question(transcript).to_string();
        let stop_marker = stop_marker.to_string();
        tokio::task::spawn_blocking(move || -> Result<String, InferenceError> {
            eprintln!("\n{question}");
            eprint!("(text ends at '{stop_marker}' or end of line) > ");
            std::io::stderr().flush().map_err(io_failure)?;
            let line = read_line()
                .map_err(io_failure)?
                .ok_or_else(|| InferenceError::Unavailable("stdin closed".into()))?;
            Ok(line.trim_end_matches(['\r', '\n']).to_string())
        })
        .await
        .map_err(|e| InferenceError::Backend(e.to_string()))?
    }
}

fn io_failure(e: std::io::Error) -> InferenceError {
    InferenceError::Backend(format!("terminal I/O failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolwise_core::message::Role;

    fn options() -> Vec<String> {
        vec!["0".into(), "1".into(), "2".into()]
    }

    #[test]
    fn empty_input_takes_default() {
        assert_eq!(parse_menu_answer("\n", &options(), Some("0")), MenuAnswer::Chosen("0".into()));
        assert_eq!(parse_menu_answer("", &options(), None), MenuAnswer::Invalid);
    }

    #[test]
    fn numbers_are_one_based() {
        assert_eq!(parse_menu_answer("3", &options(), None), MenuAnswer::Chosen("2".into()));
        assert_eq!(parse_menu_answer("0", &options(), None), MenuAnswer::Invalid);
        assert_eq!(parse_menu_answer("4", &options(), None), MenuAnswer::Invalid);
    }

    #[test]
    fn text_and_cancel() {
        let labels = vec!["question".to_string(), "command".to_string()];
        assert_eq!(parse_menu_answer("command", &labels, None), MenuAnswer::Chosen("command".into()));
        assert_eq!(parse_menu_answer("Quit", &labels, None), MenuAnswer::Cancelled);
        assert_eq!(parse_menu_answer("poem", &labels, None), MenuAnswer::Invalid);
    }

    #[test]
    fn pending_question_of_open_turn() {
        let mut t = Transcript::new();
        t.push_turn(Role::User, "intro");
        t.push_turn(Role::Assistant, "ok");
        t.open_turn(Role::User, "Question: What kind?\nAnswer: It is ");
        assert_eq!(pending_question(&t), "Question: What kind?\nAnswer: It is");
    }

    #[test]
    fn pending_question_of_closed_turn() {
        let mut t = Transcript::new();
        t.push_turn(Role::User, "Question: Which city?");
        t.open_turn(Role::Assistant, "Answer: ");
        assert_eq!(pending_question(&t), "Question: Which city?");
    }
}
