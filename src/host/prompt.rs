//! User prompts: interactive console and a recording prompt for scripted runs

use std::collections::VecDeque;
use std::io::{BufRead, Write};
use tracing::{error, warn};

use super::UserPrompt;

/// Terminal prompt. Questions read a `y`/`n` answer from stdin unless
/// `assume_yes` is set.
#[derive(Debug, Clone, Default)]
pub struct ConsolePrompt {
    pub assume_yes: bool,
}

impl ConsolePrompt {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl UserPrompt for ConsolePrompt {
    fn confirm(&mut self, title: &str, message: &str) -> bool {
        if self.assume_yes {
            warn!(title, "{} (assumed yes)", message);
            return true;
        }

        ask(
            &mut std::io::stdin().lock(),
            &mut std::io::stderr().lock(),
            title,
            message,
        )
    }

    fn error(&mut self, title: &str, message: &str) {
        error!(title, "{}", message);
    }

    fn warning(&mut self, title: &str, message: &str) {
        warn!(title, "{}", message);
    }
}

/// Write a y/N question and read the answer. A question that cannot be
/// written is still asked; an unreadable answer counts as no.
fn ask(input: &mut impl BufRead, output: &mut impl Write, title: &str, message: &str) -> bool {
    if let Err(e) = write!(output, "[{title}] {message} [y/N] ").and_then(|()| output.flush()) {
        warn!(error = %e, "Could not write question");
    }

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(e) => {
            warn!(error = %e, "Could not read answer, treating as no");
            false
        }
    }
}

/// Kind of message a prompt was shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Confirm,
    Error,
    Warning,
}

/// Non-interactive prompt that answers questions from a queue and remembers
/// everything it was shown. Unanswered questions get `default_answer`.
#[derive(Debug, Clone, Default)]
pub struct RecordingPrompt {
    pub answers: VecDeque<bool>,
    pub default_answer: bool,
    pub shown: Vec<(PromptKind, String)>,
}

impl RecordingPrompt {
    pub fn answering(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn messages(&self, kind: PromptKind) -> Vec<&str> {
        self.shown
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, m)| m.as_str())
            .collect()
    }
}

impl UserPrompt for RecordingPrompt {
    fn confirm(&mut self, _title: &str, message: &str) -> bool {
        self.shown.push((PromptKind::Confirm, message.to_string()));
        self.answers.pop_front().unwrap_or(self.default_answer)
    }

    fn error(&mut self, _title: &str, message: &str) {
        self.shown.push((PromptKind::Error, message.to_string()));
    }

    fn warning(&mut self, _title: &str, message: &str) {
        self.shown.push((PromptKind::Warning, message.to_string()));
    }
}
