//! Optional interactive questions asked before a pipeline runs.
//!
//! Every answer is optional: an empty line, a closed or missing terminal, or
//! an answer that does not parse means "skip this filter".

use console::Term;
use dialoguer::{theme::ColorfulTheme, Input};

/// Source of answers to optional questions.
pub trait Prompter {
    /// Trimmed, non-empty answer to `question`, or `None` when skipped.
    fn ask(&mut self, question: &str) -> Option<String>;
}

/// Asks on the terminal with `dialoguer`. Without a terminal every question
/// is skipped.
pub struct TerminalPrompter {
    theme: ColorfulTheme,
    interactive: bool,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
            interactive: Term::stdout().is_term(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&mut self, question: &str) -> Option<String> {
        if !self.interactive {
            tracing::debug!("No terminal, skipping question: {}", question);
            return None;
        }

        let answer: String = match Input::with_theme(&self.theme)
            .with_prompt(question)
            .allow_empty(true)
            .interact_text()
        {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("Could not read answer: {}", e);
                return None;
            }
        };
        non_empty(&answer)
    }
}

fn non_empty(answer: &str) -> Option<String> {
    let answer = answer.trim();
    (!answer.is_empty()).then(|| answer.to_string())
}

/// Parses a price answer such as `120`, `$120` or `1,250.50`.
pub fn parse_price(answer: &str) -> Option<f64> {
    let cleaned: String = answer
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
        _ => {
            tracing::warn!("Ignoring invalid price '{}', no price bound applied", answer);
            None
        }
    }
}

pub fn ask_price<P: Prompter + ?Sized>(prompter: &mut P, question: &str) -> Option<f64> {
    prompter.ask(question).and_then(|answer| parse_price(&answer))
}

/// Replays canned answers in order, recording every question asked.
#[cfg(test)]
pub(crate) struct ScriptedPrompter {
    answers: std::collections::VecDeque<String>,
    pub asked: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub(crate) fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            asked: Vec::new(),
        }
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &str) -> Option<String> {
        self.asked.push(question.to_string());
        self.answers.pop_front().and_then(|a| non_empty(&a))
    }
}
