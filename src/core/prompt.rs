// src/core/prompt.rs

use anyhow::Result;

/// The interactive surface the resolution engine and the chain executor talk
/// to. The core only calls this port; the CLI edge supplies a
/// `dialoguer`-backed implementation and tests use a scripted double.
///
/// Every method may block indefinitely waiting for user input. That is the
/// only suspension point of the resolution engine.
pub trait Prompt {
    /// Asks a regular question. An empty answer falls back to `default`;
    /// with no default the implementation keeps asking until it gets a
    /// non-empty answer.
    fn ask(&mut self, question: &str, default: Option<&str>) -> Result<String>;

    /// Asks a question where an empty answer is a deliberate empty value.
    fn ask_empty(&mut self, question: &str, default: Option<&str>) -> Result<String>;

    /// Asks for a secret through hidden input. An empty answer is accepted.
    fn ask_secret(&mut self, question: &str) -> Result<String>;

    /// Offers a closed selection list and returns the chosen item.
    fn choice(&mut self, question: &str, items: &[String], default_index: usize) -> Result<String>;

    /// Emits a side-band informational line on the same surface (used by the
    /// chain executor's explain mode).
    fn comment(&mut self, message: &str);
}

/// A scripted `Prompt` for tests: canned answers in, a transcript of every
/// question out. An exhausted script accepts the offered default, which keeps
/// most test setups to a handful of lines.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: std::collections::VecDeque<Option<String>>,
    pub asked: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an explicit answer for the next question.
    pub fn answer(mut self, value: &str) -> Self {
        self.answers.push_back(Some(value.to_string()));
        self
    }

    /// Queues "press enter": the next question resolves to its default.
    pub fn accept_default(mut self) -> Self {
        self.answers.push_back(None);
        self
    }

    pub fn was_asked(&self, fragment: &str) -> bool {
        self.asked.iter().any(|q| q.contains(fragment))
    }

    fn next_answer(&mut self) -> Option<String> {
        self.answers.pop_front().flatten()
    }
}

#[cfg(test)]
impl Prompt for ScriptedPrompt {
    fn ask(&mut self, question: &str, default: Option<&str>) -> Result<String> {
        self.asked.push(question.to_string());
        Ok(self
            .next_answer()
            .or_else(|| default.map(String::from))
            .unwrap_or_default())
    }

    fn ask_empty(&mut self, question: &str, default: Option<&str>) -> Result<String> {
        self.asked.push(question.to_string());
        Ok(self
            .next_answer()
            .or_else(|| default.map(String::from))
            .unwrap_or_default())
    }

    fn ask_secret(&mut self, question: &str) -> Result<String> {
        self.asked.push(question.to_string());
        Ok(self.next_answer().unwrap_or_default())
    }

    fn choice(&mut self, question: &str, items: &[String], default_index: usize) -> Result<String> {
        self.asked.push(question.to_string());
        match self.next_answer() {
            Some(label) => {
                assert!(
                    items.contains(&label),
                    "scripted answer '{label}' is not one of the offered items: {items:?}"
                );
                Ok(label)
            }
            None => Ok(items.get(default_index).cloned().unwrap_or_default()),
        }
    }

    fn comment(&mut self, message: &str) {
        self.asked.push(format!("[comment] {message}"));
    }
}
