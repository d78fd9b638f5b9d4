// src/cli/prompt.rs

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Input, Password, Select, theme::ColorfulTheme};

use crate::core::prompt::Prompt;

/// The `dialoguer`-backed prompt used by the real binary. All interactive
/// input funnels through this type so handlers and the core never talk to
/// the terminal directly.
#[derive(Debug, Default)]
pub struct ConsolePrompt;

impl ConsolePrompt {
    pub fn new() -> Self {
        Self
    }
}

impl Prompt for ConsolePrompt {
    fn ask(&mut self, question: &str, default: Option<&str>) -> Result<String> {
        let theme = ColorfulTheme::default();
        let mut input = Input::<String>::with_theme(&theme).with_prompt(question);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        Ok(input.interact_text()?)
    }

    fn ask_empty(&mut self, question: &str, default: Option<&str>) -> Result<String> {
        let theme = ColorfulTheme::default();
        let mut input = Input::<String>::with_theme(&theme)
            .with_prompt(question)
            .allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        Ok(input.interact_text()?)
    }

    fn ask_secret(&mut self, question: &str) -> Result<String> {
        let theme = ColorfulTheme::default();
        Ok(Password::with_theme(&theme)
            .with_prompt(question)
            .allow_empty_password(true)
            .interact()?)
    }

    fn choice(&mut self, question: &str, items: &[String], default_index: usize) -> Result<String> {
        let theme = ColorfulTheme::default();
        let selection = Select::with_theme(&theme)
            .with_prompt(question)
            .items(items)
            .default(default_index)
            .interact()?;
        Ok(items.get(selection).cloned().unwrap_or_default())
    }

    fn comment(&mut self, message: &str) {
        println!("{}", message.dimmed());
    }
}
