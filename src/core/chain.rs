// src/core/chain.rs

use crate::{
    core::prompt::Prompt,
    models::{ChainItem, ChainResult, OptionValue},
};
use anyhow::Result;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("Command '{0}' was not found in the registry. The chain was aborted before running it.")]
    CommandNotFound(String),
}

/// A runnable sub-command, as handed out by the registry.
pub trait Runnable {
    /// Runs the command with pre-resolved arguments and options against the
    /// same interactive surface the parent command is using.
    fn run(
        &self,
        arguments: &[(String, String)],
        options: &[(String, String)],
        io: &mut dyn Prompt,
    ) -> Result<i32>;
}

/// The external command-dispatch collaborator the chain executor consumes.
pub trait CommandRegistry {
    fn find(&self, command_id: &str) -> Option<Box<dyn Runnable + '_>>;
}

/// Runs an ordered queue of sub-command invocations, fail-fast.
///
/// Items are consumed from the front of the queue and removed only after a
/// successful run, so on failure the failed entry and everything behind it
/// are left in place for inspection. Execution is strictly sequential:
/// later items may assume side effects of earlier ones.
pub struct ChainRunner<'a> {
    registry: &'a dyn CommandRegistry,
    explain: bool,
}

impl std::fmt::Debug for ChainRunner<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainRunner")
            .field("registry", &"<dyn CommandRegistry>")
            .field("explain", &self.explain)
            .finish()
    }
}

impl<'a> ChainRunner<'a> {
    pub fn new(registry: &'a dyn CommandRegistry) -> Self {
        Self {
            registry,
            explain: false,
        }
    }

    /// Emit a human-readable trace of every command before running it.
    pub fn with_explain(mut self, explain: bool) -> Self {
        self.explain = explain;
        self
    }

    /// Runs the queue. An unresolvable command is fatal and surfaces as an
    /// error; a failing sub-command is reported through the returned
    /// `ChainResult` instead, with its exit code. No retries either way.
    pub fn run(&self, queue: &mut Vec<ChainItem>, io: &mut dyn Prompt) -> Result<ChainResult> {
        while let Some(item) = queue.first() {
            let runnable = self
                .registry
                .find(&item.command)
                .ok_or_else(|| ChainError::CommandNotFound(item.command.clone()))?;

            // Options explicitly set to empty or false are omitted, not
            // passed through.
            let options: Vec<(String, String)> = item
                .options
                .iter()
                .filter(|(_, value)| !value.is_falsy())
                .map(|(name, value)| {
                    let rendered = match value {
                        OptionValue::Flag(_) => String::new(),
                        OptionValue::Value(text) => text.clone(),
                    };
                    (name.clone(), rendered)
                })
                .collect();

            if self.explain {
                io.comment(&format!("Executing command: {}", render_trace(item, &options)));
            }
            log::debug!(
                "Chain: running '{}' with {} argument(s), {} option(s).",
                item.command,
                item.arguments.len(),
                options.len()
            );

            let exit_code = runnable.run(&item.arguments, &options, io)?;
            if exit_code != 0 {
                log::debug!(
                    "Chain: '{}' exited with code {}; {} item(s) left unconsumed.",
                    item.command,
                    exit_code,
                    queue.len()
                );
                return Ok(ChainResult { exit_code });
            }

            // Remove from queue.
            queue.remove(0);
        }
        Ok(ChainResult { exit_code: 0 })
    }
}

fn render_trace(item: &ChainItem, options: &[(String, String)]) -> String {
    let mut trace = item.command.clone();
    for (_, value) in &item.arguments {
        trace.push(' ');
        trace.push_str(value);
    }
    for (name, value) in options {
        trace.push_str(" --");
        trace.push_str(name);
        if !value.is_empty() {
            trace.push(' ');
            trace.push_str(value);
        }
    }
    trace
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::prompt::ScriptedPrompt;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct StubRegistry {
        exit_codes: HashMap<String, i32>,
        ran: RefCell<Vec<String>>,
        seen_options: RefCell<Vec<Vec<(String, String)>>>,
    }

    impl StubRegistry {
        fn with(commands: &[(&str, i32)]) -> Self {
            Self {
                exit_codes: commands
                    .iter()
                    .map(|(name, code)| (name.to_string(), *code))
                    .collect(),
                ..Self::default()
            }
        }
    }

    struct StubRunnable<'r> {
        id: String,
        registry: &'r StubRegistry,
    }

    impl Runnable for StubRunnable<'_> {
        fn run(
            &self,
            _arguments: &[(String, String)],
            options: &[(String, String)],
            _io: &mut dyn Prompt,
        ) -> Result<i32> {
            self.registry.ran.borrow_mut().push(self.id.clone());
            self.registry.seen_options.borrow_mut().push(options.to_vec());
            Ok(*self.registry.exit_codes.get(&self.id).unwrap_or(&0))
        }
    }

    impl CommandRegistry for StubRegistry {
        fn find(&self, command_id: &str) -> Option<Box<dyn Runnable + '_>> {
            if !self.exit_codes.contains_key(command_id) {
                return None;
            }
            Some(Box::new(StubRunnable {
                id: command_id.to_string(),
                registry: self,
            }))
        }
    }

    fn item(command: &str) -> ChainItem {
        ChainItem {
            command: command.to_string(),
            arguments: Vec::new(),
            options: Vec::new(),
        }
    }

    #[test]
    fn test_all_items_succeed_and_empty_the_queue() {
        let registry = StubRegistry::with(&[("a", 0), ("b", 0), ("c", 0)]);
        let mut queue = vec![item("a"), item("b"), item("c")];

        let result = ChainRunner::new(&registry)
            .run(&mut queue, &mut ScriptedPrompt::new())
            .unwrap();

        assert!(result.success());
        assert!(queue.is_empty());
        assert_eq!(*registry.ran.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_failure_aborts_and_leaves_remaining_items_queued() {
        let registry = StubRegistry::with(&[("a", 0), ("b", 3), ("c", 0)]);
        let mut queue = vec![item("a"), item("b"), item("c")];

        let result = ChainRunner::new(&registry)
            .run(&mut queue, &mut ScriptedPrompt::new())
            .unwrap();

        assert_eq!(result.exit_code, 3);
        // The failed item and everything behind it stay in the queue.
        let remaining: Vec<&str> = queue.iter().map(|i| i.command.as_str()).collect();
        assert_eq!(remaining, vec!["b", "c"]);
        // The third command was never invoked.
        assert_eq!(*registry.ran.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn test_unknown_command_is_fatal_before_running_anything() {
        let registry = StubRegistry::with(&[("a", 0)]);
        let mut queue = vec![item("missing"), item("a")];

        let err = ChainRunner::new(&registry)
            .run(&mut queue, &mut ScriptedPrompt::new())
            .unwrap_err();

        assert!(err.to_string().contains("'missing'"));
        assert_eq!(queue.len(), 2);
        assert!(registry.ran.borrow().is_empty());
    }

    #[test]
    fn test_falsy_options_are_dropped() {
        let registry = StubRegistry::with(&[("a", 0)]);
        let mut queue = vec![ChainItem {
            command: "a".to_string(),
            arguments: vec![("target".to_string(), "blog".to_string())],
            options: vec![
                ("verbose".to_string(), OptionValue::Flag(true)),
                ("quiet".to_string(), OptionValue::Flag(false)),
                ("tag".to_string(), OptionValue::Value("v1".to_string())),
                ("note".to_string(), OptionValue::Value(String::new())),
            ],
        }];

        ChainRunner::new(&registry)
            .run(&mut queue, &mut ScriptedPrompt::new())
            .unwrap();

        let seen = registry.seen_options.borrow();
        assert_eq!(
            seen.first().unwrap(),
            &vec![
                ("verbose".to_string(), String::new()),
                ("tag".to_string(), "v1".to_string()),
            ]
        );
    }

    #[test]
    fn test_explain_mode_traces_through_the_shared_surface() {
        let registry = StubRegistry::with(&[("a", 0)]);
        let mut queue = vec![ChainItem {
            command: "a".to_string(),
            arguments: vec![("target".to_string(), "blog".to_string())],
            options: vec![("tag".to_string(), OptionValue::Value("v1".to_string()))],
        }];

        let mut io = ScriptedPrompt::new();
        ChainRunner::new(&registry)
            .with_explain(true)
            .run(&mut queue, &mut io)
            .unwrap();

        assert!(io.was_asked("Executing command: a blog --tag v1"));

        // Without explain, nothing is traced.
        let mut io = ScriptedPrompt::new();
        let mut queue = vec![item("a")];
        ChainRunner::new(&registry).run(&mut queue, &mut io).unwrap();
        assert!(io.asked.is_empty());
    }

    #[test]
    fn test_runner_is_debuggable_over_any_registry() {
        let registry = StubRegistry::with(&[("a", 0)]);
        let runner = ChainRunner::new(&registry).with_explain(true);
        let rendered = format!("{runner:?}");
        assert!(rendered.contains("ChainRunner"));
        assert!(rendered.contains("explain: true"));
    }
}
