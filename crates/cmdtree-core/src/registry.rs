//! Registry of command trees keyed by their first label word.
//!
//! Takes raw command lines, tokenizes them on whitespace and hands them to
//! the executor owning the first word.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::BuildError;
use crate::executor::{CommandExecutor, Outcome};
use crate::help::{self, HelpPage};
use crate::principal::Principal;
use crate::text;
use crate::tree::CommandNode;

#[derive(Debug, Default)]
pub struct CommandRegistry {
    config: Arc<Config>,
    executors: BTreeMap<String, CommandExecutor>,
}

impl CommandRegistry {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            executors: BTreeMap::new(),
        }
    }

    /// Register a command tree under the first word of its root label.
    pub fn register(&mut self, root: CommandNode) -> Result<&CommandExecutor, BuildError> {
        let key = root_key(root.label());
        if self.executors.contains_key(&key) {
            return Err(BuildError::DuplicateRoot(key));
        }
        info!(command = root.label(), "registering command");
        let executor = CommandExecutor::new(root, Arc::clone(&self.config));
        Ok(self.executors.entry(key).or_insert(executor))
    }

    /// Remove the command rooted at `name`; returns whether one existed.
    pub fn unregister(&mut self, name: &str) -> bool {
        let removed = self.executors.remove(&text::fold(name)).is_some();
        if removed {
            info!(command = name, "unregistered command");
        }
        removed
    }

    pub fn get(&self, name: &str) -> Option<&CommandExecutor> {
        self.executors.get(&text::fold(name))
    }

    pub fn executors(&self) -> impl Iterator<Item = &CommandExecutor> {
        self.executors.values()
    }

    /// One page over the help entries of every registered command.
    pub fn help_page(
        &self,
        principal: &dyn Principal,
        page: usize,
        page_size: usize,
    ) -> HelpPage<'_> {
        let entries = self
            .executors
            .values()
            .flat_map(|executor| executor.help().entries());
        help::paginate(entries, principal, page, page_size)
    }

    /// Execute a raw command line. `None` when no command owns its first word.
    pub fn execute_line(&self, principal: &dyn Principal, line: &str) -> Option<Outcome> {
        let tokens = tokenize(line);
        let Some(executor) = tokens.first().and_then(|first| self.get(first)) else {
            debug!(line, "no command registered for input");
            return None;
        };
        Some(executor.execute(principal, &tokens))
    }

    /// Suggestions for the word under the cursor at the end of `line`.
    ///
    /// A line ending in whitespace (or an empty line) completes an empty
    /// partial token.
    pub fn complete_line(&self, principal: &dyn Principal, line: &str) -> Vec<String> {
        let mut tokens = tokenize(line);
        if line.is_empty() || line.ends_with(char::is_whitespace) {
            tokens.push("");
        }

        if tokens.len() == 1 {
            let mut suggestions: Vec<String> = Vec::new();
            for executor in self.executors.values() {
                for suggestion in executor.complete(principal, &tokens) {
                    if !suggestions.contains(&suggestion) {
                        suggestions.push(suggestion);
                    }
                }
            }
            return suggestions;
        }

        self.get(tokens[0])
            .map(|executor| executor.complete(principal, &tokens))
            .unwrap_or_default()
    }
}

fn root_key(label: &str) -> String {
    text::fold(label.split_whitespace().next().unwrap_or_default())
}

/// Split a raw line into whitespace-separated tokens.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}
