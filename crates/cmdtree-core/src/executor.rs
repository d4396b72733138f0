//! Top-level entry point for one registered command tree.
//!
//! [`CommandExecutor`] is where dispatch failures stop being values: they are
//! turned into a user-facing [`Outcome`], and only failures carrying a
//! handler error are logged. It also serves the built-in `<root> help [page]`
//! subcommand; a child of the root labelled `help` takes precedence.

use std::sync::Arc;

use tracing::{debug, error};

use crate::completion;
use crate::config::Config;
use crate::dispatcher;
use crate::error::{Failure, FailureKind};
use crate::grammar::GrammarNode;
use crate::help::{self, HELP_LITERAL, HELP_PAGE_SIZE, HelpEntry, HelpMenu};
use crate::parsers::filter_by_prefix;
use crate::principal::Principal;
use crate::text::{eq_ignore_case, starts_with_ignore_case};
use crate::tree::CommandNode;

/// Response of a top-level invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// A page of the built-in help subcommand.
    Help {
        page: usize,
        total_pages: usize,
        lines: Vec<String>,
    },
    Failed { kind: FailureKind, message: String },
}

impl Outcome {
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// An immutable command tree plus the configuration it runs with.
///
/// Cheap to clone and safe to share across threads.
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    root: Arc<CommandNode>,
    config: Arc<Config>,
    help: Arc<HelpMenu>,
}

impl CommandExecutor {
    pub fn new(root: CommandNode, config: Arc<Config>) -> Self {
        let help = Arc::new(HelpMenu::new(&root));
        Self {
            root: Arc::new(root),
            config,
            help,
        }
    }

    pub fn root(&self) -> &CommandNode {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn help(&self) -> &HelpMenu {
        &self.help
    }

    /// Grammar mirror of the tree, including the built-in help literal.
    pub fn grammar(&self) -> GrammarNode {
        GrammarNode::from_root(&self.root)
    }

    /// Route `tokens` and run the matched handlers, returning the raw failure.
    pub fn dispatch(&self, principal: &dyn Principal, tokens: &[&str]) -> Result<(), Failure> {
        dispatcher::dispatch(&self.root, principal, tokens, &self.config.dispatch)
    }

    /// Suggestions for the last token, the built-in help subcommand included.
    pub fn complete(&self, principal: &dyn Principal, tokens: &[&str]) -> Vec<String> {
        let config = &self.config.completion;
        let hidden = config.respect_permissions && !self.root.is_accessible(principal);

        match self.help_arguments(tokens) {
            Some([partial]) if !hidden => {
                let total = self.help.page(principal, 1, HELP_PAGE_SIZE).total_pages;
                let pages = (1..=total).map(|page| page.to_string()).collect();
                return filter_by_prefix(pages, partial);
            }
            Some([_, ..]) => return Vec::new(),
            _ => {}
        }

        let mut suggestions = completion::complete(&self.root, principal, tokens, config);
        let offers_help_literal = config.suggest_literals
            && !hidden
            && tokens.len() == self.root.label_len() + 1
            && self.root.matches_label(tokens, 0)
            && self.root.find_next_child(tokens, self.root.label_len()).is_none()
            && tokens
                .last()
                .is_some_and(|partial| starts_with_ignore_case(HELP_LITERAL, partial));
        if offers_help_literal && !suggestions.iter().any(|s| s == HELP_LITERAL) {
            suggestions.push(HELP_LITERAL.to_string());
        }
        suggestions
    }

    /// Dispatch and convert any failure into the message shown to the principal.
    pub fn execute(&self, principal: &dyn Principal, tokens: &[&str]) -> Outcome {
        let result = match self.help_arguments(tokens) {
            Some(arguments) => self.show_help(principal, arguments),
            None => self.dispatch(principal, tokens).map(|()| Outcome::Success),
        };
        match result {
            Ok(outcome) => {
                debug!(command = self.root.label(), sender = principal.name(), "command executed");
                outcome
            }
            Err(failure) => {
                if failure.has_runtime_cause() {
                    let cause = failure
                        .cause()
                        .map(ToString::to_string)
                        .unwrap_or_default();
                    error!(
                        command = self.root.label(),
                        sender = principal.name(),
                        arguments = ?tokens,
                        %cause,
                        "error while executing the command"
                    );
                }
                Outcome::Failed {
                    kind: failure.kind(),
                    message: failure.user_message(&self.config.messages),
                }
            }
        }
    }

    /// Tokens after `<root> help`, when `tokens` invoke the built-in help.
    fn help_arguments<'t>(&self, tokens: &'t [&'t str]) -> Option<&'t [&'t str]> {
        let at = self.root.label_len();
        let is_help = self.root.matches_label(tokens, 0)
            && tokens.get(at).is_some_and(|token| eq_ignore_case(token, HELP_LITERAL))
            && self.root.find_next_child(tokens, at).is_none();
        is_help.then(|| &tokens[at + 1..])
    }

    fn show_help(
        &self,
        principal: &dyn Principal,
        arguments: &[&str],
    ) -> Result<Outcome, Failure> {
        if !self.root.permits(principal) {
            return Err(Failure::MissingPermissions {
                permission: self.root.permission().to_string(),
            });
        }
        if !self.root.senders().allows(principal.kind()) {
            return Err(Failure::InvalidSender {
                sender: principal.kind(),
            });
        }
        if self.config.dispatch.reject_trailing_tokens && arguments.len() > 1 {
            return Err(Failure::malformed());
        }

        let parameter = help::page_parameter();
        let requested = if arguments.is_empty() {
            parameter.parse_default_value()
        } else {
            parameter.parse(arguments, 0)
        }
        .map_err(|cause| Failure::MalformedCommand { cause: Some(cause) })?;
        let page = requested
            .as_int()
            .and_then(|page| usize::try_from(page).ok())
            .unwrap_or(1);

        let shown = self.help.page(principal, page, HELP_PAGE_SIZE);
        Ok(Outcome::Help {
            page: shown.page,
            total_pages: shown.total_pages,
            lines: shown.entries.into_iter().map(HelpEntry::line).collect(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CommandError;
    use crate::principal::{GrantedPrincipal, SenderKind};

    fn executor() -> CommandExecutor {
        let root = CommandNode::builder("backup")
            .permission("cmd.backup")
            .handler(|_, _| Ok(()))
            .child(
                CommandNode::builder("restore")
                    .handler(|_, _| Err(CommandError::new("No backup to restore").into())),
            )
            .child(CommandNode::builder("prune").handler(|_, _| anyhow::bail!("disk full")))
            .build()
            .unwrap();
        CommandExecutor::new(root, Arc::new(Config::default()))
    }

    fn operator() -> GrantedPrincipal {
        GrantedPrincipal::new("op", SenderKind::Console).grant("cmd.backup")
    }

    #[test]
    fn success_outcome() {
        assert!(executor().execute(&operator(), &["backup"]).is_success());
    }

    #[test]
    fn failures_become_prefixed_messages() {
        let executor = executor();
        let prefix = &executor.config().messages.prefix;

        let outcome = executor.execute(&operator(), &["backup", "restore"]);
        assert_eq!(
            outcome,
            Outcome::Failed {
                kind: FailureKind::Command,
                message: format!("{prefix}No backup to restore"),
            }
        );

        let outcome = executor.execute(&operator(), &["backup", "prune"]);
        assert_eq!(
            outcome,
            Outcome::Failed {
                kind: FailureKind::RuntimeError,
                message: format!("{prefix}Error while executing the command"),
            }
        );

        let guest = GrantedPrincipal::new("guest", SenderKind::User);
        let outcome = executor.execute(&guest, &["backup"]);
        assert!(matches!(
            outcome,
            Outcome::Failed {
                kind: FailureKind::MissingPermissions,
                ..
            }
        ));
    }

    fn wide_executor() -> CommandExecutor {
        let mut root = CommandNode::builder("kit").handler(|_, _| Ok(()));
        for index in 0..HELP_PAGE_SIZE + 1 {
            root = root.child(CommandNode::builder(&format!("item{index}")).handler(|_, _| Ok(())));
        }
        CommandExecutor::new(root.build().unwrap(), Arc::new(Config::default()))
    }

    #[test]
    fn help_subcommand_lists_visible_paths() {
        let outcome = executor().execute(&operator(), &["backup", "HELP"]);
        assert_eq!(
            outcome,
            Outcome::Help {
                page: 1,
                total_pages: 1,
                lines: vec![
                    "/backup".to_string(),
                    "/backup restore".to_string(),
                    "/backup prune".to_string(),
                ],
            }
        );
    }

    #[test]
    fn help_subcommand_pages_through_entries() {
        let executor = wide_executor();
        let player = GrantedPrincipal::new("steve", SenderKind::User);

        let outcome = executor.execute(&player, &["kit", "help", "2"]);
        let Outcome::Help {
            page,
            total_pages,
            lines,
        } = &outcome
        else {
            panic!("expected a help page, got {outcome:?}");
        };
        assert_eq!((*page, *total_pages), (2, 2));
        assert_eq!(*lines, ["/kit item7", "/kit item8"]);

        for bad in ["0", "two"] {
            let outcome = executor.execute(&player, &["kit", "help", bad]);
            assert!(matches!(
                outcome,
                Outcome::Failed {
                    kind: FailureKind::MalformedCommand,
                    ..
                }
            ));
        }
    }

    #[test]
    fn help_subcommand_requires_root_access() {
        let guest = GrantedPrincipal::new("guest", SenderKind::User);
        let outcome = executor().execute(&guest, &["backup", "help"]);
        assert!(matches!(
            outcome,
            Outcome::Failed {
                kind: FailureKind::MissingPermissions,
                ..
            }
        ));
        assert!(executor().complete(&guest, &["backup", "h"]).is_empty());
    }

    #[test]
    fn help_subcommand_completes_literal_and_pages() {
        let executor = wide_executor();
        let player = GrantedPrincipal::new("steve", SenderKind::User);
        assert_eq!(executor.complete(&player, &["kit", "he"]), ["help"]);
        assert_eq!(executor.complete(&player, &["kit", "help"]), ["help"]);
        assert_eq!(executor.complete(&player, &["kit", "help", ""]), ["1", "2"]);
        assert!(executor.complete(&player, &["kit", "help", "2", ""]).is_empty());
    }

    #[test]
    fn child_labelled_help_takes_precedence() {
        let root = CommandNode::builder("guide")
            .child(
                CommandNode::builder("help")
                    .handler(|_, _| Err(CommandError::new("Read the guide").into())),
            )
            .build()
            .unwrap();
        let executor = CommandExecutor::new(root, Arc::new(Config::default()));
        let outcome = executor.execute(&operator(), &["guide", "help"]);
        assert!(matches!(
            outcome,
            Outcome::Failed {
                kind: FailureKind::Command,
                ..
            }
        ));
    }

    #[test]
    fn grammar_offers_help_literal_on_the_root() {
        let grammar = executor().grammar();
        let names: Vec<&str> = grammar.children().iter().map(GrammarNode::name).collect();
        assert_eq!(names, ["restore", "prune", "help"]);
    }
}
