//! The command tree: immutable [`CommandNode`]s produced by [`NodeBuilder`].
//!
//! A node is selected by its literal label (one or more words, matched
//! case-insensitively against consecutive tokens), then binds its parameters
//! positionally, then either runs its handler, routes to a child, or both.

mod builder;

use std::fmt;
use std::sync::Arc;

use crate::context::InvocationContext;
use crate::parsers::{ParameterParser, Value};
use crate::principal::{Principal, SenderFilter};
use crate::text::eq_ignore_case;

pub use builder::NodeBuilder;

/// Callable bound to a node, invoked with the context and this node's own
/// parsed parameter values in declaration order.
///
/// Return a [`CommandError`](crate::error::CommandError) for a failure whose
/// message should reach the principal verbatim.
pub type Handler =
    Arc<dyn Fn(&mut InvocationContext<'_>, &[Value]) -> anyhow::Result<()> + Send + Sync>;

/// One node of a command tree.
pub struct CommandNode {
    label: String,
    words: Vec<String>,
    permission: String,
    description: String,
    senders: SenderFilter,
    parameters: Vec<ParameterParser>,
    children: Vec<CommandNode>,
    executable: bool,
    handler: Option<Handler>,
}

impl CommandNode {
    pub fn builder(label: &str) -> NodeBuilder {
        NodeBuilder::new(label)
    }

    /// Label words joined by single spaces.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn label_words(&self) -> &[String] {
        &self.words
    }

    /// Number of tokens the label consumes.
    pub fn label_len(&self) -> usize {
        self.words.len()
    }

    /// Required permission; empty means none.
    pub fn permission(&self) -> &str {
        &self.permission
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub const fn senders(&self) -> &SenderFilter {
        &self.senders
    }

    pub fn parameters(&self) -> &[ParameterParser] {
        &self.parameters
    }

    pub fn children(&self) -> &[Self] {
        &self.children
    }

    pub const fn is_executable(&self) -> bool {
        self.executable
    }

    pub const fn handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }

    /// Whether the principal holds this node's permission.
    pub fn permits(&self, principal: &dyn Principal) -> bool {
        self.permission.is_empty() || principal.has_permission(&self.permission)
    }

    /// Whether the principal passes both the permission and sender checks.
    pub fn is_accessible(&self, principal: &dyn Principal) -> bool {
        self.permits(principal) && self.senders.allows(principal.kind())
    }

    /// Whether every label word matches `tokens` from `offset` on.
    pub fn matches_label(&self, tokens: &[&str], offset: usize) -> bool {
        match tokens.get(offset..offset + self.words.len()) {
            Some(window) => self
                .words
                .iter()
                .zip(window)
                .all(|(word, token)| eq_ignore_case(word, token)),
            None => false,
        }
    }

    /// First child whose full label matches at `offset`.
    pub fn find_next_child(&self, tokens: &[&str], offset: usize) -> Option<&Self> {
        find_next_child(&self.children, tokens, offset)
    }
}

/// First node in declaration order whose full label matches at `offset`.
pub fn find_next_child<'a>(
    candidates: &'a [CommandNode],
    tokens: &[&str],
    offset: usize,
) -> Option<&'a CommandNode> {
    if offset >= tokens.len() {
        return None;
    }
    candidates
        .iter()
        .find(|candidate| candidate.matches_label(tokens, offset))
}

impl fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNode")
            .field("label", &self.label)
            .field("permission", &self.permission)
            .field("senders", &self.senders)
            .field("parameters", &self.parameters)
            .field("executable", &self.executable)
            .field("has_handler", &self.handler.is_some())
            .field("children", &self.children)
            .finish()
    }
}
