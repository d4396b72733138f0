//! Invoking principals and the authorization predicate.
//!
//! The core never stores permissions; it only asks the principal through
//! [`Principal::has_permission`]. [`GrantedPrincipal`] is an in-memory
//! implementation with wildcard grants, useful for tests and adapters.

use crate::text::{eq_ignore_case, fold};

/// Kind of entity issuing a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SenderKind {
    /// The hosting process itself (server console, scripts).
    Console,
    /// An interactive user.
    #[default]
    User,
    /// Another system acting on behalf of someone (bots, remote calls).
    Remote,
}

/// Entity on whose behalf a command is dispatched or completed.
///
/// Implementations must be safe for concurrent read-only use.
pub trait Principal: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> SenderKind;

    /// Authorization predicate, called once per node on the matched path.
    fn has_permission(&self, permission: &str) -> bool;
}

/// Sender-kind restriction of a command node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SenderFilter {
    #[default]
    Any,
    Only(Vec<SenderKind>),
}

impl SenderFilter {
    pub fn allows(&self, kind: SenderKind) -> bool {
        match self {
            Self::Any => true,
            Self::Only(kinds) => kinds.contains(&kind),
        }
    }
}

/// Principal backed by a fixed list of permission grants.
///
/// Grants match exactly, `*` matches everything and a trailing `.*`
/// matches the prefix and anything below it (`cmd.*` covers `cmd.warn`).
/// Both forms ignore case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantedPrincipal {
    pub name: String,
    pub kind: SenderKind,
    pub grants: Vec<String>,
}

impl GrantedPrincipal {
    pub fn new(name: &str, kind: SenderKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            grants: Vec::new(),
        }
    }

    /// Add a permission grant.
    #[must_use]
    pub fn grant(mut self, permission: &str) -> Self {
        self.grants.push(permission.to_string());
        self
    }
}

impl Principal for GrantedPrincipal {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SenderKind {
        self.kind
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.grants
            .iter()
            .any(|grant| matches_grant(grant, permission))
    }
}

/// Check if a permission grant covers a permission string.
fn matches_grant(grant: &str, permission: &str) -> bool {
    if grant == "*" {
        return true;
    }
    if let Some(prefix) = grant.strip_suffix(".*") {
        let prefix = fold(prefix);
        let permission = fold(permission);
        return permission == prefix
            || permission
                .strip_prefix(&prefix)
                .is_some_and(|rest| rest.starts_with('.'));
    }
    eq_ignore_case(grant, permission)
}
