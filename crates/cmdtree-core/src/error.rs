//! Error types for the cmdtree core library.

use std::fmt;

use thiserror::Error;

use crate::config::MessageConfig;
use crate::principal::SenderKind;

/// Result type alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-level errors outside of dispatch (configuration, logging setup).
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Tracing subscriber could not be installed
    #[error("Tracing initialisation failed: {0}")]
    Tracing(String),
}

/// A token could not be converted by a parameter parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The token is not a valid value of the expected type.
    #[error("'{token}' is not a valid {expected}")]
    InvalidValue { token: String, expected: String },

    /// The token parsed, but falls outside the parser's bounds.
    #[error("'{token}' is out of range [{min}, {max}]")]
    OutOfRange {
        token: String,
        min: String,
        max: String,
    },

    /// No token exists at the requested offset.
    #[error("missing input at position {offset}")]
    MissingInput { offset: usize },
}

impl ParseError {
    pub fn invalid(token: &str, expected: impl Into<String>) -> Self {
        Self::InvalidValue {
            token: token.to_string(),
            expected: expected.into(),
        }
    }

    pub fn out_of_range(token: &str, min: impl fmt::Display, max: impl fmt::Display) -> Self {
        Self::OutOfRange {
            token: token.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }
}

/// Tree validation failures raised while building command nodes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("command label must not be empty")]
    EmptyLabel,

    #[error("node '{parent}' declares child '{label}' more than once")]
    DuplicateChild { parent: String, label: String },

    #[error("node '{node}' declares parameter '{label}' more than once")]
    DuplicateParameter { node: String, label: String },

    #[error("greedy parameter '{parameter}' of node '{node}' must be the last parameter")]
    GreedyNotLast { node: String, parameter: String },

    #[error("default value of parameter '{parameter}' on node '{node}' is invalid: {source}")]
    InvalidDefault {
        node: String,
        parameter: String,
        #[source]
        source: ParseError,
    },

    #[error("node '{node}' is neither executable nor has children")]
    UnreachableLeaf { node: String },

    #[error("a command rooted at '{0}' is already registered")]
    DuplicateRoot(String),
}

/// Explicit user-facing failure raised from a command handler.
///
/// Handlers return `anyhow::Result<()>`; returning this error makes the
/// dispatcher show `message` verbatim instead of the generic runtime error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CommandError {
    pub message: String,
}

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Kind of a dispatch [`Failure`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    MalformedCommand,
    MissingPermissions,
    InvalidSender,
    RuntimeError,
    Command,
}

/// Reason a dispatch walk was aborted.
#[derive(Debug, Error)]
pub enum Failure {
    /// Required input missing, unparseable, or not routable.
    #[error("malformed command")]
    MalformedCommand { cause: Option<ParseError> },

    /// The principal lacks the permission of a node on the path.
    #[error("missing permission '{permission}'")]
    MissingPermissions { permission: String },

    /// The principal's kind is not allowed on a node on the path.
    #[error("sender kind {sender:?} is not allowed")]
    InvalidSender { sender: SenderKind },

    /// A handler failed unexpectedly.
    #[error("runtime error: {0}")]
    Runtime(anyhow::Error),

    /// A handler raised a [`CommandError`].
    #[error("{0}")]
    Command(String),
}

impl Failure {
    pub const fn malformed() -> Self {
        Self::MalformedCommand { cause: None }
    }

    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::MalformedCommand { .. } => FailureKind::MalformedCommand,
            Self::MissingPermissions { .. } => FailureKind::MissingPermissions,
            Self::InvalidSender { .. } => FailureKind::InvalidSender,
            Self::Runtime(_) => FailureKind::RuntimeError,
            Self::Command(_) => FailureKind::Command,
        }
    }

    /// Diagnostic cause, never meant to be shown to the invoking principal.
    pub fn cause(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MalformedCommand { cause: Some(cause) } => Some(cause),
            Self::Runtime(err) => Some(&**err),
            _ => None,
        }
    }

    /// True for failures worth logging: the ones raised by a handler error.
    pub const fn has_runtime_cause(&self) -> bool {
        matches!(self, Self::Runtime(_))
    }

    /// Message shown to the invoking principal, prefixed per `messages`.
    pub fn user_message(&self, messages: &MessageConfig) -> String {
        let body = match self {
            Self::MalformedCommand { .. } => messages.malformed_command.as_str(),
            Self::MissingPermissions { .. } => messages.missing_permissions.as_str(),
            Self::InvalidSender { .. } => messages.invalid_sender.as_str(),
            Self::Runtime(_) => messages.runtime_error.as_str(),
            Self::Command(message) => message.as_str(),
        };
        format!("{}{body}", messages.prefix)
    }
}
