//! Parameter parsers: token(s) in, typed [`Value`] out.
//!
//! A [`ParameterParser`] couples a label and an optional default value with a
//! [`ParserKind`], the tagged variant deciding how tokens are converted,
//! which completions are offered and how the parameter is mirrored into an
//! external grammar. Parsers are immutable once built and shared read-only.

mod kinds;
mod value;

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::error::ParseError;
use crate::grammar::ArgumentType;
use crate::principal::Principal;
use crate::text::starts_with_ignore_case;

pub use value::Value;

/// User-defined parser plugged in through [`ParserKind::Custom`].
pub trait CustomParser: fmt::Debug + Send + Sync {
    /// Human-readable type name, used in descriptors and parse errors.
    fn type_name(&self) -> &str;

    /// Convert one token (or, when greedy, the space-joined remainder).
    fn parse(&self, input: &str) -> Result<Value, ParseError>;

    /// Unfiltered completion candidates for `partial`.
    fn suggestions(&self, _principal: &dyn Principal, _partial: &str) -> Vec<String> {
        Vec::new()
    }

    /// Whether the parser consumes every remaining token.
    fn is_greedy(&self) -> bool {
        false
    }

    fn argument_type(&self) -> ArgumentType {
        if self.is_greedy() {
            ArgumentType::GreedyString
        } else {
            ArgumentType::Word
        }
    }
}

/// How a parameter converts its input.
#[derive(Debug, Clone)]
pub enum ParserKind {
    Integer { min: i32, max: i32 },
    Long { min: i64, max: i64 },
    Float { min: f32, max: f32 },
    Double { min: f64, max: f64 },
    Bool,
    /// A single token, taken as-is.
    String,
    /// Greedy: every remaining token joined by single spaces.
    Message,
    /// A single token that must equal one of the options (case-insensitive).
    Choice(Vec<String>),
    Custom(Arc<dyn CustomParser>),
}

impl ParserKind {
    pub fn is_greedy(&self) -> bool {
        match self {
            Self::Message => true,
            Self::Custom(custom) => custom.is_greedy(),
            _ => false,
        }
    }
}

/// Help-facing description of a parameter. Never consulted by routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserDescriptor {
    pub name: String,
    pub help: String,
    /// `"none"` when the parameter is required.
    pub default_hint: String,
}

/// One positional parameter of a command node.
#[derive(Debug, Clone)]
pub struct ParameterParser {
    label: String,
    default_value: String,
    kind: ParserKind,
    description: Option<String>,
}

impl ParameterParser {
    pub fn new(label: &str, kind: ParserKind) -> Self {
        Self {
            label: label.to_string(),
            default_value: String::new(),
            kind,
            description: None,
        }
    }

    pub fn integer(label: &str) -> Self {
        Self::new(
            label,
            ParserKind::Integer {
                min: i32::MIN,
                max: i32::MAX,
            },
        )
    }

    pub fn long(label: &str) -> Self {
        Self::new(
            label,
            ParserKind::Long {
                min: i64::MIN,
                max: i64::MAX,
            },
        )
    }

    pub fn float(label: &str) -> Self {
        Self::new(
            label,
            ParserKind::Float {
                min: f32::MIN,
                max: f32::MAX,
            },
        )
    }

    pub fn double(label: &str) -> Self {
        Self::new(
            label,
            ParserKind::Double {
                min: f64::MIN,
                max: f64::MAX,
            },
        )
    }

    pub fn boolean(label: &str) -> Self {
        Self::new(label, ParserKind::Bool)
    }

    pub fn string(label: &str) -> Self {
        Self::new(label, ParserKind::String)
    }

    pub fn message(label: &str) -> Self {
        Self::new(label, ParserKind::Message)
    }

    pub fn choice(label: &str, options: &[&str]) -> Self {
        Self::new(
            label,
            ParserKind::Choice(options.iter().map(ToString::to_string).collect()),
        )
    }

    pub fn custom(label: &str, parser: Arc<dyn CustomParser>) -> Self {
        Self::new(label, ParserKind::Custom(parser))
    }

    /// Make the parameter optional, falling back to `default_value`.
    #[must_use]
    pub fn with_default(mut self, default_value: &str) -> Self {
        self.default_value = default_value.to_string();
        self
    }

    /// Override the help text shown in descriptors.
    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    pub const fn kind(&self) -> &ParserKind {
        &self.kind
    }

    pub fn is_optional(&self) -> bool {
        !self.default_value.is_empty()
    }

    pub fn is_greedy(&self) -> bool {
        self.kind.is_greedy()
    }

    /// Parse the token at `offset`, or every token from `offset` on when greedy.
    pub fn parse(&self, tokens: &[&str], offset: usize) -> Result<Value, ParseError> {
        let input: Cow<'_, str> = if self.is_greedy() {
            match tokens.get(offset..) {
                Some(rest) if !rest.is_empty() => Cow::Owned(rest.join(" ")),
                _ => return Err(ParseError::MissingInput { offset }),
            }
        } else {
            let token = tokens
                .get(offset)
                .ok_or(ParseError::MissingInput { offset })?;
            Cow::Borrowed(*token)
        };
        kinds::parse_input(&self.kind, &input)
    }

    /// Parse the configured default value as if it were the only token.
    pub fn parse_default_value(&self) -> Result<Value, ParseError> {
        self.parse(&[self.default_value.as_str()], 0)
    }

    /// Completion candidates for `partial`.
    ///
    /// Candidates are kept when they start with the partial token, ignoring
    /// case; an empty partial token or an empty candidate list is returned
    /// unfiltered.
    pub fn suggestions(&self, principal: &dyn Principal, partial: &str) -> Vec<String> {
        let suggestions = kinds::base_suggestions(&self.kind, principal, partial);
        if partial.is_empty() || suggestions.is_empty() {
            return suggestions;
        }
        filter_by_prefix(suggestions, partial)
    }

    pub fn descriptor(&self) -> ParserDescriptor {
        let (name, help) = kinds::describe(&self.kind);
        ParserDescriptor {
            name,
            help: self.description.clone().unwrap_or(help),
            default_hint: if self.is_optional() {
                self.default_value.clone()
            } else {
                "none".to_string()
            },
        }
    }

    /// Usage fragment: `<label>`, `[label]`, with `...` for greedy parameters.
    pub fn usage(&self) -> String {
        let greedy = if self.is_greedy() { "..." } else { "" };
        if self.is_optional() {
            format!("[{}{greedy}]", self.label)
        } else {
            format!("<{}{greedy}>", self.label)
        }
    }
}

/// Keep candidates starting with `partial`, ignoring case.
pub(crate) fn filter_by_prefix(candidates: Vec<String>, partial: &str) -> Vec<String> {
    candidates
        .into_iter()
        .filter(|candidate| starts_with_ignore_case(candidate, partial))
        .collect()
}
