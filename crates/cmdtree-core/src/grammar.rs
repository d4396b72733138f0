//! Brigadier-style mirror of a command tree.
//!
//! Hosts with their own completion engine register a literal/argument graph
//! instead of calling [`complete`](crate::completion::complete). This module
//! derives that graph from a [`CommandNode`]: label words become nested
//! literals, parameters chain as arguments, and children hang off the last
//! argument (or the last literal when the node has no parameters). A
//! registered root additionally gets the built-in `help [page]` literal.

use serde::Serialize;

use crate::help::{self, HELP_LITERAL};
use crate::parsers::{ParameterParser, ParserKind};
use crate::tree::CommandNode;

/// External representation of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArgumentType {
    Integer { min: i32, max: i32 },
    Long { min: i64, max: i64 },
    Float { min: f32, max: f32 },
    Double { min: f64, max: f64 },
    Bool,
    Word,
    GreedyString,
}

/// Mapping table from parser kind to external argument type.
pub fn argument_type(kind: &ParserKind) -> ArgumentType {
    match kind {
        ParserKind::Integer { min, max } => ArgumentType::Integer {
            min: *min,
            max: *max,
        },
        ParserKind::Long { min, max } => ArgumentType::Long {
            min: *min,
            max: *max,
        },
        ParserKind::Float { min, max } => ArgumentType::Float {
            min: *min,
            max: *max,
        },
        ParserKind::Double { min, max } => ArgumentType::Double {
            min: *min,
            max: *max,
        },
        ParserKind::Bool => ArgumentType::Bool,
        ParserKind::String | ParserKind::Choice(_) => ArgumentType::Word,
        ParserKind::Message => ArgumentType::GreedyString,
        ParserKind::Custom(custom) => custom.argument_type(),
    }
}

/// One node of the mirrored grammar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum GrammarNode {
    Literal {
        name: String,
        /// Input may end here.
        executes: bool,
        children: Vec<GrammarNode>,
    },
    Argument {
        name: String,
        argument: ArgumentType,
        executes: bool,
        children: Vec<GrammarNode>,
    },
}

impl GrammarNode {
    pub fn from_node(node: &CommandNode) -> Self {
        Self::build(node, Vec::new())
    }

    /// Grammar of a registered root: [`from_node`](Self::from_node) plus the
    /// `help [page]` literal under the root's label.
    pub fn from_root(node: &CommandNode) -> Self {
        Self::build(node, vec![Self::help_literal()])
    }

    fn help_literal() -> Self {
        let page = help::page_parameter();
        Self::Literal {
            name: HELP_LITERAL.to_string(),
            executes: true,
            children: vec![Self::Argument {
                name: page.label().to_string(),
                argument: argument_type(page.kind()),
                executes: true,
                children: Vec::new(),
            }],
        }
    }

    fn build(node: &CommandNode, builtins: Vec<Self>) -> Self {
        let parameters = node.parameters();
        // Input may stop after `consumed` parameters when the rest are optional.
        let ends_after = |consumed: usize| {
            node.is_executable() && parameters[consumed..].iter().all(ParameterParser::is_optional)
        };

        let mut tail: Vec<Self> = node.children().iter().map(Self::from_node).collect();
        for (index, parameter) in parameters.iter().enumerate().rev() {
            tail = vec![Self::Argument {
                name: parameter.label().to_string(),
                argument: argument_type(parameter.kind()),
                executes: ends_after(index + 1),
                children: tail,
            }];
        }

        tail.extend(builtins);

        let mut words = node.label_words().iter().rev();
        let mut grammar = Self::Literal {
            name: words.next().cloned().unwrap_or_default(),
            executes: ends_after(0),
            children: tail,
        };
        for word in words {
            grammar = Self::Literal {
                name: word.clone(),
                executes: false,
                children: vec![grammar],
            };
        }
        grammar
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Literal { name, .. } | Self::Argument { name, .. } => name,
        }
    }

    pub fn children(&self) -> &[Self] {
        match self {
            Self::Literal { children, .. } | Self::Argument { children, .. } => children,
        }
    }
}
