//! cmdtree Core Library
//!
//! Declarative command dispatch:
//! - Command trees built with a validating builder
//! - Typed parameter parsing with defaults and greedy parameters
//! - Permission and sender-kind enforcement along the matched path
//! - Tab-completion that consumes tokens exactly like dispatch
//! - Help menus and a Brigadier-style grammar mirror for host adapters

pub mod completion;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod grammar;
pub mod help;
pub mod parsers;
pub mod principal;
pub mod registry;
pub mod text;
pub mod tracing_init;
pub mod tree;

pub use config::Config;
pub use context::InvocationContext;
pub use error::{BuildError, CommandError, Error, Failure, FailureKind, ParseError, Result};
pub use executor::{CommandExecutor, Outcome};
pub use parsers::{ParameterParser, ParserKind, Value};
pub use principal::{GrantedPrincipal, Principal, SenderKind};
pub use registry::CommandRegistry;
pub use tree::{CommandNode, NodeBuilder};
