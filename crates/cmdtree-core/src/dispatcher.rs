//! Routing and execution of a tokenized command line.
//!
//! Each visited node goes through: access check, parameter binding, local
//! handler execution, then routing to the first child whose label matches.
//! Any failure aborts the whole walk; nothing deeper runs.

use tracing::{debug, trace};

use crate::config::DispatchConfig;
use crate::context::InvocationContext;
use crate::error::{CommandError, Failure, ParseError};
use crate::parsers::Value;
use crate::principal::Principal;
use crate::tree::{CommandNode, Handler};

/// Dispatch `tokens` (root label included) against the tree under `root`.
pub fn dispatch(
    root: &CommandNode,
    principal: &dyn Principal,
    tokens: &[&str],
    config: &DispatchConfig,
) -> Result<(), Failure> {
    if !root.matches_label(tokens, 0) {
        debug!(root = root.label(), "input does not start with the root label");
        return Err(Failure::malformed());
    }

    let mut context = InvocationContext::new(principal);
    let mut node = root;
    let mut offset = root.label_len();

    loop {
        check_access(node, principal)?;

        let values = bind_parameters(node, tokens, &mut offset, &mut context)?;

        if let Some(handler) = node.handler() {
            trace!(node = node.label(), "executing handler");
            run_handler(handler, &mut context, &values)?;
        }

        let next = node.find_next_child(tokens, offset);
        match next {
            Some(child) => {
                trace!(from = node.label(), to = child.label(), offset, "routing to child");
                offset += child.label_len();
                node = child;
            }
            None if !node.is_executable() => {
                debug!(node = node.label(), "no child matched a routing-only node");
                return Err(Failure::malformed());
            }
            None if config.reject_trailing_tokens && offset < tokens.len() => {
                debug!(
                    node = node.label(),
                    unconsumed = tokens.len() - offset,
                    "rejecting trailing tokens"
                );
                return Err(Failure::malformed());
            }
            None => return Ok(()),
        }
    }
}

fn check_access(node: &CommandNode, principal: &dyn Principal) -> Result<(), Failure> {
    if !node.permits(principal) {
        return Err(Failure::MissingPermissions {
            permission: node.permission().to_string(),
        });
    }
    if !node.senders().allows(principal.kind()) {
        return Err(Failure::InvalidSender {
            sender: principal.kind(),
        });
    }
    Ok(())
}

/// Parse this node's parameters from `offset`, binding each into `context`.
///
/// `offset` never moves past the end of input: absent optional parameters
/// take their default without consuming anything.
fn bind_parameters(
    node: &CommandNode,
    tokens: &[&str],
    offset: &mut usize,
    context: &mut InvocationContext<'_>,
) -> Result<Vec<Value>, Failure> {
    let mut values = Vec::with_capacity(node.parameters().len());
    for parameter in node.parameters() {
        let parsed = if *offset >= tokens.len() {
            if !parameter.is_optional() {
                return Err(Failure::MalformedCommand {
                    cause: Some(ParseError::MissingInput { offset: *offset }),
                });
            }
            parameter.parse_default_value()
        } else {
            let parsed = parameter.parse(tokens, *offset);
            *offset = if parameter.is_greedy() {
                tokens.len()
            } else {
                *offset + 1
            };
            parsed
        };

        let value = parsed.map_err(|cause| Failure::MalformedCommand { cause: Some(cause) })?;
        context.bind(parameter.label(), value.clone());
        values.push(value);
    }
    Ok(values)
}

fn run_handler(
    handler: &Handler,
    context: &mut InvocationContext<'_>,
    values: &[Value],
) -> Result<(), Failure> {
    handler(context, values).map_err(|err| match err.downcast::<CommandError>() {
        Ok(command) => Failure::Command(command.message),
        Err(err) => Failure::Runtime(err),
    })
}
