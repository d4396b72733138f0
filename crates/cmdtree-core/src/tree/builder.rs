use std::collections::HashSet;
use std::sync::Arc;

use super::{CommandNode, Handler};
use crate::context::InvocationContext;
use crate::error::BuildError;
use crate::parsers::{ParameterParser, Value};
use crate::principal::{SenderFilter, SenderKind};
use crate::text;

/// Fluent construction of a [`CommandNode`] subtree.
///
/// Validation happens in [`NodeBuilder::build`], so a built tree never needs
/// to be re-checked during dispatch.
#[must_use]
pub struct NodeBuilder {
    label: String,
    permission: String,
    description: String,
    senders: SenderFilter,
    parameters: Vec<ParameterParser>,
    children: Vec<Self>,
    executable: Option<bool>,
    handler: Option<Handler>,
}

impl NodeBuilder {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            permission: String::new(),
            description: String::new(),
            senders: SenderFilter::Any,
            parameters: Vec::new(),
            children: Vec::new(),
            executable: None,
            handler: None,
        }
    }

    pub fn permission(mut self, permission: &str) -> Self {
        self.permission = permission.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Restrict the node to the given sender kinds.
    pub fn senders(mut self, kinds: &[SenderKind]) -> Self {
        self.senders = SenderFilter::Only(kinds.to_vec());
        self
    }

    pub fn param(mut self, parameter: ParameterParser) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Bind a handler. The node becomes executable unless overridden.
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut InvocationContext<'_>, &[Value]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Override executability (defaults to "has a handler").
    pub fn executable(mut self, executable: bool) -> Self {
        self.executable = Some(executable);
        self
    }

    pub fn build(self) -> Result<CommandNode, BuildError> {
        let words: Vec<String> = self.label.split_whitespace().map(str::to_string).collect();
        if words.is_empty() {
            return Err(BuildError::EmptyLabel);
        }
        let label = words.join(" ");

        validate_parameters(&label, &self.parameters)?;

        let children = self
            .children
            .into_iter()
            .map(Self::build)
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen = HashSet::new();
        for child in &children {
            if !seen.insert(text::fold(child.label())) {
                return Err(BuildError::DuplicateChild {
                    parent: label,
                    label: child.label().to_string(),
                });
            }
        }

        let executable = self.executable.unwrap_or(self.handler.is_some());
        if !executable && children.is_empty() {
            return Err(BuildError::UnreachableLeaf { node: label });
        }

        Ok(CommandNode {
            label,
            words,
            permission: self.permission,
            description: self.description,
            senders: self.senders,
            parameters: self.parameters,
            children,
            executable,
            handler: self.handler,
        })
    }
}

fn validate_parameters(node: &str, parameters: &[ParameterParser]) -> Result<(), BuildError> {
    let mut labels = HashSet::new();
    for (index, parameter) in parameters.iter().enumerate() {
        if !parameter.label().is_empty() && !labels.insert(parameter.label()) {
            return Err(BuildError::DuplicateParameter {
                node: node.to_string(),
                label: parameter.label().to_string(),
            });
        }
        if parameter.is_greedy() && index + 1 != parameters.len() {
            return Err(BuildError::GreedyNotLast {
                node: node.to_string(),
                parameter: parameter.label().to_string(),
            });
        }
        if parameter.is_optional() {
            parameter
                .parse_default_value()
                .map_err(|source| BuildError::InvalidDefault {
                    node: node.to_string(),
                    parameter: parameter.label().to_string(),
                    source,
                })?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn noop() -> NodeBuilder {
        CommandNode::builder("noop").handler(|_, _| Ok(()))
    }

    #[test]
    fn label_whitespace_is_normalised() {
        let node = CommandNode::builder("  plugin   reload ")
            .handler(|_, _| Ok(()))
            .build()
            .unwrap();
        assert_eq!(node.label(), "plugin reload");
        assert_eq!(node.label_words(), ["plugin", "reload"]);
    }

    #[test]
    fn empty_label_is_rejected() {
        let err = CommandNode::builder("   ")
            .handler(|_, _| Ok(()))
            .build()
            .unwrap_err();
        assert_eq!(err, BuildError::EmptyLabel);
    }

    #[test]
    fn handler_makes_node_executable() {
        assert!(noop().build().unwrap().is_executable());
        let routing = CommandNode::builder("root").child(noop()).build().unwrap();
        assert!(!routing.is_executable());
    }

    #[test]
    fn leaf_without_handler_is_rejected() {
        let err = CommandNode::builder("dead").build().unwrap_err();
        assert_eq!(
            err,
            BuildError::UnreachableLeaf {
                node: "dead".to_string()
            }
        );
    }

    #[test]
    fn duplicate_children_are_rejected_case_insensitively() {
        let err = CommandNode::builder("root")
            .child(CommandNode::builder("list").handler(|_, _| Ok(())))
            .child(CommandNode::builder("LIST").handler(|_, _| Ok(())))
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::DuplicateChild { .. }));
    }

    #[test]
    fn greedy_parameter_must_be_last() {
        let err = noop()
            .param(ParameterParser::message("reason"))
            .param(ParameterParser::integer("minutes"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::GreedyNotLast {
                node: "noop".to_string(),
                parameter: "reason".to_string()
            }
        );
    }

    #[test]
    fn unparseable_default_is_rejected() {
        let err = noop()
            .param(ParameterParser::integer("minutes").with_default("soon"))
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::InvalidDefault { .. }));
    }

    #[test]
    fn duplicate_parameter_labels_are_rejected() {
        let err = noop()
            .param(ParameterParser::integer("x"))
            .param(ParameterParser::integer("x"))
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::DuplicateParameter { .. }));
    }

    #[test]
    fn child_errors_propagate() {
        let err = CommandNode::builder("root")
            .child(CommandNode::builder("broken"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::UnreachableLeaf {
                node: "broken".to_string()
            }
        );
    }
}
