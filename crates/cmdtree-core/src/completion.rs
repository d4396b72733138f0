//! Completion resolver.
//!
//! Walks the tree consuming tokens exactly like the dispatcher (root label,
//! then per node: its parameters, then a child label) without running any
//! handler, until it finds what the final, partial token belongs to:
//! - a literal label word (root or child): the matching label words,
//! - a parameter position: that parameter's suggestions,
//! - a greedy parameter's span: the greedy parameter's suggestions.

use tracing::trace;

use crate::config::CompletionConfig;
use crate::parsers::filter_by_prefix;
use crate::principal::Principal;
use crate::text::eq_ignore_case;
use crate::tree::{CommandNode, find_next_child};

/// Suggestions for the last element of `tokens` (root label included).
///
/// An empty partial token is expressed as a trailing `""` element.
pub fn complete(
    root: &CommandNode,
    principal: &dyn Principal,
    tokens: &[&str],
    config: &CompletionConfig,
) -> Vec<String> {
    let Some(last) = tokens.len().checked_sub(1) else {
        return Vec::new();
    };
    let partial = tokens[last];

    let mut candidates = std::slice::from_ref(root);
    let mut offset = 0;
    loop {
        let node = match find_next_child(candidates, tokens, offset) {
            Some(node) if offset + node.label_len() <= last => node,
            _ => return literal_suggestions(candidates, principal, tokens, offset, config),
        };
        if config.respect_permissions && !node.is_accessible(principal) {
            trace!(node = node.label(), "completion hidden by access rules");
            return Vec::new();
        }
        offset += node.label_len();

        // offset <= last here, so at least the partial token remains.
        let remaining = tokens.len() - offset;
        let parameters = node.parameters();
        if let Some(greedy) = parameters.iter().position(|p| p.is_greedy()) {
            if remaining > greedy {
                return parameters[greedy].suggestions(principal, partial);
            }
        }
        if remaining <= parameters.len() {
            return parameters[remaining - 1].suggestions(principal, partial);
        }

        offset += parameters.len();
        candidates = node.children();
    }
}

/// Label words of `candidates` that the final token could still complete.
fn literal_suggestions(
    candidates: &[CommandNode],
    principal: &dyn Principal,
    tokens: &[&str],
    offset: usize,
    config: &CompletionConfig,
) -> Vec<String> {
    if !config.suggest_literals || offset >= tokens.len() {
        return Vec::new();
    }
    let last = tokens.len() - 1;
    let position = last - offset;
    let typed = &tokens[offset..last];

    let mut words = Vec::new();
    for candidate in candidates {
        if config.respect_permissions && !candidate.is_accessible(principal) {
            continue;
        }
        let label = candidate.label_words();
        let Some(word) = label.get(position) else {
            continue;
        };
        let prefix_matches = label
            .iter()
            .zip(typed)
            .all(|(expected, token)| eq_ignore_case(expected, token));
        if prefix_matches && !words.contains(word) {
            words.push(word.clone());
        }
    }
    filter_by_prefix(words, tokens[last])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::parsers::ParameterParser;
    use crate::principal::{GrantedPrincipal, SenderKind};

    fn tree() -> CommandNode {
        CommandNode::builder("gamemode")
            .permission("cmd.gamemode")
            .param(ParameterParser::choice("mode", &["survival", "creative", "spectator"]))
            .param(ParameterParser::string("target").with_default("@self"))
            .handler(|_, _| Ok(()))
            .child(
                CommandNode::builder("reset all")
                    .permission("cmd.gamemode.reset")
                    .handler(|_, _| Ok(())),
            )
            .child(CommandNode::builder("reload").handler(|_, _| Ok(())))
            .build()
            .unwrap()
    }

    fn player() -> GrantedPrincipal {
        GrantedPrincipal::new("steve", SenderKind::User).grant("cmd.gamemode")
    }

    fn admin() -> GrantedPrincipal {
        GrantedPrincipal::new("admin", SenderKind::User).grant("cmd.*")
    }

    fn complete_default(principal: &GrantedPrincipal, tokens: &[&str]) -> Vec<String> {
        complete(&tree(), principal, tokens, &CompletionConfig::default())
    }

    #[test]
    fn completes_root_label() {
        assert_eq!(complete_default(&player(), &["game"]), ["gamemode"]);
        assert!(complete_default(&player(), &["help"]).is_empty());
    }

    #[test]
    fn completes_first_parameter() {
        assert_eq!(complete_default(&player(), &["gamemode", "s"]), ["survival", "spectator"]);
        assert_eq!(
            complete_default(&player(), &["gamemode", ""]),
            ["survival", "creative", "spectator"]
        );
    }

    #[test]
    fn parameter_without_suggestions_yields_nothing() {
        assert!(complete_default(&player(), &["gamemode", "creative", "al"]).is_empty());
    }

    #[test]
    fn completes_child_labels_after_parameters() {
        assert_eq!(
            complete_default(&admin(), &["gamemode", "creative", "steve", "re"]),
            ["reset", "reload"]
        );
        assert_eq!(
            complete_default(&admin(), &["gamemode", "creative", "steve", "reset", "a"]),
            ["all"]
        );
    }

    #[test]
    fn hides_children_without_permission() {
        assert_eq!(
            complete_default(&player(), &["gamemode", "creative", "steve", "re"]),
            ["reload"]
        );
    }

    #[test]
    fn permission_policy_can_be_relaxed() {
        let stranger = GrantedPrincipal::new("guest", SenderKind::User);
        assert!(complete_default(&stranger, &["gamemode", "c"]).is_empty());

        let open = CompletionConfig {
            respect_permissions: false,
            ..CompletionConfig::default()
        };
        assert_eq!(complete(&tree(), &stranger, &["gamemode", "c"], &open), ["creative"]);
    }

    #[test]
    fn literal_suggestions_can_be_disabled() {
        let config = CompletionConfig {
            suggest_literals: false,
            ..CompletionConfig::default()
        };
        assert!(complete(&tree(), &player(), &["game"], &config).is_empty());
    }

    #[test]
    fn empty_input_has_no_suggestions() {
        assert!(complete_default(&player(), &[]).is_empty());
    }

    #[test]
    fn greedy_span_keeps_suggesting_the_greedy_parameter() {
        let root = CommandNode::builder("say")
            .param(ParameterParser::choice("channel", &["global", "local"]))
            .param(ParameterParser::custom(
                "message",
                std::sync::Arc::new(Emotes),
            ))
            .handler(|_, _| Ok(()))
            .build()
            .unwrap();
        let config = CompletionConfig::default();
        let tokens = ["say", "global", "hello", "there", ":s"];
        assert_eq!(complete(&root, &player(), &tokens, &config), [":smile:"]);
    }

    #[derive(Debug)]
    struct Emotes;

    impl crate::parsers::CustomParser for Emotes {
        fn type_name(&self) -> &str {
            "emote message"
        }

        fn parse(&self, input: &str) -> Result<crate::parsers::Value, crate::error::ParseError> {
            Ok(crate::parsers::Value::Str(input.to_string()))
        }

        fn suggestions(&self, _principal: &dyn Principal, _partial: &str) -> Vec<String> {
            vec![":smile:".to_string(), ":wave:".to_string()]
        }

        fn is_greedy(&self) -> bool {
            true
        }
    }
}
