//! Help menu: one entry per executable path of a command tree.
//!
//! Every registered root also answers to `<root> help [page]`, served from
//! this menu by the executor instead of by the tree itself.

use crate::parsers::{ParameterParser, ParserKind};
use crate::principal::{Principal, SenderFilter};
use crate::tree::CommandNode;

/// Literal of the built-in help subcommand.
pub const HELP_LITERAL: &str = "help";

/// Entries per page shown by the built-in help subcommand.
pub const HELP_PAGE_SIZE: usize = 8;

/// The optional `page` argument of the built-in help subcommand.
pub fn page_parameter() -> ParameterParser {
    ParameterParser::new(
        "page",
        ParserKind::Integer {
            min: 1,
            max: i32::MAX,
        },
    )
    .with_default("1")
}

/// Help line for one executable node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpEntry {
    /// Full path with parameter placeholders, e.g. `warn <minutes> reason [reason...]`.
    pub usage: String,
    pub description: String,
    /// Permission of the node itself; empty when none is required.
    pub permission: String,
    requirements: Vec<(String, SenderFilter)>,
}

impl HelpEntry {
    /// Whether every node on the path is accessible to the principal.
    pub fn is_visible_to(&self, principal: &dyn Principal) -> bool {
        self.requirements.iter().all(|(permission, senders)| {
            (permission.is_empty() || principal.has_permission(permission))
                && senders.allows(principal.kind())
        })
    }

    /// Display line: `/usage - description`, or just `/usage`.
    pub fn line(&self) -> String {
        if self.description.is_empty() {
            format!("/{}", self.usage)
        } else {
            format!("/{} - {}", self.usage, self.description)
        }
    }
}

/// A page of entries visible to one principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpPage<'a> {
    pub entries: Vec<&'a HelpEntry>,
    /// 1-based page number actually shown (clamped to the last page).
    pub page: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, Default)]
pub struct HelpMenu {
    entries: Vec<HelpEntry>,
}

impl HelpMenu {
    pub fn new(root: &CommandNode) -> Self {
        let mut entries = Vec::new();
        collect(root, "", &[], &mut entries);
        Self { entries }
    }

    pub fn entries(&self) -> &[HelpEntry] {
        &self.entries
    }

    /// Page `page` (1-based) of the entries visible to `principal`.
    pub fn page(&self, principal: &dyn Principal, page: usize, page_size: usize) -> HelpPage<'_> {
        paginate(&self.entries, principal, page, page_size)
    }
}

/// Page `page` (1-based, clamped) of the `entries` visible to `principal`.
pub(crate) fn paginate<'a>(
    entries: impl IntoIterator<Item = &'a HelpEntry>,
    principal: &dyn Principal,
    page: usize,
    page_size: usize,
) -> HelpPage<'a> {
    let visible: Vec<&HelpEntry> = entries
        .into_iter()
        .filter(|entry| entry.is_visible_to(principal))
        .collect();
    let page_size = page_size.max(1);
    let total_pages = visible.len().div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);
    let entries = visible
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();
    HelpPage {
        entries,
        page,
        total_pages,
    }
}

fn collect(
    node: &CommandNode,
    prefix: &str,
    inherited: &[(String, SenderFilter)],
    entries: &mut Vec<HelpEntry>,
) {
    let mut usage = if prefix.is_empty() {
        node.label().to_string()
    } else {
        format!("{prefix} {}", node.label())
    };
    for parameter in node.parameters() {
        usage.push(' ');
        usage.push_str(&parameter.usage());
    }

    let mut requirements = inherited.to_vec();
    requirements.push((node.permission().to_string(), node.senders().clone()));

    if node.is_executable() {
        entries.push(HelpEntry {
            usage: usage.clone(),
            description: node.description().to_string(),
            permission: node.permission().to_string(),
            requirements: requirements.clone(),
        });
    }
    for child in node.children() {
        collect(child, &usage, &requirements, entries);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::parsers::ParameterParser;
    use crate::principal::{GrantedPrincipal, SenderKind};

    fn tree() -> CommandNode {
        CommandNode::builder("warn")
            .permission("cmd.warn")
            .description("Warn a player")
            .param(ParameterParser::integer("minutes"))
            .handler(|_, _| Ok(()))
            .child(
                CommandNode::builder("reason")
                    .description("Warn with a reason")
                    .param(ParameterParser::message("reason").with_default("no reason given"))
                    .handler(|_, _| Ok(())),
            )
            .child(
                CommandNode::builder("purge")
                    .permission("cmd.warn.purge")
                    .handler(|_, _| Ok(())),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn usage_lines_follow_the_path() {
        let menu = HelpMenu::new(&tree());
        let usages: Vec<&str> = menu.entries().iter().map(|e| e.usage.as_str()).collect();
        assert_eq!(
            usages,
            [
                "warn <minutes>",
                "warn <minutes> reason [reason...]",
                "warn <minutes> purge"
            ]
        );
    }

    #[test]
    fn pages_only_show_accessible_entries() {
        let menu = HelpMenu::new(&tree());
        let moderator = GrantedPrincipal::new("mod", SenderKind::User).grant("cmd.warn");
        let page = menu.page(&moderator, 1, 10);
        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.total_pages, 1);

        let nobody = GrantedPrincipal::new("guest", SenderKind::User);
        assert!(menu.page(&nobody, 1, 10).entries.is_empty());
    }

    #[test]
    fn page_number_is_clamped() {
        let menu = HelpMenu::new(&tree());
        let admin = GrantedPrincipal::new("admin", SenderKind::Console).grant("*");
        let page = menu.page(&admin, 7, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.page, 2);
        assert_eq!(page.entries[0].usage, "warn <minutes> purge");
    }

    #[test]
    fn lines_include_description_when_present() {
        let menu = HelpMenu::new(&tree());
        let lines: Vec<String> = menu.entries().iter().map(HelpEntry::line).collect();
        assert_eq!(lines[0], "/warn <minutes> - Warn a player");
        assert_eq!(lines[2], "/warn <minutes> purge");
    }
}
