//! Sample command trees registered by the `cmdtree` binary.

use cmdtree_core::{
    BuildError, CommandError, CommandNode, CommandRegistry, ParameterParser, ParserKind,
    SenderKind,
};

/// Build the moderation sample: `warn`, `gamemode` and `broadcast`.
#[allow(clippy::print_stdout)]
pub fn register_demo(registry: &mut CommandRegistry) -> Result<(), BuildError> {
    registry.register(
        CommandNode::builder("warn")
            .permission("cmd.warn")
            .description("Warn the server for a number of minutes")
            .param(ParameterParser::new("minutes", ParserKind::Integer { min: 0, max: 1440 }))
            .handler(|context, values| {
                println!(
                    "{} issued a warning for {} minute(s)",
                    context.principal().name(),
                    values[0]
                );
                Ok(())
            })
            .child(
                CommandNode::builder("reason")
                    .description("Warn with a reason")
                    .param(ParameterParser::message("reason").with_default("no reason given"))
                    .handler(|context, values| {
                        let minutes = context
                            .get("minutes")
                            .map(ToString::to_string)
                            .unwrap_or_default();
                        println!("Reason for the {minutes} minute warning: {}", values[0]);
                        Ok(())
                    }),
            )
            .build()?,
    )?;

    registry.register(
        CommandNode::builder("gamemode")
            .permission("cmd.gamemode")
            .description("Change a player's game mode")
            .param(ParameterParser::choice(
                "mode",
                &["survival", "creative", "adventure", "spectator"],
            ))
            .param(ParameterParser::string("target").with_default("@self"))
            .handler(|context, values| {
                let target = match values[1].as_str() {
                    Some("@self") | None => context.principal().name().to_string(),
                    Some(name) if name.starts_with('@') => {
                        return Err(CommandError::new(format!("Unknown selector {name}")).into());
                    }
                    Some(name) => name.to_string(),
                };
                println!("Set {target}'s game mode to {}", values[0]);
                Ok(())
            })
            .build()?,
    )?;

    registry.register(
        CommandNode::builder("broadcast")
            .permission("cmd.broadcast")
            .senders(&[SenderKind::Console])
            .description("Send a message to everyone")
            .param(ParameterParser::boolean("urgent"))
            .param(ParameterParser::message("text"))
            .handler(|_, values| {
                let marker = if values[0].as_bool() == Some(true) { "[!] " } else { "" };
                println!("{marker}{}", values[1]);
                Ok(())
            })
            .build()?,
    )?;

    Ok(())
}
