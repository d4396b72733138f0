//! cmdtree CLI
//!
//! Dispatches or completes a single command line against the sample command
//! trees, acting as a configurable principal. Nothing is kept between runs.

mod demo;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use cmdtree_core::config::load_config;
use cmdtree_core::grammar::GrammarNode;
use cmdtree_core::tracing_init::init_tracing;
use cmdtree_core::{CommandRegistry, GrantedPrincipal, Outcome, SenderKind};

#[derive(Debug, Parser)]
#[command(
    name = "cmdtree",
    version,
    about = "Declarative command dispatch playground",
    disable_help_subcommand = true
)]
struct Cli {
    /// Configuration file (JSON)
    #[arg(long, env = "CMDTREE_CONFIG")]
    config: Option<PathBuf>,

    /// Name of the invoking principal
    #[arg(long = "as", default_value = "console")]
    name: String,

    /// Kind of the invoking principal
    #[arg(long, value_enum, default_value_t = KindArg::Console)]
    kind: KindArg,

    /// Permission granted to the principal (repeatable, supports `*` and `prefix.*`)
    #[arg(short, long = "grant")]
    grants: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
enum Commands {
    /// Dispatch a command line
    Run {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        tokens: Vec<String>,
    },
    /// Print completions for a partial line (a trailing space completes a new word)
    Complete { line: String },
    /// Show the help menu of every registered command
    Help {
        #[arg(default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = 8)]
        page_size: usize,
    },
    /// Print the grammar mirror of every registered command as JSON
    Grammar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KindArg {
    Console,
    User,
    Remote,
}

impl From<KindArg> for SenderKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Console => Self::Console,
            KindArg::User => Self::User,
            KindArg::Remote => Self::Remote,
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cmdtree").join("config.json"))
}

#[allow(clippy::print_stdout)]
fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(default_config_path);
    let config = load_config(config_path.as_deref())?;
    init_tracing(&config.logging)?;
    info!(version = env!("CARGO_PKG_VERSION"), "Starting cmdtree CLI");

    let mut registry = CommandRegistry::new(config);
    demo::register_demo(&mut registry)?;

    let mut principal = GrantedPrincipal::new(&cli.name, cli.kind.into());
    principal.grants = cli.grants;

    match cli.command {
        Commands::Run { tokens } => {
            let line = tokens.join(" ");
            match registry.execute_line(&principal, &line) {
                Some(Outcome::Success) => {}
                Some(Outcome::Help {
                    page,
                    total_pages,
                    lines,
                }) => print_help_page(page, total_pages, &lines),
                Some(Outcome::Failed { message, .. }) => println!("{message}"),
                None => println!("Unknown command: {line}"),
            }
        }
        Commands::Complete { line } => {
            for suggestion in registry.complete_line(&principal, &line) {
                println!("{suggestion}");
            }
        }
        Commands::Help { page, page_size } => {
            let shown = registry.help_page(&principal, page, page_size);
            let lines: Vec<String> = shown.entries.iter().map(|entry| entry.line()).collect();
            print_help_page(shown.page, shown.total_pages, &lines);
        }
        Commands::Grammar => {
            let grammars: Vec<GrammarNode> =
                registry.executors().map(|executor| executor.grammar()).collect();
            println!("{}", serde_json::to_string_pretty(&grammars)?);
        }
    }

    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_help_page(page: usize, total_pages: usize, lines: &[String]) {
    println!("Help page {page}/{total_pages}");
    for line in lines {
        println!("{line}");
    }
}
