mod commands;
mod config;
mod page_file;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{apply, init, render, replay, ApplyArgs, InitArgs, RenderArgs, ReplayArgs};
use tracing_subscriber::EnvFilter;

/// Bento CLI - render grid pages and replay editor sessions
#[derive(Parser, Debug)]
#[command(name = "bento")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a config file and an example page
    Init(InitArgs),

    /// Render a page file to HTML or JSON
    Render(RenderArgs),

    /// Replay a gesture script through an edit session
    Replay(ReplayArgs),

    /// Apply a mutation log to a page file
    Apply(ApplyArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::Init(args) => init(args, &cwd),
                Command::Render(args) => render(args, &cwd),
                Command::Replay(args) => replay(args, &cwd),
                Command::Apply(args) => apply(args, &cwd),
            }
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
