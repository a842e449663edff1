mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{blocks, init, render, validate, BlocksArgs, InitArgs, RenderArgs, ValidateArgs};
use tracing::Level;

/// Storefront CLI - render and check block-based store pages
#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new storefront project
    Init(InitArgs),

    /// Render a page layout to HTML
    Render(RenderArgs),

    /// Check page layouts against the block registry
    Validate(ValidateArgs),

    /// List available block types
    Blocks(BlocksArgs),
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Render(args) => render(args, &cwd),
        Command::Validate(args) => validate(args, &cwd),
        Command::Blocks(args) => blocks(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
