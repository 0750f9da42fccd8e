use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod prompt;

use commands::{CommentCommand, ConfigCommand, PostCommand};
use postboard::config::Config;

#[derive(Parser)]
#[command(name = "postboard")]
#[command(version)]
#[command(about = "A command-line client for the Postboard blogging board", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read and manage posts
    Post(PostCommand),

    /// Read and manage comments
    Comment(CommentCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Post(cmd)) => cmd.run(&config).await?,
        Some(Commands::Comment(cmd)) => cmd.run(&config).await?,
        Some(Commands::Config(cmd)) => cmd.run(&config)?,
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
