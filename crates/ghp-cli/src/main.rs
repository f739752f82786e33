//! Command-line interface for the GitHub Projects MCP server.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ghp_github::{auth, GithubGraphql};
use ghp_mcp::McpServer;

#[derive(Parser)]
#[command(name = "ghp")]
#[command(author, version, about = "GitHub Projects MCP server", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server on stdio
    Serve,

    /// Acquire and cache a GitHub token
    Auth,

    /// List the tools the server exposes
    Tools,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Stdout is the protocol channel, so logging goes to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Auth) => {
            let token = auth::github_token().await?;
            tracing::info!("Authenticated ({} characters, token cached)", token.len());
            Ok(())
        }
        Some(Commands::Tools) => {
            for tool in ghp_mcp::tools::catalog() {
                println!("{}: {}", tool.name, tool.description);
            }
            Ok(())
        }
        Some(Commands::Serve) | None => serve().await,
    }
}

async fn serve() -> anyhow::Result<()> {
    let token = auth::github_token().await?;
    let client = Arc::new(GithubGraphql::new(token));

    McpServer::new(client).run().await?;
    Ok(())
}
