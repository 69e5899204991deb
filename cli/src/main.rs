//! # Folio Main Entry Point
//!
//! File: cli/src/main.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Entry point of the `folio` CLI, the local toolkit behind the portfolio
//! site. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command handlers
//!
//! ## Architecture
//!
//! - `chat`: the "Shy" assistant (classifier, replies, widget state, rendering)
//! - `contact`: contact submissions, email relay, document store, form flow
//! - `commands`: one module per top-level command
//! - `core`: configuration and error types
//!
//! ## Examples
//!
//! ```bash
//! # Serve the site with its backend
//! folio srv ./site
//!
//! # Talk to the assistant
//! folio chat
//! folio ask "what projects have you built?"
//!
//! # Send a message through the contact form, with debug logs
//! folio -vv contact --name Ada --email ada@example.com --message "Hello"
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod chat; // The "Shy" chat assistant.
mod commands; // Command handlers (srv, chat, ask, contact).
mod contact; // Contact form, relay and persistence.
mod core; // Core infrastructure (errors, config).

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "folio",
    about = "📁 Folio: portfolio site server, contact relay and the \"Shy\" chat assistant",
    long_about = "Serve the portfolio site with its contact relay and login gate,\n\
                  talk to the Shy assistant, or submit the contact form from the terminal.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// All top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    /// Serve the site, `/api/contact`, `/api/chat` and the login gate.
    #[command(alias = "s")]
    Srv(commands::srv::SrvArgs),
    /// Chat with the assistant in the terminal.
    #[command(alias = "c")]
    Chat(commands::chat::ChatArgs),
    /// Ask the assistant one question.
    #[command(alias = "a")]
    Ask(commands::ask::AskArgs),
    /// Submit the contact form.
    Contact(commands::contact::ContactArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Srv(args) => commands::srv::handle_srv(args).await,
        Commands::Chat(args) => commands::chat::handle_chat(args).await,
        Commands::Ask(args) => commands::ask::handle_ask(args).await,
        Commands::Contact(args) => commands::contact::handle_contact(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
