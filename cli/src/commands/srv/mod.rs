//! # Folio Site Server
//!
//! File: cli/src/commands/srv/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `folio srv` serves the portfolio site locally together with its backend:
//! - Static pages from the site directory
//! - The contact relay (`POST /api/contact`)
//! - The chat endpoint (`POST /api/chat`)
//! - The login gate in front of protected pages
//!
//! ## Architecture
//!
//! - `config.rs`: arguments and `.folio-srv.toml` merging
//! - `api.rs`: shared state and the JSON handlers
//! - `auth_gate.rs`: the login gate middleware
//! - `server_logic.rs`: router assembly and the server loop
//! - `utils.rs`: startup diagnostics
//!
//! ## Examples
//!
//! ```bash
//! # Serve the current directory
//! folio srv
//!
//! # Serve ./site on all interfaces without the login gate
//! folio srv --host 0.0.0.0 --no-auth ./site
//! ```
//!
use crate::core::config::load_config;
use crate::core::error::Result;
use std::sync::Arc;
use tracing::info;

pub use config::SrvArgs;

/// Shared state and the `/api/*` handlers.
pub mod api;
/// Redirects local visitors without a session away from protected pages.
pub mod auth_gate;
/// Server argument and `.folio-srv.toml` handling.
pub mod config;
/// Router assembly and the server loop.
pub mod server_logic;
/// Startup diagnostics.
pub mod utils;

/// # Handle Server Command (`handle_srv`)
///
/// Loads the Folio config, resolves the server settings, builds the shared
/// state and runs the server until shutdown.
///
/// ## Errors
///
/// Propagates configuration, validation and server errors.
pub async fn handle_srv(args: SrvArgs) -> Result<()> {
    info!("Handling srv command with args: {:?}", args);

    let folio = load_config()?;
    let server_config = config::load_and_merge_config(args, &folio).await?;
    info!("Effective server config: {:?}", server_config);

    let state = Arc::new(api::AppState::from_config(&folio)?);
    server_logic::run_server(server_config, state).await
}
