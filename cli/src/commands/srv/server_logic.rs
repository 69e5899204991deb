//! # Folio HTTP Server Implementation
//!
//! File: cli/src/commands/srv/server_logic.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Serves the portfolio site:
//! - Static files from the site directory
//! - `POST /api/contact` and `POST /api/chat`
//! - The login gate in front of protected pages (local hosts only)
//! - Port fallback when the requested port is taken
//! - Graceful shutdown on Ctrl+C / SIGTERM
//!
//! ## Architecture
//!
//! 1. Find an available port starting at the configured one
//! 2. Build the Axum router (`create_app`)
//! 3. Print the URLs and serve until a shutdown signal arrives
//!
//! ```text
//! request -> TraceLayer -> CorsLayer -> login gate -> /api/* handlers
//!                                                  -> ServeDir (everything else)
//! ```
//!
use super::api::{self, SharedState};
use super::auth_gate;
use super::config::ServerConfig;
use super::utils;
use crate::core::error::Result;
use anyhow::Context;
use axum::{middleware, routing::post, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

/// How many consecutive ports to try before giving up.
const MAX_PORT_ATTEMPTS: u8 = 10;

/// # Run HTTP Server (`run_server`)
///
/// ## Arguments
///
/// * `config`: Resolved server settings.
/// * `state`: Chat engine, mailer and gate settings shared by the handlers.
///
/// ## Errors
///
/// Returns an error if no port is available, the listener cannot be bound,
/// or the server fails while running.
pub async fn run_server(config: ServerConfig, state: SharedState) -> Result<()> {
    let addr = find_available_port(config.host, config.port, MAX_PORT_ATTEMPTS).await?;

    utils::log_site_pages(&config.directory);
    if config.enable_auth {
        for page in utils::missing_gate_pages(&config.directory, &state.auth) {
            warn!("Login gate page {} does not exist in the site directory", page);
        }
    }
    let local_ip = utils::get_local_ip();

    let app = create_app(&config, state);

    println!("\n=================================================================");
    println!("📂 Serving site from:  {}", config.directory.display());
    println!("🌐 Local URL:          http://localhost:{}", addr.port());
    if let Some(ip) = local_ip {
        println!("🔗 Network URL:        http://{}:{}", ip, addr.port());
    }
    println!("⚙️  Binding to address: {}", addr);
    println!("✉️  Contact relay:      POST /api/contact");
    println!("💬 Chat endpoint:      POST /api/chat");
    println!("🔒 CORS enabled:       {}", config.enable_cors);
    println!("🚪 Login gate:         {}", config.enable_auth);
    println!("=================================================================\n");

    info!("Starting server on {} for {}", addr, config.directory.display());
    println!("Server starting! Press Ctrl+C to stop.");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    println!("\nServer shutdown complete.");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// # Find Available Port (`find_available_port`)
///
/// Tries `start_port`, then the following ports, up to `max_attempts` in total.
///
/// ## Errors
///
/// Returns an error if every attempted port is in use.
async fn find_available_port(
    req_host: std::net::IpAddr,
    start_port: u16,
    max_attempts: u8,
) -> Result<SocketAddr> {
    let mut current_port = start_port;

    for attempt in 0..max_attempts {
        let addr = SocketAddr::new(req_host, current_port);
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                drop(listener);
                if attempt > 0 {
                    info!(
                        "Port {} was unavailable, using port {} instead.",
                        start_port, current_port
                    );
                }
                return Ok(addr);
            }
            Err(e) => {
                warn!(
                    "Attempt {}: port {} on {} is unavailable ({}). Trying next port...",
                    attempt + 1,
                    current_port,
                    req_host,
                    e
                );
                current_port = current_port.checked_add(1).with_context(|| {
                    format!("Ran out of ports after {}", start_port)
                })?;
            }
        }
    }

    anyhow::bail!(
        "Could not find an available port on host {} starting from port {} after trying {} ports.",
        req_host,
        start_port,
        max_attempts
    )
}

/// # Create Axum Application (`create_app`)
///
/// API routes are matched first; everything else falls through to the
/// static files. The login gate, when enabled, wraps both.
pub fn create_app(config: &ServerConfig, state: SharedState) -> Router {
    let cors_layer = if config.enable_cors {
        info!("CORS middleware enabled (permissive).");
        CorsLayer::permissive()
    } else {
        info!("CORS middleware disabled.");
        CorsLayer::new()
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(true))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let mut app = Router::new()
        .route(
            "/api/contact",
            post(api::contact).fallback(api::method_not_allowed),
        )
        .route("/api/chat", post(api::chat).fallback(api::method_not_allowed))
        .fallback_service(ServeDir::new(&config.directory));

    if config.enable_auth {
        app = app.layer(middleware::from_fn_with_state(
            state.clone(),
            auth_gate::login_gate,
        ));
    } else {
        info!("Login gate disabled.");
    }

    app.layer(
        ServiceBuilder::new()
            .layer(trace_layer)
            .layer(cors_layer),
    )
    .with_state(state)
}
