//! # Folio Server Configuration
//!
//! File: cli/src/commands/srv/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Resolves the settings of `folio srv` from three places:
//! 1. Command-line arguments (highest priority)
//! 2. `.folio-srv.toml` in the site directory (if present)
//! 3. Defaults, with the site directory falling back to `site.directory`
//!    from the main Folio config
//!
//! ## Examples
//!
//! Configuration file format:
//!
//! ```toml
//! port = 9000
//! host = "0.0.0.0"
//! directory = "public"
//! enable_cors = true
//! enable_auth = false
//! ```
//!
use crate::core::config::Config;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use std::net::IpAddr;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Name of the per-site server configuration file.
const CONFIG_FILE_NAME: &str = ".folio-srv.toml";

/// # Server Command Arguments (`SrvArgs`)
///
/// Arguments of `folio srv`. Anything left at its default can be supplied
/// by `.folio-srv.toml` instead.
#[derive(Parser, Debug)]
pub struct SrvArgs {
    /// Directory holding the static site. Defaults to `site.directory` from
    /// the Folio config, then to the current directory.
    pub directory: Option<PathBuf>,

    /// Port to listen on. The next free port is used if it is taken.
    #[arg(long, short, default_value_t = 8000)]
    pub port: u16,

    /// Address to bind. `127.0.0.1` keeps the server local.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Do not send CORS headers.
    #[arg(long)]
    pub no_cors: bool,

    /// Serve protected pages without the login gate.
    #[arg(long)]
    pub no_auth: bool,
}

/// # Effective Server Configuration (`ServerConfig`)
///
/// Final settings after merging arguments, the site file and defaults.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: IpAddr,
    /// Absolute, canonical path of the site directory.
    pub directory: PathBuf,
    pub enable_cors: bool,
    /// Whether the login gate runs; `auth.enabled` in the main config can
    /// also switch it off.
    pub enable_auth: bool,
}

/// Raw contents of `.folio-srv.toml`.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    port: Option<u16>,
    host: Option<String>,
    directory: Option<String>,
    enable_cors: Option<bool>,
    enable_auth: Option<bool>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
            directory: PathBuf::from("."),
            enable_cors: true,
            enable_auth: true,
        }
    }
}

/// # Load and Merge Server Configuration (`load_and_merge_config`)
///
/// ## Arguments
///
/// * `args`: Parsed `folio srv` arguments.
/// * `folio`: The loaded main configuration (for `site.directory` and `auth.enabled`).
///
/// ## Returns
///
/// * `Result<ServerConfig>`: Settings with a resolved, existing directory.
///
/// ## Errors
///
/// Returns an error if the current directory cannot be determined, the
/// site file cannot be read or parsed, or the final directory does not exist.
pub async fn load_and_merge_config(args: SrvArgs, folio: &Config) -> Result<ServerConfig> {
    let cli_defaults = SrvArgs::parse_from([""]);

    // Directory named on the command line wins; otherwise the main config's
    // site directory; otherwise the working directory.
    let base_dir = match &args.directory {
        Some(dir) => dir.clone(),
        None => folio
            .site
            .directory
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    let search_dir = absolute(&base_dir)?;
    debug!("Looking for {} in {}", CONFIG_FILE_NAME, search_dir.display());

    let mut effective = ServerConfig {
        port: args.port,
        host: args.host,
        directory: search_dir.clone(),
        enable_cors: !args.no_cors,
        enable_auth: !args.no_auth && folio.auth.enabled,
    };

    if let Some(file) = load_config_from_dir(&search_dir)? {
        info!("Loaded settings from {}", search_dir.join(CONFIG_FILE_NAME).display());

        if args.port == cli_defaults.port {
            if let Some(port) = file.port {
                effective.port = port;
            }
        }
        if args.host == cli_defaults.host {
            if let Some(host) = file.host.as_deref() {
                match host.parse() {
                    Ok(ip) => effective.host = ip,
                    Err(e) => warn!("Invalid host '{}' in {} ({}), keeping {}", host, CONFIG_FILE_NAME, e, effective.host),
                }
            }
        }
        if !args.no_cors {
            if let Some(cors) = file.enable_cors {
                effective.enable_cors = cors;
            }
        }
        if !args.no_auth && folio.auth.enabled {
            if let Some(auth) = file.enable_auth {
                effective.enable_auth = auth;
            }
        }
        // Relative to the file's own directory.
        if let Some(dir) = file.directory.as_deref() {
            effective.directory = search_dir.join(dir);
        }
    } else {
        debug!("No {} found, using arguments only", CONFIG_FILE_NAME);
    }

    effective.resolve_directory().await?;
    Ok(effective)
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(env::current_dir()
            .context("Failed to get current working directory")?
            .join(path))
    }
}

/// Reads `.folio-srv.toml` from `search_dir`. A missing file is `Ok(None)`.
fn load_config_from_dir(search_dir: &Path) -> Result<Option<FileConfig>> {
    let config_path = search_dir.join(CONFIG_FILE_NAME);
    if !config_path.is_file() {
        return Ok(None);
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let file_config: FileConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
    Ok(Some(file_config))
}

impl ServerConfig {
    /// Canonicalizes `directory` and checks that it is a directory.
    async fn resolve_directory(&mut self) -> Result<()> {
        let absolute_path = absolute(&self.directory)?;
        let canonical = tokio::fs::canonicalize(&absolute_path).await.with_context(|| {
            format!(
                "Directory '{}' could not be found or accessed",
                absolute_path.display()
            )
        })?;
        let metadata = tokio::fs::metadata(&canonical)
            .await
            .with_context(|| format!("Failed to get metadata for path '{}'", canonical.display()))?;
        if !metadata.is_dir() {
            anyhow::bail!("Path is not a directory: {}", canonical.display());
        }
        self.directory = canonical;
        debug!("Resolved site directory to: {}", self.directory.display());
        Ok(())
    }
}
