//! # Folio Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module implements the configuration system for Folio, handling loading,
//! merging, validation, and access to configuration data. It supports a multi-level
//! configuration approach that combines defaults, user settings, project-specific
//! overrides and environment variables.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Environment variables (`CONTACT_TO_EMAIL`, `MAIL_FROM_EMAIL`, `MAIL_API_URL`,
//!    `MAIL_API_KEY`, `CONTACT_STORE_URL`)
//! 2. Project-specific `.folio.toml` in current directory or ancestors
//! 3. User-specific `<config dir>/folio/config.toml`
//! 4. Default values defined in the code
//!
//! Loading fails fast on configuration defects: an invalid keyword rule or an
//! empty response pool is reported here, at startup, never at reply time.
//!
//! ## Examples
//!
//! ```toml
//! [chat]
//! bot_name = "Shy"
//! typing_delay_min_ms = 700
//! typing_delay_max_ms = 1300
//!
//! [[chat.rules]]
//! category = "skills"
//! keywords = ["skill", "rust"]
//!
//! [chat.responses]
//! skills = ["Mostly Rust these days."]
//!
//! [contact]
//! mail_api_url = "https://mail.example.com/v1/send"
//! to_email = "me@example.com"
//!
//! [site]
//! directory = "~/portfolio/public"
//! ```
//!
use crate::chat::category::Category;
use crate::chat::classifier::KeywordRule;
use crate::chat::widget::QUICK_REPLIES;
use crate::chat::ChatEngine;
use crate::core::error::{FolioError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::HashMap;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub contact: ContactConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub site: SiteConfig,
}

/// Settings for the "Shy" chat assistant.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Display name of the assistant.
    #[serde(default = "default_bot_name")]
    pub bot_name: String,
    /// Lower bound of the simulated typing delay.
    #[serde(default = "default_typing_min")]
    pub typing_delay_min_ms: u64,
    /// Upper bound of the simulated typing delay.
    #[serde(default = "default_typing_max")]
    pub typing_delay_max_ms: u64,
    /// Quick-reply labels; each should be a keyword of its intended category.
    #[serde(default = "default_quick_replies")]
    pub quick_replies: Vec<String>,
    /// Replaces the built-in keyword table when set. Order is priority.
    #[serde(default)]
    pub rules: Option<Vec<KeywordRule>>,
    /// Per-category replacements for the built-in reply pools.
    #[serde(default)]
    pub responses: HashMap<Category, Vec<String>>,
    /// Fixed seed for reply selection (reproducible demos and tests).
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Settings for the contact relay and the contact form client.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ContactConfig {
    /// HTTP email API the relay endpoint delivers through.
    #[serde(default)]
    pub mail_api_url: Option<String>,
    /// Bearer key for the email API.
    #[serde(default)]
    pub mail_api_key: Option<String>,
    /// Sender address of relayed mail.
    #[serde(default)]
    pub from_email: Option<String>,
    /// Recipient of relayed mail; falls back to `from_email`.
    #[serde(default)]
    pub to_email: Option<String>,
    /// Base URL of the document store's REST API.
    #[serde(default)]
    pub store_url: Option<String>,
    /// Collection that receives contact submissions.
    #[serde(default = "default_collection")]
    pub collection: String,
    /// `/api/contact` endpoint used by `folio contact`.
    #[serde(default = "default_relay_endpoint")]
    pub relay_endpoint: String,
    /// Independent timeout for each side effect of a submission.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
    /// How long the sent/failed notice stays before the form resets.
    #[serde(default = "default_status_reset")]
    pub status_reset_ms: u64,
}

/// Settings for the local-only login gate.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Pages that require the session cookie on local hosts.
    #[serde(default = "default_protected_paths")]
    pub protected_paths: Vec<String>,
    /// Where unauthenticated local visitors are sent.
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Cookie set by the sign-in page once the provider accepts the user.
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
}

/// Where the static site lives.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Default directory for `folio srv` (can use ~). Will be expanded.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_bot_name() -> String {
    "Shy".to_string()
}
fn default_typing_min() -> u64 {
    700
}
fn default_typing_max() -> u64 {
    1300
}
fn default_quick_replies() -> Vec<String> {
    QUICK_REPLIES.iter().map(|s| s.to_string()).collect()
}
fn default_collection() -> String {
    "contactMessages".to_string()
}
fn default_relay_endpoint() -> String {
    "http://127.0.0.1:8000/api/contact".to_string()
}
fn default_request_timeout() -> u64 {
    10_000
}
fn default_status_reset() -> u64 {
    3_500
}
fn default_true() -> bool {
    true
}
fn default_protected_paths() -> Vec<String> {
    vec!["/portfolio.html".to_string()]
}
fn default_login_path() -> String {
    "/index.html".to_string()
}
fn default_session_cookie() -> String {
    "sn_portfolio_auth".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            bot_name: default_bot_name(),
            typing_delay_min_ms: default_typing_min(),
            typing_delay_max_ms: default_typing_max(),
            quick_replies: default_quick_replies(),
            rules: None,
            responses: HashMap::new(),
            seed: None,
        }
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            mail_api_url: None,
            mail_api_key: None,
            from_email: None,
            to_email: None,
            store_url: None,
            collection: default_collection(),
            relay_endpoint: default_relay_endpoint(),
            request_timeout_ms: default_request_timeout(),
            status_reset_ms: default_status_reset(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            protected_paths: default_protected_paths(),
            login_path: default_login_path(),
            session_cookie: default_session_cookie(),
        }
    }
}

const PROJECT_CONFIG_FILENAME: &str = ".folio.toml";

/// # Load Configuration (`load_config`)
///
/// Loads user and project files, merges them, applies environment overrides,
/// expands paths and validates the result.
pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    apply_env_overrides(&mut merged_config, |key| std::env::var(key).ok());
    expand_config_paths(&mut merged_config).context("Failed to expand paths in configuration")?;
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "Folio", "folio") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.folio.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

/// Walks up from `start` looking for `.folio.toml`, stopping at a `.git` directory.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path: &Path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Project values win wherever they differ from the defaults.
fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project_cfg = match project {
        Some(p) => p,
        None => return user,
    };
    let chat_defaults = ChatConfig::default();
    let contact_defaults = ContactConfig::default();
    let auth_defaults = AuthConfig::default();

    let mut merged = Config::default();

    merged.chat.bot_name = if project_cfg.chat.bot_name != chat_defaults.bot_name {
        project_cfg.chat.bot_name
    } else {
        user.chat.bot_name
    };
    merged.chat.typing_delay_min_ms =
        if project_cfg.chat.typing_delay_min_ms != chat_defaults.typing_delay_min_ms {
            project_cfg.chat.typing_delay_min_ms
        } else {
            user.chat.typing_delay_min_ms
        };
    merged.chat.typing_delay_max_ms =
        if project_cfg.chat.typing_delay_max_ms != chat_defaults.typing_delay_max_ms {
            project_cfg.chat.typing_delay_max_ms
        } else {
            user.chat.typing_delay_max_ms
        };
    merged.chat.quick_replies = if project_cfg.chat.quick_replies != chat_defaults.quick_replies {
        project_cfg.chat.quick_replies
    } else {
        user.chat.quick_replies
    };
    merged.chat.rules = project_cfg.chat.rules.or(user.chat.rules);
    merged.chat.responses = user.chat.responses;
    merged.chat.responses.extend(project_cfg.chat.responses);
    merged.chat.seed = project_cfg.chat.seed.or(user.chat.seed);

    merged.contact.mail_api_url = project_cfg.contact.mail_api_url.or(user.contact.mail_api_url);
    merged.contact.mail_api_key = project_cfg.contact.mail_api_key.or(user.contact.mail_api_key);
    merged.contact.from_email = project_cfg.contact.from_email.or(user.contact.from_email);
    merged.contact.to_email = project_cfg.contact.to_email.or(user.contact.to_email);
    merged.contact.store_url = project_cfg.contact.store_url.or(user.contact.store_url);
    merged.contact.collection = if project_cfg.contact.collection != contact_defaults.collection {
        project_cfg.contact.collection
    } else {
        user.contact.collection
    };
    merged.contact.relay_endpoint =
        if project_cfg.contact.relay_endpoint != contact_defaults.relay_endpoint {
            project_cfg.contact.relay_endpoint
        } else {
            user.contact.relay_endpoint
        };
    merged.contact.request_timeout_ms =
        if project_cfg.contact.request_timeout_ms != contact_defaults.request_timeout_ms {
            project_cfg.contact.request_timeout_ms
        } else {
            user.contact.request_timeout_ms
        };
    merged.contact.status_reset_ms =
        if project_cfg.contact.status_reset_ms != contact_defaults.status_reset_ms {
            project_cfg.contact.status_reset_ms
        } else {
            user.contact.status_reset_ms
        };

    merged.auth = if project_cfg.auth != auth_defaults {
        project_cfg.auth
    } else {
        user.auth
    };

    merged.site.directory = project_cfg.site.directory.or(user.site.directory);
    merged
}

/// Applies the environment variables the contact relay reads.
/// `lookup` is injected so tests do not touch the process environment.
fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let overrides: [(&str, &mut Option<String>); 5] = [
        ("MAIL_API_URL", &mut config.contact.mail_api_url),
        ("MAIL_API_KEY", &mut config.contact.mail_api_key),
        ("MAIL_FROM_EMAIL", &mut config.contact.from_email),
        ("CONTACT_TO_EMAIL", &mut config.contact.to_email),
        ("CONTACT_STORE_URL", &mut config.contact.store_url),
    ];
    for (key, slot) in overrides {
        if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
            debug!("Applying {} from environment", key);
            *slot = Some(value);
        }
    }
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    if let Some(dir) = config.site.directory.as_mut() {
        *dir = shellexpand::tilde(dir).into_owned();
        debug!("Expanded site directory: {}", dir);
    }
    Ok(())
}

/// # Validate Configuration (`validate_config`)
///
/// Rejects configuration defects before anything is served. Building the
/// chat engine here surfaces empty pools and bad keyword rules at startup.
pub fn validate_config(config: &Config) -> Result<()> {
    info!("Validating final configuration...");

    if config.chat.typing_delay_min_ms > config.chat.typing_delay_max_ms {
        return Err(anyhow!(FolioError::Config(format!(
            "typing_delay_min_ms ({}) is greater than typing_delay_max_ms ({})",
            config.chat.typing_delay_min_ms, config.chat.typing_delay_max_ms
        ))));
    }
    ChatEngine::from_config(&config.chat)?;

    if config.contact.collection.trim().is_empty() {
        return Err(anyhow!(FolioError::Config(
            "contact.collection cannot be empty".to_string()
        )));
    }
    if config.contact.request_timeout_ms == 0 {
        return Err(anyhow!(FolioError::Config(
            "contact.request_timeout_ms must be greater than zero".to_string()
        )));
    }

    for path in config
        .auth
        .protected_paths
        .iter()
        .chain(std::iter::once(&config.auth.login_path))
    {
        if !path.starts_with('/') {
            return Err(anyhow!(FolioError::Config(format!(
                "Auth path '{}' must start with '/'",
                path
            ))));
        }
    }
    if config.auth.session_cookie.trim().is_empty() {
        return Err(anyhow!(FolioError::Config(
            "auth.session_cookie cannot be empty".to_string()
        )));
    }

    if let Some(dir) = &config.site.directory {
        let site_dir = PathBuf::from(dir);
        if !site_dir.exists() {
            warn!("Configured site directory '{}' does not exist.", site_dir.display());
        } else if !site_dir.is_dir() {
            return Err(anyhow!(FolioError::Config(format!(
                "Configured site path '{}' exists but is not a directory.",
                site_dir.display()
            ))));
        }
    }

    info!("Configuration validation successful.");
    Ok(())
}
