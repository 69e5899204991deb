//! # Folio Server Utilities
//!
//! File: cli/src/commands/srv/utils.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Startup helpers for `folio srv`:
//! - Listing the HTML pages of the site directory
//! - Warning about gate pages that do not exist on disk
//! - Finding the machine's LAN address for the network URL
//!
use crate::core::config::AuthConfig;
use std::net::{IpAddr, UdpSocket};
use std::path::Path;
use tracing::{debug, info, warn};

/// # Log Site Pages (`log_site_pages`)
///
/// Logs every `.html` file at the top level of `directory` and returns how
/// many were found.
pub fn log_site_pages(directory: &Path) -> usize {
    let entries = match std::fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Could not read site directory '{}': {}", directory.display(), e);
            return 0;
        }
    };

    let mut pages: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".html"))
        .collect();
    pages.sort();

    if pages.is_empty() {
        warn!("No HTML pages found in {}", directory.display());
    }
    for page in &pages {
        info!("  - page: {}", page);
    }
    pages.len()
}

/// # Missing Gate Pages (`missing_gate_pages`)
///
/// Returns the login page and protected pages (as URL paths) that have no
/// file under `directory`.
pub fn missing_gate_pages(directory: &Path, auth: &AuthConfig) -> Vec<String> {
    std::iter::once(&auth.login_path)
        .chain(auth.protected_paths.iter())
        .filter(|path| !directory.join(path.trim_start_matches('/')).is_file())
        .cloned()
        .collect()
}

/// # Get Local IP Address (`get_local_ip`)
///
/// Asks the OS which local address it would route outbound traffic from.
/// No packet is sent; connecting a UDP socket only selects a route.
///
/// ## Returns
///
/// * `Option<IpAddr>`: The LAN address, or `None` when offline or only loopback is available.
pub fn get_local_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    if let Err(e) = socket.connect("8.8.8.8:80") {
        debug!("No outbound route for LAN address detection: {}", e);
        return None;
    }
    let ip = socket.local_addr().ok()?.ip();
    if ip.is_loopback() || ip.is_unspecified() {
        None
    } else {
        Some(ip)
    }
}
