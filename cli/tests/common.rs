//! # Folio CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test file
//! is its own crate, so they pull this module in with `mod common;`.
//!
//! Commands built here run inside an isolated directory: the user config
//! directory, the project config search and the contact environment variables
//! all point away from the developer's real setup.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::Path;

/// Environment variables that override contact settings.
const CONTACT_ENV_VARS: [&str; 6] = [
    "MAIL_API_URL",
    "MAIL_API_KEY",
    "MAIL_FROM_EMAIL",
    "CONTACT_TO_EMAIL",
    "CONTACT_STORE_URL",
    "FOLIO_CONTACT_ENDPOINT",
];

/// # Get Folio Command (`folio_cmd`)
///
/// ## Panics
/// Panics if the `folio` binary cannot be found via `Command::cargo_bin`.
pub fn folio_cmd() -> Command {
    Command::cargo_bin("folio").expect("Failed to find folio binary for testing")
}

/// # Get Isolated Folio Command (`folio_cmd_in`)
///
/// Runs `folio` with `dir` as working directory, home and config home, and
/// with the contact environment variables removed.
pub fn folio_cmd_in(dir: &Path) -> Command {
    // Marks `dir` as a repository root so the project config search stops here.
    std::fs::create_dir_all(dir.join(".git")).expect("Failed to create .git marker");

    let mut cmd = folio_cmd();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("RUST_LOG");
    for var in CONTACT_ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}
