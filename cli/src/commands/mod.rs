//! # Folio Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Every top-level `folio` command lives in its own module here. Each one
//! defines a Clap argument struct and an async `handle_*` function that
//! `main.rs` dispatches to.
//!
//! ## Commands
//!
//! - `srv`: serve the site with the contact relay, chat endpoint and login gate
//! - `chat`: talk to the assistant in the terminal
//! - `ask`: one question, one reply
//! - `contact`: submit the contact form from the terminal
//!

/// One-shot question to the assistant.
pub mod ask;
/// Interactive terminal chat widget.
pub mod chat;
/// Contact form submission.
pub mod contact;
/// Site server. Includes configuration, API handlers and the login gate.
pub mod srv;
