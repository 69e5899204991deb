//! # Contact Module
//!
//! File: cli/src/contact/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Everything behind the portfolio contact form:
//! - `submission`: raw request body and its validated form
//! - `mailer`: composing and delivering the relayed email
//! - `store`: add-only persistence of submissions
//! - `relay`: client for `POST /api/contact`
//! - `form`: the submit flow that runs persistence and relay side by side
//!
//! The server half (`/api/contact`) lives in `commands::srv::api` and is
//! built from `submission` and `mailer`.
//!
pub mod form;
pub mod mailer;
pub mod relay;
pub mod store;
pub mod submission;
