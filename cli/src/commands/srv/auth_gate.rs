//! # Login Gate
//!
//! File: cli/src/commands/srv/auth_gate.rs
//! Author: Christi Mahu
//!
//! Keeps protected pages behind the sign-in page while the site is served
//! locally. A request is redirected (303) to the login page when all of the
//! following hold:
//! - the `Host` is local (`localhost`, `127.0.0.1` or `[::1]`)
//! - the path is one of the protected pages
//! - the session cookie is absent or empty
//!
//! Any other host bypasses the gate, so a public deployment is not affected.
//! Signing in (and setting the cookie) is the sign-in page's job.
//!
//! Paths are compared after the same decoding `ServeDir` applies before it
//! opens a file, so `/portfolio%2Ehtml` or `//portfolio.html` are the
//! protected page too. A path that cannot be decoded, or that climbs with
//! `..`, is treated as protected.
//!
use super::api::SharedState;
use crate::core::config::AuthConfig;
use axum::{
    extract::{Request, State},
    http::header::HOST,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

const LOCAL_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "[::1]"];

/// Strips the port from a `Host` value and checks it against the local names.
/// A missing host counts as local.
pub fn host_is_local(host: Option<&str>) -> bool {
    let Some(host) = host else {
        return true;
    };
    let name = if host.starts_with('[') {
        // IPv6 literal, keep the brackets.
        match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        }
    } else {
        host.split(':').next().unwrap_or(host)
    };
    LOCAL_HOSTS.iter().any(|local| name.eq_ignore_ascii_case(local))
}

/// Percent-decodes a request path and collapses empty and `.` segments.
///
/// Returns `None` for invalid UTF-8 after decoding or for any `..` segment.
pub fn normalize_path(raw: &str) -> Option<String> {
    let decoded = urlencoding::decode(raw).ok()?;
    let mut segments = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            other => segments.push(other),
        }
    }
    Some(format!("/{}", segments.join("/")))
}

fn is_protected(auth: &AuthConfig, path: &str) -> bool {
    let Some(path) = normalize_path(path) else {
        return true;
    };
    auth.protected_paths
        .iter()
        .any(|protected| normalize_path(protected).is_some_and(|p| p == path))
}

/// # Decide Redirect (`requires_login`)
///
/// Pure decision behind [`login_gate`].
pub fn requires_login(auth: &AuthConfig, host: Option<&str>, path: &str, has_session: bool) -> bool {
    auth.enabled && !has_session && host_is_local(host) && is_protected(auth, path)
}

/// Axum middleware wrapping the whole site.
pub async fn login_gate(
    State(state): State<SharedState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let host = request
        .headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| request.uri().host());
    let has_session = jar
        .get(&state.auth.session_cookie)
        .is_some_and(|cookie| !cookie.value().is_empty());

    if requires_login(&state.auth, host, request.uri().path(), has_session) {
        debug!(
            "No session for {} on local host, redirecting to {}",
            request.uri().path(),
            state.auth.login_path
        );
        return Redirect::to(&state.auth.login_path).into_response();
    }

    next.run(request).await
}
