//! HTTP basic authentication
//!
//! A single user, `admin`, with the password given at startup.

use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::sync::Arc;

pub const AUTH_USER: &str = "admin";
const CHALLENGE: &str = "Basic realm=\"bcc-exporter\"";

#[derive(Clone)]
pub struct BasicAuth {
    password: Arc<str>,
}

impl BasicAuth {
    #[must_use]
    pub fn new(password: &str) -> Self {
        Self { password: Arc::from(password) }
    }

    fn accepts(&self, headers: &HeaderMap) -> bool {
        let Some((user, password)) = basic_credentials(headers) else {
            return false;
        };
        user == AUTH_USER && constant_time_eq(password.as_bytes(), self.password.as_bytes())
    }
}

pub async fn require_basic_auth(
    State(auth): State<BasicAuth>,
    req: Request,
    next: Next,
) -> Response {
    if auth.accepts(req.headers()) {
        next.run(req).await
    } else {
        (StatusCode::UNAUTHORIZED, [(WWW_AUTHENTICATE, CHALLENGE)], "Unauthorized").into_response()
    }
}

/// Decode `Authorization: Basic <base64(user:password)>`.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = String::from_utf8(STANDARD.decode(encoded.trim()).ok()?).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

/// Comparison time depends only on the lengths.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
