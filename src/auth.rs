//! Bearer token authentication for the HTTP transport.
//!
//! The management API credentials grant full control over an Upstash
//! account, so an HTTP listener reachable by others should be started with
//! at least one `--auth-token`. Tokens are compared in constant time.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

/// Accepted bearer tokens for the HTTP transport.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    tokens: Vec<String>,
}

impl AuthConfig {
    /// Build from configured tokens. Blank entries are rejected, duplicates collapsed.
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut accepted: Vec<String> = Vec::new();
        for (index, token) in tokens.into_iter().enumerate() {
            let token = token.as_ref().trim();
            if token.is_empty() {
                return Err(format!("Auth token #{} is empty", index + 1));
            }
            if !accepted.iter().any(|t| t == token) {
                accepted.push(token.to_string());
            }
        }
        Ok(Self { tokens: accepted })
    }

    pub fn is_enabled(&self) -> bool {
        !self.tokens.is_empty()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Check a presented token against every configured one.
    ///
    /// All comparisons run so timing does not reveal which token matched.
    pub fn accepts(&self, presented: &str) -> bool {
        self.tokens.iter().fold(false, |matched, expected| {
            let equal = expected.len() == presented.len()
                && bool::from(expected.as_bytes().ct_eq(presented.as_bytes()));
            matched | equal
        })
    }
}

/// Why a request was turned away.
#[derive(Debug, PartialEq, Eq)]
enum Rejection {
    Missing,
    Malformed(&'static str),
    Invalid,
}

impl Rejection {
    fn message(&self) -> &'static str {
        match self {
            Self::Missing => "Missing Bearer token in Authorization header",
            Self::Malformed(reason) => *reason,
            Self::Invalid => "Invalid Bearer token",
        }
    }

    fn suggestion(&self) -> &'static str {
        match self {
            Self::Missing | Self::Malformed(_) => "Send 'Authorization: Bearer <token>'",
            Self::Invalid => "Use one of the tokens passed to the server with --auth-token",
        }
    }
}

/// Axum middleware rejecting requests without an accepted bearer token.
pub async fn auth_middleware(
    State(auth): State<Arc<AuthConfig>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let outcome = bearer_token(request.headers().get(header::AUTHORIZATION)).and_then(|token| {
        if auth.accepts(token) {
            Ok(())
        } else {
            warn!(token = %mask_token(token), "Rejected unknown bearer token");
            Err(Rejection::Invalid)
        }
    });

    match outcome {
        Ok(()) => {
            debug!(path = %request.uri().path(), "Authenticated request");
            next.run(request).await
        }
        Err(rejection) => {
            if rejection != Rejection::Invalid {
                warn!(reason = rejection.message(), "Rejected request without usable credentials");
            }
            unauthorized(&rejection)
        }
    }
}

fn bearer_token(value: Option<&HeaderValue>) -> Result<&str, Rejection> {
    let value = value.ok_or(Rejection::Missing)?;
    let value = value
        .to_str()
        .map_err(|_| Rejection::Malformed("Authorization header contains invalid characters"))?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or(Rejection::Malformed("Expected 'Bearer <token>' authorization"))?
        .trim();
    if token.is_empty() {
        return Err(Rejection::Malformed("Bearer token is empty"));
    }
    Ok(token)
}

fn mask_token(token: &str) -> String {
    let prefix: String = token.chars().take(3).collect();
    if token.chars().count() <= 3 {
        "***".to_string()
    } else {
        format!("{prefix}***")
    }
}

fn unauthorized(rejection: &Rejection) -> Response {
    let body = json!({
        "error": {
            "code": "unauthorized",
            "message": rejection.message(),
            "suggestion": rejection.suggestion(),
        }
    });
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Bearer")],
        axum::Json(body),
    )
        .into_response()
}
