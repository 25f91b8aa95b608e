//! Session token extraction for HTTP routes
//!
//! The token comes from the `X-Session-Id` header, or failing that from the
//! `session_id` cookie the dashboard sets. A missing token is not a
//! rejection: it resolves to an empty capability set, which the use case
//! turns into `Unauthorized`.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use rdm_domain::CapabilitySet;

use crate::infrastructure::ports::{RepoError, SessionRepo};

pub const SESSION_HEADER: &str = "X-Session-Id";
pub const SESSION_COOKIE: &str = "session_id";

/// Extractor for the caller's session token, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(pub Option<String>);

impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let from_header = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let token = from_header.or_else(|| {
            parts
                .headers
                .get_all(axum::http::header::COOKIE)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .find_map(cookie_value)
        });

        Ok(SessionToken(token))
    }
}

fn cookie_value(header: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Look up the caller's permission mask and decode it.
///
/// No token and unknown tokens both yield the empty set. A session store
/// fault is an error, not an anonymous caller.
pub async fn resolve_capabilities(
    sessions: &dyn SessionRepo,
    token: Option<&str>,
) -> Result<CapabilitySet, RepoError> {
    let Some(token) = token else {
        return Ok(CapabilitySet::empty());
    };
    let mask = sessions.get_permissions(token).await?;
    Ok(CapabilitySet::decode(mask))
}
