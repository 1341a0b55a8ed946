// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session-key authentication middleware.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Authenticated user resolved from a session key.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i32,
}

/// Middleware that requires a session key belonging to a known user.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session_key =
        session_key_from_headers(request.headers()).ok_or(AppError::Unauthenticated)?;

    let user = match state.db.find_user_by_session_key(&session_key).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::debug!("Rejected unknown session key");
            return Err(AppError::Unauthenticated);
        }
        Err(e) => {
            tracing::warn!(error = %e, "Session lookup failed");
            return Err(AppError::Unauthenticated);
        }
    };

    request
        .extensions_mut()
        .insert(AuthUser { user_id: user.id });

    Ok(next.run(request).await)
}

/// Extract the session key from the `Authorization` header.
///
/// Accepts both a bare key and `Bearer <key>`.
pub fn session_key_from_headers(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let key = value.strip_prefix("Bearer ").unwrap_or(value).trim();

    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(auth: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(auth).unwrap());
        headers
    }

    #[test]
    fn test_bare_and_bearer_keys() {
        assert_eq!(
            session_key_from_headers(&headers_with("abc123")),
            Some("abc123".to_string())
        );
        assert_eq!(
            session_key_from_headers(&headers_with("Bearer abc123")),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_missing_or_empty_key() {
        assert_eq!(session_key_from_headers(&HeaderMap::new()), None);
        assert_eq!(session_key_from_headers(&headers_with("")), None);
        assert_eq!(session_key_from_headers(&headers_with("Bearer ")), None);
    }
}
