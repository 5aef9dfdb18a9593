//! Scraper authentication for the wayfinder-service API.
//!
//! Only the location scraper may write. It presents the shared secret as
//! `Authorization: Bearer <token>`; anything else is answered with 403
//! before the request body is read.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::api::AppError;
use crate::state::AppState;

/// Why a scraper request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No scraper secret is configured on the server.
    NotConfigured,
    /// The `Authorization` header is absent or not valid text.
    MissingHeader,
    /// The header does not use the `Bearer` scheme.
    WrongScheme,
    /// The token does not match the secret.
    WrongToken,
}

impl AuthFailure {
    fn describe(self) -> &'static str {
        match self {
            AuthFailure::NotConfigured => "no scraper API key configured",
            AuthFailure::MissingHeader => "missing Authorization header",
            AuthFailure::WrongScheme => "Authorization scheme is not Bearer",
            AuthFailure::WrongToken => "bearer token does not match",
        }
    }
}

/// Extract the bearer token from an `Authorization` header value.
///
/// The token runs from after `"Bearer "` up to the next space.
///
/// # Examples
///
/// ```
/// use wayfinder_service::middleware::bearer_token;
///
/// assert_eq!(bearer_token("Bearer abc123"), Some("abc123"));
/// assert_eq!(bearer_token("Bearer abc 123"), Some("abc"));
/// assert_eq!(bearer_token("Basic abc123"), None);
/// ```
pub fn bearer_token(value: &str) -> Option<&str> {
    let rest = value.strip_prefix("Bearer ")?;
    rest.split(' ').next().filter(|token| !token.is_empty())
}

/// Check request headers against the configured scraper secret.
pub fn check_scraper_token(headers: &HeaderMap, secret: Option<&str>) -> Result<(), AuthFailure> {
    let secret = secret.ok_or(AuthFailure::NotConfigured)?;
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthFailure::MissingHeader)?;
    let token = bearer_token(value).ok_or(AuthFailure::WrongScheme)?;

    if bool::from(token.as_bytes().ct_eq(secret.as_bytes())) {
        Ok(())
    } else {
        Err(AuthFailure::WrongToken)
    }
}

/// Scraper authentication middleware.
///
/// Returns 403 Forbidden unless the bearer token equals the configured
/// `security.scraper_api_key`.
pub async fn scraper_auth(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let result = {
        let config = state.config.read().await;
        check_scraper_token(&headers, config.security.scraper_api_key.as_deref())
    };

    match result {
        Ok(()) => next.run(request).await,
        Err(failure) => {
            warn!(
                "Scraper authentication failed for {} {}: {}",
                request.method(),
                request.uri().path(),
                failure.describe()
            );
            AppError::Forbidden("Forbidden".to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer token"), Some("token"));
        assert_eq!(bearer_token("Bearer token trailing"), Some("token"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("bearer token"), None);
        assert_eq!(bearer_token("Token token"), None);
        assert_eq!(bearer_token(""), None);
    }

    #[test]
    fn test_matching_token_passes() {
        let headers = headers_with("Bearer s3cret");
        assert_eq!(check_scraper_token(&headers, Some("s3cret")), Ok(()));
    }

    #[test]
    fn test_no_secret_configured_refuses_everything() {
        let headers = headers_with("Bearer s3cret");
        assert_eq!(
            check_scraper_token(&headers, None),
            Err(AuthFailure::NotConfigured)
        );
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(
            check_scraper_token(&HeaderMap::new(), Some("s3cret")),
            Err(AuthFailure::MissingHeader)
        );
    }

    #[test]
    fn test_wrong_scheme() {
        let headers = headers_with("Basic s3cret");
        assert_eq!(
            check_scraper_token(&headers, Some("s3cret")),
            Err(AuthFailure::WrongScheme)
        );
    }

    #[test]
    fn test_wrong_token() {
        for value in ["Bearer s3cre", "Bearer s3cret!", "Bearer S3CRET"] {
            assert_eq!(
                check_scraper_token(&headers_with(value), Some("s3cret")),
                Err(AuthFailure::WrongToken),
                "{value}"
            );
        }
    }
}
