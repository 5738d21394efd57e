//! Acting-user header extractor.

use std::convert::Infallible;

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use domain::models::SYSTEM_ACTOR;

/// The header naming the user on whose behalf a request is made.
pub const ACTOR_HEADER: &str = "x-actor";

/// Longest actor name recorded in the movement log.
const MAX_ACTOR_LEN: usize = 120;

/// The acting user recorded in movement entries.
///
/// Falls back to `System` when the header is absent, blank or not valid text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor(pub String);

impl Actor {
    pub fn system() -> Self {
        Actor(SYSTEM_ACTOR.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_header(value: Option<&str>) -> Self {
        value
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Actor(s.chars().take(MAX_ACTOR_LEN).collect()))
            .unwrap_or_else(Actor::system)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|value| std::str::from_utf8(value.as_bytes()).ok());
        Ok(Actor::from_header(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Actor {
        let (mut parts, _) = request.into_parts();
        Actor::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_actor_from_header() {
        let request = Request::builder()
            .header("X-Actor", "  María López ")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await.as_str(), "María López");
    }

    #[tokio::test]
    async fn test_missing_header_is_system() {
        let request = Request::builder().body(()).unwrap();
        assert_eq!(extract(request).await, Actor::system());
    }

    #[tokio::test]
    async fn test_accented_actor_is_kept() {
        let value = axum::http::HeaderValue::from_bytes("José Núñez".as_bytes()).unwrap();
        let request = Request::builder().header(ACTOR_HEADER, value).body(()).unwrap();
        assert_eq!(extract(request).await.as_str(), "José Núñez");
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_system() {
        let value = axum::http::HeaderValue::from_bytes(&[0xC3, 0x28]).unwrap();
        let request = Request::builder().header(ACTOR_HEADER, value).body(()).unwrap();
        assert_eq!(extract(request).await, Actor::system());
    }

    #[test]
    fn test_blank_header_is_system() {
        assert_eq!(Actor::from_header(Some("   ")), Actor::system());
    }

    #[test]
    fn test_long_actor_is_truncated() {
        let long = "a".repeat(300);
        assert_eq!(Actor::from_header(Some(&long)).0.len(), MAX_ACTOR_LEN);
    }
}
