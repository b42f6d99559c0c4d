//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};

/// Owner id resolved by the auth middleware.
#[derive(Debug, Clone)]
pub struct OwnerId(pub String);

/// Authenticated owner extractor.
///
/// Rejects with 401 when the auth middleware did not resolve an owner.
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by the auth middleware
        parts
            .extensions
            .get::<OwnerId>()
            .cloned()
            .map(|owner| Self(owner.0))
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}
