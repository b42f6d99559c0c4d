//! Authentication service.
//!
//! Resolves the external owner identity from a bearer token or session
//! cookie. Tokens are HS256 JWTs whose `sub` claim carries the owner id.
//! In dev mode every request runs as the configured demo user and token
//! validation is skipped entirely.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use kplanner_common::config::AuthConfig;
use kplanner_common::{AppError, AppResult};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[allow(dead_code)]
    exp: usize,
}

/// Service resolving request credentials to an owner id.
#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
}

impl AuthService {
    /// Create a new auth service.
    #[must_use]
    pub const fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Whether dev mode is enabled.
    #[must_use]
    pub const fn dev_mode(&self) -> bool {
        self.config.dev_mode
    }

    /// The demo user id used in dev mode.
    #[must_use]
    pub fn demo_user_id(&self) -> &str {
        &self.config.demo_user_id
    }

    /// Name of the session cookie checked when no Authorization header is
    /// present.
    #[must_use]
    pub fn session_cookie(&self) -> &str {
        &self.config.session_cookie
    }

    /// Resolve the owner id from a bearer token and/or session cookie.
    ///
    /// The bearer token wins when both are present.
    pub fn resolve(&self, bearer: Option<&str>, cookie: Option<&str>) -> AppResult<String> {
        if self.config.dev_mode {
            return Ok(self.config.demo_user_id.clone());
        }

        let token = bearer.or(cookie).ok_or(AppError::Unauthorized)?;

        let secret = self
            .config
            .jwt_secret
            .as_deref()
            .ok_or_else(|| AppError::Config("auth.jwt_secret is not configured".to_string()))?;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| AppError::AuthenticationFailed(e.to_string()))?;

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        exp: usize,
    }

    fn config(dev_mode: bool, secret: Option<&str>) -> AuthConfig {
        AuthConfig {
            dev_mode,
            demo_user_id: "clerk_demo_user".to_string(),
            jwt_secret: secret.map(str::to_string),
            session_cookie: "__session".to_string(),
        }
    }

    fn token(sub: &str, secret: &str) -> String {
        let claims = TestClaims {
            sub: sub.to_string(),
            exp: 4_102_444_800, // far future
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_dev_mode_skips_validation() {
        let service = AuthService::new(config(true, None));
        let owner = service.resolve(None, None).unwrap();
        assert_eq!(owner, "clerk_demo_user");
    }

    #[test]
    fn test_missing_credentials() {
        let service = AuthService::new(config(false, Some("secret")));
        let err = service.resolve(None, None).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn test_valid_bearer_token() {
        let service = AuthService::new(config(false, Some("secret")));
        let token = token("clerk_user_123", "secret");
        let owner = service.resolve(Some(&token), None).unwrap();
        assert_eq!(owner, "clerk_user_123");
    }

    #[test]
    fn test_cookie_fallback() {
        let service = AuthService::new(config(false, Some("secret")));
        let token = token("clerk_user_456", "secret");
        let owner = service.resolve(None, Some(&token)).unwrap();
        assert_eq!(owner, "clerk_user_456");
    }

    #[test]
    fn test_bad_signature_rejected() {
        let service = AuthService::new(config(false, Some("secret")));
        let token = token("clerk_user_123", "wrong-secret");
        let err = service.resolve(Some(&token), None).unwrap_err();
        assert!(matches!(err, AppError::AuthenticationFailed(_)));
    }
}
