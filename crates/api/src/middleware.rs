//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use axum_extra::extract::cookie::CookieJar;
use kplanner_core::{
    AdCampaignService, AdGroupService, AuthService, CompanyService, FilterService, KeywordService,
};

use crate::extractors::OwnerId;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub company_service: CompanyService,
    pub ad_campaign_service: AdCampaignService,
    pub ad_group_service: AdGroupService,
    pub keyword_service: KeywordService,
    pub filter_service: FilterService,
    pub auth_service: AuthService,
}

/// Authentication middleware.
///
/// Resolves the owner id from the Authorization header or the session cookie
/// and stores it in request extensions. Requests without a resolvable owner
/// pass through; the `AuthUser` extractor rejects them with 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let bearer = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    let jar = CookieJar::from_headers(req.headers());
    let cookie = jar
        .get(state.auth_service.session_cookie())
        .map(|c| c.value().to_string());

    match state
        .auth_service
        .resolve(bearer.as_deref(), cookie.as_deref())
    {
        Ok(owner) => {
            req.extensions_mut().insert(OwnerId(owner));
        }
        Err(e) => {
            tracing::debug!(error = %e, "request credentials did not resolve");
        }
    }

    next.run(req).await
}
