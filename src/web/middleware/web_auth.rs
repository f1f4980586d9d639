//! Cookie-based authentication middleware for web dashboard.

use axum::{
    extract::{Request, State},
    http::{Method, header::COOKIE},
    middleware::Next,
    response::{Redirect, Response},
};

use crate::application::services::session_service::{SESSION_COOKIE, find_cookie};
use crate::state::AppState;

/// Authenticates dashboard requests using the signed session cookie.
///
/// # Cookie Format
///
/// ```text
/// Cookie: session=<payload>.<signature>
/// ```
///
/// # Authentication Flow
///
/// 1. Extract the `session` cookie from the request
/// 2. Verify signature and expiry via [`crate::application::services::SessionService`]
/// 3. On success, store the [`crate::application::services::session_service::SessionClaims`]
///    in request extensions and continue to the handler
/// 4. On failure or missing cookie, redirect to the sign-in page. A page request
///    carries its path along as `redirectTo` so sign-in can return to it.
///
/// # Errors
///
/// Returns `Redirect` to the sign-in page (`/login`) if:
/// - `session` cookie is missing
/// - the signature does not match
/// - the session expired
pub async fn layer(
    State(st): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Redirect> {
    let claims = req
        .headers()
        .get(COOKIE)
        .and_then(|cookie_header| cookie_header.to_str().ok())
        .and_then(|cookie_str| find_cookie(cookie_str, SESSION_COOKIE))
        .and_then(|value| st.auth_service.sessions().verify(value));

    match claims {
        Some(claims) => {
            req.extensions_mut().insert(claims);
            Ok(next.run(req).await)
        }
        None => Err(Redirect::to(&sign_in_location(
            &st.auth_service.config().sign_in_page,
            &req,
        ))),
    }
}

/// Sign-in URL for an unauthenticated request.
///
/// Only `GET` requests are returned to; form posts cannot be replayed.
fn sign_in_location(sign_in_page: &str, req: &Request) -> String {
    if *req.method() == Method::GET {
        format!("{}?redirectTo={}", sign_in_page, req.uri().path())
    } else {
        sign_in_page.to_string()
    }
}
