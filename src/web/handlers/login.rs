//! Login and logout handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::{StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::application::forms::Credentials;
use crate::application::services::auth_service::LoginOutcome;
use crate::error::AppError;
use crate::state::AppState;

/// Template for the login page.
///
/// Renders `templates/login.html` with the email and password form and, after a
/// failed attempt, the generic error message.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub redirect_to: String,
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    #[serde(rename = "redirectTo")]
    pub redirect_to: Option<String>,
}

/// Renders the login page.
///
/// # Endpoint
///
/// `GET /login?redirectTo=<path>`
pub async fn login_page_handler(Query(query): Query<LoginQuery>) -> LoginTemplate {
    LoginTemplate {
        email: String::new(),
        redirect_to: query.redirect_to.unwrap_or_default(),
        error: None,
    }
}

/// Signs a user in with email and password.
///
/// # Endpoint
///
/// `POST /login`
///
/// # Response
///
/// - `303 See Other` to the requested page (default `/dashboard/invoices`) with the
///   session cookie set
/// - `422 Unprocessable Entity` with the login page and "Invalid credentials." or
///   "Something went wrong."
///
/// # Errors
///
/// - `500 Internal Server Error` if the session can't be issued
pub async fn login_handler(
    State(state): State<AppState>,
    Form(credentials): Form<Credentials>,
) -> Result<Response, AppError> {
    match state.auth_service.authenticate(&credentials).await? {
        LoginOutcome::SignedIn(signed_in) => {
            let cookie = state.auth_service.sessions().cookie(&signed_in.session);
            Ok((
                [(SET_COOKIE, cookie)],
                Redirect::to(&signed_in.redirect_to),
            )
                .into_response())
        }
        LoginOutcome::Denied(message) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            LoginTemplate {
                email: credentials.email,
                redirect_to: credentials.redirect_to.unwrap_or_default(),
                error: Some(message.to_string()),
            },
        )
            .into_response()),
    }
}

/// Clears the session cookie and returns to the login page.
///
/// # Endpoint
///
/// `POST /logout`
pub async fn logout_handler(State(state): State<AppState>) -> impl IntoResponse {
    let sessions = state.auth_service.sessions();

    (
        [(SET_COOKIE, sessions.clear_cookie())],
        Redirect::to(&state.auth_service.config().sign_in_page),
    )
}
