// src/handlers/auth.rs

//! Login, logout and the session cookie gate.
//!
//! A single shared account. A successful login sets `media_auth` to the
//! per-process session token; [`require_session`] lets a request through
//! only when that cookie matches.

use actix_files::NamedFile;
use actix_web::{
    body::MessageBody,
    cookie::{time::Duration, Cookie},
    dev::{ServiceRequest, ServiceResponse},
    http::header,
    middleware::Next,
    web, Error, HttpRequest, HttpResponse,
};
use log::{info, warn};
use serde::Deserialize;

use crate::state::AppState;

pub const AUTH_COOKIE: &str = "media_auth";
const LOGIN_PATH: &str = "/login";

#[derive(Deserialize, Debug)]
pub struct LoginForm {
    username: String,
    password: String,
}

/// HTMX marks its XHRs with `HX-Request: true`.
pub fn is_htmx_request(req: &HttpRequest) -> bool {
    req.headers()
        .get("HX-Request")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "true")
}

/// Middleware for every gated route. Plain navigations are redirected to the
/// login page; HTMX requests get `401` plus `HX-Redirect`.
///
/// # Arguments
/// * `req` - The incoming request
/// * `next` - The rest of the service chain
///
/// # Returns
/// * the inner service's response when the session cookie matches
/// * a redirect to `/login` otherwise
pub async fn require_session(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let authorised = req
        .app_data::<web::Data<AppState>>()
        .zip(req.cookie(AUTH_COOKIE))
        .is_some_and(|(state, cookie)| cookie.value() == state.session_token);

    if authorised {
        let res = next.call(req).await?;
        return Ok(res.map_into_left_body());
    }

    let response = if is_htmx_request(req.request()) {
        HttpResponse::Unauthorized()
            .insert_header(("HX-Redirect", LOGIN_PATH))
            .finish()
    } else {
        HttpResponse::Found()
            .insert_header((header::LOCATION, LOGIN_PATH))
            .finish()
    };
    Ok(req.into_response(response).map_into_right_body())
}

/// `GET /login`
pub async fn login_page(state: web::Data<AppState>) -> actix_web::Result<NamedFile> {
    Ok(NamedFile::open_async(state.static_dir.join("login.html")).await?)
}

/// Handles `POST /login`
///
/// # Arguments
/// * `state` - Shared application state holding the account
/// * `form` - Submitted username and password
///
/// # Returns
/// A redirect to `/` with the session cookie, or back to `/login?error=1`
pub async fn login(state: web::Data<AppState>, form: web::Form<LoginForm>) -> HttpResponse {
    let credentials = &state.credentials;
    if form.username != credentials.username || form.password != credentials.password {
        warn!("Rejected login for {:?}", form.username);
        return HttpResponse::Found()
            .insert_header((header::LOCATION, "/login?error=1"))
            .finish();
    }

    info!("Login for {}", form.username);
    let cookie = Cookie::build(AUTH_COOKIE, state.session_token.clone())
        .path("/")
        .max_age(Duration::days(1))
        .http_only(true)
        .finish();

    HttpResponse::Found()
        .cookie(cookie)
        .insert_header((header::LOCATION, "/"))
        .finish()
}

/// `POST /logout`
pub async fn logout() -> HttpResponse {
    let mut cookie = Cookie::build(AUTH_COOKIE, "").path("/").finish();
    cookie.make_removal();

    HttpResponse::Found()
        .cookie(cookie)
        .insert_header((header::LOCATION, LOGIN_PATH))
        .finish()
}
