//! dittotrip-admin/crates/dt-api/src/middleware.rs Middleware
//!
//! Request logging, CORS and the route guard extractors.

use std::future::{ready, Ready};

use actix_cors::Cors;
use actix_web::dev::Payload;
use actix_web::http::{header, StatusCode};
use actix_web::middleware::Logger;
use actix_web::{web, FromRequest, HttpRequest, HttpResponse, ResponseError};
use dt_core::models::Token;
use dt_core::session::{GuardOutcome, RouteGuard};

use crate::state::AppState;

// remote-ip "request-line" status-code response-size "referrer" "user-agent"
pub fn standard_middleware() -> Logger {
    Logger::default()
}

// Cross-origin reads are refused unless an origin is explicitly trusted.
pub fn cors_policy(trusted_origin: Option<&str>) -> Cors {
    let cors = Cors::default().allowed_methods(vec!["GET", "POST"]).max_age(3600);
    match trusted_origin {
        Some(origin) => cors.allowed_origin(origin),
        None => cors,
    }
}

/// Host part of an `Origin` or `Referer` value (`http://host:port/path`).
fn origin_host(source: &str) -> Option<&str> {
    source.split_once("://").and_then(|(_, rest)| rest.split('/').next())
}

/// A state-changing request must come from the console's own pages or from
/// the trusted origin. Requests carrying neither `Origin` nor `Referer` are
/// not from a browser form and pass.
pub fn is_same_origin(req: &HttpRequest, trusted_origin: Option<&str>) -> bool {
    if req.method().is_safe() {
        return true;
    }
    let headers = req.headers();
    let Some(source) = headers
        .get(header::ORIGIN)
        .or_else(|| headers.get(header::REFERER))
        .and_then(|v| v.to_str().ok())
    else {
        return true;
    };
    if let Some(trusted) = trusted_origin.map(|t| t.trim_end_matches('/')) {
        if source == trusted || source.starts_with(&format!("{trusted}/")) {
            return true;
        }
    }
    let info = req.connection_info();
    origin_host(source) == Some(info.host())
}

fn check_origin(req: &HttpRequest, state: &AppState) -> Result<(), CrossOrigin> {
    if is_same_origin(req, state.settings.trusted_origin.as_deref()) {
        return Ok(());
    }
    log::warn!("refused cross-origin {} {}", req.method(), req.path());
    Err(CrossOrigin)
}

/// Handlers that change state without requiring a login (sign in, sign out)
/// still refuse cross-origin form posts.
pub struct SameOrigin;

#[derive(Debug)]
pub struct CrossOrigin;

impl std::fmt::Display for CrossOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cross-origin request refused")
    }
}

impl ResponseError for CrossOrigin {
    fn status_code(&self) -> StatusCode {
        StatusCode::FORBIDDEN
    }
}

impl FromRequest for SameOrigin {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(match req.app_data::<web::Data<AppState>>() {
            Some(state) => check_origin(req, state).map(|_| SameOrigin).map_err(Into::into),
            None => {
                log::error!("origin check used without AppState");
                Err(CrossOrigin.into())
            }
        })
    }
}

/// Extracting this from a request enforces the route guard: handlers that
/// take it are unreachable without a stored token.
pub struct Authenticated(pub Token);

#[derive(Debug)]
pub struct LoginRedirect;

impl std::fmt::Display for LoginRedirect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "authentication required")
    }
}

impl ResponseError for LoginRedirect {
    fn status_code(&self) -> StatusCode {
        StatusCode::SEE_OTHER
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::SeeOther()
            .insert_header((header::LOCATION, RouteGuard::LOGIN_PATH))
            .finish()
    }
}

impl FromRequest for Authenticated {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            log::error!("route guard used without AppState");
            return ready(Err(LoginRedirect.into()));
        };
        if let Err(e) = check_origin(req, state) {
            return ready(Err(e.into()));
        }
        ready(match RouteGuard::check(&state.auth) {
            GuardOutcome::Allow(token) => Ok(Authenticated(token)),
            GuardOutcome::RedirectToLogin => {
                log::debug!("{} requires login", req.path());
                Err(LoginRedirect.into())
            }
        })
    }
}
