//! Login and logout.

use actix_web::{web, HttpResponse};
use dt_core::models::Credentials;
use dt_ui::LoginTemplate;
use secrecy::SecretString;
use serde::Deserialize;

use super::{render, see_other};
use crate::middleware::SameOrigin;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login_page(data: web::Data<AppState>) -> HttpResponse {
    if data.auth.is_authenticated() {
        return see_other("/members?query=");
    }
    render(&LoginTemplate { email: String::new(), notice: None })
}

pub async fn login(_origin: SameOrigin, data: web::Data<AppState>, form: web::Form<LoginForm>) -> HttpResponse {
    let LoginForm { email, password } = form.into_inner();
    let credentials = Credentials { email: email.trim().to_string(), password: SecretString::from(password) };
    match data.auth.login(data.api.as_ref(), &credentials).await {
        Ok(()) => see_other("/members?query="),
        Err(e) => {
            log::warn!("login failed for {}: {}", credentials.email, e);
            render(&LoginTemplate { email: credentials.email, notice: Some(e.to_string()) })
        }
    }
}

pub async fn logout(_origin: SameOrigin, data: web::Data<AppState>) -> HttpResponse {
    if let Err(e) = data.auth.logout().await {
        log::warn!("logout: {e}");
    }
    see_other("/login")
}
