//! # DittoTrip Admin Binary
//!
//! The entry point that assembles the console based on compile-time features.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use dt_api::middleware::{cors_policy, standard_middleware};
use dt_api::state::AppState;
use dt_config::Settings;
use dt_core::session::AuthContext;
use dt_core::traits::{AdminApi, TokenStore};

#[cfg(feature = "client-http")]
use dt_client_http::HttpAdminApi;

#[cfg(feature = "token-file")]
use dt_token_file::FileTokenStore;

#[cfg(not(feature = "token-file"))]
use dt_core::session::MemoryTokenStore;

#[cfg(not(feature = "client-http"))]
compile_error!("ditto-admin needs an AdminApi implementation: enable the `client-http` feature");

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = Settings::load().context("loading settings")?;

    // 1. Token persistence
    #[cfg(feature = "token-file")]
    let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(settings.token_path.clone()));
    #[cfg(not(feature = "token-file"))]
    let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::default());

    let auth = Arc::new(AuthContext::new(store));
    match auth.restore().await {
        Ok(true) => log::info!("restored saved session"),
        Ok(false) => log::info!("no saved session; sign in at /login"),
        Err(e) => log::warn!("could not restore session: {e}"),
    }

    // 2. Remote API client
    #[cfg(feature = "client-http")]
    let api: Arc<dyn AdminApi> = Arc::new(
        HttpAdminApi::new(
            &settings.api_base_url,
            Duration::from_secs(settings.request_timeout_secs),
            auth.clone(),
        )
        .context("building HTTP client")?,
    );

    let bind = settings.bind_addr();
    log::info!("DittoTrip admin for {} on http://{}:{}", settings.api_base_url, bind.0, bind.1);

    let trusted_origin = settings.trusted_origin.clone();
    let state = web::Data::new(AppState::new(api, auth, settings));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(standard_middleware())
            .wrap(cors_policy(trusted_origin.as_deref()))
            .configure(dt_api::configure_routes)
    })
    .bind(bind)?
    .run()
    .await?;
    Ok(())
}
