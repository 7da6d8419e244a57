//! # dt-api
//!
//! The web routing and orchestration layer of the DittoTrip admin console.

pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod state;

use actix_web::web;

use crate::handlers::{auth, categories, members, quests, reports, spot_requests, spots};

/// Mounts every console screen. `/login` is the only unguarded page.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index))
        .route("/login", web::get().to(auth::login_page))
        .route("/login", web::post().to(auth::login))
        .route("/logout", web::post().to(auth::logout))
        .service(
            web::scope("/members")
                .route("", web::get().to(members::index))
                .route("/overlay", web::post().to(members::overlay))
                .route("/{id}", web::get().to(members::detail))
                .route("/{id}/suspend", web::post().to(members::open_suspend)),
        )
        .service(
            web::scope("/categories")
                .route("", web::get().to(categories::index))
                .route("/new", web::post().to(categories::open_new))
                .route("/overlay", web::post().to(categories::overlay))
                .route("/{id}/edit", web::post().to(categories::open_edit))
                .route("/{id}/delete", web::post().to(categories::delete)),
        )
        .service(
            web::scope("/spots")
                .route("", web::get().to(spots::index))
                .route("/new", web::post().to(spots::open_new))
                .route("/overlay", web::post().to(spots::overlay))
                .route("/{id}/delete", web::post().to(spots::delete)),
        )
        .service(
            web::scope("/reports")
                .route("", web::get().to(reports::index))
                .route("/overlay", web::post().to(reports::overlay))
                .route("/{id}/handle", web::post().to(reports::open_handle)),
        )
        .service(
            web::scope("/spot-requests")
                .route("", web::get().to(spot_requests::index))
                .route("/{id}/approve", web::post().to(spot_requests::approve))
                .route("/{id}/reject", web::post().to(spot_requests::reject)),
        )
        .service(
            web::scope("/quests")
                .route("", web::get().to(quests::index))
                .route("/new", web::post().to(quests::open_new))
                .route("/overlay", web::post().to(quests::overlay))
                .route("/{id}/delete", web::post().to(quests::delete)),
        );
}
