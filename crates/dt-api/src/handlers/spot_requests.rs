//! Spot requests screen: approve or reject user-submitted spots.

use actix_web::{web, HttpResponse};
use dt_core::models::SpotRequest;
use dt_core::resources::SpotRequestAction;
use dt_ui::RowAction;

use super::{finish_action, show_screen, ScreenQuery, ScreenSpec};
use crate::middleware::Authenticated;
use crate::state::AppState;

const PATH: &str = "/spot-requests";

const SPEC: ScreenSpec =
    ScreenSpec { key: "spot-requests", title: "Spot requests", path: PATH, search_placeholder: None };

pub async fn index(_auth: Authenticated, data: web::Data<AppState>, params: web::Query<ScreenQuery>) -> HttpResponse {
    let state = data.get_ref();
    show_screen(
        state,
        &state.spot_requests,
        &SPEC,
        &params,
        vec![],
        |r: &SpotRequest| {
            vec![
                RowAction::post("Approve", format!("{PATH}/{}/approve", r.spot_apply_id)),
                RowAction::danger("Reject", format!("{PATH}/{}/reject", r.spot_apply_id)),
            ]
        },
        None,
    )
    .await
}

pub async fn approve(_auth: Authenticated, data: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    judge(data, SpotRequestAction::Approve(path.into_inner())).await
}

pub async fn reject(_auth: Authenticated, data: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    judge(data, SpotRequestAction::Reject(path.into_inner())).await
}

async fn judge(data: web::Data<AppState>, action: SpotRequestAction) -> HttpResponse {
    let outcome = data.spot_requests.list.lock().await.mutate(action).await.into_result();
    finish_action(&data, &data.spot_requests, PATH, outcome).await
}
