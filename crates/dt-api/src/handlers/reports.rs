//! Reports screen: handling a report suspends its author.

use actix_web::{web, HttpResponse};
use dt_core::error::AppError;
use dt_core::models::Report;
use dt_core::resources::ReportAction;
use dt_ui::{ModerationFormTemplate, RowAction};

use super::members::{handle_moderation, no_target, open_moderation};
use super::{finish_action, finish_overlay, fragment, show_screen, ScreenQuery, ScreenSpec};
use crate::forms::ModerationForm;
use crate::middleware::Authenticated;
use crate::state::AppState;

const PATH: &str = "/reports";

const SPEC: ScreenSpec = ScreenSpec { key: "reports", title: "Reports", path: PATH, search_placeholder: None };

pub async fn index(_auth: Authenticated, data: web::Data<AppState>, params: web::Query<ScreenQuery>) -> HttpResponse {
    let overlay_html = {
        let overlay = data.reports.overlay.lock().await;
        let heading = format!("Handle report #{}", overlay.target().unwrap_or_default());
        fragment(ModerationFormTemplate::from_overlay(heading, format!("{PATH}/overlay"), &overlay))
    };
    let state = data.get_ref();
    show_screen(
        state,
        &state.reports,
        &SPEC,
        &params,
        vec![],
        |r: &Report| {
            if state.is_protected(r.user_data.user_id) {
                vec![]
            } else {
                vec![RowAction::danger("Suspend", format!("{PATH}/{}/handle", r.report_id))]
            }
        },
        overlay_html,
    )
    .await
}

/// Moderation goes out under the report id; the server resolves the author.
pub async fn open_handle(_auth: Authenticated, data: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    let report_id = path.into_inner();
    let author = data
        .reports
        .list
        .lock()
        .await
        .find(|r| r.report_id == report_id)
        .map(|r| r.user_data.user_id);
    let outcome = match author {
        Some(user_id) => open_moderation(&data.reports, report_id, data.is_protected(user_id)).await,
        None => Err(AppError::NotFound("report".into(), report_id.to_string())),
    };
    finish_action(&data, &data.reports, PATH, outcome).await
}

pub async fn overlay(_auth: Authenticated, data: web::Data<AppState>, form: web::Form<ModerationForm>) -> HttpResponse {
    let outcome = handle_moderation(&data.reports, &form, |target, draft| {
        Ok(ReportAction::Handle(draft.to_action(target.ok_or_else(no_target)?)))
    })
    .await;
    finish_overlay(&data, &data.reports, PATH, outcome).await
}
