//! Quests screen: create (JSON body) and delete.

use actix_web::{web, HttpResponse};
use dt_core::drafts::QuestDraft;
use dt_core::models::Quest;
use dt_core::resources::QuestAction;
use dt_ui::{QuestFormTemplate, RowAction};

use super::{finish_action, finish_overlay, fragment, show_screen, submit_overlay, ScreenQuery, ScreenSpec};
use crate::forms::{FormOp, QuestForm};
use crate::middleware::Authenticated;
use crate::state::AppState;

const PATH: &str = "/quests";

const SPEC: ScreenSpec = ScreenSpec { key: "quests", title: "Quests", path: PATH, search_placeholder: None };

pub async fn index(_auth: Authenticated, data: web::Data<AppState>, params: web::Query<ScreenQuery>) -> HttpResponse {
    let overlay_html = {
        let overlay = data.quests.overlay.lock().await;
        fragment(QuestFormTemplate::from_overlay(format!("{PATH}/overlay"), &overlay))
    };
    let state = data.get_ref();
    show_screen(
        state,
        &state.quests,
        &SPEC,
        &params,
        vec![RowAction::post("Add quest", format!("{PATH}/new"))],
        |q: &Quest| vec![RowAction::danger("Delete", format!("{PATH}/{}/delete", q.quest_id))],
        overlay_html,
    )
    .await
}

pub async fn open_new(_auth: Authenticated, data: web::Data<AppState>) -> HttpResponse {
    data.quests.overlay.lock().await.open(None, QuestDraft::default());
    super::see_other(PATH)
}

pub async fn delete(_auth: Authenticated, data: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    let outcome = data.quests.list.lock().await.mutate(QuestAction::Delete(path.into_inner())).await;
    finish_action(&data, &data.quests, PATH, outcome.into_result()).await
}

pub async fn overlay(_auth: Authenticated, data: web::Data<AppState>, form: web::Form<QuestForm>) -> HttpResponse {
    {
        let mut overlay = data.quests.overlay.lock().await;
        if form.op() == FormOp::Cancel {
            overlay.cancel();
            return super::see_other(PATH);
        }
        if let Err(e) = overlay.draft_mut().and_then(|draft| form.apply(draft)) {
            overlay.set_notice(e.to_string());
            drop(overlay);
            return finish_overlay(&data, &data.quests, PATH, Err(e)).await;
        }
        if form.op() != FormOp::Submit {
            return super::see_other(PATH);
        }
    }
    let outcome = submit_overlay(&data.quests, |_, draft| Ok(QuestAction::Create(draft.save_req()))).await;
    finish_overlay(&data, &data.quests, PATH, outcome.into_result()).await
}
