//! Spots screen: create (multipart with category picker, tags, image and
//! still cuts) and delete.

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use dt_core::drafts::SpotDraft;
use dt_core::error::Result;
use dt_core::models::Spot;
use dt_core::resources::SpotAction;
use dt_core::search::CategoryCandidates;
use dt_ui::{RowAction, SpotFormTemplate};

use super::{
    finish_action, finish_overlay, fragment, search_candidates, see_other, show_screen, submit_overlay,
    ScreenQuery, ScreenSpec,
};
use crate::forms::{FormOp, MultipartFields};
use crate::middleware::Authenticated;
use crate::state::AppState;

const PATH: &str = "/spots";

const SPEC: ScreenSpec =
    ScreenSpec { key: "spots", title: "Spots", path: PATH, search_placeholder: Some("Spot name or address") };

pub async fn index(_auth: Authenticated, data: web::Data<AppState>, params: web::Query<ScreenQuery>) -> HttpResponse {
    let overlay_html = {
        let overlay = data.spots.overlay.lock().await;
        let picker = data.spot_categories.lock().await;
        fragment(SpotFormTemplate::from_overlay(format!("{PATH}/overlay"), &overlay, &picker))
    };
    let state = data.get_ref();
    show_screen(
        state,
        &state.spots,
        &SPEC,
        &params,
        vec![RowAction::post("Add spot", format!("{PATH}/new"))],
        |s: &Spot| vec![RowAction::danger("Delete", format!("{PATH}/{}/delete", s.spot_id))],
        overlay_html,
    )
    .await
}

pub async fn open_new(_auth: Authenticated, data: web::Data<AppState>) -> HttpResponse {
    data.spot_categories.lock().await.reset();
    data.spots.overlay.lock().await.open(None, SpotDraft::default());
    see_other(PATH)
}

pub async fn delete(_auth: Authenticated, data: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    let outcome = data.spots.list.lock().await.mutate(SpotAction::Delete(path.into_inner())).await;
    finish_action(&data, &data.spots, PATH, outcome.into_result()).await
}

pub async fn overlay(_auth: Authenticated, data: web::Data<AppState>, payload: Multipart) -> HttpResponse {
    let outcome = match MultipartFields::read(payload).await {
        Ok(fields) => handle(&data, &fields).await,
        Err(e) => {
            data.spots.overlay.lock().await.set_notice(e.to_string());
            Err(e)
        }
    };
    finish_overlay(&data, &data.spots, PATH, outcome).await
}

async fn handle(data: &AppState, fields: &MultipartFields) -> Result<()> {
    let op = fields.op();
    match op {
        FormOp::Cancel => {
            data.spots.overlay.lock().await.cancel();
            data.spot_categories.lock().await.reset();
            return Ok(());
        }
        FormOp::Search => {
            edit(data, |draft| fields.apply_to_spot(draft)).await?;
            let query = fields.text("picker_query").unwrap_or_default();
            let outcome =
                search_candidates(&data.spot_categories, &CategoryCandidates(data.api.clone()), query).await;
            if let Err(e) = &outcome {
                data.spots.overlay.lock().await.set_notice(e.to_string());
            }
            return outcome;
        }
        FormOp::Pick(category_id) => {
            let mut overlay = data.spots.overlay.lock().await;
            let mut picker = data.spot_categories.lock().await;
            let outcome = overlay.draft_mut().and_then(|draft| {
                fields.apply_to_spot(draft)?;
                picker.select(category_id, &mut draft.categories)
            });
            match &outcome {
                Ok(()) => overlay.clear_notice(),
                Err(e) => overlay.set_notice(e.to_string()),
            }
            return outcome;
        }
        _ => {}
    }

    edit(data, |draft| {
        fields.apply_to_spot(draft)?;
        match &op {
            FormOp::AddTag => draft.tags.add(fields.text("tag_input").unwrap_or_default())?,
            FormOp::RemoveTag(tag) => {
                draft.tags.remove(tag);
            }
            FormOp::Unpick(category_id) => {
                draft.categories.remove(*category_id);
            }
            _ => {}
        }
        Ok(())
    })
    .await?;

    if op != FormOp::Submit {
        return Ok(());
    }
    let outcome = submit_overlay(&data.spots, |_, draft| Ok(SpotAction::Create(draft.to_submission()?))).await;
    if outcome.applied.is_ok() {
        data.spot_categories.lock().await.reset();
    }
    outcome.into_result()
}

async fn edit<F>(data: &AppState, change: F) -> Result<()>
where
    F: FnOnce(&mut SpotDraft) -> Result<()>,
{
    let mut overlay = data.spots.overlay.lock().await;
    let outcome = overlay.draft_mut().and_then(change);
    match &outcome {
        Ok(()) => overlay.clear_notice(),
        Err(e) => overlay.set_notice(e.to_string()),
    }
    outcome
}
