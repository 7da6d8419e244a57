//! Categories screen: create/edit (multipart with spot picker and tags) and
//! delete.

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use dt_core::drafts::CategoryDraft;
use dt_core::error::{AppError, Result};
use dt_core::models::Category;
use dt_core::resources::CategoryAction;
use dt_core::search::SpotCandidates;
use dt_ui::{CategoryFormTemplate, RowAction};

use super::{
    finish_action, finish_overlay, fragment, search_candidates, see_other, show_screen, submit_overlay,
    ScreenQuery, ScreenSpec,
};
use crate::forms::{FormOp, MultipartFields};
use crate::middleware::Authenticated;
use crate::state::AppState;

const PATH: &str = "/categories";

const SPEC: ScreenSpec =
    ScreenSpec { key: "categories", title: "Categories", path: PATH, search_placeholder: Some("Category name") };

pub async fn index(_auth: Authenticated, data: web::Data<AppState>, params: web::Query<ScreenQuery>) -> HttpResponse {
    let overlay_html = {
        let overlay = data.categories.overlay.lock().await;
        let picker = data.category_spots.lock().await;
        fragment(CategoryFormTemplate::from_overlay(format!("{PATH}/overlay"), &overlay, &picker))
    };
    let state = data.get_ref();
    show_screen(
        state,
        &state.categories,
        &SPEC,
        &params,
        vec![RowAction::post("Add category", format!("{PATH}/new"))],
        |c: &Category| {
            vec![
                RowAction::post("Edit", format!("{PATH}/{}/edit", c.category_id)),
                RowAction::danger("Delete", format!("{PATH}/{}/delete", c.category_id)),
            ]
        },
        overlay_html,
    )
    .await
}

pub async fn open_new(_auth: Authenticated, data: web::Data<AppState>) -> HttpResponse {
    data.category_spots.lock().await.reset();
    data.categories.overlay.lock().await.open(None, CategoryDraft::default());
    see_other(PATH)
}

/// Pre-fills the form from the row as currently listed.
pub async fn open_edit(_auth: Authenticated, data: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    let category_id = path.into_inner();
    let draft = data
        .categories
        .list
        .lock()
        .await
        .find(|c| c.category_id == category_id)
        .map(CategoryDraft::from_category);
    let outcome = match draft {
        Some(draft) => {
            data.category_spots.lock().await.reset();
            data.categories.overlay.lock().await.open(Some(category_id), draft);
            Ok(())
        }
        None => Err(AppError::NotFound("category".into(), category_id.to_string())),
    };
    finish_action(&data, &data.categories, PATH, outcome).await
}

pub async fn delete(_auth: Authenticated, data: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    let outcome = data.categories.list.lock().await.mutate(CategoryAction::Delete(path.into_inner())).await;
    finish_action(&data, &data.categories, PATH, outcome.into_result()).await
}

pub async fn overlay(_auth: Authenticated, data: web::Data<AppState>, payload: Multipart) -> HttpResponse {
    let outcome = match MultipartFields::read(payload).await {
        Ok(fields) => handle(&data, &fields).await,
        Err(e) => {
            data.categories.overlay.lock().await.set_notice(e.to_string());
            Err(e)
        }
    };
    finish_overlay(&data, &data.categories, PATH, outcome).await
}

async fn handle(data: &AppState, fields: &MultipartFields) -> Result<()> {
    let op = fields.op();
    match op {
        FormOp::Cancel => {
            data.categories.overlay.lock().await.cancel();
            data.category_spots.lock().await.reset();
            return Ok(());
        }
        FormOp::Search => {
            edit(data, |draft| {
                fields.apply_to_category(draft);
                Ok(())
            })
            .await?;
            let query = fields.text("picker_query").unwrap_or_default();
            let outcome = search_candidates(&data.category_spots, &SpotCandidates(data.api.clone()), query).await;
            if let Err(e) = &outcome {
                data.categories.overlay.lock().await.set_notice(e.to_string());
            }
            return outcome;
        }
        FormOp::Pick(spot_id) => {
            let mut overlay = data.categories.overlay.lock().await;
            let mut picker = data.category_spots.lock().await;
            let outcome = overlay.draft_mut().and_then(|draft| {
                fields.apply_to_category(draft);
                picker.select(spot_id, &mut draft.spots)
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
        fields.apply_to_category(draft);
        match &op {
            FormOp::AddTag => draft.tags.add(fields.text("tag_input").unwrap_or_default())?,
            FormOp::RemoveTag(tag) => {
                draft.tags.remove(tag);
            }
            FormOp::Unpick(spot_id) => {
                draft.spots.remove(*spot_id);
            }
            _ => {}
        }
        Ok(())
    })
    .await?;

    if op != FormOp::Submit {
        return Ok(());
    }
    let outcome = submit_overlay(&data.categories, |target, draft| {
        let submission = draft.to_submission()?;
        Ok(match target {
            Some(category_id) => CategoryAction::Update(category_id, submission),
            None => CategoryAction::Create(submission),
        })
    })
    .await;
    if outcome.applied.is_ok() {
        data.category_spots.lock().await.reset();
    }
    outcome.into_result()
}

/// Applies `change` to the open draft; its error becomes the overlay notice.
async fn edit<F>(data: &AppState, change: F) -> Result<()>
where
    F: FnOnce(&mut CategoryDraft) -> Result<()>,
{
    let mut overlay = data.categories.overlay.lock().await;
    let outcome = overlay.draft_mut().and_then(change);
    match &outcome {
        Ok(()) => overlay.clear_notice(),
        Err(e) => overlay.set_notice(e.to_string()),
    }
    outcome
}
