//! Members screen (search + suspend) and the read-only member detail screen.

use actix_web::{web, HttpResponse};
use dt_core::drafts::ModerationDraft;
use dt_core::error::{AppError, Result};
use dt_core::list::{ResourceListController, ResourceSource};
use dt_core::models::Member;
use dt_core::resources::{ActivityKind, MemberAction, MemberActivitySource};
use dt_ui::{ActivitySection, MemberDetailTemplate, ModerationFormTemplate, PagerView, RowAction, TableView, NAV};
use serde::Deserialize;

use super::{
    finish_action, finish_overlay, fragment, relogin, render, show_screen, submit_overlay, ScreenQuery,
    ScreenSpec,
};
use crate::forms::{FormOp, ModerationForm};
use crate::middleware::Authenticated;
use crate::state::{AppState, Screen};

const PATH: &str = "/members";

const SPEC: ScreenSpec = ScreenSpec {
    key: "members",
    title: "Members",
    path: PATH,
    search_placeholder: Some("Nickname or email"),
};

pub async fn index(_auth: Authenticated, data: web::Data<AppState>, params: web::Query<ScreenQuery>) -> HttpResponse {
    let overlay_html = {
        let overlay = data.members.overlay.lock().await;
        let heading = format!("Suspend member #{}", overlay.target().unwrap_or_default());
        fragment(ModerationFormTemplate::from_overlay(heading, format!("{PATH}/overlay"), &overlay))
    };
    let state = data.get_ref();
    show_screen(
        state,
        &state.members,
        &SPEC,
        &params,
        vec![],
        |m: &Member| {
            if state.is_protected(m.user_id) {
                vec![]
            } else {
                vec![RowAction::danger("Suspend", format!("{PATH}/{}/suspend", m.user_id))]
            }
        },
        overlay_html,
    )
    .await
}

pub async fn open_suspend(_auth: Authenticated, data: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    let user_id = path.into_inner();
    let outcome = open_moderation(&data.members, user_id, data.is_protected(user_id)).await;
    finish_action(&data, &data.members, PATH, outcome).await
}

pub async fn overlay(_auth: Authenticated, data: web::Data<AppState>, form: web::Form<ModerationForm>) -> HttpResponse {
    let outcome = handle_moderation(&data.members, &form, |target, draft| {
        Ok(MemberAction::Suspend(draft.to_action(target.ok_or_else(no_target)?)))
    })
    .await;
    finish_overlay(&data, &data.members, PATH, outcome).await
}

/// Opens the moderation overlay for `target`, unless it is the protected
/// operator account.
pub(crate) async fn open_moderation<S: ResourceSource>(
    screen: &Screen<S, ModerationDraft>,
    target: i64,
    protected: bool,
) -> Result<()> {
    if protected {
        return Err(AppError::Conflict(format!("account {target} cannot be suspended")));
    }
    screen.overlay.lock().await.open(Some(target), ModerationDraft::default());
    Ok(())
}

pub(crate) async fn handle_moderation<S, F>(
    screen: &Screen<S, ModerationDraft>,
    form: &ModerationForm,
    build: F,
) -> Result<()>
where
    S: ResourceSource,
    F: FnOnce(Option<i64>, &ModerationDraft) -> Result<S::Action>,
{
    {
        let mut overlay = screen.overlay.lock().await;
        if form.op() == FormOp::Cancel {
            overlay.cancel();
            return Ok(());
        }
        if let Err(e) = overlay.draft_mut().and_then(|draft| form.apply(draft)) {
            overlay.set_notice(e.to_string());
            return Err(e);
        }
        if form.op() != FormOp::Submit {
            overlay.clear_notice();
            return Ok(());
        }
    }
    submit_overlay(screen, build).await.into_result()
}

pub(crate) fn no_target() -> AppError {
    AppError::Conflict("moderation form has no target".into())
}

#[derive(Debug, Default, Deserialize)]
pub struct DetailQuery {
    #[serde(default)]
    pub reviews: usize,
    #[serde(default)]
    pub dittos: usize,
}

pub async fn detail(
    _auth: Authenticated,
    data: web::Data<AppState>,
    path: web::Path<i64>,
    params: web::Query<DetailQuery>,
) -> HttpResponse {
    let user_id = path.into_inner();
    let member = match data.api.member(user_id).await {
        Ok(member) => member,
        Err(AppError::Unauthorized(_)) => return relogin(&data).await,
        Err(e) => {
            data.members.flash(e.to_string()).await;
            return super::see_other(PATH);
        }
    };

    let mut notices = Vec::new();
    let mut sections = Vec::new();
    for (heading, kind, page) in [
        ("Reviews", ActivityKind::Reviews, params.reviews),
        ("Dittos", ActivityKind::Dittos, params.dittos),
    ] {
        let source = MemberActivitySource::new(data.api.clone(), user_id, kind);
        let mut list = ResourceListController::new(source, data.settings.detail_page_size);
        if let Err(e) = list.go_to(page).await {
            log::warn!("member {user_id} {heading}: {e}");
            notices.push(format!("{heading}: {e}"));
        }
        let (reviews, dittos) = (params.reviews, params.dittos);
        let link = |p: usize| match kind {
            ActivityKind::Reviews => format!("{PATH}/{user_id}?reviews={p}&dittos={dittos}"),
            ActivityKind::Dittos => format!("{PATH}/{user_id}?reviews={reviews}&dittos={p}"),
        };
        sections.push(ActivitySection {
            heading,
            table: TableView::build(list.items(), &data.display, |_| vec![]),
            pager: PagerView::new(list.pagination(), link),
        });
    }

    render(&MemberDetailTemplate {
        nav: NAV,
        active: "members",
        title: member.nickname.clone(),
        notice: (!notices.is_empty()).then(|| notices.join(" / ")),
        profile: MemberDetailTemplate::profile_of(&member),
        sections,
    })
}

