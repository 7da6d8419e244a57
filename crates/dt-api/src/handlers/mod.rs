//! # dt-api Handlers
//!
//! Every screen follows post/redirect/get: actions mutate the screen state
//! and redirect back, the `GET` renders whatever the state now holds.

pub mod auth;
pub mod categories;
pub mod members;
pub mod quests;
pub mod reports;
pub mod spot_requests;
pub mod spots;

use actix_web::http::header;
use actix_web::HttpResponse;
use askama::Template;
use dt_core::display::TableRow;
use dt_core::drafts::Draft;
use dt_core::error::{AppError, Result};
use dt_core::list::{MutationOutcome, ResourceListController, ResourceSource};
use dt_core::search::{CandidateSource, SearchPicker};
use dt_core::selection::Keyed;
use dt_core::session::RouteGuard;
use dt_ui::{PagerView, RowAction, ScreenTemplate, SearchBox, TableView, NAV};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::state::{AppState, Screen};

/// `?query=` restarts the screen (new search, first page); `?page=` moves
/// through the current result set; neither re-renders without fetching,
/// except for the very first visit.
#[derive(Debug, Default, Deserialize)]
pub struct ScreenQuery {
    pub page: Option<usize>,
    pub query: Option<String>,
}

pub(crate) async fn sync_list<S: ResourceSource>(
    list: &mut ResourceListController<S>,
    params: &ScreenQuery,
) -> Result<()> {
    if let Some(query) = &params.query {
        return list.search(query).await;
    }
    match params.page {
        Some(page) => list.go_to(page).await,
        None if !list.is_loaded() => list.load().await,
        None => Ok(()),
    }
}

/// Static description of a resource screen.
pub(crate) struct ScreenSpec {
    pub key: &'static str,
    pub title: &'static str,
    pub path: &'static str,
    pub search_placeholder: Option<&'static str>,
}

pub(crate) async fn show_screen<S, D, F>(
    state: &AppState,
    screen: &Screen<S, D>,
    spec: &ScreenSpec,
    params: &ScreenQuery,
    toolbar: Vec<RowAction>,
    row_actions: F,
    overlay_html: Option<String>,
) -> HttpResponse
where
    S: ResourceSource,
    S::Item: TableRow,
    F: Fn(&S::Item) -> Vec<RowAction>,
{
    let mut list = screen.list.lock().await;
    let mut notice = screen.take_flash().await;
    if let Err(e) = sync_list(&mut list, params).await {
        if let AppError::Unauthorized(_) = e {
            drop(list);
            return relogin(state).await;
        }
        log::warn!("{}: {}", spec.key, e);
        notice = Some(e.to_string());
    }

    let path = spec.path;
    let template = ScreenTemplate {
        nav: NAV,
        active: spec.key,
        title: spec.title.to_string(),
        search: spec.search_placeholder.map(|placeholder| SearchBox {
            action: path.to_string(),
            query: list.query().to_string(),
            placeholder,
        }),
        toolbar,
        notice,
        table: TableView::build(list.items(), &state.display, row_actions),
        pager: PagerView::new(list.pagination(), |p| format!("{path}?page={p}")),
        overlay_html,
    };
    render(&template)
}

pub(crate) fn render<T: Template>(template: &T) -> HttpResponse {
    match template.render() {
        Ok(html) => HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html),
        Err(e) => {
            log::error!("template rendering failed: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Renders an overlay fragment; `None` when the overlay is closed.
pub(crate) fn fragment<T: Template>(template: Option<T>) -> Option<String> {
    template.and_then(|t| match t.render() {
        Ok(html) => Some(html),
        Err(e) => {
            log::error!("overlay rendering failed: {e}");
            None
        }
    })
}

pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther().insert_header((header::LOCATION, location)).finish()
}

/// The API rejected our token: forget it and ask for a new login.
pub(crate) async fn relogin(state: &AppState) -> HttpResponse {
    if let Err(e) = state.auth.logout().await {
        log::warn!("could not clear rejected token: {e}");
    }
    see_other(RouteGuard::LOGIN_PATH)
}

/// Outcome of an action handler: redirect back, flashing any error.
pub(crate) async fn finish_action<S: ResourceSource, D>(
    state: &AppState,
    screen: &Screen<S, D>,
    path: &str,
    outcome: Result<()>,
) -> HttpResponse {
    match outcome {
        Ok(()) => see_other(path),
        Err(AppError::Unauthorized(_)) => relogin(state).await,
        Err(e) => {
            screen.flash(e.to_string()).await;
            see_other(path)
        }
    }
}

/// Like [`finish_action`] for overlay submissions: errors the overlay already
/// carries as its notice are not flashed again.
pub(crate) async fn finish_overlay<S: ResourceSource, D: Draft>(
    state: &AppState,
    screen: &Screen<S, D>,
    path: &str,
    outcome: Result<()>,
) -> HttpResponse {
    if let Err(e) = &outcome {
        if !matches!(e, AppError::Unauthorized(_)) && screen.overlay.lock().await.notice().is_some() {
            log::debug!("{path}: {e}");
            return see_other(path);
        }
    }
    finish_action(state, screen, path, outcome).await
}

/// Validates and submits the open overlay. The overlay lock is released while
/// the request is in flight, so a second submit sees `Submitting` and is
/// rejected. Only the submission's own result decides whether the overlay
/// closes; a failed reload afterwards is left to the caller to flash.
pub(crate) async fn submit_overlay<S, D, F>(screen: &Screen<S, D>, build: F) -> MutationOutcome
where
    S: ResourceSource,
    D: Draft,
    F: FnOnce(Option<i64>, &D) -> Result<S::Action>,
{
    let action = {
        let mut overlay = screen.overlay.lock().await;
        let ticket = match overlay.begin_submit() {
            Ok(ticket) => ticket,
            Err(e) => return MutationOutcome { applied: Err(e), reloaded: Ok(()) },
        };
        let built = match overlay.draft() {
            Some(draft) => build(ticket.target, draft),
            None => Err(AppError::Conflict("form is not open".into())),
        };
        match built {
            Ok(action) => action,
            Err(e) => {
                let failed = Err(e);
                overlay.finish(&failed);
                return MutationOutcome { applied: failed, reloaded: Ok(()) };
            }
        }
    };
    let outcome = screen.list.lock().await.mutate(action).await;
    screen.overlay.lock().await.finish(&outcome.applied);
    outcome
}

/// Issues a picker search without holding the picker across the request;
/// a response that lost the race to a newer query is dropped.
pub(crate) async fn search_candidates<T, C>(picker: &Mutex<SearchPicker<T>>, source: &C, query: &str) -> Result<()>
where
    T: Keyed + Clone,
    C: CandidateSource<T> + ?Sized,
{
    let Some(ticket) = picker.lock().await.begin(query) else {
        return Ok(());
    };
    let response = source.search(&ticket.query).await;
    picker.lock().await.complete(&ticket, response).map(|_| ())
}

pub async fn index() -> HttpResponse {
    see_other("/members?query=")
}
