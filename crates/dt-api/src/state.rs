//! Process-wide state shared by all actix-web workers.
//!
//! Each screen owns its list controller and overlay behind async mutexes, so
//! operations on one screen are serialized. Search pickers are locked only
//! around `begin`/`complete`; the remote search itself runs unlocked.

use std::sync::Arc;

use dt_config::Settings;
use dt_core::display::DisplayContext;
use dt_core::drafts::{CategoryDraft, ModerationDraft, QuestDraft, SpotDraft};
use dt_core::list::{ResourceListController, ResourceSource};
use dt_core::models::{Category, Spot};
use dt_core::overlay::Overlay;
use dt_core::resources::{
    CategorySource, MemberSource, QuestSource, ReportSource, SpotRequestSource, SpotSource,
};
use dt_core::search::SearchPicker;
use dt_core::session::AuthContext;
use dt_core::traits::AdminApi;
use tokio::sync::Mutex;

/// One resource screen: its paginated list, its form overlay and a one-shot
/// notice shown on the next render.
pub struct Screen<S: ResourceSource, D> {
    pub list: Mutex<ResourceListController<S>>,
    pub overlay: Mutex<Overlay<D>>,
    flash: Mutex<Option<String>>,
}

impl<S: ResourceSource, D> Screen<S, D> {
    pub fn new(source: S, page_size: usize) -> Self {
        Self {
            list: Mutex::new(ResourceListController::new(source, page_size)),
            overlay: Mutex::new(Overlay::default()),
            flash: Mutex::new(None),
        }
    }

    pub async fn flash(&self, notice: impl Into<String>) {
        *self.flash.lock().await = Some(notice.into());
    }

    pub async fn take_flash(&self) -> Option<String> {
        self.flash.lock().await.take()
    }
}

pub struct AppState {
    pub api: Arc<dyn AdminApi>,
    pub auth: Arc<AuthContext>,
    pub settings: Settings,
    pub display: DisplayContext,
    pub members: Screen<MemberSource, ModerationDraft>,
    pub categories: Screen<CategorySource, CategoryDraft>,
    /// Spot search inside the category form
    pub category_spots: Mutex<SearchPicker<Spot>>,
    pub spots: Screen<SpotSource, SpotDraft>,
    /// Category search inside the spot form
    pub spot_categories: Mutex<SearchPicker<Category>>,
    pub reports: Screen<ReportSource, ModerationDraft>,
    pub spot_requests: Screen<SpotRequestSource, ()>,
    pub quests: Screen<QuestSource, QuestDraft>,
}

impl AppState {
    pub fn new(api: Arc<dyn AdminApi>, auth: Arc<AuthContext>, settings: Settings) -> Self {
        let size = settings.page_size;
        Self {
            display: DisplayContext { web_base_url: settings.web_base_url.clone() },
            members: Screen::new(MemberSource::new(api.clone()), size),
            categories: Screen::new(CategorySource::new(api.clone()), size),
            category_spots: Mutex::new(SearchPicker::new()),
            spots: Screen::new(SpotSource::new(api.clone()), size),
            spot_categories: Mutex::new(SearchPicker::new()),
            reports: Screen::new(ReportSource::new(api.clone()), size),
            spot_requests: Screen::new(SpotRequestSource::new(api.clone()), size),
            quests: Screen::new(QuestSource::new(api.clone()), size),
            api,
            auth,
            settings,
        }
    }

    /// The operator account may never be suspended from the console.
    pub fn is_protected(&self, user_id: i64) -> bool {
        self.settings.protected_user_id == Some(user_id)
    }
}
