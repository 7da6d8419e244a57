//! # dt-ui
//! dittotrip-admin/crates/dt-ui/src/lib.rs
//! askama templates for the console screens. Overlay forms render to their
//! own fragments which the screen template embeds.

pub mod views;

use askama::Template;
use dt_core::drafts::{CategoryDraft, ModerationDraft, QuestDraft, SpotDraft};
use dt_core::models::{Category, MajorType, Member, Spot, SubType};
use dt_core::overlay::Overlay;
use dt_core::search::SearchPicker;
use dt_core::selection::{Keyed, SelectionSet, MAX_TAGS};

pub use views::{
    NavItem, PagerView, PickItem, PickerView, RowAction, RowView, SearchBox, SelectOption, TableView, NAV,
};

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub notice: Option<String>,
}

/// Generic resource screen: search, toolbar, table, pager and an optional
/// overlay fragment.
#[derive(Template)]
#[template(path = "screen.html")]
pub struct ScreenTemplate {
    pub nav: &'static [NavItem],
    pub active: &'static str,
    pub title: String,
    pub search: Option<SearchBox>,
    pub toolbar: Vec<RowAction>,
    pub notice: Option<String>,
    pub table: TableView,
    pub pager: PagerView,
    pub overlay_html: Option<String>,
}

/// One paginated activity list of the member detail screen.
#[derive(Template)]
#[template(path = "activity_section.html")]
pub struct ActivitySection {
    pub heading: &'static str,
    pub table: TableView,
    pub pager: PagerView,
}

#[derive(Template)]
#[template(path = "member_detail.html")]
pub struct MemberDetailTemplate {
    pub nav: &'static [NavItem],
    pub active: &'static str,
    pub title: String,
    pub notice: Option<String>,
    pub profile: Vec<(&'static str, String)>,
    pub sections: Vec<ActivitySection>,
}

impl MemberDetailTemplate {
    pub fn profile_of(member: &Member) -> Vec<(&'static str, String)> {
        vec![
            ("Nickname", member.nickname.clone()),
            ("Email", member.email.clone()),
            ("Status", member.user_status.label().to_string()),
            (
                "Joined",
                member
                    .created_date_time
                    .as_deref()
                    .map(dt_core::display::format_date)
                    .unwrap_or_default(),
            ),
            ("Level", member.progression_bar.to_string()),
            ("Reviews", member.review_count.to_string()),
            ("Dittos", member.ditto_count.to_string()),
        ]
    }
}

#[derive(Template)]
#[template(path = "moderation_form.html")]
pub struct ModerationFormTemplate {
    pub heading: String,
    pub action: String,
    pub should_delete_content: bool,
    pub should_permanently_ban: bool,
    pub suspension_days: u32,
    pub submitting: bool,
    pub notice: Option<String>,
}

impl ModerationFormTemplate {
    /// `None` when the overlay is closed.
    pub fn from_overlay(heading: String, action: String, overlay: &Overlay<ModerationDraft>) -> Option<Self> {
        let draft = overlay.draft()?;
        Some(Self {
            heading,
            action,
            should_delete_content: draft.should_delete_content,
            should_permanently_ban: draft.should_permanently_ban,
            suspension_days: draft.suspension_days,
            submitting: overlay.is_submitting(),
            notice: overlay.notice().map(str::to_string),
        })
    }
}

#[derive(Template)]
#[template(path = "category_form.html")]
pub struct CategoryFormTemplate {
    pub heading: String,
    pub action: String,
    pub name: String,
    pub majors: Vec<SelectOption>,
    pub subs: Vec<SelectOption>,
    pub image_name: Option<String>,
    pub tags: Vec<String>,
    pub tag_limit: usize,
    pub picker: PickerView,
    pub submitting: bool,
    pub notice: Option<String>,
}

impl CategoryFormTemplate {
    pub fn from_overlay(action: String, overlay: &Overlay<CategoryDraft>, picker: &SearchPicker<Spot>) -> Option<Self> {
        let draft = overlay.draft()?;
        let heading = match overlay.target() {
            Some(id) => format!("Edit category #{id}"),
            None => "New category".to_string(),
        };
        Some(Self {
            heading,
            action,
            name: draft.name.clone(),
            majors: major_options(draft.major),
            subs: sub_options(draft.major, draft.sub),
            image_name: draft.image.as_ref().map(|a| a.file_name.clone()),
            tags: draft.tags.to_vec(),
            tag_limit: MAX_TAGS,
            picker: PickerView {
                heading: "Spots",
                query: picker.query().to_string(),
                candidates: picker.candidates().iter().map(spot_item).collect(),
                selected: selected_items(&draft.spots, spot_item),
            },
            submitting: overlay.is_submitting(),
            notice: overlay.notice().map(str::to_string),
        })
    }
}

#[derive(Template)]
#[template(path = "spot_form.html")]
pub struct SpotFormTemplate {
    pub heading: String,
    pub action: String,
    pub name: String,
    pub address: String,
    pub point_x: String,
    pub point_y: String,
    pub image_name: Option<String>,
    pub still_cut_names: Vec<String>,
    pub tags: Vec<String>,
    pub tag_limit: usize,
    pub picker: PickerView,
    pub submitting: bool,
    pub notice: Option<String>,
}

impl SpotFormTemplate {
    pub fn from_overlay(action: String, overlay: &Overlay<SpotDraft>, picker: &SearchPicker<Category>) -> Option<Self> {
        let draft = overlay.draft()?;
        Some(Self {
            heading: "New spot".to_string(),
            action,
            name: draft.name.clone(),
            address: draft.address.clone(),
            point_x: draft.point_x.to_string(),
            point_y: draft.point_y.to_string(),
            image_name: draft.image.as_ref().map(|a| a.file_name.clone()),
            still_cut_names: draft.still_cuts.iter().map(|a| a.file_name.clone()).collect(),
            tags: draft.tags.to_vec(),
            tag_limit: MAX_TAGS,
            picker: PickerView {
                heading: "Categories",
                query: picker.query().to_string(),
                candidates: picker.candidates().iter().map(category_item).collect(),
                selected: selected_items(&draft.categories, category_item),
            },
            submitting: overlay.is_submitting(),
            notice: overlay.notice().map(str::to_string),
        })
    }
}

#[derive(Template)]
#[template(path = "quest_form.html")]
pub struct QuestFormTemplate {
    pub heading: String,
    pub action: String,
    pub title: String,
    pub body: String,
    pub action_type: String,
    pub condition_count: u32,
    pub reward_exp: u32,
    pub reward_id: String,
    pub submitting: bool,
    pub notice: Option<String>,
}

impl QuestFormTemplate {
    pub fn from_overlay(action: String, overlay: &Overlay<QuestDraft>) -> Option<Self> {
        let draft = overlay.draft()?;
        Some(Self {
            heading: "New quest".to_string(),
            action,
            title: draft.title.clone(),
            body: draft.body.clone(),
            action_type: draft.action_type.clone(),
            condition_count: draft.condition_count,
            reward_exp: draft.reward_exp,
            reward_id: draft.reward_id.map(|id| id.to_string()).unwrap_or_default(),
            submitting: overlay.is_submitting(),
            notice: overlay.notice().map(str::to_string),
        })
    }
}

fn major_options(current: MajorType) -> Vec<SelectOption> {
    MajorType::ALL
        .iter()
        .map(|m| SelectOption::new(m.code(), m.label(), *m == current))
        .collect()
}

/// Only the sub types of the chosen major are offered.
fn sub_options(major: MajorType, current: SubType) -> Vec<SelectOption> {
    major
        .sub_types()
        .iter()
        .map(|s| SelectOption::new(s.code(), s.label(), *s == current))
        .collect()
}

fn spot_item(spot: &Spot) -> PickItem {
    PickItem { id: spot.spot_id, label: format!("{} ({})", spot.name, spot.address) }
}

fn category_item(category: &Category) -> PickItem {
    PickItem { id: category.category_id, label: category.name.clone() }
}

fn selected_items<T: Keyed>(set: &SelectionSet<T>, item: fn(&T) -> PickItem) -> Vec<PickItem> {
    set.iter().map(item).collect()
}
