//! Plain view models handed to the templates. Everything is owned and
//! pre-formatted so templates stay free of domain logic.

use dt_core::display::{Cell, DisplayContext, TableRow};
use dt_core::pagination::Pagination;

pub struct NavItem {
    pub key: &'static str,
    pub href: &'static str,
    pub label: &'static str,
}

pub const NAV: &[NavItem] = &[
    NavItem { key: "members", href: "/members?query=", label: "Members" },
    NavItem { key: "categories", href: "/categories?query=", label: "Categories" },
    NavItem { key: "spots", href: "/spots?query=", label: "Spots" },
    NavItem { key: "reports", href: "/reports?query=", label: "Reports" },
    NavItem { key: "spot-requests", href: "/spot-requests?query=", label: "Spot requests" },
    NavItem { key: "quests", href: "/quests?query=", label: "Quests" },
];

/// A button rendered as its own `POST` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowAction {
    pub label: String,
    pub action: String,
    pub danger: bool,
}

impl RowAction {
    pub fn post(label: impl Into<String>, action: impl Into<String>) -> Self {
        Self { label: label.into(), action: action.into(), danger: false }
    }

    pub fn danger(label: impl Into<String>, action: impl Into<String>) -> Self {
        Self { label: label.into(), action: action.into(), danger: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: i64,
    pub cells: Vec<Cell>,
    pub actions: Vec<RowAction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub columns: Vec<&'static str>,
    pub rows: Vec<RowView>,
    pub has_actions: bool,
}

impl TableView {
    pub fn build<T, F>(items: &[T], ctx: &DisplayContext, actions: F) -> Self
    where
        T: TableRow,
        F: Fn(&T) -> Vec<RowAction>,
    {
        let rows: Vec<RowView> = items
            .iter()
            .map(|item| RowView { id: item.row_id(), cells: item.cells(ctx), actions: actions(item) })
            .collect();
        let has_actions = rows.iter().any(|r| !r.actions.is_empty());
        Self { columns: T::COLUMNS.to_vec(), rows, has_actions }
    }
}

/// Prev/next links; `None` means the control is disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerView {
    pub label: String,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

impl PagerView {
    /// `link` turns a page index into the URL that requests it.
    pub fn new(pagination: Pagination, link: impl Fn(usize) -> String) -> Self {
        Self {
            label: pagination.label(),
            prev_href: pagination.prev().map(&link),
            next_href: pagination.next().map(&link),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBox {
    pub action: String,
    pub query: String,
    pub placeholder: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>, selected: bool) -> Self {
        Self { value: value.into(), label: label.into(), selected }
    }
}

/// An id/label pair shown in a picker (candidate or already selected).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickItem {
    pub id: i64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerView {
    pub heading: &'static str,
    pub query: String,
    pub candidates: Vec<PickItem>,
    pub selected: Vec<PickItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use dt_core::models::{Member, UserStatus};

    #[test]
    fn pager_links_follow_disabled_rules() {
        let link = |p: usize| format!("/members?page={p}");
        let first = PagerView::new(Pagination::new(0, 3), link);
        assert_eq!(first.label, "1 / 3");
        assert_eq!(first.prev_href, None);
        assert_eq!(first.next_href.as_deref(), Some("/members?page=1"));

        let last = PagerView::new(Pagination::new(2, 3), link);
        assert_eq!(last.prev_href.as_deref(), Some("/members?page=1"));
        assert_eq!(last.next_href, None);
    }

    #[test]
    fn table_collects_rows_and_actions() {
        let member = Member {
            user_id: 5,
            nickname: "a".into(),
            user_status: UserStatus::Normal,
            email: String::new(),
            created_date_time: None,
            progression_bar: 0.0,
            review_count: 0,
            ditto_count: 0,
        };
        let table = TableView::build(&[member], &DisplayContext::default(), |m: &Member| {
            vec![RowAction::post("Suspend", format!("/members/{}/suspend", m.user_id))]
        });
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].id, 5);
        assert_eq!(table.columns, Member::COLUMNS.to_vec());
        assert!(table.has_actions);
    }
}
