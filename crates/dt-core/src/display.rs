//! Table rendering contract shared by every resource screen.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::models::{ActivityPost, Category, Member, Quest, Report, Spot, SpotRequest};

/// Settings needed to turn records into cells.
#[derive(Debug, Clone, Default)]
pub struct DisplayContext {
    /// Public site host, prefixed to report content paths
    pub web_base_url: String,
}

/// One table cell: plain text, optionally a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub href: Option<String>,
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), href: None }
    }

    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self { text: text.into(), href: Some(href.into()) }
    }
}

/// A record that renders as a row of a resource table.
pub trait TableRow {
    const COLUMNS: &'static [&'static str];

    fn row_id(&self) -> i64;

    fn cells(&self, ctx: &DisplayContext) -> Vec<Cell>;
}

/// Formats server timestamps as `YYYY.MM.DD`; unparsable input is shown as is.
pub fn format_date(raw: &str) -> String {
    const OUT: &str = "%Y.%m.%d";
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(OUT).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(OUT).to_string();
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.format(OUT).to_string();
    }
    raw.to_string()
}

fn date_cell(raw: &Option<String>) -> Cell {
    Cell::text(raw.as_deref().map(format_date).unwrap_or_default())
}

impl TableRow for Member {
    const COLUMNS: &'static [&'static str] =
        &["Nickname", "Account", "Joined", "Level", "Reviews / Dittos", "Status"];

    fn row_id(&self) -> i64 {
        self.user_id
    }

    fn cells(&self, _ctx: &DisplayContext) -> Vec<Cell> {
        vec![
            Cell::link(&self.nickname, format!("/members/{}", self.user_id)),
            Cell::text(&self.email),
            date_cell(&self.created_date_time),
            Cell::text(self.progression_bar.to_string()),
            Cell::text(format!("{} / {}", self.review_count, self.ditto_count)),
            Cell::text(self.user_status.label()),
        ]
    }
}

impl TableRow for Category {
    const COLUMNS: &'static [&'static str] = &["ID", "Name", "Type", "Spots", "Registered"];

    fn row_id(&self) -> i64 {
        self.category_id
    }

    fn cells(&self, _ctx: &DisplayContext) -> Vec<Cell> {
        let kind = match (self.major_type, self.sub_type) {
            (Some(major), Some(sub)) => format!("{} / {}", major.label(), sub.label()),
            (Some(major), None) => major.label().to_string(),
            (None, Some(sub)) => sub.label().to_string(),
            (None, None) => String::new(),
        };
        vec![
            Cell::text(self.category_id.to_string()),
            Cell::text(&self.name),
            Cell::text(kind),
            Cell::text(self.spot_total().to_string()),
            date_cell(&self.created_date_time),
        ]
    }
}

impl TableRow for Spot {
    const COLUMNS: &'static [&'static str] = &["ID", "Name", "Address", "Rating"];

    fn row_id(&self) -> i64 {
        self.spot_id
    }

    fn cells(&self, _ctx: &DisplayContext) -> Vec<Cell> {
        vec![
            Cell::text(self.spot_id.to_string()),
            Cell::text(&self.name),
            Cell::text(&self.address),
            Cell::text(self.rating.map(|r| format!("{r:.1}")).unwrap_or_default()),
        ]
    }
}

impl TableRow for Report {
    const COLUMNS: &'static [&'static str] =
        &["Report ID", "Nickname", "Target", "Reported", "Reason", "Content", "Handled"];

    fn row_id(&self) -> i64 {
        self.report_id
    }

    fn cells(&self, ctx: &DisplayContext) -> Vec<Cell> {
        let content = match &self.content_path {
            Some(path) => Cell::link("link", format!("{}{}", ctx.web_base_url.trim_end_matches('/'), path)),
            None => Cell::text(""),
        };
        vec![
            Cell::text(self.report_id.to_string()),
            Cell::text(&self.user_data.nickname),
            Cell::text(self.report_target_type.label()),
            date_cell(&self.created_date_time),
            Cell::text(self.report_reason_type.label()),
            content,
            Cell::text(if self.is_handled { "yes" } else { "no" }),
        ]
    }
}

impl TableRow for SpotRequest {
    const COLUMNS: &'static [&'static str] = &["Request ID", "Name", "Address", "Requested"];

    fn row_id(&self) -> i64 {
        self.spot_apply_id
    }

    fn cells(&self, _ctx: &DisplayContext) -> Vec<Cell> {
        vec![
            Cell::text(self.spot_apply_id.to_string()),
            Cell::text(&self.name),
            Cell::text(&self.address),
            date_cell(&self.created_date_time),
        ]
    }
}

impl TableRow for Quest {
    const COLUMNS: &'static [&'static str] =
        &["ID", "Title", "Action", "Condition", "Reward EXP", "Reward", "Created"];

    fn row_id(&self) -> i64 {
        self.quest_id
    }

    fn cells(&self, _ctx: &DisplayContext) -> Vec<Cell> {
        vec![
            Cell::text(self.quest_id.to_string()),
            Cell::text(&self.title),
            Cell::text(&self.quest_action_type),
            Cell::text(self.condition_count.to_string()),
            Cell::text(self.reward_exp.to_string()),
            Cell::text(self.reward_data.as_ref().map(|r| r.name.as_str()).unwrap_or_default()),
            date_cell(&self.created_date_time),
        ]
    }
}

impl TableRow for ActivityPost {
    const COLUMNS: &'static [&'static str] = &["ID", "Title", "Body", "Written"];

    fn row_id(&self) -> i64 {
        self.id
    }

    fn cells(&self, _ctx: &DisplayContext) -> Vec<Cell> {
        vec![
            Cell::text(self.id.to_string()),
            Cell::text(&self.title),
            Cell::text(&self.body),
            date_cell(&self.created_date_time),
        ]
    }
}
