//! # Domain Models
//!
//! Records delivered by the DittoTrip API. They are flat and pre-joined by the
//! server; nothing here is derived locally beyond display labels.

use std::fmt;

use bytes::Bytes;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Bearer token returned by `/auth/login`, sent verbatim as `Authorization`.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Returns `None` for blank input so an empty token file reads as "logged out".
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Operator credentials for `/auth/login`.
#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

/// Query sent by every list screen: `?query=..&page=..&size=..`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub query: String,
    /// Zero-based page index
    pub page: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn new(page: usize, size: usize) -> Self {
        Self { query: String::new(), page, size }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("query", self.query.clone()),
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
        ]
    }
}

/// One page of a resource list.
///
/// Before the first load `current` is 0 and `total_pages` is 0; afterwards
/// `current` stays within `0..total_pages` whenever `total_pages > 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub total_pages: usize,
    pub current: usize,
}

impl<T> Default for ListPage<T> {
    fn default() -> Self {
        Self { items: Vec::new(), total_pages: 0, current: 0 }
    }
}

impl<T> ListPage<T> {
    pub fn new(items: Vec<T>, total_pages: usize, current: usize) -> Self {
        Self { items, total_pages, current }
    }

    /// For endpoints that report an item count instead of a page count.
    pub fn from_total_count(items: Vec<T>, total_count: usize, request: &PageRequest) -> Self {
        let total_pages = if request.size == 0 {
            0
        } else {
            total_count.div_ceil(request.size)
        };
        Self::new(items, total_pages, request.page)
    }
}

/// A file picked in a form, kept in memory until submission.
#[derive(Clone, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: mime::Mime,
    pub bytes: Bytes,
}

impl Attachment {
    /// Falls back to guessing from the file name when the browser sent no
    /// (or an unparsable) content type.
    pub fn new(file_name: impl Into<String>, content_type: Option<&str>, bytes: Bytes) -> Self {
        let file_name = file_name.into();
        let content_type = content_type
            .and_then(|raw| raw.parse::<mime::Mime>().ok())
            .filter(|m| *m != mime::APPLICATION_OCTET_STREAM)
            .unwrap_or_else(|| mime_guess::from_path(&file_name).first_or_octet_stream());
        Self { file_name, content_type, bytes }
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type.essence_str())
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A binary part of a multipart submission.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: &'static str,
    pub attachment: Attachment,
}

/// Composite create/edit request: one JSON document sent as the `saveReq`
/// part, followed by zero or more file parts.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartSubmission {
    pub save_req: serde_json::Value,
    pub files: Vec<FilePart>,
}

impl MultipartSubmission {
    pub const JSON_PART: &'static str = "saveReq";

    pub fn new<T: Serialize>(save_req: &T) -> Result<Self> {
        let save_req = serde_json::to_value(save_req)
            .map_err(|e| AppError::Internal(format!("cannot encode saveReq: {e}")))?;
        Ok(Self { save_req, files: Vec::new() })
    }

    pub fn with_file(mut self, field: &'static str, attachment: Attachment) -> Self {
        self.files.push(FilePart { field, attachment });
        self
    }
}

// ---------- Members ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    #[default]
    Normal,
    Banned,
    Inactive,
    #[serde(other)]
    Unknown,
}

impl UserStatus {
    pub fn label(&self) -> &'static str {
        match self {
            UserStatus::Normal => "Active",
            UserStatus::Banned => "Suspended",
            UserStatus::Inactive => "Inactive",
            UserStatus::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub user_id: i64,
    pub nickname: String,
    #[serde(default)]
    pub user_status: UserStatus,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub created_date_time: Option<String>,
    /// Level progression as reported by the server
    #[serde(default)]
    pub progression_bar: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub ditto_count: u32,
}

/// A review or ditto written by a member, shown on the member detail screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPost {
    #[serde(alias = "reviewId", alias = "dittoId")]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub created_date_time: Option<String>,
}

// ---------- Categories ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MajorType {
    Person,
    Content,
}

impl MajorType {
    pub const ALL: [MajorType; 2] = [MajorType::Person, MajorType::Content];

    pub fn label(&self) -> &'static str {
        match self {
            MajorType::Person => "Person",
            MajorType::Content => "Content",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            MajorType::Person => "PERSON",
            MajorType::Content => "CONTENT",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.code() == code)
    }

    pub fn sub_types(&self) -> &'static [SubType] {
        match self {
            MajorType::Person => &[SubType::PersonActor, SubType::PersonSinger, SubType::PersonComedian],
            MajorType::Content => &[SubType::ContentMovie, SubType::ContentDrama, SubType::ContentEntertainment],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubType {
    PersonActor,
    PersonSinger,
    PersonComedian,
    ContentMovie,
    ContentDrama,
    ContentEntertainment,
}

impl SubType {
    pub const ALL: [SubType; 6] = [
        SubType::PersonActor,
        SubType::PersonSinger,
        SubType::PersonComedian,
        SubType::ContentMovie,
        SubType::ContentDrama,
        SubType::ContentEntertainment,
    ];

    pub fn major(&self) -> MajorType {
        match self {
            SubType::PersonActor | SubType::PersonSinger | SubType::PersonComedian => MajorType::Person,
            _ => MajorType::Content,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubType::PersonActor => "Actor",
            SubType::PersonSinger => "Singer",
            SubType::PersonComedian => "Comedian",
            SubType::ContentMovie => "Movie",
            SubType::ContentDrama => "Drama",
            SubType::ContentEntertainment => "Entertainment",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            SubType::PersonActor => "PERSON_ACTOR",
            SubType::PersonSinger => "PERSON_SINGER",
            SubType::PersonComedian => "PERSON_COMEDIAN",
            SubType::ContentMovie => "CONTENT_MOVIE",
            SubType::ContentDrama => "CONTENT_DRAMA",
            SubType::ContentEntertainment => "CONTENT_ENTERTAINMENT",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_id: i64,
    pub name: String,
    #[serde(default)]
    pub image_file_path: Option<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub spot_list: Vec<Spot>,
    #[serde(default)]
    pub spot_count: Option<u32>,
    #[serde(default)]
    pub major_type: Option<MajorType>,
    #[serde(default)]
    pub sub_type: Option<SubType>,
    #[serde(default)]
    pub created_date_time: Option<String>,
}

impl Category {
    /// Prefers the server's count; search results only carry the list.
    pub fn spot_total(&self) -> usize {
        self.spot_count.map(|c| c as usize).unwrap_or(self.spot_list.len())
    }
}

// ---------- Spots ----------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spot {
    pub spot_id: i64,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub point_x: f64,
    #[serde(default)]
    pub point_y: f64,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

/// A user's request to add a spot, awaiting approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotRequest {
    #[serde(alias = "id")]
    pub spot_apply_id: i64,
    pub name: String,
    #[serde(default, alias = "location")]
    pub address: String,
    #[serde(default)]
    pub created_date_time: Option<String>,
}

// ---------- Reports ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportReason {
    Blame,
    IllegalInformation,
    Business,
    PersonalInformationExposure,
    SensationalContents,
    IllegalNickname,
    Etc,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ReportReason {
    pub fn label(&self) -> &'static str {
        match self {
            ReportReason::Blame => "Abuse or insults",
            ReportReason::IllegalInformation => "Illegal information",
            ReportReason::Business => "Advertising or commercial",
            ReportReason::PersonalInformationExposure => "Personal information exposed",
            ReportReason::SensationalContents => "Obscene or sensational content",
            ReportReason::IllegalNickname => "Inappropriate nickname",
            ReportReason::Etc => "Other",
            ReportReason::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportTarget {
    Review,
    ReviewComment,
    Ditto,
    DittoComment,
    User,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ReportTarget {
    pub fn label(&self) -> &'static str {
        match self {
            ReportTarget::Review => "Review",
            ReportTarget::ReviewComment => "Review comment",
            ReportTarget::Ditto => "Ditto",
            ReportTarget::DittoComment => "Ditto comment",
            ReportTarget::User => "User",
            ReportTarget::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportUser {
    pub user_id: i64,
    pub nickname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub report_id: i64,
    #[serde(default)]
    pub report_reason_type: ReportReason,
    #[serde(default)]
    pub report_target_type: ReportTarget,
    #[serde(default)]
    pub is_handled: bool,
    #[serde(default)]
    pub created_date_time: Option<String>,
    pub user_data: ReportUser,
    #[serde(default)]
    pub target_id: Option<i64>,
    #[serde(default)]
    pub content_path: Option<String>,
}

// ---------- Quests ----------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardData {
    pub reward_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub quest_id: i64,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub condition_count: u32,
    #[serde(default)]
    pub quest_action_type: String,
    #[serde(default)]
    pub created_date_time: Option<String>,
    #[serde(default)]
    pub reward_exp: u32,
    #[serde(default)]
    pub reward_data: Option<RewardData>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_debug_hides_value() {
        let token = Token::parse("  eyJhbGciOi  ").unwrap();
        assert_eq!(token.as_str(), "eyJhbGciOi");
        assert_eq!(format!("{token:?}"), "Token(***)");
        assert!(Token::parse("   ").is_none());
    }

    #[test]
    fn member_with_sparse_fields_decodes() {
        let member: Member = serde_json::from_value(serde_json::json!({
            "userId": 5,
            "nickname": "a"
        }))
        .unwrap();
        assert_eq!(member.user_id, 5);
        assert_eq!(member.user_status, UserStatus::Normal);
        assert_eq!(member.review_count, 0);
    }

    #[test]
    fn unknown_enum_values_fall_back() {
        let report: Report = serde_json::from_value(serde_json::json!({
            "reportId": 1,
            "reportReasonType": "SPAM_BOT",
            "reportTargetType": "DITTO_COMMENT",
            "userData": { "userId": 9, "nickname": "x" }
        }))
        .unwrap();
        assert_eq!(report.report_reason_type, ReportReason::Unknown);
        assert_eq!(report.report_target_type, ReportTarget::DittoComment);
    }

    #[test]
    fn sub_types_belong_to_their_major() {
        for major in MajorType::ALL {
            assert!(major.sub_types().iter().all(|s| s.major() == major));
        }
        assert_eq!(SubType::from_code("CONTENT_DRAMA"), Some(SubType::ContentDrama));
        assert_eq!(MajorType::from_code("PLACE"), None);
    }

    #[test]
    fn total_count_rounds_up_to_pages() {
        let request = PageRequest::new(0, 10);
        let page = ListPage::from_total_count(vec![1, 2, 3], 21, &request);
        assert_eq!(page.total_pages, 3);
        let empty: ListPage<i32> = ListPage::from_total_count(vec![], 0, &request);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn attachment_guesses_missing_content_type() {
        let png = Attachment::new("cover.png", None, Bytes::from_static(b"\x89PNG"));
        assert_eq!(png.content_type, mime::IMAGE_PNG);
        let explicit = Attachment::new("blob", Some("image/jpeg"), Bytes::new());
        assert_eq!(explicit.content_type, mime::IMAGE_JPEG);
        let octet = Attachment::new("still.jpg", Some("application/octet-stream"), Bytes::new());
        assert_eq!(octet.content_type, mime::IMAGE_JPEG);
    }
}
