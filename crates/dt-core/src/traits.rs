//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use async_trait::async_trait;

use crate::drafts::{ModerationAction, QuestSaveReq};
use crate::error::Result;
use crate::models::{
    ActivityPost, Category, Credentials, ListPage, Member, MultipartSubmission, PageRequest, Quest,
    Report, Spot, SpotRequest, Token,
};

/// The remote DittoTrip REST API, one method per endpoint the console uses.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// `POST /auth/login`; unauthenticated.
    async fn login(&self, credentials: &Credentials) -> Result<Token>;

    // Members
    async fn list_members(&self, request: &PageRequest) -> Result<ListPage<Member>>;
    async fn member(&self, user_id: i64) -> Result<Member>;
    async fn member_reviews(&self, user_id: i64, request: &PageRequest) -> Result<ListPage<ActivityPost>>;
    async fn member_dittos(&self, user_id: i64, request: &PageRequest) -> Result<ListPage<ActivityPost>>;
    async fn suspend_member(&self, action: &ModerationAction) -> Result<()>;

    // Categories
    async fn list_categories(&self, request: &PageRequest) -> Result<ListPage<Category>>;
    async fn search_categories(&self, query: &str) -> Result<Vec<Category>>;
    async fn create_category(&self, submission: &MultipartSubmission) -> Result<()>;
    async fn update_category(&self, category_id: i64, submission: &MultipartSubmission) -> Result<()>;
    async fn delete_category(&self, category_id: i64) -> Result<()>;

    // Spots
    async fn list_spots(&self, request: &PageRequest) -> Result<ListPage<Spot>>;
    async fn search_spots(&self, query: &str) -> Result<Vec<Spot>>;
    async fn create_spot(&self, submission: &MultipartSubmission) -> Result<()>;
    async fn delete_spot(&self, spot_id: i64) -> Result<()>;

    // Reports
    async fn list_reports(&self, request: &PageRequest) -> Result<ListPage<Report>>;
    /// Applies the moderation decision to the report's author.
    async fn handle_report(&self, action: &ModerationAction) -> Result<()>;

    // Spot requests
    async fn list_spot_requests(&self, request: &PageRequest) -> Result<ListPage<SpotRequest>>;
    async fn judge_spot_request(&self, spot_apply_id: i64, approve: bool) -> Result<()>;

    // Quests
    async fn list_quests(&self, request: &PageRequest) -> Result<ListPage<Quest>>;
    async fn create_quest(&self, quest: &QuestSaveReq) -> Result<()>;
    async fn delete_quest(&self, quest_id: i64) -> Result<()>;
}

/// Persistent home of the auth token (one value, no expiry metadata).
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> Result<Option<Token>>;
    async fn save(&self, token: &Token) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}
