//! The six management resources (plus member activity) as [`ResourceSource`]s
//! over the [`AdminApi`] port.

use std::convert::Infallible;
use std::sync::Arc;

use async_trait::async_trait;

use crate::drafts::{ModerationAction, QuestSaveReq};
use crate::error::Result;
use crate::list::ResourceSource;
use crate::models::{
    ActivityPost, Category, ListPage, Member, MultipartSubmission, PageRequest, Quest, Report, Spot,
    SpotRequest,
};
use crate::traits::AdminApi;

pub struct MemberSource {
    api: Arc<dyn AdminApi>,
}

impl MemberSource {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self { api }
    }
}

#[derive(Debug)]
pub enum MemberAction {
    Suspend(ModerationAction),
}

#[async_trait]
impl ResourceSource for MemberSource {
    type Item = Member;
    type Action = MemberAction;

    fn name(&self) -> &'static str {
        "members"
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<ListPage<Member>> {
        self.api.list_members(request).await
    }

    async fn apply(&self, action: MemberAction) -> Result<()> {
        match action {
            MemberAction::Suspend(moderation) => self.api.suspend_member(&moderation).await,
        }
    }
}

pub struct CategorySource {
    api: Arc<dyn AdminApi>,
}

impl CategorySource {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self { api }
    }
}

#[derive(Debug)]
pub enum CategoryAction {
    Create(MultipartSubmission),
    Update(i64, MultipartSubmission),
    Delete(i64),
}

#[async_trait]
impl ResourceSource for CategorySource {
    type Item = Category;
    type Action = CategoryAction;

    fn name(&self) -> &'static str {
        "categories"
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<ListPage<Category>> {
        self.api.list_categories(request).await
    }

    async fn apply(&self, action: CategoryAction) -> Result<()> {
        match action {
            CategoryAction::Create(submission) => self.api.create_category(&submission).await,
            CategoryAction::Update(id, submission) => self.api.update_category(id, &submission).await,
            CategoryAction::Delete(id) => self.api.delete_category(id).await,
        }
    }
}

pub struct SpotSource {
    api: Arc<dyn AdminApi>,
}

impl SpotSource {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self { api }
    }
}

#[derive(Debug)]
pub enum SpotAction {
    Create(MultipartSubmission),
    Delete(i64),
}

#[async_trait]
impl ResourceSource for SpotSource {
    type Item = Spot;
    type Action = SpotAction;

    fn name(&self) -> &'static str {
        "spots"
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<ListPage<Spot>> {
        self.api.list_spots(request).await
    }

    async fn apply(&self, action: SpotAction) -> Result<()> {
        match action {
            SpotAction::Create(submission) => self.api.create_spot(&submission).await,
            SpotAction::Delete(id) => self.api.delete_spot(id).await,
        }
    }
}

pub struct ReportSource {
    api: Arc<dyn AdminApi>,
}

impl ReportSource {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self { api }
    }
}

#[derive(Debug)]
pub enum ReportAction {
    /// Moderation decision; `target_id` is the report id.
    Handle(ModerationAction),
}

#[async_trait]
impl ResourceSource for ReportSource {
    type Item = Report;
    type Action = ReportAction;

    fn name(&self) -> &'static str {
        "reports"
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<ListPage<Report>> {
        self.api.list_reports(request).await
    }

    async fn apply(&self, action: ReportAction) -> Result<()> {
        match action {
            ReportAction::Handle(moderation) => self.api.handle_report(&moderation).await,
        }
    }
}

pub struct SpotRequestSource {
    api: Arc<dyn AdminApi>,
}

impl SpotRequestSource {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self { api }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotRequestAction {
    Approve(i64),
    Reject(i64),
}

#[async_trait]
impl ResourceSource for SpotRequestSource {
    type Item = SpotRequest;
    type Action = SpotRequestAction;

    fn name(&self) -> &'static str {
        "spot-requests"
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<ListPage<SpotRequest>> {
        self.api.list_spot_requests(request).await
    }

    async fn apply(&self, action: SpotRequestAction) -> Result<()> {
        match action {
            SpotRequestAction::Approve(id) => self.api.judge_spot_request(id, true).await,
            SpotRequestAction::Reject(id) => self.api.judge_spot_request(id, false).await,
        }
    }
}

pub struct QuestSource {
    api: Arc<dyn AdminApi>,
}

impl QuestSource {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self { api }
    }
}

#[derive(Debug)]
pub enum QuestAction {
    Create(QuestSaveReq),
    Delete(i64),
}

#[async_trait]
impl ResourceSource for QuestSource {
    type Item = Quest;
    type Action = QuestAction;

    fn name(&self) -> &'static str {
        "quests"
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<ListPage<Quest>> {
        self.api.list_quests(request).await
    }

    async fn apply(&self, action: QuestAction) -> Result<()> {
        match action {
            QuestAction::Create(quest) => self.api.create_quest(&quest).await,
            QuestAction::Delete(id) => self.api.delete_quest(id).await,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Reviews,
    Dittos,
}

/// A member's reviews or dittos; read-only.
pub struct MemberActivitySource {
    api: Arc<dyn AdminApi>,
    user_id: i64,
    kind: ActivityKind,
}

impl MemberActivitySource {
    pub fn new(api: Arc<dyn AdminApi>, user_id: i64, kind: ActivityKind) -> Self {
        Self { api, user_id, kind }
    }
}

#[async_trait]
impl ResourceSource for MemberActivitySource {
    type Item = ActivityPost;
    type Action = Infallible;

    fn name(&self) -> &'static str {
        match self.kind {
            ActivityKind::Reviews => "member-reviews",
            ActivityKind::Dittos => "member-dittos",
        }
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<ListPage<ActivityPost>> {
        match self.kind {
            ActivityKind::Reviews => self.api.member_reviews(self.user_id, request).await,
            ActivityKind::Dittos => self.api.member_dittos(self.user_id, request).await,
        }
    }

    async fn apply(&self, action: Infallible) -> Result<()> {
        match action {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drafts::ModerationDraft;
    use crate::list::ResourceListController;
    use crate::traits::MockAdminApi;
    use mockall::Sequence;

    fn member_page(page: usize) -> ListPage<Member> {
        let member: Member =
            serde_json::from_value(serde_json::json!({ "userId": 5, "nickname": "a" })).unwrap();
        ListPage::new(vec![member], 3, page)
    }

    #[tokio::test]
    async fn members_next_page_refetches_with_index_one() {
        let mut api = MockAdminApi::new();
        let mut seq = Sequence::new();
        api.expect_list_members()
            .withf(|r| r.page == 0 && r.size == 10 && r.query.is_empty())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|r| Ok(member_page(r.page)));
        api.expect_list_members()
            .withf(|r| r.page == 1)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|r| Ok(member_page(r.page)));

        let mut list = ResourceListController::new(MemberSource::new(Arc::new(api)), 10);
        list.load().await.unwrap();
        assert_eq!(list.items()[0].user_id, 5);
        let pager = list.pagination();
        assert_eq!(pager.label(), "1 / 3");
        assert!(pager.prev_disabled() && !pager.next_disabled());

        list.go_to(pager.next().unwrap()).await.unwrap();
        assert_eq!(list.page_index(), 1);
    }

    #[tokio::test]
    async fn permanent_suspension_sends_zero_days() {
        let mut api = MockAdminApi::new();
        api.expect_suspend_member()
            .withf(|a| a.target_id == 5 && a.should_permanently_ban && a.suspension_days == 0)
            .times(1)
            .returning(|_| Ok(()));
        api.expect_list_members().times(1).returning(|r| Ok(member_page(r.page)));

        let draft = ModerationDraft {
            should_delete_content: false,
            should_permanently_ban: true,
            suspension_days: 14,
        };
        let mut list = ResourceListController::new(MemberSource::new(Arc::new(api)), 10);
        list.mutate(MemberAction::Suspend(draft.to_action(5))).await.into_result().unwrap();
    }

    #[tokio::test]
    async fn spot_request_actions_map_to_judgement() {
        let mut api = MockAdminApi::new();
        api.expect_judge_spot_request()
            .withf(|id, approve| *id == 7 && *approve)
            .times(1)
            .returning(|_, _| Ok(()));
        api.expect_judge_spot_request()
            .withf(|id, approve| *id == 8 && !*approve)
            .times(1)
            .returning(|_, _| Ok(()));

        let source = SpotRequestSource::new(Arc::new(api));
        source.apply(SpotRequestAction::Approve(7)).await.unwrap();
        source.apply(SpotRequestAction::Reject(8)).await.unwrap();
    }

    #[tokio::test]
    async fn activity_source_picks_endpoint_by_kind() {
        let mut api = MockAdminApi::new();
        api.expect_member_dittos()
            .withf(|id, r| *id == 3 && r.size == 3)
            .times(1)
            .returning(|_, r| Ok(ListPage::new(vec![], 0, r.page)));
        let mut list =
            ResourceListController::new(MemberActivitySource::new(Arc::new(api), 3, ActivityKind::Dittos), 3);
        list.load().await.unwrap();
        assert!(list.items().is_empty());
        assert_eq!(list.source().name(), "member-dittos");
    }
}
