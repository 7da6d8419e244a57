//! Response envelopes of the DittoTrip API. Every list endpoint wraps its rows
//! in a differently named array, and not all of them report a page count.

use dt_core::models::{ActivityPost, Category, ListPage, Member, PageRequest, Quest, Report, Spot, SpotRequest};
use serde::{Deserialize, Serialize};

pub trait IntoPage<T> {
    fn into_page(self, request: &PageRequest) -> ListPage<T>;
}

#[derive(Serialize)]
pub struct LoginBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberList {
    pub user_data_for_admin_list: Vec<Member>,
    #[serde(default)]
    pub total_pages: usize,
}

impl IntoPage<Member> for MemberList {
    fn into_page(self, request: &PageRequest) -> ListPage<Member> {
        ListPage::new(self.user_data_for_admin_list, self.total_pages, request.page)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryList {
    pub category_data_list: Vec<Category>,
    #[serde(default)]
    pub total_pages: usize,
}

impl IntoPage<Category> for CategoryList {
    fn into_page(self, request: &PageRequest) -> ListPage<Category> {
        ListPage::new(self.category_data_list, self.total_pages, request.page)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotList {
    pub spot_data_list: Vec<Spot>,
    #[serde(default)]
    pub total_pages: usize,
}

impl IntoPage<Spot> for SpotList {
    fn into_page(self, request: &PageRequest) -> ListPage<Spot> {
        ListPage::new(self.spot_data_list, self.total_pages, request.page)
    }
}

/// The report endpoint spells it `totalPage`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportList {
    pub report_data_list: Vec<Report>,
    #[serde(default, alias = "totalPage")]
    pub total_pages: usize,
}

impl IntoPage<Report> for ReportList {
    fn into_page(self, request: &PageRequest) -> ListPage<Report> {
        ListPage::new(self.report_data_list, self.total_pages, request.page)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotRequestList {
    #[serde(alias = "spotRequests")]
    pub spot_apply_data_list: Vec<SpotRequest>,
    #[serde(default)]
    pub total_pages: usize,
}

impl IntoPage<SpotRequest> for SpotRequestList {
    fn into_page(self, request: &PageRequest) -> ListPage<SpotRequest> {
        ListPage::new(self.spot_apply_data_list, self.total_pages, request.page)
    }
}

/// The admin quest list reports an item count; pages are derived from it
/// unless the server also sends `totalPages`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestList {
    pub quest_data_list: Vec<Quest>,
    #[serde(default)]
    pub total_pages: Option<usize>,
    #[serde(default)]
    pub total_count: Option<usize>,
}

impl IntoPage<Quest> for QuestList {
    fn into_page(self, request: &PageRequest) -> ListPage<Quest> {
        match (self.total_pages, self.total_count) {
            (Some(pages), _) => ListPage::new(self.quest_data_list, pages, request.page),
            (None, Some(count)) => ListPage::from_total_count(self.quest_data_list, count, request),
            (None, None) => {
                let pages = usize::from(!self.quest_data_list.is_empty());
                ListPage::new(self.quest_data_list, pages, request.page)
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityList {
    #[serde(alias = "reviewDataList", alias = "dittoDataList")]
    pub items: Vec<ActivityPost>,
    #[serde(default)]
    pub total_pages: usize,
}

impl IntoPage<ActivityPost> for ActivityList {
    fn into_page(self, request: &PageRequest) -> ListPage<ActivityPost> {
        ListPage::new(self.items, self.total_pages, request.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn member_envelope_becomes_page() {
        let body: MemberList = serde_json::from_value(json!({
            "userDataForAdminList": [{ "userId": 5, "nickname": "a" }],
            "totalPages": 3
        }))
        .unwrap();
        let page = body.into_page(&PageRequest::new(0, 10));
        assert_eq!(page.items[0].user_id, 5);
        assert_eq!((page.total_pages, page.current), (3, 0));
    }

    #[test]
    fn report_envelope_accepts_singular_total() {
        let body: ReportList = serde_json::from_value(json!({
            "reportDataList": [],
            "totalPage": 4
        }))
        .unwrap();
        assert_eq!(body.into_page(&PageRequest::new(2, 10)).total_pages, 4);
    }

    #[test]
    fn quest_pages_come_from_count() {
        let quest = json!({ "questId": 1, "title": "Visit 3 spots" });
        let body: QuestList = serde_json::from_value(json!({
            "questDataList": [quest],
            "totalCount": 11
        }))
        .unwrap();
        assert_eq!(body.into_page(&PageRequest::new(0, 10)).total_pages, 2);

        let bare: QuestList = serde_json::from_value(json!({ "questDataList": [] })).unwrap();
        assert_eq!(bare.into_page(&PageRequest::new(0, 10)).total_pages, 0);
    }

    #[test]
    fn activity_envelope_takes_either_name() {
        let reviews: ActivityList = serde_json::from_value(json!({
            "reviewDataList": [{ "reviewId": 3, "title": "Great view" }],
            "totalPages": 1
        }))
        .unwrap();
        assert_eq!(reviews.items[0].id, 3);
        let dittos: ActivityList =
            serde_json::from_value(json!({ "dittoDataList": [{ "dittoId": 9 }] })).unwrap();
        assert_eq!(dittos.items[0].id, 9);
    }
}
