//! Paths of the DittoTrip REST API used by the console.

pub const LOGIN: &str = "/auth/login";

pub const MEMBER_LIST: &str = "/user/list/search/admin";
pub const CATEGORY_LIST: &str = "/category/list/search/typeless";
pub const CATEGORY: &str = "/category";
pub const SPOT_LIST: &str = "/spot/list/search";
pub const SPOT: &str = "/spot";
pub const REPORT_LIST: &str = "/report/list";
pub const SPOT_REQUEST_LIST: &str = "/spot/apply/list";
pub const QUEST_LIST: &str = "/quest/list/admin";
pub const QUEST: &str = "/quest";

pub fn member(user_id: i64) -> String {
    format!("/user/{user_id}")
}

pub fn member_reviews(user_id: i64) -> String {
    format!("/user/{user_id}/review/list")
}

pub fn member_dittos(user_id: i64) -> String {
    format!("/user/{user_id}/ditto/list")
}

pub fn member_suspend(user_id: i64) -> String {
    format!("/user/{user_id}/suspend")
}

pub fn category(category_id: i64) -> String {
    format!("{CATEGORY}/{category_id}")
}

pub fn spot(spot_id: i64) -> String {
    format!("{SPOT}/{spot_id}")
}

pub fn report(report_id: i64) -> String {
    format!("/report/{report_id}")
}

pub fn spot_request(spot_apply_id: i64) -> String {
    format!("/spot/apply/{spot_apply_id}")
}

pub fn quest(quest_id: i64) -> String {
    format!("{QUEST}/{quest_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_paths() {
        assert_eq!(member_suspend(7), "/user/7/suspend");
        assert_eq!(category(3), "/category/3");
        assert_eq!(spot_request(12), "/spot/apply/12");
        assert_eq!(quest(1), "/quest/1");
    }
}
