//! End-to-end screen flows against a mocked DittoTrip API.

use std::sync::Arc;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use dt_api::configure_routes;
use dt_api::state::AppState;
use dt_config::Settings;
use dt_core::error::AppError;
use dt_core::drafts::QuestSaveReq;
use dt_core::models::{Category, ListPage, Member, MultipartSubmission, PageRequest, Spot, Token};
use dt_core::session::{AuthContext, MemoryTokenStore};
use dt_core::traits::{MockAdminApi, TokenStore};

fn member(id: i64, nickname: &str) -> Member {
    serde_json::from_value(serde_json::json!({ "userId": id, "nickname": nickname })).unwrap()
}

async fn state(api: MockAdminApi, signed_in: bool) -> web::Data<AppState> {
    let store = Arc::new(MemoryTokenStore::default());
    if signed_in {
        store.save(&Token::parse("tok").unwrap()).await.unwrap();
    }
    let auth = Arc::new(AuthContext::new(store));
    auth.restore().await.unwrap();
    let settings = Settings::from_builder(Settings::defaults().unwrap()).unwrap();
    web::Data::new(AppState::new(Arc::new(api), auth, settings))
}

fn spot(id: i64, name: &str) -> Spot {
    serde_json::from_value(serde_json::json!({ "spotId": id, "name": name })).unwrap()
}

const BOUNDARY: &str = "dittoboundary";

/// A browser-style multipart post of plain text fields.
fn multipart_post(uri: &str, fields: &[(&str, &str)]) -> test::TestRequest {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    test::TestRequest::post()
        .uri(uri)
        .insert_header((header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}")))
        .set_payload(body)
}

fn location(resp: &actix_web::dev::ServiceResponse) -> String {
    resp.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[actix_web::test]
async fn guarded_screens_redirect_to_login() {
    let data = state(MockAdminApi::new(), false).await;
    let app = test::init_service(App::new().app_data(data.clone()).configure(configure_routes)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/members?query=").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");

    let resp = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn login_stores_token() {
    let mut api = MockAdminApi::new();
    api.expect_login()
        .withf(|c| c.email == "admin@dittotrip.site")
        .times(1)
        .returning(|_| Ok(Token::parse("fresh").unwrap()));
    let data = state(api, false).await;
    let app = test::init_service(App::new().app_data(data.clone()).configure(configure_routes)).await;

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form([("email", "admin@dittotrip.site"), ("password", "pw")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(data.auth.token().map(|t| t.as_str().to_string()).as_deref(), Some("fresh"));
}

#[actix_web::test]
async fn members_table_and_next_page() {
    let mut api = MockAdminApi::new();
    api.expect_list_members()
        .withf(|req: &PageRequest| req.page == 0 && req.size == 10)
        .times(1)
        .returning(|req| Ok(ListPage::new(vec![member(5, "a")], 3, req.page)));
    api.expect_list_members()
        .withf(|req: &PageRequest| req.page == 1)
        .times(1)
        .returning(|req| Ok(ListPage::new(vec![member(6, "b")], 3, req.page)));
    let data = state(api, true).await;
    let app = test::init_service(App::new().app_data(data.clone()).configure(configure_routes)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/members?query=").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("href=\"/members/5\""));
    assert!(body.contains("1 / 3"));
    assert!(body.contains("href=\"/members?page=1\""));
    assert!(!body.contains("href=\"/members?page=0\""));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/members?page=1").to_request()).await;
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("2 / 3"));
    assert!(body.contains("href=\"/members/6\""));
}

#[actix_web::test]
async fn permanent_ban_sends_zero_days_and_reloads_once() {
    let mut api = MockAdminApi::new();
    api.expect_list_members()
        .times(2)
        .returning(|req| Ok(ListPage::new(vec![member(5, "a")], 1, req.page)));
    api.expect_suspend_member()
        .withf(|a| a.target_id == 5 && a.should_permanently_ban && a.suspension_days == 0)
        .times(1)
        .returning(|_| Ok(()));
    let data = state(api, true).await;
    let app = test::init_service(App::new().app_data(data.clone()).configure(configure_routes)).await;

    test::call_service(&app, test::TestRequest::get().uri("/members?query=").to_request()).await;

    let resp = test::call_service(&app, test::TestRequest::post().uri("/members/5/suspend").to_request()).await;
    assert_eq!(location(&resp), "/members");
    assert!(data.members.overlay.lock().await.is_open());

    let req = test::TestRequest::post()
        .uri("/members/overlay")
        .set_form([("op", "submit"), ("should_permanently_ban", "true"), ("suspension_days", "30")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(!data.members.overlay.lock().await.is_open());
}

#[actix_web::test]
async fn protected_account_cannot_be_suspended() {
    let mut api = MockAdminApi::new();
    api.expect_list_members()
        .times(1)
        .returning(|req| Ok(ListPage::new(vec![member(200, "operator")], 1, req.page)));
    let data = state(api, true).await;
    let app = test::init_service(App::new().app_data(data.clone()).configure(configure_routes)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/members?query=").to_request()).await;
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(!body.contains("/members/200/suspend"));

    test::call_service(&app, test::TestRequest::post().uri("/members/200/suspend").to_request()).await;
    assert!(!data.members.overlay.lock().await.is_open());

    let resp = test::call_service(&app, test::TestRequest::get().uri("/members").to_request()).await;
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("cannot be suspended"));
}

#[actix_web::test]
async fn rejected_token_forces_relogin() {
    let mut api = MockAdminApi::new();
    api.expect_list_quests()
        .times(1)
        .returning(|_| Err(AppError::Unauthorized("expired".into())));
    let data = state(api, true).await;
    let app = test::init_service(App::new().app_data(data.clone()).configure(configure_routes)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/quests?query=").to_request()).await;
    assert_eq!(location(&resp), "/login");
    assert!(!data.auth.is_authenticated());
}

#[actix_web::test]
async fn failed_reload_after_create_still_closes_form() {
    let mut api = MockAdminApi::new();
    api.expect_create_quest().withf(|q: &QuestSaveReq| q.title == "First review").times(1).returning(|_| Ok(()));
    api.expect_list_quests().times(1).returning(|_| Err(AppError::Transport("reset".into())));
    let data = state(api, true).await;
    let app = test::init_service(App::new().app_data(data.clone()).configure(configure_routes)).await;

    test::call_service(&app, test::TestRequest::post().uri("/quests/new").to_request()).await;
    let req = test::TestRequest::post()
        .uri("/quests/overlay")
        .set_form([
            ("op", "submit"),
            ("title", "First review"),
            ("body", "Write a review"),
            ("action_type", "REVIEW"),
            ("condition_count", "1"),
            ("reward_exp", "10"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/quests");
    {
        let overlay = data.quests.overlay.lock().await;
        assert!(!overlay.is_open());
        assert_eq!(overlay.notice(), None);
    }
    assert_eq!(data.quests.take_flash().await.as_deref(), Some("transport error: reset"));
}

#[actix_web::test]
async fn category_create_with_picked_spot_resets_form() {
    let mut api = MockAdminApi::new();
    api.expect_search_spots()
        .withf(|q: &str| q == "nam")
        .times(2)
        .returning(|_| Ok(vec![spot(1, "Namsan"), spot(2, "Namhae")]));
    api.expect_create_category()
        .withf(|s: &MultipartSubmission| s.save_req["name"] == "IU" && s.save_req["spotIds"] == serde_json::json!([1]))
        .times(1)
        .returning(|_| Ok(()));
    api.expect_list_categories()
        .times(1)
        .returning(|req| Ok(ListPage::<Category>::new(vec![], 0, req.page)));
    let data = state(api, true).await;
    let app = test::init_service(App::new().app_data(data.clone()).configure(configure_routes)).await;

    test::call_service(&app, test::TestRequest::post().uri("/categories/new").to_request()).await;
    let search = multipart_post("/categories/overlay", &[("op", "search"), ("name", "IU"), ("picker_query", "nam")]);
    test::call_service(&app, search.to_request()).await;
    assert_eq!(data.category_spots.lock().await.candidates().len(), 2);

    test::call_service(&app, multipart_post("/categories/overlay", &[("op", "pick:1")]).to_request()).await;
    assert!(data.category_spots.lock().await.candidates().is_empty());

    // the same spot found and picked again
    let search = multipart_post("/categories/overlay", &[("op", "search"), ("picker_query", "nam")]);
    test::call_service(&app, search.to_request()).await;
    test::call_service(&app, multipart_post("/categories/overlay", &[("op", "pick:1")]).to_request()).await;
    {
        let overlay = data.categories.overlay.lock().await;
        assert_eq!(overlay.draft().map(|d| d.spots.len()), Some(1));
        assert!(overlay.notice().is_some_and(|n| n.contains("already added")));
    }

    let resp = test::call_service(&app, multipart_post("/categories/overlay", &[("op", "submit")]).to_request()).await;
    assert_eq!(location(&resp), "/categories");
    assert!(!data.categories.overlay.lock().await.is_open());
    let picker = data.category_spots.lock().await;
    assert!(picker.candidates().is_empty());
    assert_eq!(picker.query(), "");
}

#[actix_web::test]
async fn cross_origin_posts_are_refused() {
    let data = state(MockAdminApi::new(), true).await;
    let app = test::init_service(App::new().app_data(data.clone()).configure(configure_routes)).await;

    let req = test::TestRequest::post()
        .uri("/members/5/suspend")
        .insert_header((header::HOST, "127.0.0.1:8080"))
        .insert_header((header::ORIGIN, "https://evil.example"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(!data.members.overlay.lock().await.is_open());

    let req = test::TestRequest::post()
        .uri("/logout")
        .insert_header((header::HOST, "127.0.0.1:8080"))
        .insert_header((header::ORIGIN, "https://evil.example"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(data.auth.is_authenticated());
}
