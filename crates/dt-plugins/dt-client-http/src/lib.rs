//! # dt-client-http
//!
//! reqwest implementation of `AdminApi` against the DittoTrip REST API.
//! The token from the shared `AuthContext` is read on every request and sent
//! as a raw `Authorization` header (no scheme prefix).

pub mod endpoints;
pub mod wire;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dt_core::drafts::{ModerationAction, QuestSaveReq};
use dt_core::error::{AppError, Result};
use dt_core::models::{
    ActivityPost, Category, Credentials, ListPage, Member, MultipartSubmission, PageRequest, Quest,
    Report, Spot, SpotRequest, Token,
};
use dt_core::session::AuthContext;
use dt_core::traits::AdminApi;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;

use crate::wire::IntoPage;

pub struct HttpAdminApi {
    client: reqwest::Client,
    base_url: String,
    auth: Arc<AuthContext>,
}

impl HttpAdminApi {
    pub fn new(base_url: &str, timeout: Duration, auth: Arc<AuthContext>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(transport)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        log::debug!("{} {}", method, path);
        let builder = self.client.request(method, format!("{}{}", self.base_url, path));
        match self.auth.token() {
            Some(token) => builder.header(AUTHORIZATION, token.as_str()),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&'static str, String)]) -> Result<T> {
        let response = self.request(Method::GET, path).query(query).send().await.map_err(transport)?;
        let response = check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Transport(format!("undecodable response from {path}: {e}")))
    }

    async fn get_page<E, T>(&self, path: &str, request: &PageRequest) -> Result<ListPage<T>>
    where
        E: DeserializeOwned + IntoPage<T>,
    {
        let envelope: E = self.get_json(path, &request.query_pairs()).await?;
        Ok(envelope.into_page(request))
    }

    /// For lists without a search box: only `page` and `size` are sent.
    async fn get_plain_page<E, T>(&self, path: &str, request: &PageRequest) -> Result<ListPage<T>>
    where
        E: DeserializeOwned + IntoPage<T>,
    {
        let pairs = [("page", request.page.to_string()), ("size", request.size.to_string())];
        let envelope: E = self.get_json(path, &pairs).await?;
        Ok(envelope.into_page(request))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<()> {
        let response = builder.send().await.map_err(transport)?;
        check_status(response).await.map(|_| ())
    }
}

fn transport(e: reqwest::Error) -> AppError {
    AppError::Transport(e.to_string())
}

/// Maps a non-2xx status onto the console's error taxonomy.
pub fn status_error(status: u16, message: String) -> AppError {
    match status {
        401 | 403 => AppError::Unauthorized(if message.is_empty() {
            format!("API answered {status}")
        } else {
            message
        }),
        404 => AppError::NotFound("resource".into(), message),
        _ => AppError::Remote { status, message },
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(status_error(status.as_u16(), message))
}

/// `saveReq` as an `application/json` part, then the file parts in order.
pub fn multipart_form(submission: &MultipartSubmission) -> Result<Form> {
    let json = serde_json::to_string(&submission.save_req)
        .map_err(|e| AppError::Internal(format!("cannot encode saveReq: {e}")))?;
    let mut form = Form::new().part(
        MultipartSubmission::JSON_PART,
        Part::text(json).mime_str("application/json").map_err(transport)?,
    );
    for file in &submission.files {
        let part = Part::bytes(file.attachment.bytes.to_vec())
            .file_name(file.attachment.file_name.clone())
            .mime_str(file.attachment.content_type.as_ref())
            .map_err(transport)?;
        form = form.part(file.field, part);
    }
    Ok(form)
}

#[async_trait]
impl AdminApi for HttpAdminApi {
    async fn login(&self, credentials: &Credentials) -> Result<Token> {
        let body = wire::LoginBody {
            email: &credentials.email,
            password: credentials.password.expose_secret(),
        };
        let response = self
            .client
            .post(format!("{}{}", self.base_url, endpoints::LOGIN))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let login: wire::LoginResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::Transport(format!("undecodable login response: {e}")))?;
        Token::parse(&login.access_token)
            .ok_or_else(|| AppError::Unauthorized("login returned an empty token".into()))
    }

    async fn list_members(&self, request: &PageRequest) -> Result<ListPage<Member>> {
        self.get_page::<wire::MemberList, _>(endpoints::MEMBER_LIST, request).await
    }

    async fn member(&self, user_id: i64) -> Result<Member> {
        self.get_json(&endpoints::member(user_id), &[]).await
    }

    async fn member_reviews(&self, user_id: i64, request: &PageRequest) -> Result<ListPage<ActivityPost>> {
        self.get_plain_page::<wire::ActivityList, _>(&endpoints::member_reviews(user_id), request).await
    }

    async fn member_dittos(&self, user_id: i64, request: &PageRequest) -> Result<ListPage<ActivityPost>> {
        self.get_plain_page::<wire::ActivityList, _>(&endpoints::member_dittos(user_id), request).await
    }

    async fn suspend_member(&self, action: &ModerationAction) -> Result<()> {
        self.send(self.request(Method::POST, &endpoints::member_suspend(action.target_id)).json(action))
            .await
    }

    async fn list_categories(&self, request: &PageRequest) -> Result<ListPage<Category>> {
        self.get_page::<wire::CategoryList, _>(endpoints::CATEGORY_LIST, request).await
    }

    async fn search_categories(&self, query: &str) -> Result<Vec<Category>> {
        let list: wire::CategoryList =
            self.get_json(endpoints::CATEGORY_LIST, &[("query", query.to_string())]).await?;
        Ok(list.category_data_list)
    }

    async fn create_category(&self, submission: &MultipartSubmission) -> Result<()> {
        let form = multipart_form(submission)?;
        self.send(self.request(Method::POST, endpoints::CATEGORY).multipart(form)).await
    }

    async fn update_category(&self, category_id: i64, submission: &MultipartSubmission) -> Result<()> {
        let form = multipart_form(submission)?;
        self.send(self.request(Method::PUT, &endpoints::category(category_id)).multipart(form))
            .await
    }

    async fn delete_category(&self, category_id: i64) -> Result<()> {
        self.send(self.request(Method::DELETE, &endpoints::category(category_id))).await
    }

    async fn list_spots(&self, request: &PageRequest) -> Result<ListPage<Spot>> {
        self.get_page::<wire::SpotList, _>(endpoints::SPOT_LIST, request).await
    }

    async fn search_spots(&self, query: &str) -> Result<Vec<Spot>> {
        let list: wire::SpotList = self.get_json(endpoints::SPOT_LIST, &[("query", query.to_string())]).await?;
        Ok(list.spot_data_list)
    }

    async fn create_spot(&self, submission: &MultipartSubmission) -> Result<()> {
        let form = multipart_form(submission)?;
        self.send(self.request(Method::POST, endpoints::SPOT).multipart(form)).await
    }

    async fn delete_spot(&self, spot_id: i64) -> Result<()> {
        self.send(self.request(Method::DELETE, &endpoints::spot(spot_id))).await
    }

    async fn list_reports(&self, request: &PageRequest) -> Result<ListPage<Report>> {
        self.get_page::<wire::ReportList, _>(endpoints::REPORT_LIST, request).await
    }

    async fn handle_report(&self, action: &ModerationAction) -> Result<()> {
        self.send(self.request(Method::POST, &endpoints::report(action.target_id)).json(action))
            .await
    }

    async fn list_spot_requests(&self, request: &PageRequest) -> Result<ListPage<SpotRequest>> {
        self.get_page::<wire::SpotRequestList, _>(endpoints::SPOT_REQUEST_LIST, request).await
    }

    async fn judge_spot_request(&self, spot_apply_id: i64, approve: bool) -> Result<()> {
        let builder = self
            .request(Method::POST, &endpoints::spot_request(spot_apply_id))
            .query(&[("approve", approve)]);
        self.send(builder).await
    }

    async fn list_quests(&self, request: &PageRequest) -> Result<ListPage<Quest>> {
        self.get_plain_page::<wire::QuestList, _>(endpoints::QUEST_LIST, request).await
    }

    async fn create_quest(&self, quest: &QuestSaveReq) -> Result<()> {
        self.send(self.request(Method::POST, endpoints::QUEST).json(quest)).await
    }

    async fn delete_quest(&self, quest_id: i64) -> Result<()> {
        self.send(self.request(Method::DELETE, &endpoints::quest(quest_id))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dt_core::models::Attachment;
    use dt_core::session::MemoryTokenStore;

    #[test]
    fn statuses_map_to_error_kinds() {
        assert!(matches!(status_error(401, String::new()), AppError::Unauthorized(m) if m == "API answered 401"));
        assert!(matches!(status_error(403, "banned".into()), AppError::Unauthorized(m) if m == "banned"));
        assert!(matches!(status_error(404, String::new()), AppError::NotFound(..)));
        assert!(matches!(status_error(500, "oops".into()), AppError::Remote { status: 500, .. }));
    }

    #[test]
    fn multipart_form_accepts_submission() {
        let submission = MultipartSubmission::new(&serde_json::json!({ "name": "Namsan" }))
            .unwrap()
            .with_file("image", Attachment::new("tower.jpg", None, "jpeg".into()))
            .with_file("images", Attachment::new("still.png", None, "png".into()));
        let form = multipart_form(&submission).unwrap();
        assert!(!form.boundary().is_empty());
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let auth = Arc::new(AuthContext::new(Arc::new(MemoryTokenStore::default())));
        let api = HttpAdminApi::new("http://127.0.0.1:9/", Duration::from_millis(200), auth).unwrap();
        let err = api.list_members(&PageRequest::new(0, 10)).await.unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
    }
}
