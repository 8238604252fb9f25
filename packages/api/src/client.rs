//! Typed HTTP client for the card backend.
//!
//! Every method maps to one endpoint. Non-2xx responses are decoded from the
//! `{ "error": ... }` body into [`ClientError::Api`] so pages can show the
//! server's message inline.

use reqwest::{multipart, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

use crate::models::{
    AuthResponse, CardInput, CardSummary, CardView, ContactView, ErrorBody, LoginRequest,
    MemberCardView, MemberView, MembersUpload, SaveContactRequest, SignupRequest, StyleInput,
    TeamInput, TeamSummary, TeamView, TemplateInfo, UserInfo, VerificationStatus,
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED.as_u16())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// An image picked by the user, sent as one multipart part.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Address of the server-rendered card image, for `<img>` and downloads.
    pub fn card_image_url(&self, card_id: i64) -> String {
        self.url(&format!("/api/cards/{card_id}/image.svg"))
    }

    pub fn card_vcard_url(&self, card_id: i64) -> String {
        self.url(&format!("/api/cards/{card_id}/vcard"))
    }

    // auth

    pub async fn signup(&self, req: &SignupRequest) -> Result<AuthResponse> {
        self.send_json(Method::POST, "/api/auth/signup", req).await
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse> {
        self.send_json(Method::POST, "/api/auth/login", req).await
    }

    pub async fn me(&self) -> Result<UserInfo> {
        self.get("/api/auth/me").await
    }

    pub async fn verify_email(&self, token: &str) -> Result<VerificationStatus> {
        let req = self
            .request(Method::GET, "/api/auth/verify")
            .query(&[("token", token)]);
        decode(req.send().await?).await
    }

    pub async fn verification_status(&self) -> Result<VerificationStatus> {
        self.get("/api/auth/verification-status").await
    }

    // templates

    pub async fn templates(&self) -> Result<Vec<TemplateInfo>> {
        self.get("/api/templates").await
    }

    pub async fn template(&self, id: i32) -> Result<TemplateInfo> {
        self.get(&format!("/api/templates/{id}")).await
    }

    // cards

    pub async fn cards(&self) -> Result<Vec<CardSummary>> {
        self.get("/api/cards").await
    }

    pub async fn card(&self, id: i64) -> Result<CardView> {
        self.get(&format!("/api/cards/{id}")).await
    }

    pub async fn create_card(&self, input: &CardInput) -> Result<CardView> {
        self.send_json(Method::POST, "/api/cards", input).await
    }

    pub async fn update_card(&self, id: i64, input: &CardInput) -> Result<CardView> {
        self.send_json(Method::PUT, &format!("/api/cards/{id}"), input)
            .await
    }

    pub async fn update_card_style(&self, id: i64, style: &StyleInput) -> Result<CardView> {
        self.send_json(Method::PATCH, &format!("/api/cards/{id}/style"), style)
            .await
    }

    pub async fn delete_card(&self, id: i64) -> Result<()> {
        self.send_empty(Method::DELETE, &format!("/api/cards/{id}"))
            .await
    }

    pub async fn upload_card_logo(&self, id: i64, upload: Upload) -> Result<CardView> {
        self.upload(&format!("/api/cards/{id}/logo"), "logo", upload)
            .await
    }

    pub async fn upload_card_photo(&self, id: i64, upload: Upload) -> Result<CardView> {
        self.upload(&format!("/api/cards/{id}/photo"), "photo", upload)
            .await
    }

    pub async fn regenerate_card_qr(&self, id: i64) -> Result<CardView> {
        let req = self.request(Method::POST, &format!("/api/cards/{id}/qr"));
        decode(req.send().await?).await
    }

    pub async fn card_vcard(&self, id: i64) -> Result<String> {
        let resp = self
            .request(Method::GET, &format!("/api/cards/{id}/vcard"))
            .send()
            .await?;
        Ok(check(resp).await?.text().await?)
    }

    // teams

    pub async fn teams(&self) -> Result<Vec<TeamSummary>> {
        self.get("/api/teams").await
    }

    pub async fn team(&self, id: i64) -> Result<TeamView> {
        self.get(&format!("/api/teams/{id}")).await
    }

    pub async fn create_team(&self, input: &TeamInput) -> Result<TeamView> {
        self.send_json(Method::POST, "/api/teams", input).await
    }

    pub async fn update_team(&self, id: i64, input: &TeamInput) -> Result<TeamView> {
        self.send_json(Method::PUT, &format!("/api/teams/{id}"), input)
            .await
    }

    pub async fn update_team_style(&self, id: i64, style: &StyleInput) -> Result<TeamView> {
        self.send_json(Method::PATCH, &format!("/api/teams/{id}/style"), style)
            .await
    }

    pub async fn delete_team(&self, id: i64) -> Result<()> {
        self.send_empty(Method::DELETE, &format!("/api/teams/{id}"))
            .await
    }

    pub async fn upload_team_logo(&self, id: i64, upload: Upload) -> Result<TeamView> {
        self.upload(&format!("/api/teams/{id}/logo"), "logo", upload)
            .await
    }

    pub async fn replace_members(&self, id: i64, upload: &MembersUpload) -> Result<Vec<MemberView>> {
        self.send_json(Method::PUT, &format!("/api/teams/{id}/members"), upload)
            .await
    }

    pub async fn regenerate_member_qr(&self, id: i64) -> Result<Vec<MemberView>> {
        let req = self.request(Method::POST, &format!("/api/teams/{id}/members/qr"));
        decode(req.send().await?).await
    }

    pub async fn member(&self, team_id: i64, member_id: i64) -> Result<MemberCardView> {
        self.get(&format!("/api/teams/{team_id}/members/{member_id}"))
            .await
    }

    // contacts

    pub async fn contacts(&self) -> Result<Vec<ContactView>> {
        self.get("/api/contacts").await
    }

    pub async fn save_contact(&self, card_id: i64) -> Result<ContactView> {
        self.send_json(Method::POST, "/api/contacts", &SaveContactRequest { card_id })
            .await
    }

    pub async fn delete_contact(&self, card_id: i64) -> Result<()> {
        self.send_empty(Method::DELETE, &format!("/api/contacts/{card_id}"))
            .await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.http.request(method, self.url(path));
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        decode(self.request(Method::GET, path).send().await?).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        decode(self.request(method, path).json(body).send().await?).await
    }

    async fn send_empty(&self, method: Method, path: &str) -> Result<()> {
        check(self.request(method, path).send().await?).await?;
        Ok(())
    }

    async fn upload<T: DeserializeOwned>(&self, path: &str, field: &str, upload: Upload) -> Result<T> {
        let part = multipart::Part::bytes(upload.bytes).file_name(upload.file_name);
        let form = multipart::Form::new().part(field.to_string(), part);
        decode(self.request(Method::POST, path).multipart(form).send().await?).await
    }
}

async fn check(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.error)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
    tracing::debug!(status = status.as_u16(), %message, "api error");
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    Ok(check(resp).await?.json::<T>().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let client = ApiClient::new("http://localhost:8080/");
        assert_eq!(client.url("/api/cards"), "http://localhost:8080/api/cards");
        assert_eq!(
            client.card_image_url(3),
            "http://localhost:8080/api/cards/3/image.svg"
        );
    }

    #[test]
    fn test_empty_token_is_dropped() {
        let client = ApiClient::new("").with_token(Some(String::new()));
        assert_eq!(client.token(), None);
        let client = client.with_token(Some("abc".to_string()));
        assert_eq!(client.token(), Some("abc"));
    }

    #[test]
    fn test_api_error_status() {
        let err = ClientError::Api {
            status: 401,
            message: "Unauthorized".to_string(),
        };
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "Unauthorized");
    }
}
