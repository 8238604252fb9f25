use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::application::{api_router, AppState};
use crate::db::{MemoryRepository, Repository};
use crate::images::tests::PNG;
use crate::settings::Settings;

const BOUNDARY: &str = "cardforge-test-boundary";

struct TestApp {
    router: Router,
    repo: MemoryRepository,
}

fn test_app() -> TestApp {
    test_app_with(|_| {})
}

fn test_app_with(configure: impl FnOnce(&mut Settings)) -> TestApp {
    let mut settings = Settings::defaults().unwrap();
    settings.auth.jwt_secret = "test-secret".to_string();
    settings.public.base_url = "https://cards.test".to_string();
    configure(&mut settings);

    let repo = MemoryRepository::new();
    let router = api_router(AppState::new(repo.clone(), settings));
    TestApp { router, repo }
}

impl TestApp {
    async fn request(&self, request: Request<Body>) -> (StatusCode, Vec<u8>, Option<String>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec(), content_type)
    }

    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let (status, bytes, _) = self.request(request).await;
        // axum's own rejections (e.g. a bad JSON body) are plain text
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    async fn upload(&self, uri: &str, token: &str, field: &str, bytes: &[u8]) -> (StatusCode, Value) {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"upload.bin\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        let (status, bytes, _) = self.request(request).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    /// Sign up and return `(token, user_id)`.
    async fn signup(&self, name: &str, email: &str) -> (String, i64) {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/signup",
                None,
                Some(json!({ "name": name, "email": email, "password": "password123" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        (
            body["token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_i64().unwrap(),
        )
    }

    async fn create_card(&self, token: &str, name: &str) -> i64 {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/cards",
                Some(token),
                Some(json!({ "full_name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }

    async fn create_team(&self, token: &str, company: &str) -> i64 {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/teams",
                Some(token),
                Some(json!({ "company_name": company })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }
}

#[tokio::test]
async fn test_health() {
    let app = test_app();
    let (status, body) = app.send(Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_signup_login_me() {
    let app = test_app();
    let (token, id) = app.signup("Ada", " Ada@Example.com ").await;

    let (status, me) = app.send(Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], id);
    assert_eq!(me["email"], "ada@example.com");
    assert_eq!(me["email_verified"], false);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ada@example.com", "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], id);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ada@example.com", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_validation_and_duplicates() {
    let app = test_app();
    app.signup("Ada", "ada@example.com").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({ "name": "Other", "email": "ADA@example.com", "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already registered");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({ "name": "Bob", "email": "bob@example.com", "password": "short" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({ "name": "Bob", "email": "bob.example.com", "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_requires_bearer_token() {
    let app = test_app();
    let (status, body) = app.send(Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = app
        .send(Method::GET, "/api/cards", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_email_verification() {
    let app = test_app();
    let (token, _) = app.signup("Ada", "ada@example.com").await;

    let (_, status) = app
        .send(Method::GET, "/api/auth/verification-status", Some(&token), None)
        .await;
    assert_eq!(status["verified"], false);

    let stored = app
        .repo
        .user_by_email("ada@example.com")
        .await
        .unwrap()
        .unwrap();
    let verification = stored.verification_token.unwrap();

    let (code, _) = app
        .send(Method::GET, "/api/auth/verify?token=unknown", None, None)
        .await;
    assert_eq!(code, StatusCode::NOT_FOUND);

    let (code, body) = app
        .send(
            Method::GET,
            &format!("/api/auth/verify?token={verification}"),
            None,
            None,
        )
        .await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(body["verified"], true);

    let (_, status) = app
        .send(Method::GET, "/api/auth/verification-status", Some(&token), None)
        .await;
    assert_eq!(status["verified"], true);
}

#[tokio::test]
async fn test_templates() {
    let app = test_app();
    let (status, body) = app.send(Method::GET, "/api/templates", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);

    let (status, body) = app.send(Method::GET, "/api/templates/2", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["component_key"], "modern");

    let (status, _) = app.send(Method::GET, "/api/templates/99", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_card_round_trip() {
    let app = test_app();
    let (token, user_id) = app.signup("Grace", "grace@example.com").await;

    let fields = json!({
        "full_name": "Grace Hopper",
        "email": "grace@navy.mil",
        "phone": "+1 555 0100",
        "job_title": "Rear Admiral",
        "company_name": "US Navy",
        "company_website": "https://navy.mil",
        "address": "Arlington, VA",
        "bio": "COBOL",
        "template_id": 3,
        "primary_color": "#112233",
        "secondary_color": "#AABBCC"
    });
    let (status, created) = app
        .send(Method::POST, "/api/cards", Some(&token), Some(fields.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["user_id"], user_id);
    assert_eq!(created["qr_url"], format!("https://cards.test/c/{id}"));
    assert!(created["qr_code"]
        .as_str()
        .unwrap()
        .starts_with("data:image/svg+xml;base64,"));

    let mut changed = fields.clone();
    changed["job_title"] = json!("Commodore");
    changed["phone"] = Value::Null;
    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/cards/{id}"),
            Some(&token),
            Some(changed.clone()),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // public read, no token
    let (status, fetched) = app
        .send(Method::GET, &format!("/api/cards/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    for key in [
        "full_name",
        "email",
        "job_title",
        "company_name",
        "company_website",
        "address",
        "bio",
        "template_id",
        "primary_color",
    ] {
        assert_eq!(fetched[key], changed[key], "{key}");
    }
    assert_eq!(fetched["phone"], Value::Null);
    assert_eq!(fetched["secondary_color"], "#aabbcc");
    assert_eq!(fetched["qr_url"], created["qr_url"]);

    let (status, list) = app.send(Method::GET, "/api/cards", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["full_name"], "Grace Hopper");
}

#[tokio::test]
async fn test_card_style_patch() {
    let app = test_app();
    let (token, _) = app.signup("Ada", "ada@example.com").await;
    let id = app.create_card(&token, "Ada").await;

    let uri = format!("/api/cards/{id}/style");
    let (status, card) = app
        .send(Method::PATCH, &uri, Some(&token), Some(json!({ "primary_color": "#ff0000" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(card["primary_color"], "#ff0000");
    assert_eq!(card["secondary_color"], Value::Null);

    let (_, card) = app
        .send(Method::PATCH, &uri, Some(&token), Some(json!({ "template_id": 2 })))
        .await;
    assert_eq!(card["primary_color"], "#ff0000");
    assert_eq!(card["template_id"], 2);

    let (status, _) = app
        .send(Method::PATCH, &uri, Some(&token), Some(json!({ "template_id": 42 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(Method::PATCH, &uri, Some(&token), Some(json!({ "primary_color": "red" })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_ownership_hides_other_cards() {
    let app = test_app();
    let (owner, _) = app.signup("Owner", "owner@example.com").await;
    let (intruder, _) = app.signup("Intruder", "intruder@example.com").await;
    let id = app.create_card(&owner, "Owner").await;
    let uri = format!("/api/cards/{id}");

    let (status, _) = app
        .send(Method::PUT, &uri, Some(&intruder), Some(json!({ "full_name": "Hacked" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.send(Method::DELETE, &uri, Some(&intruder), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app
        .send(Method::POST, &format!("{uri}/qr"), Some(&intruder), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, card) = app.send(Method::GET, &uri, None, None).await;
    assert_eq!(card["full_name"], "Owner");

    let (status, _) = app.send(Method::DELETE, &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.send(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_contact_saved_once() {
    let app = test_app();
    let (owner, _) = app.signup("Owner", "owner@example.com").await;
    let (saver, _) = app.signup("Saver", "saver@example.com").await;
    let card_id = app.create_card(&owner, "Owner").await;
    let body = json!({ "card_id": card_id });

    let (status, contact) = app
        .send(Method::POST, "/api/contacts", Some(&saver), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(contact["card"]["id"], card_id);

    let (status, error) = app
        .send(Method::POST, "/api/contacts", Some(&saver), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["error"], "Contact already saved");
    assert_eq!(app.repo.contact_count(), 1);

    let (status, _) = app
        .send(Method::POST, "/api/contacts", Some(&owner), Some(body))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/contacts",
            Some(&saver),
            Some(json!({ "card_id": 9999 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = app.send(Method::GET, "/api/contacts", Some(&saver), None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let uri = format!("/api/contacts/{card_id}");
    let (status, _) = app.send(Method::DELETE, &uri, Some(&saver), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.send(Method::DELETE, &uri, Some(&saver), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_member_upload_replaces_and_encodes_ids() {
    let app = test_app();
    let (token, _) = app.signup("Boss", "boss@example.com").await;
    let team_id = app.create_team(&token, "Acme").await;
    let uri = format!("/api/teams/{team_id}/members");

    let first = json!({ "members": [
        { "full_name": "A" }, { "full_name": "B" }, { "full_name": "C" }
    ]});
    let (status, members) = app.send(Method::PUT, &uri, Some(&token), Some(first)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(members.as_array().unwrap().len(), 3);

    let second = json!({ "members": [
        { "full_name": "D", "email": "d@acme.test" }, { "full_name": "E" }
    ]});
    let (status, members) = app.send(Method::PUT, &uri, Some(&token), Some(second)).await;
    assert_eq!(status, StatusCode::OK);
    let members = members.as_array().unwrap().clone();
    assert_eq!(members.len(), 2);
    assert_eq!(app.repo.member_count(), 2);

    let mut qr_codes = Vec::new();
    for member in &members {
        let id = member["id"].as_i64().unwrap();
        assert_eq!(
            member["qr_url"],
            format!("https://cards.test/t/{team_id}/m/{id}")
        );
        qr_codes.push(member["qr_code"].as_str().unwrap().to_string());
    }
    qr_codes.dedup();
    assert_eq!(qr_codes.len(), 2);

    let (_, team) = app
        .send(Method::GET, &format!("/api/teams/{team_id}"), None, None)
        .await;
    let names: Vec<&str> = team["members"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["full_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["D", "E"]);

    let member_id = members[0]["id"].as_i64().unwrap();
    let (status, page) = app
        .send(
            Method::GET,
            &format!("/api/teams/{team_id}/members/{member_id}"),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["company_name"], "Acme");
    assert_eq!(page["member"]["full_name"], "D");

    let (status, regenerated) = app
        .send(
            Method::POST,
            &format!("/api/teams/{team_id}/members/qr"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(regenerated.as_array().unwrap().len(), 2);

    let (_, summaries) = app.send(Method::GET, "/api/teams", Some(&token), None).await;
    assert_eq!(summaries[0]["member_count"], 2);
}

#[tokio::test]
async fn test_invalid_member_upload_keeps_old_members() {
    let app = test_app();
    let (token, _) = app.signup("Boss", "boss@example.com").await;
    let team_id = app.create_team(&token, "Acme").await;
    let uri = format!("/api/teams/{team_id}/members");

    app.send(
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "members": [{ "full_name": "A" }] })),
    )
    .await;
    let (status, body) = app
        .send(
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({ "members": [{ "full_name": "B" }, { "full_name": "" }] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "row 2: full_name is required");
    assert_eq!(app.repo.member_count(), 1);
}

#[tokio::test]
async fn test_delete_team_removes_members() {
    let app = test_app();
    let (token, _) = app.signup("Boss", "boss@example.com").await;
    let (other, _) = app.signup("Other", "other@example.com").await;
    let team_id = app.create_team(&token, "Acme").await;
    app.send(
        Method::PUT,
        &format!("/api/teams/{team_id}/members"),
        Some(&token),
        Some(json!({ "members": [{ "full_name": "A" }, { "full_name": "B" }] })),
    )
    .await;

    let uri = format!("/api/teams/{team_id}");
    let (status, _) = app.send(Method::DELETE, &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.repo.member_count(), 2);

    let (status, _) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.repo.member_count(), 0);
    let (status, _) = app.send(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_logo_upload() {
    let app = test_app_with(|s| s.uploads.max_image_bytes = 64);
    let (token, _) = app.signup("Ada", "ada@example.com").await;
    let id = app.create_card(&token, "Ada").await;
    let uri = format!("/api/cards/{id}/logo");

    let (status, card) = app.upload(&uri, &token, "logo", PNG).await;
    assert_eq!(status, StatusCode::OK, "{card}");
    assert!(card["logo"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));

    let (status, body) = app.upload(&uri, &token, "logo", b"plain text, not an image").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "unsupported image format");

    let (status, _) = app.upload(&uri, &token, "logo", &[0u8; 100]).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

    let (status, _) = app.upload(&uri, &token, "photo", PNG).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, card) = app
        .upload(&format!("/api/cards/{id}/photo"), &token, "photo", PNG)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(card["profile_photo"].is_string());
}

#[tokio::test]
async fn test_vcard_and_image_exports() {
    let app = test_app();
    let (token, _) = app.signup("Ada", "ada@example.com").await;
    let id = app.create_card(&token, "Ada Lovelace").await;

    let request = Request::builder()
        .uri(format!("/api/cards/{id}/vcard"))
        .body(Body::empty())
        .unwrap();
    let (status, bytes, content_type) = app.request(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/vcard; charset=utf-8"));
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("FN:Ada Lovelace\r\n"));

    let request = Request::builder()
        .uri(format!("/api/cards/{id}/image.svg"))
        .body(Body::empty())
        .unwrap();
    let (status, bytes, content_type) = app.request(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/svg+xml"));
    let svg = String::from_utf8(bytes).unwrap();
    assert!(svg.contains("Ada Lovelace"));
}
