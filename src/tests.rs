//! Integration tests for the portfolio backend.

use std::sync::Arc;

use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::auth::{hash_password, issue_token};
use crate::config::Config;
use crate::db::{init_database, Repository};
use crate::images::ImagePipeline;
use crate::models::Role;
use crate::storage::ObjectStore;
use crate::{create_router, AppState};

const TEST_SECRET: &str = "test-signing-secret";
const TEST_PASSWORD: &str = "correct-horse-battery";

// Hashing is deliberately slow; share one hash across all fixtures.
static PASSWORD_HASH: Lazy<String> = Lazy::new(|| hash_password(TEST_PASSWORD).unwrap());

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    repo: Arc<Repository>,
    store: Arc<ObjectStore>,
    admin_token: String,
    super_token: String,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        // Initialize database and in-memory object store
        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let repo = Arc::new(Repository::new(pool));
        let store = Arc::new(ObjectStore::memory());

        // Seed one admin and one super admin
        let admin = repo
            .create_admin_account(
                "admin@example.com",
                &PASSWORD_HASH,
                Some("Admin"),
                Role::Admin,
                None,
            )
            .await
            .unwrap();
        let super_admin = repo
            .create_admin_account("root@example.com", &PASSWORD_HASH, None, Role::SuperAdmin, None)
            .await
            .unwrap();

        let admin_token = issue_token(&admin.uid, TEST_SECRET, 3600).unwrap();
        let super_token = issue_token(&super_admin.uid, TEST_SECRET, 3600).unwrap();

        // Create config
        let config = Config {
            db_path,
            storage_root: None,
            public_url_base: "http://127.0.0.1:8080/storage".to_string(),
            jwt_secret: TEST_SECRET.to_string(),
            token_ttl_secs: 3600,
            cors_origin: "*".to_string(),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            bootstrap_admin_email: None,
            bootstrap_admin_password: None,
        };

        let pipeline = Arc::new(ImagePipeline::new(store.clone(), &config.public_url_base));

        let state = AppState {
            repo: repo.clone(),
            store: store.clone(),
            pipeline,
            config: Arc::new(config),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url,
            repo,
            store,
            admin_token,
            super_token,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn admin_auth(&self) -> String {
        format!("Bearer {}", self.admin_token)
    }

    fn super_auth(&self) -> String {
        format!("Bearer {}", self.super_token)
    }
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([180, 40, 40]));
    let mut buf = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "connected");
}

#[tokio::test]
async fn test_blog_post_slug_lifecycle() {
    let fixture = TestFixture::new().await;

    // Create a post and check the derived slug
    let create_resp = fixture
        .client
        .post(fixture.url("/api/blog-posts"))
        .header("authorization", fixture.admin_auth())
        .json(&json!({
            "title": "Hello World",
            "summary": "s",
            "content": "c"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(create_resp.status(), 200);
    let create_body: Value = create_resp.json().await.unwrap();
    assert_eq!(create_body["success"], true);
    assert_eq!(create_body["data"]["slug"], "hello-world");
    assert_eq!(create_body["data"]["featured"], false);
    assert_eq!(create_body["data"]["published"], false);
    assert_eq!(create_body["data"]["tags"], json!([]));
    let post_id = create_body["data"]["id"].as_str().unwrap().to_string();

    // A second post with the same title conflicts
    let dup_resp = fixture
        .client
        .post(fixture.url("/api/blog-posts"))
        .header("authorization", fixture.admin_auth())
        .json(&json!({
            "title": "Hello World",
            "summary": "other",
            "content": "other"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(dup_resp.status(), 409);
    let dup_body: Value = dup_resp.json().await.unwrap();
    assert_eq!(dup_body["success"], false);
    assert_eq!(dup_body["error"]["code"], "ALREADY_EXISTS");

    // Changing the title recomputes the slug and keeps the id
    let update_resp = fixture
        .client
        .put(fixture.url(&format!("/api/blog-posts/{}", post_id)))
        .header("authorization", fixture.admin_auth())
        .json(&json!({
            "title": "Hello World Again",
            "summary": "s",
            "content": "c"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(update_resp.status(), 200);
    let update_body: Value = update_resp.json().await.unwrap();
    assert_eq!(update_body["data"]["slug"], "hello-world-again");
    assert_eq!(update_body["data"]["id"], post_id.as_str());

    // The old slug is free again
    let reuse_resp = fixture
        .client
        .post(fixture.url("/api/blog-posts"))
        .header("authorization", fixture.admin_auth())
        .json(&json!({
            "title": "Hello World",
            "summary": "s",
            "content": "c"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(reuse_resp.status(), 200);
}

#[tokio::test]
async fn test_blog_post_update_collision_rules() {
    let fixture = TestFixture::new().await;

    for title in ["First Post", "Second Post"] {
        let resp = fixture
            .client
            .post(fixture.url("/api/blog-posts"))
            .header("authorization", fixture.admin_auth())
            .json(&json!({ "title": title, "summary": "s", "content": "c" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }

    let list_resp = fixture
        .client
        .get(fixture.url("/api/blog-posts"))
        .send()
        .await
        .unwrap();
    let list_body: Value = list_resp.json().await.unwrap();
    let posts = list_body["data"].as_array().unwrap();
    assert_eq!(posts.len(), 2);
    let second_id = posts
        .iter()
        .find(|p| p["slug"] == "second-post")
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    // Renaming onto another post's slug conflicts
    let conflict_resp = fixture
        .client
        .put(fixture.url(&format!("/api/blog-posts/{}", second_id)))
        .header("authorization", fixture.admin_auth())
        .json(&json!({ "title": "First Post", "summary": "s", "content": "c" }))
        .send()
        .await
        .unwrap();
    assert_eq!(conflict_resp.status(), 409);

    // An unchanged title collides only with itself and succeeds
    let self_resp = fixture
        .client
        .put(fixture.url(&format!("/api/blog-posts/{}", second_id)))
        .header("authorization", fixture.admin_auth())
        .json(&json!({ "title": "Second Post", "summary": "updated", "content": "c" }))
        .send()
        .await
        .unwrap();
    assert_eq!(self_resp.status(), 200);
    let self_body: Value = self_resp.json().await.unwrap();
    assert_eq!(self_body["data"]["slug"], "second-post");
    assert_eq!(self_body["data"]["summary"], "updated");
}

#[tokio::test]
async fn test_blog_post_validation_aggregates_field_errors() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/blog-posts"))
        .header("authorization", fixture.admin_auth())
        .json(&json!({ "title": "", "summary": "", "content": "c" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "INVALID_ARGUMENT");
    let details = body["error"]["details"].as_array().unwrap();
    assert_eq!(details.len(), 2);
    assert!(details.iter().any(|d| d["field"] == "title"));
    assert!(details.iter().any(|d| d["field"] == "summary"));
}

#[tokio::test]
async fn test_punctuation_only_title_is_rejected() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/blog-posts"))
        .header("authorization", fixture.admin_auth())
        .json(&json!({ "title": "!!! ???", "summary": "s", "content": "c" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_admin_gate_rejects_missing_and_foreign_tokens() {
    let fixture = TestFixture::new().await;

    // No token
    let resp = fixture
        .client
        .post(fixture.url("/api/blog-posts"))
        .json(&json!({ "title": "T", "summary": "s", "content": "c" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "UNAUTHENTICATED");

    // Valid signature, but no matching account record
    let ghost_token = issue_token("ghost-uid", TEST_SECRET, 3600).unwrap();
    let resp = fixture
        .client
        .post(fixture.url("/api/blog-posts"))
        .header("authorization", format!("Bearer {}", ghost_token))
        .json(&json!({ "title": "T", "summary": "s", "content": "c" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "PERMISSION_DENIED");

    // Garbage token
    let resp = fixture
        .client
        .delete(fixture.url("/api/blog-posts/some-id"))
        .header("authorization", "Bearer garbage")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_contact_flow() {
    let fixture = TestFixture::new().await;

    // Submission requires no token
    let submit_resp = fixture
        .client
        .post(fixture.url("/api/contact"))
        .json(&json!({
            "name": "Visitor",
            "email": "visitor@example.com",
            "message": "Nice site!"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(submit_resp.status(), 200);
    let submit_body: Value = submit_resp.json().await.unwrap();
    assert_eq!(submit_body["success"], true);
    let submission_id = submit_body["data"]["id"].as_str().unwrap().to_string();

    // Malformed email is rejected before any write
    let bad_resp = fixture
        .client
        .post(fixture.url("/api/contact"))
        .json(&json!({ "name": "X", "email": "nope", "message": "m" }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_resp.status(), 400);

    // Listing is admin-gated
    let anon_list = fixture
        .client
        .get(fixture.url("/api/contact"))
        .send()
        .await
        .unwrap();
    assert_eq!(anon_list.status(), 401);

    let list_resp = fixture
        .client
        .get(fixture.url("/api/contact"))
        .header("authorization", fixture.admin_auth())
        .send()
        .await
        .unwrap();
    assert_eq!(list_resp.status(), 200);
    let list_body: Value = list_resp.json().await.unwrap();
    let submissions = list_body["data"].as_array().unwrap();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0]["read"], false);

    // Mark as read, then delete
    let read_resp = fixture
        .client
        .post(fixture.url(&format!("/api/contact/{}/read", submission_id)))
        .header("authorization", fixture.admin_auth())
        .send()
        .await
        .unwrap();
    assert_eq!(read_resp.status(), 200);

    let list_body: Value = fixture
        .client
        .get(fixture.url("/api/contact"))
        .header("authorization", fixture.admin_auth())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list_body["data"][0]["read"], true);

    let delete_resp = fixture
        .client
        .delete(fixture.url(&format!("/api/contact/{}", submission_id)))
        .header("authorization", fixture.admin_auth())
        .send()
        .await
        .unwrap();
    assert_eq!(delete_resp.status(), 200);

    let missing_resp = fixture
        .client
        .delete(fixture.url(&format!("/api/contact/{}", submission_id)))
        .header("authorization", fixture.admin_auth())
        .send()
        .await
        .unwrap();
    assert_eq!(missing_resp.status(), 404);
}

#[tokio::test]
async fn test_case_study_cascade_delete() {
    let fixture = TestFixture::new().await;

    let create_body: Value = fixture
        .client
        .post(fixture.url("/api/case-studies"))
        .header("authorization", fixture.admin_auth())
        .json(&json!({
            "title": "Search Rebuild",
            "summary": "s",
            "tags": ["search", "infra"]
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let study_id = create_body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(create_body["data"]["slug"], "search-rebuild");

    // Two sections and one metric; orders are assigned 1, 2 and 1
    for (title, content) in [("Context", "Before"), ("Outcome", "After")] {
        let resp = fixture
            .client
            .post(fixture.url(&format!("/api/case-studies/{}/sections", study_id)))
            .header("authorization", fixture.admin_auth())
            .json(&json!({ "title": title, "content": content }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }
    let metric_resp = fixture
        .client
        .post(fixture.url(&format!("/api/case-studies/{}/metrics", study_id)))
        .header("authorization", fixture.admin_auth())
        .json(&json!({ "label": "p99 latency", "value": "-40%" }))
        .send()
        .await
        .unwrap();
    assert_eq!(metric_resp.status(), 200);

    let sections_body: Value = fixture
        .client
        .get(fixture.url(&format!("/api/case-studies/{}/sections", study_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let sections = sections_body["data"].as_array().unwrap();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0]["order"], 1);
    assert_eq!(sections[1]["order"], 2);

    // Deleting the parent removes every dependent record
    let delete_resp = fixture
        .client
        .delete(fixture.url(&format!("/api/case-studies/{}", study_id)))
        .header("authorization", fixture.admin_auth())
        .send()
        .await
        .unwrap();
    assert_eq!(delete_resp.status(), 200);

    assert!(fixture.repo.get_case_study(&study_id).await.unwrap().is_none());
    assert!(fixture
        .repo
        .list_case_study_sections(&study_id)
        .await
        .unwrap()
        .is_empty());
    assert!(fixture
        .repo
        .list_case_study_metrics(&study_id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_profile_and_ordered_dependents() {
    let fixture = TestFixture::new().await;

    // Dependents require the profile to exist
    let early_resp = fixture
        .client
        .post(fixture.url("/api/profile/skills"))
        .header("authorization", fixture.admin_auth())
        .json(&json!({ "name": "Rust", "category": "Languages" }))
        .send()
        .await
        .unwrap();
    assert_eq!(early_resp.status(), 404);

    // Invalid website URL is rejected
    let bad_profile = fixture
        .client
        .put(fixture.url("/api/profile"))
        .header("authorization", fixture.admin_auth())
        .json(&json!({
            "displayName": "Jane Dev",
            "email": "jane@example.com",
            "website": "not a url"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_profile.status(), 400);

    let profile_resp = fixture
        .client
        .put(fixture.url("/api/profile"))
        .header("authorization", fixture.admin_auth())
        .json(&json!({
            "displayName": "Jane Dev",
            "email": "jane@example.com",
            "headline": "Engineer",
            "socialLinks": { "github": "https://github.com/janedev" }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(profile_resp.status(), 200);

    // Orders default to max + 1; explicit order wins
    for company in ["Acme", "Globex"] {
        let resp = fixture
            .client
            .post(fixture.url("/api/profile/experience"))
            .header("authorization", fixture.admin_auth())
            .json(&json!({
                "company": company,
                "position": "Engineer",
                "startDate": "2020-01-01"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }
    let explicit_resp = fixture
        .client
        .post(fixture.url("/api/profile/experience"))
        .header("authorization", fixture.admin_auth())
        .json(&json!({
            "company": "Initech",
            "position": "Engineer",
            "startDate": "2018-01-01",
            "order": 10
        }))
        .send()
        .await
        .unwrap();
    let explicit_body: Value = explicit_resp.json().await.unwrap();
    assert_eq!(explicit_body["data"]["order"], 10);

    let edu_resp = fixture
        .client
        .post(fixture.url("/api/profile/education"))
        .header("authorization", fixture.admin_auth())
        .json(&json!({
            "institution": "State University",
            "degree": "BSc",
            "field": "Computer Science",
            "startDate": "2012-09-01"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(edu_resp.status(), 200);

    // Proficiency defaults to 3 and is bounded
    let skill_body: Value = fixture
        .client
        .post(fixture.url("/api/profile/skills"))
        .header("authorization", fixture.admin_auth())
        .json(&json!({ "name": "Rust", "category": "Languages" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(skill_body["data"]["proficiency"], 3);

    let out_of_range = fixture
        .client
        .post(fixture.url("/api/profile/skills"))
        .header("authorization", fixture.admin_auth())
        .json(&json!({ "name": "Go", "category": "Languages", "proficiency": 9 }))
        .send()
        .await
        .unwrap();
    assert_eq!(out_of_range.status(), 400);

    // The public view aggregates profile and dependents
    let view_body: Value = fixture
        .client
        .get(fixture.url("/api/profile"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view_body["data"]["displayName"], "Jane Dev");
    assert_eq!(view_body["data"]["socialLinks"]["github"], "https://github.com/janedev");
    assert_eq!(view_body["data"]["workExperiences"].as_array().unwrap().len(), 3);
    assert_eq!(view_body["data"]["education"].as_array().unwrap().len(), 1);
    assert_eq!(view_body["data"]["skills"].as_array().unwrap().len(), 1);

    let orders: Vec<i64> = view_body["data"]["workExperiences"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["order"].as_i64().unwrap())
        .collect();
    assert_eq!(orders, vec![1, 2, 10]);
}

#[tokio::test]
async fn test_admin_account_management_and_login() {
    let fixture = TestFixture::new().await;

    // Plain admins cannot create accounts
    let forbidden_resp = fixture
        .client
        .post(fixture.url("/api/admin/accounts"))
        .header("authorization", fixture.admin_auth())
        .json(&json!({ "email": "new@example.com", "password": "password-123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(forbidden_resp.status(), 403);

    // Super admins can
    let create_body: Value = fixture
        .client
        .post(fixture.url("/api/admin/accounts"))
        .header("authorization", fixture.super_auth())
        .json(&json!({
            "email": "new@example.com",
            "password": "password-123",
            "displayName": "New Admin"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(create_body["success"], true);
    let new_uid = create_body["data"]["uid"].as_str().unwrap().to_string();

    // Duplicate email conflicts
    let dup_resp = fixture
        .client
        .post(fixture.url("/api/admin/accounts"))
        .header("authorization", fixture.super_auth())
        .json(&json!({ "email": "new@example.com", "password": "password-123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(dup_resp.status(), 409);

    // Weak password is rejected
    let weak_resp = fixture
        .client
        .post(fixture.url("/api/admin/accounts"))
        .header("authorization", fixture.super_auth())
        .json(&json!({ "email": "weak@example.com", "password": "short" }))
        .send()
        .await
        .unwrap();
    assert_eq!(weak_resp.status(), 400);

    // The new admin can log in and manage content
    let login_body: Value = fixture
        .client
        .post(fixture.url("/api/admin/login"))
        .json(&json!({ "email": "new@example.com", "password": "password-123" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let token = login_body["data"]["token"].as_str().unwrap().to_string();

    let post_resp = fixture
        .client
        .post(fixture.url("/api/blog-posts"))
        .header("authorization", format!("Bearer {}", token))
        .json(&json!({ "title": "By New Admin", "summary": "s", "content": "c" }))
        .send()
        .await
        .unwrap();
    assert_eq!(post_resp.status(), 200);

    // Wrong password never yields a token
    let bad_login = fixture
        .client
        .post(fixture.url("/api/admin/login"))
        .json(&json!({ "email": "new@example.com", "password": "wrong-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_login.status(), 401);

    // Role changes are super-admin-gated and take effect on the next call
    let promote_forbidden = fixture
        .client
        .put(fixture.url(&format!("/api/admin/accounts/{}/role", new_uid)))
        .header("authorization", format!("Bearer {}", token))
        .json(&json!({ "role": "super_admin" }))
        .send()
        .await
        .unwrap();
    assert_eq!(promote_forbidden.status(), 403);

    let promote_resp = fixture
        .client
        .put(fixture.url(&format!("/api/admin/accounts/{}/role", new_uid)))
        .header("authorization", fixture.super_auth())
        .json(&json!({ "role": "super_admin" }))
        .send()
        .await
        .unwrap();
    assert_eq!(promote_resp.status(), 200);

    let now_allowed = fixture
        .client
        .post(fixture.url("/api/admin/accounts"))
        .header("authorization", format!("Bearer {}", token))
        .json(&json!({ "email": "third@example.com", "password": "password-123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(now_allowed.status(), 200);

    // Unknown uid
    let missing_resp = fixture
        .client
        .put(fixture.url("/api/admin/accounts/no-such-uid/role"))
        .header("authorization", fixture.super_auth())
        .json(&json!({ "role": "admin" }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing_resp.status(), 404);
}

#[tokio::test]
async fn test_image_upload_and_process() {
    let fixture = TestFixture::new().await;

    // Stage an upload
    let upload_body: Value = fixture
        .client
        .post(fixture.url("/api/images/upload?fileName=hero.png"))
        .header("authorization", fixture.admin_auth())
        .header("content-type", "image/png")
        .body(png_bytes(64, 64))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(upload_body["success"], true);
    let temp_path = upload_body["data"]["tempPath"].as_str().unwrap().to_string();
    assert!(fixture.store.exists(&temp_path).await.unwrap());

    // Process with defaults: three distinct variants, temp object consumed
    let process_body: Value = fixture
        .client
        .post(fixture.url("/api/images/process"))
        .header("authorization", fixture.admin_auth())
        .json(&json!({
            "tempPath": temp_path,
            "destinationFolder": "blog-posts",
            "fileName": "hero.png"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(process_body["success"], true);
    let data = &process_body["data"];
    assert_eq!(data["originalPath"], "images/blog-posts/original/hero.png");
    assert_eq!(data["optimizedPath"], "images/blog-posts/optimized/hero.png");
    assert_eq!(data["thumbnailPath"], "images/blog-posts/thumbnails/hero.png");
    assert!(data["originalUrl"].as_str().unwrap().contains("?token="));
    assert_ne!(data["originalUrl"], data["optimizedUrl"]);
    assert!(fixture.store.exists("images/blog-posts/original/hero.png").await.unwrap());
    assert!(fixture.store.exists("images/blog-posts/optimized/hero.png").await.unwrap());
    assert!(fixture.store.exists("images/blog-posts/thumbnails/hero.png").await.unwrap());
    assert!(!fixture.store.exists(&temp_path).await.unwrap());

    // With both variants disabled the result falls back to the original
    let upload_body: Value = fixture
        .client
        .post(fixture.url("/api/images/upload?fileName=plain.png"))
        .header("authorization", fixture.admin_auth())
        .header("content-type", "image/png")
        .body(png_bytes(16, 16))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let temp_path = upload_body["data"]["tempPath"].as_str().unwrap().to_string();

    let process_body: Value = fixture
        .client
        .post(fixture.url("/api/images/process"))
        .header("authorization", fixture.admin_auth())
        .json(&json!({
            "tempPath": temp_path,
            "destinationFolder": "misc",
            "fileName": "plain.png",
            "generateThumbnail": false,
            "optimizeImage": false
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let data = &process_body["data"];
    assert!(!data["originalUrl"].as_str().unwrap().is_empty());
    assert_eq!(data["optimizedUrl"], data["originalUrl"]);
    assert_eq!(data["optimizedPath"], data["originalPath"]);
    assert_eq!(data["thumbnailUrl"], "");
    assert_eq!(data["thumbnailPath"], "");

    // Quality bounds are validated
    let bad_resp = fixture
        .client
        .post(fixture.url("/api/images/process"))
        .header("authorization", fixture.admin_auth())
        .json(&json!({
            "tempPath": "uploads/x/y.png",
            "destinationFolder": "misc",
            "fileName": "y.png",
            "quality": 0
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_resp.status(), 400);
}

#[tokio::test]
async fn test_image_auto_process_classifies_and_records() {
    let fixture = TestFixture::new().await;

    let upload_body: Value = fixture
        .client
        .post(fixture.url("/api/images/upload?fileName=case-study-cover.png"))
        .header("authorization", fixture.admin_auth())
        .header("content-type", "image/png")
        .body(png_bytes(64, 64))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let temp_path = upload_body["data"]["tempPath"].as_str().unwrap().to_string();

    let auto_body: Value = fixture
        .client
        .post(fixture.url("/api/images/auto"))
        .header("authorization", fixture.admin_auth())
        .json(&json!({
            "filePath": temp_path,
            "contentType": "image/png",
            "fileName": "case-study-cover.png"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(auto_body["success"], true);
    assert_eq!(
        auto_body["data"]["originalPath"],
        "images/case-studies/original/case-study-cover.png"
    );

    // Non-image content types are refused
    let refuse_resp = fixture
        .client
        .post(fixture.url("/api/images/auto"))
        .header("authorization", fixture.admin_auth())
        .json(&json!({
            "filePath": "uploads/x/doc.pdf",
            "contentType": "application/pdf",
            "fileName": "doc.pdf"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(refuse_resp.status(), 400);

    // The run left a metadata record behind
    let images_body: Value = fixture
        .client
        .get(fixture.url("/api/images"))
        .header("authorization", fixture.admin_auth())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let images = images_body["data"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0]["folder"], "case-studies");
    assert_eq!(images[0]["contentType"], "image/png");
}
