//! Call flow webhook integration tests

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;

use hotline::api;
use hotline::auth::AdminAllowList;
use hotline::clock::Clock;
use hotline::forward_store::{ForwardSource, ForwardStore, SqliteForwardStore, StoreError};
use hotline::schedule::{ScheduleConfig, ShiftResolver};
use hotline::state::CallSettings;
use hotline::AppState;

const ADMIN: &str = "+12065550100";
const PUBLIC_CALLER: &str = "+14145550123";
const DEFAULT_NUMBER: &str = "+19205559999";

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

struct BrokenStore;

#[async_trait]
impl ForwardStore for BrokenStore {
    async fn get(&self) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    async fn put(&self, _number: &str, _source: ForwardSource) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    async fn init_if_absent(&self, _default: &str) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }
}

fn resolver() -> Arc<ShiftResolver> {
    let config = ScheduleConfig::from_json(
        r#"{
            "timezone": "America/Chicago",
            "days": [
                { "key": "friday", "callers": [
                    { "name": "VolA", "phone": "+12025550001" },
                    { "name": "VolB", "phone": "+12025550002" },
                    { "name": "VolC", "phone": "+12025550003" }
                ] }
            ]
        }"#,
    )
    .expect("valid schedule");
    Arc::new(ShiftResolver::new(config, 17))
}

fn call_settings() -> CallSettings {
    CallSettings {
        default_forward_number: DEFAULT_NUMBER.to_string(),
        caller_id: Some("+19205550000".to_string()),
        greeting_audio_url: Some("https://example.com/greeting.wav".to_string()),
        voice: "Polly.Joanna".to_string(),
        hotline_name: "Example area hotline".to_string(),
    }
}

fn build_app(store: Arc<dyn ForwardStore>) -> axum::Router {
    // Friday 2026-05-15 18:00 in Chicago: third Friday, after the shift change
    let now = chrono_tz::America::Chicago
        .with_ymd_and_hms(2026, 5, 15, 18, 0, 0)
        .unwrap()
        .with_timezone(&Utc);

    let state = Arc::new(AppState {
        store,
        resolver: resolver(),
        authorizer: Arc::new(AdminAllowList::new(vec![ADMIN.to_string()])),
        clock: Arc::new(FixedClock(now)),
        call: call_settings(),
    });
    api::router().with_state(state)
}

async fn setup_test_app() -> (axum::Router, Arc<SqliteForwardStore>, tempfile::TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_url = format!("sqlite:{}", temp_dir.path().join("hotline.db").display());
    let pool = hotline::db::connect(&db_url)
        .await
        .expect("Failed to open database");

    let store = Arc::new(SqliteForwardStore::new(pool));
    store
        .put("+12025550003", ForwardSource::Schedule)
        .await
        .expect("seed forward number");

    (build_app(store.clone()), store, temp_dir)
}

fn form_body(from: &str, digits: &str) -> String {
    format!(
        "From={}&Digits={}",
        from.replace('+', "%2B"),
        digits.replace('#', "%23")
    )
}

async fn post_form(app: &axum::Router, path: &str, from: &str, digits: &str) -> (StatusCode, String) {
    let req = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form_body(from, digits)))
        .unwrap();

    let response = app.clone().oneshot(req).await.expect("Request failed");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    (status, String::from_utf8(body.to_vec()).expect("utf-8 body"))
}

#[tokio::test]
async fn test_public_caller_is_forwarded_immediately() {
    let (app, _store, _temp_dir) = setup_test_app().await;

    let (status, xml) = post_form(&app, "/", PUBLIC_CALLER, "").await;
    assert_eq!(status, StatusCode::OK);
    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?><Response>"#));
    assert!(xml.contains("<Play>https://example.com/greeting.wav</Play>"));
    assert!(xml.contains(
        r#"<Dial callerId="+19205550000" answerOnBridge="true" timeout="25">+12025550003</Dial>"#
    ));
    assert!(!xml.contains("<Gather"));
}

#[tokio::test]
async fn test_response_is_served_as_xml() {
    let (app, _store, _temp_dir) = setup_test_app().await;

    let req = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form_body(PUBLIC_CALLER, "")))
        .unwrap();
    let response = app.oneshot(req).await.expect("Request failed");

    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/xml"
    );
}

#[tokio::test]
async fn test_public_caller_never_reaches_admin_actions() {
    let (app, store, _temp_dir) = setup_test_app().await;

    for (path, digits) in [
        ("/menu", "9"),
        ("/menu", "2"),
        ("/admin-set-number", "3125550100"),
    ] {
        let (status, xml) = post_form(&app, path, PUBLIC_CALLER, digits).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!xml.contains("<Gather"), "{path} offered a menu");
        assert!(!xml.contains("<Redirect"), "{path} redirected");
        assert!(xml.contains(">+12025550003</Dial>"), "{path} did not forward");
    }

    assert_eq!(store.get().await.unwrap().as_deref(), Some("+12025550003"));
}

#[tokio::test]
async fn test_admin_gets_menu() {
    let (app, _store, _temp_dir) = setup_test_app().await;

    let (status, xml) = post_form(&app, "/", ADMIN, "").await;
    assert_eq!(status, StatusCode::OK);
    assert!(xml.contains(r#"<Gather numDigits="1" action="/menu" method="POST" timeout="15">"#));
    assert!(xml.contains("Example area hotline administrator options"));
    // Timeout fall-through still forwards the call
    assert!(xml.contains("We did not receive any input."));
    assert!(xml.contains(">+12025550003</Dial>"));
}

#[tokio::test]
async fn test_admin_menu_one_forwards() {
    let (app, _store, _temp_dir) = setup_test_app().await;

    let (_, xml) = post_form(&app, "/menu", ADMIN, "1").await;
    assert!(!xml.contains("<Gather"));
    assert!(xml.contains(">+12025550003</Dial>"));
}

#[tokio::test]
async fn test_admin_menu_two_announces_current_and_next() {
    let (app, _store, _temp_dir) = setup_test_app().await;

    let (status, xml) = post_form(&app, "/menu", ADMIN, "2").await;
    assert_eq!(status, StatusCode::OK);
    assert!(xml.contains("The volunteer currently on call is VolC."));
    assert!(xml.contains("The next volunteer on call is VolA."));
    assert!(xml.contains(r#"<Redirect method="POST">/</Redirect>"#));
    assert!(!xml.contains("<Dial"));
}

#[tokio::test]
async fn test_admin_menu_nine_prompts_for_number() {
    let (app, _store, _temp_dir) = setup_test_app().await;

    let (_, xml) = post_form(&app, "/menu", ADMIN, "9").await;
    assert!(xml.contains(
        r##"<Gather input="dtmf" finishOnKey="#" action="/admin-set-number" method="POST" timeout="15">"##
    ));
    assert!(xml.contains("press the pound key"));
    assert!(xml.contains(">+12025550003</Dial>"));
}

#[tokio::test]
async fn test_admin_override_with_ten_digits() {
    let (app, store, _temp_dir) = setup_test_app().await;

    let (status, xml) = post_form(&app, "/admin-set-number", ADMIN, "3125550100").await;
    assert_eq!(status, StatusCode::OK);
    assert!(xml.contains("forwarded to 3 1 2 5 5 5 0 1 0 0."));
    assert!(xml.contains(">+13125550100</Dial>"));
    assert_eq!(store.get().await.unwrap().as_deref(), Some("+13125550100"));
}

#[tokio::test]
async fn test_admin_override_with_country_code_names_volunteer() {
    let (app, store, _temp_dir) = setup_test_app().await;

    let (_, xml) = post_form(&app, "/admin-set-number", ADMIN, "12025550002").await;
    assert!(xml.contains("forwarded to VolB."));
    assert!(xml.contains(">+12025550002</Dial>"));
    assert_eq!(store.get().await.unwrap().as_deref(), Some("+12025550002"));
}

#[tokio::test]
async fn test_admin_override_rejects_invalid_number() {
    let (app, store, _temp_dir) = setup_test_app().await;

    for digits in ["5551234", "202555123"] {
        let (status, xml) = post_form(&app, "/admin-set-number", ADMIN, digits).await;
        assert_eq!(status, StatusCode::OK);
        assert!(xml.contains("was not recognized as a valid ten digit North American phone number"));
        assert!(xml.contains(">+12025550003</Dial>"));
    }

    assert_eq!(store.get().await.unwrap().as_deref(), Some("+12025550003"));
}

#[tokio::test]
async fn test_empty_store_forwards_to_default() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_url = format!("sqlite:{}", temp_dir.path().join("hotline.db").display());
    let pool = hotline::db::connect(&db_url).await.unwrap();
    let app = build_app(Arc::new(SqliteForwardStore::new(pool)));

    let (_, xml) = post_form(&app, "/", PUBLIC_CALLER, "").await;
    assert!(xml.contains(">+19205559999</Dial>"));
}

#[tokio::test]
async fn test_unreadable_store_forwards_to_default() {
    let app = build_app(Arc::new(BrokenStore));

    let (status, xml) = post_form(&app, "/", PUBLIC_CALLER, "").await;
    assert_eq!(status, StatusCode::OK);
    assert!(xml.contains(">+19205559999</Dial>"));
}

#[tokio::test]
async fn test_failed_override_write_fails_request() {
    let app = build_app(Arc::new(BrokenStore));

    let (status, _) = post_form(&app, "/admin-set-number", ADMIN, "3125550100").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_unknown_path_uses_entry_step() {
    let (app, _store, _temp_dir) = setup_test_app().await;

    let (status, xml) = post_form(&app, "/voice/incoming", PUBLIC_CALLER, "").await;
    assert_eq!(status, StatusCode::OK);
    assert!(xml.contains(">+12025550003</Dial>"));
}

#[tokio::test]
async fn test_request_without_form_content_type_gets_public_flow() {
    let (app, store, _temp_dir) = setup_test_app().await;

    for path in ["/", "/menu", "/admin-set-number"] {
        let req = Request::builder()
            .method("POST")
            .uri(path)
            .body(Body::from(form_body(ADMIN, "3125550100")))
            .unwrap();
        let response = app.clone().oneshot(req).await.expect("Request failed");
        assert_eq!(response.status(), StatusCode::OK, "{path} rejected the request");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let xml = String::from_utf8(body.to_vec()).unwrap();
        assert!(!xml.contains("<Gather"), "{path} offered a menu");
        assert!(xml.contains(">+12025550003</Dial>"), "{path} did not forward");
    }

    assert_eq!(store.get().await.unwrap().as_deref(), Some("+12025550003"));
}

#[tokio::test]
async fn test_health_check() {
    let (app, _store, _temp_dir) = setup_test_app().await;

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let value: serde_json::Value = serde_json::from_slice(&body).expect("Invalid JSON response");
    assert_eq!(value["status"], "healthy");
}
