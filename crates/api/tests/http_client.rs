//! HTTP profile client against a local axum server.
//!
//! Each test starts a throwaway server on an ephemeral port that records what
//! it received, then drives [`HttpProfileApi`] through the real network stack.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use kismet_api::{ApiError, HttpProfileApi, PhotoUpload, ProfileApi};
use kismet_core::draft::Gender;
use kismet_core::payload::{SubmissionPayload, ZeroIdPolicy};
use kismet_core::FormDraft;

const TOKEN: &str = "secret-token";

#[derive(Debug, Clone, PartialEq)]
enum Received {
    Profile(Value),
    MultipartPhoto {
        field: String,
        file_name: Option<String>,
        content_type: Option<String>,
        bytes: Vec<u8>,
    },
    JsonPhoto(Value),
    PhotoRemoved,
}

type Log = Arc<Mutex<Vec<Received>>>;

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(format!("Bearer {TOKEN}").as_str())
}

async fn fetch_profile(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Unauthenticated."})));
    }
    (
        StatusCode::OK,
        Json(json!({"data": {"profile_picture_url": "https://cdn.example/a.jpg", "name": "Sam"}})),
    )
}

async fn update_profile(State(log): State<Log>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    match body["guardian_contact"].as_str() {
        Some("0000000000") => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "message": "The given data was invalid.",
                "errors": {"guardian_contact": ["The guardian contact has already been taken."]}
            })),
        ),
        Some("5555555555") => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"message": "boom"}))),
        _ => {
            log.lock().unwrap().push(Received::Profile(body));
            (StatusCode::OK, Json(json!({"success": true})))
        }
    }
}

async fn upload_photo(State(log): State<Log>, request: Request) -> StatusCode {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    if is_multipart {
        let mut multipart = Multipart::from_request(request, &()).await.unwrap();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await.unwrap().to_vec();
            log.lock().unwrap().push(Received::MultipartPhoto {
                field: name,
                file_name,
                content_type,
                bytes,
            });
        }
    } else {
        let Json(body) = Json::<Value>::from_request(request, &()).await.unwrap();
        log.lock().unwrap().push(Received::JsonPhoto(body));
    }
    StatusCode::OK
}

async fn remove_photo(State(log): State<Log>) -> StatusCode {
    log.lock().unwrap().push(Received::PhotoRemoved);
    StatusCode::NO_CONTENT
}

async fn serve() -> (HttpProfileApi, Log) {
    let log: Log = Arc::default();
    let app = Router::new()
        .route("/api/profile", get(fetch_profile).post(update_profile))
        .route(
            "/api/profile/photo",
            axum::routing::post(upload_photo).delete(remove_photo),
        )
        .with_state(log.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let api = HttpProfileApi::new(format!("http://{addr}/api/"), Duration::from_secs(5))
        .unwrap()
        .with_token(TOKEN);
    (api, log)
}

fn payload(guardian: &str) -> SubmissionPayload {
    let draft = FormDraft {
        bio_en: "Honest and patient".into(),
        gender: Some(Gender::Male),
        guardian_contact: guardian.into(),
        city_id: Some(0),
        ..Default::default()
    };
    SubmissionPayload::from_draft(&draft, ZeroIdPolicy::default())
}

// ---------------------------------------------------------------------------
// Test: fetch_profile
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_profile_sends_bearer_and_unwraps_data() {
    let (api, _) = serve().await;
    assert_eq!(api.api_url().rsplit('/').next(), Some("api"));

    let profile = api.fetch_profile().await.unwrap();
    assert_eq!(profile.avatar_url(), Some("https://cdn.example/a.jpg"));
    assert_eq!(profile.fields["name"], "Sam");
}

#[tokio::test]
async fn missing_token_is_a_status_error() {
    let (mut api, _) = serve().await;
    api.set_token(None);

    let err = api.fetch_profile().await.unwrap_err();
    assert_matches!(err, ApiError::Status { status: 401, .. });
}

// ---------------------------------------------------------------------------
// Test: update_profile
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_profile_posts_normalized_payload() {
    let (api, log) = serve().await;

    api.update_profile(&payload("0501234567")).await.unwrap();

    let received = log.lock().unwrap().clone();
    let [Received::Profile(body)] = received.as_slice() else {
        panic!("unexpected requests: {received:?}");
    };
    assert_eq!(body["gender"], "male");
    assert_eq!(body["city_id"], Value::Null);
    assert_eq!(body["smoking_status"], 1);
}

#[tokio::test]
async fn unprocessable_entity_maps_to_validation_error() {
    let (api, log) = serve().await;

    let err = api.update_profile(&payload("0000000000")).await.unwrap_err();

    assert!(err.is_validation());
    assert_eq!(
        err.field_messages(),
        ["The guardian contact has already been taken."]
    );
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn server_error_maps_to_status_error() {
    let (api, _) = serve().await;
    let err = api.update_profile(&payload("5555555555")).await.unwrap_err();
    assert_matches!(err, ApiError::Status { status: 500, ref body } if body.contains("boom"));
}

#[tokio::test]
async fn unreachable_server_is_a_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpProfileApi::new(format!("http://{addr}/api"), Duration::from_secs(2)).unwrap();
    assert_matches!(api.fetch_profile().await, Err(ApiError::Request(_)));
}

// ---------------------------------------------------------------------------
// Test: photo endpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn multipart_photo_uses_photo_field() {
    let (api, log) = serve().await;

    api.update_profile_photo(PhotoUpload::multipart(vec![1, 2, 3], "me.jpg", "image/jpeg"))
        .await
        .unwrap();

    assert_eq!(
        log.lock().unwrap().as_slice(),
        [Received::MultipartPhoto {
            field: "photo".into(),
            file_name: Some("me.jpg".into()),
            content_type: Some("image/jpeg".into()),
            bytes: vec![1, 2, 3],
        }]
    );
}

#[tokio::test]
async fn base64_photo_is_sent_as_json() {
    let (api, log) = serve().await;

    api.update_profile_photo(PhotoUpload::base64(b"abc", "image/png"))
        .await
        .unwrap();

    assert_eq!(
        log.lock().unwrap().as_slice(),
        [Received::JsonPhoto(json!({"photo": "YWJj", "type": "image/png"}))]
    );
}

#[tokio::test]
async fn remove_photo_sends_delete() {
    let (api, log) = serve().await;
    api.remove_profile_photo().await.unwrap();
    assert_eq!(log.lock().unwrap().as_slice(), [Received::PhotoRemoved]);
}
