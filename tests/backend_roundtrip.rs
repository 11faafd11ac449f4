//! Drives the real reqwest transport against an in-process axum backend.

use std::path::PathBuf;
use std::sync::Arc;

use academy_admin::{
    ApiClient, ApiError, AuthState, Credentials, ExpiryPolicy, FileTokenStore, SessionManager, TokenStore, fetch_stats,
};
use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Value, json};

const PASSWORD: &str = "secret1";

fn issued_token() -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#);
    let payload = URL_SAFE_NO_PAD.encode(br#"{"exp":4102444800,"role":"admin"}"#);
    format!("{header}.{payload}.sig")
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", issued_token()))
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthorized" })))
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["email"] == "a@b.com" && body["password"] == PASSWORD {
        (StatusCode::OK, Json(json!({ "token": issued_token() })))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid credentials" })))
    }
}

async fn list_courses(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, Json(json!({ "courses": [{ "_id": "c1" }, { "_id": "c2" }] })))
}

async fn list_categories(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, Json(json!([{ "_id": "k1", "name": "Math" }])))
}

async fn delete_course(headers: HeaderMap, Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    if id == "c1" {
        (StatusCode::OK, Json(json!({ "deleted": id })))
    } else {
        (StatusCode::NOT_FOUND, Json(json!({ "msg": "Course not found" })))
    }
}

async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/admin/login", post(login))
        .route("/admin/courses", get(list_courses))
        .route("/admin/courses/{id}", delete(delete_course))
        .route("/admin/categories", get(list_categories));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn scratch_store(name: &str) -> Arc<FileTokenStore> {
    let path: PathBuf = std::env::temp_dir()
        .join(format!("academy-admin-it-{}-{name}", std::process::id()))
        .join("admin_token");
    let store = FileTokenStore::new(path);
    store.clear().unwrap();
    Arc::new(store)
}

fn session_for(base_url: &str, store: &Arc<FileTokenStore>) -> SessionManager {
    let transport = academy_admin::api::ReqwestTransport::new().unwrap();
    let api = ApiClient::new(base_url, Arc::new(transport), store.clone());
    SessionManager::new(api, ExpiryPolicy::AllowMissing)
}

#[tokio::test]
async fn unauthenticated_request_is_rejected_with_backend_message() {
    let base_url = spawn_backend().await;
    let store = scratch_store("anon");
    let session = session_for(&base_url, &store);
    assert_eq!(session.initialize(), AuthState::Unauthenticated);

    let err = session.api().list_courses().await.unwrap_err();
    assert_eq!(err, ApiError::Status { status: 401, message: "Unauthorized".into() });
}

#[tokio::test]
async fn login_then_manage_resources() {
    let base_url = spawn_backend().await;
    let store = scratch_store("full");
    let session = session_for(&base_url, &store);
    session.initialize();

    session.login(&Credentials::new("a@b.com", PASSWORD)).await.unwrap();
    assert_eq!(store.load().unwrap(), Some(issued_token()));
    assert!(session.current_state().is_authenticated());

    let courses = session.api().list_courses().await.unwrap();
    let categories = session.api().list_categories().await.unwrap();
    assert_eq!(courses.len(), 2);
    assert_eq!(categories.len(), 1);

    let stats = fetch_stats(session.api()).await.unwrap();
    assert_eq!((stats.total_courses, stats.total_categories), (2, 1));

    session.api().delete_course("c1").await.unwrap();
    let err = session.api().delete_course("nope").await.unwrap_err();
    assert_eq!(err, ApiError::Status { status: 404, message: "Course not found".into() });

    // A fresh process picks the persisted token back up.
    let restarted = session_for(&base_url, &store);
    assert_eq!(restarted.initialize(), AuthState::Authenticated { token: issued_token() });

    session.logout();
    assert_eq!(store.load().unwrap(), None);
    let err = session.api().list_categories().await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn wrong_password_surfaces_backend_message() {
    let base_url = spawn_backend().await;
    let store = scratch_store("wrong");
    let session = session_for(&base_url, &store);
    session.initialize();

    let err = session.login(&Credentials::new("a@b.com", "not-it")).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid credentials (HTTP 401)");
    assert_eq!(session.current_state(), AuthState::Unauthenticated);
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = scratch_store("down");
    let session = session_for(&format!("http://{addr}"), &store);
    let err = session.api().list_courses().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}
