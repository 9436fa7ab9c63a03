#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use hydrotime::{App, AuthGate, KeyValueStore, LocalStore, Mode, RemoteClient};
use serde_json::{Value, json};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;

pub const TOKEN: &str = "tok-ana";
pub const EMAIL: &str = "ana@example.com";
pub const PASSWORD: &str = "secret";

#[derive(Debug)]
pub struct MockState {
    pub logs: Vec<Value>,
    pub settings: Value,
    pub next_id: u64,
    pub fail_settings: bool,
    pub fail_writes: bool,
    pub intake_posts: usize,
    pub settings_puts: Vec<Value>,
    pub deleted: Vec<String>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            logs: Vec::new(),
            settings: json!({
                "dailyGoalMl": 3000,
                "reminderIntervalMinutes": 30,
                "notificationsEnabled": true,
                "language": "en-US",
                "theme": "dark"
            }),
            next_id: 100,
            fail_settings: false,
            fail_writes: false,
            intake_posts: 0,
            settings_puts: Vec::new(),
            deleted: Vec::new(),
        }
    }
}

#[derive(Clone, Default)]
pub struct MockApi {
    pub state: Arc<Mutex<MockState>>,
}

impl MockApi {
    /// Serves the API on an ephemeral port and returns its base URL.
    pub async fn spawn(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock api");
        let addr = listener.local_addr().unwrap();
        let app = router(self.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}

fn router(api: MockApi) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/intake", get(list_intake).post(add_intake))
        .route("/intake/:id", delete(delete_intake))
        .route("/user/settings", get(get_settings).put(put_settings))
        .route("/stats/overview", get(stats))
        .route("/health", get(health))
        .with_state(api)
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {TOKEN}"))
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["email"] == EMAIL && body["password"] == PASSWORD {
        Json(json!({
            "token": TOKEN,
            "user": { "id": 1, "name": "Ana", "email": EMAIL }
        }))
        .into_response()
    } else {
        error(StatusCode::UNAUTHORIZED, "Invalid credentials")
    }
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["email"] == EMAIL {
        return error(StatusCode::CONFLICT, "Email already registered");
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "token": TOKEN,
            "user": { "id": "u-2", "name": body["name"], "email": body["email"] }
        })),
    )
        .into_response()
}

async fn list_intake(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return error(StatusCode::UNAUTHORIZED, "Missing or invalid token");
    }
    let limit: usize = query.get("limit").and_then(|v| v.parse().ok()).unwrap_or(100);
    let offset: usize = query.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);
    let state = api.state.lock().await;
    let page: Vec<Value> = state.logs.iter().skip(offset).take(limit).cloned().collect();
    Json(json!({
        "intakeLogs": page,
        "total": state.logs.len(),
        "limit": limit,
        "offset": offset
    }))
    .into_response()
}

async fn add_intake(State(api): State<MockApi>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return error(StatusCode::UNAUTHORIZED, "Missing or invalid token");
    }
    let mut state = api.state.lock().await;
    state.intake_posts += 1;
    if state.fail_writes {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    state.next_id += 1;
    let log = json!({
        "id": state.next_id,
        "timestamp": body["timestamp"],
        "amountMl": body["amountMl"]
    });
    state.logs.insert(0, log.clone());
    (StatusCode::CREATED, Json(log)).into_response()
}

async fn delete_intake(State(api): State<MockApi>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !authorized(&headers) {
        return error(StatusCode::UNAUTHORIZED, "Missing or invalid token");
    }
    let mut state = api.state.lock().await;
    if state.fail_writes {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "delete failed");
    }
    state.logs.retain(|log| log["id"].to_string().trim_matches('"') != id);
    state.deleted.push(id);
    StatusCode::NO_CONTENT.into_response()
}

async fn get_settings(State(api): State<MockApi>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return error(StatusCode::UNAUTHORIZED, "Missing or invalid token");
    }
    let state = api.state.lock().await;
    if state.fail_settings {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "settings store unavailable");
    }
    Json(state.settings.clone()).into_response()
}

async fn put_settings(State(api): State<MockApi>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return error(StatusCode::UNAUTHORIZED, "Missing or invalid token");
    }
    let mut state = api.state.lock().await;
    if state.fail_writes {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "settings write failed");
    }
    state.settings_puts.push(body.clone());
    if let (Some(current), Some(patch)) = (state.settings.as_object_mut(), body.as_object()) {
        for (key, value) in patch {
            current.insert(key.clone(), value.clone());
        }
    }
    Json(state.settings.clone()).into_response()
}

async fn stats(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return error(StatusCode::UNAUTHORIZED, "Missing or invalid token");
    }
    Json(json!({
        "todayTotal": 1200,
        "weeklyTotal": 8400,
        "monthlyTotal": 20000,
        "dailyGoal": 3000,
        "dailyGoalMet": false,
        "monthlyStatus": "behind"
    }))
    .into_response()
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub struct Harness {
    pub dir: tempfile::TempDir,
    pub kv: KeyValueStore,
    pub base_url: String,
}

impl Harness {
    pub async fn new(api: &MockApi) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let kv = KeyValueStore::new(dir.path().join("data"));
        let base_url = api.spawn().await;
        Self { dir, kv, base_url }
    }

    pub async fn client(&self) -> Arc<RemoteClient> {
        Arc::new(RemoteClient::restore(&self.base_url, self.kv.clone()).await)
    }

    pub async fn app(&self, mode: Mode) -> App {
        let gate = AuthGate::new(self.kv.clone(), self.client().await);
        App::from_parts(mode, LocalStore::new(self.kv.clone()), gate)
    }

    pub fn local(&self) -> LocalStore {
        LocalStore::new(self.kv.clone())
    }
}
