//! In-process stand-in for the homework-status API and the Telegram bot API.
//!
//! Tests seed homework records and inspect delivered messages through the
//! `/_mock/*` routes.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const HOMEWORK_PATH: &str = "/api/user_api/homework_statuses/";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Homework {
    pub homework_name: String,
    pub status: String,
    #[serde(default)]
    pub reviewer_comment: String,
    pub date_updated: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SentMessage {
    pub message_id: i64,
    pub chat_id: String,
    pub text: String,
}

#[derive(Deserialize)]
pub struct SendMessage {
    pub chat_id: Value,
    #[serde(default)]
    pub text: String,
}

#[derive(Deserialize)]
pub struct Outage {
    pub status: u16,
}

#[derive(Clone, Debug)]
pub struct MockConfig {
    pub practicum_token: String,
    pub telegram_token: String,
    /// Served as `current_date`; the system clock when `None`.
    pub fixed_date: Option<i64>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            practicum_token: "practicum-token".to_string(),
            telegram_token: "telegram-token".to_string(),
            fixed_date: None,
        }
    }
}

#[derive(Default)]
struct Inner {
    homeworks: Vec<Homework>,
    outage: Option<StatusCode>,
    sent: Vec<SentMessage>,
}

#[derive(Clone)]
pub struct MockState {
    config: Arc<MockConfig>,
    inner: Arc<RwLock<Inner>>,
}

pub fn app() -> Router {
    app_with(MockConfig::default())
}

pub fn app_with(config: MockConfig) -> Router {
    let state = MockState {
        config: Arc::new(config),
        inner: Arc::new(RwLock::new(Inner::default())),
    };
    Router::new()
        .route(HOMEWORK_PATH, get(homework_statuses))
        .route("/{bot}/sendMessage", post(send_message))
        .route("/_mock/homeworks", post(add_homework))
        .route("/_mock/outage", post(set_outage))
        .route("/_mock/messages", get(list_messages))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, MockConfig::default()).await
}

pub async fn run_with(listener: TcpListener, config: MockConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(config)).await
}

fn now(config: &MockConfig) -> i64 {
    config.fixed_date.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    })
}

async fn homework_statuses(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if let Some(status) = state.inner.write().await.outage.take() {
        return (status, Json(json!({ "message": "service unavailable" })));
    }

    let expected = format!("OAuth {}", state.config.practicum_token);
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == expected);
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "code": "not_authenticated",
                "message": "Authentication credentials were not provided.",
                "source": "__response__"
            })),
        );
    }

    let Some(from_date) = params.get("from_date").and_then(|v| v.parse::<i64>().ok()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "code": "UnknownError", "error": "Wrong from_date format" })),
        );
    };

    let inner = state.inner.read().await;
    let mut homeworks: Vec<&Homework> = inner
        .homeworks
        .iter()
        .filter(|hw| hw.date_updated >= from_date)
        .collect();
    homeworks.sort_by(|a, b| b.date_updated.cmp(&a.date_updated));

    (
        StatusCode::OK,
        Json(json!({ "homeworks": homeworks, "current_date": now(&state.config) })),
    )
}

async fn send_message(
    State(state): State<MockState>,
    Path(bot): Path<String>,
    Json(input): Json<SendMessage>,
) -> (StatusCode, Json<Value>) {
    if bot.strip_prefix("bot") != Some(state.config.telegram_token.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "ok": false, "error_code": 401, "description": "Unauthorized" })),
        );
    }
    if input.text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: message text is empty"
            })),
        );
    }

    let chat_id = match input.chat_id {
        Value::String(s) => s,
        other => other.to_string(),
    };
    let mut inner = state.inner.write().await;
    let message = SentMessage {
        message_id: inner.sent.len() as i64 + 1,
        chat_id,
        text: input.text,
    };
    inner.sent.push(message.clone());

    (
        StatusCode::OK,
        Json(json!({
            "ok": true,
            "result": {
                "message_id": message.message_id,
                "chat": { "id": message.chat_id },
                "text": message.text
            }
        })),
    )
}

async fn add_homework(State(state): State<MockState>, Json(homework): Json<Homework>) -> StatusCode {
    state.inner.write().await.homeworks.push(homework);
    StatusCode::CREATED
}

async fn set_outage(State(state): State<MockState>, Json(outage): Json<Outage>) -> StatusCode {
    match StatusCode::from_u16(outage.status) {
        Ok(status) => {
            state.inner.write().await.outage = Some(status);
            StatusCode::NO_CONTENT
        }
        Err(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

async fn list_messages(State(state): State<MockState>) -> Json<Vec<SentMessage>> {
    Json(state.inner.read().await.sent.clone())
}
