//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::domain::UserId;
use crate::message::OutboundMessage;

use super::dto::{ErrorResponse, InboundUpdate, NotificationsResponse};
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/chat/:user_id/events", post(post_event))
        .route("/chat/:user_id/notifications", get(notifications))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Deliver one user event and return the bot's reply.
async fn post_event(
    State(state): State<AppState>,
    user_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<InboundUpdate>, JsonRejection>,
) -> Result<Json<OutboundMessage>, AppError> {
    let Path(user_id) = user_id?;
    let Json(update) = payload?;
    if update.is_blank() {
        return Err(AppError::BadRequest {
            message: "empty update".to_string(),
        });
    }

    let reply = state
        .controller
        .advance(UserId(user_id), update.into_event())
        .await;
    Ok(Json(reply))
}

/// Collect pushed notifications. Each message is returned once.
async fn notifications(
    State(state): State<AppState>,
    user_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<NotificationsResponse>, AppError> {
    let Path(user_id) = user_id?;
    let messages = state.outbox.drain(UserId(user_id)).await;
    Ok(Json(NotificationsResponse { messages }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::BadRequest {
            message: e.body_text(),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(e: PathRejection) -> Self {
        AppError::BadRequest {
            message: e.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use serde_json::{Value, json};

    use super::*;
    use crate::clock::FixedClock;
    use crate::dialog::Controller;
    use crate::monitor::{MonitorRegistry, Notifier};
    use crate::railway::MockRailwayClient;
    use crate::web::Outbox;

    async fn spawn_app() -> (String, Outbox) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("2900800_2900000.json"),
            r#"{"hasError": false, "direction": []}"#,
        )
        .unwrap();
        let source = MockRailwayClient::new(dir.path()).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let controller = Controller::new(
            Arc::new(source),
            MonitorRegistry::new(),
            Arc::new(FixedClock::at_date(today)),
        );
        let outbox = Outbox::new();
        let app = create_router(AppState::new(controller, outbox.clone()));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), outbox)
    }

    async fn send(base: &str, user: i64, body: Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{base}/chat/{user}/events"))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn health_check() {
        let (base, _) = spawn_app().await;
        let body = reqwest::get(format!("{base}/health"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn start_returns_city_keyboard() {
        let (base, _) = spawn_app().await;
        let response = send(&base, 5, json!({"type": "command", "text": "/start"})).await;
        assert_eq!(response.status(), 200);

        let body: Value = response.json().await.unwrap();
        assert!(body["text"].as_str().unwrap().contains("departure city"));
        assert_eq!(body["keyboard"][0][0]["data"], "city_2900000");
        assert_eq!(body["keyboard"].as_array().unwrap().len(), 16);
    }

    #[tokio::test]
    async fn full_search_over_http() {
        let (base, _) = spawn_app().await;
        for update in [
            json!({"type": "command", "text": "/start"}),
            json!({"type": "button", "data": "city_2900000"}),
            json!({"type": "button", "data": "city_2900700"}),
        ] {
            assert_eq!(send(&base, 5, update).await.status(), 200);
        }

        let body: Value = send(&base, 5, json!({"type": "button", "data": "date_20.10.2026"}))
            .await
            .json()
            .await
            .unwrap();
        // No fixture for this route, so it has no trains.
        assert!(body["text"].as_str().unwrap().contains("No trains found."));
        assert!(body.get("keyboard").is_none());
    }

    #[tokio::test]
    async fn malformed_updates_are_bad_requests() {
        let (base, _) = spawn_app().await;

        let response = send(&base, 5, json!({"type": "command", "text": "  "})).await;
        assert_eq!(response.status(), 400);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "empty update");

        let response = send(&base, 5, json!({"kind": "nope"})).await;
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn non_numeric_user_is_bad_request() {
        let (base, _) = spawn_app().await;

        let response = reqwest::Client::new()
            .post(format!("{base}/chat/alice/events"))
            .json(&json!({"type": "command", "text": "/start"}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].is_string());

        let response = reqwest::get(format!("{base}/chat/alice/notifications"))
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn notifications_are_drained_once() {
        let (base, outbox) = spawn_app().await;
        outbox
            .notify(UserId(9), OutboundMessage::text("🔔 New train available!"))
            .await;

        let url = format!("{base}/chat/9/notifications");
        let body: Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
        assert_eq!(body["messages"][0]["text"], "🔔 New train available!");

        let body: Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
        assert_eq!(body["messages"].as_array().unwrap().len(), 0);
    }
}
