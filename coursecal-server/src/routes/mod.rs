pub mod calendar;
pub mod courses;
pub mod notifications;
pub mod users;

use axum::{
    Json, Router,
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use coursecal_core::CourseCalError;
use serde::Serialize;
use tracing::error;

use crate::state::AppState;

/// All endpoints, without middleware layers
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(users::router())
        .merge(courses::router())
        .merge(notifications::router())
        .merge(calendar::router())
        .with_state(state)
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

/// GET /health
async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `Json` body extractor whose rejections use the JSON error body
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `Query` extractor whose rejections use the JSON error body
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Convert anyhow errors to HTTP responses
pub struct AppError(anyhow::Error);

impl AppError {
    /// 500 with a fixed message; the cause is logged, not returned
    pub fn internal(message: &str) -> Self {
        Self(anyhow::anyhow!(message.to_string()))
    }

    fn status(&self) -> StatusCode {
        if let Some(rejection) = self.0.downcast_ref::<JsonRejection>() {
            return rejection.status();
        }
        if let Some(rejection) = self.0.downcast_ref::<QueryRejection>() {
            return rejection.status();
        }
        match self.0.downcast_ref::<CourseCalError>() {
            Some(CourseCalError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Some(CourseCalError::Validation(_)) => StatusCode::BAD_REQUEST,
            Some(CourseCalError::Conflict { .. }) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }

        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::{Body, Bytes, to_bytes};
    use axum::http::{HeaderMap, Request, StatusCode};
    use axum::Router;
    use chrono::{DateTime, TimeZone, Utc};
    use coursecal_core::clock::FixedClock;
    use coursecal_core::ics::CalendarSettings;
    use coursecal_core::uid::SequentialUidGenerator;
    use coursecal_core::{ExportConfig, IcsEncoder, Repos, SeedData};
    use tower::ServiceExt;

    use crate::state::AppState;

    pub const SEED: &str = r#"{
        "users": [
            {"id": "u1", "name": "Ada Student", "email": "ada@school.edu", "role": "student"},
            {"id": "u2", "name": "Grace Teacher", "email": "grace@school.edu", "role": "instructor"}
        ],
        "courses": [
            {"id": "c1", "title": "Algebra I", "instructorId": "u2"},
            {"id": "c2", "title": "Writing", "instructorId": "u2"}
        ],
        "sessions": [
            {"id": "s1", "courseId": "c1", "title": "Algebra", "startTime": "2025-01-10T10:00:00Z", "duration": 60},
            {"id": "s2", "courseId": "c2", "title": "Workshop", "startTime": "2025-01-11T09:00:00Z",
             "endTime": "2025-01-11T10:30:00Z", "meetingLink": "https://meet.example.com/w"},
            {"id": "bad", "courseId": "c9", "title": "Broken", "startTime": "someday"}
        ],
        "assignments": [
            {"id": "a1", "courseId": "c2", "title": "Essay", "scheduledDate": "2025-03-01T23:59:00Z"}
        ],
        "enrollments": [
            {"id": "e1", "studentId": "u1", "courseId": "c1"},
            {"id": "e2", "studentId": "u1", "courseId": "c2"}
        ],
        "notifications": [
            {"id": "n1", "userId": "u1", "title": "Welcome", "message": "Hi", "read": true,
             "createdAt": "2024-12-01T08:00:00Z"},
            {"id": "n2", "userId": "u1", "title": "Essay posted", "message": "Due March 1",
             "createdAt": "2024-12-02T08:00:00Z"}
        ]
    }"#;

    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    pub fn test_app() -> Router {
        let clock = Arc::new(FixedClock(now()));
        let encoder = IcsEncoder::new(
            clock.clone(),
            Arc::new(SequentialUidGenerator::new("test")),
            CalendarSettings::default(),
        );
        let repos = Repos::from_seed(SeedData::from_json(SEED).unwrap());
        super::app(AppState::new(repos, encoder, ExportConfig::default(), clock))
    }

    pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body)
    }

    pub async fn get(app: Router, uri: &str) -> (StatusCode, HeaderMap, Bytes) {
        send(app, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, _, body) = get(app, uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    pub async fn post_json(
        app: Router,
        uri: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, _, body) = send(app, request).await;
        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }
}
