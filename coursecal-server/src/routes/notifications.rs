//! Notification endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use coursecal_core::CourseCalError;
use coursecal_core::domain::{ForeignKey, Notification};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::routes::{ApiJson, ApiQuery, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/{id}/notifications", get(list_notifications))
        .route("/notifications", post(create_notification))
        .route("/notifications/{id}/read", post(mark_read))
}

#[derive(Deserialize)]
pub struct NotificationFilter {
    #[serde(default)]
    pub unread: bool,
}

/// GET /users/:id/notifications - Newest first
async fn list_notifications(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ApiQuery(filter): ApiQuery<NotificationFilter>,
) -> Result<Json<Vec<Notification>>, AppError> {
    state
        .repos
        .users
        .find(&user_id)
        .ok_or_else(|| CourseCalError::not_found("User", &user_id))?;

    let mut notifications: Vec<Notification> = state
        .repos
        .notifications
        .find_by_foreign_key(ForeignKey::User, &user_id)
        .into_iter()
        .filter(|n| !filter.unread || !n.read)
        .collect();
    notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(Json(notifications))
}

/// Request body for creating a notification
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    pub user_id: String,
    pub title: String,
    pub message: String,
}

/// POST /notifications
async fn create_notification(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<Notification>), AppError> {
    if state.repos.users.find(&req.user_id).is_none() {
        return Err(CourseCalError::not_found("User", &req.user_id).into());
    }
    if req.title.trim().is_empty() {
        return Err(CourseCalError::Validation("title must not be empty".into()).into());
    }

    let notification = Notification {
        id: Uuid::new_v4().to_string(),
        user_id: req.user_id,
        title: req.title,
        message: req.message,
        read: false,
        created_at: state.clock.now(),
    };
    state.repos.notifications.insert(&notification)?;
    info!(notification = %notification.id, user = %notification.user_id, "created notification");

    Ok((StatusCode::CREATED, Json(notification)))
}

/// POST /notifications/:id/read
async fn mark_read(
    State(state): State<AppState>,
    Path(notification_id): Path<String>,
) -> Result<Json<Notification>, AppError> {
    let mut notification = state
        .repos
        .notifications
        .find(&notification_id)
        .ok_or_else(|| CourseCalError::not_found("Notification", &notification_id))?;

    if !notification.read {
        notification.read = true;
        state.repos.notifications.save(&notification)?;
    }

    Ok(Json(notification))
}
