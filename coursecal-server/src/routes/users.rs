//! User endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use coursecal_core::CourseCalError;
use coursecal_core::domain::{Role, User};
use serde::Deserialize;
use tracing::info;

use crate::routes::{ApiJson, ApiQuery, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).delete(delete_user))
}

#[derive(Deserialize)]
pub struct UserFilter {
    pub role: Option<Role>,
}

/// GET /users - List users, optionally by role
async fn list_users(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<UserFilter>,
) -> Json<Vec<User>> {
    let users = state
        .repos
        .users
        .all()
        .into_iter()
        .filter(|u| filter.role.is_none_or(|role| u.role == role))
        .collect();

    Json(users)
}

/// GET /users/:id
async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<User>, AppError> {
    let user = state
        .repos
        .users
        .find(&user_id)
        .ok_or_else(|| CourseCalError::not_found("User", &user_id))?;

    Ok(Json(user))
}

/// POST /users - Create a user
async fn create_user(
    State(state): State<AppState>,
    ApiJson(user): ApiJson<User>,
) -> Result<(StatusCode, Json<User>), AppError> {
    user.validate()?;
    state.repos.users.insert(&user)?;
    info!(user = %user.id, role = ?user.role, "created user");

    Ok((StatusCode::CREATED, Json(user)))
}

/// DELETE /users/:id
async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .repos
        .users
        .delete(&user_id)
        .ok_or_else(|| CourseCalError::not_found("User", &user_id))?;
    info!(user = %user_id, "deleted user");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn lists_and_filters_users() {
        let (status, all) = get_json(test_app(), "/users").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all.as_array().unwrap().len(), 2);

        let (_, students) = get_json(test_app(), "/users?role=student").await;
        let students = students.as_array().unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0]["id"], "u1");
    }

    #[tokio::test]
    async fn get_missing_user_is_404() {
        let (status, body) = get_json(test_app(), "/users/zzz").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "User not found: zzz");
    }

    #[tokio::test]
    async fn create_user_validates_and_rejects_duplicates() {
        let app = test_app();
        let user = json!({"id": "u3", "name": "Linus", "email": "linus@school.edu", "role": "student"});

        let (status, body) = post_json(app.clone(), "/users", user.clone()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["email"], "linus@school.edu");

        let (status, _) = post_json(app.clone(), "/users", user).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let bad = json!({"id": "u4", "name": "Nobody", "email": "not-an-email", "role": "admin"});
        let (status, body) = post_json(app.clone(), "/users", bad).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("email"));

        let (status, _) = get_json(app, "/users/u3").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn delete_user() {
        let app = test_app();
        let request = || Request::delete("/users/u1").body(Body::empty()).unwrap();

        let (status, _, _) = send(app.clone(), request()).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _, _) = send(app, request()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
