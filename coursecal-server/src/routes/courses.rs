//! Course, session, assignment and enrollment endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use coursecal_core::domain::{Assignment, Course, Enrollment, ForeignKey, Session};
use coursecal_core::export::parse_instant;
use coursecal_core::{CourseCalError, CourseCalResult};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::routes::{ApiJson, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses).post(create_course))
        .route("/courses/{id}", get(get_course))
        .route(
            "/courses/{id}/sessions",
            get(list_sessions).post(create_session),
        )
        .route(
            "/courses/{id}/assignments",
            get(list_assignments).post(create_assignment),
        )
        .route("/enrollments", post(create_enrollment))
        .route("/students/{id}/courses", get(student_courses))
}

/// GET /courses
async fn list_courses(State(state): State<AppState>) -> Json<Vec<Course>> {
    Json(state.repos.courses.all())
}

/// GET /courses/:id
async fn get_course(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<Course>, AppError> {
    Ok(Json(find_course(&state, &course_id)?))
}

/// POST /courses - Create a course taught by an existing user
async fn create_course(
    State(state): State<AppState>,
    ApiJson(course): ApiJson<Course>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    course.validate()?;
    if state.repos.users.find(&course.instructor_id).is_none() {
        return Err(CourseCalError::Validation(format!(
            "unknown instructor: {}",
            course.instructor_id
        ))
        .into());
    }

    state.repos.courses.insert(&course)?;
    info!(course = %course.id, "created course");

    Ok((StatusCode::CREATED, Json(course)))
}

/// GET /courses/:id/sessions
async fn list_sessions(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<Vec<Session>>, AppError> {
    find_course(&state, &course_id)?;
    let sessions = state
        .repos
        .sessions
        .find_by_foreign_key(ForeignKey::Course, &course_id);

    Ok(Json(sessions))
}

/// Request body for creating a session
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub meeting_link: Option<String>,
    pub start_time: String,
    pub end_time: Option<String>,
    pub duration: Option<u32>,
}

/// POST /courses/:id/sessions
async fn create_session(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    ApiJson(req): ApiJson<CreateSessionRequest>,
) -> Result<(StatusCode, Json<Session>), AppError> {
    find_course(&state, &course_id)?;
    require_instant("startTime", &req.start_time)?;
    if let Some(ref end) = req.end_time {
        require_instant("endTime", end)?;
    }

    let session = Session {
        id: Uuid::new_v4().to_string(),
        course_id,
        title: require_title(req.title)?,
        description: req.description,
        location: req.location,
        meeting_link: req.meeting_link,
        start_time: req.start_time,
        end_time: req.end_time,
        duration: req.duration,
    };
    exportable(state.exporter.session_event(&session))?;
    state.repos.sessions.insert(&session)?;
    info!(session = %session.id, course = %session.course_id, "created session");

    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /courses/:id/assignments
async fn list_assignments(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<Vec<Assignment>>, AppError> {
    find_course(&state, &course_id)?;
    let assignments = state
        .repos
        .assignments
        .find_by_foreign_key(ForeignKey::Course, &course_id);

    Ok(Json(assignments))
}

/// Request body for creating an assignment
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(alias = "dueDate")]
    pub scheduled_date: String,
    pub url: Option<String>,
}

/// POST /courses/:id/assignments
async fn create_assignment(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    ApiJson(req): ApiJson<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<Assignment>), AppError> {
    find_course(&state, &course_id)?;
    require_instant("scheduledDate", &req.scheduled_date)?;

    let assignment = Assignment {
        id: Uuid::new_v4().to_string(),
        course_id,
        title: require_title(req.title)?,
        description: req.description,
        scheduled_date: req.scheduled_date,
        url: req.url,
    };
    exportable(state.exporter.assignment_event(&assignment))?;
    state.repos.assignments.insert(&assignment)?;
    info!(assignment = %assignment.id, course = %assignment.course_id, "created assignment");

    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Request body for enrolling a student
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnrollmentRequest {
    pub student_id: String,
    pub course_id: String,
}

/// POST /enrollments - 409 when the student is already enrolled
async fn create_enrollment(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateEnrollmentRequest>,
) -> Result<(StatusCode, Json<Enrollment>), AppError> {
    state.exporter.student(&req.student_id)?;
    find_course(&state, &req.course_id)?;

    let enrollment = Enrollment {
        id: Uuid::new_v4().to_string(),
        student_id: req.student_id,
        course_id: req.course_id,
    };
    state.repos.enrollments.insert(&enrollment)?;
    info!(student = %enrollment.student_id, course = %enrollment.course_id, "enrolled student");

    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// GET /students/:id/courses - Courses the student is enrolled in
async fn student_courses(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<Vec<Course>>, AppError> {
    state.exporter.student(&student_id)?;
    let courses = state
        .exporter
        .enrolled_course_ids(&student_id)
        .iter()
        .filter_map(|id| state.repos.courses.find(id))
        .collect();

    Ok(Json(courses))
}

fn find_course(state: &AppState, course_id: &str) -> CourseCalResult<Course> {
    state
        .repos
        .courses
        .find(course_id)
        .ok_or_else(|| CourseCalError::not_found("Course", course_id))
}

fn require_instant(field: &str, value: &str) -> CourseCalResult<()> {
    parse_instant(value)
        .map(|_| ())
        .map_err(|_| CourseCalError::Validation(format!("{field} is not a valid date: {value}")))
}

/// A record whose event cannot be encoded is rejected at creation time
fn exportable<T>(event: CourseCalResult<T>) -> CourseCalResult<()> {
    match event {
        Ok(_) => Ok(()),
        Err(CourseCalError::InvalidTemporal(value)) => Err(CourseCalError::Validation(format!(
            "event cannot be exported: {value}"
        ))),
        Err(other) => Err(other),
    }
}

fn require_title(title: String) -> CourseCalResult<String> {
    if title.trim().is_empty() {
        return Err(CourseCalError::Validation("title must not be empty".into()));
    }
    Ok(title)
}
