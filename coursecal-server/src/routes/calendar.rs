//! Calendar (.ics) download endpoints

use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
    routing::get,
};
use coursecal_core::{CourseCalError, CourseCalResult, IcsDocument};
use tracing::error;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/calendar/session/{id}", get(session_calendar))
        .route("/calendar/assignment/{id}", get(assignment_calendar))
        .route("/calendar/student/{id}", get(student_calendar))
}

/// GET /calendar/session/:id
async fn session_calendar(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Response, AppError> {
    ics_response(state.exporter.export_session(&session_id))
}

/// GET /calendar/assignment/:id
async fn assignment_calendar(
    State(state): State<AppState>,
    Path(assignment_id): Path<String>,
) -> Result<Response, AppError> {
    ics_response(state.exporter.export_assignment(&assignment_id))
}

/// GET /calendar/student/:id - All sessions and deadlines of a student's courses
async fn student_calendar(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Response, AppError> {
    ics_response(state.exporter.export_student(&student_id))
}

/// Not-found passes through; anything else becomes a generic failure.
fn ics_response(result: CourseCalResult<IcsDocument>) -> Result<Response, AppError> {
    let doc = match result {
        Ok(doc) => doc,
        Err(err @ CourseCalError::NotFound { .. }) => return Err(err.into()),
        Err(err) => {
            error!(error = %err, "calendar generation failed");
            return Err(AppError::internal("Failed to generate calendar"));
        }
    };

    let disposition = HeaderValue::from_str(&doc.content_disposition())?;
    let headers = [
        (
            header::CONTENT_TYPE,
            HeaderValue::from_static(IcsDocument::CONTENT_TYPE),
        ),
        (header::CONTENT_DISPOSITION, disposition),
    ];

    Ok((headers, doc.body).into_response())
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::*;
    use axum::http::{StatusCode, header};
    use coursecal_core::ics::inspect;

    #[tokio::test]
    async fn session_download() {
        let (status, headers, body) = get(test_app(), "/calendar/session/s1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "text/calendar; charset=utf-8");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"session-s1.ics\""
        );

        let ics = String::from_utf8(body.to_vec()).unwrap();
        assert!(ics.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n"));
        assert!(ics.contains("DTSTAMP:20250101T120000Z\r\n"));
        assert!(ics.contains("DTSTART:20250110T100000Z\r\n"));
        assert!(ics.contains("DTEND:20250110T110000Z\r\n"));
        assert_eq!(ics.matches("BEGIN:VALARM").count(), 2);
    }

    #[tokio::test]
    async fn session_with_end_time_and_link() {
        let (_, _, body) = get(test_app(), "/calendar/session/s2").await;
        let ics = String::from_utf8(body.to_vec()).unwrap();
        assert!(ics.contains("DTEND:20250111T103000Z\r\n"));
        assert!(ics.contains("URL:https://meet.example.com/w\r\n"));
    }

    #[tokio::test]
    async fn assignment_download_has_deadline_alarms() {
        let (status, _, body) = get(test_app(), "/calendar/assignment/a1").await;
        assert_eq!(status, StatusCode::OK);

        let summary = inspect(std::str::from_utf8(&body).unwrap()).unwrap();
        assert_eq!(summary.events[0].triggers, vec!["-P2D", "-P1D"]);
        assert_eq!(summary.events[0].location.as_deref(), Some("Online Submission"));
    }

    #[tokio::test]
    async fn student_schedule_download() {
        let (status, headers, body) = get(test_app(), "/calendar/student/u1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"schedule-u1.ics\""
        );

        let summary = inspect(std::str::from_utf8(&body).unwrap()).unwrap();
        assert!(summary.is_well_formed());
        let titles: Vec<_> = summary.events.iter().map(|e| e.summary.as_str()).collect();
        assert_eq!(titles, vec!["Algebra", "Workshop", "Essay"]);
        assert_eq!(summary.alarm_count(), 3);
    }

    #[tokio::test]
    async fn missing_records_are_404() {
        for uri in [
            "/calendar/session/nope",
            "/calendar/assignment/nope",
            "/calendar/student/nope",
        ] {
            let (status, body) = get_json(test_app(), uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert!(body["error"].as_str().unwrap().contains("not found"));
        }
    }

    #[tokio::test]
    async fn unparseable_dates_give_generic_failure() {
        let (status, body) = get_json(test_app(), "/calendar/session/bad").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to generate calendar");
    }
}
