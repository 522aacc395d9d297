//! Calendar export: resolves sessions, assignments and enrollments to
//! events and hands them to the encoder.
//!
//! Lookups and timestamp resolution happen here, before encoding starts,
//! so a missing record or a bad date never yields a partial document.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{Assignment, ForeignKey, Session, User};
use crate::error::{CourseCalError, CourseCalResult};
use crate::event::Event;
use crate::ics::IcsEncoder;
use crate::repo::Repos;

/// Fallbacks applied when a record does not say how long it is or where.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Session length when neither `duration` nor `endTime` is given
    pub default_session_minutes: u32,
    /// Length of assignment deadline events
    pub deadline_minutes: u32,
    /// Session location when neither `location` nor `meetingLink` is given
    pub session_location: String,
    pub assignment_location: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            default_session_minutes: 60,
            deadline_minutes: 15,
            session_location: "Online".to_string(),
            assignment_location: "Online Submission".to_string(),
        }
    }
}

/// An encoded calendar ready to be offered as a download.
#[derive(Debug, Clone, PartialEq)]
pub struct IcsDocument {
    pub filename: String,
    pub body: String,
}

impl IcsDocument {
    pub const CONTENT_TYPE: &'static str = "text/calendar; charset=utf-8";

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

pub struct CalendarExporter {
    repos: Repos,
    encoder: IcsEncoder,
    config: ExportConfig,
}

impl CalendarExporter {
    pub fn new(repos: Repos, encoder: IcsEncoder, config: ExportConfig) -> Self {
        CalendarExporter {
            repos,
            encoder,
            config,
        }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Single-event calendar for one session.
    pub fn export_session(&self, session_id: &str) -> CourseCalResult<IcsDocument> {
        let session = self
            .repos
            .sessions
            .find(session_id)
            .ok_or_else(|| CourseCalError::not_found("Session", session_id))?;

        let event = self.session_event(&session)?;
        debug!(session = %session.id, start = %event.start, "exporting session");

        Ok(IcsDocument {
            filename: format!("session-{}.ics", filename_safe(&session.id)),
            body: self.encoder.encode_single(&event),
        })
    }

    /// Single-event calendar for one assignment deadline.
    pub fn export_assignment(&self, assignment_id: &str) -> CourseCalResult<IcsDocument> {
        let assignment = self
            .repos
            .assignments
            .find(assignment_id)
            .ok_or_else(|| CourseCalError::not_found("Assignment", assignment_id))?;

        let event = self.assignment_event(&assignment)?;
        debug!(assignment = %assignment.id, due = %event.start, "exporting assignment");

        Ok(IcsDocument {
            filename: format!("assignment-{}.ics", filename_safe(&assignment.id)),
            body: self.encoder.encode_single(&event),
        })
    }

    /// Every session, then every assignment, of the student's enrolled courses.
    pub fn export_student(&self, student_id: &str) -> CourseCalResult<IcsDocument> {
        let student = self.student(student_id)?;
        let events = self.student_events(&student)?;
        info!(student = %student.id, events = events.len(), "exporting student schedule");

        Ok(IcsDocument {
            filename: format!("schedule-{}.ics", filename_safe(&student.id)),
            body: self.encoder.encode_many(&events),
        })
    }

    pub fn student(&self, student_id: &str) -> CourseCalResult<User> {
        self.repos
            .users
            .find(student_id)
            .ok_or_else(|| CourseCalError::not_found("Student", student_id))
    }

    /// Course ids of the student's enrollments, first enrollment wins
    pub fn enrolled_course_ids(&self, student_id: &str) -> Vec<String> {
        let mut course_ids: Vec<String> = Vec::new();
        for enrollment in self
            .repos
            .enrollments
            .find_by_foreign_key(ForeignKey::Student, student_id)
        {
            if !course_ids.contains(&enrollment.course_id) {
                course_ids.push(enrollment.course_id);
            }
        }
        course_ids
    }

    pub fn student_events(&self, student: &User) -> CourseCalResult<Vec<Event>> {
        let course_ids = self.enrolled_course_ids(&student.id);
        let mut events = Vec::new();

        for course_id in &course_ids {
            for session in self
                .repos
                .sessions
                .find_by_foreign_key(ForeignKey::Course, course_id)
            {
                events.push(self.session_event(&session)?);
            }
        }

        for course_id in &course_ids {
            for assignment in self
                .repos
                .assignments
                .find_by_foreign_key(ForeignKey::Course, course_id)
            {
                events.push(self.assignment_event(&assignment)?);
            }
        }

        Ok(events)
    }

    /// Duration: explicit `duration`, else `endTime - startTime` when the end
    /// is not before the start, else the configured default.
    pub fn session_event(&self, session: &Session) -> CourseCalResult<Event> {
        let start = parse_instant(&session.start_time)?;

        let derived = match session.end_time.as_deref() {
            Some(end) => {
                let end = parse_instant(end)?;
                u32::try_from((end - start).num_minutes()).ok()
            }
            None => None,
        };
        let duration_minutes = session
            .duration
            .or(derived)
            .unwrap_or(self.config.default_session_minutes);

        let location = first_non_empty(&[
            session.location.as_deref(),
            session.meeting_link.as_deref(),
        ])
        .unwrap_or(&self.config.session_location);

        encodable(
            Event::session(&session.title, start, duration_minutes)
                .with_description(session.description.clone().unwrap_or_default())
                .with_location(location)
                .with_url(session.meeting_link.clone()),
        )
    }

    pub fn assignment_event(&self, assignment: &Assignment) -> CourseCalResult<Event> {
        let due = parse_instant(&assignment.scheduled_date)?;

        encodable(
            Event::deadline(&assignment.title, due, self.config.deadline_minutes)
                .with_description(assignment.description.clone().unwrap_or_default())
                .with_location(&self.config.assignment_location)
                .with_url(assignment.url.clone()),
        )
    }
}

/// Resolve a timestamp to an absolute instant.
///
/// Accepts RFC 3339 (`2025-01-10T10:00:00Z`, `2025-01-10T12:00:00+02:00`),
/// offset-less date-times (read as UTC) and bare dates (midnight UTC).
pub fn parse_instant(value: &str) -> CourseCalResult<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }

    Err(CourseCalError::InvalidTemporal(value.to_string()))
}

/// DATE-TIME values have a four digit year, so nothing may end after 9999.
fn encodable(event: Event) -> CourseCalResult<Event> {
    if event.end().year() > 9999 {
        return Err(CourseCalError::InvalidTemporal(format!(
            "{} + {} minutes ends after year 9999",
            event.start.to_rfc3339(),
            event.duration_minutes
        )));
    }
    Ok(event)
}

fn first_non_empty<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
}

fn filename_safe(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
