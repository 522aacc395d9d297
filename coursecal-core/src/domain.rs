//! Records of the course platform.
//!
//! Timestamps on sessions and assignments are kept exactly as supplied
//! (seed files, request bodies) and only resolved to instants when a
//! calendar is exported.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CourseCalError, CourseCalResult};

/// Reference from one record to another, used for repository lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKey {
    Course,
    Student,
    User,
    Instructor,
}

pub trait Entity: Clone + Send + Sync + 'static {
    /// Record kind used in error messages ("Session not found: 3")
    const KIND: &'static str;

    fn id(&self) -> &str;

    fn foreign_key(&self, _key: ForeignKey) -> Option<&str> {
        None
    }

    /// Key that must be unique besides the id, if the record has one
    fn natural_key(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Instructor,
    Student,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl User {
    pub fn validate(&self) -> CourseCalResult<()> {
        require_non_empty("id", &self.id)?;
        require_non_empty("name", &self.name)?;
        match self.email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
            _ => Err(CourseCalError::Validation(format!(
                "invalid email address: {}",
                self.email
            ))),
        }
    }
}

impl Entity for User {
    const KIND: &'static str = "User";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub instructor_id: String,
}

impl Course {
    pub fn validate(&self) -> CourseCalResult<()> {
        require_non_empty("id", &self.id)?;
        require_non_empty("title", &self.title)?;
        require_non_empty("instructorId", &self.instructor_id)
    }
}

impl Entity for Course {
    const KIND: &'static str = "Course";

    fn id(&self) -> &str {
        &self.id
    }

    fn foreign_key(&self, key: ForeignKey) -> Option<&str> {
        match key {
            ForeignKey::Instructor => Some(&self.instructor_id),
            _ => None,
        }
    }
}

/// A scheduled class meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub course_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub meeting_link: Option<String>,
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    /// Minutes
    #[serde(default)]
    pub duration: Option<u32>,
}

impl Entity for Session {
    const KIND: &'static str = "Session";

    fn id(&self) -> &str {
        &self.id
    }

    fn foreign_key(&self, key: ForeignKey) -> Option<&str> {
        match key {
            ForeignKey::Course => Some(&self.course_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub course_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Due date
    #[serde(alias = "dueDate")]
    pub scheduled_date: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl Entity for Assignment {
    const KIND: &'static str = "Assignment";

    fn id(&self) -> &str {
        &self.id
    }

    fn foreign_key(&self, key: ForeignKey) -> Option<&str> {
        match key {
            ForeignKey::Course => Some(&self.course_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: String,
    pub student_id: String,
    pub course_id: String,
}

impl Entity for Enrollment {
    const KIND: &'static str = "Enrollment";

    fn id(&self) -> &str {
        &self.id
    }

    fn foreign_key(&self, key: ForeignKey) -> Option<&str> {
        match key {
            ForeignKey::Student => Some(&self.student_id),
            ForeignKey::Course => Some(&self.course_id),
            _ => None,
        }
    }

    fn natural_key(&self) -> Option<String> {
        Some(format!("{}/{}", self.student_id, self.course_id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Entity for Notification {
    const KIND: &'static str = "Notification";

    fn id(&self) -> &str {
        &self.id
    }

    fn foreign_key(&self, key: ForeignKey) -> Option<&str> {
        match key {
            ForeignKey::User => Some(&self.user_id),
            _ => None,
        }
    }
}

fn require_non_empty(field: &str, value: &str) -> CourseCalResult<()> {
    if value.trim().is_empty() {
        return Err(CourseCalError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}
