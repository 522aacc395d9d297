//! Seed data loaded into the in-memory repositories at startup.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{Assignment, Course, Enrollment, Notification, Session, User};
use crate::error::{CourseCalError, CourseCalResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedData {
    pub users: Vec<User>,
    pub courses: Vec<Course>,
    pub sessions: Vec<Session>,
    pub assignments: Vec<Assignment>,
    pub enrollments: Vec<Enrollment>,
    pub notifications: Vec<Notification>,
}

impl SeedData {
    /// Load a JSON seed file
    pub fn load(path: &Path) -> CourseCalResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|e| match e {
            CourseCalError::Serialization(msg) => {
                CourseCalError::Serialization(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    pub fn from_json(content: &str) -> CourseCalResult<Self> {
        serde_json::from_str(content).map_err(|e| CourseCalError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_collections_default_to_empty() {
        let seed = SeedData::from_json(
            r#"{"users":[{"id":"u1","name":"Ada","email":"ada@school.edu","role":"student"}]}"#,
        )
        .unwrap();
        assert_eq!(seed.users.len(), 1);
        assert!(seed.sessions.is_empty());
        assert!(seed.notifications.is_empty());
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"courses":[{{"id":"c1","title":"Algebra I","instructorId":"u9"}}]}}"#
        )
        .unwrap();

        let seed = SeedData::load(file.path()).unwrap();
        assert_eq!(seed.courses[0].title, "Algebra I");
        assert_eq!(seed.courses[0].description, "");
    }

    #[test]
    fn load_reports_path_on_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = SeedData::load(file.path()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains(&file.path().display().to_string()), "{msg}");
    }
}
