//! The calendar-worthy occurrence handed to the ICS encoder.
//!
//! Events are built per request from already-resolved domain records
//! (see [`crate::export`]) and discarded once encoded.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A single occurrence to be written to a calendar document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    /// May be empty
    pub description: String,
    /// May be empty; callers substitute a placeholder when the record has none
    pub location: String,
    pub start: DateTime<Utc>,
    pub duration_minutes: u32,
    pub url: Option<String>,
    /// Deadline reminders get the reminder alarm policy, everything else the session one
    pub is_reminder: bool,
}

impl Event {
    /// A scheduled session (class, lecture, office hours).
    pub fn session(title: impl Into<String>, start: DateTime<Utc>, duration_minutes: u32) -> Self {
        Event {
            title: title.into(),
            description: String::new(),
            location: String::new(),
            start,
            duration_minutes,
            url: None,
            is_reminder: false,
        }
    }

    /// A deadline such as an assignment due date.
    pub fn deadline(title: impl Into<String>, due: DateTime<Utc>, duration_minutes: u32) -> Self {
        Event {
            is_reminder: true,
            ..Event::session(title, due, duration_minutes)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.url = url;
        self
    }

    /// `start + duration_minutes`
    pub fn end(&self) -> DateTime<Utc> {
        self.start + Duration::minutes(i64::from(self.duration_minutes))
    }
}
