//! ICS document generation and inspection.
//!
//! This module writes iCalendar (RFC 5545) text for calendar export and
//! reads documents back for verification.

mod alarm;
mod escape;
mod generate;
mod inspect;

use serde::{Deserialize, Serialize};

pub use alarm::{Alarm, Trigger, batch_alarms, single_alarms};
pub use escape::{escape_text, format_utc, unescape_text};
pub use generate::IcsEncoder;
pub use inspect::{DocumentSummary, EventSummary, Markers, inspect};

/// Calendar-level metadata written after the fixed header properties
/// (X-WR-CALNAME, X-WR-CALDESC, X-WR-TIMEZONE)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarMetadata {
    /// Human-readable calendar name
    pub name: String,
    pub description: Option<String>,
    pub timezone: String,
}

/// Everything the encoder writes that is not taken from the events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    /// Product name in PRODID (`-//<product>//<language>`)
    pub product: String,
    pub language: String,
    /// Suffix of every generated UID
    pub uid_domain: String,
    /// Header metadata of single-event documents
    pub single: CalendarMetadata,
    /// Header metadata of multi-event documents
    pub batch: CalendarMetadata,
}

impl CalendarSettings {
    pub fn product_id(&self) -> String {
        format!("-//{}//{}", self.product, self.language)
    }
}

impl Default for CalendarSettings {
    fn default() -> Self {
        CalendarSettings {
            product: "CourseCal".to_string(),
            language: "EN".to_string(),
            uid_domain: "coursecal.local".to_string(),
            single: CalendarMetadata {
                name: "CourseCal Event".to_string(),
                description: None,
                timezone: "UTC".to_string(),
            },
            batch: CalendarMetadata {
                name: "CourseCal Schedule".to_string(),
                description: Some("Class sessions and assignment deadlines".to_string()),
                timezone: "UTC".to_string(),
            },
        }
    }
}
