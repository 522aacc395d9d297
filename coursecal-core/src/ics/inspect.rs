//! Reading generated documents back with the icalendar crate's parser.

use icalendar::parser::{Component, read_calendar, unfold};

use super::escape::unescape_text;
use crate::error::{CourseCalError, CourseCalResult};

/// Structural overview of a calendar document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSummary {
    pub calendar_begins: usize,
    pub calendar_ends: usize,
    pub event_begins: usize,
    pub event_ends: usize,
    /// VEVENTs in document order
    pub events: Vec<EventSummary>,
}

/// BEGIN/END marker lines of a document, counted without parsing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Markers {
    pub calendar_begins: usize,
    pub calendar_ends: usize,
    pub event_begins: usize,
    pub event_ends: usize,
}

impl Markers {
    pub fn count(content: &str) -> Self {
        let unfolded = unfold(content);
        let markers = Markers::count(content);

        Markers {
            calendar_begins: count("BEGIN:VCALENDAR"),
            calendar_ends: count("END:VCALENDAR"),
            event_begins: count("BEGIN:VEVENT"),
            event_ends: count("END:VEVENT"),
        }
    }

    /// One calendar, and every VEVENT that begins also ends.
    pub fn is_balanced(&self) -> bool {
        self.calendar_begins == 1
            && self.calendar_ends == 1
            && self.event_begins == self.event_ends
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventSummary {
    pub uid: Option<String>,
    pub summary: String,
    pub location: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    /// TRIGGER values of the event's VALARMs
    pub triggers: Vec<String>,
}

impl DocumentSummary {
    /// BEGIN/END markers pair up and every VEVENT was parsed.
    pub fn is_well_formed(&self) -> bool {
        self.markers().is_balanced() && self.event_begins == self.events.len()
    }

    pub fn markers(&self) -> Markers {
        Markers {
            calendar_begins: self.calendar_begins,
            calendar_ends: self.calendar_ends,
            event_begins: self.event_begins,
            event_ends: self.event_ends,
        }
    }

    pub fn alarm_count(&self) -> usize {
        self.events.iter().map(|e| e.triggers.len()).sum()
    }
}

/// Parse `content` and summarise it.
pub fn inspect(content: &str) -> CourseCalResult<DocumentSummary> {
    let unfolded = unfold(content);
    let calendar =
        read_calendar(&unfolded).map_err(|e| CourseCalError::IcsParse(e.to_string()))?;

    let markers = Markers::count(content);

    let events = calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .map(summarize_event)
        .collect();

    Ok(DocumentSummary {
        calendar_begins: markers.calendar_begins,
        calendar_ends: markers.calendar_ends,
        event_begins: markers.event_begins,
        event_ends: markers.event_ends,
        events,
    })
}

fn summarize_event(vevent: &Component<'_>) -> EventSummary {
    let text = |name: &str| vevent.find_prop(name).map(|p| unescape_text(p.val.as_ref()));

    let triggers = vevent
        .components
        .iter()
        .filter(|c| c.name == "VALARM")
        .filter_map(|alarm| alarm.find_prop("TRIGGER").map(|p| p.val.to_string()))
        .collect();

    EventSummary {
        uid: vevent.find_prop("UID").map(|p| p.val.to_string()),
        summary: text("SUMMARY").unwrap_or_default(),
        location: text("LOCATION"),
        start: vevent.find_prop("DTSTART").map(|p| p.val.to_string()),
        end: vevent.find_prop("DTEND").map(|p| p.val.to_string()),
        triggers,
    }
}
