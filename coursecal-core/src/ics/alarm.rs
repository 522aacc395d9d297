//! VALARM policies.
//!
//! Single-event documents carry two alarms per event, multi-event
//! documents carry one.

use std::fmt;

use crate::event::Event;

/// Negative trigger offset relative to the event start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    DaysBefore(u32),
    HoursBefore(u32),
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::DaysBefore(days) => write!(f, "-P{days}D"),
            Trigger::HoursBefore(hours) => write!(f, "-PT{hours}H"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alarm {
    pub trigger: Trigger,
    /// Unescaped display text
    pub description: String,
}

impl Alarm {
    fn new(trigger: Trigger, description: String) -> Self {
        Alarm {
            trigger,
            description,
        }
    }
}

/// Alarms for a document holding exactly this event.
pub fn single_alarms(event: &Event) -> Vec<Alarm> {
    if event.is_reminder {
        vec![
            Alarm::new(Trigger::DaysBefore(2), due_in_two_days(&event.title)),
            Alarm::new(Trigger::DaysBefore(1), due_tomorrow(&event.title)),
        ]
    } else {
        vec![
            Alarm::new(Trigger::DaysBefore(1), starts_tomorrow(&event.title)),
            Alarm::new(Trigger::HoursBefore(1), starts_in_an_hour(&event.title)),
        ]
    }
}

/// Alarms for an event inside a multi-event document.
pub fn batch_alarms(event: &Event) -> Vec<Alarm> {
    if event.is_reminder {
        vec![Alarm::new(Trigger::DaysBefore(1), due_tomorrow(&event.title))]
    } else {
        vec![Alarm::new(
            Trigger::HoursBefore(1),
            starts_in_an_hour(&event.title),
        )]
    }
}

fn due_in_two_days(title: &str) -> String {
    format!("Reminder: {title} is due in 2 days")
}

fn due_tomorrow(title: &str) -> String {
    format!("Reminder: {title} is due tomorrow")
}

fn starts_tomorrow(title: &str) -> String {
    format!("Tomorrow: {title}")
}

fn starts_in_an_hour(title: &str) -> String {
    format!("Starting in 1 hour: {title}")
}
