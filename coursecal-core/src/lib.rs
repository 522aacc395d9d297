//! Core of coursecal.
//!
//! - `event` and `ics`: the calendar-worthy occurrence and its iCalendar encoding
//! - `clock` and `uid`: injectable time and UID sources used by the encoder
//! - `domain` and `repo`: platform records and their storage seam
//! - `export`: resolving records to events for calendar downloads

pub mod app_config;
pub mod clock;
pub mod domain;
pub mod error;
pub mod event;
pub mod export;
pub mod ics;
pub mod repo;
pub mod uid;

pub use app_config::AppConfig;
pub use error::{CourseCalError, CourseCalResult};
pub use event::Event;
pub use export::{CalendarExporter, ExportConfig, IcsDocument};
pub use ics::IcsEncoder;
pub use repo::{Repos, Repository, SeedData};
