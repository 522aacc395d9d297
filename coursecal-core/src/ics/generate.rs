//! ICS document generation.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::alarm::{Alarm, batch_alarms, single_alarms};
use super::escape::{escape_text, format_utc};
use super::{CalendarMetadata, CalendarSettings};
use crate::clock::{Clock, SystemClock};
use crate::event::Event;
use crate::uid::{RandomUidGenerator, UidGenerator};

const CRLF: &str = "\r\n";
const FOLD_OCTETS: usize = 75;

/// Turns events into calendar documents.
///
/// Output depends only on the events, the settings, and the injected
/// clock (DTSTAMP) and UID generator.
pub struct IcsEncoder {
    clock: Arc<dyn Clock>,
    uids: Arc<dyn UidGenerator>,
    settings: CalendarSettings,
}

impl IcsEncoder {
    pub fn new(
        clock: Arc<dyn Clock>,
        uids: Arc<dyn UidGenerator>,
        settings: CalendarSettings,
    ) -> Self {
        IcsEncoder {
            clock,
            uids,
            settings,
        }
    }

    /// Wall clock and random UIDs under the configured domain
    pub fn from_settings(settings: CalendarSettings) -> Self {
        let uids = Arc::new(RandomUidGenerator::new(settings.uid_domain.clone()));
        IcsEncoder::new(Arc::new(SystemClock), uids, settings)
    }

    pub fn settings(&self) -> &CalendarSettings {
        &self.settings
    }

    /// Document with one VEVENT and two alarms.
    pub fn encode_single(&self, event: &Event) -> String {
        let now = self.clock.now();
        let mut doc = Document::default();

        self.write_header(&mut doc, &self.settings.single);
        let uid = self.uids.generate(now, None);
        write_event(&mut doc, event, &uid, &now, &single_alarms(event));
        doc.line("END:VCALENDAR");

        doc.finish()
    }

    /// Document with one VEVENT per input event, in input order, one alarm each.
    pub fn encode_many(&self, events: &[Event]) -> String {
        let now = self.clock.now();
        let mut doc = Document::default();

        self.write_header(&mut doc, &self.settings.batch);
        for (index, event) in events.iter().enumerate() {
            let uid = self.uids.generate(now, Some(index));
            write_event(&mut doc, event, &uid, &now, &batch_alarms(event));
        }
        doc.line("END:VCALENDAR");

        doc.finish()
    }

    fn write_header(&self, doc: &mut Document, metadata: &CalendarMetadata) {
        doc.line("BEGIN:VCALENDAR");
        doc.line("VERSION:2.0");
        doc.property("PRODID", &self.settings.product_id());
        doc.line("CALSCALE:GREGORIAN");
        doc.line("METHOD:PUBLISH");
        doc.property("X-WR-CALNAME", &escape_text(&metadata.name));
        if let Some(ref desc) = metadata.description {
            doc.property("X-WR-CALDESC", &escape_text(desc));
        }
        doc.property("X-WR-TIMEZONE", &metadata.timezone);
    }
}

fn write_event(
    doc: &mut Document,
    event: &Event,
    uid: &str,
    dtstamp: &DateTime<Utc>,
    alarms: &[Alarm],
) {
    doc.line("BEGIN:VEVENT");
    doc.property("UID", uid);
    doc.property("DTSTAMP", &format_utc(dtstamp));
    doc.property("DTSTART", &format_utc(&event.start));
    doc.property("DTEND", &format_utc(&event.end()));
    doc.property("SUMMARY", &escape_text(&event.title));
    doc.property("DESCRIPTION", &escape_text(&event.description));
    doc.property("LOCATION", &escape_text(&event.location));
    doc.line("STATUS:CONFIRMED");
    doc.line("SEQUENCE:0");
    doc.line("TRANSP:OPAQUE");

    // URI values are not TEXT-escaped, so raw line breaks are dropped
    if let Some(url) = event.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        let url: String = url.chars().filter(|c| *c != '\r' && *c != '\n').collect();
        doc.property("URL", &url);
    }

    for alarm in alarms {
        doc.line("BEGIN:VALARM");
        doc.property("TRIGGER", &alarm.trigger.to_string());
        doc.line("ACTION:DISPLAY");
        doc.property("DESCRIPTION", &escape_text(&alarm.description));
        doc.line("END:VALARM");
    }

    doc.line("END:VEVENT");
}

/// CRLF-terminated content lines, folded at 75 octets
#[derive(Default)]
struct Document {
    out: String,
}

impl Document {
    fn line(&mut self, line: &str) {
        let mut rest = line;
        let mut limit = FOLD_OCTETS;
        while rest.len() > limit {
            let mut cut = limit;
            while !rest.is_char_boundary(cut) {
                cut -= 1;
            }
            self.out.push_str(&rest[..cut]);
            self.out.push_str(CRLF);
            self.out.push(' ');
            rest = &rest[cut..];
            // the leading space counts toward the limit
            limit = FOLD_OCTETS - 1;
        }
        self.out.push_str(rest);
        self.out.push_str(CRLF);
    }

    fn property(&mut self, name: &str, value: &str) {
        self.line(&format!("{name}:{value}"));
    }

    fn finish(self) -> String {
        self.out
    }
}
