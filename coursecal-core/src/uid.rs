//! UID generation for VEVENT blocks.
//!
//! Uniqueness is best effort: the encode-time timestamp, an optional position
//! in the document and a few random bits, suffixed with a domain tag.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub trait UidGenerator: Send + Sync {
    /// `index` is the event's position when several events share a document.
    fn generate(&self, now: DateTime<Utc>, index: Option<usize>) -> String;
}

pub struct RandomUidGenerator {
    domain: String,
}

impl RandomUidGenerator {
    pub fn new(domain: impl Into<String>) -> Self {
        RandomUidGenerator {
            domain: domain.into(),
        }
    }
}

impl UidGenerator for RandomUidGenerator {
    fn generate(&self, now: DateTime<Utc>, index: Option<usize>) -> String {
        let random = Uuid::new_v4().simple().to_string();
        let random = &random[..9];
        let millis = now.timestamp_millis();

        match index {
            Some(i) => format!("{millis}-{i}-{random}@{}", self.domain),
            None => format!("{millis}-{random}@{}", self.domain),
        }
    }
}

/// Deterministic ids (`event-0@domain`, `event-1@domain`, ...).
pub struct SequentialUidGenerator {
    domain: String,
    next: AtomicUsize,
}

impl SequentialUidGenerator {
    pub fn new(domain: impl Into<String>) -> Self {
        SequentialUidGenerator {
            domain: domain.into(),
            next: AtomicUsize::new(0),
        }
    }
}

impl UidGenerator for SequentialUidGenerator {
    fn generate(&self, _now: DateTime<Utc>, _index: Option<usize>) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("event-{n}@{}", self.domain)
    }
}
