use std::path::Path;

use anyhow::{Context, Result, bail};
use coursecal_core::ics::{Markers, inspect};
use owo_colors::OwoColorize;

pub fn run(file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let markers = Markers::count(&content);
    if !markers.is_balanced() {
        bail!(
            "Unbalanced document: {} BEGIN:VCALENDAR, {} END:VCALENDAR, {} BEGIN:VEVENT, {} END:VEVENT",
            markers.calendar_begins,
            markers.calendar_ends,
            markers.event_begins,
            markers.event_ends
        );
    }
    let summary = inspect(&content)?;

    println!("{}", file.display().bold());
    for event in &summary.events {
        println!(
            "  {} {} {}",
            event.start.as_deref().unwrap_or("?").dimmed(),
            event.summary,
            format!("[{}]", event.triggers.join(", ")).dimmed()
        );
    }
    println!(
        "{} events, {} alarms",
        summary.events.len(),
        summary.alarm_count()
    );

    if !summary.is_well_formed() {
        bail!(
            "Only {} of {} VEVENT blocks could be read",
            summary.events.len(),
            summary.event_begins
        );
    }

    println!("{}", "OK".green());
    Ok(())
}
