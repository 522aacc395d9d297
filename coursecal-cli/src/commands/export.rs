use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use coursecal_core::{AppConfig, CalendarExporter, IcsDocument, IcsEncoder, Repos, SeedData};
use owo_colors::OwoColorize;

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Target {
    /// One class session
    Session { id: String },
    /// One assignment deadline
    Assignment { id: String },
    /// Every session and deadline of a student's courses
    Student { id: String },
}

pub fn run(
    config_path: Option<&Path>,
    target: Target,
    seed: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = AppConfig::load(config_path)?;
    let seed_path = seed
        .or_else(|| config.seed_path.clone())
        .context("No seed data given. Pass --seed <file> or set seed_path in the config")?;

    let seed = SeedData::load(&seed_path)
        .with_context(|| format!("Failed to load seed data from {}", seed_path.display()))?;
    let exporter = CalendarExporter::new(
        Repos::from_seed(seed),
        IcsEncoder::from_settings(config.calendar.clone()),
        config.export.clone(),
    );

    let doc = export(&exporter, &target)?;

    match output {
        Some(path) => {
            let path = destination(&path, &doc);
            std::fs::write(&path, &doc.body)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("{} {}", "Wrote".green(), path.display());
        }
        None => print!("{}", doc.body),
    }

    Ok(())
}

pub fn export(exporter: &CalendarExporter, target: &Target) -> Result<IcsDocument> {
    let doc = match target {
        Target::Session { id } => exporter.export_session(id)?,
        Target::Assignment { id } => exporter.export_assignment(id)?,
        Target::Student { id } => exporter.export_student(id)?,
    };
    Ok(doc)
}

/// Directories get the document's own filename appended
fn destination(output: &Path, doc: &IcsDocument) -> PathBuf {
    if output.is_dir() {
        output.join(&doc.filename)
    } else {
        output.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursecal_core::ExportConfig;
    use coursecal_core::ics::CalendarSettings;

    const SEED: &str = r#"{
        "users": [{"id": "u1", "name": "Ada", "email": "ada@school.edu", "role": "student"}],
        "sessions": [{"id": "s1", "courseId": "c1", "title": "Algebra", "startTime": "2025-01-10T10:00:00Z"}],
        "assignments": [{"id": "a1", "courseId": "c1", "title": "Essay", "dueDate": "2025-03-01T23:59:00Z"}],
        "enrollments": [{"id": "e1", "studentId": "u1", "courseId": "c1"}]
    }"#;

    fn exporter() -> CalendarExporter {
        CalendarExporter::new(
            Repos::from_seed(SeedData::from_json(SEED).unwrap()),
            IcsEncoder::from_settings(CalendarSettings::default()),
            ExportConfig::default(),
        )
    }

    #[test]
    fn exports_each_target() {
        let exp = exporter();

        let session = export(&exp, &Target::Session { id: "s1".into() }).unwrap();
        assert!(session.body.contains("SUMMARY:Algebra\r\n"));

        let assignment = export(&exp, &Target::Assignment { id: "a1".into() }).unwrap();
        assert!(assignment.body.contains("TRIGGER:-P2D\r\n"));

        let student = export(&exp, &Target::Student { id: "u1".into() }).unwrap();
        assert_eq!(student.body.matches("BEGIN:VEVENT").count(), 2);
    }

    #[test]
    fn unknown_id_is_an_error() {
        let err = export(&exporter(), &Target::Session { id: "s9".into() }).unwrap_err();
        assert_eq!(err.to_string(), "Session not found: s9");
    }

    #[test]
    fn directory_output_uses_document_filename() {
        let dir = tempfile::tempdir().unwrap();
        let doc = IcsDocument {
            filename: "session-s1.ics".into(),
            body: String::new(),
        };

        assert_eq!(destination(dir.path(), &doc), dir.path().join("session-s1.ics"));
        let file = dir.path().join("mine.ics");
        assert_eq!(destination(&file, &doc), file);
    }

    #[test]
    fn run_writes_file_from_seed() {
        let dir = tempfile::tempdir().unwrap();
        let seed = dir.path().join("seed.json");
        std::fs::write(&seed, SEED).unwrap();
        let config = dir.path().join("coursecal.toml");
        std::fs::write(&config, "").unwrap();

        run(
            Some(&config),
            Target::Student { id: "u1".into() },
            Some(seed),
            Some(dir.path().to_path_buf()),
        )
        .unwrap();

        let written = std::fs::read_to_string(dir.path().join("schedule-u1.ics")).unwrap();
        assert!(written.contains("X-WR-CALNAME:CourseCal Schedule\r\n"));
    }
}
