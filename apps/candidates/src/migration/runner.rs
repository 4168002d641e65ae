//! Batch driver: scan, validate, normalize, back up, write, report.

use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::MigrationError;
use crate::migration::report::{
    status_line, MigrationCounts, MigrationSummary, Outcome, RecordOutcome, Skipped,
};
use crate::migration::source::{read_record, scan_jobs};
use crate::migration::store::write_with_backup;
use crate::models::CandidateApplication;
use crate::normalize::{normalize_with_depth, validate_structure, SkillDepth};

#[derive(Debug, Clone, Copy, Default)]
pub struct MigrationOptions {
    /// Validate and report without writing anything.
    pub dry_run: bool,
    pub skill_depth: SkillDepth,
}

/// What a record needs, decided purely from its decoded value.
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    Keep,
    Rewrite {
        issues: Vec<String>,
        record: Box<CandidateApplication>,
    },
    /// Invalid, but the normalized form equals the input.
    NoChange { issues: Vec<String> },
}

pub fn plan_record(value: &Value, depth: SkillDepth) -> Plan {
    let report = validate_structure(value);
    if report.valid {
        return Plan::Keep;
    }
    let record = normalize_with_depth(value, depth);
    if record.to_value() == *value {
        return Plan::NoChange {
            issues: report.issues,
        };
    }
    Plan::Rewrite {
        issues: report.issues,
        record: Box::new(record),
    }
}

/// Runs the migration over every job folder. Per-record failures are counted
/// and never abort the batch; only an unreadable data directory does.
pub async fn run_migration(config: &Config, options: MigrationOptions) -> Result<MigrationSummary> {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    info!(
        "Migration {run_id} scanning {} (dry_run={}, skill_depth={:?})",
        config.data_dir.display(),
        options.dry_run,
        options.skill_depth
    );

    let jobs = scan_jobs(&config.data_dir, &config.record_file).await?;

    let mut records = Vec::new();
    let mut skipped = Vec::new();
    for job in jobs {
        info!("📁 Processing {}...", job.name);
        let Some(candidates) = job.candidates else {
            warn!("⚠️  {}: No applications folder found", job.name);
            skipped.push(Skipped {
                location: job.name,
                reason: "No applications folder found".to_string(),
            });
            continue;
        };

        for candidate in candidates {
            if !candidate.has_record {
                warn!("❌ {}: {} not found", candidate.key, config.record_file);
                skipped.push(Skipped {
                    location: candidate.key.to_string(),
                    reason: format!("{} not found", config.record_file),
                });
                continue;
            }

            let outcome = process_record(&candidate.record_path, config, options).await;
            let record = RecordOutcome {
                key: candidate.key,
                outcome,
            };
            let line = status_line(&record, options.dry_run);
            match &record.outcome {
                Outcome::Failed { .. } => error!("{line}"),
                Outcome::Unchanged { .. } => warn!("{line}"),
                _ => info!("{line}"),
            }
            records.push(record);
        }
    }

    let counts = records
        .iter()
        .map(|r| &r.outcome)
        .fold(MigrationCounts::default(), MigrationCounts::record);

    Ok(MigrationSummary {
        run_id,
        started_at,
        finished_at: Utc::now(),
        dry_run: options.dry_run,
        counts,
        records,
        skipped,
    })
}

async fn process_record(path: &Path, config: &Config, options: MigrationOptions) -> Outcome {
    let raw = match read_record(path).await {
        Ok(raw) => raw,
        Err(e) => return failed(e),
    };

    match plan_record(&raw.value, options.skill_depth) {
        Plan::Keep => Outcome::Valid,
        Plan::NoChange { issues } => Outcome::Unchanged { issues },
        Plan::Rewrite { issues, .. } if options.dry_run => Outcome::Normalized {
            issues,
            backup: None,
        },
        Plan::Rewrite { issues, record } => {
            match write_with_backup(path, &raw.bytes, &record, &config.backup_suffix).await {
                Ok(backup) => Outcome::Normalized {
                    issues,
                    backup: Some(backup),
                },
                Err(e) => failed(e),
            }
        }
    }
}

fn failed(e: MigrationError) -> Outcome {
    Outcome::Failed {
        code: e.code().to_string(),
        error: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use std::path::PathBuf;

    const RECORD: &str = "generalInformation.json";

    fn canonical() -> Value {
        json!({
            "personalInfo": {
                "firstName": "Ada", "lastName": "Lovelace", "email": "", "phone": "",
                "location": {"city": "", "state": "", "country": ""},
                "dateOfBirth": "", "linkedin": "", "github": ""
            },
            "education": [{"degree": "BSc", "field": "", "institution": "", "startDate": "", "endDate": "", "gpa": null, "honors": []}],
            "experience": [{"title": "Dev", "company": "", "startDate": "", "endDate": null, "description": ""}],
            "skills": {"programming": [], "frameworks": [], "tools": [], "cloud": [], "databases": [], "testing": []},
            "certifications": [],
            "targetRole": "Engineer",
            "applicationDate": "2024-01-01",
            "status": "pending",
            "yearsOfExperience": 2
        })
    }

    fn legacy() -> Value {
        json!({
            "personalInfo": {"firstName": "Ken", "location": "Murray Hill, NJ, USA"},
            "education": [{"degree": "MSc"}],
            "experience": [{"title": "Researcher"}],
            "skills": {"scripting": {"shell": ["sh"]}, "versionControl": ["SCCS"]},
            "targetRole": "Systems",
            "applicationDate": "2024-01-02",
            "yearsOfExperience": 40
        })
    }

    fn put(root: &Path, job: &str, candidate: &str, contents: &str) -> PathBuf {
        let dir = root.join(job).join("applications").join(candidate);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(RECORD);
        fs::write(&path, contents).unwrap();
        path
    }

    fn config(root: &Path) -> Config {
        Config::default().with_data_dir(Some(root.to_path_buf()))
    }

    #[test]
    fn test_plan_keeps_valid_records() {
        assert_eq!(plan_record(&canonical(), SkillDepth::OneLevel), Plan::Keep);
    }

    #[test]
    fn test_plan_rewrites_legacy_records() {
        match plan_record(&legacy(), SkillDepth::OneLevel) {
            Plan::Rewrite { issues, record } => {
                assert_eq!(issues.len(), 6);
                assert_eq!(record.skills.programming, vec!["sh"]);
                assert_eq!(record.skills.tools, vec!["SCCS"]);
            }
            other => panic!("expected rewrite, got {other:?}"),
        }
    }

    #[test]
    fn test_plan_no_change_for_unfixable_record() {
        let mut record = canonical();
        record["education"] = json!([]);
        assert_eq!(
            plan_record(&record, SkillDepth::OneLevel),
            Plan::NoChange {
                issues: vec!["Missing or empty education array".to_string()]
            }
        );
    }

    #[tokio::test]
    async fn test_migration_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let valid_path = put(root, "job1", "ada", &canonical().to_string());
        let legacy_text = serde_json::to_string_pretty(&legacy()).unwrap();
        let legacy_path = put(root, "job1", "ken", &legacy_text);
        let broken_path = put(root, "job2", "bad", "{\"personalInfo\": {");
        fs::create_dir_all(root.join("job2/applications/nofile")).unwrap();
        fs::create_dir_all(root.join("job3")).unwrap();

        let summary = run_migration(&config(root), MigrationOptions::default())
            .await
            .unwrap();

        assert_eq!(
            summary.counts,
            MigrationCounts {
                total: 3,
                valid: 1,
                updated: 1,
                unchanged: 0,
                failed: 1
            }
        );
        assert_eq!(summary.skipped.len(), 2);

        // Valid record untouched, no backup.
        assert_eq!(
            fs::read_to_string(&valid_path).unwrap(),
            canonical().to_string()
        );
        assert!(!valid_path.with_file_name("generalInformation.json.backup").exists());

        // Legacy record rewritten with a byte-identical backup.
        let backup = legacy_path.with_file_name("generalInformation.json.backup");
        assert_eq!(fs::read_to_string(&backup).unwrap(), legacy_text);
        let rewritten: Value =
            serde_json::from_str(&fs::read_to_string(&legacy_path).unwrap()).unwrap();
        assert!(validate_structure(&rewritten).valid);
        assert_eq!(rewritten["personalInfo"]["location"]["state"], "NJ");

        // Broken record untouched, no backup.
        assert_eq!(
            fs::read_to_string(&broken_path).unwrap(),
            "{\"personalInfo\": {"
        );
        assert!(!broken_path.with_file_name("generalInformation.json.backup").exists());
        let failed = summary
            .records
            .iter()
            .find(|r| r.key.candidate == "bad")
            .unwrap();
        assert!(matches!(&failed.outcome, Outcome::Failed { code, .. } if code == "PARSE_ERROR"));
    }

    #[tokio::test]
    async fn test_second_run_finds_everything_valid() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        put(root, "job1", "ken", &legacy().to_string());

        let first = run_migration(&config(root), MigrationOptions::default())
            .await
            .unwrap();
        assert_eq!(first.counts.updated, 1);

        let second = run_migration(&config(root), MigrationOptions::default())
            .await
            .unwrap();
        assert_eq!(second.counts.valid, 1);
        assert_eq!(second.counts.updated, 0);
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let text = legacy().to_string();
        let path = put(root, "job1", "ken", &text);

        let options = MigrationOptions {
            dry_run: true,
            ..Default::default()
        };
        let summary = run_migration(&config(root), options).await.unwrap();

        assert_eq!(summary.counts.updated, 1);
        assert!(matches!(
            &summary.records[0].outcome,
            Outcome::Normalized { backup: None, .. }
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), text);
        assert!(!path.with_file_name("generalInformation.json.backup").exists());
    }

    #[tokio::test]
    async fn test_unfixable_record_is_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let mut record = canonical();
        record["experience"] = json!([]);
        let path = put(root, "job1", "ada", &record.to_string());

        let summary = run_migration(&config(root), MigrationOptions::default())
            .await
            .unwrap();
        assert_eq!(summary.counts.unchanged, 1);
        assert!(!path.with_file_name("generalInformation.json.backup").exists());
    }

    #[tokio::test]
    async fn test_missing_data_dir_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_migration(
            &config(&dir.path().join("missing")),
            MigrationOptions::default(),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_non_object_record_counts_as_failed() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let path = put(root, "job1", "list", "[1, 2, 3]");

        let summary = run_migration(&config(root), MigrationOptions::default())
            .await
            .unwrap();
        assert_eq!(summary.counts.failed, 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "[1, 2, 3]");
    }
}
