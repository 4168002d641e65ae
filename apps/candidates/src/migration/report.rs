use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::migration::source::RecordKey;

/// What happened to one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Already canonical; left untouched.
    Valid,
    /// Rewritten in canonical form. `backup` is `None` on a dry run.
    Normalized {
        issues: Vec<String>,
        backup: Option<PathBuf>,
    },
    /// Invalid, but normalization cannot change it (e.g. an empty education
    /// array). Nothing is written.
    Unchanged { issues: Vec<String> },
    Failed { code: String, error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordOutcome {
    pub key: RecordKey,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Something the scan passed over without counting it.
#[derive(Debug, Clone, Serialize)]
pub struct Skipped {
    pub location: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MigrationCounts {
    pub total: usize,
    pub valid: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl MigrationCounts {
    /// Folds one outcome into the running counts.
    pub fn record(mut self, outcome: &Outcome) -> Self {
        self.total += 1;
        match outcome {
            Outcome::Valid => self.valid += 1,
            Outcome::Normalized { .. } => self.updated += 1,
            Outcome::Unchanged { .. } => self.unchanged += 1,
            Outcome::Failed { .. } => self.failed += 1,
        }
        self
    }

    /// `(valid + updated) / total` as a percentage; 0 for an empty run.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.valid + self.updated) as f64 / self.total as f64 * 100.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MigrationSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub dry_run: bool,
    pub counts: MigrationCounts,
    pub records: Vec<RecordOutcome>,
    pub skipped: Vec<Skipped>,
}

/// One human-readable status line per record.
pub fn status_line(record: &RecordOutcome, dry_run: bool) -> String {
    let key = &record.key;
    match &record.outcome {
        Outcome::Valid => format!("✅ {key}: Already valid"),
        Outcome::Normalized { issues, backup } => {
            let verb = if dry_run { "Would normalize" } else { "Updated" };
            let mut line = format!("🔄 {key}: {verb} (issues: {})", issues.join(", "));
            if let Some(backup) = backup {
                line.push_str(&format!("; backup: {}", backup.display()));
            }
            line
        }
        Outcome::Unchanged { issues } => {
            format!("⚠️  {key}: Still invalid after normalization (issues: {})", issues.join(", "))
        }
        Outcome::Failed { error, .. } => format!("❌ {key}: Error - {error}"),
    }
}

pub fn render_summary(summary: &MigrationSummary) -> String {
    let rule = "=".repeat(80);
    let c = &summary.counts;
    let title = if summary.dry_run {
        "MIGRATION SUMMARY (dry run)"
    } else {
        "MIGRATION SUMMARY"
    };
    let mut out = String::new();
    out.push_str(&format!("{rule}\n{title}\n{rule}\n"));
    out.push_str(&format!("Run: {}\n", summary.run_id));
    out.push_str(&format!("Total Candidates: {}\n", c.total));
    out.push_str(&format!("Already Valid: {}\n", c.valid));
    out.push_str(&format!("Updated: {}\n", c.updated));
    if c.unchanged > 0 {
        out.push_str(&format!("Still Invalid: {}\n", c.unchanged));
    }
    out.push_str(&format!("Failed: {}\n", c.failed));
    if !summary.skipped.is_empty() {
        out.push_str(&format!("Skipped: {}\n", summary.skipped.len()));
    }
    out.push_str(&format!("Success Rate: {:.1}%\n", c.success_rate()));
    out.push_str(&format!(
        "Duration: {} ms\n",
        (summary.finished_at - summary.started_at).num_milliseconds()
    ));
    out.push_str(&rule);
    out.push('\n');
    out
}
