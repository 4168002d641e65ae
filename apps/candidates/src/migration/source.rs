//! Record source: walks `<data_dir>/<job>/applications/<candidate>/<record_file>`.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::fs;
use tracing::{debug, warn};

use crate::config::{APPLICATIONS_DIR, JOB_DESCRIPTION_FILE};
use crate::errors::{json_type_name, MigrationError};
use crate::normalize::{normalize, validate_structure};

/// Identifies one application: a candidate folder under a job folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RecordKey {
    pub job: String,
    pub candidate: String,
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.job, self.candidate)
    }
}

#[derive(Debug, Clone)]
pub struct CandidateFolder {
    pub key: RecordKey,
    pub record_path: PathBuf,
    pub has_record: bool,
}

#[derive(Debug, Clone)]
pub struct JobFolder {
    pub name: String,
    /// `None` when the job has no `applications/` directory.
    pub candidates: Option<Vec<CandidateFolder>>,
}

/// A raw record as read from disk: the exact bytes plus the decoded value.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub bytes: Vec<u8>,
    pub value: serde_json::Value,
}

/// Scans every job folder in name order. Fails only when the data directory
/// itself cannot be read.
pub async fn scan_jobs(data_dir: &Path, record_file: &str) -> Result<Vec<JobFolder>> {
    if !fs::try_exists(data_dir).await.unwrap_or(false) {
        anyhow::bail!("Data directory not found: {}", data_dir.display());
    }

    let mut jobs = Vec::new();
    for (name, path) in sorted_subdirs(data_dir)
        .await
        .with_context(|| format!("Failed to read data directory {}", data_dir.display()))?
    {
        let applications = path.join(APPLICATIONS_DIR);
        let candidates = if fs::try_exists(&applications).await.unwrap_or(false) {
            match scan_candidates(&name, &applications, record_file).await {
                Ok(c) => Some(c),
                Err(e) => {
                    warn!("Failed to read {}: {e}", applications.display());
                    Some(Vec::new())
                }
            }
        } else {
            None
        };
        jobs.push(JobFolder { name, candidates });
    }
    Ok(jobs)
}

async fn scan_candidates(
    job: &str,
    applications: &Path,
    record_file: &str,
) -> std::io::Result<Vec<CandidateFolder>> {
    let mut candidates = Vec::new();
    for (candidate, path) in sorted_subdirs(applications).await? {
        let record_path = path.join(record_file);
        let has_record = fs::try_exists(&record_path).await.unwrap_or(false);
        candidates.push(CandidateFolder {
            key: RecordKey {
                job: job.to_string(),
                candidate,
            },
            record_path,
            has_record,
        });
    }
    Ok(candidates)
}

/// Reads and decodes one record. Undecodable bytes and non-object records are
/// per-record failures.
pub async fn read_record(path: &Path) -> Result<RawRecord, MigrationError> {
    let bytes = fs::read(path)
        .await
        .map_err(|e| MigrationError::io(path, e))?;
    let value: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|source| MigrationError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    if !value.is_object() {
        return Err(MigrationError::NotAnObject {
            path: path.to_path_buf(),
            found: json_type_name(&value),
        });
    }
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(RawRecord { bytes, value })
}

/// Immediate subdirectories, sorted by name. Non-UTF-8 names are skipped.
async fn sorted_subdirs(dir: &Path) -> std::io::Result<Vec<(String, PathBuf)>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut dirs = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            dirs.push((name.to_string(), entry.path()));
        }
    }
    dirs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(dirs)
}

#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub id: String,
    pub description: String,
}

/// Job folders that carry a `jobDescription.txt`.
pub async fn list_jobs(data_dir: &Path) -> Result<Vec<JobSummary>> {
    if !fs::try_exists(data_dir).await.unwrap_or(false) {
        return Ok(Vec::new());
    }
    let mut jobs = Vec::new();
    for (name, path) in sorted_subdirs(data_dir)
        .await
        .with_context(|| format!("Failed to read data directory {}", data_dir.display()))?
    {
        let desc_path = path.join(JOB_DESCRIPTION_FILE);
        if !fs::try_exists(&desc_path).await.unwrap_or(false) {
            continue;
        }
        let description = fs::read_to_string(&desc_path)
            .await
            .with_context(|| format!("Failed to read {}", desc_path.display()))?;
        jobs.push(JobSummary {
            id: name,
            description,
        });
    }
    Ok(jobs)
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateSummary {
    pub folder: String,
    pub name: String,
    pub target_role: String,
    pub status: String,
    pub skill_count: usize,
    pub valid: bool,
    pub issues: Vec<String>,
}

/// Candidates that applied to `job`. Unreadable records are logged and
/// skipped; a job without applications yields an empty list.
pub async fn list_candidates(
    data_dir: &Path,
    job: &str,
    record_file: &str,
) -> Result<Vec<CandidateSummary>> {
    let applications = data_dir.join(job).join(APPLICATIONS_DIR);
    if !fs::try_exists(&applications).await.unwrap_or(false) {
        return Ok(Vec::new());
    }

    let folders = scan_candidates(job, &applications, record_file)
        .await
        .with_context(|| format!("Failed to read {}", applications.display()))?;

    let mut summaries = Vec::new();
    for folder in folders.into_iter().filter(|f| f.has_record) {
        let raw = match read_record(&folder.record_path).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Skipping {}: {e}", folder.key);
                continue;
            }
        };
        let report = validate_structure(&raw.value);
        let app = normalize(&raw.value);
        summaries.push(CandidateSummary {
            folder: folder.key.candidate,
            name: app.personal_info.full_name(),
            target_role: app.target_role,
            status: app.status,
            skill_count: app.skills.total(),
            valid: report.valid,
            issues: report.issues,
        });
    }
    Ok(summaries)
}
