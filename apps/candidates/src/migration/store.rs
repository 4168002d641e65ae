//! Persistence sink: backup the original bytes, then overwrite with the
//! normalized record.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::errors::MigrationError;
use crate::models::CandidateApplication;

/// Returns `<record><suffix>`, or the first free `<record><suffix>.<n>` when
/// an earlier backup already exists. Backups are never overwritten.
pub async fn next_backup_path(record_path: &Path, suffix: &str) -> PathBuf {
    let mut base = record_path.as_os_str().to_os_string();
    base.push(suffix);
    let first = PathBuf::from(&base);
    if !fs::try_exists(&first).await.unwrap_or(false) {
        return first;
    }
    let mut n = 1u32;
    loop {
        let mut candidate = base.clone();
        candidate.push(format!(".{n}"));
        let candidate = PathBuf::from(candidate);
        if !fs::try_exists(&candidate).await.unwrap_or(false) {
            return candidate;
        }
        n += 1;
    }
}

/// Renders the record the way the files are stored: two-space pretty JSON.
pub fn render_record(
    record_path: &Path,
    record: &CandidateApplication,
) -> Result<String, MigrationError> {
    serde_json::to_string_pretty(record).map_err(|source| MigrationError::Serialize {
        path: record_path.to_path_buf(),
        source,
    })
}

/// Writes a durable backup of `original` and then the normalized record.
/// The record is rendered before anything touches disk, so a serialization
/// failure leaves both files alone.
pub async fn write_with_backup(
    record_path: &Path,
    original: &[u8],
    record: &CandidateApplication,
    backup_suffix: &str,
) -> Result<PathBuf, MigrationError> {
    let rendered = render_record(record_path, record)?;

    let backup_path = next_backup_path(record_path, backup_suffix).await;
    write_synced(&backup_path, original).await?;
    info!("Backup saved: {}", backup_path.display());

    write_synced(record_path, rendered.as_bytes()).await?;
    Ok(backup_path)
}

async fn write_synced(path: &Path, contents: &[u8]) -> Result<(), MigrationError> {
    let mut file = fs::File::create(path)
        .await
        .map_err(|e| MigrationError::io(path, e))?;
    file.write_all(contents)
        .await
        .map_err(|e| MigrationError::io(path, e))?;
    file.sync_all()
        .await
        .map_err(|e| MigrationError::io(path, e))?;
    Ok(())
}
