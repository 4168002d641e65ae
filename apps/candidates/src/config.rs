use std::path::PathBuf;

use anyhow::Result;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_RECORD_FILE: &str = "generalInformation.json";
pub const DEFAULT_BACKUP_SUFFIX: &str = ".backup";
pub const APPLICATIONS_DIR: &str = "applications";
pub const JOB_DESCRIPTION_FILE: &str = "jobDescription.txt";

/// Tool configuration loaded from environment variables (and `.env`).
/// Every value has a default; CLI flags override these.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub record_file: String,
    pub backup_suffix: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let backup_suffix = env_or("CANDIDATES_BACKUP_SUFFIX", DEFAULT_BACKUP_SUFFIX);
        if backup_suffix.is_empty() {
            anyhow::bail!("CANDIDATES_BACKUP_SUFFIX must not be empty");
        }

        Ok(Config {
            data_dir: PathBuf::from(env_or("CANDIDATES_DATA_DIR", DEFAULT_DATA_DIR)),
            record_file: env_or("CANDIDATES_RECORD_FILE", DEFAULT_RECORD_FILE),
            backup_suffix,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    pub fn with_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.data_dir = dir;
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            record_file: DEFAULT_RECORD_FILE.to_string(),
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
            rust_log: "info".to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
