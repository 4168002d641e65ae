use std::path::PathBuf;

use thiserror::Error;

/// Per-record failure. Never stops a batch; the runner records it and moves on.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Record in {path} is not a JSON object (found {found})")]
    NotAnObject { path: PathBuf, found: &'static str },

    #[error("Failed to serialize normalized record for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl MigrationError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MigrationError::Io {
            path: path.into(),
            source,
        }
    }

    /// Short machine-readable code used in JSON reports.
    pub fn code(&self) -> &'static str {
        match self {
            MigrationError::Io { .. } => "IO_ERROR",
            MigrationError::Parse { .. } => "PARSE_ERROR",
            MigrationError::NotAnObject { .. } => "NOT_AN_OBJECT",
            MigrationError::Serialize { .. } => "SERIALIZE_ERROR",
        }
    }
}

/// JSON type name for error messages.
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
