//! Export and import of `{ "config": {...}, "content": "..." }`
//!
//! Parsing is split from applying: `parse_payload` either fails with the
//! session untouched, or yields a patch and replacement content that
//! `Session::import_payload` then applies in one step.

use super::settings::{ConfigPatch, PrompterConfig, UpdateReport, ValidationError};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// File name used for exports
pub const EXPORT_FILE_NAME: &str = "teleprompter-config.json";

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("invalid configuration file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration file: {0}")]
    Shape(&'static str),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Serialize)]
struct ExportPayload<'a> {
    config: &'a PrompterConfig,
    content: &'a str,
}

/// Serialize the full (config, content) pair, two-space indented
pub fn export_payload(config: &PrompterConfig, content: &str) -> Result<String, TransferError> {
    Ok(serde_json::to_string_pretty(&ExportPayload { config, content })?)
}

/// A parsed payload, not yet applied
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ImportPayload {
    pub patch: ConfigPatch,
    /// Config fields present but unusable
    pub errors: Vec<ValidationError>,
    pub content: Option<String>,
}

/// What an applied import changed
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ImportOutcome {
    pub report: UpdateReport,
    pub content_replaced: bool,
}

pub fn parse_payload(raw: &str) -> Result<ImportPayload, TransferError> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Object(top) = value else {
        return Err(TransferError::Shape("expected a JSON object"));
    };

    let mut payload = ImportPayload::default();

    match top.get("config") {
        None | Some(Value::Null) => {}
        Some(Value::Object(config)) => {
            let (patch, errors) = ConfigPatch::from_json_object(config);
            payload.patch = patch;
            payload.errors = errors;
        }
        Some(_) => return Err(TransferError::Shape("\"config\" must be an object")),
    }

    match top.get("content") {
        None | Some(Value::Null) => {}
        Some(Value::String(text)) => payload.content = Some(text.clone()),
        Some(_) => return Err(TransferError::Shape("\"content\" must be a string")),
    }

    for key in top.keys().filter(|k| *k != "config" && *k != "content") {
        tracing::debug!("Ignoring unknown payload key {:?}", key);
    }

    Ok(payload)
}

/// Write an exported payload into `dir`, returning the file's path
pub fn write_export(dir: &Path, json: &str) -> Result<PathBuf, TransferError> {
    let path = dir.join(EXPORT_FILE_NAME);
    fs::create_dir_all(dir).map_err(|source| TransferError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    fs::write(&path, json).map_err(|source| TransferError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

pub fn read_payload_file(path: &Path) -> Result<String, TransferError> {
    fs::read_to_string(path).map_err(|source| TransferError::Io {
        path: path.to_path_buf(),
        source,
    })
}
