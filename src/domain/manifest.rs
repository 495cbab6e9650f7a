use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Written last into a backup directory; its presence marks the backup as
/// complete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupManifest {
    pub created_at: String,
    pub source_dir: PathBuf,
    pub install_id: Option<String>,
    pub total_files: usize,
    pub files: Vec<String>,
    pub version: String,
}

impl BackupManifest {
    pub fn new(source_dir: PathBuf, install_id: Option<String>, files: Vec<String>) -> Self {
        Self {
            created_at: Local::now().to_rfc3339(),
            source_dir,
            install_id,
            total_files: files.len(),
            files,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
