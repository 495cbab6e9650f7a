use crate::domain::ZipCandidate;
use crate::error::{ManagerError, Result};
use chrono::{DateTime, Local};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::fs;
use tracing::{debug, info};

/// Archives older than this are not offered from the Downloads folder.
pub const RECENT_DOWNLOAD_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

pub struct DownloadClient {
    client: Client,
}

impl DownloadClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Downloads `url` to `dest`, returning the number of bytes written.
    pub async fn download_to(&self, url: &str, dest: &Path) -> Result<u64> {
        info!("Downloading {}", url);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ManagerError::ModInstallFailed(format!(
                "download failed: HTTP {}",
                response.status()
            )));
        }

        let bytes = response.bytes().await?;
        fs::write(dest, &bytes).await?;
        info!("Saved {} bytes to {}", bytes.len(), dest.display());
        Ok(bytes.len() as u64)
    }
}

pub fn downloads_dir() -> Option<PathBuf> {
    dirs::download_dir()
}

/// `.zip` files in `directory` modified within `max_age`, newest first.
///
/// An unreadable directory yields no candidates.
pub async fn scan_for_zip_files(directory: &Path, max_age: Duration) -> Vec<ZipCandidate> {
    let mut entries = match fs::read_dir(directory).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Cannot read {}: {}", directory.display(), e);
            return Vec::new();
        }
    };

    let now = SystemTime::now();
    let mut candidates = Vec::new();

    while let Ok(Some(entry)) = entries.next_entry().await {
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !file_name.to_lowercase().ends_with(".zip") {
            continue;
        }

        let Ok(metadata) = entry.metadata().await else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }
        let Ok(modified) = metadata.modified() else {
            continue;
        };
        let age = now.duration_since(modified).unwrap_or_default();
        if age > max_age {
            continue;
        }

        candidates.push(ZipCandidate {
            file_name,
            full_path: entry.path(),
            modified: DateTime::<Local>::from(modified),
            size_bytes: metadata.len(),
        });
    }

    candidates.sort_by(|a, b| b.modified.cmp(&a.modified));
    candidates
}
