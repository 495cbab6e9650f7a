use crate::config::GameFiles;
use crate::domain::BackupManifest;
use crate::error::{ManagerError, Result};
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

pub struct BackupManager {
    show_progress: bool,
}

impl BackupManager {
    pub fn new(show_progress: bool) -> Self {
        Self { show_progress }
    }

    /// Copies every regular file named in `file_names` from `target_dir` into a
    /// fresh `backup_<timestamp>` directory next to it.
    ///
    /// Returns the backup path only once every copy and the manifest have been
    /// written. Any failure comes back as [`ManagerError::BackupFailed`].
    pub async fn backup(
        &self,
        target_dir: &Path,
        install_id: Option<&str>,
        file_names: &[String],
    ) -> Result<PathBuf> {
        let backup_root = target_dir.parent().ok_or_else(|| {
            ManagerError::BackupFailed(format!("{} has no parent directory", target_dir.display()))
        })?;

        let backup_dir = create_backup_dir(backup_root, Utc::now())
            .await
            .map_err(|e| ManagerError::BackupFailed(format!("creating backup directory: {}", e)))?;
        info!("Created backup directory {}", backup_dir.display());

        let pb = self.progress_bar(file_names.len() as u64)?;
        let mut copied = Vec::with_capacity(file_names.len());

        for name in file_names {
            pb.set_message(name.clone());
            if let Err(e) = copy_regular_file(target_dir, &backup_dir, name, &mut copied).await {
                pb.abandon();
                warn!(
                    "Backup {} is incomplete and has no manifest",
                    backup_dir.display()
                );
                return Err(ManagerError::BackupFailed(format!("{}: {}", name, e)));
            }
            pb.inc(1);
        }

        let manifest = BackupManifest::new(
            target_dir.to_path_buf(),
            install_id.map(str::to_string),
            copied,
        );
        let content = serde_json::to_string_pretty(&manifest)?;
        fs::write(backup_dir.join(GameFiles::BACKUP_MANIFEST), content)
            .await
            .map_err(|e| ManagerError::BackupFailed(format!("writing manifest: {}", e)))?;

        pb.finish_and_clear();
        info!(
            "Backed up {} file(s) to {}",
            manifest.total_files,
            backup_dir.display()
        );
        Ok(backup_dir)
    }

    /// A backup counts as complete only when its manifest exists and parses.
    pub async fn is_complete(backup_dir: &Path) -> bool {
        match fs::read_to_string(backup_dir.join(GameFiles::BACKUP_MANIFEST)).await {
            Ok(content) => serde_json::from_str::<BackupManifest>(&content).is_ok(),
            Err(_) => false,
        }
    }

    fn progress_bar(&self, len: u64) -> Result<ProgressBar> {
        if !self.show_progress {
            return Ok(ProgressBar::hidden());
        }

        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[backup] {bar:30.cyan/blue} {pos}/{len} {msg}")
                .map_err(|e| ManagerError::Other(e.to_string()))?,
        );
        Ok(pb)
    }
}

/// Lexically sortable, with `:` and `.` replaced so the name is valid on
/// Windows.
pub fn backup_dir_name(now: DateTime<Utc>) -> String {
    let stamp = now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
    format!(
        "{}{}",
        GameFiles::BACKUP_PREFIX,
        stamp.replace([':', '.'], "-")
    )
}

async fn create_backup_dir(backup_root: &Path, now: DateTime<Utc>) -> std::io::Result<PathBuf> {
    let base = backup_dir_name(now);
    let mut candidate = backup_root.join(&base);
    let mut attempt = 1;

    loop {
        match fs::create_dir(&candidate).await {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                candidate = backup_root.join(format!("{}_{}", base, attempt));
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn copy_regular_file(
    target_dir: &Path,
    backup_dir: &Path,
    name: &str,
    copied: &mut Vec<String>,
) -> std::io::Result<()> {
    let src = target_dir.join(name);
    let metadata = fs::symlink_metadata(&src).await?;
    if !metadata.is_file() {
        debug!("Skipping {} (not a regular file)", name);
        return Ok(());
    }

    let written = fs::copy(&src, backup_dir.join(name)).await?;
    if written != metadata.len() {
        return Err(std::io::Error::new(
            ErrorKind::WriteZero,
            format!("copied {} of {} bytes", written, metadata.len()),
        ));
    }

    copied.push(name.to_string());
    Ok(())
}
