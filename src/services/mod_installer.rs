use crate::config::GameFiles;
use crate::domain::{ModInstallReport, ModSource};
use crate::error::{ManagerError, Result};
use crate::infrastructure::archive::{content_root, copy_tree, extract_zip};
use crate::infrastructure::DownloadClient;
use std::path::Path;
use tracing::{info, warn};

pub struct ModInstaller {
    downloader: DownloadClient,
    show_progress: bool,
}

impl ModInstaller {
    pub fn new(show_progress: bool) -> Result<Self> {
        Ok(Self {
            downloader: DownloadClient::new()?,
            show_progress,
        })
    }

    /// Fetches the archive if needed, extracts it to a scratch directory and
    /// copies its contents into `game_dir`.
    pub async fn install(&self, source: &ModSource, game_dir: &Path) -> ModInstallReport {
        let mut report = ModInstallReport {
            source: match source {
                ModSource::LocalZip(path) => path.display().to_string(),
                ModSource::Url(url) => url.clone(),
            },
            game_dir: game_dir.to_path_buf(),
            ..Default::default()
        };

        match self.try_install(source, game_dir).await {
            Ok(files_copied) => {
                info!("Copied {} mod file(s) into {}", files_copied, game_dir.display());
                report.success = true;
                report.files_copied = files_copied;
            }
            Err(e) => {
                warn!("Mod installation failed: {}", e);
                report.error = Some(e.to_string());
            }
        }

        report.launcher_found = game_dir.join(GameFiles::COOP_LAUNCHER).is_file();
        report
    }

    async fn try_install(&self, source: &ModSource, game_dir: &Path) -> Result<usize> {
        if !game_dir.is_dir() {
            return Err(ManagerError::DirectoryNotFound(game_dir.display().to_string()));
        }

        let scratch = tempfile::tempdir()?;
        let zip_path = match source {
            ModSource::LocalZip(path) => {
                if !path.is_file() {
                    return Err(ManagerError::ModInstallFailed(format!(
                        "{} is not a file",
                        path.display()
                    )));
                }
                path.clone()
            }
            ModSource::Url(url) => {
                let dest = scratch.path().join("mod.zip");
                self.downloader.download_to(url, &dest).await?;
                dest
            }
        };

        let extract_dir = scratch.path().join("extracted");
        let game_dir = game_dir.to_path_buf();
        let show_progress = self.show_progress;

        tokio::task::spawn_blocking(move || {
            let extracted = extract_zip(&zip_path, &extract_dir, show_progress)?;
            info!("Extracted {} file(s)", extracted);
            let root = content_root(&extract_dir)?;
            copy_tree(&root, &game_dir)
        })
        .await
        .map_err(|e| ManagerError::Other(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    #[tokio::test]
    async fn test_install_from_local_zip() {
        let dir = tempdir().unwrap();
        let zip_path = dir.path().join("Seamless Co-op.zip");
        let mut zip = ZipWriter::new(File::create(&zip_path).unwrap());
        zip.start_file("SeamlessCoop/NRSC_launcher.exe", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"launcher").unwrap();
        zip.finish().unwrap();

        let game = dir.path().join("Game");
        std::fs::create_dir(&game).unwrap();

        let installer = ModInstaller::new(false).unwrap();
        let report = installer
            .install(&ModSource::LocalZip(zip_path), &game)
            .await;

        assert!(report.success, "{:?}", report.error);
        assert_eq!(report.files_copied, 1);
        assert!(report.launcher_found);
        assert!(game.join(GameFiles::COOP_LAUNCHER).is_file());
    }

    #[tokio::test]
    async fn test_missing_zip_is_reported() {
        let dir = tempdir().unwrap();
        let installer = ModInstaller::new(false).unwrap();
        let report = installer
            .install(&ModSource::LocalZip(dir.path().join("missing.zip")), dir.path())
            .await;

        assert!(!report.success);
        assert!(!report.launcher_found);
        assert!(report.error.unwrap().contains("missing.zip"));
    }
}
