use crate::domain::SaveDirectoryState;
use crate::error::{ManagerError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Steam account folders are named by the numeric account id.
static INSTALL_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

pub struct SaveDirectoryLocator {
    save_root: PathBuf,
}

impl SaveDirectoryLocator {
    pub fn new(save_root: impl Into<PathBuf>) -> Self {
        Self {
            save_root: save_root.into(),
        }
    }

    /// All-digit child directories of the save root, sorted.
    pub async fn list_installs(&self) -> Result<Vec<String>> {
        let mut entries = fs::read_dir(&self.save_root).await.map_err(|e| {
            ManagerError::DirectoryNotFound(format!("{} ({})", self.save_root.display(), e))
        })?;

        let mut installs = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if INSTALL_ID.is_match(name) {
                    installs.push(name.to_string());
                }
            }
        }

        installs.sort();
        debug!("Found {} install folder(s)", installs.len());
        Ok(installs)
    }

    /// Resolves the install folder and reports which save formats it holds.
    ///
    /// With `install_id` unset the only install is used; when several exist
    /// the first in sorted order wins and a warning is logged.
    pub async fn detect(&self, install_id: Option<&str>) -> Result<SaveDirectoryState> {
        let installs = self.list_installs().await?;

        let install_id = match install_id {
            Some(wanted) => installs
                .iter()
                .find(|id| id.as_str() == wanted)
                .cloned()
                .ok_or_else(|| ManagerError::NoInstallFound(self.save_root.join(wanted)))?,
            None => match installs.as_slice() {
                [] => return Err(ManagerError::NoInstallFound(self.save_root.clone())),
                [only] => only.clone(),
                [first, ..] => {
                    warn!(
                        "Multiple Steam ID folders found ({}), using {}",
                        installs.join(", "),
                        first
                    );
                    first.clone()
                }
            },
        };

        let target_dir = self.save_root.join(&install_id);
        let files = list_file_names(&target_dir).await?;
        info!(
            "Detected save directory {} with {} entries",
            target_dir.display(),
            files.len()
        );

        SaveDirectoryState::from_listing(target_dir, install_id, files)
    }
}

/// Names of every entry in `dir`, sorted.
pub(crate) async fn list_file_names(dir: &Path) -> Result<Vec<String>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_root() {
        let dir = tempdir().unwrap();
        let locator = SaveDirectoryLocator::new(dir.path().join("Nightreign"));
        let err = locator.detect(None).await.unwrap_err();
        assert!(matches!(err, ManagerError::DirectoryNotFound(_)));
    }

    #[tokio::test]
    async fn test_no_numeric_folder() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("backup_2024")).unwrap();
        std::fs::create_dir(dir.path().join("12ab")).unwrap();
        std::fs::write(dir.path().join("123"), b"not a dir").unwrap();

        let locator = SaveDirectoryLocator::new(dir.path());
        let err = locator.detect(None).await.unwrap_err();
        assert!(matches!(err, ManagerError::NoInstallFound(_)));
    }

    #[tokio::test]
    async fn test_no_save_files() {
        let dir = tempdir().unwrap();
        let install = dir.path().join("76561198000000000");
        std::fs::create_dir(&install).unwrap();
        std::fs::write(install.join("steam_autocloud.vdf"), b"").unwrap();

        let locator = SaveDirectoryLocator::new(dir.path());
        let err = locator.detect(None).await.unwrap_err();
        assert!(matches!(err, ManagerError::NoSaveFiles(_)));
    }

    #[tokio::test]
    async fn test_detects_formats() {
        let dir = tempdir().unwrap();
        let install = dir.path().join("42");
        std::fs::create_dir(&install).unwrap();
        std::fs::write(install.join("NR0000.co2"), b"coop").unwrap();
        std::fs::write(install.join("NR0000.co2.bak"), b"coop-bak").unwrap();

        let state = SaveDirectoryLocator::new(dir.path())
            .detect(None)
            .await
            .unwrap();
        assert_eq!(state.install_id, "42");
        assert_eq!(state.target_dir, install);
        assert!(state.has_coop_save);
        assert!(!state.has_steam_save);
        assert_eq!(state.files, vec!["NR0000.co2", "NR0000.co2.bak"]);
    }

    #[tokio::test]
    async fn test_multiple_installs() {
        let dir = tempdir().unwrap();
        for id in ["200", "100"] {
            let install = dir.path().join(id);
            std::fs::create_dir(&install).unwrap();
            std::fs::write(install.join("NR0000.sl2"), id).unwrap();
        }

        let locator = SaveDirectoryLocator::new(dir.path());
        assert_eq!(locator.list_installs().await.unwrap(), vec!["100", "200"]);
        assert_eq!(locator.detect(None).await.unwrap().install_id, "100");
        assert_eq!(locator.detect(Some("200")).await.unwrap().install_id, "200");
        assert!(matches!(
            locator.detect(Some("300")).await,
            Err(ManagerError::NoInstallFound(_))
        ));
    }
}
