use crate::config::GameFiles;
use crate::domain::{ConversionChoice, ConversionResult};
use crate::error::Result;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

pub struct ConversionEngine;

impl ConversionEngine {
    /// Clears `target_dir` and restores the save from `backup_dir` under the
    /// target format's extension.
    ///
    /// The order is fixed: every unprotected regular file in `file_names` is
    /// deleted first, then the primary save and its `.bak` companion are
    /// copied back from the backup. Copy outcomes are recorded in the result
    /// rather than returned as errors.
    pub async fn convert(
        target_dir: &Path,
        backup_dir: &Path,
        file_names: &[String],
        choice: ConversionChoice,
    ) -> Result<ConversionResult> {
        let removed = clear_directory(target_dir, file_names).await?;
        info!("Cleared {} file(s) from {}", removed, target_dir.display());

        let from = choice.source();
        let to = choice.target();

        let main_converted = restore_file(
            &backup_dir.join(from.save_file_name()),
            &target_dir.join(to.save_file_name()),
        )
        .await;
        let bak_converted = restore_file(
            &backup_dir.join(from.companion_file_name()),
            &target_dir.join(to.companion_file_name()),
        )
        .await;

        info!(
            "Converted {}: main={} bak={}",
            choice, main_converted, bak_converted
        );

        Ok(ConversionResult {
            main_converted,
            bak_converted,
            from_ext: from.extension(),
            to_ext: to.extension(),
        })
    }
}

pub fn is_protected(name: &str) -> bool {
    GameFiles::PROTECTED_FILES.contains(&name)
}

async fn clear_directory(target_dir: &Path, file_names: &[String]) -> Result<usize> {
    let mut removed = 0;

    for name in file_names.iter().filter(|name| !is_protected(name)) {
        let path = target_dir.join(name);
        let metadata = match fs::symlink_metadata(&path).await {
            Ok(metadata) => metadata,
            // Already gone, e.g. a repeated run against the same listing.
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(e.into()),
        };

        if metadata.is_file() {
            fs::remove_file(&path).await?;
            debug!("Removed {}", name);
            removed += 1;
        }
    }

    Ok(removed)
}

async fn restore_file(src: &Path, dest: &Path) -> bool {
    match fs::copy(src, dest).await {
        Ok(_) => true,
        Err(e) => {
            debug!("Could not copy {} -> {}: {}", src.display(), dest.display(), e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SaveFormat;
    use crate::services::backup::BackupManager;
    use crate::services::locator::list_file_names;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    async fn setup(files: &[(&str, &str)]) -> (TempDir, PathBuf, PathBuf, Vec<String>) {
        let root = tempdir().unwrap();
        let target = root.path().join("76561198000000000");
        std::fs::create_dir(&target).unwrap();
        for (name, content) in files {
            std::fs::write(target.join(name), content).unwrap();
        }

        let listing = list_file_names(&target).await.unwrap();
        let backup = BackupManager::new(false)
            .backup(&target, None, &listing)
            .await
            .unwrap();
        (root, target, backup, listing)
    }

    #[tokio::test]
    async fn test_steam_to_coop_with_companion() {
        let (_root, target, backup, listing) =
            setup(&[("NR0000.sl2", "main"), ("NR0000.sl2.bak", "companion")]).await;

        let result = ConversionEngine::convert(
            &target,
            &backup,
            &listing,
            ConversionChoice::into_format(SaveFormat::Coop),
        )
        .await
        .unwrap();

        assert!(result.main_converted);
        assert!(result.bak_converted);
        assert_eq!(result.from_ext, ".sl2");
        assert_eq!(result.to_ext, ".co2");
        assert_eq!(
            list_file_names(&target).await.unwrap(),
            vec!["NR0000.co2", "NR0000.co2.bak"]
        );
        assert_eq!(std::fs::read(target.join("NR0000.co2")).unwrap(), b"main");
        assert_eq!(
            std::fs::read(target.join("NR0000.co2.bak")).unwrap(),
            b"companion"
        );
    }

    #[tokio::test]
    async fn test_protected_file_survives_and_missing_companion_is_benign() {
        let (_root, target, backup, listing) =
            setup(&[("NR0000.sl2", "main"), ("steam_autocloud.vdf", "cloud")]).await;

        let result = ConversionEngine::convert(
            &target,
            &backup,
            &listing,
            ConversionChoice::into_format(SaveFormat::Coop),
        )
        .await
        .unwrap();

        assert!(result.main_converted);
        assert!(!result.bak_converted);
        assert_eq!(
            list_file_names(&target).await.unwrap(),
            vec!["NR0000.co2", "steam_autocloud.vdf"]
        );
        assert_eq!(
            std::fs::read(target.join("steam_autocloud.vdf")).unwrap(),
            b"cloud"
        );
    }

    #[tokio::test]
    async fn test_convert_twice_is_idempotent() {
        let (_root, target, backup, listing) = setup(&[
            ("NR0000.co2", "coop"),
            ("NR0000.sl2", "old steam"),
            ("steam_autocloud.vdf", "cloud"),
        ])
        .await;
        let choice = ConversionChoice::into_format(SaveFormat::Steam);

        let first = ConversionEngine::convert(&target, &backup, &listing, choice)
            .await
            .unwrap();
        let after_first = list_file_names(&target).await.unwrap();
        let second = ConversionEngine::convert(&target, &backup, &listing, choice)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(list_file_names(&target).await.unwrap(), after_first);
        assert_eq!(after_first, vec!["NR0000.sl2", "steam_autocloud.vdf"]);
        assert_eq!(std::fs::read(target.join("NR0000.sl2")).unwrap(), b"coop");
        assert!(target.join("steam_autocloud.vdf").exists());
    }

    #[tokio::test]
    async fn test_missing_primary_is_reported_not_raised() {
        let (_root, target, backup, listing) = setup(&[("NR0000.sl2", "main")]).await;

        let result = ConversionEngine::convert(
            &target,
            &backup,
            &listing,
            ConversionChoice::into_format(SaveFormat::Steam),
        )
        .await
        .unwrap();

        assert!(!result.main_converted);
        assert!(!result.bak_converted);
        // the backup still holds the original for recovery
        assert_eq!(std::fs::read(backup.join("NR0000.sl2")).unwrap(), b"main");
    }

    #[test]
    fn test_protected_list() {
        assert!(is_protected("steam_autocloud.vdf"));
        assert!(!is_protected("NR0000.sl2"));
    }
}
