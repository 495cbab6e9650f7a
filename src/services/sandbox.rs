//! Throwaway save and game directories for `--test` runs.

use crate::config::{GameFiles, SandboxKeys};
use crate::domain::SaveFormat;
use crate::error::Result;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Seeds `save_root/<mock id>` with one mock save per format, keeping any
/// that already exist. Returns whether anything was created.
pub async fn create_test_environment(save_root: &Path) -> Result<bool> {
    let install_dir = save_root.join(SandboxKeys::MOCK_STEAM_ID);
    fs::create_dir_all(&install_dir).await?;

    let mut created = false;
    for format in SaveFormat::ALL {
        let path = install_dir.join(format.save_file_name());
        if !fs::try_exists(&path).await? {
            let content = format!("mock-{}-save-data", format.label().to_lowercase());
            fs::write(&path, content).await?;
            created = true;
        }
    }

    info!("Test environment ready in {}", install_dir.display());
    Ok(created)
}

/// Creates `game_dir` with a mock launcher unless the launcher (or its
/// renamed original) is already there.
pub async fn create_test_game_directory(game_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(game_dir).await?;

    let launcher = game_dir.join(GameFiles::ORIGINAL_LAUNCHER);
    let backup = game_dir.join(GameFiles::BACKUP_LAUNCHER);
    if !fs::try_exists(&launcher).await? && !fs::try_exists(&backup).await? {
        fs::write(&launcher, "mock-launcher").await?;
        info!("Created mock launcher {}", launcher.display());
    }

    Ok(game_dir.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::locator::SaveDirectoryLocator;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_environment_is_detectable_and_reused() {
        let dir = tempdir().unwrap();
        let save_root = dir.path().join(SandboxKeys::SAVES_DIR);

        assert!(create_test_environment(&save_root).await.unwrap());
        let state = SaveDirectoryLocator::new(&save_root)
            .detect(None)
            .await
            .unwrap();
        assert_eq!(state.install_id, SandboxKeys::MOCK_STEAM_ID);
        assert!(state.has_steam_save && state.has_coop_save);

        std::fs::write(state.target_dir.join("NR0000.sl2"), b"played").unwrap();
        assert!(!create_test_environment(&save_root).await.unwrap());
        assert_eq!(
            std::fs::read(state.target_dir.join("NR0000.sl2")).unwrap(),
            b"played"
        );
    }

    #[tokio::test]
    async fn test_game_directory_keeps_installed_state() {
        let dir = tempdir().unwrap();
        let game = dir.path().join(SandboxKeys::GAME_DIR);

        create_test_game_directory(&game).await.unwrap();
        assert!(game.join(GameFiles::ORIGINAL_LAUNCHER).is_file());

        std::fs::rename(
            game.join(GameFiles::ORIGINAL_LAUNCHER),
            game.join(GameFiles::BACKUP_LAUNCHER),
        )
        .unwrap();
        create_test_game_directory(&game).await.unwrap();
        assert!(!game.join(GameFiles::ORIGINAL_LAUNCHER).exists());
    }
}
