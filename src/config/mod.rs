use crate::config::cli::Args;
use crate::error::{ManagerError, Result};
use std::path::PathBuf;
use tracing::debug;

pub(crate) mod cli;

/// Fixed names the game and the co-op mod use on disk.
pub struct GameFiles;

impl GameFiles {
    pub const SAVE_FOLDER: &'static str = "Nightreign";
    pub const BASE_SAVE_NAME: &'static str = "NR0000";
    pub const PROTECTED_FILES: &'static [&'static str] = &["steam_autocloud.vdf"];

    pub const ORIGINAL_LAUNCHER: &'static str = "start_protected_game.exe";
    pub const BACKUP_LAUNCHER: &'static str = "start_protected_game_original.exe";
    pub const COOP_LAUNCHER: &'static str = "NRSC_launcher.exe";

    pub const BACKUP_PREFIX: &'static str = "backup_";
    pub const BACKUP_MANIFEST: &'static str = "backup_manifest.json";

    pub const STEAM_APP_ID: u32 = 2622380;
    pub const GAME_SUBDIR: &'static str = "Game";
    pub const MOD_PAGE_URL: &'static str =
        "https://www.nexusmods.com/eldenringnightreign/mods/3";
}

/// Sandbox layout used by `--test`.
pub struct SandboxKeys;

impl SandboxKeys {
    pub const SAVES_DIR: &'static str = "test-saves";
    pub const GAME_DIR: &'static str = "test-game";
    pub const MOCK_STEAM_ID: &'static str = "123456789";
}

pub struct Config {
    pub args: Args,
    work_dir: PathBuf,
}

impl Config {
    pub fn new(args: Args) -> Result<Self> {
        let work_dir = std::env::current_dir()?;
        debug!("Working directory: {}", work_dir.display());
        Ok(Self { args, work_dir })
    }

    pub fn is_sandbox(&self) -> bool {
        self.args.test
    }

    /// Directory that holds the per-install save folders.
    pub fn save_root(&self) -> Result<PathBuf> {
        if self.is_sandbox() {
            return Ok(self.work_dir.join(SandboxKeys::SAVES_DIR));
        }

        match &self.args.appdata_dir {
            Some(base) => Ok(base.join(GameFiles::SAVE_FOLDER)),
            None => Err(ManagerError::DirectoryNotFound(
                "APPDATA environment variable not set. Are you on Windows?".to_string(),
            )),
        }
    }

    pub fn sandbox_game_dir(&self) -> PathBuf {
        self.work_dir.join(SandboxKeys::GAME_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_save_root_from_appdata() {
        let args = Args::parse_from(["save-manager", "--appdata-dir", "/tmp/appdata"]);
        let config = Config::new(args).unwrap();
        assert_eq!(
            config.save_root().unwrap(),
            PathBuf::from("/tmp/appdata").join("Nightreign")
        );
    }

    #[test]
    fn test_sandbox_overrides_appdata() {
        let args = Args::parse_from([
            "save-manager",
            "--test",
            "--appdata-dir",
            "/tmp/appdata",
        ]);
        let config = Config::new(args).unwrap();
        assert!(config.save_root().unwrap().ends_with(SandboxKeys::SAVES_DIR));
        assert!(config.sandbox_game_dir().ends_with(SandboxKeys::GAME_DIR));
    }
}
