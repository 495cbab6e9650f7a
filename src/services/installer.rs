use crate::config::GameFiles;
use crate::domain::{InstallReport, UninstallReport};
use crate::services::transaction::{CopyFile, RemoveFile, RenameFile, RequireFile, Transaction};
use std::path::Path;
use tracing::info;

const STEP_BACKUP_ORIGINAL: &str = "back up original launcher";
const STEP_COPY_SELF: &str = "install save manager as launcher";
const STEP_CHECK_BACKUP: &str = "find backed up original launcher";
const STEP_REMOVE_REPLACEMENT: &str = "remove save manager launcher";
const STEP_RESTORE_ORIGINAL: &str = "restore original launcher";

pub struct LauncherInstaller;

impl LauncherInstaller {
    /// Moves the game's launcher aside and puts `self_exe` in its place.
    ///
    /// If the copy fails the original launcher is renamed back.
    pub fn install(game_dir: &Path, self_exe: &Path) -> InstallReport {
        let original = game_dir.join(GameFiles::ORIGINAL_LAUNCHER);
        let backup = game_dir.join(GameFiles::BACKUP_LAUNCHER);
        let coop_launcher_detected = game_dir.join(GameFiles::COOP_LAUNCHER).is_file();

        info!("Installing {} into {}", self_exe.display(), game_dir.display());
        let report = Transaction::new()
            .step(RenameFile::new(STEP_BACKUP_ORIGINAL, &original, &backup))
            .step(CopyFile::new(STEP_COPY_SELF, self_exe, &original))
            .run();

        InstallReport {
            success: report.succeeded(),
            game_dir: game_dir.to_path_buf(),
            original_renamed: report.is_in_effect(STEP_BACKUP_ORIGINAL),
            exe_copied: report.is_in_effect(STEP_COPY_SELF),
            coop_launcher_detected,
            failed_step: report.failed_step().map(str::to_string),
            error: report.failure_message(),
            rollback_succeeded: report.rollback_succeeded(),
            rollback_problems: report.rollback_problems(),
        }
    }

    /// Deletes the installed copy and renames the original launcher back.
    ///
    /// Nothing is deleted unless the backed up original is present. The
    /// delete cannot be undone, so a failed restore leaves the game
    /// directory without a launcher; the report says so.
    pub fn uninstall(game_dir: &Path) -> UninstallReport {
        let original = game_dir.join(GameFiles::ORIGINAL_LAUNCHER);
        let backup = game_dir.join(GameFiles::BACKUP_LAUNCHER);

        info!("Uninstalling from {}", game_dir.display());
        let report = Transaction::new()
            .step(RequireFile::new(STEP_CHECK_BACKUP, &backup))
            .step(RemoveFile::new(STEP_REMOVE_REPLACEMENT, &original))
            .step(RenameFile::new(STEP_RESTORE_ORIGINAL, &backup, &original))
            .run();

        UninstallReport {
            success: report.succeeded(),
            game_dir: game_dir.to_path_buf(),
            replacement_deleted: report.is_in_effect(STEP_REMOVE_REPLACEMENT),
            original_restored: report.is_in_effect(STEP_RESTORE_ORIGINAL),
            failed_step: report.failed_step().map(str::to_string),
            error: report.failure_message(),
        }
    }
}
