use crate::config::GameFiles;
use crate::domain::{AppMode, LauncherContext};
use crate::error::{ManagerError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Launcher mode iff the renamed original launcher sits beside `exe_dir`.
pub fn detect_mode(exe_dir: &Path) -> AppMode {
    let backup = exe_dir.join(GameFiles::BACKUP_LAUNCHER);
    let mode = if backup.is_file() {
        AppMode::Launcher
    } else {
        AppMode::Standalone
    };
    debug!("{} -> {:?}", backup.display(), mode);
    mode
}

pub fn launcher_context(exe_path: PathBuf) -> Result<LauncherContext> {
    let game_dir = exe_path
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            ManagerError::DirectoryNotFound(format!(
                "no parent directory for {}",
                exe_path.display()
            ))
        })?;
    let coop_launcher_path = game_dir.join(GameFiles::COOP_LAUNCHER);

    Ok(LauncherContext {
        original_launcher_path: game_dir.join(GameFiles::BACKUP_LAUNCHER),
        has_coop_launcher: coop_launcher_path.is_file(),
        coop_launcher_path,
        game_dir,
        exe_path,
    })
}
