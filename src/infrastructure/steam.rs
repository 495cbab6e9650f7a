//! Steam library lookup for the game install directory.

use crate::config::GameFiles;
use std::path::PathBuf;
use tracing::debug;

/// Folder holding `start_protected_game.exe`, found through every Steam
/// library folder.
pub fn find_game_dir() -> Option<PathBuf> {
    let steam_dir = match steamlocate::SteamDir::locate() {
        Ok(dir) => dir,
        Err(e) => {
            debug!("Steam installation not found: {}", e);
            return None;
        }
    };

    let (app, library) = steam_dir
        .find_app(GameFiles::STEAM_APP_ID)
        .ok()
        .flatten()?;
    let path = library.resolve_app_dir(&app).join(GameFiles::GAME_SUBDIR);
    debug!("Steam reports game directory {}", path.display());

    path.is_dir().then_some(path)
}
