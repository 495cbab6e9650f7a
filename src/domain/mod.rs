mod launcher;
mod manifest;
mod mod_install;
mod save;

pub use launcher::{
    AppMode, InstallReport, LaunchTarget, LauncherContext, UninstallReport,
};
pub use manifest::BackupManifest;
pub use mod_install::{ModInstallReport, ModSource, ZipCandidate};
pub use save::{ConversionChoice, ConversionResult, SaveDirectoryState, SaveFormat};
