use super::SaveFormat;
use std::path::{Path, PathBuf};

/// Which top-level flow this invocation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Standalone,
    /// This executable sits in place of the game's launcher.
    Launcher,
}

/// Paths resolved once from the running executable's own location.
#[derive(Debug, Clone)]
pub struct LauncherContext {
    pub game_dir: PathBuf,
    pub exe_path: PathBuf,
    pub original_launcher_path: PathBuf,
    pub coop_launcher_path: PathBuf,
    pub has_coop_launcher: bool,
}

impl LauncherContext {
    pub fn target_path(&self, target: LaunchTarget) -> &Path {
        match target {
            LaunchTarget::Classic => &self.original_launcher_path,
            LaunchTarget::SeamlessCoop => &self.coop_launcher_path,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchTarget {
    Classic,
    SeamlessCoop,
}

impl LaunchTarget {
    /// Save format the launched executable reads.
    pub fn required_format(self) -> SaveFormat {
        match self {
            LaunchTarget::Classic => SaveFormat::Steam,
            LaunchTarget::SeamlessCoop => SaveFormat::Coop,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LaunchTarget::Classic => "Classic Nightreign",
            LaunchTarget::SeamlessCoop => "Seamless Coop",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub success: bool,
    pub game_dir: PathBuf,
    pub original_renamed: bool,
    pub exe_copied: bool,
    pub coop_launcher_detected: bool,
    pub failed_step: Option<String>,
    /// Error raised by the failed step.
    pub error: Option<String>,
    /// `None` when nothing had to be rolled back.
    pub rollback_succeeded: Option<bool>,
    pub rollback_problems: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UninstallReport {
    pub success: bool,
    pub game_dir: PathBuf,
    pub replacement_deleted: bool,
    pub original_restored: bool,
    pub failed_step: Option<String>,
    pub error: Option<String>,
}
