use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManagerError {
    #[error("Save directory not found: {0}")]
    DirectoryNotFound(String),
    #[error("Could not find any Steam ID folder (numbers) inside {}", .0.display())]
    NoInstallFound(PathBuf),
    #[error("No save files (.sl2 or .co2) found in {}", .0.display())]
    NoSaveFiles(PathBuf),
    #[error("Cannot convert: {0}")]
    ConversionPrecondition(String),
    #[error("Backup failed, nothing was changed: {0}")]
    BackupFailed(String),
    #[error("Save file {0} was not found in the backup")]
    MainSaveMissing(String),
    #[error("Installation failed at step '{step}' (rolled back: {rolled_back})")]
    InstallTransactionFailed { step: String, rolled_back: bool },
    #[error("Uninstallation failed at step '{step}'")]
    UninstallTransactionFailed { step: String },
    #[error("Launcher not found: {}. Please install the Seamless Coop mod first", .0.display())]
    LauncherMissing(PathBuf),
    #[error("Mod installation failed: {0}")]
    ModInstallFailed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("{0}")]
    Other(String),
}

impl ManagerError {
    /// Process exit code for this error.
    ///
    /// `1` covers environment and precondition problems where nothing was
    /// touched, `2` covers operations that stopped partway, `3` is everything
    /// else.
    pub fn exit_code(&self) -> u8 {
        match self {
            ManagerError::DirectoryNotFound(_)
            | ManagerError::NoInstallFound(_)
            | ManagerError::NoSaveFiles(_)
            | ManagerError::ConversionPrecondition(_)
            | ManagerError::BackupFailed(_)
            | ManagerError::LauncherMissing(_) => 1,
            ManagerError::MainSaveMissing(_)
            | ManagerError::InstallTransactionFailed { .. }
            | ManagerError::UninstallTransactionFailed { .. }
            | ManagerError::ModInstallFailed(_) => 2,
            _ => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, ManagerError>;
