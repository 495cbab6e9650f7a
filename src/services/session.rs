use crate::config::{Config, GameFiles};
use crate::domain::{
    ConversionChoice, ConversionResult, LaunchTarget, LauncherContext, ModSource,
    SaveDirectoryState,
};
use crate::error::{ManagerError, Result};
use crate::infrastructure::{download, process, steam};
use crate::services::backup::BackupManager;
use crate::services::conversion::ConversionEngine;
use crate::services::installer::LauncherInstaller;
use crate::services::locator::SaveDirectoryLocator;
use crate::services::mod_installer::ModInstaller;
use crate::services::sandbox;
use crate::ui::{console, MenuItem, Prompter};
use chrono::Local;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StandaloneAction {
    CopySaves,
    Install,
    Uninstall,
    DownloadCoop,
}

/// Conversion needed before starting `target`, if any: only when the format
/// it reads is missing and the other one is present.
pub fn plan_launch(state: &SaveDirectoryState, target: LaunchTarget) -> Option<ConversionChoice> {
    let needed = target.required_format();
    (!state.has(needed) && state.has(needed.other())).then(|| ConversionChoice::into_format(needed))
}

/// One run of the tool: the selected flow plus the prompts it needs.
pub struct Session {
    config: Config,
    self_exe: PathBuf,
    prompt: Prompter,
    backups: BackupManager,
}

impl Session {
    pub fn new(config: Config, self_exe: PathBuf) -> Self {
        Self {
            config,
            self_exe,
            prompt: Prompter::new(),
            backups: BackupManager::new(true),
        }
    }

    pub async fn run_standalone(&mut self) -> Result<()> {
        if let Some(choice) = self.config.args.conversion_choice() {
            return self.copy_saves(Some(choice)).await;
        }

        let options = [
            MenuItem::new(
                "Copy savegames (convert between Steam/Coop)",
                StandaloneAction::CopySaves,
            ),
            MenuItem::new("Install Save Manager as game launcher", StandaloneAction::Install),
            MenuItem::new(
                "Uninstall Save Manager from game launcher",
                StandaloneAction::Uninstall,
            ),
            MenuItem::new(
                "Download & Install Seamless Co-op",
                StandaloneAction::DownloadCoop,
            ),
        ];

        let Some(action) = self
            .prompt
            .select("What would you like to do?", &options)
            .await?
        else {
            return Ok(());
        };

        match action {
            StandaloneAction::CopySaves => self.copy_saves(None).await,
            StandaloneAction::Install => self.install().await,
            StandaloneAction::Uninstall => self.uninstall().await,
            StandaloneAction::DownloadCoop => self.download_coop().await,
        }
    }

    /// Returns `true` once the game has been started.
    pub async fn run_launcher(
        &mut self,
        context: &LauncherContext,
        forwarded_args: &[OsString],
    ) -> Result<bool> {
        info!(
            "Running as {} in {}",
            context.exe_path.display(),
            context.game_dir.display()
        );
        let state = self.detect_saves(false).await?;
        console::info(&format!(
            "[+] Save directory detected: {}\n",
            state.install_id
        ));

        let coop_label = if context.has_coop_launcher {
            "Seamless Coop"
        } else {
            "Seamless Coop (not installed)"
        };
        let options = [
            MenuItem::new("Classic Nightreign (Steam)", LaunchTarget::Classic),
            MenuItem::new(coop_label, LaunchTarget::SeamlessCoop),
        ];
        let Some(target) = self
            .prompt
            .select("Choose how to launch Nightreign:", &options)
            .await?
        else {
            return Ok(false);
        };

        if target == LaunchTarget::SeamlessCoop && !context.has_coop_launcher {
            return Err(ManagerError::LauncherMissing(
                context.coop_launcher_path.clone(),
            ));
        }

        match plan_launch(&state, target) {
            Some(choice) => {
                console::info(&format!("[+] Converting saves: {}\n", choice));
                self.backup_and_convert(&state, choice).await?;
            }
            None => console::info(
                "[+] Save files already in the correct format. No conversion needed.",
            ),
        }

        console::info(&format!("\n[+] Launching {}...", target.label()));
        process::launch_detached(context.target_path(target), forwarded_args)?;
        Ok(true)
    }

    async fn copy_saves(&mut self, preselected: Option<ConversionChoice>) -> Result<()> {
        let state = self.detect_saves(preselected.is_none()).await?;
        console::info(&format!(
            "[+] Save directory detected: {}\n",
            state.install_id
        ));

        let choice = match preselected {
            Some(choice) => {
                state.validate(choice)?;
                choice
            }
            None => {
                let options: Vec<_> = state
                    .available_choices()
                    .into_iter()
                    .map(|choice| MenuItem::new(choice_label(choice), choice))
                    .collect();
                match self.prompt.select("Select a conversion:", &options).await? {
                    Some(choice) => choice,
                    None => return Ok(()),
                }
            }
        };

        self.backup_and_convert(&state, choice).await?;
        console::success("\nProcess completed successfully!");
        Ok(())
    }

    async fn backup_and_convert(
        &self,
        state: &SaveDirectoryState,
        choice: ConversionChoice,
    ) -> Result<()> {
        let (backup_dir, result) = convert_with_backup(&self.backups, state, choice).await?;

        console::info(&format!(
            "[+] Backup of current state saved in: {}\n",
            backup_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        ));
        console::info(&format!(
            "[+] Previous files cleared (kept {}).",
            GameFiles::PROTECTED_FILES.join(", ")
        ));
        console::print_conversion_result(&result);

        if !result.main_converted {
            return Err(ManagerError::MainSaveMissing(format!(
                "{} (backup kept in {})",
                choice.source().save_file_name(),
                backup_dir.display()
            )));
        }
        Ok(())
    }

    async fn detect_saves(&mut self, interactive: bool) -> Result<SaveDirectoryState> {
        let save_root = self.config.save_root()?;
        if self.config.is_sandbox() {
            if sandbox::create_test_environment(&save_root).await? {
                console::success(&format!(
                    "[+] Created test environment in {}",
                    save_root.display()
                ));
            } else {
                console::info(&format!(
                    "[+] Using existing test environment in {}",
                    save_root.display()
                ));
            }
        }

        let locator = SaveDirectoryLocator::new(save_root);
        let mut install_id = self.config.args.install_id.clone();

        if install_id.is_none() && interactive {
            let installs = locator.list_installs().await?;
            if installs.len() > 1 {
                let options: Vec<_> = installs
                    .iter()
                    .map(|id| MenuItem::new(id.clone(), id.clone()))
                    .collect();
                install_id = self
                    .prompt
                    .select("Several Steam accounts have saves. Choose one:", &options)
                    .await?;
                if install_id.is_none() {
                    return Err(ManagerError::Other("No Steam account selected".to_string()));
                }
            }
        }

        locator.detect(install_id.as_deref()).await
    }

    async fn install(&mut self) -> Result<()> {
        let Some(game_dir) = self.resolve_game_dir().await? else {
            return Ok(());
        };

        let self_exe = self.self_exe.clone();
        let report =
            tokio::task::spawn_blocking(move || LauncherInstaller::install(&game_dir, &self_exe))
                .await
                .map_err(|e| ManagerError::Other(e.to_string()))?;
        console::print_install_report(&report);

        if report.success {
            Ok(())
        } else {
            Err(ManagerError::InstallTransactionFailed {
                step: report.failed_step.unwrap_or_default(),
                rolled_back: report.rollback_succeeded.unwrap_or(true),
            })
        }
    }

    async fn uninstall(&mut self) -> Result<()> {
        let Some(game_dir) = self.resolve_game_dir().await? else {
            return Ok(());
        };

        let report = tokio::task::spawn_blocking(move || LauncherInstaller::uninstall(&game_dir))
            .await
            .map_err(|e| ManagerError::Other(e.to_string()))?;
        console::print_uninstall_report(&report);

        if report.success {
            Ok(())
        } else {
            Err(ManagerError::UninstallTransactionFailed {
                step: report.failed_step.unwrap_or_default(),
            })
        }
    }

    async fn download_coop(&mut self) -> Result<()> {
        let source = match self.config.args.mod_source.as_deref() {
            Some(source) => Some(ModSource::parse(source)),
            None => self.choose_mod_source().await?,
        };
        let Some(source) = source else {
            console::error("[!] No archive provided.");
            return Ok(());
        };

        let Some(game_dir) = self.resolve_game_dir().await? else {
            return Ok(());
        };

        console::info("[+] Installing Seamless Co-op...\n");
        let installer = ModInstaller::new(true)?;
        let report = installer.install(&source, &game_dir).await;
        console::print_mod_install_report(&report);

        if report.success {
            Ok(())
        } else {
            Err(ManagerError::ModInstallFailed(
                report.error.unwrap_or_default(),
            ))
        }
    }

    async fn choose_mod_source(&mut self) -> Result<Option<ModSource>> {
        console::info("[+] Opening NexusMods page for Seamless Co-op...\n");
        if process::open_url(GameFiles::MOD_PAGE_URL) {
            console::info(&format!("    URL: {}", GameFiles::MOD_PAGE_URL));
        } else {
            console::warning("[!] Could not open browser. Please visit this URL manually:");
            console::info(&format!("    {}", GameFiles::MOD_PAGE_URL));
        }
        self.prompt
            .pause("\nPress Enter after downloading the mod zip file...")
            .await?;

        let candidates = match download::downloads_dir() {
            Some(dir) => download::scan_for_zip_files(&dir, download::RECENT_DOWNLOAD_WINDOW).await,
            None => Vec::new(),
        };

        if candidates.is_empty() {
            console::info("\n[!] No recent zip files found in Downloads folder.");
        } else {
            console::info(&format!(
                "\n[+] Found {} recent zip file(s) in Downloads:\n",
                candidates.len()
            ));
            let now = Local::now();
            let mut options: Vec<_> = candidates
                .iter()
                .map(|c| {
                    MenuItem::new(
                        format!(
                            "{} ({}, {})",
                            c.file_name,
                            console::format_file_size(c.size_bytes),
                            console::format_relative_time(c.modified, now)
                        ),
                        Some(c.full_path.clone()),
                    )
                })
                .collect();
            options.push(MenuItem::new("Enter a path or URL manually...", None));

            if let Some(Some(path)) = self
                .prompt
                .select("Select the downloaded zip file:", &options)
                .await?
            {
                return Ok(Some(ModSource::LocalZip(path)));
            }
        }

        let input = self
            .prompt
            .read_line("Enter the full path or URL of the Seamless Co-op zip file:\n> ")
            .await?;
        Ok(input.filter(|s| !s.is_empty()).map(|s| ModSource::parse(&s)))
    }

    /// `--game-dir`, then the Steam library, then a typed path.
    async fn resolve_game_dir(&mut self) -> Result<Option<PathBuf>> {
        if self.config.is_sandbox() {
            let dir = sandbox::create_test_game_directory(&self.config.sandbox_game_dir()).await?;
            return Ok(Some(dir));
        }

        if let Some(dir) = self.config.args.game_dir.clone() {
            return validate_dir(&dir).map(Some);
        }

        console::info("\n[+] Detecting game directory...");
        if let Some(dir) = steam::find_game_dir() {
            info!("Using Steam library game directory {}", dir.display());
            console::info(&format!("[+] Found game directory: {}\n", dir.display()));
            return Ok(Some(dir));
        }

        console::warning("[!] Could not auto-detect game directory.");
        let input = self
            .prompt
            .read_line(
                "Enter the Nightreign game directory path\n\
                 (e.g. C:\\Program Files (x86)\\Steam\\steamapps\\common\\ELDEN RING NIGHTREIGN\\Game):\n> ",
            )
            .await?;

        match input.filter(|s| !s.is_empty()) {
            Some(path) => validate_dir(Path::new(path.trim_matches('"'))).map(Some),
            None => {
                console::error("[!] No directory provided.");
                Ok(None)
            }
        }
    }
}

/// Backs up the save folder, then converts it from that backup.
///
/// The live folder is only touched once the backup is complete; any backup
/// failure returns before the first deletion.
pub async fn convert_with_backup(
    backups: &BackupManager,
    state: &SaveDirectoryState,
    choice: ConversionChoice,
) -> Result<(PathBuf, ConversionResult)> {
    let backup_dir = backups
        .backup(&state.target_dir, Some(&state.install_id), &state.files)
        .await?;
    if !BackupManager::is_complete(&backup_dir).await {
        return Err(ManagerError::BackupFailed(format!(
            "{} has no readable manifest",
            backup_dir.display()
        )));
    }

    let result =
        ConversionEngine::convert(&state.target_dir, &backup_dir, &state.files, choice).await?;
    Ok((backup_dir, result))
}

fn choice_label(choice: ConversionChoice) -> String {
    format!(
        "{} -> {} (You played {}, want to play {})",
        choice.source(),
        choice.target(),
        choice.source(),
        choice.target()
    )
}

fn validate_dir(path: &Path) -> Result<PathBuf> {
    if path.is_dir() {
        Ok(path.to_path_buf())
    } else {
        Err(ManagerError::DirectoryNotFound(format!(
            "{} is not a directory",
            path.display()
        )))
    }
}
