//! User-facing status output. Diagnostics go through `tracing` instead.

use crate::config::GameFiles;
use crate::domain::{ConversionResult, InstallReport, ModInstallReport, UninstallReport};
use crate::error::ManagerError;
use chrono::{DateTime, Local};

pub fn info(msg: &str) {
    println!("{}", msg);
}

pub fn success(msg: &str) {
    println!("{}", msg);
}

pub fn warning(msg: &str) {
    println!("{}", msg);
}

pub fn error(msg: &str) {
    eprintln!("{}", msg);
}

pub fn print_banner() {
    info("==========================================");
    info(&format!(
        "       Welcome to Save Manager v{}",
        env!("CARGO_PKG_VERSION")
    ));
    info("==========================================");
}

pub fn print_conversion_result(result: &ConversionResult) {
    let base = GameFiles::BASE_SAVE_NAME;

    if result.main_converted {
        success(&format!(
            "[+] Converted: {base}{} -> {base}{}",
            result.from_ext, result.to_ext
        ));
    } else {
        error(&format!("[!] Error: File {base}{} not found.", result.from_ext));
    }

    if result.bak_converted {
        success(&format!(
            "[+] Converted: {base}{}.bak -> {base}{}.bak",
            result.from_ext, result.to_ext
        ));
    } else {
        warning(&format!(
            "[!] Warning: File {base}{}.bak not found.",
            result.from_ext
        ));
    }
}

pub fn print_install_report(report: &InstallReport) {
    if report.success {
        success("\n[+] Save Manager installed successfully!");
        info(&format!("    Game directory: {}", report.game_dir.display()));
        success("    [+] Original launcher backed up");
        success("    [+] Save Manager installed as launcher");
        if report.coop_launcher_detected {
            success("    [+] Seamless Coop launcher detected");
        } else {
            warning("    [!] Seamless Coop launcher not found, install it to use Coop mode");
        }
        info("\nNext time you click \"Play\" in Steam, Save Manager will appear.");
        return;
    }

    error("\n[!] Installation failed.");
    if let Some(step) = &report.failed_step {
        error(&format!("    Failed step: {}", step));
    }
    if let Some(e) = &report.error {
        error(&format!("    Reason: {}", e));
    }
    for problem in &report.rollback_problems {
        warning(&format!("    Rollback: {}", problem));
    }
    match report.rollback_succeeded {
        None => {
            error("    Could not find or rename the original game launcher.");
            info(&format!(
                "    Make sure the game directory contains {}",
                GameFiles::ORIGINAL_LAUNCHER
            ));
        }
        Some(true) => {
            error("    Could not copy Save Manager to the game directory.");
            info("    The original launcher was restored; nothing was changed.");
        }
        Some(false) => {
            error("    Could not copy Save Manager, and restoring the original launcher failed.");
            warning(&format!(
                "    Rename {} back to {} manually, or verify game files through Steam.",
                GameFiles::BACKUP_LAUNCHER,
                GameFiles::ORIGINAL_LAUNCHER
            ));
        }
    }
}

pub fn print_uninstall_report(report: &UninstallReport) {
    if report.success {
        success("\n[+] Save Manager uninstalled successfully!");
        info(&format!("    Game directory: {}", report.game_dir.display()));
        success("    [+] Save Manager launcher removed");
        success("    [+] Original launcher restored");
        info("\nThe game will now launch normally through Steam.");
        return;
    }

    error("\n[!] Uninstallation failed.");
    if let Some(step) = &report.failed_step {
        error(&format!("    Failed step: {}", step));
    }
    if let Some(e) = &report.error {
        error(&format!("    Reason: {}", e));
    }
    if !report.replacement_deleted {
        error("    Could not remove the Save Manager launcher. Nothing was changed.");
    } else if !report.original_restored {
        error("    Save Manager was removed, but the original launcher could not be restored.");
        warning("    You may need to verify game files through Steam.");
    }
}

pub fn print_mod_install_report(report: &ModInstallReport) {
    if report.success {
        success("\n[+] Seamless Co-op installed successfully!");
        info(&format!("    Game directory: {}", report.game_dir.display()));
        info(&format!("    Source: {}", report.source));
        info(&format!("    Files copied: {}", report.files_copied));
        if report.launcher_found {
            success(&format!(
                "    [+] {} found, mod is ready to use",
                GameFiles::COOP_LAUNCHER
            ));
        } else {
            warning(&format!(
                "    [!] {} not found, the archive may not contain the expected mod files",
                GameFiles::COOP_LAUNCHER
            ));
        }
        return;
    }

    error("\n[!] Seamless Co-op installation failed.");
    if let Some(e) = &report.error {
        error(&format!("    {}", e));
    }
}

pub fn report_error(err: &ManagerError) {
    match err {
        ManagerError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => {
            error("\n[X] Error: Directory not found. Is the game installed?");
        }
        _ if err.exit_code() == 1 => {
            error(&format!("\n[X] {}", err));
            info("    No files were changed.");
        }
        _ if err.exit_code() == 2 => {
            error(&format!("\n[X] {}", err));
            warning("    The operation stopped partway. Check the messages above.");
        }
        _ => error(&format!("\n[X] An unexpected error occurred: {}", err)),
    }
}

pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

pub fn format_relative_time(then: DateTime<Local>, now: DateTime<Local>) -> String {
    let secs = (now - then).num_seconds().max(0);
    if secs < 60 {
        format!("{}s ago", secs)
    } else if secs < 60 * 60 {
        format!("{}m ago", secs / 60)
    } else {
        format!("{}h ago", secs / 3600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(2048), "2.0 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024 + 512 * 1024), "5.5 MB");
    }

    #[test]
    fn test_format_relative_time() {
        let now = Local::now();
        assert_eq!(format_relative_time(now - Duration::seconds(30), now), "30s ago");
        assert_eq!(format_relative_time(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(format_relative_time(now - Duration::hours(3), now), "3h ago");
    }
}
