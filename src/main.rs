use crate::config::cli::Args;
use crate::config::Config;
use crate::domain::AppMode;
use crate::error::Result;
use crate::services::mode;
use crate::services::Session;
use crate::ui::{console, Prompter};
use clap::Parser;
use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, Level};

mod config;
mod domain;
mod error;
mod infrastructure;
mod services;
mod ui;

#[tokio::main]
async fn main() -> ExitCode {
    let self_exe = std::env::current_exe();
    let app_mode = self_exe
        .as_ref()
        .ok()
        .and_then(|path| path.parent())
        .map(mode::detect_mode)
        .unwrap_or(AppMode::Standalone);

    // In launcher mode the command line belongs to the game.
    let args = match app_mode {
        AppMode::Standalone => Args::parse(),
        AppMode::Launcher => Args::launcher_defaults(),
    };

    let level = args.log_level.parse::<Level>().unwrap_or(Level::WARN);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    debug!("Running as {:?}", app_mode);

    console::print_banner();

    let no_wait = args.no_wait;
    let (code, launched) = match run(args, app_mode, self_exe).await {
        Ok(launched) => (ExitCode::SUCCESS, launched),
        Err(e) => {
            console::report_error(&e);
            (ExitCode::from(e.exit_code()), false)
        }
    };

    if !no_wait && !launched && std::io::stdin().is_terminal() {
        let _ = Prompter::new().pause("\nPress Enter to exit...").await;
    }

    code
}

/// Returns `true` when the game was started.
async fn run(args: Args, app_mode: AppMode, self_exe: std::io::Result<PathBuf>) -> Result<bool> {
    let self_exe = self_exe?;
    let mut session = Session::new(Config::new(args)?, self_exe.clone());

    match app_mode {
        AppMode::Standalone => session.run_standalone().await.map(|_| false),
        AppMode::Launcher => {
            let context = mode::launcher_context(self_exe)?;
            let forwarded: Vec<OsString> = std::env::args_os().skip(1).collect();
            session.run_launcher(&context, &forwarded).await
        }
    }
}
