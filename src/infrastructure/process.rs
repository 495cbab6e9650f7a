use crate::error::Result;
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{info, warn};

/// Starts `executable` from its own directory without waiting for it.
pub fn launch_detached(executable: &Path, args: &[OsString]) -> Result<()> {
    let mut command = Command::new(executable);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    if let Some(dir) = executable.parent() {
        command.current_dir(dir);
    }

    let child = command.spawn()?;
    info!("Launched {} (pid {})", executable.display(), child.id());
    Ok(())
}

/// Opens `url` with the platform's default handler.
pub fn open_url(url: &str) -> bool {
    let mut command = if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/c", "start", "", url]);
        command
    } else if cfg!(target_os = "macos") {
        let mut command = Command::new("open");
        command.arg(url);
        command
    } else {
        let mut command = Command::new("xdg-open");
        command.arg(url);
        command
    };

    match command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(_) => true,
        Err(e) => {
            warn!("Could not open {}: {}", url, e);
            false
        }
    }
}
