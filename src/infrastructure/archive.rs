//! Zip extraction and directory copying for mod archives.

use crate::error::{ManagerError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;
use zip::ZipArchive;

/// Extracts `zip_path` into `dest_dir`, skipping entries whose names would
/// escape it. Returns the number of files written.
pub fn extract_zip(zip_path: &Path, dest_dir: &Path, show_progress: bool) -> Result<usize> {
    let file = File::open(zip_path)?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;

    let pb = if show_progress {
        let pb = ProgressBar::new(archive.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[extract] {bar:30.cyan/blue} {pos}/{len}")
                .map_err(|e| ManagerError::Other(e.to_string()))?,
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut written = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let outpath = match entry.enclosed_name() {
            Some(path) => dest_dir.join(path),
            None => {
                debug!("Skipping unsafe archive entry {}", entry.name());
                continue;
            }
        };

        if entry.is_dir() {
            fs::create_dir_all(&outpath)?;
        } else {
            if let Some(parent) = outpath.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut outfile = File::create(&outpath)?;
            io::copy(&mut entry, &mut outfile)?;
            written += 1;
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(written)
}

/// Archives often wrap everything in one top-level folder; use that folder as
/// the content root when it is the only entry.
pub fn content_root(dir: &Path) -> Result<PathBuf> {
    let entries: Vec<_> = fs::read_dir(dir)?.collect::<io::Result<_>>()?;
    if let [only] = entries.as_slice() {
        if only.file_type()?.is_dir() {
            return Ok(only.path());
        }
    }
    Ok(dir.to_path_buf())
}

/// Copies the tree under `src` into `dest`, overwriting files. Returns the
/// number of files copied.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(src).min_depth(1).follow_links(false) {
        let entry = entry.map_err(|e| ManagerError::Other(e.to_string()))?;
        let rel_path = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| ManagerError::Other(e.to_string()))?;
        let new_path = dest.join(rel_path);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&new_path)?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = new_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &new_path)?;
            copied += 1;
        }
    }

    Ok(copied)
}
