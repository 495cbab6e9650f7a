use chrono::{DateTime, Local};
use std::path::PathBuf;

/// Where the co-op mod archive comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModSource {
    LocalZip(PathBuf),
    Url(String),
}

impl ModSource {
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim().trim_matches('"');
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            ModSource::Url(trimmed.to_string())
        } else {
            ModSource::LocalZip(PathBuf::from(trimmed))
        }
    }
}

/// A recently downloaded archive offered to the user.
#[derive(Debug, Clone)]
pub struct ZipCandidate {
    pub file_name: String,
    pub full_path: PathBuf,
    pub modified: DateTime<Local>,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ModInstallReport {
    pub success: bool,
    pub source: String,
    pub game_dir: PathBuf,
    pub files_copied: usize,
    pub launcher_found: bool,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source() {
        assert_eq!(
            ModSource::parse("https://example.com/mod.zip"),
            ModSource::Url("https://example.com/mod.zip".into())
        );
        assert_eq!(
            ModSource::parse("\"C:\\Downloads\\coop.zip\" "),
            ModSource::LocalZip(PathBuf::from("C:\\Downloads\\coop.zip"))
        );
    }
}
