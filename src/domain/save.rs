use crate::config::GameFiles;
use crate::error::{ManagerError, Result};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaveFormat {
    Steam,
    Coop,
}

impl SaveFormat {
    pub const ALL: [SaveFormat; 2] = [SaveFormat::Steam, SaveFormat::Coop];

    pub fn extension(self) -> &'static str {
        match self {
            SaveFormat::Steam => ".sl2",
            SaveFormat::Coop => ".co2",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SaveFormat::Steam => "Steam",
            SaveFormat::Coop => "SeamlessCoop",
        }
    }

    /// The one other format a save of this format can be converted to.
    pub fn other(self) -> SaveFormat {
        match self {
            SaveFormat::Steam => SaveFormat::Coop,
            SaveFormat::Coop => SaveFormat::Steam,
        }
    }

    pub fn save_file_name(self) -> String {
        format!("{}{}", GameFiles::BASE_SAVE_NAME, self.extension())
    }

    /// Name of the `.bak` companion the game keeps next to the main save.
    pub fn companion_file_name(self) -> String {
        format!("{}.bak", self.save_file_name())
    }
}

impl fmt::Display for SaveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A requested transition between two different formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionChoice {
    from: SaveFormat,
    to: SaveFormat,
}

impl ConversionChoice {
    pub fn new(from: SaveFormat, to: SaveFormat) -> Option<Self> {
        (from != to).then_some(Self { from, to })
    }

    /// Conversion that ends in `target`.
    pub fn into_format(target: SaveFormat) -> Self {
        Self {
            from: target.other(),
            to: target,
        }
    }

    pub fn source(&self) -> SaveFormat {
        self.from
    }

    pub fn target(&self) -> SaveFormat {
        self.to
    }
}

impl fmt::Display for ConversionChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Snapshot of one detected save folder.
#[derive(Debug, Clone)]
pub struct SaveDirectoryState {
    pub target_dir: PathBuf,
    pub install_id: String,
    pub has_steam_save: bool,
    pub has_coop_save: bool,
    pub files: Vec<String>,
}

impl SaveDirectoryState {
    /// Builds the state from a single directory listing.
    ///
    /// Fails with [`ManagerError::NoSaveFiles`] when neither format's save
    /// file is in `files`.
    pub fn from_listing(
        target_dir: PathBuf,
        install_id: String,
        files: Vec<String>,
    ) -> Result<Self> {
        let contains = |format: SaveFormat| {
            let name = format.save_file_name();
            files.iter().any(|f| *f == name)
        };
        let has_steam_save = contains(SaveFormat::Steam);
        let has_coop_save = contains(SaveFormat::Coop);

        if !has_steam_save && !has_coop_save {
            return Err(ManagerError::NoSaveFiles(target_dir));
        }

        Ok(Self {
            target_dir,
            install_id,
            has_steam_save,
            has_coop_save,
            files,
        })
    }

    pub fn has(&self, format: SaveFormat) -> bool {
        match format {
            SaveFormat::Steam => self.has_steam_save,
            SaveFormat::Coop => self.has_coop_save,
        }
    }

    pub fn validate(&self, choice: ConversionChoice) -> Result<()> {
        if self.has(choice.source()) {
            Ok(())
        } else {
            Err(ManagerError::ConversionPrecondition(format!(
                "no {} save ({}) found to convert to {}",
                choice.source(),
                choice.source().save_file_name(),
                choice.target()
            )))
        }
    }

    /// Conversions whose source file is present, in menu order.
    pub fn available_choices(&self) -> Vec<ConversionChoice> {
        SaveFormat::ALL
            .into_iter()
            .filter(|format| self.has(*format))
            .map(|format| ConversionChoice::into_format(format.other()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub main_converted: bool,
    pub bak_converted: bool,
    pub from_ext: &'static str,
    pub to_ext: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_registry_is_total() {
        assert_eq!(SaveFormat::Steam.save_file_name(), "NR0000.sl2");
        assert_eq!(SaveFormat::Coop.companion_file_name(), "NR0000.co2.bak");
        for format in SaveFormat::ALL {
            assert_ne!(format, format.other());
            assert_eq!(format.other().other(), format);
        }
    }

    #[test]
    fn test_choice_rejects_same_format() {
        assert!(ConversionChoice::new(SaveFormat::Steam, SaveFormat::Steam).is_none());
        let choice = ConversionChoice::into_format(SaveFormat::Coop);
        assert_eq!(choice.source(), SaveFormat::Steam);
    }

    #[test]
    fn test_state_requires_a_save() {
        let err = SaveDirectoryState::from_listing(
            PathBuf::from("dir"),
            "1".into(),
            listing(&["steam_autocloud.vdf", "NR0000.sl2.bak"]),
        )
        .unwrap_err();
        assert!(matches!(err, ManagerError::NoSaveFiles(_)));
    }

    #[test]
    fn test_validate_and_available_choices() {
        let state = SaveDirectoryState::from_listing(
            PathBuf::from("dir"),
            "1".into(),
            listing(&["NR0000.sl2"]),
        )
        .unwrap();

        assert!(state
            .validate(ConversionChoice::into_format(SaveFormat::Coop))
            .is_ok());
        assert!(matches!(
            state.validate(ConversionChoice::into_format(SaveFormat::Steam)),
            Err(ManagerError::ConversionPrecondition(_))
        ));
        assert_eq!(
            state.available_choices(),
            vec![ConversionChoice::into_format(SaveFormat::Coop)]
        );
    }
}
