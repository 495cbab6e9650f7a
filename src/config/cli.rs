use crate::domain::{ConversionChoice, SaveFormat};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Convert the co-op save to the Steam format without showing the menu
    #[arg(long, conflicts_with = "to_coop")]
    pub to_steam: bool,

    /// Convert the Steam save to the co-op format without showing the menu
    #[arg(long)]
    pub to_coop: bool,

    /// Redirect every path into ./test-saves and ./test-game
    #[arg(long)]
    pub test: bool,

    /// Steam ID folder to use when several exist
    #[arg(long)]
    pub install_id: Option<String>,

    /// Game directory holding start_protected_game.exe
    #[arg(long)]
    pub game_dir: Option<PathBuf>,

    /// Zip file or URL of the Seamless Co-op archive
    #[arg(long)]
    pub mod_source: Option<String>,

    /// Base directory that contains the Nightreign save folder
    #[clap(long, env = "APPDATA")]
    pub appdata_dir: Option<PathBuf>,

    /// Exit without waiting for a key press
    #[arg(long)]
    pub no_wait: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Args {
    /// Arguments for launcher mode, where the command line belongs to the game.
    pub fn launcher_defaults() -> Self {
        Self::parse_from([env!("CARGO_PKG_NAME")])
    }

    pub fn conversion_choice(&self) -> Option<ConversionChoice> {
        if self.to_steam {
            ConversionChoice::new(SaveFormat::Coop, SaveFormat::Steam)
        } else if self.to_coop {
            ConversionChoice::new(SaveFormat::Steam, SaveFormat::Coop)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_flags() {
        let args = Args::parse_from(["save-manager", "--to-coop", "--test"]);
        let choice = args.conversion_choice().unwrap();
        assert_eq!(choice.source(), SaveFormat::Steam);
        assert_eq!(choice.target(), SaveFormat::Coop);
        assert!(args.test);

        let args = Args::parse_from(["save-manager"]);
        assert!(args.conversion_choice().is_none());
    }

    #[test]
    fn test_conversion_flags_conflict() {
        assert!(Args::try_parse_from(["save-manager", "--to-coop", "--to-steam"]).is_err());
    }
}
