//! Persistent application configuration.
//!
//! Stored as JSON in a platform-appropriate config directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// On-disk configuration for the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Label font for ruler numbers.
    ///
    /// When unset, `fonts/dejavu/DejaVuSans.ttf` is searched for next to the
    /// executable and in the working directory (see `assets`).
    pub font_path: Option<PathBuf>,

    /// Directory the fire-arc icons are written to and looked up from.
    pub icon_dir: PathBuf,

    /// Ship silhouettes, looked up by the deck's `ship_image` cell.
    pub ship_image_dir: PathBuf,

    /// Nation flags, looked up by the deck's `nation` cell.
    pub flag_dir: PathBuf,

    /// Directory finished cards are written to.
    pub output_dir: PathBuf,

    /// Print density used for ruler geometry and PNG metadata.
    pub dpi: u32,

    /// Finished card size in pixels.
    pub target_width: u32,
    pub target_height: u32,

    /// Ink colors for rulers and icons.
    pub theme: ie::Theme,
}

impl Default for Config {
    fn default() -> Self {
        let format = ie::ruler::PrintFormat::default();
        Self {
            font_path: None,
            icon_dir: PathBuf::from("fire_arcs"),
            ship_image_dir: PathBuf::from("ship_images"),
            flag_dir: PathBuf::from("flags"),
            output_dir: PathBuf::from("output_images"),
            dpi: format.dpi,
            target_width: format.width,
            target_height: format.height,
            theme: ie::Theme::default(),
        }
    }
}

impl Config {
    /// Path to the config file.
    pub fn path() -> Result<PathBuf> {
        let base = dirs::config_dir().context("config_dir() unavailable")?;
        Ok(base.join("shipcard.json"))
    }

    /// Load configuration from disk, falling back to defaults on missing file.
    pub fn load_or_default() -> Self {
        match Self::try_load() {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load config; using defaults");
                Self::default()
            }
        }
    }

    /// Try to load configuration from disk.
    pub fn try_load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load an explicitly named config file. Unlike [`Config::try_load`] a
    /// missing file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).with_context(|| format!("read {:?}", path))?;
        let cfg = serde_json::from_str(&json).with_context(|| format!("parse {:?}", path))?;
        Ok(cfg)
    }

    /// Save configuration to disk.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {:?}", parent))?;
        }
        let json = serde_json::to_string_pretty(self).context("serialize config")?;
        fs::write(path, json).with_context(|| format!("write {:?}", path))?;
        Ok(())
    }

    /// Picture directories for cards, with the icon directory optionally
    /// overridden from the command line.
    pub fn card_assets(&self, icon_dir: Option<PathBuf>) -> crate::capture::CardAssets {
        crate::capture::CardAssets::new(
            icon_dir.unwrap_or_else(|| self.icon_dir.clone()),
            &self.ship_image_dir,
            &self.flag_dir,
        )
    }

    pub fn print_format(&self) -> ie::ruler::PrintFormat {
        ie::ruler::PrintFormat {
            width: self.target_width,
            height: self.target_height,
            dpi: self.dpi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_print_format() {
        let cfg = Config::default();
        assert_eq!(cfg.print_format(), ie::ruler::PrintFormat { width: 1654, height: 1289, dpi: 300 });
        assert_eq!(cfg.theme, ie::Theme::PRINT);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shipcard.json");
        fs::write(&path, r#"{"output_dir": "cards", "dpi": 600}"#).unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.output_dir, PathBuf::from("cards"));
        assert_eq!(cfg.dpi, 600);
        assert_eq!(cfg.icon_dir, PathBuf::from("fire_arcs"));
        assert_eq!(cfg.flag_dir, PathBuf::from("flags"));
        assert_eq!(cfg.target_width, 1654);
    }

    #[test]
    fn save_round_trips_theme() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("shipcard.json");
        let mut cfg = Config::default();
        cfg.theme.tick = ie::Color::rgb(1, 2, 3);
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn theme_colors_are_hex_strings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shipcard.json");
        fs::write(
            &path,
            r##"{"theme": {"tick": "#571314", "label": "#000000", "arc_fill": "#8b0000c8", "outline": "#101010"}}"##,
        )
        .unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.theme.tick, ie::Theme::PRINT.tick);
        assert_eq!(cfg.theme.arc_fill, ie::Theme::PRINT.arc_fill);
        assert_eq!(cfg.theme.outline, ie::Color::rgb(0x10, 0x10, 0x10));

        fs::write(&path, r#"{"theme": {"tick": [87, 19, 20]}}"#).unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        assert!(Config::load_from(Path::new("/nonexistent/shipcard.json")).is_err());
    }
}
