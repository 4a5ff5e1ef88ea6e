use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::color::parse_hex;
use super::error::Result;
use super::palette::{
    default_bg_swatches, default_menubar_swatches, default_style_palette, default_style_swatches,
    pad_palette,
};
use super::styles::{default_presets, StylePreset, MAX_FONT_SIZE, MIN_FONT_SIZE, MIN_PRESETS};

pub const MIN_BG_ALPHA: f64 = 0.1;
pub const MAX_BG_ALPHA: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_text")]
    pub text: String,

    #[serde(default = "default_presets")]
    pub styles: Vec<StylePreset>,

    #[serde(default = "default_bg_color")]
    pub bg_color: String,

    #[serde(default = "default_bg_alpha")]
    pub bg_alpha: f64,

    #[serde(default = "default_menubar_color")]
    pub menubar_color: String,

    #[serde(default = "default_style_swatches")]
    pub swatches: Vec<Vec<String>>,

    #[serde(default = "default_bg_swatches")]
    pub bg_swatches: Vec<String>,

    #[serde(default = "default_menubar_swatches")]
    pub menubar_swatches: Vec<String>,

    #[serde(default)]
    pub last_script: Option<String>,
}

fn default_text() -> String {
    "Welcome to Teleprompta!\n\nHighlight text and apply a style preset from the toolbar above."
        .to_string()
}

fn default_bg_color() -> String {
    "#222222".to_string()
}

fn default_bg_alpha() -> f64 {
    0.85
}

fn default_menubar_color() -> String {
    "#111111".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            text: default_text(),
            styles: default_presets(),
            bg_color: default_bg_color(),
            bg_alpha: default_bg_alpha(),
            menubar_color: default_menubar_color(),
            swatches: default_style_swatches(),
            bg_swatches: default_bg_swatches(),
            menubar_swatches: default_menubar_swatches(),
            last_script: None,
        }
    }
}

impl AppSettings {
    /// Load settings from disk. Any read or parse failure falls back to
    /// defaults; a corrupt settings file must never block startup.
    pub fn load() -> Self {
        let config_path = Self::get_config_path();

        match Self::load_from(&config_path) {
            Ok(settings) => settings,
            Err(e) => {
                if config_path.exists() {
                    eprintln!("Failed to read settings: {}. Using defaults.", e);
                } else {
                    // First run: try to seed the file for next time
                    let _ = Self::default().save();
                }
                Self::default()
            }
        }
    }

    /// Read and normalize settings from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mut settings: AppSettings = serde_json::from_str(&contents)?;
        settings.normalize();
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Get config file path (cross-platform)
    pub fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("teleprompta");
        path.push("settings.json");
        path
    }

    /// Repair whatever a loaded file left short or out of range: lists pad
    /// index-by-index from the compiled-in defaults, sizes and alpha clamp,
    /// colors that don't parse revert to their defaults.
    pub fn normalize(&mut self) {
        let preset_defaults = default_presets();
        while self.styles.len() < MIN_PRESETS {
            self.styles.push(preset_defaults[self.styles.len()].clone());
        }
        for (idx, preset) in self.styles.iter_mut().enumerate() {
            preset.size = preset.size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
            if parse_hex(&preset.color).is_err() {
                preset.color = preset_defaults[idx % preset_defaults.len()].color.clone();
            }
        }

        while self.swatches.len() < MIN_PRESETS {
            self.swatches.push(default_style_palette(self.swatches.len()));
        }
        for (idx, palette) in self.swatches.iter_mut().enumerate() {
            pad_palette(palette, &default_style_palette(idx));
        }
        pad_palette(&mut self.bg_swatches, &default_bg_swatches());
        pad_palette(&mut self.menubar_swatches, &default_menubar_swatches());

        self.bg_alpha = self.bg_alpha.clamp(MIN_BG_ALPHA, MAX_BG_ALPHA);
        if parse_hex(&self.bg_color).is_err() {
            self.bg_color = default_bg_color();
        }
        if parse_hex(&self.menubar_color).is_err() {
            self.menubar_color = default_menubar_color();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.styles.len(), 3);
        assert_eq!(settings.styles[0].name, "Body");
        assert_eq!(settings.bg_color, "#222222");
        assert_eq!(settings.bg_alpha, 0.85);
        assert_eq!(settings.menubar_color, "#111111");
        assert_eq!(settings.swatches.len(), 3);
        assert_eq!(settings.bg_swatches.len(), 6);
        assert_eq!(settings.menubar_swatches.len(), 6);
        assert!(settings.last_script.is_none());
        assert!(settings.text.starts_with("Welcome to Teleprompta!"));
    }

    #[test]
    fn test_serialize_deserialize() {
        let settings = AppSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let loaded: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, loaded);
    }

    #[test]
    fn test_minimal_payload_gets_all_defaults() {
        // A file containing only text must come back with the full default
        // styles list and default palettes.
        let json = r#"{"text": "hi"}"#;
        let mut settings: AppSettings = serde_json::from_str(json).unwrap();
        settings.normalize();
        assert_eq!(settings.text, "hi");
        assert_eq!(settings.styles, default_presets());
        assert_eq!(settings.swatches, default_style_swatches());
        assert_eq!(settings.bg_swatches, default_bg_swatches());
        assert_eq!(settings.menubar_swatches, default_menubar_swatches());
    }

    #[test]
    fn test_short_styles_list_padded() {
        let json = r##"{"styles": [{"name": "Mine", "font": "Courier", "size": 30, "color": "#112233"}]}"##;
        let mut settings: AppSettings = serde_json::from_str(json).unwrap();
        settings.normalize();
        assert_eq!(settings.styles.len(), 3);
        assert_eq!(settings.styles[0].name, "Mine");
        assert_eq!(settings.styles[1], default_presets()[1]);
        assert_eq!(settings.styles[2], default_presets()[2]);
    }

    #[test]
    fn test_short_bg_swatches_padded_index_by_index() {
        let json = r#"{"bg_swatches": ["#010101", "#020202"]}"#;
        let mut settings: AppSettings = serde_json::from_str(json).unwrap();
        settings.normalize();
        assert_eq!(settings.bg_swatches.len(), 6);
        assert_eq!(settings.bg_swatches[0], "#010101");
        assert_eq!(settings.bg_swatches[1], "#020202");
        assert_eq!(settings.bg_swatches[2..], default_bg_swatches()[2..]);
    }

    #[test]
    fn test_alpha_and_size_clamped() {
        let json = r#"{"bg_alpha": 7.5, "styles": [{"name": "A", "font": "Arial", "size": 4, "color": "#000000"}]}"#;
        let mut settings: AppSettings = serde_json::from_str(json).unwrap();
        settings.normalize();
        assert_eq!(settings.bg_alpha, MAX_BG_ALPHA);
        assert_eq!(settings.styles[0].size, MIN_FONT_SIZE);
    }

    #[test]
    fn test_malformed_colors_revert_to_defaults() {
        let json = r#"{"bg_color": "dark", "menubar_color": "#12", "styles": [{"name": "A", "font": "Arial", "size": 24, "color": "red"}]}"#;
        let mut settings: AppSettings = serde_json::from_str(json).unwrap();
        settings.normalize();
        assert_eq!(settings.bg_color, "#222222");
        assert_eq!(settings.menubar_color, "#111111");
        assert_eq!(settings.styles[0].color, default_presets()[0].color);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut settings = AppSettings::default();
        settings.text = "session text".to_string();
        settings.last_script = Some("/tmp/show.teleprompt".to_string());
        settings.save_to(&path).unwrap();
        let loaded = AppSettings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_from_corrupt_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(AppSettings::load_from(&path).is_err());
    }

    #[test]
    fn test_load_from_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppSettings::load_from(&dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        AppSettings::default().save_to(&path).unwrap();
        assert!(path.exists());
    }
}
