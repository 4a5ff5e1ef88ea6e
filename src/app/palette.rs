use super::color::parse_hex;
use super::error::{AppError, Result};

/// Every palette holds exactly this many quick-pick colors.
pub const PALETTE_LEN: usize = 6;

const DEFAULT_STYLE_SWATCHES: [[&str; PALETTE_LEN]; 3] = [
    ["#AAAAAA", "#FFFFFF", "#000000", "#FF4444", "#2196F3", "#00E5FF"],
    ["#000000", "#4CAF50", "#FFEB3B", "#FF9800", "#9C27B0", "#F44336"],
    ["#2196F3", "#4CAF50", "#FFEB3B", "#FF4444", "#9C27B0", "#00E5FF"],
];
const DEFAULT_BG_SWATCHES: [&str; PALETTE_LEN] =
    ["#222222", "#111111", "#444444", "#2196F3", "#4CAF50", "#FFEB3B"];
const DEFAULT_MENUBAR_SWATCHES: [&str; PALETTE_LEN] =
    ["#111111", "#222222", "#333333", "#444444", "#FFFFFF", "#000000"];

fn to_vec(colors: &[&str]) -> Vec<String> {
    colors.iter().map(|c| c.to_string()).collect()
}

/// Default per-style palette for preset `idx`. Presets past the built-in
/// table cycle through it.
pub fn default_style_palette(idx: usize) -> Vec<String> {
    to_vec(&DEFAULT_STYLE_SWATCHES[idx % DEFAULT_STYLE_SWATCHES.len()])
}

pub fn default_style_swatches() -> Vec<Vec<String>> {
    (0..DEFAULT_STYLE_SWATCHES.len())
        .map(default_style_palette)
        .collect()
}

pub fn default_bg_swatches() -> Vec<String> {
    to_vec(&DEFAULT_BG_SWATCHES)
}

pub fn default_menubar_swatches() -> Vec<String> {
    to_vec(&DEFAULT_MENUBAR_SWATCHES)
}

/// Pad `palette` index-by-index from `defaults` up to `PALETTE_LEN`, and
/// drop anything past it.
pub fn pad_palette(palette: &mut Vec<String>, defaults: &[String]) {
    while palette.len() < PALETTE_LEN {
        palette.push(defaults[palette.len()].clone());
    }
    palette.truncate(PALETTE_LEN);
}

/// Which palette a swatch lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwatchCategory {
    /// The quick-pick colors for one style preset.
    Style(usize),
    Background,
    MenuBar,
}

/// The three kinds of swatch palettes: one 6-color palette per style
/// preset, one for the window background, one for the toolbar.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteStore {
    style: Vec<Vec<String>>,
    background: Vec<String>,
    menu_bar: Vec<String>,
}

impl PaletteStore {
    /// Build from settings lists, padding every palette to full length.
    pub fn new(
        mut style: Vec<Vec<String>>,
        mut background: Vec<String>,
        mut menu_bar: Vec<String>,
    ) -> Self {
        for (idx, palette) in style.iter_mut().enumerate() {
            pad_palette(palette, &default_style_palette(idx));
        }
        pad_palette(&mut background, &default_bg_swatches());
        pad_palette(&mut menu_bar, &default_menubar_swatches());
        let mut store = Self {
            style,
            background,
            menu_bar,
        };
        store.ensure_style_palettes(DEFAULT_STYLE_SWATCHES.len());
        store
    }

    /// Keep one per-style palette per preset, backfilling from defaults.
    pub fn ensure_style_palettes(&mut self, preset_count: usize) {
        while self.style.len() < preset_count {
            self.style.push(default_style_palette(self.style.len()));
        }
    }

    pub fn style_palettes(&self) -> &[Vec<String>] {
        &self.style
    }

    pub fn background(&self) -> &[String] {
        &self.background
    }

    pub fn menu_bar(&self) -> &[String] {
        &self.menu_bar
    }

    fn palette(&self, category: SwatchCategory) -> Result<&Vec<String>> {
        match category {
            SwatchCategory::Style(idx) => {
                self.style.get(idx).ok_or(AppError::IndexOutOfRange(idx))
            }
            SwatchCategory::Background => Ok(&self.background),
            SwatchCategory::MenuBar => Ok(&self.menu_bar),
        }
    }

    pub fn get(&self, category: SwatchCategory, idx: usize) -> Result<&str> {
        self.palette(category)?
            .get(idx)
            .map(String::as_str)
            .ok_or(AppError::IndexOutOfRange(idx))
    }

    /// Replace one swatch. The color must be well-formed hex; the picker
    /// dialog never produces anything else, but programmatic callers are
    /// guarded here.
    pub fn set(&mut self, category: SwatchCategory, idx: usize, color: &str) -> Result<()> {
        parse_hex(color)?;
        if idx >= PALETTE_LEN {
            return Err(AppError::IndexOutOfRange(idx));
        }
        let palette = match category {
            SwatchCategory::Style(style_idx) => self
                .style
                .get_mut(style_idx)
                .ok_or(AppError::IndexOutOfRange(style_idx))?,
            SwatchCategory::Background => &mut self.background,
            SwatchCategory::MenuBar => &mut self.menu_bar,
        };
        palette[idx] = color.to_string();
        Ok(())
    }
}

impl Default for PaletteStore {
    fn default() -> Self {
        Self::new(
            default_style_swatches(),
            default_bg_swatches(),
            default_menubar_swatches(),
        )
    }
}
