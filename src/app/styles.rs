use serde::{Deserialize, Serialize};

use super::color::parse_hex;
use super::error::{AppError, Result};

pub const MIN_PRESETS: usize = 3;
pub const MIN_FONT_SIZE: u32 = 10;
pub const MAX_FONT_SIZE: u32 = 72;

/// A named (font, size, color) triple selectable for a text span.
/// Preset 0 is the "Body" baseline; every later preset renders bold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StylePreset {
    pub name: String,
    pub font: String,
    pub size: u32,
    pub color: String,
}

impl StylePreset {
    fn new(name: &str, font: &str, size: u32, color: &str) -> Self {
        Self {
            name: name.to_string(),
            font: font.to_string(),
            size,
            color: color.to_string(),
        }
    }
}

pub fn default_presets() -> Vec<StylePreset> {
    vec![
        StylePreset::new("Body", "Arial", 24, "#AAAAAA"),
        StylePreset::new("Title", "Arial Black", 28, "#000000"),
        StylePreset::new("Tips", "Arial", 20, "#2196F3"),
    ]
}

/// One field of a preset, for update-in-place.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleUpdate {
    Name(String),
    Font(String),
    Size(u32),
    Color(String),
}

/// Ordered list of style presets. The ordinal of a preset is stable and
/// determines its tag name and its style character in the render buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRegistry {
    presets: Vec<StylePreset>,
}

impl StyleRegistry {
    /// Build a registry, backfilling missing presets from the defaults so
    /// at least `MIN_PRESETS` always exist.
    pub fn new(mut presets: Vec<StylePreset>) -> Self {
        let defaults = default_presets();
        while presets.len() < MIN_PRESETS {
            presets.push(defaults[presets.len()].clone());
        }
        for preset in &mut presets {
            preset.size = preset.size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        }
        Self { presets }
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn presets(&self) -> &[StylePreset] {
        &self.presets
    }

    pub fn get(&self, idx: usize) -> Result<&StylePreset> {
        self.presets.get(idx).ok_or(AppError::IndexOutOfRange(idx))
    }

    /// Mutate one field of preset `idx` in place. Sizes clamp to the valid
    /// range; colors must parse as hex or the update is rejected.
    pub fn update(&mut self, idx: usize, update: StyleUpdate) -> Result<()> {
        if let StyleUpdate::Color(ref color) = update {
            parse_hex(color)?;
        }
        let preset = self
            .presets
            .get_mut(idx)
            .ok_or(AppError::IndexOutOfRange(idx))?;
        match update {
            StyleUpdate::Name(name) => preset.name = name,
            StyleUpdate::Font(font) => preset.font = font,
            StyleUpdate::Size(size) => preset.size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE),
            StyleUpdate::Color(color) => preset.color = color,
        }
        Ok(())
    }

    /// Tag name bound to preset `idx`: preset 0 is "body", preset i is
    /// "style{i+1}".
    pub fn tag_for(&self, idx: usize) -> String {
        if idx == 0 {
            "body".to_string()
        } else {
            format!("style{}", idx + 1)
        }
    }

    /// All tag names this registry knows, in preset order.
    pub fn known_tags(&self) -> Vec<String> {
        (0..self.presets.len()).map(|i| self.tag_for(i)).collect()
    }

    /// Inverse of `tag_for`. Unknown tags (e.g. from a script written with
    /// more presets than this session has) resolve to None.
    pub fn preset_for_tag(&self, tag: &str) -> Option<usize> {
        if tag == "body" {
            return Some(0);
        }
        let n: usize = tag.strip_prefix("style")?.parse().ok()?;
        let idx = n.checked_sub(1)?;
        (1..self.presets.len()).contains(&idx).then_some(idx)
    }

    /// Style-buffer character for preset `idx` ('A' for body, then 'B',
    /// 'C', ...). Capped at 'Z'; 26 presets is far beyond anything the
    /// settings file produces.
    pub fn style_char(&self, idx: usize) -> char {
        (b'A' + idx.min(25) as u8) as char
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new(default_presets())
    }
}
