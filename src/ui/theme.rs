use fltk::{app, enums::Color, enums::Font, prelude::*, text::TextEditor, window::Window};

use crate::app::color::{is_dark_hex, parse_hex};

/// Hex string to an FLTK color, with a fallback for strings that slipped
/// past validation.
pub fn to_color(hex: &str, fallback: (u8, u8, u8)) -> Color {
    let (r, g, b) = parse_hex(hex).unwrap_or(fallback);
    Color::from_rgb(r, g, b)
}

/// Foreground that stays readable over `hex`.
pub fn fg_for(hex: &str) -> Color {
    if is_dark_hex(hex) {
        Color::White
    } else {
        Color::Black
    }
}

/// Resolve a font family name against the loaded system fonts. FLTK
/// registers loaded fonts under decorated names, so match modulo the
/// prefix. Bold presets prefer the family's bold face when one exists;
/// unknown families fall back to FLTK's default resolution.
pub fn display_font(family: &str, bold: bool) -> Font {
    let fonts = app::fonts();
    let find = |target: &str| {
        fonts
            .iter()
            .find(|f| f.trim_start_matches('@').eq_ignore_ascii_case(target))
    };
    if bold {
        if let Some(name) = find(&format!("{} bold", family)) {
            return Font::by_name(name);
        }
    }
    match find(family) {
        Some(name) => Font::by_name(name),
        None => Font::by_name(family),
    }
}

/// Paint the window and editor with the session's background color and
/// opacity. The toolbar repaints itself separately.
pub fn apply_chrome(window: &mut Window, editor: &mut TextEditor, bg_hex: &str, alpha: f64) {
    let bg = to_color(bg_hex, (34, 34, 34));
    window.set_color(bg);
    editor.set_color(bg);
    editor.set_cursor_color(fg_for(bg_hex));
    editor.set_selection_color(Color::from_rgb(70, 70, 100));
    window.set_opacity(alpha);
    editor.redraw();
    window.redraw();
}
