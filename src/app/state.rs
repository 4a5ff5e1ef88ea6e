use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use fltk::{
    dialog,
    dialog::ColorMode,
    group::Flex,
    menu::MenuBar,
    prelude::*,
    text::{StyleTableEntry, TextBuffer, TextEditor},
    window::Window,
};

use crate::ui::dialogs::settings_dialog::{show_settings_dialog, SettingsDraft};
use crate::ui::file_dialogs::{ensure_script_extension, native_open_dialog, native_save_dialog};
use crate::ui::main_window::MainWidgets;
use crate::ui::theme;
use crate::ui::toolbar::Toolbar;

use super::color::{format_hex, parse_hex};
use super::document::ScriptDocument;
use super::palette::{PaletteStore, SwatchCategory};
use super::script;
use super::settings::{AppSettings, MAX_BG_ALPHA, MIN_BG_ALPHA};
use super::styles::{StyleRegistry, StyleUpdate};

/// Owns the session: the widgets, the document, the style registry, the
/// palettes and the settings. Every message from the dispatch loop lands
/// in one of these methods.
pub struct AppState {
    pub window: Window,
    pub flex: Flex,
    pub menu: MenuBar,
    pub editor: TextEditor,
    pub toolbar: Toolbar,
    pub buffer: TextBuffer,
    style_buffer: TextBuffer,
    pub document: Rc<RefCell<ScriptDocument>>,
    pub styles: StyleRegistry,
    pub palettes: PaletteStore,
    pub settings: AppSettings,
    pub current_script: Option<PathBuf>,
}

impl AppState {
    pub fn new(widgets: MainWidgets, settings: AppSettings) -> Self {
        let MainWidgets {
            wind,
            flex,
            menu,
            toolbar,
            editor,
            mut buffer,
            style_buffer,
        } = widgets;

        let styles = StyleRegistry::new(settings.styles.clone());
        let mut palettes = PaletteStore::new(
            settings.swatches.clone(),
            settings.bg_swatches.clone(),
            settings.menubar_swatches.clone(),
        );
        palettes.ensure_style_palettes(styles.len());

        let document = Rc::new(RefCell::new(ScriptDocument::new(&settings.text)));
        buffer.set_text(&settings.text);
        let mut style_buf = style_buffer.clone();
        style_buf.set_text(&"A".repeat(settings.text.len()));

        // Keep the document and the style buffer in lockstep with every
        // edit the editor makes to the text buffer. Typed text starts out
        // as body ('A') until a style is applied over it.
        let doc_cb = document.clone();
        let reader = buffer.clone();
        buffer.add_modify_callback(move |pos, inserted, deleted, _restyled, _deleted_text| {
            if inserted > 0 || deleted > 0 {
                let mut doc = doc_cb.borrow_mut();
                if deleted > 0 {
                    doc.delete(pos as usize, (pos + deleted) as usize);
                    style_buf.remove(pos, pos + deleted);
                }
                if inserted > 0 {
                    let text = reader.text_range(pos, pos + inserted).unwrap_or_default();
                    doc.insert(pos as usize, &text);
                    style_buf.insert(pos, &"A".repeat(inserted as usize));
                }
            }
        });

        let current_script = settings.last_script.as_ref().map(PathBuf::from);

        let mut state = Self {
            window: wind,
            flex,
            menu,
            editor,
            toolbar,
            buffer,
            style_buffer,
            document,
            styles,
            palettes,
            settings,
            current_script,
        };
        state.apply_style_defs();
        state.toolbar.set_alpha(state.settings.bg_alpha);
        state.refresh_chrome();
        state
    }

    /// Push the current presets into the editor's style table and the
    /// toolbar's buttons. Called at startup and after every preset edit.
    pub fn apply_style_defs(&mut self) {
        let table: Vec<StyleTableEntry> = self
            .styles
            .presets()
            .iter()
            .enumerate()
            .map(|(idx, preset)| StyleTableEntry {
                color: theme::to_color(&preset.color, (170, 170, 170)),
                font: theme::display_font(&preset.font, idx > 0),
                size: preset.size as i32,
            })
            .collect();
        self.editor
            .set_highlight_data(self.style_buffer.clone(), table);
        self.toolbar
            .refresh(&self.styles, &self.palettes, &self.settings.menubar_color);
        self.editor.redraw();
    }

    /// Tag the current selection with preset `idx`. Quietly does nothing
    /// when nothing is selected.
    pub fn apply_style_to_selection(&mut self, idx: usize) {
        if self.styles.get(idx).is_err() {
            eprintln!("apply_style_to_selection: no preset {}", idx);
            return;
        }
        let Some((a, b)) = self.buffer.selection_position() else {
            return;
        };
        let (start, end) = (a.min(b) as usize, a.max(b) as usize);
        let tag = self.styles.tag_for(idx);
        let known = self.styles.known_tags();
        let applied = self
            .document
            .borrow_mut()
            .apply_style(start, end, &tag, &known);
        if applied {
            let fill = self.styles.style_char(idx).to_string().repeat(end - start);
            self.style_buffer.replace(start as i32, end as i32, &fill);
            self.editor.redraw();
        }
    }

    /// Rewrite the whole style buffer from the document's tag ranges.
    /// Used after a script load, where ranges arrive wholesale.
    fn rebuild_style_buffer(&mut self) {
        let doc = self.document.borrow();
        let mut chars = vec![b'A'; doc.len()];
        for (tag, ranges) in doc.tag_ranges() {
            if let Some(idx) = self.styles.preset_for_tag(&tag) {
                let ch = self.styles.style_char(idx) as u8;
                for (start, end) in ranges {
                    chars[start..end].fill(ch);
                }
            }
        }
        drop(doc);
        let text = String::from_utf8_lossy(&chars).into_owned();
        self.style_buffer.set_text(&text);
    }

    // --- Script I/O ---

    pub fn open_script(&mut self) {
        if !self.confirm_discard() {
            return;
        }
        let Some(path) = native_open_dialog() else {
            return;
        };
        self.load_script(&PathBuf::from(path));
    }

    /// Load `path` into the editor. On any failure the current document
    /// is left exactly as it was.
    fn load_script(&mut self, path: &Path) {
        match script::read_script(path) {
            Ok((text, ranges)) => {
                self.buffer.set_text(&text);
                self.document.borrow_mut().load_from(&text, &ranges);
                self.rebuild_style_buffer();
                self.editor.redraw();
                self.current_script = Some(path.to_path_buf());
                self.settings.last_script = Some(path.to_string_lossy().to_string());
                self.persist_settings();
            }
            Err(e) => dialog::alert_default(&format!("Could not open script.\n{}", e)),
        }
    }

    /// Export the document to a user-chosen path. Returns true when the
    /// script was actually written.
    pub fn save_script_as(&mut self) -> bool {
        let Some(path) = native_save_dialog() else {
            return false;
        };
        let path = PathBuf::from(ensure_script_extension(path));
        let (text, ranges) = {
            let doc = self.document.borrow();
            (doc.text().to_string(), doc.tag_ranges())
        };
        match script::write_script(&path, &text, &ranges) {
            Ok(()) => {
                self.document.borrow_mut().mark_clean();
                self.current_script = Some(path.clone());
                self.settings.last_script = Some(path.to_string_lossy().to_string());
                self.persist_settings();
                true
            }
            Err(e) => {
                dialog::alert_default(&format!("Could not save script.\n{}", e));
                false
            }
        }
    }

    /// Reopen the script from the previous session, if it still exists.
    pub fn load_last_script(&mut self) {
        let Some(last) = self.settings.last_script.clone() else {
            return;
        };
        let path = PathBuf::from(last);
        if path.exists() {
            self.load_script(&path);
        }
    }

    /// Three-way guard before a destructive action. Returns true when it
    /// is safe to proceed; Cancel (or a cancelled save) leaves everything
    /// untouched and returns false.
    fn confirm_discard(&mut self) -> bool {
        if !self.document.borrow().is_dirty() {
            return true;
        }
        let choice = dialog::choice2_default(
            "You have unsaved changes.",
            "Save",
            "Discard",
            "Cancel",
        );
        match choice {
            Some(0) => {
                self.save_script_as();
                !self.document.borrow().is_dirty()
            }
            Some(1) => true,
            _ => false,
        }
    }

    /// Handle a close request. Returns true if the app should exit.
    pub fn handle_close(&mut self) -> bool {
        if !self.confirm_discard() {
            return false;
        }
        self.settings.text = self.document.borrow().text().to_string();
        self.settings.last_script = self
            .current_script
            .as_ref()
            .map(|p| p.to_string_lossy().to_string());
        self.persist_settings();
        true
    }

    // --- Chrome colors ---

    pub fn set_background(&mut self, color: &str) {
        if parse_hex(color).is_err() {
            eprintln!("set_background: rejecting color {:?}", color);
            return;
        }
        self.settings.bg_color = color.to_string();
        self.refresh_chrome();
    }

    pub fn set_menubar_color(&mut self, color: &str) {
        if parse_hex(color).is_err() {
            eprintln!("set_menubar_color: rejecting color {:?}", color);
            return;
        }
        self.settings.menubar_color = color.to_string();
        self.refresh_chrome();
    }

    pub fn set_bg_alpha(&mut self, alpha: f64) {
        self.settings.bg_alpha = alpha.clamp(MIN_BG_ALPHA, MAX_BG_ALPHA);
        self.refresh_chrome();
    }

    /// Left click on a toolbar swatch: make the swatch color current.
    pub fn pick_swatch(&mut self, category: SwatchCategory, idx: usize) {
        let color = match self.palettes.get(category, idx) {
            Ok(color) => color.to_string(),
            Err(e) => {
                eprintln!("pick_swatch: {}", e);
                return;
            }
        };
        match category {
            SwatchCategory::Background => self.set_background(&color),
            SwatchCategory::MenuBar => self.set_menubar_color(&color),
            SwatchCategory::Style(style_idx) => {
                if self
                    .styles
                    .update(style_idx, StyleUpdate::Color(color))
                    .is_ok()
                {
                    self.apply_style_defs();
                    self.persist_settings();
                }
            }
        }
    }

    /// Right click on a toolbar swatch: recolor the swatch, then apply it,
    /// matching the quick-pick behavior.
    pub fn customize_swatch(&mut self, category: SwatchCategory, idx: usize) {
        let current = match self.palettes.get(category, idx) {
            Ok(color) => color.to_string(),
            Err(e) => {
                eprintln!("customize_swatch: {}", e);
                return;
            }
        };
        let seed = parse_hex(&current).unwrap_or((0, 0, 0));
        let Some(rgb) = dialog::color_chooser_with_default("Customize Swatch", ColorMode::Rgb, seed)
        else {
            return;
        };
        let color = format_hex(rgb);
        if let Err(e) = self.palettes.set(category, idx, &color) {
            eprintln!("customize_swatch: {}", e);
            return;
        }
        self.pick_swatch(category, idx);
    }

    pub fn choose_menubar_color(&mut self) {
        let seed = parse_hex(&self.settings.menubar_color).unwrap_or((17, 17, 17));
        if let Some(rgb) =
            dialog::color_chooser_with_default("Choose Menu Bar Color", ColorMode::Rgb, seed)
        {
            let color = format_hex(rgb);
            self.set_menubar_color(&color);
        }
    }

    // --- Settings ---

    pub fn open_settings(&mut self) {
        let draft = SettingsDraft {
            styles: self.styles.clone(),
            palettes: self.palettes.clone(),
            bg_color: self.settings.bg_color.clone(),
            bg_alpha: self.settings.bg_alpha,
            menubar_color: self.settings.menubar_color.clone(),
        };
        let edited = show_settings_dialog(&draft);
        self.styles = edited.styles;
        self.palettes = edited.palettes;
        self.palettes.ensure_style_palettes(self.styles.len());
        self.settings.bg_color = edited.bg_color;
        self.settings.bg_alpha = edited.bg_alpha.clamp(MIN_BG_ALPHA, MAX_BG_ALPHA);
        self.settings.menubar_color = edited.menubar_color;
        self.toolbar.set_alpha(self.settings.bg_alpha);
        self.apply_style_defs();
        self.refresh_chrome();
    }

    /// Repaint window, editor and toolbar from the current colors, then
    /// persist; every color change is a settings-affecting action.
    fn refresh_chrome(&mut self) {
        theme::apply_chrome(
            &mut self.window,
            &mut self.editor,
            &self.settings.bg_color,
            self.settings.bg_alpha,
        );
        self.menu
            .set_color(theme::to_color(&self.settings.menubar_color, (17, 17, 17)));
        self.menu
            .set_text_color(theme::fg_for(&self.settings.menubar_color));
        self.menu.redraw();
        self.toolbar
            .refresh(&self.styles, &self.palettes, &self.settings.menubar_color);
        self.persist_settings();
    }

    /// Collect registry and palette state back into the settings aggregate
    /// and write it. Failure is reported but never fatal.
    pub fn persist_settings(&mut self) {
        self.settings.styles = self.styles.presets().to_vec();
        self.settings.swatches = self.palettes.style_palettes().to_vec();
        self.settings.bg_swatches = self.palettes.background().to_vec();
        self.settings.menubar_swatches = self.palettes.menu_bar().to_vec();
        if let Err(e) = self.settings.save() {
            dialog::alert_default(&format!("Could not save settings.\n{}", e));
        }
    }

    pub fn toggle_toolbar(&mut self) {
        self.toolbar.toggle_collapse();
    }
}
