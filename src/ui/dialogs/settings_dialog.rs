use std::cell::RefCell;
use std::rc::Rc;

use fltk::{
    app,
    button::Button,
    dialog::{self, ColorMode},
    enums::{Align, CallbackTrigger, FrameType},
    frame::Frame,
    input::Input,
    menu::Choice,
    prelude::*,
    valuator::HorNiceSlider,
    window::Window,
};

use crate::app::color::{format_hex, parse_hex};
use crate::app::palette::{SwatchCategory, PaletteStore, PALETTE_LEN};
use crate::app::settings::{MAX_BG_ALPHA, MIN_BG_ALPHA};
use crate::app::styles::{StyleRegistry, StyleUpdate, MAX_FONT_SIZE, MIN_FONT_SIZE};
use crate::ui::theme::{display_font, to_color};

use super::run_dialog;

const ROW_HEIGHT: i32 = 46;
const SWATCH: i32 = 22;

/// Everything the settings dialog can edit: a working copy handed in,
/// mutated by the widget callbacks, and handed back once the dialog closes.
/// The caller applies and persists the result.
#[derive(Debug, Clone)]
pub struct SettingsDraft {
    pub styles: StyleRegistry,
    pub palettes: PaletteStore,
    pub bg_color: String,
    pub bg_alpha: f64,
    pub menubar_color: String,
}

fn refresh_preview(frame: &mut Frame, styles: &StyleRegistry, idx: usize) {
    if let Ok(preset) = styles.get(idx) {
        frame.set_label_font(display_font(&preset.font, idx > 0));
        frame.set_label_size(preset.size as i32);
        frame.set_label_color(to_color(&preset.color, (0, 0, 0)));
        frame.redraw();
    }
}

/// Seed a color chooser with `hex` and return the picked color as hex.
fn pick_color(title: &str, hex: &str) -> Option<String> {
    let seed = parse_hex(hex).unwrap_or((0, 0, 0));
    dialog::color_chooser_with_default(title, ColorMode::Rgb, seed).map(format_hex)
}

/// A flat swatch button: left click hands the swatch color to `on_pick`,
/// right click recolors the swatch itself in the draft's palette store.
fn swatch_button(
    x: i32,
    y: i32,
    draft: &Rc<RefCell<SettingsDraft>>,
    category: SwatchCategory,
    idx: usize,
    on_pick: impl FnMut(String) + 'static,
) -> Button {
    let mut btn = Button::new(x, y, SWATCH, SWATCH, None);
    btn.set_frame(FrameType::FlatBox);
    let initial = draft
        .borrow()
        .palettes
        .get(category, idx)
        .map(str::to_string)
        .unwrap_or_default();
    btn.set_color(to_color(&initial, (0, 0, 0)));

    let draft = draft.clone();
    let mut on_pick = on_pick;
    btn.handle(move |b, ev| match ev {
        fltk::enums::Event::Push => {
            if app::event_mouse_button() == app::MouseButton::Right {
                let current = draft
                    .borrow()
                    .palettes
                    .get(category, idx)
                    .map(str::to_string)
                    .unwrap_or_default();
                if let Some(color) = pick_color("Customize Swatch", &current) {
                    if draft.borrow_mut().palettes.set(category, idx, &color).is_ok() {
                        b.set_color(to_color(&color, (0, 0, 0)));
                        b.redraw();
                    }
                }
            } else {
                let color = draft.borrow().palettes.get(category, idx).map(str::to_string);
                if let Ok(color) = color {
                    on_pick(color);
                }
            }
            true
        }
        _ => false,
    });
    btn
}

/// Show the modal settings panel. Style edits, swatch edits and chrome
/// color changes all land in the returned draft.
pub fn show_settings_dialog(current: &SettingsDraft) -> SettingsDraft {
    let draft = Rc::new(RefCell::new(current.clone()));
    let rows = current.styles.len() as i32;

    let styles_bottom = 40 + rows * ROW_HEIGHT;
    let bg_top = styles_bottom + 16;
    let mb_top = bg_top + 66;
    let height = mb_top + 66 + 52;

    let mut panel = Window::default()
        .with_size(740, height)
        .with_label("Settings")
        .center_screen();
    panel.make_modal(true);

    Frame::new(15, 10, 200, 22, None)
        .with_label("Styles")
        .set_align(Align::Left | Align::Inside);

    let font_names: Vec<String> = app::fonts()
        .iter()
        .map(|f| f.trim_start_matches('@').to_string())
        .collect();

    for row in 0..rows {
        let idx = row as usize;
        let y = 40 + row * ROW_HEIGHT;
        let Ok(preset) = current.styles.get(idx).map(|p| p.clone()) else {
            continue;
        };

        let mut preview = Frame::new(570, y, 150, ROW_HEIGHT - 6, None).with_label("Preview");
        preview.set_align(Align::Left | Align::Inside | Align::Clip);
        refresh_preview(&mut preview, &current.styles, idx);

        let mut name_input = Input::new(15, y, 95, 28, None);
        name_input.set_value(&preset.name);
        name_input.set_trigger(CallbackTrigger::Changed);
        name_input.set_callback({
            let draft = draft.clone();
            move |input| {
                let _ = draft
                    .borrow_mut()
                    .styles
                    .update(idx, StyleUpdate::Name(input.value()));
            }
        });

        let mut font_choice = Choice::new(115, y, 160, 28, None);
        for name in &font_names {
            font_choice.add_choice(name);
        }
        if let Some(pos) = font_names.iter().position(|f| f == &preset.font) {
            font_choice.set_value(pos as i32);
        }
        font_choice.set_callback({
            let draft = draft.clone();
            let mut preview = preview.clone();
            move |choice| {
                if let Some(font) = choice.choice() {
                    let mut d = draft.borrow_mut();
                    let _ = d.styles.update(idx, StyleUpdate::Font(font));
                    refresh_preview(&mut preview, &d.styles, idx);
                }
            }
        });

        let mut size_choice = Choice::new(280, y, 58, 28, None);
        for size in MIN_FONT_SIZE..=MAX_FONT_SIZE {
            size_choice.add_choice(&size.to_string());
        }
        size_choice.set_value(preset.size.saturating_sub(MIN_FONT_SIZE) as i32);
        size_choice.set_callback({
            let draft = draft.clone();
            let mut preview = preview.clone();
            move |choice| {
                if choice.value() >= 0 {
                    let size = MIN_FONT_SIZE + choice.value() as u32;
                    let mut d = draft.borrow_mut();
                    let _ = d.styles.update(idx, StyleUpdate::Size(size));
                    refresh_preview(&mut preview, &d.styles, idx);
                }
            }
        });

        let mut color_btn = Button::new(343, y, 52, 28, None).with_label("Color");
        color_btn.set_color(to_color(&preset.color, (0, 0, 0)));
        color_btn.set_callback({
            let draft = draft.clone();
            let mut preview = preview.clone();
            move |btn| {
                let current = match draft.borrow().styles.get(idx) {
                    Ok(p) => p.color.clone(),
                    Err(_) => return,
                };
                if let Some(color) = pick_color("Choose Text Color", &current) {
                    let mut d = draft.borrow_mut();
                    if d.styles.update(idx, StyleUpdate::Color(color.clone())).is_ok() {
                        btn.set_color(to_color(&color, (0, 0, 0)));
                        btn.redraw();
                        refresh_preview(&mut preview, &d.styles, idx);
                    }
                }
            }
        });

        for swatch in 0..PALETTE_LEN {
            let x = 400 + swatch as i32 * (SWATCH + 4);
            swatch_button(x, y + 3, &draft, SwatchCategory::Style(idx), swatch, {
                let draft = draft.clone();
                let mut color_btn = color_btn.clone();
                let mut preview = preview.clone();
                move |color: String| {
                    let mut d = draft.borrow_mut();
                    if d.styles.update(idx, StyleUpdate::Color(color.clone())).is_ok() {
                        color_btn.set_color(to_color(&color, (0, 0, 0)));
                        color_btn.redraw();
                        refresh_preview(&mut preview, &d.styles, idx);
                    }
                }
            });
        }
    }

    // Background section
    Frame::new(15, bg_top, 200, 22, None)
        .with_label("Background")
        .set_align(Align::Left | Align::Inside);
    Frame::new(15, bg_top + 26, 44, 28, None)
        .with_label("Color:")
        .set_align(Align::Left | Align::Inside);

    let mut bg_color_btn = Button::new(62, bg_top + 26, 62, 28, None).with_label("Choose");
    bg_color_btn.set_color(to_color(&current.bg_color, (34, 34, 34)));
    bg_color_btn.set_callback({
        let draft = draft.clone();
        move |btn| {
            let current = draft.borrow().bg_color.clone();
            if let Some(color) = pick_color("Choose Background Color", &current) {
                draft.borrow_mut().bg_color = color.clone();
                btn.set_color(to_color(&color, (0, 0, 0)));
                btn.redraw();
            }
        }
    });

    for swatch in 0..PALETTE_LEN {
        let x = 132 + swatch as i32 * (SWATCH + 4);
        swatch_button(
            x,
            bg_top + 29,
            &draft,
            SwatchCategory::Background,
            swatch,
            {
                let draft = draft.clone();
                let mut bg_color_btn = bg_color_btn.clone();
                move |color: String| {
                    draft.borrow_mut().bg_color = color.clone();
                    bg_color_btn.set_color(to_color(&color, (0, 0, 0)));
                    bg_color_btn.redraw();
                }
            },
        );
    }

    Frame::new(296, bg_top + 26, 44, 28, None)
        .with_label("Alpha:")
        .set_align(Align::Left | Align::Inside);
    let mut alpha_slider = HorNiceSlider::new(344, bg_top + 30, 120, 20, None);
    alpha_slider.set_bounds(MIN_BG_ALPHA, MAX_BG_ALPHA);
    alpha_slider.set_value(current.bg_alpha);
    alpha_slider.set_callback({
        let draft = draft.clone();
        move |slider| draft.borrow_mut().bg_alpha = slider.value()
    });

    // Menu bar section
    Frame::new(15, mb_top, 200, 22, None)
        .with_label("Menu Bar")
        .set_align(Align::Left | Align::Inside);
    Frame::new(15, mb_top + 26, 44, 28, None)
        .with_label("Color:")
        .set_align(Align::Left | Align::Inside);

    let mut mb_color_btn = Button::new(62, mb_top + 26, 62, 28, None).with_label("Choose");
    mb_color_btn.set_color(to_color(&current.menubar_color, (17, 17, 17)));
    mb_color_btn.set_callback({
        let draft = draft.clone();
        move |btn| {
            let current = draft.borrow().menubar_color.clone();
            if let Some(color) = pick_color("Choose Menu Bar Color", &current) {
                draft.borrow_mut().menubar_color = color.clone();
                btn.set_color(to_color(&color, (0, 0, 0)));
                btn.redraw();
            }
        }
    });

    for swatch in 0..PALETTE_LEN {
        let x = 132 + swatch as i32 * (SWATCH + 4);
        swatch_button(x, mb_top + 29, &draft, SwatchCategory::MenuBar, swatch, {
            let draft = draft.clone();
            let mut mb_color_btn = mb_color_btn.clone();
            move |color: String| {
                draft.borrow_mut().menubar_color = color.clone();
                mb_color_btn.set_color(to_color(&color, (0, 0, 0)));
                mb_color_btn.redraw();
            }
        });
    }

    let mut close_btn = Button::new(325, height - 40, 90, 30, None).with_label("Close");

    panel.end();
    panel.show();

    let panel_close = panel.clone();
    close_btn.set_callback(move |_| panel_close.clone().hide());
    panel.set_callback(|w| w.hide());

    run_dialog(&panel);

    let result = draft.borrow().clone();
    result
}
