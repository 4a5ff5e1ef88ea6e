use fltk::{
    app::{self, Sender},
    button::Button,
    enums::{Event, FrameType},
    frame::Frame,
    group::Flex,
    prelude::*,
    valuator::HorNiceSlider,
};

use crate::app::messages::Message;
use crate::app::palette::{PaletteStore, SwatchCategory, PALETTE_LEN};
use crate::app::settings::{MAX_BG_ALPHA, MIN_BG_ALPHA};
use crate::app::styles::StyleRegistry;

use super::theme::{display_font, fg_for, to_color};

pub const TOOLBAR_HEIGHT: i32 = 36;
pub const TOOLBAR_COLLAPSED_HEIGHT: i32 = 22;

const STYLE_BUTTON_WIDTH: i32 = 72;
const SWATCH_WIDTH: i32 = 22;
const LABEL_WIDTH: i32 = 92;

/// The always-visible strip above the editor: one button per style preset,
/// background and toolbar swatch rows, the opacity slider, and the
/// settings/collapse buttons.
pub struct Toolbar {
    pub row: Flex,
    parent: Flex,
    style_buttons: Vec<Button>,
    bg_swatch_buttons: Vec<Button>,
    menubar_swatch_buttons: Vec<Button>,
    labels: Vec<Frame>,
    alpha_slider: HorNiceSlider,
    menubar_color_btn: Button,
    settings_btn: Button,
    collapse_btn: Button,
    collapsed: bool,
}

/// A flat color button that sends `PickSwatch` on left click and
/// `CustomizeSwatch` on right click.
fn swatch_button(
    row: &mut Flex,
    category: SwatchCategory,
    idx: usize,
    sender: &Sender<Message>,
) -> Button {
    let mut btn = Button::default();
    btn.set_frame(FrameType::FlatBox);
    row.fixed(&btn, SWATCH_WIDTH);
    let s = *sender;
    btn.handle(move |_, ev| match ev {
        Event::Push => {
            if app::event_mouse_button() == app::MouseButton::Right {
                s.send(Message::CustomizeSwatch(category, idx));
            } else {
                s.send(Message::PickSwatch(category, idx));
            }
            true
        }
        _ => false,
    });
    btn
}

impl Toolbar {
    pub fn new(parent: &mut Flex, style_count: usize, sender: &Sender<Message>) -> Self {
        let mut row = Flex::default().row();
        row.set_frame(FrameType::FlatBox);
        row.set_margin(2);
        row.set_pad(2);

        let mut style_buttons = Vec::with_capacity(style_count);
        for idx in 0..style_count {
            let mut btn = Button::default();
            row.fixed(&btn, STYLE_BUTTON_WIDTH);
            let s = *sender;
            btn.set_callback(move |_| s.send(Message::ApplyStyle(idx)));
            style_buttons.push(btn);
        }

        let mut labels = Vec::new();

        let bg_label = Frame::default().with_label("-Background-");
        row.fixed(&bg_label, LABEL_WIDTH);
        labels.push(bg_label);

        let mut bg_swatch_buttons = Vec::with_capacity(PALETTE_LEN);
        for idx in 0..PALETTE_LEN {
            bg_swatch_buttons.push(swatch_button(
                &mut row,
                SwatchCategory::Background,
                idx,
                sender,
            ));
        }

        let alpha_label = Frame::default().with_label("Alpha:");
        row.fixed(&alpha_label, 48);
        labels.push(alpha_label);

        let mut alpha_slider = HorNiceSlider::default();
        row.fixed(&alpha_slider, 110);
        alpha_slider.set_bounds(MIN_BG_ALPHA, MAX_BG_ALPHA);
        alpha_slider.set_callback({
            let s = *sender;
            move |slider| s.send(Message::SetBackgroundAlpha(slider.value()))
        });

        let mb_label = Frame::default().with_label("-Menu Bar-");
        row.fixed(&mb_label, LABEL_WIDTH);
        labels.push(mb_label);

        let mut menubar_swatch_buttons = Vec::with_capacity(PALETTE_LEN);
        for idx in 0..PALETTE_LEN {
            menubar_swatch_buttons.push(swatch_button(
                &mut row,
                SwatchCategory::MenuBar,
                idx,
                sender,
            ));
        }

        let mut menubar_color_btn = Button::default().with_label("Color");
        row.fixed(&menubar_color_btn, 54);
        menubar_color_btn.set_callback({
            let s = *sender;
            move |_| s.send(Message::ChooseMenuBarColor)
        });

        // spacer: the one unfixed child soaks up leftover width
        Frame::default();

        let mut settings_btn = Button::default().with_label("Settings");
        row.fixed(&settings_btn, 70);
        settings_btn.set_callback({
            let s = *sender;
            move |_| s.send(Message::OpenSettings)
        });

        let mut collapse_btn = Button::default().with_label("▲");
        row.fixed(&collapse_btn, 26);
        collapse_btn.set_callback({
            let s = *sender;
            move |_| s.send(Message::ToggleToolbar)
        });

        row.end();
        parent.fixed(&row, TOOLBAR_HEIGHT);

        Self {
            row,
            parent: parent.clone(),
            style_buttons,
            bg_swatch_buttons,
            menubar_swatch_buttons,
            labels,
            alpha_slider,
            menubar_color_btn,
            settings_btn,
            collapse_btn,
            collapsed: false,
        }
    }

    /// Repaint every toolbar widget from current presets, palettes and
    /// toolbar color.
    pub fn refresh(&mut self, styles: &StyleRegistry, palettes: &PaletteStore, menubar_hex: &str) {
        let bg = to_color(menubar_hex, (17, 17, 17));
        let fg = fg_for(menubar_hex);

        self.row.set_color(bg);

        for (idx, btn) in self.style_buttons.iter_mut().enumerate() {
            if let Ok(preset) = styles.get(idx) {
                btn.set_label(&preset.name);
                btn.set_label_font(display_font(&preset.font, idx > 0));
                btn.set_label_size(12);
                btn.set_color(bg);
                btn.set_label_color(fg);
            }
        }

        for label in &mut self.labels {
            label.set_label_color(fg);
        }

        for (idx, btn) in self.bg_swatch_buttons.iter_mut().enumerate() {
            if let Ok(color) = palettes.get(SwatchCategory::Background, idx) {
                btn.set_color(to_color(color, (0, 0, 0)));
            }
        }
        for (idx, btn) in self.menubar_swatch_buttons.iter_mut().enumerate() {
            if let Ok(color) = palettes.get(SwatchCategory::MenuBar, idx) {
                btn.set_color(to_color(color, (0, 0, 0)));
            }
        }

        self.alpha_slider.set_color(bg);
        self.menubar_color_btn.set_color(bg);
        self.menubar_color_btn.set_label_color(fg);
        self.settings_btn.set_color(bg);
        self.settings_btn.set_label_color(fg);
        self.collapse_btn.set_color(bg);
        self.collapse_btn.set_label_color(fg);

        self.row.redraw();
    }

    /// Sync the slider to a loaded alpha value without firing its callback.
    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha_slider.set_value(alpha);
    }

    /// Hide everything but the collapse handle, or bring it all back.
    pub fn toggle_collapse(&mut self) {
        self.collapsed = !self.collapsed;
        let handle = self.collapse_btn.as_widget_ptr();
        for i in 0..self.row.children() {
            if let Some(mut child) = self.row.child(i) {
                if child.as_widget_ptr() == handle {
                    continue;
                }
                if self.collapsed {
                    child.hide();
                } else {
                    child.show();
                }
            }
        }
        self.collapse_btn
            .set_label(if self.collapsed { "▼" } else { "▲" });
        let height = if self.collapsed {
            TOOLBAR_COLLAPSED_HEIGHT
        } else {
            TOOLBAR_HEIGHT
        };
        self.parent.fixed(&self.row, height);
        // Flex recomputes its layout on resize
        let (x, y, w, h) = (
            self.parent.x(),
            self.parent.y(),
            self.parent.w(),
            self.parent.h(),
        );
        self.parent.resize(x, y, w, h);
        self.row.redraw();
        self.parent.redraw();
    }
}
