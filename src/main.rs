use fltk::{app, prelude::*};

use teleprompta::app::messages::Message;
use teleprompta::app::settings::AppSettings;
use teleprompta::app::state::AppState;
use teleprompta::ui::main_window::build_main_window;

fn main() {
    let fltk_app = app::App::default().load_system_fonts();
    let (sender, receiver) = app::channel::<Message>();

    let settings = AppSettings::load();
    let widgets = build_main_window(settings.styles.len(), &sender);
    let mut state = AppState::new(widgets, settings);

    state.window.show();
    state.window.set_on_top();
    state.load_last_script();

    while fltk_app.wait() {
        if let Some(msg) = receiver.recv() {
            match msg {
                Message::ApplyStyle(idx) => state.apply_style_to_selection(idx),

                Message::ScriptOpen => state.open_script(),
                Message::ScriptSaveAs => {
                    state.save_script_as();
                }
                Message::OpenSettings => state.open_settings(),

                Message::PickSwatch(category, idx) => state.pick_swatch(category, idx),
                Message::CustomizeSwatch(category, idx) => state.customize_swatch(category, idx),
                Message::ChooseMenuBarColor => state.choose_menubar_color(),
                Message::SetBackgroundAlpha(alpha) => state.set_bg_alpha(alpha),

                Message::ToggleToolbar => state.toggle_toolbar(),

                Message::Quit | Message::WindowClose => {
                    if state.handle_close() {
                        fltk_app.quit();
                    }
                }
            }
        }
    }
}
