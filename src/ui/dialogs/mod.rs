pub mod settings_dialog;

use fltk::{app, prelude::*, window::Window};

/// Block until the dialog is hidden. A pending program quit (the main
/// window was closed underneath the dialog) also tears it down.
pub fn run_dialog(dialog: &Window) {
    let mut handle = dialog.clone();
    while handle.shown() {
        app::wait();
        if app::should_program_quit() {
            handle.hide();
        }
    }
}
