use std::path::Path;

use fltk::dialog;

const SCRIPT_FILTER: &str = "*.{teleprompt,json}";

pub fn native_open_dialog() -> Option<String> {
    dialog::file_chooser("Open Script", SCRIPT_FILTER, ".", false)
}

pub fn native_save_dialog() -> Option<String> {
    dialog::file_chooser("Save Script As", SCRIPT_FILTER, ".", false)
}

/// Append the script extension when the chosen name has none.
pub fn ensure_script_extension(path: String) -> String {
    if Path::new(&path).extension().is_none() {
        format!("{}.teleprompt", path)
    } else {
        path
    }
}
