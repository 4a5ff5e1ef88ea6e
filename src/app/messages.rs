use super::palette::SwatchCategory;

/// All messages that can be sent through the FLTK channel.
/// Each widget callback sends one of these; the dispatch loop in main
/// handles them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    // File
    ScriptOpen,
    ScriptSaveAs,
    OpenSettings,
    Quit,
    WindowClose,

    // Styling
    ApplyStyle(usize),

    // Chrome colors
    PickSwatch(SwatchCategory, usize),
    CustomizeSwatch(SwatchCategory, usize),
    ChooseMenuBarColor,
    SetBackgroundAlpha(f64),

    // Toolbar
    ToggleToolbar,
}
