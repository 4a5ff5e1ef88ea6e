use fltk::{
    app::Sender,
    group::Flex,
    menu::MenuBar,
    prelude::*,
    text::{TextBuffer, TextEditor, WrapMode},
    window::Window,
};

use crate::app::messages::Message;
use super::menu::build_menu;
use super::toolbar::Toolbar;

pub struct MainWidgets {
    pub wind: Window,
    pub flex: Flex,
    pub menu: MenuBar,
    pub toolbar: Toolbar,
    pub editor: TextEditor,
    pub buffer: TextBuffer,
    pub style_buffer: TextBuffer,
}

pub fn build_main_window(style_count: usize, sender: &Sender<Message>) -> MainWidgets {
    let mut wind = Window::new(100, 100, 900, 600, "Teleprompta");
    wind.set_xclass("Teleprompta");

    let mut flex = Flex::new(0, 0, 900, 600, None);
    flex.set_type(fltk::group::FlexType::Column);

    let mut menu = MenuBar::new(0, 0, 0, 28, "");
    flex.fixed(&menu, 28);
    build_menu(&mut menu, sender);

    let toolbar = Toolbar::new(&mut flex, style_count, sender);

    let buffer = TextBuffer::default();
    let style_buffer = TextBuffer::default();
    let mut editor = TextEditor::new(0, 0, 0, 0, "");
    editor.set_buffer(buffer.clone());
    editor.wrap_mode(WrapMode::AtBounds, 0);

    flex.end();
    wind.resizable(&flex);

    // Close button hands control to the dirty-check in the dispatch loop
    wind.set_callback({
        let s = *sender;
        move |_| s.send(Message::WindowClose)
    });

    MainWidgets {
        wind,
        flex,
        menu,
        toolbar,
        editor,
        buffer,
        style_buffer,
    }
}
