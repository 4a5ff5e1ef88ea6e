//! Application layer: the style-tag text model and everything that
//! persists or coordinates it.
//!
//! # Structure
//!
//! - `document` / `styles` / `palette` - the core session state
//! - `script` / `settings` - serialization to script and settings files
//! - `position` / `color` - pure helpers shared by core and UI
//! - `state.rs` - main application coordinator
//! - `messages.rs` - the event vocabulary for the dispatch loop in main

pub mod color;
pub mod document;
pub mod error;
pub mod messages;
pub mod palette;
pub mod position;
pub mod script;
pub mod settings;
pub mod state;
pub mod styles;

// Re-exports for convenient external access
pub use document::{ScriptDocument, TagRanges};
pub use error::{AppError, Result};
pub use messages::Message;
pub use palette::{PaletteStore, SwatchCategory};
pub use settings::AppSettings;
pub use state::AppState;
pub use styles::{StylePreset, StyleRegistry, StyleUpdate};
