//! TUI screen implementations.

pub mod form_entry;

pub use form_entry::{FormEntryState, draw_form_entry};
