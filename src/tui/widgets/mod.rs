//! Reusable TUI widgets.

pub mod feedback_bar;
pub mod form;
pub mod room_picker;

pub use feedback_bar::{FeedbackContext, draw_feedback_bar};
pub use form::{FormField, draw_form, form_height, mask};
pub use room_picker::{PickerOutcome, RoomPickerState, draw_room_picker};
