//! Actions returned by screen event handlers.

use crate::model::Field;

/// An action that a screen handler returns to the [`App`](super::App).
///
/// The `App` interprets these against the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No controller call needed.
    None,
    /// Replace the value of a field.
    Edit(Field, String),
    /// Validate and save the form.
    Submit,
    /// Quit the application.
    Quit,
}
