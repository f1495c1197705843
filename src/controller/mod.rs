//! The form state controller: field store, feedback pulses, and the
//! submission state machine.

mod error;
mod form_store;
mod pulse;
mod submission;

pub use error::SubmitError;
pub use form_store::FormStore;
pub use pulse::{PULSE_DURATION, Pulse};
pub use submission::{Phase, SubmissionController};
