mod record;
mod room;
mod validation;

pub use record::{Field, FormRecord};
pub use room::RoomChoices;
pub use validation::{ValidationError, validate_complete};
