use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four fixed form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Room,
    Password,
}

impl Field {
    /// All fields in display order.
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Room, Field::Password];

    /// Returns the persisted key for this field.
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Room => "room",
            Field::Password => "password",
        }
    }

    /// Returns the human-readable label shown next to the input.
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Room => "Room",
            Field::Password => "Password",
        }
    }
}

#[mutants::skip]
impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The four-field user input collected by the form.
///
/// Every field is always present; an untouched field is the empty string.
/// Serialized as a JSON object with exactly the keys `name`, `email`,
/// `room` and `password`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormRecord {
    pub name: String,
    pub email: String,
    pub room: String,
    pub password: String,
}

impl FormRecord {
    /// Creates a record from the four field values.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        room: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            room: room.into(),
            password: password.into(),
        }
    }

    /// Returns the value of `field`.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Room => &self.room,
            Field::Password => &self.password,
        }
    }

    /// Replaces the value of `field`, leaving the others untouched.
    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Room => &mut self.room,
            Field::Password => &mut self.password,
        };
        *slot = value;
    }

    /// Returns the fields holding the empty string, in display order.
    ///
    /// Whitespace is not trimmed: `" "` counts as filled.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|&field| self.get(field).is_empty())
            .collect()
    }

    /// Returns `true` if no field is empty.
    pub fn is_complete(&self) -> bool {
        Field::ALL.into_iter().all(|field| !self.get(field).is_empty())
    }
}
