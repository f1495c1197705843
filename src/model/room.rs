/// The room names offered when the fixed default set is used.
const DEFAULT_ROOMS: &[&str] = &[
    "Sala C13",
    "Sala C19",
    "Sala C17",
    "Sala C16",
    "Elétrica 1",
    "Elétrica 2",
];

/// An ordered, non-empty list of selectable room names.
///
/// The form treats rooms as an opaque enumeration supplied at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomChoices {
    rooms: Vec<String>,
}

impl Default for RoomChoices {
    fn default() -> Self {
        Self {
            rooms: DEFAULT_ROOMS.iter().map(|&room| room.to_owned()).collect(),
        }
    }
}

impl RoomChoices {
    /// Creates a choice list, or `None` if `rooms` is empty.
    pub fn new(rooms: Vec<String>) -> Option<Self> {
        (!rooms.is_empty()).then_some(Self { rooms })
    }

    /// Returns the room names in order.
    pub fn as_slice(&self) -> &[String] {
        &self.rooms
    }

    /// Returns the number of rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Returns `true` if there are no rooms, which `new` never allows.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Returns the room at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.rooms.get(index).map(String::as_str)
    }

    /// Returns the index of `name`, if it is one of the choices.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.rooms.iter().position(|room| room == name)
    }
}
