use tokio::sync::watch;

use super::pulse::Pulse;
use crate::model::{Field, FormRecord};

/// Owner of the canonical [`FormRecord`].
///
/// All writes go through [`set_field`](Self::set_field) or
/// [`load_record`](Self::load_record); readers get copies. Editing the room
/// raises the selection pulse, a short confirmation that a choice was
/// registered.
#[derive(Debug)]
pub struct FormStore {
    record: watch::Sender<FormRecord>,
    selection: Pulse,
}

impl Default for FormStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FormStore {
    /// Creates a store holding an empty record.
    pub fn new() -> Self {
        Self::with_selection_pulse(Pulse::new())
    }

    /// Creates a store holding an empty record with a custom selection pulse.
    pub fn with_selection_pulse(selection: Pulse) -> Self {
        let (record, _) = watch::channel(FormRecord::default());
        Self { record, selection }
    }

    /// Replaces exactly one field and notifies observers.
    ///
    /// Never fails. Outside a tokio runtime a room edit is still applied but
    /// the selection pulse stays inactive.
    pub fn set_field(&self, field: Field, value: impl Into<String>) {
        let value = value.into();
        tracing::debug!(%field, len = value.len(), "Field edited");
        self.record.send_modify(|record| record.set(field, value));
        if field == Field::Room {
            self.selection.raise();
        }
    }

    /// Replaces the whole record; nothing of the previous one is kept.
    pub fn load_record(&self, record: FormRecord) {
        self.record.send_replace(record);
    }

    /// Returns a copy of the current record.
    pub fn snapshot(&self) -> FormRecord {
        self.record.borrow().clone()
    }

    /// Returns a receiver that observes every change of the record.
    pub fn subscribe(&self) -> watch::Receiver<FormRecord> {
        self.record.subscribe()
    }

    /// Returns the room selection pulse.
    pub fn selection(&self) -> &Pulse {
        &self.selection
    }
}
