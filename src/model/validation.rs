use thiserror::Error;

use super::record::{Field, FormRecord};

/// Validation errors raised at submit time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required fields: {}", join_fields(.0))]
    Incomplete(Vec<Field>),
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|field| field.key())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validates that every field of `record` is non-empty.
///
/// This is a pure completeness check: no trimming and no format rules.
pub fn validate_complete(record: &FormRecord) -> Result<(), ValidationError> {
    match record.missing_fields() {
        missing if missing.is_empty() => Ok(()),
        missing => Err(ValidationError::Incomplete(missing)),
    }
}
