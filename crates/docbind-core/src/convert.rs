use crate::{
    error::{ErrorClass, ErrorOrigin, MappingError},
    model::FieldKind,
    value::{Value, ValueKind},
};
use thiserror::Error as ThisError;

///
/// ConvertError
///
/// A value failed the closed kind check for its declared field category.
/// Conversion never coerces across categories: an int field takes ints,
/// a float field takes floats, and nothing widens silently.
///

#[derive(Debug, ThisError)]
pub enum ConvertError {
    #[error("field '{field}': expected {expected} value, found {found}")]
    KindMismatch {
        field: String,
        expected: FieldKind,
        found: ValueKind,
    },

    #[error("field '{field}': list elements must be text or int, found {found}")]
    UnsupportedListElement { field: String, found: ValueKind },
}

impl ConvertError {
    pub(crate) const fn class() -> ErrorClass {
        ErrorClass::Conversion
    }
}

impl From<ConvertError> for MappingError {
    fn from(err: ConvertError) -> Self {
        Self::new(ConvertError::class(), ErrorOrigin::Convert, err.to_string())
    }
}

/// Check a field value on its way into an entity property.
///
/// Null passes through unconditionally; every mapped field is nullable.
/// The kind check is symmetric with [`from_property`], so a value that
/// marshals cleanly always unmarshals cleanly.
pub(crate) fn to_property(
    field: &str,
    declared: FieldKind,
    value: Value,
) -> Result<Value, ConvertError> {
    check_kind(field, declared, value)
}

/// Check a stored property value on its way back into a field.
pub(crate) fn from_property(
    field: &str,
    declared: FieldKind,
    value: Value,
) -> Result<Value, ConvertError> {
    check_kind(field, declared, value)
}

fn check_kind(field: &str, declared: FieldKind, value: Value) -> Result<Value, ConvertError> {
    if value.is_null() {
        return Ok(value);
    }

    let matched = match declared {
        FieldKind::Bool => value.kind() == ValueKind::Bool,
        FieldKind::Int => value.kind() == ValueKind::Int,
        FieldKind::Float => value.kind() == ValueKind::Float,
        FieldKind::Text => value.kind() == ValueKind::Text,
        FieldKind::Blob => value.kind() == ValueKind::Blob,
        FieldKind::Timestamp => value.kind() == ValueKind::Timestamp,
        FieldKind::KeyRef => value.kind() == ValueKind::Key,
        FieldKind::List => {
            let Some(items) = value.as_list() else {
                return Err(ConvertError::KindMismatch {
                    field: field.to_string(),
                    expected: declared,
                    found: value.kind(),
                });
            };
            // Element categories are dispatched per element, not per
            // list: a single bad element rejects the whole value.
            for item in items {
                match item.kind() {
                    ValueKind::Text | ValueKind::Int | ValueKind::Null => {}
                    found => {
                        return Err(ConvertError::UnsupportedListElement {
                            field: field.to_string(),
                            found,
                        });
                    }
                }
            }
            true
        }
    };

    if matched {
        Ok(value)
    } else {
        Err(ConvertError::KindMismatch {
            field: field.to_string(),
            expected: declared,
            found: value.kind(),
        })
    }
}
