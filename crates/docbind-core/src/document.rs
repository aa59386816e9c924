use crate::{
    model::Mapping,
    value::{Value, ValueKind},
};
use std::any::Any;
use thiserror::Error as ThisError;

///
/// FieldAccessError
///
/// Raised by a document when a generic value cannot be written into a
/// declared field. Surfaces through the unmarshaller with type context.
///

#[derive(Debug, ThisError)]
pub enum FieldAccessError {
    #[error("unknown field '{field}'")]
    UnknownField { field: String },

    #[error("field '{field}' rejected a value of kind {found}")]
    IncompatibleValue { field: String, found: ValueKind },
}

impl FieldAccessError {
    pub fn unknown(field: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
        }
    }

    pub fn incompatible(field: impl Into<String>, value: &Value) -> Self {
        Self::IncompatibleValue {
            field: field.into(),
            found: value.kind(),
        }
    }
}

///
/// Document
///
/// A record type that can be mapped to and from the store's generic
/// entity representation. Implementations declare their mapping once
/// (directives compiled into a cached descriptor by the registry) and
/// expose field values generically so the engine never needs reflection.
///
/// Embedded record fields are exposed through `embedded`/`embedded_mut`
/// rather than `get`/`set`; `embedded_mut` is expected to materialize an
/// optional child (`get_or_insert_with`) so the unmarshaller can
/// populate it in place.
///

pub trait Document: Default + Send + Sync + 'static {
    /// Declarative mapping directives for this type.
    fn mapping() -> Mapping;

    /// Read a scalar or list field as a generic value.
    /// Returns `None` for undeclared fields, `Some(Value::Null)` for an
    /// unset optional field.
    fn get(&self, field: &str) -> Option<Value>;

    /// Write a generic value into a scalar or list field.
    fn set(&mut self, field: &str, value: Value) -> Result<(), FieldAccessError>;

    /// Borrow an embedded record field.
    fn embedded(&self, _field: &str) -> Option<&dyn AnyDocument> {
        None
    }

    /// Borrow an embedded record field mutably, materializing it if unset.
    fn embedded_mut(&mut self, _field: &str) -> Option<&mut dyn AnyDocument> {
        None
    }
}

///
/// AnyDocument
///
/// Object-safe erasure over [`Document`], blanket-implemented for every
/// implementor. The engine recurses through embedded objects and invokes
/// lifecycle callbacks through this surface so descriptors never carry
/// generics at runtime.
///

pub trait AnyDocument: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn get_field(&self, field: &str) -> Option<Value>;
    fn set_field(&mut self, field: &str, value: Value) -> Result<(), FieldAccessError>;
    fn embedded_field(&self, field: &str) -> Option<&dyn AnyDocument>;
    fn embedded_field_mut(&mut self, field: &str) -> Option<&mut dyn AnyDocument>;
}

impl<T: Document> AnyDocument for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn get_field(&self, field: &str) -> Option<Value> {
        self.get(field)
    }

    fn set_field(&mut self, field: &str, value: Value) -> Result<(), FieldAccessError> {
        self.set(field, value)
    }

    fn embedded_field(&self, field: &str) -> Option<&dyn AnyDocument> {
        self.embedded(field)
    }

    fn embedded_field_mut(&mut self, field: &str) -> Option<&mut dyn AnyDocument> {
        self.embedded_mut(field)
    }
}
