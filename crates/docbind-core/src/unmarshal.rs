use crate::{
    convert,
    document::{AnyDocument, Document, FieldAccessError},
    entity::Entity,
    error::{ErrorClass, ErrorOrigin, MappingError},
    key::{Id, IdKind},
    model::{CallbackPhase, EntityModel, PropertyKind},
    registry::ModelRegistry,
    value::{Value, ValueKind},
};
use thiserror::Error as ThisError;

///
/// UnmarshalError
/// Failures turning a stored entity back into a document.
///

#[derive(Debug, ThisError)]
pub enum UnmarshalError {
    #[error("type '{type_path}': {source}")]
    FieldWrite {
        type_path: &'static str,
        source: FieldAccessError,
    },

    #[error("type '{type_path}': stored id '{id}' does not match the declared {expected} identifier")]
    IdKindMismatch {
        type_path: &'static str,
        id: Id,
        expected: IdKind,
    },

    #[error("type '{type_path}': property '{name}' holds {found}, expected a nested entity")]
    NotAnEntity {
        type_path: &'static str,
        name: String,
        found: ValueKind,
    },

    #[error("type '{type_path}': embedded field '{field}' is not reachable")]
    EmbeddedUnreachable {
        type_path: &'static str,
        field: String,
    },
}

impl UnmarshalError {
    pub(crate) const fn class() -> ErrorClass {
        ErrorClass::Conversion
    }
}

impl From<UnmarshalError> for MappingError {
    fn from(err: UnmarshalError) -> Self {
        Self::new(
            UnmarshalError::class(),
            ErrorOrigin::Unmarshal,
            err.to_string(),
        )
    }
}

///
/// Unmarshaller
///
/// Populates a defaulted document from a stored entity: the key feeds
/// the identifier and parent-key fields, properties pass back through
/// the converter, nested entities recurse into embedded records.
/// Absent and null properties leave the field at its default, so older
/// rows load cleanly after a mapping gains a field.
///

pub struct Unmarshaller<'a> {
    registry: &'a ModelRegistry,
}

impl<'a> Unmarshaller<'a> {
    #[must_use]
    pub const fn new(registry: &'a ModelRegistry) -> Self {
        Self { registry }
    }

    /// Unmarshal a loaded entity, running after-load callbacks.
    /// `None` in, `None` out: a missing entity is not an error here.
    pub fn unmarshal<T: Document>(
        &self,
        entity: Option<&Entity>,
    ) -> Result<Option<T>, MappingError> {
        let Some(entity) = entity else {
            return Ok(None);
        };
        let model = self.registry.model_of::<T>()?;
        let mut doc = T::default();
        populate(&mut doc, &model, entity)?;
        self.registry
            .run_callbacks(&model, &mut doc, CallbackPhase::AfterLoad);
        Ok(Some(doc))
    }
}

fn populate(
    doc: &mut dyn AnyDocument,
    model: &EntityModel,
    entity: &Entity,
) -> Result<(), MappingError> {
    if let Some(identifier) = &model.identifier {
        if let Some(id) = entity.key.id() {
            let value = match (id, identifier.id_kind) {
                (Id::Long(v), IdKind::Long) => Value::Int(*v),
                (Id::Str(v), IdKind::Str) => Value::Text(v.clone()),
                (id, expected) => {
                    return Err(UnmarshalError::IdKindMismatch {
                        type_path: model.type_path,
                        id: id.clone(),
                        expected,
                    }
                    .into());
                }
            };
            doc.set_field(&identifier.field, value)
                .map_err(|source| field_write(model, source))?;
        }
    }

    if let Some(parent_model) = &model.parent_key {
        if let Some(parent) = entity.key.parent() {
            doc.set_field(&parent_model.field, Value::Key(parent.clone()))
                .map_err(|source| field_write(model, source))?;
        }
    }

    for property in &model.properties {
        if property.ignored {
            continue;
        }
        let Some(value) = entity.property(&property.mapped_name) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        match &property.kind {
            PropertyKind::Value(field_kind) => {
                let value = convert::from_property(&property.field, *field_kind, value.clone())?;
                doc.set_field(&property.field, value)
                    .map_err(|source| field_write(model, source))?;
            }
            PropertyKind::Embedded(embedded) => {
                let Some(nested) = value.as_entity() else {
                    return Err(UnmarshalError::NotAnEntity {
                        type_path: model.type_path,
                        name: property.mapped_name.clone(),
                        found: value.kind(),
                    }
                    .into());
                };
                let child = doc.embedded_field_mut(&property.field).ok_or_else(|| {
                    UnmarshalError::EmbeddedUnreachable {
                        type_path: model.type_path,
                        field: property.field.clone(),
                    }
                })?;
                populate(child, &embedded.model, nested)?;
            }
        }
    }

    Ok(())
}

fn field_write(model: &EntityModel, source: FieldAccessError) -> MappingError {
    UnmarshalError::FieldWrite {
        type_path: model.type_path,
        source,
    }
    .into()
}
