use crate::{
    convert,
    document::{AnyDocument, Document},
    entity::Entity,
    error::{ErrorClass, ErrorOrigin, MappingError},
    key::{EntityKey, Id, IdKind},
    model::{CallbackPhase, EntityModel, PropertyKind},
    registry::ModelRegistry,
    value::{Value, ValueKind},
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Operation
/// Write operation driving callback phase selection and version handling.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operation {
    Insert,
    Update,
    Upsert,
}

impl Operation {
    pub(crate) const fn pre_phase(self) -> CallbackPhase {
        match self {
            Self::Insert | Self::Upsert => CallbackPhase::BeforeInsert,
            Self::Update => CallbackPhase::BeforeUpdate,
        }
    }

    pub(crate) const fn post_phase(self) -> CallbackPhase {
        match self {
            Self::Insert | Self::Upsert => CallbackPhase::AfterInsert,
            Self::Update => CallbackPhase::AfterUpdate,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Upsert => "upsert",
        };
        write!(f, "{label}")
    }
}

///
/// MarshalError
/// Failures turning a document's key fields into an entity key.
///

#[derive(Debug, ThisError)]
pub enum MarshalError {
    #[error("identifier field '{field}' is unset and not store-assigned")]
    MissingIdentifier { field: String },

    #[error("identifier field '{field}': expected a {expected} id, found {found}")]
    InvalidIdentifier {
        field: String,
        expected: IdKind,
        found: ValueKind,
    },

    #[error("parent-key field '{field}': expected a key value, found {found}")]
    InvalidParentKey { field: String, found: ValueKind },

    #[error("parent-key field '{field}' holds an incomplete key '{key}'")]
    IncompleteParentKey { field: String, key: EntityKey },
}

impl MarshalError {
    pub(crate) const fn class() -> ErrorClass {
        ErrorClass::Conversion
    }
}

impl From<MarshalError> for MappingError {
    fn from(err: MarshalError) -> Self {
        Self::new(MarshalError::class(), ErrorOrigin::Marshal, err.to_string())
    }
}

///
/// Marshaller
///
/// Turns documents into entities: key fields become the entity key,
/// mapped properties pass through the converter, embedded records
/// recurse into nested entities. Pre-operation callbacks run before any
/// field is read, so a callback's mutations are marshalled.
///

pub struct Marshaller<'a> {
    registry: &'a ModelRegistry,
}

impl<'a> Marshaller<'a> {
    #[must_use]
    pub const fn new(registry: &'a ModelRegistry) -> Self {
        Self { registry }
    }

    /// Marshal a document for a write operation. An update increments
    /// the version property in the produced entity (never on the
    /// document itself; the document is refreshed from the store's
    /// response).
    pub fn marshal<T: Document>(
        &self,
        doc: &mut T,
        operation: Operation,
    ) -> Result<Entity, MappingError> {
        self.marshal_with(doc, operation, matches!(operation, Operation::Update))
    }

    pub(crate) fn marshal_with<T: Document>(
        &self,
        doc: &mut T,
        operation: Operation,
        increment_version: bool,
    ) -> Result<Entity, MappingError> {
        let model = self.registry.model_of::<T>()?;
        self.registry
            .run_callbacks(&model, doc, operation.pre_phase());
        marshal_body(doc, &model, increment_version)
    }

    /// Build only the entity key for a document (used for deletes).
    /// Runs no callbacks.
    pub fn marshal_key<T: Document>(&self, doc: &T) -> Result<EntityKey, MappingError> {
        let model = self.registry.model_of::<T>()?;
        build_key(doc, &model)
    }
}

fn marshal_body(
    doc: &dyn AnyDocument,
    model: &EntityModel,
    increment_version: bool,
) -> Result<Entity, MappingError> {
    let key = if model.identifier.is_some() {
        build_key(doc, model)?
    } else {
        // Embedded-only type: the nested entity carries a placeholder key.
        EntityKey::incomplete(model.kind.clone())
    };

    let mut entity = Entity::new(key);
    for property in &model.properties {
        if property.ignored {
            continue;
        }
        match &property.kind {
            PropertyKind::Value(field_kind) => {
                let value = doc.get_field(&property.field).unwrap_or(Value::Null);
                let value = convert::to_property(&property.field, *field_kind, value)?;
                entity.set_property(property.mapped_name.clone(), value);
            }
            PropertyKind::Embedded(embedded) => match doc.embedded_field(&property.field) {
                Some(child) => {
                    let nested = marshal_body(child, &embedded.model, false)?;
                    entity.set_property(property.mapped_name.clone(), Value::Entity(nested));
                }
                None => entity.set_property(property.mapped_name.clone(), Value::Null),
            },
        }
    }

    if increment_version {
        if let Some(version) = &model.version {
            let current = entity
                .property(&version.mapped_name)
                .and_then(Value::as_int)
                .unwrap_or(0);
            entity.set_property(version.mapped_name.clone(), Value::Int(current + 1));
        }
    }

    Ok(entity)
}

fn build_key(doc: &dyn AnyDocument, model: &EntityModel) -> Result<EntityKey, MappingError> {
    let identifier = model.identifier.as_ref().ok_or_else(|| {
        MappingError::new(
            ErrorClass::Internal,
            ErrorOrigin::Marshal,
            format!("type '{}' resolved without an identifier", model.type_path),
        )
    })?;

    let id = match doc.get_field(&identifier.field).unwrap_or(Value::Null) {
        Value::Null => None,
        Value::Int(v) if identifier.id_kind == IdKind::Long => Some(Id::Long(v)),
        Value::Text(v) if identifier.id_kind == IdKind::Str => Some(Id::Str(v)),
        other => {
            return Err(MarshalError::InvalidIdentifier {
                field: identifier.field.clone(),
                expected: identifier.id_kind,
                found: other.kind(),
            }
            .into());
        }
    };

    if id.is_none() && !identifier.auto_generated {
        return Err(MarshalError::MissingIdentifier {
            field: identifier.field.clone(),
        }
        .into());
    }

    let mut key = match id {
        Some(id) => EntityKey::complete(model.kind.clone(), id),
        None => EntityKey::incomplete(model.kind.clone()),
    };

    if let Some(parent_model) = &model.parent_key {
        match doc.get_field(&parent_model.field).unwrap_or(Value::Null) {
            Value::Null => {}
            Value::Key(parent) => {
                if !parent.is_complete() {
                    return Err(MarshalError::IncompleteParentKey {
                        field: parent_model.field.clone(),
                        key: parent,
                    }
                    .into());
                }
                key = key.with_parent(parent);
            }
            other => {
                return Err(MarshalError::InvalidParentKey {
                    field: parent_model.field.clone(),
                    found: other.kind(),
                }
                .into());
            }
        }
    }

    Ok(key)
}
