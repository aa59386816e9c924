use crate::{
    document::Document,
    entity::Entity,
    error::{ErrorClass, ErrorDetail, ErrorOrigin, MappingError},
    key::{EntityKey, Id},
    marshal::{Marshaller, Operation},
    model::{CallbackPhase, EntityModel, VersionModel},
    registry::ModelRegistry,
    store::{StoreClient, StoreTransaction},
    value::Value,
};
use thiserror::Error as ThisError;

///
/// LockError
///
/// Outcome of a failed optimistic-lock update. Carried as structured
/// detail so callers can branch on conflict-vs-missing without parsing
/// messages.
///

#[derive(Debug, ThisError)]
pub enum LockError {
    #[error("entity does not exist: {key}")]
    EntityNotFound { key: EntityKey },

    #[error("optimistic lock conflict: expecting version {expected}, but found {found}")]
    Conflict { expected: i64, found: i64 },
}

impl From<LockError> for MappingError {
    fn from(err: LockError) -> Self {
        let class = match err {
            LockError::EntityNotFound { .. } => ErrorClass::NotFound,
            LockError::Conflict { .. } => ErrorClass::Conflict,
        };
        let message = err.to_string();
        Self {
            class,
            origin: ErrorOrigin::Writer,
            message,
            detail: Some(ErrorDetail::Lock(err)),
        }
    }
}

///
/// DocumentWriter
///
/// Write-side entry point: marshals documents, hands entities to the
/// store, and refreshes each document from the store's response (the
/// assigned identifier and the stored version counter). Batch variants
/// preserve input order and stop at the first failure.
///

pub struct DocumentWriter<'a, S: StoreClient> {
    registry: &'a ModelRegistry,
    store: &'a S,
}

impl<'a, S: StoreClient> DocumentWriter<'a, S> {
    #[must_use]
    pub const fn new(registry: &'a ModelRegistry, store: &'a S) -> Self {
        Self { registry, store }
    }

    pub fn insert<T: Document>(&self, doc: &mut T) -> Result<(), MappingError> {
        self.write_one(doc, Operation::Insert)
    }

    pub fn insert_many<T: Document>(&self, docs: &mut [T]) -> Result<(), MappingError> {
        for doc in docs.iter_mut() {
            self.write_one(doc, Operation::Insert)?;
        }
        Ok(())
    }

    pub fn update<T: Document>(&self, doc: &mut T) -> Result<(), MappingError> {
        self.write_one(doc, Operation::Update)
    }

    pub fn update_many<T: Document>(&self, docs: &mut [T]) -> Result<(), MappingError> {
        for doc in docs.iter_mut() {
            self.write_one(doc, Operation::Update)?;
        }
        Ok(())
    }

    pub fn upsert<T: Document>(&self, doc: &mut T) -> Result<(), MappingError> {
        self.write_one(doc, Operation::Upsert)
    }

    pub fn upsert_many<T: Document>(&self, docs: &mut [T]) -> Result<(), MappingError> {
        for doc in docs.iter_mut() {
            self.write_one(doc, Operation::Upsert)?;
        }
        Ok(())
    }

    /// Update only if the stored version still matches the document's.
    ///
    /// Runs get-compare-increment-write inside a store transaction. On
    /// a version mismatch the update is abandoned with a conflict error
    /// and nothing is written; the caller re-reads and retries. A type
    /// without a version field falls back to a plain update.
    pub fn update_with_optimistic_lock<T: Document>(
        &self,
        doc: &mut T,
    ) -> Result<(), MappingError> {
        let model = self.registry.model_of::<T>()?;
        let Some(version_model) = model.version.clone() else {
            return self.write_one(doc, Operation::Update);
        };

        let entity = self
            .marshaller()
            .marshal_with(doc, Operation::Update, false)?;
        require_complete(&entity.key, "update")?;

        let mut txn = self.store.begin_transaction()?;
        let result = lock_and_update(&mut *txn, entity, &version_model);
        rollback_if_active(&mut *txn);
        let stored = result?;

        self.refresh_from(doc, &model, &stored)?;
        self.registry
            .run_callbacks(&model, doc, CallbackPhase::AfterUpdate);
        Ok(())
    }

    pub fn delete<T: Document>(&self, doc: &mut T) -> Result<(), MappingError> {
        let model = self.registry.model_of::<T>()?;
        self.registry
            .run_callbacks(&model, doc, CallbackPhase::BeforeDelete);

        let key = self.marshaller().marshal_key(doc)?;
        require_complete(&key, "delete")?;
        self.store.delete(&key)?;

        self.registry
            .run_callbacks(&model, doc, CallbackPhase::AfterDelete);
        Ok(())
    }

    pub fn delete_many<T: Document>(&self, docs: &mut [T]) -> Result<(), MappingError> {
        for doc in docs.iter_mut() {
            self.delete(doc)?;
        }
        Ok(())
    }

    /// Delete by key. Runs no callbacks; there is no document to pass them.
    pub fn delete_by_key(&self, key: &EntityKey) -> Result<(), MappingError> {
        require_complete(key, "delete")?;
        self.store.delete(key)?;
        Ok(())
    }

    pub fn delete_by_id<T: Document>(&self, id: impl Into<Id>) -> Result<(), MappingError> {
        let key = self.key_of::<T>(id.into(), None)?;
        self.store.delete(&key)?;
        Ok(())
    }

    pub fn delete_by_id_with_parent<T: Document>(
        &self,
        parent: EntityKey,
        id: impl Into<Id>,
    ) -> Result<(), MappingError> {
        let key = self.key_of::<T>(id.into(), Some(parent))?;
        self.store.delete(&key)?;
        Ok(())
    }

    const fn marshaller(&self) -> Marshaller<'a> {
        Marshaller::new(self.registry)
    }

    fn write_one<T: Document>(&self, doc: &mut T, operation: Operation) -> Result<(), MappingError> {
        let model = self.registry.model_of::<T>()?;
        let entity = self.marshaller().marshal(doc, operation)?;
        if operation == Operation::Update {
            require_complete(&entity.key, "update")?;
        }

        let stored = match operation {
            Operation::Insert => self.store.insert(entity),
            Operation::Update => self.store.update(entity),
            Operation::Upsert => self.store.upsert(entity),
        }?;

        self.refresh_from(doc, &model, &stored)?;
        self.registry
            .run_callbacks(&model, doc, operation.post_phase());
        Ok(())
    }

    /// Write the store-assigned identifier and the stored version back
    /// into the document. Other fields already hold what was written.
    fn refresh_from<T: Document>(
        &self,
        doc: &mut T,
        model: &EntityModel,
        stored: &Entity,
    ) -> Result<(), MappingError> {
        if let Some(identifier) = &model.identifier {
            if let Some(id) = stored.key.id() {
                let value = match id {
                    Id::Long(v) => Value::Int(*v),
                    Id::Str(v) => Value::Text(v.clone()),
                };
                doc.set(&identifier.field, value).map_err(|err| {
                    MappingError::writer_internal(format!(
                        "response id rejected by type '{}': {err}",
                        model.type_path
                    ))
                })?;
            }
        }
        if let Some(version) = &model.version {
            if let Some(v) = stored.property(&version.mapped_name).and_then(Value::as_int) {
                doc.set(&version.field, Value::Int(v)).map_err(|err| {
                    MappingError::writer_internal(format!(
                        "response version rejected by type '{}': {err}",
                        model.type_path
                    ))
                })?;
            }
        }
        Ok(())
    }

    fn key_of<T: Document>(
        &self,
        id: Id,
        parent: Option<EntityKey>,
    ) -> Result<EntityKey, MappingError> {
        let model = self.registry.model_of::<T>()?;
        if let Some(identifier) = &model.identifier {
            if id.kind() != identifier.id_kind {
                return Err(MappingError::new(
                    ErrorClass::Conversion,
                    ErrorOrigin::Writer,
                    format!(
                        "id '{id}' does not match the declared {} identifier of '{}'",
                        identifier.id_kind, model.type_path
                    ),
                ));
            }
        }
        let key = EntityKey::complete(model.kind.clone(), id);
        Ok(match parent {
            Some(parent) => key.with_parent(parent),
            None => key,
        })
    }
}

fn require_complete(key: &EntityKey, operation: &str) -> Result<(), MappingError> {
    if key.is_complete() {
        Ok(())
    } else {
        Err(MappingError::new(
            ErrorClass::Conversion,
            ErrorOrigin::Writer,
            format!("{operation} requires a complete key, got '{key}'"),
        ))
    }
}

fn lock_and_update(
    txn: &mut dyn StoreTransaction,
    mut entity: Entity,
    version: &VersionModel,
) -> Result<Entity, MappingError> {
    let expected = entity
        .property(&version.mapped_name)
        .and_then(Value::as_int)
        .unwrap_or(0);

    let current = txn.get(&entity.key)?.ok_or_else(|| LockError::EntityNotFound {
        key: entity.key.clone(),
    })?;
    let found = current
        .property(&version.mapped_name)
        .and_then(Value::as_int)
        .unwrap_or(0);
    if found != expected {
        return Err(LockError::Conflict { expected, found }.into());
    }

    entity.set_property(version.mapped_name.clone(), Value::Int(expected + 1));
    txn.update(entity.clone())?;
    txn.commit()?;
    Ok(entity)
}

/// Best-effort cleanup after a failed lock attempt; the original
/// failure is the one reported.
fn rollback_if_active(txn: &mut dyn StoreTransaction) {
    if txn.is_active() {
        let _ = txn.rollback();
    }
}
