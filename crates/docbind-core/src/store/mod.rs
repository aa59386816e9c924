mod memory;

pub use memory::MemoryStore;

use crate::{
    entity::Entity,
    error::{ErrorClass, ErrorDetail, ErrorOrigin, MappingError},
    key::{EntityKey, Id},
};
use thiserror::Error as ThisError;

///
/// StoreAccessError
///
/// A failure reported by the store collaborator. Carried verbatim into
/// [`MappingError`] as structured detail; the engine never interprets
/// store failures beyond classifying them.
///

#[derive(Debug, ThisError)]
#[error("store {operation} failed: {message}")]
pub struct StoreAccessError {
    pub operation: &'static str,
    pub message: String,
}

impl StoreAccessError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

impl From<StoreAccessError> for MappingError {
    fn from(err: StoreAccessError) -> Self {
        let message = err.to_string();
        Self {
            class: ErrorClass::Store,
            origin: ErrorOrigin::Store,
            message,
            detail: Some(ErrorDetail::Store(err)),
        }
    }
}

///
/// StoreClient
///
/// The storage collaborator the engine writes entities to and reads
/// them from. Implementations are responsible for durability and id
/// allocation; the engine owns everything above the entity shape.
///
/// `insert` and `upsert` must complete an incomplete key (allocating an
/// identifier) and return the stored entity, so callers can write the
/// assigned id back into the source document.
///

pub trait StoreClient: Send + Sync {
    fn allocate_id(&self, kind: &str) -> Result<Id, StoreAccessError>;

    fn get(&self, key: &EntityKey) -> Result<Option<Entity>, StoreAccessError>;

    fn insert(&self, entity: Entity) -> Result<Entity, StoreAccessError>;

    fn update(&self, entity: Entity) -> Result<Entity, StoreAccessError>;

    fn upsert(&self, entity: Entity) -> Result<Entity, StoreAccessError>;

    /// Delete by key. Deleting an absent entity is not an error.
    fn delete(&self, key: &EntityKey) -> Result<(), StoreAccessError>;

    fn begin_transaction(&self) -> Result<Box<dyn StoreTransaction + '_>, StoreAccessError>;
}

///
/// StoreTransaction
///
/// A read-then-write unit against the store. Reads pass through to the
/// live store; writes are buffered and applied atomically on commit.
/// Every transaction must end in exactly one `commit` or `rollback`.
///

pub trait StoreTransaction {
    fn get(&self, key: &EntityKey) -> Result<Option<Entity>, StoreAccessError>;

    fn update(&mut self, entity: Entity) -> Result<(), StoreAccessError>;

    fn commit(&mut self) -> Result<(), StoreAccessError>;

    fn rollback(&mut self) -> Result<(), StoreAccessError>;

    fn is_active(&self) -> bool;
}
