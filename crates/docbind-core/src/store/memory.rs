use crate::{
    entity::Entity,
    key::{EntityKey, Id},
    store::{StoreAccessError, StoreClient, StoreTransaction},
};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

///
/// MemoryStore
///
/// In-process store backend. Rows are keyed by the full key path, long
/// identifiers are allocated from a per-kind sequence, and transactions
/// buffer writes until commit with last-write-wins semantics.
///
/// Intended for tests and local development; it makes no attempt at
/// durability.
///

#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<BTreeMap<String, Entity>>,
    sequences: RwLock<HashMap<String, i64>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    /// Complete an incomplete key by allocating an identifier for its kind.
    fn complete_key(&self, key: EntityKey) -> Result<EntityKey, StoreAccessError> {
        if key.is_complete() {
            return Ok(key);
        }
        let id = self.allocate_id(key.kind())?;
        Ok(key.with_id(id))
    }
}

fn path(key: &EntityKey) -> Result<String, StoreAccessError> {
    if key.is_complete() {
        Ok(key.to_string())
    } else {
        Err(StoreAccessError::new(
            "lookup",
            format!("key '{key}' is incomplete"),
        ))
    }
}

impl StoreClient for MemoryStore {
    fn allocate_id(&self, kind: &str) -> Result<Id, StoreAccessError> {
        let mut sequences = self.sequences.write();
        let next = sequences.entry(kind.to_string()).or_insert(0);
        *next += 1;
        Ok(Id::Long(*next))
    }

    fn get(&self, key: &EntityKey) -> Result<Option<Entity>, StoreAccessError> {
        let path = path(key)?;
        Ok(self.rows.read().get(&path).cloned())
    }

    fn insert(&self, entity: Entity) -> Result<Entity, StoreAccessError> {
        let mut entity = entity;
        entity.key = self.complete_key(entity.key)?;
        let path = path(&entity.key)?;

        let mut rows = self.rows.write();
        if rows.contains_key(&path) {
            return Err(StoreAccessError::new(
                "insert",
                format!("entity already exists: {}", entity.key),
            ));
        }
        rows.insert(path, entity.clone());
        Ok(entity)
    }

    fn update(&self, entity: Entity) -> Result<Entity, StoreAccessError> {
        let path = path(&entity.key)?;
        let mut rows = self.rows.write();
        if !rows.contains_key(&path) {
            return Err(StoreAccessError::new(
                "update",
                format!("entity does not exist: {}", entity.key),
            ));
        }
        rows.insert(path, entity.clone());
        Ok(entity)
    }

    fn upsert(&self, entity: Entity) -> Result<Entity, StoreAccessError> {
        let mut entity = entity;
        entity.key = self.complete_key(entity.key)?;
        let path = path(&entity.key)?;
        self.rows.write().insert(path, entity.clone());
        Ok(entity)
    }

    fn delete(&self, key: &EntityKey) -> Result<(), StoreAccessError> {
        let path = path(key)?;
        self.rows.write().remove(&path);
        Ok(())
    }

    fn begin_transaction(&self) -> Result<Box<dyn StoreTransaction + '_>, StoreAccessError> {
        Ok(Box::new(MemoryTransaction {
            store: self,
            pending: Vec::new(),
            active: true,
        }))
    }
}

///
/// MemoryTransaction
///
/// Buffered write set over a [`MemoryStore`]. Reads pass through to the
/// live store; updates are staged and applied in order on commit.
///

struct MemoryTransaction<'a> {
    store: &'a MemoryStore,
    pending: Vec<Entity>,
    active: bool,
}

impl MemoryTransaction<'_> {
    fn ensure_active(&self, operation: &'static str) -> Result<(), StoreAccessError> {
        if self.active {
            Ok(())
        } else {
            Err(StoreAccessError::new(
                operation,
                "transaction is no longer active",
            ))
        }
    }
}

impl StoreTransaction for MemoryTransaction<'_> {
    fn get(&self, key: &EntityKey) -> Result<Option<Entity>, StoreAccessError> {
        self.ensure_active("transactional get")?;
        self.store.get(key)
    }

    fn update(&mut self, entity: Entity) -> Result<(), StoreAccessError> {
        self.ensure_active("transactional update")?;
        let path = path(&entity.key)?;
        if !self.store.rows.read().contains_key(&path) {
            return Err(StoreAccessError::new(
                "transactional update",
                format!("entity does not exist: {}", entity.key),
            ));
        }
        self.pending.push(entity);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreAccessError> {
        self.ensure_active("commit")?;
        self.active = false;
        let mut rows = self.store.rows.write();
        for entity in self.pending.drain(..) {
            rows.insert(entity.key.to_string(), entity);
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), StoreAccessError> {
        self.ensure_active("rollback")?;
        self.active = false;
        self.pending.clear();
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
