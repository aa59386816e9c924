use crate::{
    document::Document,
    error::{ErrorClass, ErrorOrigin, MappingError},
    key::{EntityKey, Id},
    registry::ModelRegistry,
    store::StoreClient,
    unmarshal::Unmarshaller,
};

///
/// DocumentReader
///
/// Read-side entry point: fetches entities by key and unmarshals them.
/// A missing entity is `Ok(None)`, never an error.
///

pub struct DocumentReader<'a, S: StoreClient> {
    registry: &'a ModelRegistry,
    store: &'a S,
}

impl<'a, S: StoreClient> DocumentReader<'a, S> {
    #[must_use]
    pub const fn new(registry: &'a ModelRegistry, store: &'a S) -> Self {
        Self { registry, store }
    }

    pub fn load<T: Document>(&self, id: impl Into<Id>) -> Result<Option<T>, MappingError> {
        let key = self.key_of::<T>(id.into(), None)?;
        self.load_by_key(&key)
    }

    pub fn load_with_parent<T: Document>(
        &self,
        parent: EntityKey,
        id: impl Into<Id>,
    ) -> Result<Option<T>, MappingError> {
        let key = self.key_of::<T>(id.into(), Some(parent))?;
        self.load_by_key(&key)
    }

    pub fn load_by_key<T: Document>(&self, key: &EntityKey) -> Result<Option<T>, MappingError> {
        let entity = self.store.get(key)?;
        Unmarshaller::new(self.registry).unmarshal(entity.as_ref())
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
                    ErrorOrigin::Reader,
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
