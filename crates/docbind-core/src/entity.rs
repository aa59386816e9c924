use crate::{key::EntityKey, value::Value};
use serde::{Deserialize, Serialize};

///
/// Entity
///
/// The generic key + property-map representation handed to (and returned
/// by) the store. Entities are transient: built per request, consumed,
/// and discarded.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Entity {
    pub key: EntityKey,
    pub properties: PropertyMap,
}

impl Entity {
    #[must_use]
    pub const fn new(key: EntityKey) -> Self {
        Self {
            key,
            properties: PropertyMap::new(),
        }
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: Value) {
        self.properties.insert(name, value);
    }
}

///
/// PropertyMap
///
/// Insertion-ordered property map. The store's property bag has no
/// schema, but property order is preserved so produced entities are
/// deterministic for a given descriptor.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct PropertyMap(Vec<(String, Value)>);

impl PropertyMap {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert a property, replacing an existing one in place.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        if let Some(slot) = self.0.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.0.push((name, value));
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.as_slice().len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.as_slice().is_empty()
    }
}
