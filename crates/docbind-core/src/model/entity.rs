use crate::{
    key::IdKind,
    model::{callback::CallbackSet, field::PropertyModel},
};

///
/// EntityModel
///
/// Immutable per-type descriptor built once by introspection and shared
/// read-only afterwards. Field roles, property order, and callback
/// lists are fixed at construction.
///

#[derive(Debug)]
pub struct EntityModel {
    /// Fully-qualified Rust type path (for diagnostics).
    pub type_path: &'static str,
    /// Stable external name instances are stored under.
    pub kind: String,
    /// Absent only for embedded-only types; the registry rejects
    /// top-level resolution of a type without one.
    pub identifier: Option<IdentifierModel>,
    pub parent_key: Option<ParentKeyModel>,
    pub version: Option<VersionModel>,
    /// Mapped properties in declaration order.
    pub properties: Vec<PropertyModel>,
    pub callbacks: CallbackSet,
    /// Suppresses registry-level default listeners for this type.
    pub exclude_default_listeners: bool,
}

impl EntityModel {
    #[must_use]
    pub fn property(&self, field: &str) -> Option<&PropertyModel> {
        self.properties.iter().find(|p| p.field == field)
    }

    /// External name of the version property, when the type has one.
    #[must_use]
    pub fn version_property(&self) -> Option<&str> {
        self.version.as_ref().map(|v| v.mapped_name.as_str())
    }
}

///
/// IdentifierModel
/// The identifier field of a record type.
///

#[derive(Clone, Debug)]
pub struct IdentifierModel {
    pub field: String,
    pub id_kind: IdKind,
    /// When set, the store assigns the identifier on insert and the
    /// field is written back from the store's response.
    pub auto_generated: bool,
}

///
/// ParentKeyModel
/// Optional ancestor-key field establishing the hierarchical key path.
///

#[derive(Clone, Debug)]
pub struct ParentKeyModel {
    pub field: String,
}

///
/// VersionModel
/// Optional integer counter backing optimistic locking.
///

#[derive(Clone, Debug)]
pub struct VersionModel {
    pub field: String,
    pub mapped_name: String,
}
