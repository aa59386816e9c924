use crate::model::entity::EntityModel;
use std::{fmt, sync::Arc};

///
/// FieldKind
///
/// Declared value category of a mapped property. Closed so converter
/// dispatch stays exhaustive and statically checkable.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldKind {
    Bool,
    Int,
    Float,
    Text,
    Blob,
    Timestamp,
    /// Reference to another entity's key.
    KeyRef,
    /// Ordered list. Only text and int elements are supported.
    List,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Text => "text",
            Self::Blob => "blob",
            Self::Timestamp => "timestamp",
            Self::KeyRef => "key",
            Self::List => "list",
        };
        write!(f, "{label}")
    }
}

///
/// PropertyKind
/// Either a plain value category or an embedded record type.
///

#[derive(Clone, Debug)]
pub enum PropertyKind {
    Value(FieldKind),
    Embedded(EmbeddedModel),
}

///
/// PropertyModel
/// Per-property slice of a type descriptor.
///

#[derive(Clone, Debug)]
pub struct PropertyModel {
    /// Field name on the record type.
    pub field: String,
    /// External property name after directive-driven renaming.
    pub mapped_name: String,
    pub kind: PropertyKind,
    pub indexed: bool,
    pub ignored: bool,
}

///
/// EmbeddedModel
///
/// Resolved descriptor of an embedded record type. Resolution happens
/// during the parent's introspection (which is also where embedding
/// cycles are rejected), so marshalling never consults the registry.
///

#[derive(Clone)]
pub struct EmbeddedModel {
    pub type_path: &'static str,
    pub model: Arc<EntityModel>,
}

impl fmt::Debug for EmbeddedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedModel")
            .field("type_path", &self.type_path)
            .finish_non_exhaustive()
    }
}
