//! Object-to-document mapping over a pluggable entity store.
//!
//! ## Crate layout
//! - `core::model`: mapping directives and cached type descriptors.
//! - `core::marshal` / `core::unmarshal`: documents to entities and back.
//! - `core::writer` / `core::reader`: store-facing entry points, including
//!   the optimistic-lock update protocol.
//! - `core::store`: the store collaborator traits and the in-memory backend.
//!
//! The `prelude` module mirrors the surface used by application code.

pub use docbind_core as core;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use crate::core::error::MappingError;

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::core::{
        document::Document,
        error::{ErrorClass, ErrorOrigin, MappingError},
        key::{EntityKey, Id, IdKind},
        marshal::Operation,
        model::{Callback, CallbackPhase, FieldKind, Mapping},
        reader::DocumentReader,
        registry::ModelRegistry,
        store::{MemoryStore, StoreClient as _},
        value::Value,
        writer::DocumentWriter,
    };
    pub use serde::{Deserialize, Serialize};
}
