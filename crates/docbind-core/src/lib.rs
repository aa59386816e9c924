//! Core runtime for docbind: type descriptors, value conversion, the
//! marshal/unmarshal engine, and the reader/writer entry points, with
//! the ergonomics exported via the `prelude`.
#![warn(unreachable_pub)]

pub mod convert;
pub mod document;
pub mod entity;
pub mod error;
pub mod key;
pub mod marshal;
pub mod model;
pub mod reader;
pub mod registry;
pub mod store;
pub mod unmarshal;
pub mod value;
pub mod writer;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// Prelude
///
/// Prelude contains the mapping vocabulary and the two entry points.
/// Store backends and per-module error types stay behind their modules.
///

pub mod prelude {
    pub use crate::{
        document::Document,
        error::MappingError,
        key::{EntityKey, Id, IdKind},
        model::{CallbackPhase, FieldKind, Mapping},
        reader::DocumentReader,
        registry::ModelRegistry,
        value::Value,
        writer::DocumentWriter,
    };
}
