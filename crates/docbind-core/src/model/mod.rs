mod build;
mod callback;
mod entity;
mod field;

pub use build::{ConfigError, Mapping};
pub use callback::{Callback, CallbackPhase, CallbackSet};
pub use entity::{EntityModel, IdentifierModel, ParentKeyModel, VersionModel};
pub use field::{EmbeddedModel, FieldKind, PropertyKind, PropertyModel};

pub(crate) use build::build_model;
