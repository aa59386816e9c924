use crate::{
    document::Document,
    error::{ErrorClass, ErrorOrigin, MappingError},
    key::IdKind,
    model::{
        callback::{Callback, CallbackPhase, CallbackSet},
        entity::{EntityModel, IdentifierModel, ParentKeyModel, VersionModel},
        field::{EmbeddedModel, FieldKind, PropertyKind, PropertyModel},
    },
    registry::{BuildContext, ModelRegistry},
};
use std::{any::type_name, collections::HashSet, sync::Arc};
use thiserror::Error as ThisError;

///
/// ConfigError
///
/// Mapping-configuration mistakes, raised at introspection time. Fatal
/// to the caller and never retried: each one indicates a programming
/// error in a type's mapping directives.
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("type '{type_path}' declares no identifier field")]
    MissingIdentifier { type_path: &'static str },

    #[error("type '{type_path}' declares more than one identifier field ('{first}' and '{second}')")]
    MultipleIdentifiers {
        type_path: &'static str,
        first: String,
        second: String,
    },

    #[error("type '{type_path}': auto-generated identifier '{field}' must be a long id")]
    AutoGeneratedNotLong {
        type_path: &'static str,
        field: String,
    },

    #[error("type '{type_path}' declares more than one parent-key field ('{first}' and '{second}')")]
    MultipleParentKeys {
        type_path: &'static str,
        first: String,
        second: String,
    },

    #[error("type '{type_path}' declares more than one version field ('{first}' and '{second}')")]
    MultipleVersions {
        type_path: &'static str,
        first: String,
        second: String,
    },

    #[error("type '{type_path}': field '{field}' appears in more than one directive")]
    DuplicateField {
        type_path: &'static str,
        field: String,
    },

    #[error("type '{type_path}': mapped property name '{name}' is not unique")]
    DuplicateMappedName {
        type_path: &'static str,
        name: String,
    },

    #[error("cyclic embedded mapping detected while introspecting '{type_path}' (chain: {chain})")]
    CyclicEmbedding {
        type_path: &'static str,
        chain: String,
    },
}

impl ConfigError {
    pub(crate) const fn class() -> ErrorClass {
        ErrorClass::Config
    }
}

impl From<ConfigError> for MappingError {
    fn from(err: ConfigError) -> Self {
        Self::new(ConfigError::class(), ErrorOrigin::Model, err.to_string())
    }
}

type ModelFn = fn(&ModelRegistry, &mut BuildContext) -> Result<Arc<EntityModel>, MappingError>;

/// Deferred hook into an embedded type's introspection. Captured as a
/// monomorphized fn pointer when the directive is declared; invoked
/// (with cycle tracking) when the parent model is built.
struct EmbeddedDirective {
    type_path: &'static str,
    model_fn: ModelFn,
}

fn resolve_embedded<U: Document>(
    registry: &ModelRegistry,
    ctx: &mut BuildContext,
) -> Result<Arc<EntityModel>, MappingError> {
    registry.model_of_with::<U>(ctx)
}

///
/// Directive
/// One declarative mapping statement.
///

enum Directive {
    Id {
        field: String,
        id_kind: IdKind,
        auto_generated: bool,
    },
    ParentKey {
        field: String,
    },
    Version {
        field: String,
    },
    Property {
        field: String,
        mapped_name: Option<String>,
        kind: FieldKind,
        indexed: bool,
        ignored: bool,
    },
    Embedded {
        field: String,
        mapped_name: Option<String>,
        embedded: EmbeddedDirective,
    },
}

impl Directive {
    fn field_name(&self) -> &str {
        match self {
            Self::Id { field, .. }
            | Self::ParentKey { field }
            | Self::Version { field }
            | Self::Property { field, .. }
            | Self::Embedded { field, .. } => field,
        }
    }
}

///
/// Mapping
///
/// Ordered list of mapping directives declared by a [`Document`].
/// Validated and compiled into an [`EntityModel`] on first introspection;
/// the mapping itself is never consulted again after that.
///

pub struct Mapping {
    kind: Option<String>,
    exclude_default_listeners: bool,
    directives: Vec<Directive>,
    callbacks: CallbackSet,
}

impl Default for Mapping {
    fn default() -> Self {
        Self::new()
    }
}

impl Mapping {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            kind: None,
            exclude_default_listeners: false,
            directives: Vec::new(),
            callbacks: CallbackSet::new(),
        }
    }

    /// Override the stored kind (defaults to the bare type name).
    #[must_use]
    pub fn kind(mut self, name: impl Into<String>) -> Self {
        self.kind = Some(name.into());
        self
    }

    /// Declare the identifier field.
    #[must_use]
    pub fn id(mut self, field: &str, id_kind: IdKind) -> Self {
        self.directives.push(Directive::Id {
            field: field.to_string(),
            id_kind,
            auto_generated: false,
        });
        self
    }

    /// Declare a store-assigned long identifier field.
    #[must_use]
    pub fn auto_id(self, field: &str) -> Self {
        self.generated_id(field, IdKind::Long)
    }

    /// Declare a store-assigned identifier field of the given kind.
    /// The store only allocates long identifiers; introspection rejects
    /// any other kind here.
    #[must_use]
    pub fn generated_id(mut self, field: &str, id_kind: IdKind) -> Self {
        self.directives.push(Directive::Id {
            field: field.to_string(),
            id_kind,
            auto_generated: true,
        });
        self
    }

    /// Declare the ancestor-key field.
    #[must_use]
    pub fn parent_key(mut self, field: &str) -> Self {
        self.directives.push(Directive::ParentKey {
            field: field.to_string(),
        });
        self
    }

    /// Declare the optimistic-locking version counter.
    #[must_use]
    pub fn version(mut self, field: &str) -> Self {
        self.directives.push(Directive::Version {
            field: field.to_string(),
        });
        self
    }

    /// Declare a mapped property.
    #[must_use]
    pub fn field(mut self, field: &str, kind: FieldKind) -> Self {
        self.directives.push(Directive::Property {
            field: field.to_string(),
            mapped_name: None,
            kind,
            indexed: true,
            ignored: false,
        });
        self
    }

    /// Declare a mapped property stored under a different external name.
    #[must_use]
    pub fn renamed_field(mut self, field: &str, mapped: &str, kind: FieldKind) -> Self {
        self.directives.push(Directive::Property {
            field: field.to_string(),
            mapped_name: Some(mapped.to_string()),
            kind,
            indexed: true,
            ignored: false,
        });
        self
    }

    /// Declare a property excluded from the store's indexes.
    #[must_use]
    pub fn unindexed_field(mut self, field: &str, kind: FieldKind) -> Self {
        self.directives.push(Directive::Property {
            field: field.to_string(),
            mapped_name: None,
            kind,
            indexed: false,
            ignored: false,
        });
        self
    }

    /// Declare a field the engine must never marshal or unmarshal.
    #[must_use]
    pub fn ignored_field(mut self, field: &str, kind: FieldKind) -> Self {
        self.directives.push(Directive::Property {
            field: field.to_string(),
            mapped_name: None,
            kind,
            indexed: false,
            ignored: true,
        });
        self
    }

    /// Declare an embedded record property.
    #[must_use]
    pub fn embedded<U: Document>(mut self, field: &str) -> Self {
        self.directives.push(Directive::Embedded {
            field: field.to_string(),
            mapped_name: None,
            embedded: EmbeddedDirective {
                type_path: type_name::<U>(),
                model_fn: resolve_embedded::<U>,
            },
        });
        self
    }

    /// Declare an embedded record property under a different external name.
    #[must_use]
    pub fn renamed_embedded<U: Document>(mut self, field: &str, mapped: &str) -> Self {
        self.directives.push(Directive::Embedded {
            field: field.to_string(),
            mapped_name: Some(mapped.to_string()),
            embedded: EmbeddedDirective {
                type_path: type_name::<U>(),
                model_fn: resolve_embedded::<U>,
            },
        });
        self
    }

    /// Attach a lifecycle callback.
    #[must_use]
    pub fn on<T, F>(mut self, phase: CallbackPhase, f: F) -> Self
    where
        T: Document,
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.callbacks.push(phase, Callback::new::<T, _>(f));
        self
    }

    /// Suppress registry-level default listeners for this type;
    /// explicitly attached callbacks still run.
    #[must_use]
    pub const fn exclude_default_listeners(mut self) -> Self {
        self.exclude_default_listeners = true;
        self
    }
}

/// Validate a type's mapping directives and compile the descriptor.
/// Embedded types are introspected recursively through `ctx`, which is
/// also where embedding cycles are rejected.
pub(crate) fn build_model<T: Document>(
    registry: &ModelRegistry,
    ctx: &mut BuildContext,
) -> Result<EntityModel, MappingError> {
    let type_path = type_name::<T>();
    let mapping = T::mapping();

    let mut seen_fields: HashSet<String> = HashSet::new();
    for directive in &mapping.directives {
        if !seen_fields.insert(directive.field_name().to_string()) {
            return Err(ConfigError::DuplicateField {
                type_path,
                field: directive.field_name().to_string(),
            }
            .into());
        }
    }

    let mut identifier: Option<IdentifierModel> = None;
    let mut parent_key: Option<ParentKeyModel> = None;
    let mut version: Option<VersionModel> = None;
    let mut properties: Vec<PropertyModel> = Vec::new();

    for directive in mapping.directives {
        match directive {
            Directive::Id {
                field,
                id_kind,
                auto_generated,
            } => {
                if let Some(first) = &identifier {
                    return Err(ConfigError::MultipleIdentifiers {
                        type_path,
                        first: first.field.clone(),
                        second: field,
                    }
                    .into());
                }
                if auto_generated && id_kind != IdKind::Long {
                    return Err(ConfigError::AutoGeneratedNotLong { type_path, field }.into());
                }
                identifier = Some(IdentifierModel {
                    field,
                    id_kind,
                    auto_generated,
                });
            }

            Directive::ParentKey { field } => {
                if let Some(first) = &parent_key {
                    return Err(ConfigError::MultipleParentKeys {
                        type_path,
                        first: first.field.clone(),
                        second: field,
                    }
                    .into());
                }
                parent_key = Some(ParentKeyModel { field });
            }

            Directive::Version { field } => {
                if let Some(first) = &version {
                    return Err(ConfigError::MultipleVersions {
                        type_path,
                        first: first.field.clone(),
                        second: field,
                    }
                    .into());
                }
                version = Some(VersionModel {
                    field: field.clone(),
                    mapped_name: field.clone(),
                });
                // The version counter is stored as an ordinary int property.
                properties.push(PropertyModel {
                    mapped_name: field.clone(),
                    field,
                    kind: PropertyKind::Value(FieldKind::Int),
                    indexed: true,
                    ignored: false,
                });
            }

            Directive::Property {
                field,
                mapped_name,
                kind,
                indexed,
                ignored,
            } => {
                properties.push(PropertyModel {
                    mapped_name: mapped_name.unwrap_or_else(|| field.clone()),
                    field,
                    kind: PropertyKind::Value(kind),
                    indexed,
                    ignored,
                });
            }

            Directive::Embedded {
                field,
                mapped_name,
                embedded,
            } => {
                let model = (embedded.model_fn)(registry, ctx)?;
                properties.push(PropertyModel {
                    mapped_name: mapped_name.unwrap_or_else(|| field.clone()),
                    field,
                    kind: PropertyKind::Embedded(EmbeddedModel {
                        type_path: embedded.type_path,
                        model,
                    }),
                    indexed: true,
                    ignored: false,
                });
            }
        }
    }

    let mut seen_names: HashSet<&str> = HashSet::new();
    for property in properties.iter().filter(|p| !p.ignored) {
        if !seen_names.insert(property.mapped_name.as_str()) {
            return Err(ConfigError::DuplicateMappedName {
                type_path,
                name: property.mapped_name.clone(),
            }
            .into());
        }
    }

    let kind = mapping
        .kind
        .unwrap_or_else(|| default_kind(type_path).to_string());

    Ok(EntityModel {
        type_path,
        kind,
        identifier,
        parent_key,
        version,
        properties,
        callbacks: mapping.callbacks,
        exclude_default_listeners: mapping.exclude_default_listeners,
    })
}

/// Bare type name: the last path segment of the fully-qualified path.
fn default_kind(type_path: &str) -> &str {
    type_path.rsplit("::").next().unwrap_or(type_path)
}
