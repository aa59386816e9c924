use crate::{
    document::{AnyDocument, Document},
    error::MappingError,
    model::{Callback, CallbackPhase, ConfigError, EntityModel, build_model},
};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::{
    any::{TypeId, type_name},
    collections::HashMap,
    sync::Arc,
};

static GLOBAL: Lazy<ModelRegistry> = Lazy::new(ModelRegistry::new);

///
/// BuildContext
///
/// Tracks the set of types whose introspection is in progress on the
/// current call stack. Re-entering one is a cyclic embedded mapping and
/// is rejected at introspection time, never at marshal time.
///

#[derive(Default)]
pub(crate) struct BuildContext {
    in_progress: Vec<(TypeId, &'static str)>,
}

impl BuildContext {
    fn enter(&mut self, type_id: TypeId, type_path: &'static str) -> bool {
        if self.in_progress.iter().any(|(id, _)| *id == type_id) {
            return false;
        }
        self.in_progress.push((type_id, type_path));
        true
    }

    fn leave(&mut self, type_id: TypeId) {
        self.in_progress.retain(|(id, _)| *id != type_id);
    }

    fn chain(&self, repeated: &'static str) -> String {
        let mut chain: Vec<&str> = self.in_progress.iter().map(|(_, path)| *path).collect();
        chain.push(repeated);
        chain.join(" -> ")
    }
}

///
/// ModelRegistry
///
/// Cache of type descriptors keyed by type identity, populated lazily
/// and never invalidated. Safe for concurrent first use: racing callers
/// may build equivalent models independently, but only one insert wins
/// and a partially built model is never visible.
///
/// Tests construct isolated registries; production callers normally use
/// the process-wide [`ModelRegistry::global`] instance.
///

#[derive(Default)]
pub struct ModelRegistry {
    models: RwLock<HashMap<TypeId, Arc<EntityModel>>>,
    default_listeners: RwLock<Vec<(CallbackPhase, Callback)>>,
}

impl ModelRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry; lives for the process lifetime.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Resolve (building and caching on first use) the descriptor for `T`.
    pub fn model_of<T: Document>(&self) -> Result<Arc<EntityModel>, MappingError> {
        let mut ctx = BuildContext::default();
        self.model_of_with::<T>(&mut ctx)
    }

    pub(crate) fn model_of_with<T: Document>(
        &self,
        ctx: &mut BuildContext,
    ) -> Result<Arc<EntityModel>, MappingError> {
        // Embedded resolution arrives with a non-empty context; only a
        // top-level resolution requires the type to carry an identifier.
        let top_level = ctx.in_progress.is_empty();
        let type_id = TypeId::of::<T>();
        let type_path = type_name::<T>();

        let cached = self.models.read().get(&type_id).cloned();
        let model = if let Some(model) = cached {
            model
        } else {
            if !ctx.enter(type_id, type_path) {
                return Err(ConfigError::CyclicEmbedding {
                    type_path,
                    chain: ctx.chain(type_path),
                }
                .into());
            }
            let built = build_model::<T>(self, ctx);
            ctx.leave(type_id);
            let model = Arc::new(built?);

            let mut models = self.models.write();
            models.entry(type_id).or_insert(model).clone()
        };

        if top_level && model.identifier.is_none() {
            return Err(ConfigError::MissingIdentifier { type_path }.into());
        }
        Ok(model)
    }

    #[must_use]
    pub fn contains<T: Document>(&self) -> bool {
        self.models.read().contains_key(&TypeId::of::<T>())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.read().is_empty()
    }

    /// Attach a default listener applied to every type (unless a type's
    /// mapping excludes default listeners). Listeners run before the
    /// type's own callbacks, in registration order.
    pub fn register_default_listener(&self, phase: CallbackPhase, callback: Callback) {
        self.default_listeners.write().push((phase, callback));
    }

    /// Run the listeners and callbacks applicable to one phase.
    pub(crate) fn run_callbacks(
        &self,
        model: &EntityModel,
        doc: &mut dyn AnyDocument,
        phase: CallbackPhase,
    ) {
        if !model.exclude_default_listeners {
            let listeners: Vec<Callback> = self
                .default_listeners
                .read()
                .iter()
                .filter(|(p, _)| *p == phase)
                .map(|(_, cb)| cb.clone())
                .collect();
            for listener in listeners {
                listener.invoke(doc);
            }
        }
        for callback in model.callbacks.phase(phase) {
            callback.invoke(doc);
        }
    }
}
