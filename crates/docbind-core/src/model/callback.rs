use crate::document::{AnyDocument, Document};
use std::{fmt, sync::Arc};

///
/// CallbackPhase
/// Lifecycle phases a callback can attach to.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CallbackPhase {
    BeforeInsert,
    AfterInsert,
    BeforeUpdate,
    AfterUpdate,
    BeforeDelete,
    AfterDelete,
    AfterLoad,
}

impl fmt::Display for CallbackPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::BeforeInsert => "before_insert",
            Self::AfterInsert => "after_insert",
            Self::BeforeUpdate => "before_update",
            Self::AfterUpdate => "after_update",
            Self::BeforeDelete => "before_delete",
            Self::AfterDelete => "after_delete",
            Self::AfterLoad => "after_load",
        };
        write!(f, "{label}")
    }
}

///
/// Callback
///
/// A lifecycle hook stored in a descriptor as a typed function value.
/// Typed constructors downcast through [`AnyDocument`]; a callback built
/// for one type is a no-op on any other.
///

#[derive(Clone)]
pub struct Callback(Arc<dyn Fn(&mut dyn AnyDocument) + Send + Sync>);

impl Callback {
    /// Wrap a closure over a concrete document type.
    pub fn new<T, F>(f: F) -> Self
    where
        T: Document,
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        Self(Arc::new(move |doc: &mut dyn AnyDocument| {
            if let Some(doc) = doc.as_any_mut().downcast_mut::<T>() {
                f(doc);
            }
        }))
    }

    /// Wrap a closure that applies to any document type. Used for
    /// registry-level default listeners.
    pub fn erased<F>(f: F) -> Self
    where
        F: Fn(&mut dyn AnyDocument) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub(crate) fn invoke(&self, doc: &mut dyn AnyDocument) {
        (self.0)(doc);
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback")
    }
}

///
/// CallbackSet
/// Per-type callbacks, ordered by declaration within each phase.
///

#[derive(Clone, Debug, Default)]
pub struct CallbackSet(Vec<(CallbackPhase, Callback)>);

impl CallbackSet {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, phase: CallbackPhase, callback: Callback) {
        self.0.push((phase, callback));
    }

    /// Callbacks attached to one phase, in declaration order.
    pub fn phase(&self, phase: CallbackPhase) -> impl Iterator<Item = &Callback> {
        self.0
            .iter()
            .filter(move |(p, _)| *p == phase)
            .map(|(_, cb)| cb)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.as_slice().is_empty()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.as_slice().len()
    }
}
