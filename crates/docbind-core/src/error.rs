use crate::{store::StoreAccessError, writer::LockError};
use std::fmt;
use thiserror::Error as ThisError;

///
/// MappingError
///
/// Structured mapping failure with a stable classification.
/// Every module-level error converts into this type at the crate
/// boundary; nothing is swallowed on the way up.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct MappingError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl MappingError {
    /// Construct a MappingError without structured detail.
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct a writer-origin internal error.
    pub(crate) fn writer_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Writer, message)
    }

    /// True when this failure is an optimistic-lock conflict.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self.detail, Some(ErrorDetail::Lock(LockError::Conflict { .. })))
    }

    /// True when this failure reports a missing entity on optimistic update.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self.detail,
            Some(ErrorDetail::Lock(LockError::EntityNotFound { .. }))
        )
    }

    /// Expected/found version pair for a conflict, if this is one.
    #[must_use]
    pub const fn lock_versions(&self) -> Option<(i64, i64)> {
        match self.detail {
            Some(ErrorDetail::Lock(LockError::Conflict { expected, found })) => {
                Some((expected, found))
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`MappingError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Lock(LockError),
    #[error("{0}")]
    Store(StoreAccessError),
}

///
/// ErrorClass
/// Error taxonomy for classification by callers.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    /// Mapping-configuration mistake, raised at introspection time.
    Config,
    /// A value's category could not be converted.
    Conversion,
    /// Optimistic-lock conflict; recoverable by re-read-and-retry.
    Conflict,
    /// Target entity absent where one was required.
    NotFound,
    /// Wrapped pass-through of a store collaborator failure.
    Store,
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Config => "config",
            Self::Conversion => "conversion",
            Self::Conflict => "conflict",
            Self::NotFound => "not_found",
            Self::Store => "store",
            Self::Internal => "internal",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Origin taxonomy for classification by callers.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Model,
    Convert,
    Marshal,
    Unmarshal,
    Writer,
    Reader,
    Store,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Model => "model",
            Self::Convert => "convert",
            Self::Marshal => "marshal",
            Self::Unmarshal => "unmarshal",
            Self::Writer => "writer",
            Self::Reader => "reader",
            Self::Store => "store",
        };
        write!(f, "{label}")
    }
}
