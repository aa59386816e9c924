use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Id
///
/// The identifier component of an entity key. The store distinguishes
/// only two identifier shapes: 64-bit integers and strings.
///

#[derive(Clone, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
pub enum Id {
    #[display("{_0}")]
    Long(i64),
    #[display("{_0}")]
    Str(String),
}

impl Id {
    #[must_use]
    pub const fn kind(&self) -> IdKind {
        match self {
            Self::Long(_) => IdKind::Long,
            Self::Str(_) => IdKind::Str,
        }
    }

    #[must_use]
    pub const fn as_long(&self) -> Option<i64> {
        if let Self::Long(v) = self { Some(*v) } else { None }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        if let Self::Str(v) = self {
            Some(v.as_str())
        } else {
            None
        }
    }
}

impl From<i64> for Id {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<&str> for Id {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Id {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

///
/// IdKind
/// Closed tag over identifier shapes; used by introspection validation.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IdKind {
    Long,
    Str,
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Long => "long",
            Self::Str => "string",
        };
        write!(f, "{label}")
    }
}

///
/// EntityKey
///
/// Composite key of an entity: kind, optional identifier, and an
/// optional ancestor chain. A key with no identifier is "incomplete";
/// the store assigns the identifier on insert.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct EntityKey {
    kind: String,
    id: Option<Id>,
    parent: Option<Box<EntityKey>>,
}

impl EntityKey {
    /// Build a complete key from a kind and an identifier.
    pub fn complete(kind: impl Into<String>, id: impl Into<Id>) -> Self {
        Self {
            kind: kind.into(),
            id: Some(id.into()),
            parent: None,
        }
    }

    /// Build an incomplete key (kind only); the store assigns the id.
    pub fn incomplete(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: None,
            parent: None,
        }
    }

    /// Attach an ancestor key, establishing the hierarchical key path.
    #[must_use]
    pub fn with_parent(mut self, parent: Self) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// Replace the identifier (used when the store assigns one).
    #[must_use]
    pub fn with_id(mut self, id: impl Into<Id>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub const fn id(&self) -> Option<&Id> {
        self.id.as_ref()
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Self> {
        self.parent.as_deref()
    }

    /// True when this key and every ancestor carry an identifier.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.id.is_some() && self.parent.as_deref().is_none_or(Self::is_complete)
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = &self.parent {
            write!(f, "{parent}/")?;
        }
        match &self.id {
            Some(id) => write!(f, "{}({id})", self.kind),
            None => write!(f, "{}(?)", self.kind),
        }
    }
}
