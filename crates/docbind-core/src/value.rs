use crate::{entity::Entity, key::EntityKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Value
///
/// The generic value representation consumed and produced by the store:
/// scalars, ordered lists, nested entities, and key references. This is
/// the only shape the marshal/unmarshal engine speaks; the wire encoding
/// of it belongs to the store collaborator.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
    Timestamp(DateTime<Utc>),
    Key(EntityKey),
    /// Ordered list of values. Element order is preserved end to end.
    List(Vec<Self>),
    /// Nested entity produced by marshalling an embedded object.
    Entity(Entity),
}

impl Value {
    /// Stable category tag for closed-match dispatch.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Text(_) => ValueKind::Text,
            Self::Blob(_) => ValueKind::Blob,
            Self::Timestamp(_) => ValueKind::Timestamp,
            Self::Key(_) => ValueKind::Key,
            Self::List(_) => ValueKind::List,
            Self::Entity(_) => ValueKind::Entity,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        if let Self::Bool(v) = self { Some(*v) } else { None }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        if let Self::Int(v) = self { Some(*v) } else { None }
    }

    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        if let Self::Float(v) = self { Some(*v) } else { None }
    }

    #[must_use]
    pub const fn as_text(&self) -> Option<&str> {
        if let Self::Text(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_key(&self) -> Option<&EntityKey> {
        if let Self::Key(k) = self { Some(k) } else { None }
    }

    #[must_use]
    pub const fn as_list(&self) -> Option<&[Self]> {
        if let Self::List(xs) = self {
            Some(xs.as_slice())
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_entity(&self) -> Option<&Entity> {
        if let Self::Entity(e) = self { Some(e) } else { None }
    }

    /// Build a `Value::List` from owned items.
    pub fn from_list<T>(items: Vec<T>) -> Self
    where
        T: Into<Self>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

///
/// ValueKind
/// Closed category enumeration over generic value shapes.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Text,
    Blob,
    Timestamp,
    Key,
    List,
    Entity,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Text => "text",
            Self::Blob => "blob",
            Self::Timestamp => "timestamp",
            Self::Key => "key",
            Self::List => "list",
            Self::Entity => "entity",
        };
        write!(f, "{label}")
    }
}

macro_rules! impl_value_from {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_value_from! {
    bool              => Bool,
    i8                => Int,
    i16               => Int,
    i32               => Int,
    i64               => Int,
    f32               => Float,
    f64               => Float,
    &str              => Text,
    String            => Text,
    Vec<u8>           => Blob,
    DateTime<Utc>     => Timestamp,
    EntityKey         => Key,
    Entity            => Entity,
}

impl From<Vec<Self>> for Value {
    fn from(vec: Vec<Self>) -> Self {
        Self::List(vec)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Self>,
{
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}
