//! Record types used across unit tests. Each one exercises a specific
//! slice of the mapping surface; none are exported.

use crate::{
    document::{AnyDocument, Document, FieldAccessError},
    key::{EntityKey, IdKind},
    model::{CallbackPhase, FieldKind, Mapping},
    value::Value,
};

///
/// Task
/// The workhorse fixture: auto id, scalars, a list, a version counter,
/// and an ignored scratch field.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Task {
    pub id: Option<i64>,
    pub name: String,
    pub done: bool,
    pub priority: i64,
    pub tags: Vec<String>,
    pub version: i64,
    pub draft: String,
}

impl Document for Task {
    fn mapping() -> Mapping {
        Mapping::new()
            .auto_id("id")
            .field("name", FieldKind::Text)
            .field("done", FieldKind::Bool)
            .field("priority", FieldKind::Int)
            .field("tags", FieldKind::List)
            .version("version")
            .ignored_field("draft", FieldKind::Text)
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::from(self.id)),
            "name" => Some(Value::from(self.name.clone())),
            "done" => Some(Value::from(self.done)),
            "priority" => Some(Value::from(self.priority)),
            "tags" => Some(Value::from_list(self.tags.clone())),
            "version" => Some(Value::from(self.version)),
            "draft" => Some(Value::from(self.draft.clone())),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<(), FieldAccessError> {
        match (field, value) {
            ("id", Value::Int(v)) => self.id = Some(v),
            ("name", Value::Text(v)) => self.name = v,
            ("done", Value::Bool(v)) => self.done = v,
            ("priority", Value::Int(v)) => self.priority = v,
            ("tags", Value::List(items)) => {
                self.tags = items
                    .into_iter()
                    .filter_map(|v| v.as_text().map(str::to_string))
                    .collect();
            }
            ("version", Value::Int(v)) => self.version = v,
            ("draft", Value::Text(v)) => self.draft = v,
            ("id" | "name" | "done" | "priority" | "tags" | "version" | "draft", value) => {
                return Err(FieldAccessError::incompatible(field, &value));
            }
            _ => return Err(FieldAccessError::unknown(field)),
        }
        Ok(())
    }
}

///
/// Note
/// Manual string id and an unindexed body.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Note {
    pub id: Option<String>,
    pub body: String,
}

impl Document for Note {
    fn mapping() -> Mapping {
        Mapping::new()
            .id("id", IdKind::Str)
            .unindexed_field("body", FieldKind::Text)
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::from(self.id.clone())),
            "body" => Some(Value::from(self.body.clone())),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<(), FieldAccessError> {
        match (field, value) {
            ("id", Value::Text(v)) => self.id = Some(v),
            ("body", Value::Text(v)) => self.body = v,
            ("id" | "body", value) => {
                return Err(FieldAccessError::incompatible(field, &value));
            }
            _ => return Err(FieldAccessError::unknown(field)),
        }
        Ok(())
    }
}

///
/// Address
/// Embedded-only type: no identifier, one renamed property.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub zip: Option<String>,
}

impl Document for Address {
    fn mapping() -> Mapping {
        Mapping::new()
            .field("street", FieldKind::Text)
            .field("city", FieldKind::Text)
            .renamed_field("zip", "postal_code", FieldKind::Text)
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "street" => Some(Value::from(self.street.clone())),
            "city" => Some(Value::from(self.city.clone())),
            "zip" => Some(Value::from(self.zip.clone())),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<(), FieldAccessError> {
        match (field, value) {
            ("street", Value::Text(v)) => self.street = v,
            ("city", Value::Text(v)) => self.city = v,
            ("zip", Value::Text(v)) => self.zip = Some(v),
            ("street" | "city" | "zip", value) => {
                return Err(FieldAccessError::incompatible(field, &value));
            }
            _ => return Err(FieldAccessError::unknown(field)),
        }
        Ok(())
    }
}

///
/// Customer
/// Embeds an [`Address`] behind an `Option`.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Customer {
    pub id: Option<String>,
    pub name: String,
    pub address: Option<Address>,
}

impl Document for Customer {
    fn mapping() -> Mapping {
        Mapping::new()
            .id("id", IdKind::Str)
            .field("name", FieldKind::Text)
            .embedded::<Address>("address")
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::from(self.id.clone())),
            "name" => Some(Value::from(self.name.clone())),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<(), FieldAccessError> {
        match (field, value) {
            ("id", Value::Text(v)) => self.id = Some(v),
            ("name", Value::Text(v)) => self.name = v,
            ("id" | "name", value) => {
                return Err(FieldAccessError::incompatible(field, &value));
            }
            _ => return Err(FieldAccessError::unknown(field)),
        }
        Ok(())
    }

    fn embedded(&self, field: &str) -> Option<&dyn AnyDocument> {
        match field {
            "address" => self.address.as_ref().map(|a| a as &dyn AnyDocument),
            _ => None,
        }
    }

    fn embedded_mut(&mut self, field: &str) -> Option<&mut dyn AnyDocument> {
        match field {
            "address" => {
                Some(self.address.get_or_insert_with(Address::default) as &mut dyn AnyDocument)
            }
            _ => None,
        }
    }
}

///
/// Book
/// Auto id under an ancestor key, plus a version counter.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Book {
    pub id: Option<i64>,
    pub author: Option<EntityKey>,
    pub title: String,
    pub version: i64,
}

impl Document for Book {
    fn mapping() -> Mapping {
        Mapping::new()
            .auto_id("id")
            .parent_key("author")
            .field("title", FieldKind::Text)
            .version("version")
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::from(self.id)),
            "author" => Some(Value::from(self.author.clone())),
            "title" => Some(Value::from(self.title.clone())),
            "version" => Some(Value::from(self.version)),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<(), FieldAccessError> {
        match (field, value) {
            ("id", Value::Int(v)) => self.id = Some(v),
            ("author", Value::Key(k)) => self.author = Some(k),
            ("title", Value::Text(v)) => self.title = v,
            ("version", Value::Int(v)) => self.version = v,
            ("id" | "author" | "title" | "version", value) => {
                return Err(FieldAccessError::incompatible(field, &value));
            }
            _ => return Err(FieldAccessError::unknown(field)),
        }
        Ok(())
    }
}

///
/// Audited
/// Carries lifecycle callbacks: before-insert and after-load.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Audited {
    pub id: Option<i64>,
    pub touched: bool,
    pub loads: i64,
}

impl Document for Audited {
    fn mapping() -> Mapping {
        Mapping::new()
            .auto_id("id")
            .field("touched", FieldKind::Bool)
            .field("loads", FieldKind::Int)
            .on::<Self, _>(CallbackPhase::BeforeInsert, |doc| doc.touched = true)
            .on::<Self, _>(CallbackPhase::AfterLoad, |doc| doc.loads += 1)
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::from(self.id)),
            "touched" => Some(Value::from(self.touched)),
            "loads" => Some(Value::from(self.loads)),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<(), FieldAccessError> {
        match (field, value) {
            ("id", Value::Int(v)) => self.id = Some(v),
            ("touched", Value::Bool(v)) => self.touched = v,
            ("loads", Value::Int(v)) => self.loads = v,
            ("id" | "touched" | "loads", value) => {
                return Err(FieldAccessError::incompatible(field, &value));
            }
            _ => return Err(FieldAccessError::unknown(field)),
        }
        Ok(())
    }
}

///
/// Quiet
/// Opts out of registry-level default listeners.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Quiet {
    pub id: Option<i64>,
    pub priority: i64,
}

impl Document for Quiet {
    fn mapping() -> Mapping {
        Mapping::new()
            .auto_id("id")
            .field("priority", FieldKind::Int)
            .exclude_default_listeners()
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::from(self.id)),
            "priority" => Some(Value::from(self.priority)),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<(), FieldAccessError> {
        match (field, value) {
            ("id", Value::Int(v)) => self.id = Some(v),
            ("priority", Value::Int(v)) => self.priority = v,
            ("id" | "priority", value) => {
                return Err(FieldAccessError::incompatible(field, &value));
            }
            _ => return Err(FieldAccessError::unknown(field)),
        }
        Ok(())
    }
}

///
/// Unidentified
/// No identifier directive; must not resolve top-level.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Unidentified {
    pub label: String,
}

impl Document for Unidentified {
    fn mapping() -> Mapping {
        Mapping::new().field("label", FieldKind::Text)
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "label" => Some(Value::from(self.label.clone())),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<(), FieldAccessError> {
        match (field, value) {
            ("label", Value::Text(v)) => self.label = v,
            ("label", value) => return Err(FieldAccessError::incompatible(field, &value)),
            _ => return Err(FieldAccessError::unknown(field)),
        }
        Ok(())
    }
}

///
/// TwinIdentity
/// Two identifier directives; must fail introspection.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TwinIdentity {
    pub a: i64,
    pub b: i64,
}

impl Document for TwinIdentity {
    fn mapping() -> Mapping {
        Mapping::new().id("a", IdKind::Long).id("b", IdKind::Long)
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "a" => Some(Value::from(self.a)),
            "b" => Some(Value::from(self.b)),
            _ => None,
        }
    }

    fn set(&mut self, _field: &str, _value: Value) -> Result<(), FieldAccessError> {
        Ok(())
    }
}

///
/// TwinParents
/// Two parent-key directives; must fail introspection.
///

#[derive(Clone, Debug, Default)]
pub struct TwinParents {
    pub id: Option<i64>,
    pub home: Option<EntityKey>,
    pub office: Option<EntityKey>,
}

impl Document for TwinParents {
    fn mapping() -> Mapping {
        Mapping::new()
            .auto_id("id")
            .parent_key("home")
            .parent_key("office")
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::from(self.id)),
            "home" => Some(Value::from(self.home.clone())),
            "office" => Some(Value::from(self.office.clone())),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, _value: Value) -> Result<(), FieldAccessError> {
        Err(FieldAccessError::unknown(field))
    }
}

///
/// TwinVersions
/// Two version directives; must fail introspection.
///

#[derive(Clone, Debug, Default)]
pub struct TwinVersions {
    pub id: Option<i64>,
    pub v1: i64,
    pub v2: i64,
}

impl Document for TwinVersions {
    fn mapping() -> Mapping {
        Mapping::new().auto_id("id").version("v1").version("v2")
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::from(self.id)),
            "v1" => Some(Value::from(self.v1)),
            "v2" => Some(Value::from(self.v2)),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, _value: Value) -> Result<(), FieldAccessError> {
        Err(FieldAccessError::unknown(field))
    }
}

///
/// CloneNamed
/// Two properties renamed onto one external name; must fail introspection.
///

#[derive(Clone, Debug, Default)]
pub struct CloneNamed {
    pub id: Option<i64>,
    pub short_label: String,
    pub long_label: String,
}

impl Document for CloneNamed {
    fn mapping() -> Mapping {
        Mapping::new()
            .auto_id("id")
            .renamed_field("short_label", "label", FieldKind::Text)
            .renamed_field("long_label", "label", FieldKind::Text)
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::from(self.id)),
            "short_label" => Some(Value::from(self.short_label.clone())),
            "long_label" => Some(Value::from(self.long_label.clone())),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, _value: Value) -> Result<(), FieldAccessError> {
        Err(FieldAccessError::unknown(field))
    }
}

///
/// RepeatedField
/// One field named in two directives; must fail introspection.
///

#[derive(Clone, Debug, Default)]
pub struct RepeatedField {
    pub id: Option<i64>,
    pub label: String,
}

impl Document for RepeatedField {
    fn mapping() -> Mapping {
        Mapping::new()
            .auto_id("id")
            .field("label", FieldKind::Text)
            .unindexed_field("label", FieldKind::Text)
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::from(self.id)),
            "label" => Some(Value::from(self.label.clone())),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, _value: Value) -> Result<(), FieldAccessError> {
        Err(FieldAccessError::unknown(field))
    }
}

///
/// StrAutoGen
/// Store-assigned string identifier; must fail introspection.
///

#[derive(Clone, Debug, Default)]
pub struct StrAutoGen {
    pub id: Option<String>,
}

impl Document for StrAutoGen {
    fn mapping() -> Mapping {
        Mapping::new().generated_id("id", IdKind::Str)
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::from(self.id.clone())),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, _value: Value) -> Result<(), FieldAccessError> {
        Err(FieldAccessError::unknown(field))
    }
}

///
/// LoopA / LoopB
/// Mutually embedded pair; must fail introspection.
///

#[derive(Clone, Debug, Default)]
pub struct LoopA {
    pub id: Option<i64>,
    pub b: Option<LoopB>,
}

#[derive(Clone, Debug, Default)]
pub struct LoopB {
    pub a: Option<Box<LoopA>>,
}

impl Document for LoopA {
    fn mapping() -> Mapping {
        Mapping::new().auto_id("id").embedded::<LoopB>("b")
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::from(self.id)),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, _value: Value) -> Result<(), FieldAccessError> {
        Err(FieldAccessError::unknown(field))
    }

    fn embedded(&self, field: &str) -> Option<&dyn AnyDocument> {
        match field {
            "b" => self.b.as_ref().map(|b| b as &dyn AnyDocument),
            _ => None,
        }
    }

    fn embedded_mut(&mut self, field: &str) -> Option<&mut dyn AnyDocument> {
        match field {
            "b" => Some(self.b.get_or_insert_with(LoopB::default) as &mut dyn AnyDocument),
            _ => None,
        }
    }
}

impl Document for LoopB {
    fn mapping() -> Mapping {
        Mapping::new().embedded::<LoopA>("a")
    }

    fn get(&self, _field: &str) -> Option<Value> {
        None
    }

    fn set(&mut self, field: &str, _value: Value) -> Result<(), FieldAccessError> {
        Err(FieldAccessError::unknown(field))
    }

    fn embedded(&self, field: &str) -> Option<&dyn AnyDocument> {
        match field {
            "a" => self.a.as_deref().map(|a| a as &dyn AnyDocument),
            _ => None,
        }
    }

    fn embedded_mut(&mut self, field: &str) -> Option<&mut dyn AnyDocument> {
        match field {
            "a" => {
                Some(self.a.get_or_insert_with(Box::default).as_mut() as &mut dyn AnyDocument)
            }
            _ => None,
        }
    }
}

///
/// SelfLoop
/// Embeds itself; must fail introspection.
///

#[derive(Debug, Default)]
pub struct SelfLoop {
    pub id: Option<i64>,
    pub child: Option<Box<SelfLoop>>,
}

impl Document for SelfLoop {
    fn mapping() -> Mapping {
        Mapping::new().auto_id("id").embedded::<Self>("child")
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::from(self.id)),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, _value: Value) -> Result<(), FieldAccessError> {
        Err(FieldAccessError::unknown(field))
    }

    fn embedded(&self, field: &str) -> Option<&dyn AnyDocument> {
        match field {
            "child" => self.child.as_deref().map(|c| c as &dyn AnyDocument),
            _ => None,
        }
    }

    fn embedded_mut(&mut self, field: &str) -> Option<&mut dyn AnyDocument> {
        match field {
            "child" => {
                Some(self.child.get_or_insert_with(Box::default).as_mut() as &mut dyn AnyDocument)
            }
            _ => None,
        }
    }
}

///
/// Crooked
/// Declares a long identifier but exposes a text value for it.
///

#[derive(Clone, Debug, Default)]
pub struct Crooked {
    pub id: String,
}

impl Document for Crooked {
    fn mapping() -> Mapping {
        Mapping::new().id("id", IdKind::Long)
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::from(self.id.clone())),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, _value: Value) -> Result<(), FieldAccessError> {
        Err(FieldAccessError::unknown(field))
    }
}

///
/// Mislabeled
/// Declares an int property but exposes a text value for it.
///

#[derive(Clone, Debug, Default)]
pub struct Mislabeled {
    pub id: Option<i64>,
    pub count: String,
}

impl Document for Mislabeled {
    fn mapping() -> Mapping {
        Mapping::new().auto_id("id").field("count", FieldKind::Int)
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::from(self.id)),
            "count" => Some(Value::from(self.count.clone())),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, _value: Value) -> Result<(), FieldAccessError> {
        Err(FieldAccessError::unknown(field))
    }
}

///
/// GrabBag
/// A list field exposing arbitrary element values.
///

#[derive(Clone, Debug, Default)]
pub struct GrabBag {
    pub id: Option<i64>,
    pub stuff: Vec<Value>,
}

impl Document for GrabBag {
    fn mapping() -> Mapping {
        Mapping::new().auto_id("id").field("stuff", FieldKind::List)
    }

    fn get(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::from(self.id)),
            "stuff" => Some(Value::List(self.stuff.clone())),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: Value) -> Result<(), FieldAccessError> {
        match (field, value) {
            ("id", Value::Int(v)) => self.id = Some(v),
            ("stuff", Value::List(items)) => self.stuff = items,
            ("id" | "stuff", value) => {
                return Err(FieldAccessError::incompatible(field, &value));
            }
            _ => return Err(FieldAccessError::unknown(field)),
        }
        Ok(())
    }
}
