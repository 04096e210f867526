//! Type-validated attribute fields with per-owner storage.
//!
//! # Responsibility
//! - Declare attributes whose writes are checked against an expected type.
//! - Keep every owner's values in that owner's own `FieldStore`.
//! - Report type names in errors from explicit `TypeTag` metadata.
//!
//! # Invariants
//! - A field's bound name is captured once; aliasing never rebinds it.
//! - A value is accepted when its tag equals the expected tag or derives from it.
//! - Writes to one owner never affect another owner's values.
//! - Reading a field that was never written is an error, not a default.

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use log::{debug, warn};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type FieldResult<T> = Result<T, FieldError>;

/// Errors raised by validated field reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The owner has no stored value for this attribute yet.
    NotSet { owner: String, attribute: String },
    /// The written value is not an instance of the expected type.
    TypeMismatch {
        attribute: String,
        expected: String,
        actual: String,
    },
    /// The field was used before being attached to an attribute name.
    Unbound { expected: String },
    /// The owner type declares no validated attribute with this name.
    UnknownAttribute { owner: String, attribute: String },
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotSet { owner, attribute } => {
                write!(f, "'{owner}' object has no attribute '{attribute}'")
            }
            Self::TypeMismatch {
                attribute,
                expected,
                actual,
            } => write!(
                f,
                "expected an instance of type '{expected}' for attribute '{attribute}', got '{actual}' instead"
            ),
            Self::Unbound { expected } => write!(
                f,
                "validated field of type '{expected}' is not bound to an attribute name"
            ),
            Self::UnknownAttribute { owner, attribute } => {
                write!(f, "type '{owner}' declares no validated attribute '{attribute}'")
            }
        }
    }
}

impl Error for FieldError {}

/// Named runtime type with an optional base type.
///
/// Subtypes are built with [`TypeTag::derive`]; a subtype is accepted
/// wherever any of its ancestors is expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeTag {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base: Option<Box<TypeTag>>,
}

impl TypeTag {
    /// Creates a root type with no base.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: None,
        }
    }

    /// Creates a subtype of `self`.
    pub fn derive(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: Some(Box::new(self.clone())),
        }
    }

    pub fn int() -> Self {
        Self::new("int")
    }

    pub fn float() -> Self {
        Self::new("float")
    }

    pub fn string() -> Self {
        Self::new("str")
    }

    /// Booleans are integers, so `bool` derives from `int`.
    pub fn boolean() -> Self {
        Self::int().derive("bool")
    }

    pub fn datetime() -> Self {
        Self::new("datetime")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> Option<&TypeTag> {
        self.base.as_deref()
    }

    /// Returns whether `self` is `expected` or one of its descendants.
    pub fn is_subtype_of(&self, expected: &TypeTag) -> bool {
        std::iter::successors(Some(self), |tag| tag.base()).any(|tag| tag == expected)
    }
}

impl Display for TypeTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Raw payload of a field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ValueData {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl ValueData {
    fn natural_tag(&self) -> TypeTag {
        match self {
            Self::Int(_) => TypeTag::int(),
            Self::Float(_) => TypeTag::float(),
            Self::Str(_) => TypeTag::string(),
            Self::Bool(_) => TypeTag::boolean(),
            Self::DateTime(_) => TypeTag::datetime(),
        }
    }
}

/// A typed value that can be stored in a validated field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    #[serde(rename = "type")]
    type_tag: TypeTag,
    data: ValueData,
}

impl FieldValue {
    /// Wraps `data` with its built-in type tag.
    pub fn new(data: ValueData) -> Self {
        Self {
            type_tag: data.natural_tag(),
            data,
        }
    }

    /// Re-tags this value as an instance of a subtype of its current type.
    pub fn as_subtype(mut self, name: impl Into<String>) -> Self {
        self.type_tag = self.type_tag.derive(name);
        self
    }

    pub fn type_tag(&self) -> &TypeTag {
        &self.type_tag
    }

    pub fn data(&self) -> &ValueData {
        &self.data
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.data {
            ValueData::Int(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.data {
            ValueData::Str(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::new(ValueData::Int(value))
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::new(ValueData::Int(i64::from(value)))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::new(ValueData::Float(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::new(ValueData::Bool(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::new(ValueData::Str(value.to_string()))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::new(ValueData::Str(value))
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::new(ValueData::DateTime(value))
    }
}

/// Per-owner storage for validated field values, keyed by bound name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldStore {
    values: BTreeMap<String, FieldValue>,
}

impl FieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    fn insert(&mut self, name: &str, value: FieldValue) {
        self.values.insert(name.to_string(), value);
    }
}

/// Any type that can hold validated field values.
pub trait FieldOwner {
    /// Type name used in error messages.
    fn owner_type_name(&self) -> &str;
    fn field_store(&self) -> &FieldStore;
    fn field_store_mut(&mut self) -> &mut FieldStore;
}

/// Result of reading a field with or without an owner instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRead<'a> {
    /// Read on the owner type itself: the descriptor for introspection.
    Descriptor(&'a ValidatedField),
    /// Read on an instance: that instance's stored value.
    Value(&'a FieldValue),
}

/// Attribute declaration that validates every write against `expected`.
#[derive(Debug)]
pub struct ValidatedField {
    expected: TypeTag,
    bound_name: OnceCell<String>,
}

impl PartialEq for ValidatedField {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl ValidatedField {
    pub fn new(expected: TypeTag) -> Self {
        Self {
            expected,
            bound_name: OnceCell::new(),
        }
    }

    pub fn expected(&self) -> &TypeTag {
        &self.expected
    }

    /// Attribute name captured by the first [`ValidatedField::bind`].
    pub fn bound_name(&self) -> Option<&str> {
        self.bound_name.get().map(String::as_str)
    }

    /// Attaches this field to `name` on `owner_type`.
    ///
    /// Only the first call binds; returns `false` for later calls, which
    /// leave the original name in place.
    pub fn bind(&self, owner_type: &str, name: &str) -> bool {
        let bound = self.bound_name.set(name.to_string()).is_ok();
        if bound {
            debug!(
                "event=field_bind module=field status=ok owner={} attribute={} expected={}",
                owner_type, name, self.expected
            );
        }
        bound
    }

    /// Reads the field, either on the owner type (`None`) or on an instance.
    ///
    /// # Errors
    /// - `Unbound` when the field has no name yet and an instance is given.
    /// - `NotSet` when the instance has no stored value.
    pub fn read<'a, O>(&'a self, instance: Option<&'a O>) -> FieldResult<FieldRead<'a>>
    where
        O: FieldOwner + ?Sized,
    {
        match instance {
            None => Ok(FieldRead::Descriptor(self)),
            Some(owner) => self.get(owner).map(FieldRead::Value),
        }
    }

    /// Returns the value stored on `instance`.
    pub fn get<'a, O>(&self, instance: &'a O) -> FieldResult<&'a FieldValue>
    where
        O: FieldOwner + ?Sized,
    {
        let name = self.require_name()?;
        instance
            .field_store()
            .get(name)
            .ok_or_else(|| FieldError::NotSet {
                owner: instance.owner_type_name().to_string(),
                attribute: name.to_string(),
            })
    }

    /// Validates `value` and stores it on `instance`, replacing any previous value.
    ///
    /// # Errors
    /// - `Unbound` when the field has no name yet.
    /// - `TypeMismatch` when the value's type is not `expected` or a subtype.
    pub fn set<O>(&self, instance: &mut O, value: impl Into<FieldValue>) -> FieldResult<()>
    where
        O: FieldOwner + ?Sized,
    {
        let name = self.require_name()?;
        let value = value.into();
        if !value.type_tag().is_subtype_of(&self.expected) {
            warn!(
                "event=field_write module=field status=rejected owner={} attribute={} expected={} actual={}",
                instance.owner_type_name(),
                name,
                self.expected,
                value.type_tag()
            );
            return Err(FieldError::TypeMismatch {
                attribute: name.to_string(),
                expected: self.expected.name().to_string(),
                actual: value.type_tag().name().to_string(),
            });
        }

        instance.field_store_mut().insert(name, value);
        Ok(())
    }

    fn require_name(&self) -> FieldResult<&str> {
        self.bound_name().ok_or_else(|| FieldError::Unbound {
            expected: self.expected.name().to_string(),
        })
    }
}

/// A named owner type with its declared validated attributes.
#[derive(Debug, Clone)]
pub struct OwnerClass {
    name: String,
    fields: IndexMap<String, Arc<ValidatedField>>,
}

impl OwnerClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Builder form of [`OwnerClass::declare`].
    pub fn with_field(mut self, attribute: impl Into<String>, field: Arc<ValidatedField>) -> Self {
        self.declare(attribute, field);
        self
    }

    /// Declares `field` under `attribute`, binding it if still unbound.
    ///
    /// Declaring one field under a second name creates an alias that keeps
    /// reading and writing the originally bound name.
    pub fn declare(&mut self, attribute: impl Into<String>, field: Arc<ValidatedField>) {
        let attribute = attribute.into();
        field.bind(&self.name, &attribute);
        self.fields.insert(attribute, field);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class-level access: returns the descriptor declared under `attribute`.
    pub fn attribute(&self, attribute: &str) -> FieldResult<&ValidatedField> {
        self.fields
            .get(attribute)
            .map(Arc::as_ref)
            .ok_or_else(|| FieldError::UnknownAttribute {
                owner: self.name.clone(),
                attribute: attribute.to_string(),
            })
    }

    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Instance of an [`OwnerClass`] holding its own field values.
#[derive(Debug, Clone)]
pub struct Instance {
    class: Arc<OwnerClass>,
    store: FieldStore,
}

impl Instance {
    pub fn new(class: Arc<OwnerClass>) -> Self {
        Self {
            class,
            store: FieldStore::new(),
        }
    }

    pub fn class(&self) -> &OwnerClass {
        &self.class
    }

    pub fn get(&self, attribute: &str) -> FieldResult<&FieldValue> {
        self.class.attribute(attribute)?.get(self)
    }

    pub fn set(&mut self, attribute: &str, value: impl Into<FieldValue>) -> FieldResult<()> {
        let class = Arc::clone(&self.class);
        class.attribute(attribute)?.set(self, value)
    }
}

impl FieldOwner for Instance {
    fn owner_type_name(&self) -> &str {
        self.class.name()
    }

    fn field_store(&self) -> &FieldStore {
        &self.store
    }

    fn field_store_mut(&mut self) -> &mut FieldStore {
        &mut self.store
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldError, FieldRead, FieldValue, Instance, OwnerClass, TypeTag, ValidatedField};
    use std::sync::Arc;

    #[test]
    fn subtype_chain_is_accepted_and_siblings_are_not() {
        let custom = TypeTag::int().derive("CustomInt");
        assert!(custom.is_subtype_of(&TypeTag::int()));
        assert!(TypeTag::boolean().is_subtype_of(&TypeTag::int()));
        assert!(!TypeTag::int().is_subtype_of(&custom));
        assert!(!TypeTag::string().is_subtype_of(&TypeTag::int()));
    }

    #[test]
    fn first_bind_wins() {
        let field = ValidatedField::new(TypeTag::int());
        assert!(field.bind("Owner", "first"));
        assert!(!field.bind("Owner", "second"));
        assert_eq!(field.bound_name(), Some("first"));
    }

    #[test]
    fn unbound_field_rejects_access() {
        let class = Arc::new(OwnerClass::new("Owner"));
        let mut instance = Instance::new(class);
        let field = ValidatedField::new(TypeTag::int());

        let err = field.set(&mut instance, 1).unwrap_err();
        assert_eq!(
            err,
            FieldError::Unbound {
                expected: "int".to_string()
            }
        );
    }

    #[test]
    fn read_without_instance_returns_descriptor() {
        let field = ValidatedField::new(TypeTag::int());
        field.bind("Owner", "attribute");
        let read = field.read::<Instance>(None).unwrap();
        match read {
            FieldRead::Descriptor(descriptor) => assert!(std::ptr::eq(descriptor, &field)),
            FieldRead::Value(_) => panic!("class-level read must return the descriptor"),
        }
    }

    #[test]
    fn subtype_value_keeps_its_own_type_name() {
        let value = FieldValue::from(20).as_subtype("CustomInt");
        assert_eq!(value.type_tag().name(), "CustomInt");
        assert_eq!(value.type_tag().base().map(TypeTag::name), Some("int"));
        assert_eq!(value.as_int(), Some(20));
    }
}
