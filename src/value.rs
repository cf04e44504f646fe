//! Constant values appearing in validation rules.
//!
//! A [`Value`] is the right-hand operand of a simple rule: the literal the
//! field is compared against. Message fields keep insertion order so the
//! generated builder chains are deterministic.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ast::{Cardinality, Field, PrimitiveType, Type, TypeName};
use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Bytes(Vec<u8>),
    Message(MessageValue),
    Enum(EnumValue),
    List(Vec<Value>),
    Map(MapValue),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageValue {
    #[serde(rename = "type")]
    pub ty: TypeName,
    #[serde(default)]
    pub fields: IndexMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumValue {
    #[serde(rename = "type")]
    pub ty: TypeName,
    #[serde(default)]
    pub const_number: i32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub entries: Vec<MapEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEntry {
    pub key: Value,
    pub value: Value,
}

impl Value {
    /// The Protobuf type this constant implies, if any.
    ///
    /// Used to infer map key/value classes from the first entry; lists, maps
    /// and `null` carry no type of their own.
    pub fn declared_type(&self) -> Option<Type> {
        match self {
            Value::Null | Value::List(_) | Value::Map(_) => None,
            Value::Bool(_) => Some(Type::Primitive(PrimitiveType::Bool)),
            Value::Number(_) => Some(Type::Primitive(PrimitiveType::Double)),
            Value::String(_) => Some(Type::Primitive(PrimitiveType::String)),
            Value::Bytes(_) => Some(Type::Primitive(PrimitiveType::Bytes)),
            Value::Message(message) => Some(Type::Message(message.ty.clone())),
            Value::Enum(value) => Some(Type::Enumeration(value.ty.clone())),
        }
    }

    /// The not-set value of `field`, the sentinel a `(required)` check
    /// compares against.
    ///
    /// Numeric and boolean fields have no usable sentinel (zero and `false`
    /// are legitimate values) and are rejected.
    pub fn default_for_field(field: &Field) -> Result<Value, Error> {
        match field.cardinality {
            Cardinality::List => Ok(Value::List(Vec::new())),
            Cardinality::Map => Ok(Value::Map(MapValue::default())),
            Cardinality::Single => Self::default_for_type(&field.ty),
        }
    }

    fn default_for_type(ty: &Type) -> Result<Value, Error> {
        match ty {
            Type::Message(name) => Ok(Value::Message(MessageValue {
                ty: name.clone(),
                fields: IndexMap::new(),
            })),
            Type::Enumeration(name) => Ok(Value::Enum(EnumValue {
                ty: name.clone(),
                const_number: 0,
            })),
            Type::Primitive(PrimitiveType::String) => Ok(Value::String(String::new())),
            Type::Primitive(PrimitiveType::Bytes) => Ok(Value::Bytes(Vec::new())),
            Type::Primitive(other) => Err(Error::UnsupportedRequired(*other)),
        }
    }
}
