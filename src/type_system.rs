//! The registry resolving Protobuf types to Java classes, plus the
//! constant-value → expression converter.
//!
//! Built once per generation session from (type URL, class name) pairs and
//! read-only afterwards, so a single instance can back any number of
//! independent generation calls.

use indexmap::IndexMap;

use crate::ast::{PrimitiveType, SourceFile, Type, TypeName, java_class_name};
use crate::error::Error;
use crate::expr::{
    BYTE_STRING_CLASS, ClassName, Expression, list_expression, map_expression,
};
use crate::value::Value;

pub struct TypeSystem {
    known_types: IndexMap<String, ClassName>,
}

impl TypeSystem {
    /// A frozen registry from explicit (type URL, class name) pairs.
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, ClassName)>,
    {
        TypeSystem { known_types: entries.into_iter().collect() }
    }

    /// A registry covering every message and enum the given files declare.
    pub fn for_sources<'a, I>(sources: I) -> Self
    where
        I: IntoIterator<Item = &'a SourceFile>,
    {
        let mut known_types = IndexMap::new();
        for source in sources {
            for declared in source.types.iter().chain(&source.enums) {
                known_types.insert(declared.type_url(), java_class_name(declared, &source.file));
            }
        }
        TypeSystem { known_types }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClassName)> {
        self.known_types.iter().map(|(url, class)| (url.as_str(), class))
    }

    /// The Java class representing `ty`.
    ///
    /// `label` names the role of the type in the caller ("field type",
    /// "map key type", ..) and only feeds error messages.
    pub fn to_class(&self, ty: &Type, label: &str) -> Result<ClassName, Error> {
        match ty {
            Type::Primitive(primitive) => Ok(primitive_class(*primitive)),
            Type::Message(name) | Type::Enumeration(name) => self.lookup(name, label),
        }
    }

    fn lookup(&self, name: &TypeName, label: &str) -> Result<ClassName, Error> {
        let key = name.type_url();
        self.known_types.get(&key).cloned().ok_or(Error::UnknownType {
            label: label.to_owned(),
            key,
        })
    }

    /// Converts a rule constant into the Java expression producing it.
    pub fn value_to_java(&self, value: &Value) -> Result<Expression, Error> {
        match value {
            Value::Null => Ok(Expression::Null),
            Value::Bool(value) => Ok(Expression::literal(value)),
            Value::Number(value) => Ok(Expression::literal(value)),
            Value::String(value) => Ok(Expression::string(value.clone())),
            Value::Bytes(bytes) => Ok(Expression::BytesLiteral(bytes.clone())),
            Value::Message(message) => {
                let class = self.lookup(&message.ty, "message type")?;
                if message.fields.is_empty() {
                    return Ok(class.get_default_instance().into());
                }
                let mut builder = class.new_builder();
                for (field_name, field_value) in &message.fields {
                    builder = builder.chain_set(field_name, self.value_to_java(field_value)?);
                }
                Ok(builder.chain_build().into())
            }
            Value::Enum(value) => {
                let class = self.lookup(&value.ty, "enum type")?;
                Ok(class.enum_value(value.const_number).into())
            }
            Value::List(values) => {
                let items = values
                    .iter()
                    .map(|item| self.value_to_java(item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(list_expression(items).into())
            }
            Value::Map(map) => {
                // Key/value classes come from the first entry; later entries
                // are not checked against it.
                let first = map.entries.first();
                let key_class = self.inferred_class(first.map(|e| &e.key), "map key type")?;
                let value_class = self.inferred_class(first.map(|e| &e.value), "map value type")?;
                let entries = map
                    .entries
                    .iter()
                    .map(|entry| {
                        Ok((self.value_to_java(&entry.key)?, self.value_to_java(&entry.value)?))
                    })
                    .collect::<Result<Vec<_>, Error>>()?;
                Ok(map_expression(entries, key_class.as_ref(), value_class.as_ref()).into())
            }
        }
    }

    fn inferred_class(&self, value: Option<&Value>, label: &str) -> Result<Option<ClassName>, Error> {
        value
            .and_then(Value::declared_type)
            .map(|ty| self.to_class(&ty, label))
            .transpose()
    }
}

/// The boxed Java class for a Protobuf scalar. All integer kinds of one bit
/// width widen to the same class.
fn primitive_class(primitive: PrimitiveType) -> ClassName {
    let name = match primitive {
        PrimitiveType::Double => "java.lang.Double",
        PrimitiveType::Float => "java.lang.Float",
        PrimitiveType::Int64
        | PrimitiveType::Uint64
        | PrimitiveType::Sint64
        | PrimitiveType::Fixed64
        | PrimitiveType::Sfixed64 => "java.lang.Long",
        PrimitiveType::Int32
        | PrimitiveType::Uint32
        | PrimitiveType::Sint32
        | PrimitiveType::Fixed32
        | PrimitiveType::Sfixed32 => "java.lang.Integer",
        PrimitiveType::Bool => "java.lang.Boolean",
        PrimitiveType::String => "java.lang.String",
        PrimitiveType::Bytes => BYTE_STRING_CLASS,
    };
    ClassName::new(name)
}
