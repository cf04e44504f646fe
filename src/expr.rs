//! Java expression model.
//!
//! Immutable, composable fragments of Java source. An [`Expression`] renders
//! to code via [`Expression::to_code`]; rendering is pure string assembly over
//! the variant, never a Java compiler. Larger expressions are built by
//! wrapping smaller ones (method-call chains, builder chains), so a rendered
//! expression is valid Java whenever its children are.

use std::fmt;

use crate::ast::{Cardinality, Field};

pub const IMMUTABLE_LIST_CLASS: &str = "com.google.common.collect.ImmutableList";
pub const IMMUTABLE_MAP_CLASS: &str = "com.google.common.collect.ImmutableMap";
pub const BYTE_STRING_CLASS: &str = "com.google.protobuf.ByteString";

// ------------------------------ Expression -------------------------------- //

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// The `null` literal.
    Null,
    /// A quoted string literal.
    StringLiteral(String),
    /// A `ByteString.copyFrom(new byte[]{..})` literal.
    BytesLiteral(Vec<u8>),
    /// Raw code carried verbatim (numbers, booleans, pre-rendered conditions).
    Literal(String),
    /// A reference to a class by its fully qualified name.
    Class(ClassName),
    /// A reference to the message being validated.
    Message(MessageReference),
    /// A (possibly chained) method call.
    Call(MethodCall),
}

impl Expression {
    /// Wraps any displayable value as a raw literal.
    pub fn literal(value: impl ToString) -> Self {
        Expression::Literal(value.to_string())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expression::StringLiteral(value.into())
    }

    pub fn to_code(&self) -> String {
        match self {
            Expression::Null => "null".to_owned(),
            Expression::StringLiteral(value) => format!("\"{}\"", escape_java(value)),
            Expression::BytesLiteral(bytes) => {
                // Java byte literals are signed.
                let items = bytes
                    .iter()
                    .map(|b| (*b as i8).to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{BYTE_STRING_CLASS}.copyFrom(new byte[]{{{items}}})")
            }
            Expression::Literal(code) => code.clone(),
            Expression::Class(class) => class.qualified().to_owned(),
            Expression::Message(message) => message.label().to_owned(),
            Expression::Call(call) => call.to_code(),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_code())
    }
}

impl From<ClassName> for Expression {
    fn from(class: ClassName) -> Self {
        Expression::Class(class)
    }
}

impl From<MessageReference> for Expression {
    fn from(message: MessageReference) -> Self {
        Expression::Message(message)
    }
}

impl From<MethodCall> for Expression {
    fn from(call: MethodCall) -> Self {
        Expression::Call(call)
    }
}

// ------------------------------ ClassName --------------------------------- //

/// A fully qualified Java class name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassName {
    qualified: String,
}

impl ClassName {
    pub fn new(qualified: impl Into<String>) -> Self {
        ClassName { qualified: qualified.into() }
    }

    pub fn qualified(&self) -> &str {
        &self.qualified
    }

    /// A no-argument (static or instance) method call on this class.
    pub fn call(&self, method: impl Into<String>) -> MethodCall {
        MethodCall::new(self.clone().into(), method)
    }

    pub fn call_with(&self, method: impl Into<String>, arguments: Vec<Expression>) -> MethodCall {
        self.call(method).with_arguments(arguments)
    }

    pub fn new_builder(&self) -> MethodCall {
        self.call("newBuilder")
    }

    pub fn get_default_instance(&self) -> MethodCall {
        self.call("getDefaultInstance")
    }

    /// The static `forNumber` enum lookup.
    pub fn enum_value(&self, number: i32) -> MethodCall {
        self.call_with("forNumber", vec![Expression::literal(number)])
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified)
    }
}

// ---------------------------- MessageReference ---------------------------- //

/// A named reference to the message a generated check runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageReference {
    label: String,
}

impl MessageReference {
    pub fn new(label: impl Into<String>) -> Self {
        MessageReference { label: label.into() }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Access to one of the message's fields, accessor names derived from
    /// the field's cardinality.
    pub fn field(&self, field: &Field) -> FieldAccess {
        FieldAccess::new(self.clone().into(), &field.name, field.cardinality)
    }
}

// ------------------------------ FieldAccess ------------------------------- //

/// Accessors of a single Protobuf field on a message (or builder) expression.
///
/// Accessor names are a pure function of the field name and cardinality:
/// no state is consulted beyond the two inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAccess {
    receiver: Expression,
    name: String,
    cardinality: Cardinality,
}

impl FieldAccess {
    pub fn new(receiver: Expression, name: impl Into<String>, cardinality: Cardinality) -> Self {
        FieldAccess { receiver, name: name.into(), cardinality }
    }

    fn single(receiver: Expression, name: impl Into<String>) -> Self {
        Self::new(receiver, name, Cardinality::Single)
    }

    /// The getter call.
    ///
    /// Repeated and map getters are wrapped in an immutable copy so the
    /// returned reference cannot mutate the source message.
    pub fn getter(&self) -> MethodCall {
        let raw = MethodCall::new(self.receiver.clone(), self.getter_name());
        match self.cardinality {
            Cardinality::Single => raw,
            Cardinality::List => copy_of(IMMUTABLE_LIST_CLASS, raw),
            Cardinality::Map => copy_of(IMMUTABLE_MAP_CLASS, raw),
        }
    }

    /// The builder setter: `setX` for singular fields, `addAllX` for lists,
    /// `putAllX` for maps.
    pub fn setter(&self, value: Expression) -> MethodCall {
        MethodCall::new(self.receiver.clone(), self.setter_name()).with_arguments(vec![value])
    }

    pub fn add(&self, value: Expression) -> MethodCall {
        MethodCall::new(self.receiver.clone(), self.prefixed("add")).with_arguments(vec![value])
    }

    pub fn add_all(&self, value: Expression) -> MethodCall {
        MethodCall::new(self.receiver.clone(), self.prefixed("addAll")).with_arguments(vec![value])
    }

    pub fn put(&self, key: Expression, value: Expression) -> MethodCall {
        MethodCall::new(self.receiver.clone(), self.prefixed("put")).with_arguments(vec![key, value])
    }

    pub fn put_all(&self, value: Expression) -> MethodCall {
        MethodCall::new(self.receiver.clone(), self.prefixed("putAll")).with_arguments(vec![value])
    }

    fn getter_name(&self) -> String {
        match self.cardinality {
            Cardinality::Single => self.prefixed("get"),
            Cardinality::List => format!("get{}List", camel_case(&self.name)),
            Cardinality::Map => format!("get{}Map", camel_case(&self.name)),
        }
    }

    fn setter_name(&self) -> String {
        match self.cardinality {
            Cardinality::Single => self.prefixed("set"),
            Cardinality::List => self.prefixed("addAll"),
            Cardinality::Map => self.prefixed("putAll"),
        }
    }

    fn prefixed(&self, prefix: &str) -> String {
        format!("{prefix}{}", camel_case(&self.name))
    }
}

fn copy_of(collection_class: &str, raw_getter: MethodCall) -> MethodCall {
    ClassName::new(collection_class).call_with("copyOf", vec![raw_getter.into()])
}

// ------------------------------ MethodCall -------------------------------- //

/// A method call, rendering as `receiver.<Generics>name(arguments)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    receiver: Box<Expression>,
    method: String,
    arguments: Vec<Expression>,
    generics: Vec<ClassName>,
}

impl MethodCall {
    pub fn new(receiver: Expression, method: impl Into<String>) -> Self {
        MethodCall {
            receiver: Box::new(receiver),
            method: method.into(),
            arguments: Vec::new(),
            generics: Vec::new(),
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<Expression>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn with_generics(mut self, generics: Vec<ClassName>) -> Self {
        self.generics = generics;
        self
    }

    pub fn to_code(&self) -> String {
        let generics = if self.generics.is_empty() {
            String::new()
        } else {
            let names = self
                .generics
                .iter()
                .map(ClassName::qualified)
                .collect::<Vec<_>>()
                .join(", ");
            format!("<{names}>")
        };
        let arguments = self
            .arguments
            .iter()
            .map(Expression::to_code)
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}.{generics}{}({arguments})", self.receiver.to_code(), self.method)
    }

    /// Another call on the result of this one.
    pub fn chain(self, method: impl Into<String>) -> MethodCall {
        MethodCall::new(self.into(), method)
    }

    pub fn chain_with(self, method: impl Into<String>, arguments: Vec<Expression>) -> MethodCall {
        self.chain(method).with_arguments(arguments)
    }

    pub fn chain_get(self, field_name: &str) -> MethodCall {
        FieldAccess::single(self.into(), field_name).getter()
    }

    pub fn chain_set(self, field_name: &str, value: Expression) -> MethodCall {
        FieldAccess::single(self.into(), field_name).setter(value)
    }

    pub fn chain_add(self, field_name: &str, value: Expression) -> MethodCall {
        FieldAccess::single(self.into(), field_name).add(value)
    }

    pub fn chain_add_all(self, field_name: &str, value: Expression) -> MethodCall {
        FieldAccess::single(self.into(), field_name).add_all(value)
    }

    pub fn chain_build(self) -> MethodCall {
        self.chain("build")
    }
}

impl fmt::Display for MethodCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_code())
    }
}

// -------------------------- Collection builders --------------------------- //

/// An `ImmutableList.of(..)` constructor call.
pub fn list_expression(items: Vec<Expression>) -> MethodCall {
    ClassName::new(IMMUTABLE_LIST_CLASS).call_with("of", items)
}

/// An `ImmutableMap` construction: `of()` when empty, a typed `builder()`
/// chain otherwise.
///
/// # Panics
///
/// For non-empty `entries`, both `key_type` and `value_type` must be given;
/// the builder call cannot be typed otherwise.
pub fn map_expression(
    entries: Vec<(Expression, Expression)>,
    key_type: Option<&ClassName>,
    value_type: Option<&ClassName>,
) -> MethodCall {
    let class = ClassName::new(IMMUTABLE_MAP_CLASS);
    if entries.is_empty() {
        return class.call("of");
    }
    let (Some(key_type), Some(value_type)) = (key_type, value_type) else {
        panic!("a non-empty map expression requires explicit key and value types");
    };
    let generics = vec![key_type.clone(), value_type.clone()];
    let mut call = class.call("builder").with_generics(generics);
    for (key, value) in entries {
        call = call.chain_with("put", vec![key, value]);
    }
    call.chain("build")
}

// -------------------------------- Helpers --------------------------------- //

/// `field_name` → `FieldName`; blank segments between underscores are dropped.
pub(crate) fn camel_case(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

fn escape_java(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}

// --------------------------------- Tests ---------------------------------- //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Type, TypeName};

    fn field(name: &str, cardinality: Cardinality) -> Field {
        Field {
            name: name.to_owned(),
            declaring_type: TypeName::new("acme", "Bird"),
            ty: Type::Primitive(crate::ast::PrimitiveType::String),
            cardinality,
        }
    }

    #[test]
    fn builder_chain_renders_end_to_end() {
        let code = ClassName::new("com.acme.Bird")
            .new_builder()
            .chain_set("name", Expression::string("Kiwi"))
            .chain_build()
            .to_code();
        assert_eq!(code, "com.acme.Bird.newBuilder().setName(\"Kiwi\").build()");
    }

    #[test]
    fn camel_case_drops_blank_segments() {
        assert_eq!(camel_case("field_name"), "FieldName");
        assert_eq!(camel_case("__a__b_"), "AB");
        assert_eq!(camel_case("single"), "Single");
    }

    #[test]
    fn single_getter_is_never_wrapped() {
        let msg = MessageReference::new("result");
        let getter = msg.field(&field("name", Cardinality::Single)).getter();
        assert_eq!(getter.to_code(), "result.getName()");
    }

    #[test]
    fn list_getter_is_wrapped_in_immutable_copy() {
        let msg = MessageReference::new("result");
        let getter = msg.field(&field("tags", Cardinality::List)).getter();
        assert_eq!(
            getter.to_code(),
            "com.google.common.collect.ImmutableList.copyOf(result.getTagsList())"
        );
    }

    #[test]
    fn map_getter_is_wrapped_in_immutable_copy() {
        let msg = MessageReference::new("result");
        let getter = msg.field(&field("labels", Cardinality::Map)).getter();
        assert_eq!(
            getter.to_code(),
            "com.google.common.collect.ImmutableMap.copyOf(result.getLabelsMap())"
        );
    }

    #[test]
    fn cardinality_picks_setter_names() {
        let msg = MessageReference::new("result");
        let value = || Expression::literal(1);
        let single = msg.field(&field("size", Cardinality::Single)).setter(value());
        let list = msg.field(&field("tags", Cardinality::List)).setter(value());
        let map = msg.field(&field("labels", Cardinality::Map)).setter(value());
        assert_eq!(single.to_code(), "result.setSize(1)");
        assert_eq!(list.to_code(), "result.addAllTags(1)");
        assert_eq!(map.to_code(), "result.putAllLabels(1)");
    }

    #[test]
    fn empty_collections_render_as_of_calls() {
        assert_eq!(
            list_expression(vec![]).to_code(),
            "com.google.common.collect.ImmutableList.of()"
        );
        assert_eq!(
            map_expression(vec![], None, None).to_code(),
            "com.google.common.collect.ImmutableMap.of()"
        );
    }

    #[test]
    fn map_expression_renders_typed_builder_chain() {
        let key = ClassName::new("java.lang.String");
        let value = ClassName::new("java.lang.Integer");
        let entries = vec![(Expression::string("a"), Expression::literal(1))];
        let code = map_expression(entries, Some(&key), Some(&value)).to_code();
        assert_eq!(
            code,
            "com.google.common.collect.ImmutableMap.<java.lang.String, java.lang.Integer>\
             builder().put(\"a\", 1).build()"
        );
    }

    #[test]
    #[should_panic(expected = "requires explicit key and value types")]
    fn non_empty_map_without_types_panics() {
        let entries = vec![(Expression::literal(1), Expression::literal(2))];
        map_expression(entries, None, None);
    }

    #[test]
    fn string_literals_are_escaped() {
        let code = Expression::string("say \"hi\"\n").to_code();
        assert_eq!(code, "\"say \\\"hi\\\"\\n\"");
    }

    #[test]
    fn bytes_literal_renders_signed_java_bytes() {
        let code = Expression::BytesLiteral(vec![0, 127, 128, 255]).to_code();
        assert_eq!(
            code,
            "com.google.protobuf.ByteString.copyFrom(new byte[]{0, 127, -128, -1})"
        );
    }
}
