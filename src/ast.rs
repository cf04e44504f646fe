//! Protobuf descriptor model.
//!
//! The subset of compiled-`.proto` metadata the generator consumes: type
//! names, field types and cardinalities, and the per-file Java options that
//! drive class-name resolution. All of it arrives as JSON produced by the
//! descriptor-walking step upstream.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::expr::{ClassName, camel_case};

const TYPE_URL_PREFIX: &str = "type.googleapis.com";

// ------------------------------- TypeName --------------------------------- //

/// The name of a Protobuf message or enum type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeName {
    #[serde(default)]
    pub package: String,
    pub simple_name: String,
    /// Names of the types this one nests in, outermost first.
    #[serde(default)]
    pub nesting: Vec<String>,
}

impl TypeName {
    pub fn new(package: impl Into<String>, simple_name: impl Into<String>) -> Self {
        TypeName {
            package: package.into(),
            simple_name: simple_name.into(),
            nesting: Vec::new(),
        }
    }

    /// `package.Outer.Simple`, or just the type path for packageless files.
    pub fn qualified(&self) -> String {
        let mut segments = Vec::with_capacity(self.nesting.len() + 2);
        if !self.package.is_empty() {
            segments.push(self.package.as_str());
        }
        segments.extend(self.nesting.iter().map(String::as_str));
        segments.push(&self.simple_name);
        segments.join(".")
    }

    /// The canonical type URL keying this type in a [`TypeSystem`].
    ///
    /// [`TypeSystem`]: crate::type_system::TypeSystem
    pub fn type_url(&self) -> String {
        format!("{TYPE_URL_PREFIX}/{}", self.qualified())
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified())
    }
}

// ------------------------------ Field types ------------------------------- //

/// Protobuf scalar kinds, by wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveType {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
}

impl PrimitiveType {
    pub fn proto_name(&self) -> &'static str {
        match self {
            PrimitiveType::Double => "double",
            PrimitiveType::Float => "float",
            PrimitiveType::Int32 => "int32",
            PrimitiveType::Int64 => "int64",
            PrimitiveType::Uint32 => "uint32",
            PrimitiveType::Uint64 => "uint64",
            PrimitiveType::Sint32 => "sint32",
            PrimitiveType::Sint64 => "sint64",
            PrimitiveType::Fixed32 => "fixed32",
            PrimitiveType::Fixed64 => "fixed64",
            PrimitiveType::Sfixed32 => "sfixed32",
            PrimitiveType::Sfixed64 => "sfixed64",
            PrimitiveType::Bool => "bool",
            PrimitiveType::String => "string",
            PrimitiveType::Bytes => "bytes",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.proto_name())
    }
}

/// A field's declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    Primitive(PrimitiveType),
    Message(TypeName),
    Enumeration(TypeName),
}

impl Type {
    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(_))
    }
}

/// Whether a field holds one value, a repeated list, or a key-value map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    #[default]
    Single,
    List,
    Map,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub declaring_type: TypeName,
    #[serde(rename = "type")]
    pub ty: Type,
    #[serde(default)]
    pub cardinality: Cardinality,
}

// ------------------------------ Proto files ------------------------------- //

/// Per-file metadata affecting generated Java names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtoFile {
    pub path: String,
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub java_package: Option<String>,
    #[serde(default)]
    pub java_multiple_files: bool,
    #[serde(default)]
    pub java_outer_classname: Option<String>,
}

impl ProtoFile {
    fn effective_java_package(&self) -> &str {
        self.java_package.as_deref().unwrap_or(&self.package)
    }

    /// The wrapper class for single-file mode, `kanban_board.proto` → `KanbanBoard`.
    fn outer_class(&self) -> String {
        match &self.java_outer_classname {
            Some(name) => name.clone(),
            None => {
                let stem = self
                    .path
                    .rsplit('/')
                    .next()
                    .unwrap_or(&self.path)
                    .trim_end_matches(".proto");
                camel_case(stem)
            }
        }
    }
}

/// The Java class generated for a message or enum declared in `file`.
pub fn java_class_name(type_name: &TypeName, file: &ProtoFile) -> ClassName {
    let mut segments = Vec::new();
    let package = file.effective_java_package();
    if !package.is_empty() {
        segments.push(package.to_owned());
    }
    if !file.java_multiple_files {
        segments.push(file.outer_class());
    }
    segments.extend(type_name.nesting.iter().cloned());
    segments.push(type_name.simple_name.clone());
    ClassName::new(segments.join("."))
}

/// One compiled `.proto` file: its options plus the types it declares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    pub file: ProtoFile,
    #[serde(default)]
    pub types: Vec<TypeName>,
    #[serde(default)]
    pub enums: Vec<TypeName>,
}

// --------------------------------- Tests ---------------------------------- //

#[cfg(test)]
mod tests {
    use super::*;

    fn file(java_package: Option<&str>, multiple: bool) -> ProtoFile {
        ProtoFile {
            path: "spine/kanban/kanban_board.proto".to_owned(),
            package: "spine.kanban".to_owned(),
            java_package: java_package.map(str::to_owned),
            java_multiple_files: multiple,
            java_outer_classname: None,
        }
    }

    #[test]
    fn type_url_is_prefixed_qualified_name() {
        let mut name = TypeName::new("spine.kanban", "WipLimit");
        assert_eq!(name.type_url(), "type.googleapis.com/spine.kanban.WipLimit");
        name.nesting = vec!["Board".to_owned()];
        assert_eq!(
            name.type_url(),
            "type.googleapis.com/spine.kanban.Board.WipLimit"
        );
    }

    #[test]
    fn java_class_uses_java_package_and_outer_class() {
        let name = TypeName::new("spine.kanban", "Board");
        let single_file = java_class_name(&name, &file(Some("io.spine.kanban"), false));
        assert_eq!(single_file.qualified(), "io.spine.kanban.KanbanBoard.Board");

        let multi_file = java_class_name(&name, &file(Some("io.spine.kanban"), true));
        assert_eq!(multi_file.qualified(), "io.spine.kanban.Board");
    }

    #[test]
    fn java_class_falls_back_to_proto_package() {
        let name = TypeName::new("spine.kanban", "Board");
        let class = java_class_name(&name, &file(None, true));
        assert_eq!(class.qualified(), "spine.kanban.Board");
    }

    #[test]
    fn nested_types_keep_their_outer_path() {
        let mut name = TypeName::new("spine.kanban", "WipLimit");
        name.nesting = vec!["Column".to_owned()];
        let class = java_class_name(&name, &file(Some("io.spine.kanban"), true));
        assert_eq!(class.qualified(), "io.spine.kanban.Column.WipLimit");
    }

    #[test]
    fn primitive_types_deserialize_by_wire_name() {
        let ty: Type = serde_json::from_str(r#"{ "primitive": "sfixed64" }"#).unwrap();
        assert_eq!(ty, Type::Primitive(PrimitiveType::Sfixed64));
        assert!(ty.is_primitive());
    }
}
