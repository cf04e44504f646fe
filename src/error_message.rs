//! Violation error messages and the code that records violations.
//!
//! An [`ErrorMessage`] is the rule's message template with the named
//! placeholders already substituted. It also knows how to emit the Java
//! statement appending a `ConstraintViolation` to the violations list.

use std::fmt;

use crate::ast::{Field, TypeName};
use crate::code::CodeBlock;
use crate::expr::{ClassName, Expression, MethodCall};
use crate::rule::LogicalOperator;

pub(crate) const CONSTRAINT_VIOLATION_CLASS: &str = "io.spine.validate.ConstraintViolation";
const FIELD_PATH_CLASS: &str = "io.spine.base.FieldPath";
const TYPE_CONVERTER_CLASS: &str = "io.spine.protobuf.TypeConverter";

const VALUE: &str = "value";
const OTHER: &str = "other";
const LEFT: &str = "left";
const RIGHT: &str = "right";
const OPERATION: &str = "operation";

/// A human-readable message describing one failed constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessage {
    value: String,
}

impl ErrorMessage {
    /// The message of a simple rule: substitutes `{value}` with the checked
    /// field's value expression and `{other}` with the comparison operand.
    pub fn for_rule(format: &str, value: &str, other: &str) -> Self {
        let message = replace_placeholder(format, VALUE, value);
        let message = replace_placeholder(&message, OTHER, other);
        ErrorMessage { value: message }
    }

    /// The message of a composite rule: substitutes `{left}`/`{right}` with
    /// the sub-rule messages and `{operation}` with the joining operator.
    pub fn for_composite(
        format: &str,
        left: &ErrorMessage,
        right: &ErrorMessage,
        operation: LogicalOperator,
    ) -> Self {
        let message = replace_placeholder(format, LEFT, &left.value);
        let message = replace_placeholder(&message, RIGHT, &right.value);
        let message = replace_placeholder(&message, OPERATION, operation.printable());
        ErrorMessage { value: message }
    }

    /// Code appending a violation of a simple rule, carrying the field path
    /// and the packed field value, to `violations`.
    pub fn create_violation(
        &self,
        field: &Field,
        field_value: &Expression,
        violations: &str,
    ) -> CodeBlock {
        let violation =
            self.build_violation(&field.declaring_type, Some(field), Some(field_value));
        add_violation(violation, violations)
    }

    /// Code appending a violation of a composite rule, tagged with the
    /// declaring type only, to `violations`.
    pub fn create_composite_violation(
        &self,
        declaring_type: &TypeName,
        violations: &str,
    ) -> CodeBlock {
        let violation = self.build_violation(declaring_type, None, None);
        add_violation(violation, violations)
    }

    fn build_violation(
        &self,
        declaring_type: &TypeName,
        field: Option<&Field>,
        field_value: Option<&Expression>,
    ) -> MethodCall {
        let mut builder = ClassName::new(CONSTRAINT_VIOLATION_CLASS)
            .new_builder()
            .chain_set("msg_format", Expression::string(self.value.clone()))
            .chain_set("type_name", Expression::string(declaring_type.type_url()));
        if let Some(field) = field {
            builder = builder.chain_set("field_path", path_of(field).into());
        }
        if let Some(value) = field_value {
            builder = builder.chain_set("field_value", pack(value).into());
        }
        builder.chain_build()
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

fn add_violation(violation: MethodCall, violations: &str) -> CodeBlock {
    CodeBlock::statement(format!("{violations}.add({})", violation.to_code()))
}

fn path_of(field: &Field) -> MethodCall {
    ClassName::new(FIELD_PATH_CLASS)
        .new_builder()
        .chain_add("field_name", Expression::string(field.name.clone()))
        .chain_build()
}

/// Packs a raw field value into a `google.protobuf.Any`.
fn pack(value: &Expression) -> MethodCall {
    ClassName::new(TYPE_CONVERTER_CLASS).call_with("toAny", vec![value.clone()])
}

fn replace_placeholder(format: &str, placeholder: &str, new_value: &str) -> String {
    format.replace(&format!("{{{placeholder}}}"), new_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Cardinality, PrimitiveType, Type};

    #[test]
    fn rule_placeholders_are_substituted() {
        let message = ErrorMessage::for_rule("got {value}, want {other}", "user.getAge()", "18");
        assert_eq!(message.to_string(), "got user.getAge(), want 18");
    }

    #[test]
    fn missing_placeholders_leave_the_format_untouched() {
        let message = ErrorMessage::for_rule("Field must be set.", "x", "y");
        assert_eq!(message.to_string(), "Field must be set.");
    }

    #[test]
    fn composite_placeholders_include_the_operation() {
        let left = ErrorMessage::for_rule("too low", "", "");
        let right = ErrorMessage::for_rule("too high", "", "");
        let message = ErrorMessage::for_composite(
            "{left} {operation} {right}",
            &left,
            &right,
            LogicalOperator::Xor,
        );
        assert_eq!(message.to_string(), "too low xor too high");
    }

    #[test]
    fn simple_violation_carries_path_and_packed_value() {
        let field = Field {
            name: "age".to_owned(),
            declaring_type: TypeName::new("acme", "User"),
            ty: Type::Primitive(PrimitiveType::Int32),
            cardinality: Cardinality::Single,
        };
        let message = ErrorMessage::for_rule("too young", "", "");
        let value = Expression::Literal("user.getAge()".to_owned());
        let block = message.create_violation(&field, &value, "violations").to_string();
        assert!(block.starts_with("violations.add("), "{block}");
        assert!(block.contains(".setMsgFormat(\"too young\")"), "{block}");
        assert!(
            block.contains(".setTypeName(\"type.googleapis.com/acme.User\")"),
            "{block}"
        );
        assert!(
            block.contains(
                ".setFieldPath(io.spine.base.FieldPath.newBuilder()\
                 .addFieldName(\"age\").build())"
            ),
            "{block}"
        );
        assert!(
            block.contains(".setFieldValue(io.spine.protobuf.TypeConverter.toAny(user.getAge()))"),
            "{block}"
        );
    }

    #[test]
    fn composite_violation_has_no_field_details() {
        let message = ErrorMessage::for_rule("broken", "", "");
        let block = message
            .create_composite_violation(&TypeName::new("acme", "User"), "violations")
            .to_string();
        assert!(!block.contains("setFieldPath"), "{block}");
        assert!(!block.contains("setFieldValue"), "{block}");
        assert!(block.contains(".setTypeName(\"type.googleapis.com/acme.User\")"), "{block}");
    }
}
