//! The rule-to-code compiler.
//!
//! Translates a validation [`Rule`] into a Java `if` block that records a
//! [`ConstraintViolation`] when the rule's condition does not hold. Composite
//! rules recurse by passing the sub-rule explicitly; the context itself stays
//! untouched across the recursion.
//!
//! [`ConstraintViolation`]: crate::error_message

use crate::ast::TypeName;
use crate::code::CodeBlock;
use crate::error::Error;
use crate::error_message::ErrorMessage;
use crate::expr::{Expression, MessageReference};
use crate::rule::{LogicalOperator, Rule, Sign, SimpleRule};
use crate::type_system::TypeSystem;

/// Everything invariant across one rule's compilation.
pub struct GenerationContext<'a> {
    /// The expression referring to the validated message.
    pub message: MessageReference,
    /// The types known to the session.
    pub type_system: &'a TypeSystem,
    /// The type declaring the compiled rule.
    pub declaring_type: &'a TypeName,
    /// The identifier of the mutable violations list the emitted code
    /// appends to.
    pub violations: &'a str,
}

/// The full check: `if (!(<condition>)) { <record violation> }`.
pub fn code_for(rule: &Rule, ctx: &GenerationContext<'_>) -> Result<CodeBlock, Error> {
    let condition = condition_for(rule, ctx)?;
    let error = error_for(rule, ctx)?;
    let violation = match rule {
        Rule::Simple(simple) => {
            let field_value = ctx.message.field(&simple.field).getter().into();
            error.create_violation(&simple.field, &field_value, ctx.violations)
        }
        Rule::Composite(_) => error.create_composite_violation(ctx.declaring_type, ctx.violations),
    };
    Ok(CodeBlock::builder()
        .begin_control_flow(format!("if (!({}))", condition.to_code()))
        .add(violation)
        .end_control_flow()
        .build())
}

/// The boolean expression evaluating to `true` when the rule holds.
pub fn condition_for(rule: &Rule, ctx: &GenerationContext<'_>) -> Result<Expression, Error> {
    match rule {
        Rule::Simple(simple) => {
            let left = ctx.message.field(&simple.field).getter().to_code();
            let right = ctx.type_system.value_to_java(&simple.other_value)?.to_code();
            let rendered = if simple.field.ty.is_primitive() {
                primitive_comparison(simple.sign, &left, &right)
            } else {
                object_comparison(simple.sign, &left, &right)
                    .ok_or(Error::UnsupportedComparison { sign: simple.sign })?
            };
            Ok(Expression::Literal(rendered))
        }
        Rule::Composite(composite) => {
            let left = condition_for(&composite.left, ctx)?;
            let right = condition_for(&composite.right, ctx)?;
            Ok(Expression::Literal(boolean_combine(
                composite.operation,
                &left.to_code(),
                &right.to_code(),
            )))
        }
    }
}

/// The substituted error message for the found violation.
pub fn error_for(rule: &Rule, ctx: &GenerationContext<'_>) -> Result<ErrorMessage, Error> {
    match rule {
        Rule::Simple(simple) => {
            let SimpleRule { field, other_value, error_message, .. } = simple;
            let field_value = ctx.message.field(field).getter().to_code();
            let other = ctx.type_system.value_to_java(other_value)?.to_code();
            Ok(ErrorMessage::for_rule(error_message, &field_value, &other))
        }
        Rule::Composite(composite) => {
            let left = error_for(&composite.left, ctx)?;
            let right = error_for(&composite.right, ctx)?;
            Ok(ErrorMessage::for_composite(
                &composite.error_message,
                &left,
                &right,
                composite.operation,
            ))
        }
    }
}

// --------------------------- Comparison tables ---------------------------- //

/// Comparisons available for primitive (numeric and boolean) field types.
fn primitive_comparison(sign: Sign, left: &str, right: &str) -> String {
    let operator = match sign {
        Sign::Equal => "==",
        Sign::NotEqual => "!=",
        Sign::GreaterThan => ">",
        Sign::LessThan => "<",
        Sign::GreaterOrEqual => ">=",
        Sign::LessOrEqual => "<=",
    };
    format!("{left} {operator} {right}")
}

/// Comparisons available for object (message, enum) field types. Ordering
/// signs have no meaning here.
fn object_comparison(sign: Sign, left: &str, right: &str) -> Option<String> {
    match sign {
        Sign::Equal => Some(format!("{left}.equals({right})")),
        Sign::NotEqual => Some(format!("!{left}.equals({right})")),
        _ => None,
    }
}

fn boolean_combine(operation: LogicalOperator, left: &str, right: &str) -> String {
    let operator = match operation {
        LogicalOperator::And => "&&",
        LogicalOperator::Or => "||",
        LogicalOperator::Xor => "^",
    };
    format!("({left}) {operator} ({right})")
}

// --------------------------------- Tests ---------------------------------- //
