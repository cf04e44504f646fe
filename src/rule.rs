//! Validation rules: the input of the rule-to-code compiler.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ast::Field;
use crate::error::Error;
use crate::value::Value;

/// The comparison of a simple rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sign {
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sign::Equal => "EQUAL",
            Sign::NotEqual => "NOT_EQUAL",
            Sign::GreaterThan => "GREATER_THAN",
            Sign::LessThan => "LESS_THAN",
            Sign::GreaterOrEqual => "GREATER_OR_EQUAL",
            Sign::LessOrEqual => "LESS_OR_EQUAL",
        })
    }
}

/// The boolean operator joining the two sides of a composite rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalOperator {
    And,
    Or,
    Xor,
}

impl LogicalOperator {
    /// The human-readable form used in `{operation}` placeholders.
    pub fn printable(&self) -> &'static str {
        match self {
            LogicalOperator::And => "and",
            LogicalOperator::Or => "or",
            LogicalOperator::Xor => "xor",
        }
    }
}

/// A validation rule: a single field comparison or a boolean combination
/// of two sub-rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Simple(SimpleRule),
    Composite(Box<CompositeRule>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleRule {
    pub field: Field,
    pub sign: Sign,
    pub other_value: Value,
    pub error_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeRule {
    pub left: Rule,
    pub right: Rule,
    pub operation: LogicalOperator,
    pub error_message: String,
}

impl Rule {
    /// The rule behind the `(required)` field option: the field must differ
    /// from its not-set value.
    pub fn required(field: &Field) -> Result<Rule, Error> {
        let default = Value::default_for_field(field)?;
        Ok(Rule::Simple(SimpleRule {
            field: field.clone(),
            sign: Sign::NotEqual,
            other_value: default,
            error_message: "Field must be set.".to_owned(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Cardinality, PrimitiveType, Type, TypeName};

    #[test]
    fn required_rule_compares_against_the_not_set_value() {
        let field = Field {
            name: "name".to_owned(),
            declaring_type: TypeName::new("acme", "Board"),
            ty: Type::Primitive(PrimitiveType::String),
            cardinality: Cardinality::Single,
        };
        let rule = Rule::required(&field).unwrap();
        match rule {
            Rule::Simple(simple) => {
                assert_eq!(simple.sign, Sign::NotEqual);
                assert_eq!(simple.other_value, Value::String(String::new()));
                assert_eq!(simple.error_message, "Field must be set.");
            }
            other => panic!("expected a simple rule, got {other:?}"),
        }
    }

    #[test]
    fn required_rule_rejects_bool_fields() {
        let field = Field {
            name: "done".to_owned(),
            declaring_type: TypeName::new("acme", "Card"),
            ty: Type::Primitive(PrimitiveType::Bool),
            cardinality: Cardinality::Single,
        };
        assert!(Rule::required(&field).is_err());
    }

    #[test]
    fn rules_deserialize_recursively() {
        let src = r#"{
            "composite": {
                "left": { "simple": {
                    "field": {
                        "name": "value",
                        "declaring_type": { "package": "acme", "simple_name": "WipLimit" },
                        "type": { "primitive": "uint32" }
                    },
                    "sign": "greater_or_equal",
                    "other_value": { "number": 0 },
                    "error_message": "Value must not be negative, got {value}."
                } },
                "right": { "simple": {
                    "field": {
                        "name": "value",
                        "declaring_type": { "package": "acme", "simple_name": "WipLimit" },
                        "type": { "primitive": "uint32" }
                    },
                    "sign": "less_than",
                    "other_value": { "number": 100 },
                    "error_message": "Value must be under {other}, got {value}."
                } },
                "operation": "and",
                "error_message": "{left} {operation} {right}"
            }
        }"#;
        let rule: Rule = serde_json::from_str(src).unwrap();
        match rule {
            Rule::Composite(composite) => {
                assert_eq!(composite.operation, LogicalOperator::And);
                assert!(matches!(composite.left, Rule::Simple(_)));
            }
            other => panic!("expected a composite rule, got {other:?}"),
        }
    }
}
