//! Per-message rendering: all rules of one message as a single code block.

use serde::{Deserialize, Serialize};

use crate::ast::TypeName;
use crate::code::CodeBlock;
use crate::error::Error;
use crate::error_message::CONSTRAINT_VIOLATION_CLASS;
use crate::expr::{IMMUTABLE_LIST_CLASS, MessageReference};
use crate::generate::{GenerationContext, code_for};
use crate::rule::Rule;
use crate::type_system::TypeSystem;

/// The identifier of the violations accumulator in generated code.
pub const VIOLATIONS: &str = "violations";

/// The reference to the message under validation. The generated block runs
/// inside `build()`, right before the built message is returned.
const RESULT: &str = "result";

/// All validation rules declared by one message type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageValidation {
    pub name: TypeName,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl MessageValidation {
    /// The label identifying where the generated code belongs,
    /// `validate:<type url>`.
    pub fn label(&self) -> String {
        format!("validate:{}", self.name.type_url())
    }
}

/// The validation body for one message: declares the violations accumulator,
/// then one guarded check per rule.
pub fn validation_code(
    validation: &MessageValidation,
    types: &TypeSystem,
) -> Result<CodeBlock, Error> {
    let ctx = GenerationContext {
        message: MessageReference::new(RESULT),
        type_system: types,
        declaring_type: &validation.name,
        violations: VIOLATIONS,
    };
    let mut builder = CodeBlock::builder().add_statement(format!(
        "{list}.Builder<{violation}> {VIOLATIONS} = {list}.builder()",
        list = IMMUTABLE_LIST_CLASS,
        violation = CONSTRAINT_VIOLATION_CLASS,
    ));
    for rule in &validation.rules {
        builder = builder.add(code_for(rule, &ctx)?);
    }
    Ok(builder.build())
}
