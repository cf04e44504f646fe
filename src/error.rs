//! Errors surfaced while compiling validation rules to Java code.
//!
//! Every variant is fatal for the generation run it occurs in: the inputs are
//! build-time artifacts, so a failure here means the upstream rule producer or
//! the type registry is misconfigured, never that runtime data is bad.

use thiserror::Error;

use crate::ast::PrimitiveType;
use crate::rule::Sign;

#[derive(Error, Debug)]
pub enum Error {
    /// A type URL had no registered Java class name.
    #[error("unknown {label}: `{key}`")]
    UnknownType { label: String, key: String },

    /// An ordering comparison was requested for a message or enum field,
    /// which only supports equality checks.
    #[error("comparison `{sign}` is not supported for message or enum fields")]
    UnsupportedComparison { sign: Sign },

    /// `(required)` was requested for a field type that has no usable
    /// not-set sentinel (numbers and booleans).
    #[error("fields of type `{0}` do not support `(required)` validation")]
    UnsupportedRequired(PrimitiveType),
}
