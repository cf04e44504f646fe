//! Compiles Protobuf validation rules into Java code.
//!
//! The pipeline: descriptor and rule metadata (JSON) feed a [`TypeSystem`]
//! and a [`Rule`] tree; the rule-to-code compiler in [`generate`] builds
//! boolean conditions out of the [`expr`] expression model and wraps them in
//! `if` blocks that record `ConstraintViolation`s. [`render`] assembles the
//! per-message validation body the surrounding build step embeds in
//! `Message.Builder.build()`.
//!
//! Everything is synchronous and immutable after construction; a single
//! [`TypeSystem`] may back any number of generation calls.
//!
//! [`TypeSystem`]: type_system::TypeSystem
//! [`Rule`]: rule::Rule

pub mod ast;
pub mod cli;
pub mod code;
pub mod error;
pub mod error_message;
pub mod expr;
pub mod generate;
pub mod render;
pub mod rule;
pub mod type_system;
pub mod value;

pub use error::Error;
