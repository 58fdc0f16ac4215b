//! Checked CEL expression tree
//!
//! This crate defines the type-annotated AST that the SQL renderer consumes,
//! together with literal values, static types and operator precedence. The
//! tree mirrors what a CEL type checker emits; parsing and checking live
//! outside this workspace.

mod expression;
mod literal;
mod operator;
mod types;

pub use expression::*;
pub use literal::*;
pub use operator::*;
pub use types::*;
