//! Schema registry for cel2sql
//!
//! This crate provides:
//! - Schema configuration types for record types, fields and SQL names
//! - The [`SchemaRegistry`] resolving type paths, tables and columns
//! - The [`TypeProvider`] trait feeding record types to a CEL checker

pub mod provider;
pub mod registry;
pub mod schema;

pub use provider::*;
pub use registry::*;
pub use schema::*;
