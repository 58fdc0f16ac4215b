//! cel2sql diagnostics and error handling
//!
//! This crate provides the error types shared by the schema registry and the
//! SQL renderer, together with structured error codes.

mod error;
mod error_code;

pub use error::*;
pub use error_code::*;

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConvertError>;
