//! BigQuery dialect for cel2sql
//!
//! This crate provides:
//! - Identifier quoting and literal escaping ([`dialect`])
//! - Literal formatting by static type ([`literal`])
//! - Duration decomposition into `INTERVAL` units ([`duration`])
//! - The closed CEL function mapping table ([`functions`])
//! - The [`SqlRenderer`] turning a checked AST into a SQL expression

pub mod dialect;
pub mod duration;
pub mod functions;
pub mod literal;
pub mod renderer;

pub use dialect::{escape_like, quote_bytes, quote_identifier, quote_string};
pub use duration::{Interval, IntervalUnit, interval_from_str};
pub use functions::{Mapping, SqlFunction, lookup};
pub use literal::format_literal;
pub use renderer::SqlRenderer;
