//! Convert checked CEL expressions into BigQuery SQL
//!
//! This crate ties together:
//! - The checked expression tree ([`ast`])
//! - The schema registry and checker type provider ([`schema`])
//! - The BigQuery renderer ([`bigquery`])
//! - Error types and codes ([`diagnostics`])
//!
//! # Example
//!
//! ```
//! use cel2sql::ast::{CheckedExpr, Operator, Type};
//! use cel2sql::schema::{FieldSchema, FieldType, Schema, SchemaRegistry};
//!
//! let registry = SchemaRegistry::register([Schema::new("Employee", "employee")
//!     .with_field(FieldSchema::new("name", FieldType::String))])?;
//!
//! // employee.name == "John Doe", as typed by the checker
//! let employee = CheckedExpr::ident("employee", Type::object("Employee"));
//! let name = CheckedExpr::select(employee, "name", Type::String);
//! let expr = CheckedExpr::binary(
//!     Operator::Equals,
//!     name,
//!     CheckedExpr::string("John Doe"),
//!     Type::Bool,
//! );
//!
//! assert_eq!(cel2sql::convert(&expr, &registry)?, "`employee`.`name` = 'John Doe'");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use cel2sql_ast as ast;
pub use cel2sql_bigquery as bigquery;
pub use cel2sql_diagnostics as diagnostics;
pub use cel2sql_schema as schema;

pub use cel2sql_ast::{CheckedExpr, Type};
pub use cel2sql_bigquery::SqlRenderer;
pub use cel2sql_diagnostics::{ConfigError, ConvertError, ErrorCode, Result};
pub use cel2sql_schema::{Declaration, Schema, SchemaRegistry, TypeProvider};

/// Render a checked expression as a BigQuery condition
///
/// Root identifiers and field selects are resolved through `registry`. The
/// result is a single SQL expression without a terminator, suitable for a
/// `WHERE` clause. Nothing is returned on failure: the first unsupported
/// construct or unrenderable value aborts the conversion.
pub fn convert(expr: &CheckedExpr, registry: &SchemaRegistry) -> Result<String> {
    match SqlRenderer::new(registry).render(expr) {
        Ok(sql) => {
            log::trace!("converted expr #{}: {}", expr.id, sql);
            Ok(sql)
        }
        Err(e) => {
            log::debug!("conversion of expr #{} failed: {}", expr.id, e);
            Err(e)
        }
    }
}
