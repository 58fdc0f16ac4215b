//! Shared fixtures for renderer tests
//!
//! Select nodes get their static types from the registry's `TypeProvider`
//! implementation, the same way a checker would assign them.

#![allow(dead_code)]

use cel2sql_ast::{CheckedExpr, Operator, Type};
use cel2sql_bigquery::SqlRenderer;
use cel2sql_diagnostics::ConvertError;
use cel2sql_schema::{FieldSchema, FieldType, Schema, SchemaRegistry, TypeProvider};

/// `Employee` bound to `employee`, covering every field type
pub fn registry() -> SchemaRegistry {
    let employee = Schema::new("Employee", "employee").with_fields([
        FieldSchema::new("name", FieldType::String),
        FieldSchema::new("age", FieldType::Integer),
        FieldSchema::new("salary", FieldType::Float),
        FieldSchema::new("active", FieldType::Boolean),
        FieldSchema::new("avatar", FieldType::Bytes),
        FieldSchema::new("hiredAt", FieldType::Timestamp).with_column("hired_at"),
        FieldSchema::new("startDate", FieldType::Date).with_column("start_date"),
        FieldSchema::new("shiftStart", FieldType::Time),
        FieldSchema::new("lastLogin", FieldType::DateTime),
        FieldSchema::new("skills", FieldType::String).repeated(),
        FieldSchema::new("scores", FieldType::Integer).repeated(),
        FieldSchema::record(
            "address",
            vec![
                FieldSchema::new("city", FieldType::String),
                FieldSchema::new("zip", FieldType::String).with_column("postal_code"),
                FieldSchema::record("geo", vec![FieldSchema::new("lat", FieldType::Float)]),
            ],
        ),
        FieldSchema::record(
            "projects",
            vec![
                FieldSchema::new("title", FieldType::String),
                FieldSchema::new("budget", FieldType::Float),
            ],
        )
        .repeated(),
    ]);
    SchemaRegistry::register([employee]).expect("fixture schema is valid")
}

pub fn render(expr: &CheckedExpr) -> String {
    let registry = registry();
    SqlRenderer::new(&registry)
        .render(expr)
        .unwrap_or_else(|e| panic!("Failed to render {:?}: {}", expr, e))
}

pub fn render_err(expr: &CheckedExpr) -> ConvertError {
    let registry = registry();
    match SqlRenderer::new(&registry).render(expr) {
        Ok(sql) => panic!("Expected an error, got: {}", sql),
        Err(e) => e,
    }
}

pub fn employee() -> CheckedExpr {
    CheckedExpr::ident("employee", Type::object("Employee"))
}

/// `employee.<segments...>` with checker-assigned types
pub fn path(segments: &[&str]) -> CheckedExpr {
    let registry = registry();
    let mut expr = employee();
    for segment in segments {
        expr = select(&registry, expr, segment);
    }
    expr
}

/// `base.field`, typed through the registry
pub fn select(registry: &SchemaRegistry, base: CheckedExpr, field: &str) -> CheckedExpr {
    let type_path = base
        .ty
        .object_name()
        .unwrap_or_else(|| panic!("{} is not a record", base.ty))
        .to_string();
    let ty = registry
        .find_field_type(&type_path, field)
        .unwrap_or_else(|| panic!("{}.{} is not declared", type_path, field));
    CheckedExpr::select(base, field, ty)
}

/// Comparison or logical operator, typed `bool`
pub fn cmp(op: Operator, left: CheckedExpr, right: CheckedExpr) -> CheckedExpr {
    CheckedExpr::binary(op, left, right, Type::Bool)
}

/// Arithmetic operator, typed like its left operand
pub fn arith(op: Operator, left: CheckedExpr, right: CheckedExpr) -> CheckedExpr {
    let ty = left.ty.clone();
    CheckedExpr::binary(op, left, right, ty)
}

pub fn method(target: CheckedExpr, name: &str, args: Vec<CheckedExpr>, ty: Type) -> CheckedExpr {
    CheckedExpr::member_call(target, name, args, ty)
}

/// `duration("<text>")`
pub fn duration(text: &str) -> CheckedExpr {
    CheckedExpr::call("duration", vec![CheckedExpr::string(text)], Type::Duration)
}
