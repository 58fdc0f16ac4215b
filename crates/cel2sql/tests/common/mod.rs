//! Shared fixtures for end-to-end conversion tests

#![allow(dead_code)]

use cel2sql::ast::{CheckedExpr, Operator, Type};
use cel2sql::schema::TypeProvider;
use cel2sql::SchemaRegistry;

/// Employee and Department schemas as they would be loaded from configuration
pub const CONFIG: &str = r#"[
    {
        "objectType": "Employee",
        "variable": "employee",
        "fields": [
            {"name": "name", "type": "string"},
            {"name": "hiredAt", "column": "hired_at", "type": "timestamp"},
            {"name": "age", "type": "integer"},
            {"name": "salary", "type": "float"},
            {"name": "active", "type": "boolean"},
            {"name": "skills", "type": "string", "repeated": true},
            {"name": "department", "type": "record", "fields": [
                {"name": "name", "column": "dept_name", "type": "string"},
                {"name": "location", "type": "record", "fields": [
                    {"name": "city", "type": "string"}
                ]}
            ]}
        ]
    },
    {
        "objectType": "Office",
        "table": "offices_v2",
        "variable": "office",
        "fields": [
            {"name": "openedOn", "column": "opened_on", "type": "date"},
            {"name": "seats", "type": "integer"}
        ]
    }
]"#;

pub fn registry() -> SchemaRegistry {
    SchemaRegistry::from_json(CONFIG).expect("fixture config is valid")
}

/// Root identifier typed with its registered object type
pub fn root(variable: &str) -> CheckedExpr {
    let registry = registry();
    let schema = registry
        .schema_for_variable(variable)
        .unwrap_or_else(|| panic!("{} is not declared", variable));
    CheckedExpr::ident(variable, Type::object(schema.object_type.clone()))
}

/// `variable.<segments...>` with checker-assigned types
pub fn path(variable: &str, segments: &[&str]) -> CheckedExpr {
    let registry = registry();
    let mut expr = root(variable);
    for segment in segments {
        let type_path = expr.ty.object_name().expect("select on a record").to_string();
        let ty = registry
            .find_field_type(&type_path, segment)
            .unwrap_or_else(|| panic!("{}.{} is not declared", type_path, segment));
        expr = CheckedExpr::select(expr, *segment, ty);
    }
    expr
}

pub fn cmp(op: Operator, left: CheckedExpr, right: CheckedExpr) -> CheckedExpr {
    CheckedExpr::binary(op, left, right, Type::Bool)
}

pub fn and(left: CheckedExpr, right: CheckedExpr) -> CheckedExpr {
    cmp(Operator::LogicalAnd, left, right)
}

pub fn or(left: CheckedExpr, right: CheckedExpr) -> CheckedExpr {
    cmp(Operator::LogicalOr, left, right)
}

pub fn not(operand: CheckedExpr) -> CheckedExpr {
    CheckedExpr::unary(Operator::LogicalNot, operand, Type::Bool)
}

pub fn now() -> CheckedExpr {
    CheckedExpr::call("current_timestamp", vec![], Type::Timestamp)
}

pub fn duration(text: &str) -> CheckedExpr {
    CheckedExpr::call("duration", vec![CheckedExpr::string(text)], Type::Duration)
}

/// `employee.name == "John Doe" && employee.hiredAt >= current_timestamp() - duration("24h")`
pub fn recent_john_doe() -> CheckedExpr {
    let name = cmp(
        Operator::Equals,
        path("employee", &["name"]),
        CheckedExpr::string("John Doe"),
    );
    let cutoff = CheckedExpr::binary(Operator::Subtract, now(), duration("24h"), Type::Timestamp);
    let hired = cmp(Operator::GreaterEquals, path("employee", &["hiredAt"]), cutoff);
    and(name, hired)
}
