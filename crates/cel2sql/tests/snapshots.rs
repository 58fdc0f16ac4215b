//! Snapshot tests for converted conditions and error messages

mod common;

use cel2sql::ast::{CheckedExpr, Operator, Type};
use cel2sql::convert;
use common::*;
use insta::assert_snapshot;

fn sql(expr: &CheckedExpr) -> String {
    convert(expr, &registry()).unwrap()
}

fn error(expr: &CheckedExpr) -> String {
    convert(expr, &registry()).unwrap_err().to_string()
}

// === Conditions ===

#[test]
fn snapshot_mixed_logic() {
    // (employee.age >= 30 || "rust" in employee.skills) && !(employee.salary < 1000.0)
    let senior = cmp(
        Operator::GreaterEquals,
        path("employee", &["age"]),
        CheckedExpr::int(30),
    );
    let rustacean = cmp(
        Operator::In,
        CheckedExpr::string("rust"),
        path("employee", &["skills"]),
    );
    let underpaid = cmp(
        Operator::Less,
        path("employee", &["salary"]),
        CheckedExpr::double(1000.0),
    );
    let expr = and(or(senior, rustacean), not(underpaid));

    assert_snapshot!(
        sql(&expr),
        @"(`employee`.`age` >= 30 OR 'rust' IN UNNEST(`employee`.`skills`)) AND NOT (`employee`.`salary` < 1000.0)"
    );
}

#[test]
fn snapshot_exists_and_presence() {
    // employee.skills.exists(s, s.startsWith("ru")) && has(employee.department.location)
    let prefix = CheckedExpr::member_call(
        CheckedExpr::ident("s", Type::String),
        "startsWith",
        vec![CheckedExpr::string("ru")],
        Type::Bool,
    );
    let exists = CheckedExpr::comprehension(
        "exists",
        path("employee", &["skills"]),
        "s",
        prefix,
        Type::Bool,
    );
    let located = CheckedExpr::has(path("employee", &["department"]), "location");

    assert_snapshot!(
        sql(&and(exists, located)),
        @"EXISTS (SELECT * FROM UNNEST(`employee`.`skills`) AS `s` WHERE `s` LIKE 'ru%') AND `employee`.`department`.`location` IS NOT NULL"
    );
}

#[test]
fn snapshot_weekday_membership() {
    // employee.hiredAt.getDayOfWeek() in [0, 6]
    let weekday = CheckedExpr::member_call(
        path("employee", &["hiredAt"]),
        "getDayOfWeek",
        vec![],
        Type::Int,
    );
    let expr = cmp(
        Operator::In,
        weekday,
        CheckedExpr::list(vec![CheckedExpr::int(0), CheckedExpr::int(6)], Type::Int),
    );

    assert_snapshot!(
        sql(&expr),
        @"EXTRACT(DAYOFWEEK FROM `employee`.`hired_at`) - 1 IN (0, 6)"
    );
}

#[test]
fn snapshot_string_concatenation() {
    // employee.department.name + " / " + employee.department.location.city == "R&D / Berlin"
    let label = CheckedExpr::binary(
        Operator::Add,
        CheckedExpr::binary(
            Operator::Add,
            path("employee", &["department", "name"]),
            CheckedExpr::string(" / "),
            Type::String,
        ),
        path("employee", &["department", "location", "city"]),
        Type::String,
    );
    let expr = cmp(Operator::Equals, label, CheckedExpr::string("R&D / Berlin"));

    assert_snapshot!(
        sql(&expr),
        @"`employee`.`department`.`dept_name` || ' / ' || `employee`.`department`.`location`.`city` = 'R&D / Berlin'"
    );
}

// === Errors ===

#[test]
fn snapshot_unsupported_macro() {
    let expr = CheckedExpr::comprehension(
        "map",
        path("employee", &["skills"]),
        "s",
        CheckedExpr::ident("s", Type::String),
        Type::list(Type::String),
    )
    .with_id(3);

    assert_snapshot!(error(&expr), @"C2S0201: unsupported macro 'map' at expr #3");
}

#[test]
fn snapshot_invalid_duration() {
    let cutoff = CheckedExpr::binary(
        Operator::Subtract,
        now(),
        duration("forever").with_id(8),
        Type::Timestamp,
    );
    let expr = cmp(Operator::Greater, path("employee", &["hiredAt"]), cutoff);

    assert_snapshot!(
        error(&expr),
        @r#"C2S0301: cannot render duration: invalid duration "forever" at expr #8"#
    );
}
