//! Checked AST to BigQuery SQL renderer
//!
//! A single recursive pass over the tree. Each node renders to a [`Fragment`]
//! that remembers the precedence of the SQL it produced, and a parent wraps
//! an operand in parentheses only when that precedence is lower than the
//! operand's position requires.

use crate::dialect::{escape_like, quote_identifier, quote_string};
use crate::duration::{decompose, delta_nanos, parse_duration, whole_days, Interval, IntervalUnit};
use crate::functions::{self, CastType, DatePart, Mapping, SqlFunction};
use crate::literal::format_literal;
use cel2sql_ast::{
    Call, CheckedExpr, Comprehension, ExprKind, Literal, Operator, Precedence, Select, StructExpr,
    Type,
};
use cel2sql_diagnostics::{ConvertError, Result};
use cel2sql_schema::SchemaRegistry;

/// Rendered SQL with the precedence of its outermost construct
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fragment {
    sql: String,
    precedence: Precedence,
}

impl Fragment {
    fn new(sql: impl Into<String>, precedence: Precedence) -> Self {
        Self {
            sql: sql.into(),
            precedence,
        }
    }

    fn primary(sql: impl Into<String>) -> Self {
        Self::new(sql, Precedence::Primary)
    }

    /// Parenthesize unless the fragment binds at least as tightly as `min`
    fn wrap_below(self, min: Precedence) -> String {
        if self.precedence < min {
            format!("({})", self.sql)
        } else {
            self.sql
        }
    }
}

/// Renders checked CEL expressions as BigQuery boolean expressions
///
/// Names are resolved through the registry; the renderer itself only holds
/// the comprehension variables currently in scope.
#[derive(Debug)]
pub struct SqlRenderer<'a> {
    registry: &'a SchemaRegistry,
    /// Comprehension variables in scope, innermost last
    scopes: Vec<String>,
}

impl<'a> SqlRenderer<'a> {
    /// Create a renderer resolving names through `registry`
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            scopes: Vec::new(),
        }
    }

    /// Render `expr` as a single SQL expression
    pub fn render(&mut self, expr: &CheckedExpr) -> Result<String> {
        self.scopes.clear();
        self.visit(expr).map(|fragment| fragment.sql)
    }

    fn visit(&mut self, expr: &CheckedExpr) -> Result<Fragment> {
        let fragment = match &expr.kind {
            ExprKind::Literal(value) => self.render_literal(value, &expr.ty),
            ExprKind::Ident(name) => Ok(self.render_ident(name)),
            ExprKind::Select(select) => self.render_select(select),
            ExprKind::Call(call) => self.render_call(call),
            ExprKind::List(elements) => self.render_list(elements),
            ExprKind::Struct(structure) => self.render_struct(structure),
            ExprKind::Map(_) => Err(ConvertError::unsupported_kind(expr.kind.name())),
            ExprKind::Comprehension(comprehension) => self.render_comprehension(comprehension),
        };
        fragment.map_err(|e| e.at(expr.id))
    }

    /// Render `expr` for a position requiring at least `min`
    fn operand(&mut self, expr: &CheckedExpr, min: Precedence) -> Result<String> {
        Ok(self.visit(expr)?.wrap_below(min))
    }

    /// Render expressions used as function arguments, which never need wrapping
    fn render_args<'e>(
        &mut self,
        exprs: impl IntoIterator<Item = &'e CheckedExpr>,
    ) -> Result<Vec<String>> {
        exprs
            .into_iter()
            .map(|e| self.visit(e).map(|f| f.sql))
            .collect()
    }

    fn in_scope(&self, name: &str) -> bool {
        self.scopes.iter().any(|s| s == name)
    }

    // ========================================================================
    // Leaves
    // ========================================================================

    fn render_literal(&self, value: &Literal, ty: &Type) -> Result<Fragment> {
        let sql = format_literal(value, ty)?;
        let precedence = if sql.starts_with('-') {
            Precedence::Unary
        } else {
            Precedence::Primary
        };
        Ok(Fragment::new(sql, precedence))
    }

    fn render_ident(&self, name: &str) -> Fragment {
        if self.in_scope(name) {
            return Fragment::primary(quote_identifier(name));
        }
        Fragment::primary(quote_identifier(self.registry.table_name_for(name)))
    }

    fn render_select(&mut self, select: &Select) -> Result<Fragment> {
        let operand = &select.operand;
        let column_sql = match &operand.kind {
            ExprKind::Ident(name) if !self.in_scope(name) => format!(
                "{}.{}",
                quote_identifier(self.registry.table_name_for(name)),
                quote_identifier(self.registry.column_name_for(name, &select.field))
            ),
            _ => {
                let base = self.operand(operand, Precedence::Primary)?;
                let column = match operand.ty.object_name() {
                    Some(path) => self.registry.nested_column_name(path, &select.field),
                    None => select.field.as_str(),
                };
                format!("{}.{}", base, quote_identifier(column))
            }
        };

        if !select.test_only {
            return Ok(Fragment::primary(column_sql));
        }

        if self.is_repeated(&operand.ty, &select.field) {
            Ok(Fragment::new(
                format!("ARRAY_LENGTH({}) > 0", column_sql),
                Precedence::Relation,
            ))
        } else {
            Ok(Fragment::new(
                format!("{} IS NOT NULL", column_sql),
                Precedence::Relation,
            ))
        }
    }

    /// Check if `field` of the record typed `ty` is a repeated field
    fn is_repeated(&self, ty: &Type, field: &str) -> bool {
        ty.object_name()
            .and_then(|path| self.registry.resolve_type(path))
            .and_then(|fields| SchemaRegistry::resolve_field(fields, field))
            .is_some_and(|f| f.repeated)
    }

    // ========================================================================
    // Calls
    // ========================================================================

    fn render_call(&mut self, call: &Call) -> Result<Fragment> {
        match functions::lookup(&call.function) {
            Some(Mapping::Operator(op)) => self.render_operator(op, call),
            Some(Mapping::Function(function)) => self.render_function(function, call),
            None => Err(ConvertError::unsupported(&call.function)),
        }
    }

    fn render_operator(&mut self, op: Operator, call: &Call) -> Result<Fragment> {
        match op {
            Operator::LogicalNot => {
                let [x] = operands(call)?;
                let x = self.operand(x, Precedence::Unary)?;
                // BigQuery ranks NOT below the comparison operators
                Ok(Fragment::new(format!("NOT {}", x), Precedence::And))
            }
            Operator::Negate => {
                let [x] = operands(call)?;
                let x = self.visit(x)?;
                let x = if x.sql.starts_with('-') {
                    format!("({})", x.sql)
                } else {
                    x.wrap_below(Precedence::Unary)
                };
                Ok(Fragment::new(format!("-{}", x), Precedence::Unary))
            }
            Operator::Conditional => {
                let [cond, then, otherwise] = operands(call)?;
                let args = self.render_args([cond, then, otherwise])?;
                Ok(Fragment::primary(call_sql("IF", &args)))
            }
            Operator::Equals | Operator::NotEquals => {
                let [left, right] = operands(call)?;
                let other = if right.is_null_literal() {
                    Some(left)
                } else if left.is_null_literal() {
                    Some(right)
                } else {
                    None
                };
                match other {
                    Some(other) => {
                        let other = self.operand(other, Precedence::Relation.next())?;
                        let test = if op == Operator::Equals { "IS NULL" } else { "IS NOT NULL" };
                        Ok(Fragment::new(
                            format!("{} {}", other, test),
                            Precedence::Relation,
                        ))
                    }
                    None => self.render_infix(op, left, right),
                }
            }
            Operator::Add | Operator::Subtract => {
                let [left, right] = operands(call)?;
                if let Some(fragment) = self.render_temporal_arithmetic(op, left, right)? {
                    return Ok(fragment);
                }
                if op == Operator::Add {
                    if left.ty.is_string() || left.ty.is_bytes() {
                        return self.render_infix_as(op, "||", left, right);
                    }
                    if left.ty.is_list() {
                        let args = self.render_args([left, right])?;
                        return Ok(Fragment::primary(call_sql("ARRAY_CONCAT", &args)));
                    }
                }
                self.render_infix(op, left, right)
            }
            Operator::Divide => {
                let [left, right] = operands(call)?;
                if left.ty.is_integer() && right.ty.is_integer() {
                    let args = self.render_args([left, right])?;
                    return Ok(Fragment::primary(call_sql("DIV", &args)));
                }
                self.render_infix(op, left, right)
            }
            Operator::Modulo => {
                let [left, right] = operands(call)?;
                let args = self.render_args([left, right])?;
                Ok(Fragment::primary(call_sql("MOD", &args)))
            }
            Operator::In => {
                let [element, collection] = operands(call)?;
                self.render_membership(element, collection)
            }
            Operator::Index => {
                let [collection, index] = operands(call)?;
                if !collection.ty.is_list() {
                    return Err(ConvertError::unsupported(format!(
                        "{} on {}",
                        op.name(),
                        collection.ty
                    )));
                }
                let collection = self.operand(collection, Precedence::Primary)?;
                let index = self.visit(index)?.sql;
                Ok(Fragment::primary(format!("{}[OFFSET({})]", collection, index)))
            }
            Operator::LogicalOr
            | Operator::LogicalAnd
            | Operator::Less
            | Operator::LessEquals
            | Operator::Greater
            | Operator::GreaterEquals
            | Operator::Multiply => {
                let [left, right] = operands(call)?;
                self.render_infix(op, left, right)
            }
        }
    }

    fn render_infix(
        &mut self,
        op: Operator,
        left: &CheckedExpr,
        right: &CheckedExpr,
    ) -> Result<Fragment> {
        let symbol = functions::infix_symbol(op)
            .ok_or_else(|| ConvertError::unsupported(op.name()))?;
        self.render_infix_as(op, symbol, left, right)
    }

    fn render_infix_as(
        &mut self,
        op: Operator,
        symbol: &str,
        left: &CheckedExpr,
        right: &CheckedExpr,
    ) -> Result<Fragment> {
        let level = op.precedence();
        let (left_min, right_min) = if op.is_comparison() {
            (level.next(), level.next())
        } else if op.is_associative() {
            (level, level)
        } else {
            (level, level.next())
        };

        let left = self.operand(left, left_min)?;
        let right = self.operand(right, right_min)?;
        Ok(Fragment::new(format!("{} {} {}", left, symbol, right), level))
    }

    /// `ts +/- duration` and `duration + ts`; `None` when no operand is temporal
    fn render_temporal_arithmetic(
        &mut self,
        op: Operator,
        left: &CheckedExpr,
        right: &CheckedExpr,
    ) -> Result<Option<Fragment>> {
        let (temporal, duration) = match (&left.ty, &right.ty) {
            (l, Type::Duration) if l.is_temporal() => (left, right),
            (Type::Duration, r) if r.is_temporal() && op == Operator::Add => (right, left),
            (l, r)
                if l.is_temporal()
                    || r.is_temporal()
                    || *l == Type::Duration
                    || *r == Type::Duration =>
            {
                return Err(ConvertError::unsupported(format!(
                    "{} on {} and {}",
                    op.name(),
                    l,
                    r
                )));
            }
            _ => return Ok(None),
        };

        let function = functions::temporal_arithmetic(&temporal.ty, op == Operator::Subtract)
            .ok_or_else(|| ConvertError::unsupported(op.name()))?;
        let interval = constant_interval(duration, &temporal.ty)?;
        let base = self.visit(temporal)?.sql;
        Ok(Some(Fragment::primary(format!(
            "{}({}, {})",
            function, base, interval
        ))))
    }

    fn render_membership(
        &mut self,
        element: &CheckedExpr,
        collection: &CheckedExpr,
    ) -> Result<Fragment> {
        if let ExprKind::List(items) = &collection.kind {
            if items.is_empty() {
                return Ok(Fragment::primary("FALSE"));
            }
            let element = self.operand(element, Precedence::Relation.next())?;
            let items = self.render_args(items)?;
            return Ok(Fragment::new(
                format!("{} IN ({})", element, items.join(", ")),
                Precedence::Relation,
            ));
        }

        if !collection.ty.is_list() {
            return Err(ConvertError::unsupported(format!(
                "{} on {}",
                Operator::In.name(),
                collection.ty
            )));
        }
        let element = self.operand(element, Precedence::Relation.next())?;
        let collection = self.visit(collection)?.sql;
        Ok(Fragment::new(
            format!("{} IN UNNEST({})", element, collection),
            Precedence::Relation,
        ))
    }

    fn render_function(&mut self, function: SqlFunction, call: &Call) -> Result<Fragment> {
        match function {
            SqlFunction::Contains | SqlFunction::StartsWith | SqlFunction::EndsWith => {
                let [subject, pattern] = operands(call)?;
                self.render_string_match(function, subject, pattern)
            }
            SqlFunction::Matches => {
                let [subject, pattern] = operands(call)?;
                let args = self.render_args([subject, pattern])?;
                Ok(Fragment::primary(call_sql("REGEXP_CONTAINS", &args)))
            }
            SqlFunction::Size => {
                let [x] = operands(call)?;
                let name = if x.ty.is_string() || x.ty.is_bytes() {
                    "LENGTH"
                } else if x.ty.is_list() {
                    "ARRAY_LENGTH"
                } else {
                    return Err(ConvertError::unsupported(format!("size on {}", x.ty)));
                };
                let args = self.render_args([x])?;
                Ok(Fragment::primary(call_sql(name, &args)))
            }
            SqlFunction::Duration => {
                let [x] = operands(call)?;
                let (nanos, start) = duration_string(x)?.ok_or_else(|| {
                    ConvertError::unsupported("duration with a non-constant argument")
                })?;
                Ok(Fragment::primary(decompose(nanos, start)?.to_string()))
            }
            SqlFunction::Timestamp => {
                let [x] = operands(call)?;
                let name = match &x.ty {
                    Type::Timestamp => return self.visit(x),
                    Type::String => "TIMESTAMP",
                    Type::Int => "TIMESTAMP_SECONDS",
                    other => {
                        return Err(ConvertError::unsupported(format!("timestamp on {}", other)));
                    }
                };
                let args = self.render_args([x])?;
                Ok(Fragment::primary(call_sql(name, &args)))
            }
            SqlFunction::Date | SqlFunction::Time | SqlFunction::DateTime => {
                let name = match function {
                    SqlFunction::Date => "DATE",
                    SqlFunction::Time => "TIME",
                    _ => "DATETIME",
                };
                let args = self.render_args(call.operands())?;
                if args.is_empty() {
                    return Err(ConvertError::unsupported(format!(
                        "{} without arguments",
                        call.function
                    )));
                }
                Ok(Fragment::primary(call_sql(name, &args)))
            }
            SqlFunction::Current(value) => {
                let args = self.render_args(call.operands())?;
                match args.len() {
                    0 => {}
                    1 if value.accepts_timezone() => {}
                    n => {
                        return Err(ConvertError::unsupported(format!(
                            "{} with {} arguments",
                            call.function, n
                        )));
                    }
                }
                Ok(Fragment::primary(call_sql(value.sql_function(), &args)))
            }
            SqlFunction::Cast(cast) => {
                let [x] = operands(call)?;
                if cast == CastType::Int64 && x.ty == Type::Timestamp {
                    let args = self.render_args([x])?;
                    return Ok(Fragment::primary(call_sql("UNIX_SECONDS", &args)));
                }
                let truncate = cast == CastType::Int64 && x.ty == Type::Double;
                let x = self.visit(x)?.sql;
                let x = if truncate { format!("TRUNC({})", x) } else { x };
                Ok(Fragment::primary(format!("CAST({} AS {})", x, cast.sql_type())))
            }
            SqlFunction::Extract(part) => self.render_extract(part, call),
        }
    }

    fn render_string_match(
        &mut self,
        function: SqlFunction,
        subject: &CheckedExpr,
        pattern: &CheckedExpr,
    ) -> Result<Fragment> {
        if let Some(Literal::String(text)) = pattern.as_literal() {
            let escaped = escape_like(text);
            let like = match function {
                SqlFunction::Contains => format!("%{}%", escaped),
                SqlFunction::StartsWith => format!("{}%", escaped),
                _ => format!("%{}", escaped),
            };
            let subject = self.operand(subject, Precedence::Relation.next())?;
            return Ok(Fragment::new(
                format!("{} LIKE {}", subject, quote_string(&like)),
                Precedence::Relation,
            ));
        }

        let args = self.render_args([subject, pattern])?;
        let fragment = match function {
            SqlFunction::Contains => Fragment::new(
                format!("{} > 0", call_sql("STRPOS", &args)),
                Precedence::Relation,
            ),
            SqlFunction::StartsWith => Fragment::primary(call_sql("STARTS_WITH", &args)),
            _ => Fragment::primary(call_sql("ENDS_WITH", &args)),
        };
        Ok(fragment)
    }

    fn render_extract(&mut self, part: DatePart, call: &Call) -> Result<Fragment> {
        let operands: Vec<&CheckedExpr> = call.operands().collect();
        let (value, timezone) = match operands.as_slice() {
            [value] => (*value, None),
            [value, timezone] => (*value, Some(*timezone)),
            _ => {
                return Err(ConvertError::unsupported(format!(
                    "{} with {} operands",
                    call.function,
                    operands.len()
                )));
            }
        };

        let mut source = self.visit(value)?.sql;
        if let Some(timezone) = timezone {
            if value.ty != Type::Timestamp {
                return Err(ConvertError::unsupported(format!(
                    "{} with a timezone on {}",
                    call.function, value.ty
                )));
            }
            let timezone = self.visit(timezone)?.sql;
            source = format!("{} AT TIME ZONE {}", source, timezone);
        }

        let sql = format!("EXTRACT({} FROM {})", part.keyword(), source);
        if part.zero_based() {
            Ok(Fragment::new(format!("{} - 1", sql), Precedence::Additive))
        } else {
            Ok(Fragment::primary(sql))
        }
    }

    // ========================================================================
    // Constructions
    // ========================================================================

    fn render_list(&mut self, elements: &[CheckedExpr]) -> Result<Fragment> {
        let elements = self.render_args(elements)?;
        Ok(Fragment::primary(format!("[{}]", elements.join(", "))))
    }

    fn render_struct(&mut self, structure: &StructExpr) -> Result<Fragment> {
        let fields = structure
            .fields
            .iter()
            .map(|field| {
                let value = self.visit(&field.value)?.sql;
                Ok(format!("{} AS {}", value, quote_identifier(&field.name)))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Fragment::primary(format!("STRUCT({})", fields.join(", "))))
    }

    fn render_comprehension(&mut self, comprehension: &Comprehension) -> Result<Fragment> {
        let name = comprehension.macro_name.as_str();
        if !matches!(name, "exists" | "all" | "exists_one") {
            return Err(ConvertError::unsupported_macro(name));
        }
        if matches!(comprehension.range.ty, Type::Map(..)) {
            return Err(ConvertError::unsupported_macro(format!(
                "{} over {}",
                name, comprehension.range.ty
            )));
        }

        let range = self.visit(&comprehension.range)?.sql;
        log::trace!(
            "entering {} scope for '{}'",
            name,
            comprehension.iter_var
        );
        self.scopes.push(comprehension.iter_var.clone());
        let predicate = self.visit(&comprehension.predicate);
        self.scopes.pop();
        let predicate = predicate?.sql;

        let source = format!(
            "FROM UNNEST({}) AS {}",
            range,
            quote_identifier(&comprehension.iter_var)
        );
        let fragment = match name {
            "exists" => Fragment::primary(format!("EXISTS (SELECT * {} WHERE {})", source, predicate)),
            "all" => Fragment::new(
                format!("NOT EXISTS (SELECT * {} WHERE NOT ({}))", source, predicate),
                Precedence::And,
            ),
            _ => Fragment::new(
                format!("(SELECT COUNT(*) {} WHERE {}) = 1", source, predicate),
                Precedence::Relation,
            ),
        };
        Ok(fragment)
    }
}

/// Operands of a call (receiver first) as a fixed-size array
fn operands<const N: usize>(call: &Call) -> Result<[&CheckedExpr; N]> {
    let operands: Vec<&CheckedExpr> = call.operands().collect();
    let count = operands.len();
    operands.try_into().map_err(|_| {
        ConvertError::unsupported(format!("{} with {} operands", call.function, count))
    })
}

/// Constant interval for a duration operand added to a `target` value
fn constant_interval(duration: &CheckedExpr, target: &Type) -> Result<Interval> {
    let constant = constant_duration(duration).map_err(|e| e.at(duration.id))?;
    let Some((nanos, start)) = constant else {
        return Err(
            ConvertError::unsupported("date/time arithmetic with a non-constant duration")
                .at(duration.id),
        );
    };

    // TIME_ADD/TIME_SUB accept units up to HOUR
    let interval = match target {
        Type::Date => whole_days(nanos),
        Type::Time => decompose(nanos, start.min(IntervalUnit::Hour)),
        _ => decompose(nanos, start),
    };
    interval.map_err(|e| e.at(duration.id))
}

/// Total nanoseconds and decomposition start of a constant duration
///
/// Recognizes duration literals and `duration("...")` calls; anything else is
/// `None`.
fn constant_duration(expr: &CheckedExpr) -> Result<Option<(i128, IntervalUnit)>> {
    match &expr.kind {
        ExprKind::Literal(Literal::Duration(delta)) => {
            Ok(Some((delta_nanos(*delta), IntervalUnit::Hour)))
        }
        ExprKind::Call(call) if call.function == "duration" && call.target.is_none() => {
            match call.args.as_slice() {
                [arg] => duration_string(arg),
                _ => Ok(None),
            }
        }
        _ => Ok(None),
    }
}

fn duration_string(expr: &CheckedExpr) -> Result<Option<(i128, IntervalUnit)>> {
    match expr.as_literal() {
        Some(Literal::String(text)) => {
            let parsed = parse_duration(text)?;
            let start = parsed.coarsest.unwrap_or(IntervalUnit::Second);
            Ok(Some((parsed.nanos, start)))
        }
        _ => Ok(None),
    }
}

fn call_sql(name: &str, args: &[String]) -> String {
    format!("{}({})", name, args.join(", "))
}
