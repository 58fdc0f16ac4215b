//! Checked expression tree
//!
//! The tree is produced by an external CEL parser and type checker. Every
//! node carries the static type the checker inferred for it; consumers only
//! read it.

use crate::{Literal, Operator, Type};

/// A type-annotated expression node
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedExpr {
    /// Node id assigned by the parser
    pub id: i64,
    /// Node kind and payload
    pub kind: ExprKind,
    /// Inferred static type
    pub ty: Type,
}

/// All expression kinds of a checked CEL tree
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Constant value
    Literal(Literal),
    /// Identifier reference (root variable or comprehension variable)
    Ident(String),
    /// Field selection (`operand.field`, or `has(operand.field)`)
    Select(Select),
    /// Operator or function call
    Call(Call),
    /// List construction (`[a, b]`)
    List(Vec<CheckedExpr>),
    /// Struct construction (`Type{field: value}`)
    Struct(StructExpr),
    /// Map construction (`{k: v}`)
    Map(Vec<MapEntry>),
    /// Expanded macro (`list.exists(x, p)`, ...)
    Comprehension(Box<Comprehension>),
}

impl ExprKind {
    /// Name of the node kind, used in error messages
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::Ident(_) => "ident",
            Self::Select(_) => "select",
            Self::Call(_) => "call",
            Self::List(_) => "list",
            Self::Struct(_) => "struct",
            Self::Map(_) => "map",
            Self::Comprehension(_) => "comprehension",
        }
    }
}

/// Field selection
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    /// Selected-from expression
    pub operand: Box<CheckedExpr>,
    /// Field name
    pub field: String,
    /// Presence test produced by the `has()` macro
    pub test_only: bool,
}

/// Operator or function call
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// Function name; operators use their canonical names (`_&&_`, `@in`)
    pub function: String,
    /// Receiver of a member-style call (`s.startsWith(p)`)
    pub target: Option<Box<CheckedExpr>>,
    /// Ordered arguments
    pub args: Vec<CheckedExpr>,
}

impl Call {
    /// The built-in operator this call invokes, if any
    pub fn operator(&self) -> Option<Operator> {
        Operator::from_name(&self.function)
    }

    /// Receiver followed by the arguments
    pub fn operands(&self) -> impl Iterator<Item = &CheckedExpr> {
        self.target.as_deref().into_iter().chain(self.args.iter())
    }
}

/// Struct construction
#[derive(Debug, Clone, PartialEq)]
pub struct StructExpr {
    /// Message or record type name
    pub type_name: String,
    /// Field initializers in source order
    pub fields: Vec<StructField>,
}

/// One field initializer of a struct construction
#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub name: String,
    pub value: CheckedExpr,
}

/// One entry of a map construction
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    pub key: CheckedExpr,
    pub value: CheckedExpr,
}

/// A macro expanded over a range
///
/// Keeps the macro's surface form (`range.name(iter_var, predicate)`) since
/// the SQL rendering is chosen per macro rather than derived from the fold.
#[derive(Debug, Clone, PartialEq)]
pub struct Comprehension {
    /// Macro name (`all`, `exists`, `exists_one`, `map`, `filter`)
    pub macro_name: String,
    /// Iteration variable bound inside `predicate`
    pub iter_var: String,
    /// Iterated list
    pub range: CheckedExpr,
    /// Predicate or transform evaluated per element
    pub predicate: CheckedExpr,
}

impl CheckedExpr {
    /// Create a node with id 0
    pub fn new(kind: ExprKind, ty: Type) -> Self {
        Self { id: 0, kind, ty }
    }

    /// Set the node id
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// Literal node
    pub fn literal(value: impl Into<Literal>, ty: Type) -> Self {
        Self::new(ExprKind::Literal(value.into()), ty)
    }

    /// `null` literal
    pub fn null() -> Self {
        Self::literal(Literal::Null, Type::Null)
    }

    /// String literal
    pub fn string(value: impl Into<String>) -> Self {
        Self::literal(Literal::String(value.into()), Type::String)
    }

    /// Integer literal
    pub fn int(value: i64) -> Self {
        Self::literal(Literal::Int(value), Type::Int)
    }

    /// Double literal
    pub fn double(value: f64) -> Self {
        Self::literal(Literal::Double(value), Type::Double)
    }

    /// Boolean literal
    pub fn bool(value: bool) -> Self {
        Self::literal(Literal::Bool(value), Type::Bool)
    }

    /// Identifier reference
    pub fn ident(name: impl Into<String>, ty: Type) -> Self {
        Self::new(ExprKind::Ident(name.into()), ty)
    }

    /// Field selection
    pub fn select(operand: CheckedExpr, field: impl Into<String>, ty: Type) -> Self {
        Self::new(
            ExprKind::Select(Select {
                operand: Box::new(operand),
                field: field.into(),
                test_only: false,
            }),
            ty,
        )
    }

    /// `has(operand.field)`
    pub fn has(operand: CheckedExpr, field: impl Into<String>) -> Self {
        Self::new(
            ExprKind::Select(Select {
                operand: Box::new(operand),
                field: field.into(),
                test_only: true,
            }),
            Type::Bool,
        )
    }

    /// Global function or operator call
    pub fn call(function: impl Into<String>, args: Vec<CheckedExpr>, ty: Type) -> Self {
        Self::new(
            ExprKind::Call(Call {
                function: function.into(),
                target: None,
                args,
            }),
            ty,
        )
    }

    /// Member-style call on a receiver
    pub fn member_call(
        target: CheckedExpr,
        function: impl Into<String>,
        args: Vec<CheckedExpr>,
        ty: Type,
    ) -> Self {
        Self::new(
            ExprKind::Call(Call {
                function: function.into(),
                target: Some(Box::new(target)),
                args,
            }),
            ty,
        )
    }

    /// Built-in operator application
    pub fn op(op: Operator, args: Vec<CheckedExpr>, ty: Type) -> Self {
        Self::call(op.name(), args, ty)
    }

    /// Binary operator application
    pub fn binary(op: Operator, left: CheckedExpr, right: CheckedExpr, ty: Type) -> Self {
        Self::op(op, vec![left, right], ty)
    }

    /// Unary operator application
    pub fn unary(op: Operator, operand: CheckedExpr, ty: Type) -> Self {
        Self::op(op, vec![operand], ty)
    }

    /// List construction
    pub fn list(elements: Vec<CheckedExpr>, element_type: Type) -> Self {
        Self::new(ExprKind::List(elements), Type::list(element_type))
    }

    /// Struct construction
    pub fn structure(type_name: impl Into<String>, fields: Vec<(String, CheckedExpr)>) -> Self {
        let type_name = type_name.into();
        let ty = Type::object(type_name.clone());
        Self::new(
            ExprKind::Struct(StructExpr {
                type_name,
                fields: fields
                    .into_iter()
                    .map(|(name, value)| StructField { name, value })
                    .collect(),
            }),
            ty,
        )
    }

    /// Expanded macro over `range`
    pub fn comprehension(
        macro_name: impl Into<String>,
        range: CheckedExpr,
        iter_var: impl Into<String>,
        predicate: CheckedExpr,
        ty: Type,
    ) -> Self {
        Self::new(
            ExprKind::Comprehension(Box::new(Comprehension {
                macro_name: macro_name.into(),
                iter_var: iter_var.into(),
                range,
                predicate,
            })),
            ty,
        )
    }

    /// Literal payload, if this node is a literal
    pub fn as_literal(&self) -> Option<&Literal> {
        match &self.kind {
            ExprKind::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Call payload, if this node is a call
    pub fn as_call(&self) -> Option<&Call> {
        match &self.kind {
            ExprKind::Call(call) => Some(call),
            _ => None,
        }
    }

    /// Check if this node is the `null` literal
    pub fn is_null_literal(&self) -> bool {
        matches!(self.as_literal(), Some(Literal::Null))
    }
}
