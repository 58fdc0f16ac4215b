//! CEL operators with precedence information

use serde::{Deserialize, Serialize};
use std::fmt;

/// Precedence levels of CEL (higher binds tighter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Precedence {
    /// `_?_:_`
    Conditional = 1,
    /// `_||_`
    Or = 2,
    /// `_&&_`
    And = 3,
    /// `==`, `!=`, `<`, `<=`, `>`, `>=`, `in`
    Relation = 4,
    /// `+`, `-`
    Additive = 5,
    /// `*`, `/`, `%`
    Multiplicative = 6,
    /// `!`, unary `-`
    Unary = 7,
    /// Member access, calls, indexing, literals
    Primary = 8,
}

impl Precedence {
    /// The next tighter level, saturating at `Primary`
    pub const fn next(self) -> Self {
        match self {
            Self::Conditional => Self::Or,
            Self::Or => Self::And,
            Self::And => Self::Relation,
            Self::Relation => Self::Additive,
            Self::Additive => Self::Multiplicative,
            Self::Multiplicative => Self::Unary,
            Self::Unary | Self::Primary => Self::Primary,
        }
    }
}

/// Built-in CEL operators, identified in checked ASTs by their function names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    // Precedence 1 (lowest)
    /// Ternary conditional (`c ? a : b`)
    Conditional,

    // Precedence 2
    /// Logical or
    LogicalOr,

    // Precedence 3
    /// Logical and
    LogicalAnd,

    // Precedence 4
    /// Equality
    Equals,
    /// Inequality
    NotEquals,
    /// Less than
    Less,
    /// Less than or equal
    LessEquals,
    /// Greater than
    Greater,
    /// Greater than or equal
    GreaterEquals,
    /// Membership test (`x in list`)
    In,

    // Precedence 5
    /// Addition (also string/bytes/list concatenation)
    Add,
    /// Subtraction
    Subtract,

    // Precedence 6
    /// Multiplication
    Multiply,
    /// Division
    Divide,
    /// Modulo
    Modulo,

    // Precedence 7
    /// Logical not
    LogicalNot,
    /// Arithmetic negation
    Negate,

    // Precedence 8
    /// Index access (`list[i]`)
    Index,
}

impl Operator {
    /// Look up an operator by its CEL function name
    pub fn from_name(name: &str) -> Option<Self> {
        let op = match name {
            "_?_:_" => Self::Conditional,
            "_||_" => Self::LogicalOr,
            "_&&_" => Self::LogicalAnd,
            "_==_" => Self::Equals,
            "_!=_" => Self::NotEquals,
            "_<_" => Self::Less,
            "_<=_" => Self::LessEquals,
            "_>_" => Self::Greater,
            "_>=_" => Self::GreaterEquals,
            "@in" => Self::In,
            "_+_" => Self::Add,
            "_-_" => Self::Subtract,
            "_*_" => Self::Multiply,
            "_/_" => Self::Divide,
            "_%_" => Self::Modulo,
            "!_" => Self::LogicalNot,
            "-_" => Self::Negate,
            "_[_]" => Self::Index,
            _ => return None,
        };
        Some(op)
    }

    /// The CEL function name of this operator
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Conditional => "_?_:_",
            Self::LogicalOr => "_||_",
            Self::LogicalAnd => "_&&_",
            Self::Equals => "_==_",
            Self::NotEquals => "_!=_",
            Self::Less => "_<_",
            Self::LessEquals => "_<=_",
            Self::Greater => "_>_",
            Self::GreaterEquals => "_>=_",
            Self::In => "@in",
            Self::Add => "_+_",
            Self::Subtract => "_-_",
            Self::Multiply => "_*_",
            Self::Divide => "_/_",
            Self::Modulo => "_%_",
            Self::LogicalNot => "!_",
            Self::Negate => "-_",
            Self::Index => "_[_]",
        }
    }

    /// Get the precedence level in the source language
    pub const fn precedence(&self) -> Precedence {
        match self {
            Self::Conditional => Precedence::Conditional,
            Self::LogicalOr => Precedence::Or,
            Self::LogicalAnd => Precedence::And,
            Self::Equals
            | Self::NotEquals
            | Self::Less
            | Self::LessEquals
            | Self::Greater
            | Self::GreaterEquals
            | Self::In => Precedence::Relation,
            Self::Add | Self::Subtract => Precedence::Additive,
            Self::Multiply | Self::Divide | Self::Modulo => Precedence::Multiplicative,
            Self::LogicalNot | Self::Negate => Precedence::Unary,
            Self::Index => Precedence::Primary,
        }
    }

    /// Check if same-precedence right operands can stay unparenthesized
    pub const fn is_associative(&self) -> bool {
        matches!(self, Self::LogicalAnd | Self::LogicalOr)
    }

    /// Check if this is a comparison operator
    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Equals
                | Self::NotEquals
                | Self::Less
                | Self::LessEquals
                | Self::Greater
                | Self::GreaterEquals
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_order() {
        assert!(Operator::Index.precedence() > Operator::LogicalNot.precedence());
        assert!(Operator::Multiply.precedence() > Operator::Add.precedence());
        assert!(Operator::Add.precedence() > Operator::Equals.precedence());
        assert!(Operator::Equals.precedence() > Operator::LogicalAnd.precedence());
        assert!(Operator::LogicalAnd.precedence() > Operator::LogicalOr.precedence());
        assert!(Operator::LogicalOr.precedence() > Operator::Conditional.precedence());
    }

    #[test]
    fn test_name_round_trip() {
        for op in [
            Operator::Conditional,
            Operator::In,
            Operator::Modulo,
            Operator::Negate,
            Operator::Index,
        ] {
            assert_eq!(Operator::from_name(op.name()), Some(op));
        }
        assert_eq!(Operator::from_name("_<<_"), None);
    }

    #[test]
    fn test_next_saturates() {
        assert_eq!(Precedence::Relation.next(), Precedence::Additive);
        assert_eq!(Precedence::Primary.next(), Precedence::Primary);
    }
}
