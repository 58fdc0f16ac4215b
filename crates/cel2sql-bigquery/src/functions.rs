//! Mapping from CEL operators and functions to BigQuery rendering rules
//!
//! The table is closed: a call whose function name is not listed here has no
//! SQL rendering, even if the checker accepted it.

use cel2sql_ast::{Operator, Type};

/// Rendering rule selected for a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mapping {
    /// Built-in operator
    Operator(Operator),
    /// Named function
    Function(SqlFunction),
}

/// Look up the rendering rule for a CEL function name
pub fn lookup(name: &str) -> Option<Mapping> {
    Operator::from_name(name)
        .map(Mapping::Operator)
        .or_else(|| SqlFunction::from_name(name).map(Mapping::Function))
}

/// Infix SQL operator for a binary CEL operator rendered in place
pub const fn infix_symbol(op: Operator) -> Option<&'static str> {
    match op {
        Operator::LogicalOr => Some("OR"),
        Operator::LogicalAnd => Some("AND"),
        Operator::Equals => Some("="),
        Operator::NotEquals => Some("!="),
        Operator::Less => Some("<"),
        Operator::LessEquals => Some("<="),
        Operator::Greater => Some(">"),
        Operator::GreaterEquals => Some(">="),
        Operator::Add => Some("+"),
        Operator::Subtract => Some("-"),
        Operator::Multiply => Some("*"),
        Operator::Divide => Some("/"),
        _ => None,
    }
}

/// Date/time arithmetic function for adding or subtracting an interval
pub fn temporal_arithmetic(ty: &Type, subtract: bool) -> Option<&'static str> {
    let name = match (ty, subtract) {
        (Type::Timestamp, false) => "TIMESTAMP_ADD",
        (Type::Timestamp, true) => "TIMESTAMP_SUB",
        (Type::DateTime, false) => "DATETIME_ADD",
        (Type::DateTime, true) => "DATETIME_SUB",
        (Type::Date, false) => "DATE_ADD",
        (Type::Date, true) => "DATE_SUB",
        (Type::Time, false) => "TIME_ADD",
        (Type::Time, true) => "TIME_SUB",
        _ => return None,
    };
    Some(name)
}

/// Named CEL functions with a BigQuery rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlFunction {
    // === Strings ===
    /// `s.contains(x)`
    Contains,
    /// `s.startsWith(x)`
    StartsWith,
    /// `s.endsWith(x)`
    EndsWith,
    /// `s.matches(re)` / `matches(s, re)`
    Matches,
    /// `size(x)` / `x.size()`
    Size,

    // === Constructors and conversions ===
    /// `duration("24h")`
    Duration,
    /// `timestamp(x)`
    Timestamp,
    /// `date(...)`
    Date,
    /// `time(...)`
    Time,
    /// `datetime(...)`
    DateTime,
    /// `int(x)`, `double(x)`, ...
    Cast(CastType),

    // === Environment ===
    /// `current_timestamp()`, `current_date()`, ...
    Current(CurrentValue),

    // === Timestamp accessors ===
    /// `t.getFullYear()`, `t.getHours()`, ...
    Extract(DatePart),
}

impl SqlFunction {
    /// Look up a named function
    pub fn from_name(name: &str) -> Option<Self> {
        let f = match name {
            "contains" => Self::Contains,
            "startsWith" => Self::StartsWith,
            "endsWith" => Self::EndsWith,
            "matches" => Self::Matches,
            "size" => Self::Size,
            "duration" => Self::Duration,
            "timestamp" => Self::Timestamp,
            "date" => Self::Date,
            "time" => Self::Time,
            "datetime" => Self::DateTime,
            "int" => Self::Cast(CastType::Int64),
            "double" => Self::Cast(CastType::Float64),
            "string" => Self::Cast(CastType::String),
            "bytes" => Self::Cast(CastType::Bytes),
            "bool" => Self::Cast(CastType::Bool),
            "current_timestamp" => Self::Current(CurrentValue::Timestamp),
            "current_date" => Self::Current(CurrentValue::Date),
            "current_time" => Self::Current(CurrentValue::Time),
            "current_datetime" => Self::Current(CurrentValue::DateTime),
            "getFullYear" => Self::Extract(DatePart::FullYear),
            "getMonth" => Self::Extract(DatePart::Month),
            "getDayOfYear" => Self::Extract(DatePart::DayOfYear),
            "getDayOfMonth" => Self::Extract(DatePart::DayOfMonth),
            "getDate" => Self::Extract(DatePart::Date),
            "getDayOfWeek" => Self::Extract(DatePart::DayOfWeek),
            "getHours" => Self::Extract(DatePart::Hours),
            "getMinutes" => Self::Extract(DatePart::Minutes),
            "getSeconds" => Self::Extract(DatePart::Seconds),
            "getMilliseconds" => Self::Extract(DatePart::Milliseconds),
            _ => return None,
        };
        Some(f)
    }
}

/// Target of a `CAST(x AS ...)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastType {
    Int64,
    Float64,
    String,
    Bytes,
    Bool,
}

impl CastType {
    /// SQL type name
    pub const fn sql_type(&self) -> &'static str {
        match self {
            Self::Int64 => "INT64",
            Self::Float64 => "FLOAT64",
            Self::String => "STRING",
            Self::Bytes => "BYTES",
            Self::Bool => "BOOL",
        }
    }
}

/// Zero-argument environment value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurrentValue {
    Timestamp,
    Date,
    Time,
    DateTime,
}

impl CurrentValue {
    /// SQL function name
    pub const fn sql_function(&self) -> &'static str {
        match self {
            Self::Timestamp => "CURRENT_TIMESTAMP",
            Self::Date => "CURRENT_DATE",
            Self::Time => "CURRENT_TIME",
            Self::DateTime => "CURRENT_DATETIME",
        }
    }

    /// Check if an optional timezone argument is accepted
    pub const fn accepts_timezone(&self) -> bool {
        !matches!(self, Self::Timestamp)
    }
}

/// Component read by a timestamp accessor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatePart {
    FullYear,
    Month,
    DayOfYear,
    DayOfMonth,
    Date,
    DayOfWeek,
    Hours,
    Minutes,
    Seconds,
    Milliseconds,
}

impl DatePart {
    /// `EXTRACT` part keyword
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::FullYear => "YEAR",
            Self::Month => "MONTH",
            Self::DayOfYear => "DAYOFYEAR",
            Self::DayOfMonth | Self::Date => "DAY",
            Self::DayOfWeek => "DAYOFWEEK",
            Self::Hours => "HOUR",
            Self::Minutes => "MINUTE",
            Self::Seconds => "SECOND",
            Self::Milliseconds => "MILLISECOND",
        }
    }

    /// CEL counts these from zero while BigQuery counts from one
    pub const fn zero_based(&self) -> bool {
        matches!(
            self,
            Self::Month | Self::DayOfYear | Self::DayOfMonth | Self::DayOfWeek
        )
    }
}
