//! Literal values in checked expressions

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use std::fmt;

/// A constant value in a checked expression
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Null literal
    Null,
    /// Boolean literal (true/false)
    Bool(bool),
    /// Signed integer literal
    Int(i64),
    /// Unsigned integer literal (suffix 'u')
    Uint(u64),
    /// Floating point literal
    Double(f64),
    /// String literal
    String(String),
    /// Bytes literal (b"...")
    Bytes(Vec<u8>),
    /// UTC instant
    Timestamp(DateTime<Utc>),
    /// Civil date
    Date(NaiveDate),
    /// Civil time of day
    Time(NaiveTime),
    /// Civil date and time
    DateTime(NaiveDateTime),
    /// Amount of time
    Duration(TimeDelta),
}

impl Literal {
    /// Name of the value kind, used in error messages
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Timestamp(_) => "timestamp",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::DateTime(_) => "datetime",
            Self::Duration(_) => "duration",
        }
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Literal {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Literal {
    fn from(d: f64) -> Self {
        Self::Double(d)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Uint(u) => write!(f, "{}u", u),
            Self::Double(d) => write!(f, "{:?}", d),
            Self::String(s) => write!(f, "{:?}", s),
            Self::Bytes(b) => write!(f, "b{:?}", String::from_utf8_lossy(b)),
            Self::Timestamp(ts) => write!(f, "timestamp({:?})", ts.to_rfc3339()),
            Self::Date(d) => write!(f, "date({:?})", d.to_string()),
            Self::Time(t) => write!(f, "time({:?})", t.to_string()),
            Self::DateTime(dt) => write!(f, "datetime({:?})", dt.to_string()),
            Self::Duration(d) => write!(f, "duration({:?})", format!("{}s", d.num_seconds())),
        }
    }
}
