//! Static types carried by checked expressions

use serde::{Deserialize, Serialize};
use std::fmt;

/// The static type of a checked CEL expression node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "of", rename_all = "snake_case")]
pub enum Type {
    /// Type of the `null` literal
    Null,
    Bool,
    /// 64-bit signed integer
    Int,
    /// 64-bit unsigned integer
    Uint,
    /// 64-bit IEEE float
    Double,
    String,
    Bytes,

    // === Temporal Types ===
    /// UTC instant
    Timestamp,
    /// Amount of time, distinct from an instant
    Duration,
    /// Civil date
    Date,
    /// Civil time of day
    Time,
    /// Civil date and time without zone
    DateTime,

    // === Aggregate Types ===
    /// Homogeneous list
    List(Box<Type>),
    /// Map from key to value type
    Map(Box<Type>, Box<Type>),
    /// Registered record type, named by its dotted path (`Employee.address`)
    Object(String),
    /// Dynamically typed value
    Dyn,
}

impl Type {
    /// Create a list type
    pub fn list(element: Type) -> Self {
        Self::List(Box::new(element))
    }

    /// Create a map type
    pub fn map(key: Type, value: Type) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    /// Create an object type
    pub fn object(name: impl Into<String>) -> Self {
        Self::Object(name.into())
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::String)
    }

    pub fn is_bytes(&self) -> bool {
        matches!(self, Self::Bytes)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Int | Self::Uint)
    }

    /// Check if this is an instant or civil temporal type
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            Self::Timestamp | Self::Date | Self::Time | Self::DateTime
        )
    }

    /// Element type of a list
    pub fn element_type(&self) -> Option<&Type> {
        match self {
            Self::List(element) => Some(element),
            _ => None,
        }
    }

    /// Record type path of an object type
    pub fn object_name(&self) -> Option<&str> {
        match self {
            Self::Object(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null_type"),
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Uint => write!(f, "uint"),
            Self::Double => write!(f, "double"),
            Self::String => write!(f, "string"),
            Self::Bytes => write!(f, "bytes"),
            Self::Timestamp => write!(f, "google.protobuf.Timestamp"),
            Self::Duration => write!(f, "google.protobuf.Duration"),
            Self::Date => write!(f, "date"),
            Self::Time => write!(f, "time"),
            Self::DateTime => write!(f, "datetime"),
            Self::List(element) => write!(f, "list({})", element),
            Self::Map(key, value) => write!(f, "map({}, {})", key, value),
            Self::Object(name) => write!(f, "{}", name),
            Self::Dyn => write!(f, "dyn"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_display() {
        assert_eq!(Type::list(Type::String).to_string(), "list(string)");
        assert_eq!(
            Type::map(Type::String, Type::Int).to_string(),
            "map(string, int)"
        );
        assert_eq!(Type::object("Employee.address").to_string(), "Employee.address");
    }

    #[test]
    fn test_type_predicates() {
        assert!(Type::Timestamp.is_temporal());
        assert!(!Type::Duration.is_temporal());
        assert_eq!(Type::list(Type::Int).element_type(), Some(&Type::Int));
        assert_eq!(Type::object("Employee").object_name(), Some("Employee"));
    }
}
