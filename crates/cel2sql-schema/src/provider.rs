//! Type information supplied to the external CEL checker

use cel2sql_ast::Type;
use serde::{Deserialize, Serialize};

/// A root variable declaration (`employee: Employee`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    /// Variable name used in expressions
    pub variable: String,
    /// Object type of the variable
    pub object_type: String,
}

impl Declaration {
    pub fn new(variable: impl Into<String>, object_type: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            object_type: object_type.into(),
        }
    }

    /// Static type of the variable
    pub fn ty(&self) -> Type {
        Type::object(self.object_type.clone())
    }
}

/// Trait for providing record types and root declarations to a checker
///
/// Lookups report misses as `None`; the checker turns them into its own
/// "unknown type" diagnostics.
pub trait TypeProvider: Send + Sync {
    /// Root variables to declare before checking, in a stable order
    fn declarations(&self) -> Vec<Declaration>;

    /// Get the type for a dotted type name (`Employee`, `Employee.address`)
    fn find_type(&self, type_name: &str) -> Option<Type>;

    /// Get the type of `field` on the record named `type_name`
    fn find_field_type(&self, type_name: &str, field: &str) -> Option<Type>;
}
