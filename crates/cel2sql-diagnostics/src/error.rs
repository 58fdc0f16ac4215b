//! cel2sql error types

use crate::{C2S0100, C2S0101, C2S0102, C2S0103, C2S0104, ErrorCode};
use crate::{C2S0200, C2S0201, C2S0202, C2S0300, C2S0301, C2S0302};
use std::fmt;
use thiserror::Error;

/// Schema configuration error, raised while building a registry.
///
/// A registry that fails validation is rejected as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Two schemas declare the same object type
    #[error("{}: duplicate object type '{name}'", C2S0100)]
    DuplicateObjectType { name: String },

    /// Two schemas declare the same root variable
    #[error("{}: duplicate variable '{name}'", C2S0101)]
    DuplicateVariable { name: String },

    /// A record declares the same field twice
    #[error("{}: duplicate field '{field}' in '{record}'", C2S0102)]
    DuplicateField { record: String, field: String },

    /// An object type, variable or field name is empty
    #[error("{}: empty {what} name in '{record}'", C2S0103)]
    EmptyName { what: &'static str, record: String },

    /// A name contains the `.` path separator
    #[error("{}: {what} name '{name}' in '{record}' contains '.'", C2S0103)]
    MalformedName {
        what: &'static str,
        name: String,
        record: String,
    },

    /// The schema document could not be decoded
    #[error("{}: {message}", C2S0104)]
    Parse { message: String },
}

impl ConfigError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::DuplicateObjectType { .. } => C2S0100,
            Self::DuplicateVariable { .. } => C2S0101,
            Self::DuplicateField { .. } => C2S0102,
            Self::EmptyName { .. } | Self::MalformedName { .. } => C2S0103,
            Self::Parse { .. } => C2S0104,
        }
    }
}

/// Error produced by a single conversion call.
///
/// No partial SQL accompanies an error; the call either returns the whole
/// fragment or one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// Operator, function, macro or node kind without a rendering rule
    #[error("{code}: unsupported {operation}{}", ExprAt(.expr_id))]
    UnsupportedOperation {
        code: ErrorCode,
        operation: String,
        expr_id: Option<i64>,
    },

    /// A value cannot be written as SQL for its claimed type
    #[error("{code}: cannot render {type_name}: {message}{}", ExprAt(.expr_id))]
    Render {
        code: ErrorCode,
        type_name: String,
        message: String,
        expr_id: Option<i64>,
    },
}

impl ConvertError {
    /// Operator or function missing from the mapping table
    pub fn unsupported(operation: impl fmt::Display) -> Self {
        Self::UnsupportedOperation {
            code: C2S0200,
            operation: format!("operation '{}'", operation),
            expr_id: None,
        }
    }

    /// Comprehension macro without a SQL equivalent
    pub fn unsupported_macro(name: impl fmt::Display) -> Self {
        Self::UnsupportedOperation {
            code: C2S0201,
            operation: format!("macro '{}'", name),
            expr_id: None,
        }
    }

    /// Expression kind (e.g. map construction) without a SQL equivalent
    pub fn unsupported_kind(kind: impl fmt::Display) -> Self {
        Self::UnsupportedOperation {
            code: C2S0202,
            operation: format!("expression kind '{}'", kind),
            expr_id: None,
        }
    }

    /// Value and static type disagree, or the type has no literal syntax
    pub fn render(type_name: impl fmt::Display, message: impl Into<String>) -> Self {
        Self::Render {
            code: C2S0300,
            type_name: type_name.to_string(),
            message: message.into(),
            expr_id: None,
        }
    }

    /// Duration string that cannot be parsed or represented
    pub fn invalid_duration(message: impl Into<String>) -> Self {
        Self::Render {
            code: C2S0301,
            type_name: "duration".to_string(),
            message: message.into(),
            expr_id: None,
        }
    }

    /// Value outside the range of the SQL type
    pub fn out_of_range(type_name: impl fmt::Display, message: impl Into<String>) -> Self {
        Self::Render {
            code: C2S0302,
            type_name: type_name.to_string(),
            message: message.into(),
            expr_id: None,
        }
    }

    /// Attach the id of the offending node, keeping the innermost one
    pub fn at(mut self, id: i64) -> Self {
        match &mut self {
            Self::UnsupportedOperation { expr_id, .. } | Self::Render { expr_id, .. } => {
                expr_id.get_or_insert(id);
            }
        }
        self
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedOperation { code, .. } | Self::Render { code, .. } => *code,
        }
    }

    /// Get the id of the offending node if known
    pub fn expr_id(&self) -> Option<i64> {
        match self {
            Self::UnsupportedOperation { expr_id, .. } | Self::Render { expr_id, .. } => *expr_id,
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedOperation { .. })
    }

    pub fn is_render(&self) -> bool {
        matches!(self, Self::Render { .. })
    }
}

struct ExprAt<'a>(&'a Option<i64>);

impl fmt::Display for ExprAt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(id) => write!(f, " at expr #{}", id),
            None => Ok(()),
        }
    }
}
