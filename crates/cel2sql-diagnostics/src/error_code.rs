//! cel2sql error codes following a structured numbering system
//!
//! Error code ranges:
//! - C2S0100-C2S0199: Configuration errors (schema registry construction)
//! - C2S0200-C2S0299: Unsupported operations (no rendering rule)
//! - C2S0300-C2S0399: Render errors (value cannot be expressed in SQL)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is a configuration error (0100-0199)
    pub const fn is_config_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is an unsupported-operation error (0200-0299)
    pub const fn is_unsupported_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Check if this is a render error (0300-0399)
    pub const fn is_render_error(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C2S{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Configuration errors (0100-0199)
    map.insert(100, ErrorInfo::new("Duplicate object type"));
    map.insert(101, ErrorInfo::new("Duplicate variable"));
    map.insert(102, ErrorInfo::new("Duplicate field")
        .with_help("Field names must be unique within a record"));
    map.insert(103, ErrorInfo::new("Empty or malformed name")
        .with_help("Names must be non-empty and must not contain '.'"));
    map.insert(104, ErrorInfo::new("Invalid schema document"));

    // Unsupported operations (0200-0299)
    map.insert(200, ErrorInfo::new("Unsupported operator or function")
        .with_help("Only a fixed subset of CEL has a SQL rendering"));
    map.insert(201, ErrorInfo::new("Unsupported macro"));
    map.insert(202, ErrorInfo::new("Unsupported expression kind"));

    // Render errors (0300-0399)
    map.insert(300, ErrorInfo::new("Literal does not match its static type"));
    map.insert(301, ErrorInfo::new("Invalid duration"));
    map.insert(302, ErrorInfo::new("Value out of range for SQL type"));

    map
});

// Configuration errors
pub const C2S0100: ErrorCode = ErrorCode::new(100);
pub const C2S0101: ErrorCode = ErrorCode::new(101);
pub const C2S0102: ErrorCode = ErrorCode::new(102);
pub const C2S0103: ErrorCode = ErrorCode::new(103);
pub const C2S0104: ErrorCode = ErrorCode::new(104);

// Unsupported operations
pub const C2S0200: ErrorCode = ErrorCode::new(200);
pub const C2S0201: ErrorCode = ErrorCode::new(201);
pub const C2S0202: ErrorCode = ErrorCode::new(202);

// Render errors
pub const C2S0300: ErrorCode = ErrorCode::new(300);
pub const C2S0301: ErrorCode = ErrorCode::new(301);
pub const C2S0302: ErrorCode = ErrorCode::new(302);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(C2S0100.to_string(), "C2S0100");
        assert_eq!(C2S0301.to_string(), "C2S0301");
    }

    #[test]
    fn test_error_categories() {
        assert!(C2S0101.is_config_error());
        assert!(!C2S0101.is_render_error());

        assert!(C2S0200.is_unsupported_error());
        assert!(C2S0302.is_render_error());
    }

    #[test]
    fn test_error_info() {
        assert_eq!(C2S0102.info().description, "Duplicate field");
        assert!(C2S0102.info().help.is_some());
        assert_eq!(ErrorCode::new(999).info().description, "Unknown error");
    }
}
