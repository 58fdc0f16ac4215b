//! Schema configuration types
//!
//! A [`Schema`] describes one top-level record type bound to a root variable
//! and a SQL table. Nested records are fields whose [`FieldType`] is
//! `Record`; their type name is the dotted path from the top-level type.

use cel2sql_ast::Type;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A top-level record type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Object type name exposed to the checker (e.g. "Employee")
    pub object_type: String,
    /// Table name override; the variable name is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// Root variable declared for this type (e.g. "employee")
    pub variable: String,
    /// Ordered fields
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

impl Schema {
    pub fn new(object_type: impl Into<String>, variable: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            table: None,
            variable: variable.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn with_field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldSchema>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// SQL table name: the override if set, else the variable name
    pub fn table_name(&self) -> &str {
        self.table.as_deref().unwrap_or(&self.variable)
    }
}

/// A field of a record type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Field name as used in expressions
    pub name: String,
    /// Column name override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    /// Scalar type tag or nested record
    #[serde(flatten)]
    pub field_type: FieldType,
    /// List of `field_type` rather than a single value
    #[serde(default)]
    pub repeated: bool,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            column: None,
            field_type,
            repeated: false,
        }
    }

    /// Nested record field
    pub fn record(name: impl Into<String>, fields: Vec<FieldSchema>) -> Self {
        Self::new(name, FieldType::Record { fields })
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }

    /// SQL column name: the override if set, else the field name
    pub fn column_name(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.name)
    }

    /// Nested fields, if this is a record
    pub fn nested_fields(&self) -> Option<&[FieldSchema]> {
        match &self.field_type {
            FieldType::Record { fields } => Some(fields),
            _ => None,
        }
    }

    /// Static type reported to the checker
    ///
    /// `parent_type` is the dotted type path of the record owning this field;
    /// records are named by extending it with the field name.
    pub fn checker_type(&self, parent_type: &str) -> Type {
        let ty = match &self.field_type {
            FieldType::String => Type::String,
            FieldType::Bytes => Type::Bytes,
            FieldType::Boolean => Type::Bool,
            FieldType::Integer => Type::Int,
            FieldType::Float => Type::Double,
            FieldType::Timestamp => Type::Timestamp,
            FieldType::Date => Type::Date,
            FieldType::Time => Type::Time,
            FieldType::DateTime => Type::DateTime,
            FieldType::Record { .. } => Type::object(format!("{}.{}", parent_type, self.name)),
        };
        if self.repeated { Type::list(ty) } else { ty }
    }
}

/// Scalar type tag or nested record of a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    String,
    Bytes,
    Boolean,
    Integer,
    Float,
    Timestamp,
    Date,
    Time,
    DateTime,
    /// Nested record with its own ordered fields
    Record {
        #[serde(default)]
        fields: Vec<FieldSchema>,
    },
}

impl FieldType {
    /// Configuration tag of this type
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Timestamp => "timestamp",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "datetime",
            Self::Record { .. } => "record",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_and_column_fallbacks() {
        let schema = Schema::new("Employee", "employee");
        assert_eq!(schema.table_name(), "employee");
        assert_eq!(schema.with_table("employees").table_name(), "employees");

        let field = FieldSchema::new("hiredAt", FieldType::Timestamp);
        assert_eq!(field.column_name(), "hiredAt");
        assert_eq!(field.with_column("hired_at").column_name(), "hired_at");
    }

    #[test]
    fn test_checker_type_mapping() {
        let tags = FieldSchema::new("tags", FieldType::String).repeated();
        assert_eq!(tags.checker_type("Employee"), Type::list(Type::String));

        let address = FieldSchema::record(
            "address",
            vec![FieldSchema::new("city", FieldType::String)],
        );
        assert_eq!(
            address.checker_type("Employee"),
            Type::object("Employee.address")
        );
        assert_eq!(
            FieldSchema::new("score", FieldType::Float).checker_type("Employee"),
            Type::Double
        );
    }

    #[test]
    fn test_field_deserialize() {
        let field: FieldSchema = serde_json::from_str(
            r#"{"name": "address", "type": "record", "repeated": true,
                "fields": [{"name": "city", "column": "city_name", "type": "string"}]}"#,
        )
        .unwrap();
        assert!(field.repeated);
        let nested = field.nested_fields().unwrap();
        assert_eq!(nested[0].column_name(), "city_name");
        assert_eq!(nested[0].field_type, FieldType::String);

        let field: FieldSchema =
            serde_json::from_str(r#"{"name": "at", "type": "datetime"}"#).unwrap();
        assert_eq!(field.field_type, FieldType::DateTime);
        assert!(!field.repeated);
    }
}
