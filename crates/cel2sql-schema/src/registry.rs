//! Schema registry implementing TypeProvider
//!
//! The registry is built once from configuration and is read-only
//! afterwards, so a single instance can serve concurrent conversions by
//! shared reference.

use crate::provider::{Declaration, TypeProvider};
use crate::schema::{FieldSchema, Schema};
use cel2sql_ast::Type;
use cel2sql_diagnostics::ConfigError;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Registered schemas keyed by object type and by root variable
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    /// Object type name -> schema, in registration order
    schemas: IndexMap<String, Schema>,
    /// Root variable -> object type name
    variables: IndexMap<String, String>,
}

impl SchemaRegistry {
    /// Validate and register a set of top-level schemas
    ///
    /// Fails on duplicate object types, duplicate variables, duplicate field
    /// names within one record, or names that are empty or contain `.`.
    /// Nothing is registered when any schema is rejected.
    pub fn register(schemas: impl IntoIterator<Item = Schema>) -> Result<Self, ConfigError> {
        let mut registry = Self::default();

        for schema in schemas {
            if schema.object_type.is_empty() {
                return Err(ConfigError::EmptyName {
                    what: "object type",
                    record: schema.variable.clone(),
                });
            }
            if schema.variable.is_empty() {
                return Err(ConfigError::EmptyName {
                    what: "variable",
                    record: schema.object_type.clone(),
                });
            }
            check_name("object type", &schema.object_type, &schema.variable)?;
            check_name("variable", &schema.variable, &schema.object_type)?;
            if registry.schemas.contains_key(&schema.object_type) {
                return Err(ConfigError::DuplicateObjectType {
                    name: schema.object_type,
                });
            }
            if registry.variables.contains_key(&schema.variable) {
                return Err(ConfigError::DuplicateVariable {
                    name: schema.variable,
                });
            }
            validate_fields(&schema.object_type, &schema.fields)?;

            log::debug!(
                "registered schema {} as variable '{}' (table '{}', {} fields)",
                schema.object_type,
                schema.variable,
                schema.table_name(),
                schema.fields.len()
            );
            registry
                .variables
                .insert(schema.variable.clone(), schema.object_type.clone());
            registry.schemas.insert(schema.object_type.clone(), schema);
        }

        Ok(registry)
    }

    /// Load schemas from a JSON array and register them
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let schemas: Vec<Schema> = serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        Self::register(schemas)
    }

    /// Number of registered top-level schemas
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Root declarations, one per schema, in registration order
    pub fn declarations(&self) -> Vec<Declaration> {
        self.schemas
            .values()
            .map(|s| Declaration::new(&s.variable, &s.object_type))
            .collect()
    }

    /// Get a top-level schema by object type
    pub fn schema(&self, object_type: &str) -> Option<&Schema> {
        self.schemas.get(object_type)
    }

    /// Get the schema bound to a root variable
    pub fn schema_for_variable(&self, variable: &str) -> Option<&Schema> {
        let object_type = self.variables.get(variable)?;
        self.schemas.get(object_type)
    }

    /// Resolve a dotted type path to the fields of that record
    ///
    /// The first segment names a top-level object type, every further
    /// segment a record field of the previous level. Any miss, including a
    /// segment that names a scalar field, yields `None`.
    pub fn resolve_type(&self, type_path: &str) -> Option<&[FieldSchema]> {
        let mut segments = type_path.split('.');
        let root = segments.next()?;
        let mut fields = self.schemas.get(root)?.fields.as_slice();

        for segment in segments {
            fields = Self::resolve_field(fields, segment)?.nested_fields()?;
        }
        Some(fields)
    }

    /// Find a field by name in a record
    pub fn resolve_field<'a>(fields: &'a [FieldSchema], name: &str) -> Option<&'a FieldSchema> {
        fields.iter().find(|f| f.name == name)
    }

    /// SQL table name for a root identifier
    ///
    /// Falls back to the identifier itself when it is not a registered
    /// variable.
    pub fn table_name_for<'a>(&'a self, ident: &'a str) -> &'a str {
        self.schema_for_variable(ident)
            .map(Schema::table_name)
            .unwrap_or(ident)
    }

    /// SQL column name for `field` of the schema bound to `ident`
    ///
    /// Falls back to the raw field name when either lookup misses.
    pub fn column_name_for<'a>(&'a self, ident: &str, field: &'a str) -> &'a str {
        self.schema_for_variable(ident)
            .and_then(|s| Self::resolve_field(&s.fields, field))
            .map(FieldSchema::column_name)
            .unwrap_or(field)
    }

    /// SQL column name for `field` of the record at `type_path`
    ///
    /// Falls back to the raw field name when either lookup misses.
    pub fn nested_column_name<'a>(&'a self, type_path: &str, field: &'a str) -> &'a str {
        self.resolve_type(type_path)
            .and_then(|fields| Self::resolve_field(fields, field))
            .map(FieldSchema::column_name)
            .unwrap_or(field)
    }
}

impl TypeProvider for SchemaRegistry {
    fn declarations(&self) -> Vec<Declaration> {
        SchemaRegistry::declarations(self)
    }

    fn find_type(&self, type_name: &str) -> Option<Type> {
        self.resolve_type(type_name)
            .map(|_| Type::object(type_name))
    }

    fn find_field_type(&self, type_name: &str, field: &str) -> Option<Type> {
        let fields = self.resolve_type(type_name)?;
        Self::resolve_field(fields, field).map(|f| f.checker_type(type_name))
    }
}

fn validate_fields(record: &str, fields: &[FieldSchema]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for field in fields {
        if field.name.is_empty() {
            return Err(ConfigError::EmptyName {
                what: "field",
                record: record.to_string(),
            });
        }
        check_name("field", &field.name, record)?;
        if !seen.insert(field.name.as_str()) {
            return Err(ConfigError::DuplicateField {
                record: record.to_string(),
                field: field.name.clone(),
            });
        }
        if let Some(nested) = field.nested_fields() {
            validate_fields(&format!("{}.{}", record, field.name), nested)?;
        }
    }
    Ok(())
}

/// Names are path segments and cannot contain the separator
fn check_name(what: &'static str, name: &str, record: &str) -> Result<(), ConfigError> {
    if name.contains('.') {
        return Err(ConfigError::MalformedName {
            what,
            name: name.to_string(),
            record: record.to_string(),
        });
    }
    Ok(())
}
