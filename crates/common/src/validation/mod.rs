// Validation Module - declarative schema validation for JSON parameters
use std::fmt;

use serde_json::{Map, Value};

mod rules;
mod validators;

pub use rules::{Constraint, Schema};
pub use validators::{FieldValidator, OneOfValidator, RangeValidator, StringValidator};

/// Type alias for validation results
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error with detailed field-level errors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Create with a single field error
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::new();
        err.add_field_error(field, message);
        err
    }

    /// Add a field-level error
    pub fn add_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get error count
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Message of the first recorded error, if any
    pub fn first_message(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }

    /// Get errors for a specific field
    pub fn field_errors(&self, field: &str) -> Vec<&FieldError> {
        self.errors.iter().filter(|e| e.field == field).collect()
    }

    /// Merge another validation error into this one
    pub fn merge(&mut self, other: ValidationError) {
        self.errors.extend(other.errors);
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            write!(f, "Validation error with no specific field errors")?;
        } else if self.errors.len() == 1 {
            write!(f, "{}", self.errors[0].message)?;
        } else {
            for (i, error) in self.errors.iter().enumerate() {
                if i > 0 {
                    write!(f, "; ")?;
                }
                write!(f, "{}", error.message)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Individual field error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    /// Create a new field error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// Validation context controlling how a schema is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    /// Drop properties the schema does not declare instead of rejecting them
    pub strip_unknown: bool,
    /// Stop at the first failing field
    pub stop_on_first: bool,
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self { strip_unknown: true, stop_on_first: true }
    }
}

impl ValidationContext {
    /// Create a new validation context
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every failing field instead of halting on the first
    pub fn collect_all(mut self) -> Self {
        self.stop_on_first = false;
        self
    }

    /// Reject undeclared properties
    pub fn strict(mut self) -> Self {
        self.strip_unknown = false;
        self
    }
}

/// Applies a [`Schema`] to an optional JSON object, producing the
/// normalized object on success.
pub struct Validator<'a> {
    schema: &'a Schema,
    context: ValidationContext,
}

impl<'a> Validator<'a> {
    /// Create a validator with the default context (strip unknown, halt on
    /// first error)
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema, context: ValidationContext::default() }
    }

    /// Create with context
    pub fn with_context(schema: &'a Schema, context: ValidationContext) -> Self {
        Self { schema, context }
    }

    /// Validate `params`.
    ///
    /// `None` means the caller supplied no parameters, which is accepted as
    /// an empty object. Any present value must be an object.
    pub fn validate(&self, params: Option<&Value>) -> ValidationResult<Map<String, Value>> {
        let object = match params {
            None => return Ok(Map::new()),
            Some(Value::Object(object)) => object,
            Some(_) => {
                return Err(ValidationError::field(
                    self.schema.label(),
                    format!("The '{}' must be an Object.", self.schema.label()),
                ))
            }
        };

        let mut errors = ValidationError::new();
        let mut normalized = Map::new();

        for (field, constraint) in self.schema.fields() {
            let Some(value) = object.get(field.as_str()) else {
                continue;
            };

            match constraint.coerce(field, value) {
                Ok(value) => {
                    normalized.insert(field.clone(), value);
                }
                Err(message) => {
                    errors.add_field_error(field.as_str(), message);
                    if self.context.stop_on_first {
                        return Err(errors);
                    }
                }
            }
        }

        if !self.context.strip_unknown {
            for key in object.keys().filter(|key| !self.schema.declares(key)) {
                errors.add_field_error(
                    key.as_str(),
                    format!("The '{key}' field is not allowed by this schema."),
                );
                if self.context.stop_on_first {
                    return Err(errors);
                }
            }
        }

        if errors.is_empty() {
            Ok(normalized)
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn schema() -> Schema {
        Schema::new("params")
            .field("sort", Constraint::OneOf(&["ASC", "DESC"]))
            .field("limit", Constraint::Uint)
            .field("is_active", Constraint::Bool)
            .field("name", Constraint::Text { max: 8 })
    }

    #[test]
    fn absent_params_are_an_empty_object() {
        let schema = schema();
        let result = Validator::new(&schema).validate(None).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn non_object_params_are_rejected() {
        let schema = schema();
        for value in [json!(null), json!([1, 2]), json!("x"), json!(3)] {
            let err = Validator::new(&schema).validate(Some(&value)).unwrap_err();
            assert_eq!(err.first_message(), Some("The 'params' must be an Object."));
        }
    }

    #[test]
    fn values_are_normalized_and_unknown_fields_removed() {
        let schema = schema();
        let params = json!({
            "sort": " desc ",
            "limit": "25",
            "is_active": "true",
            "name": "  ops ",
            "evil": "ignored"
        });

        let result = Validator::new(&schema).validate(Some(&params)).unwrap();
        assert_eq!(
            Value::Object(result),
            json!({ "sort": "DESC", "limit": 25, "is_active": true, "name": "ops" })
        );
    }

    #[test]
    fn halts_on_first_error_by_default() {
        let schema = schema();
        let params = json!({ "sort": "sideways", "limit": -1 });

        let err = Validator::new(&schema).validate(Some(&params)).unwrap_err();
        assert_eq!(err.error_count(), 1);
        assert_eq!(
            err.first_message(),
            Some("The 'sort' field value does not match any of the allowed values.")
        );

        let err = Validator::with_context(&schema, ValidationContext::new().collect_all())
            .validate(Some(&params))
            .unwrap_err();
        assert_eq!(err.error_count(), 2);
        assert_eq!(err.field_errors("limit").len(), 1);
    }

    #[test]
    fn strict_context_rejects_unknown_fields() {
        let schema = schema();
        let params = json!({ "evil": 1 });

        let err = Validator::with_context(&schema, ValidationContext::new().strict())
            .validate(Some(&params))
            .unwrap_err();
        assert_eq!(err.field_errors("evil").len(), 1);
    }
}
