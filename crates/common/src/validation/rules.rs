// Validation Rules - field constraints and ordered schemas
use serde_json::Value;

use super::validators::{FieldValidator, OneOfValidator, RangeValidator, StringValidator};

/// Constraint applied to a single field.
///
/// Coercion is lenient in the same places a form-encoded caller would need:
/// numeric strings become integers and `"true"`/`"on"`/`1` style literals
/// become booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Integer greater than zero
    Uint,
    /// Boolean
    Bool,
    /// Trimmed, non-empty, single-line string of at most `max` characters
    Text { max: usize },
    /// Trimmed and upper-cased string that must equal one of the listed values
    OneOf(&'static [&'static str]),
}

impl Constraint {
    /// Validate `value` for `field` and return its normalized form.
    ///
    /// The error is the caller-facing message.
    pub fn coerce(&self, field: &str, value: &Value) -> Result<Value, String> {
        match self {
            Self::Uint => coerce_uint(value)
                .map(Value::from)
                .ok_or_else(|| format!("The '{field}' field must be a positive integer.")),
            Self::Bool => coerce_bool(value)
                .map(Value::Bool)
                .ok_or_else(|| format!("The '{field}' field must be a boolean.")),
            Self::Text { max } => coerce_text(field, value, *max),
            Self::OneOf(allowed) => {
                let mismatch =
                    || format!("The '{field}' field value does not match any of the allowed values.");
                let text = value.as_str().ok_or_else(mismatch)?;
                let normalized = text.trim().to_uppercase();
                OneOfValidator::new(allowed).validate(normalized.as_str()).map_err(|_| mismatch())?;
                Ok(Value::String(normalized))
            }
        }
    }
}

fn coerce_uint(value: &Value) -> Option<u64> {
    let candidate = match value {
        Value::Number(number) => match number.as_u64() {
            Some(n) => n,
            None => {
                let float = number.as_f64()?;
                if float.fract() != 0.0 || float < 1.0 || float > u64::MAX as f64 {
                    return None;
                }
                float as u64
            }
        },
        Value::String(text) => text.trim().parse::<u64>().ok()?,
        _ => return None,
    };

    RangeValidator::empty().min(1u64).validate(&candidate).ok().map(|()| candidate)
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => match number.as_u64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "on" => Some(true),
            "false" | "0" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn coerce_text(field: &str, value: &Value, max: usize) -> Result<Value, String> {
    let Some(text) = value.as_str() else {
        return Err(format!("The '{field}' field must be a non-empty string."));
    };

    let presence = StringValidator::new().not_empty();
    if presence.validate(text).is_err() {
        return Err(format!("The '{field}' field must be a non-empty string."));
    }

    let shape = StringValidator::new().max_length(max).single_line();
    shape.validate(text).map_err(|_| {
        format!("The '{field}' field must be a single line of at most {max} characters.")
    })?;

    Ok(Value::String(shape.normalize(text).to_string()))
}

/// Ordered set of named field constraints.
///
/// Field order is preserved so normalized output is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    label: String,
    fields: Vec<(String, Constraint)>,
}

impl Schema {
    /// Create an empty schema; `label` names the whole value in messages.
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), fields: Vec::new() }
    }

    /// Add a field; a later declaration of the same name replaces the earlier one.
    pub fn field(mut self, name: impl Into<String>, constraint: Constraint) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = constraint,
            None => self.fields.push((name, constraint)),
        }
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn fields(&self) -> impl Iterator<Item = &(String, Constraint)> {
        self.fields.iter()
    }

    pub fn declares(&self, name: &str) -> bool {
        self.fields.iter().any(|(field, _)| field == name)
    }

    pub fn constraint(&self, name: &str) -> Option<Constraint> {
        self.fields.iter().find(|(field, _)| field == name).map(|(_, c)| *c)
    }
}
