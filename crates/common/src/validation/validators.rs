// Field Validators - Reusable validation components
use std::fmt::Display;
use std::marker::PhantomData;

/// Trait for field validators
pub trait FieldValidator<T: ?Sized> {
    /// Validate a field value
    fn validate(&self, value: &T) -> Result<(), String>;
}

/// Range validator for numeric types
#[derive(Debug, Clone)]
pub struct RangeValidator<T> {
    min: Option<T>,
    max: Option<T>,
    _phantom: PhantomData<T>,
}

impl<T> Default for RangeValidator<T>
where
    T: PartialOrd + Display + Clone,
{
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> RangeValidator<T>
where
    T: PartialOrd + Display + Clone,
{
    /// Create a new range validator with no constraints
    pub fn empty() -> Self {
        Self { min: None, max: None, _phantom: PhantomData }
    }

    /// Set minimum value
    pub fn min(mut self, min: T) -> Self {
        self.min = Some(min);
        self
    }

    /// Set maximum value
    pub fn max(mut self, max: T) -> Self {
        self.max = Some(max);
        self
    }
}

impl<T> FieldValidator<T> for RangeValidator<T>
where
    T: PartialOrd + Display + Clone,
{
    fn validate(&self, value: &T) -> Result<(), String> {
        if let Some(ref min) = self.min {
            if value < min {
                return Err(format!("Value must be at least {min}"));
            }
        }

        if let Some(ref max) = self.max {
            if value > max {
                return Err(format!("Value must not exceed {max}"));
            }
        }

        Ok(())
    }
}

/// String validator with various constraints.
///
/// Lengths are counted in characters, not bytes.
#[derive(Debug, Clone)]
pub struct StringValidator {
    max_length: Option<usize>,
    not_empty: bool,
    single_line: bool,
    trim: bool,
}

impl Default for StringValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl StringValidator {
    /// Create a new string validator
    pub fn new() -> Self {
        Self { max_length: None, not_empty: false, single_line: false, trim: true }
    }

    /// Require non-empty string
    pub fn not_empty(mut self) -> Self {
        self.not_empty = true;
        self
    }

    /// Set maximum length
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Reject line breaks
    pub fn single_line(mut self) -> Self {
        self.single_line = true;
        self
    }

    /// Set whether to trim before validation
    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Apply the configured trimming
    pub fn normalize<'v>(&self, value: &'v str) -> &'v str {
        if self.trim {
            value.trim()
        } else {
            value
        }
    }
}

impl FieldValidator<str> for StringValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        let val = self.normalize(value);

        if self.not_empty && val.is_empty() {
            return Err("Value cannot be empty".to_string());
        }

        if self.single_line && val.contains(['\n', '\r']) {
            return Err("Value must be a single line".to_string());
        }

        if let Some(max) = self.max_length {
            if val.chars().count() > max {
                return Err(format!("Length must not exceed {max} characters"));
            }
        }

        Ok(())
    }
}

/// Accepts only values from a fixed list
#[derive(Debug, Clone, Copy)]
pub struct OneOfValidator {
    allowed: &'static [&'static str],
}

impl OneOfValidator {
    pub fn new(allowed: &'static [&'static str]) -> Self {
        Self { allowed }
    }

    pub fn allowed(&self) -> &'static [&'static str] {
        self.allowed
    }
}

impl FieldValidator<str> for OneOfValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        if self.allowed.contains(&value) {
            Ok(())
        } else {
            Err(format!("Value must be one of: {}", self.allowed.join(", ")))
        }
    }
}
