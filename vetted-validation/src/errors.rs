// Validation errors

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Interpolation parameters of a message, in declaration order.
pub type Params = Vec<(&'static str, String)>;

/// The single failure reported by a validator: the first predicate that did not hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Validator that produced the error, also the message namespace (`"email"`)
    pub scope: &'static str,

    /// Message key of the failed predicate (`"businessOnly"`)
    pub code: &'static str,

    /// Values interpolated into the message template
    pub params: Params,

    /// Message resolved against the locale in effect
    pub message: String,

    /// Field label, set when validated as part of a form
    pub field: Option<String>,
}

impl ValidationError {
    /// Create a new validation error with an already resolved message.
    pub fn new(scope: &'static str, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            scope,
            code,
            params: Vec::new(),
            message: message.into(),
            field: None,
        }
    }

    /// Set the interpolation parameters.
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Set the field label.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Dotted catalog key (`"email.businessOnly"`).
    pub fn key(&self) -> String {
        format!("{}.{}", self.scope, self.code)
    }

    /// Look up a parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Convert to JSON representation
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "field": self.field,
            "key": self.key(),
            "code": self.code,
            "message": self.message,
            "params": self.params.iter().map(|(k, v)| (k.to_string(), serde_json::Value::from(v.as_str()))).collect::<serde_json::Map<_, _>>(),
        })
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{}: {}", field, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors of several fields validated together, at most one per field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    pub errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Create a new validation errors collection
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Add an error
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Get the error of a specific field
    pub fn get(&self, field: &str) -> Option<&ValidationError> {
        self.errors
            .iter()
            .find(|e| e.field.as_deref() == Some(field))
    }

    /// Convert to JSON representation
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "errors": self.errors.iter().map(ValidationError::to_json).collect::<Vec<_>>()
        })
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::new(errors)
    }
}

/// Invalid validator configuration, reported when the validator is built.
#[derive(Debug, Error)]
pub enum OptionsError {
    /// A custom pattern does not compile
    #[error("invalid pattern for `{option}`: {source}")]
    Pattern {
        option: &'static str,
        #[source]
        source: regex::Error,
    },

    /// An option value cannot be interpreted
    #[error("invalid value for `{option}`: {value:?}")]
    InvalidValue { option: &'static str, value: String },

    /// Two options contradict each other
    #[error("conflicting options: {0}")]
    Conflict(String),
}

/// Result of a single validator: `Ok(None)` for an accepted empty optional value.
pub type ValidationResult<T> = Result<Option<T>, ValidationError>;
