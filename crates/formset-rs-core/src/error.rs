//! Core error types for formset-rs.
//!
//! [`ValidationError`] is the recoverable failure reported back to whoever
//! submitted a form. [`FormsetError`] covers everything else: configuration
//! mistakes, malformed settings files, serialization and I/O failures.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Represents a validation error with optional field-level errors.
///
/// Validation errors can be either simple (a single message) or compound
/// (containing per-field error lists). A form's `clean` hook returns a simple
/// error to reject the whole submission, or a compound one to attach messages
/// to individual fields.
///
/// # Examples
///
/// ```
/// use formset_rs_core::error::ValidationError;
///
/// let err = ValidationError::new("This field is required.", "required");
/// assert_eq!(err.to_string(), "This field is required.");
///
/// let err = ValidationError::new(
///     "Ensure this value has at least %(limit_value)d characters.",
///     "min_length",
/// )
/// .with_param("limit_value", "2");
/// assert_eq!(err.rendered(), "Ensure this value has at least 2 characters.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The primary error message, possibly containing `%(name)s` placeholders.
    pub message: String,
    /// A short code identifying the type of validation failure (e.g. "required", "invalid").
    pub code: String,
    /// Parameters substituted into the message by [`ValidationError::rendered`].
    pub params: HashMap<String, String>,
    /// Per-field validation errors, keyed by field name.
    pub field_errors: HashMap<String, Vec<Self>>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            params: HashMap::new(),
            field_errors: HashMap::new(),
        }
    }

    /// Creates a `ValidationError` containing per-field errors.
    pub fn with_field_errors(field_errors: HashMap<String, Vec<Self>>) -> Self {
        Self {
            message: String::new(),
            code: String::new(),
            params: HashMap::new(),
            field_errors,
        }
    }

    /// Adds a parameter to this validation error.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Returns `true` if this error carries per-field errors.
    pub fn has_field_errors(&self) -> bool {
        !self.field_errors.is_empty()
    }

    /// Returns the message with `%(name)s` and `%(name)d` placeholders replaced
    /// by their parameters. Unknown placeholders are left as they are.
    pub fn rendered(&self) -> String {
        let mut out = self.message.clone();
        for (key, value) in &self.params {
            for spec in ['s', 'd'] {
                out = out.replace(&format!("%({key}){spec}"), value);
            }
        }
        out
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.message.is_empty() {
            write!(f, "{}", self.rendered())?;
        } else if !self.field_errors.is_empty() {
            let mut names: Vec<&String> = self.field_errors.keys().collect();
            names.sort();
            let mut first = true;
            for field in names {
                for error in &self.field_errors[field] {
                    if !first {
                        write!(f, "; ")?;
                    }
                    write!(f, "{field}: {error}")?;
                    first = false;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for formset-rs.
#[derive(Error, Debug)]
pub enum FormsetError {
    /// One or more values failed validation.
    #[error("Validation error: {0}")]
    Validation(ValidationError),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A form, widget or model declaration is inconsistent.
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ValidationError> for FormsetError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<serde_json::Error> for FormsetError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// A convenience type alias for `Result<T, FormsetError>`.
pub type FormsetResult<T> = Result<T, FormsetError>;
