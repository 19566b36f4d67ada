//! User-facing validation errors.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// An error meant to be shown to the caller as `{"message": .., "data": .., "code": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ValidationError {
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn to_json(&self) -> Value {
        // Only plain fields, serialization cannot fail.
        serde_json::to_value(self).unwrap_or_else(|_| Value::String(self.message.clone()))
    }
}

pub fn validation_error(message: impl Into<String>) -> ValidationError {
    ValidationError {
        message: message.into(),
        data: None,
        code: None,
    }
}

pub trait OptionExt<T> {
    /// `"{type_name} does not exist"` when empty.
    fn or_not_found(self, type_name: &str) -> Result<T, ValidationError>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_not_found(self, type_name: &str) -> Result<T, ValidationError> {
        self.ok_or_else(|| validation_error(format!("{type_name} does not exist")))
    }
}

/// Unwrap a looked-up object, or fail with `message` (default: "{type_name} does not exist").
pub fn get_object_or_error<T>(
    object: Option<T>,
    type_name: &str,
    message: Option<&str>,
) -> Result<T, ValidationError> {
    match message {
        Some(message) => object.ok_or_else(|| validation_error(message)),
        None => object.or_not_found(type_name),
    }
}
