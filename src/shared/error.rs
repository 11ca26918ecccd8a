//! Shared Error Types
//!
//! This module defines error types that are shared between the client and the
//! server. These errors represent common failure cases that can occur in both
//! contexts.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization/deserialization failures
//! - `ValidationError` - Submission payload validation failures
//! - `UnknownFormType` - A payload tagged with a form type we do not accept
//!
//! # Usage
//!
//! ```rust
//! use custodial_sync::shared::error::SharedError;
//!
//! let error = SharedError::validation("school", "School is required");
//! ```
use thiserror::Error;

/// Shared error types that can occur in both client and server
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Payload carried a `type` tag that names no known form
    #[error("Unknown form type: {tag}")]
    UnknownFormType {
        /// The rejected tag
        tag: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new unknown form type error
    pub fn unknown_form_type(tag: impl Into<String>) -> Self {
        Self::UnknownFormType { tag: tag.into() }
    }

    /// The offending field, when the error is tied to one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::ValidationError { field, .. } => Some(field),
            Self::UnknownFormType { .. } => Some("type"),
            Self::SerializationError { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
