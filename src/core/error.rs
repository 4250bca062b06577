//! Typed errors for the invoice actions
//!
//! Form actions report most failures as an [`ActionOutcome`](crate::actions::ActionOutcome)
//! rather than an error, so this hierarchy covers what sits outside that
//! contract: malformed requests, configuration problems, storage backend
//! faults that are logged before being reduced to a fixed message, and the
//! disabled delete path.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: form input rejected by a schema, folded into an
//!   action outcome rather than raised
//! - [`StorageError`]: storage backend faults
//! - [`RequestError`]: HTTP requests that never reach an action
//! - [`ConfigError`]: configuration loading and overrides
//!
//! # Example
//!
//! ```rust,ignore
//! match actions.delete_invoice(id).await {
//!     Ok(outcome) => outcome.into_response(),
//!     Err(ActionError::Disabled { operation }) => {
//!         tracing::warn!("{} is switched off", operation);
//!         StatusCode::INTERNAL_SERVER_ERROR.into_response()
//!     }
//!     Err(e) => e.into_response(),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

use crate::core::validation::FieldErrors;

/// Top-level error type for the crate
#[derive(Debug)]
pub enum ActionError {
    /// Storage backend errors
    Storage(StorageError),

    /// HTTP/Request errors
    Request(RequestError),

    /// Configuration errors
    Config(ConfigError),

    /// The operation is switched off by configuration and always fails
    Disabled { operation: String },

    /// Should not happen in normal operation
    Internal(String),
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::Storage(e) => write!(f, "{}", e),
            ActionError::Request(e) => write!(f, "{}", e),
            ActionError::Config(e) => write!(f, "{}", e),
            ActionError::Disabled { operation } => write!(f, "Failed to {} Invoice", operation),
            ActionError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ActionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ActionError::Storage(e) => Some(e),
            ActionError::Request(e) => Some(e),
            ActionError::Config(e) => Some(e),
            ActionError::Disabled { .. } | ActionError::Internal(_) => None,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ActionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ActionError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ActionError::Request(e) => e.status_code(),
            ActionError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ActionError::Disabled { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ActionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ActionError::Storage(_) => "STORAGE_ERROR",
            ActionError::Request(e) => e.error_code(),
            ActionError::Config(_) => "CONFIG_ERROR",
            ActionError::Disabled { .. } => "ACTION_DISABLED",
            ActionError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ActionError::Request(RequestError::InvalidEntityId { id }) => {
                Some(serde_json::json!({ "id": id }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors raised by the hard `parse` entry point of a form schema
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// One or more fields failed, messages grouped per field in schema order
    FieldErrors(FieldErrors),

    /// Validated fields did not fit the typed form
    Decode { message: String },
}

impl ValidationError {
    /// Field errors, if this is a per-field failure
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ValidationError::FieldErrors(errors) => Some(errors),
            ValidationError::Decode { .. } => None,
        }
    }

    /// Field errors, reporting a decode failure under the `form` key
    pub fn into_field_errors(self) -> FieldErrors {
        match self {
            ValidationError::FieldErrors(errors) => errors,
            ValidationError::Decode { message } => {
                let mut errors = FieldErrors::new();
                errors.insert("form".to_string(), vec![message]);
                errors
            }
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|(field, messages)| format!("{}: {}", field, messages.join("; ")))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
            ValidationError::Decode { message } => {
                write!(f, "Could not read validated form: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug)]
pub enum StorageError {
    /// Connection error
    ConnectionError { backend: String, message: String },

    /// Query execution error
    QueryError { backend: String, message: String },

    /// A stored row could not be read back into an invoice
    CorruptRow { backend: String, message: String },

    /// Backend not available
    Unavailable { backend: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ConnectionError { backend, message } => {
                write!(f, "Failed to connect to {}: {}", backend, message)
            }
            StorageError::QueryError { backend, message } => {
                write!(f, "{} query error: {}", backend, message)
            }
            StorageError::CorruptRow { backend, message } => {
                write!(f, "Unreadable {} row: {}", backend, message)
            }
            StorageError::Unavailable { backend } => {
                write!(f, "Storage backend '{}' is unavailable", backend)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for ActionError {
    fn from(err: StorageError) -> Self {
        ActionError::Storage(err)
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors in HTTP requests that never reach an action
#[derive(Debug)]
pub enum RequestError {
    /// Path id is not a UUID
    InvalidEntityId { id: String },

    /// Body could not be decoded
    InvalidBody { message: String },

    /// Body is neither a form submission nor JSON
    UnsupportedContentType { content_type: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::InvalidEntityId { id } => {
                write!(f, "Invalid invoice ID format: '{}'", id)
            }
            RequestError::InvalidBody { message } => {
                write!(f, "Invalid request body: {}", message)
            }
            RequestError::UnsupportedContentType { content_type } => {
                write!(f, "Unsupported content type: {}", content_type)
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::InvalidEntityId { .. } => StatusCode::BAD_REQUEST,
            RequestError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            RequestError::UnsupportedContentType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidEntityId { .. } => "INVALID_ENTITY_ID",
            RequestError::InvalidBody { .. } => "INVALID_BODY",
            RequestError::UnsupportedContentType { .. } => "UNSUPPORTED_CONTENT_TYPE",
        }
    }
}

impl From<RequestError> for ActionError {
    fn from(err: RequestError) -> Self {
        ActionError::Request(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration or an override
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    FileNotFound { path: String },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for ActionError {
    fn from(err: ConfigError) -> Self {
        ActionError::Config(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

/// A specialized Result type for the invoice actions
pub type ActionResult<T> = Result<T, ActionError>;
