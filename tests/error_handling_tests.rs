//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Errors return correct HTTP status codes
//! - Error responses are properly formatted
//! - Error conversions work correctly

use axum::http::StatusCode;
use axum::response::IntoResponse;
use invoice_actions::core::error::{ConfigError, RequestError, StorageError, ValidationError};
use invoice_actions::prelude::*;

// =============================================================================
// HTTP Status Code Tests
// =============================================================================

mod status_code_tests {
    use super::*;

    #[test]
    fn test_config_error_returns_500() {
        let err = ActionError::Config(ConfigError::InvalidValue {
            field: "database.max_connections".to_string(),
            value: "0".to_string(),
            message: "must be at least 1".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_id_returns_400() {
        let err = ActionError::Request(RequestError::InvalidEntityId {
            id: "42".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unsupported_content_type_returns_415() {
        let err = ActionError::Request(RequestError::UnsupportedContentType {
            content_type: "text/plain".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_disabled_returns_500() {
        let err = ActionError::Disabled {
            operation: "Delete".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_storage_returns_500() {
        let err = ActionError::Storage(StorageError::Unavailable {
            backend: "in-memory".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

// =============================================================================
// Error Response Format Tests
// =============================================================================

mod response_format_tests {
    use super::*;

    #[test]
    fn test_disabled_message_matches_form_error() {
        let err = ActionError::Disabled {
            operation: "Delete".to_string(),
        };
        let response = err.to_response();
        assert_eq!(response.code, "ACTION_DISABLED");
        assert_eq!(response.message, "Failed to Delete Invoice");
        assert!(response.details.is_none());
    }

    #[test]
    fn test_details_are_omitted_when_empty() {
        let err = ActionError::Internal("boom".to_string());
        let json = serde_json::to_value(err.to_response()).unwrap();
        assert!(json.get("details").is_none());
        assert_eq!(json["code"], "INTERNAL_ERROR");
    }

    #[test]
    fn test_into_response_sets_status() {
        let err = ActionError::Request(RequestError::InvalidBody {
            message: "EOF while parsing".to_string(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

// =============================================================================
// Conversion Tests
// =============================================================================

mod conversion_tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_category_errors_convert_into_action_error() {
        let err: ActionError = ConfigError::FileNotFound {
            path: "missing.yaml".to_string(),
        }
        .into();
        assert_eq!(err.error_code(), "CONFIG_ERROR");

        let err: ActionError = StorageError::QueryError {
            backend: "PostgreSQL".to_string(),
            message: "syntax error".to_string(),
        }
        .into();
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }

    #[test]
    fn test_source_is_the_wrapped_error() {
        let err: ActionError = RequestError::InvalidEntityId {
            id: "x".to_string(),
        }
        .into();
        assert_eq!(
            err.source().unwrap().to_string(),
            "Invalid invoice ID format: 'x'"
        );
    }

    #[test]
    fn test_storage_error_survives_anyhow() {
        let err = anyhow::Error::new(StorageError::Unavailable {
            backend: "in-memory".to_string(),
        });
        let storage = err.downcast::<StorageError>().unwrap();
        assert!(matches!(storage, StorageError::Unavailable { .. }));
    }

    #[test]
    fn test_decode_error_becomes_form_field() {
        let errors = ValidationError::Decode {
            message: "missing field `status`".to_string(),
        }
        .into_field_errors();
        assert_eq!(errors["form"], vec!["missing field `status`".to_string()]);
    }
}
