//! What an invoice action reports back to the form that invoked it

use crate::core::validation::FieldErrors;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::{Deserialize, Serialize};

/// State handed back to the form after a failed submission
///
/// `errors` carries per-field messages when validation failed; `message`
/// is a fixed summary that never includes backend details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionState {
    pub fn invalid(errors: FieldErrors, message: impl Into<String>) -> Self {
        Self {
            errors: Some(errors),
            message: Some(message.into()),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            errors: None,
            message: Some(message.into()),
        }
    }

    /// Messages for one field, empty when the field passed
    pub fn field_errors(&self, field: &str) -> &[String] {
        self.errors
            .as_ref()
            .and_then(|errors| errors.get(field))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Result of running an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The write happened; navigate to `location`
    Redirect { location: String },
    /// The write happened; stay where you are
    Completed,
    /// Input was rejected before any write
    Invalid(ActionState),
    /// The store failed; nothing was written
    Failed(ActionState),
}

impl ActionOutcome {
    pub fn redirect(location: impl Into<String>) -> Self {
        ActionOutcome::Redirect {
            location: location.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ActionOutcome::Redirect { .. } | ActionOutcome::Completed
        )
    }

    /// The state to re-render the form with, if the action failed
    pub fn state(&self) -> Option<&ActionState> {
        match self {
            ActionOutcome::Invalid(state) | ActionOutcome::Failed(state) => Some(state),
            _ => None,
        }
    }
}

impl IntoResponse for ActionOutcome {
    fn into_response(self) -> Response {
        match self {
            ActionOutcome::Redirect { location } => Redirect::to(&location).into_response(),
            ActionOutcome::Completed => StatusCode::NO_CONTENT.into_response(),
            ActionOutcome::Invalid(state) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(state)).into_response()
            }
            ActionOutcome::Failed(state) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(state)).into_response()
            }
        }
    }
}
