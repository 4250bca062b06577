//! Axum extractor for submitted forms
//!
//! [`FormInput`] accepts either a browser form submission
//! (`application/x-www-form-urlencoded`) or a JSON object, and hands the
//! action a flat field map. It only decodes the body; validation is the
//! action's job so that it can report field errors in its own result.

use super::schema::FormFields;
use crate::core::error::{ActionError, RequestError};
use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde_json::Value;

/// Decoded form fields
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_invoice(
///     State(state): State<InvoiceAppState>,
///     FormInput(fields): FormInput,
/// ) -> ActionOutcome {
///     state.actions.create_invoice(&fields).await
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormInput(pub FormFields);

impl FormInput {
    pub fn into_inner(self) -> FormFields {
        self.0
    }

    /// Build from name/value pairs; a repeated name keeps its last value
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut fields = FormFields::new();
        for (name, value) in pairs {
            fields.insert(name.into(), Value::String(value.into()));
        }
        Self(fields)
    }
}

impl std::ops::Deref for FormInput {
    type Target = FormFields;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequest<S> for FormInput
where
    S: Send + Sync,
{
    type Rejection = ActionError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs): Form<Vec<(String, String)>> = Form::from_request(req, state)
                .await
                .map_err(|e| RequestError::InvalidBody {
                    message: e.body_text(),
                })?;
            return Ok(Self::from_pairs(pairs));
        }

        if content_type.starts_with("application/json") {
            let Json(payload): Json<Value> = Json::from_request(req, state)
                .await
                .map_err(|e| RequestError::InvalidBody {
                    message: e.body_text(),
                })?;
            return match payload {
                Value::Object(fields) => Ok(Self(fields)),
                other => Err(RequestError::InvalidBody {
                    message: format!("expected a JSON object, got {}", json_kind(&other)),
                }
                .into()),
            };
        }

        Err(RequestError::UnsupportedContentType { content_type }.into())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(content_type: &str, body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/dashboard/invoices/create")
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_urlencoded_body_becomes_string_fields() {
        let req = request(
            "application/x-www-form-urlencoded",
            "customerId=c1&amount=42.5&status=pending",
        );
        let FormInput(fields) = FormInput::from_request(req, &()).await.unwrap();
        assert_eq!(fields["customerId"], "c1");
        assert_eq!(fields["amount"], "42.5");
        assert_eq!(fields["status"], "pending");
    }

    #[tokio::test]
    async fn test_repeated_field_keeps_last_value() {
        let req = request("application/x-www-form-urlencoded", "status=paid&status=pending");
        let FormInput(fields) = FormInput::from_request(req, &()).await.unwrap();
        assert_eq!(fields["status"], "pending");
    }

    #[tokio::test]
    async fn test_json_object_is_accepted() {
        let req = request("application/json", r#"{"customerId":"c1","amount":12}"#);
        let FormInput(fields) = FormInput::from_request(req, &()).await.unwrap();
        assert_eq!(fields["amount"], 12);
    }

    #[tokio::test]
    async fn test_json_array_is_rejected() {
        let req = request("application/json", "[1,2]");
        let err = FormInput::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.error_code(), "INVALID_BODY");
    }

    #[tokio::test]
    async fn test_other_content_type_is_rejected() {
        let req = request("text/plain", "customerId=c1");
        let err = FormInput::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_CONTENT_TYPE");
    }
}
