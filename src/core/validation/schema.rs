//! Declarative form schemas
//!
//! A [`FormSchema`] is an ordered list of [`FieldRule`]s. Each rule names a
//! form field, the filters that coerce its raw value, and the validators
//! that judge the coerced value. Running the schema yields either the
//! coerced fields or every message, grouped per field in schema order.

use super::filters;
use super::validators;
use crate::core::error::ValidationError;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Messages per field, in the order the schema declares its fields
pub type FieldErrors = IndexMap<String, Vec<String>>;

/// Submitted form fields, keyed by field name
pub type FormFields = Map<String, Value>;

type FieldFilter = Arc<dyn Fn(&str, Value) -> anyhow::Result<Value> + Send + Sync>;
type FieldValidator = Arc<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;

/// Filters and validators for one field
#[derive(Clone)]
pub struct FieldRule {
    name: String,
    filters: Vec<FieldFilter>,
    validators: Vec<FieldValidator>,
}

impl FieldRule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filters: Vec::new(),
            validators: Vec::new(),
        }
    }

    /// Append a filter; filters run in insertion order
    pub fn filter(
        mut self,
        filter: impl Fn(&str, Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    ) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    /// Append a validator; every validator runs and all messages are kept
    pub fn validate(
        mut self,
        validator: impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, raw: Value) -> Result<Value, Vec<String>> {
        let mut value = raw;
        for filter in &self.filters {
            value = filter(&self.name, value).map_err(|e| vec![e.to_string()])?;
        }

        let messages: Vec<String> = self
            .validators
            .iter()
            .filter_map(|validator| validator(&self.name, &value).err())
            .collect();

        if messages.is_empty() {
            Ok(value)
        } else {
            Err(messages)
        }
    }
}

impl std::fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRule")
            .field("name", &self.name)
            .field("filters", &self.filters.len())
            .field("validators", &self.validators.len())
            .finish()
    }
}

/// An ordered set of field rules
#[derive(Clone, Debug, Default)]
pub struct FormSchema {
    fields: Vec<FieldRule>,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, rule: FieldRule) -> Self {
        self.fields.retain(|f| f.name != rule.name);
        self.fields.push(rule);
        self
    }

    /// A copy of this schema without the named fields
    pub fn omit(&self, names: &[&str]) -> Self {
        Self {
            fields: self
                .fields
                .iter()
                .filter(|f| !names.contains(&f.name.as_str()))
                .cloned()
                .collect(),
        }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name())
    }

    /// Validate without failing hard
    ///
    /// Fields absent from the input are checked as null. Input keys the
    /// schema does not declare are dropped.
    pub fn safe_parse(&self, input: &FormFields) -> Result<FormFields, FieldErrors> {
        let mut output = FormFields::new();
        let mut errors = FieldErrors::new();

        for rule in &self.fields {
            let raw = input.get(rule.name()).cloned().unwrap_or(Value::Null);
            match rule.check(raw) {
                Ok(value) => {
                    output.insert(rule.name().to_string(), value);
                }
                Err(messages) => {
                    errors.insert(rule.name().to_string(), messages);
                }
            }
        }

        if errors.is_empty() {
            Ok(output)
        } else {
            Err(errors)
        }
    }

    /// Validate, turning field errors into a [`ValidationError`]
    pub fn parse(&self, input: &FormFields) -> Result<FormFields, ValidationError> {
        self.safe_parse(input).map_err(ValidationError::FieldErrors)
    }

    /// Validate and deserialize into a typed form
    pub fn parse_as<T: DeserializeOwned>(&self, input: &FormFields) -> Result<T, ValidationError> {
        decode(self.parse(input)?)
    }
}

/// Deserialize validated fields into a typed form
pub fn decode<T: DeserializeOwned>(fields: FormFields) -> Result<T, ValidationError> {
    serde_json::from_value(Value::Object(fields)).map_err(|e| ValidationError::Decode {
        message: e.to_string(),
    })
}

/// Largest amount, in whole units, a form may submit
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

/// The invoice schema, including the fields the store assigns
///
/// Create omits `id` and `date`; update omits `date` and takes the id from
/// the route.
pub fn invoice_schema() -> FormSchema {
    FormSchema::new()
        .field(
            FieldRule::new("id")
                .validate(validators::required("Required"))
                .validate(validators::string("Expected string")),
        )
        .field(
            FieldRule::new("customerId")
                .filter(filters::trim())
                .filter(filters::empty_as_null())
                .validate(validators::required("Please select a customer."))
                .validate(validators::string("Please select a customer.")),
        )
        .field(
            FieldRule::new("amount")
                .filter(filters::trim())
                .filter(filters::to_number())
                .validate(validators::numeric("Expected number, received nan"))
                .validate(validators::positive_amount("Please enter an amount greater than $0."))
                .validate(validators::max_value(
                    MAX_AMOUNT,
                    format!("Please enter an amount no greater than ${}.", MAX_AMOUNT),
                )),
        )
        .field(
            FieldRule::new("status")
                .filter(filters::empty_as_null())
                .validate(validators::required("Please select an invoice status."))
                .validate(validators::in_list(vec![
                    "pending".to_string(),
                    "paid".to_string(),
                ])),
        )
        .field(
            FieldRule::new("date")
                .validate(validators::required("Required"))
                .validate(validators::string("Expected string")),
        )
}

/// Schema for a create submission
pub fn create_invoice_schema() -> FormSchema {
    invoice_schema().omit(&["id", "date"])
}

/// Schema for an update submission; the caller adds the route id as `id`
pub fn update_invoice_schema() -> FormSchema {
    invoice_schema().omit(&["date"])
}
