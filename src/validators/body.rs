use crate::error::ValidationError;
use crate::validation_helpers::{build_validator, check_instance};
use crate::violation::ViolationContext;
use jsonschema::Validator;
use serde_json::Value;

/// Validator for a request body against a resolved body schema
pub struct BodyValidator {
    schema: Value,
    validator: Validator,
}

impl BodyValidator {
    pub fn new(schema: Value) -> Result<Self, ValidationError> {
        let validator = build_validator(&schema, "request body")?;
        Ok(Self { schema, validator })
    }

    /// Validates the parsed body. A missing body is checked as JSON `null`.
    pub fn validate(&self, body: Option<&Value>) -> Result<(), ValidationError> {
        let instance = body.unwrap_or(&Value::Null);
        check_instance(&self.validator, &self.schema, instance, ViolationContext::Body)
    }
}
