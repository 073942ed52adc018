use crate::error::ValidationError;
use crate::validation_helpers::{build_validator, check_instance};
use crate::violation::ViolationContext;
use jsonschema::Validator;
use serde_json::{Map, Value};

/// Validator for parsed query parameters against a synthesized query schema
pub struct QueryValidator {
    schema: Value,
    validator: Validator,
}

impl QueryValidator {
    pub fn new(schema: Value) -> Result<Self, ValidationError> {
        let validator = build_validator(&schema, "query parameters")?;
        Ok(Self { schema, validator })
    }

    pub fn validate(&self, query: Map<String, Value>) -> Result<(), ValidationError> {
        let instance = Value::Object(query);
        check_instance(&self.validator, &self.schema, &instance, ViolationContext::Query)
    }
}
