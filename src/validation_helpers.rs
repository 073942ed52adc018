use crate::error::{ValidationError, ValidationFailure};
use crate::violation::{classify, Violation, ViolationContext};
use jsonschema::{Draft, Validator};
use serde_json::Value;

/// Compiles a schema using draft 4, the dialect of OpenAPI 2.0 schema objects.
pub fn build_validator(schema: &Value, error_context: &str) -> Result<Validator, ValidationError> {
    jsonschema::options()
        .with_draft(Draft::Draft4)
        .build(schema)
        .map_err(|e| {
            ValidationError::SchemaCompilationError(format!(
                "Failed to compile schema for {}: {}",
                error_context, e
            ))
        })
}

/// Checks `instance` and reports every violated constraint.
pub fn check_instance(
    validator: &Validator,
    schema: &Value,
    instance: &Value,
    context: ViolationContext,
) -> Result<(), ValidationError> {
    if validator.is_valid(instance) {
        return Ok(());
    }

    let violations: Vec<Violation> = validator
        .iter_errors(instance)
        .map(|e| Violation {
            kind: classify(&e.kind),
            context,
            location: format_instance_location(&e.instance_path.to_string(), context.as_str()),
            schema_path: e.schema_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    Err(ValidationError::ValidationFailed(ValidationFailure {
        context,
        violations,
        schema: schema.clone(),
    }))
}

/// Formats instance path from JSON Schema validation error
pub fn format_instance_location(instance_path: &str, prefix: &str) -> String {
    if instance_path.is_empty() {
        prefix.to_string()
    } else {
        format!("{}{}", prefix, instance_path)
    }
}
