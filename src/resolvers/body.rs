use crate::error::ValidationError;
use crate::request_validator::HttpMethod;
use crate::spec::{OpenApiDocument, ParameterLocation};
use serde_json::{json, Value};
use tracing::debug;

/// Returns the JSON Schema of the body parameter for `path_key` and `method`.
///
/// An operation without parameters yields `{}`, which accepts anything.
/// Parameters without one declared `in: body` are an error. The returned schema
/// is a copy of the document's fragment with the document's `definitions` set
/// on it, so `#/definitions/...` references resolve against it.
pub fn resolve_body(
    document: &OpenApiDocument,
    path_key: &str,
    method: HttpMethod,
) -> Result<Value, ValidationError> {
    let operation = document
        .operation(path_key, method)
        .ok_or_else(|| ValidationError::route_not_found(path_key, method.as_key()))?;

    if operation.parameters.is_empty() {
        debug!(path = %path_key, method = method.as_key(), "no parameters declared, nothing to validate");
        return Ok(json!({}));
    }

    let parameters = operation.resolved_parameters(document)?;
    let body = parameters
        .into_iter()
        .find(|parameter| parameter.location == ParameterLocation::Body)
        .ok_or_else(|| ValidationError::SchemaNotFound("Matching schema not found".to_string()))?;

    let mut schema = body.schema.clone().ok_or_else(|| {
        ValidationError::SchemaNotFound(format!("Body parameter '{}' has no schema", body.name))
    })?;

    if let Value::Object(fields) = &mut schema {
        fields.insert(
            "definitions".to_string(),
            Value::Object(document.definitions.clone()),
        );
    }

    debug!(path = %path_key, method = method.as_key(), parameter = %body.name, "resolved body schema");
    Ok(schema)
}
