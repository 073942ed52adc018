use crate::error::ValidationError;
use crate::request_validator::HttpMethod;
use crate::resolvers::{resolve_body, resolve_query};
use crate::spec::document::{OpenApiDocument, ParameterLocation, ParameterSpec};
use crate::validators::{BodyValidator, QueryValidator};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

/// What a request body is checked against for one operation.
pub enum BodyCheck {
    Schema(BodyValidator),
    /// Parameters are declared but none is `in: body`.
    NotFound(String),
}

/// Compiled validators for a single operation (path key + method)
pub struct OperationValidator {
    pub locations: BTreeSet<ParameterLocation>,
    /// Query parameters kept for scalar coercion.
    pub query_parameters: Vec<ParameterSpec>,
    /// Present when the operation declares at least one query parameter.
    pub query: Option<QueryValidator>,
    pub body: BodyCheck,
}

/// Map of HTTP methods to their operation validators
pub type OperationMap = HashMap<HttpMethod, OperationValidator>;

/// Compiles every operation of the document, keyed by path-template key.
///
/// Any schema that fails to compile fails the whole build, so a broken
/// document is caught before the first request.
pub fn build_operation_map(
    document: &OpenApiDocument,
) -> Result<HashMap<String, OperationMap>, ValidationError> {
    let mut operations = HashMap::new();
    let mut total = 0;

    for (path, item) in &document.paths {
        let mut by_method = OperationMap::new();
        for (method, _) in item.iter() {
            let validator = build_operation_validator(document, path, method)?;
            by_method.insert(method, validator);
            total += 1;
        }
        operations.insert(path.clone(), by_method);
    }

    info!(operations = total, "compiled request validators");
    Ok(operations)
}

fn build_operation_validator(
    document: &OpenApiDocument,
    path: &str,
    method: HttpMethod,
) -> Result<OperationValidator, ValidationError> {
    let parameters = document
        .operation(path, method)
        .ok_or_else(|| ValidationError::route_not_found(path, method.as_key()))?
        .resolved_parameters(document)?;

    let locations: BTreeSet<ParameterLocation> =
        parameters.iter().map(|parameter| parameter.location).collect();

    let query = if locations.contains(&ParameterLocation::Query) {
        Some(QueryValidator::new(resolve_query(&parameters))?)
    } else {
        None
    };

    let body = match resolve_body(document, path, method) {
        Ok(schema) => BodyCheck::Schema(BodyValidator::new(schema)?),
        Err(ValidationError::SchemaNotFound(message)) => BodyCheck::NotFound(message),
        Err(e) => return Err(e),
    };

    let query_parameters = parameters
        .into_iter()
        .filter(|parameter| parameter.location == ParameterLocation::Query)
        .cloned()
        .collect();

    debug!(path = %path, method = method.as_key(), "compiled operation validator");
    Ok(OperationValidator {
        locations,
        query_parameters,
        query,
        body,
    })
}
