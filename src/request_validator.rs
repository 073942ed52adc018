use crate::config::GuardConfig;
use crate::error::ValidationError;
use crate::resolvers::{coerce_scalars, parse_query_string};
use crate::spec::{
    build_operation_map, resolve_key, BodyCheck, OpenApiDocument, OperationMap,
    OperationValidator, ParameterLocation, ParameterSpec, PathIndex, PathMatch, SchemaStore,
};
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// HTTP methods an OpenAPI 2.0 path item can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    GET,
    PUT,
    POST,
    DELETE,
    OPTIONS,
    HEAD,
    PATCH,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        Self::GET,
        Self::PUT,
        Self::POST,
        Self::DELETE,
        Self::OPTIONS,
        Self::HEAD,
        Self::PATCH,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GET => "GET",
            Self::PUT => "PUT",
            Self::POST => "POST",
            Self::DELETE => "DELETE",
            Self::OPTIONS => "OPTIONS",
            Self::HEAD => "HEAD",
            Self::PATCH => "PATCH",
        }
    }

    /// Lower-case name used as the key inside a path item.
    pub fn as_key(&self) -> &'static str {
        match self {
            Self::GET => "get",
            Self::PUT => "put",
            Self::POST => "post",
            Self::DELETE => "delete",
            Self::OPTIONS => "options",
            Self::HEAD => "head",
            Self::PATCH => "patch",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Self::GET),
            "PUT" => Ok(Self::PUT),
            "POST" => Ok(Self::POST),
            "DELETE" => Ok(Self::DELETE),
            "OPTIONS" => Ok(Self::OPTIONS),
            "HEAD" => Ok(Self::HEAD),
            "PATCH" => Ok(Self::PATCH),
            _ => Err(()),
        }
    }
}

/// What the validator needs to know about one inbound request.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    pub method: &'a str,
    /// Matched route template, e.g. `/books/<isbn>`.
    pub route: &'a str,
    /// Raw query string, with or without the leading `?`.
    pub query: &'a str,
    pub body: Option<&'a Value>,
}

impl<'a> RequestContext<'a> {
    pub fn new(method: &'a str, route: &'a str) -> Self {
        Self {
            method,
            route,
            query: "",
            body: None,
        }
    }

    pub fn with_query(mut self, query: &'a str) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: &'a Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Validates requests against one shared OpenAPI document.
///
/// Every operation's schemas are compiled once at construction. The document
/// and the compiled validators are read-only afterwards, so a single
/// validator can serve concurrent requests.
pub struct RequestValidator {
    document: Arc<OpenApiDocument>,
    operations: HashMap<String, OperationMap>,
    index: PathIndex,
    coerce_query_scalars: bool,
}

impl RequestValidator {
    pub fn new(document: Arc<OpenApiDocument>) -> Result<Self, ValidationError> {
        let operations = build_operation_map(&document)?;
        let index = PathIndex::new(&document);
        Ok(Self {
            document,
            operations,
            index,
            coerce_query_scalars: false,
        })
    }

    /// Loads the configured document and applies the configured options.
    pub fn from_config(config: &GuardConfig) -> Result<Self, ValidationError> {
        let document = SchemaStore::new().load_file(&config.spec_file)?;
        Ok(Self::new(document)?.with_query_coercion(config.coerce_query_scalars))
    }

    pub fn with_query_coercion(mut self, enabled: bool) -> Self {
        self.coerce_query_scalars = enabled;
        self
    }

    pub fn document(&self) -> &OpenApiDocument {
        &self.document
    }

    /// Path-template key for a server route template.
    pub fn path_key(&self, route: &str) -> String {
        resolve_key(route, self.document.base_path())
    }

    /// Finds the path template a concrete request URI belongs to.
    pub fn match_uri(&self, uri: &str) -> Option<PathMatch> {
        self.index.find(uri)
    }

    /// Validates a request identified by its server route template.
    pub fn validate(&self, request: &RequestContext<'_>) -> Result<(), ValidationError> {
        let path_key = self.path_key(request.route);
        debug!(route = %request.route, path = %path_key, "resolved path key");
        self.validate_key(&path_key, request.method, request.query, request.body)
    }

    /// Validates a request whose document path key is already known, such as
    /// the key returned by [`match_uri`](Self::match_uri).
    ///
    /// GET requests check the query string when query parameters are declared,
    /// then the body when a body parameter is declared; a query failure stops
    /// there. Every other method checks the body.
    pub fn validate_key(
        &self,
        path_key: &str,
        method: &str,
        query: &str,
        body: Option<&Value>,
    ) -> Result<(), ValidationError> {
        let method = HttpMethod::from_str(method)
            .map_err(|_| ValidationError::route_not_found(path_key, &method.to_lowercase()))?;
        let operation = self
            .operations
            .get(path_key)
            .and_then(|by_method| by_method.get(&method))
            .ok_or_else(|| ValidationError::route_not_found(path_key, method.as_key()))?;

        if method != HttpMethod::GET {
            return check_body(operation, path_key, body);
        }

        if let Some(validator) = &operation.query {
            let mut parsed = parse_query_string(query);
            if self.coerce_query_scalars {
                let parameters: Vec<&ParameterSpec> = operation.query_parameters.iter().collect();
                coerce_scalars(&mut parsed, &parameters);
            }
            debug!(path = %path_key, "validating query parameters");
            validator.validate(parsed)?;
        }

        if operation.locations.contains(&ParameterLocation::Body) {
            check_body(operation, path_key, body)?;
        }

        Ok(())
    }

    /// Runs `handler` only when the request validates.
    pub fn guard<T>(
        &self,
        request: &RequestContext<'_>,
        handler: impl FnOnce() -> T,
    ) -> Result<T, ValidationError> {
        if let Err(e) = self.validate(request) {
            debug!(method = %request.method, route = %request.route, error = %e, "request rejected");
            return Err(e);
        }
        Ok(handler())
    }
}

fn check_body(
    operation: &OperationValidator,
    path_key: &str,
    body: Option<&Value>,
) -> Result<(), ValidationError> {
    match &operation.body {
        BodyCheck::Schema(validator) => {
            debug!(path = %path_key, "validating request body");
            validator.validate(body)
        }
        BodyCheck::NotFound(message) => Err(ValidationError::SchemaNotFound(message.clone())),
    }
}
