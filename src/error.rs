use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::violation::{Violation, ViolationContext};

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Failed to load OpenAPI document: {0}")]
    LoadError(String),

    #[error("No operation found for {method} {path}")]
    RouteNotFound { path: String, method: String },

    #[error("{0}")]
    SchemaNotFound(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(ValidationFailure),

    #[error("Failed to compile JSON schema: {0}")]
    SchemaCompilationError(String),
}

/// Broad grouping a host uses to pick its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request (or the route it hit) does not satisfy the document.
    Rejected,
    /// The document itself could not be turned into a validator.
    Internal,
}

impl ValidationError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SchemaCompilationError(_) => ErrorCategory::Internal,
            Self::LoadError(_)
            | Self::RouteNotFound { .. }
            | Self::SchemaNotFound(_)
            | Self::ValidationFailed(_) => ErrorCategory::Rejected,
        }
    }

    pub fn route_not_found(path: &str, method: &str) -> Self {
        Self::RouteNotFound {
            path: path.to_string(),
            method: method.to_string(),
        }
    }
}

/// Request data that violated a resolved or synthesized schema.
#[derive(Debug, Clone)]
pub struct ValidationFailure {
    pub context: ViolationContext,
    pub violations: Vec<Violation>,
    /// The schema the request data was checked against.
    pub schema: Value,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.violations.iter().map(|v| v.to_string()).collect();
        write!(f, "{}", rendered.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::ViolationKind;
    use serde_json::json;

    #[test]
    fn compilation_errors_are_internal() {
        let err = ValidationError::SchemaCompilationError("bad".into());
        assert_eq!(err.category(), ErrorCategory::Internal);
    }

    #[test]
    fn spec_level_errors_are_rejections() {
        let errors = [
            ValidationError::LoadError("missing".into()),
            ValidationError::route_not_found("/nope", "get"),
            ValidationError::SchemaNotFound("Matching schema not found".into()),
        ];
        for err in errors {
            assert_eq!(err.category(), ErrorCategory::Rejected);
        }
    }

    #[test]
    fn failure_message_joins_violations() {
        let failure = ValidationFailure {
            context: ViolationContext::Body,
            violations: vec![
                Violation {
                    kind: ViolationKind::MissingRequired,
                    context: ViolationContext::Body,
                    location: "body".into(),
                    schema_path: "/required".into(),
                    message: "\"author\" is a required property".into(),
                },
                Violation {
                    kind: ViolationKind::TypeMismatch,
                    context: ViolationContext::Body,
                    location: "body/title".into(),
                    schema_path: "/properties/title/type".into(),
                    message: "1 is not of type \"string\"".into(),
                },
            ],
            schema: json!({}),
        };
        let err = ValidationError::ValidationFailed(failure);
        assert_eq!(
            err.to_string(),
            "Validation failed: [BODY_MISSING_REQUIRED] at body - \"author\" is a required property; \
             [BODY_TYPE_MISMATCH] at body/title - 1 is not of type \"string\""
        );
    }
}
