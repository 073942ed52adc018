pub mod config;
pub mod error;
pub mod request_validator;
pub mod resolvers;
pub mod spec;
pub mod validation_helpers;
pub mod validators;
pub mod violation;

pub use config::GuardConfig;
pub use error::{ErrorCategory, ValidationError, ValidationFailure};
pub use request_validator::{HttpMethod, RequestContext, RequestValidator};
pub use resolvers::{parse_query_string, resolve_body, resolve_query};
pub use spec::{
    load_openapi_document, resolve_key, OpenApiDocument, ParameterLocation, ParameterSpec,
    PathIndex, ResolveReference, SchemaStore,
};
pub use validators::{BodyValidator, QueryValidator};
pub use violation::{Violation, ViolationContext, ViolationKind};
