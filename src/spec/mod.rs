pub mod builder;
pub mod document;
pub mod loader;
pub mod path;
pub mod reference_resolver;

pub use builder::{build_operation_map, BodyCheck, OperationMap, OperationValidator};
pub use document::{
    OpenApiDocument, OperationSpec, ParameterLocation, ParameterSpec, PathItem, ReferenceOr,
};
pub use loader::{load_openapi_document, SchemaStore};
pub use path::{resolve_key, PathIndex, PathMatch};
pub use reference_resolver::ResolveReference;
