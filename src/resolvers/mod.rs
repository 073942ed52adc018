//! Extraction of request schemas from an OpenAPI document.
//!
//! Both resolvers return freshly built `serde_json::Value`s; the shared
//! document is never modified.

pub mod body;
pub mod query;

pub use body::resolve_body;
pub use query::{coerce_scalars, parse_query_string, resolve_query};
