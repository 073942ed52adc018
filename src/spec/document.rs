use crate::request_validator::HttpMethod;
use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A parsed OpenAPI 2.0 document.
///
/// Only the parts needed to locate request schemas are modelled; anything else
/// in the source document is ignored during deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenApiDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(default, deserialize_with = "deserialize_paths")]
    pub paths: IndexMap<String, PathItem>,
    #[serde(default)]
    pub definitions: Map<String, Value>,
    /// Reusable parameters addressed by `#/parameters/{name}`.
    #[serde(default)]
    pub parameters: IndexMap<String, ParameterSpec>,
}

impl OpenApiDocument {
    /// Looks up the operation for a path-template key and method.
    pub fn operation(&self, path_key: &str, method: HttpMethod) -> Option<&OperationSpec> {
        self.paths.get(path_key)?.operation(method)
    }

    /// `basePath` with the root path `/` treated as absent.
    pub fn base_path(&self) -> Option<&str> {
        self.base_path
            .as_deref()
            .filter(|base| !base.is_empty() && *base != "/")
    }
}

/// Reads the Paths object, skipping `x-` vendor extensions.
fn deserialize_paths<'de, D>(deserializer: D) -> Result<IndexMap<String, PathItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
    raw.into_iter()
        .filter(|(key, _)| !key.starts_with("x-"))
        .map(|(key, value)| {
            let item = serde_json::from_value(value)
                .map_err(|e| D::Error::custom(format!("path '{}': {}", key, e)))?;
            Ok((key, item))
        })
        .collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<OperationSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<OperationSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<OperationSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<OperationSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<OperationSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<OperationSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<OperationSpec>,
}

impl PathItem {
    pub fn operation(&self, method: HttpMethod) -> Option<&OperationSpec> {
        match method {
            HttpMethod::GET => self.get.as_ref(),
            HttpMethod::PUT => self.put.as_ref(),
            HttpMethod::POST => self.post.as_ref(),
            HttpMethod::DELETE => self.delete.as_ref(),
            HttpMethod::OPTIONS => self.options.as_ref(),
            HttpMethod::HEAD => self.head.as_ref(),
            HttpMethod::PATCH => self.patch.as_ref(),
        }
    }

    /// Declared operations in a fixed method order.
    pub fn iter(&self) -> impl Iterator<Item = (HttpMethod, &OperationSpec)> {
        HttpMethod::ALL
            .into_iter()
            .filter_map(move |method| self.operation(method).map(|op| (method, op)))
    }
}

/// One (path, method) pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperationSpec {
    /// Absent and empty lists are equivalent.
    #[serde(default)]
    pub parameters: Vec<ReferenceOr<ParameterSpec>>,
}

/// Either an inline item or a `$ref` pointing at one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReferenceOr<T> {
    Reference {
        #[serde(rename = "$ref")]
        reference: String,
    },
    Item(T),
}

impl<T> ReferenceOr<T> {
    pub fn as_item(&self) -> Option<&T> {
        match self {
            Self::Item(item) => Some(item),
            Self::Reference { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Query,
    Body,
    Path,
    Header,
    FormData,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Body => "body",
            Self::Path => "path",
            Self::Header => "header",
            Self::FormData => "formData",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default)]
    pub required: bool,
    /// Present only on body parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Value>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Value>,
}
