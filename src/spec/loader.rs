use crate::error::ValidationError;
use crate::spec::document::OpenApiDocument;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Loads an OpenAPI document from a JSON file, or YAML for `.yaml`/`.yml`.
pub fn load_openapi_document(path: &Path) -> Result<OpenApiDocument, ValidationError> {
    let contents = fs::read_to_string(path).map_err(|e| {
        ValidationError::LoadError(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );

    if is_yaml {
        serde_yaml::from_str(&contents).map_err(|e| {
            ValidationError::LoadError(format!("Failed to parse {}: {}", path.display(), e))
        })
    } else {
        serde_json::from_str(&contents).map_err(|e| {
            ValidationError::LoadError(format!("Failed to parse {}: {}", path.display(), e))
        })
    }
}

/// Named OpenAPI documents held in memory.
///
/// Documents are immutable once stored and handed out behind `Arc`, so
/// concurrent requests read them without locking.
#[derive(Debug, Default, Clone)]
pub struct SchemaStore {
    documents: HashMap<String, Arc<OpenApiDocument>>,
}

impl SchemaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads one file and registers it under its file stem.
    pub fn load_file(&mut self, path: &Path) -> Result<Arc<OpenApiDocument>, ValidationError> {
        let key = document_key(path).ok_or_else(|| {
            ValidationError::LoadError(format!("Cannot derive a key from {}", path.display()))
        })?;
        let document = Arc::new(load_openapi_document(path)?);
        info!(key = %key, path = %path.display(), paths = document.paths.len(), "loaded OpenAPI document");
        self.documents.insert(key, Arc::clone(&document));
        Ok(document)
    }

    /// Loads every `*.json` file directly inside `dir`.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, ValidationError> {
        let entries = fs::read_dir(dir).map_err(|e| {
            ValidationError::LoadError(format!("Failed to read directory {}: {}", dir.display(), e))
        })?;

        let mut loaded = 0;
        for entry in entries {
            let path = entry
                .map_err(|e| ValidationError::LoadError(format!("Failed to list {}: {}", dir.display(), e)))?
                .path();

            if path.is_dir() || path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                warn!(path = %path.display(), "skipping non-JSON entry in schema directory");
                continue;
            }

            self.load_file(&path)?;
            loaded += 1;
        }

        debug!(dir = %dir.display(), loaded, "finished loading schema directory");
        Ok(loaded)
    }

    pub fn get(&self, key: &str) -> Option<Arc<OpenApiDocument>> {
        self.documents.get(key).cloned()
    }
}

/// File name up to the first `.`, so `oas.v2.json` is keyed `oas`.
fn document_key(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let key = name.split('.').next()?;
    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}
