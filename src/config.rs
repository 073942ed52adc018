use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable selecting the OpenAPI document.
pub const SPEC_FILE_ENV: &str = "OAS_FILE";
/// Environment variable enabling query scalar coercion (`true` or `1`).
pub const COERCE_QUERY_ENV: &str = "OAS_COERCE_QUERY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    pub spec_file: PathBuf,
    /// Convert query values of `integer`, `number` and `boolean` parameters
    /// before validation instead of checking the raw strings.
    #[serde(default)]
    pub coerce_query_scalars: bool,
}

impl GuardConfig {
    pub fn new(spec_file: impl Into<PathBuf>) -> Self {
        Self {
            spec_file: spec_file.into(),
            coerce_query_scalars: false,
        }
    }

    /// `<app_root>/schemas/oas.json`
    pub fn default_spec_file(app_root: &Path) -> PathBuf {
        app_root.join("schemas").join("oas.json")
    }

    pub fn from_env(app_root: &Path) -> Self {
        Self::from_lookup(app_root, |key| std::env::var(key).ok())
    }

    fn from_lookup(app_root: &Path, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let spec_file = lookup(SPEC_FILE_ENV)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| Self::default_spec_file(app_root));

        let coerce_query_scalars = lookup(COERCE_QUERY_ENV)
            .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true"))
            .unwrap_or(false);

        Self {
            spec_file,
            coerce_query_scalars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_under_app_root() {
        let config = GuardConfig::from_lookup(Path::new("/srv/app"), lookup(&[]));
        assert_eq!(config.spec_file, PathBuf::from("/srv/app/schemas/oas.json"));
        assert!(!config.coerce_query_scalars);
    }

    #[test]
    fn environment_overrides() {
        let config = GuardConfig::from_lookup(
            Path::new("/srv/app"),
            lookup(&[(SPEC_FILE_ENV, "/etc/api/swagger.json"), (COERCE_QUERY_ENV, "TRUE")]),
        );
        assert_eq!(config.spec_file, PathBuf::from("/etc/api/swagger.json"));
        assert!(config.coerce_query_scalars);
    }

    #[test]
    fn blank_spec_file_falls_back_to_default() {
        let config = GuardConfig::from_lookup(Path::new("app"), lookup(&[(SPEC_FILE_ENV, "  ")]));
        assert_eq!(config.spec_file, Path::new("app").join("schemas").join("oas.json"));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: GuardConfig =
            serde_json::from_str(r#"{"spec_file": "schemas/oas.json"}"#).unwrap();
        assert_eq!(config, GuardConfig::new("schemas/oas.json"));
    }
}
