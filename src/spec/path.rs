use crate::spec::document::OpenApiDocument;
use matchit::Router;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Turns a server route template into the key used in the document's `paths`.
///
/// Placeholders written `<name>` or `<converter:name>` and whole segments
/// written `:name` become `{name}`; literal text is kept as is. A non-empty
/// `base_path` is then stripped once if the template starts with it on a
/// segment boundary. Templates mounted outside the base path are returned
/// unmodified.
pub fn resolve_key(route_template: &str, base_path: Option<&str>) -> String {
    let converted = convert_placeholders(route_template);
    strip_base_path(&converted, base_path)
}

fn convert_placeholders(template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('<') {
        let Some(len) = rest[open..].find('>') else {
            break;
        };
        let close = open + len;
        let inner = &rest[open + 1..close];
        let name = inner.rsplit_once(':').map_or(inner, |(_, name)| name).trim();

        out.push_str(&rest[..open]);
        out.push('{');
        out.push_str(name);
        out.push('}');
        rest = &rest[close + 1..];
    }
    out.push_str(rest);

    out.split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) if !name.is_empty() => format!("{{{}}}", name),
            _ => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn strip_base_path(template: &str, base_path: Option<&str>) -> String {
    let base = match base_path.map(|base| base.trim_end_matches('/')) {
        Some(base) if !base.is_empty() => base,
        _ => return template.to_string(),
    };

    match template.strip_prefix(base) {
        Some("") => "/".to_string(),
        Some(remainder) if remainder.starts_with('/') => remainder.to_string(),
        _ => template.to_string(),
    }
}

/// A concrete URI matched to one of the document's path templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatch {
    pub key: String,
    pub params: HashMap<String, String>,
}

/// Router over a document's path templates, for hosts that only see the
/// concrete request path.
pub struct PathIndex {
    router: Router<String>,
    base_path: Option<String>,
}

impl PathIndex {
    pub fn new(document: &OpenApiDocument) -> Self {
        let mut router = Router::new();

        for key in document.paths.keys() {
            if let Err(e) = router.insert(key.as_str(), key.clone()) {
                warn!(path = %key, error = %e, "path template cannot be routed, skipping");
            }
        }

        Self {
            router,
            base_path: document.base_path().map(str::to_string),
        }
    }

    /// Finds the template matching `uri`. Any query string is ignored.
    pub fn find(&self, uri: &str) -> Option<PathMatch> {
        let path = uri.split_once('?').map_or(uri, |(path, _)| path);
        let path = strip_base_path(path, self.base_path.as_deref());

        let matched = self.router.at(&path).ok()?;
        let params = matched
            .params
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        debug!(uri = %uri, key = %matched.value, "matched request path");
        Some(PathMatch {
            key: matched.value.clone(),
            params,
        })
    }
}
