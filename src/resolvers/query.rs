use crate::spec::{ParameterLocation, ParameterSpec};
use serde_json::{json, Map, Number, Value};
use url::form_urlencoded;

/// Builds an object schema from the `in: query` parameters of one operation.
///
/// Each property keeps only the `type`, `format` and `enum` keys present on its
/// parameter. `required` is left out entirely when no query parameter is
/// required: draft 4 does not allow an empty `required` array.
pub fn resolve_query(parameters: &[&ParameterSpec]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for parameter in parameters
        .iter()
        .filter(|parameter| parameter.location == ParameterLocation::Query)
    {
        properties.insert(parameter.name.clone(), Value::Object(project(parameter)));
        if parameter.required {
            required.push(Value::String(parameter.name.clone()));
        }
    }

    let mut schema = json!({
        "type": "object",
        "properties": Value::Object(properties),
    });
    if !required.is_empty() {
        schema["required"] = Value::Array(required);
    }
    schema
}

fn project(parameter: &ParameterSpec) -> Map<String, Value> {
    let mut projected = Map::new();
    if let Some(kind) = &parameter.kind {
        projected.insert("type".to_string(), kind.clone());
    }
    if let Some(format) = &parameter.format {
        projected.insert("format".to_string(), format.clone());
    }
    if let Some(values) = &parameter.enum_values {
        projected.insert("enum".to_string(), values.clone());
    }
    projected
}

/// Parses a raw query string into a flat map of percent-decoded strings.
///
/// A leading `?` is ignored. When a key repeats, its first value is kept.
pub fn parse_query_string(raw: &str) -> Map<String, Value> {
    let raw = raw.strip_prefix('?').unwrap_or(raw);
    let mut parsed = Map::new();

    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        parsed
            .entry(key.into_owned())
            .or_insert_with(|| Value::String(value.into_owned()));
    }
    parsed
}

/// Converts string values of `integer`, `number` and `boolean` query
/// parameters into JSON scalars when the text parses as one.
pub fn coerce_scalars(query: &mut Map<String, Value>, parameters: &[&ParameterSpec]) {
    for parameter in parameters
        .iter()
        .filter(|parameter| parameter.location == ParameterLocation::Query)
    {
        let Some(kind) = parameter.kind.as_ref().and_then(Value::as_str) else {
            continue;
        };
        let Some(Value::String(text)) = query.get(&parameter.name) else {
            continue;
        };

        let coerced = match kind {
            "integer" => text.parse::<i64>().ok().map(Value::from),
            "number" => text
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number),
            "boolean" => text.parse::<bool>().ok().map(Value::Bool),
            _ => None,
        };

        if let Some(value) = coerced {
            query.insert(parameter.name.clone(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parameters() -> Vec<ParameterSpec> {
        serde_json::from_value(json!([
            {"name": "title", "in": "query", "required": true, "type": "string"},
            {"name": "limit", "in": "query", "type": "integer", "format": "int32"},
            {"name": "genre", "in": "query", "type": "string", "enum": ["fiction", "history"]},
            {"name": "isbn", "in": "path", "required": true, "type": "string"},
            {"name": "X-Trace", "in": "header", "required": true, "type": "string"}
        ]))
        .unwrap()
    }

    #[test]
    fn synthesizes_object_schema_from_query_parameters() {
        let params = parameters();
        let refs: Vec<&ParameterSpec> = params.iter().collect();

        assert_eq!(
            resolve_query(&refs),
            json!({
                "type": "object",
                "properties": {
                    "title": {"type": "string"},
                    "limit": {"type": "integer", "format": "int32"},
                    "genre": {"type": "string", "enum": ["fiction", "history"]}
                },
                "required": ["title"]
            })
        );
    }

    #[test]
    fn required_key_is_absent_without_required_parameters() {
        let params = parameters();
        let optional: Vec<&ParameterSpec> = params.iter().filter(|p| !p.required).collect();

        let schema = resolve_query(&optional);
        assert!(schema.get("required").is_none());
        assert_eq!(schema["properties"].as_object().unwrap().len(), 2);
    }

    #[test]
    fn no_query_parameters_gives_empty_properties() {
        assert_eq!(resolve_query(&[]), json!({"type": "object", "properties": {}}));
    }

    #[test]
    fn parses_and_decodes_query_strings() {
        let parsed = parse_query_string("?title=Infinite%20Jest&author=David+Foster+Wallace&title=ignored");
        assert_eq!(
            Value::Object(parsed),
            json!({"title": "Infinite Jest", "author": "David Foster Wallace"})
        );
        assert!(parse_query_string("").is_empty());
    }

    #[test]
    fn coerces_declared_scalars_only() {
        let params = parameters();
        let refs: Vec<&ParameterSpec> = params.iter().collect();
        let mut query = parse_query_string("title=1234&limit=20&genre=fiction");

        coerce_scalars(&mut query, &refs);

        assert_eq!(
            Value::Object(query),
            json!({"title": "1234", "limit": 20, "genre": "fiction"})
        );
    }

    #[test]
    fn unparseable_values_stay_strings() {
        let params = parameters();
        let refs: Vec<&ParameterSpec> = params.iter().collect();
        let mut query = parse_query_string("limit=twenty");

        coerce_scalars(&mut query, &refs);

        assert_eq!(query["limit"], json!("twenty"));
    }
}
