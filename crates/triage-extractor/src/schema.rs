//! Output schema derivation, caching and reshaping
//!
//! The raw schema (root `$ref` plus a `definitions` map holding every type) is
//! cached in the output directory under the primary type's name. A cached file
//! is trusted as-is: it is never compared against the current Rust type.

use crate::error::ExtractorError;
use schemars::gen::SchemaSettings;
use schemars::JsonSchema;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;
use triage_domain::JsonSchemaFormat;

/// Loads the strict output schema for a type, deriving and caching it on first use
#[derive(Debug, Clone)]
pub struct SchemaProvider {
    dir: PathBuf,
}

impl SchemaProvider {
    /// Provider caching schemas in `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Location of the cached raw schema for `T`
    pub fn cache_path<T: JsonSchema>(&self) -> PathBuf {
        self.dir.join(format!("{}.json", T::schema_name()))
    }

    /// Load the schema envelope for `T`.
    ///
    /// Reads the cache file when present, otherwise derives the schema from
    /// `T` and writes the cache before returning.
    ///
    /// # Errors
    ///
    /// `SchemaUnavailable` when the raw schema has no definitions or lacks
    /// `T`, `JsonParse` for an unreadable cache file, `Io` when the cache
    /// cannot be read or written.
    pub async fn load<T: JsonSchema>(&self) -> Result<JsonSchemaFormat, ExtractorError> {
        let primary = T::schema_name();
        let path = self.cache_path::<T>();

        let raw = if tokio::fs::try_exists(&path).await? {
            debug!("Using cached schema {}", path.display());
            let text = tokio::fs::read_to_string(&path).await?;
            serde_json::from_str(&text)?
        } else {
            let raw = derive_schema::<T>()?;
            write_cache(&path, &raw).await?;
            debug!("Derived schema for {} and cached it at {}", primary, path.display());
            raw
        };

        reshape(&raw, &primary)
    }
}

async fn write_cache(path: &Path, raw: &Value) -> Result<(), ExtractorError> {
    let text = serde_json::to_string_pretty(raw)?;
    tokio::fs::write(path, text).await?;
    Ok(())
}

/// Derive the raw strict schema for `T`: a root `$ref` to `T` and every type
/// (including `T`) under `definitions`.
pub fn derive_schema<T: JsonSchema>() -> Result<Value, ExtractorError> {
    let settings = SchemaSettings::draft07().with(|s| {
        s.inline_subschemas = false;
    });
    let meta_schema = settings.meta_schema.clone();
    let mut generator = settings.into_generator();

    let root = generator.subschema_for::<T>();
    let definitions = generator.take_definitions();
    if definitions.is_empty() {
        return Err(ExtractorError::SchemaUnavailable(format!(
            "No definitions generated for {}",
            T::schema_name()
        )));
    }

    let Value::Object(mut definitions) = serde_json::to_value(&definitions)? else {
        return Err(ExtractorError::SchemaUnavailable(format!(
            "Definitions for {} are not an object",
            T::schema_name()
        )));
    };
    definitions.values_mut().for_each(make_strict);
    let lookup = definitions.clone();
    for definition in definitions.values_mut() {
        inline_annotated_refs(definition, &lookup);
    }

    let mut raw = serde_json::to_value(&root)?;
    let Value::Object(map) = &mut raw else {
        return Err(ExtractorError::SchemaUnavailable(format!(
            "{} is not a referenceable type",
            T::schema_name()
        )));
    };
    if let Some(meta_schema) = meta_schema {
        map.insert("$schema".to_string(), Value::String(meta_schema));
    }
    map.insert("definitions".to_string(), Value::Object(definitions));

    Ok(raw)
}

// Keywords whose value is a map of subschemas, a list of subschemas, or a
// single subschema
const SCHEMA_MAP_KEYWORDS: &[&str] = &["properties", "definitions", "$defs", "patternProperties"];
const SCHEMA_LIST_KEYWORDS: &[&str] = &["allOf", "anyOf", "oneOf", "items", "prefixItems"];
const SCHEMA_KEYWORDS: &[&str] = &[
    "items",
    "additionalProperties",
    "not",
    "if",
    "then",
    "else",
    "contains",
];

/// Direct subschemas of a schema object
fn subschemas_mut(map: &mut Map<String, Value>) -> Vec<&mut Value> {
    let mut children = Vec::new();
    for (key, child) in map.iter_mut() {
        let key = key.as_str();
        if child.is_object() && SCHEMA_MAP_KEYWORDS.contains(&key) {
            if let Value::Object(schemas) = child {
                children.extend(schemas.values_mut())
            }
        } else if child.is_array() && SCHEMA_LIST_KEYWORDS.contains(&key) {
            if let Value::Array(schemas) = child {
                children.extend(schemas.iter_mut())
            }
        } else if child.is_object() && SCHEMA_KEYWORDS.contains(&key) {
            children.push(child)
        }
    }
    children
}

/// Rewrite `schema` and its subschemas for strict mode.
///
/// Objects with `properties` get `additionalProperties: false` and list every
/// property as required; optional fields stay nullable through their type.
/// Single-entry `allOf` wrappers (emitted for documented `$ref` fields) are
/// folded into their parent.
pub fn make_strict(schema: &mut Value) {
    let Value::Object(map) = schema else {
        return;
    };

    collapse_all_of(map);

    if let Some(Value::Object(properties)) = map.get("properties") {
        let required = properties
            .keys()
            .map(|key| Value::String(key.clone()))
            .collect();
        map.insert("required".to_string(), Value::Array(required));
        map.insert("additionalProperties".to_string(), Value::Bool(false));
    }

    subschemas_mut(map).into_iter().for_each(make_strict);
}

fn collapse_all_of(map: &mut Map<String, Value>) {
    let single = match map.get("allOf") {
        Some(Value::Array(items)) if items.len() == 1 => items[0].as_object().cloned(),
        _ => None,
    };
    if let Some(inner) = single {
        map.remove("allOf");
        for (key, value) in inner {
            map.entry(key).or_insert(value);
        }
    }
}

/// Replace every `$ref` that carries sibling keywords with the body of the
/// referenced definition.
///
/// Strict mode only accepts a bare `$ref`. Sibling keywords win over the
/// definition's own, so a field's `description` is kept.
pub fn inline_annotated_refs(schema: &mut Value, definitions: &Map<String, Value>) {
    let Value::Object(map) = schema else {
        return;
    };

    if map.len() > 1 {
        let target = map
            .get("$ref")
            .and_then(Value::as_str)
            .and_then(|reference| reference.strip_prefix("#/definitions/"))
            .and_then(|name| definitions.get(name))
            .and_then(Value::as_object)
            .cloned();
        if let Some(body) = target {
            map.remove("$ref");
            for (key, value) in body {
                map.entry(key).or_insert(value);
            }
        }
    }

    for child in subschemas_mut(map) {
        inline_annotated_refs(child, definitions);
    }
}

/// Turn a raw schema into the endpoint's envelope.
///
/// The primary type's definition becomes the top-level schema; the remaining
/// definitions are nested under its `definitions` key unchanged.
pub fn reshape(raw: &Value, primary: &str) -> Result<JsonSchemaFormat, ExtractorError> {
    let mut definitions = match raw.get("definitions") {
        Some(Value::Object(definitions)) if !definitions.is_empty() => definitions.clone(),
        _ => {
            return Err(ExtractorError::SchemaUnavailable(format!(
                "Schema for {} has no definitions",
                primary
            )))
        }
    };

    let body = definitions.remove(primary).ok_or_else(|| {
        ExtractorError::SchemaUnavailable(format!("{} is missing from schema definitions", primary))
    })?;
    let Value::Object(mut schema) = body else {
        return Err(ExtractorError::SchemaUnavailable(format!(
            "Definition of {} is not an object",
            primary
        )));
    };

    schema.insert("definitions".to_string(), Value::Object(definitions));

    Ok(JsonSchemaFormat {
        name: primary.to_string(),
        strict: true,
        schema: Value::Object(schema),
    })
}

#[cfg(test)]
pub(crate) fn raw_schema(primary: &str, body: Value, others: Map<String, Value>) -> Value {
    let mut definitions = others;
    definitions.insert(primary.to_string(), body);
    serde_json::json!({
        "$ref": format!("#/definitions/{}", primary),
        "definitions": definitions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;
    use triage_domain::IssueTriageMetadata;

    fn strict_objects_ok(value: &Value) -> bool {
        match value {
            Value::Object(map) => {
                if let Some(Value::Object(properties)) = map.get("properties") {
                    let required: Vec<&str> = map["required"]
                        .as_array()
                        .map(|r| r.iter().filter_map(Value::as_str).collect())
                        .unwrap_or_default();
                    if map.get("additionalProperties") != Some(&Value::Bool(false))
                        || properties.keys().any(|k| !required.contains(&k.as_str()))
                    {
                        return false;
                    }
                }
                !map.contains_key("allOf") && map.values().all(strict_objects_ok)
            }
            Value::Array(items) => items.iter().all(strict_objects_ok),
            _ => true,
        }
    }

    #[test]
    fn test_derive_puts_primary_under_definitions() {
        let raw = derive_schema::<IssueTriageMetadata>().unwrap();

        assert_eq!(raw["$ref"], "#/definitions/IssueTriageMetadata");
        let definitions = raw["definitions"].as_object().unwrap();
        for name in ["IssueTriageMetadata", "Severity", "Priority", "IssueType"] {
            assert!(definitions.contains_key(name), "missing {}", name);
        }
    }

    #[test]
    fn test_derived_schema_is_strict() {
        let raw = derive_schema::<IssueTriageMetadata>().unwrap();
        assert!(strict_objects_ok(&raw));

        let primary = &raw["definitions"]["IssueTriageMetadata"];
        let required = primary["required"].as_array().unwrap();
        assert_eq!(required.len(), 13);
        assert!(required.contains(&json!("stackTrace")));
        assert!(required.contains(&json!("suggestedTitle")));
    }

    #[test]
    fn test_optional_fields_are_nullable() {
        let raw = derive_schema::<IssueTriageMetadata>().unwrap();
        let environment = &raw["definitions"]["IssueTriageMetadata"]["properties"]["environment"];
        let types = environment["type"].as_array().unwrap();
        assert!(types.contains(&json!("null")));
    }

    fn bare_refs_only(value: &Value) -> bool {
        match value {
            Value::Object(map) => {
                (!map.contains_key("$ref") || map.len() == 1) && map.values().all(bare_refs_only)
            }
            Value::Array(items) => items.iter().all(bare_refs_only),
            _ => true,
        }
    }

    #[test]
    fn test_make_strict_folds_single_all_of() {
        let mut value = json!({
            "type": "object",
            "properties": {
                "severity": {
                    "description": "How bad",
                    "allOf": [{ "$ref": "#/definitions/Severity" }]
                },
                "nested": {
                    "type": "object",
                    "properties": { "a": { "type": "string" } },
                    "required": []
                }
            }
        });
        make_strict(&mut value);

        assert!(value["properties"]["severity"].get("allOf").is_none());
        assert_eq!(value["properties"]["nested"]["required"], json!(["a"]));
        assert_eq!(value["properties"]["nested"]["additionalProperties"], json!(false));
    }

    #[test]
    fn test_annotated_ref_is_inlined() {
        let mut definitions = Map::new();
        definitions.insert(
            "Severity".to_string(),
            json!({ "description": "Severity level", "type": "string", "enum": ["Major", "Minor"] }),
        );
        let mut value = json!({
            "type": "object",
            "properties": {
                "severity": {
                    "description": "How bad",
                    "allOf": [{ "$ref": "#/definitions/Severity" }]
                },
                "plain": { "$ref": "#/definitions/Severity" }
            }
        });

        make_strict(&mut value);
        inline_annotated_refs(&mut value, &definitions);

        assert_eq!(
            value["properties"]["severity"],
            json!({ "description": "How bad", "type": "string", "enum": ["Major", "Minor"] })
        );
        assert_eq!(value["properties"]["plain"], json!({ "$ref": "#/definitions/Severity" }));
    }

    #[test]
    fn test_derived_refs_have_no_siblings() {
        let raw = derive_schema::<IssueTriageMetadata>().unwrap();
        assert!(bare_refs_only(&raw["definitions"]));

        let format = reshape(&raw, "IssueTriageMetadata").unwrap();
        assert!(bare_refs_only(&format.schema));

        let severity = &format.schema["properties"]["severity"];
        assert_eq!(severity["type"], "string");
        assert!(severity["enum"].as_array().unwrap().contains(&json!("Critical")));
        assert!(severity["description"]
            .as_str()
            .unwrap()
            .starts_with("Severity level of the issue"));
        assert!(format.schema["properties"]["issueType"]["enum"]
            .as_array()
            .unwrap()
            .contains(&json!("Documentation")));
    }

    #[test]
    fn test_property_named_properties_is_left_alone() {
        let mut value = json!({
            "type": "object",
            "properties": {
                "properties": { "type": "string" },
                "other": {
                    "type": "object",
                    "properties": { "a": { "type": "integer" } }
                }
            }
        });

        make_strict(&mut value);

        let properties = value["properties"].as_object().unwrap();
        assert_eq!(properties.len(), 2);
        assert_eq!(properties["properties"], json!({ "type": "string" }));
        let required = value["required"].as_array().unwrap();
        assert_eq!(required.len(), 2);
        assert!(required.contains(&json!("properties")));
        assert_eq!(properties["other"]["required"], json!(["a"]));
        assert_eq!(properties["other"]["additionalProperties"], json!(false));
    }

    #[test]
    fn test_reshape_lifts_primary() {
        let mut others = Map::new();
        others.insert("Severity".to_string(), json!({ "type": "string", "enum": ["Major"] }));
        let body = json!({ "type": "object", "properties": { "severity": { "$ref": "#/definitions/Severity" } } });
        let raw = raw_schema("Report", body.clone(), others);

        let format = reshape(&raw, "Report").unwrap();

        assert_eq!(format.name, "Report");
        assert!(format.strict);
        let schema = format.schema.as_object().unwrap();
        for (key, value) in body.as_object().unwrap() {
            assert_eq!(&schema[key], value);
        }
        let definitions = schema["definitions"].as_object().unwrap();
        assert_eq!(definitions.len(), 1);
        assert!(definitions.contains_key("Severity"));
        assert!(!definitions.contains_key("Report"));
    }

    #[test]
    fn test_reshape_rejects_empty_definitions() {
        let raw = json!({ "$ref": "#/definitions/Report", "definitions": {} });
        assert!(matches!(
            reshape(&raw, "Report"),
            Err(ExtractorError::SchemaUnavailable(_))
        ));
        assert!(matches!(
            reshape(&json!({}), "Report"),
            Err(ExtractorError::SchemaUnavailable(_))
        ));
    }

    #[test]
    fn test_reshape_rejects_missing_primary() {
        let raw = raw_schema("Other", json!({ "type": "object" }), Map::new());
        assert!(matches!(
            reshape(&raw, "Report"),
            Err(ExtractorError::SchemaUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_load_derives_and_caches() {
        let dir = TempDir::new().unwrap();
        let provider = SchemaProvider::new(dir.path());
        let path = provider.cache_path::<IssueTriageMetadata>();
        assert!(path.ends_with("IssueTriageMetadata.json"));
        assert!(!path.exists());

        let format = provider.load::<IssueTriageMetadata>().await.unwrap();

        assert_eq!(format.name, "IssueTriageMetadata");
        assert_eq!(format.schema["type"], "object");
        assert!(format.schema["properties"]["developerSummary"].is_object());
        assert!(format.schema["definitions"]["Severity"].is_object());
        assert!(format.schema["definitions"].get("IssueTriageMetadata").is_none());

        let cached: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(cached, derive_schema::<IssueTriageMetadata>().unwrap());
    }

    #[tokio::test]
    async fn test_load_uses_cache_verbatim() {
        let dir = TempDir::new().unwrap();
        let provider = SchemaProvider::new(dir.path());
        let stale = raw_schema(
            "IssueTriageMetadata",
            json!({ "type": "object", "properties": { "legacy": { "type": "string" } } }),
            Map::new(),
        );
        std::fs::write(
            provider.cache_path::<IssueTriageMetadata>(),
            serde_json::to_string(&stale).unwrap(),
        )
        .unwrap();

        let format = provider.load::<IssueTriageMetadata>().await.unwrap();

        assert!(format.schema["properties"]["legacy"].is_object());
        assert!(format.schema["properties"].get("severity").is_none());
    }

    #[tokio::test]
    async fn test_load_rejects_cache_without_definitions() {
        let dir = TempDir::new().unwrap();
        let provider = SchemaProvider::new(dir.path());
        std::fs::write(provider.cache_path::<IssueTriageMetadata>(), "{}").unwrap();

        assert!(matches!(
            provider.load::<IssueTriageMetadata>().await,
            Err(ExtractorError::SchemaUnavailable(_))
        ));
    }
}
