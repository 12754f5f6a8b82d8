//! Composition primitives: schema merging and JSON overlay

use serde_json::Value as JsonValue;

use crate::schema::Schema;

/// Merge two schemas into a new one
///
/// The result holds every field of `base` and `extra`. When both declare the
/// same field, the descriptor from `extra` is kept, so a package-type schema
/// can override what the shared base declares.
///
/// ```
/// use artiform_core::{merge_schema, FieldSchema, Schema};
///
/// let base = Schema::new()
///     .field("key", FieldSchema::string().required())
///     .field("url", FieldSchema::string().optional());
/// let extra = Schema::new().field("url", FieldSchema::string().required());
///
/// let merged = merge_schema(&base, &extra);
/// assert_eq!(merged.len(), 2);
/// assert!(merged.get("url").unwrap().required);
/// ```
pub fn merge_schema(base: &Schema, extra: &Schema) -> Schema {
    let mut merged = base.clone();
    for (name, field) in extra.iter() {
        merged.insert(name.to_string(), field.clone());
    }
    merged
}

/// Deep merge `overlay` into `base`
///
/// - Objects: recursive merge
/// - Scalars and arrays: overlay replaces base
/// - `null` in the overlay leaves the base value untouched
pub fn deep_merge(base: &mut JsonValue, overlay: &JsonValue) {
    match (base, overlay) {
        (JsonValue::Object(base_map), JsonValue::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => {
                        base_map.insert(key.clone(), overlay_value.clone());
                    }
                }
            }
        }
        (_, JsonValue::Null) => {}
        (base, overlay) => {
            *base = overlay.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldSchema, Validator};
    use serde_json::json;

    #[test]
    fn test_merge_schema_extra_wins_and_keys_union() {
        let base = Schema::new()
            .field("key", FieldSchema::string().required())
            .field("notes", FieldSchema::string().optional())
            .field("url", FieldSchema::string().optional());
        let extra = Schema::new()
            .field(
                "url",
                FieldSchema::string().required().validate(Validator::HttpUrl),
            )
            .field("anonymous_access", FieldSchema::bool().optional());

        let merged = merge_schema(&base, &extra);

        let keys: Vec<&str> = merged.keys().collect();
        assert_eq!(keys, vec!["anonymous_access", "key", "notes", "url"]);
        assert_eq!(merged.get("url"), extra.get("url"));
        assert_eq!(merged.get("key"), base.get("key"));
        assert_eq!(merged.get("anonymous_access"), extra.get("anonymous_access"));
    }

    #[test]
    fn test_merge_schema_is_deterministic() {
        let base = Schema::new().field("a", FieldSchema::int().optional());
        let extra = Schema::new().field("b", FieldSchema::bool().optional());
        assert_eq!(merge_schema(&base, &extra), merge_schema(&base, &extra));
        // inputs are untouched
        assert_eq!(base.len(), 1);
        assert_eq!(extra.len(), 1);
    }

    #[test]
    fn test_merge_with_empty() {
        let base = Schema::new().field("a", FieldSchema::int().optional());
        assert_eq!(merge_schema(&base, &Schema::new()), base);
        assert_eq!(merge_schema(&Schema::new(), &base), base);
    }

    #[test]
    fn test_deep_merge_nested() {
        let mut base = json!({
            "rclass": "remote",
            "packageType": "cargo",
            "contentSynchronisation": { "enabled": false, "statistics": { "enabled": false } }
        });
        let overlay = json!({
            "key": "crates",
            "packageType": "cargo",
            "contentSynchronisation": { "statistics": { "enabled": true } },
            "notes": null
        });

        deep_merge(&mut base, &overlay);

        assert_eq!(base["key"], "crates");
        assert_eq!(base["rclass"], "remote");
        assert_eq!(base["contentSynchronisation"]["enabled"], false);
        assert_eq!(base["contentSynchronisation"]["statistics"]["enabled"], true);
        assert!(base.get("notes").unwrap().is_null());
    }

    #[test]
    fn test_deep_merge_null_keeps_base() {
        let mut base = json!({ "rclass": "local" });
        deep_merge(&mut base, &json!({ "rclass": null }));
        assert_eq!(base["rclass"], "local");
    }

    #[test]
    fn test_deep_merge_arrays_replace() {
        let mut base = json!({ "propertySets": ["a", "b"] });
        deep_merge(&mut base, &json!({ "propertySets": ["c"] }));
        assert_eq!(base["propertySets"], json!(["c"]));
    }
}
