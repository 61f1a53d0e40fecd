//! Descriptions of the rows a fetcher produces.
//!
//! Every registered schema object type carries a [`DataFormat`] so downstream
//! consumers can introspect field names and kinds without fetching anything.
//! Formats are derived from the item type's JSON schema, which keeps them in
//! lockstep with the serialized rows.

use serde::Serialize;
use serde_json::Value;

/// Field-level description of one schema object type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataFormat {
    fields: Vec<FieldFormat>,
}

/// One field of a schema object type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldFormat {
    /// Serialized field name, exactly as it appears in fetched rows.
    pub name: String,
    /// Coarse kind of the serialized value.
    pub kind: FieldKind,
    /// Whether the field is present in every row.
    pub required: bool,
}

/// Coarse classification of a serialized field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
    /// RFC 3339 timestamp carried as a string.
    Timestamp,
    Array,
    Object,
    /// Schema places no constraint on the value.
    Any,
}

impl DataFormat {
    /// Derive the format of `T` from its JSON schema.
    pub fn of<T: schemars::JsonSchema>() -> Self {
        let schema = schemars::schema_for!(T);
        Self::from_schema(schema.as_value())
    }

    /// Derive a format from an object schema.
    ///
    /// Non-object schemas (and object schemas without declared properties)
    /// yield an empty field list.
    pub fn from_schema(schema: &Value) -> Self {
        let required: Vec<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        let fields = schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|properties| {
                properties
                    .iter()
                    .map(|(name, prop)| FieldFormat {
                        name: name.clone(),
                        kind: classify(prop),
                        required: required.contains(&name.as_str()),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self { fields }
    }

    /// Fields in schema declaration order.
    pub fn fields(&self) -> &[FieldFormat] {
        &self.fields
    }

    /// Look up one field by serialized name.
    pub fn field(&self, name: &str) -> Option<&FieldFormat> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Map a property schema to a [`FieldKind`].
fn classify(prop: &Value) -> FieldKind {
    // Nested structs appear as `$ref` into `$defs`; they serialize as objects.
    if prop.get("$ref").is_some() {
        return FieldKind::Object;
    }
    // Optional nested values appear as `anyOf` with a null branch.
    if let Some(branches) = prop.get("anyOf").and_then(Value::as_array) {
        return branches
            .iter()
            .find(|branch| branch.get("type").and_then(Value::as_str) != Some("null"))
            .map(classify)
            .unwrap_or(FieldKind::Any);
    }
    match prop.get("type") {
        Some(Value::String(name)) => classify_name(name, prop),
        // Optional scalars carry `["<type>", "null"]`.
        Some(Value::Array(names)) => names
            .iter()
            .filter_map(Value::as_str)
            .find(|name| *name != "null")
            .map(|name| classify_name(name, prop))
            .unwrap_or(FieldKind::Any),
        _ => FieldKind::Any,
    }
}

fn classify_name(name: &str, prop: &Value) -> FieldKind {
    match name {
        "string" => {
            if prop.get("format").and_then(Value::as_str) == Some("date-time") {
                FieldKind::Timestamp
            } else {
                FieldKind::String
            }
        }
        "integer" => FieldKind::Integer,
        "number" => FieldKind::Number,
        "boolean" => FieldKind::Boolean,
        "array" => FieldKind::Array,
        "object" => FieldKind::Object,
        _ => FieldKind::Any,
    }
}

#[cfg(test)]
mod tests {
    use schemars::JsonSchema;
    use serde::Serialize;

    use super::*;

    #[derive(Serialize, JsonSchema)]
    #[serde(rename_all = "PascalCase")]
    struct Inner {
        code: Option<String>,
    }

    #[derive(Serialize, JsonSchema)]
    #[serde(rename_all = "PascalCase")]
    struct Record {
        name: String,
        size: u32,
        ratio: f64,
        enabled: bool,
        created_at: chrono::DateTime<chrono::Utc>,
        note: Option<String>,
        tags: Vec<String>,
        state: Option<Inner>,
    }

    #[test]
    fn derives_fields_with_serialized_names() {
        let format = DataFormat::of::<Record>();
        let names: Vec<&str> = format.fields().iter().map(|f| f.name.as_str()).collect();
        assert!(names.contains(&"Name"));
        assert!(names.contains(&"CreatedAt"));
        assert!(!names.contains(&"name"));
    }

    #[test]
    fn classifies_scalar_kinds() {
        let format = DataFormat::of::<Record>();
        assert_eq!(format.field("Name").expect("field").kind, FieldKind::String);
        assert_eq!(format.field("Size").expect("field").kind, FieldKind::Integer);
        assert_eq!(format.field("Ratio").expect("field").kind, FieldKind::Number);
        assert_eq!(
            format.field("Enabled").expect("field").kind,
            FieldKind::Boolean
        );
    }

    #[test]
    fn classifies_timestamps_arrays_and_nested_objects() {
        let format = DataFormat::of::<Record>();
        assert_eq!(
            format.field("CreatedAt").expect("field").kind,
            FieldKind::Timestamp
        );
        assert_eq!(format.field("Tags").expect("field").kind, FieldKind::Array);
        assert_eq!(format.field("State").expect("field").kind, FieldKind::Object);
    }

    #[test]
    fn optional_fields_are_not_required() {
        let format = DataFormat::of::<Record>();
        assert!(format.field("Name").expect("field").required);
        assert!(!format.field("Note").expect("field").required);
        assert_eq!(format.field("Note").expect("field").kind, FieldKind::String);
    }

    #[test]
    fn non_object_schema_yields_no_fields() {
        let format = DataFormat::from_schema(&serde_json::json!({"type": "string"}));
        assert!(format.fields().is_empty());
    }
}
