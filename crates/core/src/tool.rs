//! Tool schemas and the read-only tool catalog.
//!
//! A tool schema follows the JSON-schema shape the model providers expect:
//! `{name, description, parameters: {type, properties, required}}`.
//! Property order is preserved because the structured-output assembler asks
//! one question per field, in declaration order.

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Specification of a single parameter field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// JSON type of the field (informational; answers are always text).
    #[serde(rename = "type", default = "default_field_type")]
    pub kind: String,

    /// Natural-language description, used as the question text.
    #[serde(default)]
    pub description: String,

    /// Closed set of allowed answers, in order.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

fn default_field_type() -> String {
    "string".into()
}

impl FieldSpec {
    /// An open text field.
    pub fn text(description: impl Into<String>) -> Self {
        Self {
            kind: default_field_type(),
            description: description.into(),
            options: None,
        }
    }

    /// A field restricted to the given options.
    pub fn choice<I, S>(description: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: default_field_type(),
            description: description.into(),
            options: Some(options.into_iter().map(Into::into).collect()),
        }
    }
}

/// Ordered field-name → spec mapping.
///
/// Serialized as a plain JSON object. Deserializing from text keeps document
/// order; going through an intermediate `serde_json::Value` does not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap(Vec<(String, FieldSpec)>);

impl FieldMap {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a field, replacing the spec in place if the name already exists.
    pub fn insert(&mut self, name: impl Into<String>, spec: FieldSpec) {
        let name = name.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = spec,
            None => self.0.push((name, spec)),
        }
    }

    /// Builder form of [`FieldMap::insert`].
    pub fn with(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.insert(name, spec);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.0.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, spec) in &self.0 {
            map.serialize_entry(name, spec)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FieldMapVisitor)
    }
}

struct FieldMapVisitor;

impl<'de> Visitor<'de> for FieldMapVisitor {
    type Value = FieldMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of field names to field specs")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FieldMap, A::Error> {
        let mut fields: Vec<(String, FieldSpec)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, spec)) = access.next_entry::<String, FieldSpec>()? {
            if fields.iter().any(|(n, _)| *n == name) {
                return Err(de::Error::custom(format!("duplicate field `{name}`")));
            }
            fields.push((name, spec));
        }
        Ok(FieldMap(fields))
    }
}

/// The `parameters` object of a tool schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    #[serde(rename = "type", default = "default_parameters_type")]
    pub kind: String,

    #[serde(default)]
    pub properties: FieldMap,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

fn default_parameters_type() -> String {
    "object".into()
}

impl Default for ParameterSchema {
    fn default() -> Self {
        Self {
            kind: default_parameters_type(),
            properties: FieldMap::new(),
            required: Vec::new(),
        }
    }
}

/// A callable tool as described to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    /// The unique tool name (e.g., "get_weather")
    pub name: String,

    /// What the tool does
    #[serde(default)]
    pub description: String,

    /// Parameter fields, in declaration order
    #[serde(default)]
    pub parameters: ParameterSchema,
}

impl ToolSchema {
    pub fn new(name: impl Into<String>, description: impl Into<String>, properties: FieldMap) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: ParameterSchema {
                properties,
                ..ParameterSchema::default()
            },
        }
    }

    /// Shortcut to the declared fields.
    pub fn fields(&self) -> &FieldMap {
        &self.parameters.properties
    }
}

/// The configured set of tools, in catalog order. Read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolCatalog {
    schemas: Vec<ToolSchema>,
}

impl ToolCatalog {
    pub fn new(schemas: Vec<ToolSchema>) -> Self {
        Self { schemas }
    }

    pub fn get(&self, name: &str) -> Option<&ToolSchema> {
        self.schemas.iter().find(|s| s.name == name)
    }

    /// Tool names in catalog order.
    pub fn names(&self) -> Vec<&str> {
        self.schemas.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn schemas(&self) -> &[ToolSchema] {
        &self.schemas
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
