//! How a tool is advertised to the model.
//!
//! A [`ToolDefinition`] is rendered into the Responses API `tools` array. Its
//! name is also the key the registry dispatches on when the model calls back.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Parameter schema of a function tool: a JSON Schema `object`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectJsonSchema {
    /// Always `"object"`.
    #[serde(rename = "type")]
    pub schema_type: String,

    /// Per-argument schemas, in declaration order.
    pub properties: IndexMap<String, JsonValue>,

    /// Arguments the model must supply.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    /// `additionalProperties`; strict tools need `Some(false)`.
    #[serde(
        rename = "additionalProperties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<bool>,
}

impl Default for ObjectJsonSchema {
    fn default() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: IndexMap::new(),
            required: Vec::new(),
            additional_properties: None,
        }
    }
}

impl ObjectJsonSchema {
    /// Object schema with no properties.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an argument. Redeclaring a name replaces its schema in place.
    #[must_use]
    pub fn with_property(mut self, name: &str, schema: JsonValue, required: bool) -> Self {
        self.properties.insert(name.to_string(), schema);
        if required && !self.is_required(name) {
            self.required.push(name.to_string());
        }
        self
    }

    /// Allow or forbid arguments beyond the declared ones.
    #[must_use]
    pub fn with_additional_properties(mut self, allowed: bool) -> Self {
        self.additional_properties = Some(allowed);
        self
    }

    /// Whether `name` is a required argument.
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|required| required == name)
    }
}

impl From<ObjectJsonSchema> for JsonValue {
    fn from(schema: ObjectJsonSchema) -> Self {
        serde_json::to_value(schema).unwrap_or(JsonValue::Null)
    }
}

/// A tool as the model sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Dispatch name.
    pub name: String,

    /// What the tool does, written for the model.
    pub description: String,

    /// Argument schema.
    pub parameters_json_schema: JsonValue,

    /// Ask the provider to enforce the schema exactly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

/// Wire shape of a Responses API function tool. The function fields sit flat
/// on the tool object, not under a `function` key.
#[derive(Serialize)]
struct ResponsesFunctionTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'a str,
    description: &'a str,
    parameters: &'a JsonValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    strict: Option<bool>,
}

impl ToolDefinition {
    /// Tool taking no arguments.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters_json_schema: ObjectJsonSchema::new().into(),
            strict: None,
        }
    }

    /// Replace the argument schema.
    #[must_use]
    pub fn with_parameters(mut self, schema: impl Into<JsonValue>) -> Self {
        self.parameters_json_schema = schema.into();
        self
    }

    /// Turn strict schema enforcement on or off.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }

    /// `strict`, defaulting to off.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict == Some(true)
    }

    /// Render as an entry of the Responses API `tools` array.
    #[must_use]
    pub fn to_responses_tool(&self) -> JsonValue {
        let tool = ResponsesFunctionTool {
            kind: "function",
            name: &self.name,
            description: &self.description,
            parameters: &self.parameters_json_schema,
            strict: self.strict,
        };
        serde_json::to_value(tool).unwrap_or(JsonValue::Null)
    }
}

/// The example weather tool advertised by the default prompt.
///
/// Only the definition ships here. Hosts register their own implementation
/// under the same name.
#[must_use]
pub fn get_current_weather_definition() -> ToolDefinition {
    let location = serde_json::json!({
        "type": "string",
        "description": "City and country e.g. Bogotá, Colombia",
    });

    ToolDefinition::new(
        "get_current_weather",
        "Get current temperature for a given location.",
    )
    .with_parameters(
        ObjectJsonSchema::new()
            .with_property("location", location, true)
            .with_additional_properties(false),
    )
    .with_strict(true)
}
