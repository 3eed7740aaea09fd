//! Tool registry: the name → tool dispatch table.
//!
//! The registry is built once per host and shared (cheaply cloned) into every
//! transcoder. Registration order is preserved so tool definitions are sent to
//! the model in a stable order.

use indexmap::IndexMap;
use std::sync::Arc;

use crate::{
    definition::ToolDefinition,
    errors::ToolError,
    tool::{Tool, ToolArgs, ToolResult},
};

/// Registry of tools the model may call.
///
/// # Example
///
/// ```rust
/// use chat_relay_tools::{get_current_weather_definition, FunctionTool, ToolRegistry};
/// use serde_json::json;
///
/// let mut registry = ToolRegistry::new();
/// registry.register(FunctionTool::from_definition(
///     get_current_weather_definition(),
///     |_args| Ok(json!({"temperature": 21})),
/// ));
///
/// assert!(registry.contains("get_current_weather"));
/// assert_eq!(registry.definitions().len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: IndexMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool under its definition name.
    ///
    /// # Panics
    ///
    /// Panics if the name is taken. Use [`register_replace`](Self::register_replace)
    /// to overwrite.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> &mut Self {
        let name = tool.name();
        assert!(
            !self.contains(&name),
            "Tool '{name}' is already registered"
        );
        self.register_boxed(Arc::new(tool))
    }

    /// Add a tool, overwriting any tool with the same name in place.
    pub fn register_replace<T: Tool + 'static>(&mut self, tool: T) -> &mut Self {
        self.register_boxed(Arc::new(tool))
    }

    /// Add an already shared tool, overwriting on name clash.
    pub fn register_boxed(&mut self, tool: Arc<dyn Tool>) -> &mut Self {
        self.tools.insert(tool.name(), tool);
        self
    }

    /// Remove a tool, keeping the order of the rest.
    pub fn unregister(&mut self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.shift_remove(name)
    }

    /// Definitions of every tool, in registration order.
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|tool| tool.definition()).collect()
    }

    /// Dispatch a call.
    ///
    /// # Errors
    ///
    /// [`ToolError::NotFound`] for an unknown name, otherwise whatever the
    /// tool returns.
    pub fn call(&self, name: &str, args: &ToolArgs) -> ToolResult {
        let Some(tool) = self.tools.get(name) else {
            return Err(ToolError::not_found(name));
        };
        tracing::debug!(tool = %name, "Invoking tool");
        tool.call(args)
    }

    /// Whether `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Number of tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// True when no tool is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Registered names, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.tools.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::get_current_weather_definition;
    use crate::tool::FunctionTool;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    struct Weather {
        celsius: f64,
    }

    impl Tool for Weather {
        fn definition(&self) -> ToolDefinition {
            get_current_weather_definition()
        }

        fn call(&self, args: &ToolArgs) -> ToolResult {
            let location = args
                .get("location")
                .and_then(Value::as_str)
                .ok_or_else(|| ToolError::invalid_args("location is required"))?;
            Ok(json!({"location": location, "temperature": self.celsius}))
        }
    }

    fn lookup() -> FunctionTool<impl Fn(&ToolArgs) -> ToolResult + Send + Sync> {
        FunctionTool::new("lookup_citation", "Resolve a citation number", |args: &ToolArgs| {
            Ok(args.get("number").cloned().unwrap_or(Value::Null))
        })
    }

    fn args(value: Value) -> ToolArgs {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_dispatch_by_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Weather { celsius: 18.5 }).register(lookup());

        let weather = registry
            .call("get_current_weather", &args(json!({"location": "Lima, Peru"})))
            .unwrap();
        assert_eq!(weather, json!({"location": "Lima, Peru", "temperature": 18.5}));

        let number = registry
            .call("lookup_citation", &args(json!({"number": 2})))
            .unwrap();
        assert_eq!(number, json!(2));
    }

    #[test]
    fn test_unknown_and_failing_tools() {
        let mut registry = ToolRegistry::new();
        registry.register(Weather { celsius: 0.0 });

        assert!(matches!(
            registry.call("get_stock_price", &ToolArgs::new()),
            Err(ToolError::NotFound(name)) if name == "get_stock_price"
        ));
        assert!(matches!(
            registry.call("get_current_weather", &ToolArgs::new()),
            Err(ToolError::InvalidArguments(_))
        ));
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_name_panics() {
        let mut registry = ToolRegistry::new();
        registry.register(Weather { celsius: 1.0 });
        registry.register(Weather { celsius: 2.0 });
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut registry = ToolRegistry::new();
        registry.register(Weather { celsius: 1.0 }).register(lookup());
        registry.register_replace(Weather { celsius: 30.0 });

        assert_eq!(registry.names(), vec!["get_current_weather", "lookup_citation"]);
        let out = registry
            .call("get_current_weather", &args(json!({"location": "Quito"})))
            .unwrap();
        assert_eq!(out["temperature"], 30.0);
    }

    #[test]
    fn test_definitions_follow_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register(lookup()).register(Weather { celsius: 1.0 });
        assert!(registry.unregister("lookup_citation").is_some());
        registry.register(lookup());

        let names: Vec<String> = registry.definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["get_current_weather", "lookup_citation"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_clones_share_tools() {
        let mut registry = ToolRegistry::new();
        registry.register(lookup());
        let cloned = registry.clone();

        assert!(cloned.contains("lookup_citation"));
        assert!(Arc::ptr_eq(
            &registry.tools["lookup_citation"],
            &cloned.tools["lookup_citation"]
        ));
        assert_eq!(format!("{cloned:?}"), "[\"lookup_citation\"]");
    }
}
