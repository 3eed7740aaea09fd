//! Tool-call aggregation.
//!
//! Argument fragments arrive as separate upstream events keyed by the
//! provider's call id. [`ToolCallAggregator`] buffers them, and on completion
//! parses the arguments and dispatches the named tool through a
//! [`ToolRegistry`].

use chat_relay_tools::{ToolArgs, ToolRegistry};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use crate::events::TranscodeEvent;

/// In-flight tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallRecord {
    /// Provider call id.
    pub call_id: String,
    /// Tool name; a placeholder until the completion event names the tool.
    pub tool_name: String,
    /// Argument fragments concatenated in arrival order.
    pub arguments: String,
}

/// Buffers tool-call argument fragments and dispatches completed calls.
#[derive(Debug, Clone)]
pub struct ToolCallAggregator {
    registry: ToolRegistry,
    placeholder_name: String,
    calls: IndexMap<String, ToolCallRecord>,
}

impl ToolCallAggregator {
    /// Create an aggregator dispatching to `registry`.
    #[must_use]
    pub fn new(registry: ToolRegistry, placeholder_name: impl Into<String>) -> Self {
        Self {
            registry,
            placeholder_name: placeholder_name.into(),
            calls: IndexMap::new(),
        }
    }

    /// Number of calls still streaming arguments.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.calls.len()
    }

    /// Look up an in-flight call.
    #[must_use]
    pub fn record(&self, call_id: &str) -> Option<&ToolCallRecord> {
        self.calls.get(call_id)
    }

    /// Handle one argument fragment.
    pub fn on_argument_delta(&mut self, call_id: &str, delta: &str) -> Vec<TranscodeEvent> {
        let mut events = Vec::with_capacity(2);

        if !self.calls.contains_key(call_id) {
            let (record, start) = self.open(call_id);
            self.calls.insert(call_id.to_string(), record);
            events.push(start);
        }
        if let Some(record) = self.calls.get_mut(call_id) {
            record.arguments.push_str(delta);
        }

        events.push(TranscodeEvent::ToolInputDelta {
            tool_call_id: call_id.to_string(),
            input_text_delta: delta.to_string(),
        });
        events
    }

    /// Handle the completion of a call's arguments.
    ///
    /// The record is removed whatever the outcome.
    pub fn on_arguments_complete(
        &mut self,
        call_id: &str,
        tool_name: &str,
        full_arguments: &str,
    ) -> Vec<TranscodeEvent> {
        let mut events = Vec::new();

        let record = match self.calls.shift_remove(call_id) {
            Some(record) => record,
            None => {
                tracing::debug!(call_id = %call_id, "Completion for unseen tool call");
                let (record, start) = self.open(call_id);
                events.push(start);
                record
            }
        };
        let record = ToolCallRecord {
            tool_name: tool_name.to_string(),
            ..record
        };

        let source = if full_arguments.trim().is_empty() {
            record.arguments.as_str()
        } else {
            full_arguments
        };

        let args = match parse_arguments(source) {
            Ok(args) => args,
            Err(reason) => {
                tracing::warn!(
                    call_id = %call_id,
                    tool = %record.tool_name,
                    arguments = %source,
                    error = %reason,
                    "Failed to parse tool arguments"
                );
                return events;
            }
        };

        events.push(TranscodeEvent::ToolInputAvailable {
            tool_call_id: call_id.to_string(),
            tool_name: record.tool_name.clone(),
            input: JsonValue::Object(args.clone()),
        });

        if !self.registry.contains(&record.tool_name) {
            tracing::warn!(call_id = %call_id, tool = %record.tool_name, "Tool not found in registry");
            return events;
        }

        match self.registry.call(&record.tool_name, &args) {
            Ok(output) => events.push(TranscodeEvent::ToolOutputAvailable {
                tool_call_id: call_id.to_string(),
                output,
            }),
            Err(e) => {
                tracing::warn!(
                    call_id = %call_id,
                    tool = %record.tool_name,
                    error = %e,
                    "Tool execution failed"
                );
            }
        }
        events
    }

    fn open(&self, call_id: &str) -> (ToolCallRecord, TranscodeEvent) {
        let record = ToolCallRecord {
            call_id: call_id.to_string(),
            tool_name: self.placeholder_name.clone(),
            arguments: String::new(),
        };
        let start = TranscodeEvent::ToolInputStart {
            tool_call_id: call_id.to_string(),
            tool_name: self.placeholder_name.clone(),
        };
        (record, start)
    }
}

fn parse_arguments(text: &str) -> Result<ToolArgs, String> {
    match serde_json::from_str::<JsonValue>(text) {
        Ok(JsonValue::Object(map)) => Ok(map),
        Ok(other) => Err(format!("expected a JSON object, got {other}")),
        Err(e) => Err(e.to_string()),
    }
}
