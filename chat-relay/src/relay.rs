//! End-to-end relay: UI messages in, encoded frames out.

use bytes::Bytes;
use chat_relay_core::{to_provider_input, RelayError, RelayResult, UiMessage};
use chat_relay_streaming::{RelayStreamExt, StreamResult, Transcoder};
use chat_relay_tools::ToolRegistry;
use chat_relay_ui::{TextStream, UiMessageStream, UI_MESSAGE_STREAM_HEADERS};
use futures::Stream;
use std::pin::Pin;

use crate::client::{ResponsesBackend, ResponsesRequest};
use crate::config::{Protocol, RelayConfig};

/// Boxed stream of response body chunks.
pub type FrameStream = Pin<Box<dyn Stream<Item = StreamResult<Bytes>> + Send>>;

/// Response headers for the given protocol.
pub fn response_headers(protocol: Protocol) -> &'static [(&'static str, &'static str)] {
    match protocol {
        Protocol::Data => UI_MESSAGE_STREAM_HEADERS,
        Protocol::Text => &[("content-type", "text/plain; charset=utf-8")],
    }
}

/// Build the provider request for a conversation.
///
/// Every tool in `registry` is declared, plus `web_search` when search is on.
pub fn build_request(
    messages: &[UiMessage],
    registry: &ToolRegistry,
    config: &RelayConfig,
) -> ResponsesRequest {
    let input = to_provider_input(messages, &config.request_options());
    let request = ResponsesRequest::new(&config.model, input).with_tools(&registry.definitions());
    if config.search {
        request.with_web_search()
    } else {
        request
    }
}

/// Relay a conversation through `backend` and encode the output.
///
/// The transcoder config is validated before the provider is contacted.
/// Dropping the returned stream drops the upstream connection with it.
///
/// # Errors
///
/// Returns [`RelayError::Config`] for an invalid transcoder config, or the
/// backend's error if the stream cannot be opened.
pub async fn relay<B>(
    backend: &B,
    messages: &[UiMessage],
    registry: ToolRegistry,
    config: &RelayConfig,
) -> RelayResult<FrameStream>
where
    B: ResponsesBackend + ?Sized,
{
    let request = build_request(messages, &registry, config);

    match config.protocol {
        Protocol::Data => {
            let transcoder = Transcoder::with_config(registry, &config.transcoder)
                .map_err(|e| RelayError::config(e.to_string()))?;
            let upstream = backend.stream(&request).await?;
            tracing::debug!(messages = messages.len(), "Relaying as UI message stream");
            Ok(Box::pin(UiMessageStream::new(upstream.transcode(transcoder))))
        }
        Protocol::Text => {
            let upstream = backend.stream(&request).await?;
            tracing::debug!(messages = messages.len(), "Relaying as plain text");
            Ok(Box::pin(TextStream::new(upstream)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::UpstreamStream;
    use async_trait::async_trait;
    use chat_relay_core::{Role, UiPart, UpstreamEvent};
    use chat_relay_streaming::{MarkerSet, StreamError, TranscoderConfig};
    use chat_relay_tools::{get_current_weather_definition, FunctionTool};
    use futures::{stream, StreamExt};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Replays canned events and records the last request.
    struct Replay {
        events: Vec<StreamResult<UpstreamEvent>>,
        seen: Mutex<Option<ResponsesRequest>>,
    }

    impl Replay {
        fn new(events: Vec<StreamResult<UpstreamEvent>>) -> Self {
            Self {
                events,
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl ResponsesBackend for Replay {
        async fn stream(&self, request: &ResponsesRequest) -> RelayResult<UpstreamStream> {
            *self.seen.lock().unwrap() = Some(request.clone());
            let events: Vec<_> = self
                .events
                .iter()
                .map(|event| match event {
                    Ok(event) => Ok(event.clone()),
                    Err(e) => Err(StreamError::Connection(e.to_string())),
                })
                .collect();
            Ok(Box::pin(stream::iter(events)))
        }
    }

    fn weather_registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(FunctionTool::from_definition(
            get_current_weather_definition(),
            |args: &chat_relay_tools::ToolArgs| Ok(json!({"location": args["location"], "temperature": 21})),
        ));
        registry
    }

    fn messages() -> Vec<UiMessage> {
        vec![UiMessage::new(Role::User, vec![UiPart::text("Weather in Lima?")])]
    }

    async fn body(stream: FrameStream) -> String {
        let bytes: Vec<u8> = stream
            .map(|chunk| chunk.unwrap().to_vec())
            .concat()
            .await;
        String::from_utf8(bytes).unwrap()
    }

    fn payloads(body: &str) -> Vec<Value> {
        body.split("\n\n")
            .filter_map(|frame| frame.strip_prefix("data: "))
            .filter(|payload| *payload != "[DONE]")
            .map(|payload| serde_json::from_str(payload).unwrap())
            .collect()
    }

    #[test]
    fn test_build_request() {
        let config = RelayConfig::new().with_search(true).with_reasoning(true);
        let request = build_request(&messages(), &weather_registry(), &config);

        assert_eq!(request.model, "gpt-5-nano");
        assert_eq!(request.tools.len(), 2);
        assert_eq!(request.tools[1], json!({"type": "web_search"}));
        assert_eq!(request.input.len(), 2);
        assert_eq!(request.input[0].role, Role::System);
    }

    #[tokio::test]
    async fn test_data_protocol() {
        let backend = Replay::new(vec![
            Ok(UpstreamEvent::content("a<think>b</think>c")),
            Ok(UpstreamEvent::tool_args_delta("fc_1", "{\"location\":")),
            Ok(UpstreamEvent::tool_args_delta("fc_1", "\"Lima\"}")),
            Ok(UpstreamEvent::tool_args_done(
                "fc_1",
                "get_current_weather",
                "{\"location\":\"Lima\"}",
            )),
        ]);

        let frames = relay(&backend, &messages(), weather_registry(), &RelayConfig::default())
            .await
            .unwrap();
        let body = body(frames).await;
        let types: Vec<String> = payloads(&body)
            .iter()
            .map(|p| p["type"].as_str().unwrap().to_string())
            .collect();

        assert_eq!(
            types,
            vec![
                "text-start",
                "text-delta",
                "text-end",
                "reasoning-start",
                "reasoning-delta",
                "reasoning-end",
                "text-start",
                "text-delta",
                "tool-input-start",
                "tool-input-delta",
                "tool-input-delta",
                "tool-input-available",
                "tool-output-available",
                "text-end",
                "finish",
            ]
        );
        assert!(body.ends_with("data: [DONE]\n\n"));

        let output = payloads(&body)
            .into_iter()
            .find(|p| p["type"] == "tool-output-available")
            .unwrap();
        assert_eq!(output["output"]["temperature"], 21);

        let seen = backend.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.tools[0]["name"], "get_current_weather");
    }

    #[tokio::test]
    async fn test_text_protocol() {
        let backend = Replay::new(vec![
            Ok(UpstreamEvent::content("Hi <think>")),
            Ok(UpstreamEvent::tool_args_delta("fc_1", "{}")),
            Ok(UpstreamEvent::content("there")),
        ]);
        let config = RelayConfig::new().with_protocol(Protocol::Text);

        let frames = relay(&backend, &messages(), ToolRegistry::new(), &config)
            .await
            .unwrap();
        assert_eq!(body(frames).await, "Hi <think>{}there");
    }

    #[tokio::test]
    async fn test_invalid_transcoder_config() {
        let backend = Replay::new(vec![]);
        let markers = MarkerSet {
            reasoning_open: "think".into(),
            ..MarkerSet::default()
        };
        let config = RelayConfig::new().with_transcoder(TranscoderConfig::new().with_markers(markers));

        let err = relay(&backend, &messages(), ToolRegistry::new(), &config)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, RelayError::Config(_)));
        assert!(backend.seen.lock().unwrap().is_none());
    }

    #[test]
    fn test_response_headers() {
        assert_eq!(response_headers(Protocol::Data).len(), 5);
        assert_eq!(response_headers(Protocol::Text)[0].0, "content-type");
    }
}
