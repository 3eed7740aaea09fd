//! OpenAI Responses API streaming client.
//!
//! [`OpenAIResponsesClient`] posts a [`ResponsesRequest`] with `stream: true`
//! and hands back the body as a stream of [`UpstreamEvent`]s. The
//! [`ResponsesBackend`] trait is the seam [`crate::relay`] talks to, so a host
//! can substitute its own transport.

use async_trait::async_trait;
use chat_relay_core::{InputMessage, RelayError, RelayResult, UpstreamEvent};
use chat_relay_streaming::{ResponsesEventStream, StreamError, StreamResult};
use chat_relay_tools::ToolDefinition;
use futures::{Stream, TryStreamExt};
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use std::pin::Pin;
use std::time::Duration;

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Boxed stream of decoded upstream events.
pub type UpstreamStream = Pin<Box<dyn Stream<Item = StreamResult<UpstreamEvent>> + Send>>;

/// Body of a streaming `POST /responses` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponsesRequest {
    /// Model name.
    pub model: String,
    /// Conversation input, system prompt first.
    pub input: Vec<InputMessage>,
    /// Tool declarations in Responses API form.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<JsonValue>,
    /// Always `true`.
    pub stream: bool,
}

impl ResponsesRequest {
    /// Create a streaming request with no tools.
    pub fn new(model: impl Into<String>, input: Vec<InputMessage>) -> Self {
        Self {
            model: model.into(),
            input,
            tools: Vec::new(),
            stream: true,
        }
    }

    /// Declare function tools.
    #[must_use]
    pub fn with_tools<'a>(mut self, tools: impl IntoIterator<Item = &'a ToolDefinition>) -> Self {
        self.tools
            .extend(tools.into_iter().map(ToolDefinition::to_responses_tool));
        self
    }

    /// Offer the hosted web search tool.
    #[must_use]
    pub fn with_web_search(mut self) -> Self {
        self.tools.push(json!({"type": "web_search"}));
        self
    }
}

/// Something that can open a Responses event stream.
#[async_trait]
pub trait ResponsesBackend: Send + Sync {
    /// Send the request and return the decoded event stream.
    ///
    /// Errors here happen before any event is produced; failures after that
    /// arrive as `Err` items on the stream.
    async fn stream(&self, request: &ResponsesRequest) -> RelayResult<UpstreamStream>;
}

/// Client for the OpenAI Responses API.
#[derive(Debug, Clone)]
pub struct OpenAIResponsesClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl OpenAIResponsesClient {
    /// Create a client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(300),
        }
    }

    /// Create from `OPENAI_API_KEY` and the optional `OPENAI_BASE_URL`.
    pub fn from_env() -> RelayResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| RelayError::config("OPENAI_API_KEY environment variable not set"))?;
        let client = Self::new(api_key);
        Ok(match std::env::var("OPENAI_BASE_URL") {
            Ok(url) if !url.is_empty() => client.with_base_url(url),
            _ => client,
        })
    }

    /// Set the API root. A trailing slash is ignored.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout. It covers the whole streamed body.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom HTTP client.
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// The API root in use.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ResponsesBackend for OpenAIResponsesClient {
    async fn stream(&self, request: &ResponsesRequest) -> RelayResult<UpstreamStream> {
        tracing::debug!(model = %request.model, tools = request.tools.len(), "Opening response stream");

        let response = self
            .client
            .post(format!("{}/responses", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Provider rejected request");
            return Err(RelayError::api(status.as_u16(), body));
        }

        let body = response.bytes_stream().map_err(StreamError::connection);
        Ok(Box::pin(ResponsesEventStream::from_bytes(Box::pin(body))))
    }
}

fn transport_error(err: reqwest::Error) -> RelayError {
    if err.is_timeout() {
        RelayError::timeout(err.to_string())
    } else {
        RelayError::http(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_relay_core::{InputContent, Role};
    use chat_relay_tools::get_current_weather_definition;
    use futures::StreamExt;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SSE_BODY: &str = "event: response.created\n\
data: {\"type\":\"response.created\",\"response\":{\"id\":\"resp_1\"}}\n\n\
event: response.output_text.delta\n\
data: {\"type\":\"response.output_text.delta\",\"item_id\":\"msg_1\",\"delta\":\"Hel\"}\n\n\
data: {\"type\":\"response.output_text.delta\",\"item_id\":\"msg_1\",\"delta\":\"lo\"}\n\n\
data: [DONE]\n\n";

    fn request() -> ResponsesRequest {
        ResponsesRequest::new(
            "gpt-5-nano",
            vec![InputMessage {
                role: Role::User,
                content: vec![InputContent::text("Hi")],
            }],
        )
    }

    #[test]
    fn test_request_body() {
        let request = request()
            .with_tools(&[get_current_weather_definition()])
            .with_web_search();
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["stream"], true);
        assert_eq!(body["model"], "gpt-5-nano");
        assert_eq!(body["tools"][0]["name"], "get_current_weather");
        assert_eq!(body["tools"][1], json!({"type": "web_search"}));
        assert_eq!(body["input"][0]["content"][0]["type"], "input_text");
    }

    #[test]
    fn test_request_without_tools_omits_field() {
        let body = serde_json::to_value(request()).unwrap();
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = OpenAIResponsesClient::new("sk").with_base_url("http://localhost:1234/v1/");
        assert_eq!(client.base_url(), "http://localhost:1234/v1");
    }

    #[tokio::test]
    async fn test_stream_decodes_events() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/responses"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({"stream": true, "model": "gpt-5-nano"})))
            .respond_with(ResponseTemplate::new(200).set_body_raw(SSE_BODY, "text/event-stream"))
            .mount(&server)
            .await;

        let client =
            OpenAIResponsesClient::new("sk-test").with_base_url(format!("{}/v1", server.uri()));
        let events: Vec<_> = client
            .stream(&request())
            .await
            .unwrap()
            .map(|event| event.unwrap())
            .collect()
            .await;

        assert_eq!(
            events,
            vec![
                UpstreamEvent::ignored("response.created"),
                UpstreamEvent::content("Hel"),
                UpstreamEvent::content("lo"),
            ]
        );
    }

    #[tokio::test]
    async fn test_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/responses"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let client = OpenAIResponsesClient::new("bad").with_base_url(format!("{}/v1", server.uri()));
        let err = client.stream(&request()).await.err().unwrap();

        match err {
            RelayError::Api { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let client = OpenAIResponsesClient::new("sk").with_base_url("http://127.0.0.1:9");
        let err = client.stream(&request()).await.err().unwrap();
        assert!(matches!(err, RelayError::Http { .. }));
        assert!(err.is_retryable());
    }
}
