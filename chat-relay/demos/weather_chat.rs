//! Relay one chat turn with the weather tool wired in.
//!
//! Prints the raw UI message stream frames as they arrive.
//!
//! Run with:
//! ```bash
//! OPENAI_API_KEY=your-key cargo run --example weather_chat -- "Weather in Bogotá?"
//! ```

use chat_relay::prelude::*;
use chat_relay_tools::{get_current_weather_definition, parse_args};
use futures::StreamExt;
use serde::Deserialize;
use serde_json::json;
use std::io::Write;

#[derive(Debug, Deserialize)]
struct WeatherArgs {
    location: String,
}

fn current_weather(args: &ToolArgs) -> chat_relay_tools::ToolResult {
    let args: WeatherArgs = parse_args(args)?;
    Ok(json!({
        "location": args.location,
        "temperature": 22,
        "unit": "celsius",
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "What's the weather in Bogotá, Colombia?".to_string());

    let mut registry = ToolRegistry::new();
    registry.register(FunctionTool::from_definition(
        get_current_weather_definition(),
        current_weather,
    ));

    let client = OpenAIResponsesClient::from_env()?;
    let messages = vec![UiMessage::new(Role::User, vec![UiPart::text(prompt)])];

    let mut frames = relay(&client, &messages, registry, &RelayConfig::default()).await?;
    let mut stdout = std::io::stdout();
    while let Some(frame) = frames.next().await {
        stdout.write_all(&frame?)?;
        stdout.flush()?;
    }

    Ok(())
}
