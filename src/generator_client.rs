//! HTTP client for the schedule generator (Anthropic messages API)

use std::time::Duration;

use anyhow::{Context, Result};
use blocktime_core::config::GeneratorConfig;
use serde::{Deserialize, Serialize};

const API_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT_SECS: u64 = 60;

pub struct GeneratorClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    max_tokens: u32,
    api_key: String,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

impl GeneratorClient {
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            api_key: config.api_key()?,
        })
    }

    /// Send `prompt` as a single user message and return the reply text.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(endpoint = %self.endpoint, model = %self.model, "requesting schedule");

        let resp = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .context("Failed to reach the schedule generator")?;

        let status = resp.status();
        let text = resp.text().await?;
        tracing::debug!(%status, bytes = text.len(), "generator responded");

        reply_text(&text)
    }
}

/// The first text block of a response body, or the API's error message.
fn reply_text(body: &str) -> Result<String> {
    let response: MessagesResponse =
        serde_json::from_str(body).context("Unexpected response from the schedule generator")?;

    if let Some(error) = response.error {
        anyhow::bail!("API Error: {}", error.message);
    }

    response
        .content
        .into_iter()
        .find(|block| block.kind == "text")
        .and_then(|block| block.text)
        .context("Failed to extract content from the generator's response")
}
