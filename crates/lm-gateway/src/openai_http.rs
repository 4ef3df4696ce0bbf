//! HTTP gateway for an OpenAI-compatible chat-completions endpoint.

use crate::{GatewayError, GenerateOptions, Result, TextGenerator};
use async_trait::async_trait;

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

pub struct OpenAiGateway {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiGateway {
    /// `endpoint = None` targets the hosted OpenAI API; pass an explicit
    /// URL for a compatible local shim.
    pub fn new(endpoint: Option<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| GatewayError::Http(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            api_key: api_key.into(),
            client,
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAiGateway {
    async fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String> {
        #[derive(serde::Serialize)]
        struct Message<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(serde::Serialize)]
        struct ChatReq<'a> {
            model: &'a str,
            temperature: f32,
            messages: Vec<Message<'a>>,
        }

        let req = ChatReq {
            model: &options.model,
            temperature: options.temperature,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(GatewayError::Status(resp.status().as_u16()));
        }

        // Expected response: { choices: [{ message: { content } }], ... }
        #[derive(serde::Deserialize)]
        struct RespMessage {
            content: Option<String>,
        }
        #[derive(serde::Deserialize)]
        struct Choice {
            message: RespMessage,
        }
        #[derive(serde::Deserialize)]
        struct ChatResp {
            choices: Vec<Choice>,
        }

        let body: ChatResp = resp
            .json()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;
        let text = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(GatewayError::Malformed("no completion choice"))?;

        tracing::debug!(model = %options.model, chars = text.len(), "completion received");
        Ok(text)
    }
}
