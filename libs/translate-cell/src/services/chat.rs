use anyhow::{anyhow, Result};
use reqwest::{header, Client};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error};

use shared_config::AppConfig;

/// Models that reject `max_tokens` and `temperature`.
const REASONING_MODELS: [&str; 2] = ["o1", "o3-mini"];

pub const RESPONSE_TOKEN_LIMIT: u32 = 1024;
pub const REASONING_RESPONSE_TOKEN_LIMIT: u32 = 8192;
pub const SEED: i64 = 1234;

/// Tool-call answers carrying this value count as no answer.
const NO_RESPONSE: &str = "0";

#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    pub temperature: f32,
    pub tools: Option<Value>,
    pub json_mode: bool,
    pub reasoning_effort: Option<&'static str>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletion {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: AssistantMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

impl ChatCompletion {
    pub fn content(&self) -> Option<&str> {
        self.choices.first()?.message.content.as_deref()
    }

    /// Reads `parameter` from the first call to `function`. Falls back to the
    /// plain message content when the model answered without a tool call.
    pub fn tool_argument(&self, function: &str, parameter: &str) -> Option<String> {
        let message = &self.choices.first()?.message;

        if !message.tool_calls.is_empty() {
            return message
                .tool_calls
                .iter()
                .filter(|call| call.kind == "function" && call.function.name == function)
                .filter_map(|call| serde_json::from_str::<Value>(&call.function.arguments).ok())
                .filter_map(|args| args.get(parameter).and_then(Value::as_str).map(str::to_string))
                .find(|value| value != NO_RESPONSE);
        }

        message
            .content
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty() && *text != NO_RESPONSE)
            .map(str::to_string)
    }
}

pub struct ChatClient {
    http_client: Client,
    api_base: String,
    api_key: String,
    model: String,
    deployment: String,
}

impl ChatClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http_client: Client::new(),
            api_base: config.openai_api_base.trim_end_matches('/').to_string(),
            api_key: config.openai_api_key.clone(),
            model: config.openai_chat_model.clone(),
            deployment: config.openai_chat_deployment.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.api_base.is_empty()
    }

    pub fn is_reasoning_model(&self) -> bool {
        REASONING_MODELS.contains(&self.model.as_str())
    }

    pub fn request_body(&self, messages: &[Value], options: &ChatOptions) -> Value {
        // Azure deployments are addressed by deployment name.
        let model = if self.deployment.is_empty() {
            &self.model
        } else {
            &self.deployment
        };

        let mut body = json!({
            "model": model,
            "messages": messages,
            "n": 1,
            "seed": SEED,
        });

        if self.is_reasoning_model() {
            body["max_completion_tokens"] = json!(REASONING_RESPONSE_TOKEN_LIMIT);
            if let Some(effort) = options.reasoning_effort {
                body["reasoning_effort"] = json!(effort);
            }
        } else {
            body["max_tokens"] = json!(RESPONSE_TOKEN_LIMIT);
            body["temperature"] = json!(options.temperature);
        }

        if options.json_mode {
            body["response_format"] = json!({ "type": "json_object" });
        }
        if let Some(tools) = &options.tools {
            body["tools"] = tools.clone();
        }
        body
    }

    pub async fn complete(&self, messages: &[Value], options: &ChatOptions) -> Result<ChatCompletion> {
        let body = self.request_body(messages, options);
        debug!(model = %body["model"], "Requesting chat completion");

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.api_base))
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header("api-key", &self.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            error!(%status, "Chat completion failed");
            return Err(anyhow!("OpenAI API error ({}): {}", status, error_text));
        }

        Ok(response.json().await?)
    }
}
