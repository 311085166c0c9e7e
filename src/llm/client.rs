//! Async structured-output LLM client
//!
//! A model-agnostic HTTP client that asks an endpoint for a JSON document
//! matching a declared schema. Supports Gemini `generateContent`,
//! OpenAI-compatible chat completions and the Anthropic messages API.
//! The request format is detected from the endpoint URL.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::config::{api_key_from_env, GeneratorConfig};
use crate::core::error::{CodexError, Result};
use crate::schema::{SchemaDialect, SchemaNode};

/// Anything that can turn a prompt plus a response schema into JSON text
///
/// The pipeline is generic over this so stages can be driven by the HTTP
/// client or by an in-memory script.
pub trait StructuredGenerator {
    fn generate(
        &self,
        prompt: &str,
        schema: &SchemaNode,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// API format type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFormat {
    Gemini,
    Anthropic,
    OpenAI,
}

/// Async LLM client for structured generation calls
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
    api_format: ApiFormat,
}

impl LlmClient {
    /// Create a new LLM client with explicit configuration
    pub fn new(api_key: String, config: &GeneratorConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| CodexError::Configuration(format!("HTTP client: {}", e)))?;

        let api_url = config.resolved_url();
        let api_format = Self::detect_api_format(&api_url);
        Ok(Self {
            client,
            api_key,
            api_url,
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            api_format,
        })
    }

    /// Create a client with the credential from `LLM_API_KEY`
    pub fn from_env(config: &GeneratorConfig) -> Result<Self> {
        let api_key = api_key_from_env()?;
        Self::new(api_key, config)
    }

    /// Detect API format from URL
    fn detect_api_format(url: &str) -> ApiFormat {
        if url.contains("generativelanguage.googleapis.com") || url.contains(":generateContent")
        {
            ApiFormat::Gemini
        } else if url.contains("anthropic.com") {
            ApiFormat::Anthropic
        } else {
            // OpenAI, DeepSeek and other compatible APIs
            ApiFormat::OpenAI
        }
    }

    pub fn api_format(&self) -> ApiFormat {
        self.api_format
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a structured completion request
    ///
    /// Returns the raw generated text, which the caller parses.
    pub async fn complete_structured(&self, prompt: &str, schema: &SchemaNode) -> Result<String> {
        tracing::debug!(
            model = %self.model,
            format = ?self.api_format,
            prompt_chars = prompt.len(),
            "sending structured generation request"
        );
        let text = match self.api_format {
            ApiFormat::Gemini => self.complete_gemini(prompt, schema).await?,
            ApiFormat::Anthropic => self.complete_anthropic(prompt, schema).await?,
            ApiFormat::OpenAI => self.complete_openai(prompt, schema).await?,
        };
        tracing::debug!(response_chars = text.len(), "received structured response");
        Ok(text)
    }

    async fn post_json<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        request: reqwest::RequestBuilder,
        body: &B,
    ) -> Result<R> {
        let response = request
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| CodexError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CodexError::Transport(format!(
                "API error ({}): {}",
                status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| CodexError::Transport(format!("Malformed API response: {}", e)))
    }

    async fn complete_gemini(&self, prompt: &str, schema: &SchemaNode) -> Result<String> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".into(),
                parts: vec![GeminiPart {
                    text: prompt.into(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                response_mime_type: "application/json".into(),
                response_schema: schema.render(SchemaDialect::Gemini),
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        };

        let completion: GeminiResponse = self
            .post_json(
                self.client
                    .post(&self.api_url)
                    .header("x-goog-api-key", &self.api_key),
                &request,
            )
            .await?;

        let candidate = completion.candidates.into_iter().next().ok_or_else(|| {
            let reason = completion
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates".into());
            CodexError::Transport(format!("Empty response: {}", reason))
        })?;

        if candidate.finish_reason.as_deref() == Some("MAX_TOKENS") {
            tracing::warn!("response hit the output token limit and is likely truncated");
        }

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(CodexError::Transport("Empty response".into()));
        }
        Ok(text)
    }

    async fn complete_anthropic(&self, prompt: &str, schema: &SchemaNode) -> Result<String> {
        // No native schema parameter; the schema travels in the system prompt
        let system = format!(
            "Respond with a single JSON object and nothing else. It MUST conform to this JSON \
             Schema:\n{}",
            schema.render(SchemaDialect::JsonSchema)
        );
        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: self.max_output_tokens,
            temperature: self.temperature,
            system,
            messages: vec![Message {
                role: "user".into(),
                content: prompt.into(),
            }],
        };

        let completion: AnthropicResponse = self
            .post_json(
                self.client
                    .post(&self.api_url)
                    .header("x-api-key", &self.api_key)
                    .header("anthropic-version", "2023-06-01"),
                &request,
            )
            .await?;

        completion
            .content
            .into_iter()
            .find_map(|c| c.text)
            .ok_or_else(|| CodexError::Transport("Empty response".into()))
    }

    async fn complete_openai(&self, prompt: &str, schema: &SchemaNode) -> Result<String> {
        let request = OpenAIRequest {
            model: self.model.clone(),
            max_tokens: self.max_output_tokens,
            temperature: self.temperature,
            response_format: ResponseFormat {
                format_type: "json_schema".into(),
                json_schema: JsonSchemaFormat {
                    name: "world_state".into(),
                    schema: schema.render(SchemaDialect::JsonSchema),
                    strict: false,
                },
            },
            messages: vec![
                Message {
                    role: "system".into(),
                    content: "Respond with a single JSON object matching the response schema."
                        .into(),
                },
                Message {
                    role: "user".into(),
                    content: prompt.into(),
                },
            ],
        };

        let completion: OpenAIResponse = self
            .post_json(
                self.client
                    .post(&self.api_url)
                    .header("Authorization", format!("Bearer {}", self.api_key)),
                &request,
            )
            .await?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| CodexError::Transport("Empty response".into()))
    }
}

impl StructuredGenerator for LlmClient {
    fn generate(
        &self,
        prompt: &str,
        schema: &SchemaNode,
    ) -> impl Future<Output = Result<String>> + Send {
        self.complete_structured(prompt, schema)
    }
}

// Gemini API format
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    response_mime_type: String,
    response_schema: Value,
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

// Anthropic API format
#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

// OpenAI-compatible API format
#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    response_format: ResponseFormat,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
    json_schema: JsonSchemaFormat,
}

#[derive(Serialize)]
struct JsonSchemaFormat {
    name: String,
    schema: Value,
    strict: bool,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

// Shared
#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}
