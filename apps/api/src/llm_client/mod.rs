/// LLM Client: the single point of entry for all Gemini API calls in ResumePro.
///
/// ARCHITECTURAL RULE: No other module may call the model endpoint directly.
/// Analysis tasks and the chat adapter both go through `ModelTransport`.
///
/// Each call is made exactly once. There is no retry or backoff here; every
/// call is user-initiated and the user decides whether to try again.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;
pub mod schema;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Used for rewriting and generation, where quality matters more than latency.
pub const MODEL_PRO: &str = "gemini-3-pro-preview";
/// Used for ATS scoring and chat.
pub const MODEL_FLASH: &str = "gemini-3-flash-preview";
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Explicit credentials for the model endpoint.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

/// One turn of model input: `role` is `"user"` or `"model"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self::with_role("user", text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::with_role("model", text)
    }

    fn with_role(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }

    pub fn text(&self) -> String {
        self.parts.iter().map(|p| p.text.as_str()).collect()
    }
}

/// Everything a single model call needs. Built by the analysis client or
/// the chat adapter and handed to a `ModelTransport`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub model: &'static str,
    pub system_instruction: String,
    pub contents: Vec<Content>,
    /// When set, the model is asked for JSON conforming to this JSON Schema.
    pub response_schema: Option<Value>,
    pub temperature: Option<f32>,
}

/// The transport seam. `GeminiClient` is the production implementation.
#[async_trait]
pub trait ModelTransport: Send + Sync {
    /// Sends one request and returns the reply text.
    async fn generate(&self, request: &ModelRequest) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody<'a> {
    system_instruction: SystemInstruction<'a>,
    contents: &'a [Content],
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: [TextPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_json_schema: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl<'a> GenerateContentBody<'a> {
    fn from_request(request: &'a ModelRequest) -> Self {
        Self {
            system_instruction: SystemInstruction {
                parts: [TextPart {
                    text: &request.system_instruction,
                }],
            },
            contents: &request.contents,
            generation_config: GenerationConfig {
                response_mime_type: request
                    .response_schema
                    .as_ref()
                    .map(|_| "application/json"),
                response_json_schema: request.response_schema.as_ref(),
                temperature: request.temperature,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Text of the first candidate, all parts concatenated.
    pub fn text(&self) -> Option<String> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(Content::text)
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// The Gemini `generateContent` REST client.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.config.base_url, model)
    }
}

#[async_trait]
impl ModelTransport for GeminiClient {
    async fn generate(&self, request: &ModelRequest) -> Result<String, LlmError> {
        let body = GenerateContentBody::from_request(request);

        let response = self
            .client
            .post(self.endpoint(request.model))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        reply_text(request.model, status, &body)
    }
}

/// Turns a `generateContent` status and body into the reply text.
fn reply_text(model: &str, status: StatusCode, body: &str) -> Result<String, LlmError> {
    if !status.is_success() {
        let message = serde_json::from_str::<GeminiError>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.to_string());
        warn!("Gemini API returned {}: {}", status, message);
        return Err(LlmError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let reply: GenerateContentResponse = serde_json::from_str(body)?;

    if let Some(usage) = &reply.usage_metadata {
        debug!(
            "LLM call succeeded: model={}, input_tokens={}, output_tokens={}",
            model, usage.prompt_token_count, usage.candidates_token_count
        );
    }

    let Some(text) = reply.text() else {
        let finish_reason = reply
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref());
        warn!("Gemini returned no text (finish_reason={finish_reason:?})");
        return Err(LlmError::EmptyContent);
    };
    Ok(text)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_body_with_schema_requests_json() {
        let request = ModelRequest {
            model: MODEL_PRO,
            system_instruction: "Be precise.".to_string(),
            contents: vec![Content::user("hello")],
            response_schema: Some(json!({
                "type": "object",
                "properties": {"resume": {"type": "string"}},
                "required": ["resume"]
            })),
            temperature: None,
        };
        let body = serde_json::to_value(GenerateContentBody::from_request(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "systemInstruction": {"parts": [{"text": "Be precise."}]},
                "contents": [{"role": "user", "parts": [{"text": "hello"}]}],
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseJsonSchema": {
                        "type": "object",
                        "properties": {"resume": {"type": "string"}},
                        "required": ["resume"]
                    }
                }
            })
        );
    }

    #[test]
    fn test_body_without_schema_is_plain_text() {
        let request = ModelRequest {
            model: MODEL_FLASH,
            system_instruction: "Coach.".to_string(),
            contents: vec![Content::user("hi"), Content::model("hello"), Content::user("tips?")],
            response_schema: None,
            temperature: Some(0.7),
        };
        let body = serde_json::to_value(GenerateContentBody::from_request(&request)).unwrap();
        let config = &body["generationConfig"];
        assert!(config.get("responseMimeType").is_none());
        assert!(config.get("responseJsonSchema").is_none());
        assert!((config["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(body["contents"][1]["role"], "model");
    }

    #[test]
    fn test_response_text_joins_parts_of_first_candidate() {
        let raw = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "{\"a\":"}, {"text": "1}"}]},
                 "finishReason": "STOP"},
                {"content": {"role": "model", "parts": [{"text": "ignored"}]}}
            ],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 4}
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.text().as_deref(), Some("{\"a\":1}"));
        assert_eq!(response.usage_metadata.unwrap().prompt_token_count, 12);
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_reply_text_success() {
        let body = r#"{
            "candidates": [{"content": {"role": "model", "parts": [{"text": "Keep it short."}]}}],
            "usageMetadata": {"promptTokenCount": 40, "candidatesTokenCount": 3}
        }"#;
        assert_eq!(
            reply_text(MODEL_FLASH, StatusCode::OK, body).unwrap(),
            "Keep it short."
        );
    }

    #[test]
    fn test_reply_text_error_status_uses_gemini_message() {
        let body = r#"{"error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}}"#;
        let err = reply_text(MODEL_PRO, StatusCode::TOO_MANY_REQUESTS, body).unwrap_err();
        assert!(matches!(
            err,
            LlmError::Api { status: 429, ref message } if message == "Resource has been exhausted"
        ));
    }

    #[test]
    fn test_reply_text_error_status_falls_back_to_raw_body() {
        let err = reply_text(MODEL_PRO, StatusCode::BAD_GATEWAY, "upstream timed out").unwrap_err();
        assert!(matches!(
            err,
            LlmError::Api { status: 502, ref message } if message == "upstream timed out"
        ));
    }

    #[test]
    fn test_reply_text_blocked_prompt_is_empty_content() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        assert!(matches!(
            reply_text(MODEL_PRO, StatusCode::OK, body),
            Err(LlmError::EmptyContent)
        ));
    }

    #[test]
    fn test_reply_text_candidate_without_content_is_empty_content() {
        let body = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        assert!(matches!(
            reply_text(MODEL_PRO, StatusCode::OK, body),
            Err(LlmError::EmptyContent)
        ));
    }

    #[test]
    fn test_reply_text_malformed_success_body_is_parse_error() {
        assert!(matches!(
            reply_text(MODEL_PRO, StatusCode::OK, "<html>gateway</html>"),
            Err(LlmError::Parse(_))
        ));
    }

    #[test]
    fn test_endpoint_includes_model() {
        let client = GeminiClient::new(GeminiConfig {
            api_key: "k".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
        .unwrap();
        assert_eq!(
            client.endpoint(MODEL_FLASH),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }
}
