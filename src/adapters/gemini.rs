use crate::config::GeneratorConfig;
use crate::core::{GenerationRequest, TextGenerator};
use crate::domain::model::{ResponseSchema, SchemaType};
use crate::utils::error::{Result, RoadmapError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for the Gemini `generateContent` REST endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    api_base: String,
}

impl GeminiClient {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            api_base: config.api_base.clone(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, self.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| RoadmapError::ConfigError {
                message: "GEMINI_API_KEY is not set".to_string(),
            })?;

        let url = self.endpoint();
        tracing::debug!("Making generation request to: {}", url);

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(&GenerateContentRequest::from(request))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Generation API response status: {}", status);

        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&raw)
                .map(|e| e.error.message)
                .unwrap_or(raw);
            return Err(RoadmapError::UpstreamStatusError {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response.json().await?;
        body.into_text()
    }

    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Schema,
}

#[derive(Debug, Serialize)]
struct Schema {
    #[serde(rename = "type")]
    schema_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<Box<Schema>>,
}

impl From<&ResponseSchema> for Schema {
    fn from(schema: &ResponseSchema) -> Self {
        let schema_type = match schema.schema_type {
            SchemaType::String => "STRING",
            SchemaType::Array => "ARRAY",
        };
        Self {
            schema_type,
            items: schema.items.as_deref().map(|s| Box::new(Schema::from(s))),
        }
    }
}

impl<'a> From<&'a GenerationRequest> for GenerateContentRequest<'a> {
    fn from(request: &'a GenerationRequest) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: &request.system_instruction,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: &request.user_query,
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: Schema::from(&request.response_schema),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl GenerateContentResponse {
    /// Joins the text parts of the first candidate, like the SDK's `response.text`.
    fn into_text(self) -> Result<String> {
        let candidate = match self.candidates.into_iter().next() {
            Some(candidate) => candidate,
            None => {
                let reason = self
                    .prompt_feedback
                    .and_then(|f| f.block_reason)
                    .map(|r| format!("prompt blocked ({})", r))
                    .unwrap_or_else(|| "no candidates".to_string());
                return Err(RoadmapError::EmptyGenerationError { reason });
            }
        };

        let finish_reason = candidate.finish_reason;
        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(RoadmapError::EmptyGenerationError {
                reason: format!(
                    "candidate has no text (finish reason: {})",
                    finish_reason.as_deref().unwrap_or("unknown")
                ),
            });
        }

        Ok(text)
    }
}
