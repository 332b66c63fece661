use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The parsed client request. Fields keep their raw JSON value so that
/// falsy values (`null`, `false`, `0`, `""`, `[]`, `{}`) count as missing
/// rather than failing to parse.
#[derive(Debug, Clone, Default)]
pub struct RoadmapRequest {
    pub business: Option<serde_json::Value>,
    pub problem: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl std::fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // A struct with one string field always serializes.
        let json = serde_json::to_string(self).map_err(|_| std::fmt::Error)?;
        f.write_str(&json)
    }
}

/// Proxy-integration invocation event. Only the fields the handler reads are modelled.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpEvent {
    #[serde(default)]
    pub http_method: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: Option<bool>,
}

impl HttpEvent {
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            http_method: Some("POST".to_string()),
            body: Some(body.into()),
            is_base64_encoded: None,
        }
    }

    pub fn is_base64_encoded(&self) -> bool {
        self.is_base64_encoded.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl HttpResponse {
    pub fn json(body: String) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            status_code: 200,
            headers,
            body,
        }
    }

    pub fn error(status_code: u16, message: &str) -> Self {
        let body = ErrorBody {
            error: message.to_string(),
        };
        Self {
            status_code,
            headers: HashMap::new(),
            body: body.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaType {
    String,
    Array,
}

/// Output shape the remote model is asked to honour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSchema {
    pub schema_type: SchemaType,
    pub items: Option<Box<ResponseSchema>>,
}

impl ResponseSchema {
    pub fn string() -> Self {
        Self {
            schema_type: SchemaType::String,
            items: None,
        }
    }

    pub fn array_of(items: ResponseSchema) -> Self {
        Self {
            schema_type: SchemaType::Array,
            items: Some(Box::new(items)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub system_instruction: String,
    pub user_query: String,
    pub response_schema: ResponseSchema,
}
