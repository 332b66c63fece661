use crate::core::prompt;
use crate::core::TextGenerator;
use crate::domain::model::{HttpEvent, HttpResponse, RoadmapRequest};
use crate::utils::error::{ErrorCategory, Result, RoadmapError};
use crate::utils::validation::{field_text, validate_required_field};
use base64::Engine;

/// Turns one client request into one roadmap response.
///
/// The generator is built once per process and shared by every invocation;
/// the handler itself holds no per-request state.
pub struct RoadmapHandler<G: TextGenerator> {
    generator: G,
    strict_output: bool,
}

impl<G: TextGenerator> RoadmapHandler<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            strict_output: false,
        }
    }

    /// When enabled, generated text must parse as a JSON array of strings
    /// before it is forwarded.
    pub fn with_strict_output(mut self, strict_output: bool) -> Self {
        self.strict_output = strict_output;
        self
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub async fn handle_event(&self, event: HttpEvent) -> HttpResponse {
        tracing::debug!(
            method = event.http_method.as_deref().unwrap_or("-"),
            base64 = event.is_base64_encoded(),
            "Received roadmap invocation"
        );

        match decode_body(&event) {
            Ok(body) => self.handle(&body).await,
            Err(e) => {
                self.log_credential_check();
                failure_response(e)
            }
        }
    }

    pub async fn handle(&self, body: &str) -> HttpResponse {
        self.log_credential_check();

        match self.generate_roadmap(body).await {
            Ok(roadmap) => {
                tracing::info!(bytes = roadmap.len(), "Roadmap generated");
                HttpResponse::json(roadmap)
            }
            Err(e) => failure_response(e),
        }
    }

    async fn generate_roadmap(&self, body: &str) -> Result<String> {
        let request = parse_request(body)?;
        let business = validate_required_field("business", &request.business)?;
        let problem = validate_required_field("problem", &request.problem)?;
        let business = field_text("business", business)?;
        let problem = field_text("problem", problem)?;

        let generation = prompt::roadmap_request(&business, &problem);
        let text = self.generator.generate(&generation).await?;

        if self.strict_output {
            validate_roadmap(&text)?;
        }

        Ok(text)
    }

    fn log_credential_check(&self) {
        tracing::info!(
            api_key_present = self.generator.has_credential(),
            "API key check"
        );
    }
}

fn decode_body(event: &HttpEvent) -> Result<String> {
    let body = event
        .body
        .as_deref()
        .ok_or_else(|| RoadmapError::MalformedBodyError {
            message: "request has no body".to_string(),
        })?;

    if !event.is_base64_encoded() {
        return Ok(body.to_string());
    }

    let bytes = base64::engine::general_purpose::STANDARD.decode(body)?;
    String::from_utf8(bytes).map_err(|e| RoadmapError::MalformedBodyError {
        message: format!("decoded body is not UTF-8: {}", e),
    })
}

/// Parses the body as a JSON object. Repeated keys keep their last value.
pub fn parse_request(body: &str) -> Result<RoadmapRequest> {
    match serde_json::from_str::<serde_json::Value>(body)? {
        serde_json::Value::Object(mut fields) => Ok(RoadmapRequest {
            business: fields.remove("business"),
            problem: fields.remove("problem"),
        }),
        _ => Err(RoadmapError::MalformedBodyError {
            message: "request body is not a JSON object".to_string(),
        }),
    }
}

/// Checks that generated text is a JSON array of strings. The step count is
/// left to the model.
pub fn validate_roadmap(text: &str) -> Result<()> {
    serde_json::from_str::<Vec<String>>(text)
        .map(|_| ())
        .map_err(|e| RoadmapError::MalformedRoadmapError {
            message: e.to_string(),
        })
}

fn failure_response(e: RoadmapError) -> HttpResponse {
    match e.category() {
        ErrorCategory::Input => tracing::warn!("Rejected roadmap request: {}", e),
        category => tracing::error!(
            category = ?category,
            "Error during roadmap generation: {}",
            e
        ),
    }
    HttpResponse::error(e.status_code(), e.client_message())
}
