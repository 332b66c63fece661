use thiserror::Error;

/// Body sent for every failure that is not the caller's fault.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred.";
/// Body sent when `business` or `problem` is absent or empty.
pub const MISSING_INPUT_MESSAGE: &str = "Missing input.";

#[derive(Error, Debug)]
pub enum RoadmapError {
    #[error("Request body is not valid JSON: {0}")]
    BodyParseError(#[from] serde_json::Error),

    #[error("Request body is not valid base64: {0}")]
    BodyDecodeError(#[from] base64::DecodeError),

    #[error("Request body error: {message}")]
    MalformedBodyError { message: String },

    #[error("Missing required field: {field}")]
    MissingInputError { field: String },

    #[error("Generation request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Generation API returned {status}: {message}")]
    UpstreamStatusError { status: u16, message: String },

    #[error("Generation API returned no text: {reason}")]
    EmptyGenerationError { reason: String },

    #[error("Generated roadmap is not a JSON array of strings: {message}")]
    MalformedRoadmapError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller left out something required.
    Input,
    /// The request body could not be read.
    Parse,
    /// The remote generation call failed or returned something unusable.
    Upstream,
    Configuration,
}

impl RoadmapError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RoadmapError::MissingInputError { .. } => ErrorCategory::Input,
            RoadmapError::BodyParseError(_)
            | RoadmapError::BodyDecodeError(_)
            | RoadmapError::MalformedBodyError { .. } => ErrorCategory::Parse,
            RoadmapError::ApiError(_)
            | RoadmapError::UpstreamStatusError { .. }
            | RoadmapError::EmptyGenerationError { .. }
            | RoadmapError::MalformedRoadmapError { .. } => ErrorCategory::Upstream,
            RoadmapError::ConfigError { .. } | RoadmapError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::Input => 400,
            ErrorCategory::Parse | ErrorCategory::Upstream | ErrorCategory::Configuration => 500,
        }
    }

    /// The only text about this error that may reach the client.
    pub fn client_message(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => MISSING_INPUT_MESSAGE,
            _ => INTERNAL_ERROR_MESSAGE,
        }
    }
}

pub type Result<T> = std::result::Result<T, RoadmapError>;
