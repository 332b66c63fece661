use crate::utils::error::Result;
use crate::utils::validation::{validate_model_name, validate_url, Validate};
use std::env;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

#[derive(Clone)]
pub struct GeneratorConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub strict_output: bool,
}

impl GeneratorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            api_key: lookup("GEMINI_API_KEY").filter(|key| !key.is_empty()),
            model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: lookup("GEMINI_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            strict_output: lookup("ROADMAP_STRICT_OUTPUT")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// The key is never printed.
impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("strict_output", &self.strict_output)
            .finish()
    }
}

impl Validate for GeneratorConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_base", &self.api_base)?;
        validate_model_name("model", &self.model)?;

        tracing::info!("✅ Generator configuration validation passed");
        Ok(())
    }
}
