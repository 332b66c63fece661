use crate::utils::error::{Result, RoadmapError};
use serde_json::Value;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(RoadmapError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(RoadmapError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(RoadmapError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RoadmapError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Model names end up in a URL path segment.
pub fn validate_model_name(field_name: &str, model: &str) -> Result<()> {
    validate_non_empty_string(field_name, model)?;

    if !model
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_')
    {
        return Err(RoadmapError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: model.to_string(),
            reason: "Model name can only contain letters, digits, '-', '.' and '_'".to_string(),
        });
    }

    Ok(())
}

/// Request fields are required. Falsy JSON values count as absent; unlike
/// config values, whitespace is accepted as input.
pub fn validate_required_field<'a>(field_name: &str, value: &'a Option<Value>) -> Result<&'a Value> {
    match value {
        Some(v) if is_truthy(v) => Ok(v),
        _ => Err(RoadmapError::MissingInputError {
            field: field_name.to_string(),
        }),
    }
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Text interpolated into the prompt. Scalars use their JSON form; arrays
/// and objects are not accepted as a business or problem description.
pub fn field_text(field_name: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(RoadmapError::MalformedBodyError {
            message: format!("{} must be a string", field_name),
        }),
    }
}
