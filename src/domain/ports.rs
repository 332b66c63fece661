use crate::domain::model::GenerationRequest;
use crate::utils::error::Result;
use async_trait::async_trait;

/// A remote text-generation capability. Implementations return the raw text
/// the model produced; they never reshape it.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;

    /// Whether a credential was configured. Only used for diagnostics.
    fn has_credential(&self) -> bool;
}
