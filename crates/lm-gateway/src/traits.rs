use crate::{GenerateOptions, Result};
use async_trait::async_trait;

/// Opaque `generate(text) -> text` capability.
///
/// The system neither trains nor hosts the model; it only consumes one
/// completion per fully assembled prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run one completion over the given prompt.
    async fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String>;
}
