use serde::{Deserialize, Serialize};

/// Options for a single generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Provider model id.
    pub model: String,
    /// Sampling temperature. 0.0 keeps sampling deterministic, which does
    /// not by itself guarantee grammar compliance.
    pub temperature: f32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            model: "gpt-4.1-mini".to_string(),
            temperature: 0.0,
        }
    }
}

impl GenerateOptions {
    /// Temperature-0 options for the given model.
    pub fn deterministic(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: 0.0,
        }
    }
}
