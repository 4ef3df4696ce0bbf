//! Bounded-retry conversion of free text into a valid LBML command.

use crate::{PipelineError, Result};
use lbml_grammar::{clean, LbmlValidator};
use lm_gateway::{GenerateOptions, TemplateStore, TextGenerator};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Corrective feedback appended to the input after an invalid attempt.
/// Accumulates across failures within one call.
pub(crate) const RETRY_SUFFIX: &str = "\n\nATTENTION: the previous answer did not \
follow the required format. Follow EXACTLY the pattern <Prefix><Number><Direction>; \
for every segment. Valid example: D40F;R90L;D20B;";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Provider model id used for conversion.
    pub model: String,
    /// Template prepended to every conversion prompt.
    pub template_id: String,
    /// Attempt budget per `convert` call.
    pub max_attempts: u32,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4.1-mini".to_string(),
            template_id: "convert-to-lbml".to_string(),
            max_attempts: 3,
        }
    }
}

/// Bounded-retry orchestration of generation plus validation.
///
/// Sampling runs at temperature 0, which keeps output deterministic but
/// does not guarantee grammar compliance; the retry loop exists precisely
/// because it does not.
pub struct RetryingConverter {
    generator: Arc<dyn TextGenerator>,
    templates: TemplateStore,
    validator: LbmlValidator,
    config: ConverterConfig,
}

impl RetryingConverter {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        templates: TemplateStore,
        config: ConverterConfig,
    ) -> Result<Self> {
        Ok(Self {
            generator,
            templates,
            validator: LbmlValidator::new()?,
            config,
        })
    }

    /// Convert free text into a validated LBML command. Returns the first
    /// cleaned output that passes the grammar; fails with `Exhausted` once
    /// the attempt budget is spent. No attempt state survives the call.
    pub async fn convert(&self, input: &str) -> Result<String> {
        let template = self.templates.load(&self.config.template_id)?;
        let options = GenerateOptions::deterministic(&self.config.model);

        let mut current = input.to_string();
        let mut last = String::new();

        for attempt in 1..=self.config.max_attempts {
            let prompt = format!("{template}{current}");
            let raw = self.generator.generate(&prompt, &options).await?;
            let cleaned = clean(&raw);
            let valid = self.validator.validate(&cleaned);
            debug!(attempt, prompt = %prompt, raw = %raw, output = %cleaned, valid, "conversion attempt");

            if valid {
                info!(attempt, command = %cleaned, "valid LBML generated");
                return Ok(cleaned);
            }

            warn!(attempt, output = %cleaned, "invalid LBML");
            last = cleaned;
            if attempt < self.config.max_attempts {
                current.push_str(RETRY_SUFFIX);
            }
        }

        Err(PipelineError::Exhausted {
            attempts: self.config.max_attempts,
            last_output: last,
        })
    }
}
