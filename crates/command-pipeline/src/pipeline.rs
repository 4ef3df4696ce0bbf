//! The single entry point from free text to a delivered command.

use crate::convert::{ConverterConfig, RetryingConverter};
use crate::Result;
use lm_gateway::{GenerateOptions, TemplateStore, TextGenerator};
use robot_link::RobotLink;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Run the advisory unit-normalization pre-pass.
    pub normalize: bool,
    /// Template for the normalization call.
    pub normalize_template_id: String,
    /// Model used for normalization; cheaper than the conversion model.
    pub normalize_model: String,
    pub converter: ConverterConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            normalize: true,
            normalize_template_id: "normalize-distances-cm".to_string(),
            normalize_model: "gpt-4.1-nano".to_string(),
            converter: ConverterConfig::default(),
        }
    }
}

/// Composes normalization, conversion, and delivery into one operation.
///
/// The robot link is optional; without one (or with one that is not
/// connected) the pipeline runs in generation-only mode and still returns
/// the validated command.
pub struct CommandPipeline {
    generator: Arc<dyn TextGenerator>,
    templates: TemplateStore,
    converter: RetryingConverter,
    link: Option<Arc<RobotLink>>,
    config: PipelineConfig,
}

impl CommandPipeline {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        templates: TemplateStore,
        config: PipelineConfig,
    ) -> Result<Self> {
        let converter = RetryingConverter::new(
            Arc::clone(&generator),
            templates.clone(),
            config.converter.clone(),
        )?;
        Ok(Self {
            generator,
            templates,
            converter,
            link: None,
            config,
        })
    }

    /// Attach a robot link for best-effort delivery.
    pub fn with_link(mut self, link: Arc<RobotLink>) -> Self {
        self.link = Some(link);
        self
    }

    /// Turn a free-form instruction into a validated LBML command and, when
    /// a connected link is attached, forward it. Delivery failures are
    /// logged, never raised to the caller.
    pub async fn process(&self, raw: &str) -> Result<String> {
        info!(instruction = %raw, "processing movement instruction");

        let input = if self.config.normalize {
            self.normalize(raw).await?
        } else {
            raw.to_string()
        };

        let command = self.converter.convert(&input).await?;
        if let Ok(segments) = lbml_grammar::parse(&command) {
            debug!(segments = segments.len(), "motion plan parsed");
        }

        if let Some(link) = &self.link {
            if link.is_connected() {
                if link.send(&command).await {
                    info!(command = %command, "command delivered to controller");
                } else {
                    warn!(command = %command, "command delivery failed");
                }
            } else {
                debug!("robot link not connected; skipping delivery");
            }
        }

        Ok(command)
    }

    /// Advisory unit-normalization pre-pass. A missing template is a
    /// configuration error; a failed model call only logs and yields the
    /// raw instruction unchanged.
    async fn normalize(&self, raw: &str) -> Result<String> {
        let template = self.templates.load(&self.config.normalize_template_id)?;
        let options = GenerateOptions::deterministic(&self.config.normalize_model);
        match self
            .generator
            .generate(&format!("{template}{raw}"), &options)
            .await
        {
            Ok(normalized) => {
                let normalized = normalized.trim().to_string();
                info!(normalized = %normalized, "instruction normalized");
                Ok(normalized)
            }
            Err(e) => {
                warn!(error = %e, "normalization failed; converting raw instruction");
                Ok(raw.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PipelineError;
    use lm_gateway::{GatewayError, ScriptedGenerator};
    use robot_link::LinkConfig;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn store_with_templates() -> (tempfile::TempDir, TemplateStore) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("convert-to-lbml.txt"),
            "Convert the instruction to LBML.\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("normalize-distances-cm.txt"),
            "Rewrite every distance in centimeters.\n",
        )
        .unwrap();
        let store = TemplateStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn first_valid_completion_needs_zero_retries() {
        let (_dir, store) = store_with_templates();
        let gen = Arc::new(ScriptedGenerator::new(vec![
            "move forward 200 centimeters then turn right 90 degrees".into(),
            "D200F;R90R;".into(),
        ]));
        let pipeline =
            CommandPipeline::new(Arc::clone(&gen) as Arc<dyn TextGenerator>, store, PipelineConfig::default())
                .unwrap();

        let command = pipeline
            .process("move forward two meters then turn right")
            .await
            .unwrap();
        assert_eq!(command, "D200F;R90R;");
        // One normalization call plus one conversion call.
        assert_eq!(gen.calls(), 2);

        let prompts = gen.prompts();
        assert!(prompts[0].starts_with("Rewrite every distance in centimeters.\n"));
        assert!(prompts[1].ends_with("move forward 200 centimeters then turn right 90 degrees"));
    }

    #[tokio::test]
    async fn normalization_can_be_disabled() {
        let (_dir, store) = store_with_templates();
        let gen = Arc::new(ScriptedGenerator::new(vec!["D10F;".into()]));
        let config = PipelineConfig {
            normalize: false,
            ..PipelineConfig::default()
        };
        let pipeline =
            CommandPipeline::new(Arc::clone(&gen) as Arc<dyn TextGenerator>, store, config).unwrap();

        let command = pipeline.process("forward ten").await.unwrap();
        assert_eq!(command, "D10F;");
        assert_eq!(gen.calls(), 1);
        assert!(gen.prompts()[0].ends_with("forward ten"));
    }

    #[tokio::test]
    async fn missing_normalize_template_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("convert-to-lbml.txt"),
            "Convert the instruction to LBML.\n",
        )
        .unwrap();
        let store = TemplateStore::new(dir.path());
        let gen = Arc::new(ScriptedGenerator::new(vec!["D10F;".into()]));
        let pipeline =
            CommandPipeline::new(Arc::clone(&gen) as Arc<dyn TextGenerator>, store, PipelineConfig::default())
                .unwrap();

        let err = pipeline.process("x").await.unwrap_err();
        assert!(matches!(err, PipelineError::Template(_)));
        assert_eq!(gen.calls(), 0);
    }

    #[tokio::test]
    async fn failed_normalization_call_is_advisory() {
        /// Fails the first call, then delegates to a script.
        struct FlakyGenerator {
            inner: ScriptedGenerator,
            calls: AtomicUsize,
        }

        #[async_trait::async_trait]
        impl TextGenerator for FlakyGenerator {
            async fn generate(
                &self,
                prompt: &str,
                options: &GenerateOptions,
            ) -> lm_gateway::Result<String> {
                if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    return Err(GatewayError::Http("connection reset".into()));
                }
                self.inner.generate(prompt, options).await
            }
        }

        let (_dir, store) = store_with_templates();
        let gen = Arc::new(FlakyGenerator {
            inner: ScriptedGenerator::new(vec!["D10F;".into()]),
            calls: AtomicUsize::new(0),
        });
        let pipeline = CommandPipeline::new(
            Arc::clone(&gen) as Arc<dyn TextGenerator>,
            store,
            PipelineConfig::default(),
        )
        .unwrap();

        let command = pipeline.process("forward ten centimeters").await.unwrap();
        assert_eq!(command, "D10F;");
        // The conversion prompt was built from the raw instruction.
        assert!(gen.inner.prompts()[0].ends_with("forward ten centimeters"));
    }

    #[tokio::test]
    async fn unconnected_link_never_blocks_the_result() {
        let (_dir, store) = store_with_templates();
        let gen = Arc::new(ScriptedGenerator::new(vec![
            "forward 10 centimeters".into(),
            "D10F;".into(),
        ]));
        let link = Arc::new(RobotLink::new(LinkConfig::new("127.0.0.1", 1)));
        let pipeline = CommandPipeline::new(
            Arc::clone(&gen) as Arc<dyn TextGenerator>,
            store,
            PipelineConfig::default(),
        )
        .unwrap()
        .with_link(link);

        let command = pipeline.process("forward ten").await.unwrap();
        assert_eq!(command, "D10F;");
    }

    #[tokio::test]
    async fn delivers_to_connected_link() {
        use tokio::io::{AsyncBufReadExt, BufReader};
        use tokio::net::TcpListener;

        let server = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = server.local_addr().unwrap().port();

        let (_dir, store) = store_with_templates();
        let gen = Arc::new(ScriptedGenerator::new(vec![
            "forward 10 centimeters".into(),
            "D10F;".into(),
        ]));
        let link = Arc::new(RobotLink::new(LinkConfig::new("127.0.0.1", port)));
        assert!(link.connect().await);
        let (peer, _) = server.accept().await.unwrap();

        let pipeline = CommandPipeline::new(
            Arc::clone(&gen) as Arc<dyn TextGenerator>,
            store,
            PipelineConfig::default(),
        )
        .unwrap()
        .with_link(Arc::clone(&link));

        let command = pipeline.process("forward ten centimeters").await.unwrap();
        assert_eq!(command, "D10F;");

        let mut lines = BufReader::new(peer).lines();
        let line = tokio::time::timeout(std::time::Duration::from_secs(1), lines.next_line())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(line.as_deref(), Some("D10F;"));

        link.disconnect().await;
    }
}
