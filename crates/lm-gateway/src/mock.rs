//! Scripted generator for development and testing.

use crate::{GenerateOptions, Result, TextGenerator};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Returns one canned output per call and records every prompt it was
/// given. Once the script runs out, the last entry repeats.
pub struct ScriptedGenerator {
    outputs: Vec<String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(outputs: Vec<String>) -> Self {
        Self {
            outputs,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Number of generate calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts seen so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        let output = self
            .outputs
            .get(call)
            .or_else(|| self.outputs.last())
            .cloned()
            .unwrap_or_default();
        tracing::debug!(call, model = %options.model, "scripted generation");
        Ok(output)
    }
}
