use lm_gateway::{GatewayError, TemplateError};
use thiserror::Error;

pub type Result<T, E = PipelineError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Broken deployment; fatal, never retried.
    #[error(transparent)]
    Template(#[from] TemplateError),
    /// The model call itself failed, as opposed to returning an invalid
    /// completion.
    #[error("language model call failed: {0}")]
    Generate(#[from] GatewayError),
    /// No valid command emerged within the attempt budget.
    #[error("no valid command after {attempts} attempts (last output: {last_output:?})")]
    Exhausted { attempts: u32, last_output: String },
    #[error("grammar setup failed: {0}")]
    Grammar(#[from] lbml_grammar::GrammarError),
}
