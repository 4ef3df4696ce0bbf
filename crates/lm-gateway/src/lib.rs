//! lm-gateway: opaque language-model text-completion capability
//!
//! Exposes the `generate(prompt) -> text` seam the command pipeline is built
//! against, with feature-gated backends. The default build enables a
//! scripted mock so binaries compile and run on any host without provider
//! credentials. Also home to the prompt [`TemplateStore`], since templates
//! only exist to be prepended to prompts.

mod types;
pub use types::GenerateOptions;

mod error;
pub use error::{GatewayError, Result};

mod traits;
pub use traits::TextGenerator;

mod templates;
pub use templates::{TemplateError, TemplateStore};

pub mod plugin;
pub use plugin::{new_generator, GeneratorKind};

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::ScriptedGenerator;

#[cfg(feature = "openai-http")]
mod openai_http;
#[cfg(feature = "openai-http")]
pub use openai_http::OpenAiGateway;
