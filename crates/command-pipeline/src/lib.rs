//! command-pipeline: free text in, validated LBML out
//!
//! Composes the optional unit-normalization pre-pass, the bounded-retry
//! generation/validation loop, and best-effort delivery over a robot link
//! into the one operation upstream callers depend on. Nothing that failed
//! grammar validation is ever returned or delivered.

mod error;
pub use error::{PipelineError, Result};

mod convert;
pub use convert::{ConverterConfig, RetryingConverter};

mod pipeline;
pub use pipeline::{CommandPipeline, PipelineConfig};
