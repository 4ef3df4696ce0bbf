use thiserror::Error;

pub type Result<T, E = GatewayError> = core::result::Result<T, E>;

/// Failure of the text-generation capability itself. Provider and transport
/// problems are wrapped here rather than swallowed.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("http transport: {0}")]
    Http(String),
    #[error("provider returned status {0}")]
    Status(u16),
    #[error("malformed provider response: {0}")]
    Malformed(&'static str),
    #[error("backend not available: {0}")]
    Unavailable(&'static str),
}
