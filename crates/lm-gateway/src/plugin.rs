use crate::{GatewayError, Result, TextGenerator};
use std::sync::Arc;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GeneratorKind {
    Scripted,
    OpenAi,
}

/// Build a generator backend. Backends compiled out return an error rather
/// than silently falling back.
pub fn new_generator(
    kind: GeneratorKind,
    api_key: Option<String>,
) -> Result<Arc<dyn TextGenerator>> {
    match kind {
        GeneratorKind::Scripted => {
            #[cfg(feature = "mock")]
            {
                let _ = api_key;
                Ok(Arc::new(crate::ScriptedGenerator::new(vec![
                    "D100F;R90L;".to_string(),
                ])))
            }
            #[cfg(not(feature = "mock"))]
            {
                let _ = api_key;
                Err(GatewayError::Unavailable("mock feature not enabled"))
            }
        }
        GeneratorKind::OpenAi => {
            #[cfg(feature = "openai-http")]
            {
                let key = api_key.ok_or(GatewayError::Unavailable("no API key configured"))?;
                let gateway = crate::OpenAiGateway::new(None, key)?;
                Ok(Arc::new(gateway) as Arc<dyn TextGenerator>)
            }
            #[cfg(not(feature = "openai-http"))]
            {
                let _ = api_key;
                Err(GatewayError::Unavailable("openai-http feature not enabled"))
            }
        }
    }
}
