use std::path::{Path, PathBuf};
use thiserror::Error;

/// A missing or unreadable template indicates a broken deployment, so this
/// error is fatal and never retried.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template '{id}' not found at {path}")]
    NotFound { id: String, path: String },
    #[error("reading template '{id}': {source}")]
    Io {
        id: String,
        #[source]
        source: std::io::Error,
    },
}

/// Loads fixed instruction templates from a directory, one `<id>.txt` file
/// per template.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn load(&self, id: &str) -> Result<String, TemplateError> {
        let path = self.dir.join(format!("{id}.txt"));
        if !path.is_file() {
            return Err(TemplateError::NotFound {
                id: id.to_string(),
                path: path.display().to_string(),
            });
        }
        std::fs::read_to_string(&path).map_err(|source| TemplateError::Io {
            id: id.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_template_by_id() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("convert-to-lbml.txt"), "You are a robot.\n").unwrap();

        let store = TemplateStore::new(dir.path());
        let text = store.load("convert-to-lbml").unwrap();
        assert_eq!(text, "You are a robot.\n");
    }

    #[test]
    fn missing_template_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = TemplateStore::new(dir.path());
        let err = store.load("nope").unwrap_err();
        assert!(matches!(err, TemplateError::NotFound { .. }));
        assert!(err.to_string().contains("nope"));
    }
}
