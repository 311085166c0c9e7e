use thiserror::Error;

use crate::pipeline::Stage;

#[derive(Error, Debug)]
pub enum CodexError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Integrity error: {0}")]
    Integrity(String),

    #[error("{stage} stage failed: {source}")]
    Generation {
        stage: Stage,
        #[source]
        source: Box<CodexError>,
    },

    #[error("Input error: {0}")]
    Input(String),

    /// A generation session ended without a World State
    #[error("{0}")]
    Session(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl CodexError {
    /// Wrap an error with the stage it occurred in
    pub fn in_stage(self, stage: Stage) -> Self {
        CodexError::Generation {
            stage,
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping stage wrappers
    pub fn root(&self) -> &CodexError {
        match self {
            CodexError::Generation { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, CodexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_wrapping_keeps_cause() {
        let err = CodexError::Transport("connection refused".into()).in_stage(Stage::Foundation);
        let message = err.to_string();
        assert!(message.starts_with("Foundation stage failed"));
        assert!(message.contains("connection refused"));
        assert!(matches!(err.root(), CodexError::Transport(_)));
    }
}
