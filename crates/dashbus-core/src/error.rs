use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("unknown event kind: {0:?}")]
    UnknownKind(String),
}

impl CoreError {
    /// Short stable label for log fields.
    pub fn as_label(&self) -> &'static str {
        match self {
            CoreError::Io(_) => "io",
            CoreError::Serde(_) => "serde",
            CoreError::Config(_) => "config",
            CoreError::UnknownKind(_) => "unknown_kind",
        }
    }
}
