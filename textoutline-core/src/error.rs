use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutlineError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid outline config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid vertex file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("vertex index {index} out of range (stream has {len} vertices)")]
    IndexOutOfRange { index: u32, len: usize },
    #[error("invalid color '{0}': expected #rrggbb or #rrggbbaa")]
    InvalidColor(String),
    #[error("vertex layout covers {actual} bytes but UiVertex is {expected} bytes")]
    LayoutMismatch { expected: u32, actual: u32 },
}

pub type Result<T> = std::result::Result<T, OutlineError>;
