use thiserror::Error;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Tile definition not found: {0}")]
    DefinitionNotFound(String),

    #[error("Malformed frame range: {0:?}")]
    MalformedRange(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SceneError>;
