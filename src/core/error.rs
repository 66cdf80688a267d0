use thiserror::Error;

#[derive(Error, Debug)]
pub enum KreatureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Name list is empty: {0}")]
    EmptyNameList(String),
}

pub type Result<T> = std::result::Result<T, KreatureError>;
