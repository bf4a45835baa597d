use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required config key: {0}")]
    Missing(String),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
