use thiserror::Error;

#[derive(Debug, Error)]
pub enum KotoError {
    #[error("unknown database: {0}")]
    DatabaseNotFound(String),

    #[error("unknown property '{property}' on database '{database}'")]
    PropertyNotFound { database: String, property: String },

    #[error("invalid value for property '{property}': {reason}")]
    InvalidValue { property: String, reason: String },

    #[error("config not found at {0}")]
    ConfigNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KotoError>;
