use thiserror::Error;

#[derive(Error, Debug)]
pub enum SelectorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid application list: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Application #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to fetch applications: {0}")]
    Fetch(String),
}

pub type Result<T> = std::result::Result<T, SelectorError>;
