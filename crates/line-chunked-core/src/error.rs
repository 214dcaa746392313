pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid line-chunked configuration ({option}): {message}")]
    InvalidConfig { option: String, message: String },

    #[error("Configuration JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_config(option: &str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            option: option.to_string(),
            message: message.into(),
        }
    }
}
