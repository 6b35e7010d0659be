use thiserror::Error;

use crate::modules::chat::ApplicationError;
use crate::modules::config::ConfigError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Chat error: {0}")]
    ChatError(#[from] ApplicationError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Provider list error: {0}")]
    ProviderListError(String),
}

pub type AppResult<T> = Result<T, AppError>;
