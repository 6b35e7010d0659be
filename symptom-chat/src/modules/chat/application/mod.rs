// Chat Application Layer - 应用层
// 会话对象协调显示端口和症状服务端口

mod session;

pub use session::*;

use thiserror::Error;

use super::ports::SymptomServiceError;

/// 应用层错误类型
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Symptom service error: {0}")]
    Service(#[from] SymptomServiceError),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
