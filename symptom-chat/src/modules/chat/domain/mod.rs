// Chat Domain Layer
// 领域层包含会话记录、同意标记等纯业务类型，不涉及 IO

pub mod entities;
pub mod services;
pub mod value_objects;

// 重导出常用类型
pub use entities::{Message, MessageRole, Transcript};
pub use services::{ConsentDetector, ConsentMatchMode, DEFAULT_CONSENT_TOKEN};
pub use value_objects::{ConsentFlag, SessionId};
