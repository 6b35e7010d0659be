use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 消息角色
///
/// 线上格式固定为 `"user"` / `"bot"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// 用户输入
    User,
    /// 服务端回复
    Bot,
}

impl MessageRole {
    /// 默认显示标签
    pub fn default_label(&self) -> &'static str {
        match self {
            MessageRole::User => "User",
            MessageRole::Bot => "Bot",
        }
    }
}

/// 消息实体
///
/// 创建后不可变，只会被追加到会话记录中
#[derive(Debug, Clone)]
pub struct Message {
    role: MessageRole,
    content: String,
    /// 本地创建时间
    created_at: DateTime<Utc>,
}

impl Message {
    /// 创建用户消息
    pub fn new_user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// 创建服务端回复消息
    pub fn new_bot(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Bot, content)
    }

    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}
