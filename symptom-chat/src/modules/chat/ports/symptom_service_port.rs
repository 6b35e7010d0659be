use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

use super::super::domain::MessageRole;

/// 症状服务错误类型
#[derive(Debug, Error)]
pub enum SymptomServiceError {
    /// 连接失败或超时
    #[error("Network error: {0}")]
    Network(String),

    /// 服务返回非 2xx 状态码
    #[error("Service error: {status} - {body}")]
    Service { status: u16, body: String },

    /// 响应体无法解析或缺少字段
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl SymptomServiceError {
    /// 用于日志的错误分类
    pub fn kind(&self) -> &'static str {
        match self {
            SymptomServiceError::Network(_) => "network",
            SymptomServiceError::Service { .. } => "service",
            SymptomServiceError::Protocol(_) => "protocol",
        }
    }
}

/// 历史记录条目（线上格式）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: MessageRole,
    pub content: String,
}

/// 开始对话请求
///
/// 不带提示时序列化为 `{}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptom_hint: Option<String>,
}

impl StartRequest {
    pub fn with_hint(hint: impl Into<String>) -> Self {
        Self {
            symptom_hint: Some(hint.into()),
        }
    }
}

/// 回复请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyRequest {
    /// 截至当前用户消息的完整历史
    pub history: Vec<HistoryEntry>,
    pub consent: bool,
    /// 服务端在 start 时分配的会话 ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// 服务端回复
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceReply {
    pub reply: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl ServiceReply {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            session_id: None,
        }
    }
}

/// 医疗机构查询条件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderQuery {
    pub specialty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<String>,
}

impl ProviderQuery {
    pub fn new(specialty: impl Into<String>) -> Self {
        Self {
            specialty: specialty.into(),
            city: None,
            urgency: None,
        }
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }
}

/// 医疗机构
///
/// 字段按服务端的 providers.json 原样接收，缺失或为 null 时取默认值
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub specialty: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub booking_url: String,
    #[serde(default)]
    pub booking_vendor: Option<String>,
    /// 预约原因到预约平台原因代码的映射，代码可以是字符串或数字
    #[serde(default, deserialize_with = "reason_codes")]
    pub reason_map: HashMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub visible: bool,
}

impl Provider {
    /// 根据预约原因生成预约链接
    ///
    /// 只有 doctolib 平台且原因有非空映射时才附加 `reason` 参数
    pub fn booking_link(&self, reason_key: &str) -> String {
        let url = self.booking_url.trim_end_matches('/');
        let reason = self
            .reason_map
            .get(reason_key)
            .filter(|reason| !reason.is_empty());
        match (self.booking_vendor.as_deref(), reason) {
            (Some("doctolib"), Some(reason)) => format!("{}?reason={}", url, reason),
            _ => url.to_string(),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 原因代码统一转成字符串，null 和其他类型的条目忽略
fn reason_codes<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<HashMap<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, code)| match code {
            Value::String(code) => Some((key, code)),
            Value::Number(code) => Some((key, code.to_string())),
            _ => None,
        })
        .collect())
}

/// 预约意向
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingIntent {
    pub provider_id: String,
    pub reason_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// 预约链接
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingLink {
    pub booking_url: String,
}

/// 健康状态
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub is_healthy: bool,
    pub latency_ms: Option<u64>,
}

/// 症状服务端口 - 核心抽象接口
///
/// 会话只通过此 trait 与远端交互，测试时可注入替身实现
#[async_trait]
pub trait SymptomServicePort: Send + Sync {
    /// 服务标识（用于日志）
    fn service_id(&self) -> &str;

    /// 开始对话
    async fn start(&self, request: StartRequest) -> Result<ServiceReply, SymptomServiceError>;

    /// 发送历史和同意状态，获取下一条回复
    async fn reply(&self, request: ReplyRequest) -> Result<ServiceReply, SymptomServiceError>;

    /// 查询医疗机构
    async fn search_providers(
        &self,
        query: ProviderQuery,
    ) -> Result<Vec<Provider>, SymptomServiceError>;

    /// 提交预约意向，获取预约链接
    async fn book_intent(&self, intent: BookingIntent) -> Result<BookingLink, SymptomServiceError>;

    /// 健康检查
    async fn health_check(&self) -> Result<HealthStatus, SymptomServiceError>;
}
