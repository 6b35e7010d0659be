// Config Domain Entities
//
// 配置领域实体定义

use serde::{Deserialize, Serialize};

use crate::modules::chat::domain::{ConsentMatchMode, MessageRole, DEFAULT_CONSENT_TOKEN};
use crate::modules::chat::DEFAULT_UNAVAILABLE_NOTICE;

/// 默认服务地址
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// 默认请求超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// 远端服务配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// 同意检测配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsentConfig {
    pub token: String,
    pub match_mode: ConsentMatchMode,
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            token: DEFAULT_CONSENT_TOKEN.to_string(),
            match_mode: ConsentMatchMode::default(),
        }
    }
}

/// 显示配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayConfig {
    pub user_label: String,
    pub bot_label: String,
    pub unavailable_notice: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            user_label: MessageRole::User.default_label().to_string(),
            bot_label: MessageRole::Bot.default_label().to_string(),
            unavailable_notice: DEFAULT_UNAVAILABLE_NOTICE.to_string(),
        }
    }
}

/// 配置覆盖项（来自命令行或环境变量）
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub consent_token: Option<String>,
}

/// 应用配置聚合根
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetConfig {
    pub service: ServiceConfig,
    pub consent: ConsentConfig,
    pub display: DisplayConfig,
}

impl WidgetConfig {
    /// 应用覆盖项
    ///
    /// 服务地址无论来自哪里都会去掉首尾空白
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        let base_url = overrides
            .base_url
            .as_deref()
            .unwrap_or(self.service.base_url.as_str());
        self.service.base_url = base_url.trim().to_string();
        if let Some(timeout_secs) = overrides.timeout_secs {
            self.service.timeout_secs = timeout_secs;
        }
        if let Some(token) = &overrides.consent_token {
            self.consent.token = token.clone();
        }
    }

    /// 校验配置，返回所有问题
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let base_url = &self.service.base_url;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            errors.push(format!(
                "service.baseUrl must start with http:// or https://, got '{}'",
                self.service.base_url
            ));
        }
        if self.service.timeout_secs == 0 {
            errors.push("service.timeoutSecs must be greater than 0".to_string());
        }
        if self.consent.token.trim().is_empty() {
            errors.push("consent.token cannot be empty".to_string());
        } else if self.consent.match_mode == ConsentMatchMode::Word
            && !self.consent.token.chars().all(char::is_alphanumeric)
        {
            // 按单词匹配时文本按非字母数字切分，关键字只能是单个单词
            errors.push(format!(
                "consent.token must be a single word in word match mode, got '{}'",
                self.consent.token
            ));
        }

        errors
    }
}
