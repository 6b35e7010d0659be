// Config Module
//
// 配置管理模块，采用六边形架构
//
// 层次结构:
// - domain: 领域层，包含配置实体和覆盖项
// - ports: 端口层，定义配置读写的抽象接口
// - infrastructure: 基础设施层，实现具体的配置存储适配器

pub mod domain;
pub mod infrastructure;
pub mod ports;

// 重新导出常用类型

// Domain
pub use domain::{
    ConfigOverrides, ConsentConfig, DisplayConfig, ServiceConfig, WidgetConfig, DEFAULT_BASE_URL,
    DEFAULT_TIMEOUT_SECS,
};

// Ports
pub use ports::{ConfigError, ConfigRepository};

// Infrastructure
pub use infrastructure::{FileConfigRepository, InMemoryConfigRepository};

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Config 模块容器
///
/// 管理模块内的依赖注入
pub struct ConfigModule {
    repository: Arc<dyn ConfigRepository>,
}

impl ConfigModule {
    /// 使用内存仓储创建
    pub fn new_in_memory() -> Self {
        Self::with_repository(Arc::new(InMemoryConfigRepository::new()))
    }

    /// 使用配置文件创建
    pub fn new_with_file(config_path: impl Into<PathBuf>) -> Self {
        Self::with_repository(Arc::new(FileConfigRepository::new(config_path)))
    }

    /// 使用自定义仓储创建
    pub fn with_repository(repository: Arc<dyn ConfigRepository>) -> Self {
        Self { repository }
    }

    /// 加载配置、应用覆盖项并校验
    pub async fn load(&self, overrides: &ConfigOverrides) -> Result<WidgetConfig, ConfigError> {
        if !self.repository.exists().await? {
            debug!("No stored configuration, using defaults");
        }

        let mut config = self.repository.load().await?;
        config.apply_overrides(overrides);

        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ConfigError::ValidationError { errors });
        }

        info!(
            base_url = %config.service.base_url,
            timeout_secs = config.service.timeout_secs,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// 保存配置
    pub async fn save(&self, config: &WidgetConfig) -> Result<(), ConfigError> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ConfigError::ValidationError { errors });
        }
        self.repository.save(config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_defaults_in_memory() {
        let module = ConfigModule::new_in_memory();
        let config = module.load(&ConfigOverrides::default()).await.unwrap();

        assert_eq!(config, WidgetConfig::default());
    }

    #[tokio::test]
    async fn test_overrides_take_priority_over_stored_config() {
        let mut stored = WidgetConfig::default();
        stored.service.base_url = "https://stored.example.org".to_string();
        let module =
            ConfigModule::with_repository(Arc::new(InMemoryConfigRepository::with_config(stored)));

        let config = module
            .load(&ConfigOverrides {
                base_url: Some("https://flag.example.org".to_string()),
                ..ConfigOverrides::default()
            })
            .await
            .unwrap();

        assert_eq!(config.service.base_url, "https://flag.example.org");
    }

    #[tokio::test]
    async fn test_invalid_override_is_rejected() {
        let module = ConfigModule::new_in_memory();
        let result = module
            .load(&ConfigOverrides {
                base_url: Some("not-a-url".to_string()),
                ..ConfigOverrides::default()
            })
            .await;

        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[tokio::test]
    async fn test_save_rejects_invalid_config() {
        let module = ConfigModule::new_in_memory();
        let mut config = WidgetConfig::default();
        config.consent.token = String::new();

        assert!(module.save(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_save_then_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = WidgetConfig::default();
        config.display.user_label = "Sie".to_string();
        ConfigModule::new_with_file(&path).save(&config).await.unwrap();

        let loaded = ConfigModule::new_with_file(&path)
            .load(&ConfigOverrides::default())
            .await
            .unwrap();
        assert_eq!(loaded.display.user_label, "Sie");
    }
}
