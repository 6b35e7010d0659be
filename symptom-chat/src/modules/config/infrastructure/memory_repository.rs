// In-Memory Config Repository
//
// 基于内存的配置仓储实现（未指定配置文件时使用）

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::modules::config::domain::WidgetConfig;
use crate::modules::config::ports::{ConfigError, ConfigRepository};

/// 内存配置仓储
#[derive(Default)]
pub struct InMemoryConfigRepository {
    config: RwLock<Option<WidgetConfig>>,
}

impl InMemoryConfigRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: WidgetConfig) -> Self {
        Self {
            config: RwLock::new(Some(config)),
        }
    }
}

#[async_trait]
impl ConfigRepository for InMemoryConfigRepository {
    async fn load(&self) -> Result<WidgetConfig, ConfigError> {
        let config = self.config.read().await;
        Ok(config.clone().unwrap_or_default())
    }

    async fn save(&self, config: &WidgetConfig) -> Result<(), ConfigError> {
        let mut current = self.config.write().await;
        *current = Some(config.clone());
        Ok(())
    }

    async fn exists(&self) -> Result<bool, ConfigError> {
        Ok(self.config.read().await.is_some())
    }
}
