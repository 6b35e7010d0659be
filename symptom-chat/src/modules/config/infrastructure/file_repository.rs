// File-based Config Repository
//
// 基于 JSON 文件的配置仓储实现

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::debug;

use crate::modules::config::domain::WidgetConfig;
use crate::modules::config::ports::{ConfigError, ConfigRepository};

/// 文件配置仓储
///
/// 首次加载后缓存在内存中
pub struct FileConfigRepository {
    /// 配置文件路径
    config_path: PathBuf,
    /// 内存缓存
    cache: RwLock<Option<WidgetConfig>>,
}

impl FileConfigRepository {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            cache: RwLock::new(None),
        }
    }

    /// 从文件加载配置
    async fn load_from_file(&self) -> Result<Option<WidgetConfig>, ConfigError> {
        if !self.config_path.exists() {
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(&self.config_path)
            .await
            .map_err(|e| ConfigError::StorageError(e.to_string()))?;

        let config: WidgetConfig = serde_json::from_str(&content)?;
        debug!("Loaded config from {:?}", self.config_path);

        Ok(Some(config))
    }

    /// 保存配置到文件
    async fn save_to_file(&self, config: &WidgetConfig) -> Result<(), ConfigError> {
        // 确保目录存在
        if let Some(parent) = self.config_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::StorageError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(config)?;

        tokio::fs::write(&self.config_path, content)
            .await
            .map_err(|e| ConfigError::StorageError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl ConfigRepository for FileConfigRepository {
    async fn load(&self) -> Result<WidgetConfig, ConfigError> {
        // 先检查缓存
        {
            let cache = self.cache.read().await;
            if let Some(ref config) = *cache {
                return Ok(config.clone());
            }
        }

        let config = self.load_from_file().await?.unwrap_or_default();

        {
            let mut cache = self.cache.write().await;
            *cache = Some(config.clone());
        }

        Ok(config)
    }

    async fn save(&self, config: &WidgetConfig) -> Result<(), ConfigError> {
        self.save_to_file(config).await?;

        {
            let mut cache = self.cache.write().await;
            *cache = Some(config.clone());
        }

        Ok(())
    }

    async fn exists(&self) -> Result<bool, ConfigError> {
        Ok(self.config_path.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileConfigRepository::new(dir.path().join("config.json"));

        assert!(!repo.exists().await.unwrap());
        assert_eq!(repo.load().await.unwrap(), WidgetConfig::default());
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = WidgetConfig::default();
        config.service.base_url = "https://triage.example.org".to_string();

        FileConfigRepository::new(&path).save(&config).await.unwrap();

        let reloaded = FileConfigRepository::new(&path);
        assert!(reloaded.exists().await.unwrap());
        assert_eq!(reloaded.load().await.unwrap(), config);
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = FileConfigRepository::new(&path).load().await;
        assert!(matches!(result, Err(ConfigError::SerializationError(_))));
    }
}
