// 存储配置定义

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::repository::json_file::JsonFileBackend;
use super::repository::memory::MemoryBackend;
use super::repository::StoreBackend;

/// 持久化后端配置类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BackendConfig {
    /// JSON 文件（每个存储一个文件）
    #[serde(rename = "json_file")]
    JsonFile {
        /// 存储目录，相对路径以数据目录为基准
        dir: String,
    },
    /// 仅内存，不落盘
    #[serde(rename = "memory")]
    Memory,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::JsonFile {
            dir: "stores".to_string(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 后端配置
    #[serde(default)]
    pub backend: BackendConfig,
    /// 存储首次创建时是否写入演示数据
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,
}

fn default_seed_demo_data() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            seed_demo_data: default_seed_demo_data(),
        }
    }
}

/// 根据配置打开持久化后端
pub async fn open_backend(config: &StorageConfig, data_dir: &Path) -> Result<Arc<dyn StoreBackend>> {
    match &config.backend {
        BackendConfig::JsonFile { dir } => {
            let path = Path::new(dir);
            let path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                data_dir.join(path)
            };
            Ok(Arc::new(JsonFileBackend::new(path).await?))
        }
        BackendConfig::Memory => Ok(Arc::new(MemoryBackend::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_backend_config_serde() {
        let config: StorageConfig = serde_json::from_str(r#"{"backend":{"type":"memory"}}"#).unwrap();
        assert_eq!(config.backend, BackendConfig::Memory);
        assert!(config.seed_demo_data);

        let config: StorageConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, StorageConfig::default());
    }

    #[tokio::test]
    async fn test_open_relative_json_backend() {
        let temp_dir = tempdir().unwrap();
        let backend = open_backend(&StorageConfig::default(), temp_dir.path())
            .await
            .unwrap();
        assert_eq!(backend.backend_type(), "json_file");
        assert!(temp_dir.path().join("stores").is_dir());
    }
}
