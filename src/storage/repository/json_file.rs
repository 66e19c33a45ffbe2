// JSON 文件后端 - 每个存储键对应目录下的一个 `<key>.json` 文件

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::{validate_key, StoreBackend};

pub struct JsonFileBackend {
    dir: PathBuf,
}

impl JsonFileBackend {
    /// 创建后端，目录不存在时自动创建
    pub async fn new(dir: PathBuf) -> Result<Self> {
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("创建存储目录失败: {:?}", dir))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl StoreBackend for JsonFileBackend {
    async fn load(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let path = self.path_for(key)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("读取存储文件失败: {:?}", path)),
        };

        if bytes.is_empty() {
            return Ok(None);
        }

        let value = serde_json::from_slice(&bytes)
            .with_context(|| format!("解析存储文件失败: {:?}", path))?;
        Ok(Some(value))
    }

    async fn save(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let path = self.path_for(key)?;
        let json = serde_json::to_string_pretty(value)?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("写入存储文件失败: {:?}", path))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("删除存储文件失败: {:?}", path)),
        }
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn backend_type(&self) -> &str {
        "json_file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_save_load_remove() {
        let temp_dir = tempdir().unwrap();
        let backend = JsonFileBackend::new(temp_dir.path().join("stores"))
            .await
            .unwrap();

        assert!(backend.load("orders-storage").await.unwrap().is_none());

        let value = json!([{ "id": "order-1" }]);
        backend.save("orders-storage", &value).await.unwrap();
        assert_eq!(backend.load("orders-storage").await.unwrap(), Some(value));
        assert_eq!(backend.keys().await.unwrap(), vec!["orders-storage"]);

        backend.remove("orders-storage").await.unwrap();
        backend.remove("orders-storage").await.unwrap();
        assert!(backend.load("orders-storage").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let backend = JsonFileBackend::new(temp_dir.path().to_path_buf())
            .await
            .unwrap();
        tokio::fs::write(temp_dir.path().join("tasks-storage.json"), b"{not json")
            .await
            .unwrap();

        assert!(backend.load("tasks-storage").await.is_err());
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let temp_dir = tempdir().unwrap();
        let backend = JsonFileBackend::new(temp_dir.path().to_path_buf())
            .await
            .unwrap();
        assert!(backend.save("../escape", &json!([])).await.is_err());
    }
}
