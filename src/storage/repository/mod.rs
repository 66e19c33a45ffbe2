// Repository 抽象层 - 定义持久化后端接口
//
// 每个存储以名称为键整体写入（相当于浏览器本地存储中的一个键）

pub mod json_file;
pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

/// 持久化后端接口 - 所有后端实现必须实现此 trait
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// 读取某个键下保存的集合，键不存在时返回 None
    async fn load(&self, key: &str) -> Result<Option<serde_json::Value>>;

    /// 覆盖写入某个键
    async fn save(&self, key: &str, value: &serde_json::Value) -> Result<()>;

    /// 删除某个键（不存在时不报错）
    async fn remove(&self, key: &str) -> Result<()>;

    /// 列出所有已保存的键
    async fn keys(&self) -> Result<Vec<String>>;

    /// 获取后端类型标识
    fn backend_type(&self) -> &str;
}

/// 校验存储键，只允许字母、数字、`-`、`_`（防止路径遍历）
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        anyhow::bail!("无效的存储键: {:?}", key);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("maintenance-storage-v1").is_ok());
        assert!(validate_key("auth_storage").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("a/b").is_err());
    }
}
