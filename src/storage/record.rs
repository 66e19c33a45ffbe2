// 记录抽象 - 所有存储实体共用的接口

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// 存储中的一条记录
///
/// 标识和时间戳由存储生成，调用方只提供 `Draft`（新建内容）
/// 和 `Patch`（只包含需要覆盖的字段）。
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// 新建时调用方提供的内容（不含 id 和时间戳）
    type Draft: Send;
    /// 部分更新，`Some` 字段覆盖原值
    type Patch: Send;

    /// 标识前缀，例如 `task`
    const ID_PREFIX: &'static str;

    fn id(&self) -> &str;

    /// 所属租户（平台级记录返回 None）
    fn tenant_id(&self) -> Option<&str> {
        None
    }

    /// 根据草稿构造记录
    fn from_draft(id: String, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// 浅合并补丁
    fn apply_patch(&mut self, patch: Self::Patch);

    /// 刷新更新时间
    fn touch(&mut self, now: DateTime<Utc>);
}

/// 生成记录标识：`<前缀>-<uuid v4>`
pub fn new_record_id(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_id_is_unique() {
        let ids: std::collections::HashSet<String> =
            (0..1000).map(|_| new_record_id("task")).collect();
        assert_eq!(ids.len(), 1000);
        assert!(ids.iter().all(|id| id.starts_with("task-")));
    }
}
