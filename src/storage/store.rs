// 通用记录存储 - 有序集合 + 变更通知 + 可选持久化
//
// 所有业务模块（任务、事故、检验……）共用同一个实现，
// 每次有效修改后发布事件，并在配置了后端时整体写入存储键。

use std::convert::Infallible;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::record::{new_record_id, Record};
use super::repository::StoreBackend;
use crate::event_bus::{AppEvent, EventBus};

pub struct RecordStore<T: Record> {
    /// 存储名称（同时也是持久化键）
    name: String,
    records: RwLock<Vec<T>>,
    backend: Option<Arc<dyn StoreBackend>>,
    event_bus: Option<Arc<EventBus>>,
}

impl<T: Record> RecordStore<T> {
    /// 创建不持久化、不发布事件的存储
    pub fn in_memory(name: &str, records: Vec<T>) -> Self {
        Self {
            name: name.to_string(),
            records: RwLock::new(records),
            backend: None,
            event_bus: None,
        }
    }

    /// 打开存储
    ///
    /// 后端中已有该键时加载其内容；否则使用 `seed` 并立即写回后端。
    /// 读取或解析失败直接返回错误。
    pub async fn open(
        name: &str,
        backend: Option<Arc<dyn StoreBackend>>,
        event_bus: Option<Arc<EventBus>>,
        seed: Vec<T>,
    ) -> Result<Self> {
        let mut seeded = false;
        let records = match &backend {
            Some(backend) => match backend.load(name).await? {
                Some(value) => serde_json::from_value::<Vec<T>>(value)
                    .with_context(|| format!("存储 {} 的数据格式无效", name))?,
                None => {
                    seeded = true;
                    seed
                }
            },
            None => seed,
        };

        debug!("存储 {} 已打开，记录数: {}", name, records.len());

        let store = Self {
            name: name.to_string(),
            records: RwLock::new(records),
            backend,
            event_bus,
        };

        if seeded {
            let records = store.records.read().await;
            store.persist(&records).await;
        }

        Ok(store)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 全部记录（按存储顺序）
    pub async fn all(&self) -> Vec<T> {
        self.records.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<T> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id() == id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// 按条件过滤，保持存储顺序
    pub async fn filter<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }

    pub async fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&T) -> bool,
    {
        self.records.read().await.iter().filter(|r| predicate(r)).count()
    }

    /// 某租户的全部记录
    pub async fn by_tenant(&self, tenant_id: &str) -> Vec<T> {
        self.filter(|r| r.tenant_id() == Some(tenant_id)).await
    }

    /// 新增记录：生成标识和时间戳，追加到末尾并返回
    pub async fn add(&self, draft: T::Draft) -> T {
        let record = T::from_draft(new_record_id(T::ID_PREFIX), draft, Utc::now());

        let mut records = self.records.write().await;
        records.push(record.clone());
        self.persist(&records).await;
        drop(records);

        debug!("存储 {} 新增记录 {}", self.name, record.id());
        self.publish(AppEvent::RecordAdded {
            store: self.name.clone(),
            id: record.id().to_string(),
        });
        record
    }

    /// 批量新增（导入），只写入一次
    pub async fn add_many(&self, drafts: Vec<T::Draft>) -> Vec<T> {
        let now = Utc::now();
        let created: Vec<T> = drafts
            .into_iter()
            .map(|draft| T::from_draft(new_record_id(T::ID_PREFIX), draft, now))
            .collect();

        if created.is_empty() {
            return created;
        }

        let mut records = self.records.write().await;
        records.extend(created.iter().cloned());
        self.persist(&records).await;
        let count = records.len();
        drop(records);

        debug!("存储 {} 批量新增 {} 条记录", self.name, created.len());
        self.publish(AppEvent::StoreReplaced {
            store: self.name.clone(),
            count,
        });
        created
    }

    /// 浅合并更新；标识不存在时静默忽略并返回 None
    pub async fn update(&self, id: &str, patch: T::Patch) -> Option<T> {
        self.update_with(id, move |record| record.apply_patch(patch))
            .await
    }

    /// 用闭包修改记录并刷新更新时间；标识不存在时返回 None
    pub async fn update_with<F>(&self, id: &str, f: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        self.mutate(id, true, |record| {
            f(record);
            Ok::<(), Infallible>(())
        })
        .await
        .unwrap_or_else(|never| match never {})
    }

    /// 用闭包修改记录，不刷新更新时间（计数器等）
    pub async fn modify<F>(&self, id: &str, f: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        self.mutate(id, false, |record| {
            f(record);
            Ok::<(), Infallible>(())
        })
        .await
        .unwrap_or_else(|never| match never {})
    }

    /// 带校验的修改：闭包返回错误时不写入、不发布事件
    ///
    /// 闭包在返回错误之前不得修改记录。
    pub async fn try_update_with<F, E>(&self, id: &str, f: F) -> Result<Option<T>, E>
    where
        F: FnOnce(&mut T) -> Result<(), E>,
    {
        self.mutate(id, true, f).await
    }

    async fn mutate<F, E>(&self, id: &str, touch: bool, f: F) -> Result<Option<T>, E>
    where
        F: FnOnce(&mut T) -> Result<(), E>,
    {
        let mut records = self.records.write().await;
        let Some(record) = records.iter_mut().find(|r| r.id() == id) else {
            return Ok(None);
        };
        f(record)?;
        if touch {
            record.touch(Utc::now());
        }
        let updated = record.clone();
        self.persist(&records).await;
        drop(records);

        debug!("存储 {} 更新记录 {}", self.name, id);
        self.publish(AppEvent::RecordUpdated {
            store: self.name.clone(),
            id: id.to_string(),
        });
        Ok(Some(updated))
    }

    /// 对所有记录执行闭包，闭包返回 true 表示该记录被修改，返回修改条数
    pub async fn update_where<F>(&self, mut f: F) -> usize
    where
        F: FnMut(&mut T) -> bool,
    {
        let now = Utc::now();
        let mut records = self.records.write().await;
        let mut changed_ids = Vec::new();
        for record in records.iter_mut() {
            if f(record) {
                record.touch(now);
                changed_ids.push(record.id().to_string());
            }
        }
        if changed_ids.is_empty() {
            return 0;
        }
        self.persist(&records).await;
        drop(records);

        for id in &changed_ids {
            self.publish(AppEvent::RecordUpdated {
                store: self.name.clone(),
                id: id.clone(),
            });
        }
        changed_ids.len()
    }

    /// 删除记录；标识不存在时静默忽略并返回 false
    pub async fn delete(&self, id: &str) -> bool {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return false;
        }
        self.persist(&records).await;
        drop(records);

        debug!("存储 {} 删除记录 {}", self.name, id);
        self.publish(AppEvent::RecordDeleted {
            store: self.name.clone(),
            id: id.to_string(),
        });
        true
    }

    /// 按条件删除，返回删除条数
    pub async fn delete_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&T) -> bool,
    {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| !predicate(r));
        let removed = before - records.len();
        if removed == 0 {
            return 0;
        }
        self.persist(&records).await;
        let count = records.len();
        drop(records);

        self.publish(AppEvent::StoreReplaced {
            store: self.name.clone(),
            count,
        });
        removed
    }

    /// 整体替换集合
    pub async fn replace_all(&self, new_records: Vec<T>) {
        let mut records = self.records.write().await;
        *records = new_records;
        self.persist(&records).await;
        let count = records.len();
        drop(records);

        self.publish(AppEvent::StoreReplaced {
            store: self.name.clone(),
            count,
        });
    }

    /// 清空集合，返回清除条数
    pub async fn clear(&self) -> usize {
        self.delete_where(|_| true).await
    }

    /// 尽力写入后端：失败只记录日志并发布事件，内存中的修改保留
    async fn persist(&self, records: &[T]) {
        let Some(backend) = &self.backend else {
            return;
        };

        let result = match serde_json::to_value(records) {
            Ok(value) => backend.save(&self.name, &value).await,
            Err(e) => Err(e.into()),
        };

        if let Err(e) = result {
            warn!("存储 {} 持久化失败: {}", self.name, e);
            self.publish(AppEvent::PersistFailed {
                store: self.name.clone(),
                error: e.to_string(),
            });
        }
    }

    fn publish(&self, event: AppEvent) {
        if let Some(bus) = &self.event_bus {
            bus.publish(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::repository::memory::MemoryBackend;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        tenant_id: String,
        text: String,
        pinned: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    }

    struct NewNote {
        tenant_id: String,
        text: String,
    }

    #[derive(Default)]
    struct NotePatch {
        text: Option<String>,
        pinned: Option<bool>,
    }

    impl Record for Note {
        type Draft = NewNote;
        type Patch = NotePatch;
        const ID_PREFIX: &'static str = "note";

        fn id(&self) -> &str {
            &self.id
        }

        fn tenant_id(&self) -> Option<&str> {
            Some(&self.tenant_id)
        }

        fn from_draft(id: String, draft: NewNote, now: DateTime<Utc>) -> Self {
            Self {
                id,
                tenant_id: draft.tenant_id,
                text: draft.text,
                pinned: false,
                created_at: now,
                updated_at: now,
            }
        }

        fn apply_patch(&mut self, patch: NotePatch) {
            if let Some(text) = patch.text {
                self.text = text;
            }
            if let Some(pinned) = patch.pinned {
                self.pinned = pinned;
            }
        }

        fn touch(&mut self, now: DateTime<Utc>) {
            self.updated_at = now;
        }
    }

    fn draft(text: &str) -> NewNote {
        NewNote {
            tenant_id: "tenant-1".to_string(),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_then_delete_restores_state() {
        let store: RecordStore<Note> = RecordStore::in_memory("notes", Vec::new());
        store.add(draft("first")).await;
        let before = store.all().await;

        let created = store.add(draft("second")).await;
        assert_eq!(store.len().await, 2);
        assert_eq!(store.all().await.last().unwrap().id, created.id);
        assert_eq!(created.created_at, created.updated_at);

        assert!(store.delete(&created.id).await);
        assert_eq!(store.all().await, before);
    }

    #[tokio::test]
    async fn test_update_missing_id_is_noop() {
        let store: RecordStore<Note> = RecordStore::in_memory("notes", Vec::new());
        store.add(draft("only")).await;
        let before = store.all().await;

        let result = store
            .update(
                "note-missing",
                NotePatch {
                    text: Some("changed".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(result.is_none());
        assert!(!store.delete("note-missing").await);
        assert_eq!(store.all().await, before);
    }

    #[tokio::test]
    async fn test_update_merges_and_refreshes_timestamp() {
        let store: RecordStore<Note> = RecordStore::in_memory("notes", Vec::new());
        let created = store.add(draft("text")).await;

        let updated = store
            .update(
                &created.id,
                NotePatch {
                    pinned: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(updated.pinned);
        assert_eq!(updated.text, "text");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_mutations_persist_and_reload() {
        let backend: Arc<dyn StoreBackend> = Arc::new(MemoryBackend::new());

        let store: RecordStore<Note> =
            RecordStore::open("notes-storage", Some(backend.clone()), None, Vec::new())
                .await
                .unwrap();
        let a = store.add(draft("a")).await;
        store.add(draft("b")).await;
        store.delete(&a.id).await;

        let reopened: RecordStore<Note> =
            RecordStore::open("notes-storage", Some(backend), None, Vec::new())
                .await
                .unwrap();
        let texts: Vec<String> = reopened.all().await.into_iter().map(|n| n.text).collect();
        assert_eq!(texts, vec!["b"]);
    }

    #[tokio::test]
    async fn test_seed_used_only_when_key_absent() {
        let backend: Arc<dyn StoreBackend> = Arc::new(MemoryBackend::new());
        let seed = vec![Note::from_draft("note-seed".to_string(), draft("seed"), Utc::now())];

        let store: RecordStore<Note> =
            RecordStore::open("notes-storage", Some(backend.clone()), None, seed.clone())
                .await
                .unwrap();
        store.clear().await;

        let reopened: RecordStore<Note> =
            RecordStore::open("notes-storage", Some(backend), None, seed)
                .await
                .unwrap();
        assert!(reopened.is_empty().await);
    }

    #[tokio::test]
    async fn test_mutations_publish_events() {
        let bus = Arc::new(EventBus::new(16));
        let mut receiver = bus.subscribe();
        let store: RecordStore<Note> = RecordStore::open("notes", None, Some(bus), Vec::new())
            .await
            .unwrap();

        let created = store.add(draft("x")).await;
        store.delete(&created.id).await;
        store.delete(&created.id).await;

        assert_eq!(
            receiver.try_recv().unwrap(),
            AppEvent::RecordAdded {
                store: "notes".to_string(),
                id: created.id.clone()
            }
        );
        assert_eq!(
            receiver.try_recv().unwrap(),
            AppEvent::RecordDeleted {
                store: "notes".to_string(),
                id: created.id
            }
        );
        // 第二次删除没有效果，也不发布事件
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_try_update_with_rejects_without_writing() {
        let bus = Arc::new(EventBus::new(16));
        let store: RecordStore<Note> = RecordStore::open("notes", None, Some(bus.clone()), Vec::new())
            .await
            .unwrap();
        let created = store.add(draft("locked")).await;
        let mut receiver = bus.subscribe();

        let result: Result<Option<Note>, String> = store
            .try_update_with(&created.id, |_| Err("locked".to_string()))
            .await;
        assert_eq!(result, Err("locked".to_string()));
        assert_eq!(store.get(&created.id).await.unwrap(), created);
        assert!(receiver.try_recv().is_err());

        let result: Result<Option<Note>, String> = store
            .try_update_with("note-missing", |_| Err("never called".to_string()))
            .await;
        assert_eq!(result, Ok(None));
    }

    #[tokio::test]
    async fn test_update_where_counts_changes() {
        let store: RecordStore<Note> = RecordStore::in_memory("notes", Vec::new());
        store.add(draft("a")).await;
        store.add(draft("b")).await;

        let changed = store
            .update_where(|note| {
                if note.text == "a" {
                    note.pinned = true;
                    true
                } else {
                    false
                }
            })
            .await;

        assert_eq!(changed, 1);
        assert_eq!(store.count(|n| n.pinned).await, 1);
        assert_eq!(store.by_tenant("tenant-1").await.len(), 2);
    }
}
