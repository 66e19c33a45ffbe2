// 通知管理 - 通知本身与发送历史分别存储

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::event_bus::{AppEvent, EventBus};
use crate::models::notification::{
    NewHistoryEntry, NewNotification, NotificationContent, NotificationKind,
    NotificationPatch, NotificationSource, Recipients, GLOBAL_TENANT,
};
use crate::models::{Notification, NotificationHistoryEntry};
use crate::storage::RecordStore;

/// 群发通知的内容（接收方另行指定）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkNotification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub source: NotificationSource,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
}

pub struct NotificationsManager {
    store: RecordStore<Notification>,
    history: RecordStore<NotificationHistoryEntry>,
    event_bus: Option<Arc<EventBus>>,
}

impl NotificationsManager {
    pub fn new(
        store: RecordStore<Notification>,
        history: RecordStore<NotificationHistoryEntry>,
        event_bus: Option<Arc<EventBus>>,
    ) -> Self {
        Self {
            store,
            history,
            event_bus,
        }
    }

    pub fn store(&self) -> &RecordStore<Notification> {
        &self.store
    }

    /// 新增一条通知，并写入发送历史
    pub async fn add(&self, draft: NewNotification) -> Notification {
        let recipients = match (&draft.user_id, draft.tenant_id.as_str()) {
            (Some(user_id), _) => Recipients::Users {
                user_ids: vec![user_id.clone()],
            },
            (None, GLOBAL_TENANT) => Recipients::All,
            (None, tenant_id) => Recipients::Tenants {
                tenant_ids: vec![tenant_id.to_string()],
            },
        };
        let content = NotificationContent {
            tenant_id: draft.tenant_id.clone(),
            kind: draft.kind,
            source: draft.source,
            title: draft.title.clone(),
            message: draft.message.clone(),
            link: draft.link.clone(),
        };

        let notification = self.store.add(draft).await;
        self.history
            .add(NewHistoryEntry {
                notification: content,
                recipients,
            })
            .await;
        self.announce(&notification);
        notification
    }

    /// 群发：所有人一条平台级通知；按租户或按用户每个接收方一条
    pub async fn add_bulk(
        &self,
        notification: BulkNotification,
        recipients: Recipients,
    ) -> Vec<Notification> {
        let draft = |tenant_id: &str, user_id: Option<&str>| NewNotification {
            tenant_id: tenant_id.to_string(),
            user_id: user_id.map(str::to_string),
            kind: notification.kind,
            source: notification.source,
            source_id: None,
            title: notification.title.clone(),
            message: notification.message.clone(),
            link: notification.link.clone(),
        };

        let drafts: Vec<NewNotification> = match &recipients {
            Recipients::All => vec![draft(GLOBAL_TENANT, None)],
            Recipients::Tenants { tenant_ids } => {
                tenant_ids.iter().map(|t| draft(t, None)).collect()
            }
            Recipients::Users { user_ids } => user_ids
                .iter()
                .map(|u| draft(GLOBAL_TENANT, Some(u)))
                .collect(),
        };

        let created = self.store.add_many(drafts).await;
        self.history
            .add(NewHistoryEntry {
                notification: NotificationContent {
                    tenant_id: GLOBAL_TENANT.to_string(),
                    kind: notification.kind,
                    source: notification.source,
                    title: notification.title.clone(),
                    message: notification.message.clone(),
                    link: notification.link.clone(),
                },
                recipients,
            })
            .await;

        info!("群发通知 \"{}\"，共 {} 条", notification.title, created.len());
        for n in &created {
            self.announce(n);
        }
        created
    }

    pub async fn update(&self, id: &str, patch: NotificationPatch) -> Option<Notification> {
        self.store.update(id, patch).await
    }

    pub async fn mark_as_read(&self, id: &str) -> Option<Notification> {
        self.store.modify(id, |n| n.is_read = true).await
    }

    /// 全部标记为已读，返回本次修改的条数
    pub async fn mark_all_as_read(&self) -> usize {
        self.store
            .update_where(|n| {
                let unread = !n.is_read;
                n.is_read = true;
                unread
            })
            .await
    }

    pub async fn delete(&self, id: &str) -> bool {
        self.store.delete(id).await
    }

    /// 清空通知（不影响发送历史）
    pub async fn clear_all(&self) -> usize {
        self.store.clear().await
    }

    pub async fn get(&self, id: &str) -> Option<Notification> {
        self.store.get(id).await
    }

    pub async fn all(&self) -> Vec<Notification> {
        self.store.all().await
    }

    pub async fn unread_count(&self) -> usize {
        self.store.count(|n| !n.is_read).await
    }

    pub async fn by_source(&self, source: NotificationSource) -> Vec<Notification> {
        self.store.filter(|n| n.source == source).await
    }

    /// 某用户可见的通知，最新的在前
    pub async fn visible_to(&self, tenant_id: Option<&str>, user_id: &str) -> Vec<Notification> {
        let mut visible = self
            .store
            .filter(|n| n.is_visible_to(tenant_id, user_id))
            .await;
        visible.reverse();
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        visible
    }

    /// 发送历史，最新的在前
    pub async fn history(&self) -> Vec<NotificationHistoryEntry> {
        let mut history = self.history.all().await;
        history.reverse();
        history.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
        history
    }

    fn announce(&self, notification: &Notification) {
        if let Some(bus) = &self.event_bus {
            bus.publish(AppEvent::NotificationPosted {
                id: notification.id.clone(),
                tenant_id: notification.tenant_id.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> NotificationsManager {
        NotificationsManager::new(
            RecordStore::in_memory("notifications-storage", Vec::new()),
            RecordStore::in_memory("notification-history-storage", Vec::new()),
            None,
        )
    }

    fn draft(tenant_id: &str, title: &str) -> NewNotification {
        NewNotification {
            tenant_id: tenant_id.to_string(),
            user_id: None,
            kind: NotificationKind::Warning,
            source: NotificationSource::Certification,
            source_id: Some("att-1".to_string()),
            title: title.to_string(),
            message: "Срок действия аттестации истекает".to_string(),
            link: Some("/attestation".to_string()),
        }
    }

    fn bulk() -> BulkNotification {
        BulkNotification {
            kind: NotificationKind::Info,
            source: NotificationSource::PlatformNews,
            title: "Обновление платформы".to_string(),
            message: "Добавлены новые функции".to_string(),
            link: None,
        }
    }

    #[tokio::test]
    async fn test_add_writes_history() {
        let manager = manager();
        let n = manager.add(draft("tenant-1", "first")).await;
        assert!(!n.is_read);
        assert_eq!(manager.unread_count().await, 1);

        let history = manager.history().await;
        assert_eq!(history.len(), 1);
        assert_eq!(
            history[0].recipients,
            Recipients::Tenants {
                tenant_ids: vec!["tenant-1".to_string()]
            }
        );
    }

    #[tokio::test]
    async fn test_bulk_per_recipient() {
        let manager = manager();
        let all = manager.add_bulk(bulk(), Recipients::All).await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].tenant_id, GLOBAL_TENANT);

        let tenants = manager
            .add_bulk(
                bulk(),
                Recipients::Tenants {
                    tenant_ids: vec!["tenant-1".to_string(), "tenant-2".to_string()],
                },
            )
            .await;
        assert_eq!(tenants.len(), 2);

        let users = manager
            .add_bulk(
                bulk(),
                Recipients::Users {
                    user_ids: vec!["user-7".to_string()],
                },
            )
            .await;
        assert_eq!(users[0].user_id.as_deref(), Some("user-7"));

        assert_eq!(manager.all().await.len(), 4);
        assert_eq!(manager.history().await.len(), 3);
        assert_eq!(
            manager.by_source(NotificationSource::PlatformNews).await.len(),
            4
        );
    }

    #[tokio::test]
    async fn test_read_state_and_clear() {
        let manager = manager();
        let a = manager.add(draft("tenant-1", "a")).await;
        manager.add(draft("tenant-1", "b")).await;
        manager.add(draft("tenant-2", "c")).await;

        manager.mark_as_read(&a.id).await.unwrap();
        assert_eq!(manager.unread_count().await, 2);
        assert_eq!(manager.mark_all_as_read().await, 2);
        assert_eq!(manager.unread_count().await, 0);

        let visible = manager.visible_to(Some("tenant-1"), "user-2").await;
        let titles: Vec<&str> = visible.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "a"]);

        assert_eq!(manager.clear_all().await, 3);
        assert!(manager.all().await.is_empty());
        assert_eq!(manager.history().await.len(), 3);
    }
}
