// 事件总线 - 存储变更、会话与通知事件的广播

use tokio::sync::broadcast;

/// 应用事件枚举 - 定义所有可能的系统事件
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    // --- 存储事件 ---

    /// 新增记录
    RecordAdded { store: String, id: String },

    /// 记录已更新
    RecordUpdated { store: String, id: String },

    /// 记录已删除
    RecordDeleted { store: String, id: String },

    /// 整个集合被替换（批量导入、清空）
    StoreReplaced { store: String, count: usize },

    /// 持久化写入失败（内存中的修改仍然有效）
    PersistFailed { store: String, error: String },

    // --- 会话事件 ---

    /// 用户登录
    UserLoggedIn { user_id: String },

    /// 用户登出
    UserLoggedOut,

    // --- 通知事件 ---

    /// 新通知
    NotificationPosted { id: String, tenant_id: String },

    /// 提醒已生成
    RemindersGenerated { tenant_id: String, count: usize },

    // --- 系统事件 ---

    /// 配置更新事件
    ConfigUpdated { config_type: String },
}

impl AppEvent {
    /// 存储事件对应的存储名称
    pub fn store(&self) -> Option<&str> {
        match self {
            Self::RecordAdded { store, .. }
            | Self::RecordUpdated { store, .. }
            | Self::RecordDeleted { store, .. }
            | Self::StoreReplaced { store, .. }
            | Self::PersistFailed { store, .. } => Some(store),
            _ => None,
        }
    }
}

/// 多订阅者事件总线
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl EventBus {
    /// `capacity` 为每个订阅者可积压的事件数，超出后慢订阅者会丢失最旧的事件
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// 发布事件；没有订阅者时直接丢弃
    pub fn publish(&self, event: AppEvent) {
        let store = event.store().map(str::to_string);
        match self.sender.send(event) {
            Ok(receivers) => {
                tracing::trace!(store = store.as_deref(), receivers, "发布事件");
            }
            Err(_) => {
                tracing::trace!(store = store.as_deref(), "事件无订阅者，已丢弃");
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus_basic() {
        let bus = EventBus::new(100);

        let mut receiver = bus.subscribe();

        bus.publish(AppEvent::RecordAdded {
            store: "tasks-storage".to_string(),
            id: "task-1".to_string(),
        });

        match receiver.recv().await {
            Ok(AppEvent::RecordAdded { store, id }) => {
                assert_eq!(store, "tasks-storage");
                assert_eq!(id, "task-1");
            }
            _ => panic!("未收到预期事件"),
        }
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let bus = EventBus::new(100);

        let mut receiver1 = bus.subscribe();
        let mut receiver2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(AppEvent::UserLoggedOut);

        assert_eq!(receiver1.try_recv().ok(), Some(AppEvent::UserLoggedOut));
        assert_eq!(receiver2.try_recv().ok(), Some(AppEvent::UserLoggedOut));
    }

    #[test]
    fn test_event_store_name() {
        let event = AppEvent::PersistFailed {
            store: "orders-storage".to_string(),
            error: "disk full".to_string(),
        };
        assert_eq!(event.store(), Some("orders-storage"));
        assert_eq!(AppEvent::UserLoggedOut.store(), None);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::default();
        bus.publish(AppEvent::ConfigUpdated {
            config_type: "reminders".to_string(),
        });
        assert_eq!(bus.subscriber_count(), 0);
    }
}
