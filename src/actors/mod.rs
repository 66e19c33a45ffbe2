// Actor模块 - 使用Actor模式管理并发状态
//
// 登录会话通过消息传递修改，不需要 Arc<Mutex<T>>

pub mod auth;
pub mod session;

pub use auth::{authenticate, mock_users, DEMO_PASSWORD};
pub use session::{SessionActor, SessionCommand, SessionHandle, SessionState};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::event_bus::{AppEvent, EventBus};
    use crate::models::ModuleType;
    use crate::storage::{MemoryBackend, StoreBackend};

    fn spawn(
        state: SessionState,
        backend: Option<Arc<dyn StoreBackend>>,
        bus: Option<Arc<EventBus>>,
    ) -> SessionHandle {
        let (actor, handle) = SessionActor::new(state, backend, bus);
        tokio::spawn(async move {
            actor.run().await;
        });
        handle
    }

    #[tokio::test]
    async fn test_session_health_check() {
        let handle = spawn(SessionState::default(), None, None);
        assert!(handle.health_check().await, "SessionActor应该是健康的");
    }

    #[tokio::test]
    async fn test_health_check_after_stop() {
        // 创建Actor但不运行，直接drop
        let (actor, handle) = SessionActor::new(SessionState::default(), None, None);
        drop(actor);
        assert!(!handle.health_check().await, "停止的Actor应该健康检查失败");
    }

    #[tokio::test]
    async fn test_login_logout() {
        let bus = Arc::new(EventBus::new(16));
        let mut events = bus.subscribe();
        let handle = spawn(SessionState::default(), None, Some(bus));

        assert!(!handle.login("manager@company.ru", "wrong").await);
        assert!(handle.current_user().await.is_none());
        assert!(!handle.can_access(ModuleType::Tasks).await);

        assert!(handle.login("manager@company.ru", DEMO_PASSWORD).await);
        assert!(handle.state().await.is_authenticated);
        assert!(handle.can_access(ModuleType::Tasks).await);
        assert!(!handle.can_access(ModuleType::Budget).await);

        handle.logout().await;
        assert!(handle.current_user().await.is_none());

        assert!(matches!(events.recv().await.unwrap(), AppEvent::UserLoggedIn { user_id } if user_id == "4"));
        assert!(matches!(events.recv().await.unwrap(), AppEvent::UserLoggedOut));
    }

    #[tokio::test]
    async fn test_session_survives_restart() {
        let backend: Arc<dyn StoreBackend> = Arc::new(MemoryBackend::new());

        let handle = spawn(SessionState::default(), Some(backend.clone()), None);
        assert!(handle.login("director@company.ru", DEMO_PASSWORD).await);

        let restored = SessionState::restore(backend.as_ref()).await.unwrap();
        assert_eq!(
            restored.user.as_ref().map(|u| u.email.as_str()),
            Some("director@company.ru")
        );

        let handle = spawn(restored, Some(backend.clone()), None);
        assert!(handle.can_access(ModuleType::Budget).await);
        handle.logout().await;
        assert_eq!(
            SessionState::restore(backend.as_ref()).await.unwrap(),
            SessionState::default()
        );
    }
}
