// Session Actor - 使用Actor模式管理登录会话
//
// 会话只在Actor内部修改，每次变化后写入 auth-storage

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use super::auth::authenticate;
use crate::event_bus::{AppEvent, EventBus};
use crate::models::{ModuleType, User};
use crate::storage::{keys, StoreBackend};

/// 持久化的会话状态
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub user: Option<User>,
    pub is_authenticated: bool,
}

impl SessionState {
    /// 从后端恢复上次的会话；无记录时为未登录
    pub async fn restore(backend: &dyn StoreBackend) -> anyhow::Result<Self> {
        match backend.load(keys::AUTH).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Self::default()),
        }
    }
}

/// 会话命令
pub enum SessionCommand {
    Login {
        email: String,
        password: String,
        reply: oneshot::Sender<bool>,
    },

    Logout {
        reply: oneshot::Sender<()>,
    },

    Get {
        reply: oneshot::Sender<SessionState>,
    },

    HealthCheck {
        reply: oneshot::Sender<()>,
    },
}

/// 会话Actor
pub struct SessionActor {
    receiver: mpsc::Receiver<SessionCommand>,
    state: SessionState,
    backend: Option<Arc<dyn StoreBackend>>,
    event_bus: Option<Arc<EventBus>>,
}

impl SessionActor {
    pub fn new(
        state: SessionState,
        backend: Option<Arc<dyn StoreBackend>>,
        event_bus: Option<Arc<EventBus>>,
    ) -> (Self, SessionHandle) {
        let (sender, receiver) = mpsc::channel(10);
        let actor = Self {
            receiver,
            state,
            backend,
            event_bus,
        };
        let handle = SessionHandle { sender };
        (actor, handle)
    }

    /// 运行Actor
    pub async fn run(mut self) {
        tracing::info!("Session Actor 已启动");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                SessionCommand::Login {
                    email,
                    password,
                    reply,
                } => {
                    let success = match authenticate(&email, &password) {
                        Some(user) => {
                            tracing::info!("用户登录: {} ({})", user.email, user.role.label());
                            self.publish(AppEvent::UserLoggedIn {
                                user_id: user.id.clone(),
                            });
                            self.state = SessionState {
                                user: Some(user),
                                is_authenticated: true,
                            };
                            self.persist().await;
                            true
                        }
                        None => {
                            tracing::warn!("登录失败: {}", email);
                            false
                        }
                    };
                    let _ = reply.send(success);
                }

                SessionCommand::Logout { reply } => {
                    if self.state.is_authenticated {
                        self.state = SessionState::default();
                        self.persist().await;
                        self.publish(AppEvent::UserLoggedOut);
                        tracing::info!("用户已退出登录");
                    }
                    let _ = reply.send(());
                }

                SessionCommand::Get { reply } => {
                    let _ = reply.send(self.state.clone());
                }

                SessionCommand::HealthCheck { reply } => {
                    let _ = reply.send(());
                }
            }
        }

        tracing::info!("Session Actor 已停止");
    }

    async fn persist(&self) {
        let Some(backend) = &self.backend else {
            return;
        };
        let result = match serde_json::to_value(&self.state) {
            Ok(value) => backend.save(keys::AUTH, &value).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            tracing::warn!("保存会话失败: {}", e);
            self.publish(AppEvent::PersistFailed {
                store: keys::AUTH.to_string(),
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

/// 会话Handle
#[derive(Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// 登录，账号或密码错误时返回 false
    pub async fn login(&self, email: &str, password: &str) -> bool {
        let (reply, rx) = oneshot::channel();
        let cmd = SessionCommand::Login {
            email: email.to_string(),
            password: password.to_string(),
            reply,
        };
        if self.sender.send(cmd).await.is_err() {
            return false;
        }
        rx.await.unwrap_or(false)
    }

    pub async fn logout(&self) {
        let (reply, rx) = oneshot::channel();
        if self.sender.send(SessionCommand::Logout { reply }).await.is_ok() {
            rx.await.ok();
        }
    }

    pub async fn state(&self) -> SessionState {
        let (reply, rx) = oneshot::channel();
        self.sender.send(SessionCommand::Get { reply }).await.ok();
        rx.await.unwrap_or_default()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.state().await.user
    }

    /// 当前用户能否访问某模块；未登录时一律不能
    pub async fn can_access(&self, module: ModuleType) -> bool {
        self.current_user()
            .await
            .is_some_and(|user| user.can_access(module))
    }

    /// 健康检查
    pub async fn health_check(&self) -> bool {
        let (reply, rx) = oneshot::channel();

        if self
            .sender
            .send(SessionCommand::HealthCheck { reply })
            .await
            .is_err()
        {
            tracing::warn!("Session Actor 健康检查失败: 通道已关闭");
            return false;
        }

        match tokio::time::timeout(std::time::Duration::from_secs(5), rx).await {
            Ok(Ok(())) => true,
            Ok(Err(_)) => {
                tracing::warn!("Session Actor 健康检查失败: Actor已停止");
                false
            }
            Err(_) => {
                tracing::warn!("Session Actor 健康检查失败: 超时(5秒)");
                false
            }
        }
    }
}
