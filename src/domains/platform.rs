// 平台领域管理器
//
// 负责租户、通知、登录会话、配置和日志推送

use std::sync::Arc;

use crate::actors::SessionHandle;
use crate::logger::LogBroadcaster;
use crate::modules::{NotificationsManager, TenantsManager};
use crate::settings::SettingsManager;

/// 平台领域管理器
#[derive(Clone)]
pub struct PlatformDomain {
    tenants: Arc<TenantsManager>,
    notifications: Arc<NotificationsManager>,
    session: SessionHandle,
    settings: Arc<SettingsManager>,
    log_broadcaster: Arc<LogBroadcaster>,
}

impl PlatformDomain {
    pub fn new(
        tenants: Arc<TenantsManager>,
        notifications: Arc<NotificationsManager>,
        session: SessionHandle,
        settings: Arc<SettingsManager>,
        log_broadcaster: Arc<LogBroadcaster>,
    ) -> Self {
        Self {
            tenants,
            notifications,
            session,
            settings,
            log_broadcaster,
        }
    }

    pub fn get_tenants(&self) -> &Arc<TenantsManager> {
        &self.tenants
    }

    pub fn get_notifications(&self) -> &Arc<NotificationsManager> {
        &self.notifications
    }

    pub fn get_session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn get_settings(&self) -> &Arc<SettingsManager> {
        &self.settings
    }

    pub fn get_logger(&self) -> &Arc<LogBroadcaster> {
        &self.log_broadcaster
    }
}
