// 系统通知及发送历史

use std::convert::Infallible;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Record;

/// 平台级通知使用的租户标识
pub const GLOBAL_TENANT: &str = "global";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Critical,
    Warning,
    Info,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationSource {
    Incident,
    Certification,
    Task,
    Audit,
    System,
    PlatformNews,
    Attestation,
    Catalog,
    TrainingCenter,
    Maintenance,
    Examination,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    /// 租户标识，平台级通知为 `global`
    pub tenant_id: String,
    /// 指定接收用户（为空时对租户内所有用户可见）
    pub user_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub source: NotificationSource,
    pub source_id: Option<String>,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// 某租户的某个用户能否看到该通知
    pub fn is_visible_to(&self, tenant_id: Option<&str>, user_id: &str) -> bool {
        if let Some(target) = &self.user_id {
            return target == user_id;
        }
        self.tenant_id == GLOBAL_TENANT || Some(self.tenant_id.as_str()) == tenant_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    pub tenant_id: String,
    pub user_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub source: NotificationSource,
    pub source_id: Option<String>,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationPatch {
    pub title: Option<String>,
    pub message: Option<String>,
    pub link: Option<String>,
    pub is_read: Option<bool>,
}

impl Record for Notification {
    type Draft = NewNotification;
    type Patch = NotificationPatch;
    const ID_PREFIX: &'static str = "notif";

    fn id(&self) -> &str {
        &self.id
    }

    fn tenant_id(&self) -> Option<&str> {
        Some(&self.tenant_id)
    }

    fn from_draft(id: String, draft: NewNotification, now: DateTime<Utc>) -> Self {
        Self {
            id,
            tenant_id: draft.tenant_id,
            user_id: draft.user_id,
            kind: draft.kind,
            source: draft.source,
            source_id: draft.source_id,
            title: draft.title,
            message: draft.message,
            link: draft.link,
            is_read: false,
            created_at: now,
        }
    }

    fn apply_patch(&mut self, patch: NotificationPatch) {
        merge_fields!(self, patch; set: title, message, is_read; opt: link);
    }

    // 通知没有更新时间
    fn touch(&mut self, _now: DateTime<Utc>) {}
}

/// 群发通知的接收方
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Recipients {
    All,
    Tenants { tenant_ids: Vec<String> },
    Users { user_ids: Vec<String> },
}

/// 历史记录中保存的通知内容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub tenant_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub source: NotificationSource,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
}

/// 发送历史（只追加，不修改）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationHistoryEntry {
    pub id: String,
    pub notification: NotificationContent,
    pub recipients: Recipients,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub notification: NotificationContent,
    pub recipients: Recipients,
}

impl Record for NotificationHistoryEntry {
    type Draft = NewHistoryEntry;
    type Patch = Infallible;
    const ID_PREFIX: &'static str = "hist";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: NewHistoryEntry, now: DateTime<Utc>) -> Self {
        Self {
            id,
            notification: draft.notification,
            recipients: draft.recipients,
            sent_at: now,
        }
    }

    fn apply_patch(&mut self, patch: Infallible) {
        match patch {}
    }

    fn touch(&mut self, _now: DateTime<Utc>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(tenant_id: &str, user_id: Option<&str>) -> Notification {
        Notification::from_draft(
            "notif-1".to_string(),
            NewNotification {
                tenant_id: tenant_id.to_string(),
                user_id: user_id.map(str::to_string),
                kind: NotificationKind::Info,
                source: NotificationSource::System,
                source_id: None,
                title: "t".to_string(),
                message: "m".to_string(),
                link: None,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_visibility() {
        assert!(notification("tenant-1", None).is_visible_to(Some("tenant-1"), "user-2"));
        assert!(!notification("tenant-1", None).is_visible_to(Some("tenant-2"), "user-2"));
        assert!(notification(GLOBAL_TENANT, None).is_visible_to(None, "user-1"));
        assert!(notification(GLOBAL_TENANT, Some("user-1")).is_visible_to(None, "user-1"));
        assert!(!notification(GLOBAL_TENANT, Some("user-1")).is_visible_to(Some("tenant-1"), "user-2"));
    }

    #[test]
    fn test_recipients_serde() {
        let json = serde_json::to_string(&Recipients::Tenants {
            tenant_ids: vec!["tenant-1".to_string()],
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"tenants","tenant_ids":["tenant-1"]}"#);
        let all: Recipients = serde_json::from_str(r#"{"type":"all"}"#).unwrap();
        assert_eq!(all, Recipients::All);
    }
}
