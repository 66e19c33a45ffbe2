//! 通知命令
//!
//! 普通用户只能看到并处理自己可见的通知；群发、清空与发送历史仅限平台级用户。

use super::auth::{ensure_tenant, require_user};
use crate::models::notification::{NewNotification, Recipients};
use crate::models::{Notification, NotificationHistoryEntry, User};
use crate::modules::BulkNotification;
use crate::AppState;

fn require_platform(user: &User) -> Result<(), String> {
    if user.role.is_platform_level() {
        Ok(())
    } else {
        Err("仅平台管理员可以执行此操作".to_string())
    }
}

/// 当前用户能否看到该通知；不存在时返回 `Ok(false)`
async fn check_visible(state: &AppState, user: &User, id: &str) -> Result<bool, String> {
    match state.platform_domain.get_notifications().get(id).await {
        Some(n) if n.is_visible_to(user.tenant_id.as_deref(), &user.id) => Ok(true),
        Some(_) => Err(format!("无权访问通知: {}", id)),
        None => Ok(false),
    }
}

/// 当前用户可见的通知，最新的在前
pub async fn list_notifications(state: &AppState) -> Result<Vec<Notification>, String> {
    let user = require_user(state).await?;
    Ok(state
        .platform_domain
        .get_notifications()
        .visible_to(user.tenant_id.as_deref(), &user.id)
        .await)
}

pub async fn get_unread_count(state: &AppState) -> Result<usize, String> {
    Ok(list_notifications(state)
        .await?
        .iter()
        .filter(|n| !n.is_read)
        .count())
}

/// 发送一条通知（租户用户只能发往本租户）
pub async fn post_notification(
    state: &AppState,
    notification: NewNotification,
) -> Result<Notification, String> {
    let user = require_user(state).await?;
    ensure_tenant(&user, &notification.tenant_id)?;
    Ok(state
        .platform_domain
        .get_notifications()
        .add(notification)
        .await)
}

/// 群发通知
pub async fn broadcast_notification(
    state: &AppState,
    notification: BulkNotification,
    recipients: Recipients,
) -> Result<Vec<Notification>, String> {
    let user = require_user(state).await?;
    require_platform(&user)?;
    Ok(state
        .platform_domain
        .get_notifications()
        .add_bulk(notification, recipients)
        .await)
}

pub async fn mark_notification_read(
    state: &AppState,
    id: String,
) -> Result<Option<Notification>, String> {
    let user = require_user(state).await?;
    if !check_visible(state, &user, &id).await? {
        return Ok(None);
    }
    Ok(state
        .platform_domain
        .get_notifications()
        .mark_as_read(&id)
        .await)
}

/// 把当前用户可见的未读通知全部标记为已读，返回条数
pub async fn mark_all_notifications_read(state: &AppState) -> Result<usize, String> {
    let user = require_user(state).await?;
    let notifications = state.platform_domain.get_notifications();
    if user.role.is_platform_level() && user.tenant_id.is_none() {
        return Ok(notifications.mark_all_as_read().await);
    }
    let mut marked = 0;
    for n in notifications
        .visible_to(user.tenant_id.as_deref(), &user.id)
        .await
        .into_iter()
        .filter(|n| !n.is_read)
    {
        if notifications.mark_as_read(&n.id).await.is_some() {
            marked += 1;
        }
    }
    Ok(marked)
}

pub async fn delete_notification(state: &AppState, id: String) -> Result<bool, String> {
    let user = require_user(state).await?;
    if !check_visible(state, &user, &id).await? {
        return Ok(false);
    }
    Ok(state.platform_domain.get_notifications().delete(&id).await)
}

/// 清空全部通知，返回删除条数
pub async fn clear_notifications(state: &AppState) -> Result<usize, String> {
    let user = require_user(state).await?;
    require_platform(&user)?;
    Ok(state.platform_domain.get_notifications().clear_all().await)
}

/// 发送历史，最新的在前
pub async fn get_notification_history(
    state: &AppState,
) -> Result<Vec<NotificationHistoryEntry>, String> {
    let user = require_user(state).await?;
    require_platform(&user)?;
    Ok(state.platform_domain.get_notifications().history().await)
}
