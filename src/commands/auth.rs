//! 登录会话命令
//!
//! 以及其他命令共用的访问控制：模块权限与租户隔离

use tracing::warn;

use crate::models::{ModuleType, User};
use crate::AppState;

/// 登录
pub async fn login(state: &AppState, email: String, password: String) -> Result<User, String> {
    let session = state.platform_domain.get_session();
    if !session.login(&email, &password).await {
        return Err("邮箱或密码错误".to_string());
    }
    session
        .current_user()
        .await
        .ok_or_else(|| "登录状态丢失".to_string())
}

/// 退出登录
pub async fn logout(state: &AppState) -> Result<(), String> {
    state.platform_domain.get_session().logout().await;
    Ok(())
}

/// 获取当前用户（未登录时为 None）
pub async fn get_current_user(state: &AppState) -> Result<Option<User>, String> {
    Ok(state.platform_domain.get_session().current_user().await)
}

/// 当前用户可见的模块
pub async fn get_available_modules(state: &AppState) -> Result<Vec<ModuleType>, String> {
    Ok(require_user(state).await?.available_modules)
}

/// 当前用户能否访问某模块
pub async fn can_access_module(state: &AppState, module: ModuleType) -> Result<bool, String> {
    Ok(state.platform_domain.get_session().can_access(module).await)
}

// ==================== 访问控制辅助函数 ====================

/// 要求已登录
pub(crate) async fn require_user(state: &AppState) -> Result<User, String> {
    state
        .platform_domain
        .get_session()
        .current_user()
        .await
        .ok_or_else(|| "未登录".to_string())
}

/// 要求已登录且有权访问模块
pub(crate) async fn require_module(state: &AppState, module: ModuleType) -> Result<User, String> {
    let user = require_user(state).await?;
    if !user.can_access(module) {
        warn!("用户 {} 无权访问模块 {}", user.email, module.as_str());
        return Err(format!("无权访问模块: {}", module.as_str()));
    }
    Ok(user)
}

/// 租户用户只能操作本租户的数据；平台级用户不受限
pub(crate) fn ensure_tenant(user: &User, tenant_id: &str) -> Result<(), String> {
    match &user.tenant_id {
        Some(own) if own != tenant_id && !user.role.is_platform_level() => {
            Err(format!("无权访问其他租户的数据: {}", tenant_id))
        }
        _ => Ok(()),
    }
}

/// 确定查询的租户：租户用户默认使用本租户，平台级用户必须指定
pub(crate) fn resolve_tenant(user: &User, requested: Option<String>) -> Result<String, String> {
    match (requested, &user.tenant_id) {
        (Some(tenant_id), _) => {
            ensure_tenant(user, &tenant_id)?;
            Ok(tenant_id)
        }
        (None, Some(own)) => Ok(own.clone()),
        (None, None) => Err("需要指定租户".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::mock_users;
    use crate::models::UserRole;

    fn user(role: UserRole) -> User {
        mock_users().into_iter().find(|u| u.role == role).unwrap()
    }

    #[test]
    fn test_tenant_isolation() {
        let manager = user(UserRole::Manager);
        assert!(ensure_tenant(&manager, "tenant-1").is_ok());
        assert!(ensure_tenant(&manager, "tenant-2").is_err());
        assert_eq!(resolve_tenant(&manager, None).unwrap(), "tenant-1");
        assert!(resolve_tenant(&manager, Some("tenant-2".to_string())).is_err());

        let admin = user(UserRole::SuperAdmin);
        assert!(ensure_tenant(&admin, "tenant-2").is_ok());
        assert!(resolve_tenant(&admin, None).is_err());
        assert_eq!(
            resolve_tenant(&admin, Some("tenant-3".to_string())).unwrap(),
            "tenant-3"
        );
    }
}
