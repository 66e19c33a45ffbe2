//! 租户管理命令（平台管理员）

use chrono::Utc;
use tracing::info;

use super::auth::{require_module, require_user};
use crate::analysis::TenantStats;
use crate::models::tenant::{NewTenant, TenantPatch};
use crate::models::{ModuleType, Tenant};
use crate::AppState;

pub async fn list_tenants(state: &AppState) -> Result<Vec<Tenant>, String> {
    require_module(state, ModuleType::Tenants).await?;
    Ok(state.platform_domain.get_tenants().all().await)
}

pub async fn get_tenant(state: &AppState, id: String) -> Result<Option<Tenant>, String> {
    require_module(state, ModuleType::Tenants).await?;
    Ok(state.platform_domain.get_tenants().get(&id).await)
}

/// 当前用户所属的租户
pub async fn get_current_tenant(state: &AppState) -> Result<Option<Tenant>, String> {
    let user = require_user(state).await?;
    match user.tenant_id {
        Some(tenant_id) => Ok(state.platform_domain.get_tenants().get(&tenant_id).await),
        None => Ok(None),
    }
}

pub async fn create_tenant(state: &AppState, tenant: NewTenant) -> Result<Tenant, String> {
    require_module(state, ModuleType::Tenants).await?;
    let created = state
        .platform_domain
        .get_tenants()
        .add(tenant)
        .await
        .map_err(|e| e.to_string())?;
    info!("创建租户 {} ({})", created.name, created.id);
    Ok(created)
}

pub async fn update_tenant(
    state: &AppState,
    id: String,
    patch: TenantPatch,
) -> Result<Option<Tenant>, String> {
    require_module(state, ModuleType::Tenants).await?;
    state
        .platform_domain
        .get_tenants()
        .update(&id, patch)
        .await
        .map_err(|e| e.to_string())
}

pub async fn delete_tenant(state: &AppState, id: String) -> Result<bool, String> {
    require_module(state, ModuleType::Tenants).await?;
    Ok(state.platform_domain.get_tenants().delete(&id).await)
}

pub async fn set_tenant_modules(
    state: &AppState,
    id: String,
    modules: Vec<ModuleType>,
) -> Result<Option<Tenant>, String> {
    require_module(state, ModuleType::Tenants).await?;
    Ok(state
        .platform_domain
        .get_tenants()
        .set_modules(&id, modules)
        .await)
}

pub async fn deactivate_tenant(state: &AppState, id: String) -> Result<Option<Tenant>, String> {
    require_module(state, ModuleType::Tenants).await?;
    Ok(state.platform_domain.get_tenants().deactivate(&id).await)
}

pub async fn get_expired_tenants(state: &AppState) -> Result<Vec<Tenant>, String> {
    require_module(state, ModuleType::Tenants).await?;
    Ok(state.platform_domain.get_tenants().expired(Utc::now()).await)
}

pub async fn get_tenant_stats(state: &AppState) -> Result<TenantStats, String> {
    require_module(state, ModuleType::Tenants).await?;
    Ok(state.platform_domain.get_tenants().stats(Utc::now()).await)
}
