//! 仪表盘与期限提醒命令

use chrono::Utc;
use tracing::info;

use super::auth::{require_user, resolve_tenant};
use crate::analysis::{dashboard_summary, reminders, DashboardSummary, ReminderItem, TenantSnapshot};
use crate::models::{Notification, User};
use crate::AppState;

/// 收集某租户（或全平台）的全部数据
async fn snapshot(state: &AppState, tenant_id: Option<&str>) -> TenantSnapshot {
    let documents = &state.documents_domain;
    let operations = &state.operations_domain;
    let budget = operations.get_budget();

    macro_rules! records {
        ($store:expr) => {
            match tenant_id {
                Some(tenant_id) => $store.by_tenant(tenant_id).await,
                None => $store.all().await,
            }
        };
    }

    TenantSnapshot {
        tasks: records!(operations.get_tasks().store()),
        incidents: records!(operations.get_incidents().store()),
        maintenance: records!(operations.get_maintenance().store()),
        examinations: records!(operations.get_examinations().store()),
        certifications: records!(documents.get_attestation().store()),
        orders: records!(documents.get_orders().store()),
        budget_categories: records!(budget.categories_store()),
        budget_expenses: records!(budget.expenses_store()),
        notifications: Vec::new(),
    }
}

/// 平台级用户未指定租户时扫描全平台，租户用户固定为本租户
fn reminder_scope(user: &User, tenant_id: Option<String>) -> Result<Option<String>, String> {
    if tenant_id.is_none() && user.tenant_id.is_none() && user.role.is_platform_level() {
        return Ok(None);
    }
    resolve_tenant(user, tenant_id).map(Some)
}

/// 租户仪表盘
pub async fn get_dashboard_summary(
    state: &AppState,
    tenant_id: Option<String>,
) -> Result<DashboardSummary, String> {
    let user = require_user(state).await?;
    let tenant_id = resolve_tenant(&user, tenant_id)?;

    let mut snapshot = snapshot(state, Some(&tenant_id)).await;
    snapshot.notifications = state
        .platform_domain
        .get_notifications()
        .visible_to(Some(&tenant_id), &user.id)
        .await;

    let warning_days = state.documents_domain.get_attestation().warning_days();
    Ok(dashboard_summary(
        &tenant_id,
        &snapshot,
        Utc::now(),
        warning_days,
    ))
}

/// 临近或已过期限的记录，按剩余天数升序
pub async fn get_reminders(
    state: &AppState,
    tenant_id: Option<String>,
) -> Result<Vec<ReminderItem>, String> {
    let user = require_user(state).await?;
    let scope = reminder_scope(&user, tenant_id)?;
    let snapshot = snapshot(state, scope.as_deref()).await;
    let config = state.platform_domain.get_settings().get().await;
    Ok(reminders::collect(
        &snapshot,
        Utc::now().date_naive(),
        &config.reminders,
        state.documents_domain.get_attestation().warning_days(),
    ))
}

/// 生成提醒通知（每个租户一条汇总），返回新建的通知
pub async fn generate_reminders(
    state: &AppState,
    tenant_id: Option<String>,
) -> Result<Vec<Notification>, String> {
    let items = get_reminders(state, tenant_id).await?;
    if items.is_empty() {
        info!("没有需要提醒的记录");
        return Ok(Vec::new());
    }
    Ok(reminders::publish_reminders(
        &items,
        state.platform_domain.get_notifications(),
        &state.event_bus,
    )
    .await)
}

/// 把计划日期已过的维护工作与检验标记为逾期，返回标记条数
pub async fn refresh_overdue_statuses(state: &AppState) -> Result<usize, String> {
    require_user(state).await?;
    let today = Utc::now().date_naive();
    let operations = &state.operations_domain;
    let maintenance = operations.get_maintenance().mark_overdue(today).await;
    let examinations = operations.get_examinations().mark_overdue(today).await;
    Ok(maintenance + examinations)
}
