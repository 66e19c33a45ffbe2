//! 界面命令模块
//!
//! 提供界面（桌面 webview 或 Web 前端桥接）调用的全部命令接口，按功能分组：
//! - auth: 登录会话与访问控制
//! - tenants: 租户管理
//! - documents: 命令与知识库
//! - personnel: 人员认证
//! - training: 培训中心申请
//! - operations: 任务、事故、维护、检验
//! - equipment: 设备目录
//! - checklists: 检查表与审核
//! - budget: 安全预算
//! - notifications: 通知
//! - dashboard: 仪表盘与期限提醒
//! - config: 配置管理
//! - export: 表格导出
//!
//! 所有命令返回 `Result<T, String>`，错误信息直接展示给用户。

pub mod auth;
pub mod budget;
pub mod checklists;
pub mod config;
pub mod dashboard;
pub mod documents;
pub mod equipment;
pub mod export;
pub mod notifications;
pub mod operations;
pub mod personnel;
pub mod tenants;
pub mod training;

// 重新导出所有命令
pub use auth::*;
pub use budget::*;
pub use checklists::*;
pub use config::*;
pub use dashboard::*;
pub use documents::*;
pub use equipment::*;
pub use export::*;
pub use notifications::*;
pub use operations::*;
pub use personnel::*;
pub use tenants::*;
pub use training::*;

use crate::models::User;
use crate::storage::{Record, RecordStore};

/// 检查按标识操作的记录是否属于当前用户的租户
///
/// 记录不存在返回 `Ok(false)`（由调用方按“未找到”处理），属于其他租户返回错误。
pub(crate) async fn check_record<T: Record>(
    store: &RecordStore<T>,
    user: &User,
    id: &str,
) -> Result<bool, String> {
    let Some(record) = store.get(id).await else {
        return Ok(false);
    };
    if let Some(tenant_id) = record.tenant_id() {
        auth::ensure_tenant(user, tenant_id)?;
    }
    Ok(true)
}

/// 只保留当前用户可以看到的记录（本租户记录与无租户记录）
pub(crate) fn visible_records<T: Record>(user: &User, records: Vec<T>) -> Vec<T> {
    records
        .into_iter()
        .filter(|r| r.tenant_id().is_none_or(|t| auth::ensure_tenant(user, t).is_ok()))
        .collect()
}
