//! 派生数据模块
//!
//! 从各存储的记录计算派生结果，包括：
//! - 各模块统计与逾期规则
//! - 预算执行汇总
//! - 租户仪表盘
//! - 期限提醒

pub mod budget;
pub mod dashboard;
pub mod reminders;
pub mod stats;

// 重新导出常用结构体和函数
pub use budget::{budget_summary, BudgetSummary, CategorySummary};
pub use dashboard::{dashboard_summary, DashboardSummary, TenantSnapshot};
pub use reminders::{ReminderItem, ReminderLevel};
pub use stats::*;
