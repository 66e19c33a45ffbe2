// 租户仪表盘汇总

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::budget::{budget_summary, BudgetSummary};
use super::stats::{
    certification_stats, examination_stats, incident_stats, maintenance_stats,
    order_stats, task_stats, CertificationStats, ExaminationStats, IncidentStats,
    MaintenanceStats, OrderStats, TaskStats,
};
use crate::models::{
    BudgetCategory, BudgetExpense, Certification, Examination, Incident, MaintenanceWork,
    Notification, Order, Task,
};

/// 未来多少天内到期的任务计入“即将到期”
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

/// 仪表盘计算所需的某租户全部数据
#[derive(Debug, Clone, Default)]
pub struct TenantSnapshot {
    pub tasks: Vec<Task>,
    pub incidents: Vec<Incident>,
    pub maintenance: Vec<MaintenanceWork>,
    pub examinations: Vec<Examination>,
    pub certifications: Vec<Certification>,
    pub orders: Vec<Order>,
    pub budget_categories: Vec<BudgetCategory>,
    pub budget_expenses: Vec<BudgetExpense>,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub tenant_id: String,
    pub generated_at: DateTime<Utc>,
    /// 有认证记录的人员数
    pub total_employees: usize,
    pub active_certifications: usize,
    pub expiring_certifications: usize,
    pub overdue_incidents: usize,
    /// 未来几天内到期的未完成任务
    pub upcoming_tasks: usize,
    pub budget_utilization: Decimal,
    pub unread_notifications: usize,
    pub tasks: TaskStats,
    pub incidents: IncidentStats,
    pub maintenance: MaintenanceStats,
    pub examinations: ExaminationStats,
    pub certifications: CertificationStats,
    pub orders: OrderStats,
    pub budget: BudgetSummary,
}

fn is_upcoming(task: &Task, today: NaiveDate) -> bool {
    let days_left = (task.due_date - today).num_days();
    !task.status.is_closed() && (1..=UPCOMING_WINDOW_DAYS).contains(&days_left)
}

pub fn dashboard_summary(
    tenant_id: &str,
    snapshot: &TenantSnapshot,
    now: DateTime<Utc>,
    certification_warning_days: i64,
) -> DashboardSummary {
    let today = now.date_naive();
    let tasks = task_stats(&snapshot.tasks, today);
    let incidents = incident_stats(&snapshot.incidents, now);
    let certifications =
        certification_stats(&snapshot.certifications, today, certification_warning_days);
    let budget = budget_summary(
        &snapshot.budget_categories,
        &snapshot.budget_expenses,
        today.year(),
    );

    DashboardSummary {
        tenant_id: tenant_id.to_string(),
        generated_at: now,
        total_employees: certifications.personnel,
        active_certifications: certifications.valid + certifications.expiring,
        expiring_certifications: certifications.expiring,
        overdue_incidents: incidents.overdue,
        upcoming_tasks: snapshot.tasks.iter().filter(|t| is_upcoming(t, today)).count(),
        budget_utilization: budget.utilization_rate,
        unread_notifications: snapshot.notifications.iter().filter(|n| !n.is_read).count(),
        tasks,
        incidents,
        maintenance: maintenance_stats(&snapshot.maintenance, today),
        examinations: examination_stats(&snapshot.examinations, today),
        certifications,
        orders: order_stats(&snapshot.orders),
        budget,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::{NewTask, Priority, TaskStatus, TaskType};
    use crate::storage::Record;
    use chrono::TimeZone;

    fn task(due: NaiveDate, status: TaskStatus) -> Task {
        Task::from_draft(
            "task-x".to_string(),
            NewTask {
                tenant_id: "tenant-1".to_string(),
                title: "Проверка".to_string(),
                description: None,
                task_type: TaskType::Audit,
                priority: Priority::Medium,
                status,
                assigned_to: "Иванов И.И.".to_string(),
                created_by: "Система".to_string(),
                due_date: due,
                source_type: None,
                source_id: None,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_empty_snapshot() {
        let now = Utc.with_ymd_and_hms(2025, 5, 10, 9, 0, 0).unwrap();
        let summary = dashboard_summary("tenant-1", &TenantSnapshot::default(), now, 30);
        assert_eq!(summary.total_employees, 0);
        assert_eq!(summary.upcoming_tasks, 0);
        assert_eq!(summary.budget_utilization, Decimal::ZERO);
        assert_eq!(summary.budget.year, 2025);
    }

    #[test]
    fn test_upcoming_tasks_window() {
        let now = Utc.with_ymd_and_hms(2025, 5, 10, 9, 0, 0).unwrap();
        let day = |d| NaiveDate::from_ymd_opt(2025, 5, d).unwrap();
        let snapshot = TenantSnapshot {
            tasks: vec![
                task(day(10), TaskStatus::Open),
                task(day(17), TaskStatus::InProgress),
                task(day(18), TaskStatus::Open),
                task(day(12), TaskStatus::Completed),
                task(day(5), TaskStatus::Open),
            ],
            ..Default::default()
        };

        let summary = dashboard_summary("tenant-1", &snapshot, now, 30);
        // 今天到期的任务算逾期，不算临近
        assert_eq!(summary.upcoming_tasks, 1);
        assert_eq!(summary.tasks.overdue, 2);
    }
}
