// 派生统计 - 对记录切片做纯折叠，时间点由调用方传入

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::models::certification::CertificationValidity;
use crate::models::checklist::{AuditStatus, FindingResult};
use crate::models::examination::ExaminationStatus;
use crate::models::incident::IncidentStatus;
use crate::models::maintenance::MaintenanceStatus;
use crate::models::task::{Priority, TaskStatus};
use crate::models::tenant::TenantStatus;
use crate::models::{
    Audit, Certification, Checklist, DocumentStatus, Examination, Incident, MaintenanceWork, Order,
    Task, Tenant,
};

/// 按键计数，结果按键第一次出现的顺序排列
pub fn count_by<T, K, F>(records: &[T], key: F) -> Vec<(K, usize)>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut counts: Vec<(K, usize)> = Vec::new();
    for record in records {
        let k = key(record);
        match counts.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, count)) => *count += 1,
            None => counts.push((k, 1)),
        }
    }
    counts
}

/// 逾期规则：截止日当天开始后即逾期（截止日零点早于当前时刻），已完成/取消的除外
pub fn is_overdue(due: NaiveDate, closed: bool, today: NaiveDate) -> bool {
    !closed && due <= today
}

/// 完成率（百分比，四舍五入到整数）
pub fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}

/// 当月第一天零点（UTC）
pub fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenantStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub expired: usize,
}

pub fn tenant_stats(tenants: &[Tenant], now: DateTime<Utc>) -> TenantStats {
    TenantStats {
        total: tenants.len(),
        active: tenants
            .iter()
            .filter(|t| t.status == TenantStatus::Active)
            .count(),
        inactive: tenants
            .iter()
            .filter(|t| t.status == TenantStatus::Inactive)
            .count(),
        expired: tenants.iter().filter(|t| t.is_expired(now)).count(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskStats {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub overdue: usize,
    /// 未完成的紧急任务
    pub critical: usize,
}

pub fn is_task_overdue(task: &Task, today: NaiveDate) -> bool {
    is_overdue(task.due_date, task.status.is_closed(), today)
}

pub fn task_stats(tasks: &[Task], today: NaiveDate) -> TaskStats {
    let mut stats = TaskStats {
        total: tasks.len(),
        ..Default::default()
    };
    for task in tasks {
        match task.status {
            TaskStatus::Open => stats.open += 1,
            TaskStatus::InProgress => stats.in_progress += 1,
            TaskStatus::Completed => stats.completed += 1,
            TaskStatus::Cancelled => {}
        }
        if is_task_overdue(task, today) {
            stats.overdue += 1;
        }
        if task.priority == Priority::Critical && task.status != TaskStatus::Completed {
            stats.critical += 1;
        }
    }
    stats
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceStats {
    pub total: usize,
    pub planned: usize,
    pub in_progress: usize,
    pub completed: usize,
    /// 标记为逾期或计划日期已过的工作
    pub overdue: usize,
    pub completion_rate: u32,
}

pub fn maintenance_stats(works: &[MaintenanceWork], today: NaiveDate) -> MaintenanceStats {
    let mut stats = MaintenanceStats {
        total: works.len(),
        ..Default::default()
    };
    for work in works {
        match work.status {
            MaintenanceStatus::Planned => stats.planned += 1,
            MaintenanceStatus::InProgress => stats.in_progress += 1,
            MaintenanceStatus::Completed => stats.completed += 1,
            MaintenanceStatus::Overdue => {}
        }
        if work.is_overdue(today) {
            stats.overdue += 1;
        }
    }
    stats.completion_rate = completion_rate(stats.completed, stats.total);
    stats
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExaminationStats {
    pub total: usize,
    pub scheduled: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub overdue: usize,
}

pub fn examination_stats(examinations: &[Examination], today: NaiveDate) -> ExaminationStats {
    let mut stats = ExaminationStats {
        total: examinations.len(),
        ..Default::default()
    };
    for exam in examinations {
        match exam.status {
            ExaminationStatus::Scheduled => stats.scheduled += 1,
            ExaminationStatus::InProgress => stats.in_progress += 1,
            ExaminationStatus::Completed => stats.completed += 1,
            ExaminationStatus::Overdue => {}
        }
        if exam.is_overdue(today) {
            stats.overdue += 1;
        }
    }
    stats
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncidentStats {
    pub total: usize,
    pub reported: usize,
    pub investigating: usize,
    pub resolved: usize,
    pub closed: usize,
    /// 未关闭的严重事故
    pub critical: usize,
    /// 整改计划日期已过且仍未解决
    pub overdue: usize,
    pub this_month: usize,
}

pub fn is_incident_overdue(incident: &Incident, today: NaiveDate) -> bool {
    incident
        .planned_date
        .is_some_and(|due| is_overdue(due, !incident.status.is_open(), today))
}

pub fn incident_stats(incidents: &[Incident], now: DateTime<Utc>) -> IncidentStats {
    let month_start = start_of_month(now);
    let today = now.date_naive();
    let mut stats = IncidentStats {
        total: incidents.len(),
        ..Default::default()
    };
    for incident in incidents {
        match incident.status {
            IncidentStatus::Reported => stats.reported += 1,
            IncidentStatus::Investigating => stats.investigating += 1,
            IncidentStatus::Resolved => stats.resolved += 1,
            IncidentStatus::Closed => stats.closed += 1,
        }
        if incident.severity == Priority::Critical && incident.status != IncidentStatus::Closed {
            stats.critical += 1;
        }
        if is_incident_overdue(incident, today) {
            stats.overdue += 1;
        }
        if incident.reported_at >= month_start {
            stats.this_month += 1;
        }
    }
    stats
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderStats {
    pub total: usize,
    /// 按状态计数（生命周期顺序，包含计数为 0 的状态）
    pub by_status: Vec<(DocumentStatus, usize)>,
    pub sent_to_training_center: usize,
}

pub fn order_stats(orders: &[Order]) -> OrderStats {
    let by_status = DocumentStatus::ALL
        .iter()
        .map(|status| (*status, orders.iter().filter(|o| o.status == *status).count()))
        .collect();
    OrderStats {
        total: orders.len(),
        by_status,
        sent_to_training_center: orders.iter().filter(|o| o.sent_to_training_center).count(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificationStats {
    pub total: usize,
    pub valid: usize,
    pub expiring: usize,
    pub expired: usize,
    /// 不同人员数
    pub personnel: usize,
}

pub fn certification_stats(
    certifications: &[Certification],
    today: NaiveDate,
    warning_days: i64,
) -> CertificationStats {
    let mut stats = CertificationStats {
        total: certifications.len(),
        ..Default::default()
    };
    let mut personnel: Vec<&str> = Vec::new();
    for cert in certifications {
        match cert.validity(today, warning_days) {
            CertificationValidity::Valid => stats.valid += 1,
            CertificationValidity::Expiring => stats.expiring += 1,
            CertificationValidity::Expired => stats.expired += 1,
        }
        if !personnel.contains(&cert.personnel_id.as_str()) {
            personnel.push(&cert.personnel_id);
        }
    }
    stats.personnel = personnel.len();
    stats
}

/// 单次审核的结果汇总
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditOutcome {
    pub total_items: usize,
    /// 已给出结果的检查项
    pub answered: usize,
    pub passed: usize,
    pub failed: usize,
    pub not_applicable: usize,
    /// 不合格的关键项
    pub critical_failures: usize,
    /// 合格项占适用项的百分比
    pub score: u32,
}

pub fn audit_outcome(audit: &Audit, checklist: &Checklist) -> AuditOutcome {
    let mut outcome = AuditOutcome {
        total_items: checklist.items.len(),
        ..Default::default()
    };
    for finding in &audit.findings {
        let Some(item) = checklist.item(&finding.item_id) else {
            continue;
        };
        outcome.answered += 1;
        match finding.result {
            FindingResult::Pass => outcome.passed += 1,
            FindingResult::Fail => {
                outcome.failed += 1;
                if item.critical_item {
                    outcome.critical_failures += 1;
                }
            }
            FindingResult::NotApplicable => outcome.not_applicable += 1,
        }
    }
    outcome.score = completion_rate(outcome.passed, outcome.passed + outcome.failed);
    outcome
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditStats {
    pub total: usize,
    pub scheduled: usize,
    pub in_progress: usize,
    pub completed: usize,
    /// 计划日期已到仍未完成
    pub overdue: usize,
}

pub fn audit_stats(audits: &[Audit], today: NaiveDate) -> AuditStats {
    let mut stats = AuditStats {
        total: audits.len(),
        ..Default::default()
    };
    for audit in audits {
        match audit.status {
            AuditStatus::Scheduled => stats.scheduled += 1,
            AuditStatus::InProgress => stats.in_progress += 1,
            AuditStatus::Completed => stats.completed += 1,
        }
        if is_overdue(
            audit.scheduled_date,
            audit.status == AuditStatus::Completed,
            today,
        ) {
            stats.overdue += 1;
        }
    }
    stats
}
