// 期限提醒 - 扫描临近或已过期限的记录，并按租户汇总成一条通知

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::dashboard::TenantSnapshot;
use crate::event_bus::{AppEvent, EventBus};
use crate::models::certification::AttestationResult;
use crate::models::examination::ExaminationStatus;
use crate::models::maintenance::MaintenanceStatus;
use crate::models::notification::{NewNotification, NotificationKind, NotificationSource};
use crate::models::{Notification, ReminderSettings};
use crate::modules::notifications::NotificationsManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderLevel {
    Critical,
    Warning,
}

/// 一条需要提醒的记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderItem {
    pub tenant_id: String,
    pub source: NotificationSource,
    pub source_id: String,
    pub title: String,
    pub due_date: NaiveDate,
    /// 距离期限的天数，已过期为负数
    pub days_left: i64,
    pub level: ReminderLevel,
}

/// 按剩余天数分级；超出预警窗口返回 None
pub fn classify(days_left: i64, critical_days: i64, warning_days: i64) -> Option<ReminderLevel> {
    if days_left <= critical_days {
        Some(ReminderLevel::Critical)
    } else if days_left <= warning_days {
        Some(ReminderLevel::Warning)
    } else {
        None
    }
}

struct Collector<'a> {
    today: NaiveDate,
    settings: &'a ReminderSettings,
    items: Vec<ReminderItem>,
}

impl Collector<'_> {
    fn push(
        &mut self,
        tenant_id: &str,
        source: NotificationSource,
        source_id: &str,
        title: &str,
        due_date: NaiveDate,
        warning_days: i64,
    ) {
        let days_left = (due_date - self.today).num_days();
        if let Some(level) = classify(days_left, self.settings.critical_days, warning_days) {
            self.items.push(ReminderItem {
                tenant_id: tenant_id.to_string(),
                source,
                source_id: source_id.to_string(),
                title: title.to_string(),
                due_date,
                days_left,
                level,
            });
        }
    }
}

/// 收集需要提醒的记录，按剩余天数升序排列
pub fn collect(
    snapshot: &TenantSnapshot,
    today: NaiveDate,
    settings: &ReminderSettings,
    certification_warning_days: i64,
) -> Vec<ReminderItem> {
    let mut collector = Collector {
        today,
        settings,
        items: Vec::new(),
    };
    let warning = settings.warning_days;

    for task in snapshot.tasks.iter().filter(|t| !t.status.is_closed()) {
        collector.push(
            &task.tenant_id,
            NotificationSource::Task,
            &task.id,
            &task.title,
            task.due_date,
            warning,
        );
    }

    for incident in snapshot.incidents.iter().filter(|i| i.status.is_open()) {
        if let Some(planned) = incident.planned_date {
            collector.push(
                &incident.tenant_id,
                NotificationSource::Incident,
                &incident.id,
                &incident.title,
                planned,
                warning,
            );
        }
    }

    for work in snapshot
        .maintenance
        .iter()
        .filter(|w| w.status != MaintenanceStatus::Completed)
    {
        collector.push(
            &work.tenant_id,
            NotificationSource::Maintenance,
            &work.id,
            &format!("{}: {}", work.object_name, work.title),
            work.scheduled_date,
            warning,
        );
    }

    for exam in snapshot
        .examinations
        .iter()
        .filter(|e| e.status != ExaminationStatus::Completed)
    {
        collector.push(
            &exam.tenant_id,
            NotificationSource::Examination,
            &exam.id,
            &format!("{}: {}", exam.object_name, exam.examination_type),
            exam.scheduled_date,
            warning,
        );
    }

    for cert in snapshot
        .certifications
        .iter()
        .filter(|c| c.result == AttestationResult::Passed)
    {
        collector.push(
            &cert.tenant_id,
            NotificationSource::Certification,
            &cert.id,
            &format!("{} ({})", cert.person_name, cert.area),
            cert.expiry_date,
            certification_warning_days,
        );
    }

    let mut items = collector.items;
    items.sort_by_key(|item| item.days_left);
    items
}

/// 每个租户一条汇总通知
pub fn build_digests(items: &[ReminderItem]) -> Vec<NewNotification> {
    let mut tenants: Vec<&str> = Vec::new();
    for item in items {
        if !tenants.contains(&item.tenant_id.as_str()) {
            tenants.push(&item.tenant_id);
        }
    }

    tenants
        .into_iter()
        .map(|tenant_id| {
            let tenant_items: Vec<&ReminderItem> =
                items.iter().filter(|i| i.tenant_id == tenant_id).collect();
            let critical = tenant_items
                .iter()
                .filter(|i| i.level == ReminderLevel::Critical)
                .count();

            let lines: Vec<String> = tenant_items
                .iter()
                .map(|item| {
                    if item.days_left < 0 {
                        format!("• {} (просрочено на {} дн.)", item.title, -item.days_left)
                    } else {
                        format!("• {} ({} дн.)", item.title, item.days_left)
                    }
                })
                .collect();

            NewNotification {
                tenant_id: tenant_id.to_string(),
                user_id: None,
                kind: if critical > 0 {
                    NotificationKind::Critical
                } else {
                    NotificationKind::Warning
                },
                source: NotificationSource::System,
                source_id: None,
                title: format!(
                    "Напоминание: {} записей требуют внимания",
                    tenant_items.len()
                ),
                message: lines.join("\n"),
                link: None,
            }
        })
        .collect()
}

/// 生成并发布提醒通知，返回新建的通知
pub async fn publish_reminders(
    items: &[ReminderItem],
    notifications: &NotificationsManager,
    event_bus: &EventBus,
) -> Vec<Notification> {
    let mut posted = Vec::new();
    for digest in build_digests(items) {
        let tenant_id = digest.tenant_id.clone();
        let count = items.iter().filter(|i| i.tenant_id == tenant_id).count();
        let notification = notifications.add(digest).await;
        info!("租户 {} 生成提醒通知，涉及 {} 条记录", tenant_id, count);
        event_bus.publish(AppEvent::RemindersGenerated { tenant_id, count });
        posted.push(notification);
    }
    posted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::{NewTask, Priority, TaskStatus, TaskType};
    use crate::models::Task;
    use crate::storage::Record;
    use chrono::Utc;

    fn task(id: &str, tenant: &str, due: NaiveDate, status: TaskStatus) -> Task {
        Task::from_draft(
            id.to_string(),
            NewTask {
                tenant_id: tenant.to_string(),
                title: id.to_string(),
                description: None,
                task_type: TaskType::CorrectiveAction,
                priority: Priority::High,
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
    fn test_classify_thresholds() {
        assert_eq!(classify(-2, 3, 7), Some(ReminderLevel::Critical));
        assert_eq!(classify(3, 3, 7), Some(ReminderLevel::Critical));
        assert_eq!(classify(4, 3, 7), Some(ReminderLevel::Warning));
        assert_eq!(classify(7, 3, 7), Some(ReminderLevel::Warning));
        assert_eq!(classify(8, 3, 7), None);
    }

    #[test]
    fn test_collect_and_digest() {
        let today = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let day = |d| NaiveDate::from_ymd_opt(2025, 4, d).unwrap();
        let snapshot = TenantSnapshot {
            tasks: vec![
                task("task-a", "tenant-1", day(6), TaskStatus::Open),
                task("task-b", "tenant-1", day(2), TaskStatus::InProgress),
                task("task-c", "tenant-1", day(2), TaskStatus::Completed),
                task("task-d", "tenant-2", day(20), TaskStatus::Open),
                task("task-e", "tenant-2", day(7), TaskStatus::Open),
            ],
            ..Default::default()
        };

        let items = collect(&snapshot, today, &ReminderSettings::default(), 30);
        let ids: Vec<&str> = items.iter().map(|i| i.source_id.as_str()).collect();
        assert_eq!(ids, vec!["task-b", "task-a", "task-e"]);
        assert_eq!(items[0].level, ReminderLevel::Critical);
        assert_eq!(items[1].level, ReminderLevel::Warning);

        let digests = build_digests(&items);
        assert_eq!(digests.len(), 2);
        assert_eq!(digests[0].tenant_id, "tenant-1");
        assert_eq!(digests[0].kind, NotificationKind::Critical);
        assert_eq!(digests[1].kind, NotificationKind::Warning);
        assert!(digests[0].message.contains("task-a"));
    }
}
