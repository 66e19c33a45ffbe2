// 任务管理

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::stats::{is_task_overdue, task_stats, TaskStats};
use crate::models::task::{NewTask, Priority, TaskPatch, TaskSourceType, TaskStatus, TaskType};
use crate::models::Task;
use crate::storage::RecordStore;

/// 任务过滤条件，`None` 表示不限
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskFilter {
    pub tenant_id: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assigned_to: Option<String>,
    #[serde(rename = "type")]
    pub task_type: Option<TaskType>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.tenant_id.as_ref().is_none_or(|t| *t == task.tenant_id)
            && self.status.is_none_or(|s| s == task.status)
            && self.priority.is_none_or(|p| p == task.priority)
            && self.assigned_to.as_ref().is_none_or(|a| *a == task.assigned_to)
            && self.task_type.is_none_or(|t| t == task.task_type)
    }
}

pub struct TasksManager {
    store: RecordStore<Task>,
}

impl TasksManager {
    pub fn new(store: RecordStore<Task>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore<Task> {
        &self.store
    }

    pub async fn add(&self, draft: NewTask) -> Task {
        self.store.add(draft).await
    }

    pub async fn update(&self, id: &str, patch: TaskPatch) -> Option<Task> {
        self.store.update(id, patch).await
    }

    pub async fn delete(&self, id: &str) -> bool {
        self.store.delete(id).await
    }

    pub async fn get(&self, id: &str) -> Option<Task> {
        self.store.get(id).await
    }

    pub async fn all(&self) -> Vec<Task> {
        self.store.all().await
    }

    pub async fn by_tenant(&self, tenant_id: &str) -> Vec<Task> {
        self.store.by_tenant(tenant_id).await
    }

    /// 标记完成并记录完成时间
    pub async fn complete(&self, id: &str) -> Option<Task> {
        self.store
            .update_with(id, |task| {
                task.status = TaskStatus::Completed;
                task.completed_at = Some(Utc::now());
            })
            .await
    }

    pub async fn filter(&self, filter: &TaskFilter) -> Vec<Task> {
        self.store.filter(|t| filter.matches(t)).await
    }

    pub async fn by_status(&self, status: TaskStatus) -> Vec<Task> {
        self.store.filter(|t| t.status == status).await
    }

    /// 由某条来源记录（事故、审核、检查表）产生的任务
    pub async fn by_source(&self, source_type: TaskSourceType, source_id: &str) -> Vec<Task> {
        self.store
            .filter(|t| t.source_type == Some(source_type) && t.source_id.as_deref() == Some(source_id))
            .await
    }

    pub async fn overdue(&self, today: NaiveDate) -> Vec<Task> {
        self.store.filter(|t| is_task_overdue(t, today)).await
    }

    pub async fn stats(&self, tenant_id: Option<&str>, today: NaiveDate) -> TaskStats {
        let tasks = match tenant_id {
            Some(tenant_id) => self.store.by_tenant(tenant_id).await,
            None => self.store.all().await,
        };
        task_stats(&tasks, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, due: NaiveDate, priority: Priority) -> NewTask {
        NewTask {
            tenant_id: "tenant-1".to_string(),
            title: title.to_string(),
            description: None,
            task_type: TaskType::CorrectiveAction,
            priority,
            status: TaskStatus::Open,
            assigned_to: "Иванов И.И.".to_string(),
            created_by: "Система".to_string(),
            due_date: due,
            source_type: Some(TaskSourceType::Incident),
            source_id: Some("incident-1".to_string()),
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
    }

    #[tokio::test]
    async fn test_complete_removes_from_overdue() {
        let manager = TasksManager::new(RecordStore::in_memory("tasks-storage", Vec::new()));
        let late = manager.add(draft("Заменить манометр", date(1), Priority::High)).await;
        manager.add(draft("Обновить инструкцию", date(30), Priority::Low)).await;

        let today = date(10);
        let overdue = manager.overdue(today).await;
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].id, late.id);
        assert_eq!(manager.stats(Some("tenant-1"), today).await.overdue, 1);

        let done = manager.complete(&late.id).await.unwrap();
        assert_eq!(done.status, TaskStatus::Completed);
        assert!(done.completed_at.is_some());
        assert!(manager.overdue(today).await.is_empty());
        assert_eq!(manager.stats(None, today).await.overdue, 0);
    }

    #[tokio::test]
    async fn test_filter_and_source() {
        let manager = TasksManager::new(RecordStore::in_memory("tasks-storage", Vec::new()));
        manager.add(draft("a", date(5), Priority::Critical)).await;
        let mut other = draft("b", date(5), Priority::Low);
        other.assigned_to = "Петров П.П.".to_string();
        other.source_type = None;
        other.source_id = None;
        manager.add(other).await;

        let filter = TaskFilter {
            priority: Some(Priority::Critical),
            ..Default::default()
        };
        assert_eq!(manager.filter(&filter).await.len(), 1);

        let filter = TaskFilter {
            assigned_to: Some("Петров П.П.".to_string()),
            status: Some(TaskStatus::Open),
            ..Default::default()
        };
        assert_eq!(manager.filter(&filter).await[0].title, "b");
        assert_eq!(manager.filter(&TaskFilter::default()).await.len(), 2);

        assert_eq!(
            manager
                .by_source(TaskSourceType::Incident, "incident-1")
                .await
                .len(),
            1
        );
    }
}
