// 任务（整改措施、维护、审核）

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    CorrectiveAction,
    Maintenance,
    Audit,
    Other,
}

/// 优先级（任务和事故共用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Open,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    /// 已完成或已取消的任务不再计入逾期
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// 任务来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskSourceType {
    Incident,
    Audit,
    Checklist,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub tenant_id: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub priority: Priority,
    pub status: TaskStatus,
    pub assigned_to: String,
    pub created_by: String,
    pub due_date: NaiveDate,
    pub completed_at: Option<DateTime<Utc>>,
    pub source_type: Option<TaskSourceType>,
    pub source_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub tenant_id: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    pub assigned_to: String,
    pub created_by: String,
    pub due_date: NaiveDate,
    pub source_type: Option<TaskSourceType>,
    pub source_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub task_type: Option<TaskType>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Record for Task {
    type Draft = NewTask;
    type Patch = TaskPatch;
    const ID_PREFIX: &'static str = "task";

    fn id(&self) -> &str {
        &self.id
    }

    fn tenant_id(&self) -> Option<&str> {
        Some(&self.tenant_id)
    }

    fn from_draft(id: String, draft: NewTask, now: DateTime<Utc>) -> Self {
        Self {
            id,
            tenant_id: draft.tenant_id,
            title: draft.title,
            description: draft.description,
            task_type: draft.task_type,
            priority: draft.priority,
            status: draft.status,
            assigned_to: draft.assigned_to,
            created_by: draft.created_by,
            due_date: draft.due_date,
            completed_at: None,
            source_type: draft.source_type,
            source_id: draft.source_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: TaskPatch) {
        merge_fields!(self, patch;
            set: title, task_type, priority, status, assigned_to, due_date;
            opt: description, completed_at);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
