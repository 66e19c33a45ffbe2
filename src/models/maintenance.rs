// 设备维护工作

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceType {
    /// ТО
    Inspection,
    Repair,
    Replacement,
}

impl MaintenanceType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Inspection => "ТО",
            Self::Repair => "Ремонт",
            Self::Replacement => "Замена",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
    Overdue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceWork {
    pub id: String,
    pub tenant_id: String,
    pub object_id: String,
    pub object_name: String,
    #[serde(rename = "type")]
    pub work_type: MaintenanceType,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_date: NaiveDate,
    pub completed_date: Option<NaiveDate>,
    pub status: MaintenanceStatus,
    pub executor: String,
    pub executor_contact: Option<String>,
    pub notes: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MaintenanceWork {
    /// 计划日期已过且未完成
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.status {
            MaintenanceStatus::Overdue => true,
            MaintenanceStatus::Completed => false,
            _ => self.scheduled_date <= today,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMaintenanceWork {
    pub tenant_id: String,
    pub object_id: String,
    pub object_name: String,
    #[serde(rename = "type")]
    pub work_type: MaintenanceType,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_date: NaiveDate,
    #[serde(default)]
    pub status: MaintenanceStatus,
    pub executor: String,
    pub executor_contact: Option<String>,
    pub notes: Option<String>,
    pub created_by: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaintenanceWorkPatch {
    pub object_id: Option<String>,
    pub object_name: Option<String>,
    #[serde(rename = "type")]
    pub work_type: Option<MaintenanceType>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    pub completed_date: Option<NaiveDate>,
    pub status: Option<MaintenanceStatus>,
    pub executor: Option<String>,
    pub executor_contact: Option<String>,
    pub notes: Option<String>,
}

impl Record for MaintenanceWork {
    type Draft = NewMaintenanceWork;
    type Patch = MaintenanceWorkPatch;
    const ID_PREFIX: &'static str = "work";

    fn id(&self) -> &str {
        &self.id
    }

    fn tenant_id(&self) -> Option<&str> {
        Some(&self.tenant_id)
    }

    fn from_draft(id: String, draft: NewMaintenanceWork, now: DateTime<Utc>) -> Self {
        Self {
            id,
            tenant_id: draft.tenant_id,
            object_id: draft.object_id,
            object_name: draft.object_name,
            work_type: draft.work_type,
            title: draft.title,
            description: draft.description,
            scheduled_date: draft.scheduled_date,
            completed_date: None,
            status: draft.status,
            executor: draft.executor,
            executor_contact: draft.executor_contact,
            notes: draft.notes,
            created_by: draft.created_by,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: MaintenanceWorkPatch) {
        merge_fields!(self, patch;
            set: object_id, object_name, work_type, title, scheduled_date, status, executor;
            opt: description, completed_date, executor_contact, notes);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
