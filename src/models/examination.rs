// 技术检验（экспертиза / диагностика）

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExaminationStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Overdue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Examination {
    pub id: String,
    pub tenant_id: String,
    pub object_id: String,
    pub object_name: String,
    /// 检验类型为自由文本，例如 "Техническая диагностика"
    #[serde(rename = "type")]
    pub examination_type: String,
    pub scheduled_date: NaiveDate,
    pub completed_date: Option<NaiveDate>,
    pub status: ExaminationStatus,
    pub executor: String,
    pub executor_contact: Option<String>,
    pub conclusion_file_url: Option<String>,
    pub notes: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Examination {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.status {
            ExaminationStatus::Overdue => true,
            ExaminationStatus::Completed => false,
            _ => self.scheduled_date <= today,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExamination {
    pub tenant_id: String,
    pub object_id: String,
    pub object_name: String,
    #[serde(rename = "type")]
    pub examination_type: String,
    pub scheduled_date: NaiveDate,
    #[serde(default)]
    pub status: ExaminationStatus,
    pub executor: String,
    pub executor_contact: Option<String>,
    pub notes: Option<String>,
    pub created_by: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExaminationPatch {
    pub object_id: Option<String>,
    pub object_name: Option<String>,
    #[serde(rename = "type")]
    pub examination_type: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    pub completed_date: Option<NaiveDate>,
    pub status: Option<ExaminationStatus>,
    pub executor: Option<String>,
    pub executor_contact: Option<String>,
    pub conclusion_file_url: Option<String>,
    pub notes: Option<String>,
}

impl Record for Examination {
    type Draft = NewExamination;
    type Patch = ExaminationPatch;
    const ID_PREFIX: &'static str = "exam";

    fn id(&self) -> &str {
        &self.id
    }

    fn tenant_id(&self) -> Option<&str> {
        Some(&self.tenant_id)
    }

    fn from_draft(id: String, draft: NewExamination, now: DateTime<Utc>) -> Self {
        Self {
            id,
            tenant_id: draft.tenant_id,
            object_id: draft.object_id,
            object_name: draft.object_name,
            examination_type: draft.examination_type,
            scheduled_date: draft.scheduled_date,
            completed_date: None,
            status: draft.status,
            executor: draft.executor,
            executor_contact: draft.executor_contact,
            conclusion_file_url: None,
            notes: draft.notes,
            created_by: draft.created_by,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: ExaminationPatch) {
        merge_fields!(self, patch;
            set: object_id, object_name, examination_type, scheduled_date, status, executor;
            opt: completed_date, executor_contact, conclusion_file_url, notes);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
