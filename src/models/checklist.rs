// 检查表与按检查表进行的审核

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{new_record_id, Record};

/// 检查表中的一个问题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub requires_comment: bool,
    /// 关键项不合格时审核结论为不合格
    #[serde(default)]
    pub critical_item: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChecklistItem {
    pub question: String,
    #[serde(default)]
    pub requires_comment: bool,
    #[serde(default)]
    pub critical_item: bool,
}

impl NewChecklistItem {
    fn into_item(self) -> ChecklistItem {
        ChecklistItem {
            id: new_record_id("item"),
            question: self.question,
            requires_comment: self.requires_comment,
            critical_item: self.critical_item,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checklist {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    /// 例如 `fire_safety`、`equipment`、`ppe`
    pub category: String,
    pub items: Vec<ChecklistItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Checklist {
    pub fn item(&self, item_id: &str) -> Option<&ChecklistItem> {
        self.items.iter().find(|i| i.id == item_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChecklist {
    pub tenant_id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub items: Vec<NewChecklistItem>,
}

/// 检查表的部分更新；`items` 整体替换
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChecklistPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub items: Option<Vec<ChecklistItem>>,
}

impl Record for Checklist {
    type Draft = NewChecklist;
    type Patch = ChecklistPatch;
    const ID_PREFIX: &'static str = "checklist";

    fn id(&self) -> &str {
        &self.id
    }

    fn tenant_id(&self) -> Option<&str> {
        Some(&self.tenant_id)
    }

    fn from_draft(id: String, draft: NewChecklist, now: DateTime<Utc>) -> Self {
        Self {
            id,
            tenant_id: draft.tenant_id,
            name: draft.name,
            category: draft.category,
            items: draft.items.into_iter().map(NewChecklistItem::into_item).collect(),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: ChecklistPatch) {
        merge_fields!(self, patch; set: name, category, items);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
}

impl AuditStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Scheduled => "Запланирован",
            Self::InProgress => "Проводится",
            Self::Completed => "Завершён",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FindingResult {
    #[serde(rename = "pass")]
    Pass,
    #[serde(rename = "fail")]
    Fail,
    #[serde(rename = "n/a")]
    NotApplicable,
}

/// 对检查表某一项的检查结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditFinding {
    pub id: String,
    pub item_id: String,
    pub result: FindingResult,
    pub comment: Option<String>,
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuditFinding {
    pub item_id: String,
    pub result: FindingResult,
    pub comment: Option<String>,
    pub photo: Option<String>,
}

impl NewAuditFinding {
    pub(crate) fn into_finding(self) -> AuditFinding {
        AuditFinding {
            id: new_record_id("finding"),
            item_id: self.item_id,
            result: self.result,
            comment: self.comment,
            photo: self.photo,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Audit {
    pub id: String,
    pub tenant_id: String,
    pub checklist_id: String,
    pub organization_id: String,
    pub auditor_id: String,
    pub scheduled_date: NaiveDate,
    pub completed_date: Option<NaiveDate>,
    pub status: AuditStatus,
    #[serde(default)]
    pub findings: Vec<AuditFinding>,
    pub auditor_signature: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 安排审核；新审核总是 `scheduled` 且没有检查结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAudit {
    pub tenant_id: String,
    pub checklist_id: String,
    pub organization_id: String,
    pub auditor_id: String,
    pub scheduled_date: NaiveDate,
}

/// 审核的部分更新；状态与检查结果走专门的操作
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditPatch {
    pub organization_id: Option<String>,
    pub auditor_id: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    pub auditor_signature: Option<String>,
}

impl Record for Audit {
    type Draft = NewAudit;
    type Patch = AuditPatch;
    const ID_PREFIX: &'static str = "audit";

    fn id(&self) -> &str {
        &self.id
    }

    fn tenant_id(&self) -> Option<&str> {
        Some(&self.tenant_id)
    }

    fn from_draft(id: String, draft: NewAudit, now: DateTime<Utc>) -> Self {
        Self {
            id,
            tenant_id: draft.tenant_id,
            checklist_id: draft.checklist_id,
            organization_id: draft.organization_id,
            auditor_id: draft.auditor_id,
            scheduled_date: draft.scheduled_date,
            completed_date: None,
            status: AuditStatus::Scheduled,
            findings: Vec::new(),
            auditor_signature: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: AuditPatch) {
        merge_fields!(self, patch;
            set: organization_id, auditor_id, scheduled_date;
            opt: auditor_signature);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
