// 事故与违规事件

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::task::Priority;
use crate::storage::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentType {
    EquipmentFailure,
    Violation,
    NearMiss,
    Injury,
    Environmental,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    #[default]
    Reported,
    Investigating,
    Resolved,
    Closed,
}

impl IncidentStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Reported | Self::Investigating)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub tenant_id: String,
    pub organization_id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    pub severity: Priority,
    pub status: IncidentStatus,
    pub reported_by: String,
    pub assigned_to: Option<String>,
    pub occurred_at: DateTime<Utc>,
    /// 登记时间，由存储写入
    pub reported_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub root_cause: Option<String>,
    pub corrective_actions: Option<String>,
    /// 整改计划完成日期
    pub planned_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIncident {
    pub tenant_id: String,
    pub organization_id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    pub severity: Priority,
    #[serde(default)]
    pub status: IncidentStatus,
    pub reported_by: String,
    pub assigned_to: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub planned_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncidentPatch {
    pub organization_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub incident_type: Option<IncidentType>,
    pub severity: Option<Priority>,
    pub status: Option<IncidentStatus>,
    pub assigned_to: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub root_cause: Option<String>,
    pub corrective_actions: Option<String>,
    pub planned_date: Option<NaiveDate>,
}

impl Record for Incident {
    type Draft = NewIncident;
    type Patch = IncidentPatch;
    const ID_PREFIX: &'static str = "incident";

    fn id(&self) -> &str {
        &self.id
    }

    fn tenant_id(&self) -> Option<&str> {
        Some(&self.tenant_id)
    }

    fn from_draft(id: String, draft: NewIncident, now: DateTime<Utc>) -> Self {
        Self {
            id,
            tenant_id: draft.tenant_id,
            organization_id: draft.organization_id,
            title: draft.title,
            description: draft.description,
            incident_type: draft.incident_type,
            severity: draft.severity,
            status: draft.status,
            reported_by: draft.reported_by,
            assigned_to: draft.assigned_to,
            occurred_at: draft.occurred_at,
            reported_at: now,
            resolved_at: None,
            root_cause: None,
            corrective_actions: None,
            planned_date: draft.planned_date,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: IncidentPatch) {
        merge_fields!(self, patch;
            set: organization_id, title, description, incident_type, severity, status, occurred_at;
            opt: assigned_to, resolved_at, root_cause, corrective_actions, planned_date);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
