// 发往培训中心的培训申请

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    /// 完整培训
    FullTraining,
    /// 只开通远程学习系统（СДО）账号
    SdoAccessOnly,
}

impl RequestType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::FullTraining => "Полное обучение",
            Self::SdoAccessOnly => "Только доступ к СДО",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    New,
    InReview,
    Approved,
    Rejected,
    Completed,
}

impl RequestStatus {
    /// 还在等待培训中心决定
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::New | Self::InReview)
    }
}

/// 申请中的学员
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestStudent {
    pub personnel_id: String,
    pub full_name: String,
    pub position: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRequest {
    pub id: String,
    /// 接收申请的培训中心租户
    pub tenant_id: String,
    /// 发出申请的租户
    pub from_tenant_id: String,
    pub from_tenant_name: String,
    pub program_name: String,
    pub request_type: RequestType,
    pub students: Vec<RequestStudent>,
    pub contact_person: String,
    pub contact_email: Option<String>,
    pub status: RequestStatus,
    pub notes: Option<String>,
    /// 培训中心的审核意见（拒绝原因等）
    pub review_notes: Option<String>,
    pub order_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrainingRequest {
    pub tenant_id: String,
    pub from_tenant_id: String,
    pub from_tenant_name: String,
    pub program_name: String,
    pub request_type: RequestType,
    #[serde(default)]
    pub students: Vec<RequestStudent>,
    pub contact_person: String,
    pub contact_email: Option<String>,
    pub notes: Option<String>,
    pub order_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingRequestPatch {
    pub program_name: Option<String>,
    pub request_type: Option<RequestType>,
    pub students: Option<Vec<RequestStudent>>,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub notes: Option<String>,
}

impl Record for TrainingRequest {
    type Draft = NewTrainingRequest;
    type Patch = TrainingRequestPatch;
    const ID_PREFIX: &'static str = "request";

    fn id(&self) -> &str {
        &self.id
    }

    fn tenant_id(&self) -> Option<&str> {
        Some(&self.tenant_id)
    }

    fn from_draft(id: String, draft: NewTrainingRequest, now: DateTime<Utc>) -> Self {
        Self {
            id,
            tenant_id: draft.tenant_id,
            from_tenant_id: draft.from_tenant_id,
            from_tenant_name: draft.from_tenant_name,
            program_name: draft.program_name,
            request_type: draft.request_type,
            students: draft.students,
            contact_person: draft.contact_person,
            contact_email: draft.contact_email,
            status: RequestStatus::New,
            notes: draft.notes,
            review_notes: None,
            order_id: draft.order_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: TrainingRequestPatch) {
        merge_fields!(self, patch;
            set: program_name, request_type, students, contact_person;
            opt: contact_email, notes);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
