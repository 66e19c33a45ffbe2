// 人员相关的内部命令（приказ）

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::status::DocumentStatus;
use crate::storage::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Attestation,
    Training,
    Suspension,
    Lms,
    Internal,
}

impl OrderType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Attestation => "Аттестация",
            Self::Training => "Обучение",
            Self::Suspension => "Отстранение",
            Self::Lms => "СДО",
            Self::Internal => "Внутренний",
        }
    }
}

/// 命令涉及的人员证书
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCertification {
    pub personnel_id: String,
    pub certification_id: String,
    pub category: String,
    pub area: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub tenant_id: String,
    /// 命令编号，例如 `№12-ПБ`
    pub number: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub title: String,
    pub employee_ids: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<OrderCertification>,
    pub status: DocumentStatus,
    pub created_by: String,
    pub description: Option<String>,
    pub document_url: Option<String>,
    #[serde(default)]
    pub sent_to_training_center: bool,
    pub training_center_request_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub tenant_id: String,
    pub number: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub title: String,
    #[serde(default)]
    pub employee_ids: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<OrderCertification>,
    #[serde(default)]
    pub status: DocumentStatus,
    pub created_by: String,
    pub description: Option<String>,
    pub document_url: Option<String>,
}

/// 命令的部分更新
///
/// 状态不在此列：状态变更必须经过转换表（见 `OrdersManager::transition`）。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderPatch {
    pub number: Option<String>,
    pub date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub order_type: Option<OrderType>,
    pub title: Option<String>,
    pub employee_ids: Option<Vec<String>>,
    pub certifications: Option<Vec<OrderCertification>>,
    pub created_by: Option<String>,
    pub description: Option<String>,
    pub document_url: Option<String>,
}

impl Record for Order {
    type Draft = NewOrder;
    type Patch = OrderPatch;
    const ID_PREFIX: &'static str = "order";

    fn id(&self) -> &str {
        &self.id
    }

    fn tenant_id(&self) -> Option<&str> {
        Some(&self.tenant_id)
    }

    fn from_draft(id: String, draft: NewOrder, now: DateTime<Utc>) -> Self {
        Self {
            id,
            tenant_id: draft.tenant_id,
            number: draft.number,
            date: draft.date,
            order_type: draft.order_type,
            title: draft.title,
            employee_ids: draft.employee_ids,
            certifications: draft.certifications,
            status: draft.status,
            created_by: draft.created_by,
            description: draft.description,
            document_url: draft.document_url,
            sent_to_training_center: false,
            training_center_request_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: OrderPatch) {
        merge_fields!(self, patch;
            set: number, date, order_type, title, employee_ids, certifications, created_by;
            opt: description, document_url);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
