// 设备目录（维护工作与技术检验的对象）

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentStatus {
    #[default]
    Operational,
    Maintenance,
    Repair,
    Decommissioned,
}

impl EquipmentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Operational => "В работе",
            Self::Maintenance => "На обслуживании",
            Self::Repair => "В ремонте",
            Self::Decommissioned => "Выведено из эксплуатации",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: String,
    pub tenant_id: String,
    pub organization_id: String,
    pub name: String,
    /// 设备类别，例如 `Насосное оборудование`
    #[serde(rename = "type")]
    pub equipment_type: String,
    pub manufacturer: Option<String>,
    pub serial_number: Option<String>,
    pub commission_date: Option<NaiveDate>,
    pub status: EquipmentStatus,
    pub next_maintenance_date: Option<NaiveDate>,
    pub next_examination_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Equipment {
    /// 下次维护日期已到且设备仍在使用
    pub fn needs_maintenance(&self, today: NaiveDate) -> bool {
        self.status != EquipmentStatus::Decommissioned
            && self.next_maintenance_date.is_some_and(|d| d <= today)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEquipment {
    pub tenant_id: String,
    pub organization_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub equipment_type: String,
    pub manufacturer: Option<String>,
    pub serial_number: Option<String>,
    pub commission_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: EquipmentStatus,
    pub next_maintenance_date: Option<NaiveDate>,
    pub next_examination_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquipmentPatch {
    pub organization_id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub equipment_type: Option<String>,
    pub manufacturer: Option<String>,
    pub serial_number: Option<String>,
    pub commission_date: Option<NaiveDate>,
    pub status: Option<EquipmentStatus>,
    pub next_maintenance_date: Option<NaiveDate>,
    pub next_examination_date: Option<NaiveDate>,
}

impl Record for Equipment {
    type Draft = NewEquipment;
    type Patch = EquipmentPatch;
    const ID_PREFIX: &'static str = "eq";

    fn id(&self) -> &str {
        &self.id
    }

    fn tenant_id(&self) -> Option<&str> {
        Some(&self.tenant_id)
    }

    fn from_draft(id: String, draft: NewEquipment, now: DateTime<Utc>) -> Self {
        Self {
            id,
            tenant_id: draft.tenant_id,
            organization_id: draft.organization_id,
            name: draft.name,
            equipment_type: draft.equipment_type,
            manufacturer: draft.manufacturer,
            serial_number: draft.serial_number,
            commission_date: draft.commission_date,
            status: draft.status,
            next_maintenance_date: draft.next_maintenance_date,
            next_examination_date: draft.next_examination_date,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: EquipmentPatch) {
        merge_fields!(self, patch;
            set: organization_id, name, equipment_type, status;
            opt: manufacturer, serial_number, commission_date, next_maintenance_date,
                 next_examination_date);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
