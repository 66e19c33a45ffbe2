// 人员资格认证（аттестация）协议

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificationCategory {
    IndustrialSafety,
    EnergySafety,
    LaborSafety,
    Ecology,
}

impl CertificationCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::IndustrialSafety => "Промышленная безопасность",
            Self::EnergySafety => "Энергобезопасность",
            Self::LaborSafety => "Охрана труда",
            Self::Ecology => "Экология",
        }
    }
}

/// 认证机构
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttestationType {
    Rostechnadzor,
    CompanyCommission,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttestationResult {
    Passed,
    Failed,
}

/// 有效性（相对于某个日期计算，不持久化）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificationValidity {
    Valid,
    Expiring,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub id: String,
    pub tenant_id: String,
    pub personnel_id: String,
    pub person_name: String,
    pub category: CertificationCategory,
    /// 认证领域代码，例如 "А.1"、"Б.7.1"
    pub area: String,
    pub protocol_number: String,
    pub protocol_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub attestation_type: AttestationType,
    pub result: AttestationResult,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Certification {
    pub fn days_until_expiry(&self, today: NaiveDate) -> i64 {
        (self.expiry_date - today).num_days()
    }

    pub fn validity(&self, today: NaiveDate, warning_days: i64) -> CertificationValidity {
        let days_left = self.days_until_expiry(today);
        if days_left < 0 {
            CertificationValidity::Expired
        } else if days_left <= warning_days {
            CertificationValidity::Expiring
        } else {
            CertificationValidity::Valid
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCertification {
    pub tenant_id: String,
    pub personnel_id: String,
    pub person_name: String,
    pub category: CertificationCategory,
    pub area: String,
    pub protocol_number: String,
    pub protocol_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub attestation_type: AttestationType,
    pub result: AttestationResult,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CertificationPatch {
    pub person_name: Option<String>,
    pub category: Option<CertificationCategory>,
    pub area: Option<String>,
    pub protocol_number: Option<String>,
    pub protocol_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub attestation_type: Option<AttestationType>,
    pub result: Option<AttestationResult>,
    pub notes: Option<String>,
}

impl Record for Certification {
    type Draft = NewCertification;
    type Patch = CertificationPatch;
    const ID_PREFIX: &'static str = "att";

    fn id(&self) -> &str {
        &self.id
    }

    fn tenant_id(&self) -> Option<&str> {
        Some(&self.tenant_id)
    }

    fn from_draft(id: String, draft: NewCertification, now: DateTime<Utc>) -> Self {
        Self {
            id,
            tenant_id: draft.tenant_id,
            personnel_id: draft.personnel_id,
            person_name: draft.person_name,
            category: draft.category,
            area: draft.area,
            protocol_number: draft.protocol_number,
            protocol_date: draft.protocol_date,
            expiry_date: draft.expiry_date,
            attestation_type: draft.attestation_type,
            result: draft.result,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: CertificationPatch) {
        merge_fields!(self, patch;
            set: person_name, category, area, protocol_number, protocol_date, expiry_date,
                attestation_type, result;
            opt: notes);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_window() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let draft = NewCertification {
            tenant_id: "tenant-1".to_string(),
            personnel_id: "personnel-1".to_string(),
            person_name: "Иванов И.И.".to_string(),
            category: CertificationCategory::IndustrialSafety,
            area: "А.1".to_string(),
            protocol_number: "П-1".to_string(),
            protocol_date: NaiveDate::from_ymd_opt(2020, 6, 1).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            attestation_type: AttestationType::Rostechnadzor,
            result: AttestationResult::Passed,
            notes: None,
        };
        let mut cert = Certification::from_draft("att-1".to_string(), draft, Utc::now());

        assert_eq!(cert.validity(today, 30), CertificationValidity::Expiring);
        assert_eq!(cert.validity(today, 7), CertificationValidity::Valid);

        cert.expiry_date = today;
        assert_eq!(cert.validity(today, 0), CertificationValidity::Expiring);

        cert.expiry_date = NaiveDate::from_ymd_opt(2025, 5, 31).unwrap();
        assert_eq!(cert.validity(today, 30), CertificationValidity::Expired);
    }
}
