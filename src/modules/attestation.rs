// 人员资格认证管理

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::NaiveDate;
use tracing::info;

use crate::analysis::stats::{certification_stats, CertificationStats};
use crate::models::certification::{
    CertificationPatch, CertificationValidity, NewCertification,
};
use crate::models::Certification;
use crate::storage::RecordStore;
use crate::utils::export::ExportColumn;

/// 认证台账导出列
pub fn export_columns() -> Vec<ExportColumn<Certification>> {
    vec![
        ExportColumn::new("ФИО", |c| c.person_name.clone()),
        ExportColumn::new("Категория", |c| c.category.label().to_string()),
        ExportColumn::new("Область", |c| c.area.clone()),
        ExportColumn::new("Протокол", |c| c.protocol_number.clone()),
        ExportColumn::new("Дата протокола", |c| c.protocol_date.to_string()),
        ExportColumn::new("Действует до", |c| c.expiry_date.to_string()),
    ]
}

pub struct AttestationManager {
    store: RecordStore<Certification>,
    /// 到期预警窗口（天），可在运行时修改
    warning_days: AtomicI64,
}

impl AttestationManager {
    pub fn new(store: RecordStore<Certification>, warning_days: i64) -> Self {
        Self {
            store,
            warning_days: AtomicI64::new(warning_days),
        }
    }

    pub fn store(&self) -> &RecordStore<Certification> {
        &self.store
    }

    pub fn warning_days(&self) -> i64 {
        self.warning_days.load(Ordering::Relaxed)
    }

    pub fn set_warning_days(&self, days: i64) {
        self.warning_days.store(days, Ordering::Relaxed);
    }

    pub async fn add(&self, draft: NewCertification) -> Certification {
        self.store.add(draft).await
    }

    pub async fn update(&self, id: &str, patch: CertificationPatch) -> Option<Certification> {
        self.store.update(id, patch).await
    }

    pub async fn delete(&self, id: &str) -> bool {
        self.store.delete(id).await
    }

    pub async fn get(&self, id: &str) -> Option<Certification> {
        self.store.get(id).await
    }

    pub async fn all(&self) -> Vec<Certification> {
        self.store.all().await
    }

    pub async fn by_personnel(&self, personnel_id: &str) -> Vec<Certification> {
        self.store.filter(|c| c.personnel_id == personnel_id).await
    }

    pub async fn by_tenant(&self, tenant_id: &str) -> Vec<Certification> {
        self.store.by_tenant(tenant_id).await
    }

    /// 批量导入，追加到末尾
    pub async fn import(&self, drafts: Vec<NewCertification>) -> Vec<Certification> {
        let imported = self.store.add_many(drafts).await;
        info!("导入认证记录 {} 条", imported.len());
        imported
    }

    /// 某日期下具有给定有效性的认证
    pub async fn by_validity(
        &self,
        tenant_id: &str,
        validity: CertificationValidity,
        today: NaiveDate,
    ) -> Vec<Certification> {
        let warning_days = self.warning_days();
        self.store
            .filter(|c| c.tenant_id == tenant_id && c.validity(today, warning_days) == validity)
            .await
    }

    pub async fn stats(&self, tenant_id: Option<&str>, today: NaiveDate) -> CertificationStats {
        let certifications = match tenant_id {
            Some(tenant_id) => self.store.by_tenant(tenant_id).await,
            None => self.store.all().await,
        };
        certification_stats(&certifications, today, self.warning_days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::certification::{
        AttestationResult, AttestationType, CertificationCategory,
    };

    fn draft(personnel_id: &str, expiry: NaiveDate) -> NewCertification {
        NewCertification {
            tenant_id: "tenant-1".to_string(),
            personnel_id: personnel_id.to_string(),
            person_name: "Иванов И.И.".to_string(),
            category: CertificationCategory::IndustrialSafety,
            area: "Б.7.1".to_string(),
            protocol_number: "ПБ-001".to_string(),
            protocol_date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            expiry_date: expiry,
            attestation_type: AttestationType::Rostechnadzor,
            result: AttestationResult::Passed,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_import_and_validity() {
        let manager =
            AttestationManager::new(RecordStore::in_memory("attestation-storage", Vec::new()), 30);
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        let imported = manager
            .import(vec![
                draft("personnel-1", NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()),
                draft("personnel-1", NaiveDate::from_ymd_opt(2025, 6, 20).unwrap()),
                draft("personnel-2", NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()),
            ])
            .await;
        assert_eq!(imported.len(), 3);
        assert_eq!(manager.by_personnel("personnel-1").await.len(), 2);

        let stats = manager.stats(Some("tenant-1"), today).await;
        assert_eq!(stats.valid, 1);
        assert_eq!(stats.expiring, 1);
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.personnel, 2);

        let expired = manager
            .by_validity("tenant-1", CertificationValidity::Expired, today)
            .await;
        assert_eq!(expired[0].personnel_id, "personnel-2");

        // 缩短预警窗口后，19 天后到期的认证不再算作即将到期
        manager.set_warning_days(10);
        let stats = manager.stats(None, today).await;
        assert_eq!(stats.valid, 2);
        assert_eq!(stats.expiring, 0);
    }

    #[tokio::test]
    async fn test_import_empty_is_noop() {
        let manager =
            AttestationManager::new(RecordStore::in_memory("attestation-storage", Vec::new()), 30);
        assert!(manager.import(Vec::new()).await.is_empty());
        assert!(manager.all().await.is_empty());
    }
}
