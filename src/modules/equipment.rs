// 设备目录管理

use chrono::NaiveDate;
use tracing::info;

use crate::models::equipment::{EquipmentPatch, EquipmentStatus, NewEquipment};
use crate::models::Equipment;
use crate::storage::RecordStore;
use crate::utils::export::ExportColumn;

fn date(value: Option<NaiveDate>) -> String {
    value.map(|d| d.to_string()).unwrap_or_default()
}

pub fn export_columns() -> Vec<ExportColumn<Equipment>> {
    vec![
        ExportColumn::new("Наименование", |e| e.name.clone()),
        ExportColumn::new("Тип", |e| e.equipment_type.clone()),
        ExportColumn::new("Заводской номер", |e| e.serial_number.clone().unwrap_or_default()),
        ExportColumn::new("Состояние", |e| e.status.label().to_string()),
        ExportColumn::new("Следующее ТО", |e| date(e.next_maintenance_date)),
        ExportColumn::new("Следующее освидетельствование", |e| date(e.next_examination_date)),
    ]
}

pub struct EquipmentManager {
    store: RecordStore<Equipment>,
}

impl EquipmentManager {
    pub fn new(store: RecordStore<Equipment>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore<Equipment> {
        &self.store
    }

    pub async fn add(&self, draft: NewEquipment) -> Equipment {
        self.store.add(draft).await
    }

    pub async fn update(&self, id: &str, patch: EquipmentPatch) -> Option<Equipment> {
        self.store.update(id, patch).await
    }

    pub async fn delete(&self, id: &str) -> bool {
        self.store.delete(id).await
    }

    pub async fn get(&self, id: &str) -> Option<Equipment> {
        self.store.get(id).await
    }

    pub async fn all(&self) -> Vec<Equipment> {
        self.store.all().await
    }

    pub async fn by_tenant(&self, tenant_id: &str) -> Vec<Equipment> {
        self.store.by_tenant(tenant_id).await
    }

    pub async fn by_status(&self, status: EquipmentStatus) -> Vec<Equipment> {
        self.store.filter(|e| e.status == status).await
    }

    pub async fn by_organization(&self, organization_id: &str) -> Vec<Equipment> {
        self.store
            .filter(|e| e.organization_id == organization_id)
            .await
    }

    /// 本租户中下次维护日期已到的设备
    pub async fn needing_maintenance(&self, tenant_id: &str, today: NaiveDate) -> Vec<Equipment> {
        self.store
            .filter(|e| e.tenant_id == tenant_id && e.needs_maintenance(today))
            .await
    }

    /// 维护完成后记录下次维护日期
    pub async fn schedule_maintenance(&self, id: &str, next: NaiveDate) -> Option<Equipment> {
        let updated = self
            .store
            .update_with(id, |e| e.next_maintenance_date = Some(next))
            .await;
        if updated.is_some() {
            info!("设备 {} 下次维护日期: {}", id, next);
        }
        updated
    }

    /// 检验完成后记录下次检验日期
    pub async fn schedule_examination(&self, id: &str, next: NaiveDate) -> Option<Equipment> {
        let updated = self
            .store
            .update_with(id, |e| e.next_examination_date = Some(next))
            .await;
        if updated.is_some() {
            info!("设备 {} 下次检验日期: {}", id, next);
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn draft(name: &str, next_maintenance: Option<NaiveDate>) -> NewEquipment {
        NewEquipment {
            tenant_id: "tenant-1".to_string(),
            organization_id: "org-1".to_string(),
            name: name.to_string(),
            equipment_type: "Насосное оборудование".to_string(),
            manufacturer: Some("Grundfos".to_string()),
            serial_number: None,
            commission_date: None,
            status: EquipmentStatus::Operational,
            next_maintenance_date: next_maintenance,
            next_examination_date: None,
        }
    }

    fn manager() -> EquipmentManager {
        EquipmentManager::new(RecordStore::in_memory("equipment-storage", Vec::new()))
    }

    #[tokio::test]
    async fn test_needing_maintenance() {
        let manager = manager();
        let due = manager.add(draft("Насос Н-12", Some(date(10)))).await;
        manager.add(draft("Насос Н-14", Some(date(20)))).await;
        manager.add(draft("Насос Н-16", None)).await;
        let retired = manager.add(draft("Насос Н-1", Some(date(1)))).await;
        manager
            .update(
                &retired.id,
                EquipmentPatch {
                    status: Some(EquipmentStatus::Decommissioned),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let today = date(10);
        let needing = manager.needing_maintenance("tenant-1", today).await;
        assert_eq!(needing.len(), 1);
        assert_eq!(needing[0].id, due.id);
        assert!(manager.needing_maintenance("tenant-2", today).await.is_empty());

        let rescheduled = manager.schedule_maintenance(&due.id, date(30)).await.unwrap();
        assert_eq!(rescheduled.next_maintenance_date, Some(date(30)));
        assert!(manager.needing_maintenance("tenant-1", today).await.is_empty());
        assert!(manager.schedule_maintenance("eq-missing", date(30)).await.is_none());
    }

    #[tokio::test]
    async fn test_queries() {
        let manager = manager();
        let pump = manager.add(draft("Насос Н-12", None)).await;
        manager
            .update(
                &pump.id,
                EquipmentPatch {
                    status: Some(EquipmentStatus::Repair),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        manager.add(draft("Насос Н-14", None)).await;

        assert_eq!(manager.by_status(EquipmentStatus::Repair).await.len(), 1);
        assert_eq!(manager.by_organization("org-1").await.len(), 2);
        assert_eq!(manager.by_tenant("tenant-1").await.len(), 2);

        let examined = manager.schedule_examination(&pump.id, date(28)).await.unwrap();
        assert_eq!(examined.next_examination_date, Some(date(28)));
    }
}
