// 设备维护工作管理

use chrono::NaiveDate;
use tracing::info;

use crate::analysis::stats::{maintenance_stats, MaintenanceStats};
use crate::models::maintenance::{
    MaintenanceStatus, MaintenanceType, MaintenanceWorkPatch, NewMaintenanceWork,
};
use crate::models::MaintenanceWork;
use crate::storage::RecordStore;
use crate::utils::export::ExportColumn;

pub fn export_columns() -> Vec<ExportColumn<MaintenanceWork>> {
    vec![
        ExportColumn::new("Объект", |w| w.object_name.clone()),
        ExportColumn::new("Вид работ", |w| w.work_type.label().to_string()),
        ExportColumn::new("Наименование", |w| w.title.clone()),
        ExportColumn::new("Плановая дата", |w| w.scheduled_date.to_string()),
        ExportColumn::new("Дата выполнения", |w| {
            w.completed_date.map(|d| d.to_string()).unwrap_or_default()
        }),
        ExportColumn::new("Исполнитель", |w| w.executor.clone()),
    ]
}

pub struct MaintenanceManager {
    store: RecordStore<MaintenanceWork>,
}

impl MaintenanceManager {
    pub fn new(store: RecordStore<MaintenanceWork>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore<MaintenanceWork> {
        &self.store
    }

    pub async fn add(&self, draft: NewMaintenanceWork) -> MaintenanceWork {
        self.store.add(draft).await
    }

    pub async fn update(&self, id: &str, patch: MaintenanceWorkPatch) -> Option<MaintenanceWork> {
        self.store.update(id, patch).await
    }

    pub async fn delete(&self, id: &str) -> bool {
        self.store.delete(id).await
    }

    pub async fn get(&self, id: &str) -> Option<MaintenanceWork> {
        self.store.get(id).await
    }

    pub async fn all(&self) -> Vec<MaintenanceWork> {
        self.store.all().await
    }

    pub async fn by_tenant(&self, tenant_id: &str) -> Vec<MaintenanceWork> {
        self.store.by_tenant(tenant_id).await
    }

    pub async fn complete(&self, id: &str, completed_date: NaiveDate) -> Option<MaintenanceWork> {
        self.store
            .update_with(id, |work| {
                work.status = MaintenanceStatus::Completed;
                work.completed_date = Some(completed_date);
            })
            .await
    }

    pub async fn by_status(&self, status: MaintenanceStatus) -> Vec<MaintenanceWork> {
        self.store.filter(|w| w.status == status).await
    }

    pub async fn by_type(&self, work_type: MaintenanceType) -> Vec<MaintenanceWork> {
        self.store.filter(|w| w.work_type == work_type).await
    }

    pub async fn by_object(&self, object_id: &str) -> Vec<MaintenanceWork> {
        self.store.filter(|w| w.object_id == object_id).await
    }

    /// 把计划日期已过的未完成工作标记为逾期，返回标记条数
    pub async fn mark_overdue(&self, today: NaiveDate) -> usize {
        let marked = self
            .store
            .update_where(|work| {
                let late = matches!(
                    work.status,
                    MaintenanceStatus::Planned | MaintenanceStatus::InProgress
                ) && work.scheduled_date <= today;
                if late {
                    work.status = MaintenanceStatus::Overdue;
                }
                late
            })
            .await;
        if marked > 0 {
            info!("标记逾期维护工作 {} 条", marked);
        }
        marked
    }

    pub async fn statistics(&self, tenant_id: Option<&str>, today: NaiveDate) -> MaintenanceStats {
        let works = match tenant_id {
            Some(tenant_id) => self.store.by_tenant(tenant_id).await,
            None => self.store.all().await,
        };
        maintenance_stats(&works, today)
    }
}
