// 租户管理

use chrono::{DateTime, Utc};
use tracing::info;

use crate::analysis::stats::{tenant_stats, TenantStats};
use crate::errors::{PortalError, PortalResult};
use crate::models::tenant::{NewTenant, TenantPatch, TenantStatus};
use crate::models::{ModuleType, Tenant};
use crate::storage::RecordStore;
use crate::utils::validation::{validate_email, validate_inn, validate_required};

pub struct TenantsManager {
    store: RecordStore<Tenant>,
}

impl TenantsManager {
    pub fn new(store: RecordStore<Tenant>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore<Tenant> {
        &self.store
    }

    pub async fn add(&self, draft: NewTenant) -> PortalResult<Tenant> {
        validate_required("name", &draft.name).map_err(PortalError::Validation)?;
        validate_inn(&draft.inn).map_err(PortalError::Validation)?;
        validate_email(&draft.admin_email).map_err(PortalError::Validation)?;

        let tenant = self.store.add(draft).await;
        info!("新增租户: {} ({})", tenant.name, tenant.id);
        Ok(tenant)
    }

    /// 更新租户；标识不存在时返回 Ok(None)
    pub async fn update(&self, id: &str, patch: TenantPatch) -> PortalResult<Option<Tenant>> {
        if let Some(inn) = &patch.inn {
            validate_inn(inn).map_err(PortalError::Validation)?;
        }
        if let Some(email) = &patch.admin_email {
            validate_email(email).map_err(PortalError::Validation)?;
        }
        Ok(self.store.update(id, patch).await)
    }

    pub async fn delete(&self, id: &str) -> bool {
        self.store.delete(id).await
    }

    pub async fn get(&self, id: &str) -> Option<Tenant> {
        self.store.get(id).await
    }

    pub async fn all(&self) -> Vec<Tenant> {
        self.store.all().await
    }

    pub async fn active(&self) -> Vec<Tenant> {
        self.by_status(TenantStatus::Active).await
    }

    pub async fn by_status(&self, status: TenantStatus) -> Vec<Tenant> {
        self.store.filter(|t| t.status == status).await
    }

    pub async fn set_modules(&self, id: &str, modules: Vec<ModuleType>) -> Option<Tenant> {
        self.store
            .update_with(id, |tenant| tenant.modules = modules)
            .await
    }

    pub async fn deactivate(&self, id: &str) -> Option<Tenant> {
        let tenant = self
            .store
            .update_with(id, |tenant| tenant.status = TenantStatus::Inactive)
            .await;
        if tenant.is_some() {
            info!("租户已停用: {}", id);
        }
        tenant
    }

    /// 订阅已到期的租户
    pub async fn expired(&self, now: DateTime<Utc>) -> Vec<Tenant> {
        self.store.filter(|t| t.is_expired(now)).await
    }

    pub async fn stats(&self, now: DateTime<Utc>) -> TenantStats {
        tenant_stats(&self.store.all().await, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn draft(inn: &str, email: &str) -> NewTenant {
        NewTenant {
            name: "ООО «Нефтехим»".to_string(),
            inn: inn.to_string(),
            admin_email: email.to_string(),
            admin_name: "Петров П.П.".to_string(),
            status: TenantStatus::Active,
            modules: vec![ModuleType::Tasks],
            expires_at: Utc::now() + Duration::days(365),
        }
    }

    fn manager() -> TenantsManager {
        TenantsManager::new(RecordStore::in_memory("tenants-storage", Vec::new()))
    }

    #[tokio::test]
    async fn test_add_validates_inn_and_email() {
        let manager = manager();
        assert!(matches!(
            manager.add(draft("123", "admin@company.ru")).await,
            Err(PortalError::Validation(_))
        ));
        assert!(matches!(
            manager.add(draft("7707083893", "not-an-email")).await,
            Err(PortalError::Validation(_))
        ));
        assert!(manager.all().await.is_empty());

        let tenant = manager
            .add(draft("7707083893", "admin@company.ru"))
            .await
            .unwrap();
        assert!(tenant.id.starts_with("tenant-"));
    }

    #[tokio::test]
    async fn test_deactivate_and_stats() {
        let manager = manager();
        let a = manager
            .add(draft("7707083893", "a@company.ru"))
            .await
            .unwrap();
        manager
            .add(draft("500100732259", "b@company.ru"))
            .await
            .unwrap();

        manager.deactivate(&a.id).await.unwrap();
        assert!(manager.deactivate("tenant-missing").await.is_none());

        let stats = manager.stats(Utc::now()).await;
        assert_eq!(stats.total, 2);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.inactive, 1);
        assert_eq!(stats.expired, 0);

        let later = Utc::now() + Duration::days(400);
        assert_eq!(manager.expired(later).await.len(), 2);
    }

    #[tokio::test]
    async fn test_set_modules() {
        let manager = manager();
        let tenant = manager
            .add(draft("7707083893", "a@company.ru"))
            .await
            .unwrap();
        let updated = manager
            .set_modules(&tenant.id, vec![ModuleType::Budget, ModuleType::Incidents])
            .await
            .unwrap();
        assert!(updated.has_module(ModuleType::Budget));
        assert!(!updated.has_module(ModuleType::Tasks));
    }
}
