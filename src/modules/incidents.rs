// 事故管理

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::stats::{incident_stats, is_incident_overdue, IncidentStats};
use crate::models::incident::{IncidentPatch, IncidentStatus, IncidentType, NewIncident};
use crate::models::task::Priority;
use crate::models::Incident;
use crate::storage::RecordStore;

/// 事故过滤条件，`None` 表示不限
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncidentFilter {
    pub tenant_id: Option<String>,
    pub status: Option<IncidentStatus>,
    pub severity: Option<Priority>,
    #[serde(rename = "type")]
    pub incident_type: Option<IncidentType>,
    pub organization_id: Option<String>,
}

impl IncidentFilter {
    pub fn matches(&self, incident: &Incident) -> bool {
        self.tenant_id.as_ref().is_none_or(|t| *t == incident.tenant_id)
            && self.status.is_none_or(|s| s == incident.status)
            && self.severity.is_none_or(|s| s == incident.severity)
            && self.incident_type.is_none_or(|t| t == incident.incident_type)
            && self
                .organization_id
                .as_ref()
                .is_none_or(|o| *o == incident.organization_id)
    }
}

pub struct IncidentsManager {
    store: RecordStore<Incident>,
}

impl IncidentsManager {
    pub fn new(store: RecordStore<Incident>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore<Incident> {
        &self.store
    }

    /// 登记事故，登记时间由存储写入
    pub async fn add(&self, draft: NewIncident) -> Incident {
        let incident = self.store.add(draft).await;
        info!(
            "登记事故 {}: {} ({:?})",
            incident.id, incident.title, incident.severity
        );
        incident
    }

    pub async fn update(&self, id: &str, patch: IncidentPatch) -> Option<Incident> {
        self.store.update(id, patch).await
    }

    pub async fn delete(&self, id: &str) -> bool {
        self.store.delete(id).await
    }

    pub async fn get(&self, id: &str) -> Option<Incident> {
        self.store.get(id).await
    }

    pub async fn all(&self) -> Vec<Incident> {
        self.store.all().await
    }

    pub async fn by_tenant(&self, tenant_id: &str) -> Vec<Incident> {
        self.store.by_tenant(tenant_id).await
    }

    pub async fn start_investigation(&self, id: &str, assigned_to: &str) -> Option<Incident> {
        self.store
            .update_with(id, |incident| {
                incident.status = IncidentStatus::Investigating;
                incident.assigned_to = Some(assigned_to.to_string());
            })
            .await
    }

    pub async fn resolve(
        &self,
        id: &str,
        root_cause: &str,
        corrective_actions: &str,
    ) -> Option<Incident> {
        self.store
            .update_with(id, |incident| {
                incident.status = IncidentStatus::Resolved;
                incident.resolved_at = Some(Utc::now());
                incident.root_cause = Some(root_cause.to_string());
                incident.corrective_actions = Some(corrective_actions.to_string());
            })
            .await
    }

    pub async fn close(&self, id: &str) -> Option<Incident> {
        self.store
            .update_with(id, |incident| incident.status = IncidentStatus::Closed)
            .await
    }

    pub async fn filter(&self, filter: &IncidentFilter) -> Vec<Incident> {
        self.store.filter(|i| filter.matches(i)).await
    }

    /// 整改计划日期已过仍未解决的事故
    pub async fn overdue(&self, today: NaiveDate) -> Vec<Incident> {
        self.store.filter(|i| is_incident_overdue(i, today)).await
    }

    pub async fn stats(&self, tenant_id: Option<&str>, now: DateTime<Utc>) -> IncidentStats {
        let incidents = match tenant_id {
            Some(tenant_id) => self.store.by_tenant(tenant_id).await,
            None => self.store.all().await,
        };
        incident_stats(&incidents, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn draft(severity: Priority, planned: Option<NaiveDate>) -> NewIncident {
        NewIncident {
            tenant_id: "tenant-1".to_string(),
            organization_id: "org-1".to_string(),
            title: "Утечка масла из компрессора К-301".to_string(),
            description: "Обнаружена утечка гидравлического масла".to_string(),
            incident_type: IncidentType::EquipmentFailure,
            severity,
            status: IncidentStatus::Reported,
            reported_by: "Сидоров С.С.".to_string(),
            assigned_to: None,
            occurred_at: Utc::now() - Duration::hours(1),
            planned_date: planned,
        }
    }

    fn manager() -> IncidentsManager {
        IncidentsManager::new(RecordStore::in_memory("incidents-storage", Vec::new()))
    }

    #[tokio::test]
    async fn test_lifecycle() {
        let manager = manager();
        let incident = manager.add(draft(Priority::Critical, None)).await;
        assert_eq!(incident.reported_at, incident.created_at);

        let investigating = manager
            .start_investigation(&incident.id, "Иванов И.И.")
            .await
            .unwrap();
        assert_eq!(investigating.status, IncidentStatus::Investigating);
        assert_eq!(investigating.assigned_to.as_deref(), Some("Иванов И.И."));

        let resolved = manager
            .resolve(&incident.id, "Износ уплотнения", "Замена уплотнения")
            .await
            .unwrap();
        assert_eq!(resolved.status, IncidentStatus::Resolved);
        assert!(resolved.resolved_at.is_some());

        let stats = manager.stats(None, Utc::now()).await;
        assert_eq!(stats.critical, 1);
        assert_eq!(stats.resolved, 1);
        assert_eq!(stats.this_month, 1);

        manager.close(&incident.id).await.unwrap();
        let stats = manager.stats(Some("tenant-1"), Utc::now()).await;
        assert_eq!(stats.critical, 0);
        assert_eq!(stats.closed, 1);

        assert!(manager.close("incident-missing").await.is_none());
    }

    #[tokio::test]
    async fn test_overdue_and_filter() {
        let manager = manager();
        let today = Utc::now().date_naive();
        let late = manager
            .add(draft(Priority::High, Some(today - Duration::days(2))))
            .await;
        manager
            .add(draft(Priority::Low, Some(today + Duration::days(5))))
            .await;

        let overdue = manager.overdue(today).await;
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].id, late.id);

        manager.resolve(&late.id, "причина", "меры").await.unwrap();
        assert!(manager.overdue(today).await.is_empty());

        let filter = IncidentFilter {
            severity: Some(Priority::Low),
            organization_id: Some("org-1".to_string()),
            ..Default::default()
        };
        assert_eq!(manager.filter(&filter).await.len(), 1);
    }
}
