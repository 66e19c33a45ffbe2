// 命令（приказы）管理 - 状态变更受转换表约束

use tracing::{info, warn};

use crate::analysis::stats::{order_stats, OrderStats};
use crate::errors::{PortalError, PortalResult};
use crate::models::order::{NewOrder, OrderPatch, OrderType};
use crate::models::status::{can_transition_to, get_next_statuses};
use crate::models::training_request::NewTrainingRequest;
use crate::models::{DocumentStatus, Order};
use crate::modules::training_center::{TrainingCenterManager, TrainingReferral};
use crate::storage::RecordStore;
use crate::utils::export::ExportColumn;

/// 命令登记簿导出列
pub fn export_columns() -> Vec<ExportColumn<Order>> {
    vec![
        ExportColumn::new("Номер", |o| o.number.clone()),
        ExportColumn::new("Дата", |o| o.date.to_string()),
        ExportColumn::new("Тип", |o| o.order_type.label().to_string()),
        ExportColumn::new("Наименование", |o| o.title.clone()),
        ExportColumn::new("Статус", |o| o.status.label().to_string()),
        ExportColumn::new("Сотрудников", |o| o.employee_ids.len().to_string()),
    ]
}

pub struct OrdersManager {
    store: RecordStore<Order>,
}

impl OrdersManager {
    pub fn new(store: RecordStore<Order>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore<Order> {
        &self.store
    }

    pub async fn add(&self, draft: NewOrder) -> Order {
        self.store.add(draft).await
    }

    pub async fn update(&self, id: &str, patch: OrderPatch) -> Option<Order> {
        self.store.update(id, patch).await
    }

    pub async fn delete(&self, id: &str) -> bool {
        self.store.delete(id).await
    }

    pub async fn get(&self, id: &str) -> Option<Order> {
        self.store.get(id).await
    }

    pub async fn all(&self) -> Vec<Order> {
        self.store.all().await
    }

    /// 按转换表变更状态
    ///
    /// 标识不存在返回 Ok(None)；转换不允许时返回错误且不修改记录。
    pub async fn transition(&self, id: &str, to: DocumentStatus) -> PortalResult<Option<Order>> {
        let result = self
            .store
            .try_update_with(id, |order| {
                if !can_transition_to(order.status, to) {
                    return Err(PortalError::InvalidTransition {
                        from: order.status,
                        to,
                    });
                }
                order.status = to;
                Ok(())
            })
            .await;

        match &result {
            Ok(Some(_)) => info!("命令 {} 状态变更为 {}", id, to),
            Err(e) => warn!("命令 {} 状态转换被拒绝: {}", id, e),
            Ok(None) => {}
        }
        result
    }

    /// 当前状态可以转换到的状态
    pub async fn available_transitions(&self, id: &str) -> Option<Vec<DocumentStatus>> {
        self.store
            .get(id)
            .await
            .map(|order| get_next_statuses(order.status))
    }

    pub async fn by_tenant(&self, tenant_id: &str) -> Vec<Order> {
        self.store.by_tenant(tenant_id).await
    }

    pub async fn by_status(&self, status: DocumentStatus) -> Vec<Order> {
        self.store.filter(|o| o.status == status).await
    }

    pub async fn by_type(&self, order_type: OrderType) -> Vec<Order> {
        self.store.filter(|o| o.order_type == order_type).await
    }

    pub async fn by_employee(&self, personnel_id: &str) -> Vec<Order> {
        self.store
            .filter(|o| o.employee_ids.iter().any(|e| e == personnel_id))
            .await
    }

    /// 把命令发送到培训中心
    ///
    /// 在培训中心租户下创建培训申请（课程名取命令标题，备注取命令说明），
    /// 记录申请号并设置标记；当转换表允许时把状态推进到 `active`。
    /// 已有有效申请的命令原样返回，不重复创建。
    pub async fn send_to_training_center(
        &self,
        id: &str,
        requests: &TrainingCenterManager,
        referral: TrainingReferral,
    ) -> PortalResult<Option<Order>> {
        let Some(order) = self.store.get(id).await else {
            return Ok(None);
        };
        if let Some(request_id) = &order.training_center_request_id {
            if requests.get(request_id).await.is_some() {
                info!("命令 {} 已发送过，申请号: {}", id, request_id);
                return Ok(Some(order));
            }
        }
        if referral.students.is_empty() {
            return Err(PortalError::Validation(
                "в приказе нет сотрудников для обучения".to_string(),
            ));
        }

        let request = requests
            .add(NewTrainingRequest {
                tenant_id: referral.training_center_tenant_id,
                from_tenant_id: order.tenant_id.clone(),
                from_tenant_name: referral.from_tenant_name,
                program_name: order.title.clone(),
                request_type: referral.request_type,
                students: referral.students,
                contact_person: referral.contact_person,
                contact_email: referral.contact_email,
                notes: order.description.clone(),
                order_id: Some(order.id.clone()),
            })
            .await;

        let updated = self
            .store
            .update_with(id, |order| {
                order.training_center_request_id = Some(request.id.clone());
                order.sent_to_training_center = true;
                if can_transition_to(order.status, DocumentStatus::Active) {
                    order.status = DocumentStatus::Active;
                }
            })
            .await;

        if updated.is_some() {
            info!("命令 {} 已发送到培训中心，申请号: {}", id, request.id);
        }
        Ok(updated)
    }

    pub async fn stats(&self, tenant_id: Option<&str>) -> OrderStats {
        let orders = match tenant_id {
            Some(tenant_id) => self.store.by_tenant(tenant_id).await,
            None => self.store.all().await,
        };
        order_stats(&orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::training_request::{RequestStatus, RequestStudent, RequestType};
    use chrono::NaiveDate;

    fn draft(status: DocumentStatus) -> NewOrder {
        NewOrder {
            tenant_id: "tenant-1".to_string(),
            number: "№12-ПБ".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            order_type: OrderType::Attestation,
            title: "О направлении на аттестацию".to_string(),
            employee_ids: vec!["personnel-1".to_string(), "personnel-2".to_string()],
            certifications: Vec::new(),
            status,
            created_by: "Директор".to_string(),
            description: None,
            document_url: None,
        }
    }

    fn manager() -> OrdersManager {
        OrdersManager::new(RecordStore::in_memory("orders-storage", Vec::new()))
    }

    #[tokio::test]
    async fn test_transition_follows_table() {
        let manager = manager();
        let order = manager.add(draft(DocumentStatus::Draft)).await;

        let err = manager
            .transition(&order.id, DocumentStatus::Active)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            PortalError::InvalidTransition {
                from: DocumentStatus::Draft,
                to: DocumentStatus::Active
            }
        );
        assert_eq!(manager.get(&order.id).await.unwrap().status, DocumentStatus::Draft);

        for to in [
            DocumentStatus::Prepared,
            DocumentStatus::Approved,
            DocumentStatus::Active,
            DocumentStatus::Completed,
        ] {
            let updated = manager.transition(&order.id, to).await.unwrap().unwrap();
            assert_eq!(updated.status, to);
        }

        assert_eq!(manager.available_transitions(&order.id).await, Some(vec![]));
        assert!(manager
            .transition("order-missing", DocumentStatus::Prepared)
            .await
            .unwrap()
            .is_none());
    }

    fn referral(students: &[&str]) -> TrainingReferral {
        TrainingReferral {
            training_center_tenant_id: "tenant-3".to_string(),
            request_type: RequestType::FullTraining,
            from_tenant_name: "ООО \"ЭнергоПром\"".to_string(),
            contact_person: "Администратор".to_string(),
            contact_email: Some("admin@company.ru".to_string()),
            students: students
                .iter()
                .map(|id| RequestStudent {
                    personnel_id: id.to_string(),
                    full_name: "Неизвестно".to_string(),
                    position: None,
                })
                .collect(),
        }
    }

    fn requests() -> TrainingCenterManager {
        TrainingCenterManager::new(RecordStore::in_memory(
            "training-center-requests-storage",
            Vec::new(),
        ))
    }

    #[tokio::test]
    async fn test_send_to_training_center() {
        let manager = manager();
        let requests = requests();
        let mut approved = draft(DocumentStatus::Approved);
        approved.description = Some("Группа на март".to_string());
        let approved = manager.add(approved).await;

        let sent = manager
            .send_to_training_center(&approved.id, &requests, referral(&["personnel-1", "personnel-2"]))
            .await
            .unwrap()
            .unwrap();
        assert!(sent.sent_to_training_center);
        assert_eq!(sent.status, DocumentStatus::Active);

        // 申请号指向真实的申请记录
        let request_id = sent.training_center_request_id.clone().unwrap();
        let request = requests.get(&request_id).await.unwrap();
        assert_eq!(request.tenant_id, "tenant-3");
        assert_eq!(request.from_tenant_id, "tenant-1");
        assert_eq!(request.program_name, approved.title);
        assert_eq!(request.notes.as_deref(), Some("Группа на март"));
        assert_eq!(request.order_id.as_deref(), Some(approved.id.as_str()));
        assert_eq!(request.status, RequestStatus::New);
        assert_eq!(request.students.len(), 2);

        let again = manager
            .send_to_training_center(&approved.id, &requests, referral(&["personnel-1"]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(again.training_center_request_id, Some(request_id));
        assert_eq!(requests.outgoing("tenant-1").await.len(), 1);

        let draft_order = manager.add(draft(DocumentStatus::Draft)).await;
        let sent = manager
            .send_to_training_center(&draft_order.id, &requests, referral(&["personnel-1"]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sent.status, DocumentStatus::Draft);
        assert_eq!(requests.outgoing("tenant-1").await.len(), 2);

        assert!(manager
            .send_to_training_center("order-missing", &requests, referral(&["personnel-1"]))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_send_without_students_is_rejected() {
        let manager = manager();
        let requests = requests();
        let order = manager.add(draft(DocumentStatus::Approved)).await;

        let result = manager
            .send_to_training_center(&order.id, &requests, referral(&[]))
            .await;
        assert!(matches!(result, Err(PortalError::Validation(_))));
        assert!(requests.store().is_empty().await);
        assert!(!manager.get(&order.id).await.unwrap().sent_to_training_center);
    }

    #[tokio::test]
    async fn test_queries() {
        let manager = manager();
        manager.add(draft(DocumentStatus::Draft)).await;
        let mut other = draft(DocumentStatus::Approved);
        other.order_type = OrderType::Training;
        other.employee_ids = vec!["personnel-3".to_string()];
        manager.add(other).await;

        assert_eq!(manager.by_employee("personnel-1").await.len(), 1);
        assert_eq!(manager.by_type(OrderType::Training).await.len(), 1);
        assert_eq!(manager.by_status(DocumentStatus::Approved).await.len(), 1);

        let stats = manager.stats(Some("tenant-1")).await;
        assert_eq!(stats.total, 2);
        assert!(stats
            .by_status
            .contains(&(DocumentStatus::Draft, 1)));
    }
}
