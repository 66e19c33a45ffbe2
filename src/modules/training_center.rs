// 培训中心申请管理
//
// 申请由客户租户发出，记录在培训中心租户下：new → in_review → approved/rejected → completed。

use tracing::{info, warn};

use crate::errors::{PortalError, PortalResult};
use crate::models::training_request::{
    NewTrainingRequest, RequestStatus, RequestStudent, RequestType, TrainingRequestPatch,
};
use crate::models::TrainingRequest;
use crate::storage::RecordStore;

/// 从命令生成申请时由调用方提供的信息
#[derive(Debug, Clone)]
pub struct TrainingReferral {
    pub training_center_tenant_id: String,
    pub request_type: RequestType,
    pub from_tenant_name: String,
    pub contact_person: String,
    pub contact_email: Option<String>,
    pub students: Vec<RequestStudent>,
}

pub struct TrainingCenterManager {
    store: RecordStore<TrainingRequest>,
}

impl TrainingCenterManager {
    pub fn new(store: RecordStore<TrainingRequest>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore<TrainingRequest> {
        &self.store
    }

    pub async fn add(&self, draft: NewTrainingRequest) -> TrainingRequest {
        let request = self.store.add(draft).await;
        info!(
            "培训申请 {} 已发往 {}（{} 名学员）",
            request.id,
            request.tenant_id,
            request.students.len()
        );
        request
    }

    pub async fn update(&self, id: &str, patch: TrainingRequestPatch) -> Option<TrainingRequest> {
        self.store.update(id, patch).await
    }

    pub async fn delete(&self, id: &str) -> bool {
        self.store.delete(id).await
    }

    pub async fn get(&self, id: &str) -> Option<TrainingRequest> {
        self.store.get(id).await
    }

    /// 培训中心收到的申请
    pub async fn incoming(&self, training_center_tenant_id: &str) -> Vec<TrainingRequest> {
        self.store.by_tenant(training_center_tenant_id).await
    }

    /// 客户租户发出的申请
    pub async fn outgoing(&self, from_tenant_id: &str) -> Vec<TrainingRequest> {
        self.store
            .filter(|r| r.from_tenant_id == from_tenant_id)
            .await
    }

    pub async fn by_order(&self, order_id: &str) -> Option<TrainingRequest> {
        self.store
            .filter(|r| r.order_id.as_deref() == Some(order_id))
            .await
            .into_iter()
            .next()
    }

    pub async fn by_status(&self, status: RequestStatus) -> Vec<TrainingRequest> {
        self.store.filter(|r| r.status == status).await
    }

    pub async fn start_review(&self, id: &str) -> PortalResult<Option<TrainingRequest>> {
        self.set_status(id, RequestStatus::InReview, None, |s| s == RequestStatus::New)
            .await
    }

    pub async fn approve(&self, id: &str) -> PortalResult<Option<TrainingRequest>> {
        self.set_status(id, RequestStatus::Approved, None, |s| s.is_pending())
            .await
    }

    /// 拒绝申请，原因写入审核意见
    pub async fn reject(&self, id: &str, reason: &str) -> PortalResult<Option<TrainingRequest>> {
        if reason.trim().is_empty() {
            return Err(PortalError::Validation(
                "укажите причину отклонения".to_string(),
            ));
        }
        self.set_status(id, RequestStatus::Rejected, Some(reason), |s| s.is_pending())
            .await
    }

    pub async fn complete(&self, id: &str) -> PortalResult<Option<TrainingRequest>> {
        self.set_status(id, RequestStatus::Completed, None, |s| {
            s == RequestStatus::Approved
        })
        .await
    }

    async fn set_status(
        &self,
        id: &str,
        to: RequestStatus,
        review_notes: Option<&str>,
        allowed: impl FnOnce(RequestStatus) -> bool,
    ) -> PortalResult<Option<TrainingRequest>> {
        let result = self
            .store
            .try_update_with(id, |request| {
                if !allowed(request.status) {
                    return Err(PortalError::Validation(format!(
                        "заявку в статусе {:?} нельзя перевести в {:?}",
                        request.status, to
                    )));
                }
                request.status = to;
                if let Some(notes) = review_notes {
                    request.review_notes = Some(notes.trim().to_string());
                }
                Ok(())
            })
            .await;

        match &result {
            Ok(Some(_)) => info!("培训申请 {} 状态变更为 {:?}", id, to),
            Err(e) => warn!("培训申请 {} 状态变更被拒绝: {}", id, e),
            Ok(None) => {}
        }
        result
    }

    /// 某培训中心待处理的申请数
    pub async fn pending_count(&self, training_center_tenant_id: &str) -> usize {
        self.store
            .count(|r| r.tenant_id == training_center_tenant_id && r.status.is_pending())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> TrainingCenterManager {
        TrainingCenterManager::new(RecordStore::in_memory(
            "training-center-requests-storage",
            Vec::new(),
        ))
    }

    fn draft() -> NewTrainingRequest {
        NewTrainingRequest {
            tenant_id: "tenant-3".to_string(),
            from_tenant_id: "tenant-1".to_string(),
            from_tenant_name: "ООО \"ЭнергоПром\"".to_string(),
            program_name: "Подготовка к аттестации Б.1.1".to_string(),
            request_type: RequestType::FullTraining,
            students: vec![RequestStudent {
                personnel_id: "personnel-1".to_string(),
                full_name: "Петров Пётр Петрович".to_string(),
                position: Some("Инженер".to_string()),
            }],
            contact_person: "Администратор".to_string(),
            contact_email: Some("admin@company.ru".to_string()),
            notes: None,
            order_id: Some("order-1".to_string()),
        }
    }

    #[tokio::test]
    async fn test_new_request_is_visible_both_ways() {
        let manager = manager();
        let request = manager.add(draft()).await;
        assert_eq!(request.status, RequestStatus::New);
        assert!(request.id.starts_with("request-"));

        assert_eq!(manager.incoming("tenant-3").await.len(), 1);
        assert!(manager.incoming("tenant-1").await.is_empty());
        assert_eq!(manager.outgoing("tenant-1").await.len(), 1);
        assert_eq!(manager.by_order("order-1").await.unwrap().id, request.id);
        assert_eq!(manager.pending_count("tenant-3").await, 1);
    }

    #[tokio::test]
    async fn test_review_approve_complete() {
        let manager = manager();
        let request = manager.add(draft()).await;

        // 未批准的申请不能完成
        assert!(matches!(
            manager.complete(&request.id).await,
            Err(PortalError::Validation(_))
        ));

        let reviewed = manager.start_review(&request.id).await.unwrap().unwrap();
        assert_eq!(reviewed.status, RequestStatus::InReview);
        assert!(manager.start_review(&request.id).await.is_err());

        manager.approve(&request.id).await.unwrap().unwrap();
        let done = manager.complete(&request.id).await.unwrap().unwrap();
        assert_eq!(done.status, RequestStatus::Completed);
        assert_eq!(manager.pending_count("tenant-3").await, 0);
        assert!(manager.approve(&request.id).await.is_err());
        assert!(manager.approve("request-missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reject_keeps_reason() {
        let manager = manager();
        let request = manager.add(draft()).await;

        assert!(manager.reject(&request.id, "   ").await.is_err());
        let rejected = manager
            .reject(&request.id, "Нет свободных мест в группе")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rejected.status, RequestStatus::Rejected);
        assert_eq!(
            rejected.review_notes.as_deref(),
            Some("Нет свободных мест в группе")
        );
        assert!(manager.complete(&request.id).await.is_err());
        assert_eq!(manager.by_status(RequestStatus::Rejected).await.len(), 1);
    }
}
