// 检查表与审核管理
//
// 检查表定义问题清单；审核按检查表进行：安排 → 开始 → 填写结果 → 完成。

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::analysis::stats::{audit_outcome, audit_stats, AuditOutcome, AuditStats};
use crate::errors::{PortalError, PortalResult};
use crate::models::checklist::{
    AuditPatch, AuditStatus, ChecklistPatch, NewAudit, NewAuditFinding, NewChecklist,
};
use crate::models::{Audit, Checklist};
use crate::storage::RecordStore;

pub struct ChecklistsManager {
    checklists: RecordStore<Checklist>,
    audits: RecordStore<Audit>,
}

impl ChecklistsManager {
    pub fn new(checklists: RecordStore<Checklist>, audits: RecordStore<Audit>) -> Self {
        Self { checklists, audits }
    }

    pub fn checklists_store(&self) -> &RecordStore<Checklist> {
        &self.checklists
    }

    pub fn audits_store(&self) -> &RecordStore<Audit> {
        &self.audits
    }

    // ==================== 检查表 ====================

    pub async fn add_checklist(&self, draft: NewChecklist) -> Checklist {
        self.checklists.add(draft).await
    }

    pub async fn update_checklist(&self, id: &str, patch: ChecklistPatch) -> Option<Checklist> {
        self.checklists.update(id, patch).await
    }

    /// 删除检查表，已有的审核保留
    pub async fn delete_checklist(&self, id: &str) -> bool {
        self.checklists.delete(id).await
    }

    pub async fn get_checklist(&self, id: &str) -> Option<Checklist> {
        self.checklists.get(id).await
    }

    pub async fn checklists_by_tenant(&self, tenant_id: &str) -> Vec<Checklist> {
        self.checklists.by_tenant(tenant_id).await
    }

    pub async fn checklists_by_category(&self, category: &str) -> Vec<Checklist> {
        self.checklists.filter(|c| c.category == category).await
    }

    // ==================== 审核 ====================

    /// 按检查表安排审核；检查表必须存在且属于同一租户
    pub async fn schedule_audit(&self, draft: NewAudit) -> PortalResult<Audit> {
        let checklist = self.require_checklist(&draft.checklist_id).await?;
        if checklist.tenant_id != draft.tenant_id {
            return Err(PortalError::Validation(format!(
                "чек-лист {} принадлежит другому тенанту",
                checklist.id
            )));
        }
        let audit = self.audits.add(draft).await;
        info!("已安排审核 {}（检查表 {}）", audit.id, checklist.name);
        Ok(audit)
    }

    pub async fn update_audit(&self, id: &str, patch: AuditPatch) -> Option<Audit> {
        self.audits.update(id, patch).await
    }

    pub async fn delete_audit(&self, id: &str) -> bool {
        self.audits.delete(id).await
    }

    pub async fn get_audit(&self, id: &str) -> Option<Audit> {
        self.audits.get(id).await
    }

    pub async fn audits_by_tenant(&self, tenant_id: &str) -> Vec<Audit> {
        self.audits.by_tenant(tenant_id).await
    }

    pub async fn audits_by_checklist(&self, checklist_id: &str) -> Vec<Audit> {
        self.audits
            .filter(|a| a.checklist_id == checklist_id)
            .await
    }

    pub async fn audits_by_status(&self, status: AuditStatus) -> Vec<Audit> {
        self.audits.filter(|a| a.status == status).await
    }

    /// 开始审核，只能从 `scheduled` 开始
    pub async fn start_audit(&self, id: &str) -> PortalResult<Option<Audit>> {
        self.set_status(id, AuditStatus::InProgress, None, |status| {
            status == AuditStatus::Scheduled
        })
        .await
    }

    /// 完成审核并记录完成日期
    pub async fn complete_audit(
        &self,
        id: &str,
        completed_date: NaiveDate,
    ) -> PortalResult<Option<Audit>> {
        self.set_status(id, AuditStatus::Completed, Some(completed_date), |status| {
            status != AuditStatus::Completed
        })
        .await
    }

    async fn set_status(
        &self,
        id: &str,
        to: AuditStatus,
        completed_date: Option<NaiveDate>,
        allowed: impl FnOnce(AuditStatus) -> bool,
    ) -> PortalResult<Option<Audit>> {
        let result = self
            .audits
            .try_update_with(id, |audit| {
                if !allowed(audit.status) {
                    return Err(PortalError::Validation(format!(
                        "аудит в статусе «{}» нельзя перевести в «{}»",
                        audit.status.label(),
                        to.label()
                    )));
                }
                audit.status = to;
                if completed_date.is_some() {
                    audit.completed_date = completed_date;
                }
                Ok(())
            })
            .await;

        match &result {
            Ok(Some(_)) => info!("审核 {} 状态变更为 {:?}", id, to),
            Err(e) => warn!("审核 {} 状态变更被拒绝: {}", id, e),
            Ok(None) => {}
        }
        result
    }

    /// 整体替换审核的检查结果
    ///
    /// 每条结果必须对应检查表中的一项；要求说明的项必须附说明；已完成的审核不能修改。
    pub async fn update_audit_findings(
        &self,
        id: &str,
        findings: Vec<NewAuditFinding>,
    ) -> PortalResult<Option<Audit>> {
        let Some(audit) = self.audits.get(id).await else {
            return Ok(None);
        };
        let checklist = self.require_checklist(&audit.checklist_id).await?;

        for finding in &findings {
            let item = checklist.item(&finding.item_id).ok_or_else(|| {
                PortalError::Validation(format!(
                    "пункт {} отсутствует в чек-листе «{}»",
                    finding.item_id, checklist.name
                ))
            })?;
            let commented = finding
                .comment
                .as_deref()
                .is_some_and(|c| !c.trim().is_empty());
            if item.requires_comment && !commented {
                return Err(PortalError::Validation(format!(
                    "для пункта «{}» нужен комментарий",
                    item.question
                )));
            }
        }

        let findings: Vec<_> = findings.into_iter().map(NewAuditFinding::into_finding).collect();
        self.audits
            .try_update_with(id, |audit| {
                if audit.status == AuditStatus::Completed {
                    return Err(PortalError::Validation(
                        "завершённый аудит нельзя изменить".to_string(),
                    ));
                }
                audit.findings = findings;
                Ok(())
            })
            .await
    }

    /// 审核结果汇总；审核或检查表不存在时返回 None
    pub async fn outcome(&self, audit_id: &str) -> Option<AuditOutcome> {
        let audit = self.audits.get(audit_id).await?;
        let checklist = self.checklists.get(&audit.checklist_id).await?;
        Some(audit_outcome(&audit, &checklist))
    }

    pub async fn audit_statistics(&self, tenant_id: Option<&str>, today: NaiveDate) -> AuditStats {
        let audits = match tenant_id {
            Some(tenant_id) => self.audits.by_tenant(tenant_id).await,
            None => self.audits.all().await,
        };
        audit_stats(&audits, today)
    }

    async fn require_checklist(&self, id: &str) -> PortalResult<Checklist> {
        self.checklists
            .get(id)
            .await
            .ok_or_else(|| PortalError::NotFound {
                store: self.checklists.name().to_string(),
                id: id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::checklist::{FindingResult, NewChecklistItem};

    fn manager() -> ChecklistsManager {
        ChecklistsManager::new(
            RecordStore::in_memory("checklists-storage", Vec::new()),
            RecordStore::in_memory("audits-storage", Vec::new()),
        )
    }

    fn item(question: &str, requires_comment: bool, critical_item: bool) -> NewChecklistItem {
        NewChecklistItem {
            question: question.to_string(),
            requires_comment,
            critical_item,
        }
    }

    async fn fire_safety(manager: &ChecklistsManager) -> Checklist {
        manager
            .add_checklist(NewChecklist {
                tenant_id: "tenant-1".to_string(),
                name: "Проверка пожарной безопасности".to_string(),
                category: "fire_safety".to_string(),
                items: vec![
                    item("Все ли огнетушители на месте и исправны?", false, true),
                    item("Свободны ли эвакуационные пути?", false, true),
                    item("Работает ли пожарная сигнализация?", true, true),
                    item("Есть ли актуальные планы эвакуации?", false, false),
                ],
            })
            .await
    }

    fn audit_draft(checklist: &Checklist, scheduled: NaiveDate) -> NewAudit {
        NewAudit {
            tenant_id: checklist.tenant_id.clone(),
            checklist_id: checklist.id.clone(),
            organization_id: "org-1".to_string(),
            auditor_id: "3".to_string(),
            scheduled_date: scheduled,
        }
    }

    fn finding(item_id: &str, result: FindingResult, comment: Option<&str>) -> NewAuditFinding {
        NewAuditFinding {
            item_id: item_id.to_string(),
            result,
            comment: comment.map(str::to_string),
            photo: None,
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, d).unwrap()
    }

    #[tokio::test]
    async fn test_checklist_items_get_ids() {
        let manager = manager();
        let checklist = fire_safety(&manager).await;
        assert_eq!(checklist.items.len(), 4);
        assert!(checklist.items.iter().all(|i| i.id.starts_with("item-")));
        assert_eq!(manager.checklists_by_category("fire_safety").await.len(), 1);
        assert_eq!(manager.checklists_by_tenant("tenant-2").await.len(), 0);
    }

    #[tokio::test]
    async fn test_audit_lifecycle() {
        let manager = manager();
        let checklist = fire_safety(&manager).await;
        let audit = manager.schedule_audit(audit_draft(&checklist, date(15))).await.unwrap();
        assert_eq!(audit.status, AuditStatus::Scheduled);
        assert!(audit.findings.is_empty());

        // 已开始的审核不能再次开始
        let started = manager.start_audit(&audit.id).await.unwrap().unwrap();
        assert_eq!(started.status, AuditStatus::InProgress);
        assert!(matches!(
            manager.start_audit(&audit.id).await,
            Err(PortalError::Validation(_))
        ));

        let items = &checklist.items;
        let updated = manager
            .update_audit_findings(
                &audit.id,
                vec![
                    finding(&items[0].id, FindingResult::Fail, Some("Не хватает 2 огнетушителей")),
                    finding(&items[1].id, FindingResult::Pass, None),
                    finding(&items[2].id, FindingResult::Pass, Some("Датчики исправны")),
                    finding(&items[3].id, FindingResult::NotApplicable, None),
                ],
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.findings.len(), 4);

        let outcome = manager.outcome(&audit.id).await.unwrap();
        assert_eq!(outcome.total_items, 4);
        assert_eq!(outcome.answered, 4);
        assert_eq!(outcome.passed, 2);
        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.not_applicable, 1);
        assert_eq!(outcome.critical_failures, 1);
        assert_eq!(outcome.score, 67);

        let done = manager.complete_audit(&audit.id, date(16)).await.unwrap().unwrap();
        assert_eq!(done.status, AuditStatus::Completed);
        assert_eq!(done.completed_date, Some(date(16)));
        assert!(manager.complete_audit(&audit.id, date(17)).await.is_err());
        assert!(manager
            .update_audit_findings(&audit.id, Vec::new())
            .await
            .is_err());

        assert!(manager.start_audit("audit-missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_findings_are_validated() {
        let manager = manager();
        let checklist = fire_safety(&manager).await;
        let audit = manager.schedule_audit(audit_draft(&checklist, date(15))).await.unwrap();

        let unknown = manager
            .update_audit_findings(&audit.id, vec![finding("item-x", FindingResult::Pass, None)])
            .await;
        assert!(matches!(unknown, Err(PortalError::Validation(_))));

        // 第 3 项要求说明
        let uncommented = manager
            .update_audit_findings(
                &audit.id,
                vec![finding(&checklist.items[2].id, FindingResult::Pass, Some("  "))],
            )
            .await;
        assert!(matches!(uncommented, Err(PortalError::Validation(_))));
        assert!(manager.get_audit(&audit.id).await.unwrap().findings.is_empty());
    }

    #[tokio::test]
    async fn test_schedule_requires_checklist_of_same_tenant() {
        let manager = manager();
        let checklist = fire_safety(&manager).await;

        let mut foreign = audit_draft(&checklist, date(15));
        foreign.tenant_id = "tenant-2".to_string();
        assert!(matches!(
            manager.schedule_audit(foreign).await,
            Err(PortalError::Validation(_))
        ));

        let mut missing = audit_draft(&checklist, date(15));
        missing.checklist_id = "checklist-missing".to_string();
        assert!(matches!(
            manager.schedule_audit(missing).await,
            Err(PortalError::NotFound { .. })
        ));
        assert!(manager.audits_by_tenant("tenant-1").await.is_empty());
    }

    #[tokio::test]
    async fn test_audit_statistics() {
        let manager = manager();
        let checklist = fire_safety(&manager).await;
        let late = manager.schedule_audit(audit_draft(&checklist, date(5))).await.unwrap();
        manager.schedule_audit(audit_draft(&checklist, date(10))).await.unwrap();
        manager.schedule_audit(audit_draft(&checklist, date(20))).await.unwrap();

        let today = date(10);
        let stats = manager.audit_statistics(Some("tenant-1"), today).await;
        assert_eq!(stats.total, 3);
        assert_eq!(stats.scheduled, 3);
        // 今天计划的审核同样算逾期
        assert_eq!(stats.overdue, 2);

        manager.complete_audit(&late.id, today).await.unwrap();
        let stats = manager.audit_statistics(None, today).await;
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.overdue, 1);
        assert_eq!(manager.audits_by_checklist(&checklist.id).await.len(), 3);
        assert_eq!(manager.audits_by_status(AuditStatus::Completed).await.len(), 1);
    }
}
