// 技术检验管理

use chrono::NaiveDate;
use tracing::info;

use crate::analysis::stats::{examination_stats, ExaminationStats};
use crate::models::examination::{ExaminationPatch, ExaminationStatus, NewExamination};
use crate::models::Examination;
use crate::storage::RecordStore;

pub struct ExaminationsManager {
    store: RecordStore<Examination>,
}

impl ExaminationsManager {
    pub fn new(store: RecordStore<Examination>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore<Examination> {
        &self.store
    }

    pub async fn add(&self, draft: NewExamination) -> Examination {
        self.store.add(draft).await
    }

    pub async fn update(&self, id: &str, patch: ExaminationPatch) -> Option<Examination> {
        self.store.update(id, patch).await
    }

    pub async fn delete(&self, id: &str) -> bool {
        self.store.delete(id).await
    }

    pub async fn get(&self, id: &str) -> Option<Examination> {
        self.store.get(id).await
    }

    pub async fn all(&self) -> Vec<Examination> {
        self.store.all().await
    }

    pub async fn by_tenant(&self, tenant_id: &str) -> Vec<Examination> {
        self.store.by_tenant(tenant_id).await
    }

    /// 完成检验，可附上结论文件
    pub async fn complete(
        &self,
        id: &str,
        completed_date: NaiveDate,
        conclusion_file_url: Option<String>,
    ) -> Option<Examination> {
        self.store
            .update_with(id, |exam| {
                exam.status = ExaminationStatus::Completed;
                exam.completed_date = Some(completed_date);
                if conclusion_file_url.is_some() {
                    exam.conclusion_file_url = conclusion_file_url;
                }
            })
            .await
    }

    pub async fn by_status(&self, status: ExaminationStatus) -> Vec<Examination> {
        self.store.filter(|e| e.status == status).await
    }

    pub async fn by_type(&self, examination_type: &str) -> Vec<Examination> {
        self.store
            .filter(|e| e.examination_type == examination_type)
            .await
    }

    pub async fn by_object(&self, object_id: &str) -> Vec<Examination> {
        self.store.filter(|e| e.object_id == object_id).await
    }

    /// 今后 `days` 天内计划进行的未完成检验（不含今天，今天到期已算逾期）
    pub async fn upcoming(&self, today: NaiveDate, days: i64) -> Vec<Examination> {
        let mut upcoming = self
            .store
            .filter(|e| {
                let days_left = (e.scheduled_date - today).num_days();
                e.status != ExaminationStatus::Completed && (1..=days).contains(&days_left)
            })
            .await;
        upcoming.sort_by_key(|e| e.scheduled_date);
        upcoming
    }

    pub async fn mark_overdue(&self, today: NaiveDate) -> usize {
        let marked = self
            .store
            .update_where(|exam| {
                let late = matches!(
                    exam.status,
                    ExaminationStatus::Scheduled | ExaminationStatus::InProgress
                ) && exam.scheduled_date <= today;
                if late {
                    exam.status = ExaminationStatus::Overdue;
                }
                late
            })
            .await;
        if marked > 0 {
            info!("标记逾期检验 {} 条", marked);
        }
        marked
    }

    pub async fn statistics(&self, tenant_id: Option<&str>, today: NaiveDate) -> ExaminationStats {
        let examinations = match tenant_id {
            Some(tenant_id) => self.store.by_tenant(tenant_id).await,
            None => self.store.all().await,
        };
        examination_stats(&examinations, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(object_id: &str, scheduled: NaiveDate) -> NewExamination {
        NewExamination {
            tenant_id: "tenant-1".to_string(),
            object_id: object_id.to_string(),
            object_name: "Компрессор К-301".to_string(),
            examination_type: "Техническая диагностика".to_string(),
            scheduled_date: scheduled,
            status: ExaminationStatus::Scheduled,
            executor: "ООО \"Экспертиза Промбезопасность\"".to_string(),
            executor_contact: None,
            notes: None,
            created_by: "user-1".to_string(),
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
    }

    #[tokio::test]
    async fn test_upcoming_and_complete() {
        let manager = ExaminationsManager::new(RecordStore::in_memory("examination-storage", Vec::new()));
        let soon = manager.add(draft("eq-1", date(15))).await;
        manager.add(draft("eq-2", date(12))).await;
        manager.add(draft("eq-3", date(29))).await;

        let today = date(10);
        let upcoming = manager.upcoming(today, 7).await;
        let objects: Vec<&str> = upcoming.iter().map(|e| e.object_id.as_str()).collect();
        assert_eq!(objects, vec!["eq-2", "eq-1"]);

        let done = manager
            .complete(&soon.id, date(14), Some("/files/conclusion.pdf".to_string()))
            .await
            .unwrap();
        assert_eq!(done.status, ExaminationStatus::Completed);
        assert_eq!(done.conclusion_file_url.as_deref(), Some("/files/conclusion.pdf"));
        assert_eq!(manager.upcoming(today, 7).await.len(), 1);
    }

    #[tokio::test]
    async fn test_mark_overdue_and_statistics() {
        let manager = ExaminationsManager::new(RecordStore::in_memory("examination-storage", Vec::new()));
        manager.add(draft("eq-1", date(1))).await;
        manager.add(draft("eq-2", date(20))).await;

        let today = date(10);
        assert_eq!(manager.mark_overdue(today).await, 1);
        let stats = manager.statistics(None, today).await;
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.scheduled, 1);
        assert_eq!(manager.by_status(ExaminationStatus::Overdue).await.len(), 1);
        assert_eq!(manager.by_type("Техническая диагностика").await.len(), 2);
        assert_eq!(manager.by_object("eq-2").await.len(), 1);
    }
}
