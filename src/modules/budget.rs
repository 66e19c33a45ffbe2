// 安全预算管理

use rust_decimal::Decimal;
use tracing::info;

use crate::analysis::budget::{budget_summary, BudgetSummary};
use crate::errors::{PortalError, PortalResult};
use crate::models::budget::{
    BudgetCategoryPatch, BudgetExpensePatch, NewBudgetCategory, NewBudgetExpense,
};
use crate::models::{BudgetCategory, BudgetExpense};
use crate::storage::RecordStore;

fn check_amount(field: &str, amount: Decimal, allow_zero: bool) -> PortalResult<()> {
    if amount.is_sign_negative() || (!allow_zero && amount.is_zero()) {
        return Err(PortalError::Validation(format!("{} 无效: {}", field, amount)));
    }
    Ok(())
}

pub struct BudgetManager {
    categories: RecordStore<BudgetCategory>,
    expenses: RecordStore<BudgetExpense>,
}

impl BudgetManager {
    pub fn new(categories: RecordStore<BudgetCategory>, expenses: RecordStore<BudgetExpense>) -> Self {
        Self {
            categories,
            expenses,
        }
    }

    pub fn categories_store(&self) -> &RecordStore<BudgetCategory> {
        &self.categories
    }

    pub fn expenses_store(&self) -> &RecordStore<BudgetExpense> {
        &self.expenses
    }

    // ===== 类别 =====

    pub async fn add_category(&self, draft: NewBudgetCategory) -> PortalResult<BudgetCategory> {
        check_amount("planned_amount", draft.planned_amount, true)?;
        Ok(self.categories.add(draft).await)
    }

    pub async fn update_category(
        &self,
        id: &str,
        patch: BudgetCategoryPatch,
    ) -> PortalResult<Option<BudgetCategory>> {
        if let Some(amount) = patch.planned_amount {
            check_amount("planned_amount", amount, true)?;
        }
        Ok(self.categories.update(id, patch).await)
    }

    /// 删除类别；其下的支出保留，但不再计入任何年度汇总
    pub async fn delete_category(&self, id: &str) -> bool {
        let deleted = self.categories.delete(id).await;
        if deleted {
            info!("删除预算类别 {}", id);
        }
        deleted
    }

    pub async fn get_category(&self, id: &str) -> Option<BudgetCategory> {
        self.categories.get(id).await
    }

    pub async fn categories(&self, tenant_id: &str) -> Vec<BudgetCategory> {
        self.categories.by_tenant(tenant_id).await
    }

    pub async fn categories_by_year(&self, tenant_id: &str, year: i32) -> Vec<BudgetCategory> {
        self.categories
            .filter(|c| c.tenant_id == tenant_id && c.year == year)
            .await
    }

    // ===== 支出 =====

    pub async fn add_expense(&self, draft: NewBudgetExpense) -> PortalResult<BudgetExpense> {
        check_amount("amount", draft.amount, false)?;
        if self.categories.get(&draft.category_id).await.is_none() {
            return Err(PortalError::Validation(format!(
                "预算类别不存在: {}",
                draft.category_id
            )));
        }
        Ok(self.expenses.add(draft).await)
    }

    pub async fn update_expense(
        &self,
        id: &str,
        patch: BudgetExpensePatch,
    ) -> PortalResult<Option<BudgetExpense>> {
        if let Some(amount) = patch.amount {
            check_amount("amount", amount, false)?;
        }
        Ok(self.expenses.update(id, patch).await)
    }

    pub async fn delete_expense(&self, id: &str) -> bool {
        self.expenses.delete(id).await
    }

    pub async fn expenses(&self, tenant_id: &str) -> Vec<BudgetExpense> {
        self.expenses.by_tenant(tenant_id).await
    }

    pub async fn expenses_by_category(&self, category_id: &str) -> Vec<BudgetExpense> {
        self.expenses.filter(|e| e.category_id == category_id).await
    }

    /// 某年度的支出（按所属类别的年度，而非支出日期）
    pub async fn expenses_by_year(&self, tenant_id: &str, year: i32) -> Vec<BudgetExpense> {
        let category_ids: Vec<String> = self
            .categories_by_year(tenant_id, year)
            .await
            .into_iter()
            .map(|c| c.id)
            .collect();
        self.expenses
            .filter(|e| e.tenant_id == tenant_id && category_ids.contains(&e.category_id))
            .await
    }

    pub async fn summary(&self, tenant_id: &str, year: i32) -> BudgetSummary {
        let categories = self.categories.by_tenant(tenant_id).await;
        let expenses = self.expenses.by_tenant(tenant_id).await;
        budget_summary(&categories, &expenses, year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn amount(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn manager() -> BudgetManager {
        BudgetManager::new(
            RecordStore::in_memory("budget-categories-storage", Vec::new()),
            RecordStore::in_memory("budget-expenses-storage", Vec::new()),
        )
    }

    fn category(name: &str, planned: Decimal, year: i32) -> NewBudgetCategory {
        NewBudgetCategory {
            tenant_id: "tenant-1".to_string(),
            name: name.to_string(),
            description: None,
            planned_amount: planned,
            year,
            color: None,
            status: Default::default(),
        }
    }

    fn expense(category_id: &str, amount: Decimal) -> NewBudgetExpense {
        NewBudgetExpense {
            tenant_id: "tenant-1".to_string(),
            category_id: category_id.to_string(),
            amount,
            description: "Средства индивидуальной защиты".to_string(),
            // 支出日期不影响年度归属
            expense_date: NaiveDate::from_ymd_opt(2024, 12, 30).unwrap(),
            document_number: Some("СЧ-17".to_string()),
            source_type: Default::default(),
            source_id: None,
            created_by: "user-1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_summary_by_category_year() {
        let manager = manager();
        let siz = manager.add_category(category("СИЗ", amount("100000"), 2025)).await.unwrap();
        let training = manager
            .add_category(category("Обучение", amount("50000"), 2025))
            .await
            .unwrap();
        let old = manager.add_category(category("СИЗ", amount("80000"), 2024)).await.unwrap();

        manager.add_expense(expense(&siz.id, amount("25000"))).await.unwrap();
        manager.add_expense(expense(&siz.id, amount("12500.50"))).await.unwrap();
        manager.add_expense(expense(&old.id, amount("1000"))).await.unwrap();

        assert_eq!(manager.categories_by_year("tenant-1", 2025).await.len(), 2);
        assert_eq!(manager.expenses_by_year("tenant-1", 2025).await.len(), 2);

        let summary = manager.summary("tenant-1", 2025).await;
        assert_eq!(summary.total_planned, amount("150000"));
        assert_eq!(summary.total_spent, amount("37500.50"));
        assert_eq!(summary.total_remaining, amount("112499.50"));
        assert_eq!(summary.utilization_rate, amount("25.0"));
        let training_summary = summary
            .categories
            .iter()
            .find(|c| c.category_id == training.id)
            .unwrap();
        assert_eq!(training_summary.expenses_count, 0);
        assert_eq!(training_summary.utilization_rate, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_validation_and_delete() {
        let manager = manager();
        let siz = manager.add_category(category("СИЗ", amount("1000"), 2025)).await.unwrap();

        assert!(matches!(
            manager.add_expense(expense(&siz.id, amount("0"))).await,
            Err(PortalError::Validation(_))
        ));
        assert!(matches!(
            manager.add_expense(expense("cat-missing", amount("10"))).await,
            Err(PortalError::Validation(_))
        ));
        assert!(manager
            .add_category(category("Минус", amount("-1"), 2025))
            .await
            .is_err());

        manager.add_expense(expense(&siz.id, amount("10"))).await.unwrap();
        assert!(manager.delete_category(&siz.id).await);
        assert_eq!(manager.expenses("tenant-1").await.len(), 1);
        assert!(manager.summary("tenant-1", 2025).await.categories.is_empty());
        assert!(!manager.delete_category(&siz.id).await);
    }
}
