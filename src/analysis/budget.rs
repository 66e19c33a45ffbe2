// 预算执行汇总

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{BudgetCategory, BudgetExpense};

/// 单个预算类别的执行情况
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category_id: String,
    pub category_name: String,
    pub planned_amount: Decimal,
    pub spent_amount: Decimal,
    pub remaining_amount: Decimal,
    /// 执行率（百分比，保留一位小数）
    pub utilization_rate: Decimal,
    pub expenses_count: usize,
}

/// 某年度的预算汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub year: i32,
    pub categories: Vec<CategorySummary>,
    pub total_planned: Decimal,
    pub total_spent: Decimal,
    pub total_remaining: Decimal,
    pub utilization_rate: Decimal,
}

pub fn utilization_rate(spent: Decimal, planned: Decimal) -> Decimal {
    if planned.is_zero() {
        return Decimal::ZERO;
    }
    (spent * Decimal::ONE_HUNDRED / planned).round_dp(1)
}

/// 按年度汇总；支出按所属类别的年度归属
pub fn budget_summary(
    categories: &[BudgetCategory],
    expenses: &[BudgetExpense],
    year: i32,
) -> BudgetSummary {
    let summaries: Vec<CategorySummary> = categories
        .iter()
        .filter(|c| c.year == year)
        .map(|category| {
            let (spent, count) = expenses
                .iter()
                .filter(|e| e.category_id == category.id)
                .fold((Decimal::ZERO, 0usize), |(sum, n), e| (sum + e.amount, n + 1));
            CategorySummary {
                category_id: category.id.clone(),
                category_name: category.name.clone(),
                planned_amount: category.planned_amount,
                spent_amount: spent,
                remaining_amount: category.planned_amount - spent,
                utilization_rate: utilization_rate(spent, category.planned_amount),
                expenses_count: count,
            }
        })
        .collect();

    let total_planned: Decimal = summaries.iter().map(|s| s.planned_amount).sum();
    let total_spent: Decimal = summaries.iter().map(|s| s.spent_amount).sum();

    BudgetSummary {
        year,
        categories: summaries,
        total_planned,
        total_spent,
        total_remaining: total_planned - total_spent,
        utilization_rate: utilization_rate(total_spent, total_planned),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::budget::{NewBudgetCategory, NewBudgetExpense};
    use crate::storage::Record;
    use chrono::{NaiveDate, Utc};

    fn category(id: &str, year: i32, planned: i64) -> BudgetCategory {
        BudgetCategory::from_draft(
            id.to_string(),
            NewBudgetCategory {
                tenant_id: "tenant-1".to_string(),
                name: format!("Категория {}", id),
                description: None,
                planned_amount: Decimal::from(planned),
                year,
                color: None,
                status: Default::default(),
            },
            Utc::now(),
        )
    }

    fn expense(category_id: &str, amount: i64) -> BudgetExpense {
        BudgetExpense::from_draft(
            format!("exp-{}-{}", category_id, amount),
            NewBudgetExpense {
                tenant_id: "tenant-1".to_string(),
                category_id: category_id.to_string(),
                amount: Decimal::from(amount),
                description: "Закупка".to_string(),
                expense_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
                document_number: None,
                source_type: Default::default(),
                source_id: None,
                created_by: "user-1".to_string(),
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_summary_per_category_and_totals() {
        let categories = vec![
            category("cat-1", 2025, 1000),
            category("cat-2", 2025, 500),
            category("cat-old", 2024, 9999),
        ];
        let expenses = vec![
            expense("cat-1", 250),
            expense("cat-1", 150),
            expense("cat-old", 100),
        ];

        let summary = budget_summary(&categories, &expenses, 2025);

        assert_eq!(summary.categories.len(), 2);
        let first = &summary.categories[0];
        assert_eq!(first.spent_amount, Decimal::from(400));
        assert_eq!(first.remaining_amount, Decimal::from(600));
        assert_eq!(first.utilization_rate, Decimal::from(40));
        assert_eq!(first.expenses_count, 2);
        assert_eq!(summary.categories[1].utilization_rate, Decimal::ZERO);

        assert_eq!(summary.total_planned, Decimal::from(1500));
        assert_eq!(summary.total_spent, Decimal::from(400));
        assert_eq!(summary.utilization_rate, Decimal::new(267, 1));
    }

    #[test]
    fn test_zero_plan_has_zero_utilization() {
        assert_eq!(utilization_rate(Decimal::from(10), Decimal::ZERO), Decimal::ZERO);
    }
}
