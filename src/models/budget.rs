// 安全预算：预算类别与支出

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::storage::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryStatus {
    #[default]
    Active,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub description: Option<String>,
    pub planned_amount: Decimal,
    pub year: i32,
    pub color: Option<String>,
    pub status: CategoryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBudgetCategory {
    pub tenant_id: String,
    pub name: String,
    pub description: Option<String>,
    pub planned_amount: Decimal,
    pub year: i32,
    pub color: Option<String>,
    #[serde(default)]
    pub status: CategoryStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetCategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub planned_amount: Option<Decimal>,
    pub year: Option<i32>,
    pub color: Option<String>,
    pub status: Option<CategoryStatus>,
}

impl Record for BudgetCategory {
    type Draft = NewBudgetCategory;
    type Patch = BudgetCategoryPatch;
    const ID_PREFIX: &'static str = "cat";

    fn id(&self) -> &str {
        &self.id
    }

    fn tenant_id(&self) -> Option<&str> {
        Some(&self.tenant_id)
    }

    fn from_draft(id: String, draft: NewBudgetCategory, now: DateTime<Utc>) -> Self {
        Self {
            id,
            tenant_id: draft.tenant_id,
            name: draft.name,
            description: draft.description,
            planned_amount: draft.planned_amount,
            year: draft.year,
            color: draft.color,
            status: draft.status,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: BudgetCategoryPatch) {
        merge_fields!(self, patch;
            set: name, planned_amount, year, status;
            opt: description, color);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// 支出来源
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseSource {
    #[default]
    Manual,
    Incident,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetExpense {
    pub id: String,
    pub tenant_id: String,
    pub category_id: String,
    pub amount: Decimal,
    pub description: String,
    pub expense_date: NaiveDate,
    pub document_number: Option<String>,
    pub source_type: ExpenseSource,
    /// 来源记录（例如事故）的标识
    pub source_id: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBudgetExpense {
    pub tenant_id: String,
    pub category_id: String,
    pub amount: Decimal,
    pub description: String,
    pub expense_date: NaiveDate,
    pub document_number: Option<String>,
    #[serde(default)]
    pub source_type: ExpenseSource,
    pub source_id: Option<String>,
    pub created_by: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetExpensePatch {
    pub category_id: Option<String>,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub expense_date: Option<NaiveDate>,
    pub document_number: Option<String>,
}

impl Record for BudgetExpense {
    type Draft = NewBudgetExpense;
    type Patch = BudgetExpensePatch;
    const ID_PREFIX: &'static str = "exp";

    fn id(&self) -> &str {
        &self.id
    }

    fn tenant_id(&self) -> Option<&str> {
        Some(&self.tenant_id)
    }

    fn from_draft(id: String, draft: NewBudgetExpense, now: DateTime<Utc>) -> Self {
        Self {
            id,
            tenant_id: draft.tenant_id,
            category_id: draft.category_id,
            amount: draft.amount,
            description: draft.description,
            expense_date: draft.expense_date,
            document_number: draft.document_number,
            source_type: draft.source_type,
            source_id: draft.source_id,
            created_by: draft.created_by,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: BudgetExpensePatch) {
        merge_fields!(self, patch;
            set: category_id, amount, description, expense_date;
            opt: document_number);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
