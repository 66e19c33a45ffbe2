//! 安全预算命令

use super::auth::{ensure_tenant, require_module, resolve_tenant};
use super::{check_record, visible_records};
use crate::analysis::BudgetSummary;
use crate::models::budget::{
    BudgetCategoryPatch, BudgetExpensePatch, NewBudgetCategory, NewBudgetExpense,
};
use crate::models::{BudgetCategory, BudgetExpense, ModuleType};
use crate::AppState;

pub async fn list_budget_categories(
    state: &AppState,
    tenant_id: Option<String>,
    year: Option<i32>,
) -> Result<Vec<BudgetCategory>, String> {
    let user = require_module(state, ModuleType::Budget).await?;
    let tenant_id = resolve_tenant(&user, tenant_id)?;
    let budget = state.operations_domain.get_budget();
    Ok(match year {
        Some(year) => budget.categories_by_year(&tenant_id, year).await,
        None => budget.categories(&tenant_id).await,
    })
}

pub async fn create_budget_category(
    state: &AppState,
    category: NewBudgetCategory,
) -> Result<BudgetCategory, String> {
    let user = require_module(state, ModuleType::Budget).await?;
    ensure_tenant(&user, &category.tenant_id)?;
    state
        .operations_domain
        .get_budget()
        .add_category(category)
        .await
        .map_err(|e| e.to_string())
}

pub async fn update_budget_category(
    state: &AppState,
    id: String,
    patch: BudgetCategoryPatch,
) -> Result<Option<BudgetCategory>, String> {
    let user = require_module(state, ModuleType::Budget).await?;
    let budget = state.operations_domain.get_budget();
    if !check_record(budget.categories_store(), &user, &id).await? {
        return Ok(None);
    }
    budget
        .update_category(&id, patch)
        .await
        .map_err(|e| e.to_string())
}

pub async fn delete_budget_category(state: &AppState, id: String) -> Result<bool, String> {
    let user = require_module(state, ModuleType::Budget).await?;
    let budget = state.operations_domain.get_budget();
    if !check_record(budget.categories_store(), &user, &id).await? {
        return Ok(false);
    }
    Ok(budget.delete_category(&id).await)
}

/// 支出列表：指定类别时只返回该类别的支出，否则按年度或全部
pub async fn list_budget_expenses(
    state: &AppState,
    tenant_id: Option<String>,
    category_id: Option<String>,
    year: Option<i32>,
) -> Result<Vec<BudgetExpense>, String> {
    let user = require_module(state, ModuleType::Budget).await?;
    let budget = state.operations_domain.get_budget();
    if let Some(category_id) = category_id {
        let expenses = budget.expenses_by_category(&category_id).await;
        return Ok(visible_records(&user, expenses));
    }
    let tenant_id = resolve_tenant(&user, tenant_id)?;
    Ok(match year {
        Some(year) => budget.expenses_by_year(&tenant_id, year).await,
        None => budget.expenses(&tenant_id).await,
    })
}

pub async fn create_budget_expense(
    state: &AppState,
    expense: NewBudgetExpense,
) -> Result<BudgetExpense, String> {
    let user = require_module(state, ModuleType::Budget).await?;
    ensure_tenant(&user, &expense.tenant_id)?;
    let budget = state.operations_domain.get_budget();
    check_record(budget.categories_store(), &user, &expense.category_id).await?;
    budget.add_expense(expense).await.map_err(|e| e.to_string())
}

pub async fn update_budget_expense(
    state: &AppState,
    id: String,
    patch: BudgetExpensePatch,
) -> Result<Option<BudgetExpense>, String> {
    let user = require_module(state, ModuleType::Budget).await?;
    let budget = state.operations_domain.get_budget();
    if !check_record(budget.expenses_store(), &user, &id).await? {
        return Ok(None);
    }
    budget
        .update_expense(&id, patch)
        .await
        .map_err(|e| e.to_string())
}

pub async fn delete_budget_expense(state: &AppState, id: String) -> Result<bool, String> {
    let user = require_module(state, ModuleType::Budget).await?;
    let budget = state.operations_domain.get_budget();
    if !check_record(budget.expenses_store(), &user, &id).await? {
        return Ok(false);
    }
    Ok(budget.delete_expense(&id).await)
}

/// 年度预算执行汇总
pub async fn get_budget_summary(
    state: &AppState,
    tenant_id: Option<String>,
    year: i32,
) -> Result<BudgetSummary, String> {
    let user = require_module(state, ModuleType::Budget).await?;
    let tenant_id = resolve_tenant(&user, tenant_id)?;
    Ok(state
        .operations_domain
        .get_budget()
        .summary(&tenant_id, year)
        .await)
}
