//! 检查表与审核命令
//!
//! 检查表维护需要 checklists 模块；审核的安排、执行和结果需要 audit 模块。

use chrono::{NaiveDate, Utc};

use super::auth::{ensure_tenant, require_module, resolve_tenant};
use super::check_record;
use crate::analysis::{AuditOutcome, AuditStats};
use crate::models::checklist::{AuditPatch, ChecklistPatch, NewAudit, NewAuditFinding, NewChecklist};
use crate::models::{Audit, Checklist, ModuleType};
use crate::AppState;

// ==================== 检查表 ====================

pub async fn list_checklists(
    state: &AppState,
    tenant_id: Option<String>,
) -> Result<Vec<Checklist>, String> {
    let user = require_module(state, ModuleType::Checklists).await?;
    let tenant_id = resolve_tenant(&user, tenant_id)?;
    Ok(state
        .operations_domain
        .get_checklists()
        .checklists_by_tenant(&tenant_id)
        .await)
}

pub async fn get_checklist(state: &AppState, id: String) -> Result<Option<Checklist>, String> {
    let user = require_module(state, ModuleType::Checklists).await?;
    let checklists = state.operations_domain.get_checklists();
    if !check_record(checklists.checklists_store(), &user, &id).await? {
        return Ok(None);
    }
    Ok(checklists.get_checklist(&id).await)
}

pub async fn create_checklist(state: &AppState, checklist: NewChecklist) -> Result<Checklist, String> {
    let user = require_module(state, ModuleType::Checklists).await?;
    ensure_tenant(&user, &checklist.tenant_id)?;
    if checklist.items.is_empty() {
        return Err("Чек-лист должен содержать хотя бы один пункт".to_string());
    }
    Ok(state
        .operations_domain
        .get_checklists()
        .add_checklist(checklist)
        .await)
}

pub async fn update_checklist(
    state: &AppState,
    id: String,
    patch: ChecklistPatch,
) -> Result<Option<Checklist>, String> {
    let user = require_module(state, ModuleType::Checklists).await?;
    let checklists = state.operations_domain.get_checklists();
    if !check_record(checklists.checklists_store(), &user, &id).await? {
        return Ok(None);
    }
    Ok(checklists.update_checklist(&id, patch).await)
}

pub async fn delete_checklist(state: &AppState, id: String) -> Result<bool, String> {
    let user = require_module(state, ModuleType::Checklists).await?;
    let checklists = state.operations_domain.get_checklists();
    if !check_record(checklists.checklists_store(), &user, &id).await? {
        return Ok(false);
    }
    Ok(checklists.delete_checklist(&id).await)
}

// ==================== 审核 ====================

pub async fn list_audits(state: &AppState, tenant_id: Option<String>) -> Result<Vec<Audit>, String> {
    let user = require_module(state, ModuleType::Audit).await?;
    let tenant_id = resolve_tenant(&user, tenant_id)?;
    Ok(state
        .operations_domain
        .get_checklists()
        .audits_by_tenant(&tenant_id)
        .await)
}

pub async fn get_audit(state: &AppState, id: String) -> Result<Option<Audit>, String> {
    let user = require_module(state, ModuleType::Audit).await?;
    let checklists = state.operations_domain.get_checklists();
    if !check_record(checklists.audits_store(), &user, &id).await? {
        return Ok(None);
    }
    Ok(checklists.get_audit(&id).await)
}

pub async fn schedule_audit(state: &AppState, audit: NewAudit) -> Result<Audit, String> {
    let user = require_module(state, ModuleType::Audit).await?;
    ensure_tenant(&user, &audit.tenant_id)?;
    state
        .operations_domain
        .get_checklists()
        .schedule_audit(audit)
        .await
        .map_err(|e| e.to_string())
}

pub async fn update_audit(
    state: &AppState,
    id: String,
    patch: AuditPatch,
) -> Result<Option<Audit>, String> {
    let user = require_module(state, ModuleType::Audit).await?;
    let checklists = state.operations_domain.get_checklists();
    if !check_record(checklists.audits_store(), &user, &id).await? {
        return Ok(None);
    }
    Ok(checklists.update_audit(&id, patch).await)
}

pub async fn delete_audit(state: &AppState, id: String) -> Result<bool, String> {
    let user = require_module(state, ModuleType::Audit).await?;
    let checklists = state.operations_domain.get_checklists();
    if !check_record(checklists.audits_store(), &user, &id).await? {
        return Ok(false);
    }
    Ok(checklists.delete_audit(&id).await)
}

pub async fn start_audit(state: &AppState, id: String) -> Result<Option<Audit>, String> {
    let user = require_module(state, ModuleType::Audit).await?;
    let checklists = state.operations_domain.get_checklists();
    if !check_record(checklists.audits_store(), &user, &id).await? {
        return Ok(None);
    }
    checklists.start_audit(&id).await.map_err(|e| e.to_string())
}

/// 记录审核结果（整体替换）
pub async fn update_audit_findings(
    state: &AppState,
    id: String,
    findings: Vec<NewAuditFinding>,
) -> Result<Option<Audit>, String> {
    let user = require_module(state, ModuleType::Audit).await?;
    let checklists = state.operations_domain.get_checklists();
    if !check_record(checklists.audits_store(), &user, &id).await? {
        return Ok(None);
    }
    checklists
        .update_audit_findings(&id, findings)
        .await
        .map_err(|e| e.to_string())
}

/// 完成审核，未指定日期时取今天
pub async fn complete_audit(
    state: &AppState,
    id: String,
    completed_date: Option<NaiveDate>,
) -> Result<Option<Audit>, String> {
    let user = require_module(state, ModuleType::Audit).await?;
    let checklists = state.operations_domain.get_checklists();
    if !check_record(checklists.audits_store(), &user, &id).await? {
        return Ok(None);
    }
    checklists
        .complete_audit(&id, completed_date.unwrap_or_else(|| Utc::now().date_naive()))
        .await
        .map_err(|e| e.to_string())
}

pub async fn get_audit_outcome(state: &AppState, id: String) -> Result<Option<AuditOutcome>, String> {
    let user = require_module(state, ModuleType::Audit).await?;
    let checklists = state.operations_domain.get_checklists();
    if !check_record(checklists.audits_store(), &user, &id).await? {
        return Ok(None);
    }
    Ok(checklists.outcome(&id).await)
}

pub async fn get_audit_stats(
    state: &AppState,
    tenant_id: Option<String>,
) -> Result<AuditStats, String> {
    let user = require_module(state, ModuleType::Audit).await?;
    let tenant_id = resolve_tenant(&user, tenant_id)?;
    Ok(state
        .operations_domain
        .get_checklists()
        .audit_statistics(Some(&tenant_id), Utc::now().date_naive())
        .await)
}
