//! 人员认证命令

use chrono::Utc;

use super::auth::{ensure_tenant, require_module, resolve_tenant};
use super::{check_record, visible_records};
use crate::analysis::CertificationStats;
use crate::models::certification::{CertificationPatch, CertificationValidity, NewCertification};
use crate::models::{Certification, ModuleType};
use crate::AppState;

pub async fn list_certifications(
    state: &AppState,
    tenant_id: Option<String>,
) -> Result<Vec<Certification>, String> {
    let user = require_module(state, ModuleType::Attestation).await?;
    let tenant_id = resolve_tenant(&user, tenant_id)?;
    Ok(state
        .documents_domain
        .get_attestation()
        .by_tenant(&tenant_id)
        .await)
}

/// 某员工的全部认证
pub async fn list_personnel_certifications(
    state: &AppState,
    personnel_id: String,
) -> Result<Vec<Certification>, String> {
    let user = require_module(state, ModuleType::Attestation).await?;
    let certifications = state
        .documents_domain
        .get_attestation()
        .by_personnel(&personnel_id)
        .await;
    Ok(visible_records(&user, certifications))
}

/// 按有效性（有效 / 即将到期 / 已过期）筛选
pub async fn list_certifications_by_validity(
    state: &AppState,
    tenant_id: Option<String>,
    validity: CertificationValidity,
) -> Result<Vec<Certification>, String> {
    let user = require_module(state, ModuleType::Attestation).await?;
    let tenant_id = resolve_tenant(&user, tenant_id)?;
    Ok(state
        .documents_domain
        .get_attestation()
        .by_validity(&tenant_id, validity, Utc::now().date_naive())
        .await)
}

pub async fn create_certification(
    state: &AppState,
    certification: NewCertification,
) -> Result<Certification, String> {
    let user = require_module(state, ModuleType::Attestation).await?;
    ensure_tenant(&user, &certification.tenant_id)?;
    Ok(state
        .documents_domain
        .get_attestation()
        .add(certification)
        .await)
}

pub async fn update_certification(
    state: &AppState,
    id: String,
    patch: CertificationPatch,
) -> Result<Option<Certification>, String> {
    let user = require_module(state, ModuleType::Attestation).await?;
    let attestation = state.documents_domain.get_attestation();
    if !check_record(attestation.store(), &user, &id).await? {
        return Ok(None);
    }
    Ok(attestation.update(&id, patch).await)
}

pub async fn delete_certification(state: &AppState, id: String) -> Result<bool, String> {
    let user = require_module(state, ModuleType::Attestation).await?;
    let attestation = state.documents_domain.get_attestation();
    if !check_record(attestation.store(), &user, &id).await? {
        return Ok(false);
    }
    Ok(attestation.delete(&id).await)
}

/// 批量导入认证记录（全部属于可访问的租户才会写入）
pub async fn import_certifications(
    state: &AppState,
    certifications: Vec<NewCertification>,
) -> Result<Vec<Certification>, String> {
    let user = require_module(state, ModuleType::Attestation).await?;
    for certification in &certifications {
        ensure_tenant(&user, &certification.tenant_id)?;
    }
    Ok(state
        .documents_domain
        .get_attestation()
        .import(certifications)
        .await)
}

pub async fn get_certification_stats(
    state: &AppState,
    tenant_id: Option<String>,
) -> Result<CertificationStats, String> {
    let user = require_module(state, ModuleType::Attestation).await?;
    let tenant_id = resolve_tenant(&user, tenant_id)?;
    Ok(state
        .documents_domain
        .get_attestation()
        .stats(Some(&tenant_id), Utc::now().date_naive())
        .await)
}
