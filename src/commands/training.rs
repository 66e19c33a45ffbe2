//! 培训中心申请命令
//!
//! 培训中心租户处理收到的申请；客户租户查看自己发出的申请。

use super::auth::{require_module, resolve_tenant};
use super::check_record;
use crate::models::{ModuleType, TrainingRequest};
use crate::AppState;

/// 培训中心收到的申请
pub async fn list_incoming_training_requests(
    state: &AppState,
    tenant_id: Option<String>,
) -> Result<Vec<TrainingRequest>, String> {
    let user = require_module(state, ModuleType::TrainingCenter).await?;
    let tenant_id = resolve_tenant(&user, tenant_id)?;
    Ok(state
        .documents_domain
        .get_training_center()
        .incoming(&tenant_id)
        .await)
}

/// 本租户发出的申请
pub async fn list_outgoing_training_requests(
    state: &AppState,
    tenant_id: Option<String>,
) -> Result<Vec<TrainingRequest>, String> {
    let user = require_module(state, ModuleType::Attestation).await?;
    let tenant_id = resolve_tenant(&user, tenant_id)?;
    Ok(state
        .documents_domain
        .get_training_center()
        .outgoing(&tenant_id)
        .await)
}

pub async fn get_training_request(
    state: &AppState,
    id: String,
) -> Result<Option<TrainingRequest>, String> {
    let user = require_module(state, ModuleType::TrainingCenter).await?;
    let requests = state.documents_domain.get_training_center();
    if !check_record(requests.store(), &user, &id).await? {
        return Ok(None);
    }
    Ok(requests.get(&id).await)
}

pub async fn review_training_request(
    state: &AppState,
    id: String,
) -> Result<Option<TrainingRequest>, String> {
    let user = require_module(state, ModuleType::TrainingCenter).await?;
    let requests = state.documents_domain.get_training_center();
    if !check_record(requests.store(), &user, &id).await? {
        return Ok(None);
    }
    requests.start_review(&id).await.map_err(|e| e.to_string())
}

pub async fn approve_training_request(
    state: &AppState,
    id: String,
) -> Result<Option<TrainingRequest>, String> {
    let user = require_module(state, ModuleType::TrainingCenter).await?;
    let requests = state.documents_domain.get_training_center();
    if !check_record(requests.store(), &user, &id).await? {
        return Ok(None);
    }
    requests.approve(&id).await.map_err(|e| e.to_string())
}

pub async fn reject_training_request(
    state: &AppState,
    id: String,
    reason: String,
) -> Result<Option<TrainingRequest>, String> {
    let user = require_module(state, ModuleType::TrainingCenter).await?;
    let requests = state.documents_domain.get_training_center();
    if !check_record(requests.store(), &user, &id).await? {
        return Ok(None);
    }
    requests.reject(&id, &reason).await.map_err(|e| e.to_string())
}

pub async fn complete_training_request(
    state: &AppState,
    id: String,
) -> Result<Option<TrainingRequest>, String> {
    let user = require_module(state, ModuleType::TrainingCenter).await?;
    let requests = state.documents_domain.get_training_center();
    if !check_record(requests.store(), &user, &id).await? {
        return Ok(None);
    }
    requests.complete(&id).await.map_err(|e| e.to_string())
}

pub async fn delete_training_request(state: &AppState, id: String) -> Result<bool, String> {
    let user = require_module(state, ModuleType::TrainingCenter).await?;
    let requests = state.documents_domain.get_training_center();
    if !check_record(requests.store(), &user, &id).await? {
        return Ok(false);
    }
    Ok(requests.delete(&id).await)
}
