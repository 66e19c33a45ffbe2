//! 文档命令
//!
//! 包括：
//! - 命令（приказы）的增删改查、状态流转与发送到培训中心
//! - 知识库文档、版本历史与表格导入

use super::auth::{ensure_tenant, require_module, resolve_tenant};
use super::{check_record, visible_records};
use crate::analysis::OrderStats;
use crate::models::knowledge::{
    DocumentCategory, DocumentVersion, KnowledgeDocumentPatch, NewKnowledgeDocument,
};
use crate::models::notification::{NewNotification, NotificationKind, NotificationSource};
use crate::models::order::{NewOrder, OrderPatch};
use crate::models::training_request::{RequestStudent, RequestType};
use crate::models::{DocumentStatus, KnowledgeDocument, ModuleType, Order};
use crate::modules::TrainingReferral;
use crate::utils::parse_csv;
use crate::AppState;

// ==================== 命令 ====================

pub async fn list_orders(state: &AppState, tenant_id: Option<String>) -> Result<Vec<Order>, String> {
    let user = require_module(state, ModuleType::Attestation).await?;
    let tenant_id = resolve_tenant(&user, tenant_id)?;
    Ok(state.documents_domain.get_orders().by_tenant(&tenant_id).await)
}

pub async fn get_order(state: &AppState, id: String) -> Result<Option<Order>, String> {
    let user = require_module(state, ModuleType::Attestation).await?;
    let orders = state.documents_domain.get_orders();
    if !check_record(orders.store(), &user, &id).await? {
        return Ok(None);
    }
    Ok(orders.get(&id).await)
}

pub async fn create_order(state: &AppState, order: NewOrder) -> Result<Order, String> {
    let user = require_module(state, ModuleType::Attestation).await?;
    ensure_tenant(&user, &order.tenant_id)?;
    Ok(state.documents_domain.get_orders().add(order).await)
}

pub async fn update_order(
    state: &AppState,
    id: String,
    patch: OrderPatch,
) -> Result<Option<Order>, String> {
    let user = require_module(state, ModuleType::Attestation).await?;
    let orders = state.documents_domain.get_orders();
    if !check_record(orders.store(), &user, &id).await? {
        return Ok(None);
    }
    Ok(orders.update(&id, patch).await)
}

pub async fn delete_order(state: &AppState, id: String) -> Result<bool, String> {
    let user = require_module(state, ModuleType::Attestation).await?;
    let orders = state.documents_domain.get_orders();
    if !check_record(orders.store(), &user, &id).await? {
        return Ok(false);
    }
    Ok(orders.delete(&id).await)
}

/// 变更命令状态（必须符合状态流转表）
pub async fn transition_order(
    state: &AppState,
    id: String,
    status: DocumentStatus,
) -> Result<Option<Order>, String> {
    let user = require_module(state, ModuleType::Attestation).await?;
    let orders = state.documents_domain.get_orders();
    if !check_record(orders.store(), &user, &id).await? {
        return Ok(None);
    }
    orders.transition(&id, status).await.map_err(|e| e.to_string())
}

/// 当前状态可以转换到的状态
pub async fn get_order_transitions(
    state: &AppState,
    id: String,
) -> Result<Option<Vec<DocumentStatus>>, String> {
    let user = require_module(state, ModuleType::Attestation).await?;
    let orders = state.documents_domain.get_orders();
    if !check_record(orders.store(), &user, &id).await? {
        return Ok(None);
    }
    Ok(orders.available_transitions(&id).await)
}

/// 把命令发送到培训中心
///
/// 目标租户必须启用培训中心模块。学员取命令中的员工，姓名从认证记录中查找。
/// 申请创建后通知培训中心租户。
pub async fn send_order_to_training_center(
    state: &AppState,
    id: String,
    training_center_tenant_id: String,
    request_type: RequestType,
) -> Result<Option<Order>, String> {
    let user = require_module(state, ModuleType::Attestation).await?;
    let orders = state.documents_domain.get_orders();
    if !check_record(orders.store(), &user, &id).await? {
        return Ok(None);
    }
    let Some(order) = orders.get(&id).await else {
        return Ok(None);
    };

    let tenants = state.platform_domain.get_tenants();
    let training_center = tenants
        .get(&training_center_tenant_id)
        .await
        .filter(|t| t.modules.contains(&ModuleType::TrainingCenter))
        .ok_or_else(|| format!("培训中心不存在: {}", training_center_tenant_id))?;
    let from_tenant_name = tenants
        .get(&order.tenant_id)
        .await
        .map(|t| t.name)
        .unwrap_or_default();

    let attestation = state.documents_domain.get_attestation();
    let mut students = Vec::with_capacity(order.employee_ids.len());
    for personnel_id in &order.employee_ids {
        let full_name = attestation
            .by_personnel(personnel_id)
            .await
            .into_iter()
            .find(|c| c.tenant_id == order.tenant_id)
            .map(|c| c.person_name)
            .unwrap_or_else(|| "Неизвестно".to_string());
        students.push(RequestStudent {
            personnel_id: personnel_id.clone(),
            full_name,
            position: None,
        });
    }

    let referral = TrainingReferral {
        training_center_tenant_id: training_center.id.clone(),
        request_type,
        from_tenant_name,
        contact_person: user.name.clone(),
        contact_email: Some(user.email.clone()),
        students,
    };
    let requests = state.documents_domain.get_training_center();
    let sent = orders
        .send_to_training_center(&id, requests, referral)
        .await
        .map_err(|e| e.to_string())?;

    if let Some(request_id) = sent
        .as_ref()
        .and_then(|o| o.training_center_request_id.clone())
        .filter(|request_id| order.training_center_request_id.as_ref() != Some(request_id))
    {
        state
            .platform_domain
            .get_notifications()
            .add(NewNotification {
                tenant_id: training_center.id,
                user_id: None,
                kind: NotificationKind::Info,
                source: NotificationSource::TrainingCenter,
                source_id: Some(request_id),
                title: "Новая заявка на обучение".to_string(),
                message: format!("{}: {}", order.title, request_type.label()),
                link: None,
            })
            .await;
    }
    Ok(sent)
}

pub async fn get_order_stats(
    state: &AppState,
    tenant_id: Option<String>,
) -> Result<OrderStats, String> {
    let user = require_module(state, ModuleType::Attestation).await?;
    let tenant_id = resolve_tenant(&user, tenant_id)?;
    Ok(state
        .documents_domain
        .get_orders()
        .stats(Some(&tenant_id))
        .await)
}

// ==================== 知识库 ====================

pub async fn list_documents(
    state: &AppState,
    tenant_id: Option<String>,
) -> Result<Vec<KnowledgeDocument>, String> {
    let user = require_module(state, ModuleType::KnowledgeBase).await?;
    let tenant_id = resolve_tenant(&user, tenant_id)?;
    Ok(state
        .documents_domain
        .get_knowledge_base()
        .by_tenant(&tenant_id)
        .await)
}

/// 某类别下已发布的文档（本租户）
pub async fn list_documents_by_category(
    state: &AppState,
    category: DocumentCategory,
) -> Result<Vec<KnowledgeDocument>, String> {
    let user = require_module(state, ModuleType::KnowledgeBase).await?;
    let documents = state
        .documents_domain
        .get_knowledge_base()
        .by_category(category)
        .await;
    Ok(visible_records(&user, documents))
}

pub async fn search_documents(
    state: &AppState,
    query: String,
) -> Result<Vec<KnowledgeDocument>, String> {
    let user = require_module(state, ModuleType::KnowledgeBase).await?;
    let documents = state
        .documents_domain
        .get_knowledge_base()
        .search(&query)
        .await;
    Ok(visible_records(&user, documents))
}

pub async fn create_document(
    state: &AppState,
    document: NewKnowledgeDocument,
) -> Result<KnowledgeDocument, String> {
    let user = require_module(state, ModuleType::KnowledgeBase).await?;
    ensure_tenant(&user, &document.tenant_id)?;
    Ok(state.documents_domain.get_knowledge_base().add(document).await)
}

/// 更新文档；提供变更说明时按版本更新（内容变化会保存旧版本）
pub async fn update_document(
    state: &AppState,
    id: String,
    patch: KnowledgeDocumentPatch,
    change_description: Option<String>,
) -> Result<Option<KnowledgeDocument>, String> {
    let user = require_module(state, ModuleType::KnowledgeBase).await?;
    let knowledge_base = state.documents_domain.get_knowledge_base();
    if !check_record(knowledge_base.store(), &user, &id).await? {
        return Ok(None);
    }
    match change_description {
        Some(description) => Ok(knowledge_base
            .update_document(&id, patch, &description)
            .await),
        None => Ok(knowledge_base.update(&id, patch).await),
    }
}

pub async fn delete_document(state: &AppState, id: String) -> Result<bool, String> {
    let user = require_module(state, ModuleType::KnowledgeBase).await?;
    let knowledge_base = state.documents_domain.get_knowledge_base();
    if !check_record(knowledge_base.store(), &user, &id).await? {
        return Ok(false);
    }
    Ok(knowledge_base.delete(&id).await)
}

/// 打开文档（浏览次数 +1）
pub async fn view_document(
    state: &AppState,
    id: String,
) -> Result<Option<KnowledgeDocument>, String> {
    let user = require_module(state, ModuleType::KnowledgeBase).await?;
    let knowledge_base = state.documents_domain.get_knowledge_base();
    if !check_record(knowledge_base.store(), &user, &id).await? {
        return Ok(None);
    }
    Ok(knowledge_base.increment_views(&id).await)
}

/// 下载文档（下载次数 +1）
pub async fn download_document(
    state: &AppState,
    id: String,
) -> Result<Option<KnowledgeDocument>, String> {
    let user = require_module(state, ModuleType::KnowledgeBase).await?;
    let knowledge_base = state.documents_domain.get_knowledge_base();
    if !check_record(knowledge_base.store(), &user, &id).await? {
        return Ok(None);
    }
    Ok(knowledge_base.increment_downloads(&id).await)
}

pub async fn get_document_versions(
    state: &AppState,
    id: String,
) -> Result<Vec<DocumentVersion>, String> {
    let user = require_module(state, ModuleType::KnowledgeBase).await?;
    let knowledge_base = state.documents_domain.get_knowledge_base();
    if !check_record(knowledge_base.store(), &user, &id).await? {
        return Ok(Vec::new());
    }
    Ok(knowledge_base.versions(&id).await)
}

pub async fn restore_document_version(
    state: &AppState,
    id: String,
    version_number: String,
) -> Result<Option<KnowledgeDocument>, String> {
    let user = require_module(state, ModuleType::KnowledgeBase).await?;
    let knowledge_base = state.documents_domain.get_knowledge_base();
    if !check_record(knowledge_base.store(), &user, &id).await? {
        return Ok(None);
    }
    knowledge_base
        .restore_version(&id, &version_number)
        .await
        .map_err(|e| e.to_string())
}

/// 从 CSV 文本导入知识库文档，作者为当前用户
pub async fn import_documents_csv(
    state: &AppState,
    tenant_id: Option<String>,
    csv: String,
) -> Result<Vec<KnowledgeDocument>, String> {
    let user = require_module(state, ModuleType::KnowledgeBase).await?;
    let tenant_id = resolve_tenant(&user, tenant_id)?;
    let rows = parse_csv(&csv).map_err(|e| e.to_string())?;
    state
        .documents_domain
        .get_knowledge_base()
        .import(&rows, &tenant_id, &user.name)
        .await
        .map_err(|e| e.to_string())
}
