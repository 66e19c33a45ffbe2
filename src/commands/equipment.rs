//! 设备目录命令

use chrono::{NaiveDate, Utc};

use super::auth::{ensure_tenant, require_module, resolve_tenant};
use super::check_record;
use crate::models::equipment::{EquipmentPatch, NewEquipment};
use crate::models::{Equipment, ModuleType};
use crate::AppState;

/// 维护和检验引用的设备：必须存在且属于同一租户
pub(crate) async fn resolve_equipment(
    state: &AppState,
    tenant_id: &str,
    equipment_id: &str,
) -> Result<Equipment, String> {
    match state.operations_domain.get_equipment().get(equipment_id).await {
        Some(equipment) if equipment.tenant_id == tenant_id => Ok(equipment),
        _ => Err(format!("设备不存在: {}", equipment_id)),
    }
}

pub async fn list_equipment(
    state: &AppState,
    tenant_id: Option<String>,
) -> Result<Vec<Equipment>, String> {
    let user = require_module(state, ModuleType::FacilityCatalog).await?;
    let tenant_id = resolve_tenant(&user, tenant_id)?;
    Ok(state
        .operations_domain
        .get_equipment()
        .by_tenant(&tenant_id)
        .await)
}

pub async fn get_equipment(state: &AppState, id: String) -> Result<Option<Equipment>, String> {
    let user = require_module(state, ModuleType::FacilityCatalog).await?;
    let equipment = state.operations_domain.get_equipment();
    if !check_record(equipment.store(), &user, &id).await? {
        return Ok(None);
    }
    Ok(equipment.get(&id).await)
}

pub async fn create_equipment(state: &AppState, equipment: NewEquipment) -> Result<Equipment, String> {
    let user = require_module(state, ModuleType::FacilityCatalog).await?;
    ensure_tenant(&user, &equipment.tenant_id)?;
    if equipment.name.trim().is_empty() {
        return Err("Наименование оборудования обязательно".to_string());
    }
    Ok(state.operations_domain.get_equipment().add(equipment).await)
}

pub async fn update_equipment(
    state: &AppState,
    id: String,
    patch: EquipmentPatch,
) -> Result<Option<Equipment>, String> {
    let user = require_module(state, ModuleType::FacilityCatalog).await?;
    let equipment = state.operations_domain.get_equipment();
    if !check_record(equipment.store(), &user, &id).await? {
        return Ok(None);
    }
    Ok(equipment.update(&id, patch).await)
}

/// 删除设备；已有的维护与检验记录保留对象名称
pub async fn delete_equipment(state: &AppState, id: String) -> Result<bool, String> {
    let user = require_module(state, ModuleType::FacilityCatalog).await?;
    let equipment = state.operations_domain.get_equipment();
    if !check_record(equipment.store(), &user, &id).await? {
        return Ok(false);
    }
    Ok(equipment.delete(&id).await)
}

/// 下次维护日期已到的设备
pub async fn list_equipment_needing_maintenance(
    state: &AppState,
    tenant_id: Option<String>,
    today: Option<NaiveDate>,
) -> Result<Vec<Equipment>, String> {
    let user = require_module(state, ModuleType::FacilityCatalog).await?;
    let tenant_id = resolve_tenant(&user, tenant_id)?;
    Ok(state
        .operations_domain
        .get_equipment()
        .needing_maintenance(&tenant_id, today.unwrap_or_else(|| Utc::now().date_naive()))
        .await)
}
